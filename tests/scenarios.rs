//! Literal end-to-end scenarios over the public API: a known buffer goes
//! in, an expected detection/carve/decode result comes out.

use recoverite::domain::entities::SignatureName;
use recoverite::domain::services::{self, scanner, FileCarver as _};
use recoverite::infrastructure::byte_source::InMemoryByteSource;
use recoverite::infrastructure::carvers::GenericFileCarver;

const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const PNG_FOOTER: &[u8] = &[0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82];
const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];
const JPEG_FOOTER: &[u8] = &[0xFF, 0xD9];

fn scan_all(source: &InMemoryByteSource) -> Vec<recoverite::domain::entities::Detection> {
    scanner::scan(source, None, true, 1024 * 1024, |_| true)
}

/// S1 - PNG in noise: 2 MiB of zeros with a 12 KiB PNG spliced in at
/// offset 1,500,000. Expected exactly one detection at that offset, with
/// a carved length of 12 KiB.
#[test]
fn s1_png_in_noise() {
    const TOTAL: usize = 2 * 1024 * 1024;
    const OFFSET: usize = 1_500_000;
    const PNG_SIZE: usize = 12 * 1024;

    let mut data = vec![0u8; TOTAL];
    data[OFFSET..OFFSET + PNG_HEADER.len()].copy_from_slice(PNG_HEADER);
    let footer_at = OFFSET + PNG_SIZE - PNG_FOOTER.len();
    data[footer_at..footer_at + PNG_FOOTER.len()].copy_from_slice(PNG_FOOTER);

    let source = InMemoryByteSource::new("s1".to_string(), data);
    let detections = scan_all(&source);

    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].signature, SignatureName::Png);
    assert_eq!(detections[0].offset as usize, OFFSET);

    let carver = GenericFileCarver::new(&source);
    let carved = carver.carve(&detections[0]).unwrap();
    assert_eq!(carved.payload_length() as usize, PNG_SIZE);
}

/// S4 - PDF without a footer: header at offset 100, no `%%EOF`, 5 KiB of
/// zeros at the end. Expected: the carver falls back to the zero-run
/// heuristic, and the detection is accepted since the estimated span
/// clears the 1024-byte minimum.
#[test]
fn s4_pdf_without_footer() {
    const OFFSET: usize = 100;
    const BODY_LEN: usize = 4096;
    const ZERO_RUN: usize = 5 * 1024;

    let mut data = vec![0x11u8; OFFSET + BODY_LEN];
    data[OFFSET..OFFSET + 8].copy_from_slice(b"%PDF-1.4");
    data.extend(vec![0u8; ZERO_RUN]);

    let source = InMemoryByteSource::new("s4".to_string(), data);
    let detections = scan_all(&source);

    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].signature, SignatureName::Pdf);

    let carver = GenericFileCarver::new(&source);
    let carved = carver.carve(&detections[0]).unwrap();
    assert!(carved.payload_length() >= 1024);
    assert_eq!(carved.end_offset() as usize, OFFSET + BODY_LEN);
}

/// S5 - a JPEG header straddling the 1 MiB chunk boundary, two bytes
/// before it, with its footer shortly after. Expected: exactly one
/// detection at the pre-boundary offset, carved length 428.
#[test]
fn s5_chunk_boundary_jpeg() {
    const OFFSET: usize = 1_048_574;
    const FOOTER_AT: usize = 1_049_000;

    let mut data = vec![0u8; 2 * 1024 * 1024];
    data[OFFSET..OFFSET + JPEG_HEADER.len()].copy_from_slice(JPEG_HEADER);
    data[FOOTER_AT..FOOTER_AT + JPEG_FOOTER.len()].copy_from_slice(JPEG_FOOTER);

    let source = InMemoryByteSource::new("s5".to_string(), data);
    let detections = scan_all(&source);

    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].offset as usize, OFFSET);

    let carver = GenericFileCarver::new(&source);
    let carved = carver.carve(&detections[0]).unwrap();
    assert_eq!(carved.payload_length(), 428);
}

/// S6 - DOCX validation: two ZIP-prefixed buffers, only one of which
/// carries `word/` within the first 2000 bytes. Expected: DOCX fires only
/// on the first.
#[test]
fn s6_docx_validation() {
    let docx_header = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0x06, 0x00];

    let mut valid = vec![0u8; 2048];
    valid[0..8].copy_from_slice(&docx_header);
    valid[100..105].copy_from_slice(b"word/");
    let valid_source = InMemoryByteSource::new("s6-valid".to_string(), valid);
    let valid_detections = scan_all(&valid_source);
    assert_eq!(valid_detections.len(), 1);
    assert_eq!(valid_detections[0].signature, SignatureName::Docx);

    let mut invalid = vec![0u8; 2048];
    invalid[0..8].copy_from_slice(&docx_header);
    let invalid_source = InMemoryByteSource::new("s6-invalid".to_string(), invalid);
    let invalid_detections = scan_all(&invalid_source);
    assert!(invalid_detections.is_empty());
}

/// S2 - an MBR sector with two primary partitions, read through the
/// public ByteSource-driven decoder rather than the pure sector helper.
#[test]
fn s2_mbr_two_primaries() {
    let mut sector = vec![0u8; 512];
    sector[446] = 0x80; // bootable
    sector[446 + 4] = 0x07; // NTFS/exFAT
    sector[446 + 8..446 + 12].copy_from_slice(&2048u32.to_le_bytes());
    sector[446 + 12..446 + 16].copy_from_slice(&204800u32.to_le_bytes());

    sector[462 + 4] = 0x83; // Linux, second entry at 446 + 16
    sector[462 + 8..462 + 12].copy_from_slice(&206848u32.to_le_bytes());
    sector[462 + 12..462 + 16].copy_from_slice(&819200u32.to_le_bytes());

    sector[510] = 0x55;
    sector[511] = 0xAA;

    let source = InMemoryByteSource::new("s2".to_string(), sector);
    let table = services::decode_mbr(&source);

    let recoverite::domain::entities::PartitionTable::Mbr(entries) = table else {
        panic!("expected an MBR table");
    };
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].type_name, "NTFS/exFAT");
    assert!(entries[0].bootable);
    assert_eq!(entries[0].size_mb(), 100);
    assert_eq!(entries[1].type_name, "Linux");
    assert!(!entries[1].bootable);
    assert_eq!(entries[1].size_mb(), 400);
}

/// S3 - a FAT32 boot sector, read through the public filesystem decoder.
#[test]
fn s3_fat32_superblock() {
    let mut sector = vec![0u8; 512];
    sector[0..3].copy_from_slice(&[0xEB, 0x58, 0x90]);
    sector[3..11].copy_from_slice(b"MSDOS5.0");
    sector[11..13].copy_from_slice(&512u16.to_le_bytes());
    sector[13] = 8;
    sector[17..19].copy_from_slice(&0u16.to_le_bytes());
    sector[19..21].copy_from_slice(&0u16.to_le_bytes());
    sector[32..36].copy_from_slice(&32_204_800u32.to_le_bytes());

    let source = InMemoryByteSource::new("s3".to_string(), sector);
    let volume = services::detect_filesystem(&source).expect("expected a FAT32 volume");

    match volume {
        recoverite::domain::entities::VolumeDescriptor::Fat32 { volume_size_mb, .. } => {
            assert_eq!(volume_size_mb, 15725);
        }
        other => panic!("expected Fat32, got {other:?}"),
    }
}
