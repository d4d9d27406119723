//! Partition table decoder service
//!
//! Decodes MBR and GPT structures from a [`ByteSource`]. Malformed or
//! absent structures are reported as the `Absent` variant, never as an
//! error: adversarial or empty input is an expected case, not a fault.

use crate::domain::entities::{GptHeader, PartitionEntry, PartitionTable};
use crate::domain::repositories::ByteSource;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

const SECTOR_SIZE: usize = 512;
const MBR_ENTRY_TABLE_OFFSET: usize = 446;
const MBR_ENTRY_SIZE: usize = 16;
const MBR_SIGNATURE: [u8; 2] = [0x55, 0xAA];
const GPT_SIGNATURE: &[u8; 8] = b"EFI PART";

fn mbr_type_name(code: u8) -> String {
    match code {
        0x00 => "Empty",
        0x01 => "FAT12",
        0x04 => "FAT16<32MB",
        0x05 => "Extended",
        0x06 => "FAT16",
        0x07 => "NTFS/exFAT",
        0x0B => "FAT32",
        0x0C => "FAT32 LBA",
        0x0E => "FAT16 LBA",
        0x0F => "Extended LBA",
        0x82 => "Linux Swap",
        0x83 => "Linux",
        0x85 => "Linux Extended",
        0x8E => "Linux LVM",
        0xA5 => "FreeBSD",
        0xA6 => "OpenBSD",
        0xAF => "macOS HFS+",
        0xEE => "GPT Protective",
        0xEF => "EFI System",
        other => return format!("Unknown (0x{other:02X})"),
    }
    .to_string()
}

/// Decodes sector 0 of `source` as an MBR. Returns `PartitionTable::Absent`
/// when the `0x55 0xAA` trailer is missing.
pub fn decode_mbr<S: ByteSource + ?Sized>(source: &S) -> PartitionTable {
    let Ok(sector) = source.read_at(0, SECTOR_SIZE) else {
        return PartitionTable::Absent;
    };
    decode_mbr_sector(&sector)
}

/// Pure decode over an already-read 512-byte sector.
pub fn decode_mbr_sector(sector: &[u8]) -> PartitionTable {
    if sector.len() < SECTOR_SIZE || sector[510..512] != MBR_SIGNATURE {
        tracing::debug!("no MBR signature at sector 0");
        return PartitionTable::Absent;
    }

    let mut entries = Vec::new();
    for slot in 0..4u8 {
        let base = MBR_ENTRY_TABLE_OFFSET + slot as usize * MBR_ENTRY_SIZE;
        let entry = &sector[base..base + MBR_ENTRY_SIZE];
        let status = entry[0];
        let type_code = entry[4];
        let mut cursor = Cursor::new(&entry[8..12]);
        let start_lba = cursor.read_u32::<LittleEndian>().unwrap_or(0);
        let mut cursor = Cursor::new(&entry[12..16]);
        let sector_count = cursor.read_u32::<LittleEndian>().unwrap_or(0);

        if (status == 0 && type_code == 0) || sector_count == 0 {
            continue;
        }

        entries.push(PartitionEntry {
            index: slot + 1,
            bootable: status == 0x80,
            type_code,
            type_name: mbr_type_name(type_code),
            start_lba,
            sector_count,
        });
    }

    tracing::info!("decoded MBR with {} partition entries", entries.len());
    PartitionTable::Mbr(entries)
}

/// Decodes LBA 1 (bytes 512..1024) of `source` as a GPT header.
pub fn decode_gpt<S: ByteSource + ?Sized>(source: &S) -> PartitionTable {
    let Ok(lba1) = source.read_at(SECTOR_SIZE as u64, SECTOR_SIZE) else {
        return PartitionTable::Absent;
    };
    decode_gpt_sector(&lba1)
}

pub fn decode_gpt_sector(lba1: &[u8]) -> PartitionTable {
    if lba1.len() < 88 || &lba1[0..8] != GPT_SIGNATURE {
        tracing::debug!("no GPT signature at LBA 1");
        return PartitionTable::Absent;
    }

    let mut cursor = Cursor::new(&lba1[80..84]);
    let entry_count = cursor.read_u32::<LittleEndian>().unwrap_or(0);
    let mut cursor = Cursor::new(&lba1[84..88]);
    let entry_size = cursor.read_u32::<LittleEndian>().unwrap_or(0);

    tracing::info!("decoded GPT header with {entry_count} entries of {entry_size} bytes");
    PartitionTable::Gpt(GptHeader { entry_count, entry_size })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sector_with_entry(type_code: u8, bootable: bool, start_lba: u32, sector_count: u32) -> Vec<u8> {
        let mut sector = vec![0u8; SECTOR_SIZE];
        let base = MBR_ENTRY_TABLE_OFFSET;
        sector[base] = if bootable { 0x80 } else { 0x00 };
        sector[base + 4] = type_code;
        sector[base + 8..base + 12].copy_from_slice(&start_lba.to_le_bytes());
        sector[base + 12..base + 16].copy_from_slice(&sector_count.to_le_bytes());
        sector[510] = 0x55;
        sector[511] = 0xAA;
        sector
    }

    #[test]
    fn rejects_missing_trailer() {
        let sector = vec![0u8; SECTOR_SIZE];
        assert!(decode_mbr_sector(&sector).is_absent());
    }

    #[test]
    fn decodes_two_primaries() {
        let mut sector = sector_with_entry(0x07, true, 2048, 204800);
        let base = MBR_ENTRY_TABLE_OFFSET + MBR_ENTRY_SIZE;
        sector[base + 4] = 0x83;
        sector[base + 8..base + 12].copy_from_slice(&206848u32.to_le_bytes());
        sector[base + 12..base + 16].copy_from_slice(&819200u32.to_le_bytes());

        let table = decode_mbr_sector(&sector);
        let PartitionTable::Mbr(entries) = table else {
            panic!("expected MBR table");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].type_name, "NTFS/exFAT");
        assert!(entries[0].bootable);
        assert_eq!(entries[0].size_mb(), 100);
        assert_eq!(entries[1].type_name, "Linux");
        assert!(!entries[1].bootable);
        assert_eq!(entries[1].size_mb(), 400);
    }

    #[test]
    fn decode_mbr_is_pure() {
        let sector = sector_with_entry(0x83, false, 0, 100);
        assert_eq!(decode_mbr_sector(&sector), decode_mbr_sector(&sector));
    }

    #[test]
    fn rejects_missing_gpt_signature() {
        let lba1 = vec![0u8; 512];
        assert!(decode_gpt_sector(&lba1).is_absent());
    }
}
