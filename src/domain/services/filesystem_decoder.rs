//! Filesystem superblock decoder service
//!
//! Inspects fixed offsets in the first bytes of a volume to identify
//! FAT16/32, NTFS, or EXT2/3/4. Any field validation failure yields
//! "not this filesystem", never an error: the input may be adversarial
//! or simply not carry the filesystem being probed.

use crate::domain::entities::VolumeDescriptor;
use crate::domain::repositories::ByteSource;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

const BOOT_SECTOR_PROBE_LEN: usize = 2048;
const EXT_SUPERBLOCK_OFFSET: u64 = 1024;
const EXT_SUPERBLOCK_LEN: usize = 1024;
const EXT_MAGIC: u16 = 0xEF53;

fn valid_bytes_per_sector(value: u16) -> bool {
    matches!(value, 512 | 1024 | 2048 | 4096)
}

fn read_u16_le(data: &[u8], offset: usize) -> Option<u16> {
    Cursor::new(data.get(offset..offset + 2)?).read_u16::<LittleEndian>().ok()
}

fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    Cursor::new(data.get(offset..offset + 4)?).read_u32::<LittleEndian>().ok()
}

fn read_u64_le(data: &[u8], offset: usize) -> Option<u64> {
    Cursor::new(data.get(offset..offset + 8)?).read_u64::<LittleEndian>().ok()
}

/// Attempts to decode a FAT16 or FAT32 boot sector from `data` (the first
/// bytes of the volume).
fn decode_fat(data: &[u8]) -> Option<VolumeDescriptor> {
    if data.len() < 36 {
        return None;
    }
    if !matches!(data[0], 0xEB | 0xE9) {
        return None;
    }
    if &data[3..11] == b"NTFS    " {
        return None;
    }

    let bytes_per_sector = read_u16_le(data, 11)?;
    if !valid_bytes_per_sector(bytes_per_sector) {
        return None;
    }
    let sectors_per_cluster = *data.get(13)?;
    let root_entries = read_u16_le(data, 17)?;
    let total_sectors_16 = read_u16_le(data, 19)?;
    let total_sectors_32 = read_u32_le(data, 32)?;
    let total_sectors = if total_sectors_16 == 0 {
        total_sectors_32
    } else {
        total_sectors_16 as u32
    };

    let oem_name = String::from_utf8_lossy(&data[3..11]).trim().to_string();
    let volume_size_mb = (total_sectors as u64 * bytes_per_sector as u64) / (1024 * 1024);

    if root_entries == 0 {
        Some(VolumeDescriptor::Fat32 {
            oem_name,
            bytes_per_sector,
            sectors_per_cluster,
            total_sectors,
            volume_size_mb,
        })
    } else {
        Some(VolumeDescriptor::Fat16 {
            oem_name,
            bytes_per_sector,
            sectors_per_cluster,
            total_sectors,
            volume_size_mb,
        })
    }
}

/// Attempts to decode an NTFS boot sector from `data`.
fn decode_ntfs(data: &[u8]) -> Option<VolumeDescriptor> {
    if data.len() < 48 || &data[3..11] != b"NTFS    " {
        return None;
    }

    let bytes_per_sector = read_u16_le(data, 11)?;
    if !valid_bytes_per_sector(bytes_per_sector) {
        return None;
    }
    let sectors_per_cluster = *data.get(13)?;
    let total_sectors = read_u64_le(data, 40)?;
    let volume_size_mb = (total_sectors * bytes_per_sector as u64) / (1024 * 1024);

    Some(VolumeDescriptor::Ntfs {
        bytes_per_sector,
        sectors_per_cluster,
        total_sectors,
        volume_size_mb,
    })
}

/// Attempts to decode an EXT2/3/4 superblock, found 1024 bytes into the
/// volume regardless of block size.
fn decode_ext(superblock: &[u8]) -> Option<VolumeDescriptor> {
    if superblock.len() < 1024 {
        return None;
    }

    let magic = read_u16_le(superblock, 56)?;
    if magic != EXT_MAGIC {
        return None;
    }

    let total_inodes = read_u32_le(superblock, 0)?;
    let total_blocks = read_u32_le(superblock, 4)?;
    let log_block_size = read_u32_le(superblock, 24)?;
    let block_size = 1024u32 << log_block_size;
    let volume_size_mb = (total_blocks as u64 * block_size as u64) / (1024 * 1024);

    Some(VolumeDescriptor::Ext {
        total_inodes,
        total_blocks,
        block_size,
        volume_size_mb,
    })
}

/// Probes `source` for every supported filesystem, returning the first
/// match (FAT16/FAT32 and NTFS are mutually exclusive over the boot
/// sector; EXT lives at a different offset and may coexist).
pub fn detect<S: ByteSource + ?Sized>(source: &S) -> Option<VolumeDescriptor> {
    let boot_len = BOOT_SECTOR_PROBE_LEN.min(source.len() as usize);
    let boot_sector = source.read_at(0, boot_len).ok()?;

    if let Some(volume) = decode_fat(&boot_sector) {
        tracing::info!("detected {} boot sector", volume.kind_name());
        return Some(volume);
    }
    if let Some(volume) = decode_ntfs(&boot_sector) {
        tracing::info!("detected {} boot sector", volume.kind_name());
        return Some(volume);
    }
    tracing::debug!("boot sector matches neither FAT nor NTFS");

    if source.len() >= EXT_SUPERBLOCK_OFFSET + EXT_SUPERBLOCK_LEN as u64 {
        if let Ok(superblock) = source.read_at(EXT_SUPERBLOCK_OFFSET, EXT_SUPERBLOCK_LEN) {
            if let Some(volume) = decode_ext(&superblock) {
                tracing::info!("detected EXT2/3/4 superblock at offset {EXT_SUPERBLOCK_OFFSET}");
                return Some(volume);
            }
            tracing::debug!("no EXT2/3/4 magic at offset {EXT_SUPERBLOCK_OFFSET}");
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::byte_source::InMemoryByteSource;

    fn fat32_boot_sector() -> Vec<u8> {
        let mut sector = vec![0u8; 512];
        sector[0..3].copy_from_slice(&[0xEB, 0x58, 0x90]);
        sector[3..11].copy_from_slice(b"MSDOS5.0");
        sector[11..13].copy_from_slice(&512u16.to_le_bytes());
        sector[13] = 8;
        sector[17..19].copy_from_slice(&0u16.to_le_bytes());
        sector[19..21].copy_from_slice(&0u16.to_le_bytes());
        sector[32..36].copy_from_slice(&32_204_800u32.to_le_bytes());
        sector
    }

    #[test]
    fn decodes_fat32_superblock() {
        let source = InMemoryByteSource::new("mem".to_string(), fat32_boot_sector());
        let volume = detect(&source).expect("expected FAT32 volume");
        match volume {
            VolumeDescriptor::Fat32 { volume_size_mb, .. } => assert_eq!(volume_size_mb, 15725),
            other => panic!("expected Fat32, got {other:?}"),
        }
    }

    #[test]
    fn rejects_garbage_boot_sector() {
        let source = InMemoryByteSource::new("mem".to_string(), vec![0u8; 2048]);
        assert!(detect(&source).is_none());
    }

    #[test]
    fn fat_and_ntfs_are_mutually_exclusive() {
        let sector = fat32_boot_sector();
        assert!(decode_fat(&sector).is_some());
        assert!(decode_ntfs(&sector).is_none());
    }

    #[test]
    fn decode_fat_rejects_real_ntfs_sector() {
        let mut sector = vec![0u8; 512];
        sector[0..3].copy_from_slice(&[0xEB, 0x52, 0x90]);
        sector[3..11].copy_from_slice(b"NTFS    ");
        sector[11..13].copy_from_slice(&512u16.to_le_bytes());
        sector[13] = 8;
        sector[40..48].copy_from_slice(&312_479_999u64.to_le_bytes());

        assert!(decode_fat(&sector).is_none());
        assert!(decode_ntfs(&sector).is_some());
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(64))]

        /// Invariant 8 - filesystem disjointness: at most one of
        /// FAT16/FAT32 and NTFS ever accepts the same boot sector.
        #[test]
        fn fat_and_ntfs_never_both_accept(sector in proptest::collection::vec(proptest::prelude::any::<u8>(), 512)) {
            let fat = decode_fat(&sector);
            let ntfs = decode_ntfs(&sector);
            proptest::prop_assert!(fat.is_none() || ntfs.is_none());
        }
    }
}
