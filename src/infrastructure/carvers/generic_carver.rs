//! Generic file carver
//!
//! Implements footer-based and heuristic end-detection carving over the
//! full built-in signature catalog.

use crate::domain::entities::{CarvedFile, Detection};
use crate::domain::repositories::ByteSource;
use crate::domain::services::{catalog_entry, CarverError, FileCarver};
use crate::domain::entities::SignatureName;

const MIN_CARVED_SIZE: u64 = 100;
const DEFAULT_MAX_CARVE_SIZE: u64 = 50 * 1024 * 1024;
const ZERO_WINDOW: usize = 4096;
const ZERO_WINDOW_THRESHOLD: f64 = 0.8;

const JPEG_FOOTER: &[u8] = &[0xFF, 0xD9];
const PNG_FOOTER: &[u8] = &[0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82];
const PDF_FOOTER: &[u8] = b"%%EOF";

pub struct GenericFileCarver<'a, S: ByteSource + ?Sized> {
    source: &'a S,
    max_carve_size: u64,
}

impl<'a, S: ByteSource + ?Sized> GenericFileCarver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source, max_carve_size: DEFAULT_MAX_CARVE_SIZE }
    }

    pub fn with_max_carve_size(source: &'a S, max_carve_size: u64) -> Self {
        Self { source, max_carve_size }
    }

    fn determine_end(&self, detection: &Detection) -> u64 {
        let signature = catalog_entry(detection.signature);
        let total = self.source.len();
        let offset = detection.offset;

        if let Some(footer) = signature.footer {
            let window_end = (offset + 50 * 1024 * 1024).min(total);
            let window_len = window_end.saturating_sub(offset) as usize;
            if let Ok(window) = self.source.read_at(offset, window_len) {
                if let Some(pos) = window
                    .windows(footer.len())
                    .position(|w| w == footer)
                {
                    return offset + pos as u64 + footer.len() as u64;
                }
            }
        }

        self.heuristic_end(detection.signature, offset, total)
    }

    fn heuristic_end(&self, name: SignatureName, offset: u64, total: u64) -> u64 {
        let max_end = (offset + self.max_carve_size).min(total);

        let footer_search = |needle: &[u8], extra: u64| -> Option<u64> {
            let window_len = max_end.saturating_sub(offset) as usize;
            let window = self.source.read_at(offset, window_len).ok()?;
            window
                .windows(needle.len())
                .position(|w| w == needle)
                .map(|pos| offset + pos as u64 + extra)
        };

        match name {
            SignatureName::Jpeg | SignatureName::JpegAlt => footer_search(JPEG_FOOTER, JPEG_FOOTER.len() as u64)
                .unwrap_or_else(|| self.scan_for_zero_run(offset, max_end)),
            SignatureName::Png => footer_search(PNG_FOOTER, PNG_FOOTER.len() as u64)
                .unwrap_or_else(|| self.scan_for_zero_run(offset, max_end)),
            SignatureName::Pdf => footer_search(PDF_FOOTER, PDF_FOOTER.len() as u64)
                .unwrap_or_else(|| self.scan_for_zero_run(offset, max_end)),
            _ => self.scan_for_zero_run(offset, max_end),
        }
    }

    fn scan_for_zero_run(&self, offset: u64, max_end: u64) -> u64 {
        let mut cursor = offset;
        while cursor < max_end {
            let window_len = ZERO_WINDOW.min((max_end - cursor) as usize);
            let Ok(window) = self.source.read_at(cursor, window_len) else {
                break;
            };
            if window.is_empty() {
                break;
            }
            let zero_count = window.iter().filter(|&&b| b == 0).count();
            if zero_count as f64 / window.len() as f64 > ZERO_WINDOW_THRESHOLD {
                return cursor;
            }
            cursor += window.len() as u64;
        }
        max_end
    }
}

impl<'a, S: ByteSource + ?Sized> FileCarver for GenericFileCarver<'a, S> {
    fn carve(&self, detection: &Detection) -> Result<CarvedFile, CarverError> {
        let end_offset = self.determine_end(detection);
        let length = end_offset.saturating_sub(detection.offset);
        let payload = self.source.read_at(detection.offset, length as usize)?;

        if (payload.len() as u64) < MIN_CARVED_SIZE {
            return Err(CarverError::TooSmall(payload.len() as u64));
        }

        Ok(CarvedFile::new(*detection, end_offset, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Detection;
    use crate::infrastructure::byte_source::InMemoryByteSource;

    #[test]
    fn carves_jpeg_with_footer() {
        let mut data = vec![0xAAu8; 600];
        data[0..4].copy_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0]);
        data[500..502].copy_from_slice(&[0xFF, 0xD9]);
        let source = InMemoryByteSource::new("mem".to_string(), data);
        let carver = GenericFileCarver::new(&source);
        let detection = Detection::new(SignatureName::Jpeg, 0);
        let carved = carver.carve(&detection).unwrap();
        assert_eq!(carved.end_offset(), 502);
        assert_eq!(carved.payload_length(), 502);
    }

    #[test]
    fn rejects_files_under_100_bytes() {
        let data = vec![0x42, 0x4D, 0xAA, 0xBB];
        let source = InMemoryByteSource::new("mem".to_string(), data);
        let carver = GenericFileCarver::new(&source);
        let detection = Detection::new(SignatureName::Bmp, 0);
        let result = carver.carve(&detection);
        assert!(matches!(result, Err(CarverError::TooSmall(_))));
    }

    #[test]
    fn default_fallback_stops_at_zero_run() {
        let mut data = vec![0x11u8; 200];
        data.extend(vec![0u8; 4096]);
        let source = InMemoryByteSource::new("mem".to_string(), data);
        let carver = GenericFileCarver::new(&source);
        let detection = Detection::new(SignatureName::Rar, 0);
        let carved = carver.carve(&detection).unwrap();
        assert_eq!(carved.end_offset(), 200);
    }
}
