//! Signature scanner service
//!
//! Chunked, overlap-safe search for every selected catalog header across a
//! [`ByteSource`], with per-type validation and an optional false-positive
//! filtering pass.

use crate::domain::entities::{Detection, Signature, SignatureName};
use crate::domain::repositories::ByteSource;
use crate::domain::services::signature_catalog::{self, HeaderMatcher};
use byteorder::{LittleEndian, ReadBytesExt};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;

const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;
const FILTER_FOOTER_WINDOW: u64 = 10 * 1024 * 1024;
const FILTER_FALLBACK_SPAN: u64 = 5000;
const NEAR_DUPLICATE_WINDOW: u64 = 64;

/// Runs a full scan over `source`.
///
/// `progress` is called after each chunk with a percentage in `[0, 100]`;
/// returning `false` stops the scan early and the partial result is
/// returned.
pub fn scan<S, F>(
    source: &S,
    selected: Option<&HashSet<SignatureName>>,
    filter_enabled: bool,
    chunk_size: u64,
    mut progress: F,
) -> Vec<Detection>
where
    S: ByteSource + ?Sized,
    F: FnMut(f32) -> bool,
{
    let chunk_size = if chunk_size == 0 { DEFAULT_CHUNK_SIZE } else { chunk_size };
    let signatures = signature_catalog::selected_signatures(selected);
    if signatures.is_empty() {
        return Vec::new();
    }
    let header_len = signature_catalog::max_header_len(&signatures);
    let overlap = header_len.saturating_sub(1);
    let matcher = HeaderMatcher::build(signatures.clone());

    let total = source.len();
    let mut detections = Vec::new();
    let mut seen = HashSet::new();
    let mut prev_tail: Vec<u8> = Vec::new();
    let mut base = 0u64;

    while base < total || (base == 0 && total == 0) {
        if total == 0 {
            break;
        }
        let want = chunk_size.min(total - base) as usize;
        let Ok(chunk) = source.read_at(base, want) else {
            break;
        };
        if chunk.is_empty() {
            break;
        }

        let mut window = Vec::with_capacity(prev_tail.len() + chunk.len());
        window.extend_from_slice(&prev_tail);
        window.extend_from_slice(&chunk);
        let window_base = base - prev_tail.len() as u64;

        for (signature, offset) in longest_headers_per_offset(&matcher, &window, window_base) {
            let key = (offset, signature.name);
            if seen.contains(&key) {
                continue;
            }
            if !validate(source, signature, offset, total) {
                continue;
            }
            seen.insert(key);
            detections.push(Detection::new(signature.name, offset));
        }

        base += chunk.len() as u64;
        prev_tail = if overlap > 0 && chunk.len() >= overlap {
            chunk[chunk.len() - overlap..].to_vec()
        } else if overlap > 0 {
            window[window.len().saturating_sub(overlap)..].to_vec()
        } else {
            Vec::new()
        };

        let percent = if total == 0 { 100.0 } else { (base as f32 / total as f32) * 100.0 };
        if !progress(percent.min(100.0)) {
            break;
        }
    }

    detections.sort_by_key(|d| d.offset);

    if filter_enabled {
        apply_false_positive_filter(source, detections)
    } else {
        detections
    }
}

/// Groups same-window matches by absolute offset and keeps only the
/// signatures whose header is longest at that offset.
///
/// ZIP's 4-byte header (`50 4B 03 04`) is a strict prefix of the 8-byte
/// DOCX/XLSX header, so every DOCX/XLSX-prefixed region also produces a
/// spurious ZIP match at the same offset. Without this step the shorter
/// match (found first by `find_overlapping_iter`, since it ends earlier)
/// would claim the offset and shadow the more specific candidates, even
/// when ZIP's own validator has nothing to do with the real content.
fn longest_headers_per_offset(
    matcher: &HeaderMatcher,
    window: &[u8],
    window_base: u64,
) -> Vec<(&'static Signature, u64)> {
    let mut by_offset: HashMap<u64, Vec<&'static Signature>> = HashMap::new();
    for (signature, pos) in matcher.find_all(window) {
        by_offset.entry(window_base + pos as u64).or_default().push(signature);
    }

    let mut offsets: Vec<u64> = by_offset.keys().copied().collect();
    offsets.sort_unstable();

    let mut result = Vec::new();
    for offset in offsets {
        let candidates = &by_offset[&offset];
        let max_len = candidates.iter().map(|s| s.header.len()).max().unwrap_or(0);
        for &signature in candidates.iter().filter(|s| s.header.len() == max_len) {
            result.push((signature, offset));
        }
    }
    result
}

fn validate<S: ByteSource + ?Sized>(source: &S, signature: &Signature, offset: u64, total: u64) -> bool {
    match signature.name {
        SignatureName::Docx => contains(&read_window(source, offset, 2000), b"word/"),
        SignatureName::Xlsx => contains(&read_window(source, offset, 2000), b"xl/"),
        SignatureName::Pdf => {
            let window = read_window(source, offset, 20);
            contains(&window, b"%PDF-1.") || contains(&window, b"%PDF-2.")
        }
        SignatureName::Exe => validate_exe(source, offset, total),
        SignatureName::Mp3 => validate_mp3(source, offset),
        _ => offset + signature.header.len() as u64 <= total,
    }
}

fn validate_exe<S: ByteSource + ?Sized>(source: &S, offset: u64, total: u64) -> bool {
    let Ok(header_bytes) = source.read_at(offset + 0x3C, 4) else {
        return false;
    };
    if header_bytes.len() < 4 {
        return false;
    }
    let mut cursor = Cursor::new(&header_bytes);
    let Ok(e_lfanew) = cursor.read_u32::<LittleEndian>() else {
        return false;
    };
    let pe_offset = offset + e_lfanew as u64;
    if pe_offset + 2 > total {
        return false;
    }
    let Ok(pe_bytes) = source.read_at(pe_offset, 2) else {
        return false;
    };
    pe_bytes == [0x50, 0x45]
}

fn validate_mp3<S: ByteSource + ?Sized>(source: &S, offset: u64) -> bool {
    let Ok(bytes) = source.read_at(offset, 2) else {
        return false;
    };
    bytes.len() == 2 && bytes[0] == 0xFF && (bytes[1] & 0xE0) == 0xE0
}

fn read_window<S: ByteSource + ?Sized>(source: &S, offset: u64, len: usize) -> Vec<u8> {
    source.read_at(offset, len).unwrap_or_default()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn apply_false_positive_filter<S: ByteSource + ?Sized>(source: &S, detections: Vec<Detection>) -> Vec<Detection> {
    let total = source.len();
    let mut kept: Vec<Detection> = Vec::with_capacity(detections.len());

    for detection in detections {
        let signature = signature_catalog::get(detection.signature);
        let estimated_end = estimate_end(source, signature, detection.offset, total);

        if estimated_end.saturating_sub(detection.offset) < signature.min_size {
            tracing::warn!(
                "discarding {} candidate at offset {}: estimated size below minimum",
                detection.signature,
                detection.offset
            );
            continue;
        }

        let near_duplicate = kept
            .iter()
            .rev()
            .take_while(|k| detection.offset.saturating_sub(k.offset) <= NEAR_DUPLICATE_WINDOW)
            .any(|k| k.signature == detection.signature);
        if near_duplicate {
            tracing::warn!(
                "discarding {} candidate at offset {}: near-duplicate of a prior detection",
                detection.signature,
                detection.offset
            );
            continue;
        }

        kept.push(detection);
    }

    kept
}

fn estimate_end<S: ByteSource + ?Sized>(source: &S, signature: &Signature, offset: u64, total: u64) -> u64 {
    if signature.footer.is_some() {
        let window_end = (offset + FILTER_FOOTER_WINDOW).min(total);
        let window_len = window_end.saturating_sub(offset) as usize;
        let window = source.read_at(offset, window_len).unwrap_or_default();
        if let Some(rel_end) = signature.find_footer(&window) {
            return offset + rel_end as u64;
        }
    }
    offset + FILTER_FALLBACK_SPAN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::byte_source::InMemoryByteSource;

    fn jpeg_at(offset: usize, total: usize) -> Vec<u8> {
        let mut buf = vec![0u8; total];
        buf[offset..offset + 4].copy_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0]);
        buf[offset + 4..offset + 6].copy_from_slice(&[0xFF, 0xD9]);
        buf
    }

    #[test]
    fn finds_single_header_match() {
        let data = jpeg_at(100, 4096);
        let source = InMemoryByteSource::new("mem".to_string(), data);
        let detections = scan(&source, None, false, 1024 * 1024, |_| true);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].offset, 100);
        assert_eq!(detections[0].signature, SignatureName::Jpeg);
    }

    #[test]
    fn detections_strictly_increase() {
        let mut data = jpeg_at(100, 4096);
        data[2000..2004].copy_from_slice(&[0xFF, 0xD8, 0xFF, 0xE1]);
        let source = InMemoryByteSource::new("mem".to_string(), data);
        let detections = scan(&source, None, false, 1024 * 1024, |_| true);
        for pair in detections.windows(2) {
            assert!(pair[1].offset > pair[0].offset);
        }
    }

    #[test]
    fn header_crossing_chunk_boundary_is_found_once() {
        let total = 2 * 1024 * 1024;
        let offset = 1024 * 1024 - 2;
        let mut data = vec![0u8; total];
        data[offset..offset + 4].copy_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0]);
        data[offset + 4..offset + 6].copy_from_slice(&[0xFF, 0xD9]);
        let source = InMemoryByteSource::new("mem".to_string(), data);
        let detections = scan(&source, None, false, 1024 * 1024, |_| true);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].offset as usize, offset);
    }
}
