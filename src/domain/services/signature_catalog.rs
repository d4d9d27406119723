//! Signature catalog service
//!
//! A frozen table of the known file signatures the engine ships with, plus
//! an Aho-Corasick matcher over the distinct header byte strings so the
//! scanner can search for every selected signature in a single pass.

use crate::domain::entities::{Signature, SignatureName};
use aho_corasick::{AhoCorasick, MatchKind};
use std::collections::HashSet;

const PNG_FOOTER: &[u8] = &[0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82];
const ZIP_FOOTER: &[u8] = &[0x50, 0x4B, 0x05, 0x06];
const GIF_FOOTER: &[u8] = &[0x00, 0x3B];

/// The full built-in catalog, in table order. Iteration order over this
/// slice is not itself a public guarantee; it only fixes the order in
/// which ties at an identical offset would be broken.
pub const CATALOG: [Signature; 16] = [
    Signature::new(SignatureName::Pdf, &[0x25, 0x50, 0x44, 0x46], Some(b"%%EOF"), ".pdf", 1024),
    Signature::new(
        SignatureName::Png,
        &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
        Some(PNG_FOOTER),
        ".png",
        512,
    ),
    Signature::new(
        SignatureName::Jpeg,
        &[0xFF, 0xD8, 0xFF, 0xE0],
        Some(&[0xFF, 0xD9]),
        ".jpg",
        512,
    ),
    Signature::new(
        SignatureName::JpegAlt,
        &[0xFF, 0xD8, 0xFF, 0xE1],
        Some(&[0xFF, 0xD9]),
        ".jpg",
        512,
    ),
    Signature::new(
        SignatureName::Zip,
        &[0x50, 0x4B, 0x03, 0x04],
        Some(ZIP_FOOTER),
        ".zip",
        1024,
    ),
    Signature::new(
        SignatureName::Docx,
        &[0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0x06, 0x00],
        None,
        ".docx",
        2048,
    ),
    Signature::new(
        SignatureName::Xlsx,
        &[0x50, 0x4B, 0x03, 0x04, 0x14, 0x00, 0x06, 0x00],
        None,
        ".xlsx",
        2048,
    ),
    Signature::new(
        SignatureName::Gif,
        &[0x47, 0x49, 0x46, 0x38, 0x39, 0x61],
        Some(GIF_FOOTER),
        ".gif",
        256,
    ),
    Signature::new(
        SignatureName::Gif87,
        &[0x47, 0x49, 0x46, 0x38, 0x37, 0x61],
        Some(GIF_FOOTER),
        ".gif",
        256,
    ),
    Signature::new(SignatureName::Bmp, &[0x42, 0x4D], None, ".bmp", 512),
    Signature::new(SignatureName::Mp3, &[0xFF, 0xFB], None, ".mp3", 4096),
    Signature::new(
        SignatureName::Mp4,
        &[0x00, 0x00, 0x00, 0x18, 0x66, 0x74, 0x79, 0x70],
        None,
        ".mp4",
        4096,
    ),
    Signature::new(SignatureName::Avi, &[0x52, 0x49, 0x46, 0x46], None, ".avi", 4096),
    Signature::new(
        SignatureName::Exe,
        &[0x4D, 0x5A, 0x90, 0x00],
        None,
        ".exe",
        2048,
    ),
    Signature::new(
        SignatureName::Rar,
        &[0x52, 0x61, 0x72, 0x21, 0x1A, 0x07],
        None,
        ".rar",
        1024,
    ),
    Signature::new(
        SignatureName::SevenZip,
        &[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C],
        None,
        ".7z",
        1024,
    ),
];

/// Looks up a catalog entry by name.
pub fn get(name: SignatureName) -> &'static Signature {
    CATALOG
        .iter()
        .find(|s| s.name == name)
        .expect("CATALOG covers every SignatureName variant")
}

/// Returns the catalog entries restricted to `selected`, or the full
/// catalog when `selected` is `None`.
pub fn selected_signatures(selected: Option<&HashSet<SignatureName>>) -> Vec<&'static Signature> {
    match selected {
        Some(names) => CATALOG.iter().filter(|s| names.contains(&s.name)).collect(),
        None => CATALOG.iter().collect(),
    }
}

/// The maximum header length among a set of signatures. Used to size the
/// scanner's overlap window.
pub fn max_header_len(signatures: &[&Signature]) -> usize {
    signatures.iter().map(|s| s.header.len()).max().unwrap_or(0)
}

/// A multi-pattern matcher over a fixed set of signatures' headers,
/// reporting every occurrence in one linear pass instead of one pass per
/// signature.
pub struct HeaderMatcher {
    automaton: AhoCorasick,
    signatures: Vec<&'static Signature>,
}

impl HeaderMatcher {
    pub fn build(signatures: Vec<&'static Signature>) -> Self {
        let patterns: Vec<&[u8]> = signatures.iter().map(|s| s.header).collect();
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .expect("signature headers are valid Aho-Corasick patterns");
        Self { automaton, signatures }
    }

    /// Finds every header occurrence in `haystack`, returning
    /// `(signature, position)` pairs. `position` is relative to the start
    /// of `haystack`.
    pub fn find_all(&self, haystack: &[u8]) -> Vec<(&'static Signature, usize)> {
        self.automaton
            .find_overlapping_iter(haystack)
            .map(|m| (self.signatures[m.pattern().as_usize()], m.start()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_sixteen_unique_names() {
        let names: HashSet<_> = CATALOG.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), 16);
    }

    #[test]
    fn docx_and_xlsx_share_a_header() {
        let docx = get(SignatureName::Docx);
        let xlsx = get(SignatureName::Xlsx);
        assert_eq!(docx.header, xlsx.header);
    }

    #[test]
    fn every_entry_respects_min_size_invariant() {
        for sig in &CATALOG {
            assert!(sig.header.len() >= 1);
            assert!(sig.min_size >= sig.header.len() as u64);
        }
    }

    #[test]
    fn matcher_finds_header_at_correct_offset() {
        let sigs = selected_signatures(None);
        let matcher = HeaderMatcher::build(sigs);
        let mut haystack = vec![0u8; 20];
        haystack[10..14].copy_from_slice(&[0xFF, 0xD8, 0xFF, 0xE0]);
        let found = matcher.find_all(&haystack);
        assert!(found.iter().any(|(sig, pos)| sig.name == SignatureName::Jpeg && *pos == 10));
    }
}
