//! File signature entity
//!
//! Represents the magic bytes (header and optional footer) that identify
//! a specific file type. This is the foundation of file carving.

use std::fmt;

/// Name of a known signature in the catalog.
///
/// Distinct names may share the same header bytes (DOCX and XLSX both begin
/// with the same extended ZIP prefix); the name, not the header, is the
/// catalog's unique key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignatureName {
    Pdf,
    Png,
    Jpeg,
    JpegAlt,
    Zip,
    Docx,
    Xlsx,
    Gif,
    Gif87,
    Bmp,
    Mp3,
    Mp4,
    Avi,
    Exe,
    Rar,
    SevenZip,
}

impl SignatureName {
    pub const ALL: [SignatureName; 16] = [
        SignatureName::Pdf,
        SignatureName::Png,
        SignatureName::Jpeg,
        SignatureName::JpegAlt,
        SignatureName::Zip,
        SignatureName::Docx,
        SignatureName::Xlsx,
        SignatureName::Gif,
        SignatureName::Gif87,
        SignatureName::Bmp,
        SignatureName::Mp3,
        SignatureName::Mp4,
        SignatureName::Avi,
        SignatureName::Exe,
        SignatureName::Rar,
        SignatureName::SevenZip,
    ];

    /// The name exactly as it appears in the catalog table.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignatureName::Pdf => "PDF",
            SignatureName::Png => "PNG",
            SignatureName::Jpeg => "JPEG",
            SignatureName::JpegAlt => "JPEG_ALT",
            SignatureName::Zip => "ZIP",
            SignatureName::Docx => "DOCX",
            SignatureName::Xlsx => "XLSX",
            SignatureName::Gif => "GIF",
            SignatureName::Gif87 => "GIF87",
            SignatureName::Bmp => "BMP",
            SignatureName::Mp3 => "MP3",
            SignatureName::Mp4 => "MP4",
            SignatureName::Avi => "AVI",
            SignatureName::Exe => "EXE",
            SignatureName::Rar => "RAR",
            SignatureName::SevenZip => "7Z",
        }
    }

    pub fn parse(s: &str) -> Option<SignatureName> {
        Self::ALL.iter().copied().find(|n| n.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for SignatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable catalog entry.
///
/// Invariants: `header.len() >= 1`, `min_size >= header.len() as u64`.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub name: SignatureName,
    pub header: &'static [u8],
    pub footer: Option<&'static [u8]>,
    pub extension: &'static str,
    pub min_size: u64,
}

impl Signature {
    pub const fn new(
        name: SignatureName,
        header: &'static [u8],
        footer: Option<&'static [u8]>,
        extension: &'static str,
        min_size: u64,
    ) -> Self {
        Self {
            name,
            header,
            footer,
            extension,
            min_size,
        }
    }

    /// Checks whether `data` begins with this signature's header.
    pub fn matches_header(&self, data: &[u8]) -> bool {
        data.starts_with(self.header)
    }

    /// Locates the footer within `data`, returning the offset one past its
    /// last byte (i.e. the exclusive end of the file), if present.
    pub fn find_footer(&self, data: &[u8]) -> Option<usize> {
        let footer = self.footer?;
        data.windows(footer.len())
            .position(|window| window == footer)
            .map(|pos| pos + footer.len())
    }
}

/// A single header match produced by the scanner.
///
/// Invariant: `offset + signature.header.len() as u64 <= source length`.
/// The scanner never emits two detections with the same `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub signature: SignatureName,
    pub offset: u64,
    pub size: Option<u64>,
}

impl Detection {
    pub fn new(signature: SignatureName, offset: u64) -> Self {
        Self {
            signature,
            offset,
            size: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }
}
