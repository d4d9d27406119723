//! Byte source implementations
//!
//! Three concrete variants are available, selected once at construction:
//! a memory-mapped file (preferred), a bounded buffered preload (the
//! fallback when mapping is refused), and an in-memory slice (tests and
//! embedders that already hold the bytes). [`Source`] dispatches to
//! whichever was chosen without runtime reflection.

mod buffered_source;
mod in_memory_source;
mod mmap_source;

pub use buffered_source::{BufferedByteSource, DEFAULT_MAX_PRELOAD};
pub use in_memory_source::InMemoryByteSource;
pub use mmap_source::MmapByteSource;

use crate::domain::repositories::{ByteSource, ByteSourceError, SourceInfo};

/// A concrete backing chosen at construction time.
pub enum Source {
    Mmap(MmapByteSource),
    Buffered(BufferedByteSource),
    InMemory(InMemoryByteSource),
}

impl Source {
    /// Opens `path`, preferring a memory mapping and falling back to a
    /// bounded buffered preload if mapping fails for a reason other than
    /// the path being missing or access being denied.
    pub fn open(path: &str) -> Result<Self, ByteSourceError> {
        match MmapByteSource::open(path) {
            Ok(mmap) => Ok(Source::Mmap(mmap)),
            Err(ByteSourceError::NotFound(p)) => Err(ByteSourceError::NotFound(p)),
            Err(ByteSourceError::AccessDenied(p)) => Err(ByteSourceError::AccessDenied(p)),
            Err(_) => BufferedByteSource::open(path).map(Source::Buffered),
        }
    }

    pub fn from_bytes(label: String, bytes: Vec<u8>) -> Self {
        Source::InMemory(InMemoryByteSource::new(label, bytes))
    }
}

impl ByteSource for Source {
    fn len(&self) -> u64 {
        match self {
            Source::Mmap(s) => s.len(),
            Source::Buffered(s) => s.len(),
            Source::InMemory(s) => s.len(),
        }
    }

    fn info(&self) -> &SourceInfo {
        match self {
            Source::Mmap(s) => s.info(),
            Source::Buffered(s) => s.info(),
            Source::InMemory(s) => s.info(),
        }
    }

    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<usize, ByteSourceError> {
        match self {
            Source::Mmap(s) => s.read(offset, buf),
            Source::Buffered(s) => s.read(offset, buf),
            Source::InMemory(s) => s.read(offset, buf),
        }
    }
}
