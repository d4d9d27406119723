//! Byte source trait
//!
//! Defines the interface for reading raw bytes from a source: a disk
//! image, a block device, or an in-memory buffer. This abstraction keeps
//! the domain independent of how bytes are actually backed.

use std::io;
use thiserror::Error;

/// Errors that can occur when reading from a byte source.
#[derive(Error, Debug)]
pub enum ByteSourceError {
    #[error("source not found: {0}")]
    NotFound(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Facts about an opened source.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub path: String,
    pub size: u64,
    pub read_only: bool,
}

/// Trait for reading raw bytes from a source, regardless of backing.
///
/// Implementations are opened once and read many times; they must be
/// safe to share across scanning and carving.
pub trait ByteSource: Send + Sync {
    /// Returns the total size of the source in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns information about the opened source.
    fn info(&self) -> &SourceInfo;

    /// Reads up to `buf.len()` bytes starting at `offset`, returning the
    /// number of bytes actually read (fewer than `buf.len()` only at the
    /// end of the source).
    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<usize, ByteSourceError>;

    /// Reads exactly `length` bytes at `offset`, or fewer if the source
    /// ends first.
    fn read_at(&self, offset: u64, length: usize) -> Result<Vec<u8>, ByteSourceError> {
        let mut buf = vec![0u8; length];
        let n = self.read(offset, &mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Walks the source in `chunk_size`-byte windows starting at
    /// `start_offset`, invoking `callback(offset, data)` for each chunk.
    /// The callback returns `false` to stop early. Returns the number of
    /// bytes visited.
    fn read_chunks<F>(
        &self,
        start_offset: u64,
        chunk_size: usize,
        mut callback: F,
    ) -> Result<u64, ByteSourceError>
    where
        F: FnMut(u64, &[u8]) -> bool,
    {
        let total = self.len();
        let mut offset = start_offset;
        let mut visited = 0u64;
        let mut buf = vec![0u8; chunk_size];

        while offset < total {
            let n = self.read(offset, &mut buf)?;
            if n == 0 {
                break;
            }
            visited += n as u64;
            if !callback(offset, &buf[..n]) {
                break;
            }
            offset += n as u64;
        }

        Ok(visited)
    }
}
