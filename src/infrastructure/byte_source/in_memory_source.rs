//! In-memory byte source
//!
//! Wraps an already-loaded buffer. Used for tests and for callers that
//! already hold the bytes (e.g. a blob handed in by an embedding
//! application) rather than a filesystem path.

use crate::domain::repositories::{ByteSource, ByteSourceError, SourceInfo};

pub struct InMemoryByteSource {
    buffer: Vec<u8>,
    info: SourceInfo,
}

impl InMemoryByteSource {
    pub fn new(label: String, buffer: Vec<u8>) -> Self {
        let size = buffer.len() as u64;
        Self {
            buffer,
            info: SourceInfo {
                path: label,
                size,
                read_only: true,
            },
        }
    }
}

impl ByteSource for InMemoryByteSource {
    fn len(&self) -> u64 {
        self.info.size
    }

    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<usize, ByteSourceError> {
        if offset >= self.buffer.len() as u64 {
            return Ok(0);
        }
        let start = offset as usize;
        let available = self.buffer.len() - start;
        let n = buf.len().min(available);
        buf[..n].copy_from_slice(&self.buffer[start..start + n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_back_the_exact_buffer() {
        let source = InMemoryByteSource::new("blob".to_string(), b"abcdef".to_vec());
        assert_eq!(source.len(), 6);
        assert_eq!(&source.read_at(2, 3).unwrap(), b"cde");
    }

    #[test]
    fn short_read_past_end_returns_zero() {
        let source = InMemoryByteSource::new("blob".to_string(), b"abc".to_vec());
        assert_eq!(source.read_at(10, 5).unwrap().len(), 0);
    }
}
