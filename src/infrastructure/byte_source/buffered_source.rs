//! Buffered byte source
//!
//! Fallback backing for when memory-mapping is unavailable or refused
//! (common for raw block devices without the right privileges on some
//! hosts). Reads a bounded prefix of the source into a heap buffer once,
//! up front, and serves all reads from it.

use crate::domain::repositories::{ByteSource, ByteSourceError, SourceInfo};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Default ceiling on how much of the source is preloaded: 4 GiB.
pub const DEFAULT_MAX_PRELOAD: u64 = 4 * 1024 * 1024 * 1024;

pub struct BufferedByteSource {
    buffer: Vec<u8>,
    info: SourceInfo,
}

impl BufferedByteSource {
    pub fn open(path: &str) -> Result<Self, ByteSourceError> {
        Self::open_with_limit(path, DEFAULT_MAX_PRELOAD)
    }

    pub fn open_with_limit(path: &str, max_preload: u64) -> Result<Self, ByteSourceError> {
        let path_obj = Path::new(path);
        if !path_obj.exists() {
            return Err(ByteSourceError::NotFound(path.to_string()));
        }

        let mut file: File = OpenOptions::new().read(true).open(path_obj).map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                ByteSourceError::AccessDenied(path.to_string())
            } else {
                ByteSourceError::Io(e)
            }
        })?;

        #[cfg(target_os = "linux")]
        {
            use rustix::fs::{fadvise, Advice};
            let _ = fadvise(&file, 0, None, Advice::Sequential);
        }

        let full_size = Self::determine_size(&mut file)?;
        let preload_len = full_size.min(max_preload);

        let mut buffer = vec![0u8; preload_len as usize];
        file.seek(SeekFrom::Start(0)).map_err(ByteSourceError::Io)?;
        file.read_exact(&mut buffer).map_err(ByteSourceError::Io)?;

        Ok(Self {
            buffer,
            info: SourceInfo {
                path: path.to_string(),
                size: full_size,
                read_only: true,
            },
        })
    }

    fn determine_size(file: &mut File) -> Result<u64, ByteSourceError> {
        let metadata = file.metadata().map_err(ByteSourceError::Io)?;
        if metadata.is_file() {
            Ok(metadata.len())
        } else {
            let size = file.seek(SeekFrom::End(0)).map_err(ByteSourceError::Io)?;
            file.seek(SeekFrom::Start(0)).map_err(ByteSourceError::Io)?;
            Ok(size)
        }
    }
}

impl ByteSource for BufferedByteSource {
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
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_preloaded_bytes() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"buffered contents").unwrap();
        file.flush().unwrap();

        let source = BufferedByteSource::open(file.path().to_str().unwrap()).unwrap();
        assert_eq!(&source.read_at(0, 9).unwrap(), b"buffered ");
    }

    #[test]
    fn truncates_preload_to_limit() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&vec![0xAB; 1000]).unwrap();
        file.flush().unwrap();

        let source = BufferedByteSource::open_with_limit(file.path().to_str().unwrap(), 100).unwrap();
        assert_eq!(source.len(), 1000);
        assert_eq!(source.read_at(0, 1000).unwrap().len(), 100);
    }
}
