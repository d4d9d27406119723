//! Memory-mapped byte source
//!
//! The preferred backing for [`ByteSource`]: the kernel pages the file in
//! on demand instead of the reader copying it upfront.

use crate::domain::repositories::{ByteSource, ByteSourceError, SourceInfo};
use memmap2::Mmap;
use std::fs::OpenOptions;
use std::path::Path;

pub struct MmapByteSource {
    mmap: Mmap,
    info: SourceInfo,
}

impl MmapByteSource {
    pub fn open(path: &str) -> Result<Self, ByteSourceError> {
        let path_obj = Path::new(path);
        if !path_obj.exists() {
            return Err(ByteSourceError::NotFound(path.to_string()));
        }

        let file = OpenOptions::new().read(true).open(path_obj).map_err(|e| {
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
            let _ = fadvise(&file, 0, None, Advice::NoReuse);
        }

        let size = file.metadata().map_err(ByteSourceError::Io)?.len();

        let mmap = unsafe { Mmap::map(&file) }.map_err(ByteSourceError::Io)?;

        Ok(Self {
            mmap,
            info: SourceInfo {
                path: path.to_string(),
                size,
                read_only: true,
            },
        })
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }
}

impl ByteSource for MmapByteSource {
    fn len(&self) -> u64 {
        self.info.size
    }

    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn read(&self, offset: u64, buf: &mut [u8]) -> Result<usize, ByteSourceError> {
        if offset >= self.info.size {
            return Ok(0);
        }
        let start = offset as usize;
        let available = self.mmap.len() - start;
        let n = buf.len().min(available);
        buf[..n].copy_from_slice(&self.mmap[start..start + n]);
        Ok(n)
    }
}

// The mapping is read-only for the lifetime of the source; sharing it
// across threads is safe.
unsafe impl Send for MmapByteSource {}
unsafe impl Sync for MmapByteSource {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn opens_nonexistent_path_as_not_found() {
        let result = MmapByteSource::open("/nonexistent/file/path");
        assert!(matches!(result, Err(ByteSourceError::NotFound(_))));
    }

    #[test]
    fn reads_bytes_at_offset() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Hello, memory-mapped world!").unwrap();
        file.flush().unwrap();

        let source = MmapByteSource::open(file.path().to_str().unwrap()).unwrap();
        let data = source.read_at(7, 6).unwrap();
        assert_eq!(&data, b"memory");
    }

    #[test]
    fn short_read_at_tail() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"short").unwrap();
        file.flush().unwrap();

        let source = MmapByteSource::open(file.path().to_str().unwrap()).unwrap();
        let data = source.read_at(2, 100).unwrap();
        assert_eq!(&data, b"ort");
    }
}
