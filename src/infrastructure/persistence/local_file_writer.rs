//! Local file writer implementation
//!
//! Writes carved files to the local filesystem using the fixed
//! `recovered_<TYPE>_<INDEX4><EXT>` naming scheme.

use crate::domain::entities::CarvedFile;
use crate::domain::repositories::{FileWriterError, RecoveredFileWriter, WriteOptions, WriteResult};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Local file system writer for carved files.
pub struct LocalFileWriter {
    output_dir: PathBuf,
    files_written: AtomicUsize,
    bytes_written: AtomicU64,
}

impl LocalFileWriter {
    fn output_path(&self, file: &CarvedFile, index: usize, options: &WriteOptions) -> PathBuf {
        let mut path = self.output_dir.clone();

        if options.organize_by_type {
            path.push(file.signature().as_str().to_lowercase());
        }

        let signature = crate::domain::services::catalog_entry(file.signature());
        path.push(file.output_filename(index, signature.extension));
        path
    }
}

impl RecoveredFileWriter for LocalFileWriter {
    fn new(output_dir: &Path) -> Result<Self, FileWriterError> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir).map_err(|e| {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    FileWriterError::PermissionDenied(output_dir.display().to_string())
                } else {
                    FileWriterError::Io(e)
                }
            })?;
        }

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            files_written: AtomicUsize::new(0),
            bytes_written: AtomicU64::new(0),
        })
    }

    fn write(&self, file: &CarvedFile, index: usize, options: &WriteOptions) -> Result<WriteResult, FileWriterError> {
        let output_path = self.output_path(file, index, options);

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if output_path.exists() && !options.overwrite {
            return Err(FileWriterError::FileExists(output_path.display().to_string()));
        }

        let mut output_file = File::create(&output_path)?;
        output_file.write_all(file.payload())?;
        output_file.sync_all()?;

        let saved_size = file.payload_length();

        self.files_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(saved_size, Ordering::Relaxed);

        Ok(WriteResult { saved_path: output_path, saved_size })
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn files_written(&self) -> usize {
        self.files_written.load(Ordering::Relaxed)
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Detection, SignatureName};
    use tempfile::tempdir;

    #[test]
    fn writes_with_fixed_naming_scheme() {
        let dir = tempdir().unwrap();
        let writer = LocalFileWriter::new(dir.path()).unwrap();
        let detection = Detection::new(SignatureName::Jpeg, 0);
        let file = CarvedFile::new(detection, 512, vec![0u8; 512]);

        let result = writer.write(&file, 3, &WriteOptions::default()).unwrap();
        assert_eq!(
            result.saved_path.file_name().unwrap().to_str().unwrap(),
            "recovered_JPEG_0003.jpg"
        );
        assert_eq!(writer.files_written(), 1);
    }
}
