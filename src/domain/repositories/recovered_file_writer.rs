//! Recovered file writer trait
//!
//! Defines the interface for persisting carved files to storage.

use crate::domain::entities::CarvedFile;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileWriterError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("file already exists: {0}")]
    FileExists(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options controlling how carved files are written.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub overwrite: bool,
    pub organize_by_type: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            organize_by_type: true,
        }
    }
}

/// Result of writing a single carved file.
#[derive(Debug, Clone)]
pub struct WriteResult {
    pub saved_path: PathBuf,
    pub saved_size: u64,
}

/// Trait for writing carved files to storage.
pub trait RecoveredFileWriter: Send + Sync {
    fn new(output_dir: &Path) -> Result<Self, FileWriterError>
    where
        Self: Sized;

    /// Writes a single carved file, using `index` for the fixed
    /// `recovered_<TYPE>_<INDEX4><EXT>` naming scheme.
    fn write(&self, file: &CarvedFile, index: usize, options: &WriteOptions) -> Result<WriteResult, FileWriterError>;

    fn write_batch(
        &self,
        files: &[CarvedFile],
        options: &WriteOptions,
    ) -> Vec<Result<WriteResult, FileWriterError>> {
        files
            .iter()
            .enumerate()
            .map(|(i, f)| self.write(f, i, options))
            .collect()
    }

    fn output_dir(&self) -> &Path;

    fn files_written(&self) -> usize;

    fn bytes_written(&self) -> u64;
}
