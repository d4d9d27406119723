//! Recover files use case
//!
//! Carves every detection from a scan result and writes the results to
//! storage.

use crate::application::dto::RecoveryResult;
use crate::domain::entities::ScanResult;
use crate::domain::repositories::{RecoveredFileWriter, WriteOptions};
use crate::domain::services::{CarverError, FileCarver};
use anyhow::Result;
use std::time::Instant;

/// Progress callback for recovery: `(completed, total)`.
pub type RecoveryProgressCallback = Box<dyn FnMut(usize, usize) + Send>;

/// Carves and writes every detection in a [`ScanResult`].
pub struct RecoverFilesUseCase<C: FileCarver, W: RecoveredFileWriter> {
    carver: C,
    writer: W,
}

impl<C: FileCarver, W: RecoveredFileWriter> RecoverFilesUseCase<C, W> {
    pub fn new(carver: C, writer: W) -> Self {
        Self { carver, writer }
    }

    pub fn execute(
        &self,
        scan_result: &ScanResult,
        write_options: &WriteOptions,
        mut progress_callback: Option<RecoveryProgressCallback>,
    ) -> Result<RecoveryResult> {
        let start_time = Instant::now();
        let detections = scan_result.detections();
        let total_detections = detections.len();

        tracing::info!("Starting recovery of {} potential files", total_detections);

        let mut result = RecoveryResult::new(
            scan_result.source_path().to_string(),
            self.writer.output_dir().to_path_buf(),
        );
        result.bytes_scanned = scan_result.total_bytes();

        for (index, detection) in detections.iter().enumerate() {
            if let Some(ref mut callback) = progress_callback {
                callback(index + 1, total_detections);
            }

            let carved = match self.carver.carve(detection) {
                Ok(f) => f,
                Err(CarverError::TooSmall(size)) => {
                    tracing::debug!(
                        "Discarding candidate at offset {} ({} bytes, below minimum)",
                        detection.offset,
                        size
                    );
                    continue;
                }
                Err(e) => {
                    tracing::error!("Failed to carve file at offset {}: {}", detection.offset, e);
                    result.add_error(format!("Failed to carve file at offset {}: {}", detection.offset, e));
                    continue;
                }
            };

            match self.writer.write(&carved, index, write_options) {
                Ok(write_result) => {
                    tracing::info!(
                        "Recovered {} to {}",
                        carved.signature(),
                        write_result.saved_path.display()
                    );
                    result.add_recovered(carved.signature(), write_result.saved_size);
                }
                Err(e) => {
                    tracing::error!("Failed to write file at offset {}: {}", detection.offset, e);
                    result.add_error(format!("Failed to write file at offset {}: {}", detection.offset, e));
                }
            }
        }

        result.duration = start_time.elapsed();

        tracing::info!(
            "Recovery complete: {} files recovered in {:.2}s",
            result.files_recovered,
            result.duration.as_secs_f64()
        );

        Ok(result)
    }
}
