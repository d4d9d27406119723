//! Scan device use case
//!
//! Orchestrates a signature scan of a source for recoverable files.

use crate::application::dto::ScanConfig;
use crate::domain::entities::ScanResult;
use crate::domain::repositories::ByteSource;
use crate::domain::services::scanner;
use anyhow::Result;
use std::time::Instant;

/// Progress callback type.
pub type ProgressCallback = Box<dyn FnMut(f32) -> bool + Send>;

/// Scans a source for file signatures.
pub struct ScanDeviceUseCase;

impl ScanDeviceUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Executes the scan, returning a [`ScanResult`].
    pub fn execute<S: ByteSource + ?Sized>(
        &self,
        source: &S,
        config: &ScanConfig,
        mut progress_callback: Option<ProgressCallback>,
    ) -> Result<ScanResult> {
        let start_time = Instant::now();
        let total_bytes = source.len();

        tracing::info!("Starting scan of {} ({} bytes)", source.info().path, total_bytes);

        let progress = |percent: f32| -> bool {
            match progress_callback.as_mut() {
                Some(cb) => cb(percent),
                None => true,
            }
        };

        let detections = scanner::scan(
            source,
            config.selected_types.as_ref(),
            config.filter_enabled,
            config.chunk_size,
            progress,
        );

        let duration = start_time.elapsed();
        let mut result = ScanResult::new(source.info().path.clone(), total_bytes, duration);
        for detection in detections {
            result.add_detection(detection);
        }

        tracing::info!(
            "Scan complete: found {} potential files in {:.2}s",
            result.total_detections(),
            duration.as_secs_f64()
        );

        Ok(result)
    }
}

impl Default for ScanDeviceUseCase {
    fn default() -> Self {
        Self::new()
    }
}
