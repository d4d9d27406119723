//! Analyze source use case (the Orchestrator)
//!
//! Drives a single "analyze source" request end to end: recoverability,
//! partition table, filesystem, signature scan, and carved-length sizing
//! for every detection (without writing anything to disk). Extraction is
//! a separate, per-detection action driven by the caller.

use crate::application::dto::ScanConfig;
use crate::domain::entities::{Detection, PartitionTable, Report, VolumeDescriptor};
use crate::domain::repositories::ByteSource;
use crate::domain::services::{self, scanner, CarverError, FileCarver};
use crate::infrastructure::carvers::GenericFileCarver;
use anyhow::Result;

/// Everything the orchestrator learned about a source.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub source_path: String,
    pub total_size: u64,
    pub recoverability_score: f64,
    pub partitions: PartitionTable,
    pub volume: Option<VolumeDescriptor>,
    pub detections: Vec<Detection>,
}

impl AnalysisResult {
    pub fn into_report(self) -> Report {
        Report {
            source: self.source_path,
            total_size: self.total_size,
            recoverability_score: self.recoverability_score,
            partitions: self.partitions,
            volumes: self.volume.into_iter().collect(),
            detections: self.detections,
        }
    }
}

/// `progress(percent)` returning `false` stops the analysis early; later
/// phases are skipped and results gathered so far are returned.
pub struct AnalyzeSourceUseCase;

impl AnalyzeSourceUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute<S, F>(&self, source: &S, config: &ScanConfig, mut progress: F) -> Result<AnalysisResult>
    where
        S: ByteSource + ?Sized,
        F: FnMut(f32) -> bool,
    {
        let total_size = source.len();
        tracing::info!("Analyzing {} ({} bytes)", source.info().path, total_size);

        if !progress(0.0) {
            return Ok(empty_result(source));
        }

        let recoverability_score = services::estimate_recoverability(source, config.block_size);
        if !progress(20.0) {
            return Ok(AnalysisResult {
                source_path: source.info().path.clone(),
                total_size,
                recoverability_score,
                partitions: PartitionTable::Absent,
                volume: None,
                detections: Vec::new(),
            });
        }

        let mbr = services::decode_mbr(source);
        let partitions = if mbr.is_absent() { services::decode_gpt(source) } else { mbr };
        if !progress(40.0) {
            return Ok(AnalysisResult {
                source_path: source.info().path.clone(),
                total_size,
                recoverability_score,
                partitions,
                volume: None,
                detections: Vec::new(),
            });
        }

        let volume = services::detect_filesystem(source);

        let detections = scanner::scan(
            source,
            config.selected_types.as_ref(),
            config.filter_enabled,
            config.chunk_size,
            |chunk_percent| {
                let overall = 40.0 + chunk_percent * 0.4;
                progress(overall)
            },
        );
        if !progress(80.0) {
            return Ok(AnalysisResult {
                source_path: source.info().path.clone(),
                total_size,
                recoverability_score,
                partitions,
                volume,
                detections,
            });
        }

        let carver = GenericFileCarver::with_max_carve_size(source, config.max_carve_size);
        let total_detections = detections.len().max(1);
        let mut sized_detections = Vec::with_capacity(detections.len());
        for (index, detection) in detections.into_iter().enumerate() {
            let sized = match carver.carve(&detection) {
                Ok(carved) => detection.with_size(carved.payload_length()),
                Err(CarverError::TooSmall(_)) => continue,
                Err(e) => {
                    tracing::warn!("Failed to size detection at offset {}: {}", detection.offset, e);
                    detection
                }
            };
            sized_detections.push(sized);

            let overall = 80.0 + ((index + 1) as f32 / total_detections as f32) * 20.0;
            if !progress(overall.min(100.0)) {
                break;
            }
        }

        progress(100.0);

        tracing::info!(
            "Analysis complete: recoverability {:.1}%, {} detections",
            recoverability_score,
            sized_detections.len()
        );

        Ok(AnalysisResult {
            source_path: source.info().path.clone(),
            total_size,
            recoverability_score,
            partitions,
            volume,
            detections: sized_detections,
        })
    }
}

impl Default for AnalyzeSourceUseCase {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_result<S: ByteSource + ?Sized>(source: &S) -> AnalysisResult {
    AnalysisResult {
        source_path: source.info().path.clone(),
        total_size: source.len(),
        recoverability_score: 0.0,
        partitions: PartitionTable::Absent,
        volume: None,
        detections: Vec::new(),
    }
}
