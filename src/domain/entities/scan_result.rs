//! Scan result entity
//!
//! Represents the results of a signature scan over a source.

use super::signature::{Detection, SignatureName};
use std::collections::HashMap;
use std::time::Duration;

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub total_bytes: u64,
    pub scanned_bytes: u64,
    pub matches_found: usize,
    pub estimated_remaining: Option<Duration>,
    pub speed_bps: u64,
}

impl ScanProgress {
    pub fn new(total_bytes: u64) -> Self {
        Self {
            total_bytes,
            scanned_bytes: 0,
            matches_found: 0,
            estimated_remaining: None,
            speed_bps: 0,
        }
    }

    /// Returns the progress percentage (0.0 - 100.0).
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        (self.scanned_bytes as f64 / self.total_bytes as f64) * 100.0
    }

    pub fn update(&mut self, scanned_bytes: u64, matches_found: usize, speed_bps: u64) {
        self.scanned_bytes = scanned_bytes;
        self.matches_found = matches_found;
        self.speed_bps = speed_bps;

        if speed_bps > 0 {
            let remaining_bytes = self.total_bytes.saturating_sub(scanned_bytes);
            let remaining_secs = remaining_bytes / speed_bps;
            self.estimated_remaining = Some(Duration::from_secs(remaining_secs));
        }
    }
}

/// Result of a complete signature scan over a source.
#[derive(Debug, Clone)]
pub struct ScanResult {
    source_path: String,
    total_bytes: u64,
    duration: Duration,
    detections: Vec<Detection>,
    type_counts: HashMap<SignatureName, usize>,
    errors: Vec<String>,
}

impl ScanResult {
    pub fn new(source_path: String, total_bytes: u64, duration: Duration) -> Self {
        Self {
            source_path,
            total_bytes,
            duration,
            detections: Vec::new(),
            type_counts: HashMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn add_detection(&mut self, detection: Detection) {
        *self.type_counts.entry(detection.signature).or_insert(0) += 1;
        self.detections.push(detection);
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    pub fn detections_mut(&mut self) -> &mut Vec<Detection> {
        &mut self.detections
    }

    pub fn into_detections(self) -> Vec<Detection> {
        self.detections
    }

    pub fn count_for_signature(&self, name: SignatureName) -> usize {
        self.type_counts.get(&name).copied().unwrap_or(0)
    }

    pub fn type_counts(&self) -> &HashMap<SignatureName, usize> {
        &self.type_counts
    }

    pub fn total_detections(&self) -> usize {
        self.detections.len()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Scanned {} ({} bytes) in {:.2}s\n",
            self.source_path,
            self.total_bytes,
            self.duration.as_secs_f64()
        );
        summary.push_str(&format!(
            "Found {} potential files:\n",
            self.total_detections()
        ));

        for (name, count) in &self.type_counts {
            summary.push_str(&format!("  - {}: {}\n", name, count));
        }

        if !self.errors.is_empty() {
            summary.push_str(&format!("\nEncountered {} errors\n", self.errors.len()));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_counts_per_signature() {
        let mut result = ScanResult::new("image.dd".to_string(), 1024, Duration::from_secs(1));
        result.add_detection(Detection::new(SignatureName::Jpeg, 10));
        result.add_detection(Detection::new(SignatureName::Jpeg, 200));
        result.add_detection(Detection::new(SignatureName::Png, 500));

        assert_eq!(result.count_for_signature(SignatureName::Jpeg), 2);
        assert_eq!(result.count_for_signature(SignatureName::Png), 1);
        assert_eq!(result.total_detections(), 3);
    }
}
