//! Recovery result DTO

use crate::domain::entities::SignatureName;
use crate::utils::format_bytes;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Result of a recovery (carve + write) operation.
#[derive(Debug, Clone)]
pub struct RecoveryResult {
    pub source_path: String,
    pub output_dir: PathBuf,
    pub files_recovered: usize,
    pub files_by_type: HashMap<SignatureName, usize>,
    pub bytes_recovered: u64,
    pub bytes_scanned: u64,
    pub duration: Duration,
    pub errors: Vec<String>,
    pub failed_files: usize,
}

impl RecoveryResult {
    pub fn new(source_path: String, output_dir: PathBuf) -> Self {
        Self {
            source_path,
            output_dir,
            files_recovered: 0,
            files_by_type: HashMap::new(),
            bytes_recovered: 0,
            bytes_scanned: 0,
            duration: Duration::ZERO,
            errors: Vec::new(),
            failed_files: 0,
        }
    }

    pub fn add_recovered(&mut self, signature: SignatureName, size: u64) {
        self.files_recovered += 1;
        *self.files_by_type.entry(signature).or_insert(0) += 1;
        self.bytes_recovered += size;
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
        self.failed_files += 1;
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.files_recovered + self.failed_files;
        if total == 0 {
            return 1.0;
        }
        self.files_recovered as f64 / total as f64
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str(&format!(
            "Recovery complete: {} files recovered ({})\n",
            self.files_recovered,
            format_bytes(self.bytes_recovered)
        ));

        summary.push_str(&format!(
            "Scanned {} in {:.2}s\n",
            format_bytes(self.bytes_scanned),
            self.duration.as_secs_f64()
        ));

        for (signature, count) in &self.files_by_type {
            summary.push_str(&format!("  - {}: {}\n", signature, count));
        }

        if !self.errors.is_empty() {
            summary.push_str(&format!("\n{} errors occurred\n", self.errors.len()));
        }

        summary
    }
}
