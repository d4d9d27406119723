//! Scan configuration DTO

use crate::domain::entities::SignatureName;
use std::collections::HashSet;

/// Fixed configuration for a signature scan.
///
/// Defaults: all types, filtering on, 1 MiB chunks, 50 MiB max carve size.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// `None` selects every catalog signature.
    pub selected_types: Option<HashSet<SignatureName>>,
    pub filter_enabled: bool,
    pub chunk_size: u64,
    pub max_carve_size: u64,
    pub block_size: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            selected_types: None,
            filter_enabled: true,
            chunk_size: 1024 * 1024,
            max_carve_size: 50 * 1024 * 1024,
            block_size: 4096,
        }
    }
}

impl ScanConfig {
    pub fn with_types(mut self, types: HashSet<SignatureName>) -> Self {
        self.selected_types = Some(types);
        self
    }

    pub fn without_filter(mut self) -> Self {
        self.filter_enabled = false;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}
