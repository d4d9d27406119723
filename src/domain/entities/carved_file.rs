//! Carved file entity
//!
//! Represents a file recovered from raw bytes by locating its header,
//! determining its end, and copying the range in between.

use super::signature::{Detection, SignatureName};

/// A file extracted from a source by the carver.
///
/// Invariants: `end_offset > detection.offset`; `payload_length >=
/// signature.min_size`, or the detection was discarded before this value
/// was constructed.
#[derive(Debug, Clone)]
pub struct CarvedFile {
    detection: Detection,
    end_offset: u64,
    payload: Vec<u8>,
}

impl CarvedFile {
    pub fn new(detection: Detection, end_offset: u64, payload: Vec<u8>) -> Self {
        Self {
            detection,
            end_offset,
            payload,
        }
    }

    pub fn detection(&self) -> Detection {
        self.detection
    }

    pub fn signature(&self) -> SignatureName {
        self.detection.signature
    }

    pub fn offset(&self) -> u64 {
        self.detection.offset
    }

    pub fn end_offset(&self) -> u64 {
        self.end_offset
    }

    pub fn payload_length(&self) -> u64 {
        self.payload.len() as u64
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Output filename per the fixed format `recovered_<TYPE>_<INDEX4><EXT>`.
    pub fn output_filename(&self, index: usize, extension: &str) -> String {
        format!(
            "recovered_{}_{:04}{}",
            self.detection.signature.as_str(),
            index,
            extension
        )
    }
}
