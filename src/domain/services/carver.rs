//! File carver trait
//!
//! Defines the interface for carving files out of raw bytes: given a
//! detected header, determine where the file ends and copy the range.

use crate::domain::entities::{CarvedFile, Detection};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CarverError {
    #[error("carved payload too small ({0} bytes)")]
    TooSmall(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Carves complete files from raw bytes using signature headers, footers
/// where present, and type-specific heuristics otherwise.
pub trait FileCarver: Send + Sync {
    /// Carves the file located at `detection`, returning the carved file
    /// or a [`CarverError::TooSmall`] when the result is under 100 bytes.
    fn carve(&self, detection: &Detection) -> Result<CarvedFile, CarverError>;
}
