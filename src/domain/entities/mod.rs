//! Domain entities
//!
//! Core business objects that represent the fundamental concepts
//! in the file recovery domain.

mod carved_file;
mod partition;
mod report;
mod scan_result;
mod signature;
mod volume;

pub use carved_file::CarvedFile;
pub use partition::{GptHeader, PartitionEntry, PartitionTable};
pub use report::Report;
pub use scan_result::{ScanProgress, ScanResult};
pub use signature::{Detection, Signature, SignatureName};
pub use volume::VolumeDescriptor;
