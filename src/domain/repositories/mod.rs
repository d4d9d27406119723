//! Repository traits (interfaces)
//!
//! These traits define the contracts for external dependencies.
//! They follow the Dependency Inversion Principle (DIP) from SOLID.

mod byte_source;
mod recovered_file_writer;

pub use byte_source::{ByteSource, ByteSourceError, SourceInfo};
pub use recovered_file_writer::{FileWriterError, RecoveredFileWriter, WriteOptions, WriteResult};
