//! File carver implementations

mod generic_carver;

pub use generic_carver::GenericFileCarver;
