//! recoverite - offline data-recovery analysis
//!
//! Detects partition tables, filesystem superblocks, and file signatures
//! over raw disk images and block devices, estimates recoverability, and
//! carves recoverable files back out.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod utils;

pub use application::*;
pub use domain::entities::*;
pub use domain::repositories::*;
