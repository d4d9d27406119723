//! CLI commands using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Offline data-recovery analysis over raw disk images and block devices.
///
/// Detects partition tables, filesystem superblocks, and file signatures,
/// estimates how much of the source is still recoverable, and can carve
/// and save every file it finds.
#[derive(Parser)]
#[command(name = "recoverite")]
#[command(version = "0.1.0")]
#[command(about = "Offline data-recovery analysis and file carving", long_about = None)]
pub struct Cli {
    /// Enable info-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug-level logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a source and print a report: recoverability, partitions,
    /// filesystem, and detected files
    Analyze {
        /// Path to a disk image or block device (e.g. disk.img, /dev/sda)
        #[arg(short, long)]
        source: String,

        /// Restrict the scan to these signature names (comma-separated,
        /// e.g. "jpeg,png,pdf"); defaults to the full catalog
        #[arg(short = 't', long, value_delimiter = ',')]
        types: Option<Vec<String>>,

        /// Disable the false-positive filtering pass
        #[arg(long)]
        no_filter: bool,

        /// Scan chunk size in MiB
        #[arg(long, default_value = "1")]
        chunk_size: u64,

        /// Write the rendered report to this file in addition to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Scan a source for file signatures and carve/save every match
    Recover {
        /// Path to a disk image or block device
        #[arg(short, long)]
        source: String,

        /// Output directory for recovered files
        #[arg(short, long, default_value = "./recovered")]
        output: PathBuf,

        /// Restrict the scan to these signature names (comma-separated)
        #[arg(short = 't', long, value_delimiter = ',')]
        types: Option<Vec<String>>,

        /// Disable the false-positive filtering pass
        #[arg(long)]
        no_filter: bool,

        /// Scan chunk size in MiB
        #[arg(long, default_value = "1")]
        chunk_size: u64,

        /// Overwrite files that already exist at the destination
        #[arg(long)]
        overwrite: bool,

        /// Organize recovered files into per-type subdirectories
        #[arg(long, default_value = "true")]
        organize: bool,
    },

    /// List every signature in the built-in catalog
    Signatures,
}

/// Parses a list of signature-name strings into a catalog selection.
///
/// Unrecognized names are reported on stderr and dropped; `None` (no
/// `--types` flag) selects the full catalog.
pub fn parse_signature_types(
    types: Option<Vec<String>>,
) -> Option<std::collections::HashSet<crate::domain::entities::SignatureName>> {
    use crate::domain::entities::SignatureName;

    types.map(|names| {
        names
            .iter()
            .filter_map(|s| match SignatureName::parse(s) {
                Some(name) => Some(name),
                None => {
                    eprintln!("Warning: unknown signature type '{s}'");
                    None
                }
            })
            .collect()
    })
}
