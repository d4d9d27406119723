//! recoverite - offline data-recovery analysis
//!
//! Detects partition tables, filesystem superblocks, and file signatures
//! over raw disk images and block devices, estimates recoverability, and
//! carves recoverable files to disk.

use anyhow::{Context, Result};
use clap::Parser;
use recoverite::application::dto::{RecoveryResult, ScanConfig};
use recoverite::application::{AnalyzeSourceUseCase, RecoverFilesUseCase, ScanDeviceUseCase};
use recoverite::domain::repositories::{ByteSource, RecoveredFileWriter, WriteOptions};
use recoverite::domain::services::{catalog_entry, CATALOG};
use recoverite::infrastructure::byte_source::Source;
use recoverite::infrastructure::carvers::GenericFileCarver;
use recoverite::infrastructure::persistence::LocalFileWriter;
use recoverite::presentation::cli::{parse_signature_types, Cli, Commands, ProgressReporter};
use recoverite::utils::format_bytes;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Analyze {
            source,
            types,
            no_filter,
            chunk_size,
            output,
        } => run_analyze(&source, types, no_filter, chunk_size, output.as_deref()),

        Commands::Recover {
            source,
            output,
            types,
            no_filter,
            chunk_size,
            overwrite,
            organize,
        } => run_recover(&source, &output, types, no_filter, chunk_size, overwrite, organize),

        Commands::Signatures => {
            list_signatures();
            Ok(())
        }
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let default_level = if debug { "debug" } else if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

fn open_source(path: &str) -> Result<Source> {
    Source::open(path).context("Failed to open source. Make sure you have read permissions (try sudo).")
}

fn build_scan_config(types: Option<Vec<String>>, no_filter: bool, chunk_size_mb: u64) -> ScanConfig {
    let mut config = ScanConfig::default().with_chunk_size(chunk_size_mb * 1024 * 1024);
    if let Some(selected) = parse_signature_types(types) {
        config = config.with_types(selected);
    }
    if no_filter {
        config = config.without_filter();
    }
    config
}

fn run_analyze(
    source_path: &str,
    types: Option<Vec<String>>,
    no_filter: bool,
    chunk_size_mb: u64,
    output: Option<&std::path::Path>,
) -> Result<()> {
    println!("Analyzing: {source_path}");

    let source = open_source(source_path)?;
    println!("Source size: {} ({} bytes)\n", format_bytes(source.len()), source.len());

    let config = build_scan_config(types, no_filter, chunk_size_mb);
    let progress = ProgressReporter::for_analysis();
    let use_case = AnalyzeSourceUseCase::new();
    let result = use_case.execute(&source, &config, progress.callback())?;
    progress.finish("Analysis complete!");

    let report = result.into_report();
    let rendered = report.render();
    println!("\n{rendered}");

    if let Some(path) = output {
        std::fs::write(path, &rendered).with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn run_recover(
    source_path: &str,
    output_path: &std::path::Path,
    types: Option<Vec<String>>,
    no_filter: bool,
    chunk_size_mb: u64,
    overwrite: bool,
    organize: bool,
) -> Result<()> {
    println!("Source: {source_path}");
    println!("Output: {}\n", output_path.display());

    let source = open_source(source_path)?;
    println!("Source size: {} ({} bytes)\n", format_bytes(source.len()), source.len());

    println!("Phase 1: Scanning for recoverable files...\n");
    let config = build_scan_config(types, no_filter, chunk_size_mb);
    let scan_progress = ProgressReporter::for_analysis();
    let scan_use_case = ScanDeviceUseCase::new();
    let scan_result = scan_use_case.execute(&source, &config, Some(scan_progress.callback()))?;
    scan_progress.finish(&format!("Found {} potential files", scan_result.total_detections()));

    if scan_result.total_detections() == 0 {
        println!("\nNo recoverable files found.");
        return Ok(());
    }

    println!("\nPhase 2: Carving and saving files...\n");
    let write_options = WriteOptions { overwrite, organize_by_type: organize };

    let carver = GenericFileCarver::with_max_carve_size(&source, config.max_carve_size);
    let writer = LocalFileWriter::new(output_path)?;

    let recovery_progress = ProgressReporter::for_recovery();
    let recover_use_case = RecoverFilesUseCase::new(carver, writer);
    let recovery_result: RecoveryResult =
        recover_use_case.execute(&scan_result, &write_options, Some(recovery_progress.recovery_callback()))?;
    recovery_progress.finish("Recovery complete!");

    println!("\n{}", recovery_result.summary());
    println!("Files saved to: {}", output_path.display());

    Ok(())
}

fn list_signatures() {
    println!("\nSupported file signatures ({} entries)\n", CATALOG.len());

    for name in recoverite::domain::entities::SignatureName::ALL {
        let sig = catalog_entry(name);
        let header_hex: Vec<String> = sig.header.iter().map(|b| format!("{b:02X}")).collect();
        print!("  {:<10} header: {}", sig.name.to_string(), header_hex.join(" "));

        if let Some(footer) = sig.footer {
            let footer_hex: Vec<String> = footer.iter().map(|b| format!("{b:02X}")).collect();
            print!(" | footer: {}", footer_hex.join(" "));
        }

        println!(" | ext: {} | min size: {}", sig.extension, format_bytes(sig.min_size));
    }
    println!();
}
