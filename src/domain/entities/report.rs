//! Human-readable analysis report
//!
//! Pure presentation over already-computed domain values: it owns no
//! analysis logic and performs no I/O beyond handing back a string.

use super::partition::PartitionTable;
use super::signature::Detection;
use super::volume::VolumeDescriptor;
use std::collections::BTreeMap;
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct Report {
    pub source: String,
    pub total_size: u64,
    pub recoverability_score: f64,
    pub partitions: PartitionTable,
    pub volumes: Vec<VolumeDescriptor>,
    pub detections: Vec<Detection>,
}

impl Report {
    fn recoverability_band(&self) -> &'static str {
        if self.recoverability_score > 70.0 {
            "Excellent - the data is largely intact"
        } else if self.recoverability_score > 40.0 {
            "Partial - recovery will be incomplete"
        } else {
            "Poor - the data is heavily corrupted"
        }
    }

    /// Renders the full plain-text report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(80);
        let dash = "-".repeat(80);

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "DATA RECOVERY ANALYSIS REPORT");
        let _ = writeln!(out, "{rule}\n");
        let _ = writeln!(out, "Source: {}", self.source);
        let _ = writeln!(out, "Total size: {} bytes\n", self.total_size);

        let _ = writeln!(out, "{dash}");
        let _ = writeln!(out, "1. RECOVERABILITY");
        let _ = writeln!(out, "{dash}");
        let _ = writeln!(out, "Score: {:.2}%", self.recoverability_score);
        let _ = writeln!(out, "Assessment: {}\n", self.recoverability_band());

        let _ = writeln!(out, "{dash}");
        let _ = writeln!(out, "2. PARTITIONS");
        let _ = writeln!(out, "{dash}");
        match &self.partitions {
            PartitionTable::Mbr(entries) if !entries.is_empty() => {
                for entry in entries {
                    let _ = writeln!(out, "\nPartition {}:", entry.index);
                    let _ = writeln!(out, "  Type: {}", entry.type_name);
                    let _ = writeln!(
                        out,
                        "  Status: {}",
                        if entry.bootable { "bootable" } else { "non-bootable" }
                    );
                    let _ = writeln!(out, "  Size: {} MiB", entry.size_mb());
                    let _ = writeln!(out, "  Start LBA: {}", entry.start_lba);
                }
            }
            PartitionTable::Gpt(header) => {
                let _ = writeln!(
                    out,
                    "GPT header present: {} entries of {} bytes each",
                    header.entry_count, header.entry_size
                );
            }
            _ => {
                let _ = writeln!(out, "No partition table detected");
            }
        }
        out.push('\n');

        let _ = writeln!(out, "{dash}");
        let _ = writeln!(out, "3. FILE SYSTEMS");
        let _ = writeln!(out, "{dash}");
        if self.volumes.is_empty() {
            let _ = writeln!(out, "No file system superblock detected");
        } else {
            for volume in &self.volumes {
                let _ = writeln!(out, "\nType: {}", volume.kind_name());
                let _ = writeln!(out, "Size: {} MiB", volume.volume_size_mb());
                if let Some(oem) = volume.oem_name() {
                    let _ = writeln!(out, "OEM: {oem}");
                }
            }
        }
        out.push('\n');

        let _ = writeln!(out, "{dash}");
        let _ = writeln!(out, "4. DETECTED FILES (SIGNATURE SCAN)");
        let _ = writeln!(out, "{dash}");
        let _ = writeln!(out, "Total detected: {}\n", self.detections.len());

        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        for detection in &self.detections {
            *counts.entry(detection.signature.as_str()).or_insert(0) += 1;
        }
        let _ = writeln!(out, "By type:");
        for (name, count) in &counts {
            let _ = writeln!(out, "  {name}: {count}");
        }
        out.push('\n');

        let _ = writeln!(out, "Detailed list:");
        for (idx, detection) in self.detections.iter().enumerate() {
            let _ = writeln!(
                out,
                "\n  [{:04}] {}",
                idx + 1,
                detection.signature.as_str()
            );
            let _ = writeln!(out, "        Offset: 0x{:08X}", detection.offset);
            if let Some(size) = detection.size {
                let _ = writeln!(out, "        Size: {size} bytes");
            }
        }

        out.push('\n');
        let _ = writeln!(out, "{dash}");
        let _ = writeln!(out, "END OF REPORT");
        let _ = writeln!(out, "{rule}");
        out
    }
}
