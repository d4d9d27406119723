//! Recoverability estimator service
//!
//! Computes a heuristic data-quality score by walking fixed-size blocks
//! and classifying each as zero, valid, or other.

use crate::domain::repositories::ByteSource;
use std::collections::HashSet;

const DEFAULT_BLOCK_SIZE: u64 = 4096;
const VALID_UNIQUE_BYTE_THRESHOLD: usize = 10;

/// Walks `source` in `block_size`-byte blocks and returns
/// `(valid_blocks / total_blocks) * 100`. An empty source returns 0.0.
pub fn estimate_recoverability<S: ByteSource + ?Sized>(source: &S, block_size: u64) -> f64 {
    let block_size = if block_size == 0 { DEFAULT_BLOCK_SIZE } else { block_size };
    let total = source.len();
    if total == 0 {
        return 0.0;
    }

    let mut total_blocks = 0u64;
    let mut valid_blocks = 0u64;
    let mut offset = 0u64;

    while offset < total {
        let want = block_size.min(total - offset) as usize;
        let Ok(block) = source.read_at(offset, want) else {
            break;
        };
        if block.is_empty() {
            break;
        }

        total_blocks += 1;
        if classify(&block) == BlockKind::Valid {
            valid_blocks += 1;
        }

        offset += block.len() as u64;
    }

    if total_blocks == 0 {
        return 0.0;
    }

    (valid_blocks as f64 / total_blocks as f64) * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Zero,
    Valid,
    Other,
}

fn classify(block: &[u8]) -> BlockKind {
    if block.iter().all(|&b| b == 0) {
        return BlockKind::Zero;
    }
    let unique: HashSet<u8> = block.iter().copied().collect();
    if unique.len() > VALID_UNIQUE_BYTE_THRESHOLD {
        BlockKind::Valid
    } else {
        BlockKind::Other
    }
}
