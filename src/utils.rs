//! Small formatting helpers shared across the application and
//! presentation layers.

use humansize::{format_size, BINARY};

/// Formats a byte count as a human-readable string, e.g. `"42.50 MiB"`.
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, BINARY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_bytes_below_a_kibibyte() {
        assert_eq!(format_bytes(512), "512 B");
    }

    #[test]
    fn formats_mebibytes() {
        assert_eq!(format_bytes(42 * 1024 * 1024), "42 MiB");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_bytes(0), "0 B");
    }
}
