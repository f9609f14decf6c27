//! Human-formatted timestamps
//!
//! The store holds these as display strings, not machine-sortable values;
//! both formats are part of the wire contract with existing records.

use chrono::Local;

/// Creation timestamp, e.g. "2026-08-25T14:03:59+05:30"
pub fn created_now() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Last-updated timestamp, e.g. "2026-08-25 14:03:59"
pub fn updated_now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_format_carries_offset() {
        let ts = created_now();
        assert!(ts.contains('T'));
        assert!(ts.contains('+') || ts.contains('-'));
    }

    #[test]
    fn updated_format_is_space_separated() {
        let ts = updated_now();
        assert_eq!(ts.len(), 19);
        assert_eq!(ts.as_bytes()[10], b' ');
    }
}
