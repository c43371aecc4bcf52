//! Runtime description lookup over a generated table.
//!
//! This is the consumer side of the artifact: the generated
//! `DESCRIPTIONS` slice is passed in explicitly, so there is no hidden
//! global state. The scan is deliberately linear; generated tables are
//! small, curated and only consulted on error-reporting paths.

use crate::codes::ErrorCode;

/// Fallback returned for codes not present in the table.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Returns the description for `code`, or [`UNKNOWN_ERROR`] on a miss.
///
/// Total: error-reporting code must never itself fail.
#[must_use]
pub fn lookup<'a>(table: &[(ErrorCode, &'a str)], code: ErrorCode) -> &'a str {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(UNKNOWN_ERROR, |(_, description)| *description)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &[(ErrorCode, &str)] = &[
        (0x0000, "Error opening device"),
        (0x0041, "Error writing to device"),
        (0x0800, "Error initializing module"),
    ];

    #[test]
    fn test_lookup_hit_returns_description() {
        assert_eq!(lookup(TABLE, 0x0041), "Error writing to device");
        assert_eq!(lookup(TABLE, 0x0000), "Error opening device");
    }

    #[test]
    fn test_lookup_miss_returns_fallback() {
        assert_eq!(lookup(TABLE, 0x1234), UNKNOWN_ERROR);
        assert_eq!(lookup(&[], 0x0000), UNKNOWN_ERROR);
    }
}
