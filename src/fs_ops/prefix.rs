//! Timestamp prefix formatting.
//! The prefix is derived from a file's last-modified time interpreted in UTC.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Format a last-modified time as the rename prefix.
///
/// The prefix is pure ASCII, so it can be prepended to any filename,
/// including non-UTF-8 ones.
///
/// Example: a file modified at `2021-03-15T14:30:00Z` gets the prefix
/// `2021-03-15_14-30-00_UTC__`.
pub fn utc_prefix(mtime: SystemTime) -> String {
    let dt: DateTime<Utc> = mtime.into();
    format!("{}_UTC__", dt.format("%Y-%m-%d_%H-%M-%S"))
}
