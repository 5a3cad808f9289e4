//! Per-file stamping.
//! Renames one regular file to `<utc prefix><original name>` within its own
//! directory. The rename is attempted exactly once; an existing target is a
//! failure for this file, never an overwrite.

use anyhow::{Result, bail};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::errors::StampError;

use super::helpers::io_error_with_help;
use super::prefix::utc_prefix;

/// Sibling target path for `src`: same parent, prefix prepended to the name.
/// Works on the raw OsStr so non-UTF-8 names survive untouched.
fn target_path(src: &Path, prefix: &str) -> Result<PathBuf> {
    let name = src
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Source file missing a file name: {}", src.display()))?;
    let mut stamped = OsString::from(prefix);
    stamped.push(name);
    Ok(src.with_file_name(stamped))
}

/// Stamp a single regular file. Returns the target path (the would-be target
/// under dry-run).
///
/// The filename already carrying a prefix from an earlier run is not
/// detected; re-running the tool stacks a second prefix.
pub fn stamp_file(config: &Config, src: &Path) -> Result<PathBuf> {
    let meta = fs::metadata(src).map_err(io_error_with_help("read metadata of", src))?;
    let mtime = meta
        .modified()
        .map_err(io_error_with_help("read mtime of", src))?;

    let dest = target_path(src, &utc_prefix(mtime))?;

    // fs::rename replaces an existing target on Unix; refuse up front so a
    // collision can never destroy data. TOCTOU between this check and the
    // rename is accepted (see the concurrency model).
    if dest.try_exists().unwrap_or(false) {
        bail!(StampError::TargetExists(dest));
    }

    if config.dry_run {
        info!(src = %src.display(), dest = %dest.display(), "dry-run: would rename");
        return Ok(dest);
    }

    fs::rename(src, &dest).map_err(io_error_with_help("rename", src))?;
    info!(src = %src.display(), dest = %dest.display(), "Renamed file");
    Ok(dest)
}
