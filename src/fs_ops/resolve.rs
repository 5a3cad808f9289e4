//! Resolving the traversal root.
//! The root must already exist and be a directory; anything else aborts the
//! run before a single rename happens.
//!
//! Notes:
//! - `dunce::canonicalize` resolves symlinks and relative components while
//!   avoiding UNC-prefixed paths on Windows.
//! - Resolution happens exactly once; the walk operates on the result.

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::StampError;

/// Canonicalize `path` and verify it is a directory.
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    let real = dunce::canonicalize(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            anyhow::Error::new(StampError::RootNotFound(path.to_path_buf()))
        } else {
            anyhow::Error::new(e).context(format!("resolve root '{}'", path.display()))
        }
    })?;

    let meta = fs::metadata(&real)
        .with_context(|| format!("read metadata of root '{}'", real.display()))?;
    if !meta.is_dir() {
        return Err(StampError::RootNotDirectory(real).into());
    }

    info!(root = %real.display(), "Resolved traversal root");
    Ok(real)
}
