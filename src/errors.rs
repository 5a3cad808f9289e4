//! Typed error definitions for mtime_stamp.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StampError {
    #[error("Root path not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Root path is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("Target name already exists: {0}")]
    TargetExists(PathBuf),

    #[error("Run interrupted by user")]
    Interrupted,
}

impl StampError {
    /// Stable machine-readable code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            StampError::RootNotFound(_) => "root_not_found",
            StampError::RootNotDirectory(_) => "root_not_directory",
            StampError::TargetExists(_) => "target_exists",
            StampError::Interrupted => "interrupted",
        }
    }
}
