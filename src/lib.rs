//! Core library for `mtime_stamp`.
//!
//! Walks a directory tree and renames every regular file by prepending a UTC
//! timestamp derived from the file's last-modified time
//! (`YYYY-MM-DD_HH-MM-SS_UTC__<original-name>`), so lexical sort order on
//! filename reflects modification time.
//!
//! Keep the library small and ergonomic: a Config type with sensible
//! defaults, a root resolver, and a walk function returning a run report.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod shutdown;

pub use config::paths::{
    CONFIG_ENV, config_path, default_config_path, default_log_path, path_has_symlink_ancestor,
};
pub use config::{Config, LogLevel, create_template_config, load_config, load_config_from_path};
pub use errors::StampError;
pub use fs_ops::{Failure, RunReport, resolve_root, stamp_file, stamp_tree, utc_prefix};
