//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Exactly one positional ROOT is expected; clap rejects extras with a
//!   usage error and its own non-zero exit status.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};

/// CLI wrapper for the mtime_stamp library.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Prefix every file in a directory tree with its UTC last-modified timestamp"
)]
pub struct Args {
    /// Root directory whose files will be stamped.
    #[arg(value_name = "ROOT", value_hint = ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file (in addition to the console).
    #[arg(
        long,
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        help = "Also write logs to this file"
    )]
    pub log_file: Option<PathBuf>,

    /// Dry-run: log actions but do not modify the filesystem.
    #[arg(long, help = "Show what would be renamed, but do not modify files")]
    pub dry_run: bool,

    /// Exit non-zero when any file failed to rename (default: best effort, exit 0).
    #[arg(long, help = "Exit non-zero if any file failed to rename")]
    pub strict: bool,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where mtime_stamp will look for the config file (or MTIME_STAMP_CONFIG if set), then exit.
    #[arg(
        long,
        help = "Print the config file location used by mtime_stamp and exit"
    )]
    pub print_config: bool,

    /// Write a template config file at the default location, then exit.
    #[arg(long, help = "Write a template config file if none exists, then exit")]
    pub init_config: bool,
}

impl Args {
    /// Effective root path with shell-quoting artifacts stripped.
    pub fn resolved_root(&self) -> Option<PathBuf> {
        self.root.as_deref().map(Self::sanitize_path)
    }

    #[inline]
    fn sanitize_path(p: &std::path::Path) -> PathBuf {
        Self::sanitize_str(&p.to_string_lossy())
    }

    #[inline]
    fn sanitize_str(s: &str) -> PathBuf {
        // Trim surrounding single/double quotes if user invoked with quotes in
        // PowerShell or CMD, plus any trailing unmatched quote from shell
        // escaping mistakes.
        let trimmed = s.trim();
        let mut inner = if (trimmed.starts_with('"') && trimmed.ends_with('"'))
            || (trimmed.starts_with('\'') && trimmed.ends_with('\''))
        {
            trimmed[1..trimmed.len() - 1].to_string()
        } else {
            trimmed.trim_matches(|c| c == '\'' || c == '"').to_string()
        };

        // Remove one trailing separator introduced by quoting/escaping, but
        // never strip a bare root like "/" or "C:/".
        if (inner.ends_with('\\') || inner.ends_with('/')) && inner.len() > 1 {
            inner.pop();
        }

        PathBuf::from(inner)
    }

    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        if self.dry_run {
            cfg.dry_run = true;
        }
        if self.strict {
            cfg.strict = true;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
