//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Writes a commented template on explicit request (`--init-config`);
//!   nothing is auto-created during a normal run.
//!
//! Notes:
//! - This module only reads/writes the config file; the traversal root is
//!   validated elsewhere.
//! - Unknown XML fields are a hard error so misconfigurations surface early.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use tracing::info;

use super::paths::{config_path, default_log_path, path_has_symlink_ancestor};
use super::types::{Config, LogLevel};
use crate::platform::{set_dir_mode_0700, set_file_mode_0600, write_config_secure_new_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
    #[serde(rename = "strict")]
    strict: Option<bool>,
}

// Map XmlConfig -> Config.
fn xml_to_config(parsed: XmlConfig) -> Config {
    let mut cfg = Config::default();

    if let Some(s) = parsed.log_level.as_deref()
        && let Some(level) = LogLevel::parse(s.trim())
    {
        cfg.log_level = level;
    }
    if let Some(s) = parsed.log_file.as_deref() {
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            cfg.log_file = Some(PathBuf::from(trimmed));
        }
    }
    cfg.strict = parsed.strict.unwrap_or(false);

    cfg
}

/// Load a Config from a specific XML file path (quick_xml).
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    Ok(xml_to_config(parsed))
}

/// Load the effective Config: MTIME_STAMP_CONFIG or the default location.
/// A missing file is not an error; defaults apply.
pub fn load_config() -> Result<Config> {
    let Some(path) = config_path() else {
        return Ok(Config::default());
    };
    if !path.exists() {
        return Ok(Config::default());
    }
    load_config_from_path(&path)
}

/// Create the template config file and parent directory (best-effort
/// permissions). Uses secure creation to avoid following attacker-controlled
/// symlinks on Unix.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        let _ = set_dir_mode_0700(parent);
    }

    let suggested_log = default_log_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "/path/to/mtime_stamp.log".into());

    let content = format!(
        "<!--\n  mtime_stamp configuration (XML)\n\n  Fields:\n    log_level  -> quiet | normal | info | debug\n    log_file   -> path to log file (optional; stdout/stderr still used)\n    strict     -> true/false; exit non-zero when any file failed to rename\n\n  Notes:\n    - CLI flags override XML values.\n    - Set MTIME_STAMP_CONFIG to use a different file.\n-->\n<config>\n  <log_level>normal</log_level>\n  <log_file>{}</log_file>\n  <strict>false</strict>\n</config>\n",
        suggested_log
    );

    // Atomic, secure write (O_NOFOLLOW + create_new on Unix), then tighten perms.
    write_config_secure_new_0600(path, content.as_bytes())?;
    let _ = set_file_mode_0600(path);

    info!("Created template config at {}", path.display());
    Ok(())
}
