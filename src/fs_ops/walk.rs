//! The traversal: a pre-order depth-first walk driving per-file stamping.
//!
//! Notes:
//! - Sibling order is whatever the filesystem enumerates; no sort is imposed.
//! - A single inaccessible entry is recorded and skipped; it never aborts
//!   the walk.
//! - Symlinks are neither followed nor renamed.

use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::errors::StampError;
use crate::shutdown;

use super::report::RunReport;
use super::stamp::stamp_file;

/// Walk `root` and stamp every regular file underneath it.
///
/// `root` must already be canonicalized via [`super::resolve_root`]. Returns
/// the run report; the only early exit is a user interrupt.
pub fn stamp_tree(config: &Config, root: &Path) -> Result<RunReport> {
    let mut report = RunReport::default();
    // Targets created during this run. Whether a directory enumerator
    // re-yields a name created mid-iteration is filesystem-specific; a
    // re-yielded target must not be stamped twice in the same pass.
    let mut stamped: HashSet<PathBuf> = HashSet::new();

    for entry in WalkDir::new(root).follow_links(false) {
        if shutdown::is_requested() {
            warn!("Interrupt requested; stopping the walk");
            return Err(StampError::Interrupted.into());
        }

        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                error!(path = %path.display(), error = %e, "Failed to access entry");
                report.record_failure(path, e.to_string());
                continue;
            }
        };

        let ftype = entry.file_type();
        if ftype.is_dir() {
            debug!(path = %entry.path().display(), "Entering directory");
            continue;
        }
        if ftype.is_symlink() {
            // Symlinks (broken ones included) are neither followed nor renamed.
            warn!(path = %entry.path().display(), "Skipping symlink");
            continue;
        }
        if !ftype.is_file() {
            debug!(path = %entry.path().display(), "Skipping non-regular entry");
            continue;
        }
        if stamped.contains(entry.path()) {
            debug!(path = %entry.path().display(), "Stamped earlier in this run");
            continue;
        }

        info!(path = %entry.path().display(), "Processing file");
        report.processed += 1;
        match stamp_file(config, entry.path()) {
            Ok(dest) => {
                if !config.dry_run {
                    report.renamed += 1;
                }
                stamped.insert(dest);
            }
            Err(e) => {
                error!(path = %entry.path().display(), error = %e, "Failed to stamp file");
                report.record_failure(entry.path(), format!("{e:#}"));
            }
        }
    }

    info!(
        processed = report.processed,
        renamed = report.renamed,
        failed = report.failures.len(),
        "Walk completed"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use serial_test::serial;
    use std::fs;
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn set_mtime(path: &Path, secs: u64) {
        let ft = FileTime::from_system_time(SystemTime::UNIX_EPOCH + Duration::from_secs(secs));
        filetime::set_file_times(path, ft, ft).unwrap();
    }

    #[test]
    #[serial]
    fn stamps_every_file_in_a_nested_tree() {
        let td = tempdir().unwrap();
        let sub = td.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        let top = td.path().join("top.txt");
        let inner = sub.join("inner.dat");
        fs::write(&top, "t").unwrap();
        fs::write(&inner, "i").unwrap();
        set_mtime(&top, 1_615_818_600);
        set_mtime(&inner, 1_615_818_600);

        let report = stamp_tree(&Config::default(), td.path()).unwrap();

        assert_eq!(report.processed, 2);
        assert_eq!(report.renamed, 2);
        assert!(!report.has_failures());
        assert!(td.path().join("2021-03-15_14-30-00_UTC__top.txt").exists());
        assert!(sub.join("2021-03-15_14-30-00_UTC__inner.dat").exists());
        // The directory itself keeps its name.
        assert!(sub.exists());
    }

    #[test]
    #[serial]
    fn empty_root_reports_zero_processed() {
        let td = tempdir().unwrap();
        let report = stamp_tree(&Config::default(), td.path()).unwrap();
        assert_eq!(report.processed, 0);
        assert_eq!(report.renamed, 0);
        assert!(!report.has_failures());
    }

    #[test]
    #[serial]
    fn second_run_stacks_a_second_prefix() {
        let td = tempdir().unwrap();
        let f = td.path().join("twice.txt");
        fs::write(&f, "x").unwrap();
        set_mtime(&f, 1_615_818_600);

        let cfg = Config::default();
        stamp_tree(&cfg, td.path()).unwrap();
        let once = td.path().join("2021-03-15_14-30-00_UTC__twice.txt");
        assert!(once.exists());

        set_mtime(&once, 1_615_818_600);
        stamp_tree(&cfg, td.path()).unwrap();
        let twice = td
            .path()
            .join("2021-03-15_14-30-00_UTC__2021-03-15_14-30-00_UTC__twice.txt");
        assert!(twice.exists(), "second run must prepend a second prefix");
    }

    #[test]
    #[serial]
    fn collision_is_recorded_and_walk_continues() {
        let td = tempdir().unwrap();
        let blocked = td.path().join("blocked.txt");
        let free = td.path().join("free.txt");
        fs::write(&blocked, "b").unwrap();
        fs::write(&free, "f").unwrap();
        set_mtime(&blocked, 1_615_818_600);
        set_mtime(&free, 1_615_818_600);
        // Occupy blocked.txt's target up front.
        fs::write(td.path().join("2021-03-15_14-30-00_UTC__blocked.txt"), "old").unwrap();

        let report = stamp_tree(&Config::default(), td.path()).unwrap();

        assert!(report.has_failures());
        assert!(blocked.exists(), "collided file must be left alone");
        assert!(
            td.path().join("2021-03-15_14-30-00_UTC__free.txt").exists(),
            "other files still get stamped"
        );
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn unreadable_subdir_is_recorded_and_walk_continues() {
        use std::os::unix::fs::PermissionsExt;

        // Root bypasses directory permission checks; the failure can't be provoked.
        unsafe {
            if libc::geteuid() == 0 {
                eprintln!("skipping: running as root");
                return;
            }
        }

        let td = tempdir().unwrap();
        let locked = td.path().join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), "h").unwrap();
        let open_file = td.path().join("open.txt");
        fs::write(&open_file, "o").unwrap();
        set_mtime(&open_file, 1_615_818_600);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let report = stamp_tree(&Config::default(), td.path());
        // Restore so the tempdir can be cleaned up.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let report = report.unwrap();
        assert!(report.has_failures());
        assert!(td.path().join("2021-03-15_14-30-00_UTC__open.txt").exists());
    }

    #[test]
    #[serial]
    fn dry_run_counts_but_does_not_rename() {
        let td = tempdir().unwrap();
        let f = td.path().join("stay.txt");
        fs::write(&f, "x").unwrap();

        let cfg = Config {
            dry_run: true,
            ..Config::default()
        };
        let report = stamp_tree(&cfg, td.path()).unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.renamed, 0);
        assert!(f.exists());
    }

    #[test]
    #[serial]
    fn interrupt_stops_the_walk_early() {
        shutdown::reset();
        let td = tempdir().unwrap();
        fs::write(td.path().join("never.txt"), "x").unwrap();

        shutdown::request();
        let err = stamp_tree(&Config::default(), td.path()).unwrap_err();
        shutdown::reset();

        assert!(matches!(
            err.downcast_ref::<StampError>(),
            Some(StampError::Interrupted)
        ));
        assert!(td.path().join("never.txt").exists(), "no rename after interrupt");
    }
}
