//! Exit-code policy: per-file failures are best-effort by default (exit 0)
//! and escalate to a non-zero exit only under --strict.

use assert_cmd::cargo::cargo_bin;
use filetime::FileTime;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

fn set_mtime(path: &Path, secs: u64) {
    let ft = FileTime::from_system_time(SystemTime::UNIX_EPOCH + Duration::from_secs(secs));
    filetime::set_file_times(path, ft, ft).unwrap();
}

/// Build a tree where one file's target name is already occupied.
fn tree_with_collision(base: &Path) -> std::path::PathBuf {
    let root = base.join("tree");
    fs::create_dir_all(&root).unwrap();
    let blocked = root.join("blocked.txt");
    fs::write(&blocked, "new").unwrap();
    set_mtime(&blocked, 1_615_818_600);
    fs::write(root.join("2021-03-15_14-30-00_UTC__blocked.txt"), "old").unwrap();
    root
}

#[test]
fn default_run_exits_zero_despite_failure() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let cfg_path = base.join("config.xml");
    fs::write(&cfg_path, "<config><log_level>quiet</log_level></config>").unwrap();
    let root = tree_with_collision(&base);

    let me = cargo_bin("mtime_stamp");
    let out = Command::new(&me)
        .env("MTIME_STAMP_CONFIG", &cfg_path)
        .arg(&root)
        .output()
        .expect("spawn binary");

    assert!(
        out.status.success(),
        "best-effort default must still exit zero; stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("1 failed"),
        "summary must surface the failure count: {stdout}"
    );
    // The collided pair is untouched.
    assert_eq!(fs::read_to_string(root.join("blocked.txt")).unwrap(), "new");
}

#[test]
fn strict_flag_escalates_failures_to_nonzero_exit() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let cfg_path = base.join("config.xml");
    fs::write(&cfg_path, "<config><log_level>quiet</log_level></config>").unwrap();
    let root = tree_with_collision(&base);

    let me = cargo_bin("mtime_stamp");
    let out = Command::new(&me)
        .env("MTIME_STAMP_CONFIG", &cfg_path)
        .arg("--strict")
        .arg(&root)
        .output()
        .expect("spawn binary");

    assert!(!out.status.success(), "--strict must exit non-zero");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("failed to rename"),
        "stderr should explain the strict failure: {stderr}"
    );
}

#[test]
fn strict_via_config_file_works_too() {
    let td = tempdir().unwrap();
    let base = fs::canonicalize(td.path()).unwrap();
    let cfg_path = base.join("config.xml");
    fs::write(
        &cfg_path,
        "<config><log_level>quiet</log_level><strict>true</strict></config>",
    )
    .unwrap();
    let root = tree_with_collision(&base);

    let me = cargo_bin("mtime_stamp");
    let out = Command::new(&me)
        .env("MTIME_STAMP_CONFIG", &cfg_path)
        .arg(&root)
        .output()
        .expect("spawn binary");

    assert!(!out.status.success(), "strict from config must apply");
}
