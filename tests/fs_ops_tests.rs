use assert_fs::prelude::*;
use filetime::FileTime;
use mtime_stamp::{Config, stamp_file, stamp_tree};
use std::path::Path;
use std::time::{Duration, SystemTime};

fn set_mtime(path: &Path, secs: u64) {
    let ft = FileTime::from_system_time(SystemTime::UNIX_EPOCH + Duration::from_secs(secs));
    filetime::set_file_times(path, ft, ft).unwrap();
}

#[test]
fn stamp_file_success() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = temp.child("a.txt");
    source.write_str("hello").unwrap();
    set_mtime(source.path(), 1_615_818_600);

    let dest = stamp_file(&Config::default(), source.path()).expect("stamp_file should succeed");

    assert!(dest.exists());
    assert!(!source.path().exists());
    assert_eq!(
        dest.file_name().unwrap().to_str().unwrap(),
        "2021-03-15_14-30-00_UTC__a.txt"
    );
    let content = std::fs::read_to_string(&dest).unwrap();
    assert_eq!(content, "hello");
}

#[test]
fn stamp_tree_success() {
    let temp = assert_fs::TempDir::new().unwrap();
    let d = temp.child("folder");
    d.create_dir_all().unwrap();
    let f1 = d.child("one.txt");
    f1.write_str("one").unwrap();
    let sub = d.child("sub");
    sub.create_dir_all().unwrap();
    let f2 = sub.child("two.txt");
    f2.write_str("two").unwrap();
    set_mtime(f1.path(), 1_615_818_600);
    set_mtime(f2.path(), 1_615_818_601);

    let report = stamp_tree(&Config::default(), temp.path()).expect("stamp_tree should succeed");

    assert_eq!(report.processed, 2);
    assert_eq!(report.renamed, 2);
    assert!(!report.has_failures());
    assert!(d.path().join("2021-03-15_14-30-00_UTC__one.txt").exists());
    assert!(
        sub.path()
            .join("2021-03-15_14-30-01_UTC__two.txt")
            .exists()
    );
    // Directories keep their names.
    assert!(d.path().exists());
    assert!(sub.path().exists());
}
