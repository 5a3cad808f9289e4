use mtime_stamp::load_config_from_path;
use std::fs;
use tempfile::tempdir;

#[test]
fn malformed_xml_errors() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    // Missing closing tag for log_level
    let xml = r#"<config>
  <log_level>info
</config>"#;
    fs::write(&cfg_path, xml).unwrap();
    let err = load_config_from_path(&cfg_path).unwrap_err();
    assert!(format!("{err}").contains("parse config xml"));
}

#[test]
fn unknown_field_is_rejected() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("config.xml");
    let xml = r#"<config>
  <log_level>info</log_level>
  <download_base>/mnt/somewhere</download_base>
</config>"#;
    fs::write(&cfg_path, xml).unwrap();
    let err = load_config_from_path(&cfg_path).unwrap_err();
    assert!(
        format!("{err:#}").contains("parse config xml"),
        "unknown fields must fail parsing: {err:#}"
    );
}

#[test]
fn missing_file_errors_from_explicit_path() {
    let td = tempdir().unwrap();
    let err = load_config_from_path(&td.path().join("nope.xml")).unwrap_err();
    assert!(format!("{err}").contains("read config xml"));
}
