//! Config loading error messages and run-mode parsing.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use quill_core::{load_config_at, ConfigError, EngineConfig, RunMode};
use rstest::rstest;
use std::path::PathBuf;

#[test]
fn load_missing_config_returns_not_found() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let err = load_config_at(&dir.path().join("quill.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("quill.yaml"));
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("quill.yaml");
    file.write_str("run_mode: [unclosed\n  - : :").expect("write");

    let err = load_config_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("quill.yaml"), "must contain file path, got: {err}");
}

#[test]
fn load_partial_config_fills_defaults() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("quill.yaml");
    file.write_str("run_mode: production\nviews_path: templates\n").expect("write");
    file.assert(predicate::path::exists());

    let cfg = load_config_at(file.path()).expect("load");
    assert_eq!(cfg.run_mode, RunMode::Production);
    assert_eq!(cfg.views_path, PathBuf::from("templates"));
    assert_eq!(cfg.extensions, EngineConfig::default().extensions);
    assert_eq!(cfg.delimiters, EngineConfig::default().delimiters);
}

#[test]
fn load_full_config() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("quill.yaml");
    file.write_str(
        "run_mode: development\n\
         views_path: site/views\n\
         delimiters:\n  left: \"<%\"\n  right: \"%>\"\n\
         extensions: [html, tera]\n\
         autoescape: false\n",
    )
    .expect("write");

    let cfg = load_config_at(file.path()).expect("load");
    assert_eq!(cfg.delimiters.left, "<%");
    assert_eq!(cfg.delimiters.right, "%>");
    assert_eq!(cfg.extensions, vec!["html", "tera"]);
    assert!(!cfg.autoescape);
}

#[test]
fn load_config_with_empty_delimiter_is_rejected() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("quill.yaml");
    file.write_str("delimiters:\n  left: \"\"\n  right: \"%}\"\n").expect("write");

    let err = load_config_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::EmptyDelimiter), "got: {err}");
}

#[rstest]
#[case("dev", RunMode::Development)]
#[case("development", RunMode::Development)]
#[case("PROD", RunMode::Production)]
#[case(" production ", RunMode::Production)]
fn run_mode_parses(#[case] raw: &str, #[case] expected: RunMode) {
    assert_eq!(raw.parse::<RunMode>().expect("parse"), expected);
}

#[rstest]
#[case("")]
#[case("staging")]
fn run_mode_rejects_unknown(#[case] raw: &str) {
    let err = raw.parse::<RunMode>().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidRunMode(_)), "got: {err}");
}
