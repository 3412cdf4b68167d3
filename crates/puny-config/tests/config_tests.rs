//! Configuration loading and precedence tests

use pretty_assertions::assert_eq;
use puny_config::{ColorSetting, ConfigError, ConfigLoader, DiagnosticFormat};
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn create_config_file(dir: &Path, content: &str) -> PathBuf {
    let config_path = dir.join("puny.toml");
    fs::write(&config_path, content).unwrap();
    config_path
}

fn clear_env() {
    env::remove_var("PUNY_DIALECT");
    env::remove_var("PUNY_DIAGNOSTICS");
}

// ============================================================================
// Loading
// ============================================================================

#[test]
#[serial]
fn test_load_project_config() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[run]
dialect = "basic"

[diagnostics]
color = "always"
"#,
    );

    let config = ConfigLoader::new()
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert_eq!(config.project_root(), Some(temp_dir.path()));
    assert_eq!(config.dialect(), Some("basic"));
    assert_eq!(config.color(), ColorSetting::Always);
    assert_eq!(config.diagnostic_format(), DiagnosticFormat::Human);
}

#[test]
#[serial]
fn test_load_when_no_config_exists() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();

    let config = ConfigLoader::new()
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert_eq!(config.dialect(), None);
    assert_eq!(config.project_root(), None);
    assert_eq!(config.color(), ColorSetting::Auto);
}

#[test]
#[serial]
fn test_load_from_subdirectory_finds_parent() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[run]\ndialect = \"funcs\"\n");

    let nested = temp_dir.path().join("src").join("lib");
    fs::create_dir_all(&nested).unwrap();

    let config = ConfigLoader::new().load_from_directory(&nested).unwrap();

    assert_eq!(config.dialect(), Some("funcs"));
    assert_eq!(config.project_root(), Some(temp_dir.path()));
}

#[test]
fn test_load_from_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let err = ConfigLoader::new()
        .without_env()
        .load_from_file(&temp_dir.path().join("puny.toml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[rstest]
#[case::bad_toml("[run\ndialect = ")]
#[case::unknown_table("[compiler]\noptimize = true\n")]
#[case::wrong_type("[run]\ndialect = 3\n")]
#[case::unknown_color("[diagnostics]\ncolor = \"rainbow\"\n")]
fn test_malformed_config_is_a_parse_error(#[case] content: &str) {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), content);
    let err = ConfigLoader::new().without_env().load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::TomlParseError { .. }));
}

#[test]
fn test_unknown_dialect_is_invalid() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[run]\ndialect = \"pascal\"\n");
    let err = ConfigLoader::new().without_env().load_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("unknown dialect 'pascal'"));
}

// ============================================================================
// Environment overrides
// ============================================================================

#[test]
#[serial]
fn test_env_dialect_overrides_file() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[run]\ndialect = \"funcs\"\n");

    env::set_var("PUNY_DIALECT", "BASIC");
    let config = ConfigLoader::new().load_from_directory(temp_dir.path());
    clear_env();

    assert_eq!(config.unwrap().dialect(), Some("basic"));
}

#[test]
#[serial]
fn test_env_diagnostics_json() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();

    env::set_var("PUNY_DIAGNOSTICS", "json");
    let config = ConfigLoader::new().load_from_directory(temp_dir.path());
    clear_env();

    assert_eq!(config.unwrap().diagnostic_format(), DiagnosticFormat::Json);
}

#[test]
#[serial]
fn test_invalid_env_dialect_is_rejected() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();

    env::set_var("PUNY_DIALECT", "lisp");
    let result = ConfigLoader::new().load_from_directory(temp_dir.path());
    clear_env();

    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue { ref field, .. }) if field == "PUNY_DIALECT"
    ));
}

#[test]
#[serial]
fn test_without_env_ignores_overrides() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();

    env::set_var("PUNY_DIALECT", "basic");
    let config = ConfigLoader::new()
        .without_env()
        .load_from_directory(temp_dir.path());
    clear_env();

    assert_eq!(config.unwrap().dialect(), None);
}
