//! Integration tests for Settings loading with an explicit config file.
//!
//! These tests never set INORDER_* variables; see config_env_test.rs.

use std::fs;

use rstest::rstest;
use tempfile::TempDir;

use inorder_viz::config::Settings;
use inorder_viz::domain::Theme;

#[test]
fn given_explicit_config_when_load_then_overrides_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inorder.toml");
    fs::write(
        &path,
        r#"
theme = "dark"
step_delay_ms = 250

[layout]
spacing = 100.0

[random]
pool = [10, 20, 30]
seed = 5
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.theme, Theme::Dark);
    assert_eq!(settings.step_delay_ms, 250);
    assert_eq!(settings.layout.spacing, 100.0);
    assert_eq!(settings.layout.root_x, 300.0, "unspecified field keeps default");
    assert_eq!(settings.random.pool, vec![10, 20, 30]);
    assert_eq!(settings.random.seed, Some(5));
    assert_eq!(settings.random.max_depth, 3);
}

#[test]
fn given_missing_explicit_config_when_load_then_errors() {
    let dir = TempDir::new().unwrap();

    let result = Settings::load(Some(&dir.path().join("absent.toml")));

    assert!(result.is_err());
}

#[test]
fn given_malformed_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "theme = [\n").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("config error"), "{err}");
}

#[test]
fn given_invalid_values_when_load_then_validation_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("invalid.toml");
    fs::write(&path, "[random]\nbranch_probability = 1.5\n").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("branch probability"), "{err}");
}

#[test]
fn given_settings_when_serializing_then_round_trips_through_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("shown.toml");
    let mut original = Settings::default();
    original.theme = Theme::Dark;
    original.random.seed = Some(77);

    fs::write(&path, original.to_toml().unwrap()).unwrap();
    let loaded = Settings::load(Some(&path)).unwrap();

    assert_eq!(loaded, original);
}

#[rstest]
#[case::infinite_spacing("[layout]\nspacing = inf\n", "layout.spacing")]
#[case::huge_spacing("[layout]\nspacing = 1e20\n", "layout.spacing")]
#[case::nan_spacing("[layout]\nspacing = nan\n", "layout.spacing")]
#[case::tiny_vertical_step("[layout]\nvertical_step = 1e-300\n", "layout.vertical_step")]
#[case::infinite_vertical_step("[layout]\nvertical_step = inf\n", "layout.vertical_step")]
fn given_undrawable_layout_when_load_then_rejected(#[case] content: &str, #[case] field: &str) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("layout.toml");
    fs::write(&path, content).unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(err.to_string().contains(field), "{err}");
}

#[test]
fn given_in_memory_settings_with_infinite_spacing_when_validate_then_error() {
    let mut settings = Settings::default();
    settings.layout.spacing = f64::INFINITY;

    assert!(settings.validate().is_err());
}
