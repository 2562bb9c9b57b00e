//! Integration tests for configuration loading

use fitlog_cli::config::{AppConfig, LogFormat};
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_without_files_uses_defaults() {
    let config = AppConfig::load(None).unwrap();
    assert_eq!(config.calories.default_body_weight_kg, 70.0);
    assert_eq!(config.calendar.streak_cap, 30);
}

#[test]
fn test_config_file_overrides_defaults() {
    let file = write_config(
        r#"
[calories]
default_body_weight_kg = 82.5
strength_intensity_adjustment = true

[calendar]
streak_cap = 60

[dashboard]
selected_widgets = ["latest_weight", "total_workouts"]

[logging]
format = "json"
"#,
    );

    let config = AppConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.calories.default_body_weight_kg, 82.5);
    assert!(config.calories.strength_intensity_adjustment);
    // untouched keys keep their defaults
    assert_eq!(config.calories.strength_seconds_per_set, 600);
    assert_eq!(config.calendar.streak_cap, 60);
    assert_eq!(config.dashboard.selected_widgets, vec!["latest_weight", "total_workouts"]);
    assert_eq!(config.dashboard.max_widgets, 4);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = AppConfig::load(Some(&missing)).unwrap_err();
    assert!(err.to_string().contains("nope.toml"));
}
