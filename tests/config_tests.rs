//! Settings and profile persistence tests

use leetmouse::config::profiles::{load_profile, save_profile};
use leetmouse::config::{AppSettings, SettingsManager, MIN_KEEP_ALIVE_INTERVAL_MS};
use leetmouse::error::ConfigError;
use leetmouse::models::DriverParams;
use leetmouse::ui::form::{ParameterForm, ENABLE_PRE_SCALE_Y};

#[test]
fn test_settings_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let mut settings = AppSettings::default();
    settings.log_level = "debug".to_string();
    settings.bench.new_path = "captures/input_handler.csv".to_string();
    SettingsManager::save_to(&path, &settings).unwrap();

    let loaded = SettingsManager::load_from(&path).unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn test_missing_settings_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let loaded = SettingsManager::load_from(&dir.path().join("settings.json")).unwrap();
    assert_eq!(loaded, AppSettings::default());
}

#[test]
fn test_corrupt_settings_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ this is not json").unwrap();

    let loaded = SettingsManager::load_from(&path).unwrap();
    assert_eq!(loaded, AppSettings::default());
}

#[test]
fn test_profile_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rival600.toml");

    let params = DriverParams {
        sensitivity: 0.85,
        acceleration: 0.26,
        sens_cap: 4.0,
        pre_scale_x: 0.0333333,
        pre_scale_y: 0.0333333,
        post_scale_x: 0.4,
        post_scale_y: 0.4,
        scrolls_per_tick: 5.0,
        ..DriverParams::default()
    };
    save_profile(&path, &params).unwrap();
    assert_eq!(load_profile(&path).unwrap(), params);
}

#[test]
fn test_missing_profile() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_profile(&dir.path().join("gone.toml")),
        Err(ConfigError::FileNotFound(_))
    ));
}

#[test]
fn test_malformed_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "sensitivity = \"fast\"\n").unwrap();
    assert!(matches!(load_profile(&path), Err(ConfigError::InvalidToml(_))));
}

#[test]
fn test_imported_profile_reaches_form_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("split.toml");
    std::fs::write(&path, "speed_cap = 150.0\npre_scale_x = 150.0\npre_scale_y = 200.0\n").unwrap();

    let params = load_profile(&path).unwrap();
    let form = ParameterForm::build(&params).unwrap();
    assert_eq!(form.params(), params);
    assert!(form.is_checked(ENABLE_PRE_SCALE_Y));
}

#[test]
fn test_zero_keep_alive_interval_is_raised() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "keep_alive_interval_ms": 0, "log_level": "debug" }"#).unwrap();

    let loaded = SettingsManager::load_from(&path).unwrap();
    assert_eq!(loaded.keep_alive_interval_ms, MIN_KEEP_ALIVE_INTERVAL_MS);
    assert_eq!(loaded.log_level, "debug");
}
