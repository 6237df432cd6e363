//! Configuration module
//!
//! - `AppSettings`: application settings persisted as JSON
//!   (`~/.config/leetmouse/settings.json`)
//! - `SettingsManager`: load/save with graceful fallback to defaults
//! - `profiles`: TOML export/import of complete driver parameter sets

pub mod profiles;

use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable overriding `AppSettings::log_level`
pub const LOG_LEVEL_ENV: &str = "LEETMOUSE_LOG";

/// Shortest keep-alive tick; smaller settings values are raised to this
pub const MIN_KEEP_ALIVE_INTERVAL_MS: u64 = 10;

/// Benchmark input locations and expectations
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BenchSettings {
    /// Stock hid-generic driver samples
    pub control_path: String,
    /// Previous usbmouse-based driver samples
    pub old_path: String,
    /// Input-handler driver samples (with per-stage timestamps)
    pub new_path: String,
    pub expected_samples: usize,
}

impl Default for BenchSettings {
    fn default() -> Self {
        BenchSettings {
            control_path: "control.csv".to_string(),
            old_path: "usbmouse.csv".to_string(),
            new_path: "input_handler.csv".to_string(),
            expected_samples: 1000,
        }
    }
}

/// Application settings
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Directory holding the driver's module parameters
    pub sysfs_root: String,
    /// One of off/error/warn/info/debug/trace
    pub log_level: String,
    /// Directory for session log files (relative to the working directory)
    pub log_dir: String,
    pub window_width: f32,
    pub window_height: f32,
    pub keep_alive_interval_ms: u64,
    /// Last directory used for profile import/export
    pub last_profile_dir: String,
    pub bench: BenchSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            sysfs_root: crate::driver::SYS_MODULE_PARAMS.to_string(),
            log_level: "info".to_string(),
            log_dir: "logs".to_string(),
            window_width: 520.0,
            window_height: 640.0,
            keep_alive_interval_ms: 50,
            last_profile_dir: String::new(),
            bench: BenchSettings::default(),
        }
    }
}

impl AppSettings {
    /// Effective log level: `LEETMOUSE_LOG` first, then the settings value.
    /// Unparseable values fall back to `Info`.
    pub fn effective_log_level(&self) -> log::LevelFilter {
        let raw = std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| self.log_level.clone());
        parse_level(&raw)
    }

    pub fn keep_alive_interval(&self) -> Duration {
        Duration::from_millis(self.keep_alive_interval_ms.max(MIN_KEEP_ALIVE_INTERVAL_MS))
    }

    /// Raise values the application cannot run with to their minimum
    pub fn normalized(mut self) -> Self {
        if self.keep_alive_interval_ms < MIN_KEEP_ALIVE_INTERVAL_MS {
            log::warn!(
                "[Config] keep_alive_interval_ms {} too small, using {}",
                self.keep_alive_interval_ms,
                MIN_KEEP_ALIVE_INTERVAL_MS
            );
            self.keep_alive_interval_ms = MIN_KEEP_ALIVE_INTERVAL_MS;
        }
        self
    }
}

pub fn parse_level(raw: &str) -> log::LevelFilter {
    log::LevelFilter::from_str(raw.trim()).unwrap_or(log::LevelFilter::Info)
}

/// Settings persistence
pub struct SettingsManager;

impl SettingsManager {
    /// ~/.config/leetmouse/settings.json
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::ValidationFailed("Cannot determine config directory".to_string())
        })?;
        Ok(config_dir.join("leetmouse").join("settings.json"))
    }

    /// Load settings from the default location
    pub fn load() -> Result<AppSettings, ConfigError> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load settings, or defaults if the file is missing.
    ///
    /// A file that exists but does not parse is logged and replaced by
    /// defaults instead of failing startup.
    pub fn load_from(path: &Path) -> Result<AppSettings, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<AppSettings>(&content) {
                Ok(settings) => Ok(settings.normalized()),
                Err(e) => {
                    log::warn!(
                        "[Config] Failed to parse {}, falling back to defaults: {}",
                        path.display(),
                        e
                    );
                    Ok(AppSettings::default())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppSettings::default()),
            Err(e) => Err(ConfigError::IoError(e)),
        }
    }

    pub fn save(settings: &AppSettings) -> Result<(), ConfigError> {
        Self::save_to(&Self::default_path()?, settings)
    }

    pub fn save_to(path: &Path, settings: &AppSettings) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), log::LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), log::LevelFilter::Warn);
        assert_eq!(parse_level("loud"), log::LevelFilter::Info);
    }

    #[test]
    fn test_keep_alive_interval_has_floor() {
        let settings = AppSettings {
            keep_alive_interval_ms: 0,
            ..AppSettings::default()
        };
        assert_eq!(settings.keep_alive_interval(), Duration::from_millis(10));
        assert_eq!(settings.normalized().keep_alive_interval_ms, 10);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"log_level":"debug","bench":{"expected_samples":500}}"#)
                .unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.bench.expected_samples, 500);
        assert_eq!(settings.bench.control_path, "control.csv");
        assert_eq!(settings.keep_alive_interval_ms, 50);
    }
}
