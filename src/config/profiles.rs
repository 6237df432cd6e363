//! Driver parameter profiles (TOML)
//!
//! A profile is one complete `DriverParams` set:
//!
//! ```toml
//! sensitivity = 0.85
//! acceleration = 0.26
//! pre_scale_x = 0.0333
//! pre_scale_y = 0.0333
//! ```
//!
//! Missing keys take the driver defaults.

use crate::driver::validate_param_value;
use crate::error::ConfigError;
use crate::models::{DriverParams, ALL_PARAMS};
use std::fs;
use std::path::Path;

/// Profile files must be non-empty paths with a .toml extension
pub fn validate_profile_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationFailed(
            "Profile path cannot be empty".to_string(),
        ));
    }
    match path.extension() {
        Some(ext) if ext == "toml" => Ok(()),
        Some(ext) => Err(ConfigError::ValidationFailed(format!(
            "Profile file must have .toml extension, got .{}",
            ext.to_string_lossy()
        ))),
        None => Err(ConfigError::ValidationFailed(
            "Profile file must have .toml extension".to_string(),
        )),
    }
}

pub fn parse_profile(content: &str) -> Result<DriverParams, ConfigError> {
    let params: DriverParams = toml::from_str(content)?;
    for &param in ALL_PARAMS {
        validate_param_value(param, params.get(param))
            .map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;
    }
    Ok(params)
}

pub fn load_profile(path: &Path) -> Result<DriverParams, ConfigError> {
    validate_profile_path(path)?;
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.display().to_string())
        } else {
            ConfigError::IoError(e)
        }
    })?;
    let params = parse_profile(&content)?;
    log::info!("[Profiles] loaded {}", path.display());
    Ok(params)
}

pub fn save_profile(path: &Path, params: &DriverParams) -> Result<(), ConfigError> {
    validate_profile_path(path)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, toml::to_string_pretty(params)?)?;
    log::info!("[Profiles] saved {}", path.display());
    Ok(())
}
