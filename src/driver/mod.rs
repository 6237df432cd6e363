//! Driver parameter store
//!
//! The leetmouse kernel module exposes each parameter as a writable string
//! under `/sys/module/leetmouse/parameters/<name>`. `SysFsStore` reads and
//! writes those files; `MemoryStore` keeps values in memory for tests and for
//! running the GUI without the module loaded.

use crate::error::ParamError;
use crate::models::{DriverParams, Param, ALL_PARAMS};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const SYS_MODULE_PARAMS: &str = "/sys/module/leetmouse/parameters";

/// Reject values the driver cannot use before they reach it
pub fn validate_param_value(param: Param, value: f64) -> Result<(), ParamError> {
    let out_of_range = |constraint: &'static str| ParamError::OutOfRange {
        name: param.name().to_string(),
        value,
        constraint,
    };
    if !value.is_finite() {
        return Err(out_of_range("must be finite"));
    }
    let (min, max) = param.range();
    if value < min {
        return Err(out_of_range(if param.must_be_positive() {
            "must be >= 0.0001"
        } else {
            "must be >= 0"
        }));
    }
    if value > max {
        return Err(out_of_range("must be <= 1000"));
    }
    Ok(())
}

pub trait ParamStore: std::fmt::Debug {
    fn get(&self, param: Param) -> Result<f64, ParamError>;
    fn set(&mut self, param: Param, value: f64) -> Result<(), ParamError>;

    /// Read every parameter. A value outside its range is an error, never
    /// something the form would silently clamp.
    fn load_all(&self) -> Result<DriverParams, ParamError> {
        let mut params = DriverParams::default();
        for &param in ALL_PARAMS {
            let value = self.get(param)?;
            validate_param_value(param, value)?;
            params.set(param, value);
        }
        Ok(params)
    }

    /// Write every parameter, all or nothing.
    ///
    /// The whole set is validated and the current values are read before the
    /// first write. If a write fails, the parameters already written are put
    /// back to the values read and the write error is returned.
    fn apply_all(&mut self, params: &DriverParams) -> Result<(), ParamError> {
        for &param in ALL_PARAMS {
            validate_param_value(param, params.get(param))?;
        }
        let snapshot = ALL_PARAMS
            .iter()
            .map(|&param| self.get(param))
            .collect::<Result<Vec<f64>, ParamError>>()?;

        for (i, &param) in ALL_PARAMS.iter().enumerate() {
            if let Err(e) = self.set(param, params.get(param)) {
                log::error!(
                    "[Driver] writing {} failed, restoring {} written parameters: {}",
                    param,
                    i,
                    e
                );
                for (&written, &previous) in ALL_PARAMS[..i].iter().zip(&snapshot) {
                    if let Err(restore) = self.set(written, previous) {
                        log::error!("[Driver] could not restore {}: {}", written, restore);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

/// The store the GUI edits and the values it starts from
#[derive(Debug)]
pub struct StartupStore {
    pub store: Box<dyn ParamStore>,
    pub params: DriverParams,
    /// False when the driver could not be read and edits stay in memory
    pub live: bool,
    /// Why the store is offline
    pub error: Option<ParamError>,
}

/// Open the driver's parameters under `root`.
///
/// Only a complete, valid read gives a live store. A missing module or any
/// failed read falls back to an in-memory store holding the defaults, so
/// Apply can never push defaults over values that were never read.
pub fn open_store(root: impl Into<PathBuf>) -> StartupStore {
    let sysfs = SysFsStore::new(root);
    let result = sysfs.ensure_loaded().and_then(|()| sysfs.load_all());
    match result {
        Ok(params) => {
            log::info!("[Driver] read parameters from {}", sysfs.root().display());
            StartupStore {
                store: Box::new(sysfs),
                params,
                live: true,
                error: None,
            }
        }
        Err(e) => {
            log::warn!(
                "[Driver] {} unusable, editing offline defaults: {}",
                sysfs.root().display(),
                e
            );
            let params = DriverParams::default();
            StartupStore {
                store: Box::new(MemoryStore::with_params(&params)),
                params,
                live: false,
                error: Some(e),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SysFsStore {
    root: PathBuf,
}

impl Default for SysFsStore {
    fn default() -> Self {
        Self::new(SYS_MODULE_PARAMS)
    }
}

impl SysFsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SysFsStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_loaded(&self) -> bool {
        self.root.is_dir()
    }

    fn ensure_loaded(&self) -> Result<(), ParamError> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(ParamError::ModuleNotLoaded(self.root.display().to_string()))
        }
    }
}

impl ParamStore for SysFsStore {
    fn get(&self, param: Param) -> Result<f64, ParamError> {
        self.ensure_loaded()?;
        let raw = fs::read_to_string(self.root.join(param.name()))?;
        let raw = raw.trim();
        raw.parse::<f64>().map_err(|_| ParamError::InvalidValue {
            name: param.name().to_string(),
            value: raw.to_string(),
        })
    }

    fn set(&mut self, param: Param, value: f64) -> Result<(), ParamError> {
        validate_param_value(param, value)?;
        self.ensure_loaded()?;
        fs::write(self.root.join(param.name()), value.to_string())?;
        log::info!("[Driver] {} = {}", param.name(), value);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<Param, f64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: &DriverParams) -> Self {
        MemoryStore {
            values: ALL_PARAMS.iter().map(|&p| (p, params.get(p))).collect(),
        }
    }
}

impl ParamStore for MemoryStore {
    fn get(&self, param: Param) -> Result<f64, ParamError> {
        Ok(self
            .values
            .get(&param)
            .copied()
            .unwrap_or_else(|| DriverParams::default().get(param)))
    }

    fn set(&mut self, param: Param, value: f64) -> Result<(), ParamError> {
        validate_param_value(param, value)?;
        self.values.insert(param, value);
        Ok(())
    }
}
