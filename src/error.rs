//! Unified error type hierarchy for leetmouse tools
//!
//! Provides structured error handling with HookError, ReportError, ParamError,
//! ConfigError, and AppError.

use std::io;
use thiserror::Error;

/// Widget wiring errors. These are programming mistakes, not runtime conditions,
/// and abort window setup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HookError {
    #[error("Widget '{0}' does not exist")]
    WidgetNotFound(String),

    #[error("{widget_type} '{widget}' has no event '{event}'")]
    EventNotFound {
        widget: String,
        widget_type: String,
        event: String,
    },

    #[error("Callback for '{widget}.{event}' does not match its accessor (value callbacks need one, plain callbacks must not have one)")]
    CallbackArity { widget: String, event: String },
}

/// Benchmark report input errors.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid benchmark data in {source_name}: {reason}")]
    DataFormat { source_name: String, reason: String },

    #[error("CSV error in {source_name}: {error}")]
    Csv {
        source_name: String,
        #[source]
        error: csv::Error,
    },

    #[error("IO error reading benchmark data: {0}")]
    Io(#[from] io::Error),
}

impl ReportError {
    pub fn data_format(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::DataFormat {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}

/// Driver parameter store errors.
#[derive(Error, Debug)]
pub enum ParamError {
    #[error("Driver module not loaded (no parameters at {0})")]
    ModuleNotLoaded(String),

    #[error("Parameter '{name}' has an invalid value: '{value}'")]
    InvalidValue { name: String, value: String },

    #[error("Parameter '{name}' out of range: {value} ({constraint})")]
    OutOfRange {
        name: String,
        value: f64,
        constraint: &'static str,
    },

    #[error("IO error accessing driver parameter: {0}")]
    IoError(#[from] io::Error),
}

/// Configuration file parsing and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid TOML profile: {0}")]
    InvalidToml(#[from] toml::de::Error),

    #[error("Failed to serialize profile: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Global error type for the binaries
///
/// Provides unified error categorization and user-facing messages for the
/// GUI status line and the report CLI.
#[derive(Error, Debug, Clone)]
pub enum AppError {
    /// Widget wiring failed
    #[error("UI wiring error: {0}")]
    Wiring(String),

    /// Driver parameters could not be read or written
    #[error("Driver parameter error: {0}")]
    Driver(String),

    /// Benchmark data was unusable
    #[error("Benchmark data error: {0}")]
    Report(String),

    /// Settings or profile persist/deserialize error
    #[error("Settings error: {0}")]
    Settings(String),

    /// File I/O error (read/write/delete)
    #[error("I/O error: {0}")]
    Io(String),
}

impl AppError {
    /// Get a user-facing error message suitable for UI display
    pub fn user_message(&self) -> String {
        match self {
            AppError::Wiring(msg) => format!("The window could not be set up: {}", msg),
            AppError::Driver(msg) => format!("Could not talk to the leetmouse driver: {}", msg),
            AppError::Report(msg) => format!("Benchmark data rejected: {}", msg),
            AppError::Settings(msg) => format!("Settings error: {}", msg),
            AppError::Io(msg) => format!("File operation failed: {}", msg),
        }
    }
}

impl From<HookError> for AppError {
    fn from(e: HookError) -> Self {
        AppError::Wiring(e.to_string())
    }
}

impl From<ParamError> for AppError {
    fn from(e: ParamError) -> Self {
        AppError::Driver(e.to_string())
    }
}

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        AppError::Report(e.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Settings(e.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(e: io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

/// Top-level result type for operations that may fail.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
