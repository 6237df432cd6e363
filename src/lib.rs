//! leetmouse tools
//!
//! Userspace companions of the leetmouse kernel driver: an egui window for
//! editing the driver's module parameters, and the input lag benchmark
//! report comparing the driver against hid-generic.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Driver parameter set
//! - **driver**: Reading and writing the driver's module parameters
//! - **config**: Application settings and parameter profiles
//! - **ui**: Widget model, event hooks, linked fields and the egui window
//! - **bench**: Benchmark CSV loading, report and chart
//! - **log_collector**: Backend for the `log` facade

pub mod error;
pub mod models;

pub mod driver;

pub mod config;

pub mod ui;

pub mod bench;

pub mod log_collector;

// Re-export the log crate for macro usage
pub use log;

pub use log_collector::{LogCollector, LogLine};

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use error::{AppError, ConfigError, HookError, ParamError, ReportError, Result};

pub use models::{DriverParams, Param, ALL_PARAMS};

pub use driver::{open_store, MemoryStore, ParamStore, StartupStore, SysFsStore};

pub use config::{AppSettings, BenchSettings, SettingsManager};

pub use ui::{FieldConsistencyController, HookRegistry, LinkedFieldPair, ParameterForm};

pub use bench::{BenchmarkReport, ReportSources};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert_eq!(VERSION, "0.1.0");
    }

    #[test]
    fn test_error_reexport() {
        let _: Result<i32> = Ok(42);
    }
}
