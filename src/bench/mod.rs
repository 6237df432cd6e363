//! Input lag benchmark report
//!
//! - `series`: CSV loading and column validation
//! - `report`: per-driver means and the input-handler stage breakdown
//! - `viewer`: egui_plot comparison chart

pub mod report;
pub mod series;
pub mod viewer;

pub use report::{BenchmarkReport, ReportLine, ReportSources, SourceKind};
pub use series::{mean, BenchmarkSeries, BenchmarkTable};
pub use viewer::{show_report, ReportViewer};
