//! Input lag benchmark report
//!
//! Loads the three lag captures (hid-generic, old usbmouse driver, new
//! input-handler driver), prints each mean and the input-handler per-stage
//! lag, then opens the comparison chart.
//!
//! Usage: cargo run --bin bench_report -- [--control control.csv] [--old usbmouse.csv]
//!        [--new input_handler.csv] [--samples 1000] [--no-plot]

use anyhow::Context;
use clap::Parser;
use leetmouse::bench::{show_report, BenchmarkReport, ReportSources};
use leetmouse::config::parse_level;
use leetmouse::{LogCollector, SettingsManager};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bench_report", version, about = "Compare leetmouse input lag captures")]
struct Args {
    /// hid-generic capture (defaults to the settings file value)
    #[arg(long)]
    control: Option<PathBuf>,

    /// Old usbmouse driver capture
    #[arg(long)]
    old: Option<PathBuf>,

    /// Input-handler driver capture, with per-stage timestamps
    #[arg(long)]
    new: Option<PathBuf>,

    /// Exact number of samples each capture must hold (at least 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    samples: Option<u64>,

    /// Settings file to read defaults from
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Print the summary without opening the chart
    #[arg(long)]
    no_plot: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let collector = LogCollector::new(None, parse_level(&args.log_level), true, None)
        .map_err(anyhow::Error::msg)?;
    if let Err(e) = collector.install() {
        eprintln!("[bench_report] WARNING: {}", e);
    }

    let settings = match &args.settings {
        Some(path) => SettingsManager::load_from(path),
        None => SettingsManager::load(),
    }
    .context("failed to load settings")?;

    let mut sources = ReportSources::from(&settings.bench);
    if let Some(path) = args.control {
        sources.control = path;
    }
    if let Some(path) = args.old {
        sources.old = path;
    }
    if let Some(path) = args.new {
        sources.new = path;
    }
    if let Some(n) = args.samples {
        sources.expected_samples = usize::try_from(n).context("--samples too large")?;
    }

    let report = BenchmarkReport::load(&sources).context("benchmark data rejected, no chart drawn")?;

    for line in &report.lines {
        println!("{}", line.legend());
    }
    println!("{}", report.summary());
    let _ = collector.wait_for_empty();

    if !args.no_plot {
        show_report(report).map_err(|e| anyhow::anyhow!("chart window failed: {}", e))?;
    }
    Ok(())
}
