//! Benchmark report: the three driver series, their means, and the per-stage
//! lag of the input-handler driver.

use crate::bench::series::{
    BenchmarkSeries, BenchmarkTable, DIFF, EVENT_TIME, READ_TIME, VIRTUAL_EVENT_TIME,
};
use crate::config::BenchSettings;
use crate::error::ReportError;
use std::path::{Path, PathBuf};

/// Which driver a series was measured on. Fixes the legend text and colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Stock hid-generic driver
    Control,
    /// Previous usbmouse-based driver
    Old,
    /// Input-handler driver
    New,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Control => "Hid-generic",
            SourceKind::Old => "Old driver",
            SourceKind::New => "New driver",
        }
    }

    /// RGB line colour (blue / red / green)
    pub fn rgb(self) -> [u8; 3] {
        match self {
            SourceKind::Control => [0, 0, 255],
            SourceKind::Old => [255, 0, 0],
            SourceKind::New => [0, 128, 0],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportSources {
    pub control: PathBuf,
    pub old: PathBuf,
    pub new: PathBuf,
    pub expected_samples: usize,
}

impl From<&BenchSettings> for ReportSources {
    fn from(settings: &BenchSettings) -> Self {
        ReportSources {
            control: PathBuf::from(&settings.control_path),
            old: PathBuf::from(&settings.old_path),
            new: PathBuf::from(&settings.new_path),
            expected_samples: settings.expected_samples,
        }
    }
}

/// One plotted line
#[derive(Debug, Clone)]
pub struct ReportLine {
    pub kind: SourceKind,
    pub series: BenchmarkSeries,
    pub mean: f64,
}

impl ReportLine {
    fn new(kind: SourceKind, series: BenchmarkSeries) -> Self {
        let mean = series.mean();
        ReportLine { kind, series, mean }
    }

    /// Legend entry, e.g. `Hid-generic (mean = 1042.317us)`
    pub fn legend(&self) -> String {
        format!("{} (mean = {}us)", self.kind.label(), self.mean)
    }

    /// (sample index, lag) points
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.series
            .samples()
            .iter()
            .enumerate()
            .map(|(i, &v)| [i as f64, v])
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub lines: Vec<ReportLine>,
    /// mean(virtual_event_time - event_time) of the new driver
    pub source_to_virtual_us: f64,
    /// mean(read_time - virtual_event_time) of the new driver
    pub virtual_to_read_us: f64,
}

impl BenchmarkReport {
    /// Load and validate all three files. Every file is checked before a
    /// report exists, so a rejected input never produces a partial chart.
    pub fn load(sources: &ReportSources) -> Result<Self, ReportError> {
        let n = sources.expected_samples;
        if n == 0 {
            return Err(ReportError::data_format(
                sources.new.display().to_string(),
                "expected sample count must be at least 1",
            ));
        }
        let control = load_table(&sources.control, &[DIFF], n)?;
        let old = load_table(&sources.old, &[DIFF], n)?;
        let new = load_table(
            &sources.new,
            &[DIFF, VIRTUAL_EVENT_TIME, EVENT_TIME, READ_TIME],
            n,
        )?;
        Self::from_tables(&control, &old, &new)
    }

    pub fn from_tables(
        control: &BenchmarkTable,
        old: &BenchmarkTable,
        new: &BenchmarkTable,
    ) -> Result<Self, ReportError> {
        let lines = vec![
            ReportLine::new(SourceKind::Control, control.series(DIFF, control.source())?),
            ReportLine::new(SourceKind::Old, old.series(DIFF, old.source())?),
            ReportLine::new(SourceKind::New, new.series(DIFF, new.source())?),
        ];
        let report = BenchmarkReport {
            lines,
            source_to_virtual_us: new.mean_difference(VIRTUAL_EVENT_TIME, EVENT_TIME)?,
            virtual_to_read_us: new.mean_difference(READ_TIME, VIRTUAL_EVENT_TIME)?,
        };
        for line in &report.lines {
            log::info!("[Bench] {}", line.legend());
        }
        Ok(report)
    }

    pub fn line(&self, kind: SourceKind) -> Option<&ReportLine> {
        self.lines.iter().find(|l| l.kind == kind)
    }

    /// The two per-stage figures, one per line
    pub fn summary(&self) -> String {
        format!(
            "average lag between source and virtual device: {}\n\
             average lag between virtual device and read: {}",
            self.source_to_virtual_us, self.virtual_to_read_us
        )
    }
}

fn load_table(path: &Path, required: &[&str], expected: usize) -> Result<BenchmarkTable, ReportError> {
    log::info!("[Bench] loading {}", path.display());
    BenchmarkTable::load(path, required, expected)
}
