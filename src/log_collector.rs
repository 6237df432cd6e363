//! Decoupled logging backend for the `log` facade.
//!
//! # Architecture
//!
//! ```text
//! log::info!() / log::warn!() ...
//!     |
//! [LogCollector] (implements log::Log, never blocks the caller)
//!     | (crossbeam unbounded channel)
//! [writer thread]
//!     |-- logs/<timestamp>.log   (when a log dir is configured)
//!     |-- stderr                 (when echo is on)
//!     `-- UI channel             (try_send, dropped when full)
//! ```
//!
//! `wait_for_empty()` pushes a flush marker through the same channel and
//! returns once every earlier line has been written.

use chrono::Local;
use crossbeam_channel::{unbounded, Sender};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Internal log line or special marker
enum LogMessage {
    Line(LogLine),
    /// Flush marker with channel sender to signal completion
    Flush(std::sync::mpsc::Sender<()>),
}

/// A log line with metadata
#[derive(Clone, Debug)]
pub struct LogLine {
    pub level: Level,
    pub message: String,
    /// Wall clock time of the record, HH:MM:SS.mmm
    pub timestamp: String,
}

impl LogLine {
    pub fn new(level: Level, message: String) -> Self {
        LogLine {
            level,
            message,
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }

    pub fn formatted(&self) -> String {
        format!("[{}] [{}] {}", self.timestamp, self.level, self.message)
    }
}

/// Ensure the log directory exists
pub fn ensure_logs_dir_exists(log_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("Failed to create logs directory: {}", e))
}

/// Unified logger that handles disk, stderr and UI dispatch
#[derive(Clone)]
pub struct LogCollector {
    tx: Sender<LogMessage>,
    level: LevelFilter,
    session_path: Option<PathBuf>,
}

impl LogCollector {
    /// Create a collector and its writer thread.
    ///
    /// With `log_dir` set, a new `<timestamp>.log` session file is created
    /// there. `ui_tx` receives a copy of every line for in-window display.
    pub fn new(
        log_dir: Option<&Path>,
        level: LevelFilter,
        echo_stderr: bool,
        ui_tx: Option<tokio::sync::mpsc::Sender<LogLine>>,
    ) -> Result<Self, String> {
        let mut file: Option<File> = None;
        let mut session_path = None;
        if let Some(dir) = log_dir {
            ensure_logs_dir_exists(dir)?;
            let path = dir.join(format!("{}.log", Local::now().format("%Y%m%d_%H%M%S")));
            let handle = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))?;
            file = Some(handle);
            session_path = Some(path);
        }

        let (tx, rx) = unbounded::<LogMessage>();

        // OS thread, not a tokio task: records arrive from the egui thread,
        // tokio workers and plain threads alike.
        std::thread::spawn(move || {
            while let Ok(msg) = rx.recv() {
                match msg {
                    LogMessage::Line(line) => {
                        let formatted = line.formatted();
                        if let Some(f) = file.as_mut() {
                            let _ = writeln!(f, "{}", formatted);
                        }
                        if echo_stderr {
                            eprintln!("{}", formatted);
                        }
                        if let Some(ui) = ui_tx.as_ref() {
                            let _ = ui.try_send(line);
                        }
                    }
                    LogMessage::Flush(done) => {
                        if let Some(f) = file.as_mut() {
                            let _ = f.flush();
                        }
                        let _ = done.send(());
                    }
                }
            }
        });

        Ok(LogCollector {
            tx,
            level,
            session_path,
        })
    }

    /// Register a clone of this collector as the global `log` backend
    pub fn install(&self) -> Result<(), String> {
        log::set_boxed_logger(Box::new(self.clone()))
            .map(|()| log::set_max_level(self.level))
            .map_err(|e| format!("Failed to install logger: {}", e))
    }

    /// Path of this session's log file, if writing to disk
    pub fn session_path(&self) -> Option<&Path> {
        self.session_path.as_deref()
    }

    /// Send a line (non-blocking)
    pub fn log_line(&self, line: LogLine) {
        let _ = self.tx.send(LogMessage::Line(line));
    }

    /// Block until every line sent before this call has been written
    pub fn wait_for_empty(&self) -> Result<(), String> {
        let (done_tx, done_rx) = std::sync::mpsc::channel::<()>();
        self.tx
            .send(LogMessage::Flush(done_tx))
            .map_err(|e| format!("Failed to send flush marker: {}", e))?;
        done_rx
            .recv()
            .map_err(|e| format!("Flush signal interrupted: {}", e))
    }
}

impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.log_line(LogLine::new(record.level(), record.args().to_string()));
        }
    }

    fn flush(&self) {
        let _ = self.wait_for_empty();
    }
}
