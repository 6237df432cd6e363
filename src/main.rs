use std::path::PathBuf;
use tokio::sync::mpsc;

use leetmouse::driver::{open_store, StartupStore};
use leetmouse::ui::{KeepAlive, LeetmouseApp, ParameterForm};
use leetmouse::{LogCollector, LogLine, SettingsManager};

#[tokio::main]
async fn main() -> leetmouse::Result<()> {
    // =========================================================================
    // SETTINGS
    // =========================================================================
    let settings = match SettingsManager::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("[Main] WARNING: could not load settings, using defaults: {}", e);
            Default::default()
        }
    };

    // =========================================================================
    // LOGGING - BEFORE ANYTHING THAT LOGS
    // =========================================================================
    let (log_ui_tx, log_ui_rx) = mpsc::channel::<LogLine>(1024);
    let log_dir = PathBuf::from(&settings.log_dir);
    let log_collector = LogCollector::new(
        Some(&log_dir),
        settings.effective_log_level(),
        true,
        Some(log_ui_tx),
    )
    .map_err(|e| format!("LogCollector initialization failed: {}", e))?;
    if let Err(e) = log_collector.install() {
        eprintln!("[Main] WARNING: {}", e);
    }
    log::info!("leetmouse {} starting", leetmouse::VERSION);

    // =========================================================================
    // DRIVER PARAMETERS
    // =========================================================================
    let StartupStore {
        store,
        params,
        error: store_error,
        ..
    } = open_store(&settings.sysfs_root);

    // Wiring errors abort here, before a window exists.
    let form = ParameterForm::build(&params).map_err(|e| {
        log::error!("[Main] form wiring failed: {}", e);
        let _ = log_collector.wait_for_empty();
        e
    })?;

    // =========================================================================
    // KEEP-ALIVE WORKER
    // =========================================================================
    let keep_alive = KeepAlive::spawn(settings.keep_alive_interval());

    // =========================================================================
    // LAUNCH EGUI
    // =========================================================================
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height]),
        ..Default::default()
    };
    let mut app = LeetmouseApp::new(form, store, settings, Some(log_ui_rx));
    if let Some(e) = store_error {
        app.report_offline(&e);
    }
    let result = eframe::run_native("leetmouse", options, Box::new(move |_cc| Box::new(app)));

    // =========================================================================
    // SHUTDOWN
    // =========================================================================
    keep_alive.stop().await;
    log::info!("leetmouse shutting down");
    if let Err(e) = log_collector.wait_for_empty() {
        eprintln!("[Main] WARNING: Failed to flush logs: {}", e);
    }

    result.map_err(|e| e.into())
}
