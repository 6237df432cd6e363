//! Main window
//!
//! eframe::App rendering the parameter form. Spin fields and toggles are drawn
//! from the form's widget state every frame; user edits go back through the
//! form so the linked-field hooks run before the next frame.

use crate::config::{profiles, AppSettings};
use crate::driver::ParamStore;
use crate::error::{AppError, ParamError};
use crate::log_collector::LogLine;
use crate::models::{DriverParams, Param};
use crate::ui::form::{ParameterForm, ENABLE_POST_SCALE_Y, ENABLE_PRE_SCALE_Y};
use eframe::egui;
use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::sync::mpsc;

const LOG_HISTORY: usize = 200;

const ACCEL_PARAMS: &[Param] = &[
    Param::Sensitivity,
    Param::Acceleration,
    Param::SensCap,
    Param::Offset,
    Param::SpeedCap,
    Param::ScrollsPerTick,
];

pub struct LeetmouseApp {
    form: ParameterForm,
    store: Box<dyn ParamStore>,
    settings: AppSettings,
    /// Values last read from or written to the driver
    applied: DriverParams,
    status: Option<String>,
    error: Option<String>,
    log_rx: Option<mpsc::Receiver<LogLine>>,
    log_lines: VecDeque<String>,
}

impl LeetmouseApp {
    pub fn new(
        form: ParameterForm,
        store: Box<dyn ParamStore>,
        settings: AppSettings,
        log_rx: Option<mpsc::Receiver<LogLine>>,
    ) -> Self {
        let applied = form.params();
        LeetmouseApp {
            form,
            store,
            settings,
            applied,
            status: None,
            error: None,
            log_rx,
            log_lines: VecDeque::with_capacity(LOG_HISTORY),
        }
    }

    pub fn form(&self) -> &ParameterForm {
        &self.form
    }

    pub fn is_dirty(&self) -> bool {
        self.form.params() != self.applied
    }

    /// Write the form's values to the driver.
    ///
    /// On failure `applied` is re-read from the store, so the dirty flag
    /// compares against what the driver really holds.
    pub fn apply(&mut self) -> Result<(), AppError> {
        let params = self.form.params();
        if let Err(e) = self.store.apply_all(&params) {
            match self.store.load_all() {
                Ok(current) => self.applied = current,
                Err(read) => log::warn!("[App] could not re-read driver after failed apply: {}", read),
            }
            return Err(e.into());
        }
        self.applied = params;
        log::info!("[App] parameters applied to driver");
        Ok(())
    }

    /// Re-read the driver and rebuild the form from it
    pub fn reload(&mut self) -> Result<(), AppError> {
        let params = self.store.load_all()?;
        self.replace_params(&params)?;
        self.applied = params;
        Ok(())
    }

    /// Rebuild the form from a profile file. Not applied until "Apply".
    pub fn import_profile(&mut self, path: &std::path::Path) -> Result<(), AppError> {
        let params = profiles::load_profile(path)?;
        self.replace_params(&params)?;
        self.remember_dir(path);
        Ok(())
    }

    pub fn export_profile(&mut self, path: &std::path::Path) -> Result<(), AppError> {
        profiles::save_profile(path, &self.form.params())?;
        self.remember_dir(path);
        Ok(())
    }

    /// Show why the driver could not be read; edits stay in this window
    pub fn report_offline(&mut self, error: &ParamError) {
        self.error = Some(format!(
            "{} Editing offline, Apply does not reach the driver.",
            AppError::Driver(error.to_string()).user_message()
        ));
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    fn replace_params(&mut self, params: &DriverParams) -> Result<(), AppError> {
        self.form = ParameterForm::build(params)?;
        Ok(())
    }

    fn remember_dir(&mut self, path: &std::path::Path) {
        if let Some(parent) = path.parent() {
            self.settings.last_profile_dir = parent.to_string_lossy().to_string();
        }
    }

    fn report(&mut self, action: &str, result: Result<(), AppError>) {
        match result {
            Ok(()) => {
                self.status = Some(format!("{} done", action));
                self.error = None;
            }
            Err(e) => {
                log::error!("[App] {} failed: {}", action, e);
                self.error = Some(e.user_message());
                self.status = None;
            }
        }
    }

    fn drain_logs(&mut self) {
        let Some(rx) = self.log_rx.as_mut() else {
            return;
        };
        while let Ok(line) = rx.try_recv() {
            if self.log_lines.len() == LOG_HISTORY {
                self.log_lines.pop_front();
            }
            self.log_lines.push_back(line.formatted());
        }
    }

    fn profile_dialog(&self) -> rfd::FileDialog {
        let dialog = rfd::FileDialog::new().add_filter("leetmouse profile", &["toml"]);
        if self.settings.last_profile_dir.is_empty() {
            dialog
        } else {
            dialog.set_directory(PathBuf::from(&self.settings.last_profile_dir))
        }
    }

    fn render_actions(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let apply = egui::Button::new(if self.is_dirty() { "Apply *" } else { "Apply" });
            if ui.add(apply).clicked() {
                let result = self.apply();
                self.report("Apply", result);
            }
            if ui.button("Reload from driver").clicked() {
                let result = self.reload();
                self.report("Reload", result);
            }
            if ui.button("Import profile...").clicked() {
                if let Some(path) = self.profile_dialog().pick_file() {
                    let result = self.import_profile(&path);
                    self.report("Import", result);
                }
            }
            if ui.button("Export profile...").clicked() {
                if let Some(path) = self.profile_dialog().set_file_name("profile.toml").save_file() {
                    let result = self.export_profile(&path);
                    self.report("Export", result);
                }
            }
        });

        if let Some(err) = &self.error {
            ui.colored_label(egui::Color32::from_rgb(255, 100, 100), err.as_str());
        } else if let Some(status) = &self.status {
            ui.colored_label(egui::Color32::from_rgb(120, 200, 120), status.as_str());
        }
    }
}

fn spin_row(ui: &mut egui::Ui, form: &mut ParameterForm, param: Param) {
    let mut value = form.value(param);
    let (min, max) = form.range(param);
    let enabled = form.is_enabled(param.widget());
    ui.label(param.label());
    let response = ui.add_enabled(
        enabled,
        egui::DragValue::new(&mut value)
            .speed(param.step())
            .clamp_range(min..=max)
            .max_decimals(4),
    );
    if response.changed() {
        form.user_set_value(param, value);
    }
    ui.end_row();
}

fn toggle_row(ui: &mut egui::Ui, form: &mut ParameterForm, widget: &str, text: &str) {
    let mut checked = form.is_checked(widget);
    ui.label("");
    let response = ui.add_enabled(form.is_enabled(widget), egui::Checkbox::new(&mut checked, text));
    if response.changed() {
        form.user_set_checked(widget, checked);
    }
    ui.end_row();
}

fn axis_group(
    ui: &mut egui::Ui,
    form: &mut ParameterForm,
    title: &str,
    x: Param,
    toggle: &str,
    y: Param,
) {
    ui.group(|ui| {
        ui.label(title);
        ui.separator();
        egui::Grid::new(title).num_columns(2).show(ui, |ui| {
            spin_row(ui, form, x);
            toggle_row(ui, form, toggle, "Separate Y value");
            spin_row(ui, form, y);
        });
    });
}

/// Terminal-style log viewer with monospace font
fn terminal_viewport(ui: &mut egui::Ui, lines: &VecDeque<String>) {
    egui::ScrollArea::vertical()
        .max_height(160.0)
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if lines.is_empty() {
                ui.monospace("Awaiting output...");
            }
            for line in lines {
                ui.monospace(line.as_str());
            }
        });
}

impl eframe::App for LeetmouseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_logs();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("leetmouse");
            ui.separator();

            ui.group(|ui| {
                ui.label("Acceleration");
                ui.separator();
                egui::Grid::new("accel").num_columns(2).show(ui, |ui| {
                    for &param in ACCEL_PARAMS {
                        spin_row(ui, &mut self.form, param);
                    }
                });
            });

            axis_group(
                ui,
                &mut self.form,
                "Pre-scale (input DPI)",
                Param::PreScaleX,
                ENABLE_PRE_SCALE_Y,
                Param::PreScaleY,
            );
            axis_group(
                ui,
                &mut self.form,
                "Post-scale",
                Param::PostScaleX,
                ENABLE_POST_SCALE_Y,
                Param::PostScaleY,
            );

            ui.separator();
            self.render_actions(ui);

            ui.separator();
            egui::CollapsingHeader::new("Log").show(ui, |ui| {
                terminal_viewport(ui, &self.log_lines);
            });
        });

        if self.log_rx.is_some() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.is_dirty() {
            log::warn!("[App] closing with unapplied changes");
        }
        if let Err(e) = crate::config::SettingsManager::save(&self.settings) {
            log::warn!("[App] failed to persist settings: {}", e);
        }
        log::info!("[App] window closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MemoryStore;

    fn app_with(params: DriverParams) -> LeetmouseApp {
        let form = ParameterForm::build(&params).unwrap();
        LeetmouseApp::new(
            form,
            Box::new(MemoryStore::with_params(&params)),
            AppSettings::default(),
            None,
        )
    }

    #[test]
    fn test_apply_clears_dirty_flag() {
        let mut app = app_with(DriverParams::default());
        assert!(!app.is_dirty());
        app.form.user_set_value(Param::PostScaleX, 0.4);
        assert!(app.is_dirty());
        app.apply().unwrap();
        assert!(!app.is_dirty());
        assert_eq!(app.store.get(Param::PostScaleY).unwrap(), 0.4);
    }

    #[test]
    fn test_failed_apply_tracks_driver_state() {
        #[derive(Debug)]
        struct ReadOnlyCap(MemoryStore);

        impl ParamStore for ReadOnlyCap {
            fn get(&self, param: Param) -> Result<f64, ParamError> {
                self.0.get(param)
            }

            fn set(&mut self, param: Param, value: f64) -> Result<(), ParamError> {
                if param == Param::SpeedCap {
                    return Err(ParamError::ModuleNotLoaded("speed_cap".to_string()));
                }
                self.0.set(param, value)
            }
        }

        let form = ParameterForm::build(&DriverParams::default()).unwrap();
        let mut app = LeetmouseApp::new(
            form,
            Box::new(ReadOnlyCap(MemoryStore::new())),
            AppSettings::default(),
            None,
        );
        app.form.user_set_value(Param::Sensitivity, 2.0);
        assert!(app.apply().is_err());
        assert_eq!(app.store.get(Param::Sensitivity).unwrap(), 1.0);
        assert_eq!(app.applied, DriverParams::default());
        assert!(app.is_dirty());
    }

    #[test]
    fn test_offline_notice_is_shown() {
        let mut app = app_with(DriverParams::default());
        app.report_offline(&ParamError::ModuleNotLoaded("/sys/module/leetmouse".to_string()));
        assert!(app.error().unwrap().contains("Editing offline"));
    }

    #[test]
    fn test_reload_discards_edits() {
        let mut app = app_with(DriverParams::default());
        app.form.user_set_value(Param::Sensitivity, 2.0);
        app.reload().unwrap();
        assert_eq!(app.form().params(), DriverParams::default());
    }

    #[test]
    fn test_profile_export_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rival600.toml");

        let mut app = app_with(DriverParams::default());
        app.form.user_set_value(Param::PreScaleX, 0.0333);
        app.export_profile(&path).unwrap();
        assert_eq!(app.settings().last_profile_dir, dir.path().to_string_lossy());

        let mut other = app_with(DriverParams::default());
        other.import_profile(&path).unwrap();
        assert_eq!(other.form().params().pre_scale_y, 0.0333);
        assert!(other.form().invariants_hold());
    }
}
