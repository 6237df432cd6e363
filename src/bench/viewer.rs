//! Benchmark chart window
//!
//! One line per driver over the sample index, legend carrying each mean,
//! and the input-handler per-stage lag printed under the plot.

use crate::bench::report::BenchmarkReport;
use eframe::egui;
use egui::Color32;
use egui_plot::{Corner, Legend, Line, Plot, PlotPoints};

pub struct ReportViewer {
    report: BenchmarkReport,
}

impl ReportViewer {
    pub fn new(report: BenchmarkReport) -> Self {
        ReportViewer { report }
    }
}

impl eframe::App for ReportViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::bottom("bench_summary").show(ctx, |ui| {
            ui.monospace(self.report.summary());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            Plot::new("bench_lag")
                .legend(
                    Legend::default()
                        .position(Corner::LeftTop)
                        .text_style(egui::TextStyle::Heading),
                )
                .x_axis_label("reads")
                .y_axis_label("lag (us)")
                .show(ui, |plot_ui| {
                    for line in &self.report.lines {
                        let [r, g, b] = line.kind.rgb();
                        plot_ui.line(
                            Line::new(PlotPoints::from(line.points()))
                                .name(line.legend())
                                .color(Color32::from_rgb(r, g, b)),
                        );
                    }
                });
        });
    }
}

/// Open the chart and block until the window is closed
pub fn show_report(report: BenchmarkReport) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "leetmouse benchmark",
        options,
        Box::new(move |_cc| Box::new(ReportViewer::new(report))),
    )
}
