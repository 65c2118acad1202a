//! PR weight dashboard: fetches personal record history once at startup and
//! charts the exercise picked in the selector.

use dirs_next as dirs;
use eframe::{App, Frame, NativeOptions, egui};
use rfd::FileDialog;
use serde::{Deserialize, Serialize};

mod controller;
use controller::DashboardController;
mod dataset;
use dataset::Dataset;
mod export;
use export::{PNG_SIZE, save_chart_png, save_dataset_json};
mod plotting;
use plotting::{ChartStyle, PlotSurface, SeriesColor};
mod sync;
use sync::{FetchError, fetch_pr_data, resolve_base_url};
mod widgets;
use widgets::ExerciseSelect;

#[cfg(test)]
pub(crate) static ENV_MUTEX: once_cell::sync::Lazy<std::sync::Mutex<()>> =
    once_cell::sync::Lazy::new(|| std::sync::Mutex::new(()));

fn default_weight_unit() -> String {
    "kg".into()
}

fn default_plot_height() -> f32 {
    300.0
}

fn default_show_markers() -> bool {
    true
}

/// Persistent configuration for the dashboard.
///
/// Stored as JSON in the user's config directory. Every field has a serde
/// default so older or hand-edited files still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Settings {
    /// Base URL of the server providing `/pr_data`.
    ///
    /// Overridden by the `PR_DASHBOARD_URL` environment variable.
    #[serde(default)]
    server_url: Option<String>,
    #[serde(default = "default_weight_unit")]
    weight_unit: String,
    #[serde(default = "default_plot_height")]
    plot_height: f32,
    #[serde(default = "default_show_markers")]
    show_markers: bool,
    #[serde(default)]
    fill_line: bool,
    #[serde(default)]
    line_color: SeriesColor,
}

impl Settings {
    const FILE: &'static str = "pr_weight_dashboard_settings.json";

    fn path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&data) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("Ignoring invalid settings in {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    fn save(&self) {
        if let Some(path) = Self::path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match serde_json::to_string_pretty(self) {
                Ok(data) => {
                    if let Err(e) = std::fs::write(&path, data) {
                        log::error!("Failed to save settings: {e}");
                    }
                }
                Err(e) => log::error!("Failed to serialize settings: {e}"),
            }
        }
    }

    fn chart_style(&self) -> ChartStyle {
        ChartStyle {
            border_color: self.line_color,
            fill: self.fill_line,
            weight_unit: self.weight_unit.clone(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: None,
            weight_unit: default_weight_unit(),
            plot_height: default_plot_height(),
            show_markers: default_show_markers(),
            fill_line: false,
            line_color: SeriesColor::default(),
        }
    }
}

/// Trimmed server URL, or `None` when nothing but whitespace was entered.
fn normalize_server_url(text: &str) -> Option<String> {
    let url = text.trim();
    (!url.is_empty()).then(|| url.to_string())
}

struct DashboardApp {
    controller: DashboardController<ExerciseSelect, PlotSurface>,
    settings: Settings,
    /// Server URL text as typed in the settings window.
    server_url_input: String,
    status: Option<String>,
    show_settings: bool,
    settings_dirty: bool,
}

impl DashboardApp {
    /// Fetch the PR data and build the dashboard around it.
    ///
    /// The fetch blocks until the response is decoded; it happens once.
    fn new(settings: Settings) -> Self {
        let base_url = resolve_base_url(settings.server_url.as_deref());
        let fetched = fetch_pr_data(&base_url);
        Self::with_fetch_result(settings, fetched)
    }

    fn with_fetch_result(settings: Settings, fetched: Result<Dataset, FetchError>) -> Self {
        let controller = DashboardController::new(
            ExerciseSelect::default(),
            PlotSurface::default(),
            settings.chart_style(),
        );
        let server_url_input = settings.server_url.clone().unwrap_or_default();
        let mut app = Self {
            controller,
            settings,
            server_url_input,
            status: None,
            show_settings: false,
            settings_dirty: false,
        };

        match fetched {
            Ok(dataset) => {
                if let Err(e) = app.controller.initialize(dataset) {
                    app.report_error(e.to_string());
                }
            }
            Err(e) => app.report_error(format!("Failed to load PR data: {e}")),
        }
        app
    }

    fn report_error(&mut self, message: String) {
        log::error!("{message}");
        self.status = Some(message);
    }

    fn select_exercise(&mut self, name: &str) {
        match self.controller.selection_changed(name) {
            Ok(()) => self.status = None,
            Err(e) => self.report_error(e.to_string()),
        }
    }

    fn export_chart(&mut self) {
        let Some(chart) = self.controller.chart() else {
            return;
        };
        let Some(path) = FileDialog::new().add_filter("PNG", &["png"]).save_file() else {
            return;
        };
        match save_chart_png(
            &path,
            chart.config(),
            PNG_SIZE,
            self.settings.show_markers,
        ) {
            Ok(()) => log::info!("Saved chart to {}", path.display()),
            Err(e) => self.report_error(format!("Failed to save chart: {e}")),
        }
    }

    fn export_data(&mut self) {
        let Some(path) = FileDialog::new().add_filter("JSON", &["json"]).save_file() else {
            return;
        };
        match save_dataset_json(&path, self.controller.dataset()) {
            Ok(()) => log::info!("Saved PR data to {}", path.display()),
            Err(e) => self.report_error(format!("Failed to export PR data: {e}")),
        }
    }

    fn apply_server_url_input(&mut self) {
        self.settings.server_url = normalize_server_url(&self.server_url_input);
        self.settings_dirty = true;
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label("Server URL:");
                        if ui
                            .text_edit_singleline(&mut self.server_url_input)
                            .changed()
                        {
                            self.apply_server_url_input();
                        }
                        ui.end_row();

                        ui.label("Weight unit:");
                        if ui
                            .text_edit_singleline(&mut self.settings.weight_unit)
                            .changed()
                        {
                            self.settings_dirty = true;
                        }
                        ui.end_row();

                        ui.label("Plot height:");
                        if ui
                            .add(
                                egui::DragValue::new(&mut self.settings.plot_height)
                                    .clamp_range(100.0..=1000.0),
                            )
                            .changed()
                        {
                            self.settings_dirty = true;
                        }
                        ui.end_row();

                        ui.label("Line color:");
                        let mut rgb = [
                            self.settings.line_color.0,
                            self.settings.line_color.1,
                            self.settings.line_color.2,
                        ];
                        if ui.color_edit_button_srgb(&mut rgb).changed() {
                            self.settings.line_color = SeriesColor(rgb[0], rgb[1], rgb[2]);
                            self.settings_dirty = true;
                        }
                        ui.end_row();
                    });
                if ui
                    .checkbox(&mut self.settings.show_markers, "Show point markers")
                    .changed()
                {
                    self.settings_dirty = true;
                }
                if ui
                    .checkbox(&mut self.settings.fill_line, "Fill area under line")
                    .changed()
                {
                    self.settings_dirty = true;
                }
                ui.small("Server, unit, color and fill apply after restart.");
            });
        self.show_settings = open;
    }
}

impl App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::TopBottomPanel::top("menu").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui
                        .add_enabled(
                            self.controller.chart().is_some(),
                            egui::Button::new("Export chart PNG..."),
                        )
                        .clicked()
                    {
                        ui.close_menu();
                        self.export_chart();
                    }
                    if ui.button("Export data JSON...").clicked() {
                        ui.close_menu();
                        self.export_data();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Settings").clicked() {
                        self.show_settings = true;
                        ui.close_menu();
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(msg) = &self.status {
                ui.colored_label(egui::Color32::RED, msg.as_str());
            }
            if let Some(name) = self.controller.selector().show(ui) {
                self.select_exercise(&name);
            }
            ui.separator();
            if let Some(chart) = self.controller.chart() {
                chart.show(ui, self.settings.plot_height, self.settings.show_markers);
            } else if self.controller.dataset().is_empty() && self.status.is_none() {
                ui.label("No PR data available.");
            }
        });

        if self.show_settings {
            self.settings_window(ctx);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::debug!(
            "Rendered {} charts this session",
            self.controller.surface().created()
        );
        if self.settings_dirty {
            self.settings.save();
        }
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "PR Weight Dashboard",
        options,
        Box::new(|_cc| Box::new(DashboardApp::new(Settings::load()))),
    )
}
