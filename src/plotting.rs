use egui::Color32;
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoints, Points};
use serde::{Deserialize, Serialize};

use crate::controller::{ChartInstance, ChartSurface};
use crate::dataset::Record;

pub const PR_SERIES_LABEL: &str = "PR Weight";

/// RGB color of a chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesColor(pub u8, pub u8, pub u8);

impl SeriesColor {
    pub fn to_color32(self) -> Color32 {
        Color32::from_rgb(self.0, self.1, self.2)
    }
}

impl Default for SeriesColor {
    fn default() -> Self {
        SeriesColor(75, 192, 192)
    }
}

/// Chart types understood by the chart surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: SeriesColor,
    pub fill: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartSeries>,
}

/// Everything a chart surface needs to construct a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub data: ChartData,
}

/// Presentation choices applied to every PR chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub border_color: SeriesColor,
    pub fill: bool,
    pub weight_unit: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            border_color: SeriesColor::default(),
            fill: false,
            weight_unit: "kg".into(),
        }
    }
}

/// Build the line chart configuration for one exercise.
///
/// Dates become the x labels and weights the single "PR Weight" series. Both
/// keep the order the records were received in; nothing is sorted or
/// deduplicated.
pub fn pr_chart_config(exercise: &str, records: &[Record], style: &ChartStyle) -> ChartConfig {
    let (labels, data): (Vec<String>, Vec<f64>) =
        records.iter().map(|r| (r.date.clone(), r.weight)).unzip();
    ChartConfig {
        kind: ChartKind::Line,
        title: format!("PR Progression: {exercise}"),
        x_axis_label: "Date".into(),
        y_axis_label: format!("Max Weight ({})", style.weight_unit),
        data: ChartData {
            labels,
            datasets: vec![ChartSeries {
                label: PR_SERIES_LABEL.into(),
                data,
                border_color: style.border_color,
                fill: style.fill,
            }],
        },
    }
}

/// Plot coordinates for a series: x is the position of the label.
pub fn series_points(series: &ChartSeries) -> Vec<[f64; 2]> {
    series
        .data
        .iter()
        .enumerate()
        .map(|(i, y)| [i as f64, *y])
        .collect()
}

/// Tick text for an x value: the label at that index, or nothing between labels.
pub(crate) fn label_for_mark(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Creates [`PlotChart`]s rendered with `egui_plot`.
#[derive(Debug, Default)]
pub struct PlotSurface {
    created: u64,
}

impl PlotSurface {
    /// Number of charts created so far.
    pub fn created(&self) -> u64 {
        self.created
    }
}

impl ChartSurface for PlotSurface {
    type Chart = PlotChart;

    fn create(&mut self, config: ChartConfig) -> PlotChart {
        self.created += 1;
        log::debug!(
            "Creating chart #{} \"{}\" with {} points",
            self.created,
            config.title,
            config.data.labels.len()
        );
        PlotChart {
            config,
            generation: self.created,
        }
    }
}

/// A live chart drawn every frame until it is destroyed.
#[derive(Debug)]
pub struct PlotChart {
    config: ChartConfig,
    generation: u64,
}

impl ChartInstance for PlotChart {
    fn destroy(self) {
        log::debug!("Destroying chart #{}", self.generation);
    }
}

impl PlotChart {
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn lines(&self) -> Vec<Line> {
        self.config
            .data
            .datasets
            .iter()
            .map(|series| {
                let mut line = Line::new(PlotPoints::from(series_points(series)))
                    .name(&series.label)
                    .color(series.border_color.to_color32());
                if series.fill {
                    line = line.fill(0.0_f32);
                }
                line
            })
            .collect()
    }

    fn markers(&self) -> Vec<Points> {
        self.config
            .data
            .datasets
            .iter()
            .map(|series| {
                Points::new(PlotPoints::from(series_points(series)))
                    .shape(MarkerShape::Circle)
                    .radius(3.0_f32)
                    .color(series.border_color.to_color32())
            })
            .collect()
    }

    pub fn show(&self, ui: &mut egui::Ui, height: f32, show_markers: bool) {
        ui.heading(self.config.title.as_str());
        let labels = self.config.data.labels.clone();
        // A fresh id per chart so zoom and pan do not leak between exercises.
        Plot::new(("pr_chart", self.generation))
            .height(height)
            .legend(Legend::default())
            .x_axis_label(self.config.x_axis_label.clone())
            .y_axis_label(self.config.y_axis_label.clone())
            .x_axis_formatter(move |mark, _chars, _| label_for_mark(&labels, mark.value))
            .show(ui, |plot_ui| {
                for line in self.lines() {
                    plot_ui.line(line);
                }
                if show_markers {
                    for points in self.markers() {
                        plot_ui.points(points);
                    }
                }
            });
    }
}
