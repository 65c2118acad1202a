//! Dashboard controller: owns the loaded PR data, the exercise selector and
//! the single live chart.
//!
//! The selector and the chart surface are handed in at construction, so the
//! controller never reaches for globals. Exactly one chart instance exists at
//! a time; the previous one is destroyed before its replacement is created.

use crate::dataset::Dataset;
use crate::plotting::{ChartConfig, ChartStyle, pr_chart_config};

/// The control that lists exercises and holds the current selection.
pub trait ExerciseSelector {
    /// Replace all options. Value and display text are both the exercise name.
    fn set_options(&mut self, names: Vec<String>);
    fn select(&mut self, name: &str);
    fn selected(&self) -> Option<&str>;
}

/// Something that can construct charts from a [`ChartConfig`].
pub trait ChartSurface {
    type Chart: ChartInstance;

    fn create(&mut self, config: ChartConfig) -> Self::Chart;
}

pub trait ChartInstance {
    /// Release the chart and everything it holds on to.
    fn destroy(self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    UnknownExercise(String),
}

impl std::fmt::Display for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardError::UnknownExercise(name) => {
                write!(f, "No PR data for exercise \"{name}\"")
            }
        }
    }
}

impl std::error::Error for DashboardError {}

pub struct DashboardController<S, C: ChartSurface> {
    dataset: Dataset,
    selector: S,
    surface: C,
    style: ChartStyle,
    chart: Option<C::Chart>,
}

impl<S: ExerciseSelector, C: ChartSurface> DashboardController<S, C> {
    pub fn new(selector: S, surface: C, style: ChartStyle) -> Self {
        Self {
            dataset: Dataset::default(),
            selector,
            surface,
            style,
            chart: None,
        }
    }

    /// Take ownership of the fetched dataset, fill the selector and render the
    /// first exercise. An empty dataset leaves the selector and chart empty.
    pub fn initialize(&mut self, dataset: Dataset) -> Result<(), DashboardError> {
        self.selector
            .set_options(dataset.names().map(str::to_owned).collect());
        self.dataset = dataset;

        let Some(first) = self.dataset.names().next().map(str::to_owned) else {
            log::info!("PR data is empty, nothing to chart");
            return Ok(());
        };
        self.selector.select(&first);
        self.update_chart(&first)
    }

    /// Handle the user picking `name` in the selector.
    ///
    /// Picking the already selected exercise renders it again.
    pub fn selection_changed(&mut self, name: &str) -> Result<(), DashboardError> {
        self.selector.select(name);
        self.update_chart(name)
    }

    /// Replace the current chart with one for `name`.
    ///
    /// On an unknown exercise the current chart is left untouched.
    pub fn update_chart(&mut self, name: &str) -> Result<(), DashboardError> {
        let records = self
            .dataset
            .get(name)
            .ok_or_else(|| DashboardError::UnknownExercise(name.to_string()))?;
        let config = pr_chart_config(name, records, &self.style);

        if let Some(previous) = self.chart.take() {
            previous.destroy();
        }
        self.chart = Some(self.surface.create(config));
        Ok(())
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }

    pub fn surface(&self) -> &C {
        &self.surface
    }

    pub fn chart(&self) -> Option<&C::Chart> {
        self.chart.as_ref()
    }
}
