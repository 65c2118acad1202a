use crate::dataset::Dataset;
use crate::plotting::{ChartConfig, ChartSeries, label_for_mark, series_points};
use plotters::prelude::*;
use serde::Serialize;
use std::path::Path;

pub const PNG_SIZE: (u32, u32) = (800, 400);

pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, value).map_err(std::io::Error::other)
}

pub fn save_dataset_json<P: AsRef<Path>>(path: P, dataset: &Dataset) -> std::io::Result<()> {
    write_json(dataset, path)
}

/// Y range covering every value with a small margin.
fn y_bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// Positions of the circle markers drawn on top of a series.
fn marker_points(series: &ChartSeries, show_markers: bool) -> Vec<(f64, f64)> {
    if !show_markers {
        return Vec::new();
    }
    series_points(series)
        .into_iter()
        .map(|[x, y]| (x, y))
        .collect()
}

/// Render a chart configuration to a PNG file.
///
/// A chart without points produces a blank image.
pub fn save_chart_png<P: AsRef<Path>>(
    path: P,
    config: &ChartConfig,
    size: (u32, u32),
    show_markers: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path.as_ref(), size).into_drawing_area();
    root.fill(&WHITE)?;
    let labels = &config.data.labels;
    if labels.is_empty() {
        root.present()?;
        return Ok(());
    }

    let values: Vec<f64> = config
        .data
        .datasets
        .iter()
        .flat_map(|s| s.data.iter().copied())
        .collect();
    let (y_min, y_max) = y_bounds(&values);
    let n = labels.len();
    let x_fmt = |x: &f64| label_for_mark(labels, *x);

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 25))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_min..y_max)?;
    chart
        .configure_mesh()
        .x_labels(n.min(12))
        .x_label_formatter(&x_fmt)
        .x_desc(config.x_axis_label.as_str())
        .y_desc(config.y_axis_label.as_str())
        .draw()?;

    for series in &config.data.datasets {
        let c = series.border_color;
        let color = RGBColor(c.0, c.1, c.2);
        let points: Vec<(f64, f64)> = series_points(series)
            .into_iter()
            .map(|[x, y]| (x, y))
            .collect();
        if series.fill {
            chart.draw_series(AreaSeries::new(points.clone(), y_min, color.mix(0.2)))?;
        }
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart.draw_series(
            marker_points(series, show_markers)
                .into_iter()
                .map(|(x, y)| Circle::new((x, y), 3, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use crate::plotting::{ChartStyle, pr_chart_config};

    #[test]
    fn y_bounds_pads_range() {
        let (lo, hi) = y_bounds(&[100.0, 120.0]);
        assert!((lo - 99.0).abs() < 1e-9);
        assert!((hi - 121.0).abs() < 1e-9);
    }

    #[test]
    fn y_bounds_single_value_and_empty() {
        assert_eq!(y_bounds(&[50.0]), (49.0, 51.0));
        assert_eq!(y_bounds(&[]), (0.0, 1.0));
    }

    #[test]
    fn markers_follow_setting() {
        let records = vec![
            Record {
                date: "2024-01-01".into(),
                weight: 100.0,
            },
            Record {
                date: "2024-02-01".into(),
                weight: 110.0,
            },
        ];
        let config = pr_chart_config("squat", &records, &ChartStyle::default());
        let series = &config.data.datasets[0];
        assert_eq!(
            marker_points(series, true),
            vec![(0.0, 100.0), (1.0, 110.0)]
        );
        assert!(marker_points(series, false).is_empty());
    }

    #[test]
    fn empty_chart_writes_blank_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        let config = pr_chart_config("row", &[], &ChartStyle::default());
        save_chart_png(&path, &config, (64, 32), true).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn dataset_json_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prs.json");
        let mut dataset = Dataset::new();
        dataset.insert(
            "squat",
            vec![Record {
                date: "2024-01-01".into(),
                weight: 100.0,
            }],
        );
        dataset.insert("bench", Vec::new());
        save_dataset_json(&path, &dataset).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.find("squat").unwrap() < text.find("bench").unwrap());
        let loaded: Dataset = serde_json::from_str(&text).unwrap();
        assert_eq!(loaded, dataset);
    }
}
