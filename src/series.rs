//! Turn aggregated groups into titled, coloured series.

use crate::aggregate::{AggregatedSeries, Aggregation, AxisGroup, PieSlice};
use crate::models::{ChartConfig, ChartKind, ColorOverrides, Point, SeriesResult};
use crate::style::ColorAssigner;

/// Series plus the axis they share.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSeries {
    pub series: Vec<SeriesResult>,
    pub x_axis_labels: Option<Vec<String>>,
    pub is_date_axis: bool,
}

/// Assemble one series per (column × split) for line/bar/ratio charts and one
/// per slice for pie charts. Points carry only `x` and `y` at this stage.
pub fn build_series(
    aggregation: &Aggregation,
    config: &ChartConfig,
    overrides: &ColorOverrides,
    colors: &ColorAssigner,
) -> BuiltSeries {
    match aggregation {
        Aggregation::Pie { slices } => BuiltSeries {
            series: slices
                .iter()
                .enumerate()
                .map(|(i, s)| pie_series(i, s, config, overrides, colors))
                .collect(),
            x_axis_labels: None,
            is_date_axis: false,
        },
        Aggregation::Grouped {
            groups,
            series,
            is_date_axis,
        } => {
            let multi_column = config.kind != ChartKind::Ratio
                && series
                    .iter()
                    .map(|s| s.column.as_str())
                    .collect::<std::collections::BTreeSet<_>>()
                    .len()
                    > 1;
            BuiltSeries {
                series: series
                    .iter()
                    .map(|s| line_series(s, groups, multi_column, config, overrides, colors))
                    .collect(),
                x_axis_labels: Some(groups.iter().map(|g| g.label.clone()).collect()),
                is_date_axis: *is_date_axis,
            }
        }
    }
}

/// Display title and tooltip name of an aggregated series.
pub fn series_titles(series: &AggregatedSeries, multi_column: bool) -> (String, String) {
    match &series.split {
        None => (series.column.clone(), series.column.clone()),
        Some(cat) => {
            let raw = cat.raw_names.join(", ");
            if multi_column {
                (
                    format!("{} - {}", cat.title, series.column),
                    format!("{raw} - {}", series.column),
                )
            } else {
                (cat.title.clone(), raw)
            }
        }
    }
}

fn line_series(
    series: &AggregatedSeries,
    groups: &[AxisGroup],
    multi_column: bool,
    config: &ChartConfig,
    overrides: &ColorOverrides,
    colors: &ColorAssigner,
) -> SeriesResult {
    let (title, tooltip_name) = series_titles(series, multi_column);
    let is_others = series.split.as_ref().is_some_and(|s| s.is_others);
    let points = groups
        .iter()
        .zip(&series.values)
        .enumerate()
        .map(|(i, (g, y))| Point::new(g.x(i), *y))
        .collect();
    let color = colors.color_for(overrides, &config.slot, &title, is_others);
    SeriesResult {
        title,
        tooltip_name,
        kind: config.kind,
        points,
        pie_value: None,
        color,
    }
}

/// A slice is a series with a single point carrying its value.
fn pie_series(
    index: usize,
    slice: &PieSlice,
    config: &ChartConfig,
    overrides: &ColorOverrides,
    colors: &ColorAssigner,
) -> SeriesResult {
    SeriesResult {
        title: slice.title.clone(),
        tooltip_name: slice.raw_names.join(", "),
        kind: ChartKind::Pie,
        points: vec![Point::new(index as f64, slice.value)],
        pie_value: Some(slice.value),
        color: colors.color_for(overrides, &config.slot, &slice.title, slice.is_others),
    }
}
