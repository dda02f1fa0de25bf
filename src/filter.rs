//! Row selection applied before any grouping.

use crate::models::{ChartConfig, GroupingMode, RangeSlider, Row};

/// Apply, in order: trailing-row skip, non-date row removal and the slider range.
pub fn apply_row_filters<'a>(rows: &'a [Row], config: &ChartConfig) -> Vec<&'a Row> {
    let keep = rows.len().saturating_sub(config.rows_to_ignore);
    let mut out: Vec<&Row> = rows[..keep].iter().collect();

    if config.ignore_non_date_rows
        && let Some(col) = config.category_column.as_deref()
    {
        out.retain(|r| r.get(col).is_some_and(|c| !c.is_null()));
    }

    let date_filtered_daily = config.grouping == GroupingMode::Daily && config.date_filter_active;
    if !date_filtered_daily
        && let Some(slider) = config.slider
        && let Some((start, end)) = slider_range(out.len(), slider)
    {
        out = out[start..=end].to_vec();
    }
    out
}

/// Inclusive row range selected by a slider over `total` rows.
///
/// Bounds are `floor(total * value / max)` clamped to `[0, total - 1]`, with
/// the start never past the end. `None` when there is nothing to slice.
pub fn slider_range(total: usize, slider: RangeSlider) -> Option<(usize, usize)> {
    if total == 0 || slider.max.is_nan() || slider.max <= 0.0 {
        return None;
    }
    let last = total - 1;
    let to_index = |value: f64| -> usize {
        let ratio = (value / slider.max).clamp(0.0, 1.0);
        ((total as f64 * ratio).floor() as usize).min(last)
    };
    let end = to_index(slider.end);
    let start = to_index(slider.start).min(end);
    Some((start, end))
}
