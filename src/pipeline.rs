//! End-to-end chart construction: filter, aggregate, build series, lay out labels.
//!
//! Oversized charts move from General to Monthly grouping, never the other
//! way round.
//!
//! The pipeline is a synchronous function of its inputs. The colour generator
//! inside [`Pipeline`] is the only state shared between calls.

use log::{debug, warn};
use std::collections::BTreeSet;

use crate::aggregate::aggregate;
use crate::dates::parse_date;
use crate::error::AnalyticsError;
use crate::filter::apply_row_filters;
use crate::models::{
    ChartConfig, ChartKind, ChartResult, ColorOverrides, GroupingDecision, GroupingMode, Row,
    SeriesSpec,
};
use crate::series::build_series;
use crate::style::ColorAssigner;
use crate::viz::text::{AXIS_FONT_PX, AXIS_LABEL_MAX_PX, truncate_to_width};
use crate::viz::{PlacementConfig, layout_series};

/// General charts with more rows than this switch to monthly buckets.
pub const GENERAL_POINT_LIMIT: usize = 1000;

/// Chart builder holding the colour generator and canvas geometry.
#[derive(Debug, Default)]
pub struct Pipeline {
    pub colors: ColorAssigner,
    pub placement: PlacementConfig,
}

impl Pipeline {
    pub fn new(colors: ColorAssigner, placement: PlacementConfig) -> Self {
        Self { colors, placement }
    }

    /// Reproducible pipeline with default geometry.
    pub fn seeded(seed: u64) -> Self {
        Self::new(ColorAssigner::seeded(seed), PlacementConfig::default())
    }

    /// Fail-soft build: configuration faults are logged and yield an empty result.
    pub fn build(&self, rows: &[Row], config: &ChartConfig, overrides: &ColorOverrides) -> ChartResult {
        match self.try_build(rows, config, overrides) {
            Ok(result) => result,
            Err(e) => {
                warn!("chart '{}' degraded to empty: {e}", config.slot);
                ChartResult::empty()
            }
        }
    }

    pub fn try_build(
        &self,
        rows: &[Row],
        config: &ChartConfig,
        overrides: &ColorOverrides,
    ) -> Result<ChartResult, AnalyticsError> {
        validate_slider(config)?;
        let specs = effective_specs(config)?;

        let columns: Vec<String> = specs
            .iter()
            .filter(|s| {
                let present = rows.iter().any(|r| r.contains(&s.column));
                if !present {
                    warn!("series column '{}' not found, skipping", s.column);
                }
                present
            })
            .map(|s| s.column.clone())
            .collect();
        if columns.is_empty() {
            return Err(AnalyticsError::NoMatchingColumns);
        }
        if config.kind == ChartKind::Ratio && columns.len() < 2 {
            return Err(AnalyticsError::RatioNeedsTwoSeries(columns.len()));
        }

        let filtered = apply_row_filters(rows, config);
        let decision = resolve_grouping(&filtered, config);
        if let Some(reason) = &decision.reason {
            warn!("{reason}");
        }
        debug!(
            "chart '{}': {} of {} rows after filtering, grouping {:?}",
            config.slot,
            filtered.len(),
            rows.len(),
            decision.effective
        );

        let aggregation = aggregate(&filtered, config, decision.effective, &columns)?;
        if aggregation.is_empty() {
            debug!("chart '{}': no groups left after aggregation", config.slot);
        }
        let built = build_series(&aggregation, config, overrides, &self.colors);

        let series = built
            .series
            .into_iter()
            .map(|mut s| {
                let points = std::mem::take(&mut s.points);
                s.points = layout_series(
                    points,
                    s.kind,
                    config.label_budget,
                    config.comma_decimal,
                    &self.placement,
                );
                s
            })
            .collect();

        let x_axis_labels = built.x_axis_labels.map(|labels| {
            if built.is_date_axis {
                labels
            } else {
                labels
                    .iter()
                    .map(|l| truncate_to_width(l, AXIS_FONT_PX, AXIS_LABEL_MAX_PX))
                    .collect()
            }
        });

        Ok(ChartResult {
            series,
            x_axis_labels,
            is_date_axis: built.is_date_axis,
            grouping: Some(decision),
        })
    }
}

/// Strict one-off build with default geometry.
pub fn try_build_chart(
    rows: &[Row],
    config: &ChartConfig,
    overrides: &ColorOverrides,
    colors: ColorAssigner,
) -> Result<ChartResult, AnalyticsError> {
    Pipeline::new(colors, PlacementConfig::default()).try_build(rows, config, overrides)
}

/// Fail-soft one-off build: configuration faults yield an empty result.
pub fn build_chart(
    rows: &[Row],
    config: &ChartConfig,
    overrides: &ColorOverrides,
    colors: ColorAssigner,
) -> ChartResult {
    Pipeline::new(colors, PlacementConfig::default()).build(rows, config, overrides)
}

fn validate_slider(config: &ChartConfig) -> Result<(), AnalyticsError> {
    match config.slider {
        Some(s) if !(s.max.is_finite() && s.max > 0.0 && s.start.is_finite() && s.end.is_finite()) => {
            Err(AnalyticsError::InvalidSlider {
                start: s.start,
                end: s.end,
                max: s.max,
            })
        }
        _ => Ok(()),
    }
}

/// Deduplicate series by id (first wins) and apply the per-kind limit.
pub fn effective_specs(config: &ChartConfig) -> Result<Vec<SeriesSpec>, AnalyticsError> {
    let mut seen = BTreeSet::new();
    let mut specs: Vec<SeriesSpec> = config
        .series
        .iter()
        .filter(|s| !s.column.trim().is_empty() && seen.insert(s.id))
        .cloned()
        .collect();
    if specs.is_empty() {
        return Err(AnalyticsError::NoSeries);
    }
    if config.kind == ChartKind::Ratio && specs.len() < 2 {
        return Err(AnalyticsError::RatioNeedsTwoSeries(specs.len()));
    }
    let limit = config.kind.series_limit();
    if specs.len() > limit {
        warn!(
            "{:?} chart keeps {limit} of {} series",
            config.kind,
            specs.len()
        );
        specs.truncate(limit);
    }
    Ok(specs)
}

/// Decide the grouping actually used. General charts with too many rows over
/// a date column fall back to monthly buckets; the configuration is untouched.
pub fn resolve_grouping(rows: &[&Row], config: &ChartConfig) -> GroupingDecision {
    let requested = config.grouping;
    if requested != GroupingMode::General || rows.len() <= GENERAL_POINT_LIMIT {
        return GroupingDecision::unchanged(requested);
    }
    let dated = config.category_column.as_deref().is_some_and(|col| {
        rows.iter()
            .filter_map(|r| r.get(col))
            .find(|c| !c.is_null())
            .and_then(parse_date)
            .is_some()
    });
    if !dated {
        return GroupingDecision::unchanged(requested);
    }
    GroupingDecision {
        requested,
        effective: GroupingMode::Monthly,
        reason: Some(format!(
            "{} rows exceed the general chart limit of {GENERAL_POINT_LIMIT}; grouping monthly",
            rows.len()
        )),
    }
}
