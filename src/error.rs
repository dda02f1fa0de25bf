use thiserror::Error;

use crate::models::GroupingMode;

/// Configuration faults detected while building a chart.
#[derive(Debug, Error, PartialEq)]
pub enum AnalyticsError {
    #[error("no series columns configured")]
    NoSeries,
    #[error("ratio chart needs a numerator and a denominator column, got {0}")]
    RatioNeedsTwoSeries(usize),
    #[error("grouping mode {0:?} needs a category column")]
    MissingCategoryColumn(GroupingMode),
    #[error("none of the configured series columns exist in the data")]
    NoMatchingColumns,
    #[error("invalid slider bounds: start={start}, end={end}, max={max}")]
    InvalidSlider { start: f64, end: f64, max: f64 },
}
