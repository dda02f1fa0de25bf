//! Label layout for chart series.
//!
//! - `importance`: which points of a series get a visible label
//! - `placement`: where each visible label goes relative to its point
//! - `text`: label and axis text formatting

pub mod importance;
pub mod placement;
pub mod text;
pub mod types;

pub use importance::{min_spacing, select_important};
pub use placement::{candidates, place_labels};
pub use types::PlacementConfig;

use crate::models::{ChartKind, Point};

/// Run importance selection, label text and placement over one series.
///
/// Visible labels are the important points that have a value.
pub fn layout_series(
    points: Vec<Point>,
    kind: ChartKind,
    budget: usize,
    comma_decimal: bool,
    cfg: &PlacementConfig,
) -> Vec<Point> {
    let values: Vec<f64> = points.iter().map(|p| p.y).collect();
    let flags = select_important(&values, budget);
    let labelled: Vec<Point> = points
        .into_iter()
        .zip(flags)
        .map(|(p, important)| {
            let label = text::format_value_label(p.y, comma_decimal);
            let visible = important && label.is_some();
            Point {
                label,
                visible,
                ..p.with_importance(important)
            }
        })
        .collect();
    place_labels(&labelled, kind, cfg)
}
