use crate::models::SeriesResult;
use serde::{Deserialize, Serialize};

/// Summary statistics for one produced series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub title: String,
    pub count: usize,
    /// Points without data (NaN).
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub labelled: usize,
}

/// Compute per-series statistics over point values (pie slices count as one point).
pub fn series_summary(series: &[SeriesResult]) -> Vec<Summary> {
    series
        .iter()
        .map(|s| {
            let mut vals: Vec<f64> = s.points.iter().map(|p| p.y).filter(|y| y.is_finite()).collect();
            let missing = s.points.len() - vals.len();
            vals.sort_by(|a, b| a.total_cmp(b));
            let count = vals.len();
            let min = vals.first().cloned();
            let max = vals.last().cloned();
            let mean = if count > 0 {
                Some(vals.iter().copied().sum::<f64>() / count as f64)
            } else {
                None
            };
            let median = if count == 0 {
                None
            } else if count % 2 == 1 {
                Some(vals[count / 2])
            } else {
                Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
            };
            let labelled = s.points.iter().filter(|p| p.visible).count();
            Summary {
                title: s.title.clone(),
                count,
                missing,
                min,
                max,
                mean,
                median,
                labelled,
            }
        })
        .collect()
}
