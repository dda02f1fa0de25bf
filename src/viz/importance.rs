//! Choose which points of a series carry a visible label.
//!
//! Points are ranked by a volatility score
//! `2 * (|y[i] - y[i-1]| + |y[i] - y[i+1]|) + |y[i] - mean|`
//! and accepted greedily while keeping a minimum index spacing of
//! `max(1, count / budget)` between interior points. The first and last points
//! are always kept, count toward the budget and are exempt from spacing.

use std::collections::BTreeSet;

/// Minimum index distance between two labelled points.
pub fn min_spacing(count: usize, budget: usize) -> usize {
    (count / budget.max(1)).max(1)
}

/// Importance flags, one per value. NaN values never win on score.
pub fn select_important(values: &[f64], budget: usize) -> Vec<bool> {
    let n = values.len();
    if budget == 0 || n == 0 {
        return vec![false; n];
    }
    if n <= budget {
        return vec![true; n];
    }

    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let mean = if finite.is_empty() {
        0.0
    } else {
        finite.iter().sum::<f64>() / finite.len() as f64
    };

    let mut scored: Vec<(usize, f64)> = (1..n - 1)
        .filter(|&i| values[i].is_finite())
        .map(|i| (i, volatility_score(values, i, mean)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let spacing = min_spacing(n, budget);
    let interior_budget = budget.saturating_sub(2);
    let mut interior: BTreeSet<usize> = BTreeSet::new();
    for (idx, _) in scored {
        if interior.len() >= interior_budget {
            break;
        }
        if interior.iter().all(|&a| a.abs_diff(idx) >= spacing) {
            interior.insert(idx);
        }
    }

    let mut flags = vec![false; n];
    flags[0] = true;
    flags[n - 1] = true;
    for idx in interior {
        flags[idx] = true;
    }
    flags
}

/// Score of an interior index; missing neighbours contribute nothing.
fn volatility_score(values: &[f64], i: usize, mean: f64) -> f64 {
    let y = values[i];
    let jump = |other: f64| if other.is_finite() { (y - other).abs() } else { 0.0 };
    2.0 * (jump(values[i - 1]) + jump(values[i + 1])) + (y - mean).abs()
}
