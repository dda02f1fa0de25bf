//! Greedy label placement for line-like series.
//!
//! Points are mapped onto a virtual canvas (x spread evenly over the width,
//! y scaled to the height with larger values higher up). Each important point
//! then tries 16 candidate offsets (2 rings × 8 angles) and commits the one
//! with the lowest additive penalty:
//!
//! - label box outside the canvas: `2000` per overflowing pixel and side
//! - label centre within one label radius of the series line (±2 segments)
//! - label centre within `2.2` label radii of an already committed label
//! - small aesthetic biases against the outer ring, horizontal and diagonal spots
//! - the first label must not point left, the last must not point right
//!
//! Processing order is first point, last point, then the rest by value
//! descending. Committed centres feed the overlap term of later points, so the
//! result is order dependent and not globally optimal. Equal penalties keep the
//! earliest candidate in ring-then-angle order.

use crate::models::{ChartKind, Offset, Point};

use super::types::*;

/// The 16 candidate offsets, inner ring first, angles in [`CANDIDATE_ANGLES_DEG`] order.
pub fn candidates(cfg: &PlacementConfig) -> Vec<Candidate> {
    let base = cfg.point_radius + cfg.label_radius;
    [(base + INNER_RING_GAP_PX, false), (base + OUTER_RING_GAP_PX, true)]
        .into_iter()
        .flat_map(|(radius, outer)| {
            CANDIDATE_ANGLES_DEG.iter().map(move |&angle_deg| {
                let rad = f64::from(angle_deg).to_radians();
                Candidate {
                    dx: snap(radius * rad.cos()),
                    dy: snap(radius * rad.sin()),
                    outer,
                    angle_deg,
                }
            })
        })
        .collect()
}

/// Remove floating-point residue so exact axis directions compare cleanly.
fn snap(v: f64) -> f64 {
    let r = (v * 1e9).round() / 1e9;
    if r == 0.0 { 0.0 } else { r }
}

/// Screen position of every point; `None` for points without a value.
pub fn screen_positions(points: &[Point], cfg: &PlacementConfig) -> Vec<Option<(f64, f64)>> {
    let n = points.len();
    let (min, max) = points
        .iter()
        .map(|p| p.y)
        .filter(|y| y.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));
    let span = max - min;

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if !p.y.is_finite() {
                return None;
            }
            let x = if n > 1 {
                cfg.width * i as f64 / (n - 1) as f64
            } else {
                cfg.width / 2.0
            };
            let y = if span > 0.0 {
                cfg.height - (p.y - min) / span * cfg.height
            } else {
                cfg.height / 2.0
            };
            Some((x, y))
        })
        .collect()
}

/// Assign label offsets. Line-like kinds run the solver over important
/// points; other kinds put every label straight above its point.
pub fn place_labels(points: &[Point], kind: ChartKind, cfg: &PlacementConfig) -> Vec<Point> {
    if !kind.is_line_like() {
        let above = Offset {
            dx: 0.0,
            dy: -cfg.fixed_label_offset,
        };
        return points.iter().cloned().map(|p| p.with_offset(above)).collect();
    }

    let screen = screen_positions(points, cfg);
    let cands = candidates(cfg);
    let mut placed: Vec<(f64, f64)> = Vec::new();
    let mut out = points.to_vec();

    for idx in placement_order(points, &screen) {
        let Some(anchor) = screen[idx] else {
            continue;
        };
        let is_first = idx == 0;
        let is_last = idx + 1 == points.len();

        let mut best: Option<(f64, &Candidate)> = None;
        for cand in &cands {
            let center = (anchor.0 + cand.dx, anchor.1 + cand.dy);
            let cost = penalty(cand, center, idx, &screen, &placed, cfg, is_first, is_last);
            if best.is_none_or(|(b, _)| cost < b) {
                best = Some((cost, cand));
            }
        }
        if let Some((_, cand)) = best {
            placed.push((anchor.0 + cand.dx, anchor.1 + cand.dy));
            out[idx] = out[idx].clone().with_offset(Offset {
                dx: cand.dx,
                dy: cand.dy,
            });
        }
    }
    out
}

/// First, last, then remaining important points by value descending.
fn placement_order(points: &[Point], screen: &[Option<(f64, f64)>]) -> Vec<usize> {
    let n = points.len();
    let eligible = |i: usize| points[i].important && screen[i].is_some();
    let mut order = Vec::new();
    if n > 0 && eligible(0) {
        order.push(0);
    }
    if n > 1 && eligible(n - 1) {
        order.push(n - 1);
    }
    let mut rest: Vec<usize> = (1..n.saturating_sub(1)).filter(|&i| eligible(i)).collect();
    rest.sort_by(|&a, &b| points[b].y.total_cmp(&points[a].y));
    order.extend(rest);
    order
}

#[allow(clippy::too_many_arguments)]
fn penalty(
    cand: &Candidate,
    center: (f64, f64),
    idx: usize,
    screen: &[Option<(f64, f64)>],
    placed: &[(f64, f64)],
    cfg: &PlacementConfig,
    is_first: bool,
    is_last: bool,
) -> f64 {
    let r = cfg.label_radius;
    let (cx, cy) = center;
    let mut cost = 0.0;

    let overflow = (r - cx).max(0.0)
        + (cx + r - cfg.width).max(0.0)
        + (r - cy).max(0.0)
        + (cy + r - cfg.height).max(0.0);
    cost += OUT_OF_BOUNDS_WEIGHT * overflow;

    let lo = idx.saturating_sub(2);
    let hi = (idx + 2).min(screen.len().saturating_sub(1));
    for j in lo..hi {
        if let (Some(a), Some(b)) = (screen[j], screen[j + 1]) {
            let d = point_segment_distance(center, a, b);
            if d < r {
                cost += (r - d) * LINE_PROXIMITY_WEIGHT;
            }
        }
    }

    let min_gap = LABEL_OVERLAP_FACTOR * r;
    for &(px, py) in placed {
        let d = (cx - px).hypot(cy - py);
        if d < min_gap {
            cost += (min_gap - d) * LABEL_OVERLAP_WEIGHT;
        }
    }

    if cand.outer {
        cost += OUTER_RING_PENALTY;
    }
    if cand.is_horizontal() {
        cost += HORIZONTAL_PENALTY;
    } else if cand.is_diagonal() {
        cost += DIAGONAL_PENALTY;
    }

    if is_first && cand.dx < 0.0 {
        cost += EDGE_DIRECTION_PENALTY;
    }
    if is_last && cand.dx > 0.0 {
        cost += EDGE_DIRECTION_PENALTY;
    }
    cost
}

/// Euclidean distance from `p` to the segment `a`-`b`.
pub fn point_segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (vx, vy) = (b.0 - a.0, b.1 - a.1);
    let len2 = vx * vx + vy * vy;
    let t = if len2 > 0.0 {
        (((p.0 - a.0) * vx + (p.1 - a.1) * vy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (qx, qy) = (a.0 + t * vx, a.1 + t * vy);
    (p.0 - qx).hypot(p.1 - qy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_order_is_ring_then_angle() {
        let c = candidates(&PlacementConfig::default());
        assert_eq!(c.len(), 16);
        // inner ring: 4 + 14 + 4 = 22, straight up first
        assert_eq!((c[0].dx, c[0].dy), (0.0, -22.0));
        assert_eq!((c[1].dx, c[1].dy), (0.0, 22.0));
        assert_eq!((c[6].dx, c[6].dy), (22.0, 0.0));
        assert_eq!((c[7].dx, c[7].dy), (-22.0, 0.0));
        assert!(c[8..].iter().all(|c| c.outer));
        assert_eq!((c[8].dx, c[8].dy), (0.0, -42.0));
    }

    fn lone_costs(cfg: &PlacementConfig, is_first: bool, is_last: bool) -> Vec<f64> {
        let anchor = (500.0, 200.0);
        let screen = vec![Some(anchor)];
        candidates(cfg)
            .iter()
            .map(|c| {
                let center = (anchor.0 + c.dx, anchor.1 + c.dy);
                penalty(c, center, 0, &screen, &[], cfg, is_first, is_last)
            })
            .collect()
    }

    #[test]
    fn aesthetic_biases_rank_the_candidates() {
        let cfg = PlacementConfig::default();
        assert_eq!(
            lone_costs(&cfg, false, false),
            vec![
                0.0, 0.0, 3.0, 3.0, 3.0, 3.0, 10.0, 10.0, // inner ring
                15.0, 15.0, 18.0, 18.0, 18.0, 18.0, 25.0, 25.0, // outer ring
            ]
        );
    }

    #[test]
    fn edge_points_pay_for_pointing_outward() {
        let cfg = PlacementConfig::default();
        let free = lone_costs(&cfg, false, false);
        let first = lone_costs(&cfg, true, false);
        let last = lone_costs(&cfg, false, true);
        let c = candidates(&cfg);
        for i in 0..c.len() {
            let left = if c[i].dx < 0.0 { EDGE_DIRECTION_PENALTY } else { 0.0 };
            let right = if c[i].dx > 0.0 { EDGE_DIRECTION_PENALTY } else { 0.0 };
            assert_eq!(first[i], free[i] + left);
            assert_eq!(last[i], free[i] + right);
        }
        // straight left, first point
        assert_eq!(first[7], 5010.0);
        assert_eq!(last[6], 5010.0);
    }

    #[test]
    fn committed_labels_repel_nearby_candidates() {
        let cfg = PlacementConfig::default();
        let anchor = (500.0, 200.0);
        let screen = vec![Some(anchor)];
        let up = candidates(&cfg)[0];
        let center = (anchor.0 + up.dx, anchor.1 + up.dy);
        // committed label 10.8 px away: (2.2 * 14 - 10.8) * 200
        let cost = penalty(&up, center, 0, &screen, &[(510.8, 178.0)], &cfg, false, false);
        assert!((cost - 4000.0).abs() < 1e-6);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        assert_eq!(point_segment_distance((0.0, 5.0), (0.0, 0.0), (10.0, 0.0)), 5.0);
        assert_eq!(point_segment_distance((13.0, 4.0), (0.0, 0.0), (10.0, 0.0)), 5.0);
        assert_eq!(point_segment_distance((3.0, 4.0), (0.0, 0.0), (0.0, 0.0)), 5.0);
    }
}
