use dashboard_analytics::models::{ChartKind, Offset, Point};
use dashboard_analytics::viz::placement::screen_positions;
use dashboard_analytics::viz::{PlacementConfig, candidates, place_labels};

fn points(values: &[f64]) -> Vec<Point> {
    values
        .iter()
        .enumerate()
        .map(|(i, y)| Point::new(i as f64, *y).with_importance(true))
        .collect()
}

fn with_important(values: &[f64], important: &[usize]) -> Vec<Point> {
    values
        .iter()
        .enumerate()
        .map(|(i, y)| Point::new(i as f64, *y).with_importance(important.contains(&i)))
        .collect()
}

fn is_candidate(offset: Offset, cfg: &PlacementConfig) -> bool {
    candidates(cfg)
        .iter()
        .any(|c| c.dx == offset.dx && c.dy == offset.dy)
}

#[test]
fn committed_offsets_are_canonical_and_in_bounds() {
    let cfg = PlacementConfig::default();
    let values = [3.0, 9.0, 1.0, 8.0, 2.0, 10.0, 0.0, 7.0, 4.0, 6.0];
    let pts = points(&values);
    let placed = place_labels(&pts, ChartKind::Line, &cfg);
    let screen = screen_positions(&pts, &cfg);

    for (p, anchor) in placed.iter().zip(&screen) {
        let offset = p.offset.expect("important point gets an offset");
        assert!(is_candidate(offset, &cfg));
        let (x, y) = anchor.unwrap();
        let (cx, cy) = (x + offset.dx, y + offset.dy);
        assert!((0.0..=cfg.width).contains(&cx), "label x {cx} out of bounds");
        assert!((0.0..=cfg.height).contains(&cy), "label y {cy} out of bounds");
    }
}

#[test]
fn edge_labels_point_inward() {
    let cfg = PlacementConfig::default();
    let placed = place_labels(&points(&[5.0, 6.0, 4.0, 7.0, 5.0]), ChartKind::Line, &cfg);
    assert!(placed[0].offset.unwrap().dx >= 0.0);
    assert!(placed[4].offset.unwrap().dx <= 0.0);
}

#[test]
fn later_labels_avoid_committed_ones() {
    let cfg = PlacementConfig {
        width: 40.0,
        ..PlacementConfig::default()
    };
    // x = 0, 20, 40 on a flat line; the first label goes up-right, so the
    // last one moves below the line instead of mirroring it.
    let placed = place_labels(&points(&[5.0, 5.0, 5.0]), ChartKind::Line, &cfg);
    let first = placed[0].offset.unwrap();
    let last = placed[2].offset.unwrap();
    assert!(first.dx > 0.0 && first.dy < 0.0);
    assert!(last.dx < 0.0 && last.dy > 0.0);
}

#[test]
fn unimportant_and_missing_points_get_no_offset() {
    let cfg = PlacementConfig::default();
    let mut pts = points(&[1.0, 2.0, f64::NAN, 4.0]);
    pts[1] = pts[1].clone().with_importance(false);
    let placed = place_labels(&pts, ChartKind::Ratio, &cfg);
    assert!(placed[0].offset.is_some());
    assert!(placed[1].offset.is_none());
    assert!(placed[2].offset.is_none());
    assert!(placed[3].offset.is_some());
}

#[test]
fn bar_labels_sit_straight_above() {
    let cfg = PlacementConfig::default();
    let placed = place_labels(&points(&[1.0, 5.0, 3.0]), ChartKind::Bar, &cfg);
    for p in placed {
        assert_eq!(
            p.offset,
            Some(Offset {
                dx: 0.0,
                dy: -cfg.fixed_label_offset
            })
        );
    }
}

#[test]
fn labels_keep_clear_of_steep_segments() {
    // x = 0, 50, 100 and y = 400, 200, 0: the line runs steeply through the
    // middle point, crossing both the spot above and the spot below it.
    let cfg = PlacementConfig {
        width: 100.0,
        ..PlacementConfig::default()
    };
    let pts = with_important(&[0.0, 5.0, 10.0], &[1]);
    let placed = place_labels(&pts, ChartKind::Line, &cfg);
    let up_left = candidates(&cfg)[3];
    assert_eq!(
        placed[1].offset,
        Some(Offset {
            dx: up_left.dx,
            dy: up_left.dy
        })
    );
    assert!(placed[0].offset.is_none() && placed[2].offset.is_none());
}

#[test]
fn higher_peak_is_placed_first() {
    // x every 20 px; the two labelled points sit side by side near y = 200,
    // close enough that only one of them can take the spot above.
    let cfg = PlacementConfig {
        width: 120.0,
        ..PlacementConfig::default()
    };
    let pts = with_important(&[0.0, 50.0, 50.0, 50.5, 50.0, 50.0, 100.0], &[2, 3]);
    let placed = place_labels(&pts, ChartKind::Line, &cfg);
    let c = candidates(&cfg);
    let up = Offset { dx: c[0].dx, dy: c[0].dy };
    let down = Offset { dx: c[1].dx, dy: c[1].dy };
    assert_eq!(placed[3].offset, Some(up));
    assert_eq!(placed[2].offset, Some(down));
}
