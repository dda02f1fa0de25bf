//! Public types and constants for label layout.

use serde::{Deserialize, Serialize};

/// Candidate angles in degrees (y-down): up, down, the four diagonals, left, right.
pub const CANDIDATE_ANGLES_DEG: [u16; 8] = [270, 90, 315, 225, 45, 135, 0, 180];

/// Gap between the point marker and the inner label ring.
pub const INNER_RING_GAP_PX: f64 = 4.0;
/// Gap between the point marker and the outer label ring.
pub const OUTER_RING_GAP_PX: f64 = 24.0;

/// Penalty weights of the placement cost function.
pub const OUT_OF_BOUNDS_WEIGHT: f64 = 2000.0;
pub const LINE_PROXIMITY_WEIGHT: f64 = 150.0;
pub const LABEL_OVERLAP_WEIGHT: f64 = 200.0;
/// Labels closer than this many label radii overlap.
pub const LABEL_OVERLAP_FACTOR: f64 = 2.2;
pub const OUTER_RING_PENALTY: f64 = 15.0;
pub const HORIZONTAL_PENALTY: f64 = 10.0;
pub const DIAGONAL_PENALTY: f64 = 3.0;
/// First label pointing left or last label pointing right.
pub const EDGE_DIRECTION_PENALTY: f64 = 5000.0;

/// Geometry of the virtual canvas labels are laid out on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub width: f64,
    pub height: f64,
    pub point_radius: f64,
    /// Half-extent of a label box.
    pub label_radius: f64,
    /// Fixed upward offset for bar and pie labels.
    pub fixed_label_offset: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 400.0,
            point_radius: 4.0,
            label_radius: 14.0,
            fixed_label_offset: 18.0,
        }
    }
}

/// One candidate offset around a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub dx: f64,
    pub dy: f64,
    pub outer: bool,
    pub angle_deg: u16,
}

impl Candidate {
    pub fn is_horizontal(&self) -> bool {
        matches!(self.angle_deg, 0 | 180)
    }

    pub fn is_diagonal(&self) -> bool {
        self.angle_deg % 90 != 0
    }
}
