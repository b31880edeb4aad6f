//! Grid configuration and snapping of canvas coordinates.
//!
//! Snapping rounds with [`f64::round`], i.e. halfway values move away from
//! zero (`15.0` snaps to `20.0` on a 10px grid, `-15.0` to `-20.0`).

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default grid cell size in pixels.
pub const DEFAULT_GRID_SIZE: u32 = 10;

/// Grid settings for the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Whether the grid is shown.
    pub enabled: bool,
    /// Cell size in pixels. Always positive.
    pub size: u32,
    /// Whether coordinates snap to the grid.
    pub snap: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: DEFAULT_GRID_SIZE,
            snap: true,
        }
    }
}

impl GridConfig {
    /// Create a grid config. A zero size is bumped to 1.
    pub fn new(enabled: bool, size: u32, snap: bool) -> Self {
        Self {
            enabled,
            size: size.max(1),
            snap,
        }
    }

    /// A grid that never snaps.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            size: DEFAULT_GRID_SIZE,
            snap: false,
        }
    }

    /// Check if coordinates passed through [`snap`] are rounded.
    pub fn is_snapping(&self) -> bool {
        self.enabled && self.snap
    }

    /// Toggle grid visibility.
    pub fn toggle_enabled(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Toggle snapping.
    pub fn toggle_snap(&mut self) {
        self.snap = !self.snap;
    }
}

/// Snap a coordinate to the nearest multiple of the grid size.
///
/// Returns `value` unchanged unless the grid is both enabled and snapping.
pub fn snap(value: f64, grid: &GridConfig) -> f64 {
    if !grid.is_snapping() {
        return value;
    }
    let size = f64::from(grid.size.max(1));
    (value / size).round() * size
}

/// Snap both axes of a point.
pub fn snap_point(point: Point, grid: &GridConfig) -> Point {
    Point::new(snap(point.x, grid), snap(point.y, grid))
}
