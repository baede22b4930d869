//! Data structures for layout computation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Position;

/// Layout constants, in canvas units.
///
/// Factors are multiples of `min_spacing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Logical table footprint used for every overlap test
    pub table_width: f64,
    pub table_height: f64,
    pub min_spacing: f64,
    /// Position of the first table in a batch
    pub anchor: Position,
    /// Radius of the 8 compass candidates around a target point
    pub near_radius: f64,
    /// Margin for the compass candidates
    pub near_margin: f64,
    /// Ring search: first radius, last radius, radius step
    pub ring_start: f64,
    pub ring_end: f64,
    pub ring_step: f64,
    pub ring_angle_step_deg: u32,
    pub ring_margin: f64,
    /// Perpendicular offset of a junction table from the midpoint of its targets
    pub junction_offset: f64,
    pub spiral_center: Position,
    pub spiral_start: f64,
    /// Radius growth per angular step, as a divisor of `min_spacing`
    pub spiral_growth_divisor: f64,
    /// Extra radius growth per full revolution
    pub spiral_revolution_growth: f64,
    pub spiral_max: f64,
    pub spiral_margin: f64,
    pub grid_pitch: f64,
    pub grid_offset: Position,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            table_width: 320.0,
            table_height: 280.0,
            min_spacing: 350.0,
            anchor: Position::new(150.0, 150.0),
            near_radius: 0.8,
            near_margin: 0.8,
            ring_start: 1.0,
            ring_end: 2.5,
            ring_step: 0.3,
            ring_angle_step_deg: 30,
            ring_margin: 0.7,
            junction_offset: 0.6,
            spiral_center: Position::new(200.0, 200.0),
            spiral_start: 0.6,
            spiral_growth_divisor: 12.0,
            spiral_revolution_growth: 0.4,
            spiral_max: 8.0,
            spiral_margin: 0.8,
            grid_pitch: 1.2,
            grid_offset: Position::new(150.0, 150.0),
        }
    }
}

/// A layout setting that would stall or break the free-slot search.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Layout setting {field} must be a positive number, got {value}")]
pub struct InvalidLayoutConfig {
    pub field: &'static str,
    pub value: f64,
}

impl LayoutConfig {
    /// Reject settings under which the ring or spiral search never advances.
    pub fn validate(&self) -> Result<(), InvalidLayoutConfig> {
        let steps = [
            ("tableWidth", self.table_width),
            ("tableHeight", self.table_height),
            ("minSpacing", self.min_spacing),
            ("ringStep", self.ring_step),
            ("spiralGrowthDivisor", self.spiral_growth_divisor),
            ("spiralMax", self.spiral_max),
        ];
        match steps.into_iter().find(|&(_, v)| !(v.is_finite() && v > 0.0)) {
            Some((field, value)) => Err(InvalidLayoutConfig { field, value }),
            None => Ok(()),
        }
    }
}

/// Axis-aligned rectangle; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(origin: Position, width: f64, height: f64) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width,
            height,
        }
    }

    /// Grow by `spacing / 2` on every side.
    pub fn padded(&self, spacing: f64) -> Self {
        let half = spacing / 2.0;
        Self {
            x: self.x - half,
            y: self.y - half,
            width: self.width + spacing,
            height: self.height + spacing,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict intersection; touching edges do not overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// A free slot found by the neighbourhood search.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub position: Position,
    pub distance: f64,
    pub angle_deg: u32,
}

impl Candidate {
    pub fn is_axis_aligned(&self) -> bool {
        self.angle_deg % 90 == 0
    }
}
