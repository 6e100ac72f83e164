//! Placement data handed to the rendering collaborator.
//!
//! The core never draws anything. It reports rectangles in viewport pixels
//! and the renderer decides how to paint them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{InterventionId, ScenarioOrdinal};

/// An axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RenderSpec {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl RenderSpec {
    /// Whether the point lies inside the rectangle (edges included).
    pub const fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Placement of one intervention marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MarkerLayout {
    /// The intervention drawn by this marker.
    pub intervention: InterventionId,
    /// The intervention's year.
    pub year: u32,
    /// Marker rectangle.
    pub rect: RenderSpec,
}

/// Placement of one timeline bar and its markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TimelineLayout {
    /// The scenario drawn by this bar.
    pub scenario: ScenarioOrdinal,
    /// Bar rectangle.
    pub bar: RenderSpec,
    /// Markers in placement order.
    pub markers: Vec<MarkerLayout>,
}
