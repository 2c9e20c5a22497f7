//! Canvas geometry for pack and unpack.
//!
//! None of this affects graph semantics. Positions only keep an editor
//! rendering of the rewritten graphs readable: boundary inputs sit to the
//! left of the task that consumes them, boundary outputs to the right of the
//! task that produces them, and an extracted subgraph is shifted so its
//! bounding box starts at a fixed padding from the origin.
//!
//! ```toml
//! # layout.toml
//! boundary_offset_x = 300.0
//! boundary_spacing_y = 80.0
//! padding = 40.0
//! ```

use std::path::Path;

use pipespec_core::annotations::Position;
use serde::{Deserialize, Serialize};

use crate::error::RewriteError;

/// Tunable layout constants. Every field falls back to its default when
/// missing from a config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal distance between a task and its synthesized boundary nodes.
    pub boundary_offset_x: f64,
    /// Vertical distance between successive boundary nodes of one task.
    pub boundary_spacing_y: f64,
    /// Margin kept between the origin and a normalized bounding box.
    pub padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            boundary_offset_x: 250.0,
            boundary_spacing_y: 100.0,
            padding: 50.0,
        }
    }
}

impl LayoutConfig {
    /// Parse a layout config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, RewriteError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a layout config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, RewriteError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Position of the `index`-th boundary input feeding a task at `anchor`.
    pub fn input_slot(&self, anchor: Position, index: usize) -> Position {
        anchor.offset(
            -self.boundary_offset_x,
            index as f64 * self.boundary_spacing_y,
        )
    }

    /// Position of the `index`-th boundary output produced by a task at `anchor`.
    pub fn output_slot(&self, anchor: Position, index: usize) -> Position {
        anchor.offset(
            self.boundary_offset_x,
            index as f64 * self.boundary_spacing_y,
        )
    }
}

/// Axis-aligned bounds of a set of positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Position,
    pub max: Position,
}

impl BoundingBox {
    /// Bounds of `points`, or `None` when there are none.
    pub fn from_points(points: impl IntoIterator<Item = Position>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };
        for p in iter {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Translate `p` so that this box's minimum corner lands at `(padding, padding)`.
    pub fn normalize(&self, p: Position, padding: f64) -> Position {
        p.rebase(self.min, Position::new(padding, padding))
    }
}
