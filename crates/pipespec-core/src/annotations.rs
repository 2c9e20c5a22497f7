//! Annotation bags and the editor position stored inside them.
//!
//! Annotations are an opaque string-to-string map carried by tasks, inputs,
//! outputs, and component metadata. The core only understands two keys:
//! the 2D editor position and the component author.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque key/value bag.
pub type Annotations = BTreeMap<String, String>;

/// Key under which an element's editor position is stored, as JSON text.
pub const POSITION_ANNOTATION: &str = "editor.position";

/// Key under which a component's author is stored in its metadata.
pub const AUTHOR_ANNOTATION: &str = "author";

/// A point on the editor canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Read the position stored in `annotations`, if present and well-formed.
    pub fn read(annotations: &Annotations) -> Option<Position> {
        annotations
            .get(POSITION_ANNOTATION)
            .and_then(|text| serde_json::from_str(text).ok())
    }

    /// Store this position in `annotations`, replacing any previous value.
    pub fn write(&self, annotations: &mut Annotations) {
        // Two finite floats always serialize.
        if let Ok(text) = serde_json::to_string(self) {
            annotations.insert(POSITION_ANNOTATION.to_string(), text);
        }
    }

    /// Return a copy of `annotations` with this position stored in it.
    pub fn applied_to(&self, annotations: &Annotations) -> Annotations {
        let mut out = annotations.clone();
        self.write(&mut out);
        out
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    /// Translate so that `from` maps onto `to`.
    pub fn rebase(&self, from: Position, to: Position) -> Position {
        Position::new(self.x - from.x + to.x, self.y - from.y + to.y)
    }
}

/// Centroid of a set of positions, or `None` when empty.
pub fn centroid(points: impl IntoIterator<Item = Position>) -> Option<Position> {
    let mut count = 0usize;
    let mut sum = Position::default();
    for p in points {
        sum.x += p.x;
        sum.y += p.y;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(Position::new(sum.x / count as f64, sum.y / count as f64))
}
