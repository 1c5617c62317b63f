//! Deterministic scatter layout.
//!
//! Each gallery item gets a stable pseudo-random position and tilt derived
//! from its manifest index alone, so a reload produces the same layout. The
//! values are exposed as CSS custom properties (`--x`, `--y`, `--r`, `--i`);
//! stylesheets that don't reference them are unaffected.

use crate::dom::{Document, NodeId};
use serde::Serialize;

pub const LEFT_RANGE: (f64, f64) = (5.0, 95.0);
pub const TOP_RANGE: (f64, f64) = (5.0, 95.0);
pub const ROTATION_RANGE: (f64, f64) = (-8.0, 8.0);

/// Position (percent of the container) and rotation (degrees) for one item
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scatter {
    pub index: usize,
    pub left: f64,
    pub top: f64,
    pub rotation: f64,
}

/// Trigonometric hash: fractional part of `sin(seed * 999) * 10000`.
pub fn prand(seed: u64) -> f64 {
    let x = (seed as f64 * 999.0).sin() * 10000.0;
    x - x.floor()
}

fn lerp(range: (f64, f64), t: f64) -> f64 {
    range.0 + t * (range.1 - range.0)
}

/// Scatter values for manifest index `index`.
///
/// The three outputs draw from separate seeds (`3i+1`, `3i+2`, `3i+3`) so
/// they don't move together.
pub fn scatter_for(index: usize) -> Scatter {
    let base = index as u64 * 3;
    Scatter {
        index,
        left: lerp(LEFT_RANGE, prand(base + 1)),
        top: lerp(TOP_RANGE, prand(base + 2)),
        rotation: lerp(ROTATION_RANGE, prand(base + 3)),
    }
}

impl Scatter {
    /// Custom properties in the order they are written to the node.
    pub fn css_properties(&self) -> [(&'static str, String); 4] {
        [
            ("--x", format!("{}%", self.left)),
            ("--y", format!("{}%", self.top)),
            ("--r", format!("{}deg", self.rotation)),
            ("--i", self.index.to_string()),
        ]
    }

    /// Write the custom properties onto `node`'s inline style.
    pub fn apply(&self, doc: &mut Document, node: NodeId) {
        for (name, value) in self.css_properties() {
            doc.set_style_property(node, name, &value);
        }
    }
}
