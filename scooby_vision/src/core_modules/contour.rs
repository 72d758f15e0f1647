// THEORY:
// A `Contour` is one connected region of target-colored pixels found in a single
// frame. Like the rest of the per-frame data it is a "dumb" snapshot with no memory:
// the detector produces a fresh list every frame and the tracker keeps only the
// `BlobObservation` summary (centroid and area) of the largest one.

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// Mean position of a blob's pixels, in full-frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

impl Centroid {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Centroid and area of the dominant blob in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlobObservation {
    pub centroid: Centroid,
    /// Area in full-frame pixels.
    pub area: f64,
}

impl BlobObservation {
    pub fn new(x: f64, y: f64, area: f64) -> Self {
        Self {
            centroid: Centroid::new(x, y),
            area,
        }
    }
}

/// One connected region of matching pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// Top-left and bottom-right corners (inclusive), in full-frame pixels.
    pub bounding_box: (Point, Point),
    /// Area in full-frame pixels.
    pub area: f64,
    pub centroid: Centroid,
}

impl Contour {
    pub fn observation(&self) -> BlobObservation {
        BlobObservation {
            centroid: self.centroid,
            area: self.area,
        }
    }
}
