use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Image-plane corner quadrilateral of one detected marker.
///
/// Corner order is TL, TR, BR, BL, matching the usual fiducial decoder
/// convention.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub corners: [Point2<f64>; 4],
}

impl Quad {
    pub fn new(corners: [Point2<f64>; 4]) -> Self {
        Self { corners }
    }

    /// Arithmetic mean of the four corners.
    pub fn center(&self) -> Point2<f64> {
        let mut x = 0.0;
        let mut y = 0.0;
        for c in &self.corners {
            x += c.x;
            y += c.y;
        }
        Point2::new(x * 0.25, y * 0.25)
    }
}
