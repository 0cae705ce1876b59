//! Camera calibration: pinhole intrinsics plus radial-tangential distortion.
//!
//! A [`CameraCalibration`] value is always internally consistent; the
//! session-level "calibration absent" state is `Option<CameraCalibration>`,
//! which disables pose-dependent task modes upstream.

use nalgebra::{Matrix3, Point2, Point3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum CalibrationIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Pinhole camera intrinsics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length in x (pixels).
    pub fx: f64,
    /// Focal length in y (pixels).
    pub fy: f64,
    /// Principal point x (pixels).
    pub cx: f64,
    /// Principal point y (pixels).
    pub cy: f64,
}

impl CameraIntrinsics {
    /// Returns `true` when all terms are finite and focal lengths non-zero.
    pub fn is_valid(self) -> bool {
        self.fx.is_finite()
            && self.fy.is_finite()
            && self.cx.is_finite()
            && self.cy.is_finite()
            && self.fx.abs() > 1e-12
            && self.fy.abs() > 1e-12
    }

    /// The 3x3 projection matrix `[[fx 0 cx] [0 fy cy] [0 0 1]]`.
    pub fn as_matrix(self) -> Matrix3<f64> {
        Matrix3::new(self.fx, 0.0, self.cx, 0.0, self.fy, self.cy, 0.0, 0.0, 1.0)
    }

    /// Read `fx`, `fy`, `cx`, `cy` back from a projection matrix.
    pub fn from_matrix(m: &Matrix3<f64>) -> Self {
        Self {
            fx: m[(0, 0)],
            fy: m[(1, 1)],
            cx: m[(0, 2)],
            cy: m[(1, 2)],
        }
    }

    /// Convert pixel coordinates to normalized pinhole coordinates.
    pub fn pixel_to_normalized(self, pixel: Point2<f64>) -> Option<Point2<f64>> {
        if !self.is_valid() {
            return None;
        }
        let x = (pixel.x - self.cx) / self.fx;
        let y = (pixel.y - self.cy) / self.fy;
        (x.is_finite() && y.is_finite()).then(|| Point2::new(x, y))
    }

    /// Convert normalized pinhole coordinates to pixel coordinates.
    pub fn normalized_to_pixel(self, normalized: Point2<f64>) -> Point2<f64> {
        Point2::new(
            self.fx * normalized.x + self.cx,
            self.fy * normalized.y + self.cy,
        )
    }
}

/// Brown-Conrady radial-tangential distortion coefficients.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RadialTangentialDistortion {
    /// Radial coefficient k1.
    #[serde(default)]
    pub k1: f64,
    /// Radial coefficient k2.
    #[serde(default)]
    pub k2: f64,
    /// Tangential coefficient p1.
    #[serde(default)]
    pub p1: f64,
    /// Tangential coefficient p2.
    #[serde(default)]
    pub p2: f64,
    /// Radial coefficient k3.
    #[serde(default)]
    pub k3: f64,
}

impl RadialTangentialDistortion {
    /// Apply distortion to normalized coordinates.
    pub fn distort_normalized(self, normalized: Point2<f64>) -> Point2<f64> {
        let x = normalized.x;
        let y = normalized.y;
        let r2 = x * x + y * y;
        let r4 = r2 * r2;
        let r6 = r4 * r2;
        let radial = 1.0 + self.k1 * r2 + self.k2 * r4 + self.k3 * r6;
        let x_tan = 2.0 * self.p1 * x * y + self.p2 * (r2 + 2.0 * x * x);
        let y_tan = self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * x * y;
        Point2::new(x * radial + x_tan, y * radial + y_tan)
    }

    pub fn coefficients(self) -> [f64; 5] {
        [self.k1, self.k2, self.p1, self.p2, self.k3]
    }
}

/// One session's camera calibration, loaded once and read-only afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CameraCalibration {
    pub intrinsics: CameraIntrinsics,
    #[serde(default)]
    pub distortion: RadialTangentialDistortion,
}

impl CameraCalibration {
    pub fn new(intrinsics: CameraIntrinsics, distortion: RadialTangentialDistortion) -> Self {
        Self {
            intrinsics,
            distortion,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.intrinsics.is_valid() && self.distortion.coefficients().iter().all(|c| c.is_finite())
    }

    /// Project a camera-frame 3D point to distorted pixel coordinates.
    ///
    /// Identity extrinsics: the point is already expressed in the camera
    /// frame. Points at or behind the image plane project to `None`.
    pub fn project_point(&self, point: &Point3<f64>) -> Option<Point2<f64>> {
        if point.z <= 1e-9 {
            return None;
        }
        let normalized = Point2::new(point.x / point.z, point.y / point.z);
        let distorted = self.distortion.distort_normalized(normalized);
        Some(self.intrinsics.normalized_to_pixel(distorted))
    }

    /// Load a calibration from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CalibrationIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this calibration to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CalibrationIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
