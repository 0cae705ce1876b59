//! The seam to the external detection and pose-estimation primitives.

use marker_rig_core::{CameraCalibration, GrayFrameView, Quad};
use nalgebra::{Matrix3, Point2, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// One marker found in a frame: decoded ID plus image-plane corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerObservation {
    pub id: u32,
    pub corners: Quad,
}

/// Pose of one marker relative to the camera.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerPose {
    /// Axis-angle rotation vector (Rodrigues convention).
    pub rotation: Vector3<f64>,
    /// Translation from the camera origin, in marker-edge units.
    pub translation: Vector3<f64>,
    /// Solver reprojection error; weighted-average fusion uses its inverse
    /// as the per-marker confidence.
    pub reprojection_error: f64,
}

impl MarkerPose {
    /// Euclidean distance from the camera to the marker. Display only,
    /// never used in fusion.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.translation.norm()
    }

    /// Rotation vector expanded into a rotation matrix.
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        Rotation3::from_scaled_axis(self.rotation).into_inner()
    }

    /// In-plane (image-plane) rotation of the marker, degrees in
    /// `(-180, 180]`.
    pub fn in_plane_angle_degrees(&self) -> f64 {
        let r = self.rotation_matrix();
        r[(1, 0)].atan2(r[(0, 0)]).to_degrees()
    }
}

/// Per-frame detection, optionally carrying a resolved pose.
///
/// Lives for exactly one capture cycle; poses are never cached across
/// frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectedMarker {
    pub id: u32,
    pub corners: Quad,
    pub pose: Option<MarkerPose>,
}

impl DetectedMarker {
    /// Image-plane center of the marker (mean of the four corners).
    #[inline]
    pub fn center(&self) -> Point2<f64> {
        self.corners.center()
    }
}

/// External marker detector: IDs and corners from one frame.
///
/// Implementations must be deterministic for a fixed frame and detector
/// parameters, must report each ID at most once per frame, and must keep
/// `ids` and `corners` positionally aligned (encoded here by returning
/// them as one record per marker).
pub trait MarkerDetector {
    fn detect(&self, frame: &GrayFrameView<'_>) -> Vec<MarkerObservation>;
}

/// External 2D-to-3D pose solver.
///
/// Returns `None` when the solve does not converge for the given corners.
pub trait PoseSolver {
    fn solve(
        &self,
        corners: &Quad,
        marker_edge: f64,
        calibration: &CameraCalibration,
    ) -> Option<MarkerPose>;
}

/// Adapter over the external detector/solver pair.
///
/// Owns the fixed physical marker edge length; all downstream geometry is
/// expressed in that unit.
#[derive(Clone, Debug)]
pub struct PoseResolver<D, S> {
    detector: D,
    solver: S,
    marker_edge: f64,
}

impl<D: MarkerDetector, S: PoseSolver> PoseResolver<D, S> {
    pub fn new(detector: D, solver: S, marker_edge: f64) -> Self {
        Self {
            detector,
            solver,
            marker_edge,
        }
    }

    #[inline]
    pub fn marker_edge(&self) -> f64 {
        self.marker_edge
    }

    /// Change the physical marker edge length.
    ///
    /// Poses are recomputed every frame, so the new size simply applies
    /// from the next resolve on.
    pub fn set_marker_edge(&mut self, marker_edge: f64) {
        self.marker_edge = marker_edge;
    }

    /// Run detection on one frame. No poses are resolved here.
    pub fn detect(&self, frame: &GrayFrameView<'_>) -> Vec<DetectedMarker> {
        self.detector
            .detect(frame)
            .into_iter()
            .map(|obs| DetectedMarker {
                id: obs.id,
                corners: obs.corners,
                pose: None,
            })
            .collect()
    }

    /// Resolve poses for all detections in place.
    ///
    /// Markers whose solve does not converge are dropped from the list so
    /// that pose-dependent computations this cycle never see them.
    pub fn resolve_poses(
        &self,
        markers: &mut Vec<DetectedMarker>,
        calibration: &CameraCalibration,
    ) {
        markers.retain_mut(|marker| {
            match self
                .solver
                .solve(&marker.corners, self.marker_edge, calibration)
            {
                Some(pose) => {
                    marker.pose = Some(pose);
                    true
                }
                None => {
                    log::debug!("pose solve failed for marker {}, dropped", marker.id);
                    false
                }
            }
        });
    }
}
