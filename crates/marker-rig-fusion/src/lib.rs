//! Marker pose resolution and reference-point fusion.
//!
//! This crate sits between the external detection primitives and the
//! capture loop. The detector and the 2D-to-3D pose solver are consumed as
//! black boxes behind the [`MarkerDetector`] and [`PoseSolver`] traits;
//! on top of them live the per-marker candidate generation and the
//! reduction of many noisy single-marker estimates into one robust
//! reference point.

mod fuse;
mod resolver;

pub use fuse::{candidate_points, fuse, fuse_reference_point, CandidatePoint, FusionStrategy};
pub use resolver::{
    DetectedMarker, MarkerDetector, MarkerObservation, MarkerPose, PoseResolver, PoseSolver,
};
