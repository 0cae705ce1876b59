//! High-level facade crate for the `marker-rig-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying crates
//! - (feature-gated) adapters between `image` buffers and the internal
//!   frame types.
//!
//! ## Quickstart
//!
//! ```
//! use marker_rig::catalog::{match_configuration, Configuration, ConfigurationCatalog};
//! use marker_rig::fusion::{fuse_reference_point, DetectedMarker, FusionStrategy, MarkerPose};
//! use marker_rig::core::Quad;
//! use nalgebra::{Point2, Vector3};
//! use std::collections::BTreeMap;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // One configuration: two markers, half a unit left and right of the
//! // reference point.
//! let config = Configuration {
//!     identifier: "bench-rig".into(),
//!     name: "Bench rig".into(),
//!     kind: String::new(),
//!     date: String::new(),
//!     marker_ids: vec![1, 2],
//!     relative_points: BTreeMap::from([
//!         (1, Vector3::new(0.5, 0.0, 0.0)),
//!         (2, Vector3::new(-0.5, 0.0, 0.0)),
//!     ]),
//! };
//! let catalog = ConfigurationCatalog::from_entries([config])?;
//!
//! // Both markers visible with resolved poses.
//! let quad = Quad::new([
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ]);
//! let markers: Vec<DetectedMarker> = [(1u32, -0.5f64), (2, 0.5)]
//!     .iter()
//!     .map(|&(id, x)| DetectedMarker {
//!         id,
//!         corners: quad,
//!         pose: Some(MarkerPose {
//!             rotation: Vector3::zeros(),
//!             translation: Vector3::new(x, 0.0, 2.0),
//!             reprojection_error: 0.1,
//!         }),
//!     })
//!     .collect();
//!
//! let active = match_configuration(&[1, 2], &catalog).expect("match");
//! let center = fuse_reference_point(active, &markers, FusionStrategy::Median);
//! assert!(center.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `marker_rig::core`: frames, quads, camera calibration, logging.
//! - `marker_rig::catalog`: configuration records, ordered catalog,
//!   first-match lookup.
//! - `marker_rig::fusion`: detector/solver seams, pose resolution,
//!   reference-point fusion.
//! - `marker_rig::capture`: task controller and the capture worker loop.
//! - `marker_rig::adapt` (feature `image`): `image`-buffer adapters.

pub use marker_rig_capture as capture;
pub use marker_rig_catalog as catalog;
pub use marker_rig_core as core;
pub use marker_rig_fusion as fusion;

pub use marker_rig_capture::{
    CaptureConfig, CaptureController, CaptureError, CaptureEvent, TaskMode,
};
pub use marker_rig_catalog::{Configuration, ConfigurationCatalog};
pub use marker_rig_core::{CameraCalibration, GrayFrame, GrayFrameView, Quad};
pub use marker_rig_fusion::{FusionStrategy, PoseResolver};

#[cfg(feature = "image")]
pub mod adapt;
