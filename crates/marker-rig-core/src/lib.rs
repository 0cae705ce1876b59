//! Core types for the `marker-rig-*` workspace.
//!
//! This crate is intentionally small and purely geometric. It holds the
//! session data every other crate agrees on (frame buffers, corner quads,
//! camera calibration) and does *not* depend on any concrete marker
//! detector or pose solver.

mod camera;
mod frame;
mod geometry;
mod logger;

pub use camera::{
    CalibrationIoError, CameraCalibration, CameraIntrinsics, RadialTangentialDistortion,
};
pub use frame::{FrameBufferError, GrayFrame, GrayFrameView};
pub use geometry::Quad;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
