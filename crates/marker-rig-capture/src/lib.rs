//! Capture loop and task controller.
//!
//! A single dedicated worker thread pulls frames from a [`FrameSource`],
//! runs detection, matching and fusion according to the current
//! [`TaskMode`], and publishes deep-copied [`CaptureEvent`] snapshots over
//! an mpsc channel. The controlling context switches modes and stops the
//! worker through [`CaptureController`]; every shared field is read once
//! per cycle under one mutex, so a cycle always observes a consistent mode
//! snapshot.

mod controller;
mod event;
mod mode;
mod overlay;
mod source;
mod worker;

pub use controller::{CaptureConfig, CaptureController, CaptureError};
pub use event::{CaptureEvent, CenterFix, ConfigurationDescriptor, MarkerDistance};
pub use mode::TaskMode;
pub use overlay::{draw_center_dot, draw_marker_outlines};
pub use source::FrameSource;
