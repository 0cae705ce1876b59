use marker_rig_catalog::Configuration;
use marker_rig_core::GrayFrame;
use marker_rig_fusion::MarkerObservation;
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// Descriptive metadata of a configuration, detached from its geometry.
///
/// This is what the presentation layer gets to display; the offsets stay
/// inside the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationDescriptor {
    pub identifier: String,
    pub name: String,
    pub kind: String,
    pub date: String,
}

impl From<&Configuration> for ConfigurationDescriptor {
    fn from(config: &Configuration) -> Self {
        Self {
            identifier: config.identifier.clone(),
            name: config.name.clone(),
            kind: config.kind.clone(),
            date: config.date.clone(),
        }
    }
}

/// Camera distance of one marker, published by MeasureDistance cycles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerDistance {
    pub id: u32,
    pub distance: f64,
}

/// One FindCenter result: the fused reference point and its presentation
/// companions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CenterFix {
    /// Fused reference point in camera space.
    pub point: Point3<f64>,
    /// The point projected into the image, when it lies in front of the
    /// camera.
    pub image_position: Option<Point2<f64>>,
    /// Euclidean distance from the camera to the reference point.
    pub distance: f64,
    /// In-plane rotation of the first visible member marker, degrees.
    pub block_angle_degrees: f64,
    pub configuration: ConfigurationDescriptor,
}

/// Snapshot published by the capture worker.
///
/// Every variant owns its data outright; the worker never publishes a
/// buffer it keeps mutating.
#[derive(Clone, Debug)]
pub enum CaptureEvent {
    /// The current frame, annotated as the mode dictates. Sent every
    /// cycle regardless of mode.
    Frame(GrayFrame),
    /// Markers seen this cycle (DetectMarkers mode).
    MarkersDetected(Vec<MarkerObservation>),
    /// Per-marker distances, sorted by marker ID ascending
    /// (MeasureDistance mode).
    DistancesMeasured(Vec<MarkerDistance>),
    /// Fused reference point (FindCenter mode, at least one member
    /// marker visible).
    CenterFound(CenterFix),
    /// The active configuration changed; fired once per actual change,
    /// `None` when it cleared.
    ConfigurationChanged(Option<ConfigurationDescriptor>),
    /// Free-text task status, published on accepted mode switches.
    TaskChanged(String),
}
