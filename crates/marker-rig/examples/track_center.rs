//! Drive the capture loop against a synthetic scene.
//!
//! The frame source, detector and solver are tiny stand-ins for the real
//! camera and fiducial primitives; the point of the example is the wiring:
//! catalog -> controller -> mode switch -> published events.
//!
//! Run with `cargo run --example track_center`.

use marker_rig::capture::{CaptureConfig, CaptureController, CaptureEvent, FrameSource, TaskMode};
use marker_rig::catalog::{Configuration, ConfigurationCatalog};
use marker_rig::core::{
    init_with_level, CameraCalibration, CameraIntrinsics, GrayFrame, GrayFrameView, Quad,
    RadialTangentialDistortion,
};
use marker_rig::fusion::{MarkerDetector, MarkerObservation, MarkerPose, PoseResolver, PoseSolver};
use nalgebra::{Point2, Vector3};
use std::collections::BTreeMap;
use std::time::Duration;

/// Produces flat gray frames forever.
struct SyntheticCamera;

impl FrameSource for SyntheticCamera {
    fn open(&mut self) -> Result<(), marker_rig::CaptureError> {
        Ok(())
    }

    fn grab(&mut self) -> Option<GrayFrame> {
        Some(GrayFrame::new(640, 480))
    }
}

/// Pretends to see markers 1 and 2 side by side in every frame.
struct StaticDetector;

fn quad_at(x: f64) -> Quad {
    Quad::new([
        Point2::new(x, 200.0),
        Point2::new(x + 80.0, 200.0),
        Point2::new(x + 80.0, 280.0),
        Point2::new(x, 280.0),
    ])
}

impl MarkerDetector for StaticDetector {
    fn detect(&self, _frame: &GrayFrameView<'_>) -> Vec<MarkerObservation> {
        vec![
            MarkerObservation {
                id: 1,
                corners: quad_at(180.0),
            },
            MarkerObservation {
                id: 2,
                corners: quad_at(380.0),
            },
        ]
    }
}

/// Places every marker two edge-lengths in front of the camera, offset
/// sideways by its image position.
struct FrontalSolver;

impl PoseSolver for FrontalSolver {
    fn solve(
        &self,
        corners: &Quad,
        _marker_edge: f64,
        _calibration: &CameraCalibration,
    ) -> Option<MarkerPose> {
        let center = corners.center();
        Some(MarkerPose {
            rotation: Vector3::zeros(),
            translation: Vector3::new((center.x - 320.0) / 320.0, 0.0, 2.0),
            reprojection_error: 0.2,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_with_level(log::LevelFilter::Info)?;

    let catalog = ConfigurationCatalog::from_entries([Configuration {
        identifier: "demo-rig".into(),
        name: "Demo rig".into(),
        kind: "demo".into(),
        date: "2024-05-01".into(),
        marker_ids: vec![1, 2],
        relative_points: BTreeMap::from([
            (1, Vector3::new(0.3, 0.0, 0.0)),
            (2, Vector3::new(-0.3, 0.0, 0.0)),
        ]),
    }])?;

    let calibration = CameraCalibration::new(
        CameraIntrinsics {
            fx: 600.0,
            fy: 600.0,
            cx: 320.0,
            cy: 240.0,
        },
        RadialTangentialDistortion::default(),
    );

    let mut controller =
        CaptureController::new(CaptureConfig::default(), Some(calibration), catalog);
    controller.set_mode(TaskMode::FindCenter)?;

    let resolver = PoseResolver::new(StaticDetector, FrontalSolver, 0.31);
    let events = controller.start(SyntheticCamera, resolver)?;

    let mut centers = 0;
    while centers < 10 {
        match events.recv_timeout(Duration::from_secs(1))? {
            CaptureEvent::ConfigurationChanged(Some(desc)) => {
                println!("configuration: {} ({})", desc.name, desc.identifier);
            }
            CaptureEvent::ConfigurationChanged(None) => println!("configuration lost"),
            CaptureEvent::CenterFound(fix) => {
                centers += 1;
                println!(
                    "center #{centers}: ({:.3}, {:.3}, {:.3})  distance {:.3}  angle {:.1} deg",
                    fix.point.x, fix.point.y, fix.point.z, fix.distance, fix.block_angle_degrees
                );
            }
            _ => {}
        }
    }

    controller.stop();
    Ok(())
}
