//! The capture worker: one dedicated thread, one cycle per frame.

use crate::event::{CaptureEvent, CenterFix, ConfigurationDescriptor, MarkerDistance};
use crate::overlay::{draw_center_dot, draw_marker_outlines};
use crate::{FrameSource, TaskMode};
use marker_rig_catalog::{match_configuration, Configuration, ConfigurationCatalog};
use marker_rig_core::{CameraCalibration, GrayFrame};
use marker_rig_fusion::{
    candidate_points, fuse, DetectedMarker, FusionStrategy, MarkerDetector, MarkerObservation,
    PoseResolver, PoseSolver,
};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Gray value used for overlay drawing.
const OVERLAY_VALUE: u8 = 255;

/// Radius of the projected-center dot, pixels.
const CENTER_DOT_RADIUS: i32 = 5;

/// Fields shared between the controller and the worker.
///
/// The worker reads the whole block once at the top of each cycle, under
/// the lock, so every cycle sees one mutually consistent snapshot.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub mode: TaskMode,
    pub stop: bool,
    pub strategy: FusionStrategy,
    /// New marker edge length to apply before the next cycle.
    pub marker_edge: Option<f64>,
    /// Replacement catalog to swap in before the next cycle.
    pub pending_catalog: Option<ConfigurationCatalog>,
}

/// Lock that survives a panicked peer instead of propagating the poison.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) struct Worker<F, D, S> {
    pub source: F,
    pub resolver: PoseResolver<D, S>,
    pub calibration: Option<CameraCalibration>,
    pub catalog: ConfigurationCatalog,
    pub shared: Arc<Mutex<Shared>>,
    pub events: Sender<CaptureEvent>,
    pub cycle_interval: Duration,
    /// Identifier of the configuration currently believed present.
    pub active: Option<String>,
}

impl<F: FrameSource, D: MarkerDetector, S: PoseSolver> Worker<F, D, S> {
    pub(crate) fn run(mut self) {
        log::info!("capture loop started");

        loop {
            let mut catalog_swapped = false;
            let (mode, strategy) = {
                let mut shared = lock(&self.shared);
                if shared.stop {
                    break;
                }
                if let Some(catalog) = shared.pending_catalog.take() {
                    self.catalog = catalog;
                    catalog_swapped = true;
                }
                if let Some(edge) = shared.marker_edge.take() {
                    self.resolver.set_marker_edge(edge);
                }
                (shared.mode, shared.strategy)
            };

            if catalog_swapped {
                log::info!("configuration catalog replaced ({} entries)", self.catalog.len());
                self.set_active(None);
            }

            match self.source.grab() {
                Some(frame) => self.run_cycle(frame, mode, strategy),
                // transient acquisition failure: skip this cycle
                None => log::debug!("frame acquisition failed, cycle skipped"),
            }

            std::thread::sleep(self.cycle_interval);
        }

        self.source.close();
        log::info!("capture loop stopped");
    }

    fn run_cycle(&mut self, frame: GrayFrame, mode: TaskMode, strategy: FusionStrategy) {
        let mut annotated = frame.clone();
        let mut markers: Vec<DetectedMarker> = if mode.runs_detection() {
            self.resolver.detect(&frame.view())
        } else {
            Vec::new()
        };

        if mode.runs_detection() && markers.is_empty() {
            // Nothing visible: the previously active configuration is
            // stale and must not survive this cycle.
            self.set_active(None);
        }

        match mode {
            TaskMode::Idle => {}
            TaskMode::DetectMarkers => self.detect_markers(&mut annotated, &markers),
            TaskMode::MeasureDistance => self.measure_distance(&mut annotated, &mut markers),
            TaskMode::FindCenter => self.find_center(&mut annotated, &mut markers, strategy),
        }

        self.emit(CaptureEvent::Frame(annotated));
    }

    fn detect_markers(&mut self, annotated: &mut GrayFrame, markers: &[DetectedMarker]) {
        if markers.is_empty() {
            return;
        }
        draw_marker_outlines(annotated, markers, OVERLAY_VALUE);
        let observations: Vec<MarkerObservation> = markers
            .iter()
            .map(|m| MarkerObservation {
                id: m.id,
                corners: m.corners,
            })
            .collect();
        self.emit(CaptureEvent::MarkersDetected(observations));
    }

    fn measure_distance(&mut self, annotated: &mut GrayFrame, markers: &mut Vec<DetectedMarker>) {
        // mode gating in the controller guarantees calibration here
        let Some(calibration) = self.calibration.as_ref() else {
            return;
        };
        self.resolver.resolve_poses(markers, calibration);
        if markers.is_empty() {
            return;
        }

        draw_marker_outlines(annotated, markers, OVERLAY_VALUE);

        let mut distances: Vec<MarkerDistance> = markers
            .iter()
            .filter_map(|m| {
                m.pose.map(|pose| MarkerDistance {
                    id: m.id,
                    distance: pose.distance(),
                })
            })
            .collect();
        distances.sort_by_key(|d| d.id);
        self.emit(CaptureEvent::DistancesMeasured(distances));
    }

    fn find_center(
        &mut self,
        annotated: &mut GrayFrame,
        markers: &mut Vec<DetectedMarker>,
        strategy: FusionStrategy,
    ) {
        let Some(calibration) = self.calibration else {
            return;
        };
        self.resolver.resolve_poses(markers, &calibration);

        let ids: Vec<u32> = markers.iter().map(|m| m.id).collect();
        let matched = match_configuration(&ids, &self.catalog).cloned();
        self.set_active(matched.as_ref());

        let Some(config) = matched else {
            return;
        };
        let candidates = candidate_points(&config, markers);
        let Some(point) = fuse(&candidates, strategy) else {
            return;
        };

        let image_position = calibration.project_point(&point);
        if let Some(px) = image_position {
            draw_center_dot(annotated, px, CENTER_DOT_RADIUS, OVERLAY_VALUE);
        }

        let block_angle_degrees = candidates
            .first()
            .and_then(|c| markers.iter().find(|m| m.id == c.marker_id))
            .and_then(|m| m.pose)
            .map(|pose| pose.in_plane_angle_degrees())
            .unwrap_or(0.0);

        self.emit(CaptureEvent::CenterFound(CenterFix {
            point,
            image_position,
            distance: point.coords.norm(),
            block_angle_degrees,
            configuration: ConfigurationDescriptor::from(&config),
        }));
    }

    /// Track the active configuration; fires `ConfigurationChanged`
    /// exactly once per actual change.
    fn set_active(&mut self, config: Option<&Configuration>) {
        let identifier = config.map(|c| c.identifier.clone());
        if self.active == identifier {
            return;
        }
        match &identifier {
            Some(id) => log::info!("active configuration: {id}"),
            None => log::info!("active configuration cleared"),
        }
        self.active = identifier;
        self.emit(CaptureEvent::ConfigurationChanged(
            config.map(ConfigurationDescriptor::from),
        ));
    }

    fn emit(&self, event: CaptureEvent) {
        // a dropped receiver only means nobody is listening anymore
        let _ = self.events.send(event);
    }
}
