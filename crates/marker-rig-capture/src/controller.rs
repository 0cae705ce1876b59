//! Session-facing handle for the capture worker.

use crate::worker::{lock, Shared, Worker};
use crate::{CaptureEvent, FrameSource, TaskMode};
use marker_rig_catalog::ConfigurationCatalog;
use marker_rig_core::CameraCalibration;
use marker_rig_fusion::{FusionStrategy, MarkerDetector, PoseResolver, PoseSolver};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// Fatal capture-session errors, reported once to the caller.
#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("capture source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("camera calibration not loaded; pose-dependent modes are disabled")]
    CalibrationMissing,
    #[error("capture loop is already running")]
    AlreadyRunning,
}

/// Capture-session settings.
#[derive(Clone, Copy, Debug)]
pub struct CaptureConfig {
    /// Target cycle cadence of the worker loop.
    pub cycle_interval: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            cycle_interval: Duration::from_millis(30),
        }
    }
}

/// Owns the worker thread and the shared state the worker snapshots each
/// cycle.
///
/// Calibration and catalog are loaded by the caller before the session
/// starts; the controller only forwards them. All mode switches are
/// mutually exclusive by construction (one [`TaskMode`] value), and a
/// switch takes effect before the detection step of the worker's next
/// cycle.
pub struct CaptureController {
    config: CaptureConfig,
    calibration: Option<CameraCalibration>,
    catalog: ConfigurationCatalog,
    shared: Arc<Mutex<Shared>>,
    worker: Option<JoinHandle<()>>,
    events: Option<Sender<CaptureEvent>>,
}

impl CaptureController {
    pub fn new(
        config: CaptureConfig,
        calibration: Option<CameraCalibration>,
        catalog: ConfigurationCatalog,
    ) -> Self {
        Self {
            config,
            calibration,
            catalog,
            shared: Arc::new(Mutex::new(Shared::default())),
            worker: None,
            events: None,
        }
    }

    /// Start the capture loop on its own thread.
    ///
    /// Fatal-at-start conditions are reported here and the worker never
    /// begins its loop: the source failing to open, a second `start`
    /// while running, or a pose-dependent mode already requested with no
    /// calibration loaded. On success the returned receiver delivers the
    /// worker's [`CaptureEvent`] snapshots.
    pub fn start<F, D, S>(
        &mut self,
        mut source: F,
        resolver: PoseResolver<D, S>,
    ) -> Result<Receiver<CaptureEvent>, CaptureError>
    where
        F: FrameSource + Send + 'static,
        D: MarkerDetector + Send + 'static,
        S: PoseSolver + Send + 'static,
    {
        if self.worker.is_some() {
            return Err(CaptureError::AlreadyRunning);
        }
        {
            let shared = lock(&self.shared);
            if shared.mode.requires_calibration() && self.calibration.is_none() {
                return Err(CaptureError::CalibrationMissing);
            }
        }

        source.open()?;

        let (tx, rx) = mpsc::channel();
        {
            let mut shared = lock(&self.shared);
            shared.stop = false;
        }

        let worker = Worker {
            source,
            resolver,
            calibration: self.calibration,
            catalog: self.catalog.clone(),
            shared: Arc::clone(&self.shared),
            events: tx.clone(),
            cycle_interval: self.config.cycle_interval,
            active: None,
        };
        self.worker = Some(std::thread::spawn(move || worker.run()));
        self.events = Some(tx);
        Ok(rx)
    }

    /// Request a task mode; takes effect at the top of the worker's next
    /// cycle.
    ///
    /// `MeasureDistance` and `FindCenter` are rejected with
    /// [`CaptureError::CalibrationMissing`] when no calibration was
    /// loaded, leaving the current mode unchanged.
    pub fn set_mode(&mut self, mode: TaskMode) -> Result<(), CaptureError> {
        if mode.requires_calibration() && self.calibration.is_none() {
            return Err(CaptureError::CalibrationMissing);
        }
        let changed = {
            let mut shared = lock(&self.shared);
            let changed = shared.mode != mode;
            shared.mode = mode;
            changed
        };
        if changed {
            log::info!("task mode -> {mode:?}");
            if let Some(events) = &self.events {
                let _ = events.send(CaptureEvent::TaskChanged(mode.status_text().to_string()));
            }
        }
        Ok(())
    }

    /// Cancel the current task: switch back to [`TaskMode::Idle`].
    pub fn cancel(&mut self) {
        // Idle never requires calibration, so this cannot fail.
        let _ = self.set_mode(TaskMode::Idle);
    }

    /// Currently requested task mode.
    pub fn mode(&self) -> TaskMode {
        lock(&self.shared).mode
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn has_calibration(&self) -> bool {
        self.calibration.is_some()
    }

    /// Select the fusion strategy used by FindCenter cycles.
    pub fn set_fusion_strategy(&self, strategy: FusionStrategy) {
        lock(&self.shared).strategy = strategy;
    }

    /// Change the physical marker edge length; applies from the next
    /// cycle (per-frame poses are never cached, so nothing else needs
    /// invalidating).
    pub fn set_marker_edge(&self, marker_edge: f64) {
        lock(&self.shared).marker_edge = Some(marker_edge);
    }

    /// Replace the configuration catalog.
    ///
    /// The worker swaps the new catalog in between cycles and clears the
    /// active configuration; the core never re-reads the backing store on
    /// its own.
    pub fn reload_catalog(&mut self, catalog: ConfigurationCatalog) {
        if self.worker.is_some() {
            lock(&self.shared).pending_catalog = Some(catalog.clone());
        }
        self.catalog = catalog;
    }

    /// Stop the worker after its current cycle and join it.
    ///
    /// No-op when already stopped.
    pub fn stop(&mut self) {
        let Some(handle) = self.worker.take() else {
            return;
        };
        lock(&self.shared).stop = true;
        if handle.join().is_err() {
            log::warn!("capture worker panicked before shutdown");
        }
        self.events = None;
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        self.stop();
    }
}
