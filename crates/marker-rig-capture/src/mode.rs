use serde::{Deserialize, Serialize};

/// The task the capture worker performs each cycle.
///
/// Exactly one mode is active at a time; switching to any mode replaces
/// the previous one, so mutual exclusion is structural rather than a
/// convention over independent flags. A switch takes effect at the top of
/// the next capture cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskMode {
    /// Acquire and publish frames only.
    #[default]
    Idle,
    /// Report detected marker IDs and corners; no pose resolution.
    DetectMarkers,
    /// Resolve all poses and publish per-marker camera distances.
    MeasureDistance,
    /// Resolve poses, match the configuration catalog and fuse the
    /// reference point.
    FindCenter,
}

impl TaskMode {
    /// Whether this mode resolves marker poses and therefore needs a
    /// loaded camera calibration.
    #[inline]
    pub fn requires_calibration(self) -> bool {
        matches!(self, TaskMode::MeasureDistance | TaskMode::FindCenter)
    }

    /// Whether marker detection runs at all in this mode.
    #[inline]
    pub fn runs_detection(self) -> bool {
        self != TaskMode::Idle
    }

    /// Human-readable task status line published on mode switches.
    pub fn status_text(self) -> &'static str {
        match self {
            TaskMode::Idle => "idle",
            TaskMode::DetectMarkers => "marker detection running",
            TaskMode::MeasureDistance => "distance measurement running",
            TaskMode::FindCenter => "center finding running",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibration_requirements() {
        assert!(!TaskMode::Idle.requires_calibration());
        assert!(!TaskMode::DetectMarkers.requires_calibration());
        assert!(TaskMode::MeasureDistance.requires_calibration());
        assert!(TaskMode::FindCenter.requires_calibration());
    }

    #[test]
    fn idle_runs_no_detection() {
        assert!(!TaskMode::Idle.runs_detection());
        assert!(TaskMode::DetectMarkers.runs_detection());
        assert!(TaskMode::MeasureDistance.runs_detection());
        assert!(TaskMode::FindCenter.runs_detection());
    }
}
