use crate::CaptureError;
use marker_rig_core::GrayFrame;

/// Frame acquisition seam.
///
/// Implementations wrap whatever actually produces frames (a camera
/// handle, a video file, a synthetic generator). The worker calls `open`
/// once before its first cycle and `close` once after its last.
pub trait FrameSource {
    /// Open the source. An error here is fatal: the capture loop never
    /// starts.
    fn open(&mut self) -> Result<(), CaptureError>;

    /// Grab the next frame.
    ///
    /// May block up to roughly one frame interval. `None` signals a
    /// transient acquisition failure; the worker skips that cycle and
    /// tries again on the next one.
    fn grab(&mut self) -> Option<GrayFrame>;

    /// Release the source. Called once when the loop exits.
    fn close(&mut self) {}
}
