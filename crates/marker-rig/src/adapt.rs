//! Adapters between `image` buffers and the internal frame types.

use crate::core::{FrameBufferError, GrayFrame, GrayFrameView};

/// Borrow an `image::GrayImage` as the lightweight frame view type.
pub fn gray_view(img: &::image::GrayImage) -> GrayFrameView<'_> {
    GrayFrameView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Copy an `image::GrayImage` into an owned frame buffer.
pub fn gray_frame(img: &::image::GrayImage) -> Result<GrayFrame, FrameBufferError> {
    GrayFrame::from_raw(
        img.width() as usize,
        img.height() as usize,
        img.as_raw().clone(),
    )
}

/// Convert an owned frame back into an `image::GrayImage`.
///
/// Returns `None` when the buffer does not match the stated dimensions
/// (cannot happen for frames produced by this workspace).
pub fn to_gray_image(frame: &GrayFrame) -> Option<::image::GrayImage> {
    ::image::GrayImage::from_raw(
        frame.width as u32,
        frame.height as u32,
        frame.data.clone(),
    )
}
