#[derive(Clone, Copy, Debug)]
pub struct GrayFrameView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

/// Owned grayscale frame buffer.
///
/// Frames published by the capture worker are deep copies of this type, so
/// a consumer never observes a buffer the worker is still drawing into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayFrame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

#[derive(thiserror::Error, Debug)]
pub enum FrameBufferError {
    #[error("frame buffer length mismatch (expected {expected} bytes, got {got})")]
    LengthMismatch { expected: usize, got: usize },
}

impl GrayFrame {
    /// Allocate a zeroed frame of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Wrap an existing row-major buffer, checking its length.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, FrameBufferError> {
        let expected = width * height;
        if data.len() != expected {
            return Err(FrameBufferError::LengthMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> GrayFrameView<'_> {
        GrayFrameView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    /// Set one pixel; out-of-bounds coordinates are ignored.
    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, value: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.data[y as usize * self.width + x as usize] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_wrong_length() {
        let err = GrayFrame::from_raw(4, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            FrameBufferError::LengthMismatch {
                expected: 16,
                got: 15
            }
        ));
    }

    #[test]
    fn put_pixel_ignores_out_of_bounds() {
        let mut frame = GrayFrame::new(2, 2);
        frame.put_pixel(-1, 0, 255);
        frame.put_pixel(0, 2, 255);
        assert!(frame.data.iter().all(|&p| p == 0));

        frame.put_pixel(1, 1, 7);
        assert_eq!(frame.data[3], 7);
    }
}
