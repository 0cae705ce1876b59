//! Frame annotation drawn into the published grayscale buffer.

use marker_rig_core::GrayFrame;
use marker_rig_fusion::DetectedMarker;
use nalgebra::Point2;

/// Outline every detected marker quad in the frame.
pub fn draw_marker_outlines(frame: &mut GrayFrame, markers: &[DetectedMarker], value: u8) {
    for marker in markers {
        let corners = marker.corners.corners;
        for i in 0..4 {
            draw_line(frame, corners[i], corners[(i + 1) % 4], value);
        }
    }
}

/// Filled dot at the projected reference point.
pub fn draw_center_dot(frame: &mut GrayFrame, center: Point2<f64>, radius: i32, value: u8) {
    let cx = center.x.round() as i32;
    let cy = center.y.round() as i32;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                frame.put_pixel(cx + dx, cy + dy, value);
            }
        }
    }
}

fn draw_line(frame: &mut GrayFrame, from: Point2<f64>, to: Point2<f64>, value: u8) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = (from.x + dx * t).round() as i32;
        let y = (from.y + dy * t).round() as i32;
        frame.put_pixel(x, y, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marker_rig_core::Quad;

    #[test]
    fn outline_touches_all_corners() {
        let mut frame = GrayFrame::new(16, 16);
        let marker = DetectedMarker {
            id: 0,
            corners: Quad::new([
                Point2::new(2.0, 2.0),
                Point2::new(10.0, 2.0),
                Point2::new(10.0, 10.0),
                Point2::new(2.0, 10.0),
            ]),
            pose: None,
        };
        draw_marker_outlines(&mut frame, &[marker], 255);
        for (x, y) in [(2, 2), (10, 2), (10, 10), (2, 10)] {
            assert_eq!(frame.data[y * 16 + x], 255, "corner ({x},{y}) not drawn");
        }
        // interior stays untouched
        assert_eq!(frame.data[6 * 16 + 6], 0);
    }

    #[test]
    fn center_dot_is_filled_and_clipped() {
        let mut frame = GrayFrame::new(8, 8);
        draw_center_dot(&mut frame, Point2::new(0.0, 0.0), 2, 200);
        assert_eq!(frame.data[0], 200);
        assert_eq!(frame.data[2], 200);
        // clipping at the border must not panic or wrap
        assert_eq!(frame.data[7], 0);
    }
}
