//! Conversion between pixel offsets inside the rendered image and percent space.

use crate::core::geo::{clamp_percent, MarkPosition, Point, RenderedImageFrame};

/// Stateless pixel/percent converter.
///
/// Callers must only pass frames for which [`RenderedImageFrame::is_valid`]
/// holds; conversion against a zero-sized frame is meaningless.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateMapper;

impl CoordinateMapper {
    /// Converts a pixel offset into a clamped percent position
    pub fn pixel_to_percent(px: f64, py: f64, frame: &RenderedImageFrame) -> MarkPosition {
        MarkPosition::new(
            clamp_percent(px / frame.width_px * 100.0),
            clamp_percent(py / frame.height_px * 100.0),
        )
    }

    /// Converts a percent position back to a pixel offset within the frame
    pub fn percent_to_pixel(mark: &MarkPosition, frame: &RenderedImageFrame) -> Point {
        Point::new(
            mark.x / 100.0 * frame.width_px,
            mark.y / 100.0 * frame.height_px,
        )
    }

    /// Pixel-space distance between two marks under the given frame
    pub fn distance_px(a: &MarkPosition, b: &MarkPosition, frame: &RenderedImageFrame) -> f64 {
        Self::percent_to_pixel(a, frame).distance_to(&Self::percent_to_pixel(b, frame))
    }

    /// Pixel-space distance between a pointer offset and a mark
    pub fn distance_to_pointer(mark: &MarkPosition, pointer: Point, frame: &RenderedImageFrame) -> f64 {
        Self::percent_to_pixel(mark, frame).distance_to(&pointer)
    }
}
