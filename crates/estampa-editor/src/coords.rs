//! Display-to-pixel coordinate mapping.
//!
//! The editor renders images scaled to fit their container, so pointer
//! events arrive in CSS display coordinates while every mutation (mask
//! painting, point sampling, watermark drag) operates in source-image
//! pixel space. This module is the single source of truth for that
//! translation: painting, picking, and dragging all go through
//! [`map_to_pixel`].
//!
//! X and Y are scaled independently. A uniform scale would silently
//! mis-map clicks whenever the CSS layout aspect ratio differs from the
//! intrinsic aspect ratio.

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, PixelPoint};

/// Bounding rectangle of the displayed element in viewport (CSS)
/// coordinates, as reported by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    /// Distance from the viewport's left edge.
    pub left: f64,
    /// Distance from the viewport's top edge.
    pub top: f64,
    /// Rendered width in CSS pixels.
    pub width: f64,
    /// Rendered height in CSS pixels.
    pub height: f64,
}

impl DisplayRect {
    /// Create a new display rectangle.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Map a pointer event's viewport coordinates to integer source-image
/// pixel coordinates.
///
/// Returns `None` when the rectangle has a non-positive or non-finite
/// width or height — an element that has not been laid out yet cannot
/// produce a meaningful mapping, and dividing by its zero extent must
/// never leak into a coordinate.
#[must_use]
#[expect(clippy::cast_possible_truncation)]
pub fn map_to_pixel(
    client_x: f64,
    client_y: f64,
    rect: DisplayRect,
    intrinsic: Dimensions,
) -> Option<PixelPoint> {
    if !(rect.width.is_finite() && rect.height.is_finite()) {
        return None;
    }
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }

    let scale_x = f64::from(intrinsic.width) / rect.width;
    let scale_y = f64::from(intrinsic.height) / rect.height;

    let x = ((client_x - rect.left) * scale_x).round();
    let y = ((client_y - rect.top) * scale_y).round();

    Some(PixelPoint::new(x as i32, y as i32))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn maps_with_independent_axis_scales() {
        // Image displayed at 300x200 CSS pixels, intrinsic 1200x800.
        // Click at viewport (150, 150) with the element at the origin:
        // x = 150 * 1200/300 = 600, y = 150 * 800/200 = 600.
        let rect = DisplayRect::new(0.0, 0.0, 300.0, 200.0);
        let intrinsic = Dimensions::new(1200, 800);
        let p = map_to_pixel(150.0, 150.0, rect, intrinsic).unwrap();
        assert_eq!(p, PixelPoint::new(600, 600));
    }

    #[test]
    fn subtracts_element_offset() {
        let rect = DisplayRect::new(40.0, 10.0, 300.0, 200.0);
        let intrinsic = Dimensions::new(1200, 800);
        let p = map_to_pixel(190.0, 160.0, rect, intrinsic).unwrap();
        assert_eq!(p, PixelPoint::new(600, 600));
    }

    #[test]
    fn display_center_maps_to_intrinsic_center() {
        // Regardless of display scale, the center of the displayed
        // image maps to the intrinsic center (within rounding).
        let intrinsic = Dimensions::new(1201, 799);
        for scale in [0.1, 0.5, 1.0, 2.0, 7.3] {
            let rect = DisplayRect::new(
                13.0,
                29.0,
                f64::from(intrinsic.width) * scale,
                f64::from(intrinsic.height) * scale,
            );
            let p = map_to_pixel(
                rect.left + rect.width / 2.0,
                rect.top + rect.height / 2.0,
                rect,
                intrinsic,
            )
            .unwrap();
            assert!(
                (p.x - 600).abs() <= 1 && (p.y - 400).abs() <= 1,
                "center mapped to ({}, {}) at display scale {scale}",
                p.x,
                p.y,
            );
        }
    }

    #[test]
    fn rounds_to_nearest_pixel() {
        // 100 intrinsic pixels over 300 display pixels: one display
        // pixel is a third of a source pixel.
        let rect = DisplayRect::new(0.0, 0.0, 300.0, 300.0);
        let intrinsic = Dimensions::new(100, 100);
        let p = map_to_pixel(4.0, 5.0, rect, intrinsic).unwrap();
        assert_eq!(p, PixelPoint::new(1, 2)); // 1.333 -> 1, 1.666 -> 2
    }

    #[test]
    fn zero_extent_rect_refuses_to_map() {
        let intrinsic = Dimensions::new(100, 100);
        assert!(map_to_pixel(10.0, 10.0, DisplayRect::new(0.0, 0.0, 0.0, 50.0), intrinsic).is_none());
        assert!(map_to_pixel(10.0, 10.0, DisplayRect::new(0.0, 0.0, 50.0, 0.0), intrinsic).is_none());
        assert!(
            map_to_pixel(10.0, 10.0, DisplayRect::new(0.0, 0.0, -50.0, 50.0), intrinsic).is_none()
        );
    }

    #[test]
    fn non_finite_rect_refuses_to_map() {
        let intrinsic = Dimensions::new(100, 100);
        let rect = DisplayRect::new(0.0, 0.0, f64::NAN, 50.0);
        assert!(map_to_pixel(10.0, 10.0, rect, intrinsic).is_none());
    }

    #[test]
    fn unscaled_display_is_identity() {
        let rect = DisplayRect::new(0.0, 0.0, 640.0, 480.0);
        let intrinsic = Dimensions::new(640, 480);
        let p = map_to_pixel(123.0, 77.0, rect, intrinsic).unwrap();
        assert_eq!(p, PixelPoint::new(123, 77));
    }
}
