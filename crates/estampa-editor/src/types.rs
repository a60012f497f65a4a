//! Shared types for the estampa editing core.

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can reference mask
/// bitmaps without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbaImage` so downstream crates can reference decoded
/// source images without depending on `image` directly.
pub use image::RgbaImage;

/// An RGB triple sampled from the source image.
///
/// Serializes as a three-element array (`[r, g, b]`), matching the
/// JSON payload the processing backend expects for color lists.
pub type Rgb = [u8; 3];

/// A point in source-image pixel space.
///
/// Coordinates are signed because they come from rounded pointer
/// positions: a pointer event captured at the very edge of the
/// displayed element can land one pixel outside the intrinsic bounds.
/// Consumers that read pixels treat out-of-bounds points as misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal position (pixels from left edge).
    pub x: i32,
    /// Vertical position (pixels from top edge).
    pub y: i32,
}

impl PixelPoint {
    /// Create a new pixel point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether the point lies within `[0, width) x [0, height)`.
    #[must_use]
    #[expect(clippy::cast_sign_loss)]
    pub fn contains(self, point: PixelPoint) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as u32) < self.width
            && (point.y as u32) < self.height
    }
}

/// Errors that can occur in the editing core.
///
/// Precondition failures (`NoImage`, `MaskRequired`, `PointRequired`)
/// are user-facing: callers surface their messages directly instead of
/// logging them. Lifecycle gaps (missing buffer, unlaid-out element)
/// are **not** errors; those paths return `Option`/no-op instead.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// An operation that needs a loaded source image was invoked
    /// before any image was loaded.
    #[error("no image loaded")]
    NoImage,

    /// A mask-driven operation was requested before any stroke was
    /// painted.
    #[error("draw a mask first")]
    MaskRequired,

    /// A point-driven operation was requested before the user clicked
    /// a point on the image.
    #[error("click a point on the image first")]
    PointRequired,

    /// Encoding the mask bitmap to PNG failed.
    #[error("failed to encode mask as PNG: {0}")]
    PngEncode(#[from] image::ImageError),

    /// A processing result arrived for a superseded image or mode and
    /// was rejected instead of being applied.
    #[error("stale processing result: session is at generation {current}, result was for {requested}")]
    StaleResult {
        /// Generation the session is currently at.
        current: u64,
        /// Generation the result was produced for.
        requested: u64,
    },
}
