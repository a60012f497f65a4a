//! Mask buffer: an off-screen binary bitmap with bounded undo history.
//!
//! The mask tells the processing backend which region of the source
//! image an operation should affect. Pixels are binary in meaning:
//! 0 (black) is excluded, 255 (white) is included. The buffer is always
//! allocated at the source image's **intrinsic** pixel dimensions,
//! never the on-screen display size — pointer coordinates are mapped
//! through [`crate::coords`] before they reach this module.
//!
//! Undo works on whole strokes: a snapshot of the full bitmap is taken
//! at the start of each stroke (never mid-stroke), and undo restores
//! the most recent snapshot. History is bounded; the oldest snapshot is
//! silently evicted once the bound is exceeded.

use std::collections::VecDeque;

use image::{GrayImage, ImageEncoder, Luma};

use crate::types::{Dimensions, EditorError, PixelPoint};

/// Pixel value for mask areas the backend should act on.
pub const INCLUDED: u8 = 255;

/// Pixel value for areas the backend should leave alone.
pub const EXCLUDED: u8 = 0;

/// Maximum number of stroke snapshots retained for undo.
pub const HISTORY_LIMIT: usize = 10;

/// A binary mask bitmap with bounded stroke-undo history.
#[derive(Debug, Clone)]
pub struct MaskBuffer {
    bitmap: GrayImage,
    history: VecDeque<GrayImage>,
}

impl MaskBuffer {
    /// Allocate a mask at the given intrinsic image dimensions, fully
    /// excluded (all black).
    #[must_use]
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            // GrayImage::new zero-fills, which is the excluded value.
            bitmap: GrayImage::new(dimensions.width, dimensions.height),
            history: VecDeque::new(),
        }
    }

    /// Dimensions of the mask bitmap.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.bitmap.width(), self.bitmap.height())
    }

    /// Snapshot the current bitmap at the start of a new stroke.
    ///
    /// Evicts the oldest snapshot when the history is already at
    /// [`HISTORY_LIMIT`]. Call once per stroke, before its first
    /// [`paint_circle`](Self::paint_circle).
    pub fn begin_stroke(&mut self) {
        if self.history.len() >= HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(self.bitmap.clone());
    }

    /// Paint a filled included-value circle centered at `center`.
    ///
    /// Pixels falling outside the buffer are silently clipped.
    pub fn paint_circle(&mut self, center: PixelPoint, diameter: u32) {
        #[expect(clippy::cast_possible_wrap)]
        let radius = (diameter / 2) as i32;
        imageproc::drawing::draw_filled_circle_mut(
            &mut self.bitmap,
            (center.x, center.y),
            radius,
            Luma([INCLUDED]),
        );
    }

    /// Restore the most recent stroke snapshot.
    ///
    /// Returns `true` if a snapshot was restored, `false` (no-op) when
    /// the history is empty.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_back() {
            Some(snapshot) => {
                self.bitmap = snapshot;
                true
            }
            None => false,
        }
    }

    /// Hard reset: every pixel back to excluded and the undo history
    /// drained. Not itself undoable — this models replacing the mask
    /// when the image changes or a drawing mode is re-entered, where
    /// snapshots of the previous mask must not leak into the new one.
    pub fn clear(&mut self) {
        for pixel in self.bitmap.pixels_mut() {
            *pixel = Luma([EXCLUDED]);
        }
        self.history.clear();
    }

    /// Number of snapshots currently held for undo.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Whether the pixel at `point` is included. Out-of-bounds points
    /// read as excluded.
    #[must_use]
    #[expect(clippy::cast_sign_loss)]
    pub fn is_included(&self, point: PixelPoint) -> bool {
        if !self.dimensions().contains(point) {
            return false;
        }
        self.bitmap.get_pixel(point.x as u32, point.y as u32).0[0] == INCLUDED
    }

    /// Borrow the underlying bitmap.
    #[must_use]
    pub const fn bitmap(&self) -> &GrayImage {
        &self.bitmap
    }

    /// Encode the current bitmap as an L8 PNG.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PngEncode`] if PNG encoding fails.
    pub fn to_png(&self) -> Result<Vec<u8>, EditorError> {
        let mut png_bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder.write_image(
            self.bitmap.as_raw(),
            self.bitmap.width(),
            self.bitmap.height(),
            image::ExtendedColorType::L8,
        )?;
        Ok(png_bytes)
    }
}
