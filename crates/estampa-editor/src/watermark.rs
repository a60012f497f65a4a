//! Watermark placement, shape clipping, and compositing.
//!
//! Maintains position/scale/shape state for a watermark overlay in
//! **base-image pixel space** and renders it clipped into an output
//! buffer. The rendered bounding box (position + intrinsic size x
//! scale) is kept fully inside the base image at all times: drags and
//! rescales that would push it out are clamped, never rejected.
//!
//! Watermark assets are downscaled once on load to fit within
//! 300x300 (never upscaled); all later scaling is the user-controlled
//! scale factor applied to that fitted size.

use std::fmt;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, PixelPoint};

/// Maximum edge length a watermark asset is fitted to on load.
pub const FIT_MAX_EDGE: u32 = 300;

/// Margin from the base image's bottom-right corner for the initial
/// placement.
pub const PLACEMENT_MARGIN: f64 = 20.0;

/// Clipping shape applied to the watermark before compositing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkShape {
    /// No clipping; the full bounding box.
    #[default]
    Original,
    /// Centered circle of radius `min(w, h) / 2`.
    Circle,
    /// Centered square of side `min(w, h)`.
    Square,
    /// Centered 4:3 rectangle fitted within the box.
    #[serde(rename = "rect-4-3")]
    Rect4x3,
    /// Centered 3:4 rectangle fitted within the box.
    #[serde(rename = "rect-3-4")]
    Rect3x4,
}

impl WatermarkShape {
    /// Wire name expected by the processing backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Rect4x3 => "rect-4-3",
            Self::Rect3x4 => "rect-3-4",
        }
    }
}

impl fmt::Display for WatermarkShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fit source dimensions within a `max_edge` square, downscale-only.
///
/// `ratio = min(max/srcW, max/srcH)` capped at 1: an asset already
/// smaller than the limit keeps its original dimensions.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn fit_within(src: Dimensions, max_edge: u32) -> Dimensions {
    if src.width == 0 || src.height == 0 {
        return src;
    }
    let ratio = (f64::from(max_edge) / f64::from(src.width))
        .min(f64::from(max_edge) / f64::from(src.height))
        .min(1.0);
    Dimensions::new(
        (f64::from(src.width) * ratio).round() as u32,
        (f64::from(src.height) * ratio).round() as u32,
    )
}

/// An axis-aligned box in base-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl BoundingBox {
    /// Whether the point lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Region of the scaled bounding box the watermark is visible in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipRegion {
    /// Rectangular region (full box, centered square, or fixed-aspect
    /// rectangle).
    Rect(BoundingBox),
    /// Centered circle.
    Circle {
        /// Center x.
        cx: f64,
        /// Center y.
        cy: f64,
        /// Radius.
        radius: f64,
    },
}

impl ClipRegion {
    /// Whether the point is inside the clip region.
    #[must_use]
    pub fn contains(&self, px: f64, py: f64) -> bool {
        match self {
            Self::Rect(rect) => rect.contains(px, py),
            Self::Circle { cx, cy, radius } => {
                let dx = px - cx;
                let dy = py - cy;
                dx.mul_add(dx, dy * dy) <= radius * radius
            }
        }
    }

    /// Whether the region has zero area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Rect(rect) => rect.width <= 0.0 || rect.height <= 0.0,
            Self::Circle { radius, .. } => *radius <= 0.0,
        }
    }
}

/// Compute the clip region for a shape within a scaled bounding box.
///
/// All shapes are anchored at the **scaled** box's center.
#[must_use]
pub fn clip_for_shape(shape: WatermarkShape, bounds: BoundingBox) -> ClipRegion {
    let (cx, cy) = bounds.center();
    let short_edge = bounds.width.min(bounds.height);
    match shape {
        WatermarkShape::Original => ClipRegion::Rect(bounds),
        WatermarkShape::Circle => ClipRegion::Circle {
            cx,
            cy,
            radius: short_edge / 2.0,
        },
        WatermarkShape::Square => ClipRegion::Rect(centered(cx, cy, short_edge, short_edge)),
        WatermarkShape::Rect4x3 => {
            let (w, h) = fit_aspect(bounds.width, bounds.height, 4.0 / 3.0);
            ClipRegion::Rect(centered(cx, cy, w, h))
        }
        WatermarkShape::Rect3x4 => {
            let (w, h) = fit_aspect(bounds.width, bounds.height, 3.0 / 4.0);
            ClipRegion::Rect(centered(cx, cy, w, h))
        }
    }
}

/// Largest `aspect` (w/h) rectangle fitting within `w x h`.
fn fit_aspect(w: f64, h: f64, aspect: f64) -> (f64, f64) {
    if w / h > aspect {
        (h * aspect, h)
    } else {
        (w, w / aspect)
    }
}

/// Box of the given size centered on `(cx, cy)`.
fn centered(cx: f64, cy: f64, w: f64, h: f64) -> BoundingBox {
    BoundingBox {
        x: cx - w / 2.0,
        y: cy - h / 2.0,
        width: w,
        height: h,
    }
}

/// Watermark placement state and compositor.
///
/// Dimensions-only state: pixel data is passed to [`render`]
/// (`WatermarkCompositor::render`) at draw time, so the placement can
/// live with the session while decoded images stay wherever the caller
/// keeps them.
#[derive(Debug, Clone, Default)]
pub struct WatermarkCompositor {
    base: Option<Dimensions>,
    asset: Option<Dimensions>,
    x: f64,
    y: f64,
    scale: f64,
    shape: WatermarkShape,
    drag_offset: Option<(f64, f64)>,
}

impl WatermarkCompositor {
    /// New compositor with no base image or watermark asset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            ..Self::default()
        }
    }

    /// Record the base image's intrinsic dimensions.
    ///
    /// Any placement computed against a previous base is invalid, so
    /// scale and shape reset and the default placement is recomputed
    /// for a loaded asset.
    pub fn set_base_image(&mut self, dimensions: Dimensions) {
        self.base = Some(dimensions);
        self.reset_placement();
    }

    /// Load a watermark asset, recording its fit-within-300 intrinsic
    /// size (downscale-only), and place it at the default position.
    pub fn set_watermark_asset(&mut self, source: Dimensions) {
        self.asset = Some(fit_within(source, FIT_MAX_EDGE));
        self.reset_placement();
    }

    fn reset_placement(&mut self) {
        self.shape = WatermarkShape::Original;
        self.drag_offset = None;
        self.scale = self.max_scale().map_or(1.0, |max| max.min(1.0));
        if let Some(asset) = self.asset {
            let (x, y) = self.base.map_or((0.0, 0.0), |base| {
                let scaled_w = f64::from(asset.width) * self.scale;
                let scaled_h = f64::from(asset.height) * self.scale;
                (
                    (f64::from(base.width) - scaled_w - PLACEMENT_MARGIN).max(0.0),
                    (f64::from(base.height) - scaled_h - PLACEMENT_MARGIN).max(0.0),
                )
            });
            self.x = x;
            self.y = y;
        } else {
            self.x = 0.0;
            self.y = 0.0;
        }
    }

    /// Largest scale factor at which the asset still fits inside the
    /// base. `None` until both base and asset are set.
    fn max_scale(&self) -> Option<f64> {
        let base = self.base?;
        let asset = self.asset?;
        if asset.width == 0 || asset.height == 0 {
            return None;
        }
        Some(
            (f64::from(base.width) / f64::from(asset.width))
                .min(f64::from(base.height) / f64::from(asset.height)),
        )
    }

    /// Current scale factor.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Current clip shape.
    #[must_use]
    pub const fn shape(&self) -> WatermarkShape {
        self.shape
    }

    /// Top-left of the scaled bounding box, in base pixel space.
    #[must_use]
    pub const fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// The scaled bounding box, once an asset is loaded.
    #[must_use]
    pub fn scaled_box(&self) -> Option<BoundingBox> {
        let asset = self.asset?;
        Some(BoundingBox {
            x: self.x,
            y: self.y,
            width: f64::from(asset.width) * self.scale,
            height: f64::from(asset.height) * self.scale,
        })
    }

    /// Move the watermark, clamping so the scaled bounding box stays
    /// within `[0, baseWidth] x [0, baseHeight]`.
    pub fn set_position(&mut self, x: f64, y: f64) {
        let Some(bounds) = self.scaled_box() else {
            return;
        };
        let (max_x, max_y) = self.base.map_or((f64::INFINITY, f64::INFINITY), |base| {
            (
                (f64::from(base.width) - bounds.width).max(0.0),
                (f64::from(base.height) - bounds.height).max(0.0),
            )
        });
        self.x = x.clamp(0.0, max_x);
        self.y = y.clamp(0.0, max_y);
    }

    /// Set the scale factor, clamped to keep the box inside the base,
    /// then re-clamp the position against the new box size.
    pub fn set_scale(&mut self, factor: f64) {
        let mut factor = if factor.is_finite() { factor.max(0.0) } else { 1.0 };
        if let Some(max) = self.max_scale() {
            factor = factor.min(max);
        }
        self.scale = factor;
        let (x, y) = (self.x, self.y);
        self.set_position(x, y);
    }

    /// Set the clip shape.
    pub const fn set_shape(&mut self, shape: WatermarkShape) {
        self.shape = shape;
    }

    /// Whether the point lies within the scaled bounding box — the
    /// test that decides if a drag gesture begins.
    #[must_use]
    pub fn hit_test(&self, point: PixelPoint) -> bool {
        self.scaled_box()
            .is_some_and(|b| b.contains(f64::from(point.x), f64::from(point.y)))
    }

    /// Begin dragging from `point`. Returns `true` (and records the
    /// grab offset) only if the point hits the watermark.
    pub fn begin_drag(&mut self, point: PixelPoint) -> bool {
        if self.hit_test(point) {
            self.drag_offset = Some((f64::from(point.x) - self.x, f64::from(point.y) - self.y));
            true
        } else {
            false
        }
    }

    /// Continue an active drag; position follows the pointer minus the
    /// grab offset, clamped to the base bounds. No-op when not
    /// dragging.
    pub fn drag_to(&mut self, point: PixelPoint) {
        if let Some((dx, dy)) = self.drag_offset {
            self.set_position(f64::from(point.x) - dx, f64::from(point.y) - dy);
        }
    }

    /// End an active drag.
    pub const fn end_drag(&mut self) {
        self.drag_offset = None;
    }

    /// Clip region of the current shape over the scaled box.
    #[must_use]
    pub fn clip_region(&self) -> Option<ClipRegion> {
        self.scaled_box().map(|b| clip_for_shape(self.shape, b))
    }

    /// Composite the watermark over the base image.
    ///
    /// Draws the base, then the asset stretched into the scaled
    /// bounding box with the shape clip applied. A zero-area box or
    /// clip region draws the base only — never an error.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render(&self, base: &RgbaImage, asset: &RgbaImage) -> RgbaImage {
        let mut out = base.clone();

        let Some(bounds) = self.scaled_box() else {
            return out;
        };
        if bounds.width < 1.0 || bounds.height < 1.0 {
            return out;
        }
        let clip = clip_for_shape(self.shape, bounds);
        if clip.is_empty() || asset.width() == 0 || asset.height() == 0 {
            return out;
        }

        let x0 = bounds.x.floor().max(0.0) as u32;
        let y0 = bounds.y.floor().max(0.0) as u32;
        let x1 = ((bounds.x + bounds.width).ceil() as u32).min(out.width());
        let y1 = ((bounds.y + bounds.height).ceil() as u32).min(out.height());

        for ty in y0..y1 {
            for tx in x0..x1 {
                // Sample at the pixel center.
                let px = f64::from(tx) + 0.5;
                let py = f64::from(ty) + 0.5;
                if !clip.contains(px, py) {
                    continue;
                }

                // Nearest-neighbor stretch of the asset into the box.
                let u = (px - bounds.x) / bounds.width * f64::from(asset.width());
                let v = (py - bounds.y) / bounds.height * f64::from(asset.height());
                let sx = (u.floor() as u32).min(asset.width() - 1);
                let sy = (v.floor() as u32).min(asset.height() - 1);

                let src = asset.get_pixel(sx, sy).0;
                let dst = out.get_pixel(tx, ty).0;
                out.put_pixel(tx, ty, image::Rgba(blend_over(src, dst)));
            }
        }
        out
    }
}

/// Source-over alpha blend of `src` onto `dst`.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let sa = f64::from(src[3]) / 255.0;
    let da = f64::from(dst[3]) / 255.0;
    let out_a = da.mul_add(1.0 - sa, sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let s = f64::from(src[c]);
        let d = f64::from(dst[c]);
        let v = (d * da).mul_add(1.0 - sa, s * sa) / out_a;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    out
}
