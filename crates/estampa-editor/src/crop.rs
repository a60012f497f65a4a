//! Crop tool lifecycle wrapper.
//!
//! Interactive cropping is delegated to a pluggable crop-box tool (in
//! the browser, a library like cropperjs). The adapter owns the tool's
//! lifecycle: entering crop mode — or changing the aspect ratio while
//! in it — destroys any existing instance before binding a new one, so
//! two live instances never coexist. Leaving crop mode destroys the
//! instance; asking for a crop with no live instance yields `None`.

use std::fmt;

use image::RgbaImage;

use crate::types::Dimensions;

/// Fraction of the image the default crop box covers initially.
pub const AUTO_CROP_AREA: f64 = 0.9;

/// A crop rectangle in source-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

/// A live crop-box instance bound to one image.
///
/// Dropping the handle destroys the instance.
pub trait CropHandle: fmt::Debug {
    /// The currently selected crop rectangle, if the instance has one.
    fn region(&self) -> Option<CropRegion>;
}

/// Factory for crop-box instances. Any interactive crop library can
/// satisfy this contract.
pub trait CropTool: fmt::Debug {
    /// Bind a new instance to an image of the given dimensions.
    ///
    /// `aspect_ratio` of `None` (or the library's NaN equivalent)
    /// means free-form.
    fn bind(&self, image: Dimensions, aspect_ratio: Option<f64>) -> Box<dyn CropHandle>;
}

/// Owns at most one live crop-tool instance and re-initializes it on
/// mode entry and aspect-ratio changes.
#[derive(Debug)]
pub struct CropAdapter {
    tool: Box<dyn CropTool>,
    handle: Option<Box<dyn CropHandle>>,
    image: Option<Dimensions>,
    aspect_ratio: Option<f64>,
}

impl CropAdapter {
    /// New adapter with no live instance.
    #[must_use]
    pub fn new(tool: Box<dyn CropTool>) -> Self {
        Self {
            tool,
            handle: None,
            image: None,
            aspect_ratio: None,
        }
    }

    /// Enter crop mode for the given image, replacing any live
    /// instance.
    pub fn enter(&mut self, image: Dimensions) {
        // Destroy before creating; the tool must never see two live
        // instances.
        self.handle = None;
        self.image = Some(image);
        self.handle = Some(self.tool.bind(image, self.aspect_ratio));
    }

    /// Change the requested aspect ratio. While an instance is live it
    /// is destroyed and rebound with the new ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: Option<f64>) {
        self.aspect_ratio = aspect_ratio;
        if self.handle.is_some() {
            if let Some(image) = self.image {
                self.handle = None;
                self.handle = Some(self.tool.bind(image, aspect_ratio));
            }
        }
    }

    /// Leave crop mode, destroying the live instance if any.
    pub fn leave(&mut self) {
        self.handle = None;
        self.image = None;
    }

    /// Whether a crop instance is currently live.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Requested aspect ratio (`None` = free-form).
    #[must_use]
    pub const fn aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio
    }

    /// The live instance's crop rectangle, `None` without one.
    #[must_use]
    pub fn region(&self) -> Option<CropRegion> {
        self.handle.as_ref().and_then(|h| h.region())
    }

    /// Crop the given image to the live instance's rectangle.
    ///
    /// Returns `None` when no instance is active or the region is
    /// empty.
    #[must_use]
    pub fn cropped_image(&self, image: &RgbaImage) -> Option<RgbaImage> {
        let region = self.region()?;
        if region.width == 0 || region.height == 0 {
            return None;
        }
        Some(
            image::imageops::crop_imm(image, region.x, region.y, region.width, region.height)
                .to_image(),
        )
    }
}

/// Default crop tool: a centered box covering [`AUTO_CROP_AREA`] of
/// the image, shrunk to honor the requested aspect ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectCropTool;

#[derive(Debug)]
struct RectCropHandle {
    region: Option<CropRegion>,
}

impl CropHandle for RectCropHandle {
    fn region(&self) -> Option<CropRegion> {
        self.region
    }
}

impl CropTool for RectCropTool {
    fn bind(&self, image: Dimensions, aspect_ratio: Option<f64>) -> Box<dyn CropHandle> {
        Box::new(RectCropHandle {
            region: initial_region(image, aspect_ratio),
        })
    }
}

/// Centered auto-crop rectangle; free-form unless a finite positive
/// aspect ratio is requested.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn initial_region(image: Dimensions, aspect_ratio: Option<f64>) -> Option<CropRegion> {
    if image.width == 0 || image.height == 0 {
        return None;
    }
    let avail_w = f64::from(image.width) * AUTO_CROP_AREA;
    let avail_h = f64::from(image.height) * AUTO_CROP_AREA;

    let (w, h) = match aspect_ratio.filter(|r| r.is_finite() && *r > 0.0) {
        Some(aspect) => {
            if avail_w / avail_h > aspect {
                (avail_h * aspect, avail_h)
            } else {
                (avail_w, avail_w / aspect)
            }
        }
        None => (avail_w, avail_h),
    };

    let w = (w.round() as u32).clamp(1, image.width);
    let h = (h.round() as u32).clamp(1, image.height);
    Some(CropRegion {
        x: (image.width - w) / 2,
        y: (image.height - h) / 2,
        width: w,
        height: h,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use image::Rgba;

    use super::*;

    /// Test tool that counts live instances so lifecycle rules can be
    /// asserted.
    #[derive(Debug)]
    struct CountingTool {
        live: Rc<Cell<usize>>,
        peak: Rc<Cell<usize>>,
    }

    #[derive(Debug)]
    struct CountingHandle {
        live: Rc<Cell<usize>>,
        region: Option<CropRegion>,
    }

    impl Drop for CountingHandle {
        fn drop(&mut self) {
            self.live.set(self.live.get() - 1);
        }
    }

    impl CropHandle for CountingHandle {
        fn region(&self) -> Option<CropRegion> {
            self.region
        }
    }

    impl CropTool for CountingTool {
        fn bind(&self, image: Dimensions, aspect_ratio: Option<f64>) -> Box<dyn CropHandle> {
            self.live.set(self.live.get() + 1);
            self.peak.set(self.peak.get().max(self.live.get()));
            Box::new(CountingHandle {
                live: Rc::clone(&self.live),
                region: initial_region(image, aspect_ratio),
            })
        }
    }

    #[test]
    fn at_most_one_live_instance() {
        let live = Rc::new(Cell::new(0));
        let peak = Rc::new(Cell::new(0));
        let mut adapter = CropAdapter::new(Box::new(CountingTool {
            live: Rc::clone(&live),
            peak: Rc::clone(&peak),
        }));

        let dims = Dimensions::new(800, 600);
        adapter.enter(dims);
        adapter.enter(dims);
        adapter.set_aspect_ratio(Some(16.0 / 9.0));
        adapter.set_aspect_ratio(None);
        assert_eq!(live.get(), 1);
        assert_eq!(peak.get(), 1, "old instance must be destroyed before binding");

        adapter.leave();
        assert_eq!(live.get(), 0);
        assert!(!adapter.is_active());
    }

    #[test]
    fn aspect_change_without_instance_does_not_bind() {
        let live = Rc::new(Cell::new(0));
        let peak = Rc::new(Cell::new(0));
        let mut adapter = CropAdapter::new(Box::new(CountingTool {
            live: Rc::clone(&live),
            peak: Rc::clone(&peak),
        }));
        adapter.set_aspect_ratio(Some(1.0));
        assert_eq!(live.get(), 0);
        assert_eq!(adapter.aspect_ratio(), Some(1.0));
    }

    #[test]
    fn region_is_none_without_instance() {
        let adapter = CropAdapter::new(Box::new(RectCropTool));
        assert_eq!(adapter.region(), None);
        let img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        assert!(adapter.cropped_image(&img).is_none());
    }

    #[test]
    fn free_form_region_covers_auto_crop_area() {
        let mut adapter = CropAdapter::new(Box::new(RectCropTool));
        adapter.enter(Dimensions::new(1000, 800));
        let region = adapter.region().unwrap();
        assert_eq!(region, CropRegion {
            x: 50,
            y: 40,
            width: 900,
            height: 720,
        });
    }

    #[test]
    fn aspect_ratio_constrains_region() {
        let mut adapter = CropAdapter::new(Box::new(RectCropTool));
        adapter.set_aspect_ratio(Some(1.0));
        adapter.enter(Dimensions::new(1000, 800));
        let region = adapter.region().unwrap();
        assert_eq!(region.width, region.height);
        assert_eq!(region.height, 720);
        // Centered.
        assert_eq!(region.x, (1000 - 720) / 2);
        assert_eq!(region.y, 40);
    }

    #[test]
    fn non_finite_aspect_ratio_means_free_form() {
        let mut adapter = CropAdapter::new(Box::new(RectCropTool));
        adapter.set_aspect_ratio(Some(f64::NAN));
        adapter.enter(Dimensions::new(100, 100));
        let region = adapter.region().unwrap();
        assert_eq!((region.width, region.height), (90, 90));
    }

    #[test]
    fn cropped_image_extracts_region() {
        let mut adapter = CropAdapter::new(Box::new(RectCropTool));
        adapter.enter(Dimensions::new(100, 100));

        let img = RgbaImage::from_fn(100, 100, |x, y| {
            if x < 50 && y < 50 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 255, 0, 255])
            }
        });
        let cropped = adapter.cropped_image(&img).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (90, 90));
        // Top-left of the crop (at source (5, 5)) is red.
        assert_eq!(cropped.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }
}
