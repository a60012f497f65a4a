//! Request builders, one per backend operation.
//!
//! Each builder appends fields in the exact order the backend's
//! multipart contract expects. Mutually exclusive inputs (mask vs
//! colors vs point) come in as the typed enums from `estampa-editor`,
//! so an invalid combination is unrepresentable rather than checked.

use estampa_editor::session::{BackgroundInput, ContourInput, ObjectInput, ProcessingPlan};
use estampa_editor::types::{PixelPoint, Rgb};
use estampa_editor::watermark::WatermarkShape;

use crate::form::Request;
use crate::RequestError;

fn colors_json(colors: &[Rgb]) -> Result<String, RequestError> {
    Ok(serde_json::to_string(colors)?)
}

/// Background removal: `POST /remove-background`.
pub fn remove_background(image: Vec<u8>, input: &BackgroundInput) -> Result<Request, RequestError> {
    let mut req = Request::new("remove-background");
    req.push_blob("image", image);
    match input {
        BackgroundInput::Auto => {}
        BackgroundInput::Colors { colors, tolerance } => {
            if !colors.is_empty() {
                req.push_text("colors", colors_json(colors)?);
            }
            req.push_text("threshold", tolerance);
        }
        BackgroundInput::Mask { mask_png, refine } => {
            req.push_blob("mask", mask_png.clone());
            req.push_text("refine", refine);
        }
    }
    Ok(req)
}

/// Object removal: `POST /remove-objects`.
#[must_use]
pub fn remove_objects(image: Vec<u8>, input: &ObjectInput) -> Request {
    let mut req = Request::new("remove-objects");
    req.push_blob("image", image);
    match input {
        ObjectInput::Mask { mask_png } => {
            req.push_blob("mask", mask_png.clone());
        }
        ObjectInput::Point { point, tolerance } => {
            let PixelPoint { x, y } = *point;
            req.push_text("x", x);
            req.push_text("y", y);
            req.push_text("tolerance", tolerance);
        }
    }
    req
}

/// Quality enhancement: `POST /enhance-quality`.
#[must_use]
pub fn enhance_quality(image: Vec<u8>, contrast: f32, brightness: f32, sharpness: f32) -> Request {
    let mut req = Request::new("enhance-quality");
    req.push_blob("image", image);
    req.push_text("contrast", contrast);
    req.push_text("brightness", brightness);
    req.push_text("sharpness", sharpness);
    req
}

/// Upscaling: `POST /upscale`.
#[must_use]
pub fn upscale(image: Vec<u8>, factor: f32, detail_boost: f32) -> Request {
    let mut req = Request::new("upscale");
    req.push_blob("image", image);
    req.push_text("factor", factor);
    req.push_text("detail_boost", detail_boost);
    req
}

/// Halftone conversion: `POST /halftone`.
///
/// `colors` narrows the conversion to matching regions; when empty the
/// whole image is converted and no color fields are sent.
pub fn halftone(
    image: Vec<u8>,
    dot_size: u32,
    scale: f32,
    spacing: u32,
    colors: &[Rgb],
    tolerance: u32,
) -> Result<Request, RequestError> {
    let mut req = Request::new("halftone");
    req.push_blob("image", image);
    req.push_text("dot_size", dot_size);
    req.push_text("scale", scale);
    req.push_text("spacing", spacing);
    if !colors.is_empty() {
        req.push_text("colors", colors_json(colors)?);
        req.push_text("threshold", tolerance);
    }
    Ok(req)
}

/// Contour clipping: `POST /contour-clip`.
pub fn contour_clip(image: Vec<u8>, input: &ContourInput) -> Result<Request, RequestError> {
    let mut req = Request::new("contour-clip");
    req.push_blob("image", image);
    match input {
        ContourInput::Manual { mask_png, refine } => {
            req.push_blob("mask", mask_png.clone());
            req.push_text("mode", "manual");
            req.push_text("refine", refine);
        }
        ContourInput::Auto { colors, tolerance } => {
            req.push_text("mode", "auto");
            req.push_text("refine", false);
            if !colors.is_empty() {
                req.push_text("colors", colors_json(colors)?);
                req.push_text("threshold", tolerance);
            }
        }
    }
    Ok(req)
}

/// Watermark stamping: `POST /watermark`.
///
/// `x`/`y` are the watermark's top-left corner in base-image pixel
/// space; `scale` multiplies the watermark's source dimensions.
#[must_use]
pub fn apply_watermark(
    base_image: Vec<u8>,
    watermark_image: Vec<u8>,
    x: f64,
    y: f64,
    scale: f64,
    shape: WatermarkShape,
) -> Request {
    let mut req = Request::new("watermark");
    req.push_blob("base_image", base_image);
    req.push_blob("watermark_image", watermark_image);
    req.push_text("x", x);
    req.push_text("y", y);
    req.push_text("scale", scale);
    req.push_text("shape", shape.as_str());
    req
}

/// Build the request for a resolved [`ProcessingPlan`].
///
/// The PNG-encoded source image is supplied separately because the
/// plan does not carry the image blob.
pub fn from_plan(image: Vec<u8>, plan: &ProcessingPlan) -> Result<Request, RequestError> {
    match plan {
        ProcessingPlan::RemoveBackground(input) => remove_background(image, input),
        ProcessingPlan::RemoveObjects(input) => Ok(remove_objects(image, input)),
        ProcessingPlan::Enhance {
            contrast,
            brightness,
            sharpness,
        } => Ok(enhance_quality(image, *contrast, *brightness, *sharpness)),
        ProcessingPlan::Upscale {
            factor,
            detail_boost,
        } => Ok(upscale(image, *factor, *detail_boost)),
        ProcessingPlan::Halftone {
            dot_size,
            scale,
            spacing,
            colors,
            tolerance,
        } => halftone(image, *dot_size, *scale, *spacing, colors, *tolerance),
        ProcessingPlan::ContourClip(input) => contour_clip(image, input),
    }
}
