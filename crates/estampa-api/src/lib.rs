//! estampa-api: Pure request serializers (sans-IO).
//!
//! Converts resolved editing operations into ordered multipart form
//! requests for the image-processing backend. No transport lives here;
//! callers hand the [`form::Request`] to whatever HTTP layer the host
//! provides.

pub mod form;
pub mod ops;

pub use form::{FieldValue, FormField, Request};
pub use ops::{
    apply_watermark, contour_clip, enhance_quality, from_plan, halftone, remove_background,
    remove_objects, upscale,
};

/// Errors that can occur while assembling a request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The sampled-color list could not be JSON-encoded.
    #[error("failed to encode color list as JSON: {0}")]
    ColorsEncode(#[from] serde_json::Error),
}
