//! Editor parameter set.
//!
//! One value per user-adjustable control across the editing screens.
//! Defaults match the controls' initial values.

use serde::{Deserialize, Serialize};

use crate::sample::{BgRemovalMode, RemovalMethod, DEFAULT_TOLERANCE};

/// All user-adjustable editing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Enhance: contrast multiplier.
    pub contrast: f32,
    /// Enhance: brightness multiplier.
    pub brightness: f32,
    /// Enhance: sharpness multiplier.
    pub sharpness: f32,

    /// Upscale: resolution multiplier.
    pub upscale_factor: f32,
    /// Upscale: detail-boost strength.
    pub upscale_detail_boost: f32,

    /// Background-removal / contour-clip sub-mode.
    pub bg_removal_mode: BgRemovalMode,
    /// Whether the backend should refine mask edges.
    pub smart_refine: bool,
    /// Color-match threshold for color-list and magic-wand requests.
    pub color_tolerance: u32,

    /// Object-removal sub-mode.
    pub removal_method: RemovalMethod,
    /// Brush diameter in source-image pixels.
    pub brush_size: u32,

    /// Halftone: dot size in pixels.
    pub dot_size: u32,
    /// Halftone: output scale.
    pub halftone_scale: f32,
    /// Halftone: extra spacing between dots.
    pub halftone_spacing: u32,

    /// Crop aspect ratio; `None` is free-form.
    pub crop_aspect_ratio: Option<f64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            contrast: 1.2,
            brightness: 1.1,
            sharpness: 1.3,
            upscale_factor: 2.0,
            upscale_detail_boost: 1.5,
            bg_removal_mode: BgRemovalMode::Auto,
            smart_refine: true,
            color_tolerance: DEFAULT_TOLERANCE,
            removal_method: RemovalMethod::Brush,
            brush_size: 20,
            dot_size: 10,
            halftone_scale: 1.0,
            halftone_spacing: 0,
            crop_aspect_ratio: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_control_initial_values() {
        let config = EditorConfig::default();
        assert!((config.contrast - 1.2).abs() < f32::EPSILON);
        assert!((config.brightness - 1.1).abs() < f32::EPSILON);
        assert!((config.sharpness - 1.3).abs() < f32::EPSILON);
        assert!((config.upscale_factor - 2.0).abs() < f32::EPSILON);
        assert!((config.upscale_detail_boost - 1.5).abs() < f32::EPSILON);
        assert_eq!(config.bg_removal_mode, BgRemovalMode::Auto);
        assert!(config.smart_refine);
        assert_eq!(config.color_tolerance, 30);
        assert_eq!(config.removal_method, RemovalMethod::Brush);
        assert_eq!(config.brush_size, 20);
        assert_eq!(config.dot_size, 10);
        assert!((config.halftone_scale - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.halftone_spacing, 0);
        assert_eq!(config.crop_aspect_ratio, None);
    }

    #[test]
    fn config_serde_round_trip() {
        let config = EditorConfig {
            bg_removal_mode: BgRemovalMode::Draw,
            removal_method: RemovalMethod::MagicWand,
            crop_aspect_ratio: Some(4.0 / 3.0),
            color_tolerance: 45,
            ..EditorConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EditorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
