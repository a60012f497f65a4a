//! Per-image edit session.
//!
//! Owns the state one editing screen works on: the loaded source
//! image, the mask buffer, the selection, the crop adapter, and the
//! active mode. Pointer events arrive in display coordinates and are
//! routed through the coordinate mapper to the right consumer; the
//! "process" action is assembled into a [`ProcessingPlan`] that a
//! request serializer turns into the backend call.
//!
//! Every image or mode replacement bumps a **generation counter**.
//! Processing results are accepted only when their generation is still
//! current, so a slow response for a superseded image is rejected
//! instead of being painted over the new one.

use image::RgbaImage;

use crate::config::EditorConfig;
use crate::coords::{map_to_pixel, DisplayRect};
use crate::crop::{CropAdapter, CropTool, RectCropTool};
use crate::diagnostics::{OperationDiagnostics, OperationTimer};
use crate::mask::MaskBuffer;
use crate::sample::{click_action, sample_color, ClickAction, EditorMode, SelectionState};
use crate::types::{Dimensions, EditorError, PixelPoint, Rgb};

/// Region input for background removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundInput {
    /// Backend decides the region on its own.
    Auto,
    /// Region inferred from sampled colors plus a tolerance.
    Colors {
        /// Sampled colors, oldest first.
        colors: Vec<Rgb>,
        /// Color-match threshold.
        tolerance: u32,
    },
    /// Hand-painted mask.
    Mask {
        /// L8 PNG encoding of the mask bitmap.
        mask_png: Vec<u8>,
        /// Whether the backend should refine mask edges.
        refine: bool,
    },
}

/// Region input for object removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectInput {
    /// Hand-painted mask.
    Mask {
        /// L8 PNG encoding of the mask bitmap.
        mask_png: Vec<u8>,
    },
    /// Magic-wand point; the backend grows the region from it.
    Point {
        /// Clicked point in source pixel space.
        point: PixelPoint,
        /// Color-match threshold for region growing.
        tolerance: u32,
    },
}

/// Region input for contour clipping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContourInput {
    /// Automatic contour detection, optionally steered by colors.
    Auto {
        /// Sampled colors (may be empty).
        colors: Vec<Rgb>,
        /// Color-match threshold.
        tolerance: u32,
    },
    /// Hand-marked object mask.
    Manual {
        /// L8 PNG encoding of the mask bitmap.
        mask_png: Vec<u8>,
        /// Whether the backend should refine mask edges.
        refine: bool,
    },
}

/// A fully-resolved backend operation, ready for serialization.
///
/// The source image blob itself is not carried here — the caller owns
/// it and hands it to the request serializer alongside the plan.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingPlan {
    /// Background removal.
    RemoveBackground(BackgroundInput),
    /// Object removal.
    RemoveObjects(ObjectInput),
    /// Contrast/brightness/sharpness adjustment.
    Enhance {
        /// Contrast multiplier.
        contrast: f32,
        /// Brightness multiplier.
        brightness: f32,
        /// Sharpness multiplier.
        sharpness: f32,
    },
    /// Resolution upscaling.
    Upscale {
        /// Resolution multiplier.
        factor: f32,
        /// Detail-boost strength.
        detail_boost: f32,
    },
    /// Halftone conversion.
    Halftone {
        /// Dot size in pixels.
        dot_size: u32,
        /// Output scale.
        scale: f32,
        /// Extra spacing between dots.
        spacing: u32,
        /// Sampled colors (may be empty).
        colors: Vec<Rgb>,
        /// Color-match threshold.
        tolerance: u32,
    },
    /// Contour clipping.
    ContourClip(ContourInput),
}

/// Outcome of the "process" action.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// Send this plan to the processing backend.
    Request(ProcessingPlan),
    /// Crop mode: resolved locally, no backend call.
    Cropped(RgbaImage),
    /// Crop mode with no live crop instance: silent no-op.
    Idle,
}

/// What a routed click produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A color was sampled and appended to the selection.
    ColorSampled(Rgb),
    /// The magic-wand point was recorded.
    PointRecorded(PixelPoint),
}

/// Per-image editing session state.
#[derive(Debug)]
pub struct EditSession {
    mode: EditorMode,
    /// User-adjustable parameters.
    pub config: EditorConfig,
    image: Option<RgbaImage>,
    mask: Option<MaskBuffer>,
    selection: SelectionState,
    crop: CropAdapter,
    drawing: bool,
    generation: u64,
    diagnostics: Vec<OperationDiagnostics>,
}

impl EditSession {
    /// New session in the given mode, with the default crop tool and
    /// configuration.
    #[must_use]
    pub fn new(mode: EditorMode) -> Self {
        Self::with_crop_tool(mode, Box::new(RectCropTool))
    }

    /// New session using a caller-supplied crop tool.
    #[must_use]
    pub fn with_crop_tool(mode: EditorMode, crop_tool: Box<dyn CropTool>) -> Self {
        Self {
            mode,
            config: EditorConfig::default(),
            image: None,
            mask: None,
            selection: SelectionState::new(),
            crop: CropAdapter::new(crop_tool),
            drawing: false,
            generation: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Active editing mode.
    #[must_use]
    pub const fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Current session generation. Bumped by every image load and mode
    /// switch.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Loaded image dimensions, if any.
    #[must_use]
    pub fn dimensions(&self) -> Option<Dimensions> {
        self.image
            .as_ref()
            .map(|img| Dimensions::new(img.width(), img.height()))
    }

    /// Borrow the loaded image.
    #[must_use]
    pub const fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// Selection state (sampled colors, magic-wand point).
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Completed-request diagnostics, oldest first.
    #[must_use]
    pub fn diagnostics(&self) -> &[OperationDiagnostics] {
        &self.diagnostics
    }

    /// What a click currently does, given the mode and sub-modes.
    #[must_use]
    pub const fn click_action(&self) -> ClickAction {
        click_action(self.mode, self.config.bg_removal_mode, self.config.removal_method)
    }

    /// Whether the current mode combination paints a mask.
    #[must_use]
    pub const fn needs_mask(&self) -> bool {
        matches!(self.click_action(), ClickAction::PaintStroke)
    }

    /// Replace the loaded source image.
    ///
    /// Discards selection, mask, and any pending processing result
    /// (via the generation bump); re-initializes the mask buffer when
    /// the current mode paints one, and rebinds the crop tool in crop
    /// mode.
    pub fn load_image(&mut self, image: RgbaImage) {
        self.generation += 1;
        self.drawing = false;
        self.selection.reset();
        let dims = Dimensions::new(image.width(), image.height());
        self.image = Some(image);
        self.mask = self.needs_mask().then(|| MaskBuffer::new(dims));
        if self.mode == EditorMode::Crop {
            self.crop.set_aspect_ratio(self.config.crop_aspect_ratio);
            self.crop.enter(dims);
        } else {
            self.crop.leave();
        }
    }

    /// Switch editing mode, discarding pending work from the previous
    /// one.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.generation += 1;
        self.drawing = false;
        self.sync_tools();
    }

    /// Change a sub-mode (held in `config`) and re-derive tool state;
    /// entering a drawing-dependent combination allocates a fresh
    /// mask.
    pub fn refresh_tools(&mut self) {
        self.sync_tools();
    }

    fn sync_tools(&mut self) {
        let Some(dims) = self.dimensions() else {
            self.mask = None;
            self.crop.leave();
            return;
        };
        if self.needs_mask() {
            if self.mask.as_ref().map(MaskBuffer::dimensions) != Some(dims) {
                self.mask = Some(MaskBuffer::new(dims));
            }
        } else {
            self.mask = None;
        }
        if self.mode == EditorMode::Crop {
            self.crop.set_aspect_ratio(self.config.crop_aspect_ratio);
            self.crop.enter(dims);
        } else {
            self.crop.leave();
        }
    }

    /// Change the crop aspect ratio, re-initializing a live crop
    /// instance.
    pub fn set_crop_aspect_ratio(&mut self, aspect_ratio: Option<f64>) {
        self.config.crop_aspect_ratio = aspect_ratio;
        self.crop.set_aspect_ratio(aspect_ratio);
    }

    /// Pointer-down in display coordinates. Starts a mask stroke when
    /// the mode paints one; returns `true` if a stroke began.
    pub fn pointer_down(&mut self, client_x: f64, client_y: f64, rect: DisplayRect) -> bool {
        if self.click_action() != ClickAction::PaintStroke {
            return false;
        }
        let Some(dims) = self.dimensions() else {
            return false;
        };
        let Some(point) = map_to_pixel(client_x, client_y, rect, dims) else {
            return false;
        };
        let brush = self.config.brush_size;
        let Some(mask) = self.mask.as_mut() else {
            return false;
        };
        mask.begin_stroke();
        mask.paint_circle(point, brush);
        self.drawing = true;
        true
    }

    /// Pointer-move in display coordinates. Extends the stroke while
    /// one is in progress; circles apply in event order.
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64, rect: DisplayRect) {
        if !self.drawing {
            return;
        }
        let Some(dims) = self.dimensions() else {
            return;
        };
        let Some(point) = map_to_pixel(client_x, client_y, rect, dims) else {
            return;
        };
        let brush = self.config.brush_size;
        if let Some(mask) = self.mask.as_mut() {
            mask.paint_circle(point, brush);
        }
    }

    /// Pointer-up: the stroke (if any) is complete and becomes the
    /// newest undoable unit.
    pub const fn pointer_up(&mut self) {
        self.drawing = false;
    }

    /// A click in display coordinates, routed per the active mode.
    ///
    /// Returns `None` when the click is owned by another gesture
    /// (stroke painting, crop box), no image is loaded, or the element
    /// is not laid out yet.
    pub fn click(&mut self, client_x: f64, client_y: f64, rect: DisplayRect) -> Option<ClickOutcome> {
        let dims = self.dimensions()?;
        let point = map_to_pixel(client_x, client_y, rect, dims)?;
        match self.click_action() {
            ClickAction::SampleColor => {
                let color = sample_color(self.image.as_ref()?, point)?;
                self.selection.push_color(color);
                Some(ClickOutcome::ColorSampled(color))
            }
            ClickAction::RecordPoint => {
                self.selection.set_click_point(point);
                Some(ClickOutcome::PointRecorded(point))
            }
            ClickAction::PaintStroke | ClickAction::CropGesture => None,
        }
    }

    /// Undo the most recent completed mask stroke.
    pub fn undo_mask(&mut self) -> bool {
        self.mask.as_mut().is_some_and(MaskBuffer::undo)
    }

    /// Hard-reset the mask to all-excluded.
    pub fn clear_mask(&mut self) {
        if let Some(mask) = self.mask.as_mut() {
            mask.clear();
        }
    }

    /// Number of undoable strokes currently held.
    #[must_use]
    pub fn mask_history_len(&self) -> usize {
        self.mask.as_ref().map_or(0, MaskBuffer::history_len)
    }

    /// Borrow the mask buffer, if one exists.
    #[must_use]
    pub const fn mask(&self) -> Option<&MaskBuffer> {
        self.mask.as_ref()
    }

    /// PNG-encode the mask. `Ok(None)` when no buffer exists.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::PngEncode`] if encoding fails.
    pub fn mask_png(&self) -> Result<Option<Vec<u8>>, EditorError> {
        self.mask.as_ref().map(MaskBuffer::to_png).transpose()
    }

    fn painted_mask_png(&self) -> Result<Vec<u8>, EditorError> {
        let mask = self.mask.as_ref().ok_or(EditorError::MaskRequired)?;
        if mask.bitmap().pixels().all(|p| p.0[0] == crate::mask::EXCLUDED) {
            return Err(EditorError::MaskRequired);
        }
        mask.to_png()
    }

    /// Resolve the "process" action for the current mode.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NoImage`] without a loaded image,
    /// [`EditorError::MaskRequired`] when a mask-driven mode has no
    /// painted mask, and [`EditorError::PointRequired`] when the magic
    /// wand has no recorded point.
    pub fn prepare_process(&self) -> Result<ProcessOutcome, EditorError> {
        use crate::sample::{BgRemovalMode, RemovalMethod};

        let image = self.image.as_ref().ok_or(EditorError::NoImage)?;
        let tolerance = self.config.color_tolerance;

        let plan = match self.mode {
            EditorMode::RemoveBg => match self.config.bg_removal_mode {
                BgRemovalMode::Draw => ProcessingPlan::RemoveBackground(BackgroundInput::Mask {
                    mask_png: self.painted_mask_png()?,
                    refine: self.config.smart_refine,
                }),
                BgRemovalMode::Manual if !self.selection.colors().is_empty() => {
                    ProcessingPlan::RemoveBackground(BackgroundInput::Colors {
                        colors: self.selection.colors().to_vec(),
                        tolerance,
                    })
                }
                BgRemovalMode::Manual | BgRemovalMode::Auto => {
                    ProcessingPlan::RemoveBackground(BackgroundInput::Auto)
                }
            },
            EditorMode::RemoveObjects => match self.config.removal_method {
                RemovalMethod::MagicWand => {
                    let point = self.selection.click_point().ok_or(EditorError::PointRequired)?;
                    ProcessingPlan::RemoveObjects(ObjectInput::Point { point, tolerance })
                }
                RemovalMethod::Brush => ProcessingPlan::RemoveObjects(ObjectInput::Mask {
                    mask_png: self.painted_mask_png()?,
                }),
            },
            EditorMode::Enhance => ProcessingPlan::Enhance {
                contrast: self.config.contrast,
                brightness: self.config.brightness,
                sharpness: self.config.sharpness,
            },
            EditorMode::Upscale => ProcessingPlan::Upscale {
                factor: self.config.upscale_factor,
                detail_boost: self.config.upscale_detail_boost,
            },
            EditorMode::Halftone => ProcessingPlan::Halftone {
                dot_size: self.config.dot_size,
                scale: self.config.halftone_scale,
                spacing: self.config.halftone_spacing,
                colors: self.selection.colors().to_vec(),
                tolerance,
            },
            EditorMode::ContourClip => match self.config.bg_removal_mode {
                BgRemovalMode::Manual | BgRemovalMode::Draw => {
                    ProcessingPlan::ContourClip(ContourInput::Manual {
                        mask_png: self.painted_mask_png()?,
                        refine: self.config.smart_refine,
                    })
                }
                BgRemovalMode::Auto => ProcessingPlan::ContourClip(ContourInput::Auto {
                    colors: self.selection.colors().to_vec(),
                    tolerance,
                }),
            },
            EditorMode::Crop => {
                return Ok(self
                    .crop
                    .cropped_image(image)
                    .map_or(ProcessOutcome::Idle, ProcessOutcome::Cropped));
            }
        };
        Ok(ProcessOutcome::Request(plan))
    }

    /// Start timing a processing round-trip issued at the current
    /// generation.
    #[must_use]
    pub fn start_request(&self) -> OperationTimer {
        OperationTimer::start(self.mode.route(), self.generation)
    }

    /// Accept a finished processing round-trip.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::StaleResult`] when the session has moved
    /// to a newer generation since the request was issued; the caller
    /// must discard the result instead of displaying it.
    pub fn accept_result(&mut self, timer: OperationTimer) -> Result<&OperationDiagnostics, EditorError> {
        if timer.generation() != self.generation {
            return Err(EditorError::StaleResult {
                current: self.generation,
                requested: timer.generation(),
            });
        }
        self.diagnostics.push(timer.finish());
        // Non-empty: pushed on the line above.
        Ok(&self.diagnostics[self.diagnostics.len() - 1])
    }
}
