//! estampa-editor: Interactive image-editing core (sans-IO).
//!
//! State machines and pure geometry for the print-shop image editors:
//! display-to-pixel coordinate mapping, mask painting with bounded
//! undo, color/point selection, watermark placement and compositing,
//! crop-tool lifecycle, and the per-image [`session::EditSession`]
//! that ties them together and resolves the "process" action into a
//! [`session::ProcessingPlan`].
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! images and returns structured data. Request serialization lives in
//! `estampa-api`; stored-image bookkeeping lives in `estampa-gallery`.

pub mod config;
pub mod coords;
pub mod crop;
pub mod diagnostics;
pub mod mask;
pub mod sample;
pub mod session;
pub mod types;
pub mod watermark;

pub use config::EditorConfig;
pub use coords::{DisplayRect, map_to_pixel};
pub use crop::{CropAdapter, CropHandle, CropRegion, CropTool};
pub use mask::MaskBuffer;
pub use sample::{BgRemovalMode, ClickAction, EditorMode, RemovalMethod, SelectionState};
pub use session::{
    BackgroundInput, ClickOutcome, ContourInput, EditSession, ObjectInput, ProcessOutcome,
    ProcessingPlan,
};
pub use types::{Dimensions, EditorError, GrayImage, PixelPoint, Rgb, RgbaImage};
pub use watermark::{WatermarkCompositor, WatermarkShape};
