//! Cropkit Core - Avatar cropping library
//!
//! This crate provides the core functionality for Cropkit: the interactive
//! crop-rectangle engine (handles, drags, ratio locks, confinement), the
//! display/source coordinate mapping, and the image pipeline that turns the
//! committed rectangle into previews and exported files.

pub mod backend;
pub mod config;
pub mod confine;
pub mod decode;
pub mod drag;
pub mod encode;
pub mod error;
pub mod export;
pub mod geometry;
pub mod handle;
pub mod ratio;
pub mod session;
pub mod transform;
pub mod view;

pub use backend::{export_image, render, render_previews, BackendError, ExportOutput, PreviewCache};
pub use config::CropConfig;
pub use drag::Modifiers;
pub use error::CropError;
pub use export::{ExportFormat, ExportSettings, PreviewSizes, SizeConstraint};
pub use geometry::{Point, Rect};
pub use handle::{CursorHint, Handle};
pub use ratio::{CropRatio, RatioIndicator, RatioPreset};
pub use session::{CropSession, PointerUpdate};
pub use transform::ImageTransform;
pub use view::{CanvasSize, DisplayTransform};
