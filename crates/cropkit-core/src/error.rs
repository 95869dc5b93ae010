//! Error types for crop session configuration.
//!
//! Pointer handling itself never fails: every degenerate input is rejected
//! when it is configured, so drag processing can stay infallible.

use thiserror::Error;

/// Errors raised when configuring a [`CropSession`](crate::CropSession).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CropError {
    /// Source image dimensions must both be positive.
    #[error("Invalid image bounds: {width}x{height} (both dimensions must be at least 1)")]
    InvalidImageBounds { width: u32, height: u32 },

    /// Ratio components must both be positive.
    #[error("Invalid crop ratio {width}:{height} (both terms must be at least 1)")]
    InvalidRatio { width: u32, height: u32 },

    /// Canvas size must both be positive.
    #[error("Invalid canvas size: {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The operation needs a loaded image.
    #[error("No image loaded")]
    NoImage,
}
