//! Image encoding for export.
//!
//! This module provides functionality for:
//! - Encoding images to JPEG with configurable quality and an optional EXIF block
//! - Encoding images to PNG
//! - Rewriting a source EXIF block so it describes the exported pixels
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::encode::encode_jpeg;
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 95, None).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod exif;
mod jpeg;
mod png;

use thiserror::Error;

pub use self::exif::normalize_exif;
pub use self::jpeg::encode_jpeg;
pub use self::png::encode_png;

#[cfg(test)]
pub(crate) use self::exif::sample_exif;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The EXIF block does not fit in a single APP1 segment
    #[error("EXIF block of {size} bytes exceeds the 65533 byte segment limit")]
    ExifTooLarge { size: usize },

    /// The encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Check an RGB buffer against its dimensions.
fn validate_buffer(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}
