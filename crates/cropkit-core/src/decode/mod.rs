//! Image decoding for the crop pipeline.
//!
//! This module provides functionality for:
//! - Decoding JPEG, PNG and GIF images with EXIF orientation applied
//! - Keeping the raw EXIF block for pass-through on export
//! - Image resizing for previews and export size constraints
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::decode::decode_image;
//!
//! let bytes = std::fs::read("avatar.jpg").unwrap();
//! let source = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", source.image.width, source.image.height);
//! ```

mod resize;
mod source;
mod types;

pub use resize::{resize, resize_to_fit};
pub use source::{decode_image, get_orientation, SourceImage};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
