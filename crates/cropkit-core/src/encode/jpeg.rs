//! JPEG encoding for export.
//!
//! Pixels are encoded with the `image` crate's JPEG encoder. An EXIF block,
//! when given, is spliced in as an APP1 segment directly after the SOI marker.

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{validate_buffer, EncodeError};

const SOI: [u8; 2] = [0xFF, 0xD8];
const APP1: [u8; 2] = [0xFF, 0xE1];
const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality, clamped to 1-100
/// * `exif` - Raw EXIF block (TIFF header onward) to embed
///
/// # Example
///
/// ```
/// use cropkit_core::encode::encode_jpeg;
///
/// let pixels = vec![128u8; 100 * 100 * 3];
/// let jpeg = encode_jpeg(&pixels, 100, 100, 95, None).unwrap();
/// assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
/// ```
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
    exif: Option<&[u8]>,
) -> Result<Vec<u8>, EncodeError> {
    validate_buffer(pixels, width, height)?;

    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    let jpeg = buffer.into_inner();
    match exif {
        Some(block) => insert_exif_segment(jpeg, block),
        None => Ok(jpeg),
    }
}

/// Splice `block` into `jpeg` as an APP1 Exif segment.
fn insert_exif_segment(jpeg: Vec<u8>, block: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if jpeg.get(0..2) != Some(&SOI[..]) {
        return Err(EncodeError::EncodingFailed(
            "encoder output lacks an SOI marker".to_string(),
        ));
    }

    // The length field counts itself and the Exif header.
    let size = 2 + EXIF_HEADER.len() + block.len();
    let length = u16::try_from(size).map_err(|_| EncodeError::ExifTooLarge { size })?;

    let mut out = Vec::with_capacity(jpeg.len() + 2 + size);
    out.extend_from_slice(&SOI);
    out.extend_from_slice(&APP1);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(EXIF_HEADER);
    out.extend_from_slice(block);
    out.extend_from_slice(&jpeg[2..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::sample_exif;

    #[test]
    fn test_encode_jpeg_basic() {
        let pixels = vec![128u8; 100 * 100 * 3];
        let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 95, None).unwrap();

        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);
        let len = jpeg_bytes.len();
        assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let pixels = vec![128u8; 10 * 10 * 3];
        assert!(encode_jpeg(&pixels, 10, 10, 0, None).is_ok());
        assert!(encode_jpeg(&pixels, 10, 10, 255, None).is_ok());
    }

    #[test]
    fn test_encode_jpeg_invalid_pixel_data() {
        let pixels = vec![128u8; 99 * 100 * 3];
        let result = encode_jpeg(&pixels, 100, 100, 90, None);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_zero_dimensions() {
        assert!(matches!(
            encode_jpeg(&[], 0, 100, 90, None),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_jpeg(&[], 100, 0, 90, None),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_exif_segment_follows_soi() {
        let exif = sample_exif(1);
        let pixels = vec![200u8; 8 * 8 * 3];
        let jpeg = encode_jpeg(&pixels, 8, 8, 95, Some(exif.as_slice())).unwrap();

        assert_eq!(&jpeg[0..4], &[0xFF, 0xD8, 0xFF, 0xE1]);
        let length = u16::from_be_bytes([jpeg[4], jpeg[5]]) as usize;
        assert_eq!(length, 2 + 6 + exif.len());
        assert_eq!(&jpeg[6..12], b"Exif\0\0");
        assert_eq!(&jpeg[12..12 + exif.len()], &exif[..]);
    }

    #[test]
    fn test_oversized_exif_rejected() {
        let block = vec![0u8; 70_000];
        let pixels = vec![0u8; 3];
        assert!(matches!(
            encode_jpeg(&pixels, 1, 1, 95, Some(block.as_slice())),
            Err(EncodeError::ExifTooLarge { size: 70_008 })
        ));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
