//! Source image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{Exif, In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageReader};
use tracing::debug;

use super::{DecodeError, DecodedImage, Orientation};

/// A decoded source image and the metadata carried through to export.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Pixels with EXIF orientation already applied.
    pub image: DecodedImage,
    /// Raw EXIF block (TIFF header onward), if the file carried one.
    pub exif: Option<Vec<u8>>,
}

impl SourceImage {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }

    pub fn has_exif(&self) -> bool {
        self.exif.is_some()
    }
}

/// Decode a JPEG, PNG or GIF from bytes, applying EXIF orientation.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format is not recognized,
/// `DecodeError::CorruptedFile` if decoding fails part way and
/// `DecodeError::Empty` for an image without pixels.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let exif = read_exif(bytes);
    let orientation = exif.as_ref().map(orientation_of).unwrap_or_default();

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    })?;

    let rgb = apply_orientation(img, orientation).into_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(DecodeError::Empty);
    }

    debug!(
        width = rgb.width(),
        height = rgb.height(),
        ?orientation,
        exif = exif.is_some(),
        "decode.image"
    );
    Ok(SourceImage {
        image: DecodedImage::from_rgb_image(rgb),
        exif: exif.map(|exif| exif.buf().to_vec()),
    })
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    read_exif(bytes)
        .as_ref()
        .map(orientation_of)
        .unwrap_or_default()
}

fn read_exif(bytes: &[u8]) -> Option<Exif> {
    Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()
}

fn orientation_of(exif: &Exif) -> Orientation {
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
