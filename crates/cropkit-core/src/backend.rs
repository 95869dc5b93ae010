//! Pixel pipeline behind the crop session.
//!
//! The session only knows rectangles. This module turns a decoded source image
//! plus the session state into export bytes and preview thumbnails:
//!
//! ```text
//! decode -> orient (gray, flips, rotation) -> crop -> downscale -> sharpen -> encode
//! ```
//!
//! The oriented image depends only on the source and the orientation part of
//! the transform, so previews keep it in a [`PreviewCache`] and re-crop it for
//! every committed geometry change.

use thiserror::Error;
use tracing::debug;

use crate::decode::{resize_to_fit, DecodeError, DecodedImage, FilterType, SourceImage};
use crate::encode::{encode_jpeg, encode_png, normalize_exif, EncodeError};
use crate::error::CropError;
use crate::export::{ExportFormat, ExportSettings, PreviewSizes};
use crate::geometry::Rect;
use crate::session::CropSession;
use crate::transform::{
    apply_crop, apply_orientation, apply_sharpen, ImageTransform, InterpolationFilter,
    OrientationKey,
};

pub use crate::decode::decode_image;

/// Errors from the pixel pipeline.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Session(#[from] CropError),

    #[error("image has no pixels")]
    EmptyImage,
}

/// Result of [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub image: DecodedImage,
    /// A crop rectangle was applied.
    pub cropped: bool,
    /// The size constraint shrank the image.
    pub scaled: bool,
}

/// An encoded export and what happened on the way.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: ExportFormat,
    pub cropped: bool,
    pub scaled: bool,
}

/// Crop, downscale and sharpen an already oriented image.
///
/// `crop` is in the oriented image's pixel space; `None` keeps the whole
/// image. `max_edge` shrinks the result to fit a square box, never enlarging.
pub fn render(
    oriented: &DecodedImage,
    crop: Option<Rect>,
    max_edge: Option<u32>,
    sharpen: bool,
    filter: FilterType,
) -> Result<Rendered, BackendError> {
    if oriented.is_empty() {
        return Err(BackendError::EmptyImage);
    }

    let region = match crop {
        Some(rect) => apply_crop(oriented, rect),
        None => oriented.clone(),
    };

    let before = (region.width, region.height);
    let region = match max_edge {
        Some(edge) => resize_to_fit(&region, edge, filter)?,
        None => region,
    };
    let scaled = (region.width, region.height) != before;

    let image = if sharpen {
        apply_sharpen(&region)
    } else {
        region
    };

    Ok(Rendered {
        image,
        cropped: crop.is_some(),
        scaled,
    })
}

/// Encode `image` as `format`.
///
/// For JPEG, `exif` is rewritten for the output (orientation reset, new pixel
/// dimensions) and embedded; a block that cannot be rewritten is dropped.
/// PNG output never carries EXIF.
pub fn encode(
    image: &DecodedImage,
    format: ExportFormat,
    quality: u8,
    exif: Option<&[u8]>,
) -> Result<Vec<u8>, BackendError> {
    if image.is_empty() {
        return Err(BackendError::EmptyImage);
    }

    let bytes = match format {
        ExportFormat::Jpeg => {
            let exif = exif.and_then(|raw| normalize_exif(raw, image.width, image.height));
            encode_jpeg(
                &image.pixels,
                image.width,
                image.height,
                quality,
                exif.as_deref(),
            )?
        }
        ExportFormat::Png => encode_png(&image.pixels, image.width, image.height)?,
    };
    Ok(bytes)
}

/// Produce the exported file for `source` under the session's current state.
///
/// # Errors
///
/// `CropError::NoImage` if the session has no image loaded, otherwise any
/// pipeline or encoder failure.
pub fn export_image(
    source: &SourceImage,
    session: &CropSession,
    settings: &ExportSettings,
) -> Result<ExportOutput, BackendError> {
    if !session.has_image() {
        return Err(CropError::NoImage.into());
    }
    settings.validate()?;

    let transform = session.transform();
    let oriented = apply_orientation(&source.image, &transform, InterpolationFilter::Bilinear);
    let rendered = render(
        &oriented,
        session.export_region(),
        settings.constraint.max_edge(),
        transform.sharpen,
        FilterType::Lanczos3,
    )?;

    let exif = if settings.keep_exif {
        source.exif.as_deref()
    } else {
        None
    };
    let quality = session.config().jpeg_quality;
    let bytes = encode(&rendered.image, settings.format, quality, exif)?;

    debug!(
        width = rendered.image.width,
        height = rendered.image.height,
        format = ?settings.format,
        cropped = rendered.cropped,
        scaled = rendered.scaled,
        bytes = bytes.len(),
        "export.image"
    );
    Ok(ExportOutput {
        bytes,
        width: rendered.image.width,
        height: rendered.image.height,
        format: settings.format,
        cropped: rendered.cropped,
        scaled: rendered.scaled,
    })
}

/// Identity of a cached oriented image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    /// Caller-assigned id, changed on every image load.
    pub image_id: u64,
    pub orientation: OrientationKey,
    pub high_quality: bool,
}

impl PreviewKey {
    pub fn new(image_id: u64, transform: &ImageTransform, high_quality: bool) -> Self {
        Self {
            image_id,
            orientation: transform.orientation_key(),
            high_quality,
        }
    }
}

/// Holds the most recent oriented image used for previews.
#[derive(Debug, Default)]
pub struct PreviewCache {
    entry: Option<(PreviewKey, DecodedImage)>,
    builds: u64,
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> Option<PreviewKey> {
        self.entry.as_ref().map(|(key, _)| *key)
    }

    /// Number of times the oriented image had to be rebuilt.
    pub fn builds(&self) -> u64 {
        self.builds
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    fn oriented(&mut self, key: PreviewKey, build: impl FnOnce() -> DecodedImage) -> &DecodedImage {
        let entry = match self.entry.take() {
            Some(entry) if entry.0 == key => entry,
            _ => {
                debug!(image_id = key.image_id, hq = key.high_quality, "preview.orient");
                self.builds += 1;
                (key, build())
            }
        };
        &self.entry.insert(entry).1
    }
}

/// Thumbnails of the current crop, one per preview size, largest first.
///
/// Low-quality previews (during a drag) use nearest-neighbour sampling; high
/// quality ones use Lanczos. Each size is shrunk from the previous one.
pub fn render_previews(
    cache: &mut PreviewCache,
    source: &SourceImage,
    image_id: u64,
    session: &CropSession,
    sizes: &PreviewSizes,
    high_quality: bool,
) -> Result<Vec<DecodedImage>, BackendError> {
    if !session.has_image() {
        return Err(CropError::NoImage.into());
    }

    let transform = session.transform();
    let key = PreviewKey::new(image_id, &transform, high_quality);
    let (interpolation, filter) = if high_quality {
        (InterpolationFilter::Bilinear, FilterType::Lanczos3)
    } else {
        (InterpolationFilter::Nearest, FilterType::Nearest)
    };

    let oriented = cache.oriented(key, || {
        apply_orientation(&source.image, &transform, interpolation)
    });
    if oriented.is_empty() {
        return Err(BackendError::EmptyImage);
    }

    let mut current = match session.export_region() {
        Some(rect) => apply_crop(oriented, rect),
        None => oriented.clone(),
    };

    let mut previews = Vec::with_capacity(sizes.as_slice().len());
    for &size in sizes.as_slice() {
        current = resize_to_fit(&current, size, filter)?;
        previews.push(if transform.sharpen {
            apply_sharpen(&current)
        } else {
            current.clone()
        });
    }
    Ok(previews)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CropConfig;
    use crate::decode::decode_image;
    use crate::encode::sample_exif;
    use crate::ratio::CropRatio;
    use exif::{In, Reader, Tag};

    fn gradient(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(90);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    fn source(width: u32, height: u32, exif: Option<Vec<u8>>) -> SourceImage {
        SourceImage {
            image: gradient(width, height),
            exif,
        }
    }

    fn session_for(width: u32, height: u32) -> CropSession {
        let mut session = CropSession::new(CropConfig::default()).unwrap();
        session.set_image_bounds(width, height).unwrap();
        session
    }

    /// Pull the TIFF block back out of an APP1 segment written right after SOI.
    fn embedded_exif(jpeg: &[u8]) -> Option<exif::Exif> {
        Reader::new()
            .read_from_container(&mut std::io::Cursor::new(jpeg))
            .ok()
    }

    #[test]
    fn test_render_crop_and_scale_flags() {
        let image = gradient(400, 300);

        let full = render(&image, None, None, false, FilterType::Nearest).unwrap();
        assert!(!full.cropped && !full.scaled);
        assert_eq!(full.image, image);

        let cropped = render(
            &image,
            Some(Rect::new(10, 20, 200, 100)),
            Some(100),
            false,
            FilterType::Lanczos3,
        )
        .unwrap();
        assert!(cropped.cropped && cropped.scaled);
        assert_eq!((cropped.image.width, cropped.image.height), (100, 50));
    }

    #[test]
    fn test_render_large_constraint_does_not_scale() {
        let image = gradient(120, 80);
        let rendered = render(&image, None, Some(1920), false, FilterType::Lanczos3).unwrap();
        assert!(!rendered.scaled);
        assert_eq!((rendered.image.width, rendered.image.height), (120, 80));
    }

    #[test]
    fn test_render_empty_image() {
        let empty = DecodedImage::new(0, 0, Vec::new());
        assert!(matches!(
            render(&empty, None, None, false, FilterType::Nearest),
            Err(BackendError::EmptyImage)
        ));
    }

    #[test]
    fn test_encode_png_ignores_exif() {
        let image = gradient(8, 8);
        let exif = sample_exif(6);
        let png = encode(&image, ExportFormat::Png, 95, Some(exif.as_slice())).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert!(embedded_exif(&png).is_none());
    }

    #[test]
    fn test_encode_jpeg_normalizes_exif() {
        let image = gradient(16, 8);
        let exif = sample_exif(6);
        let jpeg = encode(&image, ExportFormat::Jpeg, 95, Some(exif.as_slice())).unwrap();

        let exif = embedded_exif(&jpeg).unwrap();
        let orientation = exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|f| f.value.get_uint(0));
        assert_eq!(orientation, Some(1));
        let width = exif
            .get_field(Tag::PixelXDimension, In::PRIMARY)
            .and_then(|f| f.value.get_uint(0));
        assert_eq!(width, Some(16));
    }

    #[test]
    fn test_export_requires_image() {
        let session = CropSession::new(CropConfig::default()).unwrap();
        let result = export_image(&source(10, 10, None), &session, &ExportSettings::default());
        assert!(matches!(result, Err(BackendError::Session(CropError::NoImage))));
    }

    #[test]
    fn test_export_rejects_limit_outside_custom_range() {
        let session = session_for(40, 40);
        let settings = ExportSettings {
            constraint: crate::export::SizeConstraint::Max(1),
            ..ExportSettings::default()
        };
        let result = export_image(&source(40, 40, None), &session, &settings);
        assert!(matches!(
            result,
            Err(BackendError::Session(CropError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_export_crops_to_session_rect() {
        let mut session = session_for(400, 300);
        session.set_rect(Rect::new(50, 40, 120, 120));

        let output =
            export_image(&source(400, 300, None), &session, &ExportSettings::default()).unwrap();
        assert_eq!((output.width, output.height), (120, 120));
        assert!(output.cropped);
        assert!(!output.scaled);

        let decoded = decode_image(&output.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (120, 120));
    }

    #[test]
    fn test_export_whole_image_when_crop_disabled() {
        let mut session = session_for(400, 300);
        session.set_crop_enabled(false);

        let settings = ExportSettings {
            constraint: crate::export::SizeConstraint::Max(200),
            format: ExportFormat::Png,
            keep_exif: true,
        };
        let output = export_image(&source(400, 300, None), &session, &settings).unwrap();
        assert_eq!((output.width, output.height), (200, 150));
        assert!(!output.cropped);
        assert!(output.scaled);
        assert_eq!(output.format, ExportFormat::Png);
    }

    #[test]
    fn test_export_discards_exif_on_request() {
        let session = session_for(64, 64);
        let src = source(64, 64, Some(sample_exif(1)));

        let kept = export_image(&src, &session, &ExportSettings::default()).unwrap();
        assert!(embedded_exif(&kept.bytes).is_some());

        let settings = ExportSettings {
            keep_exif: false,
            ..ExportSettings::default()
        };
        let dropped = export_image(&src, &session, &settings).unwrap();
        assert!(embedded_exif(&dropped.bytes).is_none());
    }

    #[test]
    fn test_export_follows_orientation() {
        let mut session = session_for(400, 300);
        session.set_crop_enabled(false);
        session.set_transform(ImageTransform {
            rotation: 90.0,
            ..ImageTransform::default()
        });

        let output =
            export_image(&source(400, 300, None), &session, &ExportSettings::default()).unwrap();
        assert_eq!((output.width, output.height), (300, 400));
    }

    #[test]
    fn test_previews_sizes_and_cache() {
        let mut session = session_for(400, 300);
        session.set_ratio_policy(CropRatio::Unlocked).unwrap();
        session.set_rect(Rect::new(0, 0, 200, 200));
        let src = source(400, 300, None);
        let sizes = PreviewSizes::default();
        let mut cache = PreviewCache::new();

        let previews = render_previews(&mut cache, &src, 1, &session, &sizes, true).unwrap();
        let dims: Vec<_> = previews.iter().map(|p| (p.width, p.height)).collect();
        assert_eq!(dims, vec![(184, 184), (64, 64), (32, 32)]);
        assert_eq!(cache.builds(), 1);

        // Geometry changes reuse the oriented image.
        session.set_rect(Rect::new(10, 10, 100, 50));
        let previews = render_previews(&mut cache, &src, 1, &session, &sizes, true).unwrap();
        assert_eq!((previews[0].width, previews[0].height), (100, 50));
        assert_eq!(cache.builds(), 1);

        // Orientation changes do not.
        session.set_transform(ImageTransform {
            grayscale: true,
            ..ImageTransform::default()
        });
        render_previews(&mut cache, &src, 1, &session, &sizes, true).unwrap();
        assert_eq!(cache.builds(), 2);

        // Nor does a new image.
        render_previews(&mut cache, &src, 2, &session, &sizes, true).unwrap();
        assert_eq!(cache.builds(), 3);
    }

    #[test]
    fn test_sharpen_is_not_part_of_cache_key() {
        let mut session = session_for(100, 100);
        let src = source(100, 100, None);
        let sizes = PreviewSizes::new(&[32]);
        let mut cache = PreviewCache::new();

        render_previews(&mut cache, &src, 7, &session, &sizes, false).unwrap();
        session.set_transform(ImageTransform {
            sharpen: true,
            ..ImageTransform::default()
        });
        render_previews(&mut cache, &src, 7, &session, &sizes, false).unwrap();
        assert_eq!(cache.builds(), 1);
        assert_eq!(
            cache.key(),
            Some(PreviewKey::new(7, &session.transform(), false))
        );
    }
}
