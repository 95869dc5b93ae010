//! Orientation and effect transforms applied to the decoded image.
//!
//! # Transform Order
//!
//! The pipeline runs in this order, for previews and exports alike:
//! 1. Grayscale
//! 2. Horizontal flip, then vertical flip
//! 3. Rotation (canvas expanded to the rotated bounding box)
//! 4. Crop to the committed rectangle
//! 5. Downscale to the export constraint or preview size
//! 6. Sharpen
//!
//! Steps 1-3 produce the *oriented* image; the crop rectangle lives in its
//! coordinate space.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = counter-clockwise
//! - Crop rectangles are integer pixels of the oriented image
//! - Origin is top-left corner

mod crop;
mod effects;
mod rotation;

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;

pub use crop::apply_crop;
pub use effects::{apply_grayscale, apply_sharpen};
pub use rotation::{apply_rotation, compute_rotated_bounds, InterpolationFilter};

/// User-selected orientation and effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageTransform {
    /// Degrees, positive = counter-clockwise.
    pub rotation: f64,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub grayscale: bool,
    pub sharpen: bool,
}

impl ImageTransform {
    /// Size of a `width` x `height` image after flips and rotation.
    pub fn oriented_size(&self, width: u32, height: u32) -> (u32, u32) {
        compute_rotated_bounds(width, height, self.rotation)
    }

    /// The part of the transform that changes the oriented pixels.
    ///
    /// Sharpen runs after resizing, so it is not part of the key.
    pub fn orientation_key(&self) -> OrientationKey {
        OrientationKey {
            rotation_bits: self.rotation.to_bits(),
            flip_horizontal: self.flip_horizontal,
            flip_vertical: self.flip_vertical,
            grayscale: self.grayscale,
        }
    }
}

/// Hashable identity of an oriented image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrientationKey {
    rotation_bits: u64,
    flip_horizontal: bool,
    flip_vertical: bool,
    grayscale: bool,
}

/// Run grayscale, flips and rotation over `image`.
pub fn apply_orientation(
    image: &DecodedImage,
    transform: &ImageTransform,
    filter: InterpolationFilter,
) -> DecodedImage {
    let mut oriented = if transform.grayscale {
        apply_grayscale(image)
    } else {
        image.clone()
    };

    if transform.flip_horizontal {
        oriented = flip(&oriented, true);
    }
    if transform.flip_vertical {
        oriented = flip(&oriented, false);
    }

    if transform.rotation.abs() < 0.001 {
        oriented
    } else {
        apply_rotation(&oriented, transform.rotation, filter)
    }
}

fn flip(image: &DecodedImage, horizontal: bool) -> DecodedImage {
    let row_len = image.width as usize * 3;
    if row_len == 0 {
        return image.clone();
    }

    let pixels = if horizontal {
        image
            .pixels
            .chunks_exact(row_len)
            .flat_map(|row| row.chunks_exact(3).rev().flatten().copied())
            .collect()
    } else {
        image
            .pixels
            .chunks_exact(row_len)
            .rev()
            .flatten()
            .copied()
            .collect()
    };

    DecodedImage {
        width: image.width,
        height: image.height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 image: red, green / blue, white.
    fn quad() -> DecodedImage {
        DecodedImage::new(
            2,
            2,
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
        )
    }

    fn pixel(image: &DecodedImage, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y * image.width + x) * 3) as usize;
        [image.pixels[idx], image.pixels[idx + 1], image.pixels[idx + 2]]
    }

    #[test]
    fn test_identity_transform() {
        let image = quad();
        let out = apply_orientation(&image, &ImageTransform::default(), InterpolationFilter::Bilinear);
        assert_eq!(out.pixels, image.pixels);
    }

    #[test]
    fn test_flip_horizontal() {
        let transform = ImageTransform {
            flip_horizontal: true,
            ..Default::default()
        };
        let out = apply_orientation(&quad(), &transform, InterpolationFilter::Bilinear);
        assert_eq!(pixel(&out, 0, 0), [0, 255, 0]);
        assert_eq!(pixel(&out, 1, 0), [255, 0, 0]);
        assert_eq!(pixel(&out, 0, 1), [255, 255, 255]);
    }

    #[test]
    fn test_flip_vertical() {
        let transform = ImageTransform {
            flip_vertical: true,
            ..Default::default()
        };
        let out = apply_orientation(&quad(), &transform, InterpolationFilter::Bilinear);
        assert_eq!(pixel(&out, 0, 0), [0, 0, 255]);
        assert_eq!(pixel(&out, 1, 1), [0, 255, 0]);
    }

    #[test]
    fn test_oriented_size_follows_rotation() {
        let transform = ImageTransform {
            rotation: -90.0,
            flip_horizontal: true,
            ..Default::default()
        };
        assert_eq!(transform.oriented_size(400, 300), (300, 400));
        let out = apply_orientation(
            &DecodedImage::new(4, 3, vec![0; 36]),
            &transform,
            InterpolationFilter::Nearest,
        );
        assert_eq!((out.width, out.height), (3, 4));
    }

    #[test]
    fn test_orientation_key_ignores_sharpen() {
        let plain = ImageTransform::default();
        let sharp = ImageTransform {
            sharpen: true,
            ..Default::default()
        };
        assert_eq!(plain.orientation_key(), sharp.orientation_key());

        let gray = ImageTransform {
            grayscale: true,
            ..Default::default()
        };
        assert_ne!(plain.orientation_key(), gray.orientation_key());
    }
}
