//! Grayscale and sharpen, delegated to the `image` crate.

use image::DynamicImage;

use crate::decode::DecodedImage;

/// Blur radius of the unsharp mask.
const SHARPEN_SIGMA: f32 = 0.7;

/// Minimum brightness difference the unsharp mask reacts to.
const SHARPEN_THRESHOLD: i32 = 0;

/// Luma conversion, kept as three equal RGB channels.
pub fn apply_grayscale(image: &DecodedImage) -> DecodedImage {
    let Some(rgb) = image.to_rgb_image() else {
        return image.clone();
    };
    let gray = DynamicImage::ImageRgb8(rgb).grayscale();
    DecodedImage::from_rgb_image(gray.into_rgb8())
}

/// Light unsharp mask.
pub fn apply_sharpen(image: &DecodedImage) -> DecodedImage {
    let Some(rgb) = image.to_rgb_image() else {
        return image.clone();
    };
    let sharpened = image::imageops::unsharpen(&rgb, SHARPEN_SIGMA, SHARPEN_THRESHOLD);
    DecodedImage::from_rgb_image(sharpened)
}
