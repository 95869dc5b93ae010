//! Pixel-rectangle cropping.
//!
//! The committed crop rectangle is already confined, but the crop is also
//! used with rectangles from other sources (restored state, the WASM API), so
//! it clamps rather than trusting its input.

use crate::decode::DecodedImage;
use crate::geometry::Rect;

/// Copy the `rect` region of `image` into a new image.
///
/// # Behavior
///
/// - The rectangle is clamped to the image bounds
/// - Minimum output dimension is 1x1 pixels
/// - A rectangle covering the whole image returns a copy of the original
///
/// # Example
///
/// ```
/// use cropkit_core::decode::DecodedImage;
/// use cropkit_core::transform::apply_crop;
/// use cropkit_core::Rect;
///
/// let image = DecodedImage::new(100, 100, vec![128u8; 100 * 100 * 3]);
/// let cropped = apply_crop(&image, Rect::new(25, 25, 50, 50));
/// assert_eq!((cropped.width, cropped.height), (50, 50));
/// ```
pub fn apply_crop(image: &DecodedImage, rect: Rect) -> DecodedImage {
    if image.is_empty() {
        return image.clone();
    }

    let left = clamp_coord(rect.x, image.width - 1);
    let top = clamp_coord(rect.y, image.height - 1);
    let right = clamp_coord(rect.right(), image.width).max(left + 1);
    let bottom = clamp_coord(rect.bottom(), image.height).max(top + 1);

    if left == 0 && top == 0 && right == image.width && bottom == image.height {
        return image.clone();
    }

    let out_width = right - left;
    let out_height = bottom - top;
    let row_len = image.width as usize * 3;

    let mut output = Vec::with_capacity(out_width as usize * out_height as usize * 3);
    for row in image
        .pixels
        .chunks_exact(row_len)
        .skip(top as usize)
        .take(out_height as usize)
    {
        output.extend_from_slice(&row[left as usize * 3..right as usize * 3]);
    }

    DecodedImage {
        width: out_width,
        height: out_height,
        pixels: output,
    }
}

fn clamp_coord(value: i32, max: u32) -> u32 {
    u32::try_from(value).unwrap_or(0).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Each pixel's value encodes its position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_crop_region() {
        let image = test_image(10, 10);
        let out = apply_crop(&image, Rect::new(2, 3, 4, 5));
        assert_eq!((out.width, out.height), (4, 5));
        // First pixel is (2, 3) -> 32
        assert_eq!(out.pixels[0], 32);
        // Last pixel is (5, 7) -> 75
        assert_eq!(out.pixels[out.pixels.len() - 1], 75);
    }

    #[test]
    fn test_full_crop_returns_copy() {
        let image = test_image(8, 6);
        let out = apply_crop(&image, Rect::new(0, 0, 8, 6));
        assert_eq!(out.pixels, image.pixels);
    }

    #[test]
    fn test_crop_clamped_to_bounds() {
        let image = test_image(10, 10);
        let out = apply_crop(&image, Rect::new(-5, 8, 30, 30));
        assert_eq!((out.width, out.height), (10, 2));
    }

    #[test]
    fn test_crop_minimum_one_pixel() {
        let image = test_image(10, 10);
        let out = apply_crop(&image, Rect::new(20, 20, 0, 0));
        assert_eq!((out.width, out.height), (1, 1));
        assert_eq!(out.pixels[0], 99);
    }
}
