//! Image rotation with canvas expansion.
//!
//! Quarter turns are exact pixel permutations. Any other angle uses inverse
//! mapping: for each output pixel the source position is found by rotating
//! back around the image centre, then sampled.
//!
//! For a counter-clockwise rotation by θ (y axis pointing down):
//! ```text
//! src_x = dx * cos(θ) - dy * sin(θ) + src_cx
//! src_y = dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//! where `(dx, dy)` is the output pixel relative to the output centre.
//! Output pixels that map outside the source are black.

use crate::decode::DecodedImage;

const BACKGROUND: [u8; 3] = [0, 0, 0];

/// Sampling used for arbitrary angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationFilter {
    /// Nearest neighbour, for interactive previews.
    Nearest,
    /// Bilinear, for exports.
    #[default]
    Bilinear,
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// # Arguments
///
/// * `width` - Original image width
/// * `height` - Original image height
/// * `angle_degrees` - Rotation angle in degrees (positive = counter-clockwise)
///
/// # Returns
///
/// Tuple of (new_width, new_height), each at least 1.
///
/// # Example
///
/// ```
/// use cropkit_core::transform::compute_rotated_bounds;
///
/// let (w, h) = compute_rotated_bounds(100, 50, 90.0);
/// assert_eq!((w, h), (50, 100));
/// ```
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    match QuarterTurn::from_degrees(angle_degrees) {
        Some(QuarterTurn::None | QuarterTurn::Half) => return (width, height),
        Some(QuarterTurn::Ccw | QuarterTurn::Cw) => return (height, width),
        None => {}
    }

    let angle_rad = angle_degrees.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();
    let (w, h) = (f64::from(width), f64::from(height));

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;
    (new_w.max(1), new_h.max(1))
}

/// Rotate `image` around its centre, expanding the canvas to fit.
///
/// The output size always equals [`compute_rotated_bounds`].
pub fn apply_rotation(
    image: &DecodedImage,
    angle_degrees: f64,
    filter: InterpolationFilter,
) -> DecodedImage {
    if image.is_empty() {
        return image.clone();
    }
    match QuarterTurn::from_degrees(angle_degrees) {
        Some(turn) => rotate_quarter(image, turn),
        None => rotate_arbitrary(image, angle_degrees, filter),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuarterTurn {
    None,
    Ccw,
    Half,
    Cw,
}

impl QuarterTurn {
    fn from_degrees(angle: f64) -> Option<Self> {
        let normalized = angle.rem_euclid(360.0);
        let near = |target: f64| (normalized - target).abs() < 0.001;
        if near(0.0) || near(360.0) {
            Some(QuarterTurn::None)
        } else if near(90.0) {
            Some(QuarterTurn::Ccw)
        } else if near(180.0) {
            Some(QuarterTurn::Half)
        } else if near(270.0) {
            Some(QuarterTurn::Cw)
        } else {
            None
        }
    }
}

fn rotate_quarter(image: &DecodedImage, turn: QuarterTurn) -> DecodedImage {
    let (w, h) = (image.width, image.height);
    let (dst_w, dst_h) = match turn {
        QuarterTurn::Ccw | QuarterTurn::Cw => (h, w),
        QuarterTurn::None | QuarterTurn::Half => (w, h),
    };

    let mut output = Vec::with_capacity(image.pixels.len());
    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let (src_x, src_y) = match turn {
                QuarterTurn::None => (dst_x, dst_y),
                QuarterTurn::Ccw => (w - 1 - dst_y, dst_x),
                QuarterTurn::Half => (w - 1 - dst_x, h - 1 - dst_y),
                QuarterTurn::Cw => (dst_y, h - 1 - dst_x),
            };
            let idx = ((src_y * w + src_x) * 3) as usize;
            output.extend_from_slice(&image.pixels[idx..idx + 3]);
        }
    }

    DecodedImage {
        width: dst_w,
        height: dst_h,
        pixels: output,
    }
}

fn rotate_arbitrary(
    image: &DecodedImage,
    angle_degrees: f64,
    filter: InterpolationFilter,
) -> DecodedImage {
    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, angle_degrees);

    let angle_rad = angle_degrees.to_radians();
    let (sin, cos) = angle_rad.sin_cos();

    let src_cx = f64::from(image.width) / 2.0;
    let src_cy = f64::from(image.height) / 2.0;
    let dst_cx = f64::from(dst_w) / 2.0;
    let dst_cy = f64::from(dst_h) / 2.0;

    let mut output = Vec::with_capacity(dst_w as usize * dst_h as usize * 3);
    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            // Pixel centres.
            let dx = f64::from(dst_x) + 0.5 - dst_cx;
            let dy = f64::from(dst_y) + 0.5 - dst_cy;

            let src_x = dx * cos - dy * sin + src_cx - 0.5;
            let src_y = dx * sin + dy * cos + src_cy - 0.5;

            let pixel = match filter {
                InterpolationFilter::Nearest => sample_nearest(image, src_x, src_y),
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
            };
            output.extend_from_slice(&pixel);
        }
    }

    DecodedImage {
        width: dst_w,
        height: dst_h,
        pixels: output,
    }
}

#[inline]
fn inside(image: &DecodedImage, x: f64, y: f64) -> bool {
    x >= -0.5 && y >= -0.5 && x < f64::from(image.width) - 0.5 && y < f64::from(image.height) - 0.5
}

#[inline]
fn get_pixel(image: &DecodedImage, x: u32, y: u32) -> [u8; 3] {
    let idx = ((y * image.width + x) * 3) as usize;
    [image.pixels[idx], image.pixels[idx + 1], image.pixels[idx + 2]]
}

fn sample_nearest(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    if !inside(image, x, y) {
        return BACKGROUND;
    }
    let px = ((x + 0.5).floor() as u32).min(image.width - 1);
    let py = ((y + 0.5).floor() as u32).min(image.height - 1);
    get_pixel(image, px, py)
}

fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    if !inside(image, x, y) {
        return BACKGROUND;
    }
    let x = x.clamp(0.0, f64::from(image.width - 1));
    let y = y.clamp(0.0, f64::from(image.height - 1));

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);
    let fx = x - f64::from(x0);
    let fy = y - f64::from(y0);

    let p00 = get_pixel(image, x0, y0);
    let p10 = get_pixel(image, x1, y0);
    let p01 = get_pixel(image, x0, y1);
    let p11 = get_pixel(image, x1, y1);

    let mut result = [0u8; 3];
    for (i, channel) in result.iter_mut().enumerate() {
        let v = f64::from(p00[i]) * (1.0 - fx) * (1.0 - fy)
            + f64::from(p10[i]) * fx * (1.0 - fy)
            + f64::from(p01[i]) * (1.0 - fx) * fy
            + f64::from(p11[i]) * fx * fy;
        *channel = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}
