//! Confinement of a crop rectangle to the source image.
//!
//! Every committed rectangle passes through [`confine`]. The steps run in a
//! fixed order:
//!
//! 1. Sizes are raised to one pixel, then locked ratios rebuild the size from
//!    the height (see [`CropRatio::quantize`]).
//! 2. The origin slides up/left until the far edges fit.
//! 3. The origin is clamped to zero.
//! 4. A side larger than the image is clamped to it.
//!
//! Sliding before clamping means a rectangle hanging off the bottom-right is
//! repositioned rather than resized.

use crate::geometry::Rect;
use crate::ratio::{CropRatio, SNAP_HEIGHT, SNAP_TOLERANCE};

/// Bring `rect` inside a `source_width` x `source_height` image under `policy`.
///
/// Both source dimensions must be at least 1; the session enforces this when
/// bounds are set. The result satisfies `0 <= x`, `0 <= y`, `width >= 1`,
/// `height >= 1` and lies within the image.
pub fn confine(rect: Rect, policy: CropRatio, source_width: u32, source_height: u32) -> Rect {
    let source_w = i32::try_from(source_width).unwrap_or(i32::MAX).max(1);
    let source_h = i32::try_from(source_height).unwrap_or(i32::MAX).max(1);

    let Rect {
        mut x,
        mut y,
        mut width,
        mut height,
    } = rect;
    width = width.max(1);
    height = height.max(1);

    // Step 1: ratio quantization.
    if policy.is_locked() {
        (width, height) = policy.quantize(width, height);
    }

    // Step 2: slide so the far edges fit.
    if i64::from(x) + i64::from(width) > i64::from(source_w) {
        x = source_w - width;
    }
    if i64::from(y) + i64::from(height) > i64::from(source_h) {
        y = source_h - height;
    }

    // Step 3: clamp origin.
    x = x.max(0);
    y = y.max(0);

    // Step 4: clamp oversize dimensions.
    if width > source_w || height > source_h {
        (width, height) = clamp_oversize(policy, width, height, source_w, source_h);
        x = x.min(source_w - width).max(0);
        y = y.min(source_h - height).max(0);
    }

    Rect::new(x, y, width.max(1), height.max(1))
}

fn clamp_oversize(
    policy: CropRatio,
    mut width: i32,
    mut height: i32,
    source_w: i32,
    source_h: i32,
) -> (i32, i32) {
    if policy.is_locked() && !policy.is_square() {
        return fit_locked(policy, width.min(source_w), height.min(source_h), source_w, source_h);
    }

    if width > source_w {
        width = source_w;
        if policy.is_square() {
            height = width;
        }
    }
    if height > source_h {
        height = source_h;
        if policy.is_square() {
            width = height;
        }
    }
    (width, height)
}

/// Shrink a locked, non-square rectangle to an exact ratio multiple.
///
/// Heights inside a snap band are reserved for the snap size itself: if the
/// snap size fits the image it is used, otherwise the multiple is shrunk below
/// the band. When not even one ratio unit fits, the crop covers the image.
fn fit_locked(
    policy: CropRatio,
    limit_w: i32,
    limit_h: i32,
    source_w: i32,
    source_h: i32,
) -> (i32, i32) {
    let CropRatio::Locked {
        width: ratio_w,
        height: ratio_h,
    } = policy
    else {
        return (limit_w, limit_h);
    };
    let Some((width, height)) = policy.largest_multiple_within(limit_w, limit_h) else {
        return (source_w, source_h);
    };

    match policy.snap_size() {
        Some((snap_w, snap_h)) if (height - SNAP_HEIGHT).abs() < SNAP_TOLERANCE => {
            if snap_w <= source_w && snap_h <= source_h {
                return (snap_w, snap_h);
            }
            let (ratio_w, ratio_h) = (ratio_w as i32, ratio_h as i32);
            let below_band = SNAP_HEIGHT - SNAP_TOLERANCE;
            let unit = (height / ratio_h).min(below_band / ratio_h).max(1);
            (unit * ratio_w, unit * ratio_h)
        }
        _ => (width, height),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
