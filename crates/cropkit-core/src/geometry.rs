//! Rectangle and point primitives shared by every part of the crop engine.
//!
//! Rectangles are integer pixel rectangles (`i32` so that intermediate
//! proposals may temporarily run off the top/left edge). Pointer positions
//! are `f64` because pointer events deliver sub-pixel coordinates.

use serde::{Deserialize, Serialize};

/// A pointer position in canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An axis-aligned pixel rectangle.
///
/// The same type is used in display space and source space; which space a
/// value lives in is decided by the API that hands it out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Sum of width and height, used to decide whether a rectangle is small
    /// enough that its whole body acts as a move handle.
    #[inline]
    pub fn half_perimeter(&self) -> i32 {
        self.width.saturating_add(self.height)
    }

    /// Translate by a whole-pixel offset.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Check whether the rectangle lies entirely inside `width` x `height`
    /// and has a positive size.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.width >= 1
            && self.height >= 1
            && i64::from(self.x) + i64::from(self.width) <= i64::from(width)
            && i64::from(self.y) + i64::from(self.height) <= i64::from(height)
    }
}

/// Strict interior test: points on the boundary are outside.
pub fn point_in_rect(rect: &Rect, point: Point) -> bool {
    let (rx, ry) = (f64::from(rect.x), f64::from(rect.y));
    let (rw, rh) = (f64::from(rect.width), f64::from(rect.height));
    ry < point.y && point.y < ry + rh && rx < point.x && point.x < rx + rw
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Scale `width` x `height` down to fit inside `box_width` x `box_height`,
/// preserving aspect ratio. Never upscales; each side is at least 1.
pub fn fit_within(width: u32, height: u32, box_width: u32, box_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    if width <= box_width && height <= box_height {
        return (width, height);
    }

    let scale = (f64::from(box_width) / f64::from(width))
        .min(f64::from(box_height) / f64::from(height));

    let new_width = (f64::from(width) * scale).round() as u32;
    let new_height = (f64::from(height) * scale).round() as u32;
    (
        new_width.clamp(1, box_width.max(1)),
        new_height.clamp(1, box_height.max(1)),
    )
}
