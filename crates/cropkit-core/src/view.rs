//! Display-space fitting and display ↔ source coordinate mapping.
//!
//! The preview is drawn uniformly scaled, so a single scale factor
//! (`display_height / source_height`) maps every coordinate of a rectangle.
//! Mapping uses round-to-nearest; ratio quantization (floor division) is a
//! separate concern handled in [`crate::ratio`].

use serde::{Deserialize, Serialize};

use crate::error::CropError;
use crate::geometry::{fit_within, Point, Rect};

/// Where the preview image sits on the canvas.
pub const DISPLAY_OFFSET: (i32, i32) = (40, 40);

/// Horizontal canvas space reserved for the side panel and previews.
const RESERVED_WIDTH: u32 = 320;

/// Vertical canvas space reserved above and below the image.
const RESERVED_HEIGHT: u32 = 80;

/// Smallest canvas for which the image is fitted at all.
const MIN_FIT_CANVAS: u32 = 100;

/// Available drawing area in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Result<Self, CropError> {
        if width == 0 || height == 0 {
            return Err(CropError::InvalidCanvas { width, height });
        }
        Ok(Self { width, height })
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 760,
        }
    }
}

/// Scale and placement of the on-screen preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayTransform {
    /// `display_height / source_height`, always positive.
    pub scale_factor: f64,
    pub offset_x: i32,
    pub offset_y: i32,
    pub display_width: u32,
    pub display_height: u32,
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self::identity(1, 1)
    }
}

impl DisplayTransform {
    /// Unscaled preview of a `width` x `height` image.
    pub fn identity(width: u32, height: u32) -> Self {
        Self {
            scale_factor: 1.0,
            offset_x: DISPLAY_OFFSET.0,
            offset_y: DISPLAY_OFFSET.1,
            display_width: width,
            display_height: height,
        }
    }

    /// Fit a source image into the canvas.
    ///
    /// Images are shrunk into `(max(canvas_w - 320, 320), canvas_h - 80)`
    /// when the canvas is larger than 100x100 and the image would not
    /// otherwise fit. Images are never upscaled.
    pub fn fit(source_width: u32, source_height: u32, canvas: CanvasSize) -> Result<Self, CropError> {
        if source_width == 0 || source_height == 0 {
            return Err(CropError::InvalidImageBounds {
                width: source_width,
                height: source_height,
            });
        }

        let mut transform = Self::identity(source_width, source_height);
        if canvas.width <= MIN_FIT_CANVAS || canvas.height <= MIN_FIT_CANVAS {
            return Ok(transform);
        }

        let box_w = canvas.width.saturating_sub(RESERVED_WIDTH).max(RESERVED_WIDTH);
        let box_h = canvas.height - RESERVED_HEIGHT;
        let (display_w, display_h) = fit_within(source_width, source_height, box_w, box_h);

        transform.display_width = display_w;
        transform.display_height = display_h;
        transform.scale_factor = f64::from(display_h) / f64::from(source_height);
        Ok(transform)
    }

    /// Map a display-space length or coordinate to source space.
    #[inline]
    pub fn to_source(&self, value: i32) -> i32 {
        (f64::from(value) / self.scale_factor).round() as i32
    }

    /// Map a source-space length or coordinate to display space.
    #[inline]
    pub fn to_display(&self, value: i32) -> i32 {
        (f64::from(value) * self.scale_factor).round() as i32
    }

    pub fn to_source_rect(&self, rect: Rect) -> Rect {
        Rect::new(
            self.to_source(rect.x),
            self.to_source(rect.y),
            self.to_source(rect.width),
            self.to_source(rect.height),
        )
    }

    pub fn to_display_rect(&self, rect: Rect) -> Rect {
        Rect::new(
            self.to_display(rect.x),
            self.to_display(rect.y),
            self.to_display(rect.width),
            self.to_display(rect.height),
        )
    }

    /// Canvas-space origin of the preview image.
    pub fn origin(&self) -> Point {
        Point::new(f64::from(self.offset_x), f64::from(self.offset_y))
    }

    /// Shift a display-space rectangle to canvas coordinates.
    pub fn to_canvas_rect(&self, rect: Rect) -> Rect {
        rect.translated(self.offset_x, self.offset_y)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
