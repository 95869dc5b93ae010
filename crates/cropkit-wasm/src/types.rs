//! WASM-compatible wrapper types.
//!
//! This module provides JavaScript-friendly types that wrap the core Cropkit
//! types, handling the conversion between Rust and JavaScript representations.

use cropkit_core::decode::DecodedImage;
use cropkit_core::{PointerUpdate, Rect};
use wasm_bindgen::prelude::*;

/// A decoded image wrapper for JavaScript.
///
/// Used for preview thumbnails. The pixel data is stored in WASM memory;
/// `pixels()` copies it out as a `Uint8Array`.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 3 for RGB)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Returns RGBA pixel data, ready for `new ImageData(...)`.
    pub fn rgba_pixels(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixels.len() / 3 * 4);
        for rgb in self.pixels.chunks_exact(3) {
            rgba.extend_from_slice(rgb);
            rgba.push(255);
        }
        rgba
    }
}

impl From<DecodedImage> for JsDecodedImage {
    fn from(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }
}

/// A crop rectangle in whole pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsCropRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

#[wasm_bindgen]
impl JsCropRect {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> i32 {
        self.height
    }
}

impl From<Rect> for JsCropRect {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Rectangle and cursor after a pointer move.
#[wasm_bindgen]
pub struct JsPointerUpdate {
    rect: JsCropRect,
    cursor: &'static str,
}

#[wasm_bindgen]
impl JsPointerUpdate {
    /// Committed rectangle, source pixels.
    #[wasm_bindgen(getter)]
    pub fn rect(&self) -> JsCropRect {
        self.rect
    }

    /// CSS cursor name for the canvas.
    #[wasm_bindgen(getter)]
    pub fn cursor(&self) -> String {
        self.cursor.to_string()
    }
}

impl From<PointerUpdate> for JsPointerUpdate {
    fn from(update: PointerUpdate) -> Self {
        Self {
            rect: update.rect.into(),
            cursor: update.cursor.css_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropkit_core::CursorHint;

    #[test]
    fn test_js_decoded_image_from_core() {
        let decoded = DecodedImage::new(200, 100, vec![0u8; 200 * 100 * 3]);
        let js_img = JsDecodedImage::from(decoded);
        assert_eq!(js_img.width(), 200);
        assert_eq!(js_img.height(), 100);
        assert_eq!(js_img.byte_length(), 60000);
    }

    #[test]
    fn test_rgba_pixels() {
        let js_img = JsDecodedImage::from(DecodedImage::new(2, 1, vec![1, 2, 3, 4, 5, 6]));
        assert_eq!(js_img.pixels(), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(js_img.rgba_pixels(), vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_crop_rect_from_core() {
        let rect = JsCropRect::from(Rect::new(10, 20, 300, 200));
        assert_eq!((rect.x(), rect.y(), rect.width(), rect.height()), (10, 20, 300, 200));
    }

    #[test]
    fn test_pointer_update_cursor_name() {
        let update = JsPointerUpdate::from(PointerUpdate {
            rect: Rect::new(0, 0, 5, 5),
            cursor: CursorHint::Move,
        });
        assert_eq!(update.cursor(), CursorHint::Move.css_name());
        assert_eq!(update.rect().width(), 5);
    }
}
