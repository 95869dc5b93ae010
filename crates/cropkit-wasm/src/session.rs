//! Crop session WASM bindings.
//!
//! `JsCropSession` is the UI-event adapter: the page forwards canvas pointer
//! events, key presses and control changes to it and repaints from the
//! rectangle and cursor it returns.
//!
//! # Example
//!
//! ```typescript
//! import { JsCropSession } from '@cropkit/wasm';
//!
//! const session = new JsCropSession({ hot_zone_size: 60 });
//! session.set_canvas_size(canvas.width, canvas.height);
//! session.load_image(new Uint8Array(await file.arrayBuffer()));
//!
//! canvas.onpointerdown = (e) => session.pointer_down(e.offsetX, e.offsetY, e.shiftKey, e.ctrlKey);
//! canvas.onpointermove = (e) => { canvas.style.cursor = session.pointer_move(e.offsetX, e.offsetY).cursor; };
//! canvas.onpointerup = () => session.pointer_up();
//! ```

use cropkit_core::decode::SourceImage;
use cropkit_core::{
    backend, CropConfig, CropError, CropRatio, CropSession, Handle, ImageTransform, Modifiers,
    Point, PreviewCache, PreviewSizes, RatioIndicator, RatioPreset, Rect,
};
use wasm_bindgen::prelude::*;

use crate::types::{JsCropRect, JsDecodedImage, JsPointerUpdate};

/// Interactive crop session for one canvas.
#[wasm_bindgen]
pub struct JsCropSession {
    inner: CropSession,
    source: Option<SourceImage>,
    image_id: u64,
    previews: PreviewSizes,
    cache: PreviewCache,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Create a session. `config` is an optional partial `CropConfig` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropSession, JsValue> {
        let config: CropConfig = if config.is_undefined() || config.is_null() {
            CropConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        Self::with_config(config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Decode image bytes (JPEG, PNG or GIF) and reset the rectangle.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<JsCropRect, JsValue> {
        let source = backend::decode_image(bytes).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.load_source(source)
            .map(JsCropRect::from)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> Result<JsCropRect, JsValue> {
        self.inner
            .set_canvas_size(width, height)
            .map(JsCropRect::from)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Press at canvas coordinates. Returns the grabbed handle's name, if any.
    pub fn pointer_down(&mut self, x: f64, y: f64, shift: bool, ctrl: bool) -> Option<String> {
        self.inner
            .on_pointer_down(Point::new(x, y), Modifiers { shift, ctrl })
            .map(|handle| handle_name(handle).to_string())
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> JsPointerUpdate {
        self.inner.on_pointer_move(Point::new(x, y)).into()
    }

    pub fn pointer_up(&mut self) -> JsCropRect {
        self.inner.on_pointer_up().into()
    }

    /// Arrow-key nudge by whole source pixels.
    pub fn nudge(&mut self, dx: i32, dy: i32) -> JsCropRect {
        self.inner.nudge(dx, dy).into()
    }

    /// Select a ratio preset by name: `square`, `free`, `16:10`, `16:9`, `21:9`.
    pub fn select_preset(&mut self, name: &str) -> Result<JsCropRect, JsValue> {
        let preset = RatioPreset::from_name(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown ratio preset: {name}")))?;
        Ok(self.inner.select_preset(preset).into())
    }

    /// Lock to `width:height`, or unlock when either is zero.
    pub fn set_ratio(&mut self, width: u32, height: u32) -> Result<JsCropRect, JsValue> {
        let policy = if width == 0 || height == 0 {
            CropRatio::Unlocked
        } else {
            CropRatio::locked(width, height).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        self.inner
            .set_ratio_policy(policy)
            .map(JsCropRect::from)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Set rotation from the UI slider, whose positive direction is clockwise.
    pub fn set_rotation(&mut self, slider: f64) -> JsCropRect {
        self.update_transform(|t| t.rotation = -slider)
    }

    pub fn set_flip_horizontal(&mut self, enabled: bool) -> JsCropRect {
        self.update_transform(|t| t.flip_horizontal = enabled)
    }

    pub fn set_flip_vertical(&mut self, enabled: bool) -> JsCropRect {
        self.update_transform(|t| t.flip_vertical = enabled)
    }

    pub fn set_grayscale(&mut self, enabled: bool) -> JsCropRect {
        self.update_transform(|t| t.grayscale = enabled)
    }

    pub fn set_sharpen(&mut self, enabled: bool) -> JsCropRect {
        self.update_transform(|t| t.sharpen = enabled)
    }

    pub fn set_crop_enabled(&mut self, enabled: bool) -> JsCropRect {
        self.inner.set_crop_enabled(enabled).into()
    }

    /// Committed rectangle, source pixels.
    #[wasm_bindgen(getter)]
    pub fn rect(&self) -> JsCropRect {
        self.inner.rect().into()
    }

    /// Rectangle to draw, canvas pixels.
    #[wasm_bindgen(getter)]
    pub fn canvas_rect(&self) -> JsCropRect {
        let display = self.inner.display_transform();
        display.to_canvas_rect(self.inner.display_rect()).into()
    }

    /// Where and how large to draw the image, canvas pixels.
    #[wasm_bindgen(getter)]
    pub fn image_rect(&self) -> JsCropRect {
        let display = self.inner.display_transform();
        display
            .to_canvas_rect(Rect::new(
                0,
                0,
                display.display_width as i32,
                display.display_height as i32,
            ))
            .into()
    }

    #[wasm_bindgen(getter)]
    pub fn revision(&self) -> u64 {
        self.inner.revision()
    }

    /// `snapped`, `exact` or `plain`.
    #[wasm_bindgen(getter)]
    pub fn ratio_indicator(&self) -> String {
        indicator_name(self.inner.ratio_indicator()).to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    /// Preview thumbnails of the current crop, largest first.
    pub fn previews(&mut self, high_quality: bool) -> Result<Vec<JsDecodedImage>, JsValue> {
        self.render_previews(high_quality)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn preview_sizes(&self) -> Vec<u32> {
        self.previews.as_slice().to_vec()
    }

    pub fn add_preview_size(&mut self, size: u32) -> bool {
        self.previews.add(size)
    }

    pub fn remove_preview_size(&mut self, size: u32) -> bool {
        self.previews.remove(size)
    }

    pub fn reset_preview_sizes(&mut self) {
        self.previews.reset();
    }
}

impl JsCropSession {
    pub(crate) fn with_config(config: CropConfig) -> Result<Self, CropError> {
        let previews = PreviewSizes::new(&config.preview_sizes);
        Ok(Self {
            inner: CropSession::new(config)?,
            source: None,
            image_id: 0,
            previews,
            cache: PreviewCache::new(),
        })
    }

    pub(crate) fn load_source(&mut self, source: SourceImage) -> Result<Rect, CropError> {
        let (width, height) = source.dimensions();
        let rect = self.inner.set_image_bounds(width, height)?;
        self.source = Some(source);
        self.image_id += 1;
        self.cache.clear();
        Ok(rect)
    }

    pub(crate) fn session(&self) -> &CropSession {
        &self.inner
    }

    pub(crate) fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    fn update_transform(&mut self, edit: impl FnOnce(&mut ImageTransform)) -> JsCropRect {
        let mut transform = self.inner.transform();
        edit(&mut transform);
        self.inner.set_transform(transform).into()
    }

    fn render_previews(&mut self, high_quality: bool) -> Result<Vec<JsDecodedImage>, backend::BackendError> {
        let source = self.source.as_ref().ok_or(CropError::NoImage)?;
        let previews = backend::render_previews(
            &mut self.cache,
            source,
            self.image_id,
            &self.inner,
            &self.previews,
            high_quality,
        )?;
        Ok(previews.into_iter().map(JsDecodedImage::from).collect())
    }
}

fn handle_name(handle: Handle) -> &'static str {
    match handle {
        Handle::Center => "center",
        Handle::TopLeft => "top-left",
        Handle::TopRight => "top-right",
        Handle::BottomLeft => "bottom-left",
        Handle::BottomRight => "bottom-right",
    }
}

fn indicator_name(indicator: RatioIndicator) -> &'static str {
    match indicator {
        RatioIndicator::Snapped => "snapped",
        RatioIndicator::Exact => "exact",
        RatioIndicator::Plain => "plain",
    }
}
