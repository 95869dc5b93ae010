//! Export WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { export_crop } from '@cropkit/wasm';
//!
//! const result = export_crop(session, { constraint: { max: 500 }, format: 'jpeg', keep_exif: true });
//! const blob = new Blob([result.bytes()], { type: result.mime_type });
//! link.download = result.file_name(file.name);
//! ```

use std::path::Path;

use cropkit_core::backend::{self, BackendError, ExportOutput};
use cropkit_core::export::{export_dimensions, file_stem, plan_output_path, SIZE_PRESETS};
use cropkit_core::{CropError, ExportSettings, SizeConstraint};
use wasm_bindgen::prelude::*;

use crate::session::JsCropSession;

/// An encoded export.
#[wasm_bindgen]
pub struct JsExportResult {
    inner: ExportOutput,
}

#[wasm_bindgen]
impl JsExportResult {
    /// Encoded file contents.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.format.mime_type().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn cropped(&self) -> bool {
        self.inner.cropped
    }

    #[wasm_bindgen(getter)]
    pub fn scaled(&self) -> bool {
        self.inner.scaled
    }

    /// Download name for an image loaded from `source_name`, e.g.
    /// `cat.png` becomes `cat-cropped-scaled.jpg`.
    pub fn file_name(&self, source_name: &str) -> String {
        plan_output_path(
            Path::new(""),
            &file_stem(Path::new(source_name)),
            self.inner.cropped,
            self.inner.scaled,
            self.inner.format,
            |_| false,
        )
        .to_string_lossy()
        .into_owned()
    }
}

/// Export the session's image. `settings` is an optional `ExportSettings` object.
#[wasm_bindgen]
pub fn export_crop(session: &JsCropSession, settings: JsValue) -> Result<JsExportResult, JsValue> {
    let settings: ExportSettings = if settings.is_undefined() || settings.is_null() {
        ExportSettings::default()
    } else {
        serde_wasm_bindgen::from_value(settings).map_err(|e| JsValue::from_str(&e.to_string()))?
    };
    export_with(session, &settings)
        .map(|inner| JsExportResult { inner })
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Size the export would have with a `max_edge` limit (0 = none), as `[w, h]`.
///
/// Used for the size label next to the crop rectangle.
#[wasm_bindgen]
pub fn export_size(session: &JsCropSession, max_edge: u32) -> Result<Vec<u32>, JsValue> {
    let (width, height) =
        planned_size(session, max_edge).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(vec![width, height])
}

/// Longest-edge limits offered next to "no limit" and a custom value.
#[wasm_bindgen]
pub fn size_presets() -> Vec<u32> {
    SIZE_PRESETS.to_vec()
}

pub(crate) fn planned_size(
    session: &JsCropSession,
    max_edge: u32,
) -> Result<(u32, u32), CropError> {
    let constraint = SizeConstraint::from_max_edge(max_edge)?;
    let core = session.session();
    let (width, height) = match core.export_region() {
        Some(rect) => (rect.width.max(1) as u32, rect.height.max(1) as u32),
        None => core.source_size().unwrap_or((0, 0)),
    };
    Ok(export_dimensions(width, height, constraint))
}

pub(crate) fn export_with(
    session: &JsCropSession,
    settings: &ExportSettings,
) -> Result<ExportOutput, BackendError> {
    let source = session.source().ok_or(CropError::NoImage)?;
    backend::export_image(source, session.session(), settings)
}
