//! Cropkit WASM - WebAssembly bindings for Cropkit
//!
//! This crate provides WASM bindings to expose the cropkit-core crop session
//! and export pipeline to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `session` - Crop session driven by canvas pointer events
//! - `export` - Export encoding and output naming
//! - `types` - WASM-compatible wrapper types for rectangles and images
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession, export_crop } from '@cropkit/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new JsCropSession();
//! session.load_image(new Uint8Array(await file.arrayBuffer()));
//! const result = export_crop(session);
//! ```

use wasm_bindgen::prelude::*;

mod export;
mod session;
mod types;

// Re-export public types
pub use export::{export_crop, export_size, size_presets, JsExportResult};
pub use session::JsCropSession;
pub use types::{JsCropRect, JsDecodedImage, JsPointerUpdate};

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
