//! PhotoTweak WASM - WebAssembly bindings for the crop editor
//!
//! This crate exposes the phototweak-core session and crop renderer to
//! JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `session` - `JsEditorSession`, the interactive crop/rotate state
//! - `transform` - Applying committed parameters to pixels
//! - `types` - WASM-compatible wrapper types for image data
//! - `logging` - Console backend for the core's log output
//!
//! # Usage
//!
//! ```typescript
//! import init, { init_logging, JsEditorSession, crop_image } from '@phototweak/wasm';
//!
//! await init();
//! init_logging('info');
//!
//! const session = new JsEditorSession(image.width, image.height, 400, 800);
//! session.dial_drag('changed', -20);
//! const output = crop_image(image, session.commit());
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod logging;
mod session;
mod transform;
mod types;

pub use logging::init_logging;
pub use session::JsEditorSession;
pub use transform::{crop_image, crop_plan, rotate_image};
pub use types::JsDecodedImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Logging stays off until init_logging is called
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Labels of the aspect ratio presets, in menu order.
#[wasm_bindgen]
pub fn aspect_preset_labels() -> Vec<String> {
    phototweak_core::AspectPreset::ALL
        .iter()
        .map(|preset| preset.label().to_string())
        .collect()
}

pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize result: {}", e)))
}

pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue, context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("{}: {}", context, e)))
}
