//! WASM-compatible wrapper types for image data.

use phototweak_core::{DecodedImage, GeometryError};
use wasm_bindgen::prelude::*;

/// An RGB image passed between JavaScript and the crop renderer.
///
/// The pixel data lives in WASM memory; `pixels()` copies it out as a
/// `Uint8Array`.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Create an image from dimensions and RGB pixel data (3 bytes per
    /// pixel, row-major).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory. Optional; the finalizer also does it.
    pub fn free(self) {}
}

impl JsDecodedImage {
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Convert to a core image, validating the buffer length. Clones the
    /// pixel data.
    pub(crate) fn to_decoded(&self) -> Result<DecodedImage, GeometryError> {
        DecodedImage::new(self.width, self.height, self.pixels.clone())
    }
}
