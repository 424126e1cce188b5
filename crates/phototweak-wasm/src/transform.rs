//! WASM bindings for applying committed crop parameters to pixels.

use crate::types::JsDecodedImage;
use crate::{from_js, to_js};
use phototweak_core::export::{rotate_expanded, CropPlan};
use phototweak_core::{render_crop, ExportParameters, RasterOrigin, Size};
use wasm_bindgen::prelude::*;

/// Rotate and crop an image with parameters from `JsEditorSession.commit()`.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const params = session.commit();
/// const output = crop_image(sourceImage, params);
/// ```
#[wasm_bindgen]
pub fn crop_image(image: &JsDecodedImage, params: JsValue) -> Result<JsDecodedImage, JsValue> {
    let params: ExportParameters = from_js(params, "Invalid export parameters")?;
    let src = image
        .to_decoded()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let result = render_crop(&src, &params).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(JsDecodedImage::from_decoded(result))
}

/// Rotate an image clockwise by `angle_radians` onto an expanded canvas.
#[wasm_bindgen]
pub fn rotate_image(image: &JsDecodedImage, angle_radians: f64) -> Result<JsDecodedImage, JsValue> {
    let src = image
        .to_decoded()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let result = rotate_expanded(&src, angle_radians).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(JsDecodedImage::from_decoded(result))
}

/// Crop plan for hosts that rotate and crop with their own pixel pipeline
/// (canvas, GPU). Set `bottom_left_origin` when the host's raster rows run
/// bottom to top; the returned rectangle is then already flipped.
#[wasm_bindgen]
pub fn crop_plan(
    image_width: f64,
    image_height: f64,
    params: JsValue,
    bottom_left_origin: bool,
) -> Result<JsValue, JsValue> {
    let params: ExportParameters = from_js(params, "Invalid export parameters")?;
    let origin = if bottom_left_origin {
        RasterOrigin::BottomLeft
    } else {
        RasterOrigin::TopLeft
    };
    let plan = CropPlan::new(Size::new(image_width, image_height), &params, origin)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&plan)
}
