//! Reference renderer: rotate the full image onto an expanded canvas, then
//! crop it with a set of [`ExportParameters`].
//!
//! Quarter turns are exact pixel permutations via `image::imageops`. Other
//! angles use inverse mapping with bilinear sampling at pixel centers:
//!
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + src_cx
//! src_y = -dx * sin(θ) + dy * cos(θ) + src_cy
//! ```
//!
//! where `(dx, dy)` is the destination pixel center relative to the canvas
//! center and θ is clockwise on screen.

use super::{CropPlan, ExportParameters, RasterOrigin};
use crate::error::{GeometryError, Result};
use crate::geometry::{normalize_angle, rotated_bounds};
use crate::raster::DecodedImage;
use image::imageops;
use std::f64::consts::{FRAC_PI_2, PI};

const QUARTER_TURN_EPSILON: f64 = 1e-9;

/// Rotate `image` clockwise by `angle` radians onto a canvas sized to the
/// rotated bounding box. Uncovered pixels are black.
pub fn rotate_expanded(image: &DecodedImage, angle: f64) -> Result<DecodedImage> {
    if !angle.is_finite() {
        return Err(GeometryError::NonFinite("rotation angle"));
    }
    // Fields are public, so a zero-sized buffer can bypass DecodedImage::new
    if image.width == 0 || image.height == 0 {
        return Err(GeometryError::EmptyImage {
            width: f64::from(image.width),
            height: f64::from(image.height),
        });
    }
    let turn = normalize_angle(angle);
    let near = |target: f64| (turn - target).abs() < QUARTER_TURN_EPSILON;

    if near(0.0) || near(2.0 * PI) {
        return Ok(image.clone());
    }
    if near(FRAC_PI_2) {
        return Ok(DecodedImage::from_rgb_image(imageops::rotate90(
            &image.to_rgb_image()?,
        )));
    }
    if near(PI) {
        return Ok(DecodedImage::from_rgb_image(imageops::rotate180(
            &image.to_rgb_image()?,
        )));
    }
    if near(3.0 * FRAC_PI_2) {
        return Ok(DecodedImage::from_rgb_image(imageops::rotate270(
            &image.to_rgb_image()?,
        )));
    }

    let bounds = rotated_bounds(image.size(), angle);
    let dst_w = (bounds.width.round() as u32).max(1);
    let dst_h = (bounds.height.round() as u32).max(1);

    let (sin, cos) = angle.sin_cos();
    let src_cx = f64::from(image.width) / 2.0;
    let src_cy = f64::from(image.height) / 2.0;
    let dst_cx = f64::from(dst_w) / 2.0;
    let dst_cy = f64::from(dst_h) / 2.0;

    let mut output = vec![0u8; dst_w as usize * dst_h as usize * 3];
    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = f64::from(dst_x) + 0.5 - dst_cx;
            let dy = f64::from(dst_y) + 0.5 - dst_cy;

            let src_x = dx * cos + dy * sin + src_cx - 0.5;
            let src_y = -dx * sin + dy * cos + src_cy - 0.5;

            let idx = (dst_y as usize * dst_w as usize + dst_x as usize) * 3;
            output[idx..idx + 3].copy_from_slice(&sample_bilinear(image, src_x, src_y));
        }
    }

    DecodedImage::new(dst_w, dst_h, output)
}

/// Produce the cropped output for `params`: rotate, then crop the rotated
/// bounding box. The crop rectangle is clipped to the canvas.
pub fn render_crop(image: &DecodedImage, params: &ExportParameters) -> Result<DecodedImage> {
    let plan = CropPlan::new(image.size(), params, RasterOrigin::TopLeft)?;
    let rotated = rotate_expanded(image, plan.angle)?;

    let rect = plan.crop_rect;
    let (w, h) = (f64::from(rotated.width), f64::from(rotated.height));
    let x0 = rect.min_x().round().clamp(0.0, w);
    let y0 = rect.min_y().round().clamp(0.0, h);
    let x1 = rect.max_x().round().clamp(0.0, w);
    let y1 = rect.max_y().round().clamp(0.0, h);
    if x1 <= x0 || y1 <= y0 {
        return Err(GeometryError::EmptyImage {
            width: x1 - x0,
            height: y1 - y0,
        });
    }

    let canvas = rotated.to_rgb_image()?;
    let cropped = imageops::crop_imm(
        &canvas,
        x0 as u32,
        y0 as u32,
        (x1 - x0) as u32,
        (y1 - y0) as u32,
    )
    .to_image();

    log::debug!(
        "Rendered crop {}x{} from {}x{} rotated canvas",
        cropped.width(),
        cropped.height(),
        rotated.width,
        rotated.height
    );
    Ok(DecodedImage::from_rgb_image(cropped))
}

#[inline]
fn pixel_f64(image: &DecodedImage, x: u32, y: u32) -> [f64; 3] {
    image.pixel(x, y).map(f64::from)
}

/// Bilinear sample; black outside the image.
fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    let max_x = f64::from(image.width) - 1.0;
    let max_y = f64::from(image.height) - 1.0;
    // Half a pixel of slack keeps the outermost pixels from turning black
    if x < -0.5 || y < -0.5 || x > max_x + 0.5 || y > max_y + 0.5 {
        return [0, 0, 0];
    }
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(image.width - 1);
    let y1 = (y0 + 1).min(image.height - 1);
    let fx = x - f64::from(x0);
    let fy = y - f64::from(y0);

    let p00 = pixel_f64(image, x0, y0);
    let p10 = pixel_f64(image, x1, y0);
    let p01 = pixel_f64(image, x0, y1);
    let p11 = pixel_f64(image, x1, y1);

    let mut result = [0u8; 3];
    for i in 0..3 {
        let v = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    result
}
