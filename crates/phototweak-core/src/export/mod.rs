//! Mapping between the on-screen crop state and image-space output.
//!
//! # Export Parameters
//!
//! A commit produces two values:
//!
//! - `rotation_angle`: the signed, continuous total rotation
//!   (`rotated_count * π/2 + dial_value`), clockwise on screen
//! - `crop_rect`: the crop frame in pixels of the rotated image's bounding
//!   box, top-left origin, rounded to whole pixels
//!
//! The same pair fed back into [`restore`] reproduces the crop frame up to
//! the rounding applied by [`commit`].
//!
//! # Y-Flip Invariant
//!
//! `crop_rect` always uses a top-left origin. An image collaborator whose
//! raster origin is bottom-left (y-up) must flip it against the rotated
//! image's height before cropping:
//!
//! ```text
//! rect.y = rotated_height - rect.max_y
//! ```
//!
//! [`CropPlan`] applies the flip for [`RasterOrigin::BottomLeft`]; skipping
//! it crops a vertically mirrored region.

mod render;

pub use render::{render_crop, rotate_expanded};

use crate::error::{ensure_finite, GeometryError, Result};
use crate::geometry::{normalize_angle, rotated_bounds, Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// The committed result of an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportParameters {
    /// Total rotation in radians, clockwise on screen.
    #[serde(alias = "angle")]
    pub rotation_angle: f64,
    /// Crop rectangle in rotated-image pixels, top-left origin.
    #[serde(alias = "rect")]
    pub crop_rect: Rect,
}

fn ensure_zoom(zoom_scale: f64) -> Result<f64> {
    if zoom_scale.is_finite() && zoom_scale > 0.0 {
        Ok(zoom_scale)
    } else {
        Err(GeometryError::InvalidZoom(zoom_scale))
    }
}

fn ensure_rect(rect: &Rect, what: &'static str) -> Result<()> {
    if rect.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFinite(what))
    }
}

/// Map the view-space crop frame into image pixels.
///
/// `image_origin` is the top-left of the rotated image's bounding box in
/// editor coordinates.
pub fn commit(
    crop_frame: &Rect,
    image_origin: Point,
    zoom_scale: f64,
    rotation_angle: f64,
) -> Result<ExportParameters> {
    let zoom = ensure_zoom(zoom_scale)?;
    ensure_rect(crop_frame, "crop frame")?;
    ensure_finite(image_origin.x, "image origin")?;
    ensure_finite(image_origin.y, "image origin")?;
    ensure_finite(rotation_angle, "rotation angle")?;

    let crop_rect = Rect::new(
        ((crop_frame.x - image_origin.x) / zoom).round(),
        ((crop_frame.y - image_origin.y) / zoom).round(),
        (crop_frame.width / zoom).round(),
        (crop_frame.height / zoom).round(),
    );
    log::debug!(
        "Committed crop {:?} at angle {:.4} rad (zoom {:.4})",
        crop_rect,
        rotation_angle,
        zoom
    );

    Ok(ExportParameters {
        rotation_angle,
        crop_rect,
    })
}

/// Inverse of [`commit`]'s rectangle mapping: the crop frame in editor
/// coordinates for the current image placement.
pub fn restore(params: &ExportParameters, image_origin: Point, zoom_scale: f64) -> Result<Rect> {
    let zoom = ensure_zoom(zoom_scale)?;
    ensure_rect(&params.crop_rect, "crop rect")?;
    ensure_finite(image_origin.x, "image origin")?;
    ensure_finite(image_origin.y, "image origin")?;

    let rect = &params.crop_rect;
    Ok(Rect::new(
        rect.x * zoom + image_origin.x,
        rect.y * zoom + image_origin.y,
        rect.width * zoom,
        rect.height * zoom,
    ))
}

/// Split a total rotation into quarter turns and a dial value in
/// `[-π/4, π/4)`.
///
/// The angle is first normalized into `[0, 2π)`, so the recombined rotation
/// is equivalent modulo a full turn.
pub fn split_rotation(angle: f64) -> Result<(u8, f64)> {
    let angle = normalize_angle(ensure_finite(angle, "rotation angle")?) + FRAC_PI_4;
    let quarters = (angle / FRAC_PI_2).floor();
    let dial = (angle - quarters * FRAC_PI_2) - FRAC_PI_4;
    // quarters is in 0..=4 here
    let count = (quarters as u8) % 4;
    Ok((count, dial.clamp(-FRAC_PI_4, FRAC_PI_4)))
}

/// Raster origin convention of an image-processing collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RasterOrigin {
    /// Rows run top to bottom (y-down), like the editor.
    #[default]
    TopLeft,
    /// Rows run bottom to top (y-up).
    BottomLeft,
}

/// Flip a top-left-origin rectangle into a bottom-left-origin raster of
/// `height`.
pub fn flip_rect_y(rect: &Rect, height: f64) -> Rect {
    Rect::new(rect.x, height - rect.max_y(), rect.width, rect.height)
}

/// Everything an image collaborator needs to produce the cropped output:
/// rotate the whole image, translate its bounding box to the origin, crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropPlan {
    /// Rotation to apply, clockwise on screen. A y-up collaborator applies
    /// it as a rotation by `-angle`.
    pub angle: f64,
    /// Size of the rotated image's bounding box.
    pub rotated_size: Size,
    /// Crop rectangle in the collaborator's raster convention.
    pub crop_rect: Rect,
    pub origin: RasterOrigin,
}

impl CropPlan {
    pub fn new(image_size: Size, params: &ExportParameters, origin: RasterOrigin) -> Result<Self> {
        if !image_size.is_positive() {
            return Err(GeometryError::EmptyImage {
                width: image_size.width,
                height: image_size.height,
            });
        }
        ensure_finite(params.rotation_angle, "rotation angle")?;
        ensure_rect(&params.crop_rect, "crop rect")?;

        let rotated_size = rotated_bounds(image_size, params.rotation_angle);
        let crop_rect = match origin {
            RasterOrigin::TopLeft => params.crop_rect,
            RasterOrigin::BottomLeft => flip_rect_y(&params.crop_rect, rotated_size.height),
        };
        Ok(Self {
            angle: params.rotation_angle,
            rotated_size,
            crop_rect,
            origin,
        })
    }

    /// The rotation expressed in a y-up collaborator's convention.
    pub fn y_up_rotation(&self) -> f64 {
        -self.angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_commit_scales_by_zoom() {
        let params = commit(&Rect::new(10.0, 10.0, 100.0, 50.0), Point::ZERO, 2.0, 0.0).unwrap();
        assert_eq!(params.crop_rect, Rect::new(5.0, 5.0, 50.0, 25.0));
        assert_eq!(params.rotation_angle, 0.0);
    }

    #[test]
    fn test_commit_subtracts_image_origin_and_rounds() {
        let params = commit(
            &Rect::new(30.3, 50.0, 100.4, 61.0),
            Point::new(20.0, 40.0),
            0.5,
            0.25,
        )
        .unwrap();
        // (10.3 / 0.5, 10 / 0.5, 100.4 / 0.5, 61 / 0.5) rounded
        assert_eq!(params.crop_rect, Rect::new(21.0, 20.0, 201.0, 122.0));
        assert_eq!(params.rotation_angle, 0.25);
    }

    #[test]
    fn test_commit_keeps_signed_angle() {
        let angle = 3.0 * FRAC_PI_2 - 0.3;
        let params = commit(&Rect::new(0.0, 0.0, 10.0, 10.0), Point::ZERO, 1.0, angle).unwrap();
        assert_eq!(params.rotation_angle, angle);

        let params = commit(&Rect::new(0.0, 0.0, 10.0, 10.0), Point::ZERO, 1.0, -0.3).unwrap();
        assert_eq!(params.rotation_angle, -0.3);
    }

    #[test]
    fn test_commit_rejects_bad_zoom() {
        let frame = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            commit(&frame, Point::ZERO, 0.0, 0.0),
            Err(GeometryError::InvalidZoom(0.0))
        );
        assert!(commit(&frame, Point::ZERO, f64::NAN, 0.0).is_err());
        assert!(commit(&frame, Point::ZERO, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_restore_inverts_commit() {
        let params = ExportParameters {
            rotation_angle: 0.1,
            crop_rect: Rect::new(5.0, 5.0, 50.0, 25.0),
        };
        let frame = restore(&params, Point::new(1.0, 2.0), 2.0).unwrap();
        assert_eq!(frame, Rect::new(11.0, 12.0, 100.0, 50.0));
    }

    #[test]
    fn test_split_rotation_small_angles() {
        let (count, dial) = split_rotation(0.2).unwrap();
        assert_eq!(count, 0);
        assert_close(dial, 0.2);

        let (count, dial) = split_rotation(-0.2).unwrap();
        assert_eq!(count, 0);
        assert_close(dial, -0.2);
    }

    #[test]
    fn test_split_rotation_quarter_turns() {
        let (count, dial) = split_rotation(FRAC_PI_2 + 0.1).unwrap();
        assert_eq!(count, 1);
        assert_close(dial, 0.1);

        let (count, dial) = split_rotation(3.0 * FRAC_PI_2 - 0.3).unwrap();
        assert_eq!(count, 3);
        assert_close(dial, -0.3);

        let (count, dial) = split_rotation(-FRAC_PI_2).unwrap();
        assert_eq!(count, 3);
        assert_close(dial, 0.0);

        let (count, _) = split_rotation(PI).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_split_rotation_rejects_nan() {
        assert!(split_rotation(f64::NAN).is_err());
    }

    #[test]
    fn test_flip_rect_y() {
        let flipped = flip_rect_y(&Rect::new(10.0, 20.0, 30.0, 40.0), 100.0);
        assert_eq!(flipped, Rect::new(10.0, 40.0, 30.0, 40.0));
        // Flipping twice is the identity
        assert_eq!(
            flip_rect_y(&flipped, 100.0),
            Rect::new(10.0, 20.0, 30.0, 40.0)
        );
    }

    #[test]
    fn test_crop_plan_flips_for_bottom_left() {
        let params = ExportParameters {
            rotation_angle: FRAC_PI_2,
            crop_rect: Rect::new(10.0, 0.0, 50.0, 60.0),
        };
        let image = Size::new(200.0, 100.0);

        let top = CropPlan::new(image, &params, RasterOrigin::TopLeft).unwrap();
        assert_eq!(top.rotated_size, Size::new(100.0, 200.0));
        assert_eq!(top.crop_rect, params.crop_rect);

        let bottom = CropPlan::new(image, &params, RasterOrigin::BottomLeft).unwrap();
        // 200 - (0 + 60)
        assert_eq!(bottom.crop_rect, Rect::new(10.0, 140.0, 50.0, 60.0));
        assert_eq!(bottom.y_up_rotation(), -FRAC_PI_2);
    }

    #[test]
    fn test_crop_plan_rejects_empty_image() {
        let params = ExportParameters {
            rotation_angle: 0.0,
            crop_rect: Rect::new(0.0, 0.0, 1.0, 1.0),
        };
        assert!(CropPlan::new(Size::new(0.0, 0.0), &params, RasterOrigin::TopLeft).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: restore(commit(frame)) reproduces the frame within the
        /// pixel rounding of commit.
        #[test]
        fn prop_commit_restore_round_trip(
            (x, y) in (-500.0f64..500.0, -500.0f64..500.0),
            (w, h) in (60.0f64..400.0, 60.0f64..400.0),
            (ox, oy) in (-800.0f64..200.0, -800.0f64..200.0),
            min_zoom in 0.01f64..2.0,
            zoom_factor in 1.0f64..4.0,
            angle in -FRAC_PI_4..FRAC_PI_4,
        ) {
            let zoom = min_zoom * zoom_factor;
            let frame = Rect::new(x, y, w, h);
            let origin = Point::new(ox, oy);

            let params = commit(&frame, origin, zoom, angle).unwrap();
            let back = restore(&params, origin, zoom).unwrap();

            let tol = 0.5 * zoom + 1e-6 * (1.0 + x.abs() + y.abs() + ox.abs() + oy.abs());
            prop_assert!((back.x - frame.x).abs() <= tol);
            prop_assert!((back.y - frame.y).abs() <= tol);
            prop_assert!((back.width - frame.width).abs() <= tol);
            prop_assert!((back.height - frame.height).abs() <= tol);
            prop_assert_eq!(params.rotation_angle, angle);
        }

        /// Property: split rotation recombines to the same direction.
        #[test]
        fn prop_split_rotation_recombines(angle in -20.0f64..20.0) {
            let (count, dial) = split_rotation(angle).unwrap();
            prop_assert!(count < 4);
            prop_assert!((-FRAC_PI_4..=FRAC_PI_4).contains(&dial));
            let total = f64::from(count) * FRAC_PI_2 + dial;
            prop_assert!((total.sin() - angle.sin()).abs() < 1e-9);
            prop_assert!((total.cos() - angle.cos()).abs() < 1e-9);
        }
    }
}
