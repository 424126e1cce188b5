//! Viewport (scroll/zoom) state and the coverage invariant.
//!
//! The viewport is a rotated window onto the zoomed image. Its bounds are the
//! axis-aligned bounding box of the crop frame rotated into the image's
//! frame, and it always shares its center with the crop frame. As long as the
//! viewport lies inside the zoomed image, the crop frame is fully covered by
//! image content on screen.
//!
//! # Coordinate Spaces
//!
//! - **Editor**: y-down view coordinates shared with the crop frame
//! - **Content**: the zoomed, unrotated image; `(0, 0)` is the image's
//!   top-left corner and one unit is `1 / zoom_scale` image pixels
//!
//! ```text
//! content = R(-angle) * (editor - center) + visible_center
//! editor  = R(angle) * (content - visible_center) + center
//! ```

use crate::config::EditorConfig;
use crate::crop::CropRegion;
use crate::error::{GeometryError, Result};
use crate::geometry::{rotate_vector, rotated_bounds, Point, Rect, Size, Vector2};
use serde::{Deserialize, Serialize};

/// Static editor metrics derived once per session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditorLayout {
    /// Editor view size.
    pub bounds: Size,
    /// Largest area the crop frame may occupy when settled.
    pub max_content: Size,
    /// Canonical center of the crop frame.
    pub origin_center: Point,
    /// The image fitted into `max_content`: the initial crop size.
    pub origin_size: Size,
}

impl EditorLayout {
    /// Fit an image of `image_size` into an editor of `bounds`.
    pub fn new(image_size: Size, bounds: Size, config: &EditorConfig) -> Result<Self> {
        if !image_size.is_positive() {
            return Err(GeometryError::EmptyImage {
                width: image_size.width,
                height: image_size.height,
            });
        }
        let max_content = Size::new(
            config.max_content_ratio.dx * bounds.width,
            config.max_content_ratio.dy * bounds.height - config.header_height,
        );
        if !max_content.is_positive() {
            return Err(GeometryError::EditorTooSmall {
                width: bounds.width,
                height: bounds.height,
            });
        }

        let scale = (image_size.width / max_content.width)
            .max(image_size.height / max_content.height);
        let origin_size = Size::new(image_size.width / scale, image_size.height / scale);
        let origin_center = Point::new(
            bounds.width / 2.0,
            max_content.height / 2.0 + config.header_height,
        );

        Ok(Self {
            bounds,
            max_content,
            origin_center,
            origin_size,
        })
    }

    /// The initial crop frame: the fitted image on the canonical center.
    pub fn origin_frame(&self) -> Rect {
        Rect::from_center_size(self.origin_center, self.origin_size)
    }
}

/// Clamp a content offset so a viewport of `viewport` stays inside `content`.
///
/// When the content is smaller than the viewport on an axis the offset pins
/// to zero.
pub fn clamp_content_offset(offset: Point, viewport: Size, content: Size) -> Point {
    Point::new(
        offset.x.min(content.width - viewport.width).max(0.0),
        offset.y.min(content.height - viewport.height).max(0.0),
    )
}

/// Scale and re-center `crop` so it fills `max_crop` on the canonical center.
///
/// Returns the settled frame and the factor the frame was divided by.
pub fn settle_frame(crop: &Rect, max_crop: Size, origin_center: Point) -> (Rect, f64) {
    let scale = (crop.width / max_crop.width).max(crop.height / max_crop.height);
    let size = Size::new(crop.width / scale, crop.height / scale);
    (Rect::from_center_size(origin_center, size), scale)
}

/// The scroll/zoom state. Recomputed by [`ViewportState::resize`] after every
/// change to the crop frame or rotation.
///
/// Invariants: `zoom_scale >= min_zoom_scale`, and the visible rectangle
/// `content_offset + bounds_size` lies within `content_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Native image size in pixels.
    pub image_size: Size,
    /// Viewport center in editor coordinates.
    pub center: Point,
    /// Viewport size in its own (rotated) frame.
    pub bounds_size: Size,
    /// Rotation of the viewport relative to the editor.
    pub transform_angle: f64,
    /// Top-left of the visible region in content coordinates.
    pub content_offset: Point,
    pub zoom_scale: f64,
    pub min_zoom_scale: f64,
    pub max_zoom_scale: f64,
}

impl ViewportState {
    /// A viewport showing the whole image inside `frame`.
    pub fn new(image_size: Size, frame: Rect, max_zoom_scale: f64) -> Result<Self> {
        if !image_size.is_positive() {
            return Err(GeometryError::EmptyImage {
                width: image_size.width,
                height: image_size.height,
            });
        }
        if !max_zoom_scale.is_finite() || max_zoom_scale <= 0.0 {
            return Err(GeometryError::InvalidZoom(max_zoom_scale));
        }
        let min_zoom = (frame.width / image_size.width).max(frame.height / image_size.height);
        if !min_zoom.is_finite() || min_zoom <= 0.0 {
            return Err(GeometryError::InvalidZoom(min_zoom));
        }

        Ok(Self {
            image_size,
            center: frame.center(),
            bounds_size: frame.size(),
            transform_angle: 0.0,
            content_offset: Point::ZERO,
            zoom_scale: min_zoom,
            min_zoom_scale: min_zoom,
            max_zoom_scale,
        })
    }

    /// The zoomed image size.
    pub fn content_size(&self) -> Size {
        self.image_size * self.zoom_scale
    }

    /// Zoom ceiling; never below the coverage minimum.
    pub fn effective_max_zoom(&self) -> f64 {
        self.max_zoom_scale.max(self.min_zoom_scale)
    }

    /// Center of the visible region in content coordinates.
    pub fn visible_center(&self) -> Point {
        self.content_offset + self.bounds_size.half()
    }

    /// The visible region in content coordinates.
    pub fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(self.content_offset, self.bounds_size)
    }

    pub fn editor_to_content(&self, point: Point) -> Point {
        self.visible_center() + rotate_vector(point - self.center, -self.transform_angle)
    }

    pub fn content_to_editor(&self, point: Point) -> Point {
        self.center + rotate_vector(point - self.visible_center(), self.transform_angle)
    }

    /// Axis-aligned bounding box of the rotated, zoomed image in editor
    /// coordinates.
    pub fn image_frame_in_editor(&self) -> Rect {
        let content = Rect::from_origin_size(Point::ZERO, self.content_size());
        let corners = content.corners().map(|c| self.content_to_editor(c));
        Rect::bounding(&corners)
    }

    /// Keep the visible region inside the content.
    pub fn clamp_content_offset(&mut self) {
        self.content_offset =
            clamp_content_offset(self.content_offset, self.bounds_size, self.content_size());
    }

    /// Change zoom keeping the content under the visible center in place.
    /// No clamping.
    fn zoom_about_visible_center(&mut self, zoom: f64) {
        let factor = zoom / self.zoom_scale;
        let center = self.visible_center();
        let center = Point::new(center.x * factor, center.y * factor);
        self.zoom_scale = zoom;
        self.content_offset = center - self.bounds_size.half();
    }

    /// Re-fit the viewport around `crop` at `rotation` so the crop frame is
    /// fully covered by image content.
    ///
    /// 1. The viewport takes the rotated bounding box of the crop frame.
    /// 2. It re-centers on the crop frame, keeping the visible content center.
    /// 3. Zoom snaps up to the coverage minimum if it fell below; otherwise,
    ///    with `keep_content_local`, the pan shifts so the content that was
    ///    under the crop center stays there.
    /// 4. The offset is clamped into the content.
    ///
    /// Idempotent for unchanged inputs.
    pub fn resize(&mut self, crop: &Rect, rotation: f64, keep_content_local: bool) {
        self.transform_angle = rotation;
        let bounds = rotated_bounds(crop.size(), rotation);

        // Crop center relative to the viewport center, in content axes,
        // measured before the viewport moves.
        let center_delta = rotate_vector(crop.center() - self.center, -rotation);

        let old_bounds = self.bounds_size;
        self.bounds_size = bounds;
        self.center = crop.center();
        self.content_offset = self.content_offset
            + Vector2::new(
                (old_bounds.width - bounds.width) / 2.0,
                (old_bounds.height - bounds.height) / 2.0,
            );

        self.min_zoom_scale = (bounds.width / self.image_size.width)
            .max(bounds.height / self.image_size.height);
        if self.zoom_scale < self.min_zoom_scale {
            self.zoom_about_visible_center(self.min_zoom_scale);
        } else if keep_content_local {
            self.content_offset = self.content_offset + center_delta;
        }

        self.clamp_content_offset();
    }

    /// Settle the crop frame into the canonical position and size, scaling
    /// zoom by the same factor so the framed content is unchanged, then
    /// re-fit with [`ViewportState::resize`].
    pub fn relocate(&mut self, crop: &mut CropRegion, layout: &EditorLayout, rotation: f64) {
        let (frame, scale) = settle_frame(&crop.frame(), layout.max_content, layout.origin_center);
        crop.set_frame(frame);

        let ceiling = self.effective_max_zoom();
        // Lift the coverage minimum; resize recomputes it below.
        self.min_zoom_scale = 0.0;
        let zoom = (self.zoom_scale / scale).min(ceiling);
        self.zoom_about_visible_center(zoom);

        self.resize(&crop.frame(), rotation, false);
        log::debug!(
            "Relocated crop frame to {:.1}x{:.1} (scale {:.3}, zoom {:.4})",
            frame.width,
            frame.height,
            scale,
            self.zoom_scale
        );
    }

    /// User pinch zoom, clamped to `[min, effective max]`.
    pub fn set_zoom_scale(&mut self, zoom: f64) -> Result<()> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(GeometryError::InvalidZoom(zoom));
        }
        let zoom = zoom.max(self.min_zoom_scale).min(self.effective_max_zoom());
        self.zoom_about_visible_center(zoom);
        self.clamp_content_offset();
        Ok(())
    }

    /// User pan by a finger movement in editor coordinates. The content
    /// follows the finger.
    pub fn pan_by(&mut self, editor_delta: Vector2) -> Result<()> {
        if !editor_delta.dx.is_finite() || !editor_delta.dy.is_finite() {
            return Err(GeometryError::NonFinite("pan delta"));
        }
        let delta = rotate_vector(editor_delta, -self.transform_angle);
        self.content_offset = self.content_offset - delta;
        self.clamp_content_offset();
        Ok(())
    }

    /// Whether every corner of `crop` maps inside the content.
    pub fn covers(&self, crop: &Rect, tolerance: f64) -> bool {
        let content = Rect::from_origin_size(Point::ZERO, self.content_size());
        crop.corners().iter().all(|&c| {
            let p = self.editor_to_content(c);
            p.x >= -tolerance
                && p.y >= -tolerance
                && p.x <= content.width + tolerance
                && p.y <= content.height + tolerance
        })
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
