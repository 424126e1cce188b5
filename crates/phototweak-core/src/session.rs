//! One edit session: the crop frame, the dial, the quarter-turn count and
//! the viewport, kept consistent with each other.
//!
//! Every method that changes the crop frame or the rotation re-fits the
//! viewport before returning, so a [`LayoutSnapshot`] taken at any point
//! satisfies the coverage invariant: the crop frame shows image content
//! only.
//!
//! Animations are left to the host. Methods that would animate return a
//! snapshot tagged [`Transition::Animated`] holding the target state.

use crate::config::EditorConfig;
use crate::crop::{
    fit_ratio, hits_edge_band, location_delta, mask_rects, matches_ratio, validate_ratio,
    AspectPreset, CropRegion, GuideLines, HandlePosition,
};
use crate::error::{ensure_finite, Result};
use crate::export::{self, split_rotation, ExportParameters};
use crate::geometry::{total_rotation, Point, Rect, Size, Vector2};
use crate::rotation::RotationDial;
use crate::settle::SettleTimer;
use crate::viewport::{EditorLayout, ViewportState};
use crate::GesturePhase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the host should move from the previous layout to a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Transition {
    #[default]
    Immediate,
    Animated,
}

/// Everything a host needs to draw the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub crop_frame: Rect,
    pub viewport: ViewportState,
    /// Bounding box of the rotated, zoomed image in editor coordinates.
    pub image_frame: Rect,
    /// Total rotation in radians, clockwise on screen.
    pub rotation: f64,
    pub rotated_count: u8,
    pub dial_value: f64,
    /// The dial is hidden while the crop frame is being dragged and until it
    /// settles.
    pub dial_visible: bool,
    pub masks: [Rect; 4],
    pub guides: GuideLines,
    pub transition: Transition,
}

/// Authorization hook for crop drags. Returning false drops the candidate.
pub type CanChangeTo = Box<dyn Fn(&Rect) -> bool>;

pub struct EditorSession {
    config: EditorConfig,
    layout: EditorLayout,
    crop: CropRegion,
    dial: RotationDial,
    viewport: ViewportState,
    rotated_count: u8,
    settle: SettleTimer,
    dial_visible: bool,
    can_change_to: Option<CanChangeTo>,
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("layout", &self.layout)
            .field("crop", &self.crop)
            .field("dial", &self.dial)
            .field("viewport", &self.viewport)
            .field("rotated_count", &self.rotated_count)
            .field("settle", &self.settle)
            .field("dial_visible", &self.dial_visible)
            .field("can_change_to", &self.can_change_to.is_some())
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Start a session for an image of `image_size` in an editor of
    /// `bounds`. The whole image is shown, fitted into the content area.
    pub fn new(image_size: Size, bounds: Size, config: EditorConfig) -> Result<Self> {
        config.validate()?;
        let layout = EditorLayout::new(image_size, bounds, &config)?;
        let crop = CropRegion::new(layout.origin_frame(), config.min_side_length);
        let viewport = ViewportState::new(image_size, crop.frame(), config.max_zoom_scale)?;
        let dial = RotationDial::new(config.rotation_limit())
            .with_calibration(config.dial_calibration_px)
            .with_continuous(config.dial_continuous);

        log::debug!(
            "New session: image {}x{}, editor {}x{}, crop {:?}",
            image_size.width,
            image_size.height,
            bounds.width,
            bounds.height,
            crop.frame()
        );

        Ok(Self {
            settle: SettleTimer::new(config.settle_delay_ms),
            config,
            layout,
            crop,
            dial,
            viewport,
            rotated_count: 0,
            dial_visible: true,
            can_change_to: None,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn editor_layout(&self) -> &EditorLayout {
        &self.layout
    }

    pub fn crop_frame(&self) -> Rect {
        self.crop.frame()
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn dial(&self) -> &RotationDial {
        &self.dial
    }

    pub fn rotated_count(&self) -> u8 {
        self.rotated_count
    }

    pub fn dial_visible(&self) -> bool {
        self.dial_visible
    }

    pub fn settle_pending(&self) -> bool {
        self.settle.is_pending()
    }

    /// Total rotation: quarter turns plus the dial value.
    pub fn rotation(&self) -> f64 {
        total_rotation(self.rotated_count, self.dial.value())
    }

    /// Install a hook consulted before every crop drag update.
    pub fn set_can_change_to<F>(&mut self, hook: F)
    where
        F: Fn(&Rect) -> bool + 'static,
    {
        self.can_change_to = Some(Box::new(hook));
    }

    pub fn clear_can_change_to(&mut self) {
        self.can_change_to = None;
    }

    pub fn layout_snapshot(&self) -> LayoutSnapshot {
        self.snapshot(Transition::Immediate)
    }

    fn snapshot(&self, transition: Transition) -> LayoutSnapshot {
        let frame = self.crop.frame();
        LayoutSnapshot {
            crop_frame: frame,
            viewport: self.viewport.clone(),
            image_frame: self.viewport.image_frame_in_editor(),
            rotation: self.rotation(),
            rotated_count: self.rotated_count,
            dial_value: self.dial.value(),
            dial_visible: self.dial_visible,
            masks: mask_rects(self.layout.bounds, &frame),
            guides: GuideLines::for_frame(&frame, self.config.guide_line_count),
            transition,
        }
    }

    fn refit(&mut self, keep_content_local: bool) {
        let rotation = self.rotation();
        self.viewport
            .resize(&self.crop.frame(), rotation, keep_content_local);
    }

    fn relocate(&mut self) {
        let rotation = self.rotation();
        self.viewport
            .relocate(&mut self.crop, &self.layout, rotation);
    }

    // ------------------------------------------------------------------
    // Crop drags
    // ------------------------------------------------------------------

    fn crop_local(&self, point: Point, what: &'static str) -> Result<Point> {
        let frame = self.crop.frame();
        Ok(Point::new(
            ensure_finite(point.x, what)? - frame.x,
            ensure_finite(point.y, what)? - frame.y,
        ))
    }

    /// Whether `point` (editor coordinates) lands on the crop frame's edge
    /// bands. Interior touches belong to the viewport.
    pub fn hits_crop_edge(&self, point: Point) -> Result<bool> {
        let local = self.crop_local(point, "crop touch point")?;
        Ok(hits_edge_band(
            local,
            self.crop.frame().size(),
            self.config.activity_border_width,
        ))
    }

    /// Start a crop gesture at `point` in editor coordinates.
    pub fn begin_crop_drag(&mut self, point: Point) -> Result<HandlePosition> {
        let local = self.crop_local(point, "crop drag point")?;
        let size = self.crop.frame().size();
        let handle = self
            .crop
            .begin_drag(local, size, self.config.activity_border_width);
        if handle.is_active() {
            self.settle.cancel();
            self.dial_visible = false;
        }
        Ok(handle)
    }

    /// Move the grabbed handle by `delta`. Returns the new layout, or `None`
    /// if no handle is grabbed or the hook rejected the candidate.
    pub fn update_crop_drag(&mut self, delta: Vector2) -> Result<Option<LayoutSnapshot>> {
        ensure_finite(delta.dx, "crop drag delta")?;
        ensure_finite(delta.dy, "crop drag delta")?;
        let Some(candidate) = self.crop.drag_candidate(delta) else {
            return Ok(None);
        };
        if let Some(hook) = &self.can_change_to {
            if !hook(&candidate) {
                log::trace!("Crop candidate {:?} rejected", candidate);
                return Ok(None);
            }
        }
        self.crop.accept(candidate);
        self.settle.cancel();
        self.refit(true);
        Ok(Some(self.snapshot(Transition::Immediate)))
    }

    /// Move the grabbed handle so the edges it controls follow the touch at
    /// `location` (editor coordinates) rather than a relative delta.
    pub fn drag_crop_to(&mut self, location: Point) -> Result<Option<LayoutSnapshot>> {
        let local = self.crop_local(location, "crop drag point")?;
        let Some(handle) = self.crop.active_handle() else {
            return Ok(None);
        };
        let delta = location_delta(handle, local, self.crop.frame().size());
        self.update_crop_drag(delta)
    }

    /// Finish the crop gesture. Schedules the settle when a handle was
    /// dragged; returns whether it did.
    pub fn end_crop_drag(&mut self, now_ms: f64) -> bool {
        let was_active = self.crop.active_handle().is_some_and(HandlePosition::is_active);
        if !self.crop.end_drag() || !was_active {
            return false;
        }
        self.settle.schedule(now_ms);
        true
    }

    // ------------------------------------------------------------------
    // Rotation
    // ------------------------------------------------------------------

    /// Route a dial drag. `None` when the dial ignores this phase.
    pub fn dial_drag(&mut self, phase: GesturePhase, drag_dx: f64) -> Option<LayoutSnapshot> {
        let change = self.dial.drag(phase, drag_dx)?;
        self.refit(false);
        Some(self.snapshot(if change.animated {
            Transition::Animated
        } else {
            Transition::Immediate
        }))
    }

    pub fn set_dial_value(&mut self, angle: f64, animated: bool) -> LayoutSnapshot {
        self.dial.set_value(angle, animated);
        self.refit(false);
        self.snapshot(if animated {
            Transition::Animated
        } else {
            Transition::Immediate
        })
    }

    /// Replace the dial range. The value is re-clamped and the viewport
    /// re-fitted when it moves.
    pub fn set_dial_range(&mut self, min: f64, max: f64) -> Result<Option<LayoutSnapshot>> {
        if self.dial.set_range(min, max)?.is_none() {
            return Ok(None);
        }
        self.refit(false);
        Ok(Some(self.snapshot(Transition::Immediate)))
    }

    /// Turn the image a quarter turn counter-clockwise. The crop frame swaps
    /// its sides about its center and settles.
    pub fn rotate_90(&mut self) -> LayoutSnapshot {
        self.rotated_count = (self.rotated_count + 3) % 4;
        let frame = self.crop.frame();
        self.crop
            .set_frame(frame.with_size_about_center(frame.size().transposed()));
        self.refit(true);
        self.relocate();
        log::debug!("Rotated to {} quarter turns", self.rotated_count);
        self.snapshot(Transition::Animated)
    }

    // ------------------------------------------------------------------
    // Aspect ratio
    // ------------------------------------------------------------------

    /// Apply a ratio to the crop frame. Applying the ratio the frame already
    /// has swaps its orientation instead.
    pub fn set_crop_ratio(&mut self, ratio: Vector2) -> Result<LayoutSnapshot> {
        let ratio = validate_ratio(ratio)?;
        let frame = self.crop.frame();
        self.settle.cancel();

        if matches_ratio(&frame, ratio, self.config.ratio_tolerance) {
            self.crop
                .set_frame(frame.with_size_about_center(frame.size().transposed()));
            self.refit(true);
        } else {
            let size = fit_ratio(ratio, self.layout.max_content);
            self.crop.set_frame(frame.with_size_about_center(size));
            self.refit(false);
        }
        self.relocate();
        Ok(self.snapshot(Transition::Animated))
    }

    /// Apply a preset, oriented to the image as currently displayed.
    pub fn set_aspect_preset(&mut self, preset: AspectPreset) -> Result<LayoutSnapshot> {
        let displayed = if self.rotated_count % 2 == 1 {
            self.viewport.image_size.transposed()
        } else {
            self.viewport.image_size
        };
        let ratio = preset.ratio_for(displayed)?;
        self.set_crop_ratio(ratio)
    }

    // ------------------------------------------------------------------
    // Pan, zoom and settle
    // ------------------------------------------------------------------

    /// User pan. Re-arms a pending settle.
    pub fn pan_by(&mut self, delta: Vector2, now_ms: f64) -> Result<LayoutSnapshot> {
        self.viewport.pan_by(delta)?;
        self.settle.reschedule_if_pending(now_ms);
        Ok(self.snapshot(Transition::Immediate))
    }

    /// User pinch zoom. Re-arms a pending settle.
    pub fn zoom_to(&mut self, zoom_scale: f64, now_ms: f64) -> Result<LayoutSnapshot> {
        self.viewport.set_zoom_scale(zoom_scale)?;
        self.settle.reschedule_if_pending(now_ms);
        Ok(self.snapshot(Transition::Immediate))
    }

    /// Drive the settle timer. Returns the settled layout when it fires.
    pub fn tick(&mut self, now_ms: f64) -> Option<LayoutSnapshot> {
        if !self.settle.poll(now_ms) {
            return None;
        }
        self.relocate();
        self.dial_visible = true;
        log::debug!("Crop frame settled at {:?}", self.crop.frame());
        Some(self.snapshot(Transition::Animated))
    }

    /// Return to the initial state: no rotation, the whole image in the
    /// canonical frame at minimum zoom.
    pub fn reset(&mut self) -> Result<LayoutSnapshot> {
        self.rotated_count = 0;
        self.settle.cancel();
        self.dial.set_value(0.0, true);
        self.crop.set_frame(self.layout.origin_frame());
        self.refit(false);
        self.relocate();
        self.viewport
            .set_zoom_scale(self.viewport.min_zoom_scale)?;
        self.refit(false);
        self.dial_visible = true;
        log::debug!("Session reset");
        Ok(self.snapshot(Transition::Animated))
    }

    // ------------------------------------------------------------------
    // Commit and restore
    // ------------------------------------------------------------------

    /// Map the current crop frame into image pixels.
    pub fn commit(&self) -> Result<ExportParameters> {
        export::commit(
            &self.crop.frame(),
            self.viewport.image_frame_in_editor().origin(),
            self.viewport.zoom_scale,
            self.rotation(),
        )
    }

    /// Resume from previously committed parameters.
    pub fn restore(&mut self, params: &ExportParameters) -> Result<LayoutSnapshot> {
        let (count, dial_value) = split_rotation(params.rotation_angle)?;
        self.settle.cancel();
        self.rotated_count = count;
        let change = self.dial.set_value(dial_value, false);
        if (change.value - dial_value).abs() > f64::EPSILON {
            log::warn!(
                "Restored dial value {:.4} clamped to {:.4}",
                dial_value,
                change.value
            );
        }
        self.refit(false);

        let frame = export::restore(
            params,
            self.viewport.image_frame_in_editor().origin(),
            self.viewport.zoom_scale,
        )?;
        self.crop.set_frame(frame);
        self.refit(true);
        self.relocate();
        self.dial_visible = true;
        log::debug!("Restored {:?}", params);
        Ok(self.snapshot(Transition::Immediate))
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
