//! Crop rectangle model and its handle-drag state machine.
//!
//! # Drag Lifecycle
//!
//! 1. [`CropRegion::begin_drag`] classifies the touch into a
//!    [`HandlePosition`]. The classification is fixed for the whole gesture.
//! 2. [`CropRegion::drag_candidate`] turns each movement delta into a
//!    candidate frame without touching state.
//! 3. The owner authorizes the candidate and calls [`CropRegion::accept`], or
//!    drops it, leaving the region unchanged.
//! 4. [`CropRegion::end_drag`] clears the handle and reports whether a drag
//!    was in progress so the owner can schedule deferred work.

use super::handle::HandlePosition;
use crate::geometry::{Point, Rect, Size, Vector2};
use serde::{Deserialize, Serialize};

/// The crop rectangle and its minimum side length.
///
/// Invariant: `frame.width >= min_side` and `frame.height >= min_side` after
/// every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    frame: Rect,
    min_side: f64,
    #[serde(skip)]
    handle: Option<HandlePosition>,
}

impl CropRegion {
    /// Create a region, growing `frame` about its center if it is below the
    /// minimum side.
    pub fn new(frame: Rect, min_side: f64) -> Self {
        Self {
            frame: enforce_min_side(frame, min_side),
            min_side,
            handle: None,
        }
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn min_side(&self) -> f64 {
        self.min_side
    }

    /// The handle grabbed by the current gesture, if any.
    pub fn active_handle(&self) -> Option<HandlePosition> {
        self.handle
    }

    pub fn is_dragging(&self) -> bool {
        self.handle.is_some()
    }

    /// Replace the frame programmatically (presets, quarter turns, settle).
    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = enforce_min_side(frame, self.min_side);
    }

    /// Change the minimum side, growing the frame if needed.
    pub fn set_min_side(&mut self, min_side: f64) {
        self.min_side = min_side;
        self.frame = enforce_min_side(self.frame, min_side);
    }

    /// Start a gesture. `touch` is in the rectangle's local coordinates and
    /// `view_bounds` is its local size.
    pub fn begin_drag(
        &mut self,
        touch: Point,
        view_bounds: Size,
        activity_border_width: f64,
    ) -> HandlePosition {
        let handle = HandlePosition::classify(touch, view_bounds, activity_border_width);
        self.handle = Some(handle);
        handle
    }

    /// Candidate frame for a movement of `delta` since the last update.
    ///
    /// Returns `None` when no gesture is active or the gesture began in the
    /// inert center zone.
    pub fn drag_candidate(&self, delta: Vector2) -> Option<Rect> {
        match self.handle {
            Some(handle) if handle.is_active() => Some(Self::update_drag(
                handle,
                delta,
                self.frame,
                self.min_side,
            )),
            _ => None,
        }
    }

    /// Commit an authorized candidate.
    pub fn accept(&mut self, candidate: Rect) {
        self.set_frame(candidate);
    }

    /// Finish the gesture. Returns true if a gesture was in progress.
    pub fn end_drag(&mut self) -> bool {
        self.handle.take().is_some()
    }

    /// Apply `delta` to the edges selected by `handle`.
    ///
    /// The edge opposite the dragged one never moves: the delta itself is
    /// clamped so the size stops at `min_side`. Pure; callers decide whether
    /// to keep the result.
    pub fn update_drag(handle: HandlePosition, delta: Vector2, current: Rect, min_side: f64) -> Rect {
        let mut frame = current;

        if handle.moves_left_edge() {
            let right = current.max_x();
            frame.width = (current.width - delta.dx).max(min_side);
            frame.x = right - frame.width;
        } else if handle.moves_right_edge() {
            frame.width = (current.width + delta.dx).max(min_side);
        }

        if handle.moves_top_edge() {
            let bottom = current.max_y();
            frame.height = (current.height - delta.dy).max(min_side);
            frame.y = bottom - frame.height;
        } else if handle.moves_bottom_edge() {
            frame.height = (current.height + delta.dy).max(min_side);
        }

        frame
    }
}

/// Grow `frame` about its center until both sides reach `min_side`.
fn enforce_min_side(frame: Rect, min_side: f64) -> Rect {
    if frame.width >= min_side && frame.height >= min_side {
        return frame;
    }
    frame.with_size_about_center(Size::new(
        frame.width.max(min_side),
        frame.height.max(min_side),
    ))
}

/// Convert a touch location in the crop rectangle's local coordinates into
/// the per-edge delta the dragged handle should move by: left/top edges move
/// to the touch, right/bottom edges follow it from the far side.
pub fn location_delta(handle: HandlePosition, location: Point, size: Size) -> Vector2 {
    let dx = if handle.moves_left_edge() {
        location.x
    } else if handle.moves_right_edge() {
        location.x - size.width
    } else {
        0.0
    };
    let dy = if handle.moves_top_edge() {
        location.y
    } else if handle.moves_bottom_edge() {
        location.y - size.height
    } else {
        0.0
    };
    Vector2::new(dx, dy)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
