//! Crop rectangle model: handle classification, drag state machine, aspect
//! ratio presets and overlay geometry.
//!
//! # Coordinate System
//!
//! - Frames are in editor (view) coordinates, y-down
//! - Touch locations passed to [`CropRegion::begin_drag`] are local to the
//!   crop rectangle: (0, 0) is its top-left corner

mod aspect;
mod handle;
mod overlay;
mod region;

pub use aspect::{fit_ratio, matches_ratio, validate_ratio, AspectPreset};
pub use handle::{hits_edge_band, HandlePosition};
pub use overlay::{mask_rects, GuideLines};
pub use region::{location_delta, CropRegion};

use crate::geometry::Rect;

/// Build a validator that accepts only frames inside `bounds`.
///
/// Suitable as a session's `can_change_to` hook to keep the crop frame within
/// the editor's content area.
pub fn contained_in(bounds: Rect) -> impl Fn(&Rect) -> bool {
    move |candidate| bounds.contains_rect(candidate, 1e-9)
}
