//! PhotoTweak Core - crop and rotate geometry engine
//!
//! This crate holds the geometry behind the PhotoTweak editor: a draggable
//! crop rectangle over an image that can be rotated by a dial and in
//! quarter turns, with a zoomable, pannable viewport that always keeps the
//! crop rectangle covered by image content. A commit maps the on-screen
//! state to an image-space rotation angle and crop rectangle.
//!
//! Everything is plain data and pure functions; [`EditorSession`] ties the
//! pieces together for one edit session.

pub mod config;
pub mod crop;
pub mod error;
pub mod export;
pub mod geometry;
pub mod raster;
pub mod rotation;
pub mod session;
pub mod settle;
pub mod viewport;

pub use config::EditorConfig;
pub use crop::{AspectPreset, CropRegion, HandlePosition};
pub use error::{GeometryError, Result};
pub use export::{commit, render_crop, restore, split_rotation, ExportParameters, RasterOrigin};
pub use geometry::{rotated_bounds, Point, Rect, Size, Vector2};
pub use raster::DecodedImage;
pub use rotation::RotationDial;
pub use session::{EditorSession, LayoutSnapshot, Transition};
pub use viewport::{EditorLayout, ViewportState};

/// Phase of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
}
