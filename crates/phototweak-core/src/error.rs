//! Error types for the geometry engine.

use thiserror::Error;

/// Precondition violations rejected at input validation.
///
/// Clamping never produces an error: sizes, zoom scales and offsets saturate
/// into range. These variants only cover inputs that would otherwise turn
/// into NaN or infinity further down the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The source image has a zero dimension.
    #[error("Image dimensions must be positive, got {width}x{height}")]
    EmptyImage { width: f64, height: f64 },

    /// An aspect ratio with a zero, negative or non-finite component.
    #[error("Invalid aspect ratio {dx}:{dy}")]
    DegenerateRatio { dx: f64, dy: f64 },

    /// A zoom scale that is not strictly positive and finite.
    #[error("Invalid zoom scale: {0}")]
    InvalidZoom(f64),

    /// A NaN or infinite coordinate or angle.
    #[error("Non-finite value for {0}")]
    NonFinite(&'static str),

    /// The editor bounds leave no room for content.
    #[error("Editor bounds {width}x{height} leave no content area")]
    EditorTooSmall { width: f64, height: f64 },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Pixel buffer length does not match the declared dimensions.
    #[error("Pixel buffer of {actual} bytes does not match {width}x{height} RGB")]
    InvalidPixelBuffer { width: u32, height: u32, actual: usize },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Reject NaN and infinities, naming the offending input.
#[inline]
pub(crate) fn ensure_finite(value: f64, what: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::NonFinite(what))
    }
}
