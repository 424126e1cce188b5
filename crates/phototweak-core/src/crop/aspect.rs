//! Aspect ratio presets for the crop frame.

use crate::error::{GeometryError, Result};
use crate::geometry::{Rect, Size, Vector2};
use serde::{Deserialize, Serialize};

/// The fixed preset table offered by the ratio menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectPreset {
    /// The source image's own proportions.
    #[default]
    Original,
    Square,
    Ratio3x2,
    Ratio5x3,
    Ratio4x3,
    Ratio5x4,
    Ratio7x5,
    Ratio16x9,
}

impl AspectPreset {
    /// Menu order.
    pub const ALL: [AspectPreset; 8] = [
        AspectPreset::Original,
        AspectPreset::Square,
        AspectPreset::Ratio3x2,
        AspectPreset::Ratio5x3,
        AspectPreset::Ratio4x3,
        AspectPreset::Ratio5x4,
        AspectPreset::Ratio7x5,
        AspectPreset::Ratio16x9,
    ];

    /// Preset at a menu index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Landscape `(numerator, denominator)`, or `None` for [`AspectPreset::Original`].
    pub fn landscape_ratio(self) -> Option<(f64, f64)> {
        match self {
            AspectPreset::Original => None,
            AspectPreset::Square => Some((1.0, 1.0)),
            AspectPreset::Ratio3x2 => Some((3.0, 2.0)),
            AspectPreset::Ratio5x3 => Some((5.0, 3.0)),
            AspectPreset::Ratio4x3 => Some((4.0, 3.0)),
            AspectPreset::Ratio5x4 => Some((5.0, 4.0)),
            AspectPreset::Ratio7x5 => Some((7.0, 5.0)),
            AspectPreset::Ratio16x9 => Some((16.0, 9.0)),
        }
    }

    /// The ratio to apply for an image of `image_size`.
    ///
    /// Presets follow the image's orientation: on a portrait image every
    /// fixed ratio is transposed. `Original` is already oriented.
    pub fn ratio_for(self, image_size: Size) -> Result<Vector2> {
        if !image_size.is_positive() {
            return Err(GeometryError::EmptyImage {
                width: image_size.width,
                height: image_size.height,
            });
        }
        let ratio = match self.landscape_ratio() {
            None => Vector2::new(image_size.width, image_size.height),
            Some((dx, dy)) if image_size.height > image_size.width => Vector2::new(dy, dx),
            Some((dx, dy)) => Vector2::new(dx, dy),
        };
        validate_ratio(ratio)
    }

    pub fn label(self) -> &'static str {
        match self {
            AspectPreset::Original => "original",
            AspectPreset::Square => "1:1",
            AspectPreset::Ratio3x2 => "3:2",
            AspectPreset::Ratio5x3 => "5:3",
            AspectPreset::Ratio4x3 => "4:3",
            AspectPreset::Ratio5x4 => "5:4",
            AspectPreset::Ratio7x5 => "7:5",
            AspectPreset::Ratio16x9 => "16:9",
        }
    }
}

/// Reject ratios that would divide by zero or produce NaN.
pub fn validate_ratio(ratio: Vector2) -> Result<Vector2> {
    let ok = |v: f64| v.is_finite() && v > 0.0;
    if ok(ratio.dx) && ok(ratio.dy) {
        Ok(ratio)
    } else {
        Err(GeometryError::DegenerateRatio {
            dx: ratio.dx,
            dy: ratio.dy,
        })
    }
}

/// Whether `frame` already has `ratio`'s proportions.
pub fn matches_ratio(frame: &Rect, ratio: Vector2, tolerance: f64) -> bool {
    if frame.height <= 0.0 {
        return false;
    }
    (ratio.dx / ratio.dy - frame.width / frame.height).abs() < tolerance
}

/// Largest size with `ratio` that fits inside `max`.
pub fn fit_ratio(ratio: Vector2, max: Size) -> Size {
    let scale = (max.width / ratio.dx).min(max.height / ratio.dy);
    Size::new(ratio.dx * scale, ratio.dy * scale)
}
