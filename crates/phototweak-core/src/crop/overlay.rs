//! Overlay geometry drawn around and inside the crop frame.

use crate::config::MAX_GUIDE_LINES;
use crate::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};

/// The four dimming rectangles that cover everything outside the crop frame.
///
/// They tile the editor like a pinwheel: top strip (left part), left strip,
/// bottom strip, right strip. Widths and heights saturate at zero when the
/// frame extends past the editor bounds.
pub fn mask_rects(bounds: Size, crop: &Rect) -> [Rect; 4] {
    let nonneg = |v: f64| v.max(0.0);
    [
        Rect::new(0.0, 0.0, nonneg(crop.max_x()), nonneg(crop.min_y())),
        Rect::new(
            0.0,
            crop.min_y(),
            nonneg(crop.min_x()),
            nonneg(bounds.height - crop.min_y()),
        ),
        Rect::new(
            crop.min_x(),
            crop.max_y(),
            nonneg(bounds.width - crop.min_x()),
            nonneg(bounds.height - crop.max_y()),
        ),
        Rect::new(
            crop.max_x(),
            0.0,
            nonneg(bounds.width - crop.max_x()),
            nonneg(crop.max_y()),
        ),
    ]
}

/// Evenly spaced guide line positions inside the crop frame, in editor
/// coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideLines {
    /// Y positions of the horizontal lines.
    pub horizontal: Vec<f64>,
    /// X positions of the vertical lines.
    pub vertical: Vec<f64>,
}

impl GuideLines {
    /// `count` lines per axis dividing the frame into `count + 1` bands.
    /// Counts above [`MAX_GUIDE_LINES`] are capped.
    pub fn for_frame(crop: &Rect, count: u32) -> Self {
        let count = count.min(MAX_GUIDE_LINES);
        let step_y = crop.height / f64::from(count + 1);
        let step_x = crop.width / f64::from(count + 1);
        Self {
            horizontal: (1..=count)
                .map(|i| crop.min_y() + step_y * f64::from(i))
                .collect(),
            vertical: (1..=count)
                .map(|i| crop.min_x() + step_x * f64::from(i))
                .collect(),
        }
    }
}
