//! Drag zones of the crop rectangle.

use crate::geometry::{Point, Size};
use serde::{Deserialize, Serialize};

/// Which part of the crop rectangle a drag grabbed.
///
/// The zone is derived once, when the gesture begins, from where the touch
/// landed relative to a band of `activity_border_width` inside each edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlePosition {
    TopLeft,
    Top,
    TopRight,
    Left,
    /// Interior of the rectangle. Inert: it neither moves nor resizes.
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl HandlePosition {
    /// Classify a touch given in the crop rectangle's local coordinates.
    ///
    /// The left band is tested first, then the right band, so on a rectangle
    /// narrower than two bands the left handles win.
    pub fn classify(touch: Point, bounds: Size, activity_border_width: f64) -> Self {
        let top = touch.y < activity_border_width;
        let bottom = touch.y > bounds.height - activity_border_width;

        if touch.x < activity_border_width {
            return if top {
                HandlePosition::TopLeft
            } else if bottom {
                HandlePosition::BottomLeft
            } else {
                HandlePosition::Left
            };
        }
        if touch.x > bounds.width - activity_border_width {
            return if top {
                HandlePosition::TopRight
            } else if bottom {
                HandlePosition::BottomRight
            } else {
                HandlePosition::Right
            };
        }
        if top {
            HandlePosition::Top
        } else if bottom {
            HandlePosition::Bottom
        } else {
            HandlePosition::Center
        }
    }

    pub fn moves_left_edge(self) -> bool {
        matches!(
            self,
            HandlePosition::TopLeft | HandlePosition::Left | HandlePosition::BottomLeft
        )
    }

    pub fn moves_right_edge(self) -> bool {
        matches!(
            self,
            HandlePosition::TopRight | HandlePosition::Right | HandlePosition::BottomRight
        )
    }

    pub fn moves_top_edge(self) -> bool {
        matches!(
            self,
            HandlePosition::TopLeft | HandlePosition::Top | HandlePosition::TopRight
        )
    }

    pub fn moves_bottom_edge(self) -> bool {
        matches!(
            self,
            HandlePosition::BottomLeft | HandlePosition::Bottom | HandlePosition::BottomRight
        )
    }

    /// True for every zone that resizes the rectangle.
    pub fn is_active(self) -> bool {
        self != HandlePosition::Center
    }
}

/// A touch lands inside the crop rectangle's hit area only on its edge bands;
/// interior touches fall through to the viewport (pan/zoom).
pub fn hits_edge_band(touch: Point, bounds: Size, activity_border_width: f64) -> bool {
    touch.x < activity_border_width
        || touch.x > bounds.width - activity_border_width
        || touch.y < activity_border_width
        || touch.y > bounds.height - activity_border_width
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Size = Size::new(200.0, 100.0);
    const BORDER: f64 = 30.0;

    fn classify(x: f64, y: f64) -> HandlePosition {
        HandlePosition::classify(Point::new(x, y), BOUNDS, BORDER)
    }

    #[test]
    fn test_classify_all_nine_zones() {
        assert_eq!(classify(5.0, 5.0), HandlePosition::TopLeft);
        assert_eq!(classify(100.0, 5.0), HandlePosition::Top);
        assert_eq!(classify(195.0, 5.0), HandlePosition::TopRight);
        assert_eq!(classify(5.0, 50.0), HandlePosition::Left);
        assert_eq!(classify(100.0, 50.0), HandlePosition::Center);
        assert_eq!(classify(195.0, 50.0), HandlePosition::Right);
        assert_eq!(classify(5.0, 95.0), HandlePosition::BottomLeft);
        assert_eq!(classify(100.0, 95.0), HandlePosition::Bottom);
        assert_eq!(classify(195.0, 95.0), HandlePosition::BottomRight);
    }

    #[test]
    fn test_classify_band_edges_are_exclusive() {
        // Exactly on the band boundary is not inside the band
        assert_eq!(classify(30.0, 50.0), HandlePosition::Center);
        assert_eq!(classify(170.0, 50.0), HandlePosition::Center);
        assert_eq!(classify(29.999, 50.0), HandlePosition::Left);
    }

    #[test]
    fn test_classify_outside_rectangle() {
        // Touches slightly outside still map to the nearest handle
        assert_eq!(classify(-10.0, -10.0), HandlePosition::TopLeft);
        assert_eq!(classify(250.0, 150.0), HandlePosition::BottomRight);
    }

    #[test]
    fn test_narrow_rectangle_prefers_left() {
        let narrow = Size::new(40.0, 200.0);
        let h = HandlePosition::classify(Point::new(20.0, 100.0), narrow, BORDER);
        assert_eq!(h, HandlePosition::Left);
    }

    #[test]
    fn test_edge_predicates() {
        assert!(HandlePosition::TopLeft.moves_left_edge());
        assert!(HandlePosition::TopLeft.moves_top_edge());
        assert!(!HandlePosition::TopLeft.moves_right_edge());
        assert!(!HandlePosition::Top.moves_left_edge());
        assert!(HandlePosition::BottomRight.moves_bottom_edge());
        assert!(!HandlePosition::Center.is_active());
        assert!(HandlePosition::Bottom.is_active());
    }

    #[test]
    fn test_hits_edge_band() {
        assert!(hits_edge_band(Point::new(5.0, 50.0), BOUNDS, BORDER));
        assert!(!hits_edge_band(Point::new(100.0, 50.0), BOUNDS, BORDER));
    }
}
