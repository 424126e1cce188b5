//! Geometric value types and stateless trigonometric helpers.
//!
//! # Coordinate System
//!
//! All view-space geometry uses a y-down coordinate system with the origin at
//! the top-left corner of the editor. Angles are in radians; a positive angle
//! rotates clockwise on screen.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::{Add, Mul, Sub};

/// Sines/cosines smaller than this are snapped to exact zero so that quarter
/// turns swap dimensions without floating point residue.
const QUARTER_TURN_EPSILON: f64 = 1e-12;

/// A point in editor or content coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add<Vector2> for Point {
    type Output = Point;

    fn add(self, rhs: Vector2) -> Point {
        Point::new(self.x + rhs.dx, self.y + rhs.dy)
    }
}

impl Sub<Vector2> for Point {
    type Output = Point;

    fn sub(self, rhs: Vector2) -> Point {
        Point::new(self.x - rhs.dx, self.y - rhs.dy)
    }
}

impl Sub for Point {
    type Output = Vector2;

    fn sub(self, rhs: Point) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Swap width and height (a quarter turn of the frame).
    pub fn transposed(self) -> Self {
        Self::new(self.height, self.width)
    }

    /// True when both dimensions are strictly positive and finite.
    pub fn is_positive(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Half extents as a vector from the center to the bottom-right corner.
    pub fn half(self) -> Vector2 {
        Vector2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Mul<f64> for Size {
    type Output = Size;

    fn mul(self, rhs: f64) -> Size {
        Size::new(self.width * rhs, self.height * rhs)
    }
}

/// A displacement or a ratio (`dx:dy`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub dx: f64,
    pub dy: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.dx - rhs.dx, self.dy - rhs.dy)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Vector2;

    fn mul(self, rhs: f64) -> Vector2 {
        Vector2::new(self.dx * rhs, self.dy * rhs)
    }
}

/// An axis-aligned rectangle. Width and height are never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn from_center_size(center: Point, size: Size) -> Self {
        Self::from_origin_size(center - size.half(), size)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// Same size, moved so its center sits on `center`.
    pub fn with_center(&self, center: Point) -> Self {
        Self::from_center_size(center, self.size())
    }

    /// Same center, new size.
    pub fn with_size_about_center(&self, size: Size) -> Self {
        Self::from_center_size(self.center(), size)
    }

    /// Whether `other` lies entirely inside this rectangle, allowing `tolerance`
    /// of slack on every edge.
    pub fn contains_rect(&self, other: &Rect, tolerance: f64) -> bool {
        other.min_x() >= self.min_x() - tolerance
            && other.min_y() >= self.min_y() - tolerance
            && other.max_x() <= self.max_x() + tolerance
            && other.max_y() <= self.max_y() + tolerance
    }

    /// The four corners, clockwise from the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x(), self.min_y()),
            Point::new(self.max_x(), self.min_y()),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.min_x(), self.max_y()),
        ]
    }

    /// Smallest rectangle containing every point.
    pub fn bounding(points: &[Point]) -> Self {
        let mut min = Point::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        if points.is_empty() {
            return Rect::default();
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Sine and cosine with quarter-turn residue removed.
#[inline]
fn sin_cos(angle: f64) -> (f64, f64) {
    let (mut sin, mut cos) = angle.sin_cos();
    if sin.abs() < QUARTER_TURN_EPSILON {
        sin = 0.0;
        cos = cos.signum();
    } else if cos.abs() < QUARTER_TURN_EPSILON {
        cos = 0.0;
        sin = sin.signum();
    }
    (sin, cos)
}

/// Compute the axis-aligned bounding box of a rectangle rotated by `angle`.
///
/// ```text
/// w' = |cos a| * w + |sin a| * h
/// h' = |sin a| * w + |cos a| * h
/// ```
///
/// Quarter turns swap the dimensions exactly.
pub fn rotated_bounds(size: Size, angle: f64) -> Size {
    let (sin, cos) = sin_cos(angle);
    let (sin, cos) = (sin.abs(), cos.abs());
    Size::new(
        cos * size.width + sin * size.height,
        sin * size.width + cos * size.height,
    )
}

/// Normalize an angle into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Clamp `value` into `[lo, hi]`. When the range is inverted, `lo` wins.
#[inline]
pub fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.min(hi).max(lo)
}

/// Rotate a vector by `angle` in the y-down system (clockwise on screen).
pub fn rotate_vector(v: Vector2, angle: f64) -> Vector2 {
    let (sin, cos) = sin_cos(angle);
    Vector2::new(v.dx * cos - v.dy * sin, v.dx * sin + v.dy * cos)
}

/// Total rotation from discrete quarter turns plus the dial's continuous value.
#[inline]
pub fn total_rotation(rotated_count: u8, dial_value: f64) -> f64 {
    f64::from(rotated_count) * FRAC_PI_2 + dial_value
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: rotated bounds repeat every full turn.
        #[test]
        fn prop_rotated_bounds_periodic(
            w in 1.0f64..2000.0,
            h in 1.0f64..2000.0,
            angle in -10.0f64..10.0,
        ) {
            let a = rotated_bounds(Size::new(w, h), angle);
            let b = rotated_bounds(Size::new(w, h), angle + TAU);
            let tol = 1e-9 * (w + h);
            prop_assert!((a.width - b.width).abs() <= tol);
            prop_assert!((a.height - b.height).abs() <= tol);
        }

        /// Property: the bounding box always contains the original rectangle.
        #[test]
        fn prop_rotated_bounds_never_shrinks_area(
            w in 1.0f64..2000.0,
            h in 1.0f64..2000.0,
            angle in -10.0f64..10.0,
        ) {
            let b = rotated_bounds(Size::new(w, h), angle);
            prop_assert!(b.width * b.height >= w * h * (1.0 - 1e-9));
        }

        /// Property: normalized angles land in [0, 2π) and keep their direction.
        #[test]
        fn prop_normalize_angle_range(angle in -100.0f64..100.0) {
            let n = normalize_angle(angle);
            prop_assert!((0.0..TAU).contains(&n));
            prop_assert!((n.sin() - angle.sin()).abs() < 1e-9);
            prop_assert!((n.cos() - angle.cos()).abs() < 1e-9);
        }

        /// Property: rotation preserves vector length.
        #[test]
        fn prop_rotate_vector_preserves_length(
            dx in -500.0f64..500.0,
            dy in -500.0f64..500.0,
            angle in -10.0f64..10.0,
        ) {
            let v = rotate_vector(Vector2::new(dx, dy), angle);
            let before = (dx * dx + dy * dy).sqrt();
            let after = (v.dx * v.dx + v.dy * v.dy).sqrt();
            prop_assert!((before - after).abs() < 1e-9 * (1.0 + before));
        }
    }
}
