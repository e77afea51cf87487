//! Geometric primitives: Point, Size, Rect.
//!
//! Coordinates are `f64` because physical (HiMetric) values for a large
//! digitizer run into the hundreds of thousands and flick metrics are
//! accumulated over many samples.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A 2D point with x and y coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Origin point (0, 0)
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate Euclidean distance to another point.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }

    /// Angle of the vector from `self` to `other`, in radians.
    #[must_use]
    pub fn angle_to(&self, other: &Self) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Scale each axis independently.
    #[must_use]
    pub fn scale(&self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A 2D size with width and height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Size {
    /// Zero size
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::ZERO
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X position of top-left corner
    pub x: f64,
    /// Y position of top-left corner
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle of the given size centered on `center`.
    #[must_use]
    pub fn centered(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    /// Check if a point is inside the rectangle (inclusive).
    #[must_use]
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_point_default() {
        assert_eq!(Point::default(), Point::ORIGIN);
    }

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_point_angle_to() {
        let origin = Point::ORIGIN;
        assert!((origin.angle_to(&Point::new(1.0, 0.0))).abs() < 1e-9);
        let up = origin.angle_to(&Point::new(0.0, 1.0));
        assert!((up - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_point_scale() {
        let p = Point::new(10.0, 20.0).scale(2.0, 0.5);
        assert_eq!(p, Point::new(20.0, 10.0));
    }

    #[test]
    fn test_rect_centered() {
        let r = Rect::centered(Point::new(100.0, 100.0), Size::new(20.0, 10.0));
        assert_eq!(r, Rect::new(90.0, 95.0, 20.0, 10.0));
        assert!(r.contains_point(&Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_rect_contains_point_inclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(&Point::new(0.0, 0.0)));
        assert!(r.contains_point(&Point::new(10.0, 10.0)));
        assert!(!r.contains_point(&Point::new(10.1, 5.0)));
    }

    #[test]
    fn test_zero_rect_contains_only_center() {
        let r = Rect::centered(Point::new(5.0, 5.0), Size::ZERO);
        assert!(r.contains_point(&Point::new(5.0, 5.0)));
        assert!(!r.contains_point(&Point::new(5.0, 5.01)));
    }

    proptest! {
        #[test]
        fn prop_point_distance_symmetric(x1 in -1e5f64..1e5, y1 in -1e5f64..1e5, x2 in -1e5f64..1e5, y2 in -1e5f64..1e5) {
            let p1 = Point::new(x1, y1);
            let p2 = Point::new(x2, y2);
            prop_assert!((p1.distance(&p2) - p2.distance(&p1)).abs() < 1e-6);
            prop_assert!(p1.distance(&p2) >= 0.0);
        }

        #[test]
        fn prop_centered_rect_contains_center(x in -1e4f64..1e4, y in -1e4f64..1e4, w in 0.0f64..1e4, h in 0.0f64..1e4) {
            let center = Point::new(x, y);
            let r = Rect::centered(center, Size::new(w, h));
            prop_assert!(r.contains_point(&center));
        }
    }
}
