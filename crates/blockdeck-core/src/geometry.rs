//! # Geometry
//!
//! Integer points and rectangles for hit testing, in host pixel coordinates
//! (origin at top-left, y grows downward).
//!
//! Edges and areas widen to `i64`, squared distances to `i128`, so results
//! are exact for any `i32` geometry. No floating point.

use serde::{Deserialize, Serialize};

/// A pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    #[inline]
    pub fn distance_sq(&self, other: &Point) -> i128 {
        let dx = i128::from(self.x) - i128::from(other.x);
        let dy = i128::from(self.y) - i128::from(other.y);
        dx * dx + dy * dy
    }
}

/// An axis-aligned rectangle. Left/top edges are inclusive, right/bottom
/// edges exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Check if the rectangle has no area. Negative sizes count as empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        !self.is_empty()
            && point.x >= self.x
            && i64::from(point.x) < self.right()
            && point.y >= self.y
            && i64::from(point.y) < self.bottom()
    }

    /// Area of the overlap with another rectangle, 0 when they don't overlap.
    pub fn overlap_area(&self, other: &Rect) -> i64 {
        if self.is_empty() || other.is_empty() {
            return 0;
        }
        let left = i64::from(self.x.max(other.x));
        let top = i64::from(self.y.max(other.y));
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if left < right && top < bottom {
            (right - left) * (bottom - top)
        } else {
            0
        }
    }

    /// Twice the center point, kept in integers so odd sizes stay exact.
    #[inline]
    pub fn center_doubled(&self) -> (i128, i128) {
        (
            2 * i128::from(self.x) + i128::from(self.width),
            2 * i128::from(self.y) + i128::from(self.height),
        )
    }

    /// Squared distance between the centers of two rectangles, scaled by 4.
    pub fn center_distance_sq(&self, other: &Rect) -> i128 {
        let (ax, ay) = self.center_doubled();
        let (bx, by) = other.center_doubled();
        (ax - bx) * (ax - bx) + (ay - by) * (ay - by)
    }

    /// Squared distance from the center to a point, scaled by 4.
    pub fn center_distance_to_point_sq(&self, point: Point) -> i128 {
        let (cx, cy) = self.center_doubled();
        let px = 2 * i128::from(point.x);
        let py = 2 * i128::from(point.y);
        (cx - px) * (cx - px) + (cy - py) * (cy - py)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10, 10, 20, 10);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(29, 19)));
        assert!(!r.contains(Point::new(30, 10)));
        assert!(!r.contains(Point::new(10, 20)));
        assert!(!r.contains(Point::new(9, 15)));
    }

    #[test]
    fn empty_rect_contains_nothing() {
        assert!(!Rect::new(0, 0, 0, 10).contains(Point::new(0, 0)));
        assert!(!Rect::new(0, 0, -5, 10).contains(Point::new(0, 0)));
    }

    #[test]
    fn overlap_area_of_partial_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.overlap_area(&b), 25);
        assert_eq!(b.overlap_area(&a), 25);
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert_eq!(a.overlap_area(&b), 0);
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let a = Rect::new(i32::MAX - 1, i32::MAX - 1, i32::MAX, i32::MAX);
        let b = Rect::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(a.overlap_area(&b), 0);
        assert!(a.center_distance_sq(&b) > 0);
    }

    #[test]
    fn center_distance_prefers_nearer_rect() {
        let dragged = Rect::new(0, 0, 10, 10);
        let near = Rect::new(4, 0, 10, 10);
        let far = Rect::new(8, 0, 10, 10);
        assert!(dragged.center_distance_sq(&near) < dragged.center_distance_sq(&far));
    }

    #[test]
    fn point_distance() {
        assert_eq!(Point::new(0, 0).distance_sq(&Point::new(3, 4)), 25);
    }
}
