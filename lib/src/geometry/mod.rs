//! Geometry kernel for the slicer.
//!
//! This module provides the numeric primitives the slicing pipeline is built on:
//! - [`Point2`] and [`Point3`] - single-precision points/vectors
//! - [`Segment`] - line segment with parametric intersection
//! - [`SegmentPath`] - polyline that grows at both ends
//! - [`BoundingBox2`] and [`BoundingBox3`] - axis-aligned bounding boxes
//! - [`simplify`] - near-collinear point removal
//!
//! All functions are pure. Operations that would yield NaN on degenerate
//! input (zero-length normalization, degenerate lines) return `Option`
//! instead, so NaN never reaches a distance comparison.

mod bounding_box;
mod line;
mod point;
mod polyline;
pub mod simplify;

pub use bounding_box::{BoundingBox2, BoundingBox3};
pub use line::{segment_intersect, Segment, Segments};
pub use point::{approx_eq_rel, Point2, Point3, Points, EPSILON};
pub use polyline::{SegmentPath, SegmentPaths};
pub use simplify::{reduce, reduce_all, reduced, rotate_to_corner};

use crate::Coord;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point2, b: Point2) -> Coord {
    a.distance(&b)
}

/// Squared Euclidean distance; avoids the square root for comparisons.
#[inline]
pub fn distance_squared(a: Point2, b: Point2) -> Coord {
    a.distance_squared(&b)
}

/// Manhattan (L1) distance.
#[inline]
pub fn manhattan_distance(a: Point2, b: Point2) -> Coord {
    a.manhattan_distance(&b)
}

/// Squared perpendicular distance from `p` to the infinite line through `a` and `b`.
///
/// `None` when `a == b`: a degenerate line has no direction.
pub fn point_line_distance_squared(p: Point2, a: Point2, b: Point2) -> Option<Coord> {
    let line = b - a;
    let len_sq = line.length_squared();
    if len_sq == 0.0 {
        return None;
    }
    // cross(b - a, p - a)² / |b - a|²
    let cross = line.cross(&(p - a));
    let d = cross * cross / len_sq;
    d.is_finite().then_some(d)
}

/// Angle between two 3D vectors in radians.
#[inline]
pub fn angle_between(a: Point3, b: Point3) -> Coord {
    a.angle_between(&b)
}

/// Unit normal of a triangle, `None` for zero-area triangles.
#[inline]
pub fn normal(v0: Point3, v1: Point3, v2: Point3) -> Option<Point3> {
    Point3::normal(v0, v1, v2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_line_distance() {
        let d = point_line_distance_squared(
            Point2::new(1.0, 3.0),
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
        )
        .unwrap();
        assert!((d - 9.0).abs() < 1e-5);

        // The line is infinite: points beyond the endpoints use the extension.
        let d = point_line_distance_squared(
            Point2::new(10.0, 2.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
        )
        .unwrap();
        assert!((d - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_point_line_distance_degenerate_line() {
        let a = Point2::new(2.0, 2.0);
        assert!(point_line_distance_squared(Point2::zero(), a, a).is_none());
    }

    #[test]
    fn test_distance_helpers() {
        let a = Point2::new(-1.0, -1.0);
        let b = Point2::new(2.0, 3.0);
        assert_eq!(distance(a, b), 5.0);
        assert_eq!(distance_squared(a, b), 25.0);
        assert_eq!(manhattan_distance(a, b), 7.0);
    }
}
