//! Line segment type and segment/segment intersection.

use super::point::is_zero;
use super::Point2;
use crate::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line segment between two endpoints, as produced by one facet/plane cut.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Point2,
    pub b: Point2,
}

impl Segment {
    #[inline]
    pub const fn new(a: Point2, b: Point2) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn from_coords(ax: Coord, ay: Coord, bx: Coord, by: Coord) -> Self {
        Self::new(Point2::new(ax, ay), Point2::new(bx, by))
    }

    /// Direction vector (b - a).
    #[inline]
    pub fn direction(&self) -> Point2 {
        self.b - self.a
    }

    #[inline]
    pub fn length(&self) -> Coord {
        self.a.distance(&self.b)
    }

    #[inline]
    pub fn reverse(&self) -> Self {
        Self::new(self.b, self.a)
    }

    /// Unit normal of the segment direction, or `None` for a zero-length segment.
    pub fn unit_normal(&self) -> Option<Point2> {
        self.direction().unit_normal()
    }

    /// Copy of this segment displaced by `distance` along its unit normal.
    ///
    /// `None` when the segment has no direction or the result is not finite.
    pub fn offset(&self, distance: Coord) -> Option<Segment> {
        let shift = self.unit_normal()? * distance;
        let moved = Segment::new(self.a + shift, self.b + shift);
        moved.is_finite().then_some(moved)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite()
    }

    /// Intersection point with another segment; see [`segment_intersect`].
    pub fn intersection(&self, other: &Segment, collinear_overlap: bool) -> Option<Point2> {
        segment_intersect(self.a, self.b, other.a, other.b, collinear_overlap)
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Segment({:?} -> {:?})", self.a, self.b)
    }
}

/// Type alias for a collection of segments.
pub type Segments = Vec<Segment>;

/// Parametric intersection of segments `p1-p2` and `q1-q2`.
///
/// With `r = p2 - p1` and `s = q2 - q1`:
/// - collinear (`r × s = 0` and `(q1 - p1) × r = 0`): `None`, unless
///   `collinear_overlap` is set and the segments overlap, in which case the
///   first overlapping endpoint (`q1` if it lies on `p`, else `p1`) is reported
/// - parallel, not collinear: `None`
/// - otherwise the point `p1 + t·r` when both `t` and `u` lie in `[0, 1]`
pub fn segment_intersect(
    p1: Point2,
    p2: Point2,
    q1: Point2,
    q2: Point2,
    collinear_overlap: bool,
) -> Option<Point2> {
    let r = p2 - p1;
    let s = q2 - q1;
    let qp = q1 - p1;
    let rxs = r.cross(&s);
    let qpxr = qp.cross(&r);

    if is_zero(rxs) {
        if !is_zero(qpxr) || !collinear_overlap {
            return None;
        }
        let t = qp.dot(&r);
        if 0.0 <= t && t <= r.dot(&r) {
            return Some(q1);
        }
        let pq = p1 - q1;
        let u = pq.dot(&s);
        if 0.0 <= u && u <= s.dot(&s) {
            return Some(p1);
        }
        return None;
    }

    let t = qp.cross(&s) / rxs;
    let u = qpxr / rxs;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(p1 + r * t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: Coord, y: Coord) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn test_crossing_segments() {
        let hit = segment_intersect(p(0.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(2.0, 0.0), false);
        let hit = hit.unwrap();
        assert!((hit.x - 1.0).abs() < 1e-6);
        assert!((hit.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_parallel_miss() {
        let hit = segment_intersect(p(0.0, 0.0), p(1.0, 0.0), p(2.0, -1.0), p(2.0, 1.0), false);
        assert!(hit.is_none());
    }

    #[test]
    fn test_parallel_non_collinear() {
        let hit = segment_intersect(p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), true);
        assert!(hit.is_none());
    }

    #[test]
    fn test_collinear_overlap_is_opt_in() {
        let (p1, p2, q1, q2) = (p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(3.0, 0.0));
        assert!(segment_intersect(p1, p2, q1, q2, false).is_none());
        assert_eq!(segment_intersect(p1, p2, q1, q2, true), Some(q1));
        // Disjoint collinear segments never intersect.
        assert!(segment_intersect(p1, p2, p(5.0, 0.0), p(6.0, 0.0), true).is_none());
    }

    #[test]
    fn test_endpoint_touch() {
        let hit = segment_intersect(p(0.0, 0.0), p(1.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), false);
        assert_eq!(hit, Some(p(1.0, 0.0)));
    }

    #[test]
    fn test_offset() {
        let s = Segment::from_coords(0.0, 0.0, 2.0, 0.0);
        let up = s.offset(0.25).unwrap();
        assert_eq!(up.a, p(0.0, 0.25));
        assert_eq!(up.b, p(2.0, 0.25));
        let down = s.offset(-0.25).unwrap();
        assert_eq!(down.a, p(0.0, -0.25));
        assert!(Segment::from_coords(1.0, 1.0, 1.0, 1.0).offset(0.25).is_none());
    }
}
