//! Segment path (polyline) type.
//!
//! A [`SegmentPath`] is the connected polyline the stitcher grows from both
//! ends. It is backed by a `VecDeque` so appending and prepending are O(1)
//! amortized. Closedness is not stored: a path whose first and last points
//! coincide is closed, and callers check this with [`SegmentPath::is_closed`].

use super::{Point2, Segment};
use crate::Coord;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::ops::Index;

/// An ordered, mutable polyline.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentPath {
    points: VecDeque<Point2>,
}

impl SegmentPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path seeded with the two endpoints of a segment.
    pub fn from_segment(segment: &Segment) -> Self {
        Self::from_points([segment.a, segment.b])
    }

    pub fn from_points<I: IntoIterator<Item = Point2>>(points: I) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn first(&self) -> Option<Point2> {
        self.points.front().copied()
    }

    #[inline]
    pub fn last(&self) -> Option<Point2> {
        self.points.back().copied()
    }

    #[inline]
    pub fn push_back(&mut self, p: Point2) {
        self.points.push_back(p);
    }

    #[inline]
    pub fn push_front(&mut self, p: Point2) {
        self.points.push_front(p);
    }

    /// Reverse the point order in place.
    pub fn reverse(&mut self) {
        self.points.make_contiguous().reverse();
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Point2> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<Point2> {
        self.points.iter().copied().collect()
    }

    /// Consecutive point pairs along the path.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .map(|(a, b)| Segment::new(*a, *b))
    }

    /// Total polyline length.
    pub fn length(&self) -> Coord {
        self.edges().map(|e| e.length()).sum()
    }

    /// Whether the first and last points coincide within `tolerance`
    /// (Manhattan distance). A path needs at least three points to be closed.
    pub fn is_closed(&self, tolerance: Coord) -> bool {
        match (self.first(), self.last()) {
            (Some(a), Some(b)) if self.len() > 2 => a.manhattan_distance(&b) <= tolerance,
            _ => false,
        }
    }

    /// Replace all points, keeping the deque storage.
    pub(crate) fn replace_points(&mut self, points: Vec<Point2>) {
        self.points.clear();
        self.points.extend(points);
    }
}

impl fmt::Debug for SegmentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SegmentPath({} points)", self.points.len())
    }
}

impl fmt::Display for SegmentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SegmentPath[")?;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "]")
    }
}

impl Index<usize> for SegmentPath {
    type Output = Point2;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl FromIterator<Point2> for SegmentPath {
    fn from_iter<I: IntoIterator<Item = Point2>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}

impl<'a> IntoIterator for &'a SegmentPath {
    type Item = &'a Point2;
    type IntoIter = std::collections::vec_deque::Iter<'a, Point2>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl From<Vec<Point2>> for SegmentPath {
    fn from(points: Vec<Point2>) -> Self {
        Self::from_points(points)
    }
}

/// Type alias for a collection of paths.
pub type SegmentPaths = Vec<SegmentPath>;
