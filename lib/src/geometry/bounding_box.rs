//! Axis-aligned bounding boxes.

use super::{Point2, Point3};
use crate::Coord;
use serde::{Deserialize, Serialize};

/// 2D axis-aligned bounding box. Starts empty (inverted) and grows by merging points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl Default for BoundingBox2 {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox2 {
    pub fn new() -> Self {
        Self {
            min: Point2::new(Coord::MAX, Coord::MAX),
            max: Point2::new(Coord::MIN, Coord::MIN),
        }
    }

    pub fn from_points<'a, I: IntoIterator<Item = &'a Point2>>(points: I) -> Self {
        let mut bb = Self::new();
        for p in points {
            bb.merge(*p);
        }
        bb
    }

    pub fn merge(&mut self, p: Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn width(&self) -> Coord {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> Coord {
        self.max.y - self.min.y
    }
}

/// 3D axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3 {
    pub min: Point3,
    pub max: Point3,
}

impl Default for BoundingBox3 {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox3 {
    pub fn new() -> Self {
        Self {
            min: Point3::new(Coord::MAX, Coord::MAX, Coord::MAX),
            max: Point3::new(Coord::MIN, Coord::MIN, Coord::MIN),
        }
    }

    pub fn merge(&mut self, p: Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Extent along each axis; zero for an empty box.
    pub fn size(&self) -> Point3 {
        if self.is_empty() {
            return Point3::zero();
        }
        self.max - self.min
    }

    pub fn center(&self) -> Point3 {
        (self.min + self.max) / 2.0
    }

    /// Footprint in the XY plane.
    pub fn xy(&self) -> BoundingBox2 {
        BoundingBox2 {
            min: self.min.xy(),
            max: self.max.xy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox2_merge() {
        let pts = [Point2::new(1.0, -2.0), Point2::new(-3.0, 4.0)];
        let bb = BoundingBox2::from_points(&pts);
        assert_eq!(bb.min, Point2::new(-3.0, -2.0));
        assert_eq!(bb.max, Point2::new(1.0, 4.0));
        assert_eq!(bb.width(), 4.0);
        assert!(BoundingBox2::new().is_empty());
    }

    #[test]
    fn test_bbox3_size_and_center() {
        let mut bb = BoundingBox3::new();
        assert!(bb.is_empty());
        assert_eq!(bb.size(), Point3::zero());
        bb.merge(Point3::new(0.0, 0.0, 0.0));
        bb.merge(Point3::new(2.0, 4.0, 6.0));
        assert_eq!(bb.size(), Point3::new(2.0, 4.0, 6.0));
        assert_eq!(bb.center(), Point3::new(1.0, 2.0, 3.0));
    }
}
