//! 2D and 3D point/vector types.
//!
//! Both types are plain `Copy` values of single-precision coordinates.
//! `PartialEq` is exact; use [`Point2::approx_eq`] / [`Point3::approx_eq`]
//! where floating round-off has to be absorbed.

use crate::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Relative epsilon for approximate coordinate equality.
/// Single precision carries about 7 significant digits; one is left for noise.
pub const EPSILON: Coord = 1e-6;

/// Compare two scalars under a relative epsilon scaled by their magnitude.
#[inline]
pub fn approx_eq_rel(a: Coord, b: Coord) -> bool {
    if a == b {
        return true;
    }
    (a - b).abs() < EPSILON * (a.abs() + b.abs()) / 2.0
}

/// Check a scalar against zero with the absolute epsilon.
#[inline]
pub fn is_zero(v: Coord) -> bool {
    v.abs() < EPSILON
}

/// A 2D point (or vector) in the layer plane.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: Coord,
    pub y: Coord,
}

impl Point2 {
    #[inline]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    #[inline]
    pub fn dot(&self, other: &Point2) -> Coord {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product of two planar vectors.
    #[inline]
    pub fn cross(&self, other: &Point2) -> Coord {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length_squared(&self) -> Coord {
        self.dot(self)
    }

    #[inline]
    pub fn length(&self) -> Coord {
        self.length_squared().sqrt()
    }

    /// Vector rotated 90° counter-clockwise.
    #[inline]
    pub fn perp(&self) -> Point2 {
        Point2::new(-self.y, self.x)
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalize(&self) -> Option<Point2> {
        let len = self.length();
        let n = *self / len;
        n.is_finite().then_some(n)
    }

    /// Unit normal (counter-clockwise perpendicular), or `None` for a zero-length vector.
    pub fn unit_normal(&self) -> Option<Point2> {
        self.perp().normalize()
    }

    #[inline]
    pub fn distance_squared(&self, other: &Point2) -> Coord {
        (*self - *other).length_squared()
    }

    #[inline]
    pub fn distance(&self, other: &Point2) -> Coord {
        self.distance_squared(other).sqrt()
    }

    #[inline]
    pub fn manhattan_distance(&self, other: &Point2) -> Coord {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Equality under a relative epsilon, per component.
    #[inline]
    pub fn approx_eq(&self, other: &Point2) -> bool {
        approx_eq_rel(self.x, other.x) && approx_eq_rel(self.y, other.y)
    }
}

impl fmt::Debug for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

impl Add for Point2 {
    type Output = Point2;

    #[inline]
    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point2 {
    #[inline]
    fn add_assign(&mut self, rhs: Point2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point2 {
    type Output = Point2;

    #[inline]
    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Point2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<Coord> for Point2 {
    type Output = Point2;

    #[inline]
    fn mul(self, rhs: Coord) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Point2> for Coord {
    type Output = Point2;

    #[inline]
    fn mul(self, rhs: Point2) -> Point2 {
        rhs * self
    }
}

impl Div<Coord> for Point2 {
    type Output = Point2;

    #[inline]
    fn div(self, rhs: Coord) -> Point2 {
        Point2::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Point2 {
    type Output = Point2;

    #[inline]
    fn neg(self) -> Point2 {
        Point2::new(-self.x, -self.y)
    }
}

/// A 3D point (or vector) in model space.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
}

impl Point3 {
    pub const UNIT_Z: Point3 = Point3::new(0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: Coord, y: Coord, z: Coord) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn dot(&self, other: &Point3) -> Coord {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(&self, other: &Point3) -> Point3 {
        Point3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[inline]
    pub fn length_squared(&self) -> Coord {
        self.dot(self)
    }

    #[inline]
    pub fn length(&self) -> Coord {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalize(&self) -> Option<Point3> {
        let n = *self / self.length();
        n.is_finite().then_some(n)
    }

    /// Unit normal of the triangle `v0, v1, v2`: `(v0 - v1) × (v1 - v2)`, normalized.
    ///
    /// Returns `None` for a zero-area triangle, which has no usable orientation.
    pub fn normal(v0: Point3, v1: Point3, v2: Point3) -> Option<Point3> {
        (v0 - v1).cross(&(v1 - v2)).normalize()
    }

    /// Angle between two vectors in radians, `acos(a·b / (|a||b|))`.
    ///
    /// NaN when either vector has zero length.
    pub fn angle_between(&self, other: &Point3) -> Coord {
        let denom = (self.length_squared() * other.length_squared()).sqrt();
        // Clamp so round-off on parallel vectors cannot push acos out of its domain.
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos()
    }

    #[inline]
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    #[inline]
    pub fn approx_eq(&self, other: &Point3) -> bool {
        approx_eq_rel(self.x, other.x)
            && approx_eq_rel(self.y, other.y)
            && approx_eq_rel(self.z, other.z)
    }
}

impl fmt::Debug for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

impl Add for Point3 {
    type Output = Point3;

    #[inline]
    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;

    #[inline]
    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<Coord> for Point3 {
    type Output = Point3;

    #[inline]
    fn mul(self, rhs: Coord) -> Point3 {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<Coord> for Point3 {
    type Output = Point3;

    #[inline]
    fn div(self, rhs: Coord) -> Point3 {
        Point3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Point3 {
    type Output = Point3;

    #[inline]
    fn neg(self) -> Point3 {
        Point3::new(-self.x, -self.y, -self.z)
    }
}

/// Type alias for a collection of 2D points.
pub type Points = Vec<Point2>;
