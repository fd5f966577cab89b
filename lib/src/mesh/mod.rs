//! Triangle mesh model.
//!
//! A [`Mesh`] owns its [`Facet`]s exclusively. Every facet carries its unit
//! normal and its verticality angle, both derived once at construction. The
//! bounding box is recomputed after every transform; per-facet Z ranges are
//! not cached and always reflect the current vertices.

mod stl;

pub use stl::{load_stl, read_stl};

use crate::geometry::{BoundingBox3, Point3};
use crate::Coord;
use std::f32::consts::FRAC_PI_2;
use std::f32::consts::PI;
use std::fmt;

/// Raw input triangle: three vertices, as delivered by an STL reader.
pub type Triangle = [Point3; 3];

/// One triangular surface element with derived orientation data.
#[derive(Clone, Debug, PartialEq)]
pub struct Facet {
    vertices: [Point3; 3],
    normal: Option<Point3>,
    z_angle: Coord,
}

impl Facet {
    pub fn new(vertices: [Point3; 3]) -> Self {
        let normal = Point3::normal(vertices[0], vertices[1], vertices[2]);
        let z_angle = normal.map(verticality_angle).unwrap_or(0.0);
        Self {
            vertices,
            normal,
            z_angle,
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3; 3] {
        &self.vertices
    }

    /// Unit normal; `None` for a zero-area facet.
    #[inline]
    pub fn normal(&self) -> Option<Point3> {
        self.normal
    }

    /// Angle between the normal and +Z, folded into `[0, π/2]`.
    /// Zero for degenerate facets, which never reach slicing.
    #[inline]
    pub fn z_angle(&self) -> Coord {
        self.z_angle
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.normal.is_none()
    }

    /// Current Z extent of the facet as `(min, max)`.
    pub fn z_range(&self) -> (Coord, Coord) {
        let [a, b, c] = self.vertices;
        (a.z.min(b.z).min(c.z), a.z.max(b.z).max(c.z))
    }

    fn map_vertices(&self, f: impl Fn(Point3) -> Point3) -> Self {
        Self::new(self.vertices.map(f))
    }
}

fn verticality_angle(normal: Point3) -> Coord {
    let angle = normal.angle_between(&Point3::UNIT_Z);
    if angle > FRAC_PI_2 {
        PI - angle
    } else {
        angle
    }
}

/// A triangle mesh with its axis-aligned bounding box.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    facets: Vec<Facet>,
    bounds: BoundingBox3,
}

impl Mesh {
    /// Build a mesh from raw triangles, deriving each facet's normal and angle.
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        Self::from_facets(triangles.iter().map(|t| Facet::new(*t)).collect())
    }

    pub fn from_facets(facets: Vec<Facet>) -> Self {
        let mut mesh = Self {
            facets,
            bounds: BoundingBox3::new(),
        };
        mesh.update_bounds();
        mesh
    }

    #[inline]
    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    #[inline]
    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    pub fn degenerate_facet_count(&self) -> usize {
        self.facets.iter().filter(|f| f.is_degenerate()).count()
    }

    /// Axis-aligned bounding box; empty (inverted) for a mesh without facets.
    #[inline]
    pub fn bounds(&self) -> &BoundingBox3 {
        &self.bounds
    }

    /// Extent along X, Y and Z.
    pub fn dimensions(&self) -> Point3 {
        self.bounds.size()
    }

    /// Multiply every vertex by `factor`.
    pub fn scale(&mut self, factor: Coord) {
        self.transform(|v| v * factor);
    }

    /// Translate every vertex.
    pub fn shift(&mut self, dx: Coord, dy: Coord, dz: Coord) {
        let offset = Point3::new(dx, dy, dz);
        self.transform(|v| v + offset);
    }

    /// Place the model on the bed: centre X/Y on the origin and set the minimum Z to 0.
    pub fn shift_center(&mut self) {
        if self.bounds.is_empty() {
            return;
        }
        let center = self.bounds.center();
        self.shift(-center.x, -center.y, -self.bounds.min.z);
    }

    fn transform(&mut self, f: impl Fn(Point3) -> Point3) {
        for facet in &mut self.facets {
            *facet = facet.map_vertices(&f);
        }
        self.update_bounds();
    }

    fn update_bounds(&mut self) {
        let mut bounds = BoundingBox3::new();
        for v in self.facets.iter().flat_map(|f| f.vertices.iter()) {
            bounds.merge(*v);
        }
        self.bounds = bounds;
    }
}

impl fmt::Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.dimensions();
        write!(
            f,
            "Mesh dimensions X:{:.2}mm Y:{:.2}mm Z:{:.2}mm",
            d.x, d.y, d.z
        )
    }
}

/// Axis-aligned box mesh of 12 triangles with outward normals, spanning `min..max`.
#[cfg(test)]
pub(crate) fn box_triangles(min: Point3, max: Point3) -> Vec<Triangle> {
    let c = |i: usize| {
        Point3::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        )
    };
    // Quads as corner indices, counter-clockwise seen from outside.
    let quads = [
        [0, 2, 3, 1], // bottom
        [4, 5, 7, 6], // top
        [0, 1, 5, 4], // front (y = min)
        [2, 6, 7, 3], // back
        [0, 4, 6, 2], // left
        [1, 3, 7, 5], // right
    ];
    quads
        .iter()
        .flat_map(|q| [[c(q[0]), c(q[1]), c(q[2])], [c(q[0]), c(q[2]), c(q[3])]])
        .collect()
}

/// The 10 mm test cube centred on the origin, resting on Z = 0.
#[cfg(test)]
pub(crate) fn cube_mesh() -> Mesh {
    Mesh::from_triangles(&box_triangles(
        Point3::new(-5.0, -5.0, 0.0),
        Point3::new(5.0, 5.0, 10.0),
    ))
}
