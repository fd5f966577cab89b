//! Low-level facet/plane intersection.
//!
//! A vertex exactly on the plane counts as below it. With that tie-break a
//! facet is crossed by a plane either on zero or on exactly two of its edges,
//! so every cut produces at most one raw segment. Each crossing point is
//! interpolated from the edge's lower vertex towards its upper vertex, which
//! makes the point for an edge shared by two facets bit-identical in both.

use super::{SliceDiagnostics, SlicingParams};
use crate::geometry::{Point2, Point3, Segment};
use crate::mesh::{Facet, Mesh};
use crate::Coord;

/// Result of cutting one facet with one plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FacetCut {
    /// The plane does not cross the facet.
    Miss,
    /// The plane only grazes a vertex; both crossing points coincide.
    Touch,
    Segment(Segment),
}

/// Intersect a facet with the horizontal plane at `z`.
pub fn intersect_facet(facet: &Facet, z: Coord) -> FacetCut {
    let v = facet.vertices();
    let mut hits = [Point2::zero(); 2];
    let mut count = 0;

    for (i, j) in [(0, 1), (1, 2), (2, 0)] {
        let (below_i, below_j) = (v[i].z <= z, v[j].z <= z);
        if below_i == below_j {
            continue;
        }
        let (lo, hi) = if below_i { (v[i], v[j]) } else { (v[j], v[i]) };
        if count < 2 {
            hits[count] = crossing(lo, hi, z);
        }
        count += 1;
    }

    match count {
        2 if hits[0].approx_eq(&hits[1]) => FacetCut::Touch,
        2 => FacetCut::Segment(Segment::new(hits[0], hits[1])),
        _ => FacetCut::Miss,
    }
}

#[inline]
fn crossing(lo: Point3, hi: Point3, z: Coord) -> Point2 {
    let t = (z - lo.z) / (hi.z - lo.z);
    Point2::new(lo.x + (hi.x - lo.x) * t, lo.y + (hi.y - lo.y) * t)
}

/// Cut one facet and append its segment(s) to `out`.
///
/// Near-horizontal facets (verticality angle below the threshold) emit two
/// copies of the raw segment, displaced by half the double-line separation to
/// either side. This approximates printing the flat region the facet covers
/// at this height with two adjacent beads; it is a heuristic, not an exact
/// footprint.
pub fn slice_facet(
    facet: &Facet,
    z: Coord,
    params: &SlicingParams,
    out: &mut Vec<Segment>,
    diagnostics: &mut SliceDiagnostics,
) {
    if facet.is_degenerate() {
        diagnostics.degenerate_facets += 1;
        return;
    }

    let segment = match intersect_facet(facet, z) {
        FacetCut::Miss => return,
        FacetCut::Touch => {
            diagnostics.grazing_touches += 1;
            return;
        }
        FacetCut::Segment(s) => s,
    };
    if !segment.is_finite() {
        diagnostics.unstable_offsets += 1;
        return;
    }

    if facet.z_angle() < params.z_angle_threshold {
        let half = params.double_line_separation / 2.0;
        match (segment.offset(half), segment.offset(-half)) {
            (Some(a), Some(b)) => {
                out.push(a);
                out.push(b);
            }
            _ => diagnostics.unstable_offsets += 1,
        }
    } else {
        out.push(segment);
    }
}

/// Cut every facet in `facets` with the plane at `z`.
pub fn slice_facets<'a, I>(facets: I, z: Coord, params: &SlicingParams) -> (Vec<Segment>, SliceDiagnostics)
where
    I: IntoIterator<Item = &'a Facet>,
{
    let mut segments = Vec::new();
    let mut diagnostics = SliceDiagnostics::default();
    for facet in facets {
        slice_facet(facet, z, params, &mut segments, &mut diagnostics);
    }
    (segments, diagnostics)
}

/// Raw segments of the whole mesh at one plane height.
///
/// Only facets whose Z range contains the plane are cut. Degenerate facets
/// are skipped and reported as the mesh-wide count, the same figure a full
/// slicing run reports once.
pub fn slice_mesh_at_z(mesh: &Mesh, z: Coord, params: &SlicingParams) -> (Vec<Segment>, SliceDiagnostics) {
    let (segments, mut diagnostics) = slice_facets(
        mesh.facets().iter().filter(|f| {
            let (lo, hi) = f.z_range();
            !f.is_degenerate() && lo <= z && z < hi
        }),
        z,
        params,
    );
    diagnostics.degenerate_facets = mesh.degenerate_facet_count();
    (segments, diagnostics)
}
