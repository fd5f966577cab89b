//! Path simplification.
//!
//! [`reduce`] removes interior points that lie within a distance tolerance of
//! the line through their neighbours. It is a single left-to-right pass, not
//! Douglas-Peucker: each removal makes the removed point's neighbours adjacent,
//! and the surviving predecessor is re-evaluated against its new successor.
//! Because every kept interior point has been checked against its final
//! neighbours, reducing a reduced path changes nothing.
//!
//! The first and last points are always preserved.

use super::{point_line_distance_squared, Point2, SegmentPath};
use crate::Coord;

/// Remove near-collinear interior points from `path` in place.
///
/// A point is removed when its perpendicular distance to the line through its
/// current neighbours is below `tolerance`. When both neighbours coincide the
/// distance to that point is used instead.
pub fn reduce(path: &mut SegmentPath, tolerance: Coord) {
    if path.len() < 3 {
        return;
    }
    let reduced = reduce_points(&path.to_vec(), tolerance);
    if reduced.len() != path.len() {
        path.replace_points(reduced);
    }
}

/// Return a reduced copy of `path`.
pub fn reduced(path: &SegmentPath, tolerance: Coord) -> SegmentPath {
    let mut result = path.clone();
    reduce(&mut result, tolerance);
    result
}

/// Reduce every path of a layer.
pub fn reduce_all(paths: &mut [SegmentPath], tolerance: Coord) {
    for path in paths {
        reduce(path, tolerance);
    }
}

/// Restart a closed loop at a corner.
///
/// The loop's closing point is dropped and the ring is rotated so that it
/// begins at the first point whose deviation from the line through its
/// cyclic neighbours is at least `tolerance`; the first point is then
/// repeated at the end. Returns `false` and leaves the path untouched when it
/// is not closed within `tolerance` or no such corner exists.
pub fn rotate_to_corner(path: &mut SegmentPath, tolerance: Coord) -> bool {
    if !path.is_closed(tolerance) {
        return false;
    }
    let mut ring = path.to_vec();
    ring.pop();
    let m = ring.len();
    if m < 3 {
        return false;
    }

    let tolerance_sq = tolerance * tolerance;
    let corner = (0..m).find(|&k| {
        let prev = ring[(k + m - 1) % m];
        let next = ring[(k + 1) % m];
        deviation_squared(ring[k], prev, next) >= tolerance_sq
    });
    let Some(k) = corner else {
        return false;
    };

    ring.rotate_left(k);
    ring.push(ring[0]);
    path.replace_points(ring);
    true
}

fn reduce_points(points: &[Point2], tolerance: Coord) -> Vec<Point2> {
    let tolerance_sq = tolerance * tolerance;
    let mut kept: Vec<Point2> = Vec::with_capacity(points.len());

    for &p in points {
        kept.push(p);
        while kept.len() >= 3 {
            let n = kept.len();
            let (prev, mid, next) = (kept[n - 3], kept[n - 2], kept[n - 1]);
            if deviation_squared(mid, prev, next) < tolerance_sq {
                kept.remove(n - 2);
            } else {
                break;
            }
        }
    }

    kept
}

fn deviation_squared(p: Point2, a: Point2, b: Point2) -> Coord {
    point_line_distance_squared(p, a, b).unwrap_or_else(|| p.distance_squared(&a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(coords: &[(Coord, Coord)]) -> SegmentPath {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn test_removes_collinear_points() {
        let mut p = path(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (3.0, 3.0)]);
        reduce(&mut p, 1e-4);
        assert_eq!(p.to_vec(), path(&[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0)]).to_vec());
    }

    #[test]
    fn test_keeps_corners() {
        let mut p = path(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0), (0.0, 0.0)]);
        reduce(&mut p, 1e-4);
        assert_eq!(p.len(), 5);
    }

    #[test]
    fn test_preserves_endpoints() {
        let mut p = path(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        reduce(&mut p, 10.0);
        assert_eq!(p.first(), Some(Point2::new(0.0, 0.0)));
        assert_eq!(p.last(), Some(Point2::new(2.0, 0.0)));
        assert_eq!(p.len(), 2);

        let mut short = path(&[(0.0, 0.0), (1.0, 1.0)]);
        reduce(&mut short, 10.0);
        assert_eq!(short.len(), 2);
    }

    #[test]
    fn test_tolerance_threshold() {
        let wiggle = path(&[(0.0, 0.0), (1.0, 0.05), (2.0, 0.0)]);
        assert_eq!(reduced(&wiggle, 0.01).len(), 3);
        assert_eq!(reduced(&wiggle, 0.1).len(), 2);
    }

    #[test]
    fn test_degenerate_neighbours() {
        // Out-and-back spike: the tip has coincident neighbours.
        let mut p = path(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        reduce(&mut p, 0.5);
        assert_eq!(p.len(), 3);
        reduce(&mut p, 2.0);
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn test_rotate_loop_seam_to_corner() {
        // Square seeded mid-edge: the seam point is pinned by `reduce`.
        let mut p = path(&[
            (-5.0, 0.0),
            (-5.0, 5.0),
            (5.0, 5.0),
            (5.0, -5.0),
            (-5.0, -5.0),
            (-5.0, 0.0),
        ]);
        assert_eq!(reduced(&p, 1e-4).len(), 6);

        assert!(rotate_to_corner(&mut p, 1e-4));
        assert_eq!(p.first(), Some(Point2::new(-5.0, 5.0)));
        assert_eq!(p.first(), p.last());
        reduce(&mut p, 1e-4);
        assert_eq!(
            p.to_vec(),
            path(&[(-5.0, 5.0), (5.0, 5.0), (5.0, -5.0), (-5.0, -5.0), (-5.0, 5.0)]).to_vec()
        );
    }

    #[test]
    fn test_rotate_ignores_open_and_flat_loops() {
        let mut open = path(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert!(!rotate_to_corner(&mut open, 1e-4));
        assert_eq!(open.len(), 3);

        // Every point collinear with its neighbours: nowhere to restart.
        let mut flat = path(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 0.0)]);
        let before = flat.clone();
        assert!(!rotate_to_corner(&mut flat, 1e-4));
        assert_eq!(flat, before);
    }

    #[test]
    fn test_reduce_is_idempotent() {
        // Slowly bending arc: later removals change earlier neighbourhoods.
        let arc: SegmentPath = (0..40)
            .map(|i| {
                let t = i as Coord * 0.05;
                Point2::new(t * 10.0, (t * t) * 0.3)
            })
            .collect();
        for tol in [0.001, 0.01, 0.05, 0.2] {
            let once = reduced(&arc, tol);
            let twice = reduced(&once, tol);
            assert_eq!(once, twice, "tolerance {tol}");
        }
    }
}
