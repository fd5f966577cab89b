//! Toolpath ordering.
//!
//! Greedy nearest-endpoint ordering, single pass, no backtracking. Starting
//! from the current head position, each position `i` of the path list
//! receives whichever remaining path (`i..`) has an endpoint closest to the
//! head. The path is swapped into place, reversed if its last point was the
//! closer one, and the head moves to its new last point.
//!
//! Ties go to the first candidate encountered: lower list index first, and
//! within a path its first point before its last. Paths are only reordered
//! and reversed, never added or removed.
//!
//! The head position is threaded through the layers in Z order, so this
//! stage is sequential.

use crate::geometry::{Point2, SegmentPath};
use crate::slice::Slice;
use crate::Coord;

/// Order and orient `paths` in place for minimal travel from `head`.
///
/// On return `head` is the last point of the last path.
pub fn optimize_paths(paths: &mut [SegmentPath], head: &mut Point2) {
    for i in 0..paths.len() {
        let Some((best, reverse)) = closest_endpoint(&paths[i..], *head) else {
            continue;
        };
        paths.swap(i, i + best);
        let path = &mut paths[i];
        if reverse {
            path.reverse();
        }
        if let Some(end) = path.last() {
            *head = end;
        }
    }
}

/// Optimize every layer in order, carrying the head position between them.
pub fn optimize_layers(slices: &mut [Slice], head: &mut Point2) {
    for slice in slices {
        slice.optimize_paths(head);
    }
}

/// Index of the path with the endpoint nearest `head`, and whether that
/// endpoint is the path's last point.
fn closest_endpoint(paths: &[SegmentPath], head: Point2) -> Option<(usize, bool)> {
    let mut best: Option<(usize, bool)> = None;
    let mut best_dist = Coord::INFINITY;

    for (i, path) in paths.iter().enumerate() {
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            continue;
        };
        let d_first = first.distance_squared(&head);
        if d_first < best_dist {
            best_dist = d_first;
            best = Some((i, false));
        }
        let d_last = last.distance_squared(&head);
        if d_last < best_dist {
            best_dist = d_last;
            best = Some((i, true));
        }
    }
    best
}

/// Total travel length from `head` through the starts and ends of `paths`
/// in their current order.
pub fn travel_distance(paths: &[SegmentPath], head: Point2) -> Coord {
    let mut at = head;
    let mut total = 0.0;
    for path in paths {
        if let (Some(first), Some(last)) = (path.first(), path.last()) {
            total += at.distance(&first);
            at = last;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(ax: Coord, ay: Coord, bx: Coord, by: Coord) -> SegmentPath {
        SegmentPath::from_points([Point2::new(ax, ay), Point2::new(bx, by)])
    }

    fn canonical(paths: &[SegmentPath]) -> Vec<Vec<(Coord, Coord)>> {
        let mut out: Vec<Vec<(Coord, Coord)>> = paths
            .iter()
            .map(|p| {
                let mut pts: Vec<(Coord, Coord)> = p.iter().map(|q| (q.x, q.y)).collect();
                let mut rev = pts.clone();
                rev.reverse();
                if rev < pts {
                    pts = rev;
                }
                pts
            })
            .collect();
        out.sort_by(|a, b| a.partial_cmp(b).unwrap());
        out
    }

    #[test]
    fn test_orders_and_reverses() {
        let mut paths = vec![
            line(10.0, 0.0, 20.0, 0.0),
            line(5.0, 0.0, 1.0, 0.0),
            line(30.0, 0.0, 21.0, 0.0),
        ];
        let mut head = Point2::zero();
        optimize_paths(&mut paths, &mut head);

        assert_eq!(paths[0], line(1.0, 0.0, 5.0, 0.0));
        assert_eq!(paths[1], line(10.0, 0.0, 20.0, 0.0));
        assert_eq!(paths[2], line(21.0, 0.0, 30.0, 0.0));
        assert_eq!(head, Point2::new(30.0, 0.0));
    }

    #[test]
    fn test_ties_keep_first_found() {
        // Both paths start at the same distance from the origin.
        let mut paths = vec![line(1.0, 0.0, 2.0, 0.0), line(-1.0, 0.0, -2.0, 0.0)];
        let mut head = Point2::zero();
        optimize_paths(&mut paths, &mut head);
        assert_eq!(paths[0], line(1.0, 0.0, 2.0, 0.0));

        // First and last point equally near: the path keeps its direction.
        let mut paths = vec![line(-1.0, 0.0, 1.0, 0.0)];
        let mut head = Point2::new(0.0, 5.0);
        optimize_paths(&mut paths, &mut head);
        assert_eq!(paths[0], line(-1.0, 0.0, 1.0, 0.0));
        assert_eq!(head, Point2::new(1.0, 0.0));
    }

    #[test]
    fn test_optimization_preserves_paths() {
        let mut paths: Vec<SegmentPath> = (0..12)
            .map(|i| {
                let t = i as Coord;
                SegmentPath::from_points([
                    Point2::new((t * 7.3) % 11.0, (t * 3.1) % 5.0),
                    Point2::new((t * 2.9) % 13.0, (t * 5.7) % 7.0),
                    Point2::new(t, -t),
                ])
            })
            .collect();
        let before = canonical(&paths);

        let mut head = Point2::zero();
        optimize_paths(&mut paths, &mut head);

        assert_eq!(canonical(&paths), before);
        assert_eq!(Some(head), paths.last().and_then(|p| p.last()));
    }

    #[test]
    fn test_head_carries_across_layers() {
        let mut slices = vec![
            Slice::from_paths(0.0, vec![line(0.0, 0.0, 10.0, 0.0)]),
            Slice::from_paths(
                0.2,
                vec![line(0.0, 0.0, 0.0, 10.0), line(10.0, 10.0, 10.0, 1.0)],
            ),
        ];
        let mut head = Point2::zero();
        optimize_layers(&mut slices, &mut head);

        // The second layer continues from (10, 0), the end of the first.
        assert_eq!(slices[1].paths()[0], line(10.0, 1.0, 10.0, 10.0));
        assert_eq!(slices[1].paths()[1], line(0.0, 10.0, 0.0, 0.0));
        assert_eq!(head, Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_travel_distance() {
        let paths = vec![line(3.0, 4.0, 3.0, 10.0), line(3.0, 13.0, 0.0, 0.0)];
        assert!((travel_distance(&paths, Point2::zero()) - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty() {
        let mut paths: Vec<SegmentPath> = Vec::new();
        let mut head = Point2::new(3.0, 4.0);
        optimize_paths(&mut paths, &mut head);
        assert_eq!(head, Point2::new(3.0, 4.0));
    }
}
