//! Sorted-sweep stitcher.
//!
//! Half-points are ranked by X and threaded into a doubly linked list over
//! the ranks. Consumed half-points are unlinked; their own links are left in
//! place, so a walk starting at a consumed node still reaches every live node
//! on that side (links only ever skip nodes that were dead when they were
//! written).

use super::{assemble, EndpointIndex, HalfPoints, PathStitcher, StitchResult};
use crate::geometry::Segment;
use crate::Coord;

const NONE: usize = usize::MAX;

/// Stitcher over an X-sorted linked order of half-points.
#[derive(Clone, Copy, Debug, Default)]
pub struct SweepStitcher;

impl PathStitcher for SweepStitcher {
    fn name(&self) -> &'static str {
        "sweep"
    }

    fn stitch(&self, segments: &[Segment], tolerance: Coord) -> StitchResult {
        let mut halves = HalfPoints::new(segments);
        let mut index = SweepIndex::new(&halves);
        let seeds = index.order.clone();
        assemble(&mut halves, &mut index, seeds, tolerance)
    }
}

struct SweepIndex {
    /// Half-point at each rank.
    order: Vec<usize>,
    /// Rank of each half-point.
    rank: Vec<usize>,
    prev: Vec<usize>,
    next: Vec<usize>,
}

impl SweepIndex {
    fn new(halves: &HalfPoints) -> Self {
        let n = halves.len();
        let points = halves.points();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| points[a].x.total_cmp(&points[b].x));

        let mut rank = vec![0; n];
        for (r, &h) in order.iter().enumerate() {
            rank[h] = r;
        }
        let prev = (0..n).map(|r| if r == 0 { NONE } else { r - 1 }).collect();
        let next = (0..n).map(|r| if r + 1 == n { NONE } else { r + 1 }).collect();

        Self {
            order,
            rank,
            prev,
            next,
        }
    }

    /// Walk from `start` along `links`, stopping once X leaves the tolerance band.
    fn scan(
        &self,
        halves: &HalfPoints,
        start: usize,
        links: &[usize],
        tolerance: Coord,
    ) -> Option<usize> {
        let at = halves.point(self.order[start]);
        let mut r = links[start];
        while r != NONE {
            let h = self.order[r];
            let p = halves.point(h);
            if (p.x - at.x).abs() > tolerance {
                return None;
            }
            if halves.matches(h, at, tolerance) {
                return Some(h);
            }
            r = links[r];
        }
        None
    }
}

impl EndpointIndex for SweepIndex {
    fn find(&self, halves: &HalfPoints, from: usize, tolerance: Coord) -> Option<usize> {
        let start = self.rank[from];
        self.scan(halves, start, &self.next, tolerance)
            .or_else(|| self.scan(halves, start, &self.prev, tolerance))
    }

    fn remove(&mut self, h: usize) {
        let r = self.rank[h];
        let (p, n) = (self.prev[r], self.next[r]);
        if p != NONE {
            self.next[p] = n;
        }
        if n != NONE {
            self.prev[n] = p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::geometry::Point2;

    #[test]
    fn test_unlink_keeps_walks_complete() {
        let segments = vec![
            seg(0.0, 0.0, 1.0, 0.0),
            seg(2.0, 0.0, 3.0, 0.0),
            seg(4.0, 0.0, 5.0, 0.0),
        ];
        let halves = HalfPoints::new(&segments);
        let mut index = SweepIndex::new(&halves);
        // Remove ranks 1 and 2 (x = 1 and x = 2), then walk from the dead rank 1.
        index.remove(1);
        index.remove(2);
        let mut seen = Vec::new();
        let mut r = index.next[1];
        while r != NONE {
            if r != 2 {
                seen.push(index.order[r]);
            }
            r = index.next[r];
        }
        assert_eq!(seen, vec![3, 4, 5]);
        assert_eq!(index.next[0], 3);
        assert_eq!(index.prev[3], 0);
    }

    #[test]
    fn test_scan_is_bounded_by_x() {
        // Endpoints share Y but are 0.5 apart in X.
        let segments = vec![seg(0.0, 0.0, 0.0, 1.0), seg(0.5, 1.0, 0.5, 2.0)];
        let result = SweepStitcher.stitch(&segments, 0.1);
        assert_eq!(result.paths.len(), 2);

        // Same X column, only one candidate within Manhattan tolerance.
        let column = vec![
            seg(0.0, 0.0, 0.0, 1.0),
            seg(0.0, 5.0, 0.0, 6.0),
            seg(0.0, 1.00005, 0.0, 2.0),
        ];
        let result = SweepStitcher.stitch(&column, 1e-4);
        assert_conserved(&result, &column);
        assert_eq!(result.paths.len(), 2);
        let long = result.paths.iter().find(|p| p.len() == 3).unwrap();
        assert!(long.iter().any(|p| *p == Point2::new(0.0, 2.0)));
    }

    #[test]
    fn test_matches_both_directions() {
        // The match for the seed's back end lies to its left in X.
        let segments = vec![seg(5.0, 0.0, 10.0, 0.0), seg(9.99995, 0.0, 9.0, 3.0)];
        let result = SweepStitcher.stitch(&segments, 1e-4);
        assert_eq!(result.paths.len(), 1);
        assert_eq!(result.paths[0].len(), 3);
    }
}
