//! Quadratic reference stitcher: every lookup scans all half-points.

use super::{assemble, EndpointIndex, HalfPoints, PathStitcher, StitchResult};
use crate::geometry::Segment;
use crate::Coord;

#[derive(Clone, Copy, Debug, Default)]
pub struct ScanStitcher;

impl PathStitcher for ScanStitcher {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn stitch(&self, segments: &[Segment], tolerance: Coord) -> StitchResult {
        let mut halves = HalfPoints::new(segments);
        let seeds = 0..halves.len();
        assemble(&mut halves, &mut LinearIndex, seeds, tolerance)
    }
}

struct LinearIndex;

impl EndpointIndex for LinearIndex {
    fn find(&self, halves: &HalfPoints, from: usize, tolerance: Coord) -> Option<usize> {
        let at = halves.point(from);
        (0..halves.len()).find(|&h| halves.matches(h, at, tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::stitch::SweepStitcher;

    #[test]
    fn test_agrees_with_sweep_on_path_count() {
        let mut segments = jittered_polygon(0.0, 0.0, 3.0, 30, 2e-5);
        segments.extend([seg(10.0, 10.0, 11.0, 10.0), seg(11.0, 10.0, 11.0, 12.0)]);
        let scan = ScanStitcher.stitch(&segments, 1e-4);
        let sweep = SweepStitcher.stitch(&segments, 1e-4);
        assert_conserved(&scan, &segments);
        assert_eq!(scan.paths.len(), 2);
        assert_eq!(scan.paths.len(), sweep.paths.len());
        assert_eq!(scan.open_paths, 1);
        assert_eq!(sweep.open_paths, 1);
    }
}
