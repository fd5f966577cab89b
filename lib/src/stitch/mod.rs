//! Path stitching: reassembly of a layer's unordered segments into polylines.
//!
//! Every segment contributes two *half-points* stored in a flat arena: the
//! endpoints of segment `i` live at indices `2i` and `2i + 1`, so the sibling
//! of half-point `h` is `h ^ 1`. Consumption is tracked per half-point in the
//! arena, never through shared references.
//!
//! All strategies share one growth loop ([`assemble`]): a path is seeded from
//! the first unconsumed half-point in the strategy's seed order, then extended
//! at its back end and afterwards at its front end. Each extension accepts the
//! first live half-point the strategy's index reports within Manhattan
//! distance `tolerance` of the current end, consumes it together with its
//! sibling, and appends the sibling's position. The strategies differ only in
//! how they find candidates:
//!
//! - [`SweepStitcher`]: half-points sorted by X in a doubly linked order,
//!   scanned outward while `|ΔX| <= tolerance`
//! - [`TileStitcher`]: uniform N×N grid with a one-tile margin ring, searched
//!   over the 3×3 neighbourhood (optionally pruned by the offset to the tile
//!   boundary)
//! - [`ScanStitcher`]: linear scan over all half-points, for small layers and
//!   as a reference
//!
//! Every segment is consumed exactly once. Half-points left unmatched end
//! their path as an open polyline.

mod scan;
mod sweep;
mod tiles;

pub use scan::ScanStitcher;
pub use sweep::SweepStitcher;
pub use tiles::TileStitcher;

use crate::config::StitchStrategy;
use crate::geometry::{Point2, Segment, SegmentPath};
use crate::Coord;

/// Layers with at least this many segments are stitched with the tile index
/// under [`StitchStrategy::Auto`].
pub const AUTO_TILES_THRESHOLD: usize = 4096;

/// Output of one stitching run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StitchResult {
    pub paths: Vec<SegmentPath>,
    /// Paths whose ends did not meet within tolerance.
    pub open_paths: usize,
    /// Segments used as a seed or an extension; equals the input count.
    pub segments_consumed: usize,
}

impl StitchResult {
    /// Total points over all paths.
    pub fn point_count(&self) -> usize {
        self.paths.iter().map(|p| p.len()).sum()
    }
}

/// Assembles tolerance-matched segments into paths.
pub trait PathStitcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn stitch(&self, segments: &[Segment], tolerance: Coord) -> StitchResult;
}

/// Build the stitcher for a configured strategy.
pub fn stitcher_for(strategy: StitchStrategy, tile_grid: usize) -> Box<dyn PathStitcher> {
    match strategy {
        StitchStrategy::Sweep => Box::new(SweepStitcher),
        StitchStrategy::Tiles => Box::new(TileStitcher::new(tile_grid)),
        StitchStrategy::TilesPruned => Box::new(TileStitcher::pruned(tile_grid)),
        StitchStrategy::Scan => Box::new(ScanStitcher),
        StitchStrategy::Auto => Box::new(AutoStitcher { tile_grid }),
    }
}

/// Sweep for ordinary layers, pruned tiles for very dense ones.
#[derive(Clone, Copy, Debug)]
pub struct AutoStitcher {
    pub tile_grid: usize,
}

impl PathStitcher for AutoStitcher {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn stitch(&self, segments: &[Segment], tolerance: Coord) -> StitchResult {
        if segments.len() >= AUTO_TILES_THRESHOLD {
            TileStitcher::pruned(self.tile_grid).stitch(segments, tolerance)
        } else {
            SweepStitcher.stitch(segments, tolerance)
        }
    }
}

/// Endpoint arena with per-half-point consumption flags.
pub(crate) struct HalfPoints {
    points: Vec<Point2>,
    consumed: Vec<bool>,
}

impl HalfPoints {
    pub(crate) fn new(segments: &[Segment]) -> Self {
        let points: Vec<Point2> = segments.iter().flat_map(|s| [s.a, s.b]).collect();
        let consumed = vec![false; points.len()];
        Self { points, consumed }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub(crate) fn point(&self, h: usize) -> Point2 {
        self.points[h]
    }

    #[inline]
    pub(crate) fn points(&self) -> &[Point2] {
        &self.points
    }

    #[inline]
    pub(crate) fn is_live(&self, h: usize) -> bool {
        !self.consumed[h]
    }

    /// Whether live half-point `h` matches `at` within `tolerance`.
    #[inline]
    pub(crate) fn matches(&self, h: usize, at: Point2, tolerance: Coord) -> bool {
        self.is_live(h) && self.points[h].manhattan_distance(&at) <= tolerance
    }
}

#[inline]
pub(crate) fn sibling(h: usize) -> usize {
    h ^ 1
}

/// Candidate lookup for the shared growth loop.
pub(crate) trait EndpointIndex {
    /// First live half-point within `tolerance` of half-point `from`.
    fn find(&self, halves: &HalfPoints, from: usize, tolerance: Coord) -> Option<usize>;

    /// Called once for every half-point as it is consumed.
    fn remove(&mut self, _h: usize) {}
}

/// Grow paths from `seeds` (half-point indices, in order) using `index` for lookups.
pub(crate) fn assemble<I: EndpointIndex>(
    halves: &mut HalfPoints,
    index: &mut I,
    seeds: impl IntoIterator<Item = usize>,
    tolerance: Coord,
) -> StitchResult {
    let mut result = StitchResult::default();

    for seed in seeds {
        if !halves.is_live(seed) {
            continue;
        }
        consume(halves, index, seed);
        result.segments_consumed += 1;

        let mut path = SegmentPath::from_points([halves.point(seed), halves.point(sibling(seed))]);

        let mut back = sibling(seed);
        while let Some(h) = index.find(halves, back, tolerance) {
            consume(halves, index, h);
            result.segments_consumed += 1;
            back = sibling(h);
            path.push_back(halves.point(back));
        }

        let mut front = seed;
        while let Some(h) = index.find(halves, front, tolerance) {
            consume(halves, index, h);
            result.segments_consumed += 1;
            front = sibling(h);
            path.push_front(halves.point(front));
        }

        if !path.is_closed(tolerance) {
            result.open_paths += 1;
        }
        result.paths.push(path);
    }

    result
}

/// Mark a half-point and its sibling as used.
fn consume<I: EndpointIndex>(halves: &mut HalfPoints, index: &mut I, h: usize) {
    for x in [h, sibling(h)] {
        halves.consumed[x] = true;
        index.remove(x);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn all_strategies() -> Vec<Box<dyn PathStitcher>> {
        [
            StitchStrategy::Sweep,
            StitchStrategy::Tiles,
            StitchStrategy::TilesPruned,
            StitchStrategy::Scan,
            StitchStrategy::Auto,
        ]
        .into_iter()
        .map(|s| stitcher_for(s, 8))
        .collect()
    }

    #[test]
    fn test_square_closes_for_every_strategy() {
        let edges = square_edges(1.0);
        for stitcher in all_strategies() {
            let result = stitcher.stitch(&edges, 1e-4);
            assert_conserved(&result, &edges);
            assert_eq!(result.paths.len(), 1, "{}", stitcher.name());
            assert_eq!(result.open_paths, 0, "{}", stitcher.name());
            let path = &result.paths[0];
            assert_eq!(path.len(), 5);
            assert!(path.is_closed(1e-4));
        }
    }

    #[test]
    fn test_open_chain() {
        let chain = vec![
            seg(2.0, 0.0, 3.0, 0.0),
            seg(0.0, 0.0, 1.0, 0.0),
            seg(1.0, 0.0, 2.0, 0.0),
        ];
        for stitcher in all_strategies() {
            let result = stitcher.stitch(&chain, 1e-4);
            assert_conserved(&result, &chain);
            assert_eq!(result.paths.len(), 1);
            assert_eq!(result.open_paths, 1);
            let path = &result.paths[0];
            let ends = [path.first().unwrap().x, path.last().unwrap().x];
            assert!(ends.contains(&0.0) && ends.contains(&3.0), "{}", stitcher.name());
        }
    }

    #[test]
    fn test_tolerance_matching() {
        let polygon = jittered_polygon(3.0, -2.0, 5.0, 24, 5e-4);
        for stitcher in all_strategies() {
            let loose = stitcher.stitch(&polygon, 1e-3);
            assert_conserved(&loose, &polygon);
            assert_eq!(loose.paths.len(), 1, "{}", stitcher.name());
            assert_eq!(loose.open_paths, 0, "{}", stitcher.name());

            // Below the jitter nothing joins.
            let tight = stitcher.stitch(&polygon, 1e-4);
            assert_conserved(&tight, &polygon);
            assert_eq!(tight.paths.len(), polygon.len(), "{}", stitcher.name());
            assert_eq!(tight.open_paths, polygon.len());
        }
    }

    #[test]
    fn test_separate_loops() {
        let mut segments = square_edges(1.0);
        segments.extend(jittered_polygon(10.0, 10.0, 2.0, 12, 0.0));
        segments.extend(
            square_edges(2.0)
                .into_iter()
                .map(|s| Segment::new(s.a + Point2::new(-7.0, 3.0), s.b + Point2::new(-7.0, 3.0))),
        );
        for stitcher in all_strategies() {
            let result = stitcher.stitch(&segments, 1e-4);
            assert_conserved(&result, &segments);
            assert_eq!(result.paths.len(), 3, "{}", stitcher.name());
            assert_eq!(result.open_paths, 0, "{}", stitcher.name());
        }
    }

    #[test]
    fn test_empty_and_single() {
        for stitcher in all_strategies() {
            let empty = stitcher.stitch(&[], 1e-4);
            assert!(empty.paths.is_empty());
            assert_eq!(empty.segments_consumed, 0);

            let single = [seg(0.0, 0.0, 1.0, 1.0)];
            let result = stitcher.stitch(&single, 1e-4);
            assert_eq!(result.paths.len(), 1);
            assert_eq!(result.open_paths, 1);
            assert_eq!(result.paths[0].len(), 2);
        }
    }

    #[test]
    fn test_auto_switches_to_tiles() {
        // Many small disjoint squares push the layer over the threshold.
        let mut segments = Vec::new();
        let mut i = 0;
        while segments.len() < AUTO_TILES_THRESHOLD {
            let offset = Point2::new((i % 40) as Coord * 3.0, (i / 40) as Coord * 3.0);
            segments.extend(
                square_edges(1.0)
                    .into_iter()
                    .map(|s| Segment::new(s.a + offset, s.b + offset)),
            );
            i += 1;
        }
        let auto = stitcher_for(StitchStrategy::Auto, 32).stitch(&segments, 1e-4);
        let sweep = SweepStitcher.stitch(&segments, 1e-4);
        assert_conserved(&auto, &segments);
        assert_eq!(auto.paths.len(), i);
        assert_eq!(auto.paths.len(), sweep.paths.len());
        assert_eq!(auto.open_paths, 0);
    }
}
