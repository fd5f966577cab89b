//! A single layer of the sliced model.

use super::SlicingParams;
use crate::geometry::{reduce, rotate_to_corner, Point2, Segment, SegmentPath};
use crate::stitch::PathStitcher;
use crate::travel;
use crate::Coord;
use std::ops::AddAssign;

/// Counters for geometry problems that were skipped rather than reported as errors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SliceDiagnostics {
    /// Zero-area facets of the mesh, counted once per slicing call rather
    /// than once per plane. Per-layer counters of a full run leave it at zero.
    pub degenerate_facets: usize,
    /// Cuts whose two crossing points coincided.
    pub grazing_touches: usize,
    /// Segments dropped because a coordinate or offset was not finite.
    pub unstable_offsets: usize,
    /// Stitched paths whose ends did not meet.
    pub open_paths: usize,
}

impl SliceDiagnostics {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for SliceDiagnostics {
    fn add_assign(&mut self, other: Self) {
        self.degenerate_facets += other.degenerate_facets;
        self.grazing_touches += other.grazing_touches;
        self.unstable_offsets += other.unstable_offsets;
        self.open_paths += other.open_paths;
    }
}

/// One horizontal layer: its height and its final paths.
///
/// The raw segments only live while the layer is built; the layer keeps
/// their count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Slice {
    z: Coord,
    paths: Vec<SegmentPath>,
    segment_count: usize,
    diagnostics: SliceDiagnostics,
}

impl Slice {
    /// Stitch and reduce a layer's raw segments.
    ///
    /// Closed loops are restarted at a corner first, so the seam of a loop
    /// seeded mid-edge does not survive reduction.
    pub fn from_segments(
        z: Coord,
        segments: &[Segment],
        params: &SlicingParams,
        stitcher: &dyn PathStitcher,
        mut diagnostics: SliceDiagnostics,
    ) -> Self {
        let stitched = stitcher.stitch(segments, params.tolerance);
        debug_assert_eq!(stitched.segments_consumed, segments.len());

        let mut paths = stitched.paths;
        for path in &mut paths {
            rotate_to_corner(path, params.tolerance);
            reduce(path, params.tolerance);
        }
        diagnostics.open_paths += stitched.open_paths;

        Self {
            z,
            paths,
            segment_count: segments.len(),
            diagnostics,
        }
    }

    /// A layer built directly from finished paths.
    pub fn from_paths(z: Coord, paths: Vec<SegmentPath>) -> Self {
        Self {
            z,
            paths,
            segment_count: 0,
            diagnostics: SliceDiagnostics::default(),
        }
    }

    #[inline]
    pub fn z(&self) -> Coord {
        self.z
    }

    #[inline]
    pub fn paths(&self) -> &[SegmentPath] {
        &self.paths
    }

    #[inline]
    pub fn paths_mut(&mut self) -> &mut Vec<SegmentPath> {
        &mut self.paths
    }

    /// Raw segments this layer was stitched from.
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    #[inline]
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    pub fn open_path_count(&self) -> usize {
        self.diagnostics.open_paths
    }

    pub fn point_count(&self) -> usize {
        self.paths.iter().map(|p| p.len()).sum()
    }

    #[inline]
    pub fn diagnostics(&self) -> &SliceDiagnostics {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Reorder and orient the paths for minimal travel from `head`; see
    /// [`travel::optimize_paths`].
    pub fn optimize_paths(&mut self, head: &mut Point2) {
        travel::optimize_paths(&mut self.paths, head);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stitch::{ScanStitcher, SweepStitcher};

    #[test]
    fn test_from_segments_stitches_and_reduces() {
        let segments = vec![
            Segment::from_coords(0.0, 0.0, 1.0, 0.0),
            Segment::from_coords(1.0, 0.0, 2.0, 0.0),
            Segment::from_coords(2.0, 0.0, 2.0, 2.0),
            Segment::from_coords(2.0, 2.0, 0.0, 2.0),
            Segment::from_coords(0.0, 2.0, 0.0, 0.0),
        ];
        let params = SlicingParams::new(0.2, 1e-4, 0.0).unwrap();
        let slice = Slice::from_segments(
            0.4,
            &segments,
            &params,
            &SweepStitcher,
            SliceDiagnostics::default(),
        );
        assert_eq!(slice.z(), 0.4);
        assert_eq!(slice.segment_count(), 5);
        assert_eq!(slice.path_count(), 1);
        assert_eq!(slice.open_path_count(), 0);
        // The midpoint of the bottom edge is reduced away.
        assert_eq!(slice.point_count(), 5);
    }

    #[test]
    fn test_loop_seeded_mid_edge_reduces_to_corners() {
        // The first segment starts halfway along the bottom edge, so the
        // stitched loop's seam lies mid-edge.
        let segments = vec![
            Segment::from_coords(1.0, 0.0, 2.0, 0.0),
            Segment::from_coords(2.0, 0.0, 2.0, 2.0),
            Segment::from_coords(2.0, 2.0, 0.0, 2.0),
            Segment::from_coords(0.0, 2.0, 0.0, 0.0),
            Segment::from_coords(0.0, 0.0, 1.0, 0.0),
        ];
        let params = SlicingParams::new(0.2, 1e-4, 0.0).unwrap();
        let slice = Slice::from_segments(
            0.0,
            &segments,
            &params,
            &ScanStitcher,
            SliceDiagnostics::default(),
        );
        assert_eq!(slice.path_count(), 1);
        let path = &slice.paths()[0];
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), path.last());
        assert!(path.iter().all(|p| p.x != 1.0));
    }

    #[test]
    fn test_diagnostics_accumulate() {
        let mut total = SliceDiagnostics::default();
        assert!(total.is_clean());
        total += SliceDiagnostics {
            degenerate_facets: 1,
            open_paths: 2,
            ..Default::default()
        };
        total += SliceDiagnostics {
            open_paths: 1,
            grazing_touches: 4,
            ..Default::default()
        };
        assert_eq!(total.open_paths, 3);
        assert_eq!(total.grazing_touches, 4);
        assert!(!total.is_clean());
    }
}
