//! Spatial-tile stitcher.
//!
//! The layer's bounding box is split into an N×N grid of equal tiles,
//! surrounded by one empty margin ring so every 3×3 neighbourhood lookup stays
//! in bounds. Tiles are never narrower than the tolerance, which guarantees
//! that a match for a point lies in its own tile or an adjacent one. Tile
//! contents are stored in compressed rows (one offset per tile into a flat
//! array of half-point indices).

use super::{assemble, EndpointIndex, HalfPoints, PathStitcher, StitchResult};
use crate::geometry::{BoundingBox2, Point2, Segment};
use crate::Coord;

/// Relative widening of the tile size over the tolerance, so rounding in the
/// tile index computation cannot split a matching pair across two tiles.
const TILE_PADDING: Coord = 1e-3;
const MIN_TILE_SIZE: Coord = 1e-6;

/// Stitcher backed by a uniform tile grid.
#[derive(Clone, Copy, Debug)]
pub struct TileStitcher {
    grid: usize,
    prune: bool,
}

impl TileStitcher {
    /// Full 3×3 neighbourhood search on an `grid`×`grid` index.
    pub fn new(grid: usize) -> Self {
        Self {
            grid: grid.max(1),
            prune: false,
        }
    }

    /// Skip neighbour tiles farther than the tolerance from the query point.
    pub fn pruned(grid: usize) -> Self {
        Self {
            prune: true,
            ..Self::new(grid)
        }
    }
}

impl PathStitcher for TileStitcher {
    fn name(&self) -> &'static str {
        if self.prune {
            "tiles-pruned"
        } else {
            "tiles"
        }
    }

    fn stitch(&self, segments: &[Segment], tolerance: Coord) -> StitchResult {
        let mut halves = HalfPoints::new(segments);
        let mut index = TileIndex::new(&halves, self.grid, tolerance, self.prune);
        let seeds = 0..halves.len();
        assemble(&mut halves, &mut index, seeds, tolerance)
    }
}

struct TileIndex {
    grid: usize,
    /// Tiles per row including the margin ring.
    stride: usize,
    origin: Point2,
    tile_w: Coord,
    tile_h: Coord,
    prune: bool,
    /// Start of each tile's entries in `entries`; one extra trailing offset.
    offsets: Vec<usize>,
    entries: Vec<usize>,
}

impl TileIndex {
    fn new(halves: &HalfPoints, grid: usize, tolerance: Coord, prune: bool) -> Self {
        let bounds = BoundingBox2::from_points(halves.points());
        let origin = if bounds.is_empty() {
            Point2::zero()
        } else {
            bounds.min
        };
        let size = |extent: Coord| {
            (extent.max(0.0) / grid as Coord)
                .max(tolerance * (1.0 + TILE_PADDING))
                .max(MIN_TILE_SIZE)
        };
        let stride = grid + 2;

        let mut index = Self {
            grid,
            stride,
            origin,
            tile_w: size(bounds.width()),
            tile_h: size(bounds.height()),
            prune,
            offsets: vec![0; stride * stride + 1],
            entries: vec![0; halves.len()],
        };

        // Counting pass, prefix sums, then placement.
        let tiles: Vec<usize> = halves.points().iter().map(|p| index.tile_of(*p)).collect();
        for &t in &tiles {
            index.offsets[t + 1] += 1;
        }
        for t in 0..stride * stride {
            index.offsets[t + 1] += index.offsets[t];
        }
        let mut cursor = index.offsets.clone();
        for (h, &t) in tiles.iter().enumerate() {
            index.entries[cursor[t]] = h;
            cursor[t] += 1;
        }
        index
    }

    /// Column/row of a point, in `1..=grid`.
    fn cell(&self, p: Point2) -> (usize, usize) {
        let clamp = |v: Coord| (v.floor().max(0.0) as usize + 1).min(self.grid);
        (
            clamp((p.x - self.origin.x) / self.tile_w),
            clamp((p.y - self.origin.y) / self.tile_h),
        )
    }

    fn tile_of(&self, p: Point2) -> usize {
        let (cx, cy) = self.cell(p);
        cy * self.stride + cx
    }

    fn tile_entries(&self, tile: usize) -> &[usize] {
        &self.entries[self.offsets[tile]..self.offsets[tile + 1]]
    }

    /// Whether the neighbour in direction `d` (-1, 0, 1) can hold a point
    /// within `tolerance` of `offset`, the point's offset into its own tile
    /// of size `size`.
    fn reachable(&self, d: isize, offset: Coord, size: Coord, tolerance: Coord) -> bool {
        if !self.prune {
            return true;
        }
        // Tile index rounding may place a point slightly past its boundary.
        let slack = size * TILE_PADDING;
        match d {
            -1 => offset <= tolerance + slack,
            1 => size - offset <= tolerance + slack,
            _ => true,
        }
    }
}

impl EndpointIndex for TileIndex {
    fn find(&self, halves: &HalfPoints, from: usize, tolerance: Coord) -> Option<usize> {
        let at = halves.point(from);
        let (cx, cy) = self.cell(at);
        let off_x = at.x - self.origin.x - (cx - 1) as Coord * self.tile_w;
        let off_y = at.y - self.origin.y - (cy - 1) as Coord * self.tile_h;

        for dy in -1isize..=1 {
            if !self.reachable(dy, off_y, self.tile_h, tolerance) {
                continue;
            }
            for dx in -1isize..=1 {
                if !self.reachable(dx, off_x, self.tile_w, tolerance) {
                    continue;
                }
                let tx = (cx as isize + dx) as usize;
                let ty = (cy as isize + dy) as usize;
                let tile = ty * self.stride + tx;
                if let Some(&h) = self
                    .tile_entries(tile)
                    .iter()
                    .find(|&&h| halves.matches(h, at, tolerance))
                {
                    return Some(h);
                }
            }
        }
        None
    }
}
