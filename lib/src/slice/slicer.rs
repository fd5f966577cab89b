//! Main slicing engine.

use super::mesh_slicer::{slice_facets, slice_mesh_at_z};
use super::{Slice, SliceDiagnostics, SlicingParams};
use crate::geometry::Point2;
use crate::mesh::Mesh;
use crate::stitch::{stitcher_for, PathStitcher};
use crate::travel;
use crate::Coord;
use log::{debug, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Slices a mesh into layers: facet bucketing, per-layer cutting, stitching
/// and reduction.
///
/// Layers are independent and built in parallel; each worker owns the
/// [`Slice`] it produces.
pub struct Slicer {
    params: SlicingParams,
    stitcher: Box<dyn PathStitcher>,
}

impl Slicer {
    pub fn new(params: SlicingParams) -> Self {
        let stitcher = stitcher_for(params.strategy, params.tile_grid);
        Self { params, stitcher }
    }

    pub fn params(&self) -> &SlicingParams {
        &self.params
    }

    pub fn slice<'m>(&self, mesh: &'m Mesh) -> Slices<'m> {
        self.slice_with_progress(mesh, |_, _| {})
    }

    /// Slice the mesh, reporting `(layers_done, layer_count)` as layers finish.
    pub fn slice_with_progress<'m, F>(&self, mesh: &'m Mesh, progress: F) -> Slices<'m>
    where
        F: Fn(usize, usize) + Sync,
    {
        let bounds = mesh.bounds();
        let count = if mesh.is_empty() {
            0
        } else {
            self.params.layer_count(bounds.min.z, bounds.max.z)
        };
        let zmin = bounds.min.z;
        let zmax = bounds.max.z;

        let (buckets, degenerate) = self.bucket_facets(mesh, count);
        if degenerate > 0 {
            warn!("Dropped {} degenerate facets", degenerate);
        }

        let done = AtomicUsize::new(0);
        let slices: Vec<Slice> = buckets
            .par_iter()
            .enumerate()
            .map(|(k, facet_ids)| {
                let z = self.params.layer_z(zmin, k);
                let cut = self.params.cut_height(z, zmax);
                let (segments, diagnostics) = slice_facets(
                    facet_ids.iter().map(|&i| &mesh.facets()[i]),
                    cut,
                    &self.params,
                );
                let slice = Slice::from_segments(
                    z,
                    &segments,
                    &self.params,
                    self.stitcher.as_ref(),
                    diagnostics,
                );
                debug!(
                    "Layer {} z={:.3}: {} segments -> {} paths ({} open)",
                    k,
                    z,
                    slice.segment_count(),
                    slice.path_count(),
                    slice.open_path_count()
                );
                progress(done.fetch_add(1, Ordering::Relaxed) + 1, count);
                slice
            })
            .collect();

        let mut diagnostics = SliceDiagnostics {
            degenerate_facets: degenerate,
            ..Default::default()
        };
        for slice in &slices {
            diagnostics += *slice.diagnostics();
        }
        if diagnostics.open_paths > 0 {
            warn!(
                "{} open paths over {} layers (mesh may not be watertight)",
                diagnostics.open_paths, count
            );
        }
        if diagnostics.unstable_offsets > 0 {
            warn!(
                "Dropped {} segments with non-finite coordinates",
                diagnostics.unstable_offsets
            );
        }

        Slices {
            mesh,
            params: self.params.clone(),
            slices,
            diagnostics,
        }
    }

    /// Slice a single plane at the raw height `z` (no top inset).
    pub fn slice_at(&self, mesh: &Mesh, z: Coord) -> Slice {
        let (segments, diagnostics) = slice_mesh_at_z(mesh, z, &self.params);
        Slice::from_segments(z, &segments, &self.params, self.stitcher.as_ref(), diagnostics)
    }

    /// Facet indices per layer, in facet order. Degenerate facets are left out and counted.
    fn bucket_facets(&self, mesh: &Mesh, count: usize) -> (Vec<Vec<usize>>, usize) {
        let mut buckets = vec![Vec::new(); count];
        let mut degenerate = 0;
        let zmin = mesh.bounds().min.z;

        for (i, facet) in mesh.facets().iter().enumerate() {
            if facet.is_degenerate() {
                degenerate += 1;
                continue;
            }
            let (fzmin, fzmax) = facet.z_range();
            if let Some(span) = self.params.layer_span(zmin, count, fzmin, fzmax) {
                for bucket in &mut buckets[span] {
                    bucket.push(i);
                }
            }
        }
        (buckets, degenerate)
    }
}

/// All layers of one mesh, with the parameters that produced them.
///
/// Borrows the mesh; owns its slices.
#[derive(Clone, Debug)]
pub struct Slices<'m> {
    mesh: &'m Mesh,
    params: SlicingParams,
    slices: Vec<Slice>,
    diagnostics: SliceDiagnostics,
}

impl<'m> Slices<'m> {
    pub fn mesh(&self) -> &'m Mesh {
        self.mesh
    }

    pub fn params(&self) -> &SlicingParams {
        &self.params
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn slices_mut(&mut self) -> &mut [Slice] {
        &mut self.slices
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slice> {
        self.slices.iter()
    }

    /// Raw line segments over all layers.
    pub fn segment_count(&self) -> usize {
        self.slices.iter().map(|s| s.segment_count()).sum()
    }

    pub fn path_count(&self) -> usize {
        self.slices.iter().map(|s| s.path_count()).sum()
    }

    pub fn open_path_count(&self) -> usize {
        self.diagnostics.open_paths
    }

    pub fn diagnostics(&self) -> &SliceDiagnostics {
        &self.diagnostics
    }

    /// Order paths across all layers, threading the head position from
    /// `head` through the layers in Z order. Returns the final head position.
    pub fn optimize_paths(&mut self, head: Point2) -> Point2 {
        let mut head = head;
        travel::optimize_layers(&mut self.slices, &mut head);
        head
    }
}

impl<'a, 'm> IntoIterator for &'a Slices<'m> {
    type Item = &'a Slice;
    type IntoIter = std::slice::Iter<'a, Slice>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.iter()
    }
}
