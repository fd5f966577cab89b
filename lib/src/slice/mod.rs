//! Slicing module - converts meshes into layers.
//!
//! This module contains the core slicing functionality:
//! - [`Slicer`] - Main slicing engine
//! - [`Slice`] - A single layer and its paths
//! - [`Slices`] - All layers of one mesh
//! - [`SlicingParams`] - Configuration for the slicing process
//! - [`mesh_slicer`] - Low-level facet/plane intersection

mod layer;
pub mod mesh_slicer;
mod slicer;
mod slicing_params;

pub use layer::{Slice, SliceDiagnostics};
pub use mesh_slicer::{intersect_facet, slice_mesh_at_z, FacetCut};
pub use slicer::{Slicer, Slices};
pub use slicing_params::SlicingParams;
