//! # Layer Slicer
//!
//! Converts a triangulated surface model into an ordered sequence of 2D
//! toolpaths, one per horizontal layer, for a layer-by-layer fabrication device.
//!
//! The pipeline:
//! - Mesh model with per-facet normal and verticality angle
//! - Layer slicing: facet/plane intersection into raw segments
//! - Path stitching: tolerance-matched reassembly of segments into polylines
//! - Path reduction: removal of near-collinear points
//! - Toolpath ordering: greedy nearest-endpoint travel minimization
//! - Extrusion accounting: motion stream with filament, distance and time totals
//!
//! ## Example
//!
//! ```rust,ignore
//! use layer_slicer::{load_stl, Mesh, SlicerConfig, SlicingPipeline};
//!
//! let pipeline = SlicingPipeline::new(SlicerConfig::default())?;
//! let mut mesh = Mesh::from_triangles(&load_stl("model.stl")?);
//! pipeline.prepare_mesh(&mut mesh);
//! let print = pipeline.process(&mesh)?;
//! print.gcode().write_to_file("model.gcode")?;
//! ```

pub mod config;
pub mod gcode;
pub mod geometry;
pub mod mesh;
pub mod pipeline;
pub mod slice;
pub mod stitch;
pub mod travel;

pub use config::{SlicerConfig, StitchStrategy};
pub use gcode::{
    ExtrusionAccountant, ExtrusionSettings, ExtrusionTotals, FilamentUsage, GCode, GCodeCommand,
    GCodeWriter, MotionContext, Move,
};
pub use geometry::simplify::reduce;
pub use geometry::{BoundingBox2, BoundingBox3, Point2, Point3, Segment, SegmentPath};
pub use mesh::{load_stl, read_stl, Facet, Mesh, Triangle};
pub use pipeline::{ProcessedPrint, SlicingPipeline};
pub use slice::{Slice, SliceDiagnostics, Slices, SlicingParams};
pub use stitch::{stitcher_for, PathStitcher, StitchResult};
pub use travel::{optimize_layers, optimize_paths};

/// Coordinate type used throughout the slicer (millimetres, single precision).
pub type Coord = f32;

/// Result type used throughout the slicer.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for slicer operations.
///
/// Geometry-processing problems (degenerate facets, grazing touches, open
/// paths) are not errors; they are counted in [`SliceDiagnostics`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mesh error: {0}")]
    Mesh(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid geometry: {0}")]
    Geometry(String),
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
