//! Pipeline module - orchestrates the complete slicing process.
//!
//! mesh → layers (parallel) → ordered paths → motion stream → G-code
//!
//! # Example
//!
//! ```rust,ignore
//! use layer_slicer::{load_stl, Mesh, SlicerConfig, SlicingPipeline};
//!
//! let pipeline = SlicingPipeline::new(SlicerConfig::default())?;
//! let mut mesh = Mesh::from_triangles(&load_stl("part.stl")?);
//! pipeline.prepare_mesh(&mut mesh);
//!
//! let print = pipeline.process(&mesh)?;
//! print.gcode().write_to_file("part.gcode")?;
//! ```

use crate::config::SlicerConfig;
use crate::gcode::{ExtrusionAccountant, ExtrusionTotals, GCode, GCodeWriter, MotionContext, Move};
use crate::geometry::Point2;
use crate::mesh::Mesh;
use crate::slice::{Slicer, Slices, SlicingParams};
use crate::Result;
use log::{debug, info};

/// Runs a configured slicing job from mesh to G-code.
pub struct SlicingPipeline {
    config: SlicerConfig,
    slicer: Slicer,
    accountant: ExtrusionAccountant,
}

impl SlicingPipeline {
    /// Create a pipeline. Fails on invalid configuration, before any mesh
    /// is touched.
    pub fn new(config: SlicerConfig) -> Result<Self> {
        config.validate()?;
        let slicer = Slicer::new(SlicingParams::from_config(&config)?);
        let accountant = ExtrusionAccountant::from_config(&config)?;
        Ok(Self {
            config,
            slicer,
            accountant,
        })
    }

    pub fn config(&self) -> &SlicerConfig {
        &self.config
    }

    pub fn slicer(&self) -> &Slicer {
        &self.slicer
    }

    pub fn accountant(&self) -> &ExtrusionAccountant {
        &self.accountant
    }

    /// Place the mesh for printing: center it over the origin with its
    /// bottom at Z 0, then apply the configured scale.
    pub fn prepare_mesh(&self, mesh: &mut Mesh) {
        mesh.shift_center();
        if self.config.scale != 1.0 {
            mesh.scale(self.config.scale);
        }
        debug!("{}", mesh);
    }

    /// Process a mesh through the complete pipeline.
    pub fn process<'m>(&self, mesh: &'m Mesh) -> Result<ProcessedPrint<'m>> {
        self.process_with_callback(mesh, |_, _| {})
    }

    /// Process a mesh with a progress callback.
    ///
    /// The callback receives (stage_name, progress_0_to_1). Slicing progress
    /// is reported from worker threads.
    pub fn process_with_callback<'m, F>(
        &self,
        mesh: &'m Mesh,
        callback: F,
    ) -> Result<ProcessedPrint<'m>>
    where
        F: Fn(&str, f32) + Sync,
    {
        callback("slicing", 0.0);
        let mut slices = self.slicer.slice_with_progress(mesh, |done, total| {
            if total > 0 {
                callback("slicing", done as f32 / total as f32);
            }
        });
        callback("slicing", 1.0);

        callback("ordering", 0.0);
        let head = slices.optimize_paths(Point2::zero());
        debug!("Travel optimization finished at {}", head);
        callback("ordering", 1.0);

        callback("gcode", 0.0);
        let motion = self.accountant.account(&slices);
        let mut writer = GCodeWriter::from_config(&self.config)?;
        writer.write_moves(&motion.moves);
        let gcode = writer.finish(motion.totals);
        callback("gcode", 1.0);

        info!(
            "Sliced {} facets into {} layers: {} segments, {} paths ({} open)",
            mesh.facet_count(),
            slices.len(),
            slices.segment_count(),
            slices.path_count(),
            slices.open_path_count()
        );
        info!("Filament usage: {}", gcode.usage());
        info!("{}", motion.totals);

        Ok(ProcessedPrint {
            slices,
            motion,
            gcode,
        })
    }
}

/// Everything one pipeline run produced.
pub struct ProcessedPrint<'m> {
    slices: Slices<'m>,
    motion: MotionContext,
    gcode: GCode,
}

impl<'m> ProcessedPrint<'m> {
    /// Layers with their paths in print order.
    pub fn slices(&self) -> &Slices<'m> {
        &self.slices
    }

    pub fn layer_count(&self) -> usize {
        self.slices.len()
    }

    pub fn moves(&self) -> &[Move] {
        &self.motion.moves
    }

    pub fn totals(&self) -> &ExtrusionTotals {
        &self.motion.totals
    }

    pub fn gcode(&self) -> &GCode {
        &self.gcode
    }

    pub fn into_gcode(self) -> GCode {
        self.gcode
    }

    /// Human-readable run summary.
    pub fn summary(&self) -> String {
        let mesh = self.slices.mesh();
        format!(
            "Filament usage: {}\n{}\nMesh facets    {}\nLayers         {}\nLine segments  {}\nPaths          {} ({} open)\nPrint time     {:.0} s",
            self.gcode.usage(),
            mesh,
            mesh.facet_count(),
            self.slices.len(),
            self.slices.segment_count(),
            self.slices.path_count(),
            self.slices.open_path_count(),
            self.motion.totals.time_s
        )
    }
}
