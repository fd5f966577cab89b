//! Extrusion accounting.
//!
//! The accountant turns ordered paths into a stream of typed moves and keeps
//! running totals for one print: filament extruded, travel and extrusion
//! distance, and estimated time. All mutable state lives in a
//! [`MotionContext`] that the caller passes to each operation; the
//! accountant itself only holds settings.
//!
//! Extrusion is volume-conserving: a step of length `d` deposits a bead of
//! cross-section `layer_height * wall_thickness`, which consumes
//! `d * layer_height * wall_thickness / (pi * (filament_diameter / 2)^2)`
//! millimetres of filament.

use crate::config::SlicerConfig;
use crate::geometry::{BoundingBox2, Point2, SegmentPath};
use crate::slice::{Slice, Slices};
use crate::{Coord, Error, Result};
use std::f32::consts::PI;
use std::fmt;

/// PLA density (g/cm³).
const PLA_DENSITY: Coord = 1.27;
/// ABS density (g/cm³).
const ABS_DENSITY: Coord = 1.05;

/// One motion primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Move {
    /// Non-extruding XY move.
    TravelTo { x: Coord, y: Coord },
    /// Non-extruding Z move.
    TravelToZ { z: Coord },
    /// Extruding XY move; `e` is the total filament extruded after the move.
    ExtrudeTo { x: Coord, y: Coord, e: Coord },
    /// Z move at print feed rate, no filament.
    ExtrudeToZ { z: Coord },
}

/// Machine and material settings used for accounting.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtrusionSettings {
    /// Layer thickness (mm).
    pub layer_height: Coord,
    pub wall_thickness: Coord,
    pub filament_diameter: Coord,
    /// Extrusion feed rate (mm/s).
    pub print_speed: Coord,
    /// Travel feed rate (mm/s).
    pub travel_speed: Coord,
    /// Emit a rectangular frame around the model before the first layer.
    pub print_perimeter: bool,
    pub frame_margin: Coord,
}

impl ExtrusionSettings {
    pub fn from_config(config: &SlicerConfig) -> Result<Self> {
        let settings = Self {
            layer_height: config.layer_height,
            wall_thickness: config.wall_thickness,
            filament_diameter: config.filament_diameter,
            print_speed: config.print_speed,
            travel_speed: config.travel_speed,
            print_perimeter: config.print_perimeter,
            frame_margin: config.frame_margin,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        for (value, what) in [
            (self.layer_height, "Layer height"),
            (self.wall_thickness, "Wall thickness"),
            (self.filament_diameter, "Filament diameter"),
            (self.print_speed, "Print speed"),
            (self.travel_speed, "Travel speed"),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!(
                    "{} must be positive, got {}",
                    what, value
                )));
            }
        }
        if !(self.frame_margin.is_finite() && self.frame_margin >= 0.0) {
            return Err(Error::Config(format!(
                "Frame margin must be non-negative, got {}",
                self.frame_margin
            )));
        }
        Ok(())
    }

    /// Filament cross-section area (mm²).
    #[inline]
    pub fn filament_area(&self) -> Coord {
        let r = self.filament_diameter / 2.0;
        PI * r * r
    }

    /// Filament length consumed per millimetre of extrusion move.
    #[inline]
    pub fn e_per_mm(&self) -> Coord {
        self.layer_height * self.wall_thickness / self.filament_area()
    }

    pub fn travel_feed_mm_min(&self) -> Coord {
        self.travel_speed * 60.0
    }

    pub fn print_feed_mm_min(&self) -> Coord {
        self.print_speed * 60.0
    }

    /// Filament consumption implied by `totals`.
    pub fn filament_usage(&self, totals: &ExtrusionTotals) -> FilamentUsage {
        let volume_cc = totals.extruded * self.filament_area() / 1000.0;
        FilamentUsage {
            length_m: totals.extruded / 1000.0,
            volume_cc,
            pla_grams: volume_cc * PLA_DENSITY,
            abs_grams: volume_cc * ABS_DENSITY,
        }
    }
}

impl Default for ExtrusionSettings {
    fn default() -> Self {
        Self {
            layer_height: 0.2,
            wall_thickness: 0.5,
            filament_diameter: 1.75,
            print_speed: 30.0,
            travel_speed: 150.0,
            print_perimeter: true,
            frame_margin: 6.0,
        }
    }
}

/// Running totals of one accounting run. Every field only grows.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExtrusionTotals {
    /// Filament extruded (mm).
    pub extruded: Coord,
    /// Distance covered by non-extruding and Z moves (mm).
    pub travel_distance: Coord,
    /// Distance covered while extruding (mm).
    pub extrusion_distance: Coord,
    /// Estimated time (s).
    pub time_s: Coord,
}

impl fmt::Display for ExtrusionTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "extruded {:.1}mm, travel {:.1}mm, print {:.1}mm, {:.0}s",
            self.extruded, self.travel_distance, self.extrusion_distance, self.time_s
        )
    }
}

/// Filament consumption summary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilamentUsage {
    pub length_m: Coord,
    pub volume_cc: Coord,
    pub pla_grams: Coord,
    pub abs_grams: Coord,
}

impl fmt::Display for FilamentUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} m, {:.1} cc, {:.1} gram PLA, {:.1} gram ABS",
            self.length_m, self.volume_cc, self.pla_grams, self.abs_grams
        )
    }
}

/// Mutable state of one accounting run: head position, totals and the
/// moves emitted so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MotionContext {
    pub position: Point2,
    pub z: Coord,
    pub totals: ExtrusionTotals,
    pub moves: Vec<Move>,
}

impl MotionContext {
    /// A context with the head at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context with the head at `position`, height 0.
    pub fn at(position: Point2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn totals(&self) -> &ExtrusionTotals {
        &self.totals
    }
}

/// Emits moves for ordered paths and accumulates their cost.
#[derive(Clone, Debug)]
pub struct ExtrusionAccountant {
    settings: ExtrusionSettings,
    e_per_mm: Coord,
}

impl ExtrusionAccountant {
    pub fn new(settings: ExtrusionSettings) -> Result<Self> {
        settings.validate()?;
        let e_per_mm = settings.e_per_mm();
        Ok(Self { settings, e_per_mm })
    }

    pub fn from_config(config: &SlicerConfig) -> Result<Self> {
        Self::new(ExtrusionSettings::from_config(config)?)
    }

    pub fn settings(&self) -> &ExtrusionSettings {
        &self.settings
    }

    #[inline]
    pub fn e_per_mm(&self) -> Coord {
        self.e_per_mm
    }

    pub fn travel_to(&self, ctx: &mut MotionContext, to: Point2) {
        let d = ctx.position.distance(&to);
        ctx.totals.travel_distance += d;
        ctx.totals.time_s += d / self.settings.travel_speed;
        ctx.position = to;
        ctx.moves.push(Move::TravelTo { x: to.x, y: to.y });
    }

    pub fn extrude_to(&self, ctx: &mut MotionContext, to: Point2) {
        let d = ctx.position.distance(&to);
        ctx.totals.extruded += d * self.e_per_mm;
        ctx.totals.extrusion_distance += d;
        ctx.totals.time_s += d / self.settings.print_speed;
        ctx.position = to;
        ctx.moves.push(Move::ExtrudeTo {
            x: to.x,
            y: to.y,
            e: ctx.totals.extruded,
        });
    }

    pub fn travel_to_z(&self, ctx: &mut MotionContext, z: Coord) {
        let d = (z - ctx.z).abs();
        ctx.totals.travel_distance += d;
        ctx.totals.time_s += d / self.settings.travel_speed;
        ctx.z = z;
        ctx.moves.push(Move::TravelToZ { z });
    }

    /// Z move at print feed rate. Counts as travel distance; no filament.
    pub fn extrude_to_z(&self, ctx: &mut MotionContext, z: Coord) {
        let d = (z - ctx.z).abs();
        ctx.totals.travel_distance += d;
        ctx.totals.time_s += d / self.settings.print_speed;
        ctx.z = z;
        ctx.moves.push(Move::ExtrudeToZ { z });
    }

    /// Travel to the path's first point, then extrude along the rest.
    pub fn append_path(&self, ctx: &mut MotionContext, path: &SegmentPath) {
        let mut points = path.iter();
        let Some(&first) = points.next() else {
            return;
        };
        self.travel_to(ctx, first);
        for &p in points {
            self.extrude_to(ctx, p);
        }
    }

    pub fn append_slice(&self, ctx: &mut MotionContext, slice: &Slice) {
        self.extrude_to_z(ctx, slice.z());
        for path in slice.paths() {
            self.append_path(ctx, path);
        }
    }

    /// Extrude a rectangle `frame_margin` outside `footprint` at Z 0.
    pub fn append_frame(&self, ctx: &mut MotionContext, footprint: &BoundingBox2) {
        if footprint.is_empty() {
            return;
        }
        let m = self.settings.frame_margin;
        let (x0, y0) = (footprint.min.x - m, footprint.min.y - m);
        let (x1, y1) = (footprint.max.x + m, footprint.max.y + m);

        self.travel_to_z(ctx, 0.0);
        self.travel_to(ctx, Point2::new(x0, y0));
        for corner in [
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
            Point2::new(x0, y0),
        ] {
            self.extrude_to(ctx, corner);
        }
    }

    /// Account every layer in order, preceded by the frame when enabled.
    pub fn append_slices(&self, ctx: &mut MotionContext, slices: &[Slice], footprint: &BoundingBox2) {
        if self.settings.print_perimeter && !slices.is_empty() {
            self.append_frame(ctx, footprint);
        }
        for slice in slices {
            self.append_slice(ctx, slice);
        }
    }

    /// Account a whole sliced mesh in a fresh context starting at the origin.
    pub fn account(&self, slices: &Slices<'_>) -> MotionContext {
        let mut ctx = MotionContext::new();
        let footprint = slices.mesh().bounds().xy();
        self.append_slices(&mut ctx, slices.slices(), &footprint);
        ctx
    }
}
