//! Slicer configuration types.
//!
//! [`SlicerConfig`] is the single configuration surface consumed by the
//! slicing core and the extrusion accountant. It is plain data with builder
//! methods, (de)serialized as JSON, and checked by [`SlicerConfig::validate`]
//! before any layer is processed.

use crate::{Coord, Error, Result};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Start block emitted before the first move.
pub const DEFAULT_GCODE_HEADER: &str = "\
;==============================================================
; START header
;==============================================================
M104 S200                 ; extrusion temperature (no wait)
M190 S60                  ; wait for bed temperature to reach target temp
M109 S200                 ; extrusion temperature and wait
M117 Homing...
G21                       ; metric values
G90                       ; absolute positioning
M107                      ; start with the fan off
G28                       ; move to endstops
G92 E0                    ; zero the extruded length
G1 F200 E3                ; extrude 3mm of feed stock
G92 E0                    ; zero the extruded length again
G1 F9000 Z1               ; move print head down fast

M82                       ; absolute extrusion mode

M117 Printing...
;==============================================================
; END header
;==============================================================";

/// End block emitted after the last move.
pub const DEFAULT_GCODE_FOOTER: &str = "\
;==============================================================
; START footer
;==============================================================
M104 S0                       ; extruder heater off
M140 S0                       ; bed heater off
G91                           ; relative positioning
M83                           ; relative extrusion mode
G0 E-1 F300                   ; retract a bit before lifting the nozzle
G0 Z+0.5 E-5 X-20 Y-20 F9000  ; lift Z and retract further
G28                           ; move to endstops
M84                           ; steppers off
G90                           ; absolute positioning
M107                          ; fan off
;==============================================================
; END footer
;==============================================================";

/// Segment stitching algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StitchStrategy {
    /// X-sorted sweep over half-points.
    Sweep,
    /// Uniform N×N tile index, full 3×3 neighbourhood search.
    Tiles,
    /// Tile index skipping neighbour tiles out of tolerance reach.
    TilesPruned,
    /// Quadratic endpoint scan; only sensible for small layers.
    Scan,
    /// Pick a strategy per layer from its segment count.
    #[default]
    Auto,
}

impl StitchStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            StitchStrategy::Sweep => "sweep",
            StitchStrategy::Tiles => "tiles",
            StitchStrategy::TilesPruned => "tiles-pruned",
            StitchStrategy::Scan => "scan",
            StitchStrategy::Auto => "auto",
        }
    }
}

impl fmt::Display for StitchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StitchStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sweep" => Ok(StitchStrategy::Sweep),
            "tiles" | "tile" => Ok(StitchStrategy::Tiles),
            "tiles-pruned" | "pruned" => Ok(StitchStrategy::TilesPruned),
            "scan" => Ok(StitchStrategy::Scan),
            "auto" => Ok(StitchStrategy::Auto),
            other => Err(format!(
                "unknown stitch strategy '{}' (expected sweep, tiles, tiles-pruned, scan or auto)",
                other
            )),
        }
    }
}

/// Settings for one slicing run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicerConfig {
    // === Model ===
    /// Scale factor applied to the mesh before slicing.
    pub scale: Coord,

    // === Slicing ===
    /// Layer thickness / Z step (mm).
    pub layer_height: Coord,
    /// Endpoint matching and reduction tolerance (mm).
    pub stitch_tolerance: Coord,
    /// Facets whose verticality angle is below this (radians) are printed as a double line.
    /// Zero disables double lines.
    pub z_angle_threshold: Coord,
    /// Distance between the two lines of a double line (mm).
    pub double_line_separation: Coord,
    pub stitch_strategy: StitchStrategy,
    /// Tiles per side for the tiled stitchers.
    pub tile_grid: usize,

    // === Extrusion ===
    /// Filament diameter (mm).
    pub filament_diameter: Coord,
    /// Printed wall thickness (mm).
    pub wall_thickness: Coord,
    /// Extrusion feed rate (mm/s).
    pub print_speed: Coord,
    /// Travel feed rate (mm/s).
    pub travel_speed: Coord,

    // === Output ===
    /// Print a rectangular frame around the model on the first layer.
    pub print_perimeter: bool,
    /// Frame distance outside the model footprint (mm).
    pub frame_margin: Coord,
    pub gcode_header: String,
    pub gcode_footer: String,
}

impl SlicerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: SlicerConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder method: set layer height.
    pub fn layer_height(mut self, height: Coord) -> Self {
        self.layer_height = height;
        self
    }

    pub fn stitch_tolerance(mut self, tolerance: Coord) -> Self {
        self.stitch_tolerance = tolerance;
        self
    }

    /// Builder method: set the verticality threshold in radians.
    pub fn z_angle_threshold(mut self, radians: Coord) -> Self {
        self.z_angle_threshold = radians;
        self
    }

    pub fn double_line_separation(mut self, separation: Coord) -> Self {
        self.double_line_separation = separation;
        self
    }

    pub fn stitch_strategy(mut self, strategy: StitchStrategy) -> Self {
        self.stitch_strategy = strategy;
        self
    }

    pub fn scale(mut self, factor: Coord) -> Self {
        self.scale = factor;
        self
    }

    pub fn filament_diameter(mut self, diameter: Coord) -> Self {
        self.filament_diameter = diameter;
        self
    }

    pub fn wall_thickness(mut self, thickness: Coord) -> Self {
        self.wall_thickness = thickness;
        self
    }

    pub fn print_speed(mut self, speed: Coord) -> Self {
        self.print_speed = speed;
        self
    }

    pub fn travel_speed(mut self, speed: Coord) -> Self {
        self.travel_speed = speed;
        self
    }

    pub fn print_perimeter(mut self, enabled: bool) -> Self {
        self.print_perimeter = enabled;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        fn positive(value: Coord, what: &str) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::Config(format!("{} must be positive, got {}", what, value)))
            }
        }

        positive(self.scale, "Scale factor")?;
        positive(self.layer_height, "Layer height")?;
        positive(self.filament_diameter, "Filament diameter")?;
        positive(self.wall_thickness, "Wall thickness")?;
        positive(self.print_speed, "Print speed")?;
        positive(self.travel_speed, "Travel speed")?;

        if !(self.stitch_tolerance.is_finite() && self.stitch_tolerance >= 0.0) {
            return Err(Error::Config(format!(
                "Stitch tolerance must be non-negative, got {}",
                self.stitch_tolerance
            )));
        }
        if !(0.0..=FRAC_PI_2).contains(&self.z_angle_threshold) {
            return Err(Error::Config(format!(
                "Z angle threshold must lie in [0, pi/2] radians, got {}",
                self.z_angle_threshold
            )));
        }
        if !(self.double_line_separation.is_finite() && self.double_line_separation >= 0.0) {
            return Err(Error::Config(format!(
                "Double line separation must be non-negative, got {}",
                self.double_line_separation
            )));
        }
        if !(self.frame_margin.is_finite() && self.frame_margin >= 0.0) {
            return Err(Error::Config(format!(
                "Frame margin must be non-negative, got {}",
                self.frame_margin
            )));
        }
        if self.tile_grid == 0 {
            return Err(Error::Config("Tile grid must have at least one tile".into()));
        }
        Ok(())
    }
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,

            layer_height: 0.2,
            stitch_tolerance: 1e-4,
            z_angle_threshold: FRAC_PI_4,
            double_line_separation: 0.5,
            stitch_strategy: StitchStrategy::Auto,
            tile_grid: 64,

            filament_diameter: 1.75,
            wall_thickness: 0.5,
            print_speed: 30.0,
            travel_speed: 150.0,

            print_perimeter: true,
            frame_margin: 6.0,
            gcode_header: DEFAULT_GCODE_HEADER.to_string(),
            gcode_footer: DEFAULT_GCODE_FOOTER.to_string(),
        }
    }
}

impl fmt::Display for SlicerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SlicerConfig(layer={:.2}mm, tol={}mm, angle={:.1}deg, stitch={})",
            self.layer_height,
            self.stitch_tolerance,
            self.z_angle_threshold.to_degrees(),
            self.stitch_strategy
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slicer_config_default() {
        let config = SlicerConfig::default();
        assert!((config.layer_height - 0.2).abs() < 1e-6);
        assert!((config.z_angle_threshold - FRAC_PI_4).abs() < 1e-6);
        assert_eq!(config.stitch_strategy, StitchStrategy::Auto);
        assert!(config.print_perimeter);
        assert!(config.gcode_header.contains("M82"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_slicer_config_builder() {
        let config = SlicerConfig::new()
            .layer_height(0.3)
            .stitch_tolerance(0.01)
            .stitch_strategy(StitchStrategy::Sweep)
            .print_perimeter(false);

        assert!((config.layer_height - 0.3).abs() < 1e-6);
        assert!((config.stitch_tolerance - 0.01).abs() < 1e-6);
        assert_eq!(config.stitch_strategy, StitchStrategy::Sweep);
        assert!(!config.print_perimeter);
    }

    #[test]
    fn test_slicer_config_validation() {
        let mut config = SlicerConfig::default();

        config.layer_height = 0.0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        config.layer_height = 0.2;

        config.stitch_tolerance = -1.0;
        assert!(config.validate().is_err());
        config.stitch_tolerance = 0.0;
        assert!(config.validate().is_ok());

        config.filament_diameter = 0.0;
        assert!(config.validate().is_err());
        config.filament_diameter = 1.75;

        config.z_angle_threshold = 2.0;
        assert!(config.validate().is_err());
        config.z_angle_threshold = 0.0;
        assert!(config.validate().is_ok());

        config.layer_height = Coord::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_partial_file_uses_defaults() {
        let config =
            SlicerConfig::from_json(r#"{ "layer_height": 0.1, "stitch_strategy": "tiles-pruned" }"#)
                .unwrap();
        assert!((config.layer_height - 0.1).abs() < 1e-6);
        assert_eq!(config.stitch_strategy, StitchStrategy::TilesPruned);
        assert!((config.filament_diameter - 1.75).abs() < 1e-6);
    }

    #[test]
    fn test_json_round_trip_and_rejection() {
        let json = SlicerConfig::default().to_json().unwrap();
        assert_eq!(SlicerConfig::from_json(&json).unwrap(), SlicerConfig::default());

        assert!(matches!(
            SlicerConfig::from_json(r#"{ "layer_height": -1.0 }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(SlicerConfig::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_stitch_strategy_parse() {
        assert_eq!("Sweep".parse::<StitchStrategy>(), Ok(StitchStrategy::Sweep));
        assert_eq!(
            "tiles-pruned".parse::<StitchStrategy>(),
            Ok(StitchStrategy::TilesPruned)
        );
        assert!("zigzag".parse::<StitchStrategy>().is_err());
        assert_eq!(StitchStrategy::TilesPruned.to_string(), "tiles-pruned");
    }
}
