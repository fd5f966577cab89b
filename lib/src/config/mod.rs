//! Configuration for slicing and extrusion accounting.

mod print_config;

pub use print_config::{
    SlicerConfig, StitchStrategy, DEFAULT_GCODE_FOOTER, DEFAULT_GCODE_HEADER,
};
