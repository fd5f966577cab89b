//! Motion output.
//!
//! [`ExtrusionAccountant`] turns ordered layer paths into a stream of
//! [`Move`]s while tracking filament, distance and time in a
//! [`MotionContext`]. [`GCodeWriter`] renders that stream as G-code text
//! with absolute extrusion and feed rates in mm/min.

mod motion;
mod writer;

pub use motion::{
    ExtrusionAccountant, ExtrusionSettings, ExtrusionTotals, FilamentUsage, MotionContext, Move,
};
pub use writer::{GCode, GCodeWriter};

use crate::Coord;

/// G-code command types.
#[derive(Clone, Debug, PartialEq)]
pub enum GCodeCommand {
    /// G0 - Rapid move (travel)
    RapidMove {
        x: Option<Coord>,
        y: Option<Coord>,
        z: Option<Coord>,
        f: Option<Coord>,
    },
    /// G1 - Linear move (extrusion)
    LinearMove {
        x: Option<Coord>,
        y: Option<Coord>,
        z: Option<Coord>,
        e: Option<Coord>,
        f: Option<Coord>,
    },
    /// Comment
    Comment(String),
    /// Raw G-code line
    Raw(String),
}

impl GCodeCommand {
    /// The command for one move, with travel and print feeds in mm/min.
    pub fn from_move(mv: &Move, travel_feed: Coord, print_feed: Coord) -> Self {
        match *mv {
            Move::TravelTo { x, y } => GCodeCommand::RapidMove {
                x: Some(x),
                y: Some(y),
                z: None,
                f: Some(travel_feed),
            },
            Move::TravelToZ { z } => GCodeCommand::RapidMove {
                x: None,
                y: None,
                z: Some(z),
                f: Some(travel_feed),
            },
            Move::ExtrudeTo { x, y, e } => GCodeCommand::LinearMove {
                x: Some(x),
                y: Some(y),
                z: None,
                e: Some(e),
                f: Some(print_feed),
            },
            Move::ExtrudeToZ { z } => GCodeCommand::LinearMove {
                x: None,
                y: None,
                z: Some(z),
                e: None,
                f: Some(print_feed),
            },
        }
    }

    /// Convert the command to a G-code string.
    pub fn to_gcode(&self) -> String {
        match self {
            GCodeCommand::RapidMove { x, y, z, f } => {
                let mut cmd = String::from("G0");
                push_axes(&mut cmd, *x, *y, *z);
                if let Some(v) = f {
                    cmd.push_str(&format!(" F{:.0}", v));
                }
                cmd
            }
            GCodeCommand::LinearMove { x, y, z, e, f } => {
                let mut cmd = String::from("G1");
                push_axes(&mut cmd, *x, *y, *z);
                if let Some(v) = e {
                    cmd.push_str(&format!(" E{:.5}", v));
                }
                if let Some(v) = f {
                    cmd.push_str(&format!(" F{:.0}", v));
                }
                cmd
            }
            GCodeCommand::Comment(text) => format!("; {}", text),
            GCodeCommand::Raw(line) => line.clone(),
        }
    }
}

fn push_axes(cmd: &mut String, x: Option<Coord>, y: Option<Coord>, z: Option<Coord>) {
    for (axis, value) in [('X', x), ('Y', y), ('Z', z)] {
        if let Some(v) = value {
            cmd.push_str(&format!(" {}{:.3}", axis, v));
        }
    }
}
