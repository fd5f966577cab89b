//! G-code text output.

use super::motion::{ExtrusionSettings, ExtrusionTotals, FilamentUsage, Move};
use super::GCodeCommand;
use crate::config::{SlicerConfig, DEFAULT_GCODE_FOOTER, DEFAULT_GCODE_HEADER};
use crate::{Coord, Result};
use std::path::Path;

/// Renders a move stream as G-code lines between a start and an end block.
#[derive(Clone, Debug)]
pub struct GCodeWriter {
    settings: ExtrusionSettings,
    header: String,
    footer: String,
    body: String,
    layer: usize,
}

impl GCodeWriter {
    pub fn new(settings: ExtrusionSettings) -> Self {
        Self {
            settings,
            header: DEFAULT_GCODE_HEADER.to_string(),
            footer: DEFAULT_GCODE_FOOTER.to_string(),
            body: String::new(),
            layer: 0,
        }
    }

    pub fn from_config(config: &SlicerConfig) -> Result<Self> {
        Ok(Self::new(ExtrusionSettings::from_config(config)?)
            .with_blocks(&config.gcode_header, &config.gcode_footer))
    }

    /// Replace the start and end blocks.
    pub fn with_blocks(mut self, header: &str, footer: &str) -> Self {
        self.header = header.to_string();
        self.footer = footer.to_string();
        self
    }

    pub fn write_command(&mut self, command: &GCodeCommand) {
        self.body.push_str(&command.to_gcode());
        self.body.push('\n');
    }

    pub fn write_comment(&mut self, text: &str) {
        self.write_command(&GCodeCommand::Comment(text.to_string()));
    }

    pub fn write_raw(&mut self, line: &str) {
        self.body.push_str(line);
        self.body.push('\n');
    }

    /// Write one move. A print-feed Z move starts a new layer and is
    /// preceded by a layer comment.
    pub fn write_move(&mut self, mv: &Move) {
        if let Move::ExtrudeToZ { z } = *mv {
            let comment = format!("Layer {} Z{:.3}", self.layer, z);
            self.write_comment(&comment);
            self.layer += 1;
        }
        let command = GCodeCommand::from_move(
            mv,
            self.settings.travel_feed_mm_min(),
            self.settings.print_feed_mm_min(),
        );
        self.write_command(&command);
    }

    pub fn write_moves(&mut self, moves: &[Move]) {
        for mv in moves {
            self.write_move(mv);
        }
    }

    /// Layers started so far.
    pub fn layer_count(&self) -> usize {
        self.layer
    }

    /// Assemble the final program: usage comments, start block, body, end block.
    pub fn finish(self, totals: ExtrusionTotals) -> GCode {
        let usage = self.settings.filament_usage(&totals);

        let mut content = String::with_capacity(
            self.header.len() + self.body.len() + self.footer.len() + 256,
        );
        content.push_str(&format!(
            ";Filament usage: {}\n;Filament diameter: {} mm\n;Wall thickness: {} mm\n;Feed speed: {}\n",
            usage,
            self.settings.filament_diameter,
            self.settings.wall_thickness,
            self.settings.print_feed_mm_min()
        ));
        content.push('\n');
        content.push_str(&self.header);
        content.push('\n');
        content.push_str(&self.body);
        content.push_str(&self.footer);
        content.push('\n');

        GCode {
            content,
            totals,
            usage,
        }
    }
}

/// A finished G-code program with the totals it was accounted with.
#[derive(Clone, Debug)]
pub struct GCode {
    content: String,
    totals: ExtrusionTotals,
    usage: FilamentUsage,
}

impl GCode {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    pub fn totals(&self) -> &ExtrusionTotals {
        &self.totals
    }

    pub fn usage(&self) -> &FilamentUsage {
        &self.usage
    }

    /// Estimated print time (s).
    pub fn estimated_time(&self) -> Coord {
        self.totals.time_s
    }

    /// Write the whole program to `path` in one operation.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ExtrusionSettings {
        ExtrusionSettings::default()
    }

    #[test]
    fn test_moves_render_with_feed_rates() {
        let mut writer = GCodeWriter::new(settings());
        writer.write_moves(&[
            Move::TravelToZ { z: 0.0 },
            Move::TravelTo { x: -6.0, y: 2.5 },
            Move::ExtrudeToZ { z: 0.2 },
            Move::ExtrudeTo {
                x: 10.0,
                y: 2.5,
                e: 0.5,
            },
        ]);
        assert_eq!(writer.layer_count(), 1);
        let gcode = writer.finish(ExtrusionTotals::default());
        let body: Vec<&str> = gcode
            .content()
            .lines()
            .skip_while(|l| !l.starts_with("G0 Z"))
            .take(5)
            .collect();
        assert_eq!(
            body,
            vec![
                "G0 Z0.000 F9000",
                "G0 X-6.000 Y2.500 F9000",
                "; Layer 0 Z0.200",
                "G1 Z0.200 F1800",
                "G1 X10.000 Y2.500 E0.50000 F1800",
            ]
        );
    }

    #[test]
    fn test_finish_layout() {
        let mut writer = GCodeWriter::new(settings()).with_blocks("START", "END");
        writer.write_raw("BODY");
        let totals = ExtrusionTotals {
            extruded: 2000.0,
            time_s: 12.0,
            ..Default::default()
        };
        let gcode = writer.finish(totals);
        let lines: Vec<&str> = gcode.content().lines().collect();
        assert!(lines[0].starts_with(";Filament usage: 2.00 m,"));
        assert_eq!(lines[1], ";Filament diameter: 1.75 mm");
        assert_eq!(lines[2], ";Wall thickness: 0.5 mm");
        assert_eq!(lines[3], ";Feed speed: 1800");
        assert_eq!(&lines[4..], &["", "START", "BODY", "END"]);
        assert!(gcode.content().ends_with("END\n"));
        assert_eq!(gcode.estimated_time(), 12.0);
    }

    #[test]
    fn test_from_config_uses_blocks() {
        let config = SlicerConfig {
            gcode_header: "; hello".to_string(),
            gcode_footer: "; bye".to_string(),
            ..Default::default()
        };
        let gcode = GCodeWriter::from_config(&config)
            .unwrap()
            .finish(ExtrusionTotals::default());
        assert!(gcode.content().contains("\n; hello\n"));
        assert!(gcode.content().ends_with("; bye\n"));

        let bad = SlicerConfig::default().filament_diameter(0.0);
        assert!(GCodeWriter::from_config(&bad).is_err());
    }

    #[test]
    fn test_write_to_file() {
        let path = std::env::temp_dir().join(format!("layer-slicer-{}.gcode", std::process::id()));
        let gcode = GCodeWriter::new(settings()).finish(ExtrusionTotals::default());
        gcode.write_to_file(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), gcode.content());
        let _ = std::fs::remove_file(&path);
    }
}
