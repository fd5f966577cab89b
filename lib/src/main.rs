//! Layer slicer CLI
//!
//! Usage:
//!   layer-slicer slice <input.stl> -o <output.gcode> [options]
//!   layer-slicer slice <input.stl> --config my_config.json
//!   layer-slicer info <input.stl>
//!   layer-slicer dump-config

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use layer_slicer::{load_stl, Mesh, SlicerConfig, SlicingParams, SlicingPipeline, StitchStrategy};
use log::{info, warn, LevelFilter};
use std::path::PathBuf;

/// Slice triangle meshes into per-layer toolpaths and G-code
#[derive(Parser, Debug)]
#[command(name = "layer-slicer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Slice an STL file and generate G-code
    Slice(SliceArgs),

    /// Display information about an STL file
    Info {
        /// Input STL file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },

    /// Print the default configuration as JSON
    DumpConfig,
}

#[derive(Args, Debug)]
struct SliceArgs {
    /// Input STL file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output G-code file (defaults to the input with a .gcode extension)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Configuration file (JSON); flags below override it
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Layer height in mm
    #[arg(long)]
    layer_height: Option<f32>,

    /// Stitch tolerance in mm
    #[arg(long)]
    tolerance: Option<f32>,

    /// Facets flatter than this angle (degrees) are printed as double lines; 0 disables
    #[arg(long, value_name = "DEGREES")]
    z_angle: Option<f32>,

    /// Scale factor applied to the model
    #[arg(long)]
    scale: Option<f32>,

    /// Stitching strategy (sweep, tiles, tiles-pruned, scan, auto)
    #[arg(long)]
    strategy: Option<StitchStrategy>,

    /// Filament diameter in mm
    #[arg(long)]
    filament_diameter: Option<f32>,

    /// Wall thickness in mm
    #[arg(long)]
    wall_thickness: Option<f32>,

    /// Print speed in mm/s
    #[arg(long)]
    print_speed: Option<f32>,

    /// Travel speed in mm/s
    #[arg(long)]
    travel_speed: Option<f32>,

    /// Do not print the frame around the model
    #[arg(long)]
    no_perimeter: bool,

    /// Number of threads to use (0 = auto)
    #[arg(short = 'j', long, default_value = "0")]
    threads: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Slice(args) => cmd_slice(args),
        Commands::Info { input } => cmd_info(input),
        Commands::DumpConfig => cmd_dump_config(),
    }
}

/// Configuration file (or defaults) with command-line overrides applied.
fn build_config(args: &SliceArgs) -> Result<SlicerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            SlicerConfig::from_file(path).context("Failed to load config file")?
        }
        None => SlicerConfig::default(),
    };

    if let Some(v) = args.layer_height {
        config.layer_height = v;
    }
    if let Some(v) = args.tolerance {
        config.stitch_tolerance = v;
    }
    if let Some(deg) = args.z_angle {
        config.z_angle_threshold = deg.to_radians();
    }
    if let Some(v) = args.scale {
        config.scale = v;
    }
    if let Some(v) = args.strategy {
        config.stitch_strategy = v;
    }
    if let Some(v) = args.filament_diameter {
        config.filament_diameter = v;
    }
    if let Some(v) = args.wall_thickness {
        config.wall_thickness = v;
    }
    if let Some(v) = args.print_speed {
        config.print_speed = v;
    }
    if let Some(v) = args.travel_speed {
        config.travel_speed = v;
    }
    if args.no_perimeter {
        config.print_perimeter = false;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn cmd_slice(args: SliceArgs) -> Result<()> {
    let config = build_config(&args)?;
    info!("{}", config);

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("gcode"));

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("Failed to initialize thread pool")?;
    }

    let pipeline = SlicingPipeline::new(config).context("Failed to configure pipeline")?;

    let progress = ProgressBar::new(100);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    progress.set_message("Loading mesh...");
    info!("Loading STL file: {}", args.input.display());
    let triangles = load_stl(&args.input).context("Failed to load STL file")?;
    let mut mesh = Mesh::from_triangles(&triangles);
    pipeline.prepare_mesh(&mut mesh);
    info!("{} ({} facets)", mesh, mesh.facet_count());
    if mesh.is_empty() {
        warn!("Mesh has no facets; output will contain no layers");
    }
    progress.set_position(5);

    let print = pipeline.process_with_callback(&mesh, |stage, stage_progress| {
        let (base, range, message) = match stage {
            "slicing" => (5.0, 75.0, "Slicing layers..."),
            "ordering" => (80.0, 5.0, "Ordering paths..."),
            "gcode" => (85.0, 10.0, "Generating G-code..."),
            _ => (5.0, 0.0, "Processing..."),
        };
        progress.set_position((base + stage_progress * range) as u64);
        progress.set_message(message);
    })?;

    progress.set_message("Writing output...");
    progress.set_position(95);

    print
        .gcode()
        .write_to_file(&output_path)
        .context("Failed to write G-code file")?;

    progress.set_position(100);
    progress.finish_with_message("Done!");

    println!();
    println!("Slicing complete!");
    println!("  Output: {}", output_path.display());
    for line in print.summary().lines() {
        println!("  {}", line);
    }
    println!("  G-code lines: {}", print.gcode().line_count());

    Ok(())
}

fn cmd_info(input: PathBuf) -> Result<()> {
    info!("Loading STL file: {}", input.display());

    let triangles = load_stl(&input).context("Failed to load STL file")?;
    let mesh = Mesh::from_triangles(&triangles);
    let bb = mesh.bounds();

    println!("Mesh Information:");
    println!("  File: {}", input.display());
    println!("  Facets: {}", mesh.facet_count());
    println!("  Degenerate facets: {}", mesh.degenerate_facet_count());
    if !mesh.is_empty() {
        println!("  Bounding box:");
        println!(
            "    Min: ({:.3}, {:.3}, {:.3}) mm",
            bb.min.x, bb.min.y, bb.min.z
        );
        println!(
            "    Max: ({:.3}, {:.3}, {:.3}) mm",
            bb.max.x, bb.max.y, bb.max.z
        );
    }
    println!("  {}", mesh);

    println!("  Layers:");
    for lh in [0.1, 0.2, 0.3] {
        let params = SlicingParams {
            layer_height: lh,
            ..SlicingParams::default()
        };
        println!(
            "    At {:.1}mm layer height: {} layers",
            lh,
            params.layer_count(bb.min.z, bb.max.z)
        );
    }

    Ok(())
}

fn cmd_dump_config() -> Result<()> {
    let json = SlicerConfig::default()
        .to_json()
        .context("Failed to serialize config")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "layer-slicer",
            "slice",
            "part.stl",
            "--layer-height",
            "0.3",
            "--z-angle",
            "30",
            "--strategy",
            "tiles-pruned",
            "--no-perimeter",
        ])
        .unwrap();
        let Commands::Slice(args) = cli.command else {
            panic!("expected the slice command");
        };
        let config = build_config(&args).unwrap();
        assert!((config.layer_height - 0.3).abs() < 1e-6);
        assert!((config.z_angle_threshold - 30f32.to_radians()).abs() < 1e-6);
        assert_eq!(config.stitch_strategy, StitchStrategy::TilesPruned);
        assert!(!config.print_perimeter);
        assert!((config.wall_thickness - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli =
            Cli::try_parse_from(["layer-slicer", "slice", "part.stl", "--layer-height", "0"])
                .unwrap();
        let Commands::Slice(args) = cli.command else {
            panic!("expected the slice command");
        };
        assert!(build_config(&args).is_err());
    }
}
