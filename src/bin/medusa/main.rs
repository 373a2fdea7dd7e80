//! Medusa CLI - generate, inspect and animate creature meshes.
//!
//! Usage: medusa <COMMAND> [OPTIONS]
//!
//! Run `medusa --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use medusa::animate::animate_into;
use medusa::config::MedusaConfig;
use medusa::generate::build_with_progress;
use medusa::io::{self, ExportMesh, Format};
use medusa::progress::Progress;

#[derive(Parser)]
#[command(name = "medusa")]
#[command(author, version, about = "Procedural jellyfish mesh generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a creature and save it
    Generate {
        /// Output mesh file (.obj, .stl or .ply)
        output: PathBuf,

        /// Configuration file (RON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pose the mesh at this animation time instead of the rest pose
        #[arg(short, long)]
        time: Option<f64>,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Display creature statistics
    Info {
        /// Configuration file (RON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Export an animation sequence, one mesh file per frame
    Frames {
        /// Output directory
        dir: PathBuf,

        /// Configuration file (RON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of frames
        #[arg(short = 'n', long, default_value = "30")]
        frames: usize,

        /// Frames per second
        #[arg(long, default_value = "30")]
        fps: f64,

        /// Output format
        #[arg(short, long, value_enum, default_value = "obj")]
        format: OutputFormat,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },

    /// Write the default configuration
    Config {
        /// Output file (RON)
        output: PathBuf,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Wavefront OBJ
    Obj,
    /// Binary STL
    Stl,
    /// ASCII PLY
    Ply,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Obj => Format::Obj,
            OutputFormat::Stl => Format::Stl,
            OutputFormat::Ply => Format::Ply,
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Generate {
            output,
            config,
            time,
            sequential,
        } => {
            cmd_generate(&output, config.as_deref(), time, sequential)?;
        }
        Commands::Info { config } => {
            cmd_info(config.as_deref())?;
        }
        Commands::Frames {
            dir,
            config,
            frames,
            fps,
            format,
            sequential,
        } => {
            cmd_frames(&dir, config.as_deref(), frames, fps, format.into(), sequential)?;
        }
        Commands::Config { output } => {
            MedusaConfig::default().save(&output)?;
            println!("Wrote default configuration to {}", output.display());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<MedusaConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            MedusaConfig::load(path)?
        }
        None => MedusaConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // highest percent seen

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Monotonic: parallel steps may report out of order
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        let percent = previous.max(raw_percent);
        if percent == previous && percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {:<24}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_generate(
    output: &Path,
    config: Option<&Path>,
    time: Option<f64>,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?.with_parallel(!sequential);
    let mode = if sequential { "sequential" } else { "parallel" };

    println!("Building creature ({})...", mode);
    let progress = create_progress();
    let start = Instant::now();
    let buffers = build_with_progress(&config, &progress)?;
    let elapsed = start.elapsed();
    println!(
        "Built: {} vertices, {} triangles ({:.2?})",
        buffers.num_vertices(),
        buffers.num_triangles(),
        elapsed
    );

    match time {
        Some(time) => {
            let mut frame = Vec::new();
            animate_into(&buffers, time, &config, &mut frame);
            io::save_frame(&buffers, &frame, output)?;
            println!("Saved: {} (t = {})", output.display(), time);
        }
        None => {
            io::save(&buffers, output)?;
            println!("Saved: {}", output.display());
        }
    }

    Ok(())
}

fn cmd_info(config: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let buffers = medusa::generate::build(&config)?;

    println!("Head grid: {} x {}", config.grid.sides, config.grid.segments);
    println!("Vertices: {}", buffers.num_vertices());
    println!("  Head: {}", buffers.head_vertex_count);
    println!(
        "  Tentacles: {}",
        buffers.num_vertices() - buffers.head_vertex_count
    );
    println!("Triangles: {}", buffers.num_triangles());
    println!("Surface area: {:.3}", buffers.surface_area());

    let min = buffers.bounds.min;
    let max = buffers.bounds.max;
    println!(
        "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
        min.x, min.y, min.z, max.x, max.y, max.z
    );
    let size = buffers.bounds.size();
    println!("Dimensions: {:.3} x {:.3} x {:.3}", size.x, size.y, size.z);

    println!("\nTentacles:");
    println!(
        "  {:>3}  {:>4}  {:>7}  {:>7}  {:>9}  {:>6}",
        "#", "side", "theta", "phi", "length", "offset"
    );
    for (i, t) in buffers.tentacles.iter().enumerate() {
        println!(
            "  {:>3}  {:>4}  {:>7.3}  {:>7.3}  {:>9.3}  {:>6}",
            i, t.side, t.theta, t.phi, t.curve_length, t.vertex_offset
        );
    }

    Ok(())
}

fn cmd_frames(
    dir: &Path,
    config: Option<&Path>,
    frames: usize,
    fps: f64,
    format: Format,
    sequential: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(format!("fps must be positive, got {}", fps).into());
    }

    let config = load_config(config)?.with_parallel(!sequential);
    let buffers = medusa::generate::build(&config)?;
    std::fs::create_dir_all(dir)?;

    if !config.animation.enabled {
        log::warn!("Animation is disabled in the configuration; every frame is the rest pose");
    }

    println!(
        "Exporting {} frames at {} fps to {}...",
        frames,
        fps,
        dir.display()
    );
    let progress = create_progress();
    let start = Instant::now();

    let mut positions = Vec::with_capacity(buffers.num_vertices());
    for frame in 0..frames {
        let time = frame as f64 / fps;
        if config.animation.enabled {
            animate_into(&buffers, time, &config, &mut positions);
        } else {
            positions.clone_from(&buffers.vertices);
        }

        let path = dir.join(format!("medusa_{:04}.{}", frame, format.extension()));
        let mesh = ExportMesh::posed(&buffers, &positions)?;
        match format {
            Format::Obj => io::obj::save(&mesh, &path)?,
            Format::Stl => io::stl::save(&mesh, &path)?,
            Format::Ply => io::ply::save(&mesh, &path)?,
        }

        progress.report(frame + 1, frames, "Writing frames");
    }

    println!("Done ({:.2?})", start.elapsed());
    Ok(())
}
