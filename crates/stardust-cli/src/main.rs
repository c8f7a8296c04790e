//! Stardust CLI - parametric galaxy point clouds

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use stardust_core::generator;
use stardust_core::params::GenerationParameters;
use stardust_engine::preset;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stardust")]
#[command(about = "Parametric galaxy point clouds", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a real-time preview window
    Preview {
        /// Preset file to load (optional)
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Watch the preset file and regenerate on change
        #[arg(long, requires = "params")]
        watch: bool,

        /// Seed for the initial generation (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Window width
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Window height
        #[arg(long, default_value = "720")]
        height: u32,

        /// Window title
        #[arg(long, default_value = "Stardust Preview")]
        title: String,
    },

    /// Generate a point cloud and export it as PLY
    Generate {
        /// Output file (.ply)
        #[arg(short, long, default_value = "galaxy.ply")]
        output: PathBuf,

        /// Preset file to load (optional)
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Seed for reproducible output (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Override the point count
        #[arg(long)]
        count: Option<u32>,

        /// Override the number of branches
        #[arg(long)]
        branches: Option<u32>,
    },

    /// Render a galaxy to an image file (headless)
    Render {
        /// Output image file (.png)
        #[arg(short, long, default_value = "galaxy.png")]
        output: PathBuf,

        /// Preset file to load (optional)
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Seed for reproducible output (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Image width
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Image height
        #[arg(long, default_value = "1080")]
        height: u32,
    },

    /// Write the default preset to a file for editing
    Preset {
        /// Output preset file (.json)
        #[arg(short, long, default_value = "galaxy.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preview {
            params,
            watch,
            seed,
            width,
            height,
            title,
        } => {
            run_preview(params.as_deref(), watch, seed, width, height, title)?;
        }
        Commands::Generate {
            output,
            params,
            seed,
            count,
            branches,
        } => {
            run_generate(&output, params.as_deref(), seed, count, branches)?;
        }
        Commands::Render {
            output,
            params,
            seed,
            width,
            height,
        } => {
            run_render(&output, params.as_deref(), seed, width, height)?;
        }
        Commands::Preset { output } => {
            preset::save(&GenerationParameters::default(), &output)?;
            println!("Wrote default preset to {}", output.display());
        }
    }

    Ok(())
}

/// Load a preset if given, otherwise the defaults
fn load_params(path: Option<&std::path::Path>) -> Result<GenerationParameters> {
    match path {
        Some(path) => Ok(preset::load(path)?),
        None => Ok(GenerationParameters::default()),
    }
}

fn run_preview(
    params_path: Option<&std::path::Path>,
    watch: bool,
    seed: Option<u64>,
    width: u32,
    height: u32,
    title: String,
) -> Result<()> {
    let params = load_params(params_path)?;

    println!("{}", stardust_render::controls_help());

    let config = stardust_render::PreviewConfig {
        title,
        width,
        height,
    };
    let watch_preset = if watch {
        params_path.map(|p| p.to_path_buf())
    } else {
        None
    };

    stardust_render::run_preview(config, params, seed, watch_preset)
}

fn run_generate(
    output: &std::path::Path,
    params_path: Option<&std::path::Path>,
    seed: Option<u64>,
    count: Option<u32>,
    branches: Option<u32>,
) -> Result<()> {
    let mut params = load_params(params_path)?;
    if let Some(count) = count {
        params.count = count;
    }
    if let Some(branches) = branches {
        params.branches = branches;
    }

    let buffer = match seed {
        Some(seed) => generator::generate_with(&params, &mut StdRng::seed_from_u64(seed))?,
        None => generator::generate(&params)?,
    };

    stardust_core::export::export_ply(&buffer, output)?;
    println!(
        "Wrote {} points to {}",
        buffer.point_count(),
        output.display()
    );

    Ok(())
}

fn run_render(
    output: &std::path::Path,
    params_path: Option<&std::path::Path>,
    seed: Option<u64>,
    width: u32,
    height: u32,
) -> Result<()> {
    let params = load_params(params_path)?;

    println!("Rendering {} points at {}x{}...", params.count, width, height);

    let image = stardust_render::render_image(&params, width, height, seed)?;
    image.save(output)?;

    println!("Saved {}", output.display());
    Ok(())
}
