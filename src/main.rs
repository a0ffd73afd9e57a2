use clap::Parser;
use log::info;
use soft_rasterizer::RasterError;
use soft_rasterizer::app::{run_cli, run_gui};
use soft_rasterizer::io::config::Config;
use std::path::PathBuf;

/// Software rasterizer for a textured, normal-mapped mesh.
#[derive(Parser, Debug)]
#[command(name = "soft-rasterizer", version)]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Render without a window and write a PNG
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode before saving
    #[arg(long, default_value_t = 1)]
    frames: usize,

    /// Output image path; overrides `render.output`
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<(), RasterError> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!("Loading config: {:?}", path);
            Config::load(path)?
        }
        None => {
            info!("No config given. Using defaults.");
            Config::default()
        }
    };

    if cli.headless {
        let output = cli
            .output
            .unwrap_or_else(|| PathBuf::from(&config.render.output));
        run_cli(&config, cli.frames, &output)
    } else {
        run_gui(&config)
    }
}
