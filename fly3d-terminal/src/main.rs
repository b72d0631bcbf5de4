/// fly3d Terminal Demo - Free-look camera around a spinning cube
///
/// Controls:
///   - W/A/S/D: Move
///   - Arrow Keys: Turn and tilt
///   - E/Q: Raise and lower
///   - Esc / Ctrl-C: Quit

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use fly3d_core::{radians_to_degrees, Projection};
use fly3d_terminal::{AppConfig, TerminalApp};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fly3d-terminal", about = "Fly a first-person camera around a spinning cube")]
struct Cli {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Vertical field of view in degrees
    #[arg(long)]
    fov: Option<f32>,

    /// Near clip plane distance
    #[arg(long)]
    near: Option<f32>,

    /// Far clip plane distance
    #[arg(long)]
    far: Option<f32>,

    /// Target frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Camera speed in world units per second
    #[arg(long)]
    move_speed: Option<f32>,

    /// Write logs to this file (the terminal itself is busy rendering)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let default = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn build_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if cli.fov.is_some() || cli.near.is_some() || cli.far.is_some() {
        let current = config.projection;
        config.projection = Projection::from_degrees(
            cli.fov.unwrap_or_else(|| radians_to_degrees(current.fov_y())),
            current.aspect(),
            cli.near.unwrap_or(current.near()),
            cli.far.unwrap_or(current.far()),
        )
        .context("invalid projection flags")?;
    }
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if let Some(speed) = cli.move_speed {
        config.camera.move_speed = speed;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;
    let config = build_config(&cli)?;
    tracing::debug!(?config, "configuration resolved");

    let mut app = TerminalApp::new(config)?;
    app.run()?;

    println!("Thank you for flying fly3d!");
    Ok(())
}
