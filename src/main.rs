//! Touchless control: drive pointer and keyboard from recorded face/hand landmarks.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::sync::Arc;
use touchless_control::{
    app::ControlApp,
    config::{Config, EXAMPLE_CONFIG},
    filters::SmoothingMode,
    input::{InputInjector, RecordingInjector, X11Injector},
    source::ReplaySource,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Landmark frames to replay (multi-document YAML, `-` for stdin)
    #[arg(short, long, default_value = "-")]
    replay: String,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Log actions instead of injecting them into the X server
    #[arg(long)]
    dry_run: bool,

    /// Screen size used with --dry-run
    #[arg(long, default_value = "1920x1080", value_parser = parse_screen_size)]
    screen: (u32, u32),

    /// Yaw degrees either side of neutral spanning half the screen
    #[arg(long)]
    sensitivity_x: Option<f64>,

    /// Pitch degrees either side of neutral spanning half the screen
    #[arg(long)]
    sensitivity_y: Option<f64>,

    /// Orientation smoothing (off, window)
    #[arg(short, long)]
    smoothing: Option<String>,

    /// Start with the dial keyboard enabled
    #[arg(short, long)]
    keyboard: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn parse_screen_size(value: &str) -> std::result::Result<(u32, u32), String> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value}"))?;
    let width = width.trim().parse().map_err(|e| format!("invalid width: {e}"))?;
    let height = height.trim().parse().map_err(|e| format!("invalid height: {e}"))?;
    Ok((width, height))
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Touchless Control");

    // Load configuration if provided
    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        Config::from_file(config_path).with_context(|| format!("Failed to load config file {config_path}"))?
    } else {
        Config::default()
    };

    // Command line overrides
    if let Some(sensitivity) = args.sensitivity_x {
        config.cursor.sensitivity_x = sensitivity;
    }
    if let Some(sensitivity) = args.sensitivity_y {
        config.cursor.sensitivity_y = sensitivity;
    }
    if let Some(smoothing) = &args.smoothing {
        config.cursor.smoothing = SmoothingMode::from_name(smoothing)?;
    }
    if args.keyboard {
        config.keyboard.enabled = true;
    }
    config.validate().context("Invalid configuration")?;

    let injector: Arc<dyn InputInjector> = if args.dry_run {
        info!("Dry run: actions are logged, not injected");
        Arc::new(RecordingInjector::new(args.screen.0, args.screen.1))
    } else {
        Arc::new(X11Injector::new().context("Failed to initialize X11 input injection")?)
    };

    let mut source =
        ReplaySource::from_path(&args.replay).with_context(|| format!("Failed to open replay {}", args.replay))?;

    // Create and run application
    let mut app = ControlApp::new(&config, injector)?;
    let summary = app.run(&mut source);
    app.shutdown()?;

    let summary = summary?;
    info!("Done: {} frames, {} actions, {:.1} fps", summary.frames, summary.actions, summary.fps);

    Ok(())
}
