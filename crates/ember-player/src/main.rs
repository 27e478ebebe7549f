//! Ember Player - headless game player binary
//!
//! Runs the game lifecycle without a window: splash screens, scene loading
//! and updates, until the frame limit is reached.
//!
//! Usage:
//!   ember-player [--config <path>] [--frames <n>] [--fixed-step <seconds>] [--scene <url>]

use anyhow::{Context, Result};
use clap::Parser;
use ember_player::{EmptySceneLoader, FixedStep, PlayerApp};
use ember_runtime::{AssetKind, ConfigStore, Game, HeadlessPlatform, ENGINE_CONFIG_PATH};
use env_logger::{Builder, Env};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ember-player")]
#[command(about = "Ember game player - run the game lifecycle headless")]
struct Args {
    /// Path to the engine configuration file (created with defaults if missing)
    #[arg(long, default_value = ENGINE_CONFIG_PATH)]
    config: PathBuf,

    /// Number of frames to run before exiting
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Advance time by a fixed number of seconds per frame instead of reading the system clock
    #[arg(long)]
    fixed_step: Option<f64>,

    /// Scene to load instead of the configured main scene
    #[arg(long)]
    scene: Option<String>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Arguments passed through to the game
    #[arg(trailing_var_arg = true)]
    game_args: Vec<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let step = match args.fixed_step {
        Some(seconds) if seconds.is_finite() && seconds > 0.0 => Some(FixedStep::new(seconds)),
        Some(seconds) => anyhow::bail!("--fixed-step must be a positive number, got {seconds}"),
        None => None,
    };

    let platform = HeadlessPlatform::new().with_frame_limit(args.frames);
    let mut game = Game::new(platform).with_config_store(ConfigStore::with_path(&args.config));
    if let Some(step) = &step {
        game = game.with_clock(step.clock());
    }
    game.register_asset_loader(AssetKind::Scene, EmptySceneLoader);

    let mut app = match args.scene {
        Some(url) => PlayerApp::new().with_scene(url),
        None => PlayerApp::new(),
    };

    let frames = ember_player::run(&mut game, &mut app, &args.game_args, step.as_ref())
        .with_context(|| format!("Failed to run game with config {}", args.config.display()))?;

    info!("ran {frames} frames ({} updates)", app.updates());
    Ok(())
}
