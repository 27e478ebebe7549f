//! Ember Player - headless game player library
//!
//! This crate provides the `PlayerApp` hooks and the `run` loop used by the
//! `ember-player` binary to drive a [`Game`] until its platform terminates.

mod player_app;

pub use player_app::{EmptySceneLoader, FixedStep, PlayerApp};

use ember_core::Result;
use ember_runtime::Game;

/// Initialize `game`, run frames until the platform asks to stop, then exit.
///
/// With a [`FixedStep`] the manual clock advances by one step after every
/// frame, so a run is reproducible. Returns the number of frames run.
pub fn run(
    game: &mut Game,
    app: &mut PlayerApp,
    args: &[String],
    step: Option<&FixedStep>,
) -> Result<u64> {
    game.initialize(app, args)?;

    let mut frames = 0;
    while game.frame(app) {
        frames += 1;
        if let Some(step) = step {
            step.advance();
        }
    }

    game.exit(app);
    Ok(frames)
}
