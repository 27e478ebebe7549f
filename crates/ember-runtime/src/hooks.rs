//! Application hooks invoked by the game lifecycle

use crate::game::Game;
use crate::scene::SceneRef;
use ember_core::Result;

/// Override points for the host application.
///
/// Every hook receives the [`Game`] so it can inspect or change lifecycle
/// state, including pausing and resuming from inside a frame. All hooks
/// default to doing nothing, except [`GameHooks::on_scene_load`] which
/// installs the new scene.
pub trait GameHooks {
    /// Called at the end of [`Game::initialize`], after configuration and
    /// graphics are set up
    fn on_initialize(&mut self, _game: &mut Game, _args: &[String]) -> Result<()> {
        Ok(())
    }

    /// Called first during [`Game::finalize`], while the scene and graphics
    /// are still alive
    fn on_finalize(&mut self, _game: &mut Game) {}

    /// Called once per running frame with the elapsed game time in seconds
    fn on_update(&mut self, _game: &mut Game, _elapsed: f32) {}

    fn on_splash(&mut self, _game: &mut Game, _elapsed: f32) {}

    fn on_loading(&mut self, _game: &mut Game, _elapsed: f32) {}

    /// One-time setup on the first frame, before splash screens show
    fn initialize_splash(&mut self, _game: &mut Game) {}

    /// One-time setup on the first frame, after `initialize_splash`
    fn initialize_loading(&mut self, _game: &mut Game) {}

    /// A scene requested through [`Game::load_scene`] finished loading
    fn on_scene_load(&mut self, game: &mut Game, scene: SceneRef) {
        game.set_scene(Some(scene));
    }

    /// The viewport changed size. The game has already stored the new size.
    fn on_resize(&mut self, _game: &mut Game, _width: u32, _height: u32) {}
}
