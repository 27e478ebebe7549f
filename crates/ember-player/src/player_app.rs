//! Player hooks for a headless game session
//!
//! Loads the main scene once the game is initialized and reports the frame
//! rate while running.

use ember_core::Result;
use ember_runtime::{
    scene_ref, Asset, AssetLoader, Clock, EmptyScene, Game, GameHooks, LoadTask,
    ManualTimeSource, ReadyTask, SceneRef, DEFAULT_MAIN_SCENE,
};
use log::{debug, info, trace};

/// Resolves every scene url to an empty scene, immediately.
///
/// The player ships no scene format; hosts with real content register
/// their own loader for [`ember_runtime::AssetKind::Scene`].
#[derive(Debug, Default)]
pub struct EmptySceneLoader;

impl AssetLoader for EmptySceneLoader {
    fn begin_load(&mut self, url: &str) -> Result<Box<dyn LoadTask>> {
        Ok(Box::new(ReadyTask::new(Ok(Asset::Scene(scene_ref(
            EmptyScene::new(url),
        ))))))
    }
}

/// A manual time source advanced by a constant step per frame
#[derive(Debug, Clone)]
pub struct FixedStep {
    time: ManualTimeSource,
    step: f64,
}

impl FixedStep {
    pub fn new(step: f64) -> Self {
        Self {
            time: ManualTimeSource::new(),
            step,
        }
    }

    /// A clock reading this step's time
    pub fn clock(&self) -> Clock {
        Clock::with_source(self.time.clone())
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn advance(&self) {
        self.time.advance(self.step);
    }
}

#[derive(Debug, Default)]
pub struct PlayerApp {
    scene_override: Option<String>,
    reported_rate: u32,
    updates: u64,
    loaded_scenes: Vec<String>,
}

impl PlayerApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `url` instead of the configured main scene.
    pub fn with_scene(mut self, url: impl Into<String>) -> Self {
        self.scene_override = Some(url.into());
        self
    }

    /// Running frames seen so far
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn loaded_scenes(&self) -> &[String] {
        &self.loaded_scenes
    }

    fn main_scene(&self, game: &Game) -> String {
        if let Some(url) = &self.scene_override {
            return url.clone();
        }
        game.config()
            .map(|config| config.main_scene.clone())
            .unwrap_or_else(|| DEFAULT_MAIN_SCENE.to_string())
    }
}

impl GameHooks for PlayerApp {
    fn on_initialize(&mut self, game: &mut Game, args: &[String]) -> Result<()> {
        if !args.is_empty() {
            debug!("player arguments: {args:?}");
        }
        let url = self.main_scene(game);
        game.load_scene(&url, true)
    }

    fn on_finalize(&mut self, game: &mut Game) {
        info!(
            "session over: {} updates, {} frames, {:.2}s of game time",
            self.updates,
            game.total_frames(),
            game.game_time()
        );
    }

    fn on_update(&mut self, game: &mut Game, elapsed: f32) {
        self.updates += 1;
        trace!("update {} ({elapsed:.4}s)", self.updates);

        let rate = game.frame_rate();
        if rate != self.reported_rate {
            self.reported_rate = rate;
            info!("{rate} fps");
        }
    }

    fn on_splash(&mut self, game: &mut Game, _elapsed: f32) {
        if let Some(screen) = game.splash_screens().current() {
            trace!("showing splash '{}'", screen.url);
        }
    }

    fn initialize_splash(&mut self, game: &mut Game) {
        debug!("{} splash screen(s) queued", game.splash_screens().len());
    }

    fn on_scene_load(&mut self, game: &mut Game, scene: SceneRef) {
        let name = scene.borrow().name().to_string();
        info!("scene '{name}' ready");
        self.loaded_scenes.push(name);
        game.set_scene(Some(scene));
    }

    fn on_resize(&mut self, _game: &mut Game, width: u32, height: u32) {
        debug!("viewport resized to {width}x{height}");
    }
}
