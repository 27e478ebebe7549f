//! The game context: one per host, passed explicitly to everything that
//! needs lifecycle, timing, configuration or the current scene.

use crate::asset::{AssetKind, AssetLoader, AssetRegistry, LoadTask};
use crate::clock::Clock;
use crate::config::{Config, ConfigStore};
use crate::graphics::{Graphics, GraphicsFlags, GraphicsRegistry};
use crate::hooks::GameHooks;
use crate::platform::{MouseState, Platform};
use crate::scene::{scene_ref, CameraRef, EmptyScene, SceneRef};
use crate::splash::{SplashQueue, SplashScreen};
use crate::state::{GameState, Lifecycle};
use ember_core::{EmberError, Result};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::task::Poll;

struct PendingLoad {
    url: String,
    task: Box<dyn LoadTask>,
}

/// Owns the run-loop state and everything a frame needs.
///
/// The host constructs one `Game`, calls [`Game::initialize`], then calls
/// [`Game::frame`] once per tick until it returns `false`, and finally
/// [`Game::exit`].
pub struct Game {
    lifecycle: Lifecycle,
    platform: Box<dyn Platform>,

    width: u32,
    height: u32,
    flags: GraphicsFlags,
    mouse: MouseState,

    config: ConfigStore,
    home_path: PathBuf,
    graphics_backends: GraphicsRegistry,
    graphics: Option<Box<dyn Graphics>>,
    assets: AssetRegistry,

    scene: Option<SceneRef>,
    camera: Option<CameraRef>,
    loading_scene: Option<SceneRef>,
    splash: SplashQueue,
    pending_load: Option<PendingLoad>,
}

impl Game {
    /// Create a game polling `platform`, with the default config location
    /// and a monotonic clock starting now.
    pub fn new(platform: impl Platform + 'static) -> Self {
        let config = ConfigStore::new();
        Self {
            lifecycle: Lifecycle::new(Clock::new()),
            platform: Box::new(platform),
            width: crate::config::DEFAULT_WIDTH,
            height: crate::config::DEFAULT_HEIGHT,
            flags: GraphicsFlags::default(),
            mouse: MouseState::default(),
            config,
            home_path: PathBuf::from(crate::config::DEFAULT_HOME_PATH),
            graphics_backends: GraphicsRegistry::new(),
            graphics: None,
            assets: AssetRegistry::new(),
            scene: None,
            camera: None,
            loading_scene: Some(scene_ref(EmptyScene::new("loading"))),
            splash: SplashQueue::new(),
            pending_load: None,
        }
    }

    pub fn with_config_store(mut self, store: ConfigStore) -> Self {
        self.config = store;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.lifecycle = Lifecycle::new(clock);
        self
    }

    //--- Registration ----------------------------------------------------

    /// Make a graphics backend available under `name` for `Config::graphics`.
    pub fn register_graphics_backend<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&Config) -> Result<Box<dyn Graphics>> + 'static,
    {
        self.graphics_backends.register(name, factory);
    }

    pub fn register_asset_loader(&mut self, kind: AssetKind, loader: impl AssetLoader + 'static) {
        self.assets.register(kind, loader);
    }

    //--- State and timing ------------------------------------------------

    pub fn state(&self) -> GameState {
        self.lifecycle.state()
    }

    pub fn paused_count(&self) -> u32 {
        self.lifecycle.paused_count()
    }

    /// Whether any `pause()` is outstanding, even if the state is not PAUSED
    pub fn is_paused(&self) -> bool {
        self.lifecycle.is_paused()
    }

    /// Seconds since the clock's epoch, including paused time
    pub fn absolute_time(&self) -> f64 {
        self.lifecycle.clock().absolute_time()
    }

    /// Seconds since the clock's epoch, excluding paused time
    pub fn game_time(&self) -> f64 {
        self.lifecycle.clock().game_time()
    }

    /// Frames counted in the last full sampling window
    pub fn frame_rate(&self) -> u32 {
        self.lifecycle.frame_rate().frame_rate()
    }

    /// Frames counted so far in the current sampling window
    pub fn frame_count(&self) -> u32 {
        self.lifecycle.frame_rate().frame_count()
    }

    /// Frames sampled since the last reset
    pub fn total_frames(&self) -> u64 {
        self.lifecycle.frame_rate().total_frames()
    }

    pub fn pause(&mut self) {
        self.lifecycle.pause();
    }

    pub fn resume(&mut self) {
        self.lifecycle.resume();
    }

    //--- Viewport --------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn graphics_flags(&self) -> GraphicsFlags {
        self.flags
    }

    pub fn mouse_state(&self) -> MouseState {
        self.mouse
    }

    /// Store a new viewport size, keep the camera's aspect ratio in step and
    /// notify the host. Zero-sized viewports (minimized windows) are ignored.
    pub fn resize(&mut self, hooks: &mut dyn GameHooks, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!("ignoring resize to {width}x{height}");
            return;
        }
        self.width = width;
        self.height = height;
        if let Some(camera) = &self.camera {
            camera.borrow_mut().set_aspect_ratio(self.aspect_ratio());
        }
        hooks.on_resize(self, width, height);
    }

    //--- Configuration and subsystems ------------------------------------

    /// Resolve the configuration, creating it with defaults on first run.
    pub fn get_config(&mut self) -> Result<&Config> {
        self.config.get_config()
    }

    /// The configuration, once resolved
    pub fn config(&self) -> Option<&Config> {
        self.config.config()
    }

    pub fn home_path(&self) -> &Path {
        &self.home_path
    }

    pub fn graphics(&self) -> Option<&dyn Graphics> {
        self.graphics.as_deref()
    }

    pub fn graphics_mut(&mut self) -> Option<&mut (dyn Graphics + 'static)> {
        self.graphics.as_deref_mut()
    }

    //--- Scene and camera slots ------------------------------------------

    pub fn set_scene(&mut self, scene: Option<SceneRef>) {
        self.scene = scene;
    }

    pub fn scene(&self) -> Option<SceneRef> {
        self.scene.clone()
    }

    pub fn set_camera(&mut self, camera: Option<CameraRef>) {
        self.camera = camera;
    }

    pub fn camera(&self) -> Option<CameraRef> {
        self.camera.clone()
    }

    /// Replace the placeholder scene shown while a scene loads.
    pub fn set_loading_scene(&mut self, scene: Option<SceneRef>) {
        self.loading_scene = scene;
    }

    pub fn loading_scene(&self) -> Option<SceneRef> {
        self.loading_scene.clone()
    }

    fn is_loading_scene(&self, scene: &SceneRef) -> bool {
        self.loading_scene
            .as_ref()
            .is_some_and(|placeholder| Rc::ptr_eq(placeholder, scene))
    }

    /// Replace the splash screens still to be shown. Screens set before the
    /// first frame take the place of those from the configuration.
    pub fn show_splash_screens(&mut self, screens: Vec<SplashScreen>) {
        self.splash.set(screens);
    }

    pub fn splash_screens(&self) -> &SplashQueue {
        &self.splash
    }

    /// Whether a scene requested through `load_scene` is still loading
    pub fn is_scene_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Start loading the scene at `url`.
    ///
    /// The current scene is unloaded (unless it is the loading placeholder)
    /// and, with `show_loading`, the placeholder takes its place until the
    /// new scene is ready. A running game moves to LOADING; before the game
    /// first reaches LOADING the request waits and the splash sequence is
    /// not interrupted. When the load completes, [`GameHooks::on_scene_load`]
    /// receives the scene and the game returns to RUNNING.
    pub fn load_scene(&mut self, url: &str, show_loading: bool) -> Result<()> {
        if self.state() == GameState::Paused {
            return Err(EmberError::SceneError(format!(
                "cannot load '{url}' while paused"
            )));
        }
        let kind = AssetKind::from_url(url)
            .filter(|kind| *kind == AssetKind::Scene)
            .ok_or_else(|| EmberError::SceneError(format!("'{url}' is not a scene")))?;
        let task = self.assets.begin_load(kind, url)?;

        if let Some(current) = self.scene.take() {
            if !self.is_loading_scene(&current) {
                debug!("unloading scene '{}'", current.borrow().name());
                current.borrow_mut().unload();
            }
        }
        if show_loading {
            self.scene = self.loading_scene.clone();
        }

        if let Some(previous) = self.pending_load.replace(PendingLoad {
            url: url.to_string(),
            task,
        }) {
            debug!("load of '{}' superseded by '{url}'", previous.url);
        }
        info!("loading scene '{url}'");

        if matches!(self.state(), GameState::Running | GameState::Loading) {
            self.lifecycle.set_state(GameState::Loading);
        }
        Ok(())
    }

    /// Unload `scene`, clearing the current slot if it holds that scene.
    pub fn unload_scene(&mut self, scene: &SceneRef) {
        scene.borrow_mut().unload();
        if self
            .scene
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, scene))
        {
            self.scene = None;
        }
    }

    //--- Lifecycle -------------------------------------------------------

    /// Resolve configuration, queue its splash screens, move to its home
    /// path, bring up graphics and run the host's `on_initialize` hook.
    ///
    /// If the hook fails, graphics are finalized again so the game can be
    /// initialized once more.
    pub fn initialize(&mut self, hooks: &mut dyn GameHooks, args: &[String]) -> Result<()> {
        if self.graphics.is_some() {
            return Err(EmberError::RuntimeError("game is already initialized".into()));
        }
        let config = self.config.get_config()?.clone();
        self.splash.set(config.splash_screens.clone());

        self.home_path = PathBuf::from(&config.home_path);
        if let Err(e) = std::env::set_current_dir(&self.home_path) {
            warn!(
                "could not change directory to home path {}: {e}",
                self.home_path.display()
            );
        }

        self.width = config.width;
        self.height = config.height;
        if let Some(camera) = &self.camera {
            camera.borrow_mut().set_aspect_ratio(self.aspect_ratio());
        }

        let mut graphics = self.graphics_backends.create(&config.graphics, &config)?;
        graphics.on_initialize(&config)?;
        self.graphics = Some(graphics);

        info!(
            "initialized '{}' at {}x{} with {} graphics",
            config.title, self.width, self.height, config.graphics
        );
        if let Err(e) = hooks.on_initialize(self, args) {
            error!("game initialization failed: {e}");
            self.pending_load = None;
            if let Some(mut graphics) = self.graphics.take() {
                graphics.on_finalize();
            }
            return Err(e);
        }
        Ok(())
    }

    /// Run one tick: poll platform events, then dispatch on the current state.
    ///
    /// Returns `false` when the platform requests termination, in which case
    /// nothing is dispatched.
    pub fn frame(&mut self, hooks: &mut dyn GameHooks) -> bool {
        let (mut width, mut height) = (self.width, self.height);
        let terminate = self.platform.process_events(
            &mut width,
            &mut height,
            &mut self.flags.debug,
            &mut self.flags.reset,
            &mut self.mouse,
        );
        if terminate {
            debug!("platform requested termination");
            return false;
        }
        if (width, height) != (self.width, self.height) {
            self.resize(hooks, width, height);
        }

        let elapsed = self.lifecycle.begin_frame();
        match self.state() {
            GameState::Uninitialized => {
                hooks.initialize_splash(self);
                hooks.initialize_loading(self);
                self.lifecycle.set_state(GameState::Splash);
            }
            GameState::Splash => {
                hooks.on_splash(self, elapsed);
                self.splash.advance(elapsed);
                if self.state() == GameState::Splash && self.splash.is_empty() {
                    self.lifecycle.set_state(GameState::Loading);
                }
                self.lifecycle.end_frame();
            }
            GameState::Loading => {
                hooks.on_loading(self, elapsed);
                if self.state() == GameState::Loading {
                    self.poll_scene_load(hooks);
                }
                self.lifecycle.end_frame();
            }
            GameState::Running => {
                hooks.on_update(self, elapsed);
                self.lifecycle.end_frame();
            }
            GameState::Paused => {}
        }
        true
    }

    fn poll_scene_load(&mut self, hooks: &mut dyn GameHooks) {
        let Some(pending) = self.pending_load.as_mut() else {
            self.lifecycle.set_state(GameState::Running);
            return;
        };
        let Poll::Ready(result) = pending.task.poll() else {
            return;
        };
        let url = self
            .pending_load
            .take()
            .map(|pending| pending.url)
            .unwrap_or_default();

        self.lifecycle.set_state(GameState::Running);
        match result {
            Ok(asset) => match asset.into_scene() {
                Some(scene) => {
                    info!("scene '{url}' loaded");
                    hooks.on_scene_load(self, scene);
                }
                None => error!("'{url}' did not load as a scene"),
            },
            Err(e) => error!("failed to load scene '{url}': {e}"),
        }
    }

    /// Tear down the scene and graphics. Does nothing if the game never
    /// ran a frame.
    pub fn finalize(&mut self, hooks: &mut dyn GameHooks) {
        if self.state() == GameState::Uninitialized {
            return;
        }
        hooks.on_finalize(self);

        if let Some(scene) = self.scene.take() {
            debug!("finalizing scene '{}'", scene.borrow().name());
            scene.borrow_mut().on_finalize();
        }
        if let Some(mut graphics) = self.graphics.take() {
            debug!("finalizing graphics '{}'", graphics.name());
            graphics.on_finalize();
        }
        info!("finalized");
    }

    /// Finalize and return to UNINITIALIZED, ready to be initialized again.
    pub fn exit(&mut self, hooks: &mut dyn GameHooks) {
        if self.state() != GameState::Uninitialized {
            self.finalize(hooks);
            self.lifecycle.reset();
            self.splash.clear();
            self.pending_load = None;
        }
    }
}
