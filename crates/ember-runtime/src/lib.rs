//! Ember Runtime - Application lifecycle
//!
//! Provides the pieces that sequence a running game:
//! - `Game` - the context driven once per tick through `frame()`
//! - `Lifecycle` / `GameState` - splash, loading, running and paused phases
//! - `Clock` - monotonic time with pause accounting
//! - `FrameRateCounter` - frames per sampling window
//! - `ConfigStore` / `Config` - load-or-create engine configuration
//! - `GameHooks` - override points for the host application
//! - `Platform`, `Graphics`, `SceneObject`, `Camera`, `AssetLoader` - collaborator traits

mod asset;
mod clock;
mod config;
mod frame_rate;
mod game;
mod graphics;
mod hooks;
mod platform;
mod scene;
mod splash;
mod state;

pub use asset::{Asset, AssetKind, AssetLoader, AssetRegistry, LoadTask, ReadyTask};
pub use clock::{Clock, ManualTimeSource, MonotonicTimeSource, TimeSource};
pub use config::{
    Config, ConfigStore, DEFAULT_FULLSCREEN, DEFAULT_GRAPHICS, DEFAULT_HEIGHT, DEFAULT_HOME_PATH,
    DEFAULT_MAIN_SCENE, DEFAULT_MULTISAMPLING, DEFAULT_VSYNC, DEFAULT_WIDTH, ENGINE_CONFIG_PATH,
};
pub use frame_rate::{FrameRateCounter, FRAME_RATE_WINDOW};
pub use game::Game;
pub use graphics::{
    Graphics, GraphicsFactory, GraphicsFlags, GraphicsRegistry, NullGraphics, NULL_GRAPHICS,
};
pub use hooks::GameHooks;
pub use platform::{HeadlessPlatform, MouseState, Platform, PlatformHandle};
pub use scene::{camera_ref, scene_ref, Camera, CameraRef, EmptyScene, PerspectiveCamera, SceneObject, SceneRef};
pub use splash::{SplashQueue, SplashScreen, DEFAULT_SPLASH_DURATION};
pub use state::{GameState, Lifecycle};
