//! Scene and camera slots
//!
//! Scenes and cameras are owned by the host. The game holds shared handles
//! to the current ones and treats every other holder as a borrower.

use std::cell::RefCell;
use std::rc::Rc;

/// The parts of a scene the lifecycle needs to drive.
pub trait SceneObject {
    fn name(&self) -> &str;

    fn is_loaded(&self) -> bool;

    /// Release the scene's loaded content. The object stays usable.
    fn unload(&mut self);

    /// Final teardown at shutdown
    fn on_finalize(&mut self);
}

pub type SceneRef = Rc<RefCell<dyn SceneObject>>;

/// Wrap a scene in a shared handle.
pub fn scene_ref(scene: impl SceneObject + 'static) -> SceneRef {
    Rc::new(RefCell::new(scene))
}

/// A scene with no content, used as the default loading placeholder.
#[derive(Debug, Clone)]
pub struct EmptyScene {
    name: String,
    loaded: bool,
    finalized: bool,
}

impl EmptyScene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loaded: true,
            finalized: false,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }
}

impl SceneObject for EmptyScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn unload(&mut self) {
        self.loaded = false;
    }

    fn on_finalize(&mut self) {
        self.loaded = false;
        self.finalized = true;
    }
}

/// The parts of a camera the lifecycle keeps in sync with the viewport.
pub trait Camera {
    fn aspect_ratio(&self) -> f32;

    fn set_aspect_ratio(&mut self, aspect: f32);
}

pub type CameraRef = Rc<RefCell<dyn Camera>>;

pub fn camera_ref(camera: impl Camera + 'static) -> CameraRef {
    Rc::new(RefCell::new(camera))
}

/// Perspective projection parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Field of view in degrees
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera for PerspectiveCamera {
    fn aspect_ratio(&self) -> f32 {
        self.aspect
    }

    fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
}
