//! Graphics subsystem boundary and backend registry

use crate::config::Config;
use ember_core::{EmberError, Result};
use log::{debug, info};
use std::collections::HashMap;

/// Name under which [`NullGraphics`] is always registered
pub const NULL_GRAPHICS: &str = "null";

/// Lifecycle of a graphics backend. Rendering itself happens elsewhere.
pub trait Graphics {
    fn name(&self) -> &str;

    fn on_initialize(&mut self, config: &Config) -> Result<()>;

    fn on_finalize(&mut self);
}

/// Debug and reset flags the platform may toggle while polling events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphicsFlags {
    pub debug: bool,
    pub reset: bool,
}

/// Backend that renders nothing, for headless runs and tests.
#[derive(Debug, Default)]
pub struct NullGraphics {
    initialized: bool,
}

impl NullGraphics {
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl Graphics for NullGraphics {
    fn name(&self) -> &str {
        NULL_GRAPHICS
    }

    fn on_initialize(&mut self, config: &Config) -> Result<()> {
        debug!("null graphics initialized at {}x{}", config.width, config.height);
        self.initialized = true;
        Ok(())
    }

    fn on_finalize(&mut self) {
        self.initialized = false;
    }
}

pub type GraphicsFactory = Box<dyn Fn(&Config) -> Result<Box<dyn Graphics>>>;

/// Graphics backends by name. The configured name picks one at startup.
pub struct GraphicsRegistry {
    factories: HashMap<String, GraphicsFactory>,
}

impl Default for GraphicsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsRegistry {
    /// Registry containing only the [`NullGraphics`] backend
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register(NULL_GRAPHICS, |_| {
            Ok(Box::new(NullGraphics::default()) as Box<dyn Graphics>)
        });
        registry
    }

    /// Register or replace the backend called `name`.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&Config) -> Result<Box<dyn Graphics>> + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Construct the backend called `name`. It is not initialized yet.
    pub fn create(&self, name: &str, config: &Config) -> Result<Box<dyn Graphics>> {
        let Some(factory) = self.factories.get(name) else {
            return Err(EmberError::GraphicsError(format!(
                "graphics backend '{name}' is not registered"
            )));
        };
        info!("creating graphics backend '{name}'");
        factory(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_backend_is_builtin() {
        let registry = GraphicsRegistry::new();
        assert!(registry.contains(NULL_GRAPHICS));
        let graphics = registry.create(NULL_GRAPHICS, &Config::default()).unwrap();
        assert_eq!(graphics.name(), NULL_GRAPHICS);
    }

    #[test]
    fn unknown_backend_is_an_error() {
        let registry = GraphicsRegistry::new();
        let err = registry.create("vulkan", &Config::default()).err().unwrap();
        assert!(matches!(err, EmberError::GraphicsError(_)));
    }

    #[test]
    fn null_backend_tracks_initialization() {
        let mut graphics = NullGraphics::default();
        graphics.on_initialize(&Config::default()).unwrap();
        assert!(graphics.is_initialized());
        graphics.on_finalize();
        assert!(!graphics.is_initialized());
    }
}
