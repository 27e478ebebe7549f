//! Loadable asset kinds and the loader registry
//!
//! The kind of an asset is decided from its url, and each kind has one
//! registered loader. Loads are polled, so a loader may finish immediately
//! or over several frames.

use crate::scene::SceneRef;
use ember_core::{EmberError, Result};
use log::debug;
use std::collections::HashMap;
use std::path::Path;
use std::task::Poll;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Scene,
}

impl AssetKind {
    /// Classify a url by its file name. Both `*.scene` and `*.scene.toml`
    /// are scenes.
    pub fn from_url(url: &str) -> Option<Self> {
        let file_name = Path::new(url).file_name()?.to_str()?.to_ascii_lowercase();
        if file_name.ends_with(".scene") || file_name.ends_with(".scene.toml") {
            Some(AssetKind::Scene)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetKind::Scene => "scene",
        }
    }
}

/// A loaded asset, tagged by kind
pub enum Asset {
    Scene(SceneRef),
}

impl Asset {
    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Scene(_) => AssetKind::Scene,
        }
    }

    pub fn into_scene(self) -> Option<SceneRef> {
        match self {
            Asset::Scene(scene) => Some(scene),
        }
    }
}

/// An in-flight load, polled once per loading frame.
pub trait LoadTask {
    fn poll(&mut self) -> Poll<Result<Asset>>;
}

/// A load that is already complete and resolves on its first poll.
pub struct ReadyTask {
    result: Option<Result<Asset>>,
}

impl ReadyTask {
    pub fn new(result: Result<Asset>) -> Self {
        Self {
            result: Some(result),
        }
    }
}

impl LoadTask for ReadyTask {
    fn poll(&mut self) -> Poll<Result<Asset>> {
        match self.result.take() {
            Some(result) => Poll::Ready(result),
            None => Poll::Ready(Err(EmberError::AssetError(
                "load task polled after completion".into(),
            ))),
        }
    }
}

/// Starts loads for one [`AssetKind`].
pub trait AssetLoader {
    fn begin_load(&mut self, url: &str) -> Result<Box<dyn LoadTask>>;
}

/// Loaders keyed by asset kind
#[derive(Default)]
pub struct AssetRegistry {
    loaders: HashMap<AssetKind, Box<dyn AssetLoader>>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the loader for `kind`.
    pub fn register(&mut self, kind: AssetKind, loader: impl AssetLoader + 'static) {
        self.loaders.insert(kind, Box::new(loader));
    }

    pub fn has_loader(&self, kind: AssetKind) -> bool {
        self.loaders.contains_key(&kind)
    }

    /// Start loading `url` with the loader registered for `kind`.
    pub fn begin_load(&mut self, kind: AssetKind, url: &str) -> Result<Box<dyn LoadTask>> {
        let Some(loader) = self.loaders.get_mut(&kind) else {
            return Err(EmberError::AssetError(format!(
                "no loader registered for {} assets",
                kind.as_str()
            )));
        };
        debug!("loading {} '{url}'", kind.as_str());
        loader.begin_load(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{scene_ref, EmptyScene};

    struct ImmediateSceneLoader;

    impl AssetLoader for ImmediateSceneLoader {
        fn begin_load(&mut self, url: &str) -> Result<Box<dyn LoadTask>> {
            Ok(Box::new(ReadyTask::new(Ok(Asset::Scene(scene_ref(
                EmptyScene::new(url),
            ))))))
        }
    }

    #[test]
    fn kind_from_url() {
        assert_eq!(AssetKind::from_url("main.scene"), Some(AssetKind::Scene));
        assert_eq!(
            AssetKind::from_url("levels/Arena.Scene.toml"),
            Some(AssetKind::Scene)
        );
        assert_eq!(AssetKind::from_url("splash.png"), None);
        assert_eq!(AssetKind::from_url(""), None);
    }

    #[test]
    fn registry_dispatches_by_kind() {
        let mut registry = AssetRegistry::new();
        assert!(!registry.has_loader(AssetKind::Scene));
        assert!(registry.begin_load(AssetKind::Scene, "a.scene").is_err());

        registry.register(AssetKind::Scene, ImmediateSceneLoader);
        let mut task = registry.begin_load(AssetKind::Scene, "a.scene").unwrap();
        match task.poll() {
            Poll::Ready(Ok(asset)) => {
                assert_eq!(asset.kind(), AssetKind::Scene);
                let scene = asset.into_scene().unwrap();
                assert_eq!(scene.borrow().name(), "a.scene");
            }
            _ => panic!("expected a ready scene"),
        }
    }

    #[test]
    fn ready_task_resolves_once() {
        let mut task = ReadyTask::new(Ok(Asset::Scene(scene_ref(EmptyScene::new("x")))));
        assert!(matches!(task.poll(), Poll::Ready(Ok(_))));
        assert!(matches!(task.poll(), Poll::Ready(Err(_))));
    }
}
