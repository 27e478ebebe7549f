//! Engine configuration and its load-or-create store
//!
//! The configuration is read once from a well-known TOML file. When the file
//! does not exist yet, defaults are written to it so later runs find it.

use crate::splash::SplashScreen;
use ember_core::{Reader, Result, Serializable, Serializer, TomlSerializer, Writer};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Well-known location of the engine configuration
pub const ENGINE_CONFIG_PATH: &str = "game.config.toml";

pub const DEFAULT_GRAPHICS: &str = "null";
pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;
pub const DEFAULT_FULLSCREEN: bool = false;
pub const DEFAULT_VSYNC: bool = true;
pub const DEFAULT_MULTISAMPLING: u32 = 0;
pub const DEFAULT_HOME_PATH: &str = "./";
pub const DEFAULT_MAIN_SCENE: &str = "main.scene";

/// Persisted engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub title: String,
    /// Name of the graphics backend to create
    pub graphics: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
    pub multisampling: u32,
    pub home_path: String,
    pub splash_screens: Vec<SplashScreen>,
    pub main_scene: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: String::new(),
            graphics: DEFAULT_GRAPHICS.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fullscreen: DEFAULT_FULLSCREEN,
            vsync: DEFAULT_VSYNC,
            multisampling: DEFAULT_MULTISAMPLING,
            home_path: DEFAULT_HOME_PATH.to_string(),
            splash_screens: Vec::new(),
            main_scene: DEFAULT_MAIN_SCENE.to_string(),
        }
    }
}

impl Serializable for Config {
    fn class_name(&self) -> &'static str {
        "ember::Config"
    }

    fn on_serialize(&self, writer: &mut dyn Writer) -> Result<()> {
        writer.write_string(Some("title"), &self.title, "")?;
        writer.write_string(Some("graphics"), &self.graphics, DEFAULT_GRAPHICS)?;
        writer.write_int("width", self.width.into(), DEFAULT_WIDTH.into())?;
        writer.write_int("height", self.height.into(), DEFAULT_HEIGHT.into())?;
        writer.write_bool("fullscreen", self.fullscreen, DEFAULT_FULLSCREEN)?;
        writer.write_bool("vsync", self.vsync, DEFAULT_VSYNC)?;
        writer.write_int(
            "multisampling",
            self.multisampling.into(),
            DEFAULT_MULTISAMPLING.into(),
        )?;
        writer.write_string(Some("home_path"), &self.home_path, DEFAULT_HOME_PATH)?;
        writer.write_string_list("splash_screens", self.splash_screens.len())?;
        for splash in &self.splash_screens {
            writer.write_string(None, &splash.encode(), "")?;
        }
        writer.write_string(Some("main_scene"), &self.main_scene, DEFAULT_MAIN_SCENE)?;
        Ok(())
    }

    fn on_deserialize(&mut self, reader: &mut dyn Reader) -> Result<()> {
        self.title = reader.read_string(Some("title"), "");
        self.graphics = reader.read_string(Some("graphics"), DEFAULT_GRAPHICS);
        self.width = read_dimension(reader, "width", DEFAULT_WIDTH);
        self.height = read_dimension(reader, "height", DEFAULT_HEIGHT);
        self.fullscreen = reader.read_bool("fullscreen", DEFAULT_FULLSCREEN);
        self.vsync = reader.read_bool("vsync", DEFAULT_VSYNC);
        self.multisampling = read_u32(reader, "multisampling", DEFAULT_MULTISAMPLING);
        self.home_path = reader.read_string(Some("home_path"), DEFAULT_HOME_PATH);

        let count = reader.read_string_list("splash_screens");
        self.splash_screens = (0..count)
            .filter_map(|_| SplashScreen::decode(&reader.read_string(None, "")))
            .collect();

        self.main_scene = reader.read_string(Some("main_scene"), DEFAULT_MAIN_SCENE);
        Ok(())
    }
}

fn read_u32(reader: &mut dyn Reader, name: &str, default: u32) -> u32 {
    let value = reader.read_int(name, default.into());
    u32::try_from(value).unwrap_or_else(|_| {
        warn!("config field '{name}' = {value} is out of range, using {default}");
        default
    })
}

fn read_dimension(reader: &mut dyn Reader, name: &str, default: u32) -> u32 {
    match read_u32(reader, name, default) {
        0 => {
            warn!("config field '{name}' must be positive, using {default}");
            default
        }
        value => value,
    }
}

/// Lazily loads the engine [`Config`], creating it on first run.
pub struct ConfigStore {
    path: PathBuf,
    serializer: Box<dyn Serializer>,
    config: Option<Config>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Store backed by [`ENGINE_CONFIG_PATH`] in TOML format
    pub fn new() -> Self {
        Self::with_path(ENGINE_CONFIG_PATH)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self::with_serializer(path, TomlSerializer::new())
    }

    pub fn with_serializer(path: impl Into<PathBuf>, serializer: impl Serializer + 'static) -> Self {
        Self {
            path: path.into(),
            serializer: Box::new(serializer),
            config: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the configuration has been resolved yet
    pub fn is_loaded(&self) -> bool {
        self.config.is_some()
    }

    /// The resolved configuration, if [`ConfigStore::get_config`] already ran
    pub fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    /// Resolve the configuration on first call and return it.
    ///
    /// Loads the file when it exists. Otherwise default values are written to
    /// the file and returned. Failing to write defaults is an error.
    pub fn get_config(&mut self) -> Result<&Config> {
        let config = match self.config.take() {
            Some(config) => config,
            None => self.resolve()?,
        };
        Ok(self.config.insert(config))
    }

    fn resolve(&self) -> Result<Config> {
        let mut config = Config::default();
        match self.serializer.create_reader(&self.path)? {
            Some(mut reader) => {
                let loaded = reader.read_object(None, &mut config);
                let closed = reader.close();
                loaded?;
                closed?;
                info!("loaded config from {}", self.path.display());
            }
            None => {
                info!(
                    "no config at {}, writing defaults",
                    self.path.display()
                );
                let mut writer = self.serializer.create_writer(&self.path)?;
                let written = writer.write_object(None, &config);
                let closed = writer.close();
                if let Err(e) = written.and(closed) {
                    // Never leave a half-written config behind for the next run.
                    if let Err(remove) = fs::remove_file(&self.path) {
                        debug!("could not remove {}: {remove}", self.path.display());
                    }
                    return Err(e);
                }
            }
        }
        debug!("config: {config:?}");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{EmberError, TomlReader, TomlWriter};

    fn temp_config(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("ember_config_test");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join(name);
        let _ = fs::remove_file(&path);
        path
    }

    fn sample() -> Config {
        Config {
            title: "Demo".into(),
            graphics: "vulkan".into(),
            width: 1920,
            height: 1080,
            fullscreen: true,
            vsync: false,
            multisampling: 4,
            home_path: "assets/".into(),
            splash_screens: vec![
                SplashScreen::new("studio.png", 3.5),
                SplashScreen::with_default_duration("engine.png"),
            ],
            main_scene: "level1.scene".into(),
        }
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut writer = TomlWriter::new(None);
        writer.write_object(None, &sample()).unwrap();
        let text = writer.render().unwrap();
        assert!(text.contains("\"studio.png:3.5\""));

        let mut reader = TomlReader::parse(&text).unwrap();
        let mut restored = Config::default();
        reader.read_object(None, &mut restored).unwrap();
        assert_eq!(restored, sample());
    }

    #[test]
    fn malformed_splash_entries_recover() {
        let text = r#"
            splash_screens = ["a.png:3.5", "b.png", "c.png:notanumber", ""]
        "#;
        let mut reader = TomlReader::parse(text).unwrap();
        let mut config = Config::default();
        reader.read_object(None, &mut config).unwrap();

        assert_eq!(
            config.splash_screens,
            vec![
                SplashScreen::new("a.png", 3.5),
                SplashScreen::with_default_duration("b.png"),
                SplashScreen::with_default_duration("c.png"),
            ]
        );
    }

    #[test]
    fn out_of_range_integers_use_defaults() {
        let text = "width = -5\nheight = 0\nmultisampling = 99999999999";
        let mut reader = TomlReader::parse(text).unwrap();
        let mut config = Config::default();
        reader.read_object(None, &mut config).unwrap();
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.multisampling, DEFAULT_MULTISAMPLING);
    }

    #[test]
    fn missing_file_creates_defaults() {
        let path = temp_config("created.toml");
        let mut store = ConfigStore::with_path(&path);
        assert!(!store.is_loaded());

        let config = store.get_config().expect("config").clone();
        assert_eq!(config, Config::default());
        assert!(store.is_loaded());
        assert!(path.exists());

        // A fresh store (as in a new process) reads the same values back.
        let mut fresh = ConfigStore::with_path(&path);
        assert_eq!(fresh.get_config().expect("reload"), &config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn existing_file_is_loaded_not_overwritten() {
        let path = temp_config("existing.toml");
        fs::write(&path, "title = \"Custom\"\nwidth = 800\n").unwrap();

        let mut store = ConfigStore::with_path(&path);
        let config = store.get_config().expect("config");
        assert_eq!(config.title, "Custom");
        assert_eq!(config.width, 800);
        assert_eq!(config.height, DEFAULT_HEIGHT);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "title = \"Custom\"\nwidth = 800\n");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_is_memoized() {
        let path = temp_config("memoized.toml");
        let mut store = ConfigStore::with_path(&path);
        store.get_config().expect("first");

        // Later edits on disk are not observed by the same store.
        fs::write(&path, "title = \"Changed\"\n").unwrap();
        assert_eq!(store.get_config().expect("second").title, "");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let path = temp_config("broken.toml");
        fs::write(&path, "title = ").unwrap();

        let mut store = ConfigStore::with_path(&path);
        assert!(store.get_config().is_err());
        assert!(!store.is_loaded());
        assert_eq!(fs::read_to_string(&path).unwrap(), "title = ");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let blocker = temp_config("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let mut store = ConfigStore::with_path(blocker.join("game.config.toml"));
        assert!(store.get_config().is_err());

        let _ = fs::remove_file(&blocker);
    }

    #[test]
    fn class_mismatch_is_an_error() {
        let path = temp_config("other_class.toml");
        let content = "class = \"game::Settings\"\ntitle = \"Other\"\n";
        fs::write(&path, content).unwrap();

        let mut store = ConfigStore::with_path(&path);
        let err = store.get_config().unwrap_err();
        assert!(matches!(err, EmberError::ClassMismatch { .. }));
        assert!(!store.is_loaded());
        assert_eq!(fs::read_to_string(&path).unwrap(), content);

        let _ = fs::remove_file(&path);
    }

    /// Creates the target file, then hands out a writer aimed beneath it,
    /// so `close` always fails.
    struct FailingCloseSerializer;

    impl Serializer for FailingCloseSerializer {
        fn create_reader(&self, _path: &Path) -> Result<Option<Box<dyn Reader>>> {
            Ok(None)
        }

        fn create_writer(&self, path: &Path) -> Result<Box<dyn Writer>> {
            fs::write(path, "")?;
            Ok(Box::new(TomlWriter::new(Some(path.join("config.toml")))))
        }
    }

    #[test]
    fn failed_write_leaves_no_file_behind() {
        let path = temp_config("failed_write.toml");

        let mut store = ConfigStore::with_serializer(&path, FailingCloseSerializer);
        assert!(store.get_config().is_err());
        assert!(!store.is_loaded());
        assert!(!path.exists());

        // A retry with a working serializer creates the defaults.
        let mut retry = ConfigStore::with_path(&path);
        assert_eq!(retry.get_config().expect("retry"), &Config::default());

        let _ = fs::remove_file(&path);
    }
}
