//! TOML-backed implementation of the serialization protocol
//!
//! Objects map onto TOML tables. Root objects are written at the top level
//! together with a `class` key that readers check before restoring fields.

use crate::serialize::{Reader, Serializable, Serializer, Writer};
use crate::{EmberError, Result};
use log::{trace, warn};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

const CLASS_KEY: &str = "class";

/// Creates [`TomlReader`]s and [`TomlWriter`]s for files on disk.
#[derive(Debug, Clone, Default)]
pub struct TomlSerializer {
    skip_defaults: bool,
}

impl TomlSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Omit scalar fields whose value equals their declared default.
    pub fn with_skip_defaults(mut self, skip: bool) -> Self {
        self.skip_defaults = skip;
        self
    }
}

impl Serializer for TomlSerializer {
    fn create_reader(&self, path: &Path) -> Result<Option<Box<dyn Reader>>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let reader = TomlReader::parse(&content)?;
        trace!("opened reader for {}", path.display());
        Ok(Some(Box::new(reader)))
    }

    fn create_writer(&self, path: &Path) -> Result<Box<dyn Writer>> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // Probe writability up front without truncating an existing file.
        fs::OpenOptions::new().create(true).append(true).open(path)?;
        trace!("opened writer for {}", path.display());
        Ok(Box::new(
            TomlWriter::new(Some(path.to_path_buf())).with_skip_defaults(self.skip_defaults),
        ))
    }
}

//=== Reader ===============================================================

/// Reads named fields out of a parsed TOML document.
pub struct TomlReader {
    /// Table stack: root first, innermost object last
    scopes: Vec<toml::Table>,
    /// Remaining elements of the currently open string list
    list: VecDeque<toml::Value>,
    closed: bool,
}

impl TomlReader {
    /// Parse a TOML document into a reader positioned at the root.
    pub fn parse(content: &str) -> Result<Self> {
        let root: toml::Table = toml::from_str(content)?;
        Ok(Self::from_table(root))
    }

    pub fn from_table(root: toml::Table) -> Self {
        Self {
            scopes: vec![root],
            list: VecDeque::new(),
            closed: false,
        }
    }

    fn field(&self, name: &str) -> Option<&toml::Value> {
        if self.closed {
            return None;
        }
        self.scopes.last().and_then(|scope| scope.get(name))
    }

    fn check_class(scope: &toml::Table, object: &dyn Serializable) -> Result<()> {
        match scope.get(CLASS_KEY).and_then(|v| v.as_str()) {
            Some(class) if class != object.class_name() => Err(EmberError::ClassMismatch {
                expected: object.class_name().to_string(),
                got: class.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl Reader for TomlReader {
    fn read_string(&mut self, name: Option<&str>, default: &str) -> String {
        let value = match name {
            Some(name) => self.field(name).cloned(),
            None => self.list.pop_front(),
        };
        match value {
            Some(toml::Value::String(s)) => s,
            Some(other) => {
                warn!(
                    "expected string for '{}', found {}; using default",
                    name.unwrap_or("<list element>"),
                    other.type_str()
                );
                default.to_string()
            }
            None => default.to_string(),
        }
    }

    fn read_int(&mut self, name: &str, default: i64) -> i64 {
        match self.field(name) {
            Some(toml::Value::Integer(i)) => *i,
            Some(other) => {
                warn!("expected integer for '{name}', found {}; using default", other.type_str());
                default
            }
            None => default,
        }
    }

    fn read_bool(&mut self, name: &str, default: bool) -> bool {
        match self.field(name) {
            Some(toml::Value::Boolean(b)) => *b,
            Some(other) => {
                warn!("expected boolean for '{name}', found {}; using default", other.type_str());
                default
            }
            None => default,
        }
    }

    fn read_float(&mut self, name: &str, default: f64) -> f64 {
        match self.field(name) {
            Some(toml::Value::Float(f)) => *f,
            Some(toml::Value::Integer(i)) => *i as f64,
            Some(other) => {
                warn!("expected float for '{name}', found {}; using default", other.type_str());
                default
            }
            None => default,
        }
    }

    fn read_string_list(&mut self, name: &str) -> usize {
        self.list = match self.field(name) {
            Some(toml::Value::Array(items)) => items.iter().cloned().collect(),
            Some(other) => {
                warn!("expected array for '{name}', found {}; treating as empty", other.type_str());
                VecDeque::new()
            }
            None => VecDeque::new(),
        };
        self.list.len()
    }

    fn read_object(&mut self, name: Option<&str>, object: &mut dyn Serializable) -> Result<()> {
        if self.closed {
            return Err(EmberError::SerializationError("reader is closed".into()));
        }
        match name {
            None => {
                if let Some(root) = self.scopes.first() {
                    Self::check_class(root, object)?;
                }
                object.on_deserialize(self)
            }
            Some(name) => {
                let table = match self.field(name) {
                    Some(toml::Value::Table(table)) => table.clone(),
                    Some(other) => {
                        return Err(EmberError::SerializationError(format!(
                            "expected table for '{name}', found {}",
                            other.type_str()
                        )))
                    }
                    None => toml::Table::new(),
                };
                Self::check_class(&table, object)?;
                self.scopes.push(table);
                let result = object.on_deserialize(self);
                self.scopes.pop();
                result
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.list.clear();
        self.scopes.truncate(1);
        Ok(())
    }
}

//=== Writer ===============================================================

struct OpenList {
    name: String,
    items: Vec<toml::Value>,
    expected: usize,
}

/// Accumulates named fields into a TOML document, written out on `close()`.
pub struct TomlWriter {
    path: Option<PathBuf>,
    /// Table stack: root first, innermost object last (with its field name)
    scopes: Vec<(Option<String>, toml::Table)>,
    list: Option<OpenList>,
    skip_defaults: bool,
    closed: bool,
}

impl TomlWriter {
    /// Create a writer. With `path = None` the document is only kept in memory
    /// and can be retrieved through [`TomlWriter::render`].
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            scopes: vec![(None, toml::Table::new())],
            list: None,
            skip_defaults: false,
            closed: false,
        }
    }

    pub fn with_skip_defaults(mut self, skip: bool) -> Self {
        self.skip_defaults = skip;
        self
    }

    /// Render the document written so far.
    pub fn render(&self) -> Result<String> {
        let root = self
            .scopes
            .first()
            .map(|(_, table)| table.clone())
            .unwrap_or_default();
        Ok(toml::to_string_pretty(&root)?)
    }

    fn ensure_writable(&self, name: &str) -> Result<()> {
        if self.closed {
            return Err(EmberError::SerializationError("writer is closed".into()));
        }
        if let Some(list) = &self.list {
            return Err(EmberError::SerializationError(format!(
                "cannot write '{name}' while list '{}' has {} of {} elements",
                list.name,
                list.items.len(),
                list.expected
            )));
        }
        Ok(())
    }

    fn insert(&mut self, name: &str, value: toml::Value) {
        if let Some((_, scope)) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    fn write_scalar<T: PartialEq>(
        &mut self,
        name: &str,
        value: T,
        default: T,
        to_value: impl FnOnce(T) -> toml::Value,
    ) -> Result<()> {
        self.ensure_writable(name)?;
        if self.skip_defaults && value == default {
            return Ok(());
        }
        self.insert(name, to_value(value));
        Ok(())
    }
}

impl Writer for TomlWriter {
    fn write_string(&mut self, name: Option<&str>, value: &str, default: &str) -> Result<()> {
        match name {
            Some(name) => self.write_scalar(name, value, default, |v| {
                toml::Value::String(v.to_string())
            }),
            None => {
                let Some(list) = self.list.as_mut() else {
                    return Err(EmberError::SerializationError(
                        "unnamed string written outside of a list".into(),
                    ));
                };
                list.items.push(toml::Value::String(value.to_string()));
                if list.items.len() == list.expected {
                    if let Some(list) = self.list.take() {
                        self.insert(&list.name, toml::Value::Array(list.items));
                    }
                }
                Ok(())
            }
        }
    }

    fn write_int(&mut self, name: &str, value: i64, default: i64) -> Result<()> {
        self.write_scalar(name, value, default, toml::Value::Integer)
    }

    fn write_bool(&mut self, name: &str, value: bool, default: bool) -> Result<()> {
        self.write_scalar(name, value, default, toml::Value::Boolean)
    }

    fn write_float(&mut self, name: &str, value: f64, default: f64) -> Result<()> {
        self.write_scalar(name, value, default, toml::Value::Float)
    }

    fn write_string_list(&mut self, name: &str, count: usize) -> Result<()> {
        self.ensure_writable(name)?;
        if count == 0 {
            self.insert(name, toml::Value::Array(Vec::new()));
        } else {
            self.list = Some(OpenList {
                name: name.to_string(),
                items: Vec::with_capacity(count),
                expected: count,
            });
        }
        Ok(())
    }

    fn write_object(&mut self, name: Option<&str>, object: &dyn Serializable) -> Result<()> {
        match name {
            None => {
                self.ensure_writable(CLASS_KEY)?;
                self.insert(CLASS_KEY, toml::Value::String(object.class_name().to_string()));
                object.on_serialize(self)
            }
            Some(name) => {
                self.ensure_writable(name)?;
                let mut table = toml::Table::new();
                table.insert(
                    CLASS_KEY.to_string(),
                    toml::Value::String(object.class_name().to_string()),
                );
                self.scopes.push((Some(name.to_string()), table));
                let result = object.on_serialize(self);
                if let Some((Some(field), table)) = self.scopes.pop() {
                    self.insert(&field, toml::Value::Table(table));
                }
                result
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        if let Some(list) = &self.list {
            return Err(EmberError::SerializationError(format!(
                "list '{}' closed with {} of {} elements",
                list.name,
                list.items.len(),
                list.expected
            )));
        }
        if let Some(path) = &self.path {
            fs::write(path, self.render()?)?;
        }
        self.closed = true;
        Ok(())
    }
}
