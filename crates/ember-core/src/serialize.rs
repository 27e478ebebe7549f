//! Named-field serialization protocol
//!
//! Objects describe their own schema by calling `read_*` / `write_*` with a
//! field name and a declared default. Unnamed calls (`name = None`) address the
//! elements of the string list opened by the last `read_string_list` /
//! `write_string_list` call.

use crate::Result;
use std::path::Path;

/// An object that can be written to and restored from a [`Writer`] / [`Reader`].
pub trait Serializable {
    /// Stable class identifier stored alongside root objects.
    fn class_name(&self) -> &'static str;

    /// Write every field of this object.
    fn on_serialize(&self, writer: &mut dyn Writer) -> Result<()>;

    /// Read every field of this object, falling back to declared defaults
    /// for absent fields.
    fn on_deserialize(&mut self, reader: &mut dyn Reader) -> Result<()>;
}

/// Read side of the protocol.
pub trait Reader {
    /// Read a string field, or the next list element when `name` is `None`.
    fn read_string(&mut self, name: Option<&str>, default: &str) -> String;

    fn read_int(&mut self, name: &str, default: i64) -> i64;

    fn read_bool(&mut self, name: &str, default: bool) -> bool;

    fn read_float(&mut self, name: &str, default: f64) -> f64;

    /// Open a string list and return its length. Elements are consumed by
    /// subsequent unnamed `read_string` calls.
    fn read_string_list(&mut self, name: &str) -> usize;

    /// Restore `object` from the table called `name`, or from the root when
    /// `name` is `None`.
    fn read_object(&mut self, name: Option<&str>, object: &mut dyn Serializable) -> Result<()>;

    /// Release the underlying resource.
    fn close(&mut self) -> Result<()>;
}

/// Write side of the protocol.
pub trait Writer {
    /// Write a string field, or the next list element when `name` is `None`.
    fn write_string(&mut self, name: Option<&str>, value: &str, default: &str) -> Result<()>;

    fn write_int(&mut self, name: &str, value: i64, default: i64) -> Result<()>;

    fn write_bool(&mut self, name: &str, value: bool, default: bool) -> Result<()>;

    fn write_float(&mut self, name: &str, value: f64, default: f64) -> Result<()>;

    /// Open a string list of `count` elements, filled by the next `count`
    /// unnamed `write_string` calls.
    fn write_string_list(&mut self, name: &str, count: usize) -> Result<()>;

    /// Write `object` as the table called `name`, or at the root when `name`
    /// is `None`.
    fn write_object(&mut self, name: Option<&str>, object: &dyn Serializable) -> Result<()>;

    /// Flush and release the underlying resource.
    fn close(&mut self) -> Result<()>;
}

/// Factory for readers and writers bound to a storage path.
pub trait Serializer {
    /// Open a reader. Returns `Ok(None)` when the resource does not exist.
    fn create_reader(&self, path: &Path) -> Result<Option<Box<dyn Reader>>>;

    /// Open a writer. Failing to open for write is an error.
    fn create_writer(&self, path: &Path) -> Result<Box<dyn Writer>>;
}
