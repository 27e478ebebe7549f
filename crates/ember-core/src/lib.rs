//! Ember Core - Foundational types for the Ember engine
//!
//! This crate provides the pieces every other Ember crate depends on:
//! - `EmberError` and the `Result` alias
//! - `Reader` / `Writer` / `Serializable` - the named-field serialization protocol
//! - `TomlSerializer` - the TOML-backed implementation of that protocol

mod error;
mod serialize;
mod toml_serializer;

pub use error::{EmberError, Result};
pub use serialize::{Reader, Serializable, Serializer, Writer};
pub use toml_serializer::{TomlReader, TomlSerializer, TomlWriter};
