//! OpenAPI document reading for oaslice
//!
//! This crate turns JSON or YAML text into the
//! [`Document`](oaslice_common::Document) model and imports the request
//! lists used by the request-URL filter.
//!
//! ## Reading Strategy
//!
//! - The text is parsed into a format-neutral [`node::Node`] tree, keeping
//!   duplicate keys on record.
//! - A per-version field grammar (`2.0`, `3.0`, `3.1`) maps the tree onto
//!   the model. Unknown keys, wrong value shapes and missing required fields
//!   become diagnostics, never errors.
//! - The [`resolver`] binds every `$ref` to its target's identity, loading
//!   external documents on request.
//!
//! Request-URL importers:
//! - [`collection`]: Postman-style collections
//! - [`manifest`]: API manifests (`apiDependencies`)

pub mod collection;
pub mod loader;
pub mod manifest;
pub mod node;
pub mod openapi;
pub mod resolver;

pub use loader::FileLoader;
pub use openapi::{OpenApiReader, ReadResult, ReaderSettings};
pub use resolver::{DocumentLoader, ExternalResolution, Resolver};

use oaslice_common::Result;
use std::path::Path;

/// Read an OpenAPI document from a file with default settings
///
/// External references are recorded, not loaded.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<ReadResult> {
    OpenApiReader::new(ReaderSettings::default()).from_file(path)
}
