//! OpenAPI document serialization for oaslice
//!
//! The writer owns every version-specific output decision: the same
//! [`Document`] can be written as Swagger 2.0, OpenAPI 3.0 or OpenAPI 3.1,
//! in JSON or YAML, whatever version it was read from.
//!
//! ## Output rules
//!
//! - Field order is fixed per object type and maps keep insertion order, so
//!   identical documents always produce identical text.
//! - Resolved references are written as `$ref` pointers in the target
//!   version's vocabulary (`#/definitions/Pet` for 2.0,
//!   `#/components/schemas/Pet` for 3.x). Unresolved ones keep their
//!   literal pointer.
//! - [`WriterSettings::inline_local`] and [`WriterSettings::inline_external`]
//!   replace references with their targets. A reference back into a target
//!   that is already being inlined is written as `$ref`, so cycles end.
//! - Content the target version cannot express is dropped and reported as a
//!   `NotRepresentable` diagnostic.
//!
//! ## Usage
//! ```rust,ignore
//! use oaslice_writer::{OpenApiWriter, WriterSettings};
//! use oaslice_common::{Format, SpecVersion};
//!
//! let writer = OpenApiWriter::new(WriterSettings {
//!     format: Format::Json,
//!     version: Some(SpecVersion::V3_1),
//!     ..Default::default()
//! });
//! let output = writer.write(&document)?;
//! println!("{}", output.text);
//! ```

mod emitter;
mod object;
mod refs;
mod v2;
mod v3;

use emitter::Emitter;
use oaslice_common::{Diagnostics, Document, Format, Result, SpecVersion};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// How a document is written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriterSettings {
    pub format: Format,
    /// Target version; `None` keeps the version the document was read as
    pub version: Option<SpecVersion>,
    /// Inline targets of references within the document
    pub inline_local: bool,
    /// Inline targets of references into other documents
    pub inline_external: bool,
    /// Compact JSON without indentation; YAML output is unaffected
    pub terse: bool,
}

/// Serialized text and what was lost on the way
#[derive(Debug, Clone)]
pub struct WriteResult {
    pub text: String,
    pub diagnostics: Diagnostics,
}

/// OpenAPI document writer
pub struct OpenApiWriter {
    settings: WriterSettings,
}

impl OpenApiWriter {
    pub fn new(settings: WriterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    /// Shape the document into the target version's JSON tree
    pub fn write_value(&self, document: &Document) -> (Value, Diagnostics) {
        let target = self.settings.version.unwrap_or(document.spec_version);
        debug!(
            source = %document.spec_version,
            target = %target,
            inline_local = self.settings.inline_local,
            inline_external = self.settings.inline_external,
            "writing document"
        );

        let mut emitter = Emitter::new(document, target, &self.settings);
        let value = match target {
            SpecVersion::V2_0 => emitter.document_v2(),
            SpecVersion::V3_0 | SpecVersion::V3_1 => emitter.document_v3(),
        };
        let diagnostics = emitter.into_diagnostics();
        debug!(diagnostics = diagnostics.len(), "document shaped");
        (value, diagnostics)
    }

    /// Serialize the document to text
    pub fn write(&self, document: &Document) -> Result<WriteResult> {
        let (value, diagnostics) = self.write_value(document);
        let text = match self.settings.format {
            Format::Json if self.settings.terse => serde_json::to_string(&value)?,
            Format::Json => {
                let mut text = serde_json::to_string_pretty(&value)?;
                text.push('\n');
                text
            }
            Format::Yaml => serde_yaml::to_string(&value)?,
        };
        Ok(WriteResult { text, diagnostics })
    }

    /// Serialize the document into a file
    pub fn write_to_file<P: AsRef<Path>>(&self, document: &Document, path: P) -> Result<Diagnostics> {
        let output = self.write(document)?;
        fs::write(path.as_ref(), output.text).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to write {}: {}", path.as_ref().display(), e),
            )
        })?;
        Ok(output.diagnostics)
    }
}
