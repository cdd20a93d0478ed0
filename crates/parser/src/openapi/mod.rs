//! OpenAPI / Swagger reader
//!
//! Reads Swagger 2.0, OpenAPI 3.0 and 3.1 documents, JSON or YAML, into the
//! version-agnostic [`Document`](oaslice_common::Document) model.
//!
//! ## Reading
//! Parsing runs in two passes. The first turns the parse tree into model
//! objects through one field-dispatch grammar per version; the second binds
//! every `$ref` (see [`crate::resolver`]).
//!
//! ## Usage
//! ```rust,ignore
//! use oaslice_parser::openapi::{OpenApiReader, ReaderSettings};
//!
//! let result = OpenApiReader::new(ReaderSettings::default()).from_file("petstore.yaml")?;
//! for diagnostic in result.diagnostics.iter() {
//!     eprintln!("{}", diagnostic);
//! }
//! ```

mod context;
pub mod fields;
mod parser;
pub mod v2;
pub mod v3;
pub mod v31;

pub use context::{grammar_for, ParsingContext};
pub use fields::{FieldMap, Grammar};
pub use parser::{OpenApiReader, ReadResult, ReaderSettings};

pub(crate) use parser::{parse_document, Parsed};
