//! Common types and utilities for oaslice
//!
//! This crate contains the version-agnostic OpenAPI document model, the
//! reference and component identity types, the diagnostics channel, and the
//! generic walker used by the reader, the filter and every visitor.

pub mod cancel;
pub mod diagnostics;
pub mod model;
pub mod version;
pub mod walker;

pub use cancel::CancellationToken;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use model::*;
pub use version::{Format, SpecVersion};
pub use walker::{Visitor, Walk, WalkContext, Walker};

use indexmap::IndexMap;
use thiserror::Error;

/// Errors that abort a read, filter or write
///
/// Everything recoverable is reported through [`Diagnostics`] instead.
#[derive(Error, Debug)]
pub enum OpenApiError {
    #[error("Malformed {format} input: {message}")]
    MalformedSyntax { format: Format, message: String },

    #[error("Conflicting filter criteria: {0}")]
    ConflictingFilterCriteria(String),

    #[error("Invalid OpenAPI version: {0}")]
    InvalidVersion(String),

    #[error("Failed to load external document {locator}: {message}")]
    ExternalDocument { locator: String, message: String },

    #[error("Operation cancelled before {0}")]
    Cancelled(&'static str),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for oaslice operations
pub type Result<T> = std::result::Result<T, OpenApiError>;

/// URI template → HTTP methods, the normalized shape every request-URL
/// importer produces and the filter consumes
pub type RequestUrls = IndexMap<String, Vec<String>>;
