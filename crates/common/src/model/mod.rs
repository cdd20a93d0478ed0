//! Version-agnostic OpenAPI document model
//!
//! One superset model covers Swagger 2.0, OpenAPI 3.0 and 3.1. Version
//! differences live in the reader grammars and the writer only.

pub mod components;
pub mod document;
pub mod path;
pub mod reference;
pub mod schema;
pub mod security;

pub use components::{Component, Components};
pub use document::{
    Contact, Document, ExternalDocs, Info, License, Resolved, Server, ServerVariable, Tag,
};
pub use path::{
    Callback, Encoding, Example, Header, HttpMethod, Link, MediaType, Operation, Parameter,
    ParameterLocation, PathItem, RequestBody, Response,
};
pub use reference::{
    escape_segment, fragment_key, unescape_segment, ComponentKey, ComponentKind, PointerError,
    Reference, ReferenceTarget,
};
pub use schema::{AdditionalProperties, Discriminator, Schema, Xml};
pub use security::{OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme};

use indexmap::IndexMap;
use serde_json::Value;

/// Vendor extensions; keys always start with `x-`
pub type Extensions = IndexMap<String, Value>;

/// Whether a key belongs to the vendor extension namespace
pub fn is_extension(key: &str) -> bool {
    key.starts_with("x-")
}

/// Either a `$ref` or an inline value
#[derive(Debug, Clone, PartialEq)]
pub enum RefOr<T> {
    Ref(Reference),
    Item(T),
}

impl<T> RefOr<T> {
    pub fn as_item(&self) -> Option<&T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Ref(_) => None,
        }
    }

    pub fn as_item_mut(&mut self) -> Option<&mut T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Ref(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            RefOr::Ref(reference) => Some(reference),
            RefOr::Item(_) => None,
        }
    }

    pub fn is_ref(&self) -> bool {
        matches!(self, RefOr::Ref(_))
    }
}

impl<T: Default> Default for RefOr<T> {
    fn default() -> Self {
        RefOr::Item(T::default())
    }
}

impl<T> From<T> for RefOr<T> {
    fn from(item: T) -> Self {
        RefOr::Item(item)
    }
}
