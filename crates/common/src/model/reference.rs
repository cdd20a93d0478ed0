//! `$ref` indirection and component identity
//!
//! A [`Reference`] never owns or copies its target. Resolution binds a
//! [`ReferenceTarget`], which is a (document, category, name) identity that
//! is looked up through [`crate::Document::resolve`]. Reference cycles are
//! therefore plain cycles in the key graph, never recursive structures.

use percent_encoding::percent_decode_str;
use std::fmt;

/// Component category, in the canonical walk and serialization order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Schema,
    Response,
    Parameter,
    Example,
    RequestBody,
    Header,
    SecurityScheme,
    Link,
    Callback,
    PathItem,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 10] = [
        ComponentKind::Schema,
        ComponentKind::Response,
        ComponentKind::Parameter,
        ComponentKind::Example,
        ComponentKind::RequestBody,
        ComponentKind::Header,
        ComponentKind::SecurityScheme,
        ComponentKind::Link,
        ComponentKind::Callback,
        ComponentKind::PathItem,
    ];

    /// Section name under `components` in 3.x documents
    pub fn section(&self) -> &'static str {
        match self {
            ComponentKind::Schema => "schemas",
            ComponentKind::Response => "responses",
            ComponentKind::Parameter => "parameters",
            ComponentKind::Example => "examples",
            ComponentKind::RequestBody => "requestBodies",
            ComponentKind::Header => "headers",
            ComponentKind::SecurityScheme => "securitySchemes",
            ComponentKind::Link => "links",
            ComponentKind::Callback => "callbacks",
            ComponentKind::PathItem => "pathItems",
        }
    }

    pub fn from_section(section: &str) -> Option<Self> {
        ComponentKind::ALL
            .into_iter()
            .find(|kind| kind.section() == section)
    }

    /// Root section holding this category in Swagger 2.0 documents
    ///
    /// Request bodies live among the global `parameters` as `in: body`
    /// parameters; the other 3.x-only categories have no 2.0 home.
    pub fn v2_section(&self) -> Option<&'static str> {
        match self {
            ComponentKind::Schema => Some("definitions"),
            ComponentKind::Parameter | ComponentKind::RequestBody => Some("parameters"),
            ComponentKind::Response => Some("responses"),
            ComponentKind::SecurityScheme => Some("securityDefinitions"),
            _ => None,
        }
    }

    /// Singular human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Schema => "schema",
            ComponentKind::Response => "response",
            ComponentKind::Parameter => "parameter",
            ComponentKind::Example => "example",
            ComponentKind::RequestBody => "request body",
            ComponentKind::Header => "header",
            ComponentKind::SecurityScheme => "security scheme",
            ComponentKind::Link => "link",
            ComponentKind::Callback => "callback",
            ComponentKind::PathItem => "path item",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.section())
    }
}

/// Identity of a component entry: unique per (category, name) in a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey {
    pub kind: ComponentKind,
    pub name: String,
}

impl ComponentKey {
    pub fn new(kind: ComponentKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Local 3.x pointer, e.g. `#/components/schemas/Pet`
    pub fn pointer(&self) -> String {
        format!(
            "#/components/{}/{}",
            self.kind.section(),
            escape_segment(&self.name)
        )
    }

    /// Local 2.0 pointer, e.g. `#/definitions/Pet`
    pub fn v2_pointer(&self) -> Option<String> {
        self.kind
            .v2_section()
            .map(|section| format!("#/{}/{}", section, escape_segment(&self.name)))
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.section(), self.name)
    }
}

/// Where a resolved reference points
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceTarget {
    /// A component of the document that contains the reference
    Local(ComponentKey),
    /// A component of a recorded external document
    External { locator: String, key: ComponentKey },
}

impl ReferenceTarget {
    pub fn key(&self) -> &ComponentKey {
        match self {
            ReferenceTarget::Local(key) => key,
            ReferenceTarget::External { key, .. } => key,
        }
    }
}

/// A `$ref` standing in for a model node
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Literal pointer as written in the source
    pub pointer: String,
    /// Category the referencing slot expects
    pub kind: ComponentKind,
    /// 3.1 reference-level summary override
    pub summary: Option<String>,
    /// 3.1 reference-level description override
    pub description: Option<String>,
    target: Option<ReferenceTarget>,
}

impl Reference {
    pub fn new(pointer: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            pointer: pointer.into(),
            kind,
            summary: None,
            description: None,
            target: None,
        }
    }

    /// Reference to a local component, already bound
    pub fn local(key: ComponentKey) -> Self {
        let mut reference = Self::new(key.pointer(), key.kind);
        reference.target = Some(ReferenceTarget::Local(key));
        reference
    }

    /// Document part of the pointer, `None` for same-document references
    pub fn locator(&self) -> Option<&str> {
        let locator = match self.pointer.split_once('#') {
            Some((locator, _)) => locator,
            None => self.pointer.as_str(),
        };
        if locator.is_empty() {
            None
        } else {
            Some(locator)
        }
    }

    /// JSON-pointer part after `#`; empty when the pointer names a whole document
    pub fn fragment(&self) -> &str {
        self.pointer
            .split_once('#')
            .map(|(_, fragment)| fragment)
            .unwrap_or("")
    }

    pub fn is_external(&self) -> bool {
        self.locator().is_some()
    }

    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&ReferenceTarget> {
        self.target.as_ref()
    }

    /// Bound local key, if the target is in the same document
    pub fn local_key(&self) -> Option<&ComponentKey> {
        match &self.target {
            Some(ReferenceTarget::Local(key)) => Some(key),
            _ => None,
        }
    }

    /// Bind the target; binding the same target again is a no-op
    pub fn bind(&mut self, target: ReferenceTarget) {
        self.target = Some(target);
    }

    pub fn unbind(&mut self) {
        self.target = None;
    }
}

/// Why a fragment could not be mapped onto a component key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerError {
    /// The pointer does not address a components registry entry
    Unsupported,
    /// The pointer addresses a registry of another category
    KindMismatch(ComponentKind),
}

/// Map a fragment such as `/components/schemas/Pet` or `/definitions/Pet`
/// onto the component key for a slot expecting `expected`
pub fn fragment_key(fragment: &str, expected: ComponentKind) -> Result<ComponentKey, PointerError> {
    let trimmed = fragment.strip_prefix('/').ok_or(PointerError::Unsupported)?;
    let segments: Vec<&str> = trimmed.split('/').collect();

    let (kind, name) = match segments.as_slice() {
        ["components", section, name] => {
            let kind = ComponentKind::from_section(section).ok_or(PointerError::Unsupported)?;
            (kind, *name)
        }
        ["definitions", name] => (ComponentKind::Schema, *name),
        ["responses", name] => (ComponentKind::Response, *name),
        ["securityDefinitions", name] => (ComponentKind::SecurityScheme, *name),
        // 2.0 global parameters hold both plain and body parameters
        ["parameters", name] => match expected {
            ComponentKind::RequestBody => (ComponentKind::RequestBody, *name),
            _ => (ComponentKind::Parameter, *name),
        },
        _ => return Err(PointerError::Unsupported),
    };

    if kind != expected {
        return Err(PointerError::KindMismatch(kind));
    }

    let name = unescape_segment(name);
    if name.is_empty() {
        return Err(PointerError::Unsupported);
    }
    Ok(ComponentKey::new(kind, name))
}

/// Escape one JSON-pointer segment (`~` → `~0`, `/` → `~1`)
pub fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Undo JSON-pointer escaping and URI percent-encoding of one segment
pub fn unescape_segment(segment: &str) -> String {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    decoded.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_and_fragment() {
        let local = Reference::new("#/components/schemas/Pet", ComponentKind::Schema);
        assert_eq!(local.locator(), None);
        assert_eq!(local.fragment(), "/components/schemas/Pet");
        assert!(!local.is_external());

        let external = Reference::new("common.yaml#/components/schemas/Error", ComponentKind::Schema);
        assert_eq!(external.locator(), Some("common.yaml"));
        assert_eq!(external.fragment(), "/components/schemas/Error");

        let whole = Reference::new("pet.yaml", ComponentKind::Schema);
        assert_eq!(whole.locator(), Some("pet.yaml"));
        assert_eq!(whole.fragment(), "");
    }

    #[test]
    fn test_fragment_key_v3_and_v2() {
        assert_eq!(
            fragment_key("/components/schemas/Pet", ComponentKind::Schema),
            Ok(ComponentKey::new(ComponentKind::Schema, "Pet"))
        );
        assert_eq!(
            fragment_key("/definitions/Pet", ComponentKind::Schema),
            Ok(ComponentKey::new(ComponentKind::Schema, "Pet"))
        );
        assert_eq!(
            fragment_key("/parameters/PetBody", ComponentKind::RequestBody),
            Ok(ComponentKey::new(ComponentKind::RequestBody, "PetBody"))
        );
        assert_eq!(
            fragment_key("/components/parameters/limit", ComponentKind::Schema),
            Err(PointerError::KindMismatch(ComponentKind::Parameter))
        );
        assert_eq!(
            fragment_key("/paths/~1pets/get", ComponentKind::Schema),
            Err(PointerError::Unsupported)
        );
    }

    #[test]
    fn test_segment_escaping() {
        assert_eq!(escape_segment("a/b~c"), "a~1b~0c");
        assert_eq!(unescape_segment("a~1b~0c"), "a/b~c");
        assert_eq!(unescape_segment("Pet%20Profile"), "Pet Profile");
    }

    #[test]
    fn test_local_reference_is_bound() {
        let reference = Reference::local(ComponentKey::new(ComponentKind::Response, "NotFound"));
        assert_eq!(reference.pointer, "#/components/responses/NotFound");
        assert!(reference.is_resolved());
        assert_eq!(
            reference.local_key(),
            Some(&ComponentKey::new(ComponentKind::Response, "NotFound"))
        );
    }
}
