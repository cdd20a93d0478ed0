//! Format-neutral parse tree
//!
//! JSON and YAML input both deserialize into [`Node`] through one serde
//! implementation. Mapping keys are stringified and duplicate keys are
//! kept on record so the reader can report them.

use crate::openapi::ParsingContext;
use indexmap::IndexMap;
use oaslice_common::{escape_segment, DiagnosticKind, Format, OpenApiError, Result};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Number, Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Mapping),
}

/// Ordered mapping; on duplicate keys the last value wins
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: IndexMap<String, Node>,
    duplicates: Vec<String>,
}

impl Mapping {
    pub fn insert(&mut self, key: String, value: Node) {
        if self.entries.contains_key(&key) {
            self.duplicates.push(key.clone());
        }
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys that appeared more than once, in order of their repeat
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}

/// Parse text in the given syntax
pub fn parse(text: &str, format: Format) -> Result<Node> {
    let malformed = |message: String| OpenApiError::MalformedSyntax { format, message };
    match format {
        Format::Json => serde_json::from_str(text).map_err(|e| malformed(e.to_string())),
        Format::Yaml => serde_yaml::from_str(text).map_err(|e| malformed(e.to_string())),
    }
}

impl Node {
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Sequence(_) => "sequence",
            Node::Mapping(_) => "mapping",
        }
    }

    /// Convert into an untyped JSON value
    pub fn to_value(&self) -> Value {
        match self {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::String(s) => Value::String(s.clone()),
            Node::Sequence(items) => Value::Array(items.iter().map(Node::to_value).collect()),
            Node::Mapping(mapping) => Value::Object(
                mapping
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_value()))
                    .collect(),
            ),
        }
    }
}

/// A node together with its JSON-pointer location
#[derive(Debug, Clone)]
pub struct ParseNode<'a> {
    pub node: &'a Node,
    pub pointer: String,
}

impl<'a> ParseNode<'a> {
    pub fn root(node: &'a Node) -> Self {
        Self {
            node,
            pointer: "#".to_string(),
        }
    }

    pub fn child(&self, segment: &str, node: &'a Node) -> ParseNode<'a> {
        ParseNode {
            node,
            pointer: format!("{}/{}", self.pointer, escape_segment(segment)),
        }
    }

    fn mismatch(&self, expected: &str, ctx: &mut ParsingContext) {
        ctx.report(
            DiagnosticKind::TypeCoercion,
            &self.pointer,
            format!("expected {}, found {}", expected, self.node.kind()),
        );
    }

    /// Mapping view; reports duplicate keys once per conversion
    pub fn as_map(&self, ctx: &mut ParsingContext) -> Option<MapNode<'a>> {
        match self.node {
            Node::Mapping(mapping) => {
                for key in mapping.duplicates() {
                    ctx.report(
                        DiagnosticKind::DuplicateKey,
                        &self.pointer,
                        format!("duplicate key '{}', last value wins", key),
                    );
                }
                Some(MapNode {
                    mapping,
                    pointer: self.pointer.clone(),
                })
            }
            _ => {
                self.mismatch("mapping", ctx);
                None
            }
        }
    }

    pub fn as_sequence(&self, ctx: &mut ParsingContext) -> Option<Vec<ParseNode<'a>>> {
        match self.node {
            Node::Sequence(items) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| self.child(&index.to_string(), item))
                    .collect(),
            ),
            _ => {
                self.mismatch("sequence", ctx);
                None
            }
        }
    }

    /// Scalar as text; numbers and booleans are rendered, null is absent
    pub fn as_string(&self, ctx: &mut ParsingContext) -> Option<String> {
        match self.node {
            Node::String(s) => Some(s.clone()),
            Node::Number(n) => Some(n.to_string()),
            Node::Bool(b) => Some(b.to_string()),
            Node::Null => None,
            _ => {
                self.mismatch("string", ctx);
                None
            }
        }
    }

    /// Boolean, also accepting the strings `"true"` and `"false"`
    pub fn as_bool(&self, ctx: &mut ParsingContext) -> Option<bool> {
        match self.node {
            Node::Bool(b) => Some(*b),
            Node::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Node::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => {
                self.mismatch("boolean", ctx);
                None
            }
        }
    }

    /// Number, also accepting numeric strings
    pub fn as_number(&self, ctx: &mut ParsingContext) -> Option<Number> {
        match self.node {
            Node::Number(n) => Some(n.clone()),
            Node::String(s) => match parse_number(s) {
                Some(n) => Some(n),
                None => {
                    self.mismatch("number", ctx);
                    None
                }
            },
            _ => {
                self.mismatch("number", ctx);
                None
            }
        }
    }

    pub fn as_u64(&self, ctx: &mut ParsingContext) -> Option<u64> {
        let number = self.as_number(ctx)?;
        match number.as_u64() {
            Some(value) => Some(value),
            None => match number.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Some(f as u64),
                _ => {
                    self.mismatch("non-negative integer", ctx);
                    None
                }
            },
        }
    }

    /// Sequence of strings; a lone string is read as a one-element list
    pub fn as_string_list(&self, ctx: &mut ParsingContext) -> Vec<String> {
        match self.node {
            Node::Sequence(_) => self
                .as_sequence(ctx)
                .unwrap_or_default()
                .iter()
                .filter_map(|item| item.as_string(ctx))
                .collect(),
            Node::String(s) => vec![s.clone()],
            _ => {
                self.mismatch("sequence of strings", ctx);
                Vec::new()
            }
        }
    }

    pub fn to_value(&self) -> Value {
        self.node.to_value()
    }
}

fn parse_number(text: &str) -> Option<Number> {
    let text = text.trim();
    if let Ok(value) = text.parse::<u64>() {
        return Some(Number::from(value));
    }
    if let Ok(value) = text.parse::<i64>() {
        return Some(Number::from(value));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

/// A mapping node together with its location
#[derive(Debug, Clone)]
pub struct MapNode<'a> {
    mapping: &'a Mapping,
    pub pointer: String,
}

impl<'a> MapNode<'a> {
    pub fn get(&self, key: &str) -> Option<ParseNode<'a>> {
        self.mapping.get(key).map(|node| self.child(key, node))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.mapping.contains_key(key)
    }

    /// Entries in document order
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, ParseNode<'a>)> + '_ {
        self.mapping
            .iter()
            .map(move |(key, node)| (key, self.child(key, node)))
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    fn child(&self, key: &str, node: &'a Node) -> ParseNode<'a> {
        ParseNode {
            node,
            pointer: format!("{}/{}", self.pointer, escape_segment(key)),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON or YAML value")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<Node, E> {
        Ok(Node::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Node, E> {
        Ok(Node::Number(value.into()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Node, E> {
        Ok(Node::Number(value.into()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<Node, E> {
        match Number::from_f64(value) {
            Some(number) => Ok(Node::Number(number)),
            // .inf and .nan have no JSON form
            None => Ok(Node::String(value.to_string())),
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Node, E> {
        Ok(Node::String(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<Node, E> {
        Ok(Node::String(value))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Node>()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = Mapping::default();
        while let Some(MappingKey(key)) = map.next_key::<MappingKey>()? {
            let value = map.next_value::<Node>()?;
            mapping.insert(key, value);
        }
        Ok(Node::Mapping(mapping))
    }
}

/// Any scalar key, stringified (`200:` becomes `"200"`)
struct MappingKey(String);

impl<'de> Deserialize<'de> for MappingKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MappingKeyVisitor)
    }
}

struct MappingKeyVisitor;

impl<'de> Visitor<'de> for MappingKeyVisitor {
    type Value = MappingKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> std::result::Result<MappingKey, E> {
        Ok(MappingKey(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<MappingKey, E> {
        Ok(MappingKey(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<MappingKey, E> {
        Ok(MappingKey(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<MappingKey, E> {
        Ok(MappingKey(value.to_string()))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<MappingKey, E> {
        Ok(MappingKey(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> std::result::Result<MappingKey, E> {
        Ok(MappingKey(value))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<MappingKey, E> {
        Ok(MappingKey("null".to_string()))
    }
}
