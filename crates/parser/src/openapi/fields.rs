//! Data-driven field dispatch
//!
//! Every model type has a [`FieldMap`] per OpenAPI version: fixed keys map to
//! a handler, pattern rules (extensions, open map sections) are tried in
//! registration order, and anything else is reported. A [`Grammar`] groups
//! the maps of one version.

use super::ParsingContext;
use crate::node::{MapNode, ParseNode};
use indexmap::IndexMap;
use oaslice_common::{
    is_extension, Callback, Component, ComponentKind, Components, Contact, DiagnosticKind, Discriminator,
    Document, Encoding, Example, Extensions, ExternalDocs, Header, Info, License, Link, MediaType,
    OAuthFlow, OAuthFlows, Operation, Parameter, PathItem, RefOr, Reference, RequestBody,
    Response, Schema, SecurityScheme, Server, ServerVariable, Tag, Xml,
};

pub type FixedField<T> = fn(&mut T, ParseNode<'_>, &mut ParsingContext);
pub type PatternField<T> = fn(&mut T, &str, ParseNode<'_>, &mut ParsingContext);
pub type KeyPredicate = fn(&str) -> bool;
pub type StartHook<T> = fn(&mut T, &MapNode<'_>, &mut ParsingContext);
pub type FinishHook<T> = fn(&mut T, &mut ParsingContext);

pub struct FieldMap<T> {
    fixed: IndexMap<&'static str, FixedField<T>>,
    patterns: Vec<(KeyPredicate, PatternField<T>)>,
    required: Vec<&'static str>,
    unmatched: DiagnosticKind,
    start: Option<StartHook<T>>,
    finish: Option<FinishHook<T>>,
}

impl<T> Clone for FieldMap<T> {
    fn clone(&self) -> Self {
        Self {
            fixed: self.fixed.clone(),
            patterns: self.patterns.clone(),
            required: self.required.clone(),
            unmatched: self.unmatched,
            start: self.start,
            finish: self.finish,
        }
    }
}

impl<T> Default for FieldMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FieldMap<T> {
    pub fn new() -> Self {
        Self {
            fixed: IndexMap::new(),
            patterns: Vec::new(),
            required: Vec::new(),
            unmatched: DiagnosticKind::UnknownField,
            start: None,
            finish: None,
        }
    }

    /// Add or replace a fixed field
    pub fn fixed(mut self, key: &'static str, field: FixedField<T>) -> Self {
        self.fixed.insert(key, field);
        self
    }

    pub fn pattern(mut self, predicate: KeyPredicate, field: PatternField<T>) -> Self {
        self.patterns.push((predicate, field));
        self
    }

    /// Replace the set of keys reported when absent
    pub fn required(mut self, keys: &[&'static str]) -> Self {
        self.required = keys.to_vec();
        self
    }

    /// Run before any field, with the whole mapping in view
    pub fn on_start(mut self, hook: StartHook<T>) -> Self {
        self.start = Some(hook);
        self
    }

    /// Run after every field has been applied
    pub fn on_finish(mut self, hook: FinishHook<T>) -> Self {
        self.finish = Some(hook);
        self
    }

    /// Diagnostic kind for keys no rule accepts
    pub fn unmatched(mut self, kind: DiagnosticKind) -> Self {
        self.unmatched = kind;
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.fixed.shift_remove(key);
        self
    }

    pub fn fixed_field(&self, key: &str) -> Option<FixedField<T>> {
        self.fixed.get(key).copied()
    }

    pub fn has_fixed(&self, key: &str) -> bool {
        self.fixed.contains_key(key)
    }

    /// Dispatch every entry of `map` onto `target`, in document order
    pub fn apply(&self, target: &mut T, map: &MapNode<'_>, ctx: &mut ParsingContext) {
        if let Some(start) = self.start {
            start(target, map, ctx);
        }
        for (key, value) in map.iter() {
            if let Some(field) = self.fixed.get(key) {
                field(target, value, ctx);
            } else if let Some((_, field)) = self.patterns.iter().find(|(matches, _)| matches(key))
            {
                field(target, key, value, ctx);
            } else {
                let message = match self.unmatched {
                    DiagnosticKind::IgnoredSibling => {
                        format!("'{}' next to $ref is ignored", key)
                    }
                    _ => format!("unknown field '{}'", key),
                };
                ctx.report(self.unmatched, value.pointer, message);
            }
        }
        for key in &self.required {
            if !map.contains_key(key) {
                ctx.missing(&map.pointer, key);
            }
        }
        if let Some(finish) = self.finish {
            finish(target, ctx);
        }
    }
}

/// Model types carrying vendor extensions
pub trait Extensible {
    fn extensions_mut(&mut self) -> &mut Extensions;
}

macro_rules! impl_extensible {
    ($($ty:ty),* $(,)?) => {
        $(impl Extensible for $ty {
            fn extensions_mut(&mut self) -> &mut Extensions {
                &mut self.extensions
            }
        })*
    };
}

impl_extensible!(
    Document,
    Info,
    Contact,
    License,
    Server,
    ServerVariable,
    ExternalDocs,
    Tag,
    PathItem,
    Operation,
    Parameter,
    RequestBody,
    MediaType,
    Encoding,
    Response,
    Header,
    Example,
    Link,
    Callback,
    Schema,
    Discriminator,
    Xml,
    SecurityScheme,
    OAuthFlows,
    OAuthFlow,
    Components,
);

fn store_extension<T: Extensible>(
    target: &mut T,
    key: &str,
    value: ParseNode<'_>,
    _ctx: &mut ParsingContext,
) {
    target
        .extensions_mut()
        .insert(key.to_string(), value.to_value());
}

impl<T: Extensible> FieldMap<T> {
    /// Accept `x-` keys as raw extension values
    pub fn extensions(self) -> Self {
        self.pattern(is_extension, store_extension::<T>)
    }
}

/// Key predicate for open map sections
pub fn any_key(_key: &str) -> bool {
    true
}

/// One field map per model type for an OpenAPI version
#[derive(Clone, Default)]
pub struct Grammar {
    pub document: FieldMap<Document>,
    pub info: FieldMap<Info>,
    pub contact: FieldMap<Contact>,
    pub license: FieldMap<License>,
    pub server: FieldMap<Server>,
    pub server_variable: FieldMap<ServerVariable>,
    pub external_docs: FieldMap<ExternalDocs>,
    pub tag: FieldMap<Tag>,
    pub path_item: FieldMap<PathItem>,
    pub operation: FieldMap<Operation>,
    pub parameter: FieldMap<Parameter>,
    pub request_body: FieldMap<RequestBody>,
    pub media_type: FieldMap<MediaType>,
    pub encoding: FieldMap<Encoding>,
    pub response: FieldMap<Response>,
    pub header: FieldMap<Header>,
    pub example: FieldMap<Example>,
    pub link: FieldMap<Link>,
    pub callback: FieldMap<Callback>,
    pub schema: FieldMap<Schema>,
    pub discriminator: FieldMap<Discriminator>,
    pub xml: FieldMap<Xml>,
    pub security_scheme: FieldMap<SecurityScheme>,
    pub oauth_flows: FieldMap<OAuthFlows>,
    pub oauth_flow: FieldMap<OAuthFlow>,
    pub components: FieldMap<Components>,
    pub reference: FieldMap<Reference>,
}

/// Model types with a field map in every grammar
pub trait Grammatical: Default {
    fn fields(grammar: &Grammar) -> &FieldMap<Self>;
}

macro_rules! impl_grammatical {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(impl Grammatical for $ty {
            fn fields(grammar: &Grammar) -> &FieldMap<Self> {
                &grammar.$field
            }
        })*
    };
}

impl_grammatical!(
    Document => document,
    Info => info,
    Contact => contact,
    License => license,
    Server => server,
    ServerVariable => server_variable,
    ExternalDocs => external_docs,
    Tag => tag,
    PathItem => path_item,
    Operation => operation,
    Parameter => parameter,
    RequestBody => request_body,
    MediaType => media_type,
    Encoding => encoding,
    Response => response,
    Header => header,
    Example => example,
    Link => link,
    Callback => callback,
    Schema => schema,
    Discriminator => discriminator,
    Xml => xml,
    SecurityScheme => security_scheme,
    OAuthFlows => oauth_flows,
    OAuthFlow => oauth_flow,
    Components => components,
);

/// Load an object of type `T` from a mapping node
pub fn load<T: Grammatical>(node: &ParseNode<'_>, ctx: &mut ParsingContext) -> Option<T> {
    let map = node.as_map(ctx)?;
    Some(load_map(&map, ctx))
}

pub fn load_map<T: Grammatical>(map: &MapNode<'_>, ctx: &mut ParsingContext) -> T {
    let grammar = ctx.grammar;
    let mut target = T::default();
    T::fields(grammar).apply(&mut target, map, ctx);
    target
}

/// Load a `$ref` or an inline object
pub fn load_ref_or<T: Grammatical + Component>(
    node: &ParseNode<'_>,
    ctx: &mut ParsingContext,
) -> Option<RefOr<T>> {
    let map = node.as_map(ctx)?;
    if map.contains_key("$ref") {
        return load_reference(&map, T::KIND, ctx).map(RefOr::Ref);
    }
    Some(RefOr::Item(load_map(&map, ctx)))
}

/// Build a reference from a mapping holding `$ref`
pub fn load_reference(
    map: &MapNode<'_>,
    kind: ComponentKind,
    ctx: &mut ParsingContext,
) -> Option<Reference> {
    let pointer = map.get("$ref")?.as_string(ctx)?;
    let mut reference = Reference::new(pointer, kind);
    let grammar = ctx.grammar;
    grammar.reference.apply(&mut reference, map, ctx);
    Some(reference)
}

/// Load every entry of a mapping with `load_entry`
pub fn load_named<T>(
    node: &ParseNode<'_>,
    ctx: &mut ParsingContext,
    mut load_entry: impl FnMut(&ParseNode<'_>, &mut ParsingContext) -> Option<T>,
) -> IndexMap<String, T> {
    let mut entries = IndexMap::new();
    if let Some(map) = node.as_map(ctx) {
        for (key, value) in map.iter() {
            if let Some(entry) = load_entry(&value, ctx) {
                entries.insert(key.to_string(), entry);
            }
        }
    }
    entries
}

/// Load every element of a sequence with `load_entry`
pub fn load_list<T>(
    node: &ParseNode<'_>,
    ctx: &mut ParsingContext,
    mut load_entry: impl FnMut(&ParseNode<'_>, &mut ParsingContext) -> Option<T>,
) -> Vec<T> {
    node.as_sequence(ctx)
        .unwrap_or_default()
        .iter()
        .filter_map(|item| load_entry(item, ctx))
        .collect()
}

/// Load a mapping of strings
pub fn load_string_map(node: &ParseNode<'_>, ctx: &mut ParsingContext) -> IndexMap<String, String> {
    load_named(node, ctx, |value, ctx| value.as_string(ctx))
}
