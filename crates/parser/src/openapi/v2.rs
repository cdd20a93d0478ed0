//! Swagger 2.0 grammar
//!
//! Reads 2.0 documents straight into the 3.x-shaped model: body and
//! formData parameters become request bodies, response `schema` becomes
//! content keyed by `produces`, non-body parameter type keywords become an
//! inline schema, and `host`/`basePath`/`schemes` become servers.

use super::context::V2State;
use super::fields::{
    load, load_map, load_named, load_ref_or, load_reference, load_string_map, FieldMap, Grammar,
};
use super::v3::{self, set_bool};
use super::ParsingContext;
use crate::node::{MapNode, Node, ParseNode};
use oaslice_common::{
    unescape_segment, ComponentKind, Components, DiagnosticKind, Discriminator, Document, Header,
    OAuthFlows, Operation, Parameter, ParameterLocation, PathItem, RefOr, RequestBody, Response,
    Schema, SecurityScheme, Server,
};
use serde_json::Value;
use std::sync::LazyLock;

static GRAMMAR: LazyLock<Grammar> = LazyLock::new(build);

pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";

/// Parameter and header keywords that describe the value's type
const SCHEMA_KEYWORDS: &[&str] = &[
    "type",
    "format",
    "items",
    "default",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
    "maxLength",
    "minLength",
    "pattern",
    "maxItems",
    "minItems",
    "uniqueItems",
    "enum",
    "multipleOf",
];

fn is_schema_keyword(key: &str) -> bool {
    SCHEMA_KEYWORDS.contains(&key)
}

fn build() -> Grammar {
    let mut grammar = v3::build();
    grammar.document = document_fields();
    grammar.path_item = path_item_fields();
    grammar.operation = operation_fields();
    grammar.parameter = parameter_fields();
    grammar.request_body = body_parameter_fields();
    grammar.response = response_fields();
    grammar.header = header_fields();
    grammar.schema = schema_fields();
    grammar.security_scheme = security_scheme_fields();
    grammar.components = FieldMap::new();
    grammar
}

/// Route a type keyword onto the inline schema of a parameter or header
fn route_schema_keyword(
    slot: &mut Option<RefOr<Schema>>,
    key: &str,
    node: ParseNode<'_>,
    ctx: &mut ParsingContext,
) {
    let grammar = ctx.grammar;
    let Some(field) = grammar.schema.fixed_field(key) else {
        return;
    };
    if let Some(schema) = slot.get_or_insert_with(RefOr::default).as_item_mut() {
        field(schema, node, ctx);
    }
}

fn location<'a>(map: &MapNode<'a>) -> Option<&'a str> {
    match map.get("in")?.node {
        Node::String(location) => Some(location.as_str()),
        _ => None,
    }
}

fn prescan_document(_doc: &mut Document, map: &MapNode<'_>, ctx: &mut ParsingContext) {
    let mut state = V2State::default();
    if let Some(node) = map.get("consumes") {
        state.global_consumes = node.as_string_list(ctx);
    }
    if let Some(node) = map.get("produces") {
        state.global_produces = node.as_string_list(ctx);
    }
    if let Some(node) = map.get("schemes") {
        state.schemes = node.as_string_list(ctx);
    }
    state.host = map.get("host").and_then(|node| node.as_string(ctx));
    state.base_path = map.get("basePath").and_then(|node| node.as_string(ctx));

    if let Some(parameters) = map.get("parameters").and_then(|node| node.node.as_mapping()) {
        for (name, parameter) in parameters.iter() {
            let declared = parameter.as_mapping().and_then(|m| m.get("in"));
            match declared {
                Some(Node::String(location)) if location == "body" => {
                    state.body_parameters.insert(name.to_string());
                }
                Some(Node::String(location)) if location == "formData" => {
                    state
                        .form_parameters
                        .insert(name.to_string(), parameter.clone());
                }
                _ => {}
            }
        }
    }
    ctx.v2 = state;
}

/// `scheme://host/basePath` for every scheme, `https` when none is given
fn finish_document(doc: &mut Document, ctx: &mut ParsingContext) {
    let state = &ctx.v2;
    let base_path = state.base_path.clone().unwrap_or_default();
    doc.servers = match &state.host {
        Some(host) => {
            let schemes = if state.schemes.is_empty() {
                vec!["https".to_string()]
            } else {
                state.schemes.clone()
            };
            schemes
                .iter()
                .map(|scheme| Server {
                    url: format!("{}://{}{}", scheme, host.trim_end_matches('/'), base_path),
                    ..Default::default()
                })
                .collect()
        }
        None if !base_path.is_empty() => vec![Server {
            url: base_path,
            ..Default::default()
        }],
        None => Vec::new(),
    };
}

fn load_root_parameters(components: &mut Components, node: &ParseNode<'_>, ctx: &mut ParsingContext) {
    let Some(map) = node.as_map(ctx) else {
        return;
    };
    for (name, value) in map.iter() {
        let Some(entry) = value.as_map(ctx) else {
            continue;
        };
        match location(&entry) {
            Some("body") => {
                let body = load_map::<RequestBody>(&entry, ctx);
                components
                    .request_bodies
                    .insert(name.to_string(), RefOr::Item(body));
            }
            // inlined at every use
            Some("formData") => {}
            _ => {
                if let Some(parameter) = load_ref_or::<Parameter>(&value, ctx) {
                    components.parameters.insert(name.to_string(), parameter);
                }
            }
        }
    }
}

fn document_fields() -> FieldMap<Document> {
    FieldMap::<Document>::new()
        .fixed("swagger", |_, _, _| {})
        .fixed("info", |o, n, ctx| {
            if let Some(info) = load(&n, ctx) {
                o.info = info;
            }
        })
        .fixed("host", |_, _, _| {})
        .fixed("basePath", |_, _, _| {})
        .fixed("schemes", |_, _, _| {})
        .fixed("consumes", |_, _, _| {})
        .fixed("produces", |_, _, _| {})
        .fixed("paths", |o, n, ctx| {
            (o.paths, o.paths_extensions) = v3::load_paths(&n, ctx);
        })
        .fixed("definitions", |o, n, ctx| {
            o.components.schemas = load_named(&n, ctx, load_ref_or::<Schema>)
        })
        .fixed("parameters", |o, n, ctx| {
            load_root_parameters(&mut o.components, &n, ctx)
        })
        .fixed("responses", |o, n, ctx| {
            o.components.responses = load_named(&n, ctx, load_ref_or::<Response>)
        })
        .fixed("securityDefinitions", |o, n, ctx| {
            o.components.security_schemes = load_named(&n, ctx, load_ref_or::<SecurityScheme>)
        })
        .fixed("security", |o, n, ctx| o.security = v3::load_security(&n, ctx))
        .fixed("tags", |o, n, ctx| {
            o.tags = super::fields::load_list(&n, ctx, load::<oaslice_common::Tag>)
        })
        .fixed("externalDocs", |o, n, ctx| o.external_docs = load(&n, ctx))
        .extensions()
        .on_start(prescan_document)
        .on_finish(finish_document)
}

/// Operation or path-level parameters, split by where they land
#[derive(Default)]
struct SplitParameters {
    parameters: Vec<RefOr<Parameter>>,
    body: Option<RefOr<RequestBody>>,
    form: Vec<Parameter>,
}

impl SplitParameters {
    fn read(node: &ParseNode<'_>, ctx: &mut ParsingContext) -> Self {
        let mut split = Self::default();
        for item in node.as_sequence(ctx).unwrap_or_default() {
            let Some(map) = item.as_map(ctx) else {
                continue;
            };
            if map.contains_key("$ref") {
                split.push_reference(&map, ctx);
                continue;
            }
            match location(&map) {
                Some("body") => split.body = Some(RefOr::Item(load_map(&map, ctx))),
                Some("formData") => split.form.push(load_map(&map, ctx)),
                _ => split.parameters.push(RefOr::Item(load_map(&map, ctx))),
            }
        }
        split
    }

    fn push_reference(&mut self, map: &MapNode<'_>, ctx: &mut ParsingContext) {
        let Some(pointer) = map.get("$ref").and_then(|node| node.as_string(ctx)) else {
            return;
        };
        let name = pointer.strip_prefix("#/parameters/").map(unescape_segment);
        match name {
            Some(name) if ctx.v2.body_parameters.contains(&name) => {
                if let Some(reference) = load_reference(map, ComponentKind::RequestBody, ctx) {
                    self.body = Some(RefOr::Ref(reference));
                }
            }
            Some(name) if ctx.v2.form_parameters.contains_key(&name) => {
                let Some(node) = ctx.v2.form_parameters.get(&name).cloned() else {
                    return;
                };
                let shared = ParseNode {
                    node: &node,
                    pointer: pointer.clone(),
                };
                if let Some(field) = load::<Parameter>(&shared, ctx) {
                    self.form.push(field);
                }
            }
            _ => {
                if let Some(reference) = load_reference(map, ComponentKind::Parameter, ctx) {
                    self.parameters.push(RefOr::Ref(reference));
                }
            }
        }
    }

    /// A body parameter wins over formData parameters
    fn into_parts(
        self,
        consumes: &[String],
    ) -> (Vec<RefOr<Parameter>>, Option<RefOr<RequestBody>>) {
        let body = match self.body {
            Some(body) => Some(body),
            None if !self.form.is_empty() => Some(RefOr::Item(form_body(self.form, consumes))),
            None => None,
        };
        (self.parameters, body)
    }
}

/// Fold formData parameters into one object schema
fn form_body(fields: Vec<Parameter>, consumes: &[String]) -> RequestBody {
    let mut schema = Schema::of_type("object");
    let mut has_file = false;
    for field in fields {
        let mut property = match field.schema {
            Some(RefOr::Item(inline)) => inline,
            _ => Schema::default(),
        };
        has_file |= property.format.as_deref() == Some("binary");
        if property.description.is_none() {
            property.description = field.description;
        }
        if field.required {
            schema.required.push(field.name.clone());
        }
        schema.properties.insert(field.name, RefOr::Item(property));
    }

    let mut media_types: Vec<String> = consumes
        .iter()
        .filter(|media_type| [FORM_URLENCODED, MULTIPART].contains(&media_type.as_str()))
        .cloned()
        .collect();
    if media_types.is_empty() {
        let fallback = if has_file { MULTIPART } else { FORM_URLENCODED };
        media_types.push(fallback.to_string());
    }

    let mut body = RequestBody {
        required: !schema.required.is_empty(),
        ..Default::default()
    };
    for media_type in media_types {
        body.content.entry(media_type).or_default().schema = Some(RefOr::Item(schema.clone()));
    }
    body
}

fn path_item_fields() -> FieldMap<PathItem> {
    v3::path_item_operations(FieldMap::<PathItem>::new())
        .fixed("$ref", v3::drop_path_item_ref)
        .fixed("parameters", |o, n, ctx| {
            let split = SplitParameters::read(&n, ctx);
            let consumes = ctx.v2.consumes();
            let (parameters, body) = split.into_parts(&consumes);
            o.parameters = parameters;
            ctx.v2.path_body = body;
        })
        .extensions()
        .on_start(|_, _, ctx| ctx.v2.path_body = None)
        .on_finish(|o, ctx| {
            if let Some(body) = ctx.v2.path_body.take() {
                for operation in o.operations.values_mut() {
                    if operation.request_body.is_none() {
                        operation.request_body = Some(body.clone());
                    }
                }
            }
        })
}

fn operation_fields() -> FieldMap<Operation> {
    FieldMap::<Operation>::new()
        .fixed("tags", |o, n, ctx| o.tags = n.as_string_list(ctx))
        .fixed("summary", |o, n, ctx| o.summary = n.as_string(ctx))
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("externalDocs", |o, n, ctx| o.external_docs = load(&n, ctx))
        .fixed("operationId", |o, n, ctx| o.operation_id = n.as_string(ctx))
        .fixed("consumes", |_, _, _| {})
        .fixed("produces", |_, _, _| {})
        .fixed("schemes", |_, _, _| {})
        .fixed("parameters", |o, n, ctx| {
            let split = SplitParameters::read(&n, ctx);
            let consumes = ctx.v2.consumes();
            let (parameters, body) = split.into_parts(&consumes);
            o.parameters = parameters;
            o.request_body = body;
        })
        .fixed("responses", |o, n, ctx| {
            (o.responses, o.responses_extensions) = v3::load_responses(&n, ctx);
        })
        .fixed("deprecated", |o, n, ctx| set_bool(&mut o.deprecated, &n, ctx))
        .fixed("security", |o, n, ctx| {
            o.security = Some(v3::load_security(&n, ctx))
        })
        .extensions()
        .on_start(|_, map, ctx| {
            let consumes = map.get("consumes").map(|n| n.as_string_list(ctx));
            let produces = map.get("produces").map(|n| n.as_string_list(ctx));
            ctx.v2.operation_consumes = consumes;
            ctx.v2.operation_produces = produces;
        })
        .on_finish(|_, ctx| {
            ctx.v2.operation_consumes = None;
            ctx.v2.operation_produces = None;
        })
}

fn parameter_fields() -> FieldMap<Parameter> {
    FieldMap::<Parameter>::new()
        .fixed("name", |o, n, ctx| o.name = n.as_string(ctx).unwrap_or_default())
        .fixed("in", |o, n, ctx| {
            let Some(declared) = n.as_string(ctx) else {
                return;
            };
            match ParameterLocation::parse(&declared) {
                Some(location) => o.location = location,
                None if declared == "formData" || declared == "body" => {}
                None => ctx.report(
                    DiagnosticKind::TypeCoercion,
                    &n.pointer,
                    format!("unknown parameter location '{}'", declared),
                ),
            }
        })
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("required", |o, n, ctx| set_bool(&mut o.required, &n, ctx))
        .fixed("allowEmptyValue", |o, n, ctx| {
            set_bool(&mut o.allow_empty_value, &n, ctx)
        })
        .fixed("collectionFormat", |_, n, ctx| {
            let format = n.as_string(ctx);
            ctx.v2.collection_format = format;
        })
        .pattern(is_schema_keyword, |o, key, n, ctx| {
            route_schema_keyword(&mut o.schema, key, n, ctx)
        })
        .extensions()
        .required(&["name", "in"])
        .on_start(|_, _, ctx| ctx.v2.collection_format = None)
        .on_finish(apply_collection_format)
}

/// `collectionFormat` as 3.x `style`/`explode`
fn apply_collection_format(parameter: &mut Parameter, ctx: &mut ParsingContext) {
    let Some(format) = ctx.v2.collection_format.take() else {
        return;
    };
    let (style, explode) = match format.as_str() {
        "csv" => match parameter.location {
            ParameterLocation::Path | ParameterLocation::Header => ("simple", false),
            _ => ("form", false),
        },
        "multi" => ("form", true),
        "ssv" => ("spaceDelimited", false),
        "pipes" => ("pipeDelimited", false),
        _ => {
            parameter
                .extensions
                .insert("x-collectionFormat".to_string(), Value::String(format));
            return;
        }
    };
    parameter.style = Some(style.to_string());
    parameter.explode = Some(explode);
}

/// `in: body` parameters, read as request bodies
fn body_parameter_fields() -> FieldMap<RequestBody> {
    FieldMap::<RequestBody>::new()
        .fixed("name", |o, n, ctx| {
            if let Some(name) = n.as_string(ctx) {
                o.extensions
                    .insert("x-bodyName".to_string(), Value::String(name));
            }
        })
        .fixed("in", |_, _, _| {})
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("required", |o, n, ctx| set_bool(&mut o.required, &n, ctx))
        .fixed("schema", |o, n, ctx| {
            let Some(schema) = load_ref_or::<Schema>(&n, ctx) else {
                return;
            };
            for media_type in ctx.v2.consumes() {
                o.content.entry(media_type).or_default().schema = Some(schema.clone());
            }
        })
        .extensions()
        .required(&["name", "in"])
}

fn response_fields() -> FieldMap<Response> {
    FieldMap::<Response>::new()
        .fixed("description", |o, n, ctx| {
            o.description = n.as_string(ctx).unwrap_or_default()
        })
        .fixed("schema", |o, n, ctx| {
            let Some(schema) = load_ref_or::<Schema>(&n, ctx) else {
                return;
            };
            for media_type in ctx.v2.produces() {
                o.content.entry(media_type).or_default().schema = Some(schema.clone());
            }
        })
        .fixed("headers", |o, n, ctx| {
            o.headers = load_named(&n, ctx, |header, ctx| {
                load::<Header>(header, ctx).map(RefOr::Item)
            })
        })
        .fixed("examples", |o, n, ctx| {
            let examples = load_named(&n, ctx, |value, _| Some(value.to_value()));
            for (media_type, example) in examples {
                o.content.entry(media_type).or_default().example = Some(example);
            }
        })
        .extensions()
        .required(&["description"])
}

fn header_fields() -> FieldMap<Header> {
    FieldMap::<Header>::new()
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("collectionFormat", |_, _, _| {})
        .pattern(is_schema_keyword, |o, key, n, ctx| {
            route_schema_keyword(&mut o.schema, key, n, ctx)
        })
        .extensions()
}

fn schema_fields() -> FieldMap<Schema> {
    v3::schema_core_fields()
        .fixed("type", |o, n, ctx| match n.as_string(ctx).as_deref() {
            Some("file") => {
                o.types = vec!["string".to_string()];
                o.format = Some("binary".to_string());
            }
            Some(name) => o.types = vec![name.to_string()],
            None => {}
        })
        .fixed("x-nullable", |o, n, ctx| set_bool(&mut o.nullable, &n, ctx))
        .fixed("discriminator", |o, n, ctx| {
            o.discriminator = n.as_string(ctx).map(|property_name| Discriminator {
                property_name,
                ..Default::default()
            })
        })
}

fn security_scheme_fields() -> FieldMap<SecurityScheme> {
    FieldMap::<SecurityScheme>::new()
        .fixed("type", |o, n, ctx| match n.as_string(ctx).as_deref() {
            Some("basic") => {
                o.scheme_type = "http".to_string();
                o.scheme = Some("basic".to_string());
            }
            Some(other) => o.scheme_type = other.to_string(),
            None => {}
        })
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("name", |o, n, ctx| o.name = n.as_string(ctx))
        .fixed("in", |o, n, ctx| o.location = n.as_string(ctx))
        .fixed("flow", |_, n, ctx| {
            let kind = n.as_string(ctx);
            ctx.v2.flow_kind = kind;
        })
        .fixed("authorizationUrl", |_, n, ctx| {
            let url = n.as_string(ctx);
            ctx.v2.flow.authorization_url = url;
        })
        .fixed("tokenUrl", |_, n, ctx| {
            let url = n.as_string(ctx);
            ctx.v2.flow.token_url = url;
        })
        .fixed("scopes", |_, n, ctx| {
            let scopes = load_string_map(&n, ctx);
            ctx.v2.flow.scopes = scopes;
        })
        .extensions()
        .on_start(|_, map, ctx| {
            ctx.v2.flow_kind = None;
            ctx.v2.flow = Default::default();
            ctx.v2.scheme_pointer = map.pointer.clone();
        })
        .on_finish(finish_security_scheme)
}

/// Assemble the single 2.0 flow into a 3.x flows object
fn finish_security_scheme(scheme: &mut SecurityScheme, ctx: &mut ParsingContext) {
    let kind = ctx.v2.flow_kind.take();
    let flow = std::mem::take(&mut ctx.v2.flow);
    if scheme.scheme_type != "oauth2" {
        return;
    }
    let mut flows = OAuthFlows::default();
    match kind.as_deref() {
        Some("implicit") => flows.implicit = Some(flow),
        Some("password") => flows.password = Some(flow),
        Some("application") => flows.client_credentials = Some(flow),
        Some("accessCode") => flows.authorization_code = Some(flow),
        other => {
            let pointer = ctx.v2.scheme_pointer.clone();
            ctx.report(
                DiagnosticKind::TypeCoercion,
                pointer,
                format!("unknown oauth2 flow '{}'", other.unwrap_or_default()),
            );
            return;
        }
    }
    scheme.flows = Some(flows);
}
