//! OpenAPI 3.0 grammar

use super::fields::{
    any_key, load, load_list, load_named, load_ref_or, load_string_map, FieldMap, Grammar,
};
use super::ParsingContext;
use crate::node::ParseNode;
use indexmap::IndexMap;
use oaslice_common::{
    is_extension, AdditionalProperties, Callback, Components, Contact, DiagnosticKind,
    Discriminator, Document, Encoding, Example, Extensions, ExternalDocs, Header, HttpMethod,
    Info, License, Link, MediaType, OAuthFlow, OAuthFlows, Operation, Parameter,
    ParameterLocation, PathItem, Reference, RequestBody, Response, Schema, SecurityRequirement,
    SecurityScheme, Server, ServerVariable, Tag, Xml,
};
use std::collections::HashMap;
use std::sync::LazyLock;

static GRAMMAR: LazyLock<Grammar> = LazyLock::new(build);

pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}

pub(super) fn build() -> Grammar {
    Grammar {
        document: document_fields(),
        info: info_fields(),
        contact: contact_fields(),
        license: license_fields(),
        server: server_fields(),
        server_variable: server_variable_fields(),
        external_docs: external_docs_fields(),
        tag: tag_fields(),
        path_item: path_item_fields(),
        operation: operation_fields(),
        parameter: parameter_fields(),
        request_body: request_body_fields(),
        media_type: media_type_fields(),
        encoding: encoding_fields(),
        response: response_fields(),
        header: header_fields(),
        example: example_fields(),
        link: link_fields(),
        callback: callback_fields(),
        schema: schema_fields(),
        discriminator: discriminator_fields(),
        xml: xml_fields(),
        security_scheme: security_scheme_fields(),
        oauth_flows: oauth_flows_fields(),
        oauth_flow: oauth_flow_fields(),
        components: components_fields(),
        reference: reference_fields(),
    }
}

pub(super) fn set_bool(slot: &mut bool, node: &ParseNode<'_>, ctx: &mut ParsingContext) {
    if let Some(value) = node.as_bool(ctx) {
        *slot = value;
    }
}

/// Paths object: path item per template, equivalent templates reported
pub(super) fn load_paths(
    node: &ParseNode<'_>,
    ctx: &mut ParsingContext,
) -> (IndexMap<String, PathItem>, Extensions) {
    let mut paths = IndexMap::new();
    let mut extensions = Extensions::new();
    let mut seen: HashMap<String, String> = HashMap::new();
    let Some(map) = node.as_map(ctx) else {
        return (paths, extensions);
    };

    for (template, value) in map.iter() {
        if is_extension(template) {
            extensions.insert(template.to_string(), value.to_value());
            continue;
        }
        if !template.starts_with('/') {
            ctx.report(
                DiagnosticKind::UnknownField,
                &value.pointer,
                format!("path '{}' does not start with '/'", template),
            );
        }
        if let Some(previous) = seen.insert(normalize_template(template), template.to_string()) {
            ctx.report(
                DiagnosticKind::DuplicateKey,
                &value.pointer,
                format!("path '{}' is equivalent to '{}'", template, previous),
            );
        }
        if let Some(item) = load::<PathItem>(&value, ctx) {
            paths.insert(template.to_string(), item);
        }
    }
    (paths, extensions)
}

/// Replace every `{name}` with `{}` so templates compare by shape
pub fn normalize_template(template: &str) -> String {
    let mut normalized = String::with_capacity(template.len());
    let mut in_parameter = false;
    for c in template.chars() {
        match c {
            '{' if !in_parameter => {
                in_parameter = true;
                normalized.push('{');
            }
            '}' if in_parameter => {
                in_parameter = false;
                normalized.push('}');
            }
            _ if in_parameter => {}
            _ => normalized.push(c),
        }
    }
    normalized
}

pub(super) fn load_security(node: &ParseNode<'_>, ctx: &mut ParsingContext) -> Vec<SecurityRequirement> {
    load_list(node, ctx, |item, ctx| {
        Some(load_named(item, ctx, |scopes, ctx| {
            Some(scopes.as_string_list(ctx))
        }))
    })
}

pub(super) fn load_responses(
    node: &ParseNode<'_>,
    ctx: &mut ParsingContext,
) -> (IndexMap<String, oaslice_common::RefOr<Response>>, Extensions) {
    let mut responses = IndexMap::new();
    let mut extensions = Extensions::new();
    let Some(map) = node.as_map(ctx) else {
        return (responses, extensions);
    };
    for (code, value) in map.iter() {
        if is_extension(code) {
            extensions.insert(code.to_string(), value.to_value());
            continue;
        }
        if let Some(response) = load_ref_or::<Response>(&value, ctx) {
            responses.insert(code.to_string(), response);
        }
    }
    (responses, extensions)
}

/// Path item `$ref` has no place in the model
pub(super) fn drop_path_item_ref(_item: &mut PathItem, node: ParseNode<'_>, ctx: &mut ParsingContext) {
    ctx.report(
        DiagnosticKind::UnknownField,
        &node.pointer,
        "path item $ref is not supported; the reference is dropped",
    );
}

fn document_fields() -> FieldMap<Document> {
    FieldMap::<Document>::new()
        .fixed("openapi", |_, _, _| {})
        .fixed("info", |o, n, ctx| {
            if let Some(info) = load(&n, ctx) {
                o.info = info;
            }
        })
        .fixed("servers", |o, n, ctx| o.servers = load_list(&n, ctx, load::<Server>))
        .fixed("paths", |o, n, ctx| {
            (o.paths, o.paths_extensions) = load_paths(&n, ctx);
        })
        .fixed("components", |o, n, ctx| {
            if let Some(components) = load(&n, ctx) {
                o.components = components;
            }
        })
        .fixed("security", |o, n, ctx| o.security = load_security(&n, ctx))
        .fixed("tags", |o, n, ctx| o.tags = load_list(&n, ctx, load::<Tag>))
        .fixed("externalDocs", |o, n, ctx| o.external_docs = load(&n, ctx))
        .extensions()
}

fn info_fields() -> FieldMap<Info> {
    FieldMap::<Info>::new()
        .fixed("title", |o, n, ctx| o.title = n.as_string(ctx).unwrap_or_default())
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("termsOfService", |o, n, ctx| {
            o.terms_of_service = n.as_string(ctx)
        })
        .fixed("contact", |o, n, ctx| o.contact = load(&n, ctx))
        .fixed("license", |o, n, ctx| o.license = load(&n, ctx))
        .fixed("version", |o, n, ctx| o.version = n.as_string(ctx).unwrap_or_default())
        .extensions()
        .required(&["title", "version"])
}

fn contact_fields() -> FieldMap<Contact> {
    FieldMap::<Contact>::new()
        .fixed("name", |o, n, ctx| o.name = n.as_string(ctx))
        .fixed("url", |o, n, ctx| o.url = n.as_string(ctx))
        .fixed("email", |o, n, ctx| o.email = n.as_string(ctx))
        .extensions()
}

fn license_fields() -> FieldMap<License> {
    FieldMap::<License>::new()
        .fixed("name", |o, n, ctx| o.name = n.as_string(ctx).unwrap_or_default())
        .fixed("url", |o, n, ctx| o.url = n.as_string(ctx))
        .extensions()
}

fn server_fields() -> FieldMap<Server> {
    FieldMap::<Server>::new()
        .fixed("url", |o, n, ctx| o.url = n.as_string(ctx).unwrap_or_default())
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("variables", |o, n, ctx| {
            o.variables = load_named(&n, ctx, load::<ServerVariable>)
        })
        .extensions()
}

fn server_variable_fields() -> FieldMap<ServerVariable> {
    FieldMap::<ServerVariable>::new()
        .fixed("enum", |o, n, ctx| o.enum_values = n.as_string_list(ctx))
        .fixed("default", |o, n, ctx| o.default = n.as_string(ctx).unwrap_or_default())
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .extensions()
}

fn external_docs_fields() -> FieldMap<ExternalDocs> {
    FieldMap::<ExternalDocs>::new()
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("url", |o, n, ctx| o.url = n.as_string(ctx).unwrap_or_default())
        .extensions()
}

fn tag_fields() -> FieldMap<Tag> {
    FieldMap::<Tag>::new()
        .fixed("name", |o, n, ctx| o.name = n.as_string(ctx).unwrap_or_default())
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("externalDocs", |o, n, ctx| o.external_docs = load(&n, ctx))
        .extensions()
}

fn add_operation(item: &mut PathItem, method: HttpMethod, node: ParseNode<'_>, ctx: &mut ParsingContext) {
    if let Some(operation) = load::<Operation>(&node, ctx) {
        item.operations.insert(method, operation);
    }
}

pub(super) fn path_item_operations(map: FieldMap<PathItem>) -> FieldMap<PathItem> {
    map.fixed("get", |o, n, ctx| add_operation(o, HttpMethod::Get, n, ctx))
        .fixed("put", |o, n, ctx| add_operation(o, HttpMethod::Put, n, ctx))
        .fixed("post", |o, n, ctx| add_operation(o, HttpMethod::Post, n, ctx))
        .fixed("delete", |o, n, ctx| {
            add_operation(o, HttpMethod::Delete, n, ctx)
        })
        .fixed("options", |o, n, ctx| {
            add_operation(o, HttpMethod::Options, n, ctx)
        })
        .fixed("head", |o, n, ctx| add_operation(o, HttpMethod::Head, n, ctx))
        .fixed("patch", |o, n, ctx| add_operation(o, HttpMethod::Patch, n, ctx))
}

fn path_item_fields() -> FieldMap<PathItem> {
    path_item_operations(FieldMap::<PathItem>::new())
        .fixed("$ref", drop_path_item_ref)
        .fixed("summary", |o, n, ctx| o.summary = n.as_string(ctx))
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("trace", |o, n, ctx| add_operation(o, HttpMethod::Trace, n, ctx))
        .fixed("servers", |o, n, ctx| o.servers = load_list(&n, ctx, load::<Server>))
        .fixed("parameters", |o, n, ctx| {
            o.parameters = load_list(&n, ctx, load_ref_or::<Parameter>)
        })
        .extensions()
}

fn operation_fields() -> FieldMap<Operation> {
    FieldMap::<Operation>::new()
        .fixed("tags", |o, n, ctx| o.tags = n.as_string_list(ctx))
        .fixed("summary", |o, n, ctx| o.summary = n.as_string(ctx))
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("externalDocs", |o, n, ctx| o.external_docs = load(&n, ctx))
        .fixed("operationId", |o, n, ctx| o.operation_id = n.as_string(ctx))
        .fixed("parameters", |o, n, ctx| {
            o.parameters = load_list(&n, ctx, load_ref_or::<Parameter>)
        })
        .fixed("requestBody", |o, n, ctx| {
            o.request_body = load_ref_or::<RequestBody>(&n, ctx)
        })
        .fixed("responses", |o, n, ctx| {
            (o.responses, o.responses_extensions) = load_responses(&n, ctx);
        })
        .fixed("callbacks", |o, n, ctx| {
            o.callbacks = load_named(&n, ctx, load_ref_or::<Callback>)
        })
        .fixed("deprecated", |o, n, ctx| set_bool(&mut o.deprecated, &n, ctx))
        .fixed("security", |o, n, ctx| o.security = Some(load_security(&n, ctx)))
        .fixed("servers", |o, n, ctx| o.servers = load_list(&n, ctx, load::<Server>))
        .extensions()
}

fn parameter_fields() -> FieldMap<Parameter> {
    FieldMap::<Parameter>::new()
        .fixed("name", |o, n, ctx| o.name = n.as_string(ctx).unwrap_or_default())
        .fixed("in", |o, n, ctx| {
            let Some(location) = n.as_string(ctx) else {
                return;
            };
            match ParameterLocation::parse(&location) {
                Some(location) => o.location = location,
                None => ctx.report(
                    DiagnosticKind::TypeCoercion,
                    &n.pointer,
                    format!("unknown parameter location '{}'", location),
                ),
            }
        })
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("required", |o, n, ctx| set_bool(&mut o.required, &n, ctx))
        .fixed("deprecated", |o, n, ctx| set_bool(&mut o.deprecated, &n, ctx))
        .fixed("allowEmptyValue", |o, n, ctx| {
            set_bool(&mut o.allow_empty_value, &n, ctx)
        })
        .fixed("style", |o, n, ctx| o.style = n.as_string(ctx))
        .fixed("explode", |o, n, ctx| o.explode = n.as_bool(ctx))
        .fixed("allowReserved", |o, n, ctx| {
            set_bool(&mut o.allow_reserved, &n, ctx)
        })
        .fixed("schema", |o, n, ctx| o.schema = load_ref_or::<Schema>(&n, ctx))
        .fixed("example", |o, n, _| o.example = Some(n.to_value()))
        .fixed("examples", |o, n, ctx| {
            o.examples = load_named(&n, ctx, load_ref_or::<Example>)
        })
        .fixed("content", |o, n, ctx| o.content = load_named(&n, ctx, load::<MediaType>))
        .extensions()
        .required(&["name", "in"])
}

fn request_body_fields() -> FieldMap<RequestBody> {
    FieldMap::<RequestBody>::new()
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("content", |o, n, ctx| o.content = load_named(&n, ctx, load::<MediaType>))
        .fixed("required", |o, n, ctx| set_bool(&mut o.required, &n, ctx))
        .extensions()
}

fn media_type_fields() -> FieldMap<MediaType> {
    FieldMap::<MediaType>::new()
        .fixed("schema", |o, n, ctx| o.schema = load_ref_or::<Schema>(&n, ctx))
        .fixed("example", |o, n, _| o.example = Some(n.to_value()))
        .fixed("examples", |o, n, ctx| {
            o.examples = load_named(&n, ctx, load_ref_or::<Example>)
        })
        .fixed("encoding", |o, n, ctx| o.encoding = load_named(&n, ctx, load::<Encoding>))
        .extensions()
}

fn encoding_fields() -> FieldMap<Encoding> {
    FieldMap::<Encoding>::new()
        .fixed("contentType", |o, n, ctx| o.content_type = n.as_string(ctx))
        .fixed("headers", |o, n, ctx| {
            o.headers = load_named(&n, ctx, load_ref_or::<Header>)
        })
        .fixed("style", |o, n, ctx| o.style = n.as_string(ctx))
        .fixed("explode", |o, n, ctx| o.explode = n.as_bool(ctx))
        .fixed("allowReserved", |o, n, ctx| {
            set_bool(&mut o.allow_reserved, &n, ctx)
        })
        .extensions()
}

fn response_fields() -> FieldMap<Response> {
    FieldMap::<Response>::new()
        .fixed("description", |o, n, ctx| {
            o.description = n.as_string(ctx).unwrap_or_default()
        })
        .fixed("headers", |o, n, ctx| {
            o.headers = load_named(&n, ctx, load_ref_or::<Header>)
        })
        .fixed("content", |o, n, ctx| o.content = load_named(&n, ctx, load::<MediaType>))
        .fixed("links", |o, n, ctx| o.links = load_named(&n, ctx, load_ref_or::<Link>))
        .extensions()
        .required(&["description"])
}

fn header_fields() -> FieldMap<Header> {
    FieldMap::<Header>::new()
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("required", |o, n, ctx| set_bool(&mut o.required, &n, ctx))
        .fixed("deprecated", |o, n, ctx| set_bool(&mut o.deprecated, &n, ctx))
        .fixed("style", |o, n, ctx| o.style = n.as_string(ctx))
        .fixed("explode", |o, n, ctx| o.explode = n.as_bool(ctx))
        .fixed("schema", |o, n, ctx| o.schema = load_ref_or::<Schema>(&n, ctx))
        .fixed("example", |o, n, _| o.example = Some(n.to_value()))
        .fixed("examples", |o, n, ctx| {
            o.examples = load_named(&n, ctx, load_ref_or::<Example>)
        })
        .fixed("content", |o, n, ctx| o.content = load_named(&n, ctx, load::<MediaType>))
        .extensions()
}

fn example_fields() -> FieldMap<Example> {
    FieldMap::<Example>::new()
        .fixed("summary", |o, n, ctx| o.summary = n.as_string(ctx))
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("value", |o, n, _| o.value = Some(n.to_value()))
        .fixed("externalValue", |o, n, ctx| o.external_value = n.as_string(ctx))
        .extensions()
}

fn link_fields() -> FieldMap<Link> {
    FieldMap::<Link>::new()
        .fixed("operationRef", |o, n, ctx| o.operation_ref = n.as_string(ctx))
        .fixed("operationId", |o, n, ctx| o.operation_id = n.as_string(ctx))
        .fixed("parameters", |o, n, ctx| {
            o.parameters = load_named(&n, ctx, |value, _| Some(value.to_value()))
        })
        .fixed("requestBody", |o, n, _| o.request_body = Some(n.to_value()))
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("server", |o, n, ctx| o.server = load(&n, ctx))
        .extensions()
}

fn callback_fields() -> FieldMap<Callback> {
    FieldMap::<Callback>::new().extensions().pattern(any_key, |o, key, n, ctx| {
        if let Some(item) = load::<PathItem>(&n, ctx) {
            o.expressions.insert(key.to_string(), item);
        }
    })
}

fn boxed_schema(node: &ParseNode<'_>, ctx: &mut ParsingContext) -> Option<Box<oaslice_common::RefOr<Schema>>> {
    load_ref_or::<Schema>(node, ctx).map(Box::new)
}

/// Schema keywords shared by every version
pub(super) fn schema_core_fields() -> FieldMap<Schema> {
    FieldMap::<Schema>::new()
        .fixed("title", |o, n, ctx| o.title = n.as_string(ctx))
        .fixed("type", |o, n, ctx| {
            if let Some(type_name) = n.as_string(ctx) {
                o.types = vec![type_name];
            }
        })
        .fixed("format", |o, n, ctx| o.format = n.as_string(ctx))
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("default", |o, n, _| o.default = Some(n.to_value()))
        .fixed("readOnly", |o, n, ctx| set_bool(&mut o.read_only, &n, ctx))
        .fixed("multipleOf", |o, n, ctx| o.multiple_of = n.as_number(ctx))
        .fixed("maximum", |o, n, ctx| o.maximum = n.as_number(ctx))
        .fixed("exclusiveMaximum", |o, n, ctx| {
            set_bool(&mut o.exclusive_maximum, &n, ctx)
        })
        .fixed("minimum", |o, n, ctx| o.minimum = n.as_number(ctx))
        .fixed("exclusiveMinimum", |o, n, ctx| {
            set_bool(&mut o.exclusive_minimum, &n, ctx)
        })
        .fixed("maxLength", |o, n, ctx| o.max_length = n.as_u64(ctx))
        .fixed("minLength", |o, n, ctx| o.min_length = n.as_u64(ctx))
        .fixed("pattern", |o, n, ctx| o.pattern = n.as_string(ctx))
        .fixed("maxItems", |o, n, ctx| o.max_items = n.as_u64(ctx))
        .fixed("minItems", |o, n, ctx| o.min_items = n.as_u64(ctx))
        .fixed("uniqueItems", |o, n, ctx| set_bool(&mut o.unique_items, &n, ctx))
        .fixed("maxProperties", |o, n, ctx| o.max_properties = n.as_u64(ctx))
        .fixed("minProperties", |o, n, ctx| o.min_properties = n.as_u64(ctx))
        .fixed("required", |o, n, ctx| o.required = n.as_string_list(ctx))
        .fixed("enum", |o, n, ctx| {
            o.enum_values = load_list(&n, ctx, |value, _| Some(value.to_value()))
        })
        .fixed("properties", |o, n, ctx| {
            o.properties = load_named(&n, ctx, load_ref_or::<Schema>)
        })
        .fixed("additionalProperties", |o, n, ctx| {
            o.additional_properties = match n.node {
                crate::node::Node::Bool(allowed) => Some(AdditionalProperties::Allowed(*allowed)),
                _ => boxed_schema(&n, ctx).map(AdditionalProperties::Schema),
            }
        })
        .fixed("items", |o, n, ctx| o.items = boxed_schema(&n, ctx))
        .fixed("allOf", |o, n, ctx| {
            o.all_of = load_list(&n, ctx, load_ref_or::<Schema>)
        })
        .fixed("xml", |o, n, ctx| o.xml = load(&n, ctx))
        .fixed("externalDocs", |o, n, ctx| o.external_docs = load(&n, ctx))
        .fixed("example", |o, n, _| o.example = Some(n.to_value()))
        .extensions()
}

fn schema_fields() -> FieldMap<Schema> {
    schema_core_fields()
        .fixed("nullable", |o, n, ctx| set_bool(&mut o.nullable, &n, ctx))
        .fixed("writeOnly", |o, n, ctx| set_bool(&mut o.write_only, &n, ctx))
        .fixed("deprecated", |o, n, ctx| set_bool(&mut o.deprecated, &n, ctx))
        .fixed("anyOf", |o, n, ctx| {
            o.any_of = load_list(&n, ctx, load_ref_or::<Schema>)
        })
        .fixed("oneOf", |o, n, ctx| {
            o.one_of = load_list(&n, ctx, load_ref_or::<Schema>)
        })
        .fixed("not", |o, n, ctx| o.not = boxed_schema(&n, ctx))
        .fixed("discriminator", |o, n, ctx| o.discriminator = load(&n, ctx))
}

fn discriminator_fields() -> FieldMap<Discriminator> {
    FieldMap::<Discriminator>::new()
        .fixed("propertyName", |o, n, ctx| {
            o.property_name = n.as_string(ctx).unwrap_or_default()
        })
        .fixed("mapping", |o, n, ctx| o.mapping = load_string_map(&n, ctx))
        .extensions()
}

fn xml_fields() -> FieldMap<Xml> {
    FieldMap::<Xml>::new()
        .fixed("name", |o, n, ctx| o.name = n.as_string(ctx))
        .fixed("namespace", |o, n, ctx| o.namespace = n.as_string(ctx))
        .fixed("prefix", |o, n, ctx| o.prefix = n.as_string(ctx))
        .fixed("attribute", |o, n, ctx| set_bool(&mut o.attribute, &n, ctx))
        .fixed("wrapped", |o, n, ctx| set_bool(&mut o.wrapped, &n, ctx))
        .extensions()
}

fn security_scheme_fields() -> FieldMap<SecurityScheme> {
    FieldMap::<SecurityScheme>::new()
        .fixed("type", |o, n, ctx| o.scheme_type = n.as_string(ctx).unwrap_or_default())
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx))
        .fixed("name", |o, n, ctx| o.name = n.as_string(ctx))
        .fixed("in", |o, n, ctx| o.location = n.as_string(ctx))
        .fixed("scheme", |o, n, ctx| o.scheme = n.as_string(ctx))
        .fixed("bearerFormat", |o, n, ctx| o.bearer_format = n.as_string(ctx))
        .fixed("flows", |o, n, ctx| o.flows = load(&n, ctx))
        .fixed("openIdConnectUrl", |o, n, ctx| {
            o.open_id_connect_url = n.as_string(ctx)
        })
        .extensions()
}

fn oauth_flows_fields() -> FieldMap<OAuthFlows> {
    FieldMap::<OAuthFlows>::new()
        .fixed("implicit", |o, n, ctx| o.implicit = load(&n, ctx))
        .fixed("password", |o, n, ctx| o.password = load(&n, ctx))
        .fixed("clientCredentials", |o, n, ctx| {
            o.client_credentials = load(&n, ctx)
        })
        .fixed("authorizationCode", |o, n, ctx| {
            o.authorization_code = load(&n, ctx)
        })
        .extensions()
}

fn oauth_flow_fields() -> FieldMap<OAuthFlow> {
    FieldMap::<OAuthFlow>::new()
        .fixed("authorizationUrl", |o, n, ctx| {
            o.authorization_url = n.as_string(ctx)
        })
        .fixed("tokenUrl", |o, n, ctx| o.token_url = n.as_string(ctx))
        .fixed("refreshUrl", |o, n, ctx| o.refresh_url = n.as_string(ctx))
        .fixed("scopes", |o, n, ctx| o.scopes = load_string_map(&n, ctx))
        .extensions()
}

fn components_fields() -> FieldMap<Components> {
    FieldMap::<Components>::new()
        .fixed("schemas", |o, n, ctx| {
            o.schemas = load_named(&n, ctx, load_ref_or::<Schema>)
        })
        .fixed("responses", |o, n, ctx| {
            o.responses = load_named(&n, ctx, load_ref_or::<Response>)
        })
        .fixed("parameters", |o, n, ctx| {
            o.parameters = load_named(&n, ctx, load_ref_or::<Parameter>)
        })
        .fixed("examples", |o, n, ctx| {
            o.examples = load_named(&n, ctx, load_ref_or::<Example>)
        })
        .fixed("requestBodies", |o, n, ctx| {
            o.request_bodies = load_named(&n, ctx, load_ref_or::<RequestBody>)
        })
        .fixed("headers", |o, n, ctx| {
            o.headers = load_named(&n, ctx, load_ref_or::<Header>)
        })
        .fixed("securitySchemes", |o, n, ctx| {
            o.security_schemes = load_named(&n, ctx, load_ref_or::<SecurityScheme>)
        })
        .fixed("links", |o, n, ctx| o.links = load_named(&n, ctx, load_ref_or::<Link>))
        .fixed("callbacks", |o, n, ctx| {
            o.callbacks = load_named(&n, ctx, load_ref_or::<Callback>)
        })
        .extensions()
}

fn reference_fields() -> FieldMap<Reference> {
    FieldMap::<Reference>::new()
        .fixed("$ref", |_, _, _| {})
        .unmatched(DiagnosticKind::IgnoredSibling)
}
