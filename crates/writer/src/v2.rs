//! Swagger 2.0 output
//!
//! Request bodies become `body` or `formData` parameters, response content
//! collapses into one `schema` plus `produces`, and parameter schemas are
//! flattened into the 2.0 parameter fields.

use crate::emitter::{external_docs_value, Emitter};
use crate::object::{object_of, with_extensions, Object};
use indexmap::IndexMap;
use oaslice_common::{
    Document, Header, HttpMethod, MediaType, Operation, Parameter, ParameterLocation, PathItem,
    RefOr, RequestBody, Response, Schema, SecurityScheme, Server,
};
use serde_json::Value;
use url::Url;

const FORM_TYPES: [&str; 2] = ["application/x-www-form-urlencoded", "multipart/form-data"];

/// Name of the 2.0 body parameter a request body came from
const BODY_NAME: &str = "x-bodyName";

/// Unknown collection formats are carried in this extension
const COLLECTION_FORMAT: &str = "x-collectionFormat";

/// Follow a schema reference in `scope`; inline schemas are returned as is
fn resolve_schema<'a>(
    document: &'a Document,
    scope: Option<&'a str>,
    node: &'a RefOr<Schema>,
) -> Option<&'a Schema> {
    match node {
        RefOr::Item(schema) => Some(schema),
        RefOr::Ref(reference) => document
            .resolve_scoped::<Schema>(scope, reference)
            .map(|resolved| resolved.value),
    }
}

fn is_form(content: &IndexMap<String, MediaType>) -> bool {
    !content.is_empty() && content.keys().all(|mime| FORM_TYPES.contains(&mime.as_str()))
}

impl<'d> Emitter<'d> {
    pub fn document_v2(&mut self) -> Value {
        let document = self.document;
        let mut object = Object::new();
        object.set("swagger", self.target.declared());
        let info = self.info(&document.info);
        object.set("info", info);
        self.host(&mut object, &document.servers);

        let paths = self.at("paths", |e| {
            let entries: Vec<(&String, Value)> = document
                .paths
                .iter()
                .map(|(template, item)| (template, e.at(template, |e| e.path_item_v2(item))))
                .collect();
            with_extensions(object_of(entries), &document.paths_extensions)
        });
        object.set("paths", paths);
        if !document.webhooks.is_empty() {
            self.at("webhooks", |e| e.not_representable("webhooks"));
        }

        let components = &document.components;
        let definitions = self.registry("definitions", &components.schemas, Self::schema);
        object.non_empty("definitions", definitions);
        let parameters = self.global_parameters();
        object.non_empty("parameters", parameters);
        let responses = self.registry("responses", &components.responses, Self::response_v2);
        object.non_empty("responses", responses);
        let schemes = self.security_definitions();
        object.non_empty("securityDefinitions", schemes);
        self.at("components", |e| {
            for (section, empty) in [
                ("examples", components.examples.is_empty()),
                ("headers", components.headers.is_empty()),
                ("links", components.links.is_empty()),
                ("callbacks", components.callbacks.is_empty()),
                ("pathItems", components.path_items.is_empty()),
            ] {
                if !empty {
                    e.at(section, |e| e.not_representable("component section"));
                }
            }
        });

        object.non_empty("security", self.security(&document.security));
        object.non_empty("tags", self.tags(&document.tags));
        if let Some(docs) = &document.external_docs {
            object.set("externalDocs", external_docs_value(docs));
        }
        object.extensions(&document.extensions);
        object.finish()
    }

    /// `host`, `basePath` and `schemes` from the first server
    fn host(&mut self, object: &mut Object, servers: &[Server]) {
        let Some(server) = servers.first() else {
            return;
        };
        if servers.len() > 1 {
            self.at("servers", |e| e.not_representable("servers beyond the first"));
        }
        let expanded = server.expanded_url();
        match Url::parse(&expanded) {
            Ok(url) if url.has_host() => {
                let mut host = url.host_str().unwrap_or_default().to_string();
                if let Some(port) = url.port() {
                    host.push_str(&format!(":{}", port));
                }
                object.set("host", host);
                let base_path = url.path().trim_end_matches('/');
                if !base_path.is_empty() {
                    object.set("basePath", base_path);
                }
                object.set("schemes", vec![url.scheme()]);
            }
            _ => {
                let base_path = expanded.trim_end_matches('/');
                if !base_path.is_empty() {
                    object.set("basePath", base_path);
                }
            }
        }
    }

    fn path_item_v2(&mut self, item: &PathItem) -> Value {
        if item.summary.is_some() || item.description.is_some() {
            self.not_representable("path item summary or description");
        }
        if !item.servers.is_empty() {
            self.not_representable("path item servers");
        }
        let mut object = Object::new();
        for (method, operation) in &item.operations {
            if *method == HttpMethod::Trace {
                self.at(method.as_str(), |e| e.not_representable("trace operation"));
                continue;
            }
            let value = self.at(method.as_str(), |e| e.operation_v2(operation));
            object.set(method.as_str(), value);
        }
        let parameters = self.at("parameters", |e| e.parameter_list(&item.parameters));
        object.non_empty("parameters", Value::Array(parameters));
        object.extensions(&item.extensions);
        object.finish()
    }

    /// Non-body parameters; cookie parameters have no 2.0 form
    fn parameter_list(&mut self, parameters: &[RefOr<Parameter>]) -> Vec<Value> {
        let mut values = Vec::new();
        for (index, parameter) in parameters.iter().enumerate() {
            let value = self.at(&index.to_string(), |e| match parameter {
                RefOr::Item(item) if item.location == ParameterLocation::Cookie => {
                    e.not_representable("cookie parameter");
                    None
                }
                _ => Some(e.ref_or(parameter, Self::parameter_v2)),
            });
            values.extend(value);
        }
        values
    }

    fn operation_v2(&mut self, operation: &Operation) -> Value {
        let mut object = Object::new();
        object.strings("tags", &operation.tags);
        object.string("summary", &operation.summary);
        object.string("description", &operation.description);
        if let Some(docs) = &operation.external_docs {
            object.set("externalDocs", external_docs_value(docs));
        }
        object.string("operationId", &operation.operation_id);

        let document = self.document;
        let scope = self.scope.clone();
        let body = operation.request_body.as_ref().and_then(|body| match body {
            RefOr::Item(item) => Some(item),
            RefOr::Ref(reference) => document
                .resolve_scoped::<RequestBody>(scope.as_deref(), reference)
                .map(|resolved| resolved.value),
        });
        if let Some(body) = body {
            object.strings("consumes", &body.content.keys().cloned().collect::<Vec<_>>());
        }
        let produces = self.produces(operation);
        object.strings("produces", &produces);

        let mut parameters = self.at("parameters", |e| e.parameter_list(&operation.parameters));
        if let Some(node) = &operation.request_body {
            let offset = parameters.len();
            let body_parameters = self.at("parameters", |e| {
                e.at(&offset.to_string(), |e| match node {
                    RefOr::Item(item) if is_form(&item.content) => e.form_parameters(item),
                    _ => vec![e.ref_or(node, Self::body_parameter)],
                })
            });
            parameters.extend(body_parameters);
        }
        object.non_empty("parameters", Value::Array(parameters));

        let responses = self.named("responses", &operation.responses, Self::response_v2);
        object.set(
            "responses",
            with_extensions(responses, &operation.responses_extensions),
        );
        if !operation.callbacks.is_empty() {
            self.at("callbacks", |e| e.not_representable("callbacks"));
        }
        if !operation.servers.is_empty() {
            self.at("servers", |e| e.not_representable("operation servers"));
        }
        object.flag("deprecated", operation.deprecated);
        if let Some(security) = &operation.security {
            object.set("security", self.security(security));
        }
        object.extensions(&operation.extensions);
        object.finish()
    }

    /// Media types of every response, first appearance first
    fn produces(&mut self, operation: &Operation) -> Vec<String> {
        let document = self.document;
        let scope = self.scope.clone();
        let mut produces: Vec<String> = Vec::new();
        for response in operation.responses.values() {
            let response = match response {
                RefOr::Item(item) => Some(item),
                RefOr::Ref(reference) => document
                    .resolve_scoped::<Response>(scope.as_deref(), reference)
                    .map(|resolved| resolved.value),
            };
            for mime in response.into_iter().flat_map(|r| r.content.keys()) {
                if !produces.contains(mime) {
                    produces.push(mime.clone());
                }
            }
        }
        produces
    }

    fn parameter_v2(&mut self, parameter: &Parameter) -> Value {
        let mut object = Object::new();
        object.set("name", parameter.name.as_str());
        object.set("in", parameter.location.as_str());
        object.string("description", &parameter.description);
        object.flag("required", parameter.required);
        object.flag("allowEmptyValue", parameter.allow_empty_value);
        if parameter.deprecated {
            self.not_representable("parameter deprecated flag");
        }

        let document = self.document;
        let scope = self.scope.clone();
        let schema = match (&parameter.schema, parameter.content.values().next()) {
            (Some(schema), _) => Some(schema),
            (None, Some(media_type)) => {
                self.not_representable("parameter content");
                media_type.schema.as_ref()
            }
            (None, None) => None,
        };
        match schema.map(|node| resolve_schema(document, scope.as_deref(), node)) {
            Some(Some(schema)) => {
                self.at("schema", |e| e.simple_schema(&mut object, schema));
                if schema.single_type() == Some("array") {
                    self.collection_format(&mut object, parameter);
                }
            }
            Some(None) => self.not_representable("parameter schema reference"),
            None => {}
        }
        if parameter.example.is_some() || !parameter.examples.is_empty() {
            self.not_representable("parameter examples");
        }
        for (key, value) in &parameter.extensions {
            if key == COLLECTION_FORMAT {
                object.set("collectionFormat", value.clone());
            } else {
                object.set(key, value.clone());
            }
        }
        object.finish()
    }

    fn collection_format(&mut self, object: &mut Object, parameter: &Parameter) {
        let Some(style) = parameter.style.as_deref() else {
            return;
        };
        let format = match (style, parameter.explode) {
            ("form" | "simple", Some(false)) | ("simple", _) => "csv",
            ("form", _) => "multi",
            ("spaceDelimited", _) => "ssv",
            ("pipeDelimited", _) => "pipes",
            (other, _) => {
                self.not_representable(&format!("parameter style '{}'", other));
                return;
            }
        };
        object.set("collectionFormat", format);
    }

    /// Type and validation keywords of a non-body parameter, header or items object
    fn simple_schema(&mut self, object: &mut Object, schema: &Schema) {
        match schema.types.as_slice() {
            [] => {}
            [only] => object.set("type", only.as_str()),
            [first, ..] => {
                self.not_representable("type array");
                object.set("type", first.as_str());
            }
        }
        object.string("format", &schema.format);
        if let Some(items) = &schema.items {
            let document = self.document;
            let scope = self.scope.clone();
            match resolve_schema(document, scope.as_deref(), items) {
                Some(items) => {
                    let mut value = Object::new();
                    self.at("items", |e| e.simple_schema(&mut value, items));
                    object.set("items", value.finish());
                }
                None => self.at("items", |e| e.not_representable("items reference")),
            }
        }
        object.opt("default", schema.default.clone());
        object.opt("maximum", schema.maximum.clone());
        object.flag(
            "exclusiveMaximum",
            schema.exclusive_maximum && schema.maximum.is_some(),
        );
        object.opt("minimum", schema.minimum.clone());
        object.flag(
            "exclusiveMinimum",
            schema.exclusive_minimum && schema.minimum.is_some(),
        );
        object.opt("maxLength", schema.max_length);
        object.opt("minLength", schema.min_length);
        object.string("pattern", &schema.pattern);
        object.opt("maxItems", schema.max_items);
        object.opt("minItems", schema.min_items);
        object.flag("uniqueItems", schema.unique_items);
        object.non_empty("enum", Value::Array(schema.enum_values.clone()));
        object.opt("multipleOf", schema.multiple_of.clone());
    }

    /// `in: body` parameter carrying the first media type's schema
    fn body_parameter(&mut self, body: &RequestBody) -> Value {
        let mut object = Object::new();
        let name = body
            .extensions
            .get(BODY_NAME)
            .and_then(Value::as_str)
            .unwrap_or("body");
        object.set("name", name);
        object.set("in", "body");
        object.string("description", &body.description);
        object.flag("required", body.required);
        let schema = match body.content.values().next().and_then(|m| m.schema.as_ref()) {
            Some(schema) => self.at("schema", |e| e.schema_ref(schema)),
            None => Value::Object(Default::default()),
        };
        object.set("schema", schema);
        if self.schemas_differ(&body.content) {
            self.not_representable("per-media-type request schemas");
        }
        for (key, value) in &body.extensions {
            if key != BODY_NAME {
                object.set(key, value.clone());
            }
        }
        object.finish()
    }

    /// One `formData` parameter per property of the form schema
    fn form_parameters(&mut self, body: &RequestBody) -> Vec<Value> {
        let document = self.document;
        let scope = self.scope.clone();
        let schema = body
            .content
            .values()
            .next()
            .and_then(|media_type| media_type.schema.as_ref())
            .and_then(|node| resolve_schema(document, scope.as_deref(), node));
        let Some(schema) = schema else {
            self.not_representable("form body without an object schema");
            return Vec::new();
        };

        let mut parameters = Vec::new();
        for (name, property) in &schema.properties {
            let Some(property) = resolve_schema(document, scope.as_deref(), property) else {
                self.at(name, |e| e.not_representable("form field reference"));
                continue;
            };
            let mut object = Object::new();
            object.set("name", name.as_str());
            object.set("in", "formData");
            object.string("description", &property.description);
            object.flag("required", schema.required.contains(name));
            self.at(name, |e| e.simple_schema(&mut object, property));
            if property.single_type() == Some("string") && property.format.as_deref() == Some("binary") {
                object.set("type", "file");
                object.remove("format");
            }
            parameters.push(object.finish());
        }
        parameters
    }

    fn schemas_differ(&self, content: &IndexMap<String, MediaType>) -> bool {
        let mut schemas = content.values().map(|media_type| &media_type.schema);
        match schemas.next() {
            Some(first) => schemas.any(|schema| schema != first),
            None => false,
        }
    }

    fn response_v2(&mut self, response: &Response) -> Value {
        let mut object = Object::new();
        object.set("description", response.description.as_str());
        if let Some(schema) = response.content.values().next().and_then(|m| m.schema.as_ref()) {
            let value = self.at("schema", |e| e.schema_ref(schema));
            object.set("schema", value);
        }
        if self.schemas_differ(&response.content) {
            self.not_representable("per-media-type response schemas");
        }
        if !response.headers.is_empty() {
            let headers = self.at("headers", |e| {
                let entries: Vec<(&String, Value)> = response
                    .headers
                    .iter()
                    .filter_map(|(name, header)| e.at(name, |e| e.header_v2(header)).map(|v| (name, v)))
                    .collect();
                object_of(entries)
            });
            object.set("headers", headers);
        }
        let examples: Vec<(&String, Value)> = response
            .content
            .iter()
            .filter_map(|(mime, media_type)| media_type.example.clone().map(|e| (mime, e)))
            .collect();
        if !examples.is_empty() {
            object.set("examples", object_of(examples));
        }
        if !response.links.is_empty() {
            self.at("links", |e| e.not_representable("links"));
        }
        object.extensions(&response.extensions);
        object.finish()
    }

    /// 2.0 has no reusable headers, so referenced headers are inlined
    fn header_v2(&mut self, node: &RefOr<Header>) -> Option<Value> {
        let document = self.document;
        let scope = self.scope.clone();
        let header = match node {
            RefOr::Item(header) => header,
            RefOr::Ref(reference) => {
                match document.resolve_scoped::<Header>(scope.as_deref(), reference) {
                    Some(resolved) => resolved.value,
                    None => {
                        self.not_representable("unresolved header reference");
                        return None;
                    }
                }
            }
        };
        let mut object = Object::new();
        object.string("description", &header.description);
        match header
            .schema
            .as_ref()
            .map(|schema| resolve_schema(document, scope.as_deref(), schema))
        {
            Some(Some(schema)) => self.at("schema", |e| e.simple_schema(&mut object, schema)),
            Some(None) => self.not_representable("header schema reference"),
            None => {}
        }
        object.extensions(&header.extensions);
        Some(object.finish())
    }

    /// Root `parameters`: plain parameters, then request bodies as body parameters
    fn global_parameters(&mut self) -> Value {
        let document = self.document;
        let components = &document.components;
        let plain: IndexMap<String, RefOr<Parameter>> = components
            .parameters
            .iter()
            .filter(|(_, parameter)| {
                !matches!(parameter, RefOr::Item(p) if p.location == ParameterLocation::Cookie)
            })
            .map(|(name, parameter)| (name.clone(), parameter.clone()))
            .collect();
        if plain.len() < components.parameters.len() {
            self.at("parameters", |e| e.not_representable("cookie parameter"));
        }

        let mut merged = match self.registry("parameters", &plain, Self::parameter_v2) {
            Value::Object(map) => map,
            _ => Default::default(),
        };
        let bodies = self.registry("parameters", &components.request_bodies, Self::body_parameter);
        if let Value::Object(bodies) = bodies {
            for (name, body) in bodies {
                if merged.contains_key(&name) {
                    self.at("parameters", |e| {
                        e.at(&name, |e| e.not_representable("request body sharing a parameter name"))
                    });
                    continue;
                }
                merged.insert(name, body);
            }
        }
        Value::Object(merged)
    }

    fn security_definitions(&mut self) -> Value {
        let document = self.document;
        let schemes = &document.components.security_schemes;
        let mut entries = Vec::new();
        for (name, scheme) in schemes {
            let value = self.at("securityDefinitions", |e| {
                e.at(name, |e| match scheme {
                    RefOr::Item(scheme) => e.security_scheme_v2(scheme),
                    RefOr::Ref(_) => {
                        e.not_representable("security scheme reference");
                        None
                    }
                })
            });
            if let Some(value) = value {
                entries.push((name, value));
            }
        }
        object_of(entries)
    }

    fn security_scheme_v2(&mut self, scheme: &SecurityScheme) -> Option<Value> {
        let mut object = Object::new();
        match (scheme.scheme_type.as_str(), scheme.scheme.as_deref()) {
            ("apiKey", _) => {
                object.set("type", "apiKey");
                object.string("description", &scheme.description);
                object.string("name", &scheme.name);
                object.string("in", &scheme.location);
            }
            ("http", Some(http)) if http.eq_ignore_ascii_case("basic") => {
                object.set("type", "basic");
                object.string("description", &scheme.description);
            }
            ("oauth2", _) => {
                let flows = scheme.flows.clone().unwrap_or_default();
                let mut iter = flows.iter();
                let Some((flow_name, flow)) = iter.next() else {
                    self.not_representable("oauth2 scheme without flows");
                    return None;
                };
                if iter.next().is_some() {
                    self.not_representable("oauth2 flows beyond the first");
                }
                object.set("type", "oauth2");
                object.string("description", &scheme.description);
                let flow_kind = match flow_name {
                    "clientCredentials" => "application",
                    "authorizationCode" => "accessCode",
                    other => other,
                };
                object.set("flow", flow_kind);
                object.string("authorizationUrl", &flow.authorization_url);
                object.string("tokenUrl", &flow.token_url);
                object.set(
                    "scopes",
                    object_of(flow.scopes.iter().map(|(k, v)| (k, Value::from(v.as_str())))),
                );
            }
            (other, _) => {
                self.not_representable(&format!("security scheme type '{}'", other));
                return None;
            }
        }
        object.extensions(&scheme.extensions);
        Some(object.finish())
    }
}

#[cfg(test)]
mod tests {
    use crate::{OpenApiWriter, WriterSettings};
    use oaslice_common::{
        ComponentKey, ComponentKind, DiagnosticKind, Document, HttpMethod, MediaType, Operation,
        Parameter, ParameterLocation, PathItem, RefOr, Reference, RequestBody, Response, Schema,
        SecurityScheme, Server, SpecVersion,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn json_body(schema: RefOr<Schema>) -> RequestBody {
        let mut body = RequestBody {
            required: true,
            ..Default::default()
        };
        body.content.insert(
            "application/json".to_string(),
            MediaType {
                schema: Some(schema),
                ..Default::default()
            },
        );
        body
    }

    fn write_v2(document: &Document) -> (Value, oaslice_common::Diagnostics) {
        OpenApiWriter::new(WriterSettings {
            version: Some(SpecVersion::V2_0),
            ..Default::default()
        })
        .write_value(document)
    }

    fn sample() -> Document {
        let pet = RefOr::Ref(Reference::local(ComponentKey::new(ComponentKind::Schema, "Pet")));

        let mut ok = Response {
            description: "ok".to_string(),
            ..Default::default()
        };
        for mime in ["application/json", "application/xml"] {
            ok.content.insert(
                mime.to_string(),
                MediaType {
                    schema: Some(pet.clone()),
                    ..Default::default()
                },
            );
        }

        let mut create = Operation {
            operation_id: Some("addPet".to_string()),
            request_body: Some(RefOr::Item(json_body(pet.clone()))),
            ..Default::default()
        };
        create.responses.insert("200".to_string(), RefOr::Item(ok));

        let mut status = Parameter {
            name: "status".to_string(),
            location: ParameterLocation::Query,
            style: Some("form".to_string()),
            explode: Some(true),
            ..Default::default()
        };
        let mut array = Schema::of_type("array");
        array.items = Some(Box::new(RefOr::Item(Schema::of_type("string"))));
        status.schema = Some(RefOr::Item(array));
        let mut find = Operation::default();
        find.parameters.push(RefOr::Item(status));
        find.responses.insert(
            "200".to_string(),
            RefOr::Item(Response {
                description: "ok".to_string(),
                ..Default::default()
            }),
        );

        let mut item = PathItem::default();
        item.operations.insert(HttpMethod::Post, create);
        item.operations.insert(HttpMethod::Get, find);

        let mut document = Document {
            spec_version: SpecVersion::V3_0,
            servers: vec![Server {
                url: "https://petstore.example.com:8443/v2/".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        document.info.title = "Petstore".to_string();
        document.info.version = "1".to_string();
        document.paths.insert("/pets".to_string(), item);
        document
            .components
            .schemas
            .insert("Pet".to_string(), RefOr::Item(Schema::of_type("object")));
        document
    }

    #[test]
    fn test_document_shape() {
        let (value, diagnostics) = write_v2(&sample());
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(value["swagger"], "2.0");
        assert_eq!(value["host"], "petstore.example.com:8443");
        assert_eq!(value["basePath"], "/v2");
        assert_eq!(value["schemes"], json!(["https"]));
        assert_eq!(value["definitions"]["Pet"], json!({"type": "object"}));
    }

    #[test]
    fn test_body_parameter_and_produces() {
        let (value, _) = write_v2(&sample());
        let post = &value["paths"]["/pets"]["post"];
        assert_eq!(post["consumes"], json!(["application/json"]));
        assert_eq!(post["produces"], json!(["application/json", "application/xml"]));
        assert_eq!(
            post["parameters"],
            json!([{
                "name": "body",
                "in": "body",
                "required": true,
                "schema": {"$ref": "#/definitions/Pet"}
            }])
        );
        assert_eq!(
            post["responses"]["200"],
            json!({"description": "ok", "schema": {"$ref": "#/definitions/Pet"}})
        );
    }

    #[test]
    fn test_flattened_query_parameter() {
        let (value, _) = write_v2(&sample());
        assert_eq!(
            value["paths"]["/pets"]["get"]["parameters"][0],
            json!({
                "name": "status",
                "in": "query",
                "type": "array",
                "items": {"type": "string"},
                "collectionFormat": "multi"
            })
        );
    }

    #[test]
    fn test_form_body_becomes_form_data() {
        let mut form = Schema::of_type("object");
        form.properties
            .insert("name".to_string(), RefOr::Item(Schema::of_type("string")));
        let mut file = Schema::of_type("string");
        file.format = Some("binary".to_string());
        form.properties.insert("photo".to_string(), RefOr::Item(file));
        form.required = vec!["photo".to_string()];

        let mut body = RequestBody::default();
        body.content.insert(
            "multipart/form-data".to_string(),
            MediaType {
                schema: Some(RefOr::Item(form)),
                ..Default::default()
            },
        );

        let mut document = sample();
        let item = document.paths.get_mut("/pets").unwrap();
        item.operations.get_mut(&HttpMethod::Post).unwrap().request_body = Some(RefOr::Item(body));

        let (value, _) = write_v2(&document);
        let post = &value["paths"]["/pets"]["post"];
        assert_eq!(post["consumes"], json!(["multipart/form-data"]));
        assert_eq!(
            post["parameters"],
            json!([
                {"name": "name", "in": "formData", "type": "string"},
                {"name": "photo", "in": "formData", "required": true, "type": "file"}
            ])
        );
    }

    #[test]
    fn test_unrepresentable_content_is_reported() {
        let mut document = sample();
        document.components.security_schemes.insert(
            "bearer".to_string(),
            RefOr::Item(SecurityScheme {
                scheme_type: "http".to_string(),
                scheme: Some("bearer".to_string()),
                ..Default::default()
            }),
        );
        document.components.security_schemes.insert(
            "basic".to_string(),
            RefOr::Item(SecurityScheme {
                scheme_type: "http".to_string(),
                scheme: Some("basic".to_string()),
                ..Default::default()
            }),
        );
        document.components.request_bodies.insert(
            "NewPet".to_string(),
            RefOr::Item(json_body(RefOr::Item(Schema::of_type("object")))),
        );

        let (value, diagnostics) = write_v2(&document);
        assert_eq!(value["securityDefinitions"], json!({"basic": {"type": "basic"}}));
        assert_eq!(value["parameters"]["NewPet"]["in"], "body");
        assert_eq!(diagnostics.count_of(DiagnosticKind::NotRepresentable), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().pointer,
            "#/securityDefinitions/bearer"
        );
    }
}
