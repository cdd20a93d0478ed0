//! OpenAPI 3.0 / 3.1 output

use crate::emitter::{external_docs_value, server_value, Emitter};
use crate::object::{object_of, with_extensions, Object};
use oaslice_common::{
    Callback, Component, ComponentKey, Components, Encoding, Header, Link, MediaType, Operation,
    Parameter, PathItem, RefOr, RequestBody, Response, SecurityScheme,
};
use indexmap::IndexMap;
use serde_json::Value;

impl<'d> Emitter<'d> {
    pub fn document_v3(&mut self) -> Value {
        let document = self.document;
        let mut object = Object::new();
        object.set("openapi", self.target.declared());
        let info = self.info(&document.info);
        object.set("info", info);
        if self.is_v31() {
            object.string("jsonSchemaDialect", &document.json_schema_dialect);
        } else if document.json_schema_dialect.is_some() {
            self.not_representable("jsonSchemaDialect");
        }
        object.non_empty("servers", self.servers(&document.servers));

        let paths = self.at("paths", |e| {
            let entries: Vec<(&String, Value)> = document
                .paths
                .iter()
                .map(|(template, item)| (template, e.at(template, |e| e.path_item(item))))
                .collect();
            with_extensions(object_of(entries), &document.paths_extensions)
        });
        object.set("paths", paths);

        if !document.webhooks.is_empty() {
            if self.is_v31() {
                let webhooks = self.at("webhooks", |e| {
                    let entries: Vec<(&String, Value)> = document
                        .webhooks
                        .iter()
                        .map(|(name, item)| (name, e.at(name, |e| e.ref_or(item, Self::path_item))))
                        .collect();
                    object_of(entries)
                });
                object.set("webhooks", webhooks);
            } else {
                self.at("webhooks", |e| e.not_representable("webhooks"));
            }
        }

        let components = self.at("components", |e| e.components(&document.components));
        object.non_empty("components", components);
        object.non_empty("security", self.security(&document.security));
        object.non_empty("tags", self.tags(&document.tags));
        if let Some(docs) = &document.external_docs {
            object.set("externalDocs", external_docs_value(docs));
        }
        object.extensions(&document.extensions);
        object.finish()
    }

    pub fn path_item(&mut self, item: &PathItem) -> Value {
        let mut object = Object::new();
        object.string("summary", &item.summary);
        object.string("description", &item.description);
        for (method, operation) in &item.operations {
            let value = self.at(method.as_str(), |e| e.operation(operation));
            object.set(method.as_str(), value);
        }
        object.non_empty("servers", self.servers(&item.servers));
        let parameters = self.parameters(&item.parameters);
        object.non_empty("parameters", parameters);
        object.extensions(&item.extensions);
        object.finish()
    }

    fn parameters(&mut self, parameters: &[RefOr<Parameter>]) -> Value {
        self.at("parameters", |e| {
            Value::Array(
                parameters
                    .iter()
                    .enumerate()
                    .map(|(index, parameter)| {
                        e.at(&index.to_string(), |e| e.ref_or(parameter, Self::parameter))
                    })
                    .collect(),
            )
        })
    }

    fn operation(&mut self, operation: &Operation) -> Value {
        let mut object = Object::new();
        object.strings("tags", &operation.tags);
        object.string("summary", &operation.summary);
        object.string("description", &operation.description);
        if let Some(docs) = &operation.external_docs {
            object.set("externalDocs", external_docs_value(docs));
        }
        object.string("operationId", &operation.operation_id);
        let parameters = self.parameters(&operation.parameters);
        object.non_empty("parameters", parameters);
        if let Some(body) = &operation.request_body {
            let value = self.at("requestBody", |e| e.ref_or(body, Self::request_body));
            object.set("requestBody", value);
        }
        let responses = self.named("responses", &operation.responses, Self::response);
        object.set(
            "responses",
            with_extensions(responses, &operation.responses_extensions),
        );
        let callbacks = self.named("callbacks", &operation.callbacks, Self::callback);
        object.non_empty("callbacks", callbacks);
        object.flag("deprecated", operation.deprecated);
        if let Some(security) = &operation.security {
            object.set("security", self.security(security));
        }
        object.non_empty("servers", self.servers(&operation.servers));
        object.extensions(&operation.extensions);
        object.finish()
    }

    /// Map of name → `$ref` or inline value
    pub fn named<T: Component>(
        &mut self,
        key: &str,
        map: &IndexMap<String, RefOr<T>>,
        emit: fn(&mut Self, &T) -> Value,
    ) -> Value {
        self.at(key, |e| {
            let entries: Vec<(&String, Value)> = map
                .iter()
                .map(|(name, node)| (name, e.at(name, |e| e.ref_or(node, emit))))
                .collect();
            object_of(entries)
        })
    }

    pub fn parameter(&mut self, parameter: &Parameter) -> Value {
        let mut object = Object::new();
        object.set("name", parameter.name.as_str());
        object.set("in", parameter.location.as_str());
        object.string("description", &parameter.description);
        object.flag("required", parameter.required);
        object.flag("deprecated", parameter.deprecated);
        object.flag("allowEmptyValue", parameter.allow_empty_value);
        object.string("style", &parameter.style);
        object.opt("explode", parameter.explode);
        object.flag("allowReserved", parameter.allow_reserved);
        if let Some(schema) = &parameter.schema {
            let value = self.at("schema", |e| e.schema_ref(schema));
            object.set("schema", value);
        }
        object.opt("example", parameter.example.clone());
        let examples = self.named("examples", &parameter.examples, Self::example);
        object.non_empty("examples", examples);
        let content = self.content(&parameter.content);
        object.non_empty("content", content);
        object.extensions(&parameter.extensions);
        object.finish()
    }

    pub fn request_body(&mut self, body: &RequestBody) -> Value {
        let mut object = Object::new();
        object.string("description", &body.description);
        let content = self.content(&body.content);
        object.set("content", content);
        object.flag("required", body.required);
        object.extensions(&body.extensions);
        object.finish()
    }

    fn content(&mut self, content: &IndexMap<String, MediaType>) -> Value {
        self.at("content", |e| {
            let entries: Vec<(&String, Value)> = content
                .iter()
                .map(|(mime, media_type)| (mime, e.at(mime, |e| e.media_type(media_type))))
                .collect();
            object_of(entries)
        })
    }

    fn media_type(&mut self, media_type: &MediaType) -> Value {
        let mut object = Object::new();
        if let Some(schema) = &media_type.schema {
            let value = self.at("schema", |e| e.schema_ref(schema));
            object.set("schema", value);
        }
        object.opt("example", media_type.example.clone());
        let examples = self.named("examples", &media_type.examples, Self::example);
        object.non_empty("examples", examples);
        if !media_type.encoding.is_empty() {
            let encoding = self.at("encoding", |e| {
                let entries: Vec<(&String, Value)> = media_type
                    .encoding
                    .iter()
                    .map(|(name, encoding)| (name, e.at(name, |e| e.encoding(encoding))))
                    .collect();
                object_of(entries)
            });
            object.set("encoding", encoding);
        }
        object.extensions(&media_type.extensions);
        object.finish()
    }

    fn encoding(&mut self, encoding: &Encoding) -> Value {
        let mut object = Object::new();
        object.string("contentType", &encoding.content_type);
        let headers = self.named("headers", &encoding.headers, Self::header);
        object.non_empty("headers", headers);
        object.string("style", &encoding.style);
        object.opt("explode", encoding.explode);
        object.flag("allowReserved", encoding.allow_reserved);
        object.extensions(&encoding.extensions);
        object.finish()
    }

    pub fn response(&mut self, response: &Response) -> Value {
        let mut object = Object::new();
        object.set("description", response.description.as_str());
        let headers = self.named("headers", &response.headers, Self::header);
        object.non_empty("headers", headers);
        let content = self.content(&response.content);
        object.non_empty("content", content);
        let links = self.named("links", &response.links, Self::link);
        object.non_empty("links", links);
        object.extensions(&response.extensions);
        object.finish()
    }

    fn header(&mut self, header: &Header) -> Value {
        let mut object = Object::new();
        object.string("description", &header.description);
        object.flag("required", header.required);
        object.flag("deprecated", header.deprecated);
        object.string("style", &header.style);
        object.opt("explode", header.explode);
        if let Some(schema) = &header.schema {
            let value = self.at("schema", |e| e.schema_ref(schema));
            object.set("schema", value);
        }
        object.opt("example", header.example.clone());
        let examples = self.named("examples", &header.examples, Self::example);
        object.non_empty("examples", examples);
        let content = self.content(&header.content);
        object.non_empty("content", content);
        object.extensions(&header.extensions);
        object.finish()
    }

    fn link(&mut self, link: &Link) -> Value {
        let mut object = Object::new();
        object.string("operationRef", &link.operation_ref);
        object.string("operationId", &link.operation_id);
        if !link.parameters.is_empty() {
            object.set(
                "parameters",
                object_of(link.parameters.iter().map(|(k, v)| (k, v.clone()))),
            );
        }
        object.opt("requestBody", link.request_body.clone());
        object.string("description", &link.description);
        if let Some(server) = &link.server {
            object.set("server", server_value(server));
        }
        object.extensions(&link.extensions);
        object.finish()
    }

    fn callback(&mut self, callback: &Callback) -> Value {
        let mut object = Object::new();
        for (expression, item) in &callback.expressions {
            let value = self.at(expression, |e| e.path_item(item));
            object.set(expression, value);
        }
        object.extensions(&callback.extensions);
        object.finish()
    }

    fn security_scheme(&mut self, scheme: &SecurityScheme) -> Value {
        let mut object = Object::new();
        object.set("type", scheme.scheme_type.as_str());
        object.string("description", &scheme.description);
        object.string("name", &scheme.name);
        object.string("in", &scheme.location);
        object.string("scheme", &scheme.scheme);
        object.string("bearerFormat", &scheme.bearer_format);
        if let Some(flows) = &scheme.flows {
            let mut value = Object::new();
            for (name, flow) in flows.iter() {
                let mut flow_value = Object::new();
                flow_value.string("authorizationUrl", &flow.authorization_url);
                flow_value.string("tokenUrl", &flow.token_url);
                flow_value.string("refreshUrl", &flow.refresh_url);
                flow_value.set(
                    "scopes",
                    object_of(flow.scopes.iter().map(|(k, v)| (k, Value::from(v.as_str())))),
                );
                flow_value.extensions(&flow.extensions);
                value.set(name, flow_value.finish());
            }
            value.extensions(&flows.extensions);
            object.set("flows", value.finish());
        }
        object.string("openIdConnectUrl", &scheme.open_id_connect_url);
        object.extensions(&scheme.extensions);
        object.finish()
    }

    /// Emit one registry with each entry marked in progress while written
    pub fn registry<T: Component>(
        &mut self,
        section: &str,
        map: &IndexMap<String, RefOr<T>>,
        emit: fn(&mut Self, &T) -> Value,
    ) -> Value {
        self.at(section, |e| {
            let entries: Vec<(&String, Value)> = map
                .iter()
                .map(|(name, node)| {
                    let identity = (e.scope.clone(), ComponentKey::new(T::KIND, name.as_str()));
                    e.in_progress.push(identity);
                    let value = e.at(name, |e| e.ref_or(node, emit));
                    e.in_progress.pop();
                    (name, value)
                })
                .collect();
            object_of(entries)
        })
    }

    fn section<T: Component>(
        &mut self,
        object: &mut Object,
        map: &IndexMap<String, RefOr<T>>,
        emit: fn(&mut Self, &T) -> Value,
    ) {
        let name = T::KIND.section();
        let value = self.registry(name, map, emit);
        object.non_empty(name, value);
    }

    fn components(&mut self, components: &Components) -> Value {
        let mut object = Object::new();
        self.section(&mut object, &components.schemas, Self::schema);
        self.section(&mut object, &components.responses, Self::response);
        self.section(&mut object, &components.parameters, Self::parameter);
        self.section(&mut object, &components.examples, Self::example);
        self.section(&mut object, &components.request_bodies, Self::request_body);
        self.section(&mut object, &components.headers, Self::header);
        self.section(&mut object, &components.security_schemes, Self::security_scheme);
        self.section(&mut object, &components.links, Self::link);
        self.section(&mut object, &components.callbacks, Self::callback);
        if !components.path_items.is_empty() {
            if self.is_v31() {
                self.section(&mut object, &components.path_items, Self::path_item);
            } else {
                self.at("pathItems", |e| e.not_representable("components pathItems"));
            }
        }
        object.extensions(&components.extensions);
        object.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{OpenApiWriter, WriterSettings};
    use oaslice_common::{
        ComponentKey, ComponentKind, Document, HttpMethod, MediaType, Operation, PathItem, RefOr,
        Reference, RequestBody, Response, Schema, SpecVersion,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn with_webhook() -> Document {
        let mut response = Response {
            description: "ok".to_string(),
            ..Default::default()
        };
        response.content.insert(
            "application/json".to_string(),
            MediaType {
                schema: Some(RefOr::Ref(Reference::local(ComponentKey::new(
                    ComponentKind::Schema,
                    "Pet",
                )))),
                ..Default::default()
            },
        );
        let mut operation = Operation::default();
        operation
            .responses
            .insert("200".to_string(), RefOr::Item(response));
        operation.request_body = Some(RefOr::Item(RequestBody {
            required: true,
            ..Default::default()
        }));
        let mut item = PathItem::default();
        item.operations.insert(HttpMethod::Post, operation);

        let mut document = Document {
            spec_version: SpecVersion::V3_1,
            ..Default::default()
        };
        document.info.title = "Hooks".to_string();
        document.info.version = "1".to_string();
        document.info.summary = Some("hooks only".to_string());
        document.webhooks.insert("newPet".to_string(), RefOr::Item(item));
        document
            .components
            .schemas
            .insert("Pet".to_string(), RefOr::Item(Schema::of_type("object")));
        document
    }

    #[test]
    fn test_v31_keeps_webhooks() {
        let (value, diagnostics) = OpenApiWriter::new(WriterSettings::default())
            .write_value(&with_webhook());
        assert!(diagnostics.is_empty());
        assert_eq!(value["info"]["summary"], "hooks only");
        assert_eq!(value["paths"], json!({}));
        assert_eq!(
            value["webhooks"]["newPet"]["post"]["requestBody"],
            json!({"content": {}, "required": true})
        );
        assert_eq!(
            value["webhooks"]["newPet"]["post"]["responses"]["200"]["content"]["application/json"]
                ["schema"],
            json!({"$ref": "#/components/schemas/Pet"})
        );
    }

    #[test]
    fn test_v30_drops_v31_only_content() {
        let (value, diagnostics) = OpenApiWriter::new(WriterSettings {
            version: Some(SpecVersion::V3_0),
            ..Default::default()
        })
        .write_value(&with_webhook());

        assert_eq!(value["openapi"], "3.0.4");
        assert!(value.get("webhooks").is_none());
        assert!(value["info"].get("summary").is_none());
        let pointers: Vec<&str> = diagnostics.iter().map(|d| d.pointer.as_str()).collect();
        assert_eq!(pointers, vec!["#/info", "#/webhooks"]);
    }

    #[test]
    fn test_field_order() {
        let value = OpenApiWriter::new(WriterSettings::default())
            .write_value(&with_webhook())
            .0;
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["openapi", "info", "paths", "webhooks", "components"]);
    }
}
