//! Generic traversal driver with pluggable per-node hooks
//!
//! A [`Walker`] owns the traversal order; a [`Visitor`] supplies only the
//! hooks it cares about. References are reported through
//! [`Visitor::visit_reference`] and never followed, so walking a document
//! with reference cycles always terminates. The walker does not deduplicate
//! nodes reached through several edges.

use crate::model::{
    escape_segment, Callback, ComponentKey, ComponentKind, Components, Document, Example, Header,
    HttpMethod, Info, Link, MediaType, Operation, Parameter, PathItem, RefOr, Reference,
    RequestBody, Response, Schema, SecurityRequirement, SecurityScheme, Server, Tag,
};
use crate::AdditionalProperties;
use indexmap::IndexMap;

/// What the walker does after an `enter_*` hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Walk {
    /// Descend into the node's children
    #[default]
    Continue,
    /// Do not descend, but still call the matching `leave_*` hook
    SkipChildren,
    /// Abort the whole traversal; no further hooks run
    Stop,
}

/// Location of the node being visited
#[derive(Debug, Clone, Default)]
pub struct WalkContext {
    segments: Vec<String>,
    path_template: Option<String>,
    method: Option<HttpMethod>,
    component: Option<ComponentKey>,
}

impl WalkContext {
    /// JSON pointer of the current node, e.g. `#/paths/~1pets/get`
    pub fn pointer(&self) -> String {
        let mut pointer = String::from("#");
        for segment in &self.segments {
            pointer.push('/');
            pointer.push_str(&escape_segment(segment));
        }
        pointer
    }

    /// Path template (or webhook / callback expression) being walked
    pub fn path_template(&self) -> Option<&str> {
        self.path_template.as_deref()
    }

    pub fn method(&self) -> Option<HttpMethod> {
        self.method
    }

    /// Component entry being walked, when inside `components`
    pub fn component(&self) -> Option<&ComponentKey> {
        self.component.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    fn pop(&mut self) {
        self.segments.pop();
    }
}

/// Per-node hooks; every hook defaults to a no-op that continues
#[allow(unused_variables)]
pub trait Visitor {
    fn enter_document(&mut self, document: &mut Document, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_document(&mut self, document: &mut Document, ctx: &WalkContext) {}

    fn enter_info(&mut self, info: &mut Info, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_info(&mut self, info: &mut Info, ctx: &WalkContext) {}

    fn enter_server(&mut self, server: &mut Server, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_server(&mut self, server: &mut Server, ctx: &WalkContext) {}

    fn enter_path_item(&mut self, item: &mut PathItem, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_path_item(&mut self, item: &mut PathItem, ctx: &WalkContext) {}

    fn enter_operation(&mut self, operation: &mut Operation, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_operation(&mut self, operation: &mut Operation, ctx: &WalkContext) {}

    fn enter_parameter(&mut self, parameter: &mut Parameter, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_parameter(&mut self, parameter: &mut Parameter, ctx: &WalkContext) {}

    fn enter_request_body(&mut self, body: &mut RequestBody, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_request_body(&mut self, body: &mut RequestBody, ctx: &WalkContext) {}

    fn enter_response(&mut self, response: &mut Response, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_response(&mut self, response: &mut Response, ctx: &WalkContext) {}

    fn enter_media_type(&mut self, media_type: &mut MediaType, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_media_type(&mut self, media_type: &mut MediaType, ctx: &WalkContext) {}

    fn enter_header(&mut self, header: &mut Header, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_header(&mut self, header: &mut Header, ctx: &WalkContext) {}

    fn enter_example(&mut self, example: &mut Example, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_example(&mut self, example: &mut Example, ctx: &WalkContext) {}

    fn enter_link(&mut self, link: &mut Link, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_link(&mut self, link: &mut Link, ctx: &WalkContext) {}

    fn enter_callback(&mut self, callback: &mut Callback, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_callback(&mut self, callback: &mut Callback, ctx: &WalkContext) {}

    fn enter_schema(&mut self, schema: &mut Schema, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_schema(&mut self, schema: &mut Schema, ctx: &WalkContext) {}

    fn enter_tag(&mut self, tag: &mut Tag, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_tag(&mut self, tag: &mut Tag, ctx: &WalkContext) {}

    fn enter_security_scheme(&mut self, scheme: &mut SecurityScheme, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_security_scheme(&mut self, scheme: &mut SecurityScheme, ctx: &WalkContext) {}

    fn enter_security_requirement(
        &mut self,
        requirement: &mut SecurityRequirement,
        ctx: &WalkContext,
    ) -> Walk {
        Walk::Continue
    }
    fn leave_security_requirement(
        &mut self,
        requirement: &mut SecurityRequirement,
        ctx: &WalkContext,
    ) {
    }

    fn enter_components(&mut self, components: &mut Components, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
    fn leave_components(&mut self, components: &mut Components, ctx: &WalkContext) {}

    /// Called for every `$ref`; the target is never walked from here
    fn visit_reference(&mut self, reference: &mut Reference, ctx: &WalkContext) -> Walk {
        Walk::Continue
    }
}

/// Enter a node, run the child block unless skipped, then leave it
macro_rules! visit {
    ($self:ident, $node:ident, $enter:ident, $leave:ident, $children:block) => {{
        if $self.stopped {
            return;
        }
        match $self.visitor.$enter($node, &$self.context) {
            Walk::Stop => {
                $self.stopped = true;
                return;
            }
            Walk::SkipChildren => {}
            Walk::Continue => $children,
        }
        if !$self.stopped {
            $self.visitor.$leave($node, &$self.context);
        }
    }};
}

/// Traversal driver for one visitor
pub struct Walker<'v, V: Visitor + ?Sized> {
    visitor: &'v mut V,
    context: WalkContext,
    stopped: bool,
}

impl<'v, V: Visitor + ?Sized> Walker<'v, V> {
    pub fn new(visitor: &'v mut V) -> Self {
        Self {
            visitor,
            context: WalkContext::default(),
            stopped: false,
        }
    }

    /// Whether a hook returned [`Walk::Stop`]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn walk(&mut self, document: &mut Document) {
        visit!(self, document, enter_document, leave_document, {
            let info = &mut document.info;
            self.context.push("info");
            self.walk_info(info);
            self.context.pop();

            self.walk_servers(&mut document.servers);

            self.context.push("paths");
            for (template, item) in document.paths.iter_mut() {
                self.with_template(template, |walker| walker.walk_path_item(item));
            }
            self.context.pop();

            self.context.push("webhooks");
            for (name, item) in document.webhooks.iter_mut() {
                self.with_template(name, |walker| {
                    walker.walk_ref_or(item, Self::walk_path_item)
                });
            }
            self.context.pop();

            self.context.push("components");
            self.walk_components(&mut document.components);
            self.context.pop();

            self.context.push("tags");
            for (index, tag) in document.tags.iter_mut().enumerate() {
                self.context.push(index.to_string());
                self.walk_tag(tag);
                self.context.pop();
            }
            self.context.pop();

            self.walk_security(&mut document.security);
        });
    }

    fn with_template(&mut self, template: &str, f: impl FnOnce(&mut Self)) {
        self.context.push(template);
        let previous_template = self.context.path_template.replace(template.to_string());
        let previous_method = self.context.method.take();
        f(self);
        self.context.method = previous_method;
        self.context.path_template = previous_template;
        self.context.pop();
    }

    fn walk_ref_or<T>(&mut self, node: &mut RefOr<T>, walk_item: fn(&mut Self, &mut T)) {
        match node {
            RefOr::Ref(reference) => {
                if self.stopped {
                    return;
                }
                if self.visitor.visit_reference(reference, &self.context) == Walk::Stop {
                    self.stopped = true;
                }
            }
            RefOr::Item(item) => walk_item(self, item),
        }
    }

    fn walk_named<T>(
        &mut self,
        segment: &str,
        map: &mut IndexMap<String, T>,
        walk_entry: fn(&mut Self, &mut T),
    ) {
        if map.is_empty() {
            return;
        }
        self.context.push(segment);
        for (name, entry) in map.iter_mut() {
            self.context.push(name.as_str());
            walk_entry(self, entry);
            self.context.pop();
        }
        self.context.pop();
    }

    fn walk_list<T>(&mut self, segment: &str, list: &mut [T], walk_entry: fn(&mut Self, &mut T)) {
        if list.is_empty() {
            return;
        }
        self.context.push(segment);
        for (index, entry) in list.iter_mut().enumerate() {
            self.context.push(index.to_string());
            walk_entry(self, entry);
            self.context.pop();
        }
        self.context.pop();
    }

    fn walk_servers(&mut self, servers: &mut [Server]) {
        self.walk_list("servers", servers, Self::walk_server);
    }

    fn walk_parameters(&mut self, parameters: &mut [RefOr<Parameter>]) {
        self.walk_list("parameters", parameters, |walker, parameter| {
            walker.walk_ref_or(parameter, Self::walk_parameter)
        });
    }

    fn walk_info(&mut self, info: &mut Info) {
        visit!(self, info, enter_info, leave_info, {});
    }

    fn walk_server(&mut self, server: &mut Server) {
        visit!(self, server, enter_server, leave_server, {});
    }

    pub fn walk_path_item(&mut self, item: &mut PathItem) {
        visit!(self, item, enter_path_item, leave_path_item, {
            self.walk_servers(&mut item.servers);
            self.walk_parameters(&mut item.parameters);
            for (method, operation) in item.operations.iter_mut() {
                self.context.push(method.as_str());
                let previous = self.context.method.replace(*method);
                self.walk_operation(operation);
                self.context.method = previous;
                self.context.pop();
            }
        });
    }

    pub fn walk_operation(&mut self, operation: &mut Operation) {
        visit!(self, operation, enter_operation, leave_operation, {
            self.walk_parameters(&mut operation.parameters);
            if let Some(body) = operation.request_body.as_mut() {
                self.context.push("requestBody");
                self.walk_ref_or(body, Self::walk_request_body);
                self.context.pop();
            }
            self.walk_named("responses", &mut operation.responses, |walker, response| {
                walker.walk_ref_or(response, Self::walk_response)
            });
            self.walk_named("callbacks", &mut operation.callbacks, |walker, callback| {
                walker.walk_ref_or(callback, Self::walk_callback)
            });
            if let Some(security) = operation.security.as_mut() {
                self.walk_security(security);
            }
            self.walk_servers(&mut operation.servers);
        });
    }

    fn walk_parameter(&mut self, parameter: &mut Parameter) {
        visit!(self, parameter, enter_parameter, leave_parameter, {
            self.walk_optional_schema(&mut parameter.schema);
            self.walk_examples(&mut parameter.examples);
            self.walk_content(&mut parameter.content);
        });
    }

    fn walk_request_body(&mut self, body: &mut RequestBody) {
        visit!(self, body, enter_request_body, leave_request_body, {
            self.walk_content(&mut body.content);
        });
    }

    fn walk_response(&mut self, response: &mut Response) {
        visit!(self, response, enter_response, leave_response, {
            self.walk_headers(&mut response.headers);
            self.walk_content(&mut response.content);
            self.walk_named("links", &mut response.links, |walker, link| {
                walker.walk_ref_or(link, Self::walk_link)
            });
        });
    }

    fn walk_content(&mut self, content: &mut IndexMap<String, MediaType>) {
        self.walk_named("content", content, Self::walk_media_type);
    }

    fn walk_headers(&mut self, headers: &mut IndexMap<String, RefOr<Header>>) {
        self.walk_named("headers", headers, |walker, header| {
            walker.walk_ref_or(header, Self::walk_header)
        });
    }

    fn walk_examples(&mut self, examples: &mut IndexMap<String, RefOr<Example>>) {
        self.walk_named("examples", examples, |walker, example| {
            walker.walk_ref_or(example, Self::walk_example)
        });
    }

    fn walk_optional_schema(&mut self, schema: &mut Option<RefOr<Schema>>) {
        if let Some(schema) = schema.as_mut() {
            self.context.push("schema");
            self.walk_ref_or(schema, Self::walk_schema);
            self.context.pop();
        }
    }

    fn walk_media_type(&mut self, media_type: &mut MediaType) {
        visit!(self, media_type, enter_media_type, leave_media_type, {
            self.walk_optional_schema(&mut media_type.schema);
            self.walk_examples(&mut media_type.examples);
            self.walk_named("encoding", &mut media_type.encoding, |walker, encoding| {
                walker.walk_headers(&mut encoding.headers)
            });
        });
    }

    fn walk_header(&mut self, header: &mut Header) {
        visit!(self, header, enter_header, leave_header, {
            self.walk_optional_schema(&mut header.schema);
            self.walk_examples(&mut header.examples);
            self.walk_content(&mut header.content);
        });
    }

    fn walk_example(&mut self, example: &mut Example) {
        visit!(self, example, enter_example, leave_example, {});
    }

    fn walk_link(&mut self, link: &mut Link) {
        visit!(self, link, enter_link, leave_link, {});
    }

    fn walk_callback(&mut self, callback: &mut Callback) {
        visit!(self, callback, enter_callback, leave_callback, {
            for (expression, item) in callback.expressions.iter_mut() {
                self.with_template(expression, |walker| walker.walk_path_item(item));
            }
        });
    }

    pub fn walk_schema(&mut self, schema: &mut Schema) {
        visit!(self, schema, enter_schema, leave_schema, {
            self.walk_named("properties", &mut schema.properties, |walker, property| {
                walker.walk_ref_or(property, Self::walk_schema)
            });
            if let Some(AdditionalProperties::Schema(additional)) =
                schema.additional_properties.as_mut()
            {
                self.context.push("additionalProperties");
                self.walk_ref_or(&mut **additional, Self::walk_schema);
                self.context.pop();
            }
            if let Some(items) = schema.items.as_mut() {
                self.context.push("items");
                self.walk_ref_or(&mut **items, Self::walk_schema);
                self.context.pop();
            }
            self.walk_list("allOf", &mut schema.all_of, |walker, child| {
                walker.walk_ref_or(child, Self::walk_schema)
            });
            self.walk_list("anyOf", &mut schema.any_of, |walker, child| {
                walker.walk_ref_or(child, Self::walk_schema)
            });
            self.walk_list("oneOf", &mut schema.one_of, |walker, child| {
                walker.walk_ref_or(child, Self::walk_schema)
            });
            if let Some(not) = schema.not.as_mut() {
                self.context.push("not");
                self.walk_ref_or(&mut **not, Self::walk_schema);
                self.context.pop();
            }
        });
    }

    fn walk_tag(&mut self, tag: &mut Tag) {
        visit!(self, tag, enter_tag, leave_tag, {});
    }

    fn walk_security_scheme(&mut self, scheme: &mut SecurityScheme) {
        visit!(self, scheme, enter_security_scheme, leave_security_scheme, {});
    }

    fn walk_security(&mut self, requirements: &mut [SecurityRequirement]) {
        self.context.push("security");
        for (index, requirement) in requirements.iter_mut().enumerate() {
            self.context.push(index.to_string());
            self.walk_security_requirement(requirement);
            self.context.pop();
        }
        self.context.pop();
    }

    fn walk_security_requirement(&mut self, requirement: &mut SecurityRequirement) {
        visit!(
            self,
            requirement,
            enter_security_requirement,
            leave_security_requirement,
            {}
        );
    }

    pub fn walk_components(&mut self, components: &mut Components) {
        visit!(self, components, enter_components, leave_components, {
            self.walk_registry(ComponentKind::Schema, &mut components.schemas, Self::walk_schema);
            self.walk_registry(
                ComponentKind::Response,
                &mut components.responses,
                Self::walk_response,
            );
            self.walk_registry(
                ComponentKind::Parameter,
                &mut components.parameters,
                Self::walk_parameter,
            );
            self.walk_registry(
                ComponentKind::Example,
                &mut components.examples,
                Self::walk_example,
            );
            self.walk_registry(
                ComponentKind::RequestBody,
                &mut components.request_bodies,
                Self::walk_request_body,
            );
            self.walk_registry(ComponentKind::Header, &mut components.headers, Self::walk_header);
            self.walk_registry(
                ComponentKind::SecurityScheme,
                &mut components.security_schemes,
                Self::walk_security_scheme,
            );
            self.walk_registry(ComponentKind::Link, &mut components.links, Self::walk_link);
            self.walk_registry(
                ComponentKind::Callback,
                &mut components.callbacks,
                Self::walk_callback,
            );
            self.walk_registry(
                ComponentKind::PathItem,
                &mut components.path_items,
                Self::walk_path_item,
            );
        });
    }

    /// Walk one registry entry; unknown keys are ignored
    pub fn walk_component(&mut self, components: &mut Components, key: &ComponentKey) {
        let name = key.name.as_str();
        match key.kind {
            ComponentKind::Schema => {
                if let Some(entry) = components.schemas.get_mut(name) {
                    self.walk_entry(key, entry, Self::walk_schema);
                }
            }
            ComponentKind::Response => {
                if let Some(entry) = components.responses.get_mut(name) {
                    self.walk_entry(key, entry, Self::walk_response);
                }
            }
            ComponentKind::Parameter => {
                if let Some(entry) = components.parameters.get_mut(name) {
                    self.walk_entry(key, entry, Self::walk_parameter);
                }
            }
            ComponentKind::Example => {
                if let Some(entry) = components.examples.get_mut(name) {
                    self.walk_entry(key, entry, Self::walk_example);
                }
            }
            ComponentKind::RequestBody => {
                if let Some(entry) = components.request_bodies.get_mut(name) {
                    self.walk_entry(key, entry, Self::walk_request_body);
                }
            }
            ComponentKind::Header => {
                if let Some(entry) = components.headers.get_mut(name) {
                    self.walk_entry(key, entry, Self::walk_header);
                }
            }
            ComponentKind::SecurityScheme => {
                if let Some(entry) = components.security_schemes.get_mut(name) {
                    self.walk_entry(key, entry, Self::walk_security_scheme);
                }
            }
            ComponentKind::Link => {
                if let Some(entry) = components.links.get_mut(name) {
                    self.walk_entry(key, entry, Self::walk_link);
                }
            }
            ComponentKind::Callback => {
                if let Some(entry) = components.callbacks.get_mut(name) {
                    self.walk_entry(key, entry, Self::walk_callback);
                }
            }
            ComponentKind::PathItem => {
                if let Some(entry) = components.path_items.get_mut(name) {
                    self.walk_entry(key, entry, Self::walk_path_item);
                }
            }
        }
    }

    fn walk_registry<T>(
        &mut self,
        kind: ComponentKind,
        registry: &mut IndexMap<String, RefOr<T>>,
        walk_item: fn(&mut Self, &mut T),
    ) {
        for (name, entry) in registry.iter_mut() {
            if self.stopped {
                return;
            }
            let key = ComponentKey::new(kind, name.as_str());
            self.walk_entry(&key, entry, walk_item);
        }
    }

    fn walk_entry<T>(
        &mut self,
        key: &ComponentKey,
        entry: &mut RefOr<T>,
        walk_item: fn(&mut Self, &mut T),
    ) {
        let in_components = self.context.segments.last().map(String::as_str) == Some("components");
        if !in_components {
            self.context.push("components");
        }
        self.context.push(key.kind.section());
        self.context.push(key.name.as_str());
        let previous = self.context.component.replace(key.clone());

        self.walk_ref_or(entry, walk_item);

        self.context.component = previous;
        self.context.pop();
        self.context.pop();
        if !in_components {
            self.context.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReferenceTarget;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        stop_at: Option<String>,
    }

    impl Recorder {
        fn record(&mut self, event: String) -> Walk {
            let stop = self.stop_at.as_deref() == Some(event.as_str());
            self.events.push(event);
            if stop {
                Walk::Stop
            } else {
                Walk::Continue
            }
        }
    }

    impl Visitor for Recorder {
        fn enter_path_item(&mut self, _item: &mut PathItem, ctx: &WalkContext) -> Walk {
            self.record(format!("path {}", ctx.path_template().unwrap_or("")))
        }

        fn enter_operation(&mut self, _operation: &mut Operation, ctx: &WalkContext) -> Walk {
            self.record(format!("op {}", ctx.pointer()))
        }

        fn enter_schema(&mut self, schema: &mut Schema, ctx: &WalkContext) -> Walk {
            if schema.title.as_deref() == Some("skip") {
                self.events.push(format!("skip {}", ctx.pointer()));
                return Walk::SkipChildren;
            }
            self.record(format!("schema {}", ctx.pointer()))
        }

        fn visit_reference(&mut self, reference: &mut Reference, _ctx: &WalkContext) -> Walk {
            self.record(format!("ref {}", reference.pointer))
        }

        fn enter_components(&mut self, _components: &mut Components, _ctx: &WalkContext) -> Walk {
            self.record("components".to_string())
        }

        fn enter_security_requirement(
            &mut self,
            _requirement: &mut SecurityRequirement,
            ctx: &WalkContext,
        ) -> Walk {
            self.record(format!("security {}", ctx.pointer()))
        }
    }

    fn node_schema() -> Schema {
        let mut node = Schema::of_type("object");
        node.properties.insert(
            "next".to_string(),
            RefOr::Ref(Reference::local(ComponentKey::new(
                ComponentKind::Schema,
                "Node",
            ))),
        );
        node
    }

    fn sample_document() -> Document {
        let mut document = Document::default();
        let mut item = PathItem::default();
        let mut post = Operation::default();
        post.request_body = Some(RefOr::Item(RequestBody {
            content: [(
                "application/json".to_string(),
                MediaType {
                    schema: Some(RefOr::Item(Schema::of_type("string"))),
                    ..Default::default()
                },
            )]
            .into_iter()
            .collect(),
            ..Default::default()
        }));
        item.operations.insert(HttpMethod::Post, post);
        item.operations.insert(HttpMethod::Get, Operation::default());
        document.paths.insert("/nodes/{id}".to_string(), item);
        document
            .components
            .schemas
            .insert("Node".to_string(), RefOr::Item(node_schema()));
        document
    }

    #[test]
    fn test_walk_order_and_pointers() {
        let mut document = sample_document();
        let mut recorder = Recorder::default();
        Walker::new(&mut recorder).walk(&mut document);

        assert_eq!(
            recorder.events,
            vec![
                "path /nodes/{id}",
                "op #/paths/~1nodes~1{id}/get",
                "op #/paths/~1nodes~1{id}/post",
                "schema #/paths/~1nodes~1{id}/post/requestBody/content/application~1json/schema",
                "components",
                "schema #/components/schemas/Node",
                "ref #/components/schemas/Node",
            ]
        );
    }

    #[test]
    fn test_self_reference_terminates() {
        let mut schema = node_schema();
        let mut recorder = Recorder::default();
        Walker::new(&mut recorder).walk_schema(&mut schema);
        assert_eq!(recorder.events.len(), 2);
    }

    #[test]
    fn test_stop_unwinds() {
        let mut document = sample_document();
        let mut recorder = Recorder {
            stop_at: Some("op #/paths/~1nodes~1{id}/get".to_string()),
            ..Default::default()
        };
        let mut walker = Walker::new(&mut recorder);
        walker.walk(&mut document);
        assert!(walker.is_stopped());
        assert_eq!(recorder.events.len(), 2);
    }

    #[test]
    fn test_skip_children() {
        let mut schema = node_schema();
        schema.title = Some("skip".to_string());
        let mut recorder = Recorder::default();
        Walker::new(&mut recorder).walk_schema(&mut schema);
        assert_eq!(recorder.events, vec!["skip #"]);
    }

    #[test]
    fn test_operation_security_requirements_are_visited() {
        let mut document = sample_document();
        let api_key: SecurityRequirement = [("apiKey".to_string(), vec![])].into_iter().collect();
        document.security.push(api_key.clone());
        let item = document.paths.get_mut("/nodes/{id}").unwrap();
        item.operations.get_mut(&HttpMethod::Get).unwrap().security = Some(vec![api_key]);
        item.operations.get_mut(&HttpMethod::Post).unwrap().security = Some(vec![]);

        let mut recorder = Recorder::default();
        Walker::new(&mut recorder).walk(&mut document);
        let security: Vec<&str> = recorder
            .events
            .iter()
            .map(String::as_str)
            .filter(|event| event.starts_with("security"))
            .collect();
        assert_eq!(
            security,
            vec![
                "security #/paths/~1nodes~1{id}/get/security/0",
                "security #/security/0",
            ]
        );
    }

    #[test]
    fn test_walk_single_component() {
        let mut document = sample_document();
        let mut recorder = Recorder::default();
        let key = ComponentKey::new(ComponentKind::Schema, "Node");
        Walker::new(&mut recorder).walk_component(&mut document.components, &key);
        assert_eq!(
            recorder.events,
            vec![
                "schema #/components/schemas/Node",
                "ref #/components/schemas/Node"
            ]
        );
    }

    struct Rewriter;

    impl Visitor for Rewriter {
        fn enter_schema(&mut self, schema: &mut Schema, _ctx: &WalkContext) -> Walk {
            if schema.properties.is_empty() && schema.single_type() == Some("object") {
                schema
                    .properties
                    .insert("added".to_string(), RefOr::Item(Schema::of_type("string")));
            }
            schema.description = Some("seen".to_string());
            Walk::Continue
        }

        fn visit_reference(&mut self, reference: &mut Reference, _ctx: &WalkContext) -> Walk {
            reference.bind(ReferenceTarget::Local(ComponentKey::new(
                ComponentKind::Schema,
                "Node",
            )));
            Walk::Continue
        }
    }

    #[test]
    fn test_children_rewritten_in_enter_are_walked() {
        let mut schema = Schema::of_type("object");
        Walker::new(&mut Rewriter).walk_schema(&mut schema);
        let added = schema.properties["added"].as_item().unwrap();
        assert_eq!(added.description.as_deref(), Some("seen"));
    }
}
