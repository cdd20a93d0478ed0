//! Predicate-based document slicing
//!
//! Filtering builds a new document and leaves the input untouched:
//!
//! 1. path items are copied with only the operations the predicate keeps;
//!    path items left without operations are dropped, webhooks always are
//! 2. the component closure of what remains is computed by identity
//!    (see [`crate::closure`])
//! 3. components are rebuilt from the closure, tags pruned to those still
//!    used by an operation
//! 4. any reference whose target is gone is removed together with the field
//!    holding it, each removal reported as a `dangling-reference` diagnostic

use crate::closure::reachable;
use crate::url_match::UrlMatcher;
use indexmap::IndexMap;
use oaslice_common::{
    escape_segment, AdditionalProperties, ComponentKey, ComponentKind, Components, DiagnosticKind,
    Diagnostics, Document, Header, HttpMethod, MediaType, OpenApiError, Operation, Parameter,
    PathItem, RefOr, Reference, RequestUrls, Response, Result, Schema, SecurityRequirement,
    Visitor, Walk, WalkContext, Walker,
};
use regex::Regex;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Decides whether an operation survives filtering
///
/// Arguments are the path template, the HTTP method and the operation.
pub type OperationPredicate = Box<dyn Fn(&str, Option<HttpMethod>, &Operation) -> bool>;

/// Selection modes; at most one may be set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Operation ids to keep, `*` keeps every operation
    pub operation_ids: Option<Vec<String>>,
    /// One regular expression, or several exact tag names
    pub tags: Option<Vec<String>>,
    /// Request URL → HTTP methods, as imported from a collection or manifest
    pub request_urls: Option<RequestUrls>,
}

impl FilterCriteria {
    pub fn by_operation_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operation_ids: Some(ids.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn by_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: Some(tags.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    pub fn by_request_urls(request_urls: RequestUrls) -> Self {
        Self {
            request_urls: Some(request_urls),
            ..Default::default()
        }
    }

    /// True when no selection mode is set
    pub fn is_empty(&self) -> bool {
        self.active_modes().is_empty()
    }

    fn active_modes(&self) -> Vec<&'static str> {
        let mut modes = Vec::new();
        if self.operation_ids.is_some() {
            modes.push("operation ids");
        }
        if self.tags.is_some() {
            modes.push("tags");
        }
        if self.request_urls.is_some() {
            modes.push("request URLs");
        }
        modes
    }

    /// Fail with [`OpenApiError::ConflictingFilterCriteria`] when more than
    /// one mode is set
    pub fn validate(&self) -> Result<()> {
        let modes = self.active_modes();
        if modes.len() > 1 {
            return Err(OpenApiError::ConflictingFilterCriteria(format!(
                "select operations by only one of operation ids, tags or request URLs (got {})",
                modes.join(" and ")
            )));
        }
        Ok(())
    }

    /// Build the predicate for `document`; `None` when no mode is set
    ///
    /// Request URLs that match no operation are reported to `diagnostics`.
    pub fn predicate(
        &self,
        document: &Document,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<OperationPredicate>> {
        self.validate()?;

        if let Some(ids) = &self.operation_ids {
            return Ok(Some(operation_id_predicate(ids)));
        }
        if let Some(tags) = &self.tags {
            return tag_predicate(tags).map(Some);
        }
        if let Some(request_urls) = &self.request_urls {
            return Ok(Some(request_url_predicate(
                request_urls,
                document,
                diagnostics,
            )));
        }
        Ok(None)
    }
}

fn operation_id_predicate(ids: &[String]) -> OperationPredicate {
    if ids.iter().any(|id| id == "*") {
        return Box::new(|_, _, _| true);
    }
    let ids: BTreeSet<String> = ids.iter().cloned().collect();
    Box::new(move |_, _, operation| {
        operation
            .operation_id
            .as_ref()
            .is_some_and(|id| ids.contains(id))
    })
}

fn tag_predicate(tags: &[String]) -> Result<OperationPredicate> {
    if let [pattern] = tags {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            OpenApiError::Settings(format!("invalid tag pattern '{}': {}", pattern, e))
        })?;
        return Ok(Box::new(move |_, _, operation| {
            operation.tags.iter().any(|tag| regex.is_match(tag))
        }));
    }
    let tags: BTreeSet<String> = tags.iter().cloned().collect();
    Ok(Box::new(move |_, _, operation| {
        operation.tags.iter().any(|tag| tags.contains(tag))
    }))
}

fn request_url_predicate(
    request_urls: &RequestUrls,
    document: &Document,
    diagnostics: &mut Diagnostics,
) -> OperationPredicate {
    let matcher = UrlMatcher::new(document);
    let mut selected: BTreeSet<(String, HttpMethod)> = BTreeSet::new();

    for (url, methods) in request_urls {
        let Some(template) = matcher.find(url) else {
            diagnostics.report(
                DiagnosticKind::UnmatchedRequestUrl,
                "#/paths",
                format!("request URL '{}' matches no path", url),
            );
            continue;
        };
        let pointer = format!("#/paths/{}", escape_segment(template));
        let item = document.paths.get(template);

        for method in methods {
            match method.parse::<HttpMethod>() {
                Ok(method) if item.is_some_and(|item| item.operation(method).is_some()) => {
                    selected.insert((template.to_string(), method));
                }
                Ok(method) => diagnostics.report(
                    DiagnosticKind::UnmatchedRequestUrl,
                    pointer.clone(),
                    format!(
                        "request {} {} matches path '{}', which has no {} operation",
                        method.as_str().to_uppercase(),
                        url,
                        template,
                        method.as_str()
                    ),
                ),
                Err(_) => diagnostics.report(
                    DiagnosticKind::UnmatchedRequestUrl,
                    pointer.clone(),
                    format!("request {} {} uses an unknown HTTP method", method, url),
                ),
            }
        }
    }

    debug!(
        requests = request_urls.len(),
        operations = selected.len(),
        "matched request URLs"
    );
    Box::new(move |template, method, _| {
        method.is_some_and(|method| selected.contains(&(template.to_string(), method)))
    })
}

/// Filtered document and what was removed on the way
#[derive(Debug, Clone)]
pub struct FilterResult {
    pub document: Document,
    pub diagnostics: Diagnostics,
}

/// Copy of `document` holding only the operations `predicate` keeps and
/// the components they reach
pub fn filter_document(document: &Document, predicate: &OperationPredicate) -> FilterResult {
    let mut result = Document {
        paths: IndexMap::new(),
        webhooks: IndexMap::new(),
        ..document.clone()
    };

    for (template, item) in &document.paths {
        let operations: Vec<(HttpMethod, Operation)> = item
            .operations
            .iter()
            .filter(|(method, operation)| {
                let keep = predicate(template.as_str(), Some(**method), *operation);
                if !keep {
                    trace!(path = %template, method = %method, "dropping operation");
                }
                keep
            })
            .map(|(method, operation)| (*method, operation.clone()))
            .collect();
        if operations.is_empty() {
            continue;
        }
        result.paths.insert(
            template.clone(),
            PathItem {
                summary: item.summary.clone(),
                description: item.description.clone(),
                operations: operations.into_iter().collect(),
                servers: item.servers.clone(),
                parameters: item.parameters.clone(),
                extensions: item.extensions.clone(),
            },
        );
    }
    if !document.webhooks.is_empty() {
        debug!(webhooks = document.webhooks.len(), "dropping webhooks");
    }
    if result.paths.is_empty() {
        result.security.clear();
    }

    let closure = reachable(&result);
    result.components = result.components.subset(&closure);

    let used_tags: BTreeSet<String> = result
        .operations()
        .flat_map(|(_, _, operation)| operation.tags.iter().cloned())
        .collect();
    result.tags.retain(|tag| used_tags.contains(&tag.name));

    let mut pruner = DanglingPruner::default();
    pruner.prune_aliases(&mut result.components);
    Walker::new(&mut pruner).walk(&mut result);

    debug!(
        paths = result.paths.len(),
        operations = result.operations().count(),
        components = result.components.len(),
        removed = pruner.diagnostics.len(),
        "filtered document"
    );
    FilterResult {
        document: result,
        diagnostics: pruner.diagnostics,
    }
}

/// Removes references whose target component no longer exists
#[derive(Debug, Default)]
struct DanglingPruner {
    present: BTreeSet<ComponentKey>,
    diagnostics: Diagnostics,
}

impl DanglingPruner {
    fn is_dangling(&self, reference: &Reference) -> bool {
        if reference.is_external() {
            return false;
        }
        reference
            .local_key()
            .map_or(true, |key| !self.present.contains(key))
    }

    fn is_dangling_node<T>(&self, node: &RefOr<T>) -> bool {
        matches!(node, RefOr::Ref(reference) if self.is_dangling(reference))
    }

    fn dropped(&mut self, pointer: String, reference: &Reference) {
        trace!(pointer = %pointer, target = %reference.pointer, "removing dangling reference");
        self.diagnostics.report(
            DiagnosticKind::DanglingReference,
            pointer,
            format!(
                "removed reference to '{}', its target is not part of the filtered document",
                reference.pointer
            ),
        );
    }

    /// Drop component entries that alias a missing component, until stable
    fn prune_aliases(&mut self, components: &mut Components) {
        loop {
            self.present = components.keys().into_iter().collect();
            let before = components.len();
            self.prune_map(&mut components.schemas, &registry(ComponentKind::Schema));
            self.prune_map(&mut components.responses, &registry(ComponentKind::Response));
            self.prune_map(&mut components.parameters, &registry(ComponentKind::Parameter));
            self.prune_map(&mut components.examples, &registry(ComponentKind::Example));
            self.prune_map(
                &mut components.request_bodies,
                &registry(ComponentKind::RequestBody),
            );
            self.prune_map(&mut components.headers, &registry(ComponentKind::Header));
            self.prune_map(
                &mut components.security_schemes,
                &registry(ComponentKind::SecurityScheme),
            );
            self.prune_map(&mut components.links, &registry(ComponentKind::Link));
            self.prune_map(&mut components.callbacks, &registry(ComponentKind::Callback));
            self.prune_map(&mut components.path_items, &registry(ComponentKind::PathItem));
            if components.len() == before {
                return;
            }
        }
    }

    fn prune_option<T>(&mut self, slot: &mut Option<RefOr<T>>, pointer: String) {
        if slot.as_ref().is_some_and(|node| self.is_dangling_node(node)) {
            if let Some(RefOr::Ref(reference)) = slot.take() {
                self.dropped(pointer, &reference);
            }
        }
    }

    fn prune_boxed<T>(&mut self, slot: &mut Option<Box<RefOr<T>>>, pointer: String) {
        if slot.as_deref().is_some_and(|node| self.is_dangling_node(node)) {
            if let Some(node) = slot.take() {
                if let RefOr::Ref(reference) = *node {
                    self.dropped(pointer, &reference);
                }
            }
        }
    }

    fn prune_map<T>(&mut self, map: &mut IndexMap<String, RefOr<T>>, pointer: &str) {
        let dangling: Vec<String> = map
            .iter()
            .filter(|(_, node)| self.is_dangling_node(node))
            .map(|(name, _)| name.clone())
            .collect();
        for name in dangling {
            if let Some(RefOr::Ref(reference)) = map.shift_remove(&name) {
                self.dropped(format!("{}/{}", pointer, escape_segment(&name)), &reference);
            }
        }
    }

    fn prune_list<T>(&mut self, list: &mut Vec<RefOr<T>>, pointer: &str) {
        if !list.iter().any(|node| self.is_dangling_node(node)) {
            return;
        }
        let mut kept = Vec::with_capacity(list.len());
        for (index, node) in std::mem::take(list).into_iter().enumerate() {
            match node {
                RefOr::Ref(reference) if self.is_dangling(&reference) => {
                    self.dropped(format!("{}/{}", pointer, index), &reference)
                }
                node => kept.push(node),
            }
        }
        *list = kept;
    }

    /// Scheme names without a security scheme component; a requirement
    /// emptied this way is removed instead of becoming "no auth"
    fn prune_requirements(&mut self, requirements: &mut Vec<SecurityRequirement>, pointer: &str) {
        let mut kept = Vec::with_capacity(requirements.len());
        for (index, mut requirement) in std::mem::take(requirements).into_iter().enumerate() {
            let was_empty = requirement.is_empty();
            let missing: Vec<String> = requirement
                .keys()
                .filter(|name| {
                    !self.present.contains(&ComponentKey::new(
                        ComponentKind::SecurityScheme,
                        name.as_str(),
                    ))
                })
                .cloned()
                .collect();
            for name in missing {
                requirement.shift_remove(&name);
                self.diagnostics.report(
                    DiagnosticKind::DanglingReference,
                    format!("{}/{}/{}", pointer, index, escape_segment(&name)),
                    format!(
                        "removed security requirement '{}', no such security scheme remains",
                        name
                    ),
                );
            }
            if was_empty || !requirement.is_empty() {
                kept.push(requirement);
            }
        }
        *requirements = kept;
    }
}

fn registry(kind: ComponentKind) -> String {
    format!("#/components/{}", kind.section())
}

impl Visitor for DanglingPruner {
    fn enter_document(&mut self, document: &mut Document, _ctx: &WalkContext) -> Walk {
        self.prune_requirements(&mut document.security, "#/security");
        Walk::Continue
    }

    fn enter_path_item(&mut self, item: &mut PathItem, ctx: &WalkContext) -> Walk {
        self.prune_list(&mut item.parameters, &format!("{}/parameters", ctx.pointer()));
        Walk::Continue
    }

    fn enter_operation(&mut self, operation: &mut Operation, ctx: &WalkContext) -> Walk {
        let pointer = ctx.pointer();
        self.prune_list(&mut operation.parameters, &format!("{}/parameters", pointer));
        self.prune_option(&mut operation.request_body, format!("{}/requestBody", pointer));
        self.prune_map(&mut operation.responses, &format!("{}/responses", pointer));
        self.prune_map(&mut operation.callbacks, &format!("{}/callbacks", pointer));
        if let Some(security) = operation.security.as_mut() {
            self.prune_requirements(security, &format!("{}/security", pointer));
        }
        Walk::Continue
    }

    fn enter_parameter(&mut self, parameter: &mut Parameter, ctx: &WalkContext) -> Walk {
        let pointer = ctx.pointer();
        self.prune_option(&mut parameter.schema, format!("{}/schema", pointer));
        self.prune_map(&mut parameter.examples, &format!("{}/examples", pointer));
        Walk::Continue
    }

    fn enter_media_type(&mut self, media_type: &mut MediaType, ctx: &WalkContext) -> Walk {
        let pointer = ctx.pointer();
        self.prune_option(&mut media_type.schema, format!("{}/schema", pointer));
        self.prune_map(&mut media_type.examples, &format!("{}/examples", pointer));
        for (name, encoding) in media_type.encoding.iter_mut() {
            let headers = format!("{}/encoding/{}/headers", pointer, escape_segment(name));
            self.prune_map(&mut encoding.headers, &headers);
        }
        Walk::Continue
    }

    fn enter_response(&mut self, response: &mut Response, ctx: &WalkContext) -> Walk {
        let pointer = ctx.pointer();
        self.prune_map(&mut response.headers, &format!("{}/headers", pointer));
        self.prune_map(&mut response.links, &format!("{}/links", pointer));
        Walk::Continue
    }

    fn enter_header(&mut self, header: &mut Header, ctx: &WalkContext) -> Walk {
        let pointer = ctx.pointer();
        self.prune_option(&mut header.schema, format!("{}/schema", pointer));
        self.prune_map(&mut header.examples, &format!("{}/examples", pointer));
        Walk::Continue
    }

    fn enter_schema(&mut self, schema: &mut Schema, ctx: &WalkContext) -> Walk {
        let pointer = ctx.pointer();
        self.prune_map(&mut schema.properties, &format!("{}/properties", pointer));
        let additional_dangling = matches!(
            &schema.additional_properties,
            Some(AdditionalProperties::Schema(node)) if self.is_dangling_node(node)
        );
        if additional_dangling {
            if let Some(AdditionalProperties::Schema(node)) = schema.additional_properties.take() {
                if let RefOr::Ref(reference) = *node {
                    self.dropped(format!("{}/additionalProperties", pointer), &reference);
                }
            }
        }
        self.prune_boxed(&mut schema.items, format!("{}/items", pointer));
        self.prune_list(&mut schema.all_of, &format!("{}/allOf", pointer));
        self.prune_list(&mut schema.any_of, &format!("{}/anyOf", pointer));
        self.prune_list(&mut schema.one_of, &format!("{}/oneOf", pointer));
        self.prune_boxed(&mut schema.not, format!("{}/not", pointer));
        Walk::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oaslice_common::{SecurityScheme, Tag};
    use pretty_assertions::assert_eq;

    fn schema_ref(name: &str) -> RefOr<Schema> {
        RefOr::Ref(Reference::local(ComponentKey::new(ComponentKind::Schema, name)))
    }

    fn operation(id: &str, tags: &[&str], schema: RefOr<Schema>) -> Operation {
        let mut response = Response {
            description: "ok".to_string(),
            ..Default::default()
        };
        response.content.insert(
            "application/json".to_string(),
            MediaType {
                schema: Some(schema),
                ..Default::default()
            },
        );
        let mut operation = Operation {
            operation_id: Some(id.to_string()),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            ..Default::default()
        };
        operation
            .responses
            .insert("200".to_string(), RefOr::Item(response));
        operation
    }

    /// `getPet` uses `Pet`, `listOrders` uses `Order`
    fn store() -> Document {
        let mut document = Document::default();
        let mut pets = PathItem::default();
        pets.operations.insert(
            HttpMethod::Get,
            operation("getPet", &["pets"], schema_ref("Pet")),
        );
        let mut orders = PathItem::default();
        orders.operations.insert(
            HttpMethod::Get,
            operation("listOrders", &["store"], schema_ref("Order")),
        );
        document.paths.insert("/pets/{id}".to_string(), pets);
        document.paths.insert("/orders".to_string(), orders);

        let mut pet = Schema::of_type("object");
        pet.properties.insert("category".to_string(), schema_ref("Category"));
        let schemas = &mut document.components.schemas;
        schemas.insert("Pet".to_string(), RefOr::Item(pet));
        schemas.insert("Category".to_string(), RefOr::Item(Schema::of_type("object")));
        schemas.insert("Order".to_string(), RefOr::Item(Schema::of_type("object")));

        for name in ["pets", "store", "unused"] {
            document.tags.push(Tag {
                name: name.to_string(),
                ..Default::default()
            });
        }
        document
    }

    fn filter(document: &Document, criteria: FilterCriteria) -> FilterResult {
        let mut diagnostics = Diagnostics::new();
        let predicate = criteria
            .predicate(document, &mut diagnostics)
            .unwrap()
            .unwrap();
        filter_document(document, &predicate)
    }

    #[test]
    fn test_filter_by_operation_id_keeps_closure() {
        let document = store();
        let result = filter(&document, FilterCriteria::by_operation_ids(["getPet"]));

        assert_eq!(result.document.paths.len(), 1);
        assert_eq!(result.document.operations().count(), 1);
        assert_eq!(
            result.document.components.names(ComponentKind::Schema),
            vec!["Pet", "Category"]
        );
        let tags: Vec<&str> = result.document.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tags, vec!["pets"]);
        assert!(result.diagnostics.is_empty());
        // input untouched
        assert_eq!(document, store());
    }

    #[test]
    fn test_wildcard_operation_id() {
        let document = store();
        let result = filter(&document, FilterCriteria::by_operation_ids(["*"]));
        assert_eq!(result.document.operations().count(), 2);
        assert_eq!(result.document.components.len(), 3);
    }

    #[test]
    fn test_zero_matches_is_empty_document() {
        let document = store();
        let result = filter(&document, FilterCriteria::by_tags(["nothing"]));
        assert!(result.document.paths.is_empty());
        assert!(result.document.components.is_empty());
        assert!(result.document.tags.is_empty());
    }

    #[test]
    fn test_single_tag_is_pattern() {
        let document = store();
        let result = filter(&document, FilterCriteria::by_tags(["p.*"]));
        let ids: Vec<_> = result
            .document
            .operations()
            .filter_map(|(_, _, operation)| operation.operation_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["getPet"]);

        // several entries are matched literally
        let result = filter(&document, FilterCriteria::by_tags(["p.*", "store"]));
        let ids: Vec<_> = result
            .document
            .operations()
            .filter_map(|(_, _, operation)| operation.operation_id.as_deref())
            .collect();
        assert_eq!(ids, vec!["listOrders"]);
    }

    #[test]
    fn test_invalid_tag_pattern() {
        let criteria = FilterCriteria::by_tags(["("]);
        let err = criteria
            .predicate(&store(), &mut Diagnostics::new())
            .err()
            .unwrap();
        assert!(matches!(err, OpenApiError::Settings(_)));
    }

    #[test]
    fn test_conflicting_criteria() {
        let criteria = FilterCriteria {
            operation_ids: Some(vec!["getPet".to_string()]),
            tags: Some(vec!["pets".to_string()]),
            request_urls: None,
        };
        let err = criteria.validate().unwrap_err();
        assert!(matches!(err, OpenApiError::ConflictingFilterCriteria(_)));
        assert!(err.to_string().contains("operation ids and tags"));
        assert!(FilterCriteria::default()
            .predicate(&store(), &mut Diagnostics::new())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_request_urls_select_operations() {
        let document = store();
        let mut request_urls = RequestUrls::new();
        request_urls.insert("/pets/{{petId}}".to_string(), vec!["get".to_string()]);
        request_urls.insert("/orders".to_string(), vec!["DELETE".to_string()]);
        request_urls.insert("/owners".to_string(), vec!["GET".to_string()]);

        let mut diagnostics = Diagnostics::new();
        let predicate = FilterCriteria::by_request_urls(request_urls)
            .predicate(&document, &mut diagnostics)
            .unwrap()
            .unwrap();
        assert_eq!(diagnostics.count_of(DiagnosticKind::UnmatchedRequestUrl), 2);

        let result = filter_document(&document, &predicate);
        assert_eq!(
            result.document.paths.keys().collect::<Vec<_>>(),
            vec!["/pets/{id}"]
        );
    }

    #[test]
    fn test_dangling_references_are_removed() {
        let mut document = store();
        let pet_operation = document.paths["/pets/{id}"]
            .operations
            .get_mut(&HttpMethod::Get)
            .unwrap();
        pet_operation.request_body = Some(RefOr::Ref(Reference::local(ComponentKey::new(
            ComponentKind::RequestBody,
            "Ghost",
        ))));
        pet_operation.security = Some(vec![[("oauth".to_string(), vec![])]
            .into_iter()
            .collect()]);
        document.components.schemas["Pet"]
            .as_item_mut()
            .unwrap()
            .properties
            .insert("toy".to_string(), schema_ref("Toy"));
        // an alias of a missing component is itself dangling
        document
            .components
            .schemas
            .insert("Toy".to_string(), schema_ref("Plaything"));

        let result = filter(&document, FilterCriteria::by_operation_ids(["getPet"]));
        let pointers: Vec<&str> = result
            .diagnostics
            .of_kind(DiagnosticKind::DanglingReference)
            .map(|d| d.pointer.as_str())
            .collect();
        assert_eq!(
            pointers,
            vec![
                "#/components/schemas/Toy",
                "#/paths/~1pets~1{id}/get/requestBody",
                "#/paths/~1pets~1{id}/get/security/0/oauth",
                "#/components/schemas/Pet/properties/toy",
            ]
        );

        let operation = result.document.paths["/pets/{id}"]
            .operation(HttpMethod::Get)
            .unwrap();
        assert!(operation.request_body.is_none());
        assert_eq!(operation.security, Some(vec![]));
        let pet = result.document.components.schemas["Pet"].as_item().unwrap();
        assert!(!pet.properties.contains_key("toy"));
    }

    #[test]
    fn test_unused_security_schemes_are_dropped() {
        let mut document = store();
        document
            .security
            .push([("apiKey".to_string(), vec![])].into_iter().collect());
        for name in ["apiKey", "basic"] {
            document
                .components
                .security_schemes
                .insert(name.to_string(), RefOr::Item(SecurityScheme::default()));
        }
        let result = filter(&document, FilterCriteria::by_operation_ids(["listOrders"]));
        assert_eq!(
            result.document.components.names(ComponentKind::SecurityScheme),
            vec!["apiKey"]
        );
        assert_eq!(result.document.security.len(), 1);
    }
}
