//! Component reachability
//!
//! The closure is computed over [`ComponentKey`] identities: every key is
//! expanded at most once, so shared and cyclic components cost one walk each.

use oaslice_common::{
    fragment_key, ComponentKey, ComponentKind, Document, Reference, Schema, SecurityRequirement,
    Visitor, Walk, WalkContext, Walker,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Collects the component keys a subtree refers to
#[derive(Debug, Default)]
struct ReferenceCollector {
    found: Vec<ComponentKey>,
}

impl ReferenceCollector {
    fn requirements(&mut self, requirements: &[SecurityRequirement]) {
        for requirement in requirements {
            self.found.extend(
                requirement
                    .keys()
                    .map(|name| ComponentKey::new(ComponentKind::SecurityScheme, name.as_str())),
            );
        }
    }
}

impl Visitor for ReferenceCollector {
    fn enter_security_requirement(
        &mut self,
        requirement: &mut SecurityRequirement,
        _ctx: &WalkContext,
    ) -> Walk {
        self.requirements(std::slice::from_ref(requirement));
        Walk::Continue
    }

    fn enter_schema(&mut self, schema: &mut Schema, _ctx: &WalkContext) -> Walk {
        // discriminator mappings name schemas by pointer, outside `$ref`
        if let Some(discriminator) = &schema.discriminator {
            for target in discriminator.mapping.values() {
                if let Some(fragment) = target.strip_prefix('#') {
                    if let Ok(key) = fragment_key(fragment, ComponentKind::Schema) {
                        self.found.push(key);
                    }
                }
            }
        }
        Walk::Continue
    }

    fn visit_reference(&mut self, reference: &mut Reference, _ctx: &WalkContext) -> Walk {
        if let Some(key) = reference.local_key() {
            self.found.push(key.clone());
        }
        Walk::Continue
    }
}

/// Components transitively reachable from the document's paths
///
/// Seeds are the references and security requirements of every path item
/// and operation; the document-level requirements count when at least one
/// operation inherits them. Keys that name no registered component are left
/// out.
pub fn reachable(document: &Document) -> BTreeSet<ComponentKey> {
    let mut collector = ReferenceCollector::default();
    {
        let mut walker = Walker::new(&mut collector);
        for item in document.paths.values() {
            walker.walk_path_item(&mut item.clone());
        }
    }
    if document
        .operations()
        .any(|(_, _, operation)| operation.security.is_none())
    {
        collector.requirements(&document.security);
    }

    // the walker needs `&mut`; walk a scratch copy
    let mut components = document.components.clone();
    let mut closure = BTreeSet::new();
    let mut pending = std::mem::take(&mut collector.found);
    while let Some(key) = pending.pop() {
        if !document.components.contains(&key) || closure.contains(&key) {
            continue;
        }
        Walker::new(&mut collector).walk_component(&mut components, &key);
        pending.append(&mut collector.found);
        closure.insert(key);
    }

    debug!(components = closure.len(), "computed component closure");
    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use oaslice_common::{
        Discriminator, HttpMethod, MediaType, Operation, PathItem, RefOr, Response,
        SecurityScheme,
    };

    fn schema_ref(name: &str) -> RefOr<Schema> {
        RefOr::Ref(Reference::local(ComponentKey::new(ComponentKind::Schema, name)))
    }

    fn key(name: &str) -> ComponentKey {
        ComponentKey::new(ComponentKind::Schema, name)
    }

    fn returning(schema: RefOr<Schema>) -> Operation {
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
        let mut operation = Operation::default();
        operation
            .responses
            .insert("200".to_string(), RefOr::Item(response));
        operation
    }

    fn document(operation: Operation) -> Document {
        let mut item = PathItem::default();
        item.operations.insert(HttpMethod::Get, operation);
        let mut document = Document::default();
        document.paths.insert("/things".to_string(), item);
        document
    }

    #[test]
    fn test_transitive_and_cyclic_references() {
        let mut document = document(returning(schema_ref("Pet")));
        let mut pet = Schema::of_type("object");
        pet.properties.insert("owner".to_string(), schema_ref("Owner"));
        let mut owner = Schema::of_type("object");
        owner.properties.insert("pets".to_string(), schema_ref("Pet"));
        let components = &mut document.components.schemas;
        components.insert("Pet".to_string(), RefOr::Item(pet));
        components.insert("Owner".to_string(), RefOr::Item(owner));
        components.insert("Order".to_string(), RefOr::Item(Schema::of_type("object")));

        let closure = reachable(&document);
        assert_eq!(closure, BTreeSet::from([key("Pet"), key("Owner")]));
    }

    #[test]
    fn test_missing_targets_are_excluded() {
        let document = document(returning(schema_ref("Ghost")));
        assert!(reachable(&document).is_empty());
    }

    #[test]
    fn test_discriminator_mapping_is_followed() {
        let mut animal = Schema::of_type("object");
        animal.discriminator = Some(Discriminator {
            property_name: "kind".to_string(),
            mapping: [("dog".to_string(), "#/components/schemas/Dog".to_string())]
                .into_iter()
                .collect(),
            ..Default::default()
        });
        let mut document = document(returning(schema_ref("Animal")));
        let schemas = &mut document.components.schemas;
        schemas.insert("Animal".to_string(), RefOr::Item(animal));
        schemas.insert("Dog".to_string(), RefOr::Item(Schema::of_type("object")));

        let closure = reachable(&document);
        assert!(closure.contains(&key("Dog")));
    }

    #[test]
    fn test_inherited_security_requirements() {
        let mut document = document(returning(RefOr::Item(Schema::of_type("string"))));
        document
            .security
            .push([("apiKey".to_string(), vec![])].into_iter().collect());
        for name in ["apiKey", "oauth"] {
            document
                .components
                .security_schemes
                .insert(name.to_string(), RefOr::Item(SecurityScheme::default()));
        }

        let closure = reachable(&document);
        assert_eq!(
            closure,
            BTreeSet::from([ComponentKey::new(ComponentKind::SecurityScheme, "apiKey")])
        );

        // an explicit opt-out stops the inheritance
        document.paths["/things"]
            .operations
            .get_mut(&HttpMethod::Get)
            .unwrap()
            .security = Some(vec![]);
        assert!(reachable(&document).is_empty());
    }

    #[test]
    fn test_operation_security_requirements_seed_the_closure() {
        let mut operation = returning(RefOr::Item(Schema::of_type("string")));
        operation.security = Some(vec![[("oauth".to_string(), vec!["read".to_string()])]
            .into_iter()
            .collect()]);
        let mut document = document(operation);
        for name in ["apiKey", "oauth"] {
            document
                .components
                .security_schemes
                .insert(name.to_string(), RefOr::Item(SecurityScheme::default()));
        }
        let before = document.clone();

        let closure = reachable(&document);
        assert_eq!(
            closure,
            BTreeSet::from([ComponentKey::new(ComponentKind::SecurityScheme, "oauth")])
        );
        assert_eq!(document, before);
    }
}
