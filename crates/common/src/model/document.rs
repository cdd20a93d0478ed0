use super::{
    Component, ComponentKey, Components, Extensions, HttpMethod, Operation, PathItem, RefOr,
    Reference, ReferenceTarget, SecurityRequirement,
};
use crate::SpecVersion;
use indexmap::IndexMap;

/// Longest chain of component aliases (`Pet: {$ref: Animal}`) followed
const MAX_ALIAS_HOPS: usize = 32;

/// Root of one API description
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Version the document was read as
    pub spec_version: SpecVersion,
    pub info: Info,
    pub json_schema_dialect: Option<String>,
    pub servers: Vec<Server>,
    /// URI template → path item, unique keys in insertion order
    pub paths: IndexMap<String, PathItem>,
    /// `x-` keys of the paths object itself
    pub paths_extensions: Extensions,
    pub webhooks: IndexMap<String, RefOr<PathItem>>,
    pub components: Components,
    pub security: Vec<SecurityRequirement>,
    pub tags: Vec<Tag>,
    pub external_docs: Option<ExternalDocs>,
    pub extensions: Extensions,
    /// Documents loaded while resolving external references, by locator
    pub external: IndexMap<String, Document>,
}

/// A resolved component together with its identity
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<'a, T> {
    pub value: &'a T,
    pub key: ComponentKey,
    /// Locator of the document holding the value, `None` for the root
    pub scope: Option<&'a str>,
}

impl Document {
    /// Document a locator refers to; `None` is the root itself
    pub fn scope(&self, locator: Option<&str>) -> Option<&Document> {
        match locator {
            None => Some(self),
            Some(locator) => self.external.get(locator),
        }
    }

    /// Follow a bound reference made from the root document
    pub fn resolve<T: Component>(&self, reference: &Reference) -> Option<&T> {
        self.resolve_scoped(None, reference)
            .map(|resolved| resolved.value)
    }

    /// Follow a bound reference made from the document at `scope`
    ///
    /// Local targets are looked up in the scope document, external targets
    /// in the recorded external documents. Aliases are followed up to a
    /// fixed depth; alias loops resolve to `None`. The result borrows from
    /// `self` only.
    pub fn resolve_scoped<'a, T: Component>(
        &'a self,
        scope: Option<&str>,
        reference: &Reference,
    ) -> Option<Resolved<'a, T>> {
        let mut scope = self.locator(scope)?;
        let mut target = reference.target()?.clone();

        for _ in 0..MAX_ALIAS_HOPS {
            let (next_scope, key) = match &target {
                ReferenceTarget::Local(key) => (scope, key.clone()),
                ReferenceTarget::External { locator, key } => {
                    (self.locator(Some(locator.as_str()))?, key.clone())
                }
            };
            if key.kind != T::KIND {
                return None;
            }

            let document = self.scope(next_scope)?;
            match T::registry(&document.components).get(&key.name)? {
                RefOr::Item(value) => {
                    return Some(Resolved {
                        value,
                        key,
                        scope: next_scope,
                    })
                }
                RefOr::Ref(alias) => {
                    target = alias.target()?.clone();
                    scope = next_scope;
                }
            }
        }
        None
    }

    /// `locator` re-borrowed from the recorded external documents
    fn locator(&self, locator: Option<&str>) -> Option<Option<&str>> {
        match locator {
            None => Some(None),
            Some(locator) => self
                .external
                .get_key_value(locator)
                .map(|(key, _)| Some(key.as_str())),
        }
    }

    /// Every operation with its path template, in walk order
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
        self.paths.iter().flat_map(|(template, item)| {
            item.operations
                .iter()
                .map(move |(method, operation)| (template.as_str(), *method, operation))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Info {
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub terms_of_service: Option<String>,
    pub contact: Option<Contact>,
    pub license: Option<License>,
    pub version: String,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contact {
    pub name: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct License {
    pub name: String,
    pub identifier: Option<String>,
    pub url: Option<String>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
    pub variables: IndexMap<String, ServerVariable>,
    pub extensions: Extensions,
}

impl Server {
    /// URL with `{name}` variables replaced by their defaults
    pub fn expanded_url(&self) -> String {
        self.variables
            .iter()
            .fold(self.url.clone(), |url, (name, variable)| {
                url.replace(&format!("{{{}}}", name), &variable.default)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServerVariable {
    pub enum_values: Vec<String>,
    pub default: String,
    pub description: Option<String>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExternalDocs {
    pub description: Option<String>,
    pub url: String,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tag {
    pub name: String,
    pub description: Option<String>,
    pub external_docs: Option<ExternalDocs>,
    pub extensions: Extensions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentKind, Schema};

    fn schema_ref(name: &str) -> Reference {
        Reference::local(ComponentKey::new(ComponentKind::Schema, name))
    }

    #[test]
    fn test_resolve_follows_aliases() {
        let mut document = Document::default();
        document
            .components
            .schemas
            .insert("Animal".to_string(), RefOr::Item(Schema::of_type("object")));
        document
            .components
            .schemas
            .insert("Pet".to_string(), RefOr::Ref(schema_ref("Animal")));

        let pet = schema_ref("Pet");
        let resolved = document.resolve_scoped::<Schema>(None, &pet).unwrap();
        assert_eq!(resolved.key.name, "Animal");
        assert_eq!(resolved.value.single_type(), Some("object"));
    }

    #[test]
    fn test_resolved_value_outlives_the_reference() {
        let mut document = Document::default();
        document
            .components
            .schemas
            .insert("Pet".to_string(), RefOr::Item(Schema::of_type("object")));

        let resolved: Option<&Schema> = {
            let pet = schema_ref("Pet");
            document.resolve(&pet)
        };
        assert_eq!(resolved.and_then(Schema::single_type), Some("object"));
    }

    #[test]
    fn test_resolve_alias_loop_is_none() {
        let mut document = Document::default();
        document
            .components
            .schemas
            .insert("A".to_string(), RefOr::Ref(schema_ref("B")));
        document
            .components
            .schemas
            .insert("B".to_string(), RefOr::Ref(schema_ref("A")));

        assert!(document.resolve::<Schema>(&schema_ref("A")).is_none());
    }

    #[test]
    fn test_resolve_external_scope() {
        let mut common = Document::default();
        common
            .components
            .schemas
            .insert("Error".to_string(), RefOr::Item(Schema::of_type("object")));

        let mut document = Document::default();
        document.external.insert("common.yaml".to_string(), common);

        let mut reference = Reference::new(
            "common.yaml#/components/schemas/Error",
            ComponentKind::Schema,
        );
        reference.bind(ReferenceTarget::External {
            locator: "common.yaml".to_string(),
            key: ComponentKey::new(ComponentKind::Schema, "Error"),
        });

        let resolved = document
            .resolve_scoped::<Schema>(None, &reference)
            .unwrap();
        assert_eq!(resolved.scope, Some("common.yaml"));
    }

    #[test]
    fn test_unresolved_reference_resolves_to_none() {
        let document = Document::default();
        let reference = Reference::new("#/components/schemas/Pet", ComponentKind::Schema);
        assert!(document.resolve::<Schema>(&reference).is_none());
    }

    #[test]
    fn test_server_expanded_url() {
        let mut server = Server {
            url: "https://{region}.example.com/v1".to_string(),
            ..Default::default()
        };
        server.variables.insert(
            "region".to_string(),
            ServerVariable {
                default: "eu".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(server.expanded_url(), "https://eu.example.com/v1");
    }
}
