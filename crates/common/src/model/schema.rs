use super::{ExternalDocs, Extensions, RefOr};
use indexmap::IndexMap;
use serde_json::{Number, Value};

/// JSON Schema subset shared by every supported version
///
/// `types` never contains `"null"`; nullability is the `nullable` flag in
/// every version, and the writer expands it to the target's vocabulary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub title: Option<String>,
    pub types: Vec<String>,
    pub format: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub nullable: bool,
    pub read_only: bool,
    pub write_only: bool,
    pub deprecated: bool,

    pub multiple_of: Option<Number>,
    pub maximum: Option<Number>,
    pub exclusive_maximum: bool,
    pub minimum: Option<Number>,
    pub exclusive_minimum: bool,

    pub max_length: Option<u64>,
    pub min_length: Option<u64>,
    pub pattern: Option<String>,

    pub max_items: Option<u64>,
    pub min_items: Option<u64>,
    pub unique_items: bool,

    pub max_properties: Option<u64>,
    pub min_properties: Option<u64>,
    pub required: Vec<String>,

    pub enum_values: Vec<Value>,
    pub const_value: Option<Value>,

    pub properties: IndexMap<String, RefOr<Schema>>,
    pub additional_properties: Option<AdditionalProperties>,
    pub items: Option<Box<RefOr<Schema>>>,
    pub all_of: Vec<RefOr<Schema>>,
    pub any_of: Vec<RefOr<Schema>>,
    pub one_of: Vec<RefOr<Schema>>,
    pub not: Option<Box<RefOr<Schema>>>,

    pub discriminator: Option<Discriminator>,
    pub xml: Option<Xml>,
    pub external_docs: Option<ExternalDocs>,
    pub example: Option<Value>,
    pub examples: Vec<Value>,
    pub extensions: Extensions,
}

impl Schema {
    /// Schema with a single `type`
    pub fn of_type(type_name: &str) -> Self {
        Self {
            types: vec![type_name.to_string()],
            ..Default::default()
        }
    }

    /// The single declared type, if exactly one is set
    pub fn single_type(&self) -> Option<&str> {
        match self.types.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    /// Direct child schema slots in walk order
    pub fn children(&self) -> impl Iterator<Item = &RefOr<Schema>> {
        let additional = match &self.additional_properties {
            Some(AdditionalProperties::Schema(schema)) => Some(schema.as_ref()),
            _ => None,
        };
        self.properties
            .values()
            .chain(additional)
            .chain(self.items.as_deref())
            .chain(self.all_of.iter())
            .chain(self.any_of.iter())
            .chain(self.one_of.iter())
            .chain(self.not.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<RefOr<Schema>>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Discriminator {
    pub property_name: String,
    pub mapping: IndexMap<String, String>,
    pub extensions: Extensions,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Xml {
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub attribute: bool,
    pub wrapped: bool,
    pub extensions: Extensions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentKey, ComponentKind, Reference};

    #[test]
    fn test_children_order() {
        let mut schema = Schema::of_type("object");
        schema
            .properties
            .insert("name".to_string(), RefOr::Item(Schema::of_type("string")));
        schema.items = Some(Box::new(RefOr::Item(Schema::of_type("integer"))));
        schema.all_of.push(RefOr::Ref(Reference::local(ComponentKey::new(
            ComponentKind::Schema,
            "Base",
        ))));

        let kinds: Vec<String> = schema
            .children()
            .map(|child| match child {
                RefOr::Item(s) => s.types.join(","),
                RefOr::Ref(r) => r.pointer.clone(),
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["string", "integer", "#/components/schemas/Base"]
        );
    }

    #[test]
    fn test_single_type() {
        assert_eq!(Schema::of_type("string").single_type(), Some("string"));
        let mut schema = Schema::default();
        assert_eq!(schema.single_type(), None);
        schema.types = vec!["string".to_string(), "integer".to_string()];
        assert_eq!(schema.single_type(), None);
    }
}
