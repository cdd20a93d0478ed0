//! Reference output policy

use crate::emitter::Emitter;
use crate::object::Object;
use oaslice_common::{Component, ComponentKey, RefOr, Reference, ReferenceTarget, SpecVersion};
use serde_json::Value;
use tracing::trace;

impl<'d> Emitter<'d> {
    /// Emit a `$ref` or inline value according to the reference policy
    pub fn ref_or<T: Component>(&mut self, node: &RefOr<T>, emit: fn(&mut Self, &T) -> Value) -> Value {
        match node {
            RefOr::Item(item) => emit(self, item),
            RefOr::Ref(reference) => self.reference::<T>(reference, emit),
        }
    }

    fn reference<T: Component>(&mut self, reference: &Reference, emit: fn(&mut Self, &T) -> Value) -> Value {
        let Some(target) = reference.target() else {
            return self.literal_ref(reference);
        };
        let (locator, key) = match target {
            ReferenceTarget::Local(key) => (self.scope.clone(), key.clone()),
            ReferenceTarget::External { locator, key } => (Some(locator.clone()), key.clone()),
        };
        let inline = match locator {
            None => self.inline_local,
            Some(_) => self.inline_external,
        };
        let identity = (locator.clone(), key.clone());

        if inline && !self.in_progress.contains(&identity) {
            let document = self.document;
            let scope = self.scope.clone();
            if let Some(resolved) = document.resolve_scoped::<T>(scope.as_deref(), reference) {
                trace!(target = %key, "inlining reference");
                let previous = std::mem::replace(&mut self.scope, resolved.scope.map(str::to_string));
                self.in_progress.push(identity);
                let value = emit(self, resolved.value);
                self.in_progress.pop();
                self.scope = previous;
                return value;
            }
        }
        self.pointer_ref(reference, locator.as_deref(), &key)
    }

    /// `$ref` rewritten into the target version's pointer vocabulary
    fn pointer_ref(&mut self, reference: &Reference, locator: Option<&str>, key: &ComponentKey) -> Value {
        let fragment = match self.target {
            SpecVersion::V2_0 => key.v2_pointer(),
            SpecVersion::V3_0 | SpecVersion::V3_1 => Some(key.pointer()),
        };
        let Some(fragment) = fragment else {
            self.not_representable(&format!("reference to {} '{}'", key.kind.label(), key.name));
            return self.literal_ref(reference);
        };

        let pointer = match locator {
            None => fragment,
            // keep the locator as written when the reference sits in the root
            Some(_) if self.scope.is_none() && reference.is_external() => {
                format!("{}{}", reference.locator().unwrap_or_default(), fragment)
            }
            Some(locator) => format!("{}{}", locator, fragment),
        };
        self.ref_object(&pointer, reference)
    }

    fn literal_ref(&mut self, reference: &Reference) -> Value {
        let pointer = reference.pointer.clone();
        self.ref_object(&pointer, reference)
    }

    fn ref_object(&mut self, pointer: &str, reference: &Reference) -> Value {
        let mut object = Object::new();
        object.set("$ref", pointer);
        if self.is_v31() {
            object.string("summary", &reference.summary);
            object.string("description", &reference.description);
        } else if reference.summary.is_some() || reference.description.is_some() {
            self.not_representable("summary or description next to $ref");
        }
        object.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{OpenApiWriter, WriterSettings};
    use oaslice_common::{
        ComponentKey, ComponentKind, Document, RefOr, Reference, ReferenceTarget, Schema,
        SpecVersion,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema_ref(name: &str) -> RefOr<Schema> {
        RefOr::Ref(Reference::local(ComponentKey::new(ComponentKind::Schema, name)))
    }

    /// `Node.next -> Node` plus `Wrapper.node -> Node`
    fn cyclic() -> Document {
        let mut node = Schema::of_type("object");
        node.properties.insert("next".to_string(), schema_ref("Node"));
        let mut wrapper = Schema::of_type("object");
        wrapper.properties.insert("node".to_string(), schema_ref("Node"));

        let mut document = Document {
            spec_version: SpecVersion::V3_0,
            ..Default::default()
        };
        document.components.schemas.insert("Node".to_string(), RefOr::Item(node));
        document
            .components
            .schemas
            .insert("Wrapper".to_string(), RefOr::Item(wrapper));
        document
    }

    #[test]
    fn test_refs_follow_target_version() {
        let document = cyclic();
        let v3 = OpenApiWriter::new(WriterSettings::default()).write_value(&document).0;
        assert_eq!(
            v3["components"]["schemas"]["Wrapper"]["properties"]["node"],
            json!({"$ref": "#/components/schemas/Node"})
        );

        let v2 = OpenApiWriter::new(WriterSettings {
            version: Some(SpecVersion::V2_0),
            ..Default::default()
        })
        .write_value(&document)
        .0;
        assert_eq!(
            v2["definitions"]["Wrapper"]["properties"]["node"],
            json!({"$ref": "#/definitions/Node"})
        );
    }

    #[test]
    fn test_inline_local_breaks_cycles() {
        let document = cyclic();
        let (value, diagnostics) = OpenApiWriter::new(WriterSettings {
            inline_local: true,
            ..Default::default()
        })
        .write_value(&document);

        assert!(diagnostics.is_empty());
        assert_eq!(
            value["components"]["schemas"]["Node"]["properties"]["next"],
            json!({"$ref": "#/components/schemas/Node"})
        );
        assert_eq!(
            value["components"]["schemas"]["Wrapper"]["properties"]["node"],
            json!({
                "type": "object",
                "properties": {"next": {"$ref": "#/components/schemas/Node"}}
            })
        );
    }

    #[test]
    fn test_unresolved_reference_is_literal() {
        let mut document = cyclic();
        document.components.schemas.insert(
            "Broken".to_string(),
            RefOr::Ref(Reference::new(
                "#/components/schemas/DoesNotExist",
                ComponentKind::Schema,
            )),
        );
        let value = OpenApiWriter::new(WriterSettings {
            inline_local: true,
            ..Default::default()
        })
        .write_value(&document)
        .0;
        assert_eq!(
            value["components"]["schemas"]["Broken"],
            json!({"$ref": "#/components/schemas/DoesNotExist"})
        );
    }

    #[test]
    fn test_external_reference_policy() {
        let mut common = Document::default();
        common
            .components
            .schemas
            .insert("Error".to_string(), RefOr::Item(Schema::of_type("string")));

        let mut reference = Reference::new("common.yaml#/definitions/Error", ComponentKind::Schema);
        reference.bind(ReferenceTarget::External {
            locator: "/specs/common.yaml".to_string(),
            key: ComponentKey::new(ComponentKind::Schema, "Error"),
        });

        let mut document = cyclic();
        document
            .components
            .schemas
            .insert("Failure".to_string(), RefOr::Ref(reference));
        document.external.insert("/specs/common.yaml".to_string(), common);

        let by_ref = OpenApiWriter::new(WriterSettings::default()).write_value(&document).0;
        assert_eq!(
            by_ref["components"]["schemas"]["Failure"],
            json!({"$ref": "common.yaml#/components/schemas/Error"})
        );

        let inlined = OpenApiWriter::new(WriterSettings {
            inline_external: true,
            ..Default::default()
        })
        .write_value(&document)
        .0;
        assert_eq!(inlined["components"]["schemas"]["Failure"], json!({"type": "string"}));
    }
}
