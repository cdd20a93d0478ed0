//! Shared emission state and the objects every version writes alike

use crate::object::{object_of, Object};
use crate::WriterSettings;
use oaslice_common::{
    escape_segment, AdditionalProperties, ComponentKey, Contact, DiagnosticKind, Diagnostics,
    Document, Example, ExternalDocs, Info, License, RefOr, Schema, SecurityRequirement, Server,
    SpecVersion, Tag,
};
use serde_json::Value;

/// One write pass over a document
pub(crate) struct Emitter<'d> {
    pub(crate) document: &'d Document,
    pub(crate) target: SpecVersion,
    pub(crate) inline_local: bool,
    pub(crate) inline_external: bool,
    /// Locator of the document whose content is being emitted
    pub(crate) scope: Option<String>,
    /// Component identities currently being inlined
    pub(crate) in_progress: Vec<(Option<String>, ComponentKey)>,
    segments: Vec<String>,
    diagnostics: Diagnostics,
}

impl<'d> Emitter<'d> {
    pub fn new(document: &'d Document, target: SpecVersion, settings: &WriterSettings) -> Self {
        Self {
            document,
            target,
            inline_local: settings.inline_local,
            inline_external: settings.inline_external,
            scope: None,
            in_progress: Vec::new(),
            segments: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Run `f` one segment deeper in the output document
    pub fn at<R>(&mut self, segment: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.segments.push(segment.to_string());
        let result = f(self);
        self.segments.pop();
        result
    }

    pub fn pointer(&self) -> String {
        let mut pointer = String::from("#");
        for segment in &self.segments {
            pointer.push('/');
            pointer.push_str(&escape_segment(segment));
        }
        pointer
    }

    /// Report content dropped because the target cannot express it
    pub fn not_representable(&mut self, what: &str) {
        let pointer = self.pointer();
        self.diagnostics.report(
            DiagnosticKind::NotRepresentable,
            pointer,
            format!("{} cannot be written as OpenAPI {}; dropped", what, self.target),
        );
    }

    pub fn is_v31(&self) -> bool {
        self.target == SpecVersion::V3_1
    }

    pub fn info(&mut self, info: &Info) -> Value {
        let mut object = Object::new();
        object.set("title", info.title.as_str());
        if self.is_v31() {
            object.string("summary", &info.summary);
        } else if info.summary.is_some() {
            self.at("info", |e| e.not_representable("info summary"));
        }
        object.string("description", &info.description);
        object.string("termsOfService", &info.terms_of_service);
        if let Some(contact) = &info.contact {
            object.set("contact", contact_value(contact));
        }
        if let Some(license) = &info.license {
            let value = self.at("info", |e| e.license(license));
            object.set("license", value);
        }
        object.set("version", info.version.as_str());
        object.extensions(&info.extensions);
        object.finish()
    }

    fn license(&mut self, license: &License) -> Value {
        let mut object = Object::new();
        object.set("name", license.name.as_str());
        if self.is_v31() {
            object.string("identifier", &license.identifier);
        } else if license.identifier.is_some() {
            self.at("license", |e| e.not_representable("license identifier"));
        }
        object.string("url", &license.url);
        object.extensions(&license.extensions);
        object.finish()
    }

    pub fn servers(&mut self, servers: &[Server]) -> Value {
        Value::Array(servers.iter().map(server_value).collect())
    }

    pub fn tags(&self, tags: &[Tag]) -> Value {
        Value::Array(
            tags.iter()
                .map(|tag| {
                    let mut object = Object::new();
                    object.set("name", tag.name.as_str());
                    object.string("description", &tag.description);
                    if let Some(docs) = &tag.external_docs {
                        object.set("externalDocs", external_docs_value(docs));
                    }
                    object.extensions(&tag.extensions);
                    object.finish()
                })
                .collect(),
        )
    }

    pub fn security(&self, requirements: &[SecurityRequirement]) -> Value {
        Value::Array(requirements.iter().map(requirement_value).collect())
    }

    pub fn example(&mut self, example: &Example) -> Value {
        let mut object = Object::new();
        object.string("summary", &example.summary);
        object.string("description", &example.description);
        object.opt("value", example.value.clone());
        object.string("externalValue", &example.external_value);
        object.extensions(&example.extensions);
        object.finish()
    }

    pub fn schema_ref(&mut self, schema: &RefOr<Schema>) -> Value {
        self.ref_or(schema, Self::schema)
    }

    fn schema_list(&mut self, key: &str, schemas: &[RefOr<Schema>]) -> Value {
        self.at(key, |e| {
            Value::Array(
                schemas
                    .iter()
                    .enumerate()
                    .map(|(index, schema)| e.at(&index.to_string(), |e| e.schema_ref(schema)))
                    .collect(),
            )
        })
    }

    /// Schema in the target version's vocabulary
    pub fn schema(&mut self, schema: &Schema) -> Value {
        let mut object = Object::new();
        object.string("title", &schema.title);
        self.schema_type(&mut object, schema);
        object.string("format", &schema.format);
        object.string("description", &schema.description);
        object.opt("default", schema.default.clone());
        match self.target {
            SpecVersion::V3_0 => object.flag("nullable", schema.nullable),
            SpecVersion::V2_0 => object.flag("x-nullable", schema.nullable),
            SpecVersion::V3_1 => {}
        }
        object.flag("readOnly", schema.read_only);
        if self.target.is_v2() {
            if schema.write_only {
                self.not_representable("writeOnly");
            }
            if schema.deprecated {
                self.not_representable("schema deprecated flag");
            }
        } else {
            object.flag("writeOnly", schema.write_only);
            object.flag("deprecated", schema.deprecated);
        }

        object.opt("multipleOf", schema.multiple_of.clone());
        self.bounds(&mut object, schema);
        object.opt("maxLength", schema.max_length);
        object.opt("minLength", schema.min_length);
        object.string("pattern", &schema.pattern);
        object.opt("maxItems", schema.max_items);
        object.opt("minItems", schema.min_items);
        object.flag("uniqueItems", schema.unique_items);
        object.opt("maxProperties", schema.max_properties);
        object.opt("minProperties", schema.min_properties);
        object.strings("required", &schema.required);
        self.enum_and_const(&mut object, schema);

        if !schema.properties.is_empty() {
            let properties = self.at("properties", |e| {
                let entries: Vec<(&String, Value)> = schema
                    .properties
                    .iter()
                    .map(|(name, property)| (name, e.at(name, |e| e.schema_ref(property))))
                    .collect();
                object_of(entries)
            });
            object.set("properties", properties);
        }
        match &schema.additional_properties {
            Some(AdditionalProperties::Allowed(allowed)) => {
                object.set("additionalProperties", *allowed)
            }
            Some(AdditionalProperties::Schema(additional)) => {
                let value = self.at("additionalProperties", |e| e.schema_ref(additional));
                object.set("additionalProperties", value);
            }
            None => {}
        }
        if let Some(items) = &schema.items {
            let value = self.at("items", |e| e.schema_ref(items));
            object.set("items", value);
        }
        if !schema.all_of.is_empty() {
            let value = self.schema_list("allOf", &schema.all_of);
            object.set("allOf", value);
        }
        if self.target.is_v2() {
            if !schema.any_of.is_empty() {
                self.not_representable("anyOf");
            }
            if !schema.one_of.is_empty() {
                self.not_representable("oneOf");
            }
            if schema.not.is_some() {
                self.not_representable("not");
            }
        } else {
            if !schema.any_of.is_empty() {
                let value = self.schema_list("anyOf", &schema.any_of);
                object.set("anyOf", value);
            }
            if !schema.one_of.is_empty() {
                let value = self.schema_list("oneOf", &schema.one_of);
                object.set("oneOf", value);
            }
            if let Some(not) = &schema.not {
                let value = self.at("not", |e| e.schema_ref(not));
                object.set("not", value);
            }
        }

        if let Some(discriminator) = &schema.discriminator {
            if self.target.is_v2() {
                object.set("discriminator", discriminator.property_name.as_str());
            } else {
                let mut value = Object::new();
                value.set("propertyName", discriminator.property_name.as_str());
                if !discriminator.mapping.is_empty() {
                    value.set(
                        "mapping",
                        object_of(
                            discriminator
                                .mapping
                                .iter()
                                .map(|(k, v)| (k, Value::from(v.as_str()))),
                        ),
                    );
                }
                value.extensions(&discriminator.extensions);
                object.set("discriminator", value.finish());
            }
        }
        if let Some(xml) = &schema.xml {
            let mut value = Object::new();
            value.string("name", &xml.name);
            value.string("namespace", &xml.namespace);
            value.string("prefix", &xml.prefix);
            value.flag("attribute", xml.attribute);
            value.flag("wrapped", xml.wrapped);
            value.extensions(&xml.extensions);
            object.set("xml", value.finish());
        }
        if let Some(docs) = &schema.external_docs {
            object.set("externalDocs", external_docs_value(docs));
        }
        self.schema_examples(&mut object, schema);
        object.extensions(&schema.extensions);
        object.finish()
    }

    fn schema_type(&mut self, object: &mut Object, schema: &Schema) {
        match (self.target, schema.types.as_slice()) {
            (_, []) => {}
            (SpecVersion::V3_1, [only]) if !schema.nullable => object.set("type", only.as_str()),
            (SpecVersion::V3_1, types) => {
                let mut types = types.to_vec();
                if schema.nullable {
                    types.push("null".to_string());
                }
                object.set("type", types);
            }
            (_, [only]) => object.set("type", only.as_str()),
            (_, [first, ..]) => {
                self.not_representable("type array");
                object.set("type", first.as_str());
            }
        }
    }

    fn bounds(&mut self, object: &mut Object, schema: &Schema) {
        if self.is_v31() {
            match (&schema.maximum, schema.exclusive_maximum) {
                (Some(maximum), true) => object.set("exclusiveMaximum", maximum.clone()),
                (Some(maximum), false) => object.set("maximum", maximum.clone()),
                (None, _) => {}
            }
            match (&schema.minimum, schema.exclusive_minimum) {
                (Some(minimum), true) => object.set("exclusiveMinimum", minimum.clone()),
                (Some(minimum), false) => object.set("minimum", minimum.clone()),
                (None, _) => {}
            }
        } else {
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
        }
    }

    fn enum_and_const(&mut self, object: &mut Object, schema: &Schema) {
        object.non_empty("enum", Value::Array(schema.enum_values.clone()));
        let Some(constant) = &schema.const_value else {
            return;
        };
        if self.is_v31() {
            object.set("const", constant.clone());
        } else if schema.enum_values.is_empty() {
            object.set("enum", vec![constant.clone()]);
        } else {
            self.not_representable("const next to enum");
        }
    }

    fn schema_examples(&mut self, object: &mut Object, schema: &Schema) {
        if self.is_v31() {
            object.opt("example", schema.example.clone());
            object.non_empty("examples", Value::Array(schema.examples.clone()));
            return;
        }
        let mut examples = schema.examples.iter();
        match &schema.example {
            Some(example) => object.set("example", example.clone()),
            None => object.opt("example", examples.next().cloned()),
        }
        if examples.next().is_some() {
            self.not_representable("schema examples list");
        }
    }
}

pub(crate) fn external_docs_value(docs: &ExternalDocs) -> Value {
    let mut object = Object::new();
    object.string("description", &docs.description);
    object.set("url", docs.url.as_str());
    object.extensions(&docs.extensions);
    object.finish()
}

fn contact_value(contact: &Contact) -> Value {
    let mut object = Object::new();
    object.string("name", &contact.name);
    object.string("url", &contact.url);
    object.string("email", &contact.email);
    object.extensions(&contact.extensions);
    object.finish()
}

pub(crate) fn server_value(server: &Server) -> Value {
    let mut object = Object::new();
    object.set("url", server.url.as_str());
    object.string("description", &server.description);
    if !server.variables.is_empty() {
        let variables = server.variables.iter().map(|(name, variable)| {
            let mut value = Object::new();
            value.strings("enum", &variable.enum_values);
            value.set("default", variable.default.as_str());
            value.string("description", &variable.description);
            value.extensions(&variable.extensions);
            (name, value.finish())
        });
        object.set("variables", object_of(variables));
    }
    object.extensions(&server.extensions);
    object.finish()
}

pub(crate) fn requirement_value(requirement: &SecurityRequirement) -> Value {
    object_of(
        requirement
            .iter()
            .map(|(name, scopes)| (name, Value::from(scopes.clone()))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Number};

    fn emit(schema: &Schema, target: SpecVersion) -> (Value, Diagnostics) {
        let document = Document::default();
        let mut emitter = Emitter::new(&document, target, &WriterSettings::default());
        let value = emitter.schema(schema);
        (value, emitter.into_diagnostics())
    }

    fn bounded() -> Schema {
        Schema {
            nullable: true,
            maximum: Some(Number::from(10)),
            exclusive_maximum: true,
            minimum: Some(Number::from(0)),
            const_value: Some(json!(5)),
            ..Schema::of_type("integer")
        }
    }

    #[test]
    fn test_schema_as_v30() {
        let (value, diagnostics) = emit(&bounded(), SpecVersion::V3_0);
        assert_eq!(
            value,
            json!({
                "type": "integer",
                "nullable": true,
                "maximum": 10,
                "exclusiveMaximum": true,
                "minimum": 0,
                "enum": [5]
            })
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_schema_as_v31() {
        let (value, diagnostics) = emit(&bounded(), SpecVersion::V3_1);
        assert_eq!(
            value,
            json!({
                "type": ["integer", "null"],
                "exclusiveMaximum": 10,
                "minimum": 0,
                "const": 5
            })
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_schema_as_v2() {
        let mut schema = bounded();
        schema.one_of.push(RefOr::Item(Schema::of_type("string")));
        let (value, diagnostics) = emit(&schema, SpecVersion::V2_0);
        assert_eq!(value["x-nullable"], json!(true));
        assert!(value.get("oneOf").is_none());
        assert_eq!(diagnostics.count_of(DiagnosticKind::NotRepresentable), 1);
    }

    #[test]
    fn test_examples_collapse_before_v31() {
        let schema = Schema {
            examples: vec![json!("a"), json!("b")],
            ..Schema::of_type("string")
        };
        let (value, diagnostics) = emit(&schema, SpecVersion::V3_0);
        assert_eq!(value, json!({"type": "string", "example": "a"}));
        assert_eq!(diagnostics.len(), 1);

        let (value, _) = emit(&schema, SpecVersion::V3_1);
        assert_eq!(value["examples"], json!(["a", "b"]));
    }
}
