//! OpenAPI 3.1 grammar, the 3.0 grammar with JSON Schema 2020-12 keywords

use super::fields::{load_list, load_named, load_ref_or, Grammar};
use super::v3;
use super::ParsingContext;
use crate::node::{Node, ParseNode};
use oaslice_common::{DiagnosticKind, PathItem, Schema};
use serde_json::Number;
use std::sync::LazyLock;

static GRAMMAR: LazyLock<Grammar> = LazyLock::new(build);

pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}

fn build() -> Grammar {
    let mut grammar = v3::build();

    grammar.document = grammar
        .document
        .fixed("jsonSchemaDialect", |o, n, ctx| {
            o.json_schema_dialect = n.as_string(ctx)
        })
        .fixed("webhooks", |o, n, ctx| {
            o.webhooks = load_named(&n, ctx, load_ref_or::<PathItem>)
        });
    grammar.info = grammar
        .info
        .fixed("summary", |o, n, ctx| o.summary = n.as_string(ctx));
    grammar.license = grammar
        .license
        .fixed("identifier", |o, n, ctx| o.identifier = n.as_string(ctx));
    grammar.components = grammar.components.fixed("pathItems", |o, n, ctx| {
        o.path_items = load_named(&n, ctx, load_ref_or::<PathItem>)
    });
    grammar.schema = grammar
        .schema
        .without("nullable")
        .fixed("type", read_type)
        .fixed("maximum", |o, n, ctx| {
            if !o.exclusive_maximum {
                o.maximum = n.as_number(ctx);
            }
        })
        .fixed("minimum", |o, n, ctx| {
            if !o.exclusive_minimum {
                o.minimum = n.as_number(ctx);
            }
        })
        .fixed("exclusiveMaximum", |o, n, ctx| {
            if let Some((bound, exclusive)) = exclusive_bound(&n, ctx) {
                o.maximum = bound.or(o.maximum.take());
                o.exclusive_maximum = exclusive;
            }
        })
        .fixed("exclusiveMinimum", |o, n, ctx| {
            if let Some((bound, exclusive)) = exclusive_bound(&n, ctx) {
                o.minimum = bound.or(o.minimum.take());
                o.exclusive_minimum = exclusive;
            }
        })
        .fixed("const", |o, n, _| o.const_value = Some(n.to_value()))
        .fixed("examples", |o, n, ctx| {
            o.examples = load_list(&n, ctx, |value, _| Some(value.to_value()))
        });
    grammar.reference = grammar
        .reference
        .fixed("summary", |o, n, ctx| o.summary = n.as_string(ctx))
        .fixed("description", |o, n, ctx| o.description = n.as_string(ctx));

    grammar
}

/// `type` as a string or an array; `"null"` becomes the nullable flag
fn read_type(schema: &mut Schema, node: ParseNode<'_>, ctx: &mut ParsingContext) {
    let names = match node.node {
        Node::String(_) | Node::Sequence(_) => node.as_string_list(ctx),
        _ => {
            ctx.report(
                DiagnosticKind::TypeCoercion,
                &node.pointer,
                "type must be a string or an array of strings",
            );
            return;
        }
    };
    schema.types.clear();
    for name in names {
        if name == "null" {
            schema.nullable = true;
        } else if !schema.types.contains(&name) {
            schema.types.push(name);
        }
    }
}

/// Numeric form sets the bound; the legacy boolean form only the flag
fn exclusive_bound(node: &ParseNode<'_>, ctx: &mut ParsingContext) -> Option<(Option<Number>, bool)> {
    match node.node {
        Node::Bool(exclusive) => Some((None, *exclusive)),
        _ => node.as_number(ctx).map(|bound| (Some(bound), true)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::parse;
    use crate::openapi::fields::load;
    use oaslice_common::{Format, SpecVersion};

    fn parse_schema(json: &str) -> (Schema, ParsingContext) {
        let node = parse(json, Format::Json).unwrap();
        let mut ctx = ParsingContext::new(SpecVersion::V3_1);
        let schema = load::<Schema>(&ParseNode::root(&node), &mut ctx).unwrap();
        (schema, ctx)
    }

    #[test]
    fn test_type_array_with_null() {
        let (schema, ctx) = parse_schema(r#"{"type": ["string", "null"]}"#);
        assert_eq!(schema.types, vec!["string".to_string()]);
        assert!(schema.nullable);
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_numeric_exclusive_bounds() {
        let (schema, _) = parse_schema(r#"{"type": "integer", "exclusiveMinimum": 0, "minimum": 5}"#);
        assert_eq!(schema.minimum, Some(Number::from(0)));
        assert!(schema.exclusive_minimum);

        let (schema, _) = parse_schema(r#"{"maximum": 10, "exclusiveMaximum": 9}"#);
        assert_eq!(schema.maximum, Some(Number::from(9)));
        assert!(schema.exclusive_maximum);
    }

    #[test]
    fn test_nullable_is_unknown() {
        let (schema, ctx) = parse_schema(r#"{"type": "string", "nullable": true}"#);
        assert!(!schema.nullable);
        assert_eq!(ctx.diagnostics.count_of(DiagnosticKind::UnknownField), 1);
    }

    #[test]
    fn test_const_and_examples() {
        let (schema, _) = parse_schema(r#"{"const": "dog", "examples": ["dog", "cat"]}"#);
        assert_eq!(schema.const_value, Some(serde_json::json!("dog")));
        assert_eq!(schema.examples.len(), 2);
    }
}
