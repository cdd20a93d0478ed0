//! Document statistics

use oaslice_common::{
    Callback, ComponentKey, Document, Header, Link, Operation, Parameter, PathItem, Reference,
    RequestBody, Response, Schema, Visitor, Walk, WalkContext, Walker,
};
use std::collections::BTreeSet;
use std::fmt;

/// Node counts of one document
///
/// References are never followed, so a component shared by many operations
/// is counted once, where it is defined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub path_items: usize,
    pub operations: usize,
    pub parameters: usize,
    pub request_bodies: usize,
    pub responses: usize,
    pub headers: usize,
    pub links: usize,
    pub callbacks: usize,
    pub schemas: usize,
    /// Distinct local components named by at least one `$ref`
    pub referenced_components: usize,
}

impl Stats {
    /// Walk `document` and count its nodes
    pub fn of(document: &Document) -> Self {
        let mut visitor = StatsVisitor::default();
        Walker::new(&mut visitor).walk(&mut document.clone());
        visitor.stats()
    }

    /// Plain-text table, one row per count
    pub fn report(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Path Items", self.path_items),
            ("Operations", self.operations),
            ("Parameters", self.parameters),
            ("Request Bodies", self.request_bodies),
            ("Responses", self.responses),
            ("Headers", self.headers),
            ("Links", self.links),
            ("Callbacks", self.callbacks),
            ("Schemas", self.schemas),
            ("Referenced Components", self.referenced_components),
        ];
        for (label, count) in rows {
            writeln!(f, "{:<24}{:>8}", label, count)?;
        }
        Ok(())
    }
}

/// Counting visitor behind [`Stats`]
#[derive(Debug, Default)]
pub struct StatsVisitor {
    stats: Stats,
    referenced: BTreeSet<ComponentKey>,
}

impl StatsVisitor {
    pub fn stats(&self) -> Stats {
        Stats {
            referenced_components: self.referenced.len(),
            ..self.stats
        }
    }
}

impl Visitor for StatsVisitor {
    fn enter_path_item(&mut self, _item: &mut PathItem, _ctx: &WalkContext) -> Walk {
        self.stats.path_items += 1;
        Walk::Continue
    }

    fn enter_operation(&mut self, _operation: &mut Operation, _ctx: &WalkContext) -> Walk {
        self.stats.operations += 1;
        Walk::Continue
    }

    fn enter_parameter(&mut self, _parameter: &mut Parameter, _ctx: &WalkContext) -> Walk {
        self.stats.parameters += 1;
        Walk::Continue
    }

    fn enter_request_body(&mut self, _body: &mut RequestBody, _ctx: &WalkContext) -> Walk {
        self.stats.request_bodies += 1;
        Walk::Continue
    }

    fn enter_response(&mut self, _response: &mut Response, _ctx: &WalkContext) -> Walk {
        self.stats.responses += 1;
        Walk::Continue
    }

    fn enter_header(&mut self, _header: &mut Header, _ctx: &WalkContext) -> Walk {
        self.stats.headers += 1;
        Walk::Continue
    }

    fn enter_link(&mut self, _link: &mut Link, _ctx: &WalkContext) -> Walk {
        self.stats.links += 1;
        Walk::Continue
    }

    fn enter_callback(&mut self, _callback: &mut Callback, _ctx: &WalkContext) -> Walk {
        self.stats.callbacks += 1;
        Walk::Continue
    }

    fn enter_schema(&mut self, _schema: &mut Schema, _ctx: &WalkContext) -> Walk {
        self.stats.schemas += 1;
        Walk::Continue
    }

    fn visit_reference(&mut self, reference: &mut Reference, _ctx: &WalkContext) -> Walk {
        if let Some(key) = reference.local_key() {
            self.referenced.insert(key.clone());
        }
        Walk::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oaslice_common::{ComponentKind, HttpMethod, MediaType, RefOr};
    use pretty_assertions::assert_eq;

    fn schema_ref(name: &str) -> RefOr<Schema> {
        RefOr::Ref(Reference::local(ComponentKey::new(ComponentKind::Schema, name)))
    }

    fn ok_returning(schema: RefOr<Schema>) -> RefOr<Response> {
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
        RefOr::Item(response)
    }

    #[test]
    fn test_shared_component_is_counted_once() {
        let mut document = Document::default();
        let mut item = PathItem::default();
        for method in [HttpMethod::Get, HttpMethod::Put] {
            let mut operation = Operation::default();
            operation
                .responses
                .insert("200".to_string(), ok_returning(schema_ref("Pet")));
            item.operations.insert(method, operation);
        }
        item.parameters.push(RefOr::Item(Parameter {
            name: "id".to_string(),
            schema: Some(RefOr::Item(Schema::of_type("string"))),
            ..Default::default()
        }));
        document.paths.insert("/pets/{id}".to_string(), item);

        let mut pet = Schema::of_type("object");
        pet.properties
            .insert("name".to_string(), RefOr::Item(Schema::of_type("string")));
        document
            .components
            .schemas
            .insert("Pet".to_string(), RefOr::Item(pet));

        let stats = Stats::of(&document);
        assert_eq!(
            stats,
            Stats {
                path_items: 1,
                operations: 2,
                parameters: 1,
                responses: 2,
                // parameter schema, Pet and Pet.name
                schemas: 3,
                referenced_components: 1,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_report_lists_every_count() {
        let stats = Stats {
            operations: 12,
            ..Default::default()
        };
        let report = stats.report();
        assert_eq!(report.lines().count(), 10);
        assert!(report
            .lines()
            .any(|line| line.starts_with("Operations") && line.ends_with("12")));
    }
}
