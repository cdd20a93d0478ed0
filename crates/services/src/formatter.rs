//! Operation id case formatting

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use indexmap::IndexMap;
use oaslice_common::{Document, Link, OpenApiError, Operation, Visitor, Walk, WalkContext, Walker};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Target case for rewritten identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierCase {
    /// `listPetsByOwner`
    Camel,
    /// `ListPetsByOwner`
    Pascal,
    /// `list_pets_by_owner`
    Snake,
    /// `list-pets-by-owner`
    Kebab,
}

impl IdentifierCase {
    pub fn apply(&self, identifier: &str) -> String {
        match self {
            IdentifierCase::Camel => identifier.to_lower_camel_case(),
            IdentifierCase::Pascal => identifier.to_upper_camel_case(),
            IdentifierCase::Snake => identifier.to_snake_case(),
            IdentifierCase::Kebab => identifier.to_kebab_case(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierCase::Camel => "camel",
            IdentifierCase::Pascal => "pascal",
            IdentifierCase::Snake => "snake",
            IdentifierCase::Kebab => "kebab",
        }
    }
}

impl fmt::Display for IdentifierCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierCase {
    type Err = OpenApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "camel" => Ok(IdentifierCase::Camel),
            "pascal" => Ok(IdentifierCase::Pascal),
            "snake" => Ok(IdentifierCase::Snake),
            "kebab" => Ok(IdentifierCase::Kebab),
            _ => Err(OpenApiError::Settings(format!(
                "unknown identifier case '{}' (expected camel, pascal, snake or kebab)",
                s
            ))),
        }
    }
}

/// Rewrites operation ids, and the link `operationId`s naming them, into
/// one case
#[derive(Debug)]
pub struct CaseFormatter {
    case: IdentifierCase,
    /// Original id → rewritten id, for ids that changed
    renamed: IndexMap<String, String>,
    /// Rewritten id → first original id producing it
    produced: IndexMap<String, String>,
}

impl CaseFormatter {
    pub fn new(case: IdentifierCase) -> Self {
        Self {
            case,
            renamed: IndexMap::new(),
            produced: IndexMap::new(),
        }
    }

    /// Rewrite every identifier of `document` in place
    pub fn format(mut self, document: &mut Document) -> IndexMap<String, String> {
        Walker::new(&mut self).walk(document);
        debug!(case = %self.case, renamed = self.renamed.len(), "formatted operation ids");
        self.renamed
    }

    fn rewrite(&mut self, identifier: &mut String) {
        let formatted = self.case.apply(identifier);
        if let Some(original) = self.produced.get(&formatted) {
            if original.as_str() != identifier.as_str() {
                warn!(
                    first = %original,
                    second = %identifier,
                    id = %formatted,
                    "operation ids collide after case formatting"
                );
            }
        } else {
            self.produced.insert(formatted.clone(), identifier.clone());
        }
        if formatted != *identifier {
            self.renamed.insert(identifier.clone(), formatted.clone());
            *identifier = formatted;
        }
    }
}

impl Visitor for CaseFormatter {
    fn enter_operation(&mut self, operation: &mut Operation, _ctx: &WalkContext) -> Walk {
        if let Some(id) = operation.operation_id.as_mut() {
            self.rewrite(id);
        }
        Walk::Continue
    }

    fn enter_link(&mut self, link: &mut Link, _ctx: &WalkContext) -> Walk {
        if let Some(id) = link.operation_id.as_mut() {
            let formatted = self.case.apply(id);
            if formatted != *id {
                *id = formatted;
            }
        }
        Walk::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oaslice_common::{HttpMethod, PathItem, RefOr, Response};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cases() {
        let id = "users.user.ListOwnedObjects";
        assert_eq!(IdentifierCase::Camel.apply(id), "usersUserListOwnedObjects");
        assert_eq!(IdentifierCase::Pascal.apply(id), "UsersUserListOwnedObjects");
        assert_eq!(IdentifierCase::Snake.apply(id), "users_user_list_owned_objects");
        assert_eq!(IdentifierCase::Kebab.apply(id), "users-user-list-owned-objects");
    }

    #[test]
    fn test_parse_case() {
        assert_eq!("Snake".parse::<IdentifierCase>().unwrap(), IdentifierCase::Snake);
        assert!("screaming".parse::<IdentifierCase>().is_err());
    }

    #[test]
    fn test_links_follow_renamed_operations() {
        let link = Link {
            operation_id: Some("get_owner".to_string()),
            ..Default::default()
        };
        let mut response = Response {
            description: "ok".to_string(),
            ..Default::default()
        };
        response
            .links
            .insert("owner".to_string(), RefOr::Item(link));

        let mut get_pet = Operation {
            operation_id: Some("get_pet".to_string()),
            ..Default::default()
        };
        get_pet
            .responses
            .insert("200".to_string(), RefOr::Item(response));
        let get_owner = Operation {
            operation_id: Some("get_owner".to_string()),
            ..Default::default()
        };

        let mut document = Document::default();
        let mut pets = PathItem::default();
        pets.operations.insert(HttpMethod::Get, get_pet);
        document.paths.insert("/pets/{id}".to_string(), pets);
        let mut owners = PathItem::default();
        owners.operations.insert(HttpMethod::Get, get_owner);
        document.paths.insert("/owners/{id}".to_string(), owners);

        let renamed = CaseFormatter::new(IdentifierCase::Camel).format(&mut document);
        assert_eq!(renamed.len(), 2);
        assert_eq!(renamed["get_pet"], "getPet");

        let ids: Vec<_> = document
            .operations()
            .filter_map(|(_, _, operation)| operation.operation_id.clone())
            .collect();
        assert_eq!(ids, vec!["getPet", "getOwner"]);
        let response = document.paths["/pets/{id}"]
            .operation(HttpMethod::Get)
            .and_then(|operation| operation.responses["200"].as_item())
            .unwrap();
        let link = response.links["owner"].as_item().unwrap();
        assert_eq!(link.operation_id.as_deref(), Some("getOwner"));
    }
}
