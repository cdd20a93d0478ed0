//! Per-read parsing state

use super::fields::Grammar;
use super::{v2, v3, v31};
use crate::node::Node;
use indexmap::IndexMap;
use oaslice_common::{DiagnosticKind, Diagnostics, OAuthFlow, RefOr, RequestBody, SpecVersion};
use std::collections::HashSet;

/// State threaded through every field handler of one read
pub struct ParsingContext {
    pub version: SpecVersion,
    pub grammar: &'static Grammar,
    pub diagnostics: Diagnostics,
    /// Skip required-field checks (fragments loaded for external references)
    pub fragment: bool,
    pub(crate) v2: V2State,
}

/// Swagger 2.0 values that shape later fields
#[derive(Debug, Default)]
pub(crate) struct V2State {
    pub global_consumes: Vec<String>,
    pub global_produces: Vec<String>,
    pub operation_consumes: Option<Vec<String>>,
    pub operation_produces: Option<Vec<String>>,
    pub host: Option<String>,
    pub base_path: Option<String>,
    pub schemes: Vec<String>,
    /// Names of root `parameters` entries declared `in: body`
    pub body_parameters: HashSet<String>,
    /// Root `in: formData` parameters, inlined wherever referenced
    pub form_parameters: IndexMap<String, Node>,
    /// Body built from path-level parameters, handed to operations without one
    pub path_body: Option<RefOr<RequestBody>>,
    pub collection_format: Option<String>,
    pub flow_kind: Option<String>,
    pub flow: OAuthFlow,
    pub scheme_pointer: String,
}

impl V2State {
    pub fn consumes(&self) -> Vec<String> {
        let consumes = self
            .operation_consumes
            .as_ref()
            .unwrap_or(&self.global_consumes);
        if consumes.is_empty() {
            vec!["application/json".to_string()]
        } else {
            consumes.clone()
        }
    }

    pub fn produces(&self) -> Vec<String> {
        let produces = self
            .operation_produces
            .as_ref()
            .unwrap_or(&self.global_produces);
        if produces.is_empty() {
            vec!["application/octet-stream".to_string()]
        } else {
            produces.clone()
        }
    }
}

impl ParsingContext {
    pub fn new(version: SpecVersion) -> Self {
        Self {
            version,
            grammar: grammar_for(version),
            diagnostics: Diagnostics::new(),
            fragment: false,
            v2: V2State::default(),
        }
    }

    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        pointer: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.report(kind, pointer, message);
    }

    /// Report a required field that is absent
    pub fn missing(&mut self, pointer: &str, field: &str) {
        if !self.fragment {
            self.report(
                DiagnosticKind::MissingField,
                pointer,
                format!("required field '{}' is missing", field),
            );
        }
    }
}

/// Field grammar for an OpenAPI version
pub fn grammar_for(version: SpecVersion) -> &'static Grammar {
    match version {
        SpecVersion::V2_0 => v2::grammar(),
        SpecVersion::V3_0 => v3::grammar(),
        SpecVersion::V3_1 => v31::grammar(),
    }
}
