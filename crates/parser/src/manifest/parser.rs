//! API manifest parser

use super::types::{ApiDependency, ApiManifest};
use oaslice_common::{Format, OpenApiError, RequestUrls, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Which dependency of a manifest to use
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencySelection {
    /// The first dependency in declaration order
    #[default]
    First,
    /// The dependency with this name
    Named(String),
    /// Requests of every dependency, description URL of the first
    Merge,
}

/// Requests and description location of the selected dependency
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedDependency {
    pub names: Vec<String>,
    pub description_url: Option<String>,
    pub request_urls: RequestUrls,
}

/// Split `apimanifest.json#dependency` into path and dependency name
pub fn split_manifest_ref(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once('#') {
        Some((path, name)) if !name.is_empty() => (path, Some(name)),
        Some((path, _)) => (path, None),
        None => (reference, None),
    }
}

/// API manifest parser
pub struct ManifestParser {
    manifest: ApiManifest,
}

impl ManifestParser {
    /// Load a manifest from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            OpenApiError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read API manifest {}: {}", path.as_ref().display(), e),
            ))
        })?;

        Self::from_json(&content)
    }

    /// Parse a manifest from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: ApiManifest =
            serde_json::from_str(json).map_err(|e| OpenApiError::MalformedSyntax {
                format: Format::Json,
                message: format!("Failed to parse API manifest JSON: {}", e),
            })?;

        Ok(Self { manifest })
    }

    pub fn manifest(&self) -> &ApiManifest {
        &self.manifest
    }

    /// Resolve a selection policy to the dependency (or dependencies) it names
    pub fn select(&self, selection: &DependencySelection) -> Result<SelectedDependency> {
        let dependencies = &self.manifest.api_dependencies;
        let chosen: Vec<(&String, &ApiDependency)> = match selection {
            DependencySelection::First => dependencies.iter().take(1).collect(),
            DependencySelection::Named(name) => match dependencies.get_key_value(name) {
                Some(entry) => vec![entry],
                None => {
                    return Err(OpenApiError::Settings(format!(
                        "API dependency '{}' not found in manifest",
                        name
                    )))
                }
            },
            DependencySelection::Merge => dependencies.iter().collect(),
        };
        if chosen.is_empty() {
            return Err(OpenApiError::Settings(
                "API manifest declares no apiDependencies".to_string(),
            ));
        }

        let mut selected = SelectedDependency::default();
        for (name, dependency) in chosen {
            selected.names.push(name.clone());
            if selected.description_url.is_none() {
                selected.description_url = dependency.api_description_url.clone();
            }
            group_requests(dependency, &mut selected.request_urls);
        }
        debug!(
            dependencies = ?selected.names,
            requests = selected.request_urls.len(),
            "selected API dependency"
        );
        Ok(selected)
    }
}

/// Group non-excluded requests by URI template
fn group_requests(dependency: &ApiDependency, urls: &mut RequestUrls) {
    for request in dependency.requests.iter().filter(|r| !r.exclude) {
        let methods = urls.entry(request.uri_template.clone()).or_default();
        if !methods
            .iter()
            .any(|method| method.eq_ignore_ascii_case(&request.method))
        {
            methods.push(request.method.clone());
        }
    }
}
