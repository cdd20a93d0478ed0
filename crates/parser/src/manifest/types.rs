//! API manifest type definitions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Manifest root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiManifest {
    #[serde(default)]
    pub application_name: Option<String>,

    #[serde(default)]
    pub publisher: Option<Publisher>,

    /// Named dependencies, in declaration order
    #[serde(default)]
    pub api_dependencies: IndexMap<String, ApiDependency>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publisher {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDependency {
    /// Location of the API description document
    #[serde(default)]
    pub api_description_url: Option<String>,

    #[serde(default)]
    pub api_description_version: Option<String>,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub requests: Vec<RequestInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInfo {
    pub uri_template: String,

    #[serde(default = "default_method")]
    pub method: String,

    /// Listed but not used by the application
    #[serde(default)]
    pub exclude: bool,
}

fn default_method() -> String {
    "GET".to_string()
}
