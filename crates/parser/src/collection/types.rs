//! Postman collection type definitions
//!
//! Only the members needed to enumerate requests are modelled.

use serde::{Deserialize, Serialize};

/// Collection root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default)]
    pub info: Option<CollectionInfo>,

    /// Top-level requests and folders
    #[serde(default)]
    pub item: Vec<CollectionItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionInfo {
    #[serde(default)]
    pub name: Option<String>,

    /// Collection schema URL, e.g. `https://schema.getpostman.com/json/collection/v2.1.0/collection.json`
    #[serde(default)]
    pub schema: Option<String>,
}

/// A request or a folder of further items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionItem {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub request: Option<CollectionRequest>,

    #[serde(default)]
    pub item: Vec<CollectionItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionRequest {
    /// HTTP method; Postman omits it for GET
    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default)]
    pub url: Option<RequestUrl>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Request URL, as a plain string or a structured object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestUrl {
    Raw(String),
    Detailed(DetailedUrl),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailedUrl {
    #[serde(default)]
    pub raw: Option<String>,

    #[serde(default)]
    pub protocol: Option<String>,

    /// Host name segments, e.g. `["graph", "microsoft", "com"]`
    #[serde(default)]
    pub host: Vec<String>,

    #[serde(default)]
    pub path: Vec<String>,
}

impl RequestUrl {
    /// Full URL text; rebuilt from host and path when `raw` is absent
    pub fn raw(&self) -> Option<String> {
        match self {
            RequestUrl::Raw(raw) => Some(raw.clone()),
            RequestUrl::Detailed(url) => url.raw.clone().or_else(|| url.rebuild()),
        }
    }
}

impl DetailedUrl {
    fn rebuild(&self) -> Option<String> {
        if self.host.is_empty() && self.path.is_empty() {
            return None;
        }
        let mut url = String::new();
        if let Some(protocol) = &self.protocol {
            url.push_str(protocol);
            url.push_str("://");
        }
        url.push_str(&self.host.join("."));
        for segment in &self.path {
            url.push('/');
            url.push_str(segment);
        }
        Some(url)
    }
}
