//! Collection file parser

use super::types::{Collection, CollectionItem};
use oaslice_common::{Format, OpenApiError, RequestUrls, Result};
use std::fs;
use std::path::Path;
use tracing::trace;

/// Postman collection parser
pub struct CollectionParser {
    collection: Collection,
}

impl CollectionParser {
    /// Load a collection from a file path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            OpenApiError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read collection file {}: {}", path.as_ref().display(), e),
            ))
        })?;

        Self::from_json(&content)
    }

    /// Parse a collection from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let collection: Collection =
            serde_json::from_str(json).map_err(|e| OpenApiError::MalformedSyntax {
                format: Format::Json,
                message: format!("Failed to parse collection JSON: {}", e),
            })?;

        Ok(Self { collection })
    }

    /// Request URL → methods, in the order requests appear
    pub fn request_urls(&self) -> RequestUrls {
        let mut urls = RequestUrls::new();
        collect(&self.collection.item, &mut urls);
        trace!(count = urls.len(), "collected request urls from collection");
        urls
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }
}

fn collect(items: &[CollectionItem], urls: &mut RequestUrls) {
    for item in items {
        match &item.request {
            Some(request) => {
                let Some(raw) = request.url.as_ref().and_then(|url| url.raw()) else {
                    continue;
                };
                urls.entry(raw).or_default().push(request.method.clone());
            }
            None => collect(&item.item, urls),
        }
    }
}
