//! Request URL to path template matching
//!
//! Request URLs come from collections and manifests in many shapes:
//! absolute (`https://api.example.com/v1/users/42?$top=5`), host placeholders
//! (`{{baseUrl}}/users/{{id}}`), or bare templates (`/users/:id`). Each is
//! reduced to a server-relative path and matched segment by segment against
//! the document's path templates.

use oaslice_common::{Document, Server};
use regex::Regex;
use tracing::trace;
use url::Url;

/// Stand-in for a parameter segment of a request URL
const PARAMETER: &str = "{parameter}";

#[derive(Debug)]
struct TemplatePattern {
    template: String,
    pattern: Regex,
    literals: usize,
}

/// Matches request URLs against the path templates of one document
#[derive(Debug)]
pub struct UrlMatcher {
    /// Expanded server URLs, longest first
    bases: Vec<String>,
    /// Path part of each server URL, longest first
    base_paths: Vec<String>,
    templates: Vec<TemplatePattern>,
}

impl UrlMatcher {
    pub fn new(document: &Document) -> Self {
        let (bases, base_paths) = server_bases(&document.servers);
        let templates = document
            .paths
            .keys()
            .filter_map(|template| compile_template(template))
            .collect();
        Self {
            bases,
            base_paths,
            templates,
        }
    }

    /// Path template a request URL addresses
    ///
    /// When several templates match, the one with the most literal segments
    /// wins (`/users/me` over `/users/{id}`); ties go to document order.
    pub fn find(&self, url: &str) -> Option<&str> {
        let path = self.request_path(url);
        let mut best: Option<&TemplatePattern> = None;
        for candidate in self.templates.iter().filter(|t| t.pattern.is_match(&path)) {
            if best.map_or(true, |current| candidate.literals > current.literals) {
                best = Some(candidate);
            }
        }
        trace!(url, path = %path, template = ?best.map(|t| t.template.as_str()), "matched request URL");
        best.map(|t| t.template.as_str())
    }

    /// Server-relative path of a request URL with parameter segments normalized
    pub fn request_path(&self, url: &str) -> String {
        let url = url.split('#').next().unwrap_or_default();
        let url = url.split('?').next().unwrap_or_default();

        let mut rest = strip_host_placeholder(url);
        if let Some(base) = self
            .bases
            .iter()
            .find(|base| starts_with_ignore_case(rest, base))
        {
            rest = &rest[base.len()..];
        } else if let Some(path) = absolute_path(rest) {
            rest = path;
        }
        if let Some(base_path) = self
            .base_paths
            .iter()
            .find(|base_path| is_path_prefix(rest, base_path))
        {
            rest = &rest[base_path.len()..];
        }

        let segments: Vec<&str> = rest
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                if is_parameter(segment) {
                    PARAMETER
                } else {
                    segment
                }
            })
            .collect();
        format!("/{}", segments.join("/"))
    }
}

fn server_bases(servers: &[Server]) -> (Vec<String>, Vec<String>) {
    let mut bases = Vec::new();
    let mut base_paths = Vec::new();
    for server in servers {
        let expanded = server.expanded_url();
        let expanded = expanded.trim_end_matches('/');
        let path = match Url::parse(expanded) {
            Ok(url) => url.path().trim_end_matches('/').to_string(),
            // relative server URL, e.g. `/v1`
            Err(_) => expanded.to_string(),
        };
        if expanded.contains("://") {
            bases.push(expanded.to_string());
        }
        if !path.is_empty() && path != "/" {
            base_paths.push(path);
        }
    }
    bases.sort_by_key(|base| std::cmp::Reverse(base.len()));
    base_paths.sort_by_key(|path| std::cmp::Reverse(path.len()));
    (bases, base_paths)
}

fn compile_template(template: &str) -> Option<TemplatePattern> {
    let mut pattern = String::from("(?i)^");
    let mut literals = 0;
    for segment in template.split('/').filter(|segment| !segment.is_empty()) {
        pattern.push('/');
        if segment.contains('{') {
            pattern.push_str(&segment_pattern(segment));
        } else {
            literals += 1;
            pattern.push_str(&regex::escape(segment));
        }
    }
    pattern.push_str("/?$");
    Regex::new(&pattern).ok().map(|pattern| TemplatePattern {
        template: template.to_string(),
        pattern,
        literals,
    })
}

/// `{id}.json` → `[^/]+\.json`
fn segment_pattern(segment: &str) -> String {
    let mut pattern = String::new();
    let mut rest = segment;
    while let Some(open) = rest.find('{') {
        pattern.push_str(&regex::escape(&rest[..open]));
        match rest[open..].find('}') {
            Some(close) => {
                pattern.push_str("[^/]+");
                rest = &rest[open + close + 1..];
            }
            None => {
                pattern.push_str(&regex::escape(&rest[open..]));
                rest = "";
            }
        }
    }
    pattern.push_str(&regex::escape(rest));
    pattern
}

/// `{{var}}`, `:var` and `{var}` segments stand for parameters
fn is_parameter(segment: &str) -> bool {
    (segment.starts_with('{') && segment.ends_with('}')) || segment.starts_with(':')
}

/// Drop a leading `{{baseUrl}}` style host placeholder
fn strip_host_placeholder(url: &str) -> &str {
    if url.starts_with("{{") {
        if let Some(end) = url.find("}}") {
            return &url[end + 2..];
        }
    }
    url
}

/// Path of an absolute URL, kept verbatim so placeholders are not escaped
fn absolute_path(url: &str) -> Option<&str> {
    let (_, after_scheme) = url.split_once("://")?;
    Some(after_scheme.find('/').map_or("", |slash| &after_scheme[slash..]))
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn is_path_prefix(path: &str, prefix: &str) -> bool {
    starts_with_ignore_case(path, prefix)
        && matches!(path.as_bytes().get(prefix.len()), None | Some(b'/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oaslice_common::PathItem;

    fn document(servers: &[&str], templates: &[&str]) -> Document {
        let mut document = Document::default();
        for url in servers {
            document.servers.push(Server {
                url: url.to_string(),
                ..Default::default()
            });
        }
        for template in templates {
            document
                .paths
                .insert(template.to_string(), PathItem::default());
        }
        document
    }

    #[test]
    fn test_request_path_normalization() {
        let matcher = UrlMatcher::new(&document(&["https://graph.example.com/v1.0"], &[]));
        assert_eq!(
            matcher.request_path("https://graph.example.com/v1.0/users/42?$select=id"),
            "/users/42"
        );
        assert_eq!(matcher.request_path("{{baseUrl}}/users/{{id}}"), "/users/{parameter}");
        assert_eq!(matcher.request_path("/v1.0/users/:id/"), "/users/{parameter}");
        assert_eq!(
            matcher.request_path("https://other.example.com/users"),
            "/users"
        );
    }

    #[test]
    fn test_find_prefers_literal_segments() {
        let matcher = UrlMatcher::new(&document(
            &["/api"],
            &["/users/{id}", "/users/me", "/users/{id}/photo.{format}"],
        ));
        assert_eq!(matcher.find("/api/users/me"), Some("/users/me"));
        assert_eq!(matcher.find("/api/users/17"), Some("/users/{id}"));
        assert_eq!(matcher.find("/api/users/:userId"), Some("/users/{id}"));
        assert_eq!(
            matcher.find("/api/users/17/photo.png"),
            Some("/users/{id}/photo.{format}")
        );
        assert_eq!(matcher.find("/api/groups"), None);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let matcher = UrlMatcher::new(&document(&[], &["/Users"]));
        assert_eq!(matcher.find("/users/"), Some("/Users"));
    }

    #[test]
    fn test_server_variables_are_expanded() {
        let mut document = document(&[], &["/pets"]);
        document.servers.push(Server {
            url: "https://{region}.example.com/{base}".to_string(),
            variables: [
                (
                    "region".to_string(),
                    oaslice_common::ServerVariable {
                        default: "eu".to_string(),
                        ..Default::default()
                    },
                ),
                (
                    "base".to_string(),
                    oaslice_common::ServerVariable {
                        default: "v2".to_string(),
                        ..Default::default()
                    },
                ),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        });
        let matcher = UrlMatcher::new(&document);
        assert_eq!(matcher.find("https://eu.example.com/v2/pets"), Some("/pets"));
    }
}
