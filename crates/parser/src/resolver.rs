//! Reference resolver
//!
//! Second reading pass: every `$ref` in the document is bound to the
//! identity of its target, never to a copy. Local references bind to
//! component keys; external ones are either recorded as written or, when
//! loading is enabled, fetched through a [`DocumentLoader`], parsed and
//! bound to components of the loaded document.

use crate::openapi::{parse_document, Parsed};
use indexmap::IndexMap;
use oaslice_common::{
    fragment_key, ComponentKey, DiagnosticKind, Diagnostics, Document, PointerError, Reference,
    ReferenceTarget, Result, Visitor, Walk, WalkContext, Walker,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace, warn};
use url::Url;

/// Fetches the text of an external document
#[cfg_attr(test, mockall::automock)]
pub trait DocumentLoader {
    /// `locator` is already joined with the referencing document's location
    fn load(&self, locator: &str) -> Result<String>;
}

/// What to do with references into other documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExternalResolution {
    /// Keep the literal pointer, leave the reference unresolved
    #[default]
    Record,
    /// Load the target document and bind into it
    Load,
}

pub struct Resolver<'a> {
    resolution: ExternalResolution,
    loader: Option<&'a dyn DocumentLoader>,
    base: Option<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        resolution: ExternalResolution,
        loader: Option<&'a dyn DocumentLoader>,
        base: Option<String>,
    ) -> Self {
        let resolution = match loader {
            Some(_) => resolution,
            None => ExternalResolution::Record,
        };
        Self {
            resolution,
            loader,
            base,
        }
    }

    /// Bind every reference of `document`, loading external documents first
    pub fn resolve(&self, document: &mut Document, diagnostics: &mut Diagnostics) {
        let mut loaded: IndexMap<String, Document> = IndexMap::new();
        let mut failures: HashMap<String, String> = HashMap::new();

        if let (ExternalResolution::Load, Some(loader)) = (self.resolution, self.loader) {
            let mut queue: VecDeque<String> =
                external_locators(document, self.base.as_deref()).into();
            let mut seen: HashSet<String> = HashSet::new();

            while let Some(locator) = queue.pop_front() {
                if !seen.insert(locator.clone()) {
                    continue;
                }
                match load_external(loader, &locator, document.spec_version) {
                    Ok(parsed) => {
                        let Parsed {
                            document: mut external,
                            diagnostics: found,
                            ..
                        } = parsed;
                        scoped(diagnostics, found, &locator);
                        queue.extend(external_locators(&mut external, Some(locator.as_str())));
                        debug!(locator = %locator, "loaded external document");
                        loaded.insert(locator, external);
                    }
                    Err(e) => {
                        warn!(locator = %locator, error = %e, "failed to load external document");
                        failures.insert(locator, e.to_string());
                    }
                }
            }
        }

        let catalog: HashMap<String, HashSet<ComponentKey>> = loaded
            .iter()
            .map(|(locator, external)| {
                (locator.clone(), external.components.keys().into_iter().collect())
            })
            .collect();

        let bound = self.bind(document, self.base.as_deref(), &catalog, &failures, diagnostics);
        let mut bound_external = 0;
        for (locator, external) in loaded.iter_mut() {
            let mut found = Diagnostics::new();
            bound_external +=
                self.bind(external, Some(locator.as_str()), &catalog, &failures, &mut found);
            scoped(diagnostics, found, locator);
        }
        debug!(
            bound,
            bound_external,
            external_documents = loaded.len(),
            "references resolved"
        );
        document.external = loaded;
    }

    fn bind(
        &self,
        document: &mut Document,
        base: Option<&str>,
        catalog: &HashMap<String, HashSet<ComponentKey>>,
        failures: &HashMap<String, String>,
        diagnostics: &mut Diagnostics,
    ) -> usize {
        let local_keys: HashSet<ComponentKey> = document.components.keys().into_iter().collect();
        let mut binder = Binder {
            resolution: self.resolution,
            local_keys: &local_keys,
            base,
            catalog,
            failures,
            diagnostics,
            bound: 0,
        };
        Walker::new(&mut binder).walk(document);
        binder.bound
    }
}

fn load_external(
    loader: &dyn DocumentLoader,
    locator: &str,
    version: oaslice_common::SpecVersion,
) -> Result<Parsed> {
    let text = loader.load(locator)?;
    parse_document(&text, None, None, version, true)
}

/// Append diagnostics of another document, pointers prefixed by its locator
fn scoped(diagnostics: &mut Diagnostics, found: Diagnostics, locator: &str) {
    for mut diagnostic in found.into_vec() {
        diagnostic.pointer = format!("{}{}", locator, diagnostic.pointer);
        diagnostics.push(diagnostic);
    }
}

/// Absolute locators of every external reference in `document`
fn external_locators(document: &mut Document, base: Option<&str>) -> Vec<String> {
    let mut collector = LocatorCollector {
        base,
        locators: Vec::new(),
    };
    Walker::new(&mut collector).walk(document);
    collector.locators
}

struct LocatorCollector<'b> {
    base: Option<&'b str>,
    locators: Vec<String>,
}

impl Visitor for LocatorCollector<'_> {
    fn visit_reference(&mut self, reference: &mut Reference, _ctx: &WalkContext) -> Walk {
        if let Some(locator) = reference.locator() {
            let absolute = join_locator(self.base, locator);
            if !self.locators.contains(&absolute) {
                self.locators.push(absolute);
            }
        }
        Walk::Continue
    }
}

struct Binder<'c> {
    resolution: ExternalResolution,
    local_keys: &'c HashSet<ComponentKey>,
    base: Option<&'c str>,
    catalog: &'c HashMap<String, HashSet<ComponentKey>>,
    failures: &'c HashMap<String, String>,
    diagnostics: &'c mut Diagnostics,
    bound: usize,
}

impl Binder<'_> {
    fn unresolved(&mut self, ctx: &WalkContext, message: String) {
        self.diagnostics
            .report(DiagnosticKind::UnresolvedReference, ctx.pointer(), message);
    }
}

impl Visitor for Binder<'_> {
    fn visit_reference(&mut self, reference: &mut Reference, ctx: &WalkContext) -> Walk {
        if reference.is_resolved() {
            return Walk::Continue;
        }
        let locator = reference.locator().map(str::to_string);
        if locator.is_some() && self.resolution == ExternalResolution::Record {
            trace!(pointer = %reference.pointer, "external reference recorded");
            return Walk::Continue;
        }

        if reference.fragment().is_empty() {
            self.unresolved(
                ctx,
                format!("'{}' names a whole document, which is not supported", reference.pointer),
            );
            return Walk::Continue;
        }
        let key = match fragment_key(reference.fragment(), reference.kind) {
            Ok(key) => key,
            Err(PointerError::Unsupported) => {
                self.unresolved(
                    ctx,
                    format!("'{}' does not point into a components registry", reference.pointer),
                );
                return Walk::Continue;
            }
            Err(PointerError::KindMismatch(found)) => {
                self.unresolved(
                    ctx,
                    format!(
                        "'{}' points at a {} where a {} is expected",
                        reference.pointer,
                        found.label(),
                        reference.kind.label()
                    ),
                );
                return Walk::Continue;
            }
        };

        match locator {
            None => {
                if self.local_keys.contains(&key) {
                    trace!(pointer = %reference.pointer, "bound local reference");
                    reference.bind(ReferenceTarget::Local(key));
                    self.bound += 1;
                } else {
                    self.unresolved(ctx, format!("target '{}' does not exist", reference.pointer));
                }
            }
            Some(locator) => {
                let absolute = join_locator(self.base, &locator);
                if let Some(message) = self.failures.get(&absolute) {
                    let message = format!(
                        "external document '{}' could not be loaded: {}",
                        absolute, message
                    );
                    self.unresolved(ctx, message);
                } else if self
                    .catalog
                    .get(&absolute)
                    .is_some_and(|keys| keys.contains(&key))
                {
                    trace!(pointer = %reference.pointer, locator = %absolute, "bound external reference");
                    reference.bind(ReferenceTarget::External {
                        locator: absolute,
                        key,
                    });
                    self.bound += 1;
                } else {
                    self.unresolved(
                        ctx,
                        format!("target '{}' does not exist in '{}'", key, absolute),
                    );
                }
            }
        }
        Walk::Continue
    }
}

/// Join a reference locator onto the location of the referencing document
///
/// URLs are joined with URL semantics; file paths lexically, relative to
/// the directory of `base`.
pub fn join_locator(base: Option<&str>, locator: &str) -> String {
    if Url::parse(locator).is_ok() {
        return locator.to_string();
    }
    let Some(base) = base else {
        return normalize_path(Path::new(locator));
    };
    if let Ok(base_url) = Url::parse(base) {
        if let Ok(joined) = base_url.join(locator) {
            return joined.to_string();
        }
    }
    let directory = Path::new(base).parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&directory.join(locator))
}

fn normalize_path(path: &Path) -> String {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other),
        }
    }
    normalized.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::{OpenApiReader, ReaderSettings};
    use oaslice_common::{ComponentKind, RefOr, Schema};

    const ROOT: &str = r##"{
        "openapi": "3.0.3",
        "info": {"title": "t", "version": "1"},
        "paths": {},
        "components": {
            "schemas": {
                "Pet": {"type": "object", "properties": {"tag": {"$ref": "common.json#/components/schemas/Tag"}}}
            }
        }
    }"##;

    const COMMON: &str = r##"{
        "components": {
            "schemas": {
                "Tag": {"type": "object", "properties": {"owner": {"$ref": "#/components/schemas/Owner"}}},
                "Owner": {"type": "string"}
            }
        }
    }"##;

    fn tag_reference(document: &Document) -> &Reference {
        let pet = document.components.schemas["Pet"].as_item().unwrap();
        pet.properties["tag"].as_reference().unwrap()
    }

    #[test]
    fn test_join_locator() {
        assert_eq!(join_locator(Some("specs/api.yaml"), "common.yaml"), "specs/common.yaml");
        assert_eq!(join_locator(Some("specs/v1/api.yaml"), "../shared/x.yaml"), "specs/shared/x.yaml");
        assert_eq!(
            join_locator(Some("https://example.com/specs/api.yaml"), "common.yaml"),
            "https://example.com/specs/common.yaml"
        );
        assert_eq!(join_locator(None, "./common.yaml"), "common.yaml");
        assert_eq!(
            join_locator(Some("api.yaml"), "https://example.com/x.yaml"),
            "https://example.com/x.yaml"
        );
    }

    #[test]
    fn test_record_mode_leaves_external_unresolved() {
        let result = OpenApiReader::new(ReaderSettings::default())
            .read_str(ROOT)
            .unwrap();
        let reference = tag_reference(&result.document);
        assert!(!reference.is_resolved());
        assert_eq!(reference.pointer, "common.json#/components/schemas/Tag");
        assert!(result.diagnostics.is_empty());
        assert!(result.document.external.is_empty());
    }

    #[test]
    fn test_load_mode_binds_external() {
        let mut loader = MockDocumentLoader::new();
        loader
            .expect_load()
            .withf(|locator| locator == "specs/common.json")
            .times(1)
            .returning(|_| Ok(COMMON.to_string()));

        let settings = ReaderSettings {
            load_external_refs: true,
            base_location: Some("specs/api.json".to_string()),
            ..Default::default()
        };
        let result = OpenApiReader::new(settings)
            .with_loader(Box::new(loader))
            .read_str(ROOT)
            .unwrap();

        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let document = &result.document;
        let reference = tag_reference(document);
        assert_eq!(
            reference.target(),
            Some(&ReferenceTarget::External {
                locator: "specs/common.json".to_string(),
                key: ComponentKey::new(ComponentKind::Schema, "Tag"),
            })
        );
        let tag: &Schema = document.resolve(reference).unwrap();
        assert_eq!(tag.single_type(), Some("object"));

        // local references inside the external document bind within it
        let external = &document.external["specs/common.json"];
        let owner = external.components.schemas["Tag"].as_item().unwrap().properties["owner"]
            .as_reference()
            .unwrap();
        assert_eq!(
            owner.local_key(),
            Some(&ComponentKey::new(ComponentKind::Schema, "Owner"))
        );
    }

    #[test]
    fn test_loader_failure_is_a_diagnostic() {
        let mut loader = MockDocumentLoader::new();
        loader.expect_load().returning(|locator| {
            Err(oaslice_common::OpenApiError::ExternalDocument {
                locator: locator.to_string(),
                message: "not found".to_string(),
            })
        });

        let settings = ReaderSettings {
            load_external_refs: true,
            ..Default::default()
        };
        let result = OpenApiReader::new(settings)
            .with_loader(Box::new(loader))
            .read_str(ROOT)
            .unwrap();
        assert!(!tag_reference(&result.document).is_resolved());
        assert_eq!(
            result
                .diagnostics
                .count_of(DiagnosticKind::UnresolvedReference),
            1
        );
    }

    #[test]
    fn test_kind_mismatch_and_missing_target() {
        let result = OpenApiReader::new(ReaderSettings::default())
            .read_str(
                r##"{
                    "openapi": "3.1.0",
                    "info": {"title": "t", "version": "1"},
                    "components": {
                        "parameters": {"Limit": {"name": "limit", "in": "query"}},
                        "schemas": {
                            "A": {"$ref": "#/components/parameters/Limit"},
                            "B": {"$ref": "#/components/schemas/Missing"},
                            "C": {"$ref": "#/paths/~1pets"},
                            "D": {"$ref": "#/components/schemas/A"}
                        }
                    }
                }"##,
            )
            .unwrap();
        assert_eq!(
            result
                .diagnostics
                .count_of(DiagnosticKind::UnresolvedReference),
            3
        );
        let d = &result.document.components.schemas["D"];
        match d {
            RefOr::Ref(reference) => assert!(reference.is_resolved()),
            RefOr::Item(_) => panic!("expected a reference"),
        }
    }

    #[test]
    fn test_cycle_binds_identity() {
        let result = OpenApiReader::new(ReaderSettings::default())
            .read_str(
                r##"{
                    "openapi": "3.0.0",
                    "info": {"title": "t", "version": "1"},
                    "components": {"schemas": {
                        "Node": {"type": "object", "properties": {"next": {"$ref": "#/components/schemas/Node"}}}
                    }}
                }"##,
            )
            .unwrap();
        assert!(result.diagnostics.is_empty());
        let node = result.document.components.schemas["Node"].as_item().unwrap();
        let next = node.properties["next"].as_reference().unwrap();
        let resolved: &Schema = result.document.resolve(next).unwrap();
        assert_eq!(resolved, node);
    }
}
