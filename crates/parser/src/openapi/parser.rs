//! Document reader: text to model, then reference binding

use super::fields::load_map;
use super::ParsingContext;
use crate::node::{self, Mapping, Node, ParseNode};
use crate::resolver::{DocumentLoader, ExternalResolution, Resolver};
use oaslice_common::{
    DiagnosticKind, Diagnostics, Document, Format, OpenApiError, Result, SpecVersion,
};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// How a document is read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderSettings {
    /// Input syntax; sniffed from the text when `None`
    pub format: Option<Format>,
    /// Read with this grammar whatever the document declares
    pub force_version: Option<SpecVersion>,
    /// Fetch external `$ref` targets through the configured loader
    pub load_external_refs: bool,
    /// Location of the document itself, for relative external references
    pub base_location: Option<String>,
}

/// Outcome of a read
#[derive(Debug, Clone)]
pub struct ReadResult {
    pub document: Document,
    pub diagnostics: Diagnostics,
    pub format: Format,
    pub version: SpecVersion,
}

/// OpenAPI reader
///
/// Reads JSON or YAML text in any supported version and binds every
/// reference. Content problems come back as diagnostics; only syntax
/// errors and I/O failures are errors.
pub struct OpenApiReader {
    settings: ReaderSettings,
    loader: Option<Box<dyn DocumentLoader>>,
}

impl OpenApiReader {
    pub fn new(settings: ReaderSettings) -> Self {
        Self {
            settings,
            loader: None,
        }
    }

    /// Loader used for external references when `load_external_refs` is set
    pub fn with_loader(mut self, loader: Box<dyn DocumentLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    /// Read a document from a file path
    ///
    /// The path becomes the base location for relative external references
    /// unless one is configured.
    pub fn from_file<P: AsRef<Path>>(&self, path: P) -> Result<ReadResult> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            OpenApiError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;

        let base = self
            .settings
            .base_location
            .clone()
            .unwrap_or_else(|| path.display().to_string());
        self.read_with_base(&content, Some(base))
    }

    pub fn read_str(&self, text: &str) -> Result<ReadResult> {
        self.read_with_base(text, self.settings.base_location.clone())
    }

    pub fn read_slice(&self, bytes: &[u8]) -> Result<ReadResult> {
        let text = std::str::from_utf8(bytes).map_err(|e| OpenApiError::MalformedSyntax {
            format: self.settings.format.unwrap_or_default(),
            message: format!("input is not valid UTF-8: {}", e),
        })?;
        self.read_str(text)
    }

    pub fn read(&self, mut reader: impl Read) -> Result<ReadResult> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        self.read_str(&text)
    }

    fn read_with_base(&self, text: &str, base: Option<String>) -> Result<ReadResult> {
        let parsed = parse_document(
            text,
            self.settings.format,
            self.settings.force_version,
            SpecVersion::default(),
            false,
        )?;
        let Parsed {
            mut document,
            mut diagnostics,
            format,
            version,
        } = parsed;
        debug!(
            version = %version,
            format = %format,
            paths = document.paths.len(),
            components = document.components.len(),
            "parsed document"
        );

        let resolution = match (&self.loader, self.settings.load_external_refs) {
            (Some(_), true) => ExternalResolution::Load,
            _ => ExternalResolution::Record,
        };
        let resolver = Resolver::new(resolution, self.loader.as_deref(), base);
        resolver.resolve(&mut document, &mut diagnostics);

        Ok(ReadResult {
            document,
            diagnostics,
            format,
            version,
        })
    }
}

/// A document read without binding its references
pub(crate) struct Parsed {
    pub document: Document,
    pub diagnostics: Diagnostics,
    pub format: Format,
    pub version: SpecVersion,
}

/// Parse text into a document; references are left unbound
///
/// `fallback` is used when the document declares no version. Fragments
/// (documents loaded for external references) skip required-field checks
/// and may omit the version silently.
pub(crate) fn parse_document(
    text: &str,
    format: Option<Format>,
    forced: Option<SpecVersion>,
    fallback: SpecVersion,
    fragment: bool,
) -> Result<Parsed> {
    let format = format.unwrap_or_else(|| Format::sniff(text));
    let root = node::parse(text, format)?;
    let Node::Mapping(mapping) = &root else {
        return Err(OpenApiError::MalformedSyntax {
            format,
            message: "document root must be a mapping".to_string(),
        });
    };

    let mut diagnostics = Diagnostics::new();
    let version = match forced {
        Some(version) => version,
        None => detect_version(mapping, fallback, fragment, &mut diagnostics),
    };

    let mut ctx = ParsingContext::new(version);
    ctx.fragment = fragment;
    ctx.diagnostics = diagnostics;

    let root_node = ParseNode::root(&root);
    let mut document = match root_node.as_map(&mut ctx) {
        Some(map) => load_map::<Document>(&map, &mut ctx),
        None => Document::default(),
    };
    document.spec_version = version;

    Ok(Parsed {
        document,
        diagnostics: ctx.diagnostics,
        format,
        version,
    })
}

fn detect_version(
    mapping: &Mapping,
    fallback: SpecVersion,
    fragment: bool,
    diagnostics: &mut Diagnostics,
) -> SpecVersion {
    let declared = ["openapi", "swagger"]
        .iter()
        .find_map(|field| mapping.get(field).map(|node| (*field, node)));

    let Some((field, node)) = declared else {
        if !fragment {
            diagnostics.report(
                DiagnosticKind::UnsupportedVersion,
                "#",
                format!("no openapi or swagger field, reading as {}", fallback),
            );
        }
        return fallback;
    };

    let text = match node {
        Node::String(text) => text.clone(),
        Node::Number(number) => number.to_string(),
        _ => String::new(),
    };
    match SpecVersion::from_declared(&text) {
        Some(version) => version,
        None => {
            diagnostics.report(
                DiagnosticKind::UnsupportedVersion,
                format!("#/{}", field),
                format!("unsupported version '{}', reading as {}", text, fallback),
            );
            fallback
        }
    }
}
