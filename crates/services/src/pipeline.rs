//! Read → filter → format → write pipeline

use crate::filter::{filter_document, FilterCriteria};
use crate::formatter::{CaseFormatter, IdentifierCase};
use crate::stats::Stats;
use oaslice_common::{CancellationToken, Diagnostics, Document, Format, Result, SpecVersion};
use oaslice_parser::{DocumentLoader, OpenApiReader, ReaderSettings};
use oaslice_writer::{OpenApiWriter, WriterSettings};
use tracing::{debug, info};

/// Settings for one transform run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformOptions {
    pub reader: ReaderSettings,
    pub writer: WriterSettings,
    pub filter: FilterCriteria,
    pub identifier_case: Option<IdentifierCase>,
}

/// Serialized result of a transform
#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub text: String,
    /// Reader, filter and writer diagnostics, in that order
    pub diagnostics: Diagnostics,
    /// Counts of the written document
    pub stats: Stats,
}

/// Outcome of reading a document without writing it back
#[derive(Debug, Clone)]
pub struct Inspection {
    pub document: Document,
    pub diagnostics: Diagnostics,
    pub stats: Stats,
    pub format: Format,
    pub version: SpecVersion,
}

/// Runs the transform pipeline
///
/// # Example
///
/// ```rust,ignore
/// use oaslice_common::CancellationToken;
/// use oaslice_parser::FileLoader;
/// use oaslice_services::{FilterCriteria, TransformOptions, Transformer};
///
/// let options = TransformOptions {
///     filter: FilterCriteria::by_tags(["pets"]),
///     ..Default::default()
/// };
/// let output = Transformer::new(options)
///     .with_loader(Box::new(FileLoader::new()))
///     .run(&text, &CancellationToken::new())?;
/// ```
pub struct Transformer {
    options: TransformOptions,
    reader: OpenApiReader,
}

impl Transformer {
    pub fn new(options: TransformOptions) -> Self {
        let reader = OpenApiReader::new(options.reader.clone());
        Self { options, reader }
    }

    /// Loader for external references, used when the reader settings ask
    /// for them to be loaded
    pub fn with_loader(mut self, loader: Box<dyn DocumentLoader>) -> Self {
        self.reader = self.reader.with_loader(loader);
        self
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    /// Read, filter, format and write `input`
    ///
    /// Filter criteria are validated before anything is read; cancellation
    /// is checked before the read, filter and write phases.
    pub fn run(&self, input: &str, cancel: &CancellationToken) -> Result<TransformOutput> {
        self.options.filter.validate()?;

        cancel.check("read")?;
        let read = self.reader.read_str(input)?;
        debug!(
            version = %read.version,
            format = %read.format,
            diagnostics = read.diagnostics.len(),
            "read document"
        );
        let mut diagnostics = read.diagnostics;
        let mut document = read.document;

        cancel.check("filter")?;
        if let Some(predicate) = self.options.filter.predicate(&document, &mut diagnostics)? {
            let filtered = filter_document(&document, &predicate);
            diagnostics.extend(filtered.diagnostics);
            document = filtered.document;
        }
        if let Some(case) = self.options.identifier_case {
            CaseFormatter::new(case).format(&mut document);
        }

        cancel.check("write")?;
        let written = OpenApiWriter::new(self.options.writer.clone()).write(&document)?;
        diagnostics.extend(written.diagnostics);
        let stats = Stats::of(&document);

        info!(
            operations = stats.operations,
            diagnostics = diagnostics.len(),
            "transform complete"
        );
        Ok(TransformOutput {
            text: written.text,
            diagnostics,
            stats,
        })
    }

    /// Read `input` and count its nodes
    pub fn inspect(&self, input: &str, cancel: &CancellationToken) -> Result<Inspection> {
        cancel.check("read")?;
        let read = self.reader.read_str(input)?;
        let document = read.document;
        let stats = Stats::of(&document);
        debug!(
            version = %read.version,
            diagnostics = read.diagnostics.len(),
            "inspected document"
        );
        Ok(Inspection {
            document,
            diagnostics: read.diagnostics,
            stats,
            format: read.format,
            version: read.version,
        })
    }
}

/// Transform `input` with `options` and no external document loader
pub fn transform(
    input: &str,
    options: &TransformOptions,
    cancel: &CancellationToken,
) -> Result<TransformOutput> {
    Transformer::new(options.clone()).run(input, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oaslice_common::OpenApiError;

    const PETS: &str = r#"
openapi: 3.0.3
info:
  title: Pets
  version: "1"
paths:
  /pets:
    get:
      operationId: list_pets
      tags: [pets]
      responses:
        "200":
          description: ok
"#;

    #[test]
    fn test_transform_defaults_keep_version() {
        let output = transform(PETS, &TransformOptions::default(), &CancellationToken::new()).unwrap();
        assert!(output.text.starts_with("openapi: 3.0.4\n"));
        assert_eq!(output.stats.operations, 1);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_cancelled_before_read() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = transform(PETS, &TransformOptions::default(), &cancel).unwrap_err();
        assert!(matches!(err, OpenApiError::Cancelled("read")));
    }

    #[test]
    fn test_conflicting_criteria_fail_before_read() {
        let options = TransformOptions {
            filter: FilterCriteria {
                operation_ids: Some(vec!["list_pets".to_string()]),
                tags: Some(vec!["pets".to_string()]),
                request_urls: None,
            },
            ..Default::default()
        };
        let err = transform("{ not even json", &options, &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, OpenApiError::ConflictingFilterCriteria(_)));
    }

    #[test]
    fn test_case_formatting_runs_after_filter() {
        let options = TransformOptions {
            filter: FilterCriteria::by_operation_ids(["list_pets"]),
            identifier_case: Some(IdentifierCase::Pascal),
            writer: WriterSettings {
                format: Format::Json,
                ..Default::default()
            },
            ..Default::default()
        };
        let output = transform(PETS, &options, &CancellationToken::new()).unwrap();
        assert!(output.text.contains("\"operationId\": \"ListPets\""));
    }
}
