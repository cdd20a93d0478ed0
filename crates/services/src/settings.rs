//! Transform settings file
//!
//! A YAML file carrying the same knobs as the command line:
//!
//! ```yaml
//! format: json
//! version: "3.1"
//! inline-local: true
//! case: camel
//! filter:
//!   tags: ["pets"]
//! ```
//!
//! Every key is optional. Command-line values take precedence, see
//! [`TransformSettings::merge`].

use crate::filter::FilterCriteria;
use crate::formatter::IdentifierCase;
use crate::pipeline::TransformOptions;
use oaslice_common::{Format, OpenApiError, Result, SpecVersion};
use oaslice_parser::collection::CollectionParser;
use oaslice_parser::manifest::{split_manifest_ref, DependencySelection, ManifestParser};
use oaslice_parser::ReaderSettings;
use oaslice_writer::WriterSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TransformSettings {
    /// `json` or `yaml`; taken from the input file extension when unset
    pub format: Option<String>,
    /// Output version (`2.0`, `3.0`, `3.1`); the input's version when unset
    pub version: Option<String>,
    pub terse: bool,
    pub inline_local: bool,
    pub inline_external: bool,
    pub load_external: bool,
    pub case: Option<IdentifierCase>,
    pub filter: FilterSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FilterSettings {
    pub operation_ids: Vec<String>,
    pub tags: Vec<String>,
    /// Postman collection whose requests select operations
    pub collection: Option<PathBuf>,
    /// API manifest, `path[#dependency]`
    pub manifest: Option<String>,
    /// Dependency used when the manifest reference names none
    pub manifest_selection: DependencySelection,
}

impl TransformSettings {
    /// Load settings from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            OpenApiError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read settings file {}: {}", path.display(), e),
            ))
        })?;
        let settings: TransformSettings = serde_yaml::from_str(&content)
            .map_err(|e| OpenApiError::Settings(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded settings file");
        Ok(settings)
    }

    /// Layer `overrides` on top of these settings
    ///
    /// Set values and raised flags of `overrides` win; a filter given in
    /// `overrides` replaces the whole filter section.
    pub fn merge(self, overrides: TransformSettings) -> Self {
        let filter = if overrides.filter == FilterSettings::default() {
            self.filter
        } else {
            overrides.filter
        };
        Self {
            format: overrides.format.or(self.format),
            version: overrides.version.or(self.version),
            terse: overrides.terse || self.terse,
            inline_local: overrides.inline_local || self.inline_local,
            inline_external: overrides.inline_external || self.inline_external,
            load_external: overrides.load_external || self.load_external,
            case: overrides.case.or(self.case),
            filter,
        }
    }

    pub fn reader_settings(&self, input: Option<&Path>) -> ReaderSettings {
        ReaderSettings {
            load_external_refs: self.load_external,
            base_location: input.map(|path| path.display().to_string()),
            ..Default::default()
        }
    }

    /// Writer settings; the format falls back to the input file extension
    pub fn writer_settings(&self, input: Option<&Path>) -> Result<WriterSettings> {
        let format = match (&self.format, input) {
            (Some(format), _) => format.parse::<Format>()?,
            (None, Some(path)) => Format::from_path(path),
            (None, None) => Format::default(),
        };
        let version = self
            .version
            .as_deref()
            .map(str::parse::<SpecVersion>)
            .transpose()?;
        Ok(WriterSettings {
            format,
            version,
            inline_local: self.inline_local,
            inline_external: self.inline_external,
            terse: self.terse,
        })
    }

    /// Filter criteria, importing the collection or manifest when one is named
    ///
    /// Conflicting modes are refused before any file is read.
    pub fn filter_criteria(&self) -> Result<FilterCriteria> {
        let filter = &self.filter;
        let mut modes = Vec::new();
        if !filter.operation_ids.is_empty() {
            modes.push("operation ids");
        }
        if !filter.tags.is_empty() {
            modes.push("tags");
        }
        if filter.collection.is_some() {
            modes.push("collection");
        }
        if filter.manifest.is_some() {
            modes.push("manifest");
        }
        if modes.len() > 1 {
            return Err(OpenApiError::ConflictingFilterCriteria(format!(
                "filter by only one of operation ids, tags, collection or manifest (got {})",
                modes.join(" and ")
            )));
        }

        if !filter.operation_ids.is_empty() {
            return Ok(FilterCriteria::by_operation_ids(filter.operation_ids.clone()));
        }
        if !filter.tags.is_empty() {
            return Ok(FilterCriteria::by_tags(filter.tags.clone()));
        }
        if let Some(path) = &filter.collection {
            let request_urls = CollectionParser::from_file(path)?.request_urls();
            return Ok(FilterCriteria::by_request_urls(request_urls));
        }
        if let Some(reference) = &filter.manifest {
            let (path, dependency) = split_manifest_ref(reference);
            let selection = match dependency {
                Some(name) => DependencySelection::Named(name.to_string()),
                None => filter.manifest_selection.clone(),
            };
            let selected = ManifestParser::from_file(path)?.select(&selection)?;
            debug!(dependencies = ?selected.names, "selected manifest dependencies");
            return Ok(FilterCriteria::by_request_urls(selected.request_urls));
        }
        Ok(FilterCriteria::default())
    }

    /// Everything a transform of `input` needs
    pub fn options(&self, input: Option<&Path>) -> Result<TransformOptions> {
        Ok(TransformOptions {
            reader: self.reader_settings(input),
            writer: self.writer_settings(input)?,
            filter: self.filter_criteria()?,
            identifier_case: self.case,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_load_settings_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oaslice.yaml");
        fs::write(
            &path,
            "format: json\nversion: '3.1'\ninline-local: true\ncase: snake\nfilter:\n  tags: [pets]\n",
        )
        .unwrap();

        let settings = TransformSettings::load(&path).unwrap();
        assert_eq!(settings.format.as_deref(), Some("json"));
        assert_eq!(settings.case, Some(IdentifierCase::Snake));
        assert!(settings.inline_local);
        assert!(!settings.terse);
        assert_eq!(settings.filter.tags, vec!["pets"]);

        let writer = settings.writer_settings(None).unwrap();
        assert_eq!(writer.format, Format::Json);
        assert_eq!(writer.version, Some(SpecVersion::V3_1));
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "terse: maybe\n").unwrap();
        let err = TransformSettings::load(&path).unwrap_err();
        assert!(matches!(err, OpenApiError::Settings(_)));
    }

    #[test]
    fn test_missing_settings_file() {
        let err = TransformSettings::load("/nonexistent/oaslice.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read settings file"));
    }

    #[test]
    fn test_command_line_overrides_file() {
        let file = TransformSettings {
            format: Some("yaml".to_string()),
            terse: true,
            filter: FilterSettings {
                tags: vec!["pets".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = TransformSettings {
            format: Some("json".to_string()),
            ..Default::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.format.as_deref(), Some("json"));
        assert!(merged.terse);
        assert_eq!(merged.filter.tags, vec!["pets"]);
    }

    #[test]
    fn test_format_follows_input_extension() {
        let settings = TransformSettings::default();
        let json = settings
            .writer_settings(Some(Path::new("petstore.json")))
            .unwrap();
        assert_eq!(json.format, Format::Json);
        let yaml = settings
            .writer_settings(Some(Path::new("petstore.yml")))
            .unwrap();
        assert_eq!(yaml.format, Format::Yaml);
    }

    #[test]
    fn test_conflicting_filters_fail_before_import() {
        let settings = TransformSettings {
            filter: FilterSettings {
                tags: vec!["pets".to_string()],
                collection: Some(PathBuf::from("/nonexistent/collection.json")),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = settings.filter_criteria().unwrap_err();
        assert!(matches!(err, OpenApiError::ConflictingFilterCriteria(_)));
    }

    #[test]
    fn test_manifest_filter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("apimanifest.json");
        fs::write(
            &path,
            r#"{
                "apiDependencies": {
                    "pets": {
                        "apiDescriptionUrl": "https://example.com/pets.yaml",
                        "requests": [{"uriTemplate": "/pets", "method": "GET"}]
                    },
                    "store": {
                        "apiDescriptionUrl": "https://example.com/store.yaml",
                        "requests": [{"uriTemplate": "/orders", "method": "POST"}]
                    }
                }
            }"#,
        )
        .unwrap();

        let settings = TransformSettings {
            filter: FilterSettings {
                manifest: Some(format!("{}#store", path.display())),
                ..Default::default()
            },
            ..Default::default()
        };
        let criteria = settings.filter_criteria().unwrap();
        let request_urls = criteria.request_urls.unwrap();
        assert_eq!(request_urls.keys().collect::<Vec<_>>(), vec!["/orders"]);
    }
}
