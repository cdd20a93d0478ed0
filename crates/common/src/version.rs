//! OpenAPI versions and serialization formats

use crate::OpenApiError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// OpenAPI / Swagger specification version
///
/// The model is version-agnostic; only the reader grammars and the writer
/// are parameterized by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum SpecVersion {
    /// Swagger 2.0
    V2_0,
    /// OpenAPI 3.0.x
    V3_0,
    /// OpenAPI 3.1.x
    #[default]
    V3_1,
}

impl SpecVersion {
    /// Map the value of a document's `openapi` / `swagger` field
    pub fn from_declared(declared: &str) -> Option<Self> {
        let declared = declared.trim();
        if declared == "2.0" || declared == "2" {
            Some(SpecVersion::V2_0)
        } else if declared == "3.0" || declared.starts_with("3.0.") {
            Some(SpecVersion::V3_0)
        } else if declared == "3.1" || declared.starts_with("3.1.") {
            Some(SpecVersion::V3_1)
        } else {
            None
        }
    }

    /// Version string written into the root `openapi` / `swagger` field
    pub fn declared(&self) -> &'static str {
        match self {
            SpecVersion::V2_0 => "2.0",
            SpecVersion::V3_0 => "3.0.4",
            SpecVersion::V3_1 => "3.1.1",
        }
    }

    /// Short form, e.g. `3.1`
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecVersion::V2_0 => "2.0",
            SpecVersion::V3_0 => "3.0",
            SpecVersion::V3_1 => "3.1",
        }
    }

    pub fn is_v2(&self) -> bool {
        matches!(self, SpecVersion::V2_0)
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SpecVersion {
    type Err = OpenApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().trim_start_matches('v') {
            "2" | "2.0" => Ok(SpecVersion::V2_0),
            "3" | "3.0" => Ok(SpecVersion::V3_0),
            "3.1" => Ok(SpecVersion::V3_1),
            other => SpecVersion::from_declared(other)
                .ok_or_else(|| OpenApiError::InvalidVersion(s.to_string())),
        }
    }
}

/// Text syntax of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    Json,
    #[default]
    Yaml,
}

impl Format {
    /// Guess the syntax from the first significant character
    ///
    /// JSON documents open with `{` or `[`; everything else, including
    /// empty input, is treated as YAML.
    pub fn sniff(text: &str) -> Self {
        let first = text
            .trim_start_matches('\u{feff}')
            .chars()
            .find(|c| !c.is_whitespace());
        match first {
            Some('{') | Some('[') => Format::Json,
            _ => Format::Yaml,
        }
    }

    /// Guess the syntax from a file name; only `.json` maps to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "JSON"),
            Format::Yaml => write!(f, "YAML"),
        }
    }
}

impl FromStr for Format {
    type Err = OpenApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(OpenApiError::Settings(format!("unknown format '{}'", other))),
        }
    }
}
