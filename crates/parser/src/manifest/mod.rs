//! API manifest importer
//!
//! An API manifest lists the API dependencies of an application; each
//! dependency names its description document (`apiDescriptionUrl`) and the
//! requests the application makes against it. Those requests feed the
//! request-URL filter.
//!
//! ## Usage
//! ```rust,ignore
//! use oaslice_parser::manifest::{DependencySelection, ManifestParser};
//!
//! let parser = ManifestParser::from_file("apimanifest.json")?;
//! let dependency = parser.select(&DependencySelection::First)?;
//! println!("{:?} {}", dependency.description_url, dependency.request_urls.len());
//! ```

mod parser;
mod types;

pub use parser::{split_manifest_ref, DependencySelection, ManifestParser, SelectedDependency};
pub use types::*;
