//! Document services for oaslice
//!
//! Everything here works on the [`Document`](oaslice_common::Document) model
//! through the generic walker:
//!
//! - [`filter`]: predicate-based slicing into a referentially closed copy
//! - [`closure`]: component reachability by identity
//! - [`stats`]: node counts
//! - [`formatter`]: operation id case rewriting
//! - [`pipeline`]: read, filter, format and write in one call
//! - [`settings`]: the YAML settings file behind the command line
//!
//! ## Example
//!
//! ```rust,ignore
//! use oaslice_common::CancellationToken;
//! use oaslice_services::{transform, FilterCriteria, TransformOptions};
//!
//! let options = TransformOptions {
//!     filter: FilterCriteria::by_operation_ids(["getPet"]),
//!     ..Default::default()
//! };
//! let output = transform(&text, &options, &CancellationToken::new())?;
//! for diagnostic in output.diagnostics.warnings() {
//!     eprintln!("{}", diagnostic);
//! }
//! ```

pub mod closure;
pub mod filter;
pub mod formatter;
pub mod pipeline;
pub mod settings;
pub mod stats;
pub mod url_match;

pub use filter::{filter_document, FilterCriteria, FilterResult, OperationPredicate};
pub use formatter::{CaseFormatter, IdentifierCase};
pub use pipeline::{transform, Inspection, TransformOptions, TransformOutput, Transformer};
pub use settings::{FilterSettings, TransformSettings};
pub use stats::{Stats, StatsVisitor};
pub use url_match::UrlMatcher;
