//! Request collection importer
//!
//! Reads a Postman-style collection (v2.x JSON) and extracts the request
//! URLs and methods it exercises, the input of the request-URL filter.
//!
//! ## Collection Format
//!
//! Requests live in nested `item` arrays; folders are items without a
//! `request`. A request URL is either a string or an object whose `raw`
//! member holds the full URL.
//!
//! ## Usage
//! ```rust,ignore
//! use oaslice_parser::collection::CollectionParser;
//!
//! let parser = CollectionParser::from_file("graph.postman_collection.json")?;
//! let request_urls = parser.request_urls();
//! ```

mod parser;
mod types;

pub use parser::CollectionParser;
pub use types::*;
