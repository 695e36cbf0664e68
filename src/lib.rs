//! # xml-structure
//!
//! Streaming structure inspector for XML and HTML documents.
//!
//! A scan reads a document once and folds its element events into a
//! counting tree: one node per distinct tag path, holding how many times the
//! tag occurred there and how many of those instances carried each
//! attribute. The tree renders as an indented overview, a detailed view with
//! attribute counts, or a JSON summary.
//!
//! ## Features
//!
//! - Bounded-memory XML scanning; closed elements are released as the scan
//!   goes
//! - Namespace-aware grouping (`{uri}local`), shown with the document's
//!   own prefixes
//! - Lenient HTML mode for documents that are not well-formed XML
//! - Deterministic output, independent of the order tags appear in
//! - Resource limits on depth, attributes and buffered input
//!
//! ## Example
//!
//! ```rust,ignore
//! use xml_structure::{render, RenderMode, ScanOptions, Scanner};
//!
//! let schema = Scanner::new(ScanOptions::default()).scan_file("feed.xml")?;
//! print!("{}", render(&schema, RenderMode::Overview));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Names and the counting tree
pub mod namespaces;
pub mod schema;

// Event streams
pub mod reducer;
pub mod sources;

// Input and output
pub mod loaders;
pub mod progress;
pub mod report;

// Façade
pub mod scanner;

// Re-exports for convenience
pub use error::{Error, Result};
pub use limits::Limits;
pub use namespaces::TagIdentity;
pub use report::{render, summarize, write_report, AttributeSummary, ElementSummary, RenderMode};
pub use scanner::{ParseMode, ScanOptions, Scanner};
pub use schema::{AttributeCount, SchemaNode};

/// Version of the xml-structure library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XML namespace, bound to the `xml` prefix in every document
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

