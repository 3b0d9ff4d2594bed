#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # Newspaper metadata helpers
//!
//! Metadata access for digitized newspapers stored in a Fedora-style object
//! repository: resolving the newspaper → issue → page hierarchy, reading and
//! writing issue publication dates, listing a newspaper's issues from either
//! the SPARQL resource index or a search index, and grouping issues by date
//! for calendar browsing.
//!
//! ## Quick Start
//!
//! ### Listing the issues of a newspaper
//!
//! ```ignore
//! use newspaper_metadata::{list_issues, IssueScope, NewspaperConfig, NoAccessFilter};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = NewspaperConfig::default();
//! let listing = list_issues(
//!     &config,
//!     &triplestore,
//!     &search_index,
//!     &IssueScope::Newspaper("news:1".into()),
//!     &NoAccessFilter,
//! )?;
//!
//! for (year, months) in listing.by_date() {
//!     println!("{year}: {} months", months.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Editing an issue date
//!
//! ```ignore
//! use chrono::NaiveDate;
//! use newspaper_metadata::{mods, relationships};
//!
//! let date = NaiveDate::from_ymd_opt(1921, 3, 4).unwrap();
//! relationships::set_date_issued(&mut issue, date)?;
//! if !mods::write_date(&mut issue, date) {
//!     eprintln!("MODS record not updated");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`relationships`] - Parent/sequence/date relationships of single objects
//! - [`query`] - SPARQL query construction with access-control fragments
//! - [`backend`] - Triplestore and search-index adapters
//! - [`normalize`] - Uniform issue records and date fallback diagnostics
//! - [`grouping`] - Identifier maps, calendar grouping and navigation
//! - [`issues`] - Issue and page listings
//! - [`mods`] - Issue dates in MODS records
//! - [`object`] - Repository object contract and in-memory objects
//! - [`rels_ext`] - RELS-EXT RDF codec
//! - [`config`] - Listing configuration
//! - [`error`] - Error types and result type

pub mod backend;
pub mod config;
pub mod dates;
pub mod error;
pub mod grouping;
pub mod issues;
pub mod mods;
pub mod namespaces;
pub mod normalize;
pub mod object;
pub mod query;
pub mod relationships;
pub mod rels_ext;
pub mod xml_tree;

pub use backend::{
    select_source, IssueSource, Notice, RawRow, SearchIndex, SearchIndexSource, SearchParams,
    SearchResponse, SparqlEndpoint, SparqlRow, TriplestoreSource,
};
pub use config::{BackendKind, NewspaperConfig, SearchIndexConfig};
pub use error::{NewspaperError, Result};
pub use grouping::{group_by_date, next_sequence, to_identifier_map, GroupedIssues, IssueNavigation};
pub use issues::{list_issues, list_issues_from, list_pages, IssueListing, PageRecord};
pub use normalize::{Diagnostic, DiagnosticKind, IssueRecord, Normalized, Normalizer};
pub use object::{
    Datastream, MemoryDatastream, MemoryObject, Relationship, RelationshipList, Relationships,
    RepositoryObject,
};
pub use query::{AccessFilter, IssueScope, NoAccessFilter};
