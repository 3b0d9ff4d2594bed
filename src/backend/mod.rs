//! Backend adapters for issue listings.
//!
//! Issues can be listed from two places: the SPARQL resource index or a
//! Solr-style search index. Both adapters implement [`IssueSource`] and hand
//! back [`RawRow`]s, which [`crate::normalize::Normalizer`] turns into uniform
//! issue records. The adapter is chosen once per call from the configuration
//! with [`select_source`].
//!
//! # Example
//!
//! ```ignore
//! use newspaper_metadata::backend::select_source;
//! use newspaper_metadata::config::NewspaperConfig;
//! use newspaper_metadata::query::{AccessClauses, IssueScope};
//!
//! let config = NewspaperConfig::default();
//! let source = select_source(&config, &triplestore, &index);
//! let batch = source.fetch_issue_rows(
//!     &IssueScope::Newspaper("news:1".into()),
//!     &AccessClauses::default(),
//! )?;
//! ```

pub mod search_index;
pub mod triplestore;

use serde_json::Value;

use crate::config::{BackendKind, NewspaperConfig};
use crate::error::Result;
use crate::query::{AccessClauses, IssueScope};

pub use search_index::{SearchIndex, SearchIndexSource, SearchParams, SearchResponse};
pub use triplestore::{SparqlEndpoint, SparqlRow, TriplestoreSource};

/// One unnormalized result row, tagged with the backend that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRow {
    /// Variable bindings from the resource index.
    Triplestore(SparqlRow),
    /// A search-index document, possibly wrapping its fields under `solr_doc`.
    SearchIndex(Value),
}

impl RawRow {
    /// Returns the backend that produced this row.
    #[must_use]
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::Triplestore(_) => BackendKind::Triplestore,
            Self::SearchIndex(_) => BackendKind::SearchIndex,
        }
    }
}

/// Transient message meant for the end user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Message text.
    pub message: String,
}

impl Notice {
    /// Creates a notice.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Rows fetched for one listing, plus any notices raised while fetching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowBatch {
    /// Rows in backend order.
    pub rows: Vec<RawRow>,
    /// Messages for the end user.
    pub notices: Vec<Notice>,
}

/// A backend able to list issue rows.
pub trait IssueSource {
    /// Returns the backend kind.
    fn kind(&self) -> BackendKind;

    /// Fetches every issue row for the scope.
    ///
    /// # Errors
    ///
    /// Backends decide which failures are fatal. The triplestore adapter
    /// returns its query error; the search-index adapter never fails and
    /// reports problems as notices instead.
    fn fetch_issue_rows(&self, scope: &IssueScope, access: &AccessClauses) -> Result<RowBatch>;
}

/// Picks the adapter named by the configuration.
#[must_use]
pub fn select_source<'a>(
    config: &'a NewspaperConfig,
    triplestore: &'a dyn SparqlEndpoint,
    index: &'a dyn SearchIndex,
) -> Box<dyn IssueSource + 'a> {
    match config.backend {
        BackendKind::Triplestore => Box::new(TriplestoreSource::new(triplestore)),
        BackendKind::SearchIndex => Box::new(SearchIndexSource::new(index, &config.search)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NewspaperError;

    struct Unreachable;

    impl SparqlEndpoint for Unreachable {
        fn select(&self, _query: &str) -> Result<Vec<SparqlRow>> {
            Err(NewspaperError::Query("offline".into()))
        }
    }

    impl SearchIndex for Unreachable {
        fn search(&self, _query: &str, _params: &SearchParams) -> Result<SearchResponse> {
            Err(NewspaperError::Query("offline".into()))
        }
    }

    #[test]
    fn test_select_source_follows_config() {
        let config = NewspaperConfig::default();
        assert_eq!(
            select_source(&config, &Unreachable, &Unreachable).kind(),
            BackendKind::Triplestore
        );

        let config = NewspaperConfig::new().with_backend(BackendKind::SearchIndex);
        assert_eq!(
            select_source(&config, &Unreachable, &Unreachable).kind(),
            BackendKind::SearchIndex
        );
    }

    #[test]
    fn test_raw_row_kind() {
        assert_eq!(
            RawRow::Triplestore(SparqlRow::new()).kind(),
            BackendKind::Triplestore
        );
        assert_eq!(
            RawRow::SearchIndex(Value::Null).kind(),
            BackendKind::SearchIndex
        );
    }
}
