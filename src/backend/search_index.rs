//! Search-index adapter.
//!
//! The index is queried page by page until the cumulative row count reaches
//! the total the index reports. A failed page stops paging; rows already
//! fetched are kept and the failure becomes a [`Notice`] rather than an error.
//!
//! Documents come back in two shapes: fields at the top level, or nested under
//! a `solr_doc` key. Multi-valued fields usually hold a single value wrapped in
//! an array. [`field`] hides both quirks.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{BackendKind, SearchIndexConfig};
use crate::error::Result;
use crate::namespaces::{models, object_uri};
use crate::query::{AccessClauses, IssueScope};

use super::{IssueSource, Notice, RawRow, RowBatch};

lazy_static! {
    static ref QUERY_SPECIAL_CHARS: Regex =
        Regex::new(r#"([+\-&|!(){}\[\]^"~*?:\\/])"#).unwrap();
}

/// Key under which some result rows nest their document fields.
pub const NESTED_DOCUMENT_KEY: &str = "solr_doc";

/// Query options understood by the search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Rows per page.
    pub rows: usize,
    /// Upper bound on returned rows.
    pub limit: usize,
    /// Comma-separated list of fields to return.
    pub fl: String,
    /// Offset of the first row.
    pub start: usize,
    /// Highlighting.
    pub hl: bool,
    /// Faceting.
    pub facet: bool,
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
    /// Total number of matching documents.
    #[serde(rename = "numFound")]
    pub num_found: usize,
    /// Documents on this page.
    #[serde(default, alias = "docs")]
    pub objects: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchResponse,
}

impl SearchResponse {
    /// Parses a `{"response": {"numFound": .., "objects": [..]}}` envelope.
    ///
    /// A plain Solr `docs` array is accepted in place of `objects`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NewspaperError::Json`] if the envelope is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        let envelope: SearchEnvelope = serde_json::from_str(json)?;
        Ok(envelope.response)
    }
}

/// A Solr-style search index.
pub trait SearchIndex {
    /// Runs one page of a query.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NewspaperError::Query`] if the request fails.
    fn search(&self, query: &str, params: &SearchParams) -> Result<SearchResponse>;
}

/// Escapes query-syntax characters in a value.
#[must_use]
pub fn escape_query_value(value: &str) -> String {
    QUERY_SPECIAL_CHARS.replace_all(value, r"\$1").into_owned()
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => items.first().and_then(scalar),
        Value::Null | Value::Object(_) => None,
    }
}

/// Reads a field from a result row as a single string.
///
/// The top level of the row is checked first, then the nested document. A
/// top-level `null` or empty array counts as missing. Arrays yield their first
/// element.
#[must_use]
pub fn field(row: &Value, name: &str) -> Option<String> {
    row.get(name).and_then(scalar).or_else(|| {
        row.get(NESTED_DOCUMENT_KEY)
            .and_then(|doc| doc.get(name))
            .and_then(scalar)
    })
}

/// Builds the index query for a scope.
#[must_use]
pub fn issue_search_query(scope: &IssueScope, config: &SearchIndexConfig) -> String {
    let model = format!(
        "{}:{}",
        config.model_field,
        escape_query_value(&object_uri(models::ISSUE))
    );

    match scope {
        IssueScope::Newspaper(newspaper) => format!(
            "{}:({} OR {}) AND {model}",
            config.parent_field,
            escape_query_value(&object_uri(newspaper)),
            escape_query_value(newspaper),
        ),
        IssueScope::NeedingDates => format!("{model} AND -{}:[* TO *]", config.date_field),
    }
}

/// Lists issues by paging through the search index.
///
/// The access-control fragments are graph patterns and do not apply here; the
/// index enforces its own visibility rules.
#[derive(Clone, Copy)]
pub struct SearchIndexSource<'a> {
    index: &'a dyn SearchIndex,
    config: &'a SearchIndexConfig,
}

impl std::fmt::Debug for SearchIndexSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndexSource")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> SearchIndexSource<'a> {
    /// Creates an adapter over the index.
    #[must_use]
    pub fn new(index: &'a dyn SearchIndex, config: &'a SearchIndexConfig) -> Self {
        Self { index, config }
    }

    fn params(&self, start: usize) -> SearchParams {
        SearchParams {
            rows: self.config.batch_size,
            limit: self.config.batch_size,
            fl: self.config.field_list(),
            start,
            hl: false,
            facet: false,
        }
    }
}

impl IssueSource for SearchIndexSource<'_> {
    fn kind(&self) -> BackendKind {
        BackendKind::SearchIndex
    }

    fn fetch_issue_rows(&self, scope: &IssueScope, _access: &AccessClauses) -> Result<RowBatch> {
        let query = issue_search_query(scope, self.config);
        let mut batch = RowBatch::default();
        let mut start = 0;

        loop {
            let page = match self.index.search(&query, &self.params(start)) {
                Ok(page) => page,
                Err(e) => {
                    warn!(start, error = %e, "search index page failed, keeping partial results");
                    batch
                        .notices
                        .push(Notice::new(format!("Error searching the index: {e}")));
                    break;
                },
            };

            let returned = page.objects.len();
            start += returned;
            batch
                .rows
                .extend(page.objects.into_iter().map(RawRow::SearchIndex));
            debug!(start, total = page.num_found, "fetched search index page");

            if start >= page.num_found || returned == 0 {
                break;
            }
        }

        Ok(batch)
    }
}
