//! Resource-index (SPARQL) adapter.

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::config::BackendKind;
use crate::error::Result;
use crate::namespaces::object_identifier;
use crate::query::{issue_query, AccessClauses, IssueScope};

use super::{IssueSource, RawRow, RowBatch};

/// Variable bindings of one result row, in projection order.
///
/// Resource bindings hold bare object identifiers; literal bindings hold their
/// lexical value. Unbound variables are absent.
pub type SparqlRow = IndexMap<String, String>;

/// A SPARQL endpoint over the resource index.
pub trait SparqlEndpoint {
    /// Runs a `SELECT` query and returns every row.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NewspaperError::Query`] if the endpoint rejects the
    /// query or cannot be reached.
    fn select(&self, query: &str) -> Result<Vec<SparqlRow>>;
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    results: SparqlBindings,
}

#[derive(Debug, Deserialize)]
struct SparqlBindings {
    bindings: Vec<IndexMap<String, SparqlValue>>,
}

#[derive(Debug, Deserialize)]
struct SparqlValue {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

/// Parses an `application/sparql-results+json` document into rows.
///
/// `info:fedora/` is stripped from URI bindings.
///
/// # Errors
///
/// Returns [`crate::NewspaperError::Json`] if the document is not a SPARQL
/// results document.
pub fn parse_sparql_results(json: &str) -> Result<Vec<SparqlRow>> {
    let parsed: SparqlResults = serde_json::from_str(json)?;

    Ok(parsed
        .results
        .bindings
        .into_iter()
        .map(|binding| {
            binding
                .into_iter()
                .map(|(name, term)| {
                    let value = if term.kind == "uri" {
                        object_identifier(&term.value).to_string()
                    } else {
                        term.value
                    };
                    (name, value)
                })
                .collect()
        })
        .collect())
}

/// Lists issues with a single ordered query against the resource index.
#[derive(Clone, Copy)]
pub struct TriplestoreSource<'a> {
    endpoint: &'a dyn SparqlEndpoint,
}

impl std::fmt::Debug for TriplestoreSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriplestoreSource").finish_non_exhaustive()
    }
}

impl<'a> TriplestoreSource<'a> {
    /// Creates an adapter over the endpoint.
    #[must_use]
    pub fn new(endpoint: &'a dyn SparqlEndpoint) -> Self {
        Self { endpoint }
    }
}

impl IssueSource for TriplestoreSource<'_> {
    fn kind(&self) -> BackendKind {
        BackendKind::Triplestore
    }

    fn fetch_issue_rows(&self, scope: &IssueScope, access: &AccessClauses) -> Result<RowBatch> {
        let query = issue_query(scope, access);
        let rows = self.endpoint.select(&query)?;
        debug!(rows = rows.len(), "resource index returned issue rows");

        Ok(RowBatch {
            rows: rows.into_iter().map(RawRow::Triplestore).collect(),
            notices: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const RESULTS: &str = r#"{
        "head": {"vars": ["object", "label", "sequence", "issued"]},
        "results": {"bindings": [
            {
                "object": {"type": "uri", "value": "info:fedora/news:2"},
                "label": {"type": "literal", "value": "March 4, 1921"},
                "sequence": {"type": "literal", "value": "1"},
                "issued": {"type": "literal", "value": "1921-03-04"}
            },
            {
                "object": {"type": "uri", "value": "info:fedora/news:3"},
                "label": {"type": "literal", "value": "Undated"},
                "sequence": {"type": "typed-literal", "value": "2"}
            }
        ]}
    }"#;

    struct Recording {
        queries: RefCell<Vec<String>>,
    }

    impl SparqlEndpoint for Recording {
        fn select(&self, query: &str) -> Result<Vec<SparqlRow>> {
            self.queries.borrow_mut().push(query.to_string());
            parse_sparql_results(RESULTS)
        }
    }

    #[test]
    fn test_parse_sparql_results() {
        let rows = parse_sparql_results(RESULTS).expect("results should parse");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("object").map(String::as_str), Some("news:2"));
        assert_eq!(rows[0].get("issued").map(String::as_str), Some("1921-03-04"));
        assert_eq!(rows[1].get("sequence").map(String::as_str), Some("2"));
        assert!(rows[1].get("issued").is_none());
    }

    #[test]
    fn test_parse_rejects_other_json() {
        assert!(parse_sparql_results(r#"{"response": {}}"#).is_err());
    }

    #[test]
    fn test_single_query_per_listing() {
        let endpoint = Recording {
            queries: RefCell::new(Vec::new()),
        };
        let source = TriplestoreSource::new(&endpoint);

        let batch = source
            .fetch_issue_rows(
                &IssueScope::Newspaper("news:1".into()),
                &AccessClauses::default(),
            )
            .expect("listing should succeed");

        assert_eq!(batch.rows.len(), 2);
        assert!(batch.notices.is_empty());
        assert!(matches!(batch.rows[0], RawRow::Triplestore(_)));
        let queries = endpoint.queries.borrow();
        assert_eq!(queries.len(), 1);
        assert!(queries[0].contains("ORDER BY ?sequence"));
    }
}
