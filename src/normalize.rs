//! Normalization of backend rows into issue records.
//!
//! A bad or missing date never fails a listing: the record gets the current
//! time as a placeholder and a [`Diagnostic`] naming the issue is returned next
//! to it (and logged), so calendar views keep working while the problem stays
//! visible.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::backend::search_index::field;
use crate::backend::{RawRow, SparqlRow};
use crate::config::SearchIndexConfig;
use crate::dates::parse_issue_date;
use crate::query::{ISSUED_VAR, LABEL_VAR, OBJECT_VAR, SEQUENCE_VAR};

/// Sequence given to search-index rows without one.
pub const DEFAULT_SEQUENCE: &str = "0";

/// A newspaper issue in uniform shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    /// Object identifier.
    pub identifier: String,
    /// Object label.
    pub label: String,
    /// Ordinal within the newspaper; usually numeric but not guaranteed.
    pub sequence: String,
    /// Publication date.
    pub issued: DateTime<Utc>,
}

/// What went wrong with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// The backend returned no date.
    MissingDate,
    /// The backend returned a date that could not be parsed.
    UnparseableDate,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDate => write!(f, "missing date"),
            Self::UnparseableDate => write!(f, "unparseable date"),
        }
    }
}

/// Warning attached to a fallback value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Identifier of the offending object.
    pub identifier: String,
    /// Kind of problem.
    pub kind: DiagnosticKind,
    /// Offending value or error text.
    pub detail: String,
}

/// A normalized record and the warning raised while building it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// The record.
    pub record: IssueRecord,
    /// Set when `record.issued` is a placeholder.
    pub diagnostic: Option<Diagnostic>,
}

/// Resolves an issue date, substituting now on failure.
///
/// The returned diagnostic has already been logged.
#[must_use]
pub fn issued_or_now(identifier: &str, raw: Option<&str>) -> (DateTime<Utc>, Option<Diagnostic>) {
    let diagnostic = match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Diagnostic {
            identifier: identifier.to_string(),
            kind: DiagnosticKind::MissingDate,
            detail: String::new(),
        },
        Some(value) => match parse_issue_date(value) {
            Ok(issued) => return (issued, None),
            Err(e) => Diagnostic {
                identifier: identifier.to_string(),
                kind: DiagnosticKind::UnparseableDate,
                detail: e.to_string(),
            },
        },
    };

    warn!(
        identifier,
        kind = %diagnostic.kind,
        detail = %diagnostic.detail,
        "issue date unavailable, substituting now"
    );
    (Utc::now(), Some(diagnostic))
}

/// Turns backend rows into [`IssueRecord`]s.
#[derive(Debug, Clone)]
pub struct Normalizer<'a> {
    search: &'a SearchIndexConfig,
}

impl<'a> Normalizer<'a> {
    /// Creates a normalizer reading search-index rows with the given field names.
    #[must_use]
    pub fn new(search: &'a SearchIndexConfig) -> Self {
        Self { search }
    }

    /// Normalizes one row.
    #[must_use]
    pub fn normalize(&self, row: &RawRow) -> Normalized {
        match row {
            RawRow::Triplestore(bindings) => Self::normalize_triplestore(bindings),
            RawRow::SearchIndex(doc) => self.normalize_search(doc),
        }
    }

    fn normalize_triplestore(bindings: &SparqlRow) -> Normalized {
        let binding = |name: &str| bindings.get(name).cloned().unwrap_or_default();
        let identifier = binding(OBJECT_VAR);
        let (issued, diagnostic) =
            issued_or_now(&identifier, bindings.get(ISSUED_VAR).map(String::as_str));

        Normalized {
            record: IssueRecord {
                label: binding(LABEL_VAR),
                sequence: binding(SEQUENCE_VAR),
                identifier,
                issued,
            },
            diagnostic,
        }
    }

    fn normalize_search(&self, doc: &serde_json::Value) -> Normalized {
        let identifier = field(doc, &self.search.identifier_field).unwrap_or_default();
        let sequence = field(doc, &self.search.sequence_field)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SEQUENCE.to_string());
        let (issued, diagnostic) =
            issued_or_now(&identifier, field(doc, &self.search.date_field).as_deref());

        Normalized {
            record: IssueRecord {
                label: field(doc, &self.search.label_field).unwrap_or_default(),
                sequence,
                identifier,
                issued,
            },
            diagnostic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn sparql_row(pairs: &[(&str, &str)]) -> RawRow {
        RawRow::Triplestore(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_triplestore_row() {
        let config = SearchIndexConfig::default();
        let normalized = Normalizer::new(&config).normalize(&sparql_row(&[
            ("object", "news:2"),
            ("label", "Issue 2"),
            ("sequence", "2"),
            ("issued", "1921-03-04"),
        ]));

        assert!(normalized.diagnostic.is_none());
        assert_eq!(normalized.record.identifier, "news:2");
        assert_eq!(normalized.record.label, "Issue 2");
        assert_eq!(normalized.record.sequence, "2");
        assert_eq!(
            normalized.record.issued.date_naive(),
            NaiveDate::from_ymd_opt(1921, 3, 4).unwrap()
        );
    }

    #[test]
    fn test_triplestore_missing_date_falls_back() {
        let config = SearchIndexConfig::default();
        let before = Utc::now();
        let normalized = Normalizer::new(&config).normalize(&sparql_row(&[
            ("object", "news:3"),
            ("label", "Issue 3"),
            ("sequence", "3"),
        ]));

        assert!(normalized.record.issued >= before);
        let diagnostic = normalized.diagnostic.expect("diagnostic expected");
        assert_eq!(diagnostic.identifier, "news:3");
        assert_eq!(diagnostic.kind, DiagnosticKind::MissingDate);
    }

    #[test]
    fn test_search_row_nested_with_defaults() {
        let config = SearchIndexConfig::default();
        let doc = json!({
            "PID": "news:4",
            "solr_doc": {
                "fgs_label_s": ["Issue 4"],
                "mods_originInfo_dateIssued_dt": ["1899-12-31T00:00:00Z"]
            }
        });

        let normalized = Normalizer::new(&config).normalize(&RawRow::SearchIndex(doc));
        assert!(normalized.diagnostic.is_none());
        assert_eq!(normalized.record.label, "Issue 4");
        assert_eq!(normalized.record.sequence, DEFAULT_SEQUENCE);
        assert_eq!(
            normalized.record.issued.date_naive(),
            NaiveDate::from_ymd_opt(1899, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_search_row_bad_date() {
        let config = SearchIndexConfig::default();
        let doc = json!({
            "PID": "news:5",
            "RELS_EXT_isSequenceNumber_literal_ms": [""],
            "mods_originInfo_dateIssued_dt": "Spring 1900"
        });

        let normalized = Normalizer::new(&config).normalize(&RawRow::SearchIndex(doc));
        assert_eq!(normalized.record.sequence, DEFAULT_SEQUENCE);
        let diagnostic = normalized.diagnostic.expect("diagnostic expected");
        assert_eq!(diagnostic.identifier, "news:5");
        assert_eq!(diagnostic.kind, DiagnosticKind::UnparseableDate);
        assert!(diagnostic.detail.contains("Spring 1900"));
    }
}
