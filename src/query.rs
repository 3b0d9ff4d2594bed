//! Graph-pattern query construction.
//!
//! Issue and page listings are SPARQL `SELECT`s over the resource index. An
//! access-control collaborator may contribute extra `OPTIONAL` patterns and
//! `FILTER` clauses; both are spliced into the `WHERE` block verbatim. The
//! fragments refer to the listed object as `?object`, so every query here binds
//! the listed object to that variable.

use std::fmt::Write;

use crate::namespaces::{
    models, object_uri, predicates, FEDORA_MODEL, FEDORA_RELS_EXT, ISLANDORA_RELS_EXT,
};

/// Variable bound to the listed object.
pub const OBJECT_VAR: &str = "object";
/// Variable bound to the object label.
pub const LABEL_VAR: &str = "label";
/// Variable bound to the sequence number.
pub const SEQUENCE_VAR: &str = "sequence";
/// Variable bound to the issue date.
pub const ISSUED_VAR: &str = "issued";

/// Source of access-control query fragments.
///
/// Implementations return complete clause strings such as
/// `OPTIONAL { ?object <...> ?viewer }` and `FILTER(...)`. The default
/// methods contribute nothing, which is also how a missing access-control
/// component behaves.
pub trait AccessFilter {
    /// Returns `OPTIONAL` patterns for the given access mode (e.g. `"view"`).
    fn query_optionals(&self, _mode: &str) -> Vec<String> {
        Vec::new()
    }

    /// Returns `FILTER` clauses.
    fn query_filters(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Access filter that restricts nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAccessFilter;

impl AccessFilter for NoAccessFilter {}

/// Access-control fragments fetched once for a single query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessClauses {
    /// `OPTIONAL` patterns.
    pub optionals: Vec<String>,
    /// `FILTER` clauses.
    pub filters: Vec<String>,
}

impl AccessClauses {
    /// Asks the collaborator for its fragments.
    #[must_use]
    pub fn collect(access: &dyn AccessFilter, mode: &str) -> Self {
        Self {
            optionals: access.query_optionals(mode),
            filters: access.query_filters(),
        }
    }
}

/// Which issues a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueScope {
    /// Issues that are members of the given newspaper.
    Newspaper(String),
    /// Issues of any newspaper that have no date-issued relationship yet.
    NeedingDates,
}

fn push_prefixes(query: &mut String) {
    writeln!(query, "PREFIX fedora-model: <{FEDORA_MODEL}>").ok();
    writeln!(query, "PREFIX fedora-rels-ext: <{FEDORA_RELS_EXT}>").ok();
    writeln!(query, "PREFIX islandora-rels-ext: <{ISLANDORA_RELS_EXT}>").ok();
}

fn push_access_clauses(query: &mut String, access: &AccessClauses) {
    for optional in &access.optionals {
        writeln!(query, "  {optional}").ok();
    }
    for filter in &access.filters {
        writeln!(query, "  {filter}").ok();
    }
}

/// Builds the issue listing query for a scope.
///
/// Rows bind `?object`, `?label`, `?sequence` and, when present, `?issued`,
/// and are ordered by sequence.
#[must_use]
pub fn issue_query(scope: &IssueScope, access: &AccessClauses) -> String {
    let mut query = String::new();
    push_prefixes(&mut query);

    writeln!(
        query,
        "SELECT DISTINCT ?{OBJECT_VAR} ?{LABEL_VAR} ?{SEQUENCE_VAR} ?{ISSUED_VAR}"
    )
    .ok();
    query.push_str("FROM <#ri>\nWHERE {\n");
    writeln!(
        query,
        "  ?{OBJECT_VAR} fedora-model:{} <{}> ;",
        predicates::HAS_MODEL,
        object_uri(models::ISSUE)
    )
    .ok();
    if let IssueScope::Newspaper(newspaper) = scope {
        writeln!(
            query,
            "          fedora-rels-ext:{} <{}> ;",
            predicates::IS_MEMBER_OF,
            object_uri(newspaper)
        )
        .ok();
    }
    writeln!(query, "          fedora-model:{} ?{LABEL_VAR} ;", predicates::LABEL).ok();
    writeln!(
        query,
        "          islandora-rels-ext:{} ?{SEQUENCE_VAR} .",
        predicates::IS_SEQUENCE_NUMBER
    )
    .ok();
    writeln!(
        query,
        "  OPTIONAL {{ ?{OBJECT_VAR} islandora-rels-ext:{} ?{ISSUED_VAR} }}",
        predicates::DATE_ISSUED
    )
    .ok();
    if *scope == IssueScope::NeedingDates {
        writeln!(query, "  FILTER(!BOUND(?{ISSUED_VAR}))").ok();
    }
    push_access_clauses(&mut query, access);
    query.push_str("}\n");
    writeln!(query, "ORDER BY ?{SEQUENCE_VAR}").ok();

    query
}

/// Builds the page listing query for an issue, ordered by sequence.
#[must_use]
pub fn page_query(issue: &str, access: &AccessClauses) -> String {
    let mut query = String::new();
    push_prefixes(&mut query);

    writeln!(query, "SELECT DISTINCT ?{OBJECT_VAR} ?{LABEL_VAR} ?{SEQUENCE_VAR}").ok();
    query.push_str("FROM <#ri>\nWHERE {\n");
    writeln!(
        query,
        "  ?{OBJECT_VAR} fedora-model:{} <{}> ;",
        predicates::HAS_MODEL,
        object_uri(models::PAGE)
    )
    .ok();
    writeln!(
        query,
        "          islandora-rels-ext:{} <{}> ;",
        predicates::IS_PAGE_OF,
        object_uri(issue)
    )
    .ok();
    writeln!(query, "          fedora-model:{} ?{LABEL_VAR} ;", predicates::LABEL).ok();
    writeln!(
        query,
        "          islandora-rels-ext:{} ?{SEQUENCE_VAR} .",
        predicates::IS_SEQUENCE_NUMBER
    )
    .ok();
    push_access_clauses(&mut query, access);
    query.push_str("}\n");
    writeln!(query, "ORDER BY ?{SEQUENCE_VAR}").ok();

    query
}
