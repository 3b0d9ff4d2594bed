//! Issue and page listings.
//!
//! [`list_issues`] ties the pieces together: it asks the access-control
//! collaborator for its fragments once, fetches rows from the chosen backend,
//! and normalizes them. A listing never fails because of a single bad record;
//! bad dates become [`Diagnostic`]s and search-index trouble becomes
//! [`Notice`]s.

use serde::Serialize;
use tracing::debug;

use crate::backend::{select_source, IssueSource, Notice, SearchIndex, SparqlEndpoint};
use crate::config::NewspaperConfig;
use crate::error::Result;
use crate::grouping::{group_by_date, to_identifier_map, GroupedIssues};
use crate::normalize::{Diagnostic, IssueRecord, Normalizer};
use crate::query::{
    page_query, AccessClauses, AccessFilter, IssueScope, LABEL_VAR, OBJECT_VAR, SEQUENCE_VAR,
};

/// Normalized issues of one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueListing {
    /// Issues in backend order.
    pub issues: Vec<IssueRecord>,
    /// Warnings raised while normalizing.
    pub diagnostics: Vec<Diagnostic>,
    /// Messages for the end user.
    pub notices: Vec<Notice>,
}

impl IssueListing {
    /// Issues keyed by identifier.
    #[must_use]
    pub fn by_identifier(&self) -> indexmap::IndexMap<String, IssueRecord> {
        to_identifier_map(&self.issues)
    }

    /// Issues grouped by year, month and day.
    #[must_use]
    pub fn by_date(&self) -> GroupedIssues {
        group_by_date(&self.issues)
    }
}

/// A page of an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    /// Object identifier.
    pub identifier: String,
    /// Object label.
    pub label: String,
    /// Position within the issue.
    pub sequence: String,
}

/// Lists issues from an already chosen backend.
///
/// # Errors
///
/// Returns the backend's error when it treats a failure as fatal (the
/// triplestore adapter does; the search-index adapter does not).
pub fn list_issues_from(
    source: &dyn IssueSource,
    config: &NewspaperConfig,
    scope: &IssueScope,
    access: &dyn AccessFilter,
) -> Result<IssueListing> {
    let clauses = AccessClauses::collect(access, &config.access_mode);
    let batch = source.fetch_issue_rows(scope, &clauses)?;
    let normalizer = Normalizer::new(&config.search);

    let mut listing = IssueListing {
        issues: Vec::with_capacity(batch.rows.len()),
        diagnostics: Vec::new(),
        notices: batch.notices,
    };
    for row in &batch.rows {
        let normalized = normalizer.normalize(row);
        listing.issues.push(normalized.record);
        listing.diagnostics.extend(normalized.diagnostic);
    }

    debug!(
        backend = %source.kind(),
        issues = listing.issues.len(),
        diagnostics = listing.diagnostics.len(),
        "listed issues"
    );
    Ok(listing)
}

/// Lists issues using the backend named by the configuration.
///
/// # Errors
///
/// See [`list_issues_from`].
pub fn list_issues(
    config: &NewspaperConfig,
    triplestore: &dyn SparqlEndpoint,
    index: &dyn SearchIndex,
    scope: &IssueScope,
    access: &dyn AccessFilter,
) -> Result<IssueListing> {
    let source = select_source(config, triplestore, index);
    list_issues_from(source.as_ref(), config, scope, access)
}

/// Lists the pages of an issue in sequence order.
///
/// # Errors
///
/// Returns the endpoint's error if the query fails.
pub fn list_pages(
    endpoint: &dyn SparqlEndpoint,
    config: &NewspaperConfig,
    issue: &str,
    access: &dyn AccessFilter,
) -> Result<Vec<PageRecord>> {
    let clauses = AccessClauses::collect(access, &config.access_mode);
    let rows = endpoint.select(&page_query(issue, &clauses))?;

    Ok(rows
        .into_iter()
        .map(|mut row| PageRecord {
            identifier: row.swap_remove(OBJECT_VAR).unwrap_or_default(),
            label: row.swap_remove(LABEL_VAR).unwrap_or_default(),
            sequence: row.swap_remove(SEQUENCE_VAR).unwrap_or_default(),
        })
        .collect())
}
