//! Single-valued relationship helpers for newspaper objects.
//!
//! Pages point at their issue with `isPageOf`, issues point at their newspaper
//! with `isMemberOf`, and both carry an `isSequenceNumber`. Issues also carry a
//! literal `dateIssued`. Relationships are multi-valued in the store; these
//! helpers use the first value the store returns.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::dates::{format_issue_date, parse_issue_date};
use crate::error::Result;
use crate::namespaces::{predicates, FEDORA_RELS_EXT, ISLANDORA_RELS_EXT};
use crate::object::RepositoryObject;

fn first_value(object: &dyn RepositoryObject, namespace: &str, predicate: &str) -> Option<String> {
    object
        .relationships()
        .get(namespace, predicate)
        .into_iter()
        .next()
        .map(|r| r.object)
}

/// Returns the issue a page belongs to.
#[must_use]
pub fn get_parent_issue(object: &dyn RepositoryObject) -> Option<String> {
    first_value(object, ISLANDORA_RELS_EXT, predicates::IS_PAGE_OF)
}

/// Returns the sequence number of a page or issue.
#[must_use]
pub fn get_sequence(object: &dyn RepositoryObject) -> Option<String> {
    first_value(object, ISLANDORA_RELS_EXT, predicates::IS_SEQUENCE_NUMBER)
}

/// Returns the newspaper an issue belongs to.
#[must_use]
pub fn get_parent_newspaper(object: &dyn RepositoryObject) -> Option<String> {
    first_value(object, FEDORA_RELS_EXT, predicates::IS_MEMBER_OF)
}

/// Returns the issue's publication date.
///
/// Never absent: a missing or unreadable `dateIssued` literal yields the
/// current time.
#[must_use]
pub fn get_date_issued(object: &dyn RepositoryObject) -> DateTime<Utc> {
    let literal = object
        .relationships()
        .get(ISLANDORA_RELS_EXT, predicates::DATE_ISSUED)
        .into_iter()
        .find(|r| r.is_literal);

    let Some(literal) = literal else {
        debug!(identifier = object.id(), "no dateIssued relationship, using now");
        return Utc::now();
    };

    match parse_issue_date(&literal.object) {
        Ok(date) => date,
        Err(e) => {
            warn!(
                identifier = object.id(),
                error = %e,
                "unreadable dateIssued relationship, using now"
            );
            Utc::now()
        },
    }
}

/// Replaces every `dateIssued` literal on the object with a single one.
///
/// # Errors
///
/// Store failures from the remove or add call are returned unchanged.
pub fn set_date_issued(object: &mut dyn RepositoryObject, date: NaiveDate) -> Result<()> {
    let relationships = object.relationships_mut();
    relationships.remove(ISLANDORA_RELS_EXT, predicates::DATE_ISSUED, None, true)?;
    relationships.add(
        ISLANDORA_RELS_EXT,
        predicates::DATE_ISSUED,
        &format_issue_date(date),
        true,
    )
}
