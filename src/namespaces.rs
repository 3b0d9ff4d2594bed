//! Namespace, predicate and content-model constants.
//!
//! Relationship namespaces follow the Fedora Commons RELS-EXT conventions;
//! the metadata document namespace is MODS v3.

/// Custom relationship namespace used for page/issue structure.
pub const ISLANDORA_RELS_EXT: &str = "http://islandora.ca/ontology/relsext#";

/// Generic container-relationship namespace (`isMemberOf` and friends).
pub const FEDORA_RELS_EXT: &str = "info:fedora/fedora-system:def/relations-external#";

/// Fedora object model namespace (`hasModel`, `label`).
pub const FEDORA_MODEL: &str = "info:fedora/fedora-system:def/model#";

/// MODS v3 namespace.
pub const MODS: &str = "http://www.loc.gov/mods/v3";

/// Prefix that turns a bare object identifier into a resource URI.
pub const FEDORA_URI_PREFIX: &str = "info:fedora/";

/// Datastream holding the issue's MODS record.
pub const MODS_DATASTREAM: &str = "MODS";

/// Relationship predicate local names.
pub mod predicates {
    /// Page -> issue.
    pub const IS_PAGE_OF: &str = "isPageOf";
    /// Ordinal position within the parent.
    pub const IS_SEQUENCE_NUMBER: &str = "isSequenceNumber";
    /// Issue -> newspaper (generic container namespace).
    pub const IS_MEMBER_OF: &str = "isMemberOf";
    /// Literal publication date of an issue.
    pub const DATE_ISSUED: &str = "dateIssued";
    /// Content model of an object.
    pub const HAS_MODEL: &str = "hasModel";
    /// Object label.
    pub const LABEL: &str = "label";
}

/// Content models of the newspaper hierarchy.
pub mod models {
    /// Newspaper title.
    pub const NEWSPAPER: &str = "islandora:newspaperCModel";
    /// Newspaper issue.
    pub const ISSUE: &str = "islandora:newspaperIssueCModel";
    /// Newspaper page.
    pub const PAGE: &str = "islandora:newspaperPageCModel";
}

/// Returns the resource URI for a bare object identifier.
///
/// Identifiers that already carry the prefix are returned unchanged.
#[must_use]
pub fn object_uri(identifier: &str) -> String {
    if identifier.starts_with(FEDORA_URI_PREFIX) {
        identifier.to_string()
    } else {
        format!("{FEDORA_URI_PREFIX}{identifier}")
    }
}

/// Strips the resource URI prefix from an object reference.
#[must_use]
pub fn object_identifier(uri: &str) -> &str {
    uri.strip_prefix(FEDORA_URI_PREFIX).unwrap_or(uri)
}
