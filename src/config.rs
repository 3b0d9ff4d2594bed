//! Configuration for issue listings.
//!
//! [`NewspaperConfig`] selects the listing backend and names the search-index
//! fields the search adapter reads. Field names differ between index schemas,
//! so each one is configurable independently.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of rows requested per search-index page.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Backend used to list issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// SPARQL resource index.
    #[default]
    Triplestore,
    /// Solr-style search index.
    SearchIndex,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Triplestore => write!(f, "triplestore"),
            Self::SearchIndex => write!(f, "search index"),
        }
    }
}

/// Search-index field names and paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchIndexConfig {
    /// Field holding the parent newspaper reference.
    pub parent_field: String,
    /// Field holding the issue date.
    pub date_field: String,
    /// Field holding the sequence number.
    pub sequence_field: String,
    /// Field holding the content model.
    pub model_field: String,
    /// Field holding the object label.
    pub label_field: String,
    /// Field holding the object identifier.
    pub identifier_field: String,
    /// Rows requested per page.
    pub batch_size: usize,
}

impl Default for SearchIndexConfig {
    fn default() -> Self {
        Self {
            parent_field: "RELS_EXT_isMemberOf_uri_ms".to_string(),
            date_field: "mods_originInfo_dateIssued_dt".to_string(),
            sequence_field: "RELS_EXT_isSequenceNumber_literal_ms".to_string(),
            model_field: "RELS_EXT_hasModel_uri_ms".to_string(),
            label_field: "fgs_label_s".to_string(),
            identifier_field: "PID".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SearchIndexConfig {
    /// Fields requested from the index, comma separated.
    #[must_use]
    pub fn field_list(&self) -> String {
        [
            self.identifier_field.as_str(),
            self.label_field.as_str(),
            self.sequence_field.as_str(),
            self.date_field.as_str(),
        ]
        .join(",")
    }
}

/// Configuration for issue listings.
///
/// # Examples
///
/// ```ignore
/// use newspaper_metadata::config::{BackendKind, NewspaperConfig};
///
/// let config = NewspaperConfig::new()
///     .with_backend(BackendKind::SearchIndex)
///     .with_date_field("dateIssued_dt")
///     .with_batch_size(500);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewspaperConfig {
    /// Backend used to list issues.
    pub backend: BackendKind,
    /// Search-index settings, used when `backend` is [`BackendKind::SearchIndex`].
    pub search: SearchIndexConfig,
    /// Mode passed to the access-control collaborator.
    pub access_mode: String,
}

impl Default for NewspaperConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            search: SearchIndexConfig::default(),
            access_mode: "view".to_string(),
        }
    }
}

impl NewspaperConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the listing backend.
    #[must_use]
    pub const fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the parent-reference field.
    #[must_use]
    pub fn with_parent_field(mut self, field: impl Into<String>) -> Self {
        self.search.parent_field = field.into();
        self
    }

    /// Sets the date field.
    #[must_use]
    pub fn with_date_field(mut self, field: impl Into<String>) -> Self {
        self.search.date_field = field.into();
        self
    }

    /// Sets the sequence field.
    #[must_use]
    pub fn with_sequence_field(mut self, field: impl Into<String>) -> Self {
        self.search.sequence_field = field.into();
        self
    }

    /// Sets the search-index page size.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.search.batch_size = batch_size;
        self
    }

    /// Sets the access-control mode.
    #[must_use]
    pub fn with_access_mode(mut self, mode: impl Into<String>) -> Self {
        self.access_mode = mode.into();
        self
    }
}
