//! Error types for newspaper metadata operations.
//!
//! This module provides the [`NewspaperError`] type for all library operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all newspaper metadata operations.
///
/// Only store contract failures and triplestore query failures reach callers
/// of the listing and relationship helpers; date and document problems are
/// recovered locally and reported through diagnostics instead.
#[derive(Error, Debug)]
pub enum NewspaperError {
    /// A relationship add/remove or other object store call failed.
    #[error("Object store error: {0}")]
    Store(String),

    /// A triplestore or search-index request failed.
    #[error("Query error: {0}")]
    Query(String),

    /// A metadata document is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// A RELS-EXT document could not be parsed or serialized.
    #[error("RDF error: {0}")]
    Rdf(String),

    /// Writing a content stream back to the store failed.
    #[error("Persistence error: {0}")]
    Persist(String),

    /// A date string could not be interpreted.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A JSON response envelope could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`NewspaperError`].
pub type Result<T> = std::result::Result<T, NewspaperError>;
