//! Repository object contract and an in-memory implementation.
//!
//! The helpers in this crate never talk to the object store directly. They work
//! against [`RepositoryObject`], which exposes the object's identifier, its
//! relationship collection and its named datastreams. [`MemoryObject`] is a
//! plain in-memory implementation, suitable for tests and for callers that load
//! objects themselves (for example from a RELS-EXT document, see
//! [`crate::rels_ext`]).
//!
//! Relationship values that point at other objects are bare identifiers
//! (`news:12`), not `info:fedora/` URIs.

use indexmap::IndexMap;

use crate::error::{NewspaperError, Result};

/// A single relationship read from an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Predicate namespace URI.
    pub namespace: String,
    /// Predicate local name.
    pub predicate: String,
    /// Object identifier or literal value.
    pub object: String,
    /// True when `object` is a literal rather than a reference.
    pub is_literal: bool,
}

impl Relationship {
    /// Creates a relationship pointing at another object.
    #[must_use]
    pub fn resource(
        namespace: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            predicate: predicate.into(),
            object: object.into(),
            is_literal: false,
        }
    }

    /// Creates a literal-valued relationship.
    #[must_use]
    pub fn literal(
        namespace: impl Into<String>,
        predicate: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            predicate: predicate.into(),
            object: value.into(),
            is_literal: true,
        }
    }

    /// Returns true if this relationship uses the given namespace and predicate.
    #[must_use]
    pub fn matches(&self, namespace: &str, predicate: &str) -> bool {
        self.namespace == namespace && self.predicate == predicate
    }
}

/// Multi-valued relationship collection of one object.
pub trait Relationships {
    /// Returns every relationship with the given namespace and predicate, in
    /// store order.
    fn get(&self, namespace: &str, predicate: &str) -> Vec<Relationship>;

    /// Adds one relationship.
    ///
    /// # Errors
    ///
    /// Returns [`NewspaperError::Store`] if the store rejects the change.
    fn add(&mut self, namespace: &str, predicate: &str, object: &str, is_literal: bool)
        -> Result<()>;

    /// Removes relationships with the given namespace and predicate.
    ///
    /// When `object` is `Some`, only relationships with that value are removed.
    /// `is_literal` restricts removal to literals or references.
    ///
    /// # Errors
    ///
    /// Returns [`NewspaperError::Store`] if the store rejects the change.
    fn remove(
        &mut self,
        namespace: &str,
        predicate: &str,
        object: Option<&str>,
        is_literal: bool,
    ) -> Result<()>;
}

/// A named content stream attached to an object.
pub trait Datastream {
    /// Returns the current content.
    fn content(&self) -> String;

    /// Replaces the content.
    ///
    /// # Errors
    ///
    /// Returns [`NewspaperError::Persist`] if the write is rejected.
    fn set_content_from_string(&mut self, content: &str) -> Result<()>;
}

/// Handle to a stored object.
pub trait RepositoryObject {
    /// Object identifier.
    fn id(&self) -> &str;

    /// Read access to the relationship collection.
    fn relationships(&self) -> &dyn Relationships;

    /// Write access to the relationship collection.
    fn relationships_mut(&mut self) -> &mut dyn Relationships;

    /// Returns the datastream with the given identifier, if present.
    fn datastream(&self, dsid: &str) -> Option<&dyn Datastream>;

    /// Returns the datastream with the given identifier for writing, if present.
    fn datastream_mut(&mut self, dsid: &str) -> Option<&mut dyn Datastream>;
}

/// In-memory relationship list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipList {
    entries: Vec<Relationship>,
}

impl RelationshipList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of relationships.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no relationships.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over all relationships.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Appends a relationship.
    pub fn push(&mut self, relationship: Relationship) {
        self.entries.push(relationship);
    }
}

impl FromIterator<Relationship> for RelationshipList {
    fn from_iter<I: IntoIterator<Item = Relationship>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Relationships for RelationshipList {
    fn get(&self, namespace: &str, predicate: &str) -> Vec<Relationship> {
        self.entries
            .iter()
            .filter(|r| r.matches(namespace, predicate))
            .cloned()
            .collect()
    }

    fn add(
        &mut self,
        namespace: &str,
        predicate: &str,
        object: &str,
        is_literal: bool,
    ) -> Result<()> {
        if namespace.is_empty() || predicate.is_empty() {
            return Err(NewspaperError::Store(
                "relationship namespace and predicate must not be empty".into(),
            ));
        }
        self.entries.push(Relationship {
            namespace: namespace.to_string(),
            predicate: predicate.to_string(),
            object: object.to_string(),
            is_literal,
        });
        Ok(())
    }

    fn remove(
        &mut self,
        namespace: &str,
        predicate: &str,
        object: Option<&str>,
        is_literal: bool,
    ) -> Result<()> {
        self.entries.retain(|r| {
            let selected = r.matches(namespace, predicate)
                && r.is_literal == is_literal
                && object.map_or(true, |value| r.object == value);
            !selected
        });
        Ok(())
    }
}

/// In-memory datastream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDatastream {
    content: String,
}

impl MemoryDatastream {
    /// Creates a datastream holding `content`.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl Datastream for MemoryDatastream {
    fn content(&self) -> String {
        self.content.clone()
    }

    fn set_content_from_string(&mut self, content: &str) -> Result<()> {
        self.content = content.to_string();
        Ok(())
    }
}

/// In-memory repository object.
///
/// # Examples
///
/// ```ignore
/// use newspaper_metadata::object::MemoryObject;
/// use newspaper_metadata::relationships;
///
/// let mut issue = MemoryObject::new("news:2")
///     .with_resource(namespaces::FEDORA_RELS_EXT, "isMemberOf", "news:1");
/// assert_eq!(relationships::get_parent_newspaper(&issue).as_deref(), Some("news:1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryObject {
    id: String,
    relationships: RelationshipList,
    datastreams: IndexMap<String, MemoryDatastream>,
}

impl MemoryObject {
    /// Creates an object with no relationships or datastreams.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Creates an object with a preloaded relationship list.
    #[must_use]
    pub fn with_relationships(id: impl Into<String>, relationships: RelationshipList) -> Self {
        Self {
            id: id.into(),
            relationships,
            datastreams: IndexMap::new(),
        }
    }

    /// Adds a reference relationship.
    #[must_use]
    pub fn with_resource(mut self, namespace: &str, predicate: &str, object: &str) -> Self {
        self.relationships
            .push(Relationship::resource(namespace, predicate, object));
        self
    }

    /// Adds a literal relationship.
    #[must_use]
    pub fn with_literal(mut self, namespace: &str, predicate: &str, value: &str) -> Self {
        self.relationships
            .push(Relationship::literal(namespace, predicate, value));
        self
    }

    /// Adds or replaces a datastream.
    #[must_use]
    pub fn with_datastream(mut self, dsid: &str, content: impl Into<String>) -> Self {
        self.datastreams
            .insert(dsid.to_string(), MemoryDatastream::new(content));
        self
    }

    /// Returns the relationship list.
    #[must_use]
    pub fn relationship_list(&self) -> &RelationshipList {
        &self.relationships
    }
}

impl RepositoryObject for MemoryObject {
    fn id(&self) -> &str {
        &self.id
    }

    fn relationships(&self) -> &dyn Relationships {
        &self.relationships
    }

    fn relationships_mut(&mut self) -> &mut dyn Relationships {
        &mut self.relationships
    }

    fn datastream(&self, dsid: &str) -> Option<&dyn Datastream> {
        self.datastreams
            .get(dsid)
            .map(|ds| ds as &dyn Datastream)
    }

    fn datastream_mut(&mut self, dsid: &str) -> Option<&mut dyn Datastream> {
        self.datastreams
            .get_mut(dsid)
            .map(|ds| ds as &mut dyn Datastream)
    }
}
