//! RELS-EXT codec.
//!
//! A RELS-EXT datastream is a small RDF document describing one object's
//! outgoing relationships. This module reads such a document into a
//! [`RelationshipList`] and writes one back, using the oxrdfio library.
//! Resource objects are stored as bare identifiers, literal objects as their
//! lexical value.

use std::io::Read;

use oxrdf::{Literal, NamedNode, NamedOrBlankNode, Quad, Term, Triple};
use oxrdfio::{RdfFormat as OxRdfFormat, RdfParser, RdfSerializer};

use crate::error::{NewspaperError, Result};
use crate::namespaces::{object_identifier, object_uri};
use crate::object::{MemoryObject, Relationship, RelationshipList};

/// Serialization of a RELS-EXT document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelsExtFormat {
    /// RDF/XML, the format Fedora stores.
    #[default]
    RdfXml,
    /// N-Triples.
    NTriples,
}

impl RelsExtFormat {
    /// Returns the MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::RdfXml => "application/rdf+xml",
            Self::NTriples => "application/n-triples",
        }
    }

    fn to_oxrdf(self) -> OxRdfFormat {
        match self {
            Self::RdfXml => OxRdfFormat::RdfXml,
            Self::NTriples => OxRdfFormat::NTriples,
        }
    }
}

/// Splits a predicate IRI into namespace and local name.
///
/// The namespace keeps its trailing `#` or `/`.
#[must_use]
pub fn split_predicate(iri: &str) -> (&str, &str) {
    match iri.rfind(['#', '/']) {
        Some(index) => iri.split_at(index + 1),
        None => ("", iri),
    }
}

/// Reads the relationships of `subject` from a RELS-EXT document.
///
/// Triples about other subjects are ignored.
///
/// # Errors
///
/// Returns [`NewspaperError::Rdf`] if the document cannot be parsed.
pub fn parse_from_reader<R: Read>(
    reader: R,
    subject: &str,
    format: RelsExtFormat,
) -> Result<RelationshipList> {
    let parser = RdfParser::from_format(format.to_oxrdf()).for_reader(reader);
    let subject_uri = object_uri(subject);
    let mut relationships = RelationshipList::new();

    for result in parser {
        let quad = result.map_err(|e| NewspaperError::Rdf(e.to_string()))?;
        if let Some(relationship) = relationship_from_quad(&quad, &subject_uri) {
            relationships.push(relationship);
        }
    }

    Ok(relationships)
}

/// Reads the relationships of `subject` from a RELS-EXT string.
///
/// # Errors
///
/// Returns [`NewspaperError::Rdf`] if the document cannot be parsed.
pub fn parse(input: &str, subject: &str, format: RelsExtFormat) -> Result<RelationshipList> {
    parse_from_reader(input.as_bytes(), subject, format)
}

/// Builds an in-memory object from its RELS-EXT document.
///
/// # Errors
///
/// Returns [`NewspaperError::Rdf`] if the document cannot be parsed.
pub fn load_object(id: &str, rels_ext: &str) -> Result<MemoryObject> {
    let relationships = parse(rels_ext, id, RelsExtFormat::RdfXml)?;
    Ok(MemoryObject::with_relationships(id, relationships))
}

/// Writes the relationships of `subject` as a RELS-EXT document.
///
/// # Errors
///
/// Returns [`NewspaperError::Rdf`] if an IRI is invalid or serialization fails.
pub fn serialize<'a, I>(subject: &str, relationships: I, format: RelsExtFormat) -> Result<String>
where
    I: IntoIterator<Item = &'a Relationship>,
{
    let subject = NamedNode::new(object_uri(subject))
        .map_err(|e| NewspaperError::Rdf(format!("Invalid subject URI: {e}")))?;
    let mut output = Vec::new();
    let mut serializer = RdfSerializer::from_format(format.to_oxrdf()).for_writer(&mut output);

    for relationship in relationships {
        let triple = to_oxrdf_triple(&subject, relationship)?;
        serializer
            .serialize_triple(&triple)
            .map_err(|e| NewspaperError::Rdf(e.to_string()))?;
    }

    serializer
        .finish()
        .map_err(|e| NewspaperError::Rdf(e.to_string()))?;

    String::from_utf8(output).map_err(|e| NewspaperError::Rdf(e.to_string()))
}

fn to_oxrdf_triple(subject: &NamedNode, relationship: &Relationship) -> Result<Triple> {
    let predicate = NamedNode::new(format!(
        "{}{}",
        relationship.namespace, relationship.predicate
    ))
    .map_err(|e| NewspaperError::Rdf(format!("Invalid predicate URI: {e}")))?;

    let object = if relationship.is_literal {
        Term::Literal(Literal::new_simple_literal(&relationship.object))
    } else {
        Term::NamedNode(
            NamedNode::new(object_uri(&relationship.object))
                .map_err(|e| NewspaperError::Rdf(format!("Invalid object URI: {e}")))?,
        )
    };

    Ok(Triple::new(subject.clone(), predicate, object))
}

fn relationship_from_quad(quad: &Quad, subject_uri: &str) -> Option<Relationship> {
    match &quad.subject {
        NamedOrBlankNode::NamedNode(node) if node.as_str() == subject_uri => {},
        _ => return None,
    }

    let (namespace, predicate) = split_predicate(quad.predicate.as_str());

    match &quad.object {
        Term::NamedNode(node) => Some(Relationship::resource(
            namespace,
            predicate,
            object_identifier(node.as_str()),
        )),
        Term::Literal(literal) => {
            Some(Relationship::literal(namespace, predicate, literal.value()))
        },
        #[allow(unreachable_patterns)]
        _ => None,
    }
}
