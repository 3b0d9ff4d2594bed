//! Issue dates in MODS (Metadata Object Description Schema) records.
//!
//! The canonical publication date of an issue lives in its MODS record as
//! `mods:originInfo/mods:dateIssued`. Elements carrying a `point` attribute
//! (`start`/`end` of a date range) are not the canonical date and are left
//! alone.
//!
//! Reading is lenient: a document that does not parse, has no canonical date,
//! or has one that is not a date yields `None`. This differs from
//! [`crate::relationships::get_date_issued`], which falls back to the current
//! time.
//!
//! # Examples
//!
//! ```ignore
//! use chrono::NaiveDate;
//! use newspaper_metadata::mods;
//!
//! let xml = r#"<mods xmlns="http://www.loc.gov/mods/v3"><titleInfo><title>T</title></titleInfo></mods>"#;
//! let date = NaiveDate::from_ymd_opt(1921, 3, 4).unwrap();
//! let updated = mods::set_date_issued_in_mods(xml, date)?;
//! assert_eq!(mods::date_issued_from_mods(&updated), Some(date));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::dates::{format_issue_date, parse_issue_date};
use crate::error::Result;
use crate::namespaces::{MODS, MODS_DATASTREAM};
use crate::object::RepositoryObject;
use crate::xml_tree::{Document, Element, Node};

const ORIGIN_INFO: &str = "originInfo";
const DATE_ISSUED: &str = "dateIssued";

fn is_origin_info(element: &Element) -> bool {
    element.is(MODS, ORIGIN_INFO)
}

fn is_canonical_date(element: &Element) -> bool {
    element.is(MODS, DATE_ISSUED) && element.attribute("point").is_none()
}

fn is_canonical_child(parent: &Element, child: &Element) -> bool {
    is_origin_info(parent) && is_canonical_date(child)
}

fn canonical_date(root: &Element) -> Option<&Element> {
    root.find_with_parent(&is_canonical_child)
}

/// Reads the canonical issue date from a MODS document.
///
/// The first canonical `dateIssued` in document order is used. Returns `None`
/// if the document is not well-formed, has no canonical `dateIssued`, or its
/// text is not a date.
#[must_use]
pub fn date_issued_from_mods(xml: &str) -> Option<NaiveDate> {
    let document = match Document::parse(xml) {
        Ok(document) => document,
        Err(e) => {
            debug!(error = %e, "MODS document is not well-formed");
            return None;
        },
    };

    let Some(element) = canonical_date(&document.root) else {
        warn!("MODS document has no canonical dateIssued");
        return None;
    };

    let text = match element.text() {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "unreadable dateIssued text");
            return None;
        },
    };

    match parse_issue_date(&text) {
        Ok(issued) => Some(issued.date_naive()),
        Err(e) => {
            warn!(error = %e, "dateIssued is not a date");
            None
        },
    }
}

/// Replaces the canonical issue date of a MODS document.
///
/// Every canonical `dateIssued` is removed, then one new element with
/// `encoding="iso8601"` is appended to the first `originInfo`. The new element
/// (and the `originInfo`, if one has to be created as the last child of the
/// root) uses the root element's namespace and prefix.
///
/// # Errors
///
/// Returns [`crate::NewspaperError::Xml`] if the document is not well-formed.
pub fn set_date_issued_in_mods(xml: &str, date: NaiveDate) -> Result<String> {
    let mut document = Document::parse(xml)?;
    let removed = document.root.remove_where(&is_canonical_child);
    debug!(removed, "removed existing dateIssued elements");

    let namespace = document.root.namespace.clone();
    let prefix = document.root.prefix().map(str::to_string);
    let qualify = |local: &str| match &prefix {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    };

    let mut date_issued = Element::new(qualify(DATE_ISSUED), namespace.clone());
    date_issued.set_attribute("encoding", "iso8601");
    date_issued.push_text(&format_issue_date(date));

    match document.root.find_mut(&is_origin_info) {
        Some(origin) => origin.children.push(Node::Element(date_issued)),
        None => {
            let mut origin = Element::new(qualify(ORIGIN_INFO), namespace);
            origin.children.push(Node::Element(date_issued));
            document.root.children.push(Node::Element(origin));
        },
    }

    Ok(document.to_xml())
}

/// Reads the canonical issue date from the object's MODS datastream.
#[must_use]
pub fn read_date(object: &dyn RepositoryObject) -> Option<NaiveDate> {
    let Some(datastream) = object.datastream(MODS_DATASTREAM) else {
        debug!(identifier = object.id(), "object has no MODS datastream");
        return None;
    };
    date_issued_from_mods(&datastream.content())
}

/// Writes the canonical issue date into the object's MODS datastream.
///
/// Returns `false` if the datastream is missing, not well-formed, or could not
/// be saved; each case is logged with the object's identifier.
pub fn write_date(object: &mut dyn RepositoryObject, date: NaiveDate) -> bool {
    let identifier = object.id().to_string();
    let Some(datastream) = object.datastream_mut(MODS_DATASTREAM) else {
        warn!(identifier = identifier.as_str(), "object has no MODS datastream");
        return false;
    };

    let updated = match set_date_issued_in_mods(&datastream.content(), date) {
        Ok(updated) => updated,
        Err(e) => {
            warn!(identifier = identifier.as_str(), error = %e, "cannot update dateIssued in MODS");
            return false;
        },
    };

    match datastream.set_content_from_string(&updated) {
        Ok(()) => true,
        Err(e) => {
            warn!(identifier = identifier.as_str(), error = %e, "failed to save MODS datastream");
            false
        },
    }
}
