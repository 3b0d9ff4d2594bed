//! Integration tests for reading and writing issue dates in MODS datastreams.

mod common;

use chrono::NaiveDate;
use common::{LockedObject, LockedRelationships, ReadOnlyDatastream, ISSUE_MODS};
use newspaper_metadata::{mods, MemoryObject, RelationshipList, RepositoryObject};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_read_date_from_object() {
    let issue = MemoryObject::new("news:2").with_datastream("MODS", ISSUE_MODS);
    assert_eq!(mods::read_date(&issue), Some(date(1921, 3, 4)));
}

#[test]
fn test_write_then_read_roundtrip() {
    let mut issue = MemoryObject::new("news:2").with_datastream("MODS", ISSUE_MODS);

    assert!(mods::write_date(&mut issue, date(1931, 12, 25)));
    assert_eq!(mods::read_date(&issue), Some(date(1931, 12, 25)));

    let content = issue.datastream("MODS").map(|ds| ds.content()).unwrap_or_default();
    assert!(content.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(content.contains("<mods:title>The Evening Gazette</mods:title>"));
    assert!(content.contains(r#"<mods:dateIssued point="start">1921-03-01</mods:dateIssued>"#));
    assert_eq!(content.matches("<mods:dateIssued encoding=\"iso8601\">").count(), 1);
}

#[test]
fn test_write_to_default_namespace_document() {
    let mut issue = MemoryObject::new("news:2").with_datastream(
        "MODS",
        r#"<mods xmlns="http://www.loc.gov/mods/v3"><titleInfo><title>Gazette</title></titleInfo></mods>"#,
    );

    assert!(mods::write_date(&mut issue, date(1900, 1, 2)));
    let content = issue.datastream("MODS").map(|ds| ds.content()).unwrap_or_default();
    assert!(content.contains(
        r#"<originInfo><dateIssued encoding="iso8601">1900-01-02</dateIssued></originInfo>"#
    ));
    assert_eq!(mods::read_date(&issue), Some(date(1900, 1, 2)));
}

#[test]
fn test_malformed_document_is_reported() {
    let mut issue = MemoryObject::new("news:2").with_datastream("MODS", "<mods><originInfo>");

    assert_eq!(mods::read_date(&issue), None);
    assert!(!mods::write_date(&mut issue, date(1900, 1, 2)));
    assert_eq!(
        issue.datastream("MODS").map(|ds| ds.content()).as_deref(),
        Some("<mods><originInfo>")
    );
}

#[test]
fn test_missing_datastream() {
    let mut issue = MemoryObject::new("news:2");
    assert_eq!(mods::read_date(&issue), None);
    assert!(!mods::write_date(&mut issue, date(1900, 1, 2)));
}

#[test]
fn test_persistence_failure_is_false() {
    let mut issue = LockedObject {
        id: "news:2".to_string(),
        relationships: LockedRelationships(RelationshipList::new()),
        mods: ReadOnlyDatastream(ISSUE_MODS.to_string()),
    };

    assert!(!mods::write_date(&mut issue, date(1931, 12, 25)));
    assert_eq!(mods::read_date(&issue), Some(date(1921, 3, 4)));
}
