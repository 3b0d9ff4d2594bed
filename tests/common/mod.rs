//! Common test helpers and utilities shared across test suite.

use std::cell::{Cell, RefCell};

use chrono::{NaiveDate, NaiveTime};
use newspaper_metadata::{
    AccessFilter, Datastream, IssueRecord, NewspaperError, Relationship, RelationshipList,
    Relationships, RepositoryObject, Result, SearchIndex, SearchParams, SearchResponse,
    SparqlEndpoint, SparqlRow,
};
use serde_json::{json, Value};

/// Builds an issue record issued at midnight UTC on the given day.
#[allow(dead_code)]
pub fn issue(identifier: &str, sequence: &str, y: i32, m: u32, d: u32) -> IssueRecord {
    IssueRecord {
        identifier: identifier.to_string(),
        label: format!("Issue {identifier}"),
        sequence: sequence.to_string(),
        issued: NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
            .and_utc(),
    }
}

/// Builds a SPARQL row from variable/value pairs.
#[allow(dead_code)]
pub fn sparql_row(pairs: &[(&str, &str)]) -> SparqlRow {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// SPARQL endpoint returning fixed rows and recording every query.
#[allow(dead_code)]
pub struct RecordingEndpoint {
    pub rows: Vec<SparqlRow>,
    pub queries: RefCell<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingEndpoint {
    pub fn new(rows: Vec<SparqlRow>) -> Self {
        Self {
            rows,
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl SparqlEndpoint for RecordingEndpoint {
    fn select(&self, query: &str) -> Result<Vec<SparqlRow>> {
        self.queries.borrow_mut().push(query.to_string());
        Ok(self.rows.clone())
    }
}

/// Search index holding `total` generated documents, optionally failing on one
/// page request (1-based).
#[allow(dead_code)]
pub struct ScriptedIndex {
    pub total: usize,
    pub fail_on_request: Option<usize>,
    pub requests: RefCell<Vec<SearchParams>>,
}

#[allow(dead_code)]
impl ScriptedIndex {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            fail_on_request: None,
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, request: usize) -> Self {
        self.fail_on_request = Some(request);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

fn generated_doc(n: usize) -> Value {
    let day = n % 28 + 1;
    if n % 2 == 0 {
        json!({
            "PID": format!("news:{n}"),
            "fgs_label_s": [format!("Issue {n}")],
            "RELS_EXT_isSequenceNumber_literal_ms": [n.to_string()],
            "mods_originInfo_dateIssued_dt": [format!("1921-03-{day:02}T00:00:00Z")]
        })
    } else {
        json!({
            "PID": format!("news:{n}"),
            "solr_doc": {
                "fgs_label_s": format!("Issue {n}"),
                "RELS_EXT_isSequenceNumber_literal_ms": [n.to_string()],
                "mods_originInfo_dateIssued_dt": format!("1921-04-{day:02}T00:00:00Z")
            }
        })
    }
}

impl SearchIndex for ScriptedIndex {
    fn search(&self, _query: &str, params: &SearchParams) -> Result<SearchResponse> {
        self.requests.borrow_mut().push(params.clone());
        if self.fail_on_request == Some(self.request_count()) {
            return Err(NewspaperError::Query("search backend unavailable".into()));
        }

        let end = (params.start + params.rows).min(self.total);
        Ok(SearchResponse {
            num_found: self.total,
            objects: (params.start..end).map(generated_doc).collect(),
        })
    }
}

/// Access filter contributing one optional pattern and one filter, counting
/// how often it is asked for each.
#[allow(dead_code)]
#[derive(Default)]
pub struct PolicyFilter {
    pub optional_calls: Cell<usize>,
    pub filter_calls: Cell<usize>,
}

#[allow(dead_code)]
impl PolicyFilter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccessFilter for PolicyFilter {
    fn query_optionals(&self, mode: &str) -> Vec<String> {
        self.optional_calls.set(self.optional_calls.get() + 1);
        vec![format!(
            "OPTIONAL {{ ?object <http://islandora.ca/ontology/relsext#isViewableByUser> ?{mode}_user }}"
        )]
    }

    fn query_filters(&self) -> Vec<String> {
        self.filter_calls.set(self.filter_calls.get() + 1);
        vec!["FILTER(!BOUND(?view_user) || ?view_user = 'admin')".to_string()]
    }
}

/// Datastream whose writes always fail.
#[allow(dead_code)]
pub struct ReadOnlyDatastream(pub String);

impl Datastream for ReadOnlyDatastream {
    fn content(&self) -> String {
        self.0.clone()
    }

    fn set_content_from_string(&mut self, _content: &str) -> Result<()> {
        Err(NewspaperError::Persist("datastream is locked".into()))
    }
}

/// Relationship store that rejects every change.
#[allow(dead_code)]
pub struct LockedRelationships(pub RelationshipList);

impl Relationships for LockedRelationships {
    fn get(&self, namespace: &str, predicate: &str) -> Vec<Relationship> {
        self.0.get(namespace, predicate)
    }

    fn add(&mut self, _: &str, _: &str, _: &str, _: bool) -> Result<()> {
        Err(NewspaperError::Store("object is locked".into()))
    }

    fn remove(&mut self, _: &str, _: &str, _: Option<&str>, _: bool) -> Result<()> {
        Err(NewspaperError::Store("object is locked".into()))
    }
}

/// Object backed by the failing test doubles above.
#[allow(dead_code)]
pub struct LockedObject {
    pub id: String,
    pub relationships: LockedRelationships,
    pub mods: ReadOnlyDatastream,
}

impl RepositoryObject for LockedObject {
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
        (dsid == "MODS").then_some(&self.mods as &dyn Datastream)
    }

    fn datastream_mut(&mut self, dsid: &str) -> Option<&mut dyn Datastream> {
        (dsid == "MODS").then_some(&mut self.mods as &mut dyn Datastream)
    }
}

/// A small well-formed MODS record with a dated origin info block.
#[allow(dead_code)]
pub const ISSUE_MODS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mods:mods xmlns:mods="http://www.loc.gov/mods/v3" xmlns:xlink="http://www.w3.org/1999/xlink">
  <mods:titleInfo>
    <mods:title>The Evening Gazette</mods:title>
  </mods:titleInfo>
  <mods:originInfo>
    <mods:dateIssued encoding="iso8601">1921-03-04</mods:dateIssued>
    <mods:dateIssued point="start">1921-03-01</mods:dateIssued>
  </mods:originInfo>
</mods:mods>
"#;
