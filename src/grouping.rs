//! Indexing and calendar grouping of issue records.
//!
//! These are pure functions over already-normalized records; none of them talk
//! to a backend.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::normalize::IssueRecord;

/// Issues grouped as year -> month -> day -> issues.
///
/// Keys are zero-padded (`"1921"`, `"03"`, `"04"`), so lexical order is
/// calendar order. Issues sharing a day keep their input order.
pub type GroupedIssues = BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<IssueRecord>>>>;

/// Maps each record by identifier.
///
/// Later records replace earlier ones with the same identifier. The map keeps
/// first-insertion order of identifiers.
#[must_use]
pub fn to_identifier_map(records: &[IssueRecord]) -> IndexMap<String, IssueRecord> {
    if records.is_empty() {
        return IndexMap::new();
    }

    records
        .iter()
        .map(|record| (record.identifier.clone(), record.clone()))
        .collect()
}

/// Groups records by the year, month and day they were issued.
#[must_use]
pub fn group_by_date(records: &[IssueRecord]) -> GroupedIssues {
    let mut grouped = GroupedIssues::new();

    for record in records {
        grouped
            .entry(record.issued.format("%Y").to_string())
            .or_default()
            .entry(record.issued.format("%m").to_string())
            .or_default()
            .entry(record.issued.format("%d").to_string())
            .or_default()
            .push(record.clone());
    }

    grouped
}

/// Number of records across all leaves of a grouping.
#[must_use]
pub fn grouped_len(grouped: &GroupedIssues) -> usize {
    grouped
        .values()
        .flat_map(BTreeMap::values)
        .flat_map(BTreeMap::values)
        .map(Vec::len)
        .sum()
}

/// Sequence number for an issue appended to a newspaper.
///
/// One more than the highest numeric sequence; non-numeric sequences are
/// ignored and an empty list starts at 1.
#[must_use]
pub fn next_sequence(records: &[IssueRecord]) -> u64 {
    records
        .iter()
        .filter_map(|record| record.sequence.trim().parse::<u64>().ok())
        .max()
        .map_or(1, |highest| highest + 1)
}

/// Neighbours of one issue in publication order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueNavigation {
    /// Issue published just before.
    pub previous: Option<IssueRecord>,
    /// Issue published just after.
    pub next: Option<IssueRecord>,
}

impl IssueNavigation {
    /// Finds the neighbours of `identifier`, ordering by issue date and then by
    /// numeric sequence.
    ///
    /// Returns `None` if the identifier is not among the records.
    #[must_use]
    pub fn around(records: &[IssueRecord], identifier: &str) -> Option<Self> {
        let mut ordered: Vec<&IssueRecord> = records.iter().collect();
        ordered.sort_by(|a, b| {
            a.issued
                .date_naive()
                .cmp(&b.issued.date_naive())
                .then_with(|| sequence_key(a).cmp(&sequence_key(b)))
        });

        let position = ordered.iter().position(|r| r.identifier == identifier)?;
        Some(Self {
            previous: position
                .checked_sub(1)
                .and_then(|i| ordered.get(i))
                .map(|r| (*r).clone()),
            next: ordered.get(position + 1).map(|r| (*r).clone()),
        })
    }
}

fn sequence_key(record: &IssueRecord) -> (u64, &str) {
    (
        record.sequence.trim().parse().unwrap_or(u64::MAX),
        record.sequence.as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn issue(identifier: &str, sequence: &str, y: i32, m: u32, d: u32) -> IssueRecord {
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

    #[test]
    fn test_identifier_map_empty() {
        assert!(to_identifier_map(&[]).is_empty());
    }

    #[test]
    fn test_identifier_map_last_write_wins() {
        let first = issue("news:2", "1", 1921, 3, 4);
        let mut replacement = issue("news:2", "1", 1921, 3, 5);
        replacement.label = "Corrected".to_string();
        let map = to_identifier_map(&[first, issue("news:3", "2", 1921, 3, 6), replacement]);

        assert_eq!(map.len(), 2);
        assert_eq!(map["news:2"].label, "Corrected");
        assert_eq!(map.keys().next().map(String::as_str), Some("news:2"));
    }

    #[test]
    fn test_group_by_date_pads_and_preserves_order() {
        let records = vec![
            issue("news:2", "1", 1921, 3, 4),
            issue("news:3", "2", 1921, 3, 4),
            issue("news:4", "3", 1921, 11, 20),
            issue("news:5", "4", 1922, 1, 1),
        ];
        let grouped = group_by_date(&records);

        let march_fourth = &grouped["1921"]["03"]["04"];
        assert_eq!(march_fourth.len(), 2);
        assert_eq!(march_fourth[0].identifier, "news:2");
        assert_eq!(march_fourth[1].identifier, "news:3");
        assert_eq!(grouped["1921"]["11"]["20"][0].identifier, "news:4");
        assert_eq!(grouped["1922"]["01"]["01"][0].identifier, "news:5");
        assert_eq!(grouped_len(&grouped), records.len());
    }

    #[test]
    fn test_next_sequence() {
        assert_eq!(next_sequence(&[]), 1);
        let records = vec![
            issue("news:2", "3", 1921, 3, 4),
            issue("news:3", "supplement", 1921, 3, 4),
            issue("news:4", "10", 1921, 3, 5),
        ];
        assert_eq!(next_sequence(&records), 11);
    }

    #[test]
    fn test_navigation() {
        let records = vec![
            issue("news:4", "3", 1921, 3, 6),
            issue("news:2", "1", 1921, 3, 4),
            issue("news:3", "2", 1921, 3, 4),
        ];

        let nav = IssueNavigation::around(&records, "news:3").expect("issue is listed");
        assert_eq!(nav.previous.map(|r| r.identifier).as_deref(), Some("news:2"));
        assert_eq!(nav.next.map(|r| r.identifier).as_deref(), Some("news:4"));

        let first = IssueNavigation::around(&records, "news:2").expect("issue is listed");
        assert!(first.previous.is_none());

        assert!(IssueNavigation::around(&records, "news:99").is_none());
    }
}
