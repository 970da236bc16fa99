// SPDX-License-Identifier: GPL-3.0-or-later

//! Per-run summary counts.

use s2am_domain::{AddResult, SearchMethod, TrackRecord};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Count records by a field. `None` if any record lacks the field.
pub fn tally<K, F>(records: &[TrackRecord], field: F) -> Option<BTreeMap<K, usize>>
where
    K: Ord,
    F: Fn(&TrackRecord) -> Option<K>,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(field(record)?).or_insert(0) += 1;
    }
    Some(counts)
}

pub fn count_by_search_method(records: &[TrackRecord]) -> Option<BTreeMap<SearchMethod, usize>> {
    tally(records, |r| r.search_method)
}

pub fn count_by_result(records: &[TrackRecord]) -> Option<BTreeMap<AddResult, usize>> {
    tally(records, |r| r.result)
}

/// `ISRC: 3, TEXT: 1`, or `unavailable` for a `None` summary.
pub fn format_counts<K: Display>(counts: Option<&BTreeMap<K, usize>>) -> String {
    match counts {
        Some(counts) => counts
            .iter()
            .map(|(key, count)| format!("{key}: {count}"))
            .collect::<Vec<_>>()
            .join(", "),
        None => "unavailable".to_string(),
    }
}
