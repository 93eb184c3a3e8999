//! Agency merge engine.
//!
//! Records are grouped into (title, chapter) partitions. Inside a partition
//! a record whose agency label is contained in a *later* record's label is
//! absorbed by it, so sub-agency headings fold into the agency that names
//! them. Surviving records are then summed per agency label across the
//! whole corpus.
//!
//! Absorption is decided against an immutable snapshot of the partition:
//!
//! 1. every record `i` gets at most one absorber, the first `j > i` whose
//!    label contains label `i` and differs from it;
//! 2. counts are forwarded along absorber links in ascending index order,
//!    so each input count lands in exactly one terminal survivor.
//!
//! The outcome equals collapsing repeatedly until no containment relation
//! is left, and a partition's total word count is conserved.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::containment::ContainmentRule;
use crate::types::{AgencyTotal, Partition, PartitionKey, Record};

/// Group records by (title, chapter).
///
/// Partitions appear in order of their first record; records keep their
/// input order inside each partition.
pub fn partition(records: &[Record]) -> Vec<Partition> {
    let mut groups: IndexMap<PartitionKey, Vec<Record>> = IndexMap::new();
    for record in records {
        groups
            .entry(record.partition_key())
            .or_default()
            .push(record.clone());
    }

    groups
        .into_iter()
        .map(|(key, records)| Partition { key, records })
        .collect()
}

/// For each record, the index of the record that absorbs it.
///
/// Only the earlier label is tested for containment in the later one;
/// empty labels are never absorbed.
pub fn absorbers(records: &[Record], rule: ContainmentRule) -> Vec<Option<usize>> {
    (0..records.len())
        .map(|i| {
            let inner = records[i].agency.as_str();
            if inner.is_empty() {
                return None;
            }
            (i + 1..records.len()).find(|&j| {
                let outer = records[j].agency.as_str();
                outer != inner && rule.contains(outer, inner)
            })
        })
        .collect()
}

/// Collapse one partition's records by agency containment.
///
/// Returns the surviving records, in input order, carrying their own count
/// plus everything absorbed into them directly or through a chain.
pub fn collapse(records: &[Record], rule: ContainmentRule) -> Vec<Record> {
    let links = absorbers(records, rule);
    let mut totals: Vec<u64> = records.iter().map(|r| r.word_count).collect();

    // Absorbers always sit at a higher index, so ascending order sees each
    // record's final total before forwarding it.
    for (i, link) in links.iter().enumerate() {
        if let Some(j) = *link {
            totals[j] += totals[i];
        }
    }

    records
        .iter()
        .zip(links)
        .zip(totals)
        .filter(|((_, link), _)| link.is_none())
        .map(|((record, _), word_count)| Record {
            word_count,
            ..record.clone()
        })
        .collect()
}

/// Sum merged records per agency label across all partitions.
///
/// Records with a zero word count are dropped first. The result is ordered
/// by agency label.
pub fn aggregate(merged: &[Record]) -> Vec<AgencyTotal> {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for record in merged.iter().filter(|r| r.word_count != 0) {
        *totals.entry(record.agency.as_str()).or_default() += record.word_count;
    }

    totals
        .into_iter()
        .map(|(agency, word_count)| AgencyTotal::new(agency, word_count))
        .collect()
}

/// Partition, collapse and aggregate with a fixed containment rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeEngine {
    rule: ContainmentRule,
}

impl MergeEngine {
    #[must_use]
    pub fn new(rule: ContainmentRule) -> Self {
        Self { rule }
    }

    #[must_use]
    pub fn rule(&self) -> ContainmentRule {
        self.rule
    }

    /// Collapse every partition and concatenate the survivors.
    pub fn merge(&self, records: &[Record]) -> Vec<Record> {
        let mut merged = Vec::with_capacity(records.len());
        for part in partition(records) {
            let survivors = collapse(&part.records, self.rule);
            let absorbed = part.records.len() - survivors.len();
            if absorbed > 0 {
                tracing::debug!(
                    title = %part.key.title,
                    chapter = %part.key.chapter,
                    absorbed,
                    "Merged contained agencies"
                );
            }
            merged.extend(survivors);
        }
        merged
    }

    /// Final per-agency totals for a record list.
    pub fn totals(&self, records: &[Record]) -> Vec<AgencyTotal> {
        aggregate(&self.merge(records))
    }
}

/// Per-agency totals using substring containment.
///
/// # Examples
/// ```
/// use ecfr_wordcount::{agency_totals, AgencyTotal, Record};
///
/// let records = vec![
///     Record::new(1u32, "Ch.1", "Bureau", 10),
///     Record::new(1u32, "Ch.1", "Bureau of Examples", 5),
/// ];
/// assert_eq!(agency_totals(&records), vec![AgencyTotal::new("Bureau of Examples", 15)]);
/// ```
pub fn agency_totals(records: &[Record]) -> Vec<AgencyTotal> {
    MergeEngine::default().totals(records)
}
