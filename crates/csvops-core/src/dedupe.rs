//! Order-preserving deduplication.
//!
//! Retained rows live in an arena (`slots`) and a hash index maps each
//! composite key to its slot. A slot is allocated the first time a key is
//! seen and never moves afterwards, so output order is always the
//! first-occurrence order of distinct keys. Under [`KeepPolicy::Last`] a
//! recurring key overwrites the payload of its existing slot.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;
use tracing::debug;

use crate::key::{CompositeKey, KeySpec, Row};

/// Which occurrence of a repeated key survives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeepPolicy {
    #[default]
    First,
    Last,
}

impl KeepPolicy {
    pub fn from_keep_last(keep_last: bool) -> Self {
        if keep_last { Self::Last } else { Self::First }
    }
}

/// Counters reported after a run.
///
/// `total_rows == unique_rows + duplicates_removed + skipped_rows` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupeStats {
    pub total_rows: u64,
    pub unique_rows: u64,
    pub duplicates_removed: u64,
    pub skipped_rows: u64,
}

/// What happened to a single pushed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// First sighting of the key; a new slot was allocated.
    Retained,
    /// Repeated key under `Last`; the existing slot now holds this row.
    Replaced,
    /// Repeated key under `First`; the row was dropped.
    Discarded,
    /// Too short to extract the key.
    Skipped,
}

/// Retained rows in slot order plus the run's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupeOutcome {
    pub rows: Vec<Row>,
    pub stats: DedupeStats,
}

/// Incremental deduplicator. Feed rows in input order with [`Deduper::push`].
#[derive(Debug)]
pub struct Deduper<'a> {
    spec: &'a KeySpec,
    policy: KeepPolicy,
    index: HashMap<CompositeKey, usize>,
    slots: Vec<Row>,
    stats: DedupeStats,
}

impl<'a> Deduper<'a> {
    pub fn new(spec: &'a KeySpec, policy: KeepPolicy) -> Self {
        Self {
            spec,
            policy,
            index: HashMap::new(),
            slots: Vec::new(),
            stats: DedupeStats::default(),
        }
    }

    pub fn push(&mut self, row: Row) -> RowOutcome {
        self.stats.total_rows += 1;
        let key = match self.spec.extract(&row) {
            Ok(key) => key,
            Err(error) => {
                self.stats.skipped_rows += 1;
                debug!(row = self.stats.total_rows, %error, "skipping malformed row");
                return RowOutcome::Skipped;
            }
        };
        match self.index.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(self.slots.len());
                self.slots.push(row);
                self.stats.unique_rows += 1;
                RowOutcome::Retained
            }
            Entry::Occupied(entry) => {
                self.stats.duplicates_removed += 1;
                match self.policy {
                    KeepPolicy::First => RowOutcome::Discarded,
                    KeepPolicy::Last => {
                        self.slots[*entry.get()] = row;
                        RowOutcome::Replaced
                    }
                }
            }
        }
    }

    /// Counters so far.
    pub fn stats(&self) -> DedupeStats {
        self.stats
    }

    pub fn finish(self) -> DedupeOutcome {
        debug!(
            total = self.stats.total_rows,
            unique = self.stats.unique_rows,
            duplicates = self.stats.duplicates_removed,
            skipped = self.stats.skipped_rows,
            "deduplication finished"
        );
        DedupeOutcome {
            rows: self.slots,
            stats: self.stats,
        }
    }
}

/// Deduplicates `rows` in a single pass.
pub fn dedupe<I>(rows: I, spec: &KeySpec, policy: KeepPolicy) -> DedupeOutcome
where
    I: IntoIterator<Item = Row>,
{
    let mut deduper = Deduper::new(spec, policy);
    for row in rows {
        deduper.push(row);
    }
    deduper.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::CaseSensitivity;

    fn row(values: &[&str]) -> Row {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_push_reports_each_state() {
        let spec = KeySpec::new(vec![0], CaseSensitivity::Sensitive).unwrap();
        let mut first = Deduper::new(&spec, KeepPolicy::First);
        assert_eq!(first.push(row(&["a"])), RowOutcome::Retained);
        assert_eq!(first.push(row(&["a"])), RowOutcome::Discarded);
        assert_eq!(first.push(row(&[])), RowOutcome::Skipped);

        let mut last = Deduper::new(&spec, KeepPolicy::Last);
        assert_eq!(last.push(row(&["a"])), RowOutcome::Retained);
        assert_eq!(last.push(row(&["a"])), RowOutcome::Replaced);
    }

    #[test]
    fn test_last_overwrites_slot_in_place() {
        let spec = KeySpec::new(vec![0], CaseSensitivity::Sensitive).unwrap();
        let outcome = dedupe(
            vec![
                row(&["a", "1"]),
                row(&["b", "2"]),
                row(&["c", "3"]),
                row(&["a", "4"]),
                row(&["b", "5"]),
                row(&["a", "6"]),
            ],
            &spec,
            KeepPolicy::Last,
        );
        assert_eq!(
            outcome.rows,
            vec![row(&["a", "6"]), row(&["b", "5"]), row(&["c", "3"])]
        );
        assert_eq!(outcome.stats.duplicates_removed, 3);
    }

    #[test]
    fn test_stats_visible_mid_stream() {
        let spec = KeySpec::new(vec![0], CaseSensitivity::Sensitive).unwrap();
        let mut deduper = Deduper::new(&spec, KeepPolicy::First);
        deduper.push(row(&["a"]));
        deduper.push(row(&["a"]));
        let stats = deduper.stats();
        assert_eq!(stats.total_rows, 2);
        assert_eq!(stats.unique_rows, 1);
        assert_eq!(stats.duplicates_removed, 1);
    }
}
