//! Per-column descriptive statistics.

use std::collections::HashMap;

use serde::Serialize;

/// Number of most frequent values reported per column by default.
pub const DEFAULT_TOP_VALUES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnStats {
    pub name: String,
    /// Distinct non-empty values.
    pub unique_values: usize,
    /// Fields that are blank after trimming, or missing from short rows.
    pub empty_fields: u64,
    /// Most frequent values, highest count first, ties by value.
    pub top_values: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableStats {
    pub rows: u64,
    pub columns: Vec<ColumnStats>,
}

#[derive(Debug, Default)]
struct ColumnCounter {
    empty: u64,
    values: HashMap<String, u64>,
}

/// Accumulates counts one row at a time.
///
/// Fields beyond the header width are ignored; missing fields count as empty.
#[derive(Debug)]
pub struct StatsAccumulator {
    header: Vec<String>,
    counters: Vec<ColumnCounter>,
    rows: u64,
}

impl StatsAccumulator {
    pub fn new(header: Vec<String>) -> Self {
        let counters = header.iter().map(|_| ColumnCounter::default()).collect();
        Self {
            header,
            counters,
            rows: 0,
        }
    }

    pub fn push(&mut self, row: &[String]) {
        self.rows += 1;
        for (idx, counter) in self.counters.iter_mut().enumerate() {
            match row.get(idx).map(String::as_str).map(str::trim) {
                Some(cell) if !cell.is_empty() => {
                    *counter.values.entry(cell.to_string()).or_insert(0) += 1;
                }
                _ => counter.empty += 1,
            }
        }
    }

    pub fn finish(self, top_n: usize) -> TableStats {
        let columns = self
            .header
            .into_iter()
            .zip(self.counters)
            .map(|(name, counter)| {
                let unique_values = counter.values.len();
                let mut ranked: Vec<ValueCount> = counter
                    .values
                    .into_iter()
                    .map(|(value, count)| ValueCount { value, count })
                    .collect();
                ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
                ranked.truncate(top_n);
                ColumnStats {
                    name,
                    unique_values,
                    empty_fields: counter.empty,
                    top_values: ranked,
                }
            })
            .collect();
        TableStats {
            rows: self.rows,
            columns,
        }
    }
}
