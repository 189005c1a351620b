//! Single-column row predicates.

use crate::error::{ConfigError, RowError};

/// One test applied to the filter column's value.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Exact string equality.
    Equals(String),
    /// Case-insensitive substring match. The needle is stored lower-cased.
    Contains(String),
    /// Numeric `value > bound`. Values that do not parse never match.
    GreaterThan(f64),
    /// Numeric `value < bound`. Values that do not parse never match.
    LessThan(f64),
}

impl Condition {
    pub fn contains(needle: &str) -> Self {
        Self::Contains(needle.to_lowercase())
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Equals(expected) => value == expected,
            Self::Contains(needle) => value.to_lowercase().contains(needle.as_str()),
            Self::GreaterThan(bound) => parse_number(value).is_some_and(|n| n > *bound),
            Self::LessThan(bound) => parse_number(value).is_some_and(|n| n < *bound),
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

/// A column position and the conditions tested against it.
///
/// A row matches when ANY condition matches.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    column: usize,
    conditions: Vec<Condition>,
}

impl FilterSpec {
    pub fn new(column: usize, conditions: Vec<Condition>) -> Result<Self, ConfigError> {
        if conditions.is_empty() {
            return Err(ConfigError::NoFilterCondition);
        }
        Ok(Self { column, conditions })
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Evaluates the row. Rows that do not reach the column are malformed.
    pub fn evaluate(&self, row: &[String]) -> Result<bool, RowError> {
        let value = row.get(self.column).ok_or(RowError::ShortRow {
            required: self.column + 1,
            actual: row.len(),
        })?;
        Ok(self.conditions.iter().any(|c| c.matches(value)))
    }
}
