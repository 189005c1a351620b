//! Composite key construction.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{ConfigError, RowError};
use crate::resolve::resolve_columns;

/// An ordered sequence of text fields.
pub type Row = Vec<String>;

/// Separator placed between key fields (ASCII unit separator).
///
/// Ordinary text does not contain it, but a field that does can still
/// collide with a differently split key. Treat it as a best-effort
/// disambiguator.
pub const KEY_SEPARATOR: char = '\u{1f}';

/// Whether column names and key values are compared case-sensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CaseSensitivity {
    Sensitive,
    #[default]
    Insensitive,
}

impl CaseSensitivity {
    /// Maps a boolean `case_sensitive` flag onto the enum.
    pub fn from_flag(case_sensitive: bool) -> Self {
        if case_sensitive {
            Self::Sensitive
        } else {
            Self::Insensitive
        }
    }

    /// Folds a value for comparison. Borrows when no folding is needed.
    pub fn fold<'a>(self, value: &'a str) -> Cow<'a, str> {
        match self {
            Self::Sensitive => Cow::Borrowed(value),
            Self::Insensitive => Cow::Owned(value.to_lowercase()),
        }
    }
}

/// Key values joined by [`KEY_SEPARATOR`], folded per the key's case policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey(String);

impl CompositeKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, part) in self.0.split(KEY_SEPARATOR).enumerate() {
            if idx > 0 {
                f.write_str("|")?;
            }
            f.write_str(part)?;
        }
        Ok(())
    }
}

/// Resolved key columns plus the case policy used when comparing values.
///
/// Positions are distinct and there is at least one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    positions: Vec<usize>,
    case: CaseSensitivity,
    required_width: usize,
}

impl KeySpec {
    /// Builds a key from explicit header positions.
    pub fn new(positions: Vec<usize>, case: CaseSensitivity) -> Result<Self, ConfigError> {
        if positions.is_empty() {
            return Err(ConfigError::NoKeyColumns);
        }
        let mut seen = BTreeSet::new();
        for &position in &positions {
            if !seen.insert(position) {
                return Err(ConfigError::DuplicateKeyPosition { position });
            }
        }
        let required_width = positions.iter().copied().max().unwrap_or(0) + 1;
        Ok(Self {
            positions,
            case,
            required_width,
        })
    }

    /// Resolves `names` against `header` and builds the key.
    ///
    /// Fails on the first unknown name, on an empty name list, and when two
    /// names land on the same header column.
    pub fn from_header<S: AsRef<str>>(
        header: &[String],
        names: &[S],
        case: CaseSensitivity,
    ) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::NoKeyColumns);
        }
        let positions = resolve_columns(header, names, case)?;
        let mut seen = BTreeSet::new();
        for (name, &position) in names.iter().zip(&positions) {
            if !seen.insert(position) {
                return Err(ConfigError::DuplicateKeyColumn {
                    column: name.as_ref().to_string(),
                });
            }
        }
        Self::new(positions, case)
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Extracts the composite key for `row`.
    ///
    /// Only the key is folded; the row itself is left untouched.
    pub fn extract(&self, row: &[String]) -> Result<CompositeKey, RowError> {
        if row.len() < self.required_width {
            return Err(RowError::ShortRow {
                required: self.required_width,
                actual: row.len(),
            });
        }
        let mut key = String::new();
        for (idx, &position) in self.positions.iter().enumerate() {
            if idx > 0 {
                key.push(KEY_SEPARATOR);
            }
            key.push_str(&self.case.fold(&row[position]));
        }
        Ok(CompositeKey(key))
    }
}
