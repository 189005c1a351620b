//! Header name resolution.

use crate::error::ConfigError;
use crate::key::CaseSensitivity;

/// Finds the position of `name` in `header`. The first match wins.
pub fn resolve_column(
    header: &[String],
    name: &str,
    case: CaseSensitivity,
) -> Result<usize, ConfigError> {
    let wanted = case.fold(name);
    header
        .iter()
        .position(|column| case.fold(column) == wanted)
        .ok_or_else(|| ConfigError::UnknownColumn {
            column: name.to_string(),
        })
}

/// Resolves every requested name, or none: the first unknown name aborts.
pub fn resolve_columns<S: AsRef<str>>(
    header: &[String],
    requested: &[S],
    case: CaseSensitivity,
) -> Result<Vec<usize>, ConfigError> {
    requested
        .iter()
        .map(|name| resolve_column(header, name.as_ref(), case))
        .collect()
}
