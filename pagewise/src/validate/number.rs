//! Minimum-value checks for paging variables.

use crate::VariableError;

/// Validate that `value >= min` and return it as an unsigned count.
///
/// Negative minimums are not supported; every paging variable is a count
/// or a 1-based index.
pub(crate) fn at_least(field: &'static str, value: i64, min: u64) -> Result<u64, VariableError> {
    match u64::try_from(value) {
        Ok(v) if v >= min => Ok(v),
        _ => Err(VariableError::new(field, format!(">= {min}"), value)),
    }
}

/// Validate a non-empty list of positive integers.
pub(crate) fn positive_list(field: &'static str, values: &[i64]) -> Result<Vec<u64>, VariableError> {
    let invalid = || {
        VariableError::new(
            field,
            "to be a non-empty list of Integers >= 1",
            format!("{values:?}"),
        )
    };

    if values.is_empty() {
        return Err(invalid());
    }
    values
        .iter()
        .map(|&v| u64::try_from(v).ok().filter(|&v| v >= 1).ok_or_else(invalid))
        .collect()
}
