//! Column identifier validation for keyset predicates.
//!
//! Order columns are written into the predicate text verbatim and reused as
//! named placeholders (`:column`), so they must be plain identifiers.

use crate::KeysetError;

/// Maximum length for column identifiers (`PostgreSQL` limit is 63).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate that a string can be used as an order column.
///
/// A valid column:
/// - Starts with a letter (a-z, A-Z) or underscore
/// - Contains only letters, digits (0-9), and underscores
/// - Is not empty and not longer than 63 characters
///
/// # Examples
///
/// ```
/// use pagewise::is_valid_column;
///
/// assert!(is_valid_column("id"));
/// assert!(is_valid_column("created_at"));
/// assert!(is_valid_column("_rank"));
///
/// assert!(!is_valid_column(""));            // empty
/// assert!(!is_valid_column("2fast"));       // starts with digit
/// assert!(!is_valid_column("pets.id"));     // qualified names can't be placeholders
/// assert!(!is_valid_column("id; DROP"));    // special chars
/// ```
#[inline]
#[must_use]
pub fn is_valid_column(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut chars = s.chars();

    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Reject a column that cannot appear in a predicate.
pub(crate) fn check_column(column: &str) -> Result<(), KeysetError> {
    if is_valid_column(column) {
        Ok(())
    } else {
        Err(KeysetError::InvalidColumn {
            column: column.to_string(),
        })
    }
}
