//! Error types for both pagination engines.
//!
//! Errors are represented as distinct enum variants for pattern matching.
//! Every error is raised at the point of detection; nothing is clamped,
//! retried or silently corrected.

use thiserror::Error;

use crate::keyset::CursorError;

/// A configuration value failed its type/range constraint.
///
/// Carries the field name, the constraint that was violated and the
/// offending value as it was supplied.
///
/// # Example
///
/// ```
/// use pagewise::{OffsetConfig, OffsetError, PageWindow};
///
/// let err = PageWindow::new(&OffsetConfig::new().items(0)).unwrap_err();
/// let OffsetError::Variable(err) = err else { panic!("expected VariableError") };
/// assert_eq!(err.field, "items");
/// assert_eq!(err.to_string(), "expected :items >= 1; got 0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected :{field} {constraint}; got {value}")]
#[non_exhaustive]
pub struct VariableError {
    /// The name of the offending field.
    pub field: &'static str,
    /// Human readable constraint, e.g. `">= 1"`.
    pub constraint: String,
    /// The offending value, rendered as text.
    pub value: String,
}

impl VariableError {
    /// Create a new variable error.
    #[must_use]
    pub fn new(field: &'static str, constraint: impl Into<String>, value: impl ToString) -> Self {
        Self {
            field,
            constraint: constraint.into(),
            value: value.to_string(),
        }
    }
}

/// The requested page is past the last page.
///
/// Distinct from [`VariableError`] because it depends on a derived value
/// (`last`), not a static constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected :page in 1..{last}; got {page}")]
#[non_exhaustive]
pub struct OverflowError {
    /// The offending page.
    pub page: u64,
    /// The last valid page; the valid range is `1..=last`.
    pub last: u64,
}

impl OverflowError {
    /// The range of valid page numbers.
    #[inline]
    #[must_use]
    pub const fn valid_range(&self) -> std::ops::RangeInclusive<u64> {
        1..=self.last
    }
}

/// Errors raised while constructing a [`PageWindow`](crate::PageWindow).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum OffsetError {
    /// A configuration value failed its constraint.
    #[error(transparent)]
    Variable(#[from] VariableError),
    /// The requested page exceeds the last page.
    #[error(transparent)]
    Overflow(#[from] OverflowError),
}

impl OffsetError {
    /// Returns `true` if the requested page was past the last page.
    #[inline]
    #[must_use]
    pub const fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow(_))
    }
}

/// Errors raised by the keyset paginator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KeysetError {
    /// A configuration value failed its constraint.
    #[error(transparent)]
    Variable(#[from] VariableError),

    /// The query declares no ordering.
    #[error("query must be ordered")]
    Unordered,

    /// An ordering column cannot be used as a predicate identifier.
    #[error("invalid order column '{column}'")]
    InvalidColumn {
        /// The rejected column name.
        column: String,
    },

    /// The ordering has more columns than a page token can carry.
    #[error("ordering has {count} columns (max {max})")]
    TooManyColumns {
        /// Number of ordering columns.
        count: usize,
        /// Maximum number of columns.
        max: usize,
    },

    /// The page token could not be decoded.
    #[error("malformed page token: {0}")]
    Decode(#[from] CursorError),

    /// The next page token would exceed the limits `Decode` enforces.
    #[error("next page token cannot be issued: {0}")]
    Encode(#[source] CursorError),

    /// The decoded cursor keys do not match the live ordering.
    #[error("cursor inconsistent with ordering: expected {expected:?}, got {found:?}")]
    CursorMismatch {
        /// The ordering columns, in order.
        expected: Vec<String>,
        /// The cursor keys, in order.
        found: Vec<String>,
    },

    /// A fetched record does not expose an ordering column.
    #[error("record is missing order column '{column}'")]
    MissingColumn {
        /// The missing column name.
        column: String,
    },

    /// The underlying query failed to fetch records.
    #[error("fetch failed")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl KeysetError {
    /// Wrap a collaborator error, keeping it reachable through `source()`.
    pub(crate) fn fetch<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Fetch(Box::new(err))
    }

    /// Returns `true` for errors caused by the ordering or the page token
    /// rather than by configuration or the backend.
    #[inline]
    #[must_use]
    pub const fn is_ordering_error(&self) -> bool {
        matches!(
            self,
            Self::Unordered
                | Self::InvalidColumn { .. }
                | Self::TooManyColumns { .. }
                | Self::CursorMismatch { .. }
        )
    }
}
