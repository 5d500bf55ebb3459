//! The ordered-query capability the keyset paginator drives.
//!
//! Implement [`OrderedQuery`] for your query builder or ORM scope; the
//! paginator only needs the declared ordering, column selection, a way to
//! apply a bound predicate, a row limit and materialization.

use serde_json::{Map, Value};

use super::order::SortField;
use super::predicate::BoundPredicate;

/// A fetched row that can be projected onto named columns.
pub trait Record {
    /// Value of `column`, or `None` if the record doesn't carry it.
    fn column(&self, column: &str) -> Option<Value>;
}

impl Record for Map<String, Value> {
    fn column(&self, column: &str) -> Option<Value> {
        self.get(column).cloned()
    }
}

impl Record for Value {
    fn column(&self, column: &str) -> Option<Value> {
        self.get(column).cloned()
    }
}

/// An already-ordered query.
///
/// The paginator calls `selection`/`select` and `order` at construction,
/// then `filter`, `limit` and `fetch` exactly once, on first access to the
/// records. Fetch failures are returned unchanged inside
/// [`KeysetError::Fetch`](crate::KeysetError::Fetch).
pub trait OrderedQuery {
    /// Record type produced by [`fetch`](Self::fetch).
    type Record: Record;
    /// Error produced by [`fetch`](Self::fetch).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Declared ordering, coarsest column first. Empty when unordered.
    fn order(&self) -> Vec<SortField>;

    /// Explicitly selected columns, or `None` when every column is selected.
    fn selection(&self) -> Option<Vec<String>>;

    /// Add `columns` to an explicit selection.
    fn select(&mut self, columns: &[String]);

    /// Restrict the query with `predicate`, binding its named parameters.
    fn filter(&mut self, predicate: BoundPredicate);

    /// Limit the number of returned rows.
    fn limit(&mut self, limit: usize);

    /// Run the query.
    fn fetch(&mut self) -> Result<Vec<Self::Record>, Self::Error>;

    /// Typecast a decoded cursor value for `column`.
    ///
    /// Cursor values arrive as JSON; override this to turn them back into
    /// the column's native representation (e.g. normalize timestamps).
    fn cast(&self, column: &str, value: Value) -> Value {
        let _ = column;
        value
    }
}
