//! Ordering columns and directions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cursor::MAX_CURSOR_FIELDS;
use super::predicate::Operator;
use super::query::OrderedQuery;
use crate::KeysetError;
use crate::validate::check_column;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum SortDir {
    /// Ascending: `ASC`
    #[default]
    Asc,
    /// Descending: `DESC`
    Desc,
}

impl SortDir {
    /// The strict comparison selecting rows after a cursor in this direction.
    #[inline]
    #[must_use]
    pub const fn after(self) -> Operator {
        match self {
            Self::Asc => Operator::Gt,
            Self::Desc => Operator::Lt,
        }
    }

    /// SQL keyword.
    #[inline]
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One ordering column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct SortField {
    /// Column name.
    pub column: String,
    /// Direction.
    pub dir: SortDir,
}

impl SortField {
    /// Create a sort field.
    pub fn new(column: impl Into<String>, dir: SortDir) -> Self {
        Self {
            column: column.into(),
            dir,
        }
    }

    /// Ascending sort on `column`.
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortDir::Asc)
    }

    /// Descending sort on `column`.
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortDir::Desc)
    }
}

/// The ordering a keyset paginator walks.
///
/// Non-empty, and order matters: the last field is the finest tie-breaker.
/// The concatenation of the columns should be unique; add the primary key
/// as the last column when it might not be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    fields: Vec<SortField>,
}

impl OrderSpec {
    /// Validate an ordering.
    ///
    /// Fails with [`KeysetError::Unordered`] when `fields` is empty,
    /// [`KeysetError::TooManyColumns`] past 16 columns (the most a page
    /// token carries) and [`KeysetError::InvalidColumn`] for columns that
    /// are not plain identifiers or that appear twice.
    pub fn new(fields: Vec<SortField>) -> Result<Self, KeysetError> {
        if fields.is_empty() {
            return Err(KeysetError::Unordered);
        }
        if fields.len() > MAX_CURSOR_FIELDS {
            return Err(KeysetError::TooManyColumns {
                count: fields.len(),
                max: MAX_CURSOR_FIELDS,
            });
        }
        for (idx, field) in fields.iter().enumerate() {
            check_column(&field.column)?;
            if fields[..idx].iter().any(|f| f.column == field.column) {
                return Err(KeysetError::InvalidColumn {
                    column: field.column.clone(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// Read the declared ordering of `query`.
    ///
    /// No default ordering is invented: an unordered query is an error.
    pub fn from_query<Q>(query: &Q) -> Result<Self, KeysetError>
    where
        Q: OrderedQuery + ?Sized,
    {
        let order = Self::new(query.order())?;
        debug!(order = %order.to_sql(), "keyset order extracted");
        Ok(order)
    }

    /// Ordering fields, coarsest first.
    #[must_use]
    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    /// Column names, coarsest first.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.column.as_str())
    }

    /// Number of ordering columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The shared direction, if every column sorts the same way.
    #[must_use]
    pub fn uniform_dir(&self) -> Option<SortDir> {
        let first = self.fields.first()?.dir;
        self.fields.iter().all(|f| f.dir == first).then_some(first)
    }

    /// `ORDER BY` body, e.g. `animal ASC, id DESC`.
    #[must_use]
    pub fn to_sql(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("{} {}", f.column, f.dir.as_sql()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
