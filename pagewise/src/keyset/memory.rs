//! An in-memory [`OrderedQuery`] over JSON records.

use std::cmp::Ordering;

use serde_json::{Map, Value};
use thiserror::Error;

use super::order::{SortDir, SortField};
use super::predicate::{BoundPredicate, Predicate, compare_values};
use super::query::OrderedQuery;

/// Errors from [`MemoryQuery::fetch`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MemoryError {
    /// Raw SQL predicates can't be evaluated in memory.
    #[error("raw SQL predicates are not supported in memory: {0}")]
    RawPredicate(String),
}

/// Keyset-paginate a `Vec` of JSON objects.
///
/// Records are sorted by the declared ordering on fetch, filtered with the
/// bound predicate tree and projected onto the selection.
///
/// ```
/// use pagewise::{Keyset, KeysetConfig, MemoryQuery, SortField};
/// use serde_json::json;
///
/// let rows = (1..=25).map(|id| json!({"id": id})).collect();
/// let query = MemoryQuery::new(rows).order_by(SortField::asc("id"));
///
/// let mut page = Keyset::new(query, KeysetConfig::new().items(10))?;
/// assert_eq!(page.records()?.len(), 10);
/// assert!(page.next()?.is_some());
/// # Ok::<(), pagewise::KeysetError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryQuery {
    rows: Vec<Map<String, Value>>,
    order: Vec<SortField>,
    selection: Option<Vec<String>>,
    predicate: Option<BoundPredicate>,
    limit: Option<usize>,
}

impl MemoryQuery {
    /// Create an unordered query over `rows`; non-object values are skipped.
    #[must_use]
    pub fn new(rows: Vec<Value>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .filter_map(|row| match row {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Append an ordering column.
    #[must_use]
    pub fn order_by(mut self, field: SortField) -> Self {
        self.order.push(field);
        self
    }

    /// Restrict the returned columns.
    #[must_use]
    pub fn only(mut self, columns: &[&str]) -> Self {
        self.selection = Some(columns.iter().map(|c| (*c).to_string()).collect());
        self
    }

    fn compare(&self, left: &Map<String, Value>, right: &Map<String, Value>) -> Ordering {
        for field in &self.order {
            let ordering = compare_column(left.get(&field.column), right.get(&field.column));
            let ordering = match field.dir {
                SortDir::Asc => ordering,
                SortDir::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// Sort order for one column. Values of the same kind compare exactly as
/// predicates compare them; across kinds, nulls/missing sort first, then
/// booleans, numbers and strings.
fn compare_column(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    let left = left.unwrap_or(&Value::Null);
    let right = right.unwrap_or(&Value::Null);
    compare_values(left, right).unwrap_or_else(|| kind(left).cmp(&kind(right)))
}

const fn kind(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) | Value::Object(_) => 4,
    }
}

impl OrderedQuery for MemoryQuery {
    type Record = Map<String, Value>;
    type Error = MemoryError;

    fn order(&self) -> Vec<SortField> {
        self.order.clone()
    }

    fn selection(&self) -> Option<Vec<String>> {
        self.selection.clone()
    }

    fn select(&mut self, columns: &[String]) {
        if let Some(selection) = &mut self.selection {
            selection.extend(columns.iter().cloned());
        }
    }

    fn filter(&mut self, predicate: BoundPredicate) {
        self.predicate = Some(predicate);
    }

    fn limit(&mut self, limit: usize) {
        self.limit = Some(limit);
    }

    fn fetch(&mut self) -> Result<Vec<Self::Record>, Self::Error> {
        let condition = match &self.predicate {
            Some(BoundPredicate {
                predicate: Predicate::Raw(sql),
                ..
            }) => return Err(MemoryError::RawPredicate(sql.clone())),
            Some(bound) => bound.predicate.condition().map(|c| (c, &bound.params)),
            None => None,
        };

        let mut rows: Vec<&Map<String, Value>> = self
            .rows
            .iter()
            .filter(|row| condition.is_none_or(|(c, params)| c.evaluate(*row, params)))
            .collect();
        rows.sort_by(|a, b| self.compare(a, b));

        Ok(rows
            .into_iter()
            .take(self.limit.unwrap_or(usize::MAX))
            .map(|row| match &self.selection {
                Some(columns) => columns
                    .iter()
                    .filter_map(|c| row.get(c).map(|v| (c.clone(), v.clone())))
                    .collect(),
                None => row.clone(),
            })
            .collect())
    }
}
