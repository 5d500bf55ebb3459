//! Keyset pagination predicate generation.

use std::cmp::Ordering;

use serde_json::Value;

use super::cursor::Cursor;
use super::order::{OrderSpec, SortDir};
use super::query::Record;

/// Comparison operators used in keyset predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Operator {
    /// Equal: `=`
    Eq,
    /// Greater than: `>`
    Gt,
    /// Less than: `<`
    Lt,
}

impl Operator {
    /// SQL token.
    #[inline]
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }

    /// Whether `ordering` (left compared to right) satisfies the operator.
    #[inline]
    #[must_use]
    pub const fn holds(self, ordering: Ordering) -> bool {
        matches!(
            (self, ordering),
            (Self::Eq, Ordering::Equal) | (Self::Gt, Ordering::Greater) | (Self::Lt, Ordering::Less)
        )
    }
}

/// A predicate tree over ordering columns.
///
/// Every column is compared against the named parameter of the same name
/// (`column > :column`); values never appear in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Condition {
    /// `column <op> :column`
    Compare {
        /// Column name.
        column: String,
        /// Comparison operator.
        op: Operator,
    },
    /// `(c1, c2, …) <op> (:c1, :c2, …)`
    Row {
        /// Column names, coarsest first.
        columns: Vec<String>,
        /// Comparison operator.
        op: Operator,
    },
    /// All conditions must match.
    And(Vec<Condition>),
    /// At least one condition must match.
    Or(Vec<Condition>),
}

impl Condition {
    fn compare(column: &str, op: Operator) -> Self {
        Self::Compare {
            column: column.to_string(),
            op,
        }
    }

    /// Render as SQL with `:column` placeholders.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Compare { column, op } => format!("{column} {} :{column}", op.as_sql()),
            Self::Row { columns, op } => {
                let placeholders: Vec<String> = columns.iter().map(|c| format!(":{c}")).collect();
                format!(
                    "({}) {} ({})",
                    columns.join(", "),
                    op.as_sql(),
                    placeholders.join(", ")
                )
            },
            Self::And(conditions) => join(conditions, " AND "),
            Self::Or(conditions) => join(conditions, " OR "),
        }
    }

    /// Evaluate against `record`, reading parameters from `params`.
    ///
    /// Values are compared the way a database would for the common key
    /// types: numbers numerically, strings lexically, booleans with
    /// `false < true`. Missing columns and incomparable values (including
    /// `null`) never match, like SQL `NULL` comparisons.
    #[must_use]
    pub fn evaluate<R>(&self, record: &R, params: &Cursor) -> bool
    where
        R: Record + ?Sized,
    {
        match self {
            Self::Compare { column, op } => {
                compare_column(record, params, column).is_some_and(|ord| op.holds(ord))
            },
            Self::Row { columns, op } => {
                let mut ordering = Some(Ordering::Equal);
                for column in columns {
                    match compare_column(record, params, column) {
                        Some(Ordering::Equal) => {},
                        other => {
                            ordering = other;
                            break;
                        },
                    }
                }
                ordering.is_some_and(|ord| op.holds(ord))
            },
            Self::And(conditions) => conditions.iter().all(|c| c.evaluate(record, params)),
            Self::Or(conditions) => conditions.iter().any(|c| c.evaluate(record, params)),
        }
    }
}

fn join(conditions: &[Condition], sep: &str) -> String {
    if let [single] = conditions {
        return single.to_sql();
    }
    let parts: Vec<String> = conditions.iter().map(Condition::to_sql).collect();
    format!("({})", parts.join(sep))
}

fn compare_column<R>(record: &R, params: &Cursor, column: &str) -> Option<Ordering>
where
    R: Record + ?Sized,
{
    compare_values(&record.column(column)?, params.get(column)?)
}

/// Order two JSON values of the same kind.
pub(super) fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_i64(), r.as_i64()) {
            (Some(l), Some(r)) => Some(l.cmp(&r)),
            _ => l.as_f64()?.partial_cmp(&r.as_f64()?),
        },
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

/// A keyset predicate: either synthesized from the ordering or supplied by
/// the caller as raw SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Predicate {
    /// Synthesized predicate tree.
    Condition(Condition),
    /// Caller-supplied SQL using `:column` placeholders.
    Raw(String),
}

impl Predicate {
    /// Build the "rows after the cursor" predicate for `order`.
    ///
    /// With `row_comparison` and a single shared direction this is a
    /// row-value comparison, which a composite index can serve directly:
    ///
    /// `(animal, name, id) > (:animal, :name, :id)`
    ///
    /// Otherwise (and always for mixed directions) it is the generic
    /// disjunction, finest column first:
    ///
    /// `((animal = :animal AND name = :name AND id > :id) OR (animal = :animal AND name > :name) OR animal > :animal)`
    ///
    /// See: <https://use-the-index-luke.com/no-offset>
    #[must_use]
    pub fn build(order: &OrderSpec, row_comparison: bool) -> Self {
        let fields = order.fields();

        if row_comparison && let Some(dir) = order.uniform_dir() {
            return Self::Condition(Condition::Row {
                columns: order.columns().map(String::from).collect(),
                op: dir.after(),
            });
        }

        let mut disjuncts: Vec<Condition> = (0..fields.len())
            .rev()
            .map(|i| {
                let mut conjuncts: Vec<Condition> = fields[..i]
                    .iter()
                    .map(|f| Condition::compare(&f.column, Operator::Eq))
                    .collect();
                conjuncts.push(Condition::compare(&fields[i].column, fields[i].dir.after()));

                if conjuncts.len() == 1 {
                    conjuncts.remove(0)
                } else {
                    Condition::And(conjuncts)
                }
            })
            .collect();

        if disjuncts.len() == 1 {
            Self::Condition(disjuncts.remove(0))
        } else {
            Self::Condition(Condition::Or(disjuncts))
        }
    }

    /// Wrap caller-supplied SQL.
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Render as SQL with `:column` placeholders.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Condition(condition) => condition.to_sql(),
            Self::Raw(sql) => sql.clone(),
        }
    }

    /// The predicate tree, unless this is raw SQL.
    #[must_use]
    pub const fn condition(&self) -> Option<&Condition> {
        match self {
            Self::Condition(condition) => Some(condition),
            Self::Raw(_) => None,
        }
    }
}

/// A predicate plus the cursor values bound to its named parameters.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct BoundPredicate {
    /// The predicate.
    pub predicate: Predicate,
    /// Parameter values, keyed by column name.
    pub params: Cursor,
}

impl BoundPredicate {
    /// Bind `params` to `predicate`.
    pub const fn new(predicate: Predicate, params: Cursor) -> Self {
        Self { predicate, params }
    }

    /// SQL text with `:column` placeholders.
    #[must_use]
    pub fn sql(&self) -> String {
        self.predicate.to_sql()
    }

    /// Parameters as `(":column", value)` pairs, ready for drivers that
    /// bind named parameters.
    pub fn named_params(&self) -> impl Iterator<Item = (String, &Value)> {
        self.params.iter().map(|(name, value)| (format!(":{name}"), value))
    }
}
