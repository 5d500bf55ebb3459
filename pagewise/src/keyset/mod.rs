//! Keyset pagination: pages that start strictly after the last record seen.
//!
//! The client never sees an offset. Each page carries an opaque token that
//! encodes the ordering-column values of its last record; the next query
//! filters on those values with a predicate derived from the ordering, so
//! cost stays flat no matter how deep the client goes.
//!
//! # Tokens
//!
//! A token is the compact JSON object of the last record's ordering columns
//! (in ordering order) encoded as URL-safe, unpadded base64:
//!
//! ```
//! use pagewise::Cursor;
//!
//! let cursor = Cursor::new().int("id", 10);
//! assert_eq!(cursor.encode(), "eyJpZCI6MTB9");
//! assert_eq!(Cursor::decode("eyJpZCI6MTB9")?, cursor);
//! # Ok::<(), pagewise::CursorError>(())
//! ```
//!
//! # Predicates
//!
//! For an ordering `(c1, ..., cn)` the filter admits rows after the cursor
//! in lexicographic order. With all directions equal and
//! [`row_comparison`](KeysetConfig::row_comparison) enabled, it is a single
//! row-value comparison; otherwise a disjunction of prefix-equality terms:
//!
//! ```
//! use pagewise::{OrderSpec, Predicate, SortField};
//!
//! let order = OrderSpec::new(vec![SortField::asc("animal"), SortField::asc("id")])?;
//! assert_eq!(
//!     Predicate::build(&order, false).to_sql(),
//!     "((animal = :animal AND id > :id) OR animal > :animal)"
//! );
//! assert_eq!(Predicate::build(&order, true).to_sql(), "(animal, id) > (:animal, :id)");
//! # Ok::<(), pagewise::KeysetError>(())
//! ```
//!
//! The ordering must be total: the last column should be unique (usually
//! the primary key), or records sharing a full key can be skipped.

mod config;
mod cursor;
mod encoding;
mod memory;
mod order;
mod paginator;
mod predicate;
mod query;

pub use config::KeysetConfig;
pub use cursor::{Cursor, CursorError};
pub use memory::{MemoryError, MemoryQuery};
pub use order::{OrderSpec, SortDir, SortField};
pub use paginator::Keyset;
pub use predicate::{BoundPredicate, Condition, Operator, Predicate};
pub use query::{OrderedQuery, Record};
