// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Column names and SQL fragments in docs
#![allow(clippy::missing_errors_doc)] // Error enums document their own variants
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Config setters return Self
#![allow(clippy::must_use_candidate)] // Accessors on plain data
#![allow(clippy::match_same_arms)] // Operator tables read clearer unmerged
#![allow(clippy::indexing_slicing)] // Prefix slices of the ordering, bounded by its length

//! # pagewise - Offset and Keyset Pagination
//!
//! Two pagination engines that share one error vocabulary:
//!
//! - **Offset**: [`PageWindow`] turns `(count, page, items)` into the
//!   `LIMIT`/`OFFSET` for a query plus everything a UI needs to render
//!   navigation: `from`/`to`, `prev`/`next` and a compact page strip with
//!   gaps ([`PageWindow::series`]).
//! - **Keyset**: [`Keyset`] paginates an already-ordered query by filtering
//!   on the last record seen, encoded as an opaque token. Deep pages cost
//!   the same as the first one.
//!
//! | Strategy   | Jump to Page | Performance | Stability | Use Case               |
//! |------------|--------------|-------------|-----------|------------------------|
//! | **Offset** | Yes          | O(n) skip   | Unstable* | Admin panels, reports  |
//! | **Keyset** | No           | O(1)        | Stable    | Large datasets, APIs   |
//!
//! *Unstable = results shift if data changes between requests
//!
//! ## Offset
//!
//! ```
//! use pagewise::prelude::*;
//!
//! let window = PageWindow::new(&OffsetConfig::new().count(1000).page(3).items(10))?;
//! assert_eq!(window.offset(), 20);
//! assert_eq!((window.from(), window.to()), (21, 30));
//! assert_eq!((window.prev(), window.next()), (Some(2), Some(4)));
//! assert_eq!(window.last(), 100);
//! # Ok::<(), pagewise::OffsetError>(())
//! ```
//!
//! Requesting a page past the end is an [`OverflowError`], never a clamp:
//!
//! ```
//! use pagewise::prelude::*;
//!
//! let err = PageWindow::new(&OffsetConfig::new().count(100).page(6)).unwrap_err();
//! assert!(err.is_overflow());
//! assert_eq!(err.to_string(), "expected :page in 1..5; got 6");
//! ```
//!
//! ## Keyset
//!
//! Implement [`OrderedQuery`] for your query type, or use the in-memory
//! [`MemoryQuery`]:
//!
//! ```
//! use pagewise::prelude::*;
//! use serde_json::json;
//!
//! let rows: Vec<_> = (1..=50).map(|id| json!({"id": id})).collect();
//!
//! let query = MemoryQuery::new(rows.clone()).order_by(SortField::asc("id"));
//! let mut page = Keyset::new(query, KeysetConfig::new().items(10))?;
//! let next = page.next()?.map(String::from);
//! assert_eq!(next.as_deref(), Some("eyJpZCI6MTB9"));
//!
//! let query = MemoryQuery::new(rows).order_by(SortField::asc("id"));
//! let mut page = Keyset::new(query, KeysetConfig::new().items(10).page(next.unwrap_or_default()))?;
//! assert_eq!(page.records()?.first().and_then(|r| r["id"].as_i64()), Some(11));
//! # Ok::<(), pagewise::KeysetError>(())
//! ```
//!
//! ## Logging
//!
//! Both engines emit [`tracing`] events at `debug` (computed windows,
//! prepared and fetched keyset pages) and `trace` (the rendered keyset
//! predicate). No subscriber is installed by this crate.

mod error;
mod keyset;
mod offset;
mod validate;

pub use error::{KeysetError, OffsetError, OverflowError, VariableError};
pub use keyset::{
    BoundPredicate, Condition, Cursor, CursorError, Keyset, KeysetConfig, MemoryError,
    MemoryQuery, Operator, OrderSpec, OrderedQuery, Predicate, Record, SortDir, SortField,
};
pub use offset::{
    DEFAULT_ITEMS, DEFAULT_SIZE, Fixed, Gearbox, Layout, OffsetConfig, PageWindow, SeriesItem,
    series,
};
pub use validate::is_valid_column;

/// Prelude module for convenient imports.
///
/// ```
/// use pagewise::prelude::*;
/// let strip = series(10, 5, 7, true);
/// assert_eq!(strip.len(), 7);
/// ```
pub mod prelude {
    pub use crate::{
        Cursor, CursorError, Keyset, KeysetConfig, KeysetError, Layout, MemoryQuery, OffsetConfig,
        OffsetError, OrderSpec, OrderedQuery, OverflowError, PageWindow, Predicate, Record,
        SeriesItem, SortDir, SortField, VariableError, series,
    };
}

// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
