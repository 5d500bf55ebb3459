//! Validation shared by the offset and keyset engines.
//!
//! - Minimum-value checks for paging variables (`items`, `page`, `count`, ...)
//! - Column identifiers, which are interpolated into predicate text
//!
//! Both engines call these once, at construction time.

mod column;
mod number;

pub use column::is_valid_column;
pub(crate) use column::check_column;
pub(crate) use number::{at_least, positive_list};
