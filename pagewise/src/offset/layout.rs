//! Page layout strategies: how many items a page holds, where it starts,
//! and how many pages a collection needs.
//!
//! [`PageWindow::with_layout`](crate::PageWindow::with_layout) accepts any
//! [`Layout`], so custom sizing schemes plug in without touching the window
//! arithmetic.

use crate::VariableError;
use crate::validate::{at_least, positive_list};

/// Sizing hooks used by the offset window.
pub trait Layout {
    /// Number of items on `page`.
    fn items(&self, page: u64) -> u64;

    /// Offset of the first item of `page`, including `outset`.
    ///
    /// Must be at least `outset`; the window rejects layouts that return
    /// less.
    fn offset(&self, page: u64, outset: u64) -> u64;

    /// Number of pages needed for `count` items, at least 1.
    fn last(&self, count: u64) -> u64;
}

/// Every page holds the same number of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed {
    items: u64,
}

impl Fixed {
    /// Create a fixed layout; `items` must be `>= 1`.
    pub fn new(items: i64) -> Result<Self, VariableError> {
        Ok(Self {
            items: at_least("items", items, 1)?,
        })
    }
}

impl Layout for Fixed {
    #[inline]
    fn items(&self, _page: u64) -> u64 {
        self.items
    }

    #[inline]
    fn offset(&self, page: u64, outset: u64) -> u64 {
        self.items * page.saturating_sub(1) + outset
    }

    #[inline]
    fn last(&self, count: u64) -> u64 {
        count.div_ceil(self.items).max(1)
    }
}

/// Page sizes that ramp up: `[3, 10, 20]` gives a short first page, a
/// medium second page and 20 items on every page after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gearbox {
    items: Vec<u64>,
    sum: u64,
    tail: u64,
}

impl Gearbox {
    /// Create a gearbox layout; the list must be non-empty, every entry
    /// `>= 1` and the total must fit in a `u64`.
    pub fn new(items: &[i64]) -> Result<Self, VariableError> {
        let items = positive_list("gearbox", items)?;
        let sum = items
            .iter()
            .try_fold(0_u64, |sum, &n| sum.checked_add(n))
            .ok_or_else(|| {
                VariableError::new("gearbox", "to sum to at most u64::MAX", format!("{items:?}"))
            })?;
        let tail = items.last().copied().unwrap_or(1);
        Ok(Self { items, sum, tail })
    }

    fn gears(&self) -> u64 {
        self.items.len() as u64
    }
}

impl Layout for Gearbox {
    fn items(&self, page: u64) -> u64 {
        usize::try_from(page.saturating_sub(1))
            .ok()
            .and_then(|idx| self.items.get(idx))
            .copied()
            .unwrap_or(self.tail)
    }

    fn offset(&self, page: u64, outset: u64) -> u64 {
        let skipped = if page <= self.gears() {
            self.items.iter().take(page.saturating_sub(1) as usize).sum()
        } else {
            self.sum + self.tail * (page - self.gears() - 1)
        };
        skipped + outset
    }

    fn last(&self, count: u64) -> u64 {
        if count > self.sum {
            return (count - self.sum).div_ceil(self.tail).max(1) + self.gears();
        }

        let mut pages = 0;
        let mut remainder = count;
        for &items in &self.items {
            if remainder == 0 {
                break;
            }
            pages += 1;
            remainder = remainder.saturating_sub(items);
        }
        pages.max(1)
    }
}
