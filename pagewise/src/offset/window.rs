//! The offset page window.

use serde::Serialize;
use tracing::debug;

use super::config::OffsetConfig;
use super::layout::{Fixed, Gearbox, Layout};
use super::series::{SeriesItem, series};
use crate::validate::at_least;
use crate::{OffsetError, OverflowError, VariableError};

/// Page-window arithmetic for one offset pagination request.
///
/// Immutable once constructed. `1 <= page <= last` always holds; a request
/// past the last page fails with an [`OverflowError`] instead of clamping.
///
/// `from`, `to` and `in` describe the 1-based inclusive range of records
/// shown on this page, clamped so a partial last page reports fewer than
/// `items` (and an empty collection reports zeros).
///
/// # Example
///
/// ```
/// use pagewise::{OffsetConfig, PageWindow};
///
/// let window = PageWindow::new(&OffsetConfig::new().count(1000).page(3)).unwrap();
/// assert_eq!(window.offset(), 40);
/// assert_eq!((window.from(), window.to(), window.in_page()), (41, 60, 20));
/// assert_eq!((window.prev(), window.next()), (Some(2), Some(4)));
/// assert_eq!(window.last(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    count: u64,
    page: u64,
    items: u64,
    outset: u64,
    last: u64,
    offset: u64,
    from: u64,
    to: u64,
    #[serde(rename = "in")]
    in_page: u64,
    prev: Option<u64>,
    next: Option<u64>,
    #[serde(skip)]
    size: u64,
    #[serde(skip)]
    ends: bool,
}

impl PageWindow {
    /// Validate `config` and compute the window.
    ///
    /// Uses a [`Gearbox`] layout when `config.gearbox` is set, a [`Fixed`]
    /// layout of `config.items` otherwise.
    pub fn new(config: &OffsetConfig) -> Result<Self, OffsetError> {
        match &config.gearbox {
            Some(gearbox) => Self::with_layout(config, &Gearbox::new(gearbox)?),
            None => Self::with_layout(config, &Fixed::new(config.items)?),
        }
    }

    /// Validate `config` and compute the window with a custom [`Layout`].
    ///
    /// `config.items` and `config.gearbox` are ignored; the layout decides
    /// page sizes, offsets and the page count.
    pub fn with_layout<L>(config: &OffsetConfig, layout: &L) -> Result<Self, OffsetError>
    where
        L: Layout + ?Sized,
    {
        let count = at_least("count", config.count, 0)?;
        let page = at_least("page", config.page, 1)?;
        let outset = at_least("outset", config.outset, 0)?;
        let size = at_least("size", config.size, 0)?;
        let max_pages = config
            .max_pages
            .map(|max| at_least("max_pages", max, 1))
            .transpose()?;

        let items = layout.items(page);
        if items == 0 {
            return Err(VariableError::new("items", ">= 1", items).into());
        }

        let mut last = layout.last(count);
        if let Some(max) = max_pages {
            last = last.min(max);
        }
        if page > last {
            return Err(OverflowError { page, last }.into());
        }

        let offset = layout.offset(page, outset);
        let Some(skipped) = offset.checked_sub(outset) else {
            return Err(VariableError::new("offset", format!(">= :outset ({outset})"), offset).into());
        };
        let from = skipped.saturating_add(1).min(count);
        let to = skipped.saturating_add(items).min(count);
        let in_page = (to - from + 1).min(count);
        let prev = (page != 1).then(|| page - 1);
        let next = if page == last {
            config.cycle.then_some(1)
        } else {
            Some(page + 1)
        };

        debug!(count, page, items, last, offset, "page window computed");

        Ok(Self {
            count,
            page,
            items,
            outset,
            last,
            offset,
            from,
            to,
            in_page,
            prev,
            next,
            size,
            ends: config.ends,
        })
    }

    /// Total items in the collection.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Current page, 1-based.
    #[inline]
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Size of the current page.
    #[inline]
    #[must_use]
    pub const fn items(&self) -> u64 {
        self.items
    }

    /// Items skipped before pagination starts.
    #[inline]
    #[must_use]
    pub const fn outset(&self) -> u64 {
        self.outset
    }

    /// Last valid page.
    #[inline]
    #[must_use]
    pub const fn last(&self) -> u64 {
        self.last
    }

    /// Alias of [`last`](Self::last).
    #[inline]
    #[must_use]
    pub const fn pages(&self) -> u64 {
        self.last
    }

    /// Number of items to skip in the underlying query.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Position of the first item on this page (0 when empty).
    #[inline]
    #[must_use]
    pub const fn from(&self) -> u64 {
        self.from
    }

    /// Position of the last item on this page (0 when empty).
    #[inline]
    #[must_use]
    pub const fn to(&self) -> u64 {
        self.to
    }

    /// Number of items on this page.
    #[inline]
    #[must_use]
    pub const fn in_page(&self) -> u64 {
        self.in_page
    }

    /// Previous page, if any.
    #[inline]
    #[must_use]
    pub const fn prev(&self) -> Option<u64> {
        self.prev
    }

    /// Next page, if any. Wraps to 1 on the last page when `cycle` is set.
    #[inline]
    #[must_use]
    pub const fn next(&self) -> Option<u64> {
        self.next
    }

    /// Label of the current page.
    #[must_use]
    pub fn label(&self) -> String {
        self.page.to_string()
    }

    /// Label of any page.
    #[must_use]
    pub fn label_for(&self, page: u64) -> String {
        page.to_string()
    }

    /// Page strip using the configured `size` and `ends`.
    #[must_use]
    pub fn series(&self) -> Vec<SeriesItem> {
        series(self.last, self.page, self.size, self.ends)
    }

    /// Page strip of a different width.
    pub fn series_sized(&self, size: i64) -> Result<Vec<SeriesItem>, VariableError> {
        let size = at_least("size", size, 0)?;
        Ok(series(self.last, self.page, size, self.ends))
    }
}
