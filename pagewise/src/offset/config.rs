//! Offset pagination configuration.

use serde::Deserialize;

/// Default page size.
pub const DEFAULT_ITEMS: i64 = 20;

/// Default width of the page strip returned by [`PageWindow::series`](crate::PageWindow::series).
pub const DEFAULT_SIZE: i64 = 7;

/// Configuration for an offset [`PageWindow`](crate::PageWindow).
///
/// Values are kept as signed integers so that out-of-range input (e.g. a
/// negative page coming from a deserialized request) reaches validation and
/// is reported as a [`VariableError`](crate::VariableError) naming the field.
/// Validation happens once, in [`PageWindow::new`](crate::PageWindow::new).
///
/// Unknown keys are rejected when deserializing.
///
/// # Example
///
/// ```
/// use pagewise::OffsetConfig;
///
/// let config = OffsetConfig::new().count(1000).page(3).items(25);
/// assert_eq!(config.size, 7);
///
/// let config: OffsetConfig = serde_json::from_str(r#"{"count": 1000, "page": 3}"#).unwrap();
/// assert_eq!(config.items, 20);
///
/// let unknown = serde_json::from_str::<OffsetConfig>(r#"{"per_page": 10}"#);
/// assert!(unknown.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct OffsetConfig {
    /// Total number of items in the collection.
    pub count: i64,
    /// Requested page, 1-based.
    pub page: i64,
    /// Page size.
    pub items: i64,
    /// Items to skip before pagination starts.
    pub outset: i64,
    /// Width of the page strip.
    pub size: i64,
    /// Always show the first and last page in the strip (needs `size >= 7`).
    pub ends: bool,
    /// Upper bound for the number of pages.
    pub max_pages: Option<i64>,
    /// Wrap `next` around to page 1 on the last page.
    pub cycle: bool,
    /// Per-page sizes; overrides `items` when present.
    pub gearbox: Option<Vec<i64>>,
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            count: 0,
            page: 1,
            items: DEFAULT_ITEMS,
            outset: 0,
            size: DEFAULT_SIZE,
            ends: true,
            max_pages: None,
            cycle: false,
            gearbox: None,
        }
    }
}

impl OffsetConfig {
    /// Create a configuration with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total item count.
    #[must_use]
    pub const fn count(mut self, count: i64) -> Self {
        self.count = count;
        self
    }

    /// Set the requested page.
    #[must_use]
    pub const fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    /// Set the page size.
    #[must_use]
    pub const fn items(mut self, items: i64) -> Self {
        self.items = items;
        self
    }

    /// Set the number of items skipped before pagination starts.
    #[must_use]
    pub const fn outset(mut self, outset: i64) -> Self {
        self.outset = outset;
        self
    }

    /// Set the page strip width.
    #[must_use]
    pub const fn size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    /// Enable or disable forced first/last pages in the strip.
    #[must_use]
    pub const fn ends(mut self, ends: bool) -> Self {
        self.ends = ends;
        self
    }

    /// Cap the number of pages.
    #[must_use]
    pub const fn max_pages(mut self, max_pages: i64) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Enable or disable wrap-around of `next` on the last page.
    #[must_use]
    pub const fn cycle(mut self, cycle: bool) -> Self {
        self.cycle = cycle;
        self
    }

    /// Use variable page sizes: page `n` holds `gearbox[n - 1]` items, and
    /// every page past the end of the list holds the last entry.
    #[must_use]
    pub fn gearbox(mut self, items: &[i64]) -> Self {
        self.gearbox = Some(items.to_vec());
        self
    }
}
