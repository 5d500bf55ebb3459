//! Page strip generation with gap markers.

use serde::{Serialize, Serializer};

/// One element of a page strip.
///
/// Serializes the way UI code expects it: page numbers as numbers, the
/// current page as its string form and gaps as `"gap"`, e.g.
/// `[1,"gap",8,"9",10,"gap",36]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SeriesItem {
    /// A link-able page number.
    Page(u64),
    /// The current page.
    Current(u64),
    /// An elided run of pages.
    Gap,
}

impl SeriesItem {
    /// The page number, if this item is not a gap.
    #[inline]
    #[must_use]
    pub const fn page(&self) -> Option<u64> {
        match self {
            Self::Page(page) | Self::Current(page) => Some(*page),
            Self::Gap => None,
        }
    }

    /// Returns `true` for the current page.
    #[inline]
    #[must_use]
    pub const fn is_current(&self) -> bool {
        matches!(self, Self::Current(_))
    }

    /// Returns `true` for a gap marker.
    #[inline]
    #[must_use]
    pub const fn is_gap(&self) -> bool {
        matches!(self, Self::Gap)
    }
}

impl Serialize for SeriesItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Page(page) => serializer.serialize_u64(*page),
            Self::Current(page) => serializer.collect_str(page),
            Self::Gap => serializer.serialize_str("gap"),
        }
    }
}

/// Build the page strip for `page` out of `last` pages.
///
/// - `size == 0` yields an empty strip.
/// - `size >= last` yields every page.
/// - Otherwise a window of `size` pages is centered on `page` (the left half
///   is one shorter for even sizes) and slid to fit the range.
/// - With `ends` and `size >= 7`, the first and last page are always shown and
///   the second and second-to-last slots become gaps when they skip pages.
///
/// # Example
///
/// ```
/// use pagewise::{SeriesItem::*, series};
///
/// assert_eq!(
///     series(36, 9, 7, true),
///     vec![Page(1), Gap, Page(8), Current(9), Page(10), Gap, Page(36)]
/// );
/// ```
#[must_use]
pub fn series(last: u64, page: u64, size: u64, ends: bool) -> Vec<SeriesItem> {
    if size == 0 {
        return Vec::new();
    }

    let mut strip: Vec<SeriesItem> = if size >= last {
        (1..=last).map(SeriesItem::Page).collect()
    } else {
        let left = (size - 1) / 2;
        let start = if page <= left {
            1
        } else if page > last - size + left {
            last - size + 1
        } else {
            page - left
        };
        let mut strip: Vec<SeriesItem> = (start..start + size).map(SeriesItem::Page).collect();

        if ends && size >= 7 {
            set_ends(&mut strip, last);
        }
        strip
    };

    if let Some(current) = strip.iter_mut().find(|item| **item == SeriesItem::Page(page)) {
        *current = SeriesItem::Current(page);
    }
    strip
}

/// Pin the first and last page, replacing skipped neighbours with gaps.
fn set_ends(strip: &mut [SeriesItem], last: u64) {
    let len = strip.len();
    let Some([first, second]) = strip.get_mut(..2) else {
        return;
    };
    *first = SeriesItem::Page(1);
    if *second != SeriesItem::Page(2) {
        *second = SeriesItem::Gap;
    }

    let Some([before_last, end]) = strip.get_mut(len - 2..) else {
        return;
    };
    if *before_last != SeriesItem::Page(last - 1) {
        *before_last = SeriesItem::Gap;
    }
    *end = SeriesItem::Page(last);
}
