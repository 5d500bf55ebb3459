//! Offset pagination: page-number arithmetic over a counted collection.
//!
//! ```
//! use pagewise::{OffsetConfig, PageWindow, SeriesItem};
//!
//! let window = PageWindow::new(&OffsetConfig::new().count(720).page(9))?;
//!
//! // LIMIT/OFFSET for the underlying query
//! assert_eq!((window.items(), window.offset()), (20, 160));
//!
//! // Page strip for rendering: [1, …, 8, [9], 10, …, 36]
//! let strip = window.series();
//! assert_eq!(strip[3], SeriesItem::Current(9));
//! assert!(strip[1].is_gap());
//! # Ok::<(), pagewise::OffsetError>(())
//! ```

mod config;
mod layout;
mod series;
mod window;

pub use config::{DEFAULT_ITEMS, DEFAULT_SIZE, OffsetConfig};
pub use layout::{Fixed, Gearbox, Layout};
pub use series::{SeriesItem, series};
pub use window::PageWindow;
