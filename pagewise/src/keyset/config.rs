//! Keyset pagination configuration.

use serde::Deserialize;

use crate::offset::DEFAULT_ITEMS;

/// Configuration for a [`Keyset`](crate::Keyset) paginator.
///
/// Unknown keys are rejected when deserializing.
///
/// ```
/// use pagewise::KeysetConfig;
///
/// let config: KeysetConfig =
///     serde_json::from_str(r#"{"items": 10, "page": "eyJpZCI6MTB9"}"#).unwrap();
/// assert_eq!(config, KeysetConfig::new().items(10).page("eyJpZCI6MTB9"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct KeysetConfig {
    /// Page size.
    pub items: i64,
    /// Opaque page token; absent (or empty) for the first page.
    pub page: Option<String>,
    /// SQL predicate replacing the generated one, using `:column` placeholders.
    pub where_query: Option<String>,
    /// Use a row-value comparison when all ordering directions match.
    pub row_comparison: bool,
}

impl Default for KeysetConfig {
    fn default() -> Self {
        Self {
            items: DEFAULT_ITEMS,
            page: None,
            where_query: None,
            row_comparison: false,
        }
    }
}

impl KeysetConfig {
    /// Create a configuration with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    #[must_use]
    pub const fn items(mut self, items: i64) -> Self {
        self.items = items;
        self
    }

    /// Set the page token.
    #[must_use]
    pub fn page(mut self, token: impl Into<String>) -> Self {
        self.page = Some(token.into());
        self
    }

    /// Replace the generated predicate.
    #[must_use]
    pub fn where_query(mut self, sql: impl Into<String>) -> Self {
        self.where_query = Some(sql.into());
        self
    }

    /// Opt into row-value comparison.
    #[must_use]
    pub const fn row_comparison(mut self, enabled: bool) -> Self {
        self.row_comparison = enabled;
        self
    }
}
