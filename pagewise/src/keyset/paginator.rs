//! The keyset paginator.

use tracing::{debug, trace};

use super::config::KeysetConfig;
use super::cursor::Cursor;
use super::order::OrderSpec;
use super::predicate::{BoundPredicate, Predicate};
use super::query::{OrderedQuery, Record};
use crate::KeysetError;
use crate::validate::at_least;

/// One page of keyset pagination.
///
/// Without a page token this is the first page; with one, the page of
/// records that sort strictly after the cursor. The query is fetched with
/// `items + 1` rows: the extra row only signals that another page exists and
/// is dropped.
///
/// `records` and `next` are computed at most once and cached. The paginator
/// is a single-owner, request-scoped value; both take `&mut self`.
///
/// Only forward traversal is supported. To walk backwards, reverse the
/// query ordering and paginate forward.
///
/// # Example
///
/// ```
/// use pagewise::{Keyset, KeysetConfig, MemoryQuery, SortField};
/// use serde_json::json;
///
/// let rows: Vec<_> = (1..=50).map(|id| json!({"id": id})).collect();
///
/// let query = MemoryQuery::new(rows.clone()).order_by(SortField::asc("id"));
/// let mut first = Keyset::new(query, KeysetConfig::new().items(10))?;
/// let token = first.next()?.unwrap().to_string();
/// assert_eq!(token, "eyJpZCI6MTB9"); // {"id":10}
///
/// let query = MemoryQuery::new(rows).order_by(SortField::asc("id"));
/// let mut second = Keyset::new(query, KeysetConfig::new().items(10).page(token))?;
/// assert_eq!(second.records()?[0]["id"], 11);
/// # Ok::<(), pagewise::KeysetError>(())
/// ```
#[derive(Debug)]
pub struct Keyset<Q: OrderedQuery> {
    query: Q,
    order: OrderSpec,
    items: u64,
    page: Option<String>,
    cursor: Option<Cursor>,
    where_query: Option<String>,
    row_comparison: bool,
    records: Option<Vec<Q::Record>>,
    more: bool,
    next: Option<Option<String>>,
}

impl<Q: OrderedQuery> Keyset<Q> {
    /// Prepare a page over `query`.
    ///
    /// Fails when `items < 1`, when the query is unordered, when the page
    /// token is malformed, or when the token was minted for a different
    /// ordering. If the query selects specific columns, the ordering columns
    /// are added to the selection so the next cursor can always be built.
    pub fn new(mut query: Q, config: KeysetConfig) -> Result<Self, KeysetError> {
        let items = at_least("items", config.items, 1)?;
        let order = OrderSpec::from_query(&query)?;
        let page = config.page.filter(|token| !token.is_empty());
        let cursor = page
            .as_deref()
            .map(|token| decode_cursor(&query, &order, token))
            .transpose()?;

        if let Some(selected) = query.selection() {
            let missing: Vec<String> = order
                .columns()
                .filter(|column| !selected.iter().any(|s| s == column))
                .map(String::from)
                .collect();
            if !missing.is_empty() {
                debug!(?missing, "adding order columns to selection");
                query.select(&missing);
            }
        }

        debug!(items, cursored = cursor.is_some(), "keyset page prepared");

        Ok(Self {
            query,
            order,
            items,
            page,
            cursor,
            where_query: config.where_query,
            row_comparison: config.row_comparison,
            records: None,
            more: false,
            next: None,
        })
    }

    /// The ordering being paginated.
    #[must_use]
    pub const fn order(&self) -> &OrderSpec {
        &self.order
    }

    /// Page size.
    #[must_use]
    pub const fn items(&self) -> u64 {
        self.items
    }

    /// The incoming page token, if any.
    #[must_use]
    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    /// The decoded cursor; `None` on the first page.
    #[must_use]
    pub const fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// The underlying query.
    #[must_use]
    pub const fn query(&self) -> &Q {
        &self.query
    }

    /// Whether another page exists; `None` until records are fetched.
    #[must_use]
    pub const fn has_more(&self) -> Option<bool> {
        if self.records.is_some() {
            Some(self.more)
        } else {
            None
        }
    }

    /// The predicate applied to the query, if this page has a cursor.
    #[must_use]
    pub fn predicate(&self) -> Option<BoundPredicate> {
        let cursor = self.cursor.as_ref()?;
        let predicate = match &self.where_query {
            Some(sql) => Predicate::raw(sql.clone()),
            None => Predicate::build(&self.order, self.row_comparison),
        };
        Some(BoundPredicate::new(predicate, cursor.clone()))
    }

    /// Records of this page, fetched on first call.
    pub fn records(&mut self) -> Result<&[Q::Record], KeysetError> {
        let records = match self.records.take() {
            Some(records) => records,
            None => self.fetch()?,
        };
        Ok(self.records.insert(records).as_slice())
    }

    /// Token for the next page, or `None` on the last page.
    ///
    /// Fetches the records first if needed. Fails with
    /// [`KeysetError::Encode`] when the last record's ordering values are
    /// too large for a page token.
    pub fn next(&mut self) -> Result<Option<&str>, KeysetError> {
        if self.next.is_none() {
            self.records()?;
            let token = self.mint_next()?;
            if let Some(token) = &token {
                debug!(token = %token, "next cursor minted");
            }
            self.next = Some(token);
        }
        Ok(self.next.as_ref().and_then(Option::as_deref))
    }

    /// Consume the paginator, returning the records.
    pub fn into_records(mut self) -> Result<Vec<Q::Record>, KeysetError> {
        self.records()?;
        Ok(self.records.unwrap_or_default())
    }

    fn fetch(&mut self) -> Result<Vec<Q::Record>, KeysetError> {
        if let Some(bound) = self.predicate() {
            trace!(sql = %bound.sql(), "applying keyset predicate");
            self.query.filter(bound);
        }

        let items = usize::try_from(self.items).unwrap_or(usize::MAX);
        self.query.limit(items.saturating_add(1));

        let mut records = self.query.fetch().map_err(KeysetError::fetch)?;
        self.more = records.len() > items;
        records.truncate(items);

        debug!(fetched = records.len(), more = self.more, "keyset page fetched");
        Ok(records)
    }

    fn mint_next(&self) -> Result<Option<String>, KeysetError> {
        if !self.more {
            return Ok(None);
        }
        let Some(last) = self.records.as_ref().and_then(|records| records.last()) else {
            return Ok(None);
        };

        let cursor = self
            .order
            .columns()
            .map(|column| {
                last.column(column)
                    .map(|value| (column.to_string(), value))
                    .ok_or_else(|| KeysetError::MissingColumn {
                        column: column.to_string(),
                    })
            })
            .collect::<Result<Cursor, _>>()?;
        cursor.encode_checked().map(Some).map_err(KeysetError::Encode)
    }
}

/// Decode `token` and check it against the live ordering.
fn decode_cursor<Q>(query: &Q, order: &OrderSpec, token: &str) -> Result<Cursor, KeysetError>
where
    Q: OrderedQuery + ?Sized,
{
    let cursor = Cursor::decode(token)?;
    if !cursor.keys().eq(order.columns()) {
        return Err(KeysetError::CursorMismatch {
            expected: order.columns().map(String::from).collect(),
            found: cursor.keys().map(String::from).collect(),
        });
    }
    Ok(cursor
        .into_iter()
        .map(|(column, value)| {
            let value = query.cast(&column, value);
            (column, value)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyset::memory::{MemoryError, MemoryQuery};
    use crate::keyset::order::SortField;
    use crate::{CursorError, SortDir};
    use serde_json::{Map, Value, json};

    fn rows(n: i64) -> Vec<Value> {
        (1..=n)
            .map(|id| json!({"id": id, "animal": if id % 2 == 0 { "cat" } else { "dog" }}))
            .collect()
    }

    fn by_id(n: i64) -> MemoryQuery {
        MemoryQuery::new(rows(n)).order_by(SortField::asc("id"))
    }

    fn ids(records: &[Map<String, Value>]) -> Vec<i64> {
        records.iter().filter_map(|r| r.get("id")?.as_i64()).collect()
    }

    fn token(value: Value) -> String {
        let Value::Object(map) = value else {
            panic!("expected an object")
        };
        map.into_iter().collect::<Cursor>().encode()
    }

    #[test]
    fn test_unordered_query_fails() {
        let err = Keyset::new(MemoryQuery::new(rows(5)), KeysetConfig::new()).unwrap_err();
        assert!(matches!(err, KeysetError::Unordered));
        assert_eq!(err.to_string(), "query must be ordered");
    }

    #[test]
    fn test_items_must_be_positive() {
        let err = Keyset::new(by_id(5), KeysetConfig::new().items(0)).unwrap_err();
        assert!(matches!(err, KeysetError::Variable(e) if e.field == "items"));
    }

    #[test]
    fn test_first_page() {
        let mut page = Keyset::new(by_id(50), KeysetConfig::new().items(10)).unwrap();
        assert!(page.cursor().is_none());
        assert_eq!(page.has_more(), None);
        assert_eq!(ids(page.records().unwrap()), (1..=10).collect::<Vec<_>>());
        assert_eq!(page.has_more(), Some(true));
        assert_eq!(page.next().unwrap(), Some("eyJpZCI6MTB9"));
    }

    #[test]
    fn test_second_page() {
        let config = KeysetConfig::new().items(10).page("eyJpZCI6MTB9");
        let mut page = Keyset::new(by_id(50), config).unwrap();
        assert_eq!(page.cursor(), Some(&Cursor::new().int("id", 10)));
        assert_eq!(page.predicate().unwrap().sql(), "id > :id");
        assert_eq!(page.records().unwrap()[0]["id"], 11);
        assert_eq!(page.next().unwrap(), Some("eyJpZCI6MjB9"));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let config = KeysetConfig::new().items(10).page("eyJpZCI6NDB9");
        let mut page = Keyset::new(by_id(50), config).unwrap();
        assert_eq!(page.next().unwrap(), None);
        assert_eq!(ids(page.records().unwrap()), (41..=50).collect::<Vec<_>>());
        assert_eq!(page.has_more(), Some(false));
    }

    #[test]
    fn test_exact_multiple_ends_without_empty_page() {
        let mut page = Keyset::new(by_id(10), KeysetConfig::new().items(10)).unwrap();
        assert_eq!(page.records().unwrap().len(), 10);
        assert_eq!(page.next().unwrap(), None);
    }

    #[test]
    fn test_empty_collection() {
        let mut page = Keyset::new(by_id(0), KeysetConfig::new()).unwrap();
        assert!(page.records().unwrap().is_empty());
        assert_eq!(page.next().unwrap(), None);
    }

    #[test]
    fn test_empty_token_means_first_page() {
        let page = Keyset::new(by_id(5), KeysetConfig::new().page("")).unwrap();
        assert!(page.cursor().is_none());
        assert!(page.page().is_none());
    }

    #[test]
    fn test_walks_every_page() {
        let mut seen = Vec::new();
        let mut token: Option<String> = None;
        let mut pages = 0;
        loop {
            let mut config = KeysetConfig::new().items(7);
            config.page = token.take();
            let mut page = Keyset::new(by_id(50), config).unwrap();
            seen.extend(ids(page.records().unwrap()));
            pages += 1;
            match page.next().unwrap() {
                Some(next) => token = Some(next.to_string()),
                None => break,
            }
        }
        assert_eq!(pages, 8);
        assert_eq!(seen, (1..=50).collect::<Vec<_>>());
    }

    #[test]
    fn test_mixed_directions_walk() {
        let query = || {
            MemoryQuery::new(rows(20))
                .order_by(SortField::new("animal", SortDir::Desc))
                .order_by(SortField::asc("id"))
        };

        let mut first = Keyset::new(query(), KeysetConfig::new().items(8).row_comparison(true)).unwrap();
        let first_ids = ids(first.records().unwrap());
        assert_eq!(first_ids, [1, 3, 5, 7, 9, 11, 13, 15]);
        let next = first.next().unwrap().unwrap().to_string();
        assert_eq!(Cursor::decode(&next).unwrap(), Cursor::new().string("animal", "dog").int("id", 15));

        let config = KeysetConfig::new().items(8).page(next).row_comparison(true);
        let mut second = Keyset::new(query(), config).unwrap();
        assert_eq!(
            second.predicate().unwrap().sql(),
            "((animal = :animal AND id > :id) OR animal < :animal)"
        );
        assert_eq!(ids(second.records().unwrap()), [17, 19, 2, 4, 6, 8, 10, 12]);
    }

    #[test]
    fn test_row_comparison_page() {
        let query = || {
            MemoryQuery::new(rows(20))
                .order_by(SortField::asc("animal"))
                .order_by(SortField::asc("id"))
        };
        let config = KeysetConfig::new()
            .items(4)
            .page(token(json!({"animal": "cat", "id": 16})))
            .row_comparison(true);
        let mut page = Keyset::new(query(), config).unwrap();
        assert_eq!(page.predicate().unwrap().sql(), "(animal, id) > (:animal, :id)");
        assert_eq!(ids(page.records().unwrap()), [18, 20, 1, 3]);
    }

    #[test]
    fn test_cursor_mismatch() {
        let config = KeysetConfig::new()
            .items(10)
            .page(token(json!({"animal": "dog", "id": 23})));
        let err = Keyset::new(by_id(50), config).unwrap_err();
        match err {
            KeysetError::CursorMismatch { expected, found } => {
                assert_eq!(expected, ["id"]);
                assert_eq!(found, ["animal", "id"]);
            },
            other => panic!("expected CursorMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_cursor_key_order_must_match() {
        let query = MemoryQuery::new(rows(5))
            .order_by(SortField::asc("animal"))
            .order_by(SortField::asc("id"));
        let config = KeysetConfig::new().page(token(json!({"id": 2, "animal": "cat"})));
        assert!(matches!(
            Keyset::new(query, config),
            Err(KeysetError::CursorMismatch { .. })
        ));
    }

    #[test]
    fn test_malformed_token() {
        let err = Keyset::new(by_id(5), KeysetConfig::new().page("%%%")).unwrap_err();
        assert!(matches!(err, KeysetError::Decode(CursorError::InvalidBase64)));
        assert!(!err.is_ordering_error());
    }

    #[test]
    fn test_long_sort_values_round_trip_or_fail_on_mint() {
        let titled = |title_len: usize| {
            let rows = (1..=3)
                .map(|id| json!({"id": id, "title": format!("{id}{}", "t".repeat(title_len))}))
                .collect();
            MemoryQuery::new(rows)
                .order_by(SortField::asc("title"))
                .order_by(SortField::asc("id"))
        };

        let mut first = Keyset::new(titled(2000), KeysetConfig::new().items(1)).unwrap();
        let token = first.next().unwrap().unwrap().to_string();
        let mut second = Keyset::new(titled(2000), KeysetConfig::new().items(1).page(token)).unwrap();
        assert_eq!(ids(second.records().unwrap()), [2]);

        let mut page = Keyset::new(titled(3200), KeysetConfig::new().items(1)).unwrap();
        assert_eq!(ids(page.records().unwrap()), [1]);
        let err = page.next().unwrap_err();
        assert!(matches!(err, KeysetError::Encode(CursorError::TooLarge)));
    }

    #[test]
    fn test_too_many_order_columns() {
        let query = (0..17).fold(by_id(3), |q, i| q.order_by(SortField::asc(format!("c{i}"))));
        let err = Keyset::new(query, KeysetConfig::new()).unwrap_err();
        assert!(matches!(err, KeysetError::TooManyColumns { count: 18, .. }));
    }

    #[test]
    fn test_selection_is_widened() {
        let query = MemoryQuery::new(rows(30))
            .order_by(SortField::asc("animal"))
            .order_by(SortField::asc("id"))
            .only(&["animal"]);
        let mut page = Keyset::new(query, KeysetConfig::new().items(10)).unwrap();
        assert_eq!(page.query().selection(), Some(vec!["animal".into(), "id".into()]));
        assert!(page.next().unwrap().is_some());
    }

    #[test]
    fn test_missing_column_in_record() {
        struct Unprojected(MemoryQuery);

        impl OrderedQuery for Unprojected {
            type Record = Map<String, Value>;
            type Error = MemoryError;

            fn order(&self) -> Vec<SortField> {
                self.0.order()
            }
            fn selection(&self) -> Option<Vec<String>> {
                None
            }
            fn select(&mut self, _columns: &[String]) {}
            fn filter(&mut self, predicate: BoundPredicate) {
                self.0.filter(predicate);
            }
            fn limit(&mut self, limit: usize) {
                self.0.limit(limit);
            }
            fn fetch(&mut self) -> Result<Vec<Self::Record>, Self::Error> {
                let mut records = self.0.fetch()?;
                for record in &mut records {
                    record.remove("id");
                }
                Ok(records)
            }
        }

        let mut page = Keyset::new(Unprojected(by_id(5)), KeysetConfig::new().items(2)).unwrap();
        assert!(matches!(page.next(), Err(KeysetError::MissingColumn { column }) if column == "id"));
    }

    #[test]
    fn test_fetch_error_propagates() {
        let config = KeysetConfig::new()
            .page("eyJpZCI6MTB9")
            .where_query("id > :id AND 1 = 1");
        let mut page = Keyset::new(by_id(20), config).unwrap();
        assert_eq!(page.predicate().unwrap().sql(), "id > :id AND 1 = 1");

        let err = page.records().unwrap_err();
        let KeysetError::Fetch(source) = err else {
            panic!("expected Fetch error")
        };
        assert!(source.downcast_ref::<MemoryError>().is_some());
    }

    #[test]
    fn test_records_are_fetched_once() {
        struct Counting {
            inner: Option<MemoryQuery>,
            fetches: usize,
        }

        impl OrderedQuery for Counting {
            type Record = Map<String, Value>;
            type Error = MemoryError;

            fn order(&self) -> Vec<SortField> {
                vec![SortField::asc("id")]
            }
            fn selection(&self) -> Option<Vec<String>> {
                None
            }
            fn select(&mut self, _columns: &[String]) {}
            fn filter(&mut self, _predicate: BoundPredicate) {}
            fn limit(&mut self, limit: usize) {
                if let Some(inner) = &mut self.inner {
                    inner.limit(limit);
                }
            }
            fn fetch(&mut self) -> Result<Vec<Self::Record>, Self::Error> {
                self.fetches += 1;
                self.inner.as_mut().map_or_else(|| Ok(Vec::new()), |inner| inner.fetch())
            }
        }

        let query = Counting {
            inner: Some(by_id(30)),
            fetches: 0,
        };
        let mut page = Keyset::new(query, KeysetConfig::new().items(10)).unwrap();
        page.records().unwrap();
        page.next().unwrap();
        page.records().unwrap();
        page.next().unwrap();
        assert_eq!(page.query().fetches, 1);
    }

    #[test]
    fn test_cast_hook_applies_to_cursor() {
        struct Upper(MemoryQuery);

        impl OrderedQuery for Upper {
            type Record = Map<String, Value>;
            type Error = MemoryError;

            fn order(&self) -> Vec<SortField> {
                self.0.order()
            }
            fn selection(&self) -> Option<Vec<String>> {
                None
            }
            fn select(&mut self, _columns: &[String]) {}
            fn filter(&mut self, predicate: BoundPredicate) {
                self.0.filter(predicate);
            }
            fn limit(&mut self, limit: usize) {
                self.0.limit(limit);
            }
            fn fetch(&mut self) -> Result<Vec<Self::Record>, Self::Error> {
                self.0.fetch()
            }
            fn cast(&self, column: &str, value: Value) -> Value {
                match (column, value) {
                    ("animal", Value::String(s)) => Value::String(s.to_uppercase()),
                    (_, value) => value,
                }
            }
        }

        let query = MemoryQuery::new(rows(4))
            .order_by(SortField::asc("animal"))
            .order_by(SortField::asc("id"));
        let config = KeysetConfig::new().page(token(json!({"animal": "cat", "id": 2})));
        let page = Keyset::new(Upper(query), config).unwrap();
        assert_eq!(page.cursor().unwrap().get("animal"), Some(&json!("CAT")));
    }
}
