//! Shared SQLite fixture: a `pets` table and an [`OrderedQuery`] over it.
//!
//! Each test binary only uses part of this module.
#![allow(dead_code)]

use pagewise::{BoundPredicate, OrderedQuery, SortField};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, ToSql, params};
use serde_json::{Map, Value};

/// `name | animal | birthdate`, inserted with ids 1..=50 in this order.
pub const PETS: &str = "\
Luna  | dog    | 2018-03-10
Coco  | cat    | 2019-05-15
Dodo  | dog    | 2020-06-25
Wiki  | bird   | 2018-03-12
Baby  | rabbit | 2020-01-13
Neki  | horse  | 2021-07-20
Tino  | donkey | 2019-06-18
Plot  | cat    | 2022-09-21
Riki  | cat    | 2018-09-14
Susi  | horse  | 2018-10-26
Coco  | pig    | 2020-08-29
Momo  | bird   | 2023-08-25
Lili  | cat    | 2021-07-22
Beli  | pig    | 2020-07-26
Rocky | bird   | 2022-08-19
Vyvy  | dog    | 2018-05-16
Susi  | horse  | 2024-01-25
Ella  | cat    | 2020-02-20
Rocky | dog    | 2019-09-19
Juni  | rabbit | 2020-08-24
Coco  | bird   | 2021-03-17
Susi  | dog    | 2021-07-28
Luna  | horse  | 2023-05-14
Gigi  | pig    | 2022-05-19
Coco  | cat    | 2020-02-20
Nino  | donkey | 2019-06-17
Luna  | cat    | 2022-02-09
Popi  | dog    | 2020-09-26
Lili  | pig    | 2022-06-18
Mina  | horse  | 2021-04-21
Susi  | rabbit | 2023-05-18
Toni  | donkey | 2018-06-22
Rocky | horse  | 2019-09-28
Lili  | cat    | 2019-03-18
Roby  | cat    | 2022-06-19
Anto  | horse  | 2022-08-18
Susi  | pig    | 2021-04-21
Boly  | bird   | 2020-03-29
Sky   | cat    | 2023-07-19
Lili  | dog    | 2020-01-28
Fami  | snake  | 2023-04-27
Lopi  | pig    | 2019-06-19
Rocky | snake  | 2022-03-13
Denis | dog    | 2022-06-19
Maca  | cat    | 2022-06-19
Luna  | dog    | 2022-08-15
Jeme  | horse  | 2019-08-08
Sary  | bird   | 2023-04-29
Rocky | bird   | 2023-05-14
Coco  | dog    | 2023-05-27
";

const COLUMNS: &str = "id, name, animal, birthdate";

/// Parsed `(name, animal, birthdate)` triples.
pub fn pet_rows() -> Vec<(&'static str, &'static str, &'static str)> {
    PETS.lines()
        .filter_map(|line| {
            let mut parts = line.split('|').map(str::trim);
            Some((parts.next()?, parts.next()?, parts.next()?))
        })
        .collect()
}

/// The same pets as JSON objects, for the in-memory engine.
pub fn pet_json() -> Vec<Value> {
    pet_rows()
        .into_iter()
        .zip(1_i64..)
        .map(|((name, animal, birthdate), id)| {
            serde_json::json!({"id": id, "name": name, "animal": animal, "birthdate": birthdate})
        })
        .collect()
}

/// Open an in-memory database seeded with [`PETS`].
pub fn seeded() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory database");
    conn.execute_batch(
        "CREATE TABLE pets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            animal TEXT NOT NULL,
            birthdate TEXT NOT NULL
        );",
    )
    .expect("create pets table");

    for (name, animal, birthdate) in pet_rows() {
        conn.execute(
            "INSERT INTO pets (name, animal, birthdate) VALUES (?1, ?2, ?3)",
            params![name, animal, birthdate],
        )
        .expect("insert pet");
    }
    conn
}

/// An ordered `SELECT ... FROM pets` that binds keyset predicates as named
/// parameters.
#[derive(Debug)]
pub struct PetQuery<'c> {
    conn: &'c Connection,
    order: Vec<SortField>,
    selection: Option<Vec<String>>,
    predicate: Option<BoundPredicate>,
    limit: Option<usize>,
}

impl<'c> PetQuery<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            order: Vec::new(),
            selection: None,
            predicate: None,
            limit: None,
        }
    }

    pub fn order_by(mut self, field: SortField) -> Self {
        self.order.push(field);
        self
    }

    pub fn only(mut self, columns: &[&str]) -> Self {
        self.selection = Some(columns.iter().map(|c| (*c).to_string()).collect());
        self
    }

    /// The statement [`fetch`](OrderedQuery::fetch) will run.
    pub fn sql(&self) -> String {
        let columns = self
            .selection
            .as_ref()
            .map_or_else(|| COLUMNS.to_string(), |s| s.join(", "));
        let mut sql = format!("SELECT {columns} FROM pets");
        if let Some(predicate) = &self.predicate {
            sql.push_str(" WHERE ");
            sql.push_str(&predicate.sql());
        }
        if !self.order.is_empty() {
            let order: Vec<String> = self
                .order
                .iter()
                .map(|f| format!("{} {}", f.column, f.dir.as_sql()))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        sql
    }
}

impl OrderedQuery for PetQuery<'_> {
    type Record = Map<String, Value>;
    type Error = rusqlite::Error;

    fn order(&self) -> Vec<SortField> {
        self.order.clone()
    }

    fn selection(&self) -> Option<Vec<String>> {
        self.selection.clone()
    }

    fn select(&mut self, columns: &[String]) {
        if let Some(selection) = &mut self.selection {
            selection.extend(columns.iter().cloned());
        }
    }

    fn filter(&mut self, predicate: BoundPredicate) {
        self.predicate = Some(predicate);
    }

    fn limit(&mut self, limit: usize) {
        self.limit = Some(limit);
    }

    fn fetch(&mut self) -> Result<Vec<Self::Record>, Self::Error> {
        let sql = self.sql();
        let bound: Vec<(String, SqlValue)> = self
            .predicate
            .iter()
            .flat_map(|predicate| predicate.named_params())
            .map(|(name, value)| (name, to_sql(value)))
            .collect();
        let params: Vec<(&str, &dyn ToSql)> = bound
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let rows = stmt.query_map(params.as_slice(), |row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, name)| Ok((name.clone(), from_sql(row.get_ref(i)?))))
                .collect::<rusqlite::Result<Map<String, Value>>>()
        })?;
        rows.collect()
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => n
            .as_i64()
            .map_or_else(|| SqlValue::Real(n.as_f64().unwrap_or_default()), SqlValue::Integer),
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Ids of fetched records, in order.
pub fn ids(records: &[Map<String, Value>]) -> Vec<i64> {
    records.iter().filter_map(|r| r.get("id")?.as_i64()).collect()
}
