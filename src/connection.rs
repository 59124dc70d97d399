//! DuckDB connection wrapper with schema setup and query execution.
//!
//! Reads come back either as `HashMap` rows of `serde_json::Value` or are
//! deserialized straight into model types; writes bind typed parameters.

use crate::error::Result;
use duckdb::{types::ValueRef, Connection as DuckDbConnection, ToSql};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Tables backing the card store and the container ledger.
///
/// `card_definitions.name` carries no ART index: DuckDB refuses
/// `ON CONFLICT DO UPDATE` assignments to indexed columns, and name lookups
/// are served by a filtered scan.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS card_definitions (
    external_id VARCHAR PRIMARY KEY,
    name VARCHAR NOT NULL,
    image_front VARCHAR,
    image_back VARCHAR,
    mana_cost VARCHAR,
    type_line VARCHAR,
    price DOUBLE,
    last_updated VARCHAR NOT NULL
);

CREATE SEQUENCE IF NOT EXISTS container_id_seq START 1;

CREATE TABLE IF NOT EXISTS containers (
    id BIGINT PRIMARY KEY DEFAULT nextval('container_id_seq'),
    kind VARCHAR NOT NULL,
    name VARCHAR NOT NULL,
    owner VARCHAR NOT NULL,
    description VARCHAR,
    format VARCHAR
);

CREATE TABLE IF NOT EXISTS container_cards (
    container_id BIGINT NOT NULL,
    external_id VARCHAR NOT NULL,
    quantity INTEGER NOT NULL,
    PRIMARY KEY (container_id, external_id)
);
";

/// Wraps a DuckDB connection holding the card and container tables.
pub struct Connection {
    conn: DuckDbConnection,
}

impl Connection {
    /// Open an in-memory database and create the schema.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Self::with_schema(conn)
    }

    /// Open (or create) a database file and create the schema if missing.
    ///
    /// Parent directories are created as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = DuckDbConnection::open(path)?;
        log::debug!("Opened database {}", path.display());
        Self::with_schema(conn)
    }

    fn with_schema(conn: DuckDbConnection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Execute SQL with string parameters and return results as `HashMap` rows.
    ///
    /// Automatically converts DuckDB types to `serde_json::Value`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let param_values: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        self.query_rows(sql, &param_values)
    }

    /// Execute SQL with typed parameters and return results as `HashMap` rows.
    pub fn query_rows(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;

        // Column metadata is only available once the statement has run
        let column_names: Vec<String> = match rows.as_ref() {
            Some(stmt) => stmt
                .column_names()
                .into_iter()
                .map(|s| s.to_string())
                .collect(),
            None => return Ok(Vec::new()),
        };

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        rows_into(rows)
    }

    /// Typed-parameter counterpart of [`execute_into`](Self::execute_into).
    pub fn query_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<T>> {
        let rows = self.query_rows(sql, params)?;
        rows_into(rows)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Execute a write statement and return the number of affected rows.
    pub fn execute_write(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        Ok(self.conn.execute(sql, params)?)
    }

    /// Run `f` inside a transaction, committing on `Ok` and rolling back on `Err`.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>,
    {
        self.conn.execute_batch("BEGIN TRANSACTION")?;
        match f(self) {
            Ok(value) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = self.conn.execute_batch("ROLLBACK") {
                    log::warn!("Rollback failed after error {}: {}", e, rollback);
                }
                Err(e)
            }
        }
    }
}

fn rows_into<T: DeserializeOwned>(rows: Vec<HashMap<String, serde_json::Value>>) -> Result<Vec<T>> {
    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        let value = serde_json::Value::Object(row.into_iter().collect());
        results.push(serde_json::from_value(value)?);
    }
    Ok(results)
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // COUNT and SUM over INTEGER columns come back as HUGEINT
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::UTinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::USmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        _ => serde_json::Value::Null,
    }
}
