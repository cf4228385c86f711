//! Relational registry backed by SQLite.
//!
//! Each record kind has its own table with a `UNIQUE` key column and
//! engine-maintained `created_at` / `updated_at` columns that never leave
//! this module. Duplicate keys are pre-checked inside a transaction; the
//! `UNIQUE` constraint is the backstop and its violation is reported as the
//! same duplicate-key error.

mod migrations;
mod open;
mod tables;

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params_from_iter};
use tracing::debug;

use super::contract::{Record, Registry, generate_id};
use super::error::{BackendError, RegistryError, RegistryResult};

pub use migrations::{apply_migrations, latest_version};
pub use open::{open_db, open_db_in_memory};

/// Shared handle to the registry database.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Table mapping for a record kind.
pub trait SqlRecord: Record {
    const TABLE: &'static str;

    const KEY_COLUMN: &'static str;

    /// Every column except `id` and the timestamps, in bind order.
    const COLUMNS: &'static [&'static str];

    /// Values for [`SqlRecord::COLUMNS`], in the same order.
    fn to_values(&self) -> RegistryResult<Vec<Value>>;

    fn from_row(row: &Row<'_>) -> RegistryResult<Self>;
}

/// A [`Registry`] storing one record kind in its own table.
pub struct SqliteRegistry<R> {
    conn: SharedConnection,
    _kind: PhantomData<fn() -> R>,
}

impl<R: SqlRecord> SqliteRegistry<R> {
    pub fn new(conn: SharedConnection) -> Self {
        Self {
            conn,
            _kind: PhantomData,
        }
    }

    /// Run a blocking closure against the connection off the async runtime.
    ///
    /// The closure runs to completion even if the calling future is dropped.
    async fn with_conn<T, F>(&self, f: F) -> RegistryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> RegistryResult<T> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| BackendError::Poisoned)?;
            f(&mut guard)
        })
        .await
        .map_err(|e| BackendError::Task(e.to_string()))?
    }
}

fn select_sql<R: SqlRecord>() -> String {
    format!("SELECT id, {} FROM {}", R::COLUMNS.join(", "), R::TABLE)
}

fn query_many<R: SqlRecord>(conn: &Connection, filter: &str) -> RegistryResult<Vec<R>> {
    let sql = format!(
        "{} {filter} ORDER BY created_at ASC, rowid ASC",
        select_sql::<R>()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;

    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(R::from_row(row)?);
    }
    Ok(records)
}

fn query_one<R: SqlRecord>(conn: &Connection, column: &str, value: &str) -> RegistryResult<Option<R>> {
    let sql = format!("{} WHERE {column} = ?1", select_sql::<R>());
    let row = conn
        .query_row(&sql, [value], |row| Ok(R::from_row(row)))
        .optional()?;
    row.transpose()
}

fn insert_row<R: SqlRecord>(conn: &Connection, record: &R) -> RegistryResult<()> {
    let placeholders: Vec<String> = (1..=R::COLUMNS.len() + 1).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} (id, {}) VALUES ({})",
        R::TABLE,
        R::COLUMNS.join(", "),
        placeholders.join(", ")
    );

    let mut values = vec![Value::Text(record.id().to_string())];
    values.extend(record.to_values()?);

    conn.execute(&sql, params_from_iter(values))
        .map_err(|e| translate_write_error::<R>(e, record.key()))?;
    Ok(())
}

fn update_row<R: SqlRecord>(conn: &Connection, record: &R) -> RegistryResult<()> {
    let assignments: Vec<String> = R::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ?{}", i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        R::TABLE,
        assignments.join(", "),
        R::COLUMNS.len() + 1
    );

    let mut values = record.to_values()?;
    values.push(Value::Text(record.id().to_string()));

    conn.execute(&sql, params_from_iter(values))
        .map_err(|e| translate_write_error::<R>(e, record.key()))?;
    Ok(())
}

/// Map a `UNIQUE` violation on the key column to a duplicate-key error.
fn translate_write_error<R: Record>(err: rusqlite::Error, key: &str) -> RegistryError {
    match &err {
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RegistryError::duplicate::<R>(key)
        }
        _ => err.into(),
    }
}

#[async_trait]
impl<R: SqlRecord> Registry<R> for SqliteRegistry<R> {
    async fn find_all(&self) -> RegistryResult<Vec<R>> {
        self.with_conn(|conn| query_many::<R>(conn, "")).await
    }

    async fn find_enabled(&self) -> RegistryResult<Vec<R>> {
        self.with_conn(|conn| query_many::<R>(conn, "WHERE enabled = 1"))
            .await
    }

    async fn find_by_id(&self, id: &str) -> RegistryResult<Option<R>> {
        let id = id.to_owned();
        self.with_conn(move |conn| query_one::<R>(conn, "id", &id))
            .await
    }

    async fn find_by_key(&self, key: &str) -> RegistryResult<Option<R>> {
        let key = key.to_owned();
        self.with_conn(move |conn| query_one::<R>(conn, R::KEY_COLUMN, &key))
            .await
    }

    async fn create(&self, draft: R::Draft) -> RegistryResult<R> {
        let created = self
            .with_conn(move |conn| {
                let tx = conn.transaction()?;

                let key = R::draft_key(&draft);
                if query_one::<R>(&tx, R::KEY_COLUMN, key)?.is_some() {
                    return Err(RegistryError::duplicate::<R>(key));
                }

                let record = R::from_draft(generate_id(), draft);
                insert_row(&tx, &record)?;
                tx.commit()?;
                Ok(record)
            })
            .await?;

        debug!("Created built-in {} '{}'", R::KIND, created.key());
        Ok(created)
    }

    async fn update(&self, id: &str, patch: R::Patch) -> RegistryResult<Option<R>> {
        let id = id.to_owned();
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;

            let Some(mut record) = query_one::<R>(&tx, "id", &id)? else {
                return Ok(None);
            };

            if let Some(key) = record.key_change(&patch) {
                if query_one::<R>(&tx, R::KEY_COLUMN, key)?.is_some() {
                    return Err(RegistryError::duplicate::<R>(key));
                }
            }

            record.apply(patch);
            update_row(&tx, &record)?;
            tx.commit()?;
            Ok(Some(record))
        })
        .await
    }

    async fn delete(&self, id: &str) -> RegistryResult<bool> {
        let id = id.to_owned();
        self.with_conn(move |conn| {
            let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
            let removed = conn.execute(&sql, [&id])?;
            Ok(removed > 0)
        })
        .await
    }
}
