//! Generic row storage shared by every resource table.
//!
//! A [`Table`] describes how one record type maps onto SQLite: its table
//! name, select list, row decoder and the writable columns. The functions in
//! this module build the INSERT/UPDATE/DELETE statements from that
//! description, so each resource only states its columns once.

use chrono::{DateTime, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use crate::db::format_timestamp;

pub type Column = (&'static str, SqlValue);

/// Writable columns of a record, excluding `id` and store-assigned timestamps.
pub trait ToColumns {
    fn columns(&self) -> Vec<Column>;
}

pub trait Table: ToColumns + Sized {
    const TABLE: &'static str;
    /// Select list, in the order `from_row` reads it. `id` comes first.
    const SELECT: &'static str;
    const ORDER_BY: &'static str;
    /// Column stamped once on insert.
    const CREATED_AT: Option<&'static str> = None;
    /// Column stamped on insert and on every update.
    const UPDATED_AT: Option<&'static str> = None;

    type New: ToColumns;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

fn select_sql<T: Table>() -> String {
    format!("SELECT {} FROM {}", T::SELECT, T::TABLE)
}

pub fn list<T: Table>(conn: &Connection) -> rusqlite::Result<Vec<T>> {
    list_where(conn, "1 = 1")
}

/// `filter` is a static SQL predicate, never user input.
pub fn list_where<T: Table>(conn: &Connection, filter: &'static str) -> rusqlite::Result<Vec<T>> {
    let sql = format!(
        "{} WHERE {filter} ORDER BY {}",
        select_sql::<T>(),
        T::ORDER_BY
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| T::from_row(row))?;
    let records = rows.collect::<rusqlite::Result<Vec<T>>>()?;
    Ok(records)
}

pub fn get<T: Table>(conn: &Connection, id: i64) -> rusqlite::Result<Option<T>> {
    let sql = format!("{} WHERE id = ?1", select_sql::<T>());
    conn.query_row(&sql, [id], |row| T::from_row(row)).optional()
}

pub fn find_by<T: Table>(
    conn: &Connection,
    column: &'static str,
    value: &str,
) -> rusqlite::Result<Option<T>> {
    let sql = format!("{} WHERE {column} = ?1", select_sql::<T>());
    conn.query_row(&sql, [value], |row| T::from_row(row)).optional()
}

pub fn insert<T: Table>(conn: &Connection, new: &T::New, now: DateTime<Utc>) -> rusqlite::Result<T> {
    let mut columns = new.columns();
    let stamp = format_timestamp(&now);
    if let Some(column) = T::CREATED_AT {
        columns.push((column, SqlValue::Text(stamp.clone())));
    }
    if let Some(column) = T::UPDATED_AT {
        columns.push((column, SqlValue::Text(stamp)));
    }

    let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        T::TABLE,
        names.join(", "),
        placeholders.join(", ")
    );

    conn.execute(&sql, params_from_iter(columns.into_iter().map(|(_, v)| v)))?;
    let id = conn.last_insert_rowid();

    get::<T>(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// Writes every column of `record` back to row `id`. Returns false if the row is gone.
pub fn update<T: Table>(
    conn: &Connection,
    id: i64,
    record: &T,
    now: DateTime<Utc>,
) -> rusqlite::Result<bool> {
    let mut columns = record.columns();
    if let Some(column) = T::UPDATED_AT {
        columns.push((column, SqlValue::Text(format_timestamp(&now))));
    }

    let assignments: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, (name, _))| format!("{name} = ?{}", i + 1))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE id = ?{}",
        T::TABLE,
        assignments.join(", "),
        columns.len() + 1
    );

    let mut values: Vec<SqlValue> = columns.into_iter().map(|(_, v)| v).collect();
    values.push(SqlValue::Integer(id));

    let count = conn.execute(&sql, params_from_iter(values))?;
    Ok(count > 0)
}

pub fn delete<T: Table>(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", T::TABLE);
    let count = conn.execute(&sql, [id])?;
    Ok(count > 0)
}

pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
