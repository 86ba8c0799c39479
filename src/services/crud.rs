//! The create/list/get/update/delete contract shared by every resource.

use chrono::Utc;
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;

use crate::db::store::{self, Table};
use crate::errors::AppError;
use crate::validation::ValidationErrors;

pub trait Resource: Table + Serialize + Send + 'static {
    /// Singular noun for messages and logs.
    const NAME: &'static str;

    type Patch;

    fn parse_new(input: &Value) -> Result<Self::New, ValidationErrors>;

    fn parse_patch(input: &Value) -> Result<Self::Patch, ValidationErrors>;

    fn apply(&mut self, patch: Self::Patch);

    /// Rejects a patch that is well-formed but not allowed for the current record.
    fn check_patch(&self, _patch: &Self::Patch) -> Result<(), AppError> {
        Ok(())
    }
}

fn write_error<R: Resource>(err: rusqlite::Error) -> AppError {
    if store::is_unique_violation(&err) {
        AppError::Conflict(format!("{} already exists", R::NAME))
    } else {
        AppError::Database(err)
    }
}

pub fn list<R: Resource>(conn: &Connection) -> Result<Vec<R>, AppError> {
    Ok(store::list(conn)?)
}

pub fn get<R: Resource>(conn: &Connection, id: i64) -> Result<R, AppError> {
    store::get(conn, id)?.ok_or_else(|| AppError::NotFound(R::NAME.to_string()))
}

pub fn create<R: Resource>(conn: &Connection, input: &Value) -> Result<R, AppError> {
    let new = R::parse_new(input).inspect_err(|e| {
        tracing::warn!(resource = R::NAME, error = %e, "rejected create");
    })?;
    insert(conn, &new)
}

/// Persists an already-validated record.
pub fn insert<R: Resource>(conn: &Connection, new: &R::New) -> Result<R, AppError> {
    let record: R = store::insert(conn, new, Utc::now()).map_err(write_error::<R>)?;
    tracing::info!(resource = R::NAME, "created");
    Ok(record)
}

pub fn update<R: Resource>(conn: &Connection, id: i64, input: &Value) -> Result<R, AppError> {
    let mut record: R = get(conn, id)?;
    let patch = R::parse_patch(input).inspect_err(|e| {
        tracing::warn!(resource = R::NAME, id, error = %e, "rejected update");
    })?;
    record.check_patch(&patch)?;
    record.apply(patch);

    if !store::update(conn, id, &record, Utc::now()).map_err(write_error::<R>)? {
        return Err(AppError::NotFound(R::NAME.to_string()));
    }
    tracing::info!(resource = R::NAME, id, "updated");

    get(conn, id)
}

/// Deleting an id that does not exist is a `NotFound`, for every resource.
pub fn delete<R: Resource>(conn: &Connection, id: i64) -> Result<(), AppError> {
    if !store::delete::<R>(conn, id)? {
        return Err(AppError::NotFound(R::NAME.to_string()));
    }
    tracing::info!(resource = R::NAME, id, "deleted");
    Ok(())
}
