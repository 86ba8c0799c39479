//! Read-only views served to the public site.

use rusqlite::Connection;

use crate::db::store;
use crate::errors::AppError;
use crate::models::ContentItem;
use crate::services::crud::Resource;

/// A resource with a subset that anonymous visitors may see.
pub trait Published: Resource {
    const PUBLIC_FILTER: &'static str;
}

pub fn list_public<R: Published>(conn: &Connection) -> Result<Vec<R>, AppError> {
    Ok(store::list_where(conn, R::PUBLIC_FILTER)?)
}

pub fn content_by_key(conn: &Connection, key: &str) -> Result<ContentItem, AppError> {
    store::find_by(conn, "key", key)?
        .ok_or_else(|| AppError::NotFound(format!("content '{key}'")))
}
