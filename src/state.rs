use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::errors::AppError;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(conn: Connection, config: AppConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            config,
        }
    }

    /// Held for one service call at a time, never across an `.await`.
    /// Every write is a single statement, so a guard dropped by a panicking
    /// request still leaves the connection usable.
    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        Ok(self.db.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("recovering database lock after a panicked request");
            poisoned.into_inner()
        }))
    }
}
