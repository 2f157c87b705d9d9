//! Shared application state.
//!
//! # Invariants
//! - One SQLite connection per process, guarded by a mutex.
//! - Database and password-hashing work never runs on async worker threads.
//! - Each unit of work commits as a whole or not at all.

use crate::error::{ApiError, INTERNAL_ERROR};
use log::warn;
use qrforge_core::in_transaction;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `work` in one transaction on the blocking thread pool.
    pub async fn run_blocking<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let conn = lock_connection(&db);
            in_transaction(&conn, work)
        })
        .await
        .map_err(|err| ApiError::internal(INTERNAL_ERROR, &err))?
    }
}

/// A panic inside earlier work rolled its transaction back while unwinding,
/// so a poisoned guard still holds a consistent connection.
fn lock_connection(db: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
    db.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
        warn!("event=db_lock module=server status=recovered reason=poisoned");
        db.clear_poison();
        poisoned.into_inner()
    })
}
