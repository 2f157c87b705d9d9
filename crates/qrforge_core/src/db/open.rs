use super::migrations::migrate;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a connection points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbTarget {
    File(PathBuf),
    /// Private, empty database that disappears with the connection.
    Memory,
}

impl DbTarget {
    /// Opens, configures and migrates a connection.
    ///
    /// File databases are created on demand and switched to WAL journaling.
    pub fn open(&self) -> DbResult<Connection> {
        let started = Instant::now();
        let result = self.connect().and_then(|mut conn| {
            self.configure(&conn)?;
            migrate(&mut conn)?;
            Ok(conn)
        });

        let elapsed_ms = started.elapsed().as_millis();
        match &result {
            Ok(_) => info!(
                "event=db_open module=db status=ok target={} duration_ms={elapsed_ms}",
                self.label()
            ),
            Err(err) => error!(
                "event=db_open module=db status=error target={} duration_ms={elapsed_ms} error=\"{err}\"",
                self.label()
            ),
        }
        result
    }

    fn connect(&self) -> DbResult<Connection> {
        match self {
            Self::File(path) => Connection::open(path).map_err(|source| DbError::Open {
                path: path.clone(),
                source,
            }),
            Self::Memory => Ok(Connection::open_in_memory()?),
        }
    }

    fn configure(&self, conn: &Connection) -> DbResult<()> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        if let Self::File(_) = self {
            // `journal_mode` reports the resulting mode as a row.
            conn.query_row("PRAGMA journal_mode = WAL;", [], |_| Ok(()))?;
        }
        Ok(())
    }

    fn label(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory => "memory",
        }
    }
}

/// Opens (creating if needed) and migrates the database at `path`.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    DbTarget::File(path.as_ref().to_path_buf()).open()
}

/// Opens a fresh migrated in-memory database.
pub fn open_db_in_memory() -> DbResult<Connection> {
    DbTarget::Memory.open()
}
