pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::{Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Handle to the game ledger store.
///
/// Holds a single SQLite connection. An unavailable or closed handle keeps
/// answering, but every operation fails.
pub struct Database {
    conn: Mutex<Option<Connection>>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let db = Self::bootstrap(conn)?;
        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// Ephemeral store; everything is lost when the handle is dropped.
    pub fn open_in_memory() -> Result<Self> {
        let db = Self::bootstrap(Connection::open_in_memory()?)?;
        info!("In-memory database opened");
        Ok(db)
    }

    /// A handle with no backing connection.
    pub fn unavailable() -> Self {
        Self {
            conn: Mutex::new(None),
        }
    }

    fn bootstrap(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(Some(conn)),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let guard = self.conn.lock().map_err(|e| anyhow!("DB lock poisoned: {}", e))?;
        let conn = guard.as_ref().ok_or_else(|| anyhow!("Database is not available"))?;
        f(conn)
    }

    /// Closes the connection. Safe to call more than once.
    pub fn close(&self) -> Result<()> {
        let mut guard = self.conn.lock().map_err(|e| anyhow!("DB lock poisoned: {}", e))?;
        if let Some(conn) = guard.take() {
            conn.close().map_err(|(_, e)| e)?;
            info!("Database closed");
        }
        Ok(())
    }
}

/// Formats a timestamp the way the store keeps them: UTC, millisecond
/// precision, `Z` suffix. Fixed width, so string order is time order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_are_fixed_width_iso8601() {
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(format_timestamp(at), "2025-03-07T09:05:01.000Z");
    }

    #[test]
    fn timestamp_strings_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2025, 3, 7, 9, 59, 59).unwrap();
        let later = earlier + chrono::Duration::milliseconds(1);
        assert!(format_timestamp(earlier) < format_timestamp(later));
    }

    #[test]
    fn unavailable_database_fails_every_operation() {
        let db = Database::unavailable();
        assert!(db.get_user("u1").is_err());
        assert!(db.upsert_user("u1", None).is_err());
    }

    #[test]
    fn closed_database_fails_and_close_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_user("u1", None).unwrap();
        db.close().unwrap();
        db.close().unwrap();
        assert!(db.get_user("u1").is_err());
    }
}
