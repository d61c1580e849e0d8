use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              TEXT PRIMARY KEY,
            username        TEXT,
            total_clicks    INTEGER NOT NULL DEFAULT 0,
            total_tokens    INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS boosts (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id         TEXT NOT NULL REFERENCES users(id),
            boost_type      TEXT NOT NULL,
            active_until    TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_boosts_user_active
            ON boosts(user_id, active_until);

        -- Kept for compatibility; nothing writes here yet
        CREATE TABLE IF NOT EXISTS logs (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id         TEXT,
            action          TEXT,
            timestamp       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        assert_eq!(table_names(&conn), vec!["boosts", "logs", "users"]);
    }

    #[test]
    fn is_idempotent_and_keeps_data() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        conn.execute("INSERT INTO users (id) VALUES ('u1')", []).unwrap();

        run(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn log_timestamp_defaults_to_insertion_time() {
        let conn = Connection::open_in_memory().unwrap();
        run(&conn).unwrap();
        conn.execute("INSERT INTO logs (user_id, action) VALUES ('u1', 'click')", [])
            .unwrap();
        let ts: String = conn
            .query_row("SELECT timestamp FROM logs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(ts.len(), "2025-01-01T00:00:00.000Z".len());
        assert!(ts.ends_with('Z'));
    }
}
