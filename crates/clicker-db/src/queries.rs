use crate::models::{BalanceUpdate, BoostRow, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    /// Inserts the user, or replaces only the username if the id exists.
    pub fn upsert_user(&self, id: &str, username: Option<&str>) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET username = excluded.username",
                rusqlite::params![id, username],
            )?;
            Ok(())
        })
    }

    pub fn get_user(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, id))
    }

    /// One click: bumps the click counter and adds `reward` tokens.
    ///
    /// SQLite turns an overflowing integer sum into a REAL, so the update only
    /// applies while both sums stay integers.
    pub fn record_click(&self, id: &str, reward: i64) -> Result<BalanceUpdate> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users
                 SET total_clicks = total_clicks + 1, total_tokens = total_tokens + ?2
                 WHERE id = ?1
                   AND typeof(total_clicks + 1) = 'integer'
                   AND typeof(total_tokens + ?2) = 'integer'",
                rusqlite::params![id, reward],
            )?;
            balance_update(conn, id, changed)
        })
    }

    pub fn get_token_balance(&self, id: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            conn.query_row("SELECT total_tokens FROM users WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()
        })
    }

    /// Subtracts without looking at the balance; callers check it first.
    /// Only refuses when the result would overflow.
    pub fn deduct_tokens(&self, id: &str, amount: i64) -> Result<BalanceUpdate> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET total_tokens = total_tokens - ?2
                 WHERE id = ?1 AND typeof(total_tokens - ?2) = 'integer'",
                rusqlite::params![id, amount],
            )?;
            balance_update(conn, id, changed)
        })
    }

    // -- Boosts --

    /// Returns the new boost's id.
    pub fn insert_boost(&self, user_id: &str, boost_type: &str, active_until: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO boosts (user_id, boost_type, active_until) VALUES (?1, ?2, ?3)",
                rusqlite::params![user_id, boost_type, active_until],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// The unexpired boost that runs longest. `now` must be in the
    /// `format_timestamp` shape.
    pub fn get_active_boost(&self, user_id: &str, now: &str) -> Result<Option<BoostRow>> {
        self.with_conn(|conn| query_active_boost(conn, user_id, now))
    }
}

/// Tells an unknown user apart from a refused update when nothing changed.
fn balance_update(conn: &Connection, id: &str, changed: usize) -> Result<BalanceUpdate> {
    if changed > 0 {
        return Ok(BalanceUpdate::Applied);
    }
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(if exists {
        BalanceUpdate::OutOfRange
    } else {
        BalanceUpdate::UnknownUser
    })
}

fn query_user(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn
        .prepare("SELECT id, username, total_clicks, total_tokens FROM users WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                total_clicks: row.get(2)?,
                total_tokens: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_active_boost(conn: &Connection, user_id: &str, now: &str) -> Result<Option<BoostRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, boost_type, active_until
         FROM boosts
         WHERE user_id = ?1 AND active_until > ?2
         ORDER BY active_until DESC, id ASC
         LIMIT 1",
    )?;

    let row = stmt
        .query_row([user_id, now], |row| {
            Ok(BoostRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                boost_type: row.get(2)?,
                active_until: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
