//! Database row types. These map directly to SQLite rows and stay distinct
//! from the clicker-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: String,
    pub username: Option<String>,
    pub total_clicks: i64,
    pub total_tokens: i64,
}

pub struct BoostRow {
    pub id: i64,
    pub user_id: String,
    pub boost_type: String,
    pub active_until: String,
}

/// Result of a guarded counter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceUpdate {
    Applied,
    UnknownUser,
    /// The new value would not fit in a 64-bit integer; the row is untouched.
    OutOfRange,
}
