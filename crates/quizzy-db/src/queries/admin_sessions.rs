//! Admin session token query functions.

use rusqlite::Connection;

use crate::Result;

/// Store a freshly issued token.
pub fn insert(conn: &Connection, token: &str, now: u64, expires_at: u64) -> Result<()> {
    conn.execute(
        "INSERT INTO admin_sessions (token, created_at, expires_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![token, now as i64, expires_at as i64],
    )?;
    Ok(())
}

/// Whether a token exists and has not expired.
pub fn is_valid(conn: &Connection, token: &str, now: u64) -> Result<bool> {
    let valid: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM admin_sessions WHERE token = ?1 AND expires_at > ?2)",
        rusqlite::params![token, now as i64],
        |row| row.get(0),
    )?;
    Ok(valid)
}

/// Delete a token. Returns `false` if it was not present.
pub fn revoke(conn: &Connection, token: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM admin_sessions WHERE token = ?1", [token])?;
    Ok(deleted == 1)
}

/// Drop every expired token; returns how many were removed.
pub fn purge_expired(conn: &Connection, now: u64) -> Result<usize> {
    let purged = conn.execute(
        "DELETE FROM admin_sessions WHERE expires_at <= ?1",
        [now as i64],
    )?;
    Ok(purged)
}
