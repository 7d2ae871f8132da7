//! Admin session tokens.
//!
//! Tokens live in the record store rather than process memory, so they
//! survive restarts and are shared across instances. Expiry is enforced on
//! validation; [`purge_expired`] is housekeeping, not correctness.

use rusqlite::Connection;

use quizzy_db::queries::admin_sessions;

use crate::Result;

/// Default admin session lifetime in seconds.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 900;

/// Issue a fresh session token valid for `ttl_secs`.
pub fn issue_session(conn: &Connection, ttl_secs: u64, now: u64) -> Result<String> {
    let token = new_token();
    admin_sessions::insert(conn, &token, now, now + ttl_secs)?;
    tracing::debug!(expires_at = now + ttl_secs, "admin session issued");
    Ok(token)
}

/// Whether a token exists and has not expired.
pub fn validate_session(conn: &Connection, token: &str, now: u64) -> Result<bool> {
    Ok(admin_sessions::is_valid(conn, token, now)?)
}

/// Invalidate a token immediately. Returns `false` if it was not present.
pub fn revoke_session(conn: &Connection, token: &str) -> Result<bool> {
    Ok(admin_sessions::revoke(conn, token)?)
}

/// Drop expired tokens; returns how many were removed.
pub fn purge_expired(conn: &Connection, now: u64) -> Result<usize> {
    let purged = admin_sessions::purge_expired(conn, now)?;
    if purged > 0 {
        tracing::debug!(purged, "expired admin sessions purged");
    }
    Ok(purged)
}

/// Generate a random 64-hex-char session token.
fn new_token() -> String {
    let mut bytes = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut bytes);
    hex::encode(bytes)
}
