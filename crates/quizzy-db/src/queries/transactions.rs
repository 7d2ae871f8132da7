//! Star transaction ledger query functions. Entries are append-only.

use rusqlite::Connection;

use quizzy_types::{ledger::StarTransaction, TelegramId};

use crate::{DbError, Result};

/// Append a ledger entry and return its row id.
///
/// Unique-index and foreign-key violations surface as
/// [`DbError::Constraint`] so callers can translate them into domain
/// errors instead of opaque store failures.
pub fn record(
    conn: &Connection,
    user_id: TelegramId,
    amount: i64,
    kind: &str,
    description: &str,
    now: u64,
) -> Result<i64> {
    let result = conn.execute(
        "INSERT INTO star_transactions (user_id, amount, kind, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![user_id, amount, kind, description, now as i64],
    );
    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, msg))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(DbError::Constraint(
                msg.unwrap_or_else(|| "star_transactions insert".into()),
            ))
        }
        Err(e) => Err(DbError::Sqlite(e)),
    }
}

/// Most recent entries for a user, newest first.
pub fn recent_for_user(
    conn: &Connection,
    user_id: TelegramId,
    limit: u32,
) -> Result<Vec<StarTransaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, amount, kind, description, created_at
         FROM star_transactions WHERE user_id = ?1
         ORDER BY created_at DESC, id DESC LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![user_id, limit], |row| {
            Ok(StarTransaction {
                id: row.get(0)?,
                user_id: row.get(1)?,
                amount: row.get(2)?,
                kind: row.get(3)?,
                description: row.get(4)?,
                created_at: row.get::<_, i64>(5)? as u64,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Signed sum of every entry for a user.
pub fn sum_for_user(conn: &Connection, user_id: TelegramId) -> Result<i64> {
    let sum: i64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM star_transactions WHERE user_id = ?1",
        [user_id],
        |row| row.get(0),
    )?;
    Ok(sum)
}

/// Signed sum of entries for a user, skipping one kind.
pub fn sum_for_user_excluding(
    conn: &Connection,
    user_id: TelegramId,
    excluded_kind: &str,
) -> Result<i64> {
    let sum: i64 = conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM star_transactions
         WHERE user_id = ?1 AND kind != ?2",
        rusqlite::params![user_id, excluded_kind],
        |row| row.get(0),
    )?;
    Ok(sum)
}
