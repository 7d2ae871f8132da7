//! Redemption request query functions.

use rusqlite::types::Type;
use rusqlite::Connection;

use quizzy_types::{
    redeem::{Redemption, RedemptionStatus},
    TelegramId,
};

use crate::{DbError, Result};

/// Insert a redemption in `pending` status.
///
/// A duplicate `request_id` (or an unknown user) surfaces as
/// [`DbError::Constraint`].
#[allow(clippy::too_many_arguments)]
pub fn insert(
    conn: &Connection,
    redemption_id: &str,
    user_id: TelegramId,
    amount: u64,
    payment_name: Option<&str>,
    payment_email: Option<&str>,
    request_id: Option<&str>,
    now: u64,
) -> Result<()> {
    let result = conn.execute(
        "INSERT INTO redemptions (redemption_id, user_id, amount, payment_name,
                                  payment_email, request_id, requested_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            redemption_id,
            user_id,
            amount as i64,
            payment_name,
            payment_email,
            request_id,
            now as i64,
        ],
    );
    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(e, msg))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(DbError::Constraint(
                msg.unwrap_or_else(|| "redemptions insert".into()),
            ))
        }
        Err(e) => Err(DbError::Sqlite(e)),
    }
}

/// Fetch a redemption by id.
pub fn get(conn: &Connection, redemption_id: &str) -> Result<Redemption> {
    let result = conn.query_row(
        "SELECT redemption_id, user_id, amount, status, payment_name, payment_email,
                request_id, requested_at, sent_at
         FROM redemptions WHERE redemption_id = ?1",
        [redemption_id],
        row_to_redemption,
    );
    match result {
        Ok(redemption) => Ok(redemption),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(DbError::NotFound(format!("redemption {redemption_id}")))
        }
        Err(e) => Err(DbError::Sqlite(e)),
    }
}

/// Look up a redemption by its idempotency key.
pub fn find_by_request_id(conn: &Connection, request_id: &str) -> Result<Option<Redemption>> {
    let result = conn.query_row(
        "SELECT redemption_id, user_id, amount, status, payment_name, payment_email,
                request_id, requested_at, sent_at
         FROM redemptions WHERE request_id = ?1",
        [request_id],
        row_to_redemption,
    );
    match result {
        Ok(redemption) => Ok(Some(redemption)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DbError::Sqlite(e)),
    }
}

/// Transition `pending` -> `sent`. Returns `false` when the redemption is
/// missing or already sent.
pub fn mark_sent(conn: &Connection, redemption_id: &str, now: u64) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE redemptions SET status = 'sent', sent_at = ?2
         WHERE redemption_id = ?1 AND status = 'pending'",
        rusqlite::params![redemption_id, now as i64],
    )?;
    Ok(updated == 1)
}

/// Every pending redemption, oldest first (approval queue order).
pub fn list_pending(conn: &Connection) -> Result<Vec<Redemption>> {
    let mut stmt = conn.prepare(
        "SELECT redemption_id, user_id, amount, status, payment_name, payment_email,
                request_id, requested_at, sent_at
         FROM redemptions WHERE status = 'pending'
         ORDER BY requested_at ASC, rowid ASC",
    )?;

    let rows = stmt
        .query_map([], row_to_redemption)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// All redemptions for a user, newest first.
pub fn list_for_user(conn: &Connection, user_id: TelegramId) -> Result<Vec<Redemption>> {
    let mut stmt = conn.prepare(
        "SELECT redemption_id, user_id, amount, status, payment_name, payment_email,
                request_id, requested_at, sent_at
         FROM redemptions WHERE user_id = ?1
         ORDER BY requested_at DESC, rowid DESC",
    )?;

    let rows = stmt
        .query_map([user_id], row_to_redemption)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn row_to_redemption(row: &rusqlite::Row<'_>) -> rusqlite::Result<Redemption> {
    let label: String = row.get(3)?;
    let status = RedemptionStatus::parse(&label).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("unknown redemption status {label:?}").into(),
        )
    })?;

    Ok(Redemption {
        redemption_id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get::<_, i64>(2)? as u64,
        status,
        payment_name: row.get(4)?,
        payment_email: row.get(5)?,
        request_id: row.get(6)?,
        requested_at: row.get::<_, i64>(7)? as u64,
        sent_at: row.get::<_, Option<i64>>(8)?.map(|v| v as u64),
    })
}
