//! User account query functions.

use rusqlite::Connection;

use quizzy_types::{account::UserProfile, TelegramId};

use crate::{DbError, Result};

/// Fetch a profile, creating the account on first contact.
///
/// `display_name` and `referred_by` only apply at creation; an existing
/// account keeps its stored values and just gets `last_active` bumped.
pub fn get_or_create(
    conn: &Connection,
    telegram_id: TelegramId,
    display_name: Option<&str>,
    referred_by: Option<TelegramId>,
    now: u64,
) -> Result<UserProfile> {
    conn.execute(
        "INSERT INTO users (telegram_id, display_name, referred_by, last_redeem_reset,
                            created_at, last_active)
         VALUES (?1, ?2, ?3, ?4, ?4, ?4)
         ON CONFLICT(telegram_id) DO UPDATE SET last_active = excluded.last_active",
        rusqlite::params![
            telegram_id,
            display_name.unwrap_or("Anonymous"),
            referred_by,
            now as i64,
        ],
    )?;
    get(conn, telegram_id)
}

/// Fetch a profile by Telegram identity.
pub fn get(conn: &Connection, telegram_id: TelegramId) -> Result<UserProfile> {
    let result = conn.query_row(
        "SELECT telegram_id, display_name, virtual_stars, real_stars_redeemed,
                surveys_completed, first_survey_completed, referred_by,
                redeemed_this_week, last_redeem_reset, created_at, last_active,
                (SELECT COUNT(*) FROM users r WHERE r.referred_by = users.telegram_id)
         FROM users WHERE telegram_id = ?1",
        [telegram_id],
        row_to_profile,
    );
    match result {
        Ok(profile) => Ok(profile),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(DbError::NotFound(format!("user {telegram_id}")))
        }
        Err(e) => Err(DbError::Sqlite(e)),
    }
}

/// Fetch a profile if the account exists.
pub fn find(conn: &Connection, telegram_id: TelegramId) -> Result<Option<UserProfile>> {
    match get(conn, telegram_id) {
        Ok(profile) => Ok(Some(profile)),
        Err(DbError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Current Virtual Stars balance.
pub fn balance(conn: &Connection, telegram_id: TelegramId) -> Result<u64> {
    match conn.query_row(
        "SELECT virtual_stars FROM users WHERE telegram_id = ?1",
        [telegram_id],
        |row| row.get::<_, i64>(0),
    ) {
        Ok(stars) => Ok(stars as u64),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(DbError::NotFound(format!("user {telegram_id}")))
        }
        Err(e) => Err(DbError::Sqlite(e)),
    }
}

/// Add stars to a balance. Returns `false` if the account does not exist.
pub fn credit_stars(
    conn: &Connection,
    telegram_id: TelegramId,
    amount: u64,
    now: u64,
) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE users SET virtual_stars = virtual_stars + ?2, last_active = ?3
         WHERE telegram_id = ?1",
        rusqlite::params![telegram_id, amount as i64, now as i64],
    )?;
    Ok(updated == 1)
}

/// Remove stars from a balance.
///
/// Returns `false` when the account is missing or the balance would go
/// negative; the caller distinguishes the two by re-reading the row.
pub fn debit_stars(
    conn: &Connection,
    telegram_id: TelegramId,
    amount: u64,
    now: u64,
) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE users SET virtual_stars = virtual_stars - ?2, last_active = ?3
         WHERE telegram_id = ?1 AND virtual_stars >= ?2",
        rusqlite::params![telegram_id, amount as i64, now as i64],
    )?;
    Ok(updated == 1)
}

/// Latch the first-survey flag. Returns `false` if it was already set.
pub fn mark_first_survey_completed(conn: &Connection, telegram_id: TelegramId) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE users SET first_survey_completed = 1
         WHERE telegram_id = ?1 AND first_survey_completed = 0",
        [telegram_id],
    )?;
    Ok(updated == 1)
}

/// Bump the lifetime completed-survey counter.
pub fn increment_surveys_completed(
    conn: &Connection,
    telegram_id: TelegramId,
    now: u64,
) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE users SET surveys_completed = surveys_completed + 1, last_active = ?2
         WHERE telegram_id = ?1",
        rusqlite::params![telegram_id, now as i64],
    )?;
    Ok(updated == 1)
}

/// Start a fresh redemption window if the current one has run its course.
///
/// Returns `true` when a reset happened. A no-op (window still open, or
/// account missing) returns `false`.
pub fn reset_redeem_window(
    conn: &Connection,
    telegram_id: TelegramId,
    now: u64,
    period_secs: u64,
) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE users SET redeemed_this_week = 0, last_redeem_reset = ?2
         WHERE telegram_id = ?1 AND ?2 > last_redeem_reset + ?3",
        rusqlite::params![telegram_id, now as i64, period_secs as i64],
    )?;
    Ok(updated == 1)
}

/// Atomically move `amount` stars out of a balance and into the redeemed
/// totals, guarded by both the balance and the weekly cap.
///
/// Returns `false` when any guard fails; the caller re-reads the row to
/// decide which one did.
pub fn apply_redemption(
    conn: &Connection,
    telegram_id: TelegramId,
    amount: u64,
    weekly_cap: u64,
    now: u64,
) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE users SET virtual_stars = virtual_stars - ?2,
                          redeemed_this_week = redeemed_this_week + ?2,
                          real_stars_redeemed = real_stars_redeemed + ?2,
                          last_active = ?4
         WHERE telegram_id = ?1
           AND virtual_stars >= ?2
           AND redeemed_this_week + ?2 <= ?3",
        rusqlite::params![telegram_id, amount as i64, weekly_cap as i64, now as i64],
    )?;
    Ok(updated == 1)
}

fn row_to_profile(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserProfile> {
    Ok(UserProfile {
        telegram_id: row.get(0)?,
        display_name: row.get(1)?,
        virtual_stars: row.get::<_, i64>(2)? as u64,
        real_stars_redeemed: row.get::<_, i64>(3)? as u64,
        surveys_completed: row.get::<_, i64>(4)? as u32,
        first_survey_completed: row.get::<_, i64>(5)? != 0,
        referred_by: row.get(6)?,
        redeemed_this_week: row.get::<_, i64>(7)? as u64,
        last_redeem_reset: row.get::<_, i64>(8)? as u64,
        created_at: row.get::<_, i64>(9)? as u64,
        last_active: row.get::<_, i64>(10)? as u64,
        friends_referred: row.get::<_, i64>(11)? as u32,
    })
}
