//! Survey session query functions.

use rusqlite::types::Type;
use rusqlite::Connection;

use quizzy_types::{session::SurveySession, TelegramId};

use crate::{DbError, Result};

/// Insert a fresh open session at step 1 with an empty answer map.
pub fn insert(conn: &Connection, session_id: &str, user_id: TelegramId, now: u64) -> Result<()> {
    conn.execute(
        "INSERT INTO survey_sessions (session_id, user_id, started_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![session_id, user_id, now as i64],
    )?;
    Ok(())
}

/// Fetch a session by id.
pub fn get(conn: &Connection, session_id: &str) -> Result<SurveySession> {
    let result = conn.query_row(
        "SELECT session_id, user_id, started_at, current_step, answers, completed_at
         FROM survey_sessions WHERE session_id = ?1",
        [session_id],
        row_to_session,
    );
    match result {
        Ok(session) => Ok(session),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(DbError::NotFound(format!("session {session_id}")))
        }
        Err(e) => Err(DbError::Sqlite(e)),
    }
}

/// Fetch a session by id if it exists.
pub fn find(conn: &Connection, session_id: &str) -> Result<Option<SurveySession>> {
    match get(conn, session_id) {
        Ok(session) => Ok(Some(session)),
        Err(DbError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// The user's most recent session, open or completed.
///
/// Newest `started_at` wins; insertion order breaks ties.
pub fn latest_for_user(
    conn: &Connection,
    user_id: TelegramId,
) -> Result<Option<SurveySession>> {
    let result = conn.query_row(
        "SELECT session_id, user_id, started_at, current_step, answers, completed_at
         FROM survey_sessions WHERE user_id = ?1
         ORDER BY started_at DESC, rowid DESC LIMIT 1",
        [user_id],
        row_to_session,
    );
    match result {
        Ok(session) => Ok(Some(session)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DbError::Sqlite(e)),
    }
}

/// Write the answer map back and advance the step counter.
///
/// Only touches open sessions; `current_step` never moves backwards even
/// when answers arrive out of order. Returns `false` when the session is
/// missing or already completed.
pub fn store_answers(
    conn: &Connection,
    session_id: &str,
    answers: &serde_json::Map<String, serde_json::Value>,
    next_step: u32,
) -> Result<bool> {
    let encoded = serde_json::to_string(answers)
        .map_err(|e| DbError::Serialization(e.to_string()))?;
    let updated = conn.execute(
        "UPDATE survey_sessions
         SET answers = ?2, current_step = MAX(current_step, ?3)
         WHERE session_id = ?1 AND completed_at IS NULL",
        rusqlite::params![session_id, encoded, next_step as i64],
    )?;
    Ok(updated == 1)
}

/// Stamp `completed_at`. Unconditional: re-completing overwrites the
/// timestamp. Returns `false` only when the session is missing.
pub fn mark_completed(conn: &Connection, session_id: &str, now: u64) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE survey_sessions SET completed_at = ?2 WHERE session_id = ?1",
        rusqlite::params![session_id, now as i64],
    )?;
    Ok(updated == 1)
}

/// All sessions for a user, newest first.
pub fn list_for_user(conn: &Connection, user_id: TelegramId) -> Result<Vec<SurveySession>> {
    let mut stmt = conn.prepare(
        "SELECT session_id, user_id, started_at, current_step, answers, completed_at
         FROM survey_sessions WHERE user_id = ?1
         ORDER BY started_at DESC, rowid DESC",
    )?;

    let rows = stmt
        .query_map([user_id], row_to_session)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<SurveySession> {
    let answers: String = row.get(4)?;
    let answers = serde_json::from_str(&answers)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(SurveySession {
        session_id: row.get(0)?,
        user_id: row.get(1)?,
        started_at: row.get::<_, i64>(2)? as u64,
        current_step: row.get::<_, i64>(3)? as u32,
        answers,
        completed_at: row.get::<_, Option<i64>>(5)?.map(|v| v as u64),
    })
}
