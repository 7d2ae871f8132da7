//! Session lifecycle: start, per-step answers, completion, history.

use rusqlite::Connection;

use quizzy_db::queries::{sessions, users};
use quizzy_types::{session::SurveySession, SessionId, TelegramId};

use crate::{Result, SurveyError};

/// How a caller names the session it is talking about.
#[derive(Clone, Copy, Debug)]
pub enum SessionRef<'a> {
    /// By generated session id.
    Id(&'a str),
    /// By owner; resolves to the user's most recent session.
    User(TelegramId),
}

/// Open a new session at step 1 with an empty answer map.
///
/// Always succeeds: the account does not have to exist yet, so the very
/// first thing a new visitor does can be starting a survey.
pub fn start_session(conn: &Connection, telegram_id: TelegramId, now: u64) -> Result<SessionId> {
    let session_id = new_session_id();
    sessions::insert(conn, &session_id, telegram_id, now)?;
    tracing::debug!(telegram_id, session_id = session_id.as_str(), "session started");
    Ok(session_id)
}

/// Record one answer and advance the step counter.
///
/// The answer lands under the label `q{step}` and the counter moves to
/// `step + 1`. Step ordering is caller-trusted: any step is accepted, but
/// the counter never moves backwards.
///
/// # Errors
///
/// - [`SurveyError::SessionNotFound`] if the reference resolves to no
///   session, or the session is already completed
pub fn submit_answer(
    conn: &Connection,
    session: SessionRef<'_>,
    step: u32,
    answer: serde_json::Value,
) -> Result<()> {
    quizzy_db::immediate_tx(conn, |tx| {
        let current = resolve(tx, session)?;
        if !current.is_open() {
            return Err(SurveyError::SessionNotFound);
        }

        let session_id = current.session_id;
        let mut answers = current.answers;
        answers.insert(format!("q{step}"), answer);

        if !sessions::store_answers(tx, &session_id, &answers, step + 1)? {
            return Err(SurveyError::SessionNotFound);
        }
        tracing::debug!(session_id = session_id.as_str(), step, "answer recorded");
        Ok(())
    })
}

/// Complete a session and count it towards the user's lifetime total.
///
/// Stamping `completed_at` is unconditional, so re-completing simply
/// overwrites the timestamp (and counts again). Reward issuance is a
/// separate, explicit ledger call; completion only does the bookkeeping.
///
/// # Errors
///
/// - [`SurveyError::SessionNotFound`] if the reference resolves to no
///   session
/// - [`SurveyError::UserNotFound`] if `telegram_id` was never registered
pub fn complete_session(
    conn: &Connection,
    session: SessionRef<'_>,
    telegram_id: TelegramId,
    now: u64,
) -> Result<()> {
    quizzy_db::immediate_tx(conn, |tx| {
        let current = resolve(tx, session)?;
        if !sessions::mark_completed(tx, &current.session_id, now)? {
            return Err(SurveyError::SessionNotFound);
        }
        if !users::increment_surveys_completed(tx, telegram_id, now)? {
            return Err(SurveyError::UserNotFound { telegram_id });
        }
        tracing::debug!(
            telegram_id,
            session_id = current.session_id.as_str(),
            "session completed"
        );
        Ok(())
    })
}

/// All of a user's sessions, newest first.
pub fn history(conn: &Connection, telegram_id: TelegramId) -> Result<Vec<SurveySession>> {
    Ok(sessions::list_for_user(conn, telegram_id)?)
}

fn resolve(conn: &Connection, session: SessionRef<'_>) -> Result<SurveySession> {
    let found = match session {
        SessionRef::Id(session_id) => sessions::find(conn, session_id)?,
        SessionRef::User(telegram_id) => sessions::latest_for_user(conn, telegram_id)?,
    };
    found.ok_or(SurveyError::SessionNotFound)
}

/// Generate a random 32-hex-char session id.
fn new_session_id() -> SessionId {
    let mut bytes = [0u8; 16];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut bytes);
    hex::encode(bytes)
}
