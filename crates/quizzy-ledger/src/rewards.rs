//! Reward issuance: survey completion and channel membership.

use rusqlite::Connection;

use quizzy_db::queries::{transactions, users};
use quizzy_types::ledger::kind;
use quizzy_types::{TelegramId, CHANNEL_REWARD, FIRST_SURVEY_REWARD, REPEAT_SURVEY_REWARD};

use crate::{balance, LedgerError, Result};

/// Credit the survey completion reward and return the amount granted.
///
/// The first-ever completion pays [`FIRST_SURVEY_REWARD`]; every later one
/// pays [`REPEAT_SURVEY_REWARD`]. The tier read, the first-survey latch,
/// the credit, and the log append share one write transaction, so two
/// racing claims cannot both collect the first-survey bonus.
///
/// # Errors
///
/// - [`LedgerError::UserNotFound`] if the identity has no account
pub fn grant_survey_reward(conn: &Connection, telegram_id: TelegramId, now: u64) -> Result<u64> {
    quizzy_db::immediate_tx(conn, |tx| {
        let profile = users::find(tx, telegram_id)?
            .ok_or(LedgerError::UserNotFound { telegram_id })?;

        let amount = if profile.first_survey_completed {
            REPEAT_SURVEY_REWARD
        } else {
            FIRST_SURVEY_REWARD
        };

        users::mark_first_survey_completed(tx, telegram_id)?;
        users::credit_stars(tx, telegram_id, amount, now)?;
        transactions::record(
            tx,
            telegram_id,
            amount as i64,
            kind::SURVEY_REWARD,
            "Completed survey",
            now,
        )?;

        tracing::debug!(telegram_id, amount, "survey reward granted");
        Ok(amount)
    })
}

/// Credit the one-time channel join reward and return the amount granted.
///
/// The store permits a single `channel_reward` ledger entry per user, so a
/// repeat claim fails with [`LedgerError::RewardAlreadyClaimed`] and leaves
/// both the balance and the log untouched.
///
/// # Errors
///
/// - [`LedgerError::UserNotFound`] if the identity has no account
/// - [`LedgerError::RewardAlreadyClaimed`] on a second claim
pub fn grant_channel_reward(conn: &Connection, telegram_id: TelegramId, now: u64) -> Result<u64> {
    balance::credit(
        conn,
        telegram_id,
        CHANNEL_REWARD,
        kind::CHANNEL_REWARD,
        "Joined Telegram channel",
        now,
    )?;
    tracing::debug!(telegram_id, amount = CHANNEL_REWARD, "channel reward granted");
    Ok(CHANNEL_REWARD)
}
