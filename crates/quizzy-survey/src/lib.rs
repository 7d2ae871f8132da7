//! # quizzy-survey
//!
//! Survey session state machine: tracks a user's in-progress questionnaire
//! from start through per-step answers to completion.
//!
//! A session is `OPEN` from creation until its completion timestamp is
//! stamped, after which it is terminal. Answers land in a step-labelled
//! map and the step counter only moves forward.

pub mod session;

use quizzy_db::DbError;
use quizzy_types::TelegramId;

/// Error types for survey session operations.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// No session matches the reference, or the session is already
    /// completed.
    #[error("session not found")]
    SessionNotFound,

    /// Completion names a user that was never registered.
    #[error("user {telegram_id} not found")]
    UserNotFound {
        /// The unknown Telegram identity.
        telegram_id: TelegramId,
    },

    /// The record store failed.
    #[error("store error: {0}")]
    Store(#[from] DbError),
}

/// Convenience result type for survey session operations.
pub type Result<T> = std::result::Result<T, SurveyError>;
