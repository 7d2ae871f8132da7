//! Survey session structures.

use serde::{Deserialize, Serialize};

use crate::{SessionId, TelegramId};

/// Lifecycle state of a survey session.
///
/// A session is `Open` from creation until `completed_at` is stamped, after
/// which it is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Open,
    Completed,
}

/// A user's questionnaire run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SurveySession {
    pub session_id: SessionId,
    pub user_id: TelegramId,
    pub started_at: u64,
    /// Next step the caller is expected to submit. Only increases.
    pub current_step: u32,
    /// Step-label ("q1", "q2", ...) to answer value.
    pub answers: serde_json::Map<String, serde_json::Value>,
    pub completed_at: Option<u64>,
}

impl SurveySession {
    /// Current lifecycle state, derived from `completed_at`.
    pub fn state(&self) -> SessionState {
        if self.completed_at.is_some() {
            SessionState::Completed
        } else {
            SessionState::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == SessionState::Open
    }
}
