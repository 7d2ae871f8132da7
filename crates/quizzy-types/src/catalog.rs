//! Survey catalog structures (admin-authored questions).

use serde::{Deserialize, Serialize};

/// One admin-authored question with its ordered answer options.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Survey {
    pub survey_id: i64,
    pub question: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Position within the questionnaire.
    pub position: u32,
    pub is_active: bool,
    pub created_at: u64,
}
