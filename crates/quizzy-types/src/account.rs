//! User account structures.

use serde::{Deserialize, Serialize};

use crate::TelegramId;

/// A platform user as returned to callers.
///
/// `friends_referred` is derived at read time (the number of users whose
/// `referred_by` points at this identity); it is not a stored column.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserProfile {
    pub telegram_id: TelegramId,
    pub display_name: String,
    /// Current Virtual Stars balance. Never negative.
    pub virtual_stars: u64,
    /// Lifetime total of stars converted into real rewards.
    pub real_stars_redeemed: u64,
    pub surveys_completed: u32,
    pub first_survey_completed: bool,
    pub referred_by: Option<TelegramId>,
    /// Stars redeemed inside the current rolling window.
    pub redeemed_this_week: u64,
    /// Unix seconds at which the current redemption window started.
    pub last_redeem_reset: u64,
    pub created_at: u64,
    pub last_active: u64,
    pub friends_referred: u32,
}
