//! # quizzy-types
//!
//! Shared domain types used across the Quizzy workspace: user profiles,
//! survey sessions, ledger entries, redemptions, and the survey catalog.

pub mod account;
pub mod catalog;
pub mod ledger;
pub mod redeem;
pub mod session;

/// Common type aliases.
pub type TelegramId = i64;
pub type SessionId = String;
pub type RedemptionId = String;

/// Virtual Stars granted for the first completed survey.
pub const FIRST_SURVEY_REWARD: u64 = 50;

/// Virtual Stars granted for every survey after the first.
pub const REPEAT_SURVEY_REWARD: u64 = 20;

/// Virtual Stars granted for joining the Telegram channel.
pub const CHANNEL_REWARD: u64 = 10;

/// Seconds in one day.
pub const DAY_SECS: u64 = 86_400;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_constants() {
        assert!(FIRST_SURVEY_REWARD > REPEAT_SURVEY_REWARD);
        assert_eq!(FIRST_SURVEY_REWARD, 50);
        assert_eq!(REPEAT_SURVEY_REWARD, 20);
        assert_eq!(CHANNEL_REWARD, 10);
    }
}
