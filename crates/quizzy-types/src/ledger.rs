//! Ledger entry structures.

use serde::{Deserialize, Serialize};

use crate::TelegramId;

/// Well-known transaction kind labels.
///
/// Spend actions may carry other labels (the kind column is free-form for
/// debits); these are the ones the engine itself writes.
pub mod kind {
    pub const SURVEY_REWARD: &str = "survey_reward";
    pub const CHANNEL_REWARD: &str = "channel_reward";
    pub const WATCH_AD: &str = "watch_ad";
    pub const SKIP_WAIT: &str = "skip_wait";
    pub const REDEEM: &str = "redeem_stars";
}

/// An append-only ledger entry. Positive `amount` is a credit, negative a
/// debit. Never mutated after insertion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StarTransaction {
    pub id: i64,
    pub user_id: TelegramId,
    pub amount: i64,
    pub kind: String,
    pub description: String,
    pub created_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(kind::SURVEY_REWARD, "survey_reward");
        assert_eq!(kind::WATCH_AD, "watch_ad");
        assert_eq!(kind::REDEEM, "redeem_stars");
    }

    #[test]
    fn test_transaction_serialization() {
        let tx = StarTransaction {
            id: 1,
            user_id: 42,
            amount: -10,
            kind: kind::SKIP_WAIT.to_string(),
            description: "Spent 10 stars to skip_wait".to_string(),
            created_at: 1_700_000_000,
        };
        let json = serde_json::to_value(&tx).expect("serialize");
        assert_eq!(json["amount"], -10);
        assert_eq!(json["kind"], "skip_wait");
    }
}
