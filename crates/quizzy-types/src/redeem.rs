//! Redemption structures.

use serde::{Deserialize, Serialize};

use crate::{RedemptionId, TelegramId};

/// Status lifecycle of a redemption request: `pending` until an
/// administrator approves it, then `sent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedemptionStatus {
    Pending,
    Sent,
}

impl RedemptionStatus {
    /// Stable label as stored in the record store.
    pub fn as_str(self) -> &'static str {
        match self {
            RedemptionStatus::Pending => "pending",
            RedemptionStatus::Sent => "sent",
        }
    }

    /// Parse a stored label back into a status.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "pending" => Some(RedemptionStatus::Pending),
            "sent" => Some(RedemptionStatus::Sent),
            _ => None,
        }
    }
}

/// Payment contact supplied with a redemption request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentContact {
    pub name: String,
    pub email: String,
}

/// A request to convert Virtual Stars into a real reward.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Redemption {
    pub redemption_id: RedemptionId,
    pub user_id: TelegramId,
    pub amount: u64,
    pub status: RedemptionStatus,
    pub payment_name: Option<String>,
    pub payment_email: Option<String>,
    /// Client-supplied idempotency key, unique when present.
    pub request_id: Option<String>,
    pub requested_at: u64,
    pub sent_at: Option<u64>,
}
