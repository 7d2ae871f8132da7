//! # quizzy-redeem
//!
//! Redemption workflow: converts Virtual Stars into real-reward requests
//! under a minimum-amount threshold and a rolling weekly cap, then walks
//! each request through its `pending -> sent` lifecycle.
//!
//! Also holds the admin session store backing the approval console.
//!
//! ## Modules
//!
//! - [`policy`] — configurable thresholds and window length
//! - [`request`] — user-facing redemption requests
//! - [`approve`] — administrative approval queue
//! - [`admin`] — admin session tokens

pub mod admin;
pub mod approve;
pub mod policy;
pub mod request;

use quizzy_db::DbError;
use quizzy_types::TelegramId;

/// Error types for redemption operations.
#[derive(Debug, thiserror::Error)]
pub enum RedeemError {
    /// The identity has no account.
    #[error("user {telegram_id} not found")]
    UserNotFound {
        /// The unknown Telegram identity.
        telegram_id: TelegramId,
    },

    /// The balance is below the redemption minimum.
    #[error("balance {balance} is below minimum {minimum}")]
    BelowMinimum {
        /// Current Virtual Stars balance.
        balance: u64,
        /// Minimum redeemable amount.
        minimum: u64,
    },

    /// The rolling weekly cap leaves no room for this redemption.
    #[error("redeemed {redeemed_this_week} this week, cap is {cap}")]
    WeeklyCapExceeded {
        /// Stars already redeemed inside the current window.
        redeemed_this_week: u64,
        /// The window cap.
        cap: u64,
    },

    /// The record store failed.
    #[error("store error: {0}")]
    Store(#[from] DbError),
}

/// Convenience result type for redemption operations.
pub type Result<T> = std::result::Result<T, RedeemError>;
