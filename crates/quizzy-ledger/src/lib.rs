//! # quizzy-ledger
//!
//! The Stars Ledger engine: owns every Virtual Stars balance mutation and
//! the append-only transaction log behind it.
//!
//! Every mutation runs as a conditional update inside a single write
//! transaction, so concurrent requests for the same user serialize at the
//! store instead of overwriting each other's balance.
//!
//! ## Modules
//!
//! - [`account`] — lookup and lazy registration
//! - [`balance`] — credits, debits, and spend actions
//! - [`rewards`] — survey and channel reward issuance
//! - [`audit`] — history and balance reconciliation

pub mod account;
pub mod audit;
pub mod balance;
pub mod rewards;

use quizzy_db::DbError;
use quizzy_types::TelegramId;

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The identity has no account and the operation does not create one.
    #[error("user {telegram_id} not found")]
    UserNotFound {
        /// The unknown Telegram identity.
        telegram_id: TelegramId,
    },

    /// The balance cannot cover the requested debit.
    #[error("insufficient balance: have {available}, need {required}")]
    InsufficientBalance {
        /// Available Virtual Stars.
        available: u64,
        /// Required amount.
        required: u64,
    },

    /// Credits and debits must move at least one star.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// A one-shot reward was claimed a second time.
    #[error("reward already claimed by user {telegram_id}")]
    RewardAlreadyClaimed {
        /// The claiming identity.
        telegram_id: TelegramId,
    },

    /// The record store failed.
    #[error("store error: {0}")]
    Store(#[from] DbError),
}

/// Convenience result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
