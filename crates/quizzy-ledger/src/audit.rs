//! Ledger history and balance reconciliation.

use rusqlite::Connection;

use quizzy_db::queries::{transactions, users};
use quizzy_db::DbError;
use quizzy_types::ledger::{kind, StarTransaction};
use quizzy_types::TelegramId;

use crate::{LedgerError, Result};

/// Balance reconciliation report for one user.
#[derive(Clone, Copy, Debug)]
pub struct Reconciliation {
    /// Stored Virtual Stars balance.
    pub balance: u64,
    /// Signed sum of the ledger entries that moved the balance.
    pub applied_sum: i64,
    /// Signed sum of every ledger entry, bookkeeping included.
    pub logged_sum: i64,
}

impl Reconciliation {
    /// Stored balance minus the applied sum. Zero when consistent.
    pub fn drift(&self) -> i64 {
        self.balance as i64 - self.applied_sum
    }

    /// Whether the stored balance matches the ledger.
    pub fn is_consistent(&self) -> bool {
        self.drift() == 0
    }
}

/// Most recent ledger entries for a user, newest first.
///
/// An unknown identity yields an empty history rather than an error.
pub fn recent(
    conn: &Connection,
    telegram_id: TelegramId,
    limit: u32,
) -> Result<Vec<StarTransaction>> {
    Ok(transactions::recent_for_user(conn, telegram_id, limit)?)
}

/// Compare a stored balance against the sum of its ledger entries.
///
/// `watch_ad` entries are bookkeeping-only (they never move the balance)
/// and are excluded from the sum.
///
/// # Errors
///
/// - [`LedgerError::UserNotFound`] if the identity has no account
pub fn reconcile(conn: &Connection, telegram_id: TelegramId) -> Result<Reconciliation> {
    let balance = match users::balance(conn, telegram_id) {
        Ok(balance) => balance,
        Err(DbError::NotFound(_)) => return Err(LedgerError::UserNotFound { telegram_id }),
        Err(e) => return Err(e.into()),
    };
    let applied_sum = transactions::sum_for_user_excluding(conn, telegram_id, kind::WATCH_AD)?;
    let logged_sum = transactions::sum_for_user(conn, telegram_id)?;

    let report = Reconciliation {
        balance,
        applied_sum,
        logged_sum,
    };
    if !report.is_consistent() {
        tracing::warn!(
            telegram_id,
            balance,
            applied_sum,
            drift = report.drift(),
            "ledger does not reconcile with stored balance"
        );
    }
    Ok(report)
}
