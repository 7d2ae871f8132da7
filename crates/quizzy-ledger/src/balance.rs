//! Balance mutations: credits, debits, and spend actions.

use rusqlite::Connection;

use quizzy_db::queries::{transactions, users};
use quizzy_db::DbError;
use quizzy_types::{ledger::kind, TelegramId};

use crate::{LedgerError, Result};

/// Add stars to a balance and append the matching ledger entry.
///
/// The balance update, the log append, and the balance re-read share one
/// write transaction, so concurrent credits serialize instead of losing
/// updates. Returns the new balance.
///
/// # Errors
///
/// - [`LedgerError::InvalidAmount`] if `amount` is zero
/// - [`LedgerError::UserNotFound`] if the identity has no account
/// - [`LedgerError::RewardAlreadyClaimed`] if `kind` permits one entry per
///   user and one already exists (nothing is credited)
pub fn credit(
    conn: &Connection,
    telegram_id: TelegramId,
    amount: u64,
    kind: &str,
    description: &str,
    now: u64,
) -> Result<u64> {
    if amount == 0 {
        return Err(LedgerError::InvalidAmount);
    }

    quizzy_db::immediate_tx(conn, |tx| {
        if !users::credit_stars(tx, telegram_id, amount, now)? {
            return Err(LedgerError::UserNotFound { telegram_id });
        }
        match transactions::record(tx, telegram_id, amount as i64, kind, description, now) {
            Ok(_) => {}
            Err(DbError::Constraint(_)) => {
                return Err(LedgerError::RewardAlreadyClaimed { telegram_id });
            }
            Err(e) => return Err(e.into()),
        }
        let balance = users::balance(tx, telegram_id)?;
        tracing::debug!(telegram_id, amount, kind, balance, "stars credited");
        Ok(balance)
    })
}

/// Remove stars from a balance and append the matching ledger entry.
///
/// The debit is a conditional decrement: it only applies while the balance
/// covers `amount`, so the store never holds a negative balance even under
/// concurrent debits. Returns the new balance.
///
/// # Errors
///
/// - [`LedgerError::InvalidAmount`] if `amount` is zero
/// - [`LedgerError::UserNotFound`] if the identity has no account
/// - [`LedgerError::InsufficientBalance`] if the balance cannot cover
///   `amount` (no mutation is performed)
pub fn debit(
    conn: &Connection,
    telegram_id: TelegramId,
    amount: u64,
    kind: &str,
    description: &str,
    now: u64,
) -> Result<u64> {
    if amount == 0 {
        return Err(LedgerError::InvalidAmount);
    }

    quizzy_db::immediate_tx(conn, |tx| {
        if !users::debit_stars(tx, telegram_id, amount, now)? {
            return match users::find(tx, telegram_id)? {
                None => Err(LedgerError::UserNotFound { telegram_id }),
                Some(profile) => Err(LedgerError::InsufficientBalance {
                    available: profile.virtual_stars,
                    required: amount,
                }),
            };
        }
        transactions::record(tx, telegram_id, -(amount as i64), kind, description, now)?;
        let balance = users::balance(tx, telegram_id)?;
        tracing::debug!(telegram_id, amount, kind, balance, "stars debited");
        Ok(balance)
    })
}

/// Spend stars on a named action, returning the new balance.
///
/// The `watch_ad` action is bookkeeping-only: it appends a ledger entry
/// with `-amount` but leaves the balance untouched. Every other action is
/// a plain debit under the action's label.
pub fn spend(
    conn: &Connection,
    telegram_id: TelegramId,
    amount: u64,
    action: &str,
    now: u64,
) -> Result<u64> {
    if amount == 0 {
        return Err(LedgerError::InvalidAmount);
    }

    let description = format!("Spent {amount} stars to {action}");

    if action == kind::WATCH_AD {
        return quizzy_db::immediate_tx(conn, |tx| {
            let balance = match users::balance(tx, telegram_id) {
                Ok(balance) => balance,
                Err(DbError::NotFound(_)) => {
                    return Err(LedgerError::UserNotFound { telegram_id });
                }
                Err(e) => return Err(e.into()),
            };
            transactions::record(
                tx,
                telegram_id,
                -(amount as i64),
                kind::WATCH_AD,
                &description,
                now,
            )?;
            tracing::debug!(telegram_id, amount, "watch_ad logged, balance unchanged");
            Ok(balance)
        });
    }

    debit(conn, telegram_id, amount, action, &description, now)
}
