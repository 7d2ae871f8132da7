//! User-facing redemption requests.

use rusqlite::Connection;

use quizzy_db::queries::{redemptions, transactions, users};
use quizzy_types::ledger::kind;
use quizzy_types::redeem::{PaymentContact, Redemption};
use quizzy_types::{RedemptionId, TelegramId};

use crate::{policy::RedeemPolicy, RedeemError, Result};

/// Request conversion of Virtual Stars into a real reward.
///
/// The whole flow is one write transaction: the lazy window reset, the
/// guarded balance move, the `redeem_stars` ledger entry, and the pending
/// `Redemption` row all commit together or not at all, so two racing
/// requests cannot both pass a stale window or cap check.
///
/// `request_id` makes the call retry-safe: a repeat with the same key
/// returns the already-created redemption without moving any stars.
///
/// # Errors
///
/// - [`RedeemError::UserNotFound`] if the identity has no account
/// - [`RedeemError::BelowMinimum`] if the balance cannot cover the tier
/// - [`RedeemError::WeeklyCapExceeded`] if the window has no room left
pub fn request_redemption(
    conn: &Connection,
    telegram_id: TelegramId,
    contact: &PaymentContact,
    request_id: Option<&str>,
    policy: &RedeemPolicy,
    now: u64,
) -> Result<Redemption> {
    let amount = policy.min_redemption;

    quizzy_db::immediate_tx(conn, |tx| {
        if let Some(request_id) = request_id {
            if let Some(existing) = redemptions::find_by_request_id(tx, request_id)? {
                tracing::debug!(telegram_id, request_id, "redemption request replayed");
                return Ok(existing);
            }
        }

        users::reset_redeem_window(tx, telegram_id, now, policy.reset_period_secs)?;

        if !users::apply_redemption(tx, telegram_id, amount, policy.weekly_cap, now)? {
            let profile = users::find(tx, telegram_id)?
                .ok_or(RedeemError::UserNotFound { telegram_id })?;
            if profile.virtual_stars < amount {
                return Err(RedeemError::BelowMinimum {
                    balance: profile.virtual_stars,
                    minimum: amount,
                });
            }
            return Err(RedeemError::WeeklyCapExceeded {
                redeemed_this_week: profile.redeemed_this_week,
                cap: policy.weekly_cap,
            });
        }

        transactions::record(
            tx,
            telegram_id,
            -(amount as i64),
            kind::REDEEM,
            &format!("Redeemed {amount} stars"),
            now,
        )?;

        let redemption_id = new_redemption_id();
        redemptions::insert(
            tx,
            &redemption_id,
            telegram_id,
            amount,
            Some(&contact.name),
            Some(&contact.email),
            request_id,
            now,
        )?;

        tracing::info!(
            telegram_id,
            amount,
            redemption_id = redemption_id.as_str(),
            "redemption requested"
        );
        Ok(redemptions::get(tx, &redemption_id)?)
    })
}

/// Generate a random 32-hex-char redemption id.
fn new_redemption_id() -> RedemptionId {
    let mut bytes = [0u8; 16];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut bytes);
    hex::encode(bytes)
}
