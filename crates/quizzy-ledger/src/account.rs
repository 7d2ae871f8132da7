//! Account lookup and lazy registration.

use rusqlite::Connection;

use quizzy_db::queries::users;
use quizzy_types::{account::UserProfile, TelegramId};

use crate::Result;

/// Look up a profile, registering the account on first contact.
///
/// A fresh account starts with a zero balance, no completed surveys, and a
/// redemption window opening at `now`. An existing account keeps its
/// stored name and referrer and only gets `last_active` stamped. The
/// returned profile carries the derived `friends_referred` count.
pub fn get_or_create_user(
    conn: &Connection,
    telegram_id: TelegramId,
    display_name: Option<&str>,
    referred_by: Option<TelegramId>,
    now: u64,
) -> Result<UserProfile> {
    let profile = users::get_or_create(conn, telegram_id, display_name, referred_by, now)?;
    tracing::debug!(
        telegram_id,
        balance = profile.virtual_stars,
        "profile resolved"
    );
    Ok(profile)
}
