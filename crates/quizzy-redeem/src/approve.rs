//! Administrative approval of pending redemptions.

use rusqlite::Connection;

use quizzy_db::queries::redemptions;
use quizzy_types::redeem::Redemption;

use crate::Result;

/// Transition a pending redemption to `sent`, stamping `sent_at`.
///
/// Returns whether a transition happened. An unknown id or an
/// already-sent redemption is a no-op returning `false`, so an admin
/// double-click cannot pay out twice or raise a spurious error.
pub fn approve_redemption(conn: &Connection, redemption_id: &str, now: u64) -> Result<bool> {
    let sent = redemptions::mark_sent(conn, redemption_id, now)?;
    if sent {
        tracing::info!(redemption_id, "redemption approved");
    }
    Ok(sent)
}

/// The approval queue: every pending redemption, oldest first.
pub fn pending_redemptions(conn: &Connection) -> Result<Vec<Redemption>> {
    Ok(redemptions::list_pending(conn)?)
}
