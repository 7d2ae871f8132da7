//! Integration test: the redemption lifecycle.
//!
//! Walks the full path a payout takes:
//! 1. A user earns past the minimum and files a redemption request
//! 2. The request debits the balance and joins the pending queue
//! 3. An administrator signs in, reviews the queue, and approves
//! 4. The request flips to `sent` exactly once
//!
//! Also covers the rolling weekly window (strict-inequality reset), the
//! client retry path via `request_id`, and the admin token store.
//!
//! This test uses quizzy-redeem and quizzy-ledger over a quizzy-db store.

use quizzy_db::queries::{redemptions, users};
use quizzy_ledger::{account, audit, balance};
use quizzy_redeem::policy::RedeemPolicy;
use quizzy_redeem::{admin, approve, request, RedeemError};
use quizzy_types::ledger::kind;
use quizzy_types::redeem::{PaymentContact, RedemptionStatus};

/// Base timestamp for test scenarios.
const BASE_TIME: u64 = 1_700_000_000;

fn store_with_balance(stars: u64) -> rusqlite::Connection {
    let conn = quizzy_db::open_memory().expect("Opening the in-memory store should succeed");
    account::get_or_create_user(&conn, 42, Some("Lena"), None, BASE_TIME)
        .expect("Seed user should register");
    if stars > 0 {
        balance::credit(&conn, 42, stars, kind::SURVEY_REWARD, "Completed survey", BASE_TIME)
            .expect("Seed credit should succeed");
    }
    conn
}

fn contact() -> PaymentContact {
    PaymentContact {
        name: "Lena".to_string(),
        email: "lena@example.com".to_string(),
    }
}

#[test]
fn redemption_walks_pending_to_sent() {
    let conn = store_with_balance(2_000);
    let policy = RedeemPolicy::default();

    // 1. The user files a request; the stars move out immediately.
    let redemption = request::request_redemption(&conn, 42, &contact(), None, &policy, BASE_TIME + 10)
        .expect("Request should succeed");
    assert_eq!(redemption.amount, 2_000);
    assert_eq!(redemption.status, RedemptionStatus::Pending);
    assert_eq!(redemption.payment_name.as_deref(), Some("Lena"));
    assert_eq!(redemption.sent_at, None);

    let profile = users::get(&conn, 42).expect("Profile should load");
    assert_eq!(profile.virtual_stars, 0);
    assert_eq!(profile.redeemed_this_week, 2_000);
    assert_eq!(profile.real_stars_redeemed, 2_000);

    // The debit is on the ledger and the books still balance.
    let entries = audit::recent(&conn, 42, 1).expect("History should load");
    assert_eq!(entries[0].kind, "redeem_stars");
    assert_eq!(entries[0].amount, -2_000);
    assert!(audit::reconcile(&conn, 42)
        .expect("Reconciliation should succeed")
        .is_consistent());

    // 2. The request sits in the approval queue.
    let queue = approve::pending_redemptions(&conn).expect("Queue should load");
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].redemption_id, redemption.redemption_id);

    // 3. Approval flips it to sent and drains the queue.
    assert!(approve::approve_redemption(&conn, &redemption.redemption_id, BASE_TIME + 60)
        .expect("Approval should succeed"));
    let sent = redemptions::get(&conn, &redemption.redemption_id).expect("Lookup should succeed");
    assert_eq!(sent.status, RedemptionStatus::Sent);
    assert_eq!(sent.sent_at, Some(BASE_TIME + 60));
    assert!(approve::pending_redemptions(&conn)
        .expect("Queue should load")
        .is_empty());

    // 4. A second approval is a no-op and keeps the original timestamp.
    assert!(!approve::approve_redemption(&conn, &redemption.redemption_id, BASE_TIME + 120)
        .expect("Repeat approval should succeed"));
    let unchanged = redemptions::get(&conn, &redemption.redemption_id).expect("Lookup");
    assert_eq!(unchanged.sent_at, Some(BASE_TIME + 60));
}

#[test]
fn weekly_window_reopens_strictly_after_period() {
    let conn = store_with_balance(1_500);
    let policy = RedeemPolicy {
        min_redemption: 500,
        weekly_cap: 500,
        reset_period_secs: 3_600,
    };

    // First redemption fills the window.
    request::request_redemption(&conn, 42, &contact(), None, &policy, BASE_TIME + 100)
        .expect("First request should succeed");
    assert!(matches!(
        request::request_redemption(&conn, 42, &contact(), None, &policy, BASE_TIME + 200),
        Err(RedeemError::WeeklyCapExceeded {
            redeemed_this_week: 500,
            cap: 500
        })
    ));

    // Registration stamped the window at BASE_TIME; it reopens only once
    // `now` is strictly past BASE_TIME + period.
    assert!(matches!(
        request::request_redemption(&conn, 42, &contact(), None, &policy, BASE_TIME + 3_600),
        Err(RedeemError::WeeklyCapExceeded { .. })
    ));
    let reopened =
        request::request_redemption(&conn, 42, &contact(), None, &policy, BASE_TIME + 3_601)
            .expect("Request after the window should succeed");
    assert_eq!(reopened.amount, 500);

    let profile = users::get(&conn, 42).expect("Profile should load");
    assert_eq!(profile.virtual_stars, 500);
    assert_eq!(profile.redeemed_this_week, 500);
    assert_eq!(profile.last_redeem_reset, BASE_TIME + 3_601);
}

#[test]
fn request_id_retry_returns_the_original() {
    let conn = store_with_balance(4_000);
    let policy = RedeemPolicy::default();

    let first =
        request::request_redemption(&conn, 42, &contact(), Some("req-abc"), &policy, BASE_TIME + 10)
            .expect("Request should succeed");

    // The client times out and resends. Same record back, no second debit.
    let replay =
        request::request_redemption(&conn, 42, &contact(), Some("req-abc"), &policy, BASE_TIME + 90)
            .expect("Replay should succeed");
    assert_eq!(replay.redemption_id, first.redemption_id);
    assert_eq!(replay.requested_at, first.requested_at);

    assert_eq!(users::balance(&conn, 42).expect("Balance"), 2_000);
    assert_eq!(
        approve::pending_redemptions(&conn)
            .expect("Queue should load")
            .len(),
        1
    );

    let entries = audit::recent(&conn, 42, 10).expect("History should load");
    let debits = entries.iter().filter(|t| t.kind == "redeem_stars").count();
    assert_eq!(debits, 1, "the replay must not write a second ledger entry");
}

#[test]
fn admin_tokens_gate_the_console() {
    let conn = store_with_balance(2_000);
    let redemption =
        request::request_redemption(&conn, 42, &contact(), None, &RedeemPolicy::default(), BASE_TIME)
            .expect("Request should succeed");

    // Sign in, check the queue, approve.
    let token = admin::issue_session(&conn, admin::DEFAULT_SESSION_TTL_SECS, BASE_TIME)
        .expect("Issuing a session should succeed");
    assert!(admin::validate_session(&conn, &token, BASE_TIME + 60).expect("Validation"));
    assert!(approve::approve_redemption(&conn, &redemption.redemption_id, BASE_TIME + 60)
        .expect("Approval should succeed"));

    // The token dies at its expiry instant and on sign-out.
    assert!(
        !admin::validate_session(&conn, &token, BASE_TIME + admin::DEFAULT_SESSION_TTL_SECS)
            .expect("Validation")
    );
    assert!(admin::revoke_session(&conn, &token).expect("Revocation"));
    assert!(!admin::validate_session(&conn, &token, BASE_TIME + 60).expect("Validation"));

    // Sweeping removes only tokens past their expiry.
    let stale = admin::issue_session(&conn, 60, BASE_TIME).expect("Issue");
    let live = admin::issue_session(&conn, 600, BASE_TIME).expect("Issue");
    assert_eq!(
        admin::purge_expired(&conn, BASE_TIME + 120).expect("Purge should succeed"),
        1
    );
    assert!(!admin::validate_session(&conn, &stale, BASE_TIME + 30).expect("Validation"));
    assert!(admin::validate_session(&conn, &live, BASE_TIME + 30).expect("Validation"));
}
