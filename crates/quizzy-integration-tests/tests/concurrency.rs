//! Integration test: concurrent writers against one store.
//!
//! Every balance mutation runs as a conditional update inside a
//! `BEGIN IMMEDIATE` transaction, so racing writers serialize instead of
//! losing increments or double-spending. Each scenario hammers a single
//! on-disk database from many blocking tasks, each holding its own
//! connection:
//!
//! 1. 100 parallel one-star credits land exactly 100 stars
//! 2. 20 parallel debits against a 50-star balance apply exactly 5 times
//! 3. 10 parallel survey-reward claims pay the first-completion bonus once
//! 4. Two parallel redemptions cannot jointly overshoot the weekly cap
//!
//! This test uses quizzy-ledger and quizzy-redeem over a shared
//! quizzy-db file.

use std::path::PathBuf;

use quizzy_db::queries::users;
use quizzy_ledger::{account, audit, balance, rewards, LedgerError};
use quizzy_redeem::policy::RedeemPolicy;
use quizzy_redeem::{approve, request, RedeemError};
use quizzy_types::ledger::kind;
use quizzy_types::redeem::PaymentContact;

/// Base timestamp for test scenarios.
const BASE_TIME: u64 = 1_700_000_000;

/// Create a store on disk with user 42 registered, before any task spawns.
///
/// Migrations run once here; workers that open the same file later find the
/// schema current and skip straight to their writes.
fn seeded_store() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Creating a temp dir should succeed");
    let path = dir.path().join("quizzy.db");
    let conn = quizzy_db::open(&path).expect("Opening the store should succeed");
    account::get_or_create_user(&conn, 42, None, None, BASE_TIME)
        .expect("Seed user should register");
    (dir, path)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn parallel_credits_all_land() {
    let (_dir, path) = seeded_store();

    let mut handles = Vec::new();
    for _ in 0..100 {
        let path = path.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let conn = quizzy_db::open(&path)?;
            balance::credit(&conn, 42, 1, kind::SURVEY_REWARD, "Completed survey", BASE_TIME)
        }));
    }
    for handle in handles {
        let new_balance = handle
            .await
            .expect("Worker should finish")
            .expect("Credit should succeed");
        assert!(new_balance >= 1);
    }

    let conn = quizzy_db::open(&path).expect("Reopening the store should succeed");
    assert_eq!(users::balance(&conn, 42).expect("Balance"), 100);

    let report = audit::reconcile(&conn, 42).expect("Reconciliation should succeed");
    assert_eq!(report.applied_sum, 100);
    assert!(report.is_consistent());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn contended_debits_never_overdraw() {
    let (_dir, path) = seeded_store();
    {
        let conn = quizzy_db::open(&path).expect("Opening the store should succeed");
        balance::credit(&conn, 42, 50, kind::SURVEY_REWARD, "Completed survey", BASE_TIME)
            .expect("Seed credit should succeed");
    }

    let mut handles = Vec::new();
    for _ in 0..20 {
        let path = path.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let conn = quizzy_db::open(&path)?;
            balance::debit(
                &conn,
                42,
                10,
                kind::SKIP_WAIT,
                "Spent 10 stars to skip_wait",
                BASE_TIME + 1,
            )
        }));
    }

    let mut applied = 0;
    for handle in handles {
        match handle.await.expect("Worker should finish") {
            Ok(_) => applied += 1,
            Err(e) => assert!(
                matches!(e, LedgerError::InsufficientBalance { .. }),
                "unexpected failure: {e}"
            ),
        }
    }
    assert_eq!(applied, 5, "exactly five 10-star debits fit in 50 stars");

    let conn = quizzy_db::open(&path).expect("Reopening the store should succeed");
    assert_eq!(users::balance(&conn, 42).expect("Balance"), 0);
    assert!(audit::reconcile(&conn, 42)
        .expect("Reconciliation should succeed")
        .is_consistent());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn first_survey_bonus_pays_once_under_contention() {
    let (_dir, path) = seeded_store();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let path = path.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let conn = quizzy_db::open(&path)?;
            rewards::grant_survey_reward(&conn, 42, BASE_TIME)
        }));
    }

    let mut amounts = Vec::new();
    for handle in handles {
        amounts.push(
            handle
                .await
                .expect("Worker should finish")
                .expect("Reward grant should succeed"),
        );
    }
    assert_eq!(amounts.iter().filter(|&&a| a == 50).count(), 1);
    assert_eq!(amounts.iter().filter(|&&a| a == 20).count(), 9);

    let conn = quizzy_db::open(&path).expect("Reopening the store should succeed");
    assert_eq!(users::balance(&conn, 42).expect("Balance"), 230);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn racing_redemptions_respect_weekly_cap() {
    let (_dir, path) = seeded_store();
    {
        let conn = quizzy_db::open(&path).expect("Opening the store should succeed");
        balance::credit(&conn, 42, 4_000, kind::SURVEY_REWARD, "Completed survey", BASE_TIME)
            .expect("Seed credit should succeed");
    }

    let mut handles = Vec::new();
    for _ in 0..2 {
        let path = path.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let conn = quizzy_db::open(&path)?;
            let contact = PaymentContact {
                name: "Lena".to_string(),
                email: "lena@example.com".to_string(),
            };
            request::request_redemption(
                &conn,
                42,
                &contact,
                None,
                &RedeemPolicy::default(),
                BASE_TIME + 10,
            )
        }));
    }

    let mut granted = 0;
    for handle in handles {
        match handle.await.expect("Worker should finish") {
            Ok(redemption) => {
                assert_eq!(redemption.amount, 2_000);
                granted += 1;
            }
            Err(e) => assert!(
                matches!(
                    e,
                    RedeemError::WeeklyCapExceeded {
                        redeemed_this_week: 2_000,
                        cap: 2_000
                    }
                ),
                "unexpected failure: {e}"
            ),
        }
    }
    assert_eq!(granted, 1, "the weekly cap admits one 2000-star redemption");

    let conn = quizzy_db::open(&path).expect("Reopening the store should succeed");
    let profile = users::get(&conn, 42).expect("Profile should load");
    assert_eq!(profile.virtual_stars, 2_000);
    assert_eq!(profile.redeemed_this_week, 2_000);
    assert_eq!(
        approve::pending_redemptions(&conn)
            .expect("Queue should load")
            .len(),
        1
    );
}
