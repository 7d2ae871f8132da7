//! SQL schema definitions.

/// Complete schema for the Quizzy v1 database.
pub const SCHEMA_V1: &str = r#"
-- ============================================================
-- Users & Referrals
-- ============================================================

CREATE TABLE IF NOT EXISTS users (
    telegram_id INTEGER PRIMARY KEY,
    display_name TEXT NOT NULL DEFAULT 'Anonymous',
    virtual_stars INTEGER NOT NULL DEFAULT 0 CHECK (virtual_stars >= 0),
    real_stars_redeemed INTEGER NOT NULL DEFAULT 0,
    surveys_completed INTEGER NOT NULL DEFAULT 0,
    first_survey_completed INTEGER NOT NULL DEFAULT 0,
    referred_by INTEGER,
    redeemed_this_week INTEGER NOT NULL DEFAULT 0 CHECK (redeemed_this_week >= 0),
    last_redeem_reset INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    last_active INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_referrer ON users(referred_by) WHERE referred_by IS NOT NULL;

-- ============================================================
-- Survey Sessions
-- ============================================================

CREATE TABLE IF NOT EXISTS survey_sessions (
    session_id TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL,
    started_at INTEGER NOT NULL,
    current_step INTEGER NOT NULL DEFAULT 1,
    answers TEXT NOT NULL DEFAULT '{}',
    completed_at INTEGER
);

CREATE INDEX IF NOT EXISTS idx_sessions_user ON survey_sessions(user_id, started_at);

-- ============================================================
-- Star Transaction Ledger
-- ============================================================

CREATE TABLE IF NOT EXISTS star_transactions (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(telegram_id),
    amount INTEGER NOT NULL,
    kind TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tx_user ON star_transactions(user_id, created_at);

-- One channel reward per user, enforced at the store level.
CREATE UNIQUE INDEX IF NOT EXISTS idx_tx_channel_reward_once
    ON star_transactions(user_id) WHERE kind = 'channel_reward';

-- ============================================================
-- Redemptions
-- ============================================================

CREATE TABLE IF NOT EXISTS redemptions (
    redemption_id TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(telegram_id),
    amount INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    payment_name TEXT,
    payment_email TEXT,
    request_id TEXT UNIQUE,
    requested_at INTEGER NOT NULL,
    sent_at INTEGER
);

CREATE INDEX IF NOT EXISTS idx_redemptions_user ON redemptions(user_id);
CREATE INDEX IF NOT EXISTS idx_redemptions_pending ON redemptions(requested_at) WHERE status = 'pending';

-- ============================================================
-- Survey Catalog
-- ============================================================

CREATE TABLE IF NOT EXISTS surveys (
    survey_id INTEGER PRIMARY KEY,
    question TEXT NOT NULL,
    options TEXT NOT NULL,
    position INTEGER NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_surveys_active ON surveys(position) WHERE is_active = 1;

-- ============================================================
-- Admin Sessions
-- ============================================================

CREATE TABLE IF NOT EXISTS admin_sessions (
    token TEXT PRIMARY KEY,
    created_at INTEGER NOT NULL,
    expires_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_admin_sessions_expiry ON admin_sessions(expires_at);
"#;
