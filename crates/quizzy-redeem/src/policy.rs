//! Redemption policy configuration.
//!
//! Tier, cap, and window length are deployment settings, not code: the
//! defaults reproduce the production values (2000-star tier, 2000-star
//! weekly cap, 7-day window) and a TOML file can override any of them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use quizzy_types::DAY_SECS;

/// Redemption thresholds and the rolling window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedeemPolicy {
    /// Minimum stars per redemption; also the single fixed tier amount.
    #[serde(default = "default_min_redemption")]
    pub min_redemption: u64,
    /// Maximum stars redeemable inside one window.
    #[serde(default = "default_weekly_cap")]
    pub weekly_cap: u64,
    /// Window length in seconds.
    #[serde(default = "default_reset_period")]
    pub reset_period_secs: u64,
}

// Default value functions

fn default_min_redemption() -> u64 {
    2_000
}

fn default_weekly_cap() -> u64 {
    2_000
}

fn default_reset_period() -> u64 {
    7 * DAY_SECS
}

impl Default for RedeemPolicy {
    fn default() -> Self {
        Self {
            min_redemption: default_min_redemption(),
            weekly_cap: default_weekly_cap(),
            reset_period_secs: default_reset_period(),
        }
    }
}

impl RedeemPolicy {
    /// Load the policy from the config file location.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let policy: RedeemPolicy = toml::from_str(&content)?;
            tracing::info!(
                min_redemption = policy.min_redemption,
                weekly_cap = policy.weekly_cap,
                "redemption policy loaded"
            );
            Ok(policy)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        // Check env var override first
        if let Ok(dir) = std::env::var("QUIZZY_DATA_DIR") {
            return PathBuf::from(dir).join("redeem.toml");
        }
        PathBuf::from("redeem.toml")
    }
}
