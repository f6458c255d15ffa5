//! Core API budget guard.
//!
//! Draining a large account issues many page requests back to back. Before
//! each one the remaining core budget is read, and when it is nearly spent
//! the request sleeps until the window resets.

use octocrab::Octocrab;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Longest sleep before giving the request a try anyway.
const MAX_SLEEP: Duration = Duration::from_secs(60 * 60);

/// Requests kept in reserve; below this the guard sleeps.
const RESERVE: u32 = 5;

/// Snapshot of the core rate-limit bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreBudget {
    pub remaining: u32,
    pub limit: u32,
    /// Unix time the window resets at.
    pub resets_at: u64,
}

impl CoreBudget {
    /// Reads the bucket from the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the rate-limit endpoint fails.
    pub async fn fetch(octocrab: &Octocrab) -> Result<Self, octocrab::Error> {
        let core = octocrab.ratelimit().get().await?.resources.core;
        Ok(Self {
            remaining: u32::try_from(core.remaining).unwrap_or(u32::MAX),
            limit: u32::try_from(core.limit).unwrap_or(u32::MAX),
            resets_at: core.reset,
        })
    }

    /// How long to sleep at `now` before the next request, if at all.
    #[must_use]
    pub fn sleep_needed(&self, now: u64) -> Option<Duration> {
        if self.remaining >= RESERVE || self.resets_at <= now {
            return None;
        }

        let until_reset = Duration::from_secs(self.resets_at - now);
        if until_reset > MAX_SLEEP {
            warn!(
                until_reset_secs = until_reset.as_secs(),
                "Rate limit resets later than the longest sleep, sleeping for the maximum"
            );
        }
        Some(until_reset.min(MAX_SLEEP))
    }
}

/// Sleeps until the core bucket resets when fewer than five requests remain.
///
/// # Errors
///
/// Returns an error if the budget cannot be read.
pub async fn ensure_core_rate_limit(octocrab: &Octocrab) -> Result<(), octocrab::Error> {
    let budget = CoreBudget::fetch(octocrab).await?;
    if let Some(sleep) = budget.sleep_needed(unix_now()) {
        info!(
            remaining = budget.remaining,
            limit = budget.limit,
            sleep_secs = sleep.as_secs(),
            "Core rate limit nearly spent, pausing listing"
        );
        tokio::time::sleep(sleep).await;
    }
    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
