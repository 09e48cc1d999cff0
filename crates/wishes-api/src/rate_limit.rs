use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Fixed-window submission quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Accepted submissions per source per window.
    pub limit: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            limit: 3,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    expires_at: Instant,
}

/// Per-source fixed-window counter, kept in process memory.
///
/// State is not shared between server instances, so the quota is advisory.
/// Expiry is checked on every access; [`run_sweep_loop`] only reclaims memory.
pub struct RateLimiter {
    policy: RateLimitPolicy,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count one submission from `source`. Returns `false` when the source
    /// is over quota; rejected attempts are not counted.
    pub fn check(&self, source: &str) -> bool {
        self.check_at(source, Instant::now())
    }

    pub fn check_at(&self, source: &str, now: Instant) -> bool {
        let mut windows = self.lock();

        if let Some(window) = windows.get_mut(source) {
            if now <= window.expires_at {
                if window.count >= self.policy.limit {
                    return false;
                }
                window.count += 1;
                return true;
            }
        }

        // First submission, or the previous window is over
        windows.insert(
            source.to_string(),
            Window {
                count: 1,
                expires_at: now + self.policy.window,
            },
        );
        true
    }

    /// Drop windows that ended before `now`. Returns how many were removed.
    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut windows = self.lock();
        let before = windows.len();
        windows.retain(|_, window| now <= window.expires_at);
        before - windows.len()
    }

    /// Number of sources currently tracked.
    pub fn tracked_sources(&self) -> usize {
        self.lock().len()
    }

    /// Forget every source. Called on shutdown.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Window>> {
        // A panic mid-update leaves at worst one stale counter
        self.windows.lock().unwrap_or_else(|poisoned| {
            warn!("rate limiter lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

/// Background task that prunes expired windows until `shutdown` fires.
pub async fn run_sweep_loop(limiter: Arc<RateLimiter>, every: Duration, shutdown: CancellationToken) {
    let mut interval = tokio::time::interval(every);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => {
                let removed = limiter.purge_expired_at(Instant::now());
                if removed > 0 {
                    debug!("Rate limiter sweep: pruned {} expired sources", removed);
                }
            }
        }
    }

    limiter.clear();
    info!("Rate limiter sweep stopped");
}
