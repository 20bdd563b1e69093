//! Rate Limiting Infrastructure
//!
//! Cheap abuse throttling without extra infrastructure: fixed-window
//! counters with an optional lockout, held in process memory. The store
//! is a trait so a shared backend can be swapped in if the deployment
//! ever runs more than one instance; until then the in-process scope
//! (counters reset on restart) is an accepted trade-off.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum recorded attempts allowed in the window
    pub max_attempts: u32,
    /// Time window duration
    pub window: Duration,
    /// If set, exceeding the limit locks the key out for this long
    pub lockout: Option<Duration>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            window: Duration::from_secs(60),
            lockout: None,
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            lockout: None,
        }
    }

    pub fn with_lockout(mut self, lockout: Duration) -> Self {
        self.lockout = Some(lockout);
        self
    }

    /// Failed-login policy: 5 attempts, then a 15-minute lockout.
    pub fn login() -> Self {
        Self::new(5, Duration::from_secs(15 * 60)).with_lockout(Duration::from_secs(15 * 60))
    }

    /// Signup policy: 3 attempts per hour per client.
    pub fn signup() -> Self {
        Self::new(3, Duration::from_secs(3600))
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    /// How long until the key is usable again (when denied)
    pub retry_after: Option<Duration>,
}

impl RateLimitResult {
    fn allowed(remaining: u32) -> Self {
        Self {
            allowed: true,
            remaining,
            retry_after: None,
        }
    }

    fn denied(retry_after: Duration) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            retry_after: Some(retry_after),
        }
    }
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check whether the key is currently allowed to act
    async fn check(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult;

    /// Record an attempt against the key
    async fn record(&self, key: &str);

    /// Clear all state for the key (e.g. on successful login)
    async fn reset(&self, key: &str);
}

// ============================================================================
// In-process implementation
// ============================================================================

#[derive(Debug)]
struct Entry {
    count: u32,
    window_start: Instant,
    locked_until: Option<Instant>,
}

impl Entry {
    fn fresh(now: Instant) -> Self {
        Self {
            count: 0,
            window_start: now,
            locked_until: None,
        }
    }
}

/// Fixed-window in-memory rate limiter
///
/// One instance per throttled concern (login, signup, ...), shared via
/// `Arc`. State is process-local and resets on restart.
#[derive(Debug, Default)]
pub struct FixedWindowLimiter {
    entries: Mutex<HashMap<String, Entry>>,
}

impl FixedWindowLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_inner(&self, key: &str, config: &RateLimitConfig, now: Instant) -> RateLimitResult {
        let mut entries = self.entries.lock().expect("rate limit lock poisoned");
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::fresh(now));

        // Active lockout wins over everything else
        if let Some(locked_until) = entry.locked_until {
            if now < locked_until {
                return RateLimitResult::denied(locked_until - now);
            }
            // Lockout expired, start over
            *entry = Entry::fresh(now);
        }

        // Window rollover
        if now.duration_since(entry.window_start) > config.window {
            *entry = Entry::fresh(now);
        }

        if entry.count >= config.max_attempts {
            return match config.lockout {
                Some(lockout) => {
                    entry.locked_until = Some(now + lockout);
                    RateLimitResult::denied(lockout)
                }
                None => {
                    let window_ends = entry.window_start + config.window;
                    RateLimitResult::denied(window_ends.saturating_duration_since(now))
                }
            };
        }

        RateLimitResult::allowed(config.max_attempts - entry.count)
    }

    /// Drop stale entries to keep memory bounded
    ///
    /// Entries still under lockout are kept regardless of age.
    pub fn cleanup(&self, max_age: Duration) {
        self.cleanup_inner(max_age, Instant::now());
    }

    fn cleanup_inner(&self, max_age: Duration, now: Instant) {
        let mut entries = self.entries.lock().expect("rate limit lock poisoned");
        entries.retain(|_, entry| {
            if let Some(locked_until) = entry.locked_until {
                if now < locked_until {
                    return true;
                }
            }
            now.duration_since(entry.window_start) < max_age
        });
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.entries.lock().expect("rate limit lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RateLimitStore for FixedWindowLimiter {
    async fn check(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        self.check_inner(key, config, Instant::now())
    }

    async fn record(&self, key: &str) {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("rate limit lock poisoned");
        let entry = entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::fresh(now));
        entry.count += 1;
    }

    async fn reset(&self, key: &str) {
        let mut entries = self.entries.lock().expect("rate limit lock poisoned");
        entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedWindowLimiter, RateLimitConfig, RateLimitStore};
    use std::time::{Duration, Instant};

    fn config(max: u32, window_secs: u64) -> RateLimitConfig {
        RateLimitConfig::new(max, Duration::from_secs(window_secs))
    }

    #[tokio::test]
    async fn test_allows_under_limit() {
        let limiter = FixedWindowLimiter::new();
        let cfg = config(3, 60);

        for _ in 0..3 {
            let result = limiter.check("key", &cfg).await;
            assert!(result.allowed);
            limiter.record("key").await;
        }

        let result = limiter.check("key", &cfg).await;
        assert!(!result.allowed);
        assert!(result.retry_after.is_some());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = FixedWindowLimiter::new();
        let cfg = config(1, 60);

        limiter.record("a").await;
        assert!(!limiter.check("a", &cfg).await.allowed);
        assert!(limiter.check("b", &cfg).await.allowed);
    }

    #[tokio::test]
    async fn test_reset_clears_key() {
        let limiter = FixedWindowLimiter::new();
        let cfg = config(1, 60);

        limiter.record("key").await;
        assert!(!limiter.check("key", &cfg).await.allowed);

        limiter.reset("key").await;
        assert!(limiter.check("key", &cfg).await.allowed);
    }

    #[tokio::test]
    async fn test_lockout_applied_on_excess() {
        let limiter = FixedWindowLimiter::new();
        let cfg = config(1, 60).with_lockout(Duration::from_secs(900));

        limiter.record("key").await;
        let result = limiter.check("key", &cfg).await;
        assert!(!result.allowed);
        // Lockout duration is reported, not the window remainder
        assert!(result.retry_after.unwrap() > Duration::from_secs(800));
    }

    #[tokio::test]
    async fn test_window_rollover() {
        let limiter = FixedWindowLimiter::new();
        let cfg = RateLimitConfig::new(1, Duration::from_millis(20));

        limiter.record("key").await;
        assert!(!limiter.check("key", &cfg).await.allowed);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(limiter.check("key", &cfg).await.allowed);
    }

    #[test]
    fn test_cleanup_drops_stale_entries() {
        let limiter = FixedWindowLimiter::new();
        let cfg = config(3, 60);
        let t0 = Instant::now();

        // Entry ages are pinned, not measured, so load cannot skew them
        limiter.check_inner("old", &cfg, t0);
        limiter.check_inner("new", &cfg, t0 + Duration::from_secs(100));

        limiter.cleanup_inner(Duration::from_secs(50), t0 + Duration::from_secs(120));
        assert_eq!(limiter.len(), 1);

        let survivor = limiter.check_inner("new", &cfg, t0 + Duration::from_secs(120));
        assert!(survivor.allowed);
        assert_eq!(limiter.len(), 1);
    }

    #[test]
    fn test_cleanup_keeps_locked_entries() {
        let limiter = FixedWindowLimiter::new();
        let cfg = config(0, 60).with_lockout(Duration::from_secs(900));
        let t0 = Instant::now();

        // Zero allowance locks the key on first check
        assert!(!limiter.check_inner("locked", &cfg, t0).allowed);

        limiter.cleanup_inner(Duration::from_secs(50), t0 + Duration::from_secs(120));
        assert_eq!(limiter.len(), 1);
    }

    #[test]
    fn test_policy_presets() {
        let login = RateLimitConfig::login();
        assert_eq!(login.max_attempts, 5);
        assert!(login.lockout.is_some());

        let signup = RateLimitConfig::signup();
        assert_eq!(signup.max_attempts, 3);
        assert!(signup.lockout.is_none());
    }
}
