use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::core::config::RateLimitConfig;
use crate::core::error::{AppError, Result};
use crate::shared::constants::RATE_LIMIT_MESSAGE;

struct FixedWindow {
    started_at: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client identity (network address).
///
/// Counters live in process memory; restarting the service resets them,
/// which is acceptable for burst protection. Checks never block on I/O and
/// never retry: a refused caller gets the cool-down message and decides
/// what to do with it.
pub struct RateLimitService {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, FixedWindow>>,
}

impl RateLimitService {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: config.window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Record a hit for `identity` and report whether it is still within
    /// its budget for the current window
    pub fn check(&self, identity: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        // Drop windows that rolled over so the map does not grow unbounded
        windows.retain(|_, w| now.duration_since(w.started_at) < self.window);

        let window = windows.entry(identity.to_string()).or_insert(FixedWindow {
            started_at: now,
            count: 0,
        });

        if window.count >= self.max_requests {
            return false;
        }

        window.count += 1;
        true
    }

    /// `check`, mapped onto the error callers surface to the client
    pub fn enforce(&self, identity: &str) -> Result<()> {
        if self.check(identity) {
            Ok(())
        } else {
            tracing::warn!("Rate limit hit for {}", identity);
            Err(AppError::RateLimitExceeded(RATE_LIMIT_MESSAGE.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_requests: u32, window: Duration) -> RateLimitService {
        RateLimitService::new(&RateLimitConfig {
            max_requests,
            window,
        })
    }

    #[test]
    fn allows_up_to_the_budget_then_refuses() {
        let limiter = limiter(2, Duration::from_secs(60));

        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
    }

    #[test]
    fn identities_are_counted_independently() {
        let limiter = limiter(1, Duration::from_secs(60));

        assert!(limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.2"));
        assert!(!limiter.check("10.0.0.1"));
    }

    #[test]
    fn budget_returns_after_the_window_rolls_over() {
        let limiter = limiter(1, Duration::from_millis(30));

        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));

        std::thread::sleep(Duration::from_millis(50));
        assert!(limiter.check("10.0.0.1"));
    }

    #[test]
    fn enforce_maps_refusal_to_rate_limited_error() {
        let limiter = limiter(1, Duration::from_secs(60));

        tokio_test::assert_ok!(limiter.enforce("10.0.0.1"));
        assert!(matches!(
            limiter.enforce("10.0.0.1"),
            Err(AppError::RateLimitExceeded(_))
        ));
    }
}
