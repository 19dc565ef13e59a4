/// How long an unsubmitted draft survives in the cache.
/// Every save resets the clock.
pub const DRAFT_TTL_SECS: u64 = 24 * 3600;

/// Cool-down message shown when the rate limiter refuses an action
pub const RATE_LIMIT_MESSAGE: &str =
    "Too many requests from your device. Please wait a minute before trying again.";
