//! Explicit time source.
//!
//! Every operation that compares against "now" (expiry checks, today's-deal
//! boundary, keupoint availability) reads the clock through this seam so
//! tests can pin time instead of racing the host clock.

use chrono::{DateTime, TimeZone, Utc};

/// Capability for reading the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time as seconds since epoch.
    fn now_epoch(&self) -> i64 {
        self.now().timestamp()
    }
}

/// Production clock backed by the host.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a fixed instant, for tests.
#[derive(Debug, Clone)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at_epoch(secs: i64) -> Self {
        Self(Utc.timestamp_opt(secs, 0).single().unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Epoch second of the start of the day containing `now` (00:00:00 UTC).
pub fn day_start_epoch(now: DateTime<Utc>) -> i64 {
    let secs = now.timestamp();
    secs - secs.rem_euclid(86_400)
}

/// Parses an epoch-seconds timestamp stored as a string by the legacy
/// schedule schema. Unparseable values collapse to 0 rather than erroring,
/// matching how the reports treat them.
pub fn parse_epoch(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}
