//! Rates, rate/interval conversion and the token bucket
//!
//! A [`Limit`] is a rate in events per second. [`Limit::INF`] means
//! "unlimited"; a limit of zero (or any non-positive rate) means "never".

use std::fmt;
use std::time::{Duration, Instant};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Events per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Limit(f64);

impl Limit {
    /// No limit at all: every event is allowed
    pub const INF: Limit = Limit(f64::INFINITY);

    /// Never allows an event
    pub const ZERO: Limit = Limit(0.0);

    pub const fn per_second(events: f64) -> Self {
        Limit(events)
    }

    /// One event per `interval`. A zero interval means unlimited.
    pub fn every(interval: Duration) -> Self {
        if interval.is_zero() {
            return Limit::INF;
        }
        Limit(1.0 / interval.as_secs_f64())
    }

    pub fn as_f64(&self) -> f64 {
        self.0
    }

    pub fn is_unlimited(&self) -> bool {
        self.0 == f64::INFINITY
    }

    /// False for zero, negative and NaN rates
    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }

    /// Minimum spacing between events, see [`limit_to_duration`]
    pub fn interval(&self) -> Duration {
        limit_to_duration(*self)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unlimited() {
            write!(f, "unlimited")
        } else {
            write!(f, "{}/s", self.0)
        }
    }
}

/// Convert a rate to the minimum interval between permitted events.
///
/// Total over every `f64`: unlimited, zero, negative and NaN rates all map to
/// `Duration::ZERO`; rates too small to represent saturate at `Duration::MAX`.
/// The interval is rounded to the nearest nanosecond so that
/// `limit_to_duration(Limit::every(d)) == d` for whole-nanosecond `d`.
pub fn limit_to_duration(limit: Limit) -> Duration {
    let rate = limit.0;
    if rate.is_nan() || rate <= 0.0 || rate.is_infinite() {
        return Duration::ZERO;
    }

    let nanos = (NANOS_PER_SEC / rate).round();
    if nanos >= u64::MAX as f64 {
        return Duration::MAX;
    }
    Duration::from_nanos(nanos as u64)
}

/// Continuous-refill token bucket.
///
/// Starts full. Each allowed event takes one token; tokens come back at
/// `limit` per second up to `burst`. A non-positive limit denies everything.
/// Not synchronized: callers wrap it in a lock.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    limit: Limit,
    burst: u32,
    tokens: f64,
    last: Instant,
}

impl TokenBucket {
    pub fn new(limit: Limit, burst: u32, now: Instant) -> Self {
        Self {
            limit,
            burst,
            tokens: f64::from(burst),
            last: now,
        }
    }

    pub fn limit(&self) -> Limit {
        self.limit
    }

    pub fn burst(&self) -> u32 {
        self.burst
    }

    /// Tokens available at `now`, without consuming any
    pub fn tokens_at(&self, now: Instant) -> f64 {
        self.refilled(now)
    }

    /// Take a token if one is available at `now`
    pub fn allow_at(&mut self, now: Instant) -> bool {
        if self.limit.is_unlimited() {
            return true;
        }
        if !self.limit.is_positive() {
            return false;
        }

        self.tokens = self.refilled(now);
        if now > self.last {
            self.last = now;
        }

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn refilled(&self, now: Instant) -> f64 {
        if !self.limit.is_positive() {
            return 0.0;
        }

        let elapsed = now.saturating_duration_since(self.last).as_secs_f64();
        (self.tokens + elapsed * self.limit.0).min(f64::from(self.burst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_to_duration_known_values() {
        let cases = [
            (Limit::every(Duration::from_secs(1)), Duration::from_secs(1)),
            (Limit::every(Duration::ZERO), Duration::ZERO),
            (Limit::every(Duration::from_secs(3600)), Duration::from_secs(3600)),
            (Limit::every(Duration::from_millis(1)), Duration::from_millis(1)),
        ];
        for (limit, expected) in cases {
            assert_eq!(limit_to_duration(limit), expected, "limit {}", limit);
        }
    }

    #[test]
    fn test_limit_to_duration_degenerate_rates() {
        assert_eq!(limit_to_duration(Limit::INF), Duration::ZERO);
        assert_eq!(limit_to_duration(Limit::ZERO), Duration::ZERO);
        assert_eq!(limit_to_duration(Limit::per_second(-3.0)), Duration::ZERO);
        assert_eq!(limit_to_duration(Limit::per_second(f64::NAN)), Duration::ZERO);
        assert_eq!(
            limit_to_duration(Limit::per_second(f64::MIN_POSITIVE)),
            Duration::MAX
        );
    }

    #[test]
    fn test_per_second_interval() {
        assert_eq!(Limit::per_second(4.0).interval(), Duration::from_millis(250));
        assert_eq!(Limit::per_second(1000.0).interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_bucket_burst_then_refill() {
        let start = Instant::now();
        let mut bucket = TokenBucket::new(Limit::per_second(2.0), 3, start);

        assert!(bucket.allow_at(start));
        assert!(bucket.allow_at(start));
        assert!(bucket.allow_at(start));
        assert!(!bucket.allow_at(start));

        // Half a second buys exactly one token at 2/s
        let later = start + Duration::from_millis(500);
        assert!(bucket.allow_at(later));
        assert!(!bucket.allow_at(later));
    }

    #[test]
    fn test_bucket_caps_at_burst() {
        let start = Instant::now();
        let mut bucket = TokenBucket::new(Limit::per_second(100.0), 2, start);
        assert!(bucket.allow_at(start));
        assert!(bucket.allow_at(start));

        let much_later = start + Duration::from_secs(60);
        assert_eq!(bucket.tokens_at(much_later), 2.0);
        assert!(bucket.allow_at(much_later));
        assert!(bucket.allow_at(much_later));
        assert!(!bucket.allow_at(much_later));
    }

    #[test]
    fn test_unlimited_bucket_always_allows() {
        let now = Instant::now();
        let mut bucket = TokenBucket::new(Limit::INF, 0, now);
        for _ in 0..1000 {
            assert!(bucket.allow_at(now));
        }
    }

    #[test]
    fn test_zero_rate_never_allows() {
        let start = Instant::now();
        let mut bucket = TokenBucket::new(Limit::ZERO, 5, start);
        assert!(!bucket.allow_at(start));
        assert!(!bucket.allow_at(start + Duration::from_secs(3600)));
        assert_eq!(bucket.tokens_at(start), 0.0);

        let mut negative = TokenBucket::new(Limit::per_second(-1.0), 5, start);
        assert!(!negative.allow_at(start));
    }

    #[test]
    fn test_time_going_backwards_does_not_refill() {
        let start = Instant::now() + Duration::from_secs(10);
        let mut bucket = TokenBucket::new(Limit::per_second(1.0), 1, start);
        assert!(bucket.allow_at(start));
        assert!(!bucket.allow_at(start - Duration::from_secs(5)));
    }
}
