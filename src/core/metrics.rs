//! Logger metrics for observability
//!
//! Counts what the gates did with each statement. Suppression is silent to
//! the logging caller; these counters are the only place it shows up.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use rust_vlog_system::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_emitted();
/// metrics.record_rate_limited();
///
/// assert_eq!(metrics.emitted(), 1);
/// assert_eq!(metrics.rate_limited(), 1);
/// assert_eq!(metrics.suppression_rate(), 50.0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Lines handed to the output sink
    emitted: AtomicU64,

    /// V-gated statements above their call site's verbosity
    suppressed_by_verbosity: AtomicU64,

    /// Statements below the severity threshold
    suppressed_by_severity: AtomicU64,

    /// Statements dropped because their call site had no token
    rate_limited: AtomicU64,

    /// Lines the output sink failed to accept
    write_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            emitted: AtomicU64::new(0),
            suppressed_by_verbosity: AtomicU64::new(0),
            suppressed_by_severity: AtomicU64::new(0),
            rate_limited: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed_by_verbosity(&self) -> u64 {
        self.suppressed_by_verbosity.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed_by_severity(&self) -> u64 {
        self.suppressed_by_severity.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rate_limited(&self) -> u64 {
        self.rate_limited.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed_by_verbosity(&self) -> u64 {
        self.suppressed_by_verbosity.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed_by_severity(&self) -> u64 {
        self.suppressed_by_severity.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rate_limited(&self) -> u64 {
        self.rate_limited.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of statements that were suppressed or rate limited (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been logged yet.
    pub fn suppression_rate(&self) -> f64 {
        let dropped =
            self.suppressed_by_verbosity() + self.suppressed_by_severity() + self.rate_limited();
        let total = dropped + self.emitted();
        if total == 0 {
            0.0
        } else {
            (dropped as f64 / total as f64) * 100.0
        }
    }

    pub fn reset(&self) {
        self.emitted.store(0, Ordering::Relaxed);
        self.suppressed_by_verbosity.store(0, Ordering::Relaxed);
        self.suppressed_by_severity.store(0, Ordering::Relaxed);
        self.rate_limited.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.emitted(), 0);
        assert_eq!(metrics.suppressed_by_verbosity(), 0);
        assert_eq!(metrics.suppressed_by_severity(), 0);
        assert_eq!(metrics.rate_limited(), 0);
        assert_eq!(metrics.write_failures(), 0);
        assert_eq!(metrics.suppression_rate(), 0.0);
    }

    #[test]
    fn test_suppression_rate() {
        let metrics = LoggerMetrics::new();
        for _ in 0..90 {
            metrics.record_emitted();
        }
        for _ in 0..3 {
            metrics.record_suppressed_by_verbosity();
            metrics.record_suppressed_by_severity();
        }
        for _ in 0..4 {
            metrics.record_rate_limited();
        }

        let rate = metrics.suppression_rate();
        assert!((9.9..=10.1).contains(&rate), "Suppression rate was {}", rate);
        assert_eq!(metrics.suppressed_by_verbosity(), 3);
        assert_eq!(metrics.suppressed_by_severity(), 3);
    }

    #[test]
    fn test_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_emitted();
        metrics.record_write_failure();
        metrics.reset();
        assert_eq!(metrics.emitted(), 0);
        assert_eq!(metrics.write_failures(), 0);
    }
}
