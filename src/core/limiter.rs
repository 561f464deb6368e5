//! Per-call-site rate limiter registry
//!
//! Every rate-limited call site gets its own [`TokenBucket`], created the
//! first time the site logs and kept for the life of the registry. The set of
//! keys is bounded by the number of rate-limited statements in the source, so
//! entries are never evicted.

use super::call_site::CallSite;
use super::clock::{Clock, SystemClock};
use super::rate_limit::{Limit, TokenBucket};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

type SharedBucket = Arc<Mutex<TokenBucket>>;

#[derive(Debug)]
pub struct CallSiteLimiters {
    buckets: RwLock<HashMap<CallSite, SharedBucket>>,
    clock: Arc<dyn Clock>,
}

impl CallSiteLimiters {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock::new()))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Take a token from the bucket of `site`.
    ///
    /// `limit` and `burst` configure the bucket when it is first created;
    /// later calls for the same site reuse the existing bucket as is.
    pub fn allow(&self, site: &CallSite, limit: Limit, burst: u32) -> bool {
        self.bucket(site, limit, burst)
            .lock()
            .allow_at(self.clock.now())
    }

    /// Minimum spacing between events at `site`, once its bucket exists
    pub fn interval(&self, site: &CallSite) -> Option<Duration> {
        self.buckets
            .read()
            .get(site)
            .map(|bucket| bucket.lock().limit().interval())
    }

    pub fn len(&self) -> usize {
        self.buckets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.read().is_empty()
    }

    fn bucket(&self, site: &CallSite, limit: Limit, burst: u32) -> SharedBucket {
        {
            let buckets = self.buckets.read();
            if let Some(bucket) = buckets.get(site) {
                return Arc::clone(bucket);
            }
        }

        // Re-checked under the write lock: concurrent first users share one bucket
        let mut buckets = self.buckets.write();
        let bucket = buckets.entry(*site).or_insert_with(|| {
            Arc::new(Mutex::new(TokenBucket::new(limit, burst, self.clock.now())))
        });
        Arc::clone(bucket)
    }
}

impl Default for CallSiteLimiters {
    fn default() -> Self {
        Self::new()
    }
}
