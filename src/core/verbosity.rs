//! Global verbosity (V-level) threshold

use std::sync::atomic::{AtomicI32, Ordering};

/// Process-wide V-level threshold.
///
/// A V-gated statement at level `n` fires when `n <= verbosity` and no
/// vmodule rule overrides its call site. Negative values are legal and
/// suppress every statement at level 0 and above.
#[derive(Debug, Default)]
pub struct Verbosity {
    level: AtomicI32,
}

impl Verbosity {
    pub const fn new(level: i32) -> Self {
        Self {
            level: AtomicI32::new(level),
        }
    }

    #[inline]
    pub fn get(&self) -> i32 {
        self.level.load(Ordering::Acquire)
    }

    /// Store a new threshold and return the one it replaced
    #[inline]
    pub fn set(&self, level: i32) -> i32 {
        self.level.swap(level, Ordering::AcqRel)
    }

    #[inline]
    pub fn enabled(&self, requested: i32) -> bool {
        requested <= self.get()
    }
}
