//! # Rust VLog System
//!
//! Leveled logging with a second, independently tunable verbosity gate.
//!
//! ## Features
//!
//! - **V-levels**: `vlog!(logger, 2, ...)` fires only when the call site's
//!   verbosity allows it
//! - **vmodule**: `conn=3,storage*=0` overrides the global V-level per source
//!   file, reconfigurable at runtime
//! - **Per-call-site rate limiting**: token buckets that shed bursts of
//!   repeated statements
//! - **Swappable output**: `set_output` returns the previous writer
//!
//! ## Example
//!
//! ```
//! use rust_vlog_system::prelude::*;
//! use rust_vlog_system::vlog;
//!
//! let capture = SharedBuffer::new();
//! let logger = Logger::builder()
//!     .verbosity(1)
//!     .output(Box::new(capture.clone()))
//!     .build()?;
//!
//! vlog!(logger, 1, "visible");
//! vlog!(logger, 2, "hidden");
//! assert_eq!(capture.contents().lines().count(), 1);
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        global, limit_to_duration, CallSite, Clock, Limit, LogLevel, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, ManualClock, OutputFormat, Result,
        SharedBuffer, SystemClock, Verbose,
    };
}

pub use crate::core::{
    global, limit_to_duration, CallSite, CallSiteLimiters, Clock, Limit, LogEntry, LogLevel,
    Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, ManualClock, ModuleRule,
    ModuleTable, OutputFormat, OutputSink, Result, SharedBuffer, SystemClock, TokenBucket,
    Verbose, Verbosity, VmoduleFilter,
};
