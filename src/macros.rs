//! Logging macros for ergonomic log message formatting.
//!
//! Each macro invocation gets its own static [`CallSite`](crate::CallSite),
//! so vmodule rules match the file the statement lives in and rate limits
//! apply per statement. Arguments are formatted only when the statement is
//! actually written.
//!
//! # Examples
//!
//! ```
//! use rust_vlog_system::prelude::*;
//! use rust_vlog_system::{info, vlog, vlog_every};
//! use std::time::Duration;
//!
//! let logger = Logger::builder()
//!     .verbosity(2)
//!     .output(Box::new(std::io::sink()))
//!     .build()
//!     .unwrap();
//!
//! info!(logger, "Server listening on port {}", 8080);
//! vlog!(logger, 2, "accepted connection from {}", "10.0.0.7");
//! vlog_every!(logger, 1, Limit::every(Duration::from_secs(5)), 1, "queue depth {}", 17);
//! ```

/// V-gated info statement: `vlog!(logger, level, "fmt", args...)`
#[macro_export]
macro_rules! vlog {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger
            .v($level, $crate::call_site!())
            .info_fmt(format_args!($($arg)+))
    };
}

/// V-gated, rate-limited info statement:
/// `vlog_every!(logger, level, limit, burst, "fmt", args...)`
#[macro_export]
macro_rules! vlog_every {
    ($logger:expr, $level:expr, $limit:expr, $burst:expr, $($arg:tt)+) => {
        $logger
            .v($level, $crate::call_site!())
            .info_every_fmt($limit, $burst, format_args!($($arg)+))
    };
}

/// Is a V-gated statement at `level` enabled here?
///
/// Useful to skip expensive work that only feeds verbose output.
#[macro_export]
macro_rules! vlog_enabled {
    ($logger:expr, $level:expr) => {
        $logger.v_enabled($crate::call_site!(), $level)
    };
}

/// Log a message at an explicit severity.
///
/// # Examples
///
/// ```
/// # use rust_vlog_system::prelude::*;
/// # let logger = Logger::builder().output(Box::new(std::io::sink())).build().unwrap();
/// use rust_vlog_system::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_fmt($level, $crate::call_site!(), format_args!($($arg)+))
    };
}

/// Rate-limited statement at an explicit severity:
/// `log_every!(logger, level, limit, burst, "fmt", args...)`
#[macro_export]
macro_rules! log_every {
    ($logger:expr, $level:expr, $limit:expr, $burst:expr, $($arg:tt)+) => {
        $logger.log_every_fmt(
            $level,
            $crate::call_site!(),
            $limit,
            $burst,
            format_args!($($arg)+),
        )
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message and flush the output.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
