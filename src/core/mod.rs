//! Core logger types

pub mod call_site;
pub mod clock;
pub mod config;
pub mod error;
pub mod limiter;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output;
pub mod output_format;
pub mod rate_limit;
pub mod verbosity;
pub mod vmodule;

pub use call_site::CallSite;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use limiter::CallSiteLimiters;
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{global, Logger, LoggerBuilder, Verbose};
pub use metrics::LoggerMetrics;
pub use output::{BoxedWriter, OutputSink, SharedBuffer};
pub use output_format::OutputFormat;
pub use rate_limit::{limit_to_duration, Limit, TokenBucket};
pub use verbosity::Verbosity;
pub use vmodule::{ModuleRule, ModuleTable, VmoduleFilter};
