//! Main logger implementation
//!
//! [`Logger`] is the process-wide logging context: it owns the global
//! V-level, the vmodule table, the per-call-site rate limiters, the output
//! sink and the metrics. A statement goes through up to three gates before it
//! is written:
//!
//! 1. severity: `level >= min_level`
//! 2. verbosity (V-gated statements only): the first vmodule rule matching
//!    the call site decides, otherwise the global V-level
//! 3. rate (rate-limited statements only): the call site's token bucket
//!
//! A statement stopped by a gate is dropped silently.

use super::{
    call_site::CallSite,
    clock::Clock,
    config::LoggerConfig,
    error::Result,
    limiter::CallSiteLimiters,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    output::{BoxedWriter, OutputSink},
    output_format::OutputFormat,
    rate_limit::Limit,
    verbosity::Verbosity,
    vmodule::{ModuleTable, VmoduleFilter},
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

pub struct Logger {
    min_level: RwLock<LogLevel>,
    verbosity: Verbosity,
    vmodule: VmoduleFilter,
    limiters: CallSiteLimiters,
    output: OutputSink,
    format: RwLock<OutputFormat>,
    use_colors: AtomicBool,
    /// Metrics for observability (emitted, suppressed, rate limited)
    metrics: LoggerMetrics,
}

impl Logger {
    /// Logger writing text lines to stderr, V-level 0, no vmodule rules
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(OutputSink::stderr(), CallSiteLimiters::new())
    }

    fn with_parts(output: OutputSink, limiters: CallSiteLimiters) -> Self {
        Self {
            min_level: RwLock::new(LogLevel::Info),
            verbosity: Verbosity::new(0),
            vmodule: VmoduleFilter::new(),
            limiters,
            output,
            format: RwLock::new(OutputFormat::Text),
            use_colors: AtomicBool::new(false),
            metrics: LoggerMetrics::new(),
        }
    }

    /// Build a logger from a configuration, failing on a malformed vmodule spec
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        Logger::builder().config(config.clone()).build()
    }

    /// Apply a configuration to a running logger.
    ///
    /// The vmodule spec is compiled first; if it is malformed nothing is
    /// changed.
    pub fn apply_config(&self, config: &LoggerConfig) -> Result<()> {
        let table = Arc::new(ModuleTable::parse(&config.vmodule)?);

        self.vmodule.install(table);
        self.verbosity.set(config.verbosity);
        self.set_min_level(config.min_level);
        *self.format.write() = config.format;
        self.use_colors.store(config.colors, Ordering::Relaxed);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Global V-level
    // ------------------------------------------------------------------

    pub fn verbosity(&self) -> i32 {
        self.verbosity.get()
    }

    /// Set the global V-level, returning the previous one
    pub fn set_verbosity(&self, level: i32) -> i32 {
        self.verbosity.set(level)
    }

    // ------------------------------------------------------------------
    // vmodule
    // ------------------------------------------------------------------

    /// The vmodule spec exactly as last set
    pub fn vmodule(&self) -> String {
        self.vmodule.spec()
    }

    /// Replace the vmodule rules, returning the previous spec.
    ///
    /// A malformed spec is rejected as a whole and the current rules stay in
    /// force.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_vlog_system::Logger;
    ///
    /// let logger = Logger::new();
    /// logger.set_vmodule("conn=0").unwrap();
    /// assert!(!logger.should_log("conn", 2));
    ///
    /// let previous = logger.set_vmodule("conn=10").unwrap();
    /// assert_eq!(previous, "conn=0");
    /// assert!(logger.should_log("conn", 2));
    ///
    /// assert!(logger.set_vmodule("conn").is_err());
    /// assert_eq!(logger.vmodule(), "conn=10");
    /// ```
    pub fn set_vmodule(&self, spec: &str) -> Result<String> {
        self.vmodule.set(spec)
    }

    /// Would a V-gated statement at `requested` fire for this identifier?
    ///
    /// `call_site` is a module name (`conn`) or source path (`src/net/conn.rs`).
    pub fn should_log(&self, call_site: &str, requested: i32) -> bool {
        match self.vmodule.snapshot().level_for_name(call_site) {
            Some(level) => requested <= level,
            None => self.verbosity.enabled(requested),
        }
    }

    /// Would a V-gated statement at `requested` fire at `site`?
    #[inline]
    pub fn v_enabled(&self, site: &CallSite, requested: i32) -> bool {
        let table = self.vmodule.snapshot();
        if table.is_empty() {
            return self.verbosity.enabled(requested);
        }
        match table.level_for(site) {
            Some(level) => requested <= level,
            None => self.verbosity.enabled(requested),
        }
    }

    /// Resolve the V-gate once and return a handle for logging at `site`
    #[inline]
    pub fn v<'a>(&'a self, level: i32, site: &'a CallSite) -> Verbose<'a> {
        Verbose {
            logger: self,
            site,
            level,
            enabled: self.v_enabled(site, level),
        }
    }

    // ------------------------------------------------------------------
    // Rate limiting
    // ------------------------------------------------------------------

    /// Take a token from the bucket of `site`, creating it on first use
    pub fn allow(&self, site: &CallSite, limit: Limit, burst: u32) -> bool {
        self.limiters.allow(site, limit, burst)
    }

    /// Minimum interval between statements at `site`, once it has logged
    pub fn rate_interval(&self, site: &CallSite) -> Option<Duration> {
        self.limiters.interval(site)
    }

    /// Number of call sites holding a rate limiter
    pub fn limiter_count(&self) -> usize {
        self.limiters.len()
    }

    // ------------------------------------------------------------------
    // Output
    // ------------------------------------------------------------------

    /// Install a new destination and return the previous one
    pub fn set_output(&self, writer: BoxedWriter) -> BoxedWriter {
        self.output.set_output(writer)
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    pub fn set_format(&self, format: OutputFormat) {
        *self.format.write() = format;
    }

    pub fn set_colors(&self, use_colors: bool) {
        self.use_colors.store(use_colors, Ordering::Relaxed);
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Logging
    // ------------------------------------------------------------------

    pub fn log(&self, level: LogLevel, site: &CallSite, message: impl AsRef<str>) {
        self.log_fmt(level, site, format_args!("{}", message.as_ref()));
    }

    pub fn log_fmt(&self, level: LogLevel, site: &CallSite, args: fmt::Arguments<'_>) {
        self.dispatch(level, site, None, None, args);
    }

    /// Log at most `limit` times per second (after an initial `burst`) from `site`
    pub fn log_every(
        &self,
        level: LogLevel,
        site: &CallSite,
        limit: Limit,
        burst: u32,
        message: impl AsRef<str>,
    ) {
        self.log_every_fmt(level, site, limit, burst, format_args!("{}", message.as_ref()));
    }

    pub fn log_every_fmt(
        &self,
        level: LogLevel,
        site: &CallSite,
        limit: Limit,
        burst: u32,
        args: fmt::Arguments<'_>,
    ) {
        self.dispatch(level, site, None, Some((limit, burst)), args);
    }

    #[inline]
    pub fn info(&self, site: &CallSite, message: impl AsRef<str>) {
        self.log(LogLevel::Info, site, message);
    }

    #[inline]
    pub fn warning(&self, site: &CallSite, message: impl AsRef<str>) {
        self.log(LogLevel::Warning, site, message);
    }

    #[inline]
    pub fn error(&self, site: &CallSite, message: impl AsRef<str>) {
        self.log(LogLevel::Error, site, message);
    }

    /// Log at fatal severity and flush. The process is left running.
    #[inline]
    pub fn fatal(&self, site: &CallSite, message: impl AsRef<str>) {
        self.log(LogLevel::Fatal, site, message);
    }

    fn dispatch(
        &self,
        level: LogLevel,
        site: &CallSite,
        verbosity: Option<i32>,
        rate: Option<(Limit, u32)>,
        args: fmt::Arguments<'_>,
    ) {
        if level < self.min_level() {
            self.metrics.record_suppressed_by_severity();
            return;
        }

        if let Some((limit, burst)) = rate {
            if !self.limiters.allow(site, limit, burst) {
                self.metrics.record_rate_limited();
                return;
            }
        }

        let message = match args.as_str() {
            Some(s) => s.to_string(),
            None => args.to_string(),
        };
        let mut entry = LogEntry::new(level, site, &message);
        if let Some(v) = verbosity {
            entry = entry.with_verbosity(v);
        }
        self.emit(&entry);
    }

    /// Write an entry with writer panic isolation
    fn emit(&self, entry: &LogEntry) {
        let format = *self.format.read();
        let line = format.format(entry, self.use_colors.load(Ordering::Relaxed));

        let write_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.output.write_line(&line)?;
            if entry.level == LogLevel::Fatal {
                self.output.flush()?;
            }
            Ok::<(), std::io::Error>(())
        }));

        match write_result {
            Ok(Ok(())) => {
                self.metrics.record_emitted();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Output write failed: {}", e);
                self.metrics.record_write_failure();
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!("[LOGGER CRITICAL] Output writer panicked: {}", panic_msg);
                self.metrics.record_write_failure();
            }
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.min_level())
            .field("verbosity", &self.verbosity())
            .field("vmodule", &self.vmodule())
            .field("limiters", &self.limiter_count())
            .finish_non_exhaustive()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.output.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Result of resolving the V-gate for one call site.
///
/// Cheap to create and copy; every method is a no-op when the gate is closed.
#[derive(Clone, Copy)]
pub struct Verbose<'a> {
    logger: &'a Logger,
    site: &'a CallSite,
    level: i32,
    enabled: bool,
}

impl<'a> Verbose<'a> {
    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.info_fmt(format_args!("{}", message.as_ref()));
    }

    pub fn info_fmt(&self, args: fmt::Arguments<'_>) {
        self.gate(None, args);
    }

    /// Like [`Verbose::info`], additionally rate limited per call site
    pub fn info_every(&self, limit: Limit, burst: u32, message: impl AsRef<str>) {
        self.info_every_fmt(limit, burst, format_args!("{}", message.as_ref()));
    }

    pub fn info_every_fmt(&self, limit: Limit, burst: u32, args: fmt::Arguments<'_>) {
        self.gate(Some((limit, burst)), args);
    }

    fn gate(&self, rate: Option<(Limit, u32)>, args: fmt::Arguments<'_>) {
        if !self.enabled {
            self.logger.metrics.record_suppressed_by_verbosity();
            return;
        }
        self.logger
            .dispatch(LogLevel::Info, self.site, Some(self.level), rate, args);
    }
}

impl fmt::Debug for Verbose<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verbose")
            .field("site", self.site)
            .field("level", &self.level)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_vlog_system::prelude::*;
///
/// let logger = Logger::builder()
///     .verbosity(1)
///     .vmodule("conn=3,storage*=0")
///     .min_level(LogLevel::Info)
///     .output(Box::new(std::io::sink()))
///     .build()
///     .unwrap();
///
/// assert_eq!(logger.verbosity(), 1);
/// assert!(logger.should_log("conn", 3));
/// assert!(!logger.should_log("storage_index", 1));
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    output: Option<BoxedWriter>,
    clock: Option<Arc<dyn Clock>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            output: None,
            clock: None,
        }
    }

    /// Start from a full configuration; later calls override single fields
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn verbosity(mut self, level: i32) -> Self {
        self.config.verbosity = level;
        self
    }

    /// vmodule spec; validated by [`LoggerBuilder::build`]
    #[must_use = "builder methods return a new value"]
    pub fn vmodule(mut self, spec: impl Into<String>) -> Self {
        self.config.vmodule = spec.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, use_colors: bool) -> Self {
        self.config.colors = use_colors;
        self
    }

    /// Destination for emitted lines (stderr if not set)
    #[must_use = "builder methods return a new value"]
    pub fn output(mut self, writer: BoxedWriter) -> Self {
        self.output = Some(writer);
        self
    }

    /// Time source for the rate limiters
    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<Logger> {
        let output = self.output.map_or_else(OutputSink::stderr, OutputSink::new);
        let limiters = self
            .clock
            .map_or_else(CallSiteLimiters::new, CallSiteLimiters::with_clock);

        let logger = Logger::with_parts(output, limiters);
        logger.apply_config(&self.config)?;
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Shared process-wide logger.
///
/// Initialised on first use from `VLOG_V` / `VLOG_VMODULE`; if those are
/// invalid a warning is printed and defaults are used.
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(|| {
        LoggerConfig::from_env()
            .and_then(|config| Logger::from_config(&config))
            .unwrap_or_else(|e| {
                eprintln!("[LOGGER WARNING] Ignoring logging environment: {}", e);
                Logger::new()
            })
    })
}
