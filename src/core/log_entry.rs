//! Log entry structure

use super::call_site::CallSite;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

// Thread-local cache for the thread identifier to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Get cached thread ID (`ThreadId(7)` -> `7`), computing it on first access
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| {
                let raw = format!("{:?}", std::thread::current().id());
                raw.trim_start_matches("ThreadId(")
                    .trim_end_matches(')')
                    .to_string()
            })
            .clone()
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    /// V-level of the statement, for V-gated entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<i32>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub file: String,
    pub line: u32,
    pub module_path: String,
    pub thread_id: String,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so one statement always produces one line.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, site: &CallSite, message: &str) -> Self {
        Self {
            level,
            verbosity: None,
            message: Self::sanitize_message(message),
            timestamp: Utc::now(),
            file: site.base_file().to_string(),
            line: site.line(),
            module_path: site.module_path().to_string(),
            thread_id: get_thread_id(),
        }
    }

    pub fn with_verbosity(mut self, level: i32) -> Self {
        self.verbosity = Some(level);
        self
    }
}
