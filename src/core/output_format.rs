//! Output format configuration for log entries
//!
//! - Text: classic leveled-log header, `Lmmdd hh:mm:ss.uuuuuu thread file:line] msg`
//! - Json: one JSON object per line

use super::log_entry::LogEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Example: `I0108 10:30:45.123456      12 conn.rs:42] dial ok`
    #[default]
    Text,

    /// Example: `{"level":"Info","message":"dial ok",...}`
    Json,
}

impl OutputFormat {
    /// Format a log entry according to this output format
    pub fn format(&self, entry: &LogEntry, use_colors: bool) -> String {
        match self {
            OutputFormat::Text => Self::format_text(entry, use_colors),
            OutputFormat::Json => Self::format_json(entry),
        }
    }

    fn format_text(entry: &LogEntry, use_colors: bool) -> String {
        format!(
            "{}{} {:>7} {}:{}] {}",
            Self::tag(entry, use_colors),
            entry.timestamp.format("%m%d %H:%M:%S%.6f"),
            entry.thread_id,
            entry.file,
            entry.line,
            entry.message
        )
    }

    #[cfg(feature = "console")]
    fn tag(entry: &LogEntry, use_colors: bool) -> String {
        use colored::Colorize;

        let tag = entry.level.tag().to_string();
        if use_colors {
            tag.color(entry.level.color_code()).to_string()
        } else {
            tag
        }
    }

    #[cfg(not(feature = "console"))]
    fn tag(entry: &LogEntry, _use_colors: bool) -> String {
        entry.level.tag().to_string()
    }

    fn format_json(entry: &LogEntry) -> String {
        serde_json::to_string(entry).unwrap_or_default()
    }
}
