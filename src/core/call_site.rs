//! Call-site identity
//!
//! A call site is the source location of a log statement. It keys both
//! vmodule matching (through its file) and per-call-site rate limiting.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSite {
    file: &'static str,
    line: u32,
    module_path: &'static str,
}

impl CallSite {
    pub const fn new(file: &'static str, line: u32, module_path: &'static str) -> Self {
        Self {
            file,
            line,
            module_path,
        }
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    /// Bare file name without directories or extension (`src/net/conn.rs` -> `conn`)
    pub fn name(&self) -> &'static str {
        module_name(self.file)
    }

    /// File path without its extension, separators normalized to `/`
    pub fn path_stem(&self) -> String {
        path_stem(self.file)
    }

    /// File name with extension, used in the line header
    pub fn base_file(&self) -> &'static str {
        self.file.rsplit(is_separator).next().unwrap_or(self.file)
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

pub(crate) fn module_name(file: &str) -> &str {
    let base = file.rsplit(is_separator).next().unwrap_or(file);
    match base.rfind('.') {
        Some(0) | None => base,
        Some(dot) => &base[..dot],
    }
}

pub(crate) fn path_stem(file: &str) -> String {
    let normalized = file.replace('\\', "/");
    let base_start = normalized.rfind('/').map_or(0, |i| i + 1);
    match normalized[base_start..].rfind('.') {
        Some(0) | None => normalized,
        Some(dot) => normalized[..base_start + dot].to_string(),
    }
}

/// Build a `&'static CallSite` for the current source location
#[macro_export]
macro_rules! call_site {
    () => {{
        static __CALL_SITE: $crate::CallSite =
            $crate::CallSite::new(file!(), line!(), module_path!());
        &__CALL_SITE
    }};
}
