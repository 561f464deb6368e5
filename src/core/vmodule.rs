//! Per-module verbosity overrides ("vmodule")
//!
//! A vmodule spec is a comma-separated list of `pattern=level` entries, e.g.
//! `conn=2,gfs*=3,storage/??_index=1`. Patterns are globs (`*`, `?`, `[...]`)
//! matched case-sensitively against the call site's file name without its
//! extension. A pattern containing `/` is matched against the whole file path
//! (minus extension) instead.
//!
//! Rules are evaluated in the order written and the first match wins.
//!
//! # Example
//!
//! ```
//! use rust_vlog_system::core::vmodule::ModuleTable;
//!
//! let table = ModuleTable::parse("conn=2,c*=5").unwrap();
//! assert_eq!(table.level_for_name("conn"), Some(2));
//! assert_eq!(table.level_for_name("cache"), Some(5));
//! assert_eq!(table.level_for_name("server"), None);
//! ```

use super::call_site::{module_name, path_stem, CallSite};
use super::error::{LoggerError, Result};
use glob::Pattern;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// A single compiled `pattern=level` entry
#[derive(Debug, Clone)]
pub struct ModuleRule {
    source: String,
    pattern: Pattern,
    level: i32,
    /// Pattern names a directory, so it is matched against the full path
    full_path: bool,
}

impl ModuleRule {
    pub fn new(pattern: &str, level: i32) -> Result<Self> {
        if pattern.is_empty() {
            return Err(LoggerError::vmodule(pattern, "empty pattern"));
        }
        let compiled = Pattern::new(&collapse_stars(pattern))
            .map_err(|e| LoggerError::vmodule(pattern, e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            pattern: compiled,
            level,
            full_path: pattern.contains('/'),
        })
    }

    /// The pattern as written in the spec
    pub fn pattern(&self) -> &str {
        &self.source
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    fn matches(&self, name: &str, path: &str) -> bool {
        if self.full_path {
            self.pattern.matches(path)
        } else {
            self.pattern.matches(name)
        }
    }
}

/// Runs of `*` compile as a single `*` (`glob` rejects `**` unless it is a
/// whole path component)
fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Immutable, ordered set of rules compiled from one spec string.
///
/// Tables are never edited after construction; reconfiguration builds a new
/// table and swaps it in through [`VmoduleFilter`]. Each table memoises the
/// override it resolved for every call-site file it has seen, so the cache is
/// discarded together with the table it was computed from.
#[derive(Debug, Default)]
pub struct ModuleTable {
    spec: String,
    rules: Vec<ModuleRule>,
    resolved: RwLock<HashMap<&'static str, Option<i32>>>,
}

impl ModuleTable {
    /// Compile a spec string. Either every entry compiles or nothing does.
    ///
    /// Empty entries (e.g. from a trailing comma) are ignored, so `""`
    /// produces an empty table.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut rules = Vec::new();

        for entry in spec.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            let parts: Vec<&str> = entry.split('=').collect();
            if parts.len() != 2 {
                return Err(LoggerError::vmodule(
                    entry,
                    "expected exactly one '=' in pattern=level",
                ));
            }

            let pattern = parts[0].trim();
            let level_str = parts[1].trim();
            if level_str.is_empty() {
                return Err(LoggerError::vmodule(entry, "missing level"));
            }
            let level: i32 = level_str.parse().map_err(|_| {
                LoggerError::vmodule(entry, format!("level '{}' is not an integer", level_str))
            })?;

            rules.push(ModuleRule::new(pattern, level)?);
        }

        Ok(Self {
            spec: spec.to_string(),
            rules,
            resolved: RwLock::new(HashMap::new()),
        })
    }

    /// The spec text exactly as it was given to [`ModuleTable::parse`]
    pub fn spec(&self) -> &str {
        &self.spec
    }

    pub fn rules(&self) -> &[ModuleRule] {
        &self.rules
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Override level for a call site, memoised per source file
    pub fn level_for(&self, site: &CallSite) -> Option<i32> {
        if self.rules.is_empty() {
            return None;
        }

        let file = site.file();
        if let Some(cached) = self.resolved.read().get(file) {
            return *cached;
        }

        let level = self.lookup(site.name(), &site.path_stem());
        self.resolved.write().insert(file, level);
        level
    }

    /// Override level for a free-form identifier.
    ///
    /// Accepts either a bare module name (`conn`) or a file path
    /// (`src/net/conn.rs`); paths are normalized the same way call sites are.
    pub fn level_for_name(&self, call_site: &str) -> Option<i32> {
        if self.rules.is_empty() {
            return None;
        }
        self.lookup(module_name(call_site), &path_stem(call_site))
    }

    fn lookup(&self, name: &str, path: &str) -> Option<i32> {
        self.rules
            .iter()
            .find(|rule| rule.matches(name, path))
            .map(|rule| rule.level)
    }
}

/// Holder of the currently installed [`ModuleTable`].
///
/// Readers take a cheap `Arc` snapshot and never see a table under
/// construction; writers compile the replacement before taking the lock.
#[derive(Debug, Default)]
pub struct VmoduleFilter {
    current: RwLock<Arc<ModuleTable>>,
}

impl VmoduleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn snapshot(&self) -> Arc<ModuleTable> {
        Arc::clone(&self.current.read())
    }

    pub fn spec(&self) -> String {
        self.current.read().spec().to_string()
    }

    /// Compile `spec` and install it, returning the previously installed spec.
    ///
    /// On error the installed table is left untouched.
    pub fn set(&self, spec: &str) -> Result<String> {
        let table = Arc::new(ModuleTable::parse(spec)?);
        Ok(self.install(table).spec().to_string())
    }

    /// Install an already compiled table, returning the one it replaced
    pub fn install(&self, table: Arc<ModuleTable>) -> Arc<ModuleTable> {
        std::mem::replace(&mut *self.current.write(), table)
    }
}
