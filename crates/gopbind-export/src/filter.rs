//! Symbol name filtering.
//!
//! The pipeline only consumes a predicate; pattern syntax belongs to the
//! caller. [`NameFilter`] covers the common case of exact names and
//! `Prefix*` patterns.

use std::collections::BTreeSet;

/// Decides whether a symbol (by display name) takes part in the export.
pub trait SymbolFilter {
    fn accept(&self, name: &str) -> bool;
}

impl<F> SymbolFilter for F
where
    F: Fn(&str) -> bool,
{
    fn accept(&self, name: &str) -> bool {
        self(name)
    }
}

/// Accepts every symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl SymbolFilter for AcceptAll {
    fn accept(&self, _name: &str) -> bool {
        true
    }
}

/// Exact names and `Prefix*` patterns. An empty filter accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    exact: BTreeSet<String>,
    prefixes: Vec<String>,
}

impl NameFilter {
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();
        for pattern in patterns {
            let pattern = pattern.as_ref().trim();
            if pattern.is_empty() {
                continue;
            }
            match pattern.strip_suffix('*') {
                Some(prefix) => filter.prefixes.push(prefix.to_string()),
                None => {
                    filter.exact.insert(pattern.to_string());
                }
            }
        }
        filter
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.prefixes.is_empty()
    }
}

impl SymbolFilter for NameFilter {
    fn accept(&self, name: &str) -> bool {
        self.is_empty()
            || self.exact.contains(name)
            || self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}
