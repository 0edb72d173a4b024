//! Per-package export report.

use std::fmt;

use crate::error::SkipReason;

/// Which registration group a symbol belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Const,
    Var,
    Type,
    Func,
    Other,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Const => write!(f, "const"),
            SymbolKind::Var => write!(f, "var"),
            SymbolKind::Type => write!(f, "type"),
            SymbolKind::Func => write!(f, "func"),
            SymbolKind::Other => write!(f, "decl"),
        }
    }
}

/// A symbol that was excluded from the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Display name (`Name` or `Type.Method`).
    pub symbol: String,
    pub kind: SymbolKind,
    pub reason: SkipReason,
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skip {} {}, {}", self.kind, self.symbol, self.reason)
    }
}

/// Counts of emitted registrations and the list of skipped symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub consts: usize,
    pub vars: usize,
    pub types: usize,
    pub funcs: usize,
    pub funcvs: usize,
    pub skipped: Vec<Skipped>,
}

impl ExportReport {
    /// Record a skipped symbol and log it.
    pub fn skip(&mut self, symbol: &str, kind: SymbolKind, reason: SkipReason) {
        tracing::warn!(%kind, symbol, %reason, "skipping symbol");
        self.skipped.push(Skipped {
            symbol: symbol.to_string(),
            kind,
            reason,
        });
    }

    /// Total number of registrations emitted.
    pub fn emitted(&self) -> usize {
        self.consts + self.vars + self.types + self.funcs + self.funcvs
    }

    /// Whether a symbol with this display name was skipped.
    pub fn was_skipped(&self, symbol: &str) -> bool {
        self.skipped.iter().any(|s| s.symbol == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_records_and_displays() {
        let mut report = ExportReport::default();
        report.skip(
            "Open",
            SymbolKind::Func,
            SkipReason::UnexportedParam {
                index: 0,
                ty: "fs.handle".to_string(),
            },
        );
        assert!(report.was_skipped("Open"));
        assert_eq!(
            report.skipped[0].to_string(),
            "skip func Open, param 0 type is internal fs.handle"
        );
        assert_eq!(report.emitted(), 0);
    }
}
