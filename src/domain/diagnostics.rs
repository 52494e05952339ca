// Non-fatal problems recorded while walking units.

use crate::domain::ast::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The call has no enclosing declaration; caller is `<module-level>`.
    UnresolvedCaller,
    /// The call target could not be determined; callee is `<unresolved>`.
    UnresolvedCallee,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub unit: String,
    pub position: Position,
}

impl Diagnostic {
    pub fn unresolved_caller(unit: impl Into<String>, position: Position) -> Self {
        Self {
            kind: DiagnosticKind::UnresolvedCaller,
            unit: unit.into(),
            position,
        }
    }

    pub fn unresolved_callee(unit: impl Into<String>, position: Position) -> Self {
        Self {
            kind: DiagnosticKind::UnresolvedCallee,
            unit: unit.into(),
            position,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self.kind {
            DiagnosticKind::UnresolvedCaller => "call outside any declaration, attributed to <module-level>",
            DiagnosticKind::UnresolvedCallee => "call target could not be statically resolved",
        };
        write!(f, "{}:{}: {}", self.unit, self.position, message)
    }
}

/// Per-kind counts, used for the end-of-run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticSummary {
    pub unresolved_callers: usize,
    pub unresolved_callees: usize,
}

impl DiagnosticSummary {
    pub fn of(diagnostics: &[Diagnostic]) -> Self {
        diagnostics.iter().fold(Self::default(), |mut acc, d| {
            match d.kind {
                DiagnosticKind::UnresolvedCaller => acc.unresolved_callers += 1,
                DiagnosticKind::UnresolvedCallee => acc.unresolved_callees += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.unresolved_callers + self.unresolved_callees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location() {
        let d = Diagnostic::unresolved_callee("src/a.rs", Position::new(12, 8));
        assert_eq!(
            d.to_string(),
            "src/a.rs:12:8: call target could not be statically resolved"
        );
    }

    #[test]
    fn test_summary_counts_by_kind() {
        let diagnostics = vec![
            Diagnostic::unresolved_callee("a", Position::new(1, 0)),
            Diagnostic::unresolved_caller("a", Position::new(2, 0)),
            Diagnostic::unresolved_callee("b", Position::new(3, 0)),
        ];
        let summary = DiagnosticSummary::of(&diagnostics);
        assert_eq!(summary.unresolved_callees, 2);
        assert_eq!(summary.unresolved_callers, 1);
        assert_eq!(summary.total(), 3);
    }
}
