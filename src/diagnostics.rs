//! Diagnostics — structured reports of semantic problems.
//!
//! Data problems never abort resolution. Every failed or conflicting
//! reference produces a sentinel element carrying [`Diagnostic`]s, and
//! composite elements surface them through their `errors()` accessor, so a
//! single traversal of the model collects every problem at once.

use std::fmt;
use std::sync::Arc;

use crate::base::SourceLocation;

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// The stable, enumerated taxonomy of semantic problems.
///
/// Codes are part of the crate's contract with downstream consumers; new
/// variants may be added but existing wire codes never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// A named reference to a declaration that does not exist.
    UnresolvedReference,
    /// A reference chain that closes back on itself.
    CyclicReference,
    /// A name bound to two or more declared elements in one scope.
    AmbiguousBinding,
    /// A constant expression whose text fails to parse as its declared type.
    InvalidLiteral,
    /// Malformed membership, e.g. an end role that the association lacks.
    StructuralError,
}

impl DiagnosticCode {
    /// Stable wire code (e.g. `"E0001"`).
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::UnresolvedReference => "E0001",
            DiagnosticCode::CyclicReference => "E0002",
            DiagnosticCode::AmbiguousBinding => "E0003",
            DiagnosticCode::InvalidLiteral => "E0004",
            DiagnosticCode::StructuralError => "E0005",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// DIAGNOSTIC
// ============================================================================

/// One semantic problem: where it is, what class of problem, and a message.
///
/// Diagnostics are immutable once constructed; sentinel elements fix theirs
/// at construction time and aggregation only ever copies them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub location: SourceLocation,
    pub code: DiagnosticCode,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn new(
        location: SourceLocation,
        code: DiagnosticCode,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            location,
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.code, self.location, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(DiagnosticCode::UnresolvedReference.as_str(), "E0001");
        assert_eq!(DiagnosticCode::CyclicReference.as_str(), "E0002");
        assert_eq!(DiagnosticCode::AmbiguousBinding.as_str(), "E0003");
        assert_eq!(DiagnosticCode::InvalidLiteral.as_str(), "E0004");
        assert_eq!(DiagnosticCode::StructuralError.as_str(), "E0005");
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::new(
            SourceLocation::new(3, 7),
            DiagnosticCode::UnresolvedReference,
            "unresolved entity type 'NS.Missing'",
        );
        assert_eq!(
            diag.to_string(),
            "E0001 (3, 7): unresolved entity type 'NS.Missing'"
        );
    }
}
