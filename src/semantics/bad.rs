//! Sentinel elements standing in for failed resolutions.
//!
//! A [`BadElement`] implements the read-only surface of a real element
//! (name, kind, errors) with degenerate values, so consumers can keep
//! traversing a partially valid model. Sentinels are terminal: every
//! property that would trigger further resolution is empty on them, which
//! is what guarantees a failed resolution cannot be re-entered.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::SourceLocation;
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::semantics::ElementKind;

/// Why a sentinel exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadElementFlavor {
    /// The referenced qualified name was never declared.
    Unresolved,
    /// The element participates in a reference cycle.
    Cyclic,
    /// Two or more declared elements share one name in one scope.
    Ambiguous,
}

/// A placeholder element carrying the diagnosis of a failed resolution.
///
/// The partial name is preserved when known (e.g. the unresolved qualified
/// name), so diagnostics can point at what the schema actually said.
#[derive(Clone, Debug)]
pub struct BadElement {
    kind: ElementKind,
    flavor: BadElementFlavor,
    name: SmolStr,
    errors: Vec<Diagnostic>,
}

impl BadElement {
    /// Sentinel for a reference to a declaration that does not exist.
    pub fn unresolved(kind: ElementKind, name: &str, location: SourceLocation) -> Self {
        Self {
            kind,
            flavor: BadElementFlavor::Unresolved,
            name: SmolStr::new(name),
            errors: vec![Diagnostic::new(
                location,
                DiagnosticCode::UnresolvedReference,
                format!("unresolved {kind} '{name}'"),
            )],
        }
    }

    /// Sentinel for the entry point of a reference cycle. `name` is the
    /// qualified name of the node whose resolution was re-entered.
    pub fn cyclic(kind: ElementKind, name: &str, location: SourceLocation) -> Self {
        Self {
            kind,
            flavor: BadElementFlavor::Cyclic,
            name: SmolStr::new(name),
            errors: vec![Diagnostic::new(
                location,
                DiagnosticCode::CyclicReference,
                format!("the {kind} '{name}' has a cyclic definition"),
            )],
        }
    }

    /// Sentinel folding every element bound to one duplicated name. The
    /// caller supplies the full error sequence (the duplicate-name
    /// diagnostic plus the contributors' own diagnostics).
    pub fn ambiguous(kind: ElementKind, name: &str, errors: Vec<Diagnostic>) -> Self {
        Self {
            kind,
            flavor: BadElementFlavor::Ambiguous,
            name: SmolStr::new(name),
            errors,
        }
    }

    /// The diagnostic recorded when a second element claims an occupied name.
    pub fn duplicate_name_diagnostic(
        kind: ElementKind,
        name: &str,
        location: SourceLocation,
    ) -> Diagnostic {
        Diagnostic::new(
            location,
            DiagnosticCode::AmbiguousBinding,
            format!("the name '{name}' is bound to more than one {kind}"),
        )
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn flavor(&self) -> BadElementFlavor {
        self.flavor
    }

    /// The partial name this sentinel stands in for; may be empty.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn is_unresolved(&self) -> bool {
        self.flavor == BadElementFlavor::Unresolved
    }

    pub fn is_cyclic(&self) -> bool {
        self.flavor == BadElementFlavor::Cyclic
    }

    pub fn is_ambiguous(&self) -> bool {
        self.flavor == BadElementFlavor::Ambiguous
    }
}

// ============================================================================
// REFERENCE SLOTS
// ============================================================================

/// A resolved reference: either a real element, by arena id, or a sentinel.
///
/// Consumers must branch on [`ElementRef::bad`] (or check `errors()`) rather
/// than assume validity; a bad slot is data, not a crash.
#[derive(Clone, Debug)]
pub enum ElementRef<Id> {
    Element(Id),
    Bad(Arc<BadElement>),
}

impl<Id: Copy> ElementRef<Id> {
    /// The arena id, when the reference resolved to a real element.
    pub fn element(&self) -> Option<Id> {
        match self {
            ElementRef::Element(id) => Some(*id),
            ElementRef::Bad(_) => None,
        }
    }

    /// The sentinel, when resolution failed.
    pub fn bad(&self) -> Option<&BadElement> {
        match self {
            ElementRef::Element(_) => None,
            ElementRef::Bad(bad) => Some(bad),
        }
    }

    pub fn is_bad(&self) -> bool {
        matches!(self, ElementRef::Bad(_))
    }

    /// The sentinel's diagnostics; empty for a real element.
    pub fn errors(&self) -> &[Diagnostic] {
        match self {
            ElementRef::Element(_) => &[],
            ElementRef::Bad(bad) => bad.errors(),
        }
    }
}
