//! Schema registry — the index from qualified name to declared node.
//!
//! Built once while the model loads, read-only during resolution. Lookups
//! return the identical binding instance for the same qualified name on
//! every call; cycle detection relies on that referential stability to
//! observe reentry into the same node.

use std::collections::hash_map::Entry;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::base::{QualifiedName, SourceLocation};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::semantics::bad::BadElement;
use crate::semantics::{AssociationId, ContainerId, ElementKind, EntityTypeId};

/// What a qualified name is bound to at schema scope.
///
/// A name collides when two declarations claim it, regardless of their
/// kinds; the binding then collapses into a single `Ambiguous` sentinel and
/// the colliding declarations become unreachable by name.
#[derive(Clone, Debug)]
pub enum Registered {
    EntityType(EntityTypeId),
    Association(AssociationId),
    EntityContainer(ContainerId),
    Ambiguous(Arc<BadElement>),
}

impl Registered {
    pub fn kind(&self) -> ElementKind {
        match self {
            Registered::EntityType(_) => ElementKind::EntityType,
            Registered::Association(_) => ElementKind::Association,
            Registered::EntityContainer(_) => ElementKind::EntityContainer,
            Registered::Ambiguous(bad) => bad.kind(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    bindings: FxHashMap<QualifiedName, Registered>,
}

impl SchemaRegistry {
    /// Looks up a declared element by qualified name.
    pub fn find_declared(&self, name: &QualifiedName) -> Option<&Registered> {
        self.bindings.get(name)
    }

    /// Number of bound qualified names.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Binds `name` during the model build. A second declaration of the
    /// same name folds the binding into one Ambiguous sentinel; further
    /// declarations fold into that same sentinel.
    pub(crate) fn register(
        &mut self,
        name: QualifiedName,
        binding: Registered,
        location: SourceLocation,
    ) {
        match self.bindings.entry(name) {
            Entry::Occupied(mut entry) => {
                trace!("[REGISTRY] duplicate declaration of '{}'", entry.key());
                let merged = ambiguate(entry.key(), entry.get(), location);
                entry.insert(merged);
            }
            Entry::Vacant(entry) => {
                trace!("[REGISTRY] bind '{}' as {}", entry.key(), binding.kind());
                entry.insert(binding);
            }
        }
    }
}

fn ambiguate(name: &QualifiedName, existing: &Registered, location: SourceLocation) -> Registered {
    let kind = existing.kind();
    let mut errors = match existing {
        Registered::Ambiguous(bad) => bad.errors().to_vec(),
        _ => Vec::new(),
    };
    errors.push(Diagnostic::new(
        location,
        DiagnosticCode::AmbiguousBinding,
        format!("'{name}' is declared more than once in this schema set"),
    ));
    Registered::Ambiguous(Arc::new(BadElement::ambiguous(
        kind,
        &name.to_string(),
        errors,
    )))
}
