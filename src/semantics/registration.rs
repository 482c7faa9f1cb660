//! Registration helper: builds name-keyed lookup tables from ordered
//! element sequences, folding duplicate names into ambiguous bindings.

use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;
use smol_str::SmolStr;
use tracing::trace;

use crate::base::SourceLocation;
use crate::diagnostics::Diagnostic;
use crate::semantics::bad::{BadElement, ElementRef};
use crate::semantics::{ElementKind, FunctionImportId};

/// Registers `element` under `name`. The first occurrence of a name binds
/// directly; a later occurrence replaces the entry with whatever `ambiguate`
/// folds the existing binding and the newcomer into, so the table never
/// holds more than one entry per name.
pub(crate) fn add_element<T: Clone>(
    table: &mut IndexMap<SmolStr, T>,
    name: &str,
    element: T,
    ambiguate: impl FnOnce(T, T) -> T,
) {
    match table.entry(SmolStr::new(name)) {
        Entry::Occupied(mut entry) => {
            trace!("[REGISTER] duplicate name '{}'", name);
            let existing = entry.get().clone();
            entry.insert(ambiguate(existing, element));
        }
        Entry::Vacant(entry) => {
            entry.insert(element);
        }
    }
}

/// Registers a function import. Unlike other elements, several imports may
/// legally share a name: they form an ordered overload set, and picking the
/// right overload is the caller's business.
pub(crate) fn add_function_import(
    table: &mut IndexMap<SmolStr, Vec<FunctionImportId>>,
    name: &str,
    id: FunctionImportId,
) {
    table.entry(SmolStr::new(name)).or_default().push(id);
}

/// Folds two same-named reference bindings into one Ambiguous sentinel.
///
/// The first collision produces a sentinel carrying the duplicate-name
/// diagnostic followed by both contributors' own diagnostics; each further
/// collision folds into that same sentinel, appending only the newcomer's.
pub(crate) fn ambiguate<Id: Copy>(
    kind: ElementKind,
    name: &str,
    location: SourceLocation,
    existing: ElementRef<Id>,
    incoming: ElementRef<Id>,
    own_errors: impl Fn(Id) -> Vec<Diagnostic>,
) -> ElementRef<Id> {
    let mut errors = match &existing {
        ElementRef::Bad(bad) if bad.is_ambiguous() => bad.errors().to_vec(),
        _ => {
            let mut errors = vec![BadElement::duplicate_name_diagnostic(kind, name, location)];
            errors.extend(binding_errors(&existing, &own_errors));
            errors
        }
    };
    errors.extend(binding_errors(&incoming, &own_errors));
    ElementRef::Bad(Arc::new(BadElement::ambiguous(kind, name, errors)))
}

fn binding_errors<Id: Copy>(
    binding: &ElementRef<Id>,
    own_errors: &impl Fn(Id) -> Vec<Diagnostic>,
) -> Vec<Diagnostic> {
    match binding {
        ElementRef::Element(id) => own_errors(*id),
        ElementRef::Bad(bad) => bad.errors().to_vec(),
    }
}
