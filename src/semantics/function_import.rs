//! Function import semantics. Imports sharing a name form an overload set;
//! disambiguating between overloads is left to callers.

use std::sync::Arc;

use crate::base::{QualifiedName, SourceLocation};
use crate::cache::CacheCell;
use crate::decl::{FunctionImportDecl, FunctionParameterDecl};
use crate::diagnostics::Diagnostic;
use crate::semantics::bad::{BadElement, ElementRef};
use crate::semantics::model::SemanticModel;
use crate::semantics::{ContainerId, ElementKind, EntityContainer, EntitySetRef, FunctionImportId};

pub(crate) struct FunctionImportNode {
    pub(crate) container: ContainerId,
    pub(crate) decl: FunctionImportDecl,
    pub(crate) entity_set: CacheCell<EntitySetRef>,
    pub(crate) errors: CacheCell<Arc<[Diagnostic]>>,
}

/// Semantic view of one function import.
#[derive(Clone, Copy)]
pub struct FunctionImport<'a> {
    pub(crate) model: &'a SemanticModel,
    pub(crate) id: FunctionImportId,
}

impl<'a> FunctionImport<'a> {
    fn node(&self) -> &'a FunctionImportNode {
        &self.model.function_imports[self.id.index()]
    }

    pub fn id(&self) -> FunctionImportId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.node().decl.name
    }

    pub fn kind(&self) -> ElementKind {
        ElementKind::FunctionImport
    }

    pub fn location(&self) -> SourceLocation {
        self.node().decl.location
    }

    pub fn container(&self) -> EntityContainer<'a> {
        self.model.container(self.node().container)
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(self.container().namespace(), self.name())
    }

    pub fn return_type(&self) -> Option<&'a str> {
        self.node().decl.return_type.as_deref()
    }

    pub fn parameters(&self) -> &'a [FunctionParameterDecl] {
        &self.node().decl.parameters
    }

    /// The entity set the results belong to, when declared. Bound by simple
    /// name in the owning container.
    pub fn entity_set(&self) -> Option<EntitySetRef> {
        let node = self.node();
        let name = node.decl.entity_set.as_ref()?;
        Some(node.entity_set.get_or_compute(|| {
            match self.container().find_entity_set(name) {
                Some(set) => set,
                None => ElementRef::Bad(Arc::new(BadElement::unresolved(
                    ElementKind::EntitySet,
                    name,
                    node.decl.location,
                ))),
            }
        }))
    }

    /// Own diagnostics: an unresolved or ambiguous entity set binding.
    pub fn errors(&self) -> Arc<[Diagnostic]> {
        self.node().errors.get_or_compute(|| {
            match self.entity_set() {
                Some(binding) => binding.errors().to_vec().into(),
                None => Vec::new().into(),
            }
        })
    }
}
