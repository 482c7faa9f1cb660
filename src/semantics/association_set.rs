//! Association set semantics: binding an association's roles to entity sets
//! of the owning container.

use std::sync::Arc;

use tracing::trace;

use crate::base::{QualifiedName, SourceLocation};
use crate::cache::CacheCell;
use crate::decl::{AssociationSetDecl, AssociationSetEndDecl};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::semantics::bad::{BadElement, ElementRef};
use crate::semantics::model::SemanticModel;
use crate::semantics::{
    AssociationEnd, AssociationRef, AssociationSetId, ContainerId, ElementKind, EndSlot,
    EntityContainer, EntitySetRef,
};

pub(crate) struct AssociationSetNode {
    pub(crate) container: ContainerId,
    pub(crate) decl: AssociationSetDecl,
    pub(crate) association: CacheCell<AssociationRef>,
    pub(crate) end1_entity_set: CacheCell<EntitySetRef>,
    pub(crate) end2_entity_set: CacheCell<EntitySetRef>,
    pub(crate) errors: CacheCell<Arc<[Diagnostic]>>,
}

/// Semantic view of one association set.
#[derive(Clone, Copy)]
pub struct AssociationSet<'a> {
    pub(crate) model: &'a SemanticModel,
    pub(crate) id: AssociationSetId,
}

impl<'a> AssociationSet<'a> {
    fn node(&self) -> &'a AssociationSetNode {
        &self.model.association_sets[self.id.index()]
    }

    pub fn id(&self) -> AssociationSetId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.node().decl.name
    }

    pub fn kind(&self) -> ElementKind {
        ElementKind::AssociationSet
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

    /// The association this set instantiates.
    pub fn association(&self) -> AssociationRef {
        let node = self.node();
        node.association.get_or_compute(|| {
            trace!(
                "[ASSOCIATION_SET] resolving association '{}' for '{}'",
                node.decl.association,
                node.decl.name
            );
            self.model
                .resolve_association(&node.decl.association, node.decl.location)
        })
    }

    pub fn end1(&self) -> AssociationSetEnd<'a> {
        AssociationSetEnd {
            model: self.model,
            set: self.id,
            slot: EndSlot::First,
        }
    }

    pub fn end2(&self) -> AssociationSetEnd<'a> {
        AssociationSetEnd {
            model: self.model,
            set: self.id,
            slot: EndSlot::Second,
        }
    }

    pub fn end_with_role(&self, role: &str) -> Option<AssociationSetEnd<'a>> {
        if self.node().decl.end1.role == role {
            Some(self.end1())
        } else if self.node().decl.end2.role == role {
            Some(self.end2())
        } else {
            None
        }
    }

    /// Own diagnostics: an unresolved or ambiguous association reference.
    /// End problems are the ends' own; aggregation consults them only when
    /// this sequence is empty.
    pub fn errors(&self) -> Arc<[Diagnostic]> {
        self.node()
            .errors
            .get_or_compute(|| self.association().errors().to_vec().into())
    }
}

/// Semantic view of one association set end.
#[derive(Clone, Copy)]
pub struct AssociationSetEnd<'a> {
    pub(crate) model: &'a SemanticModel,
    pub(crate) set: AssociationSetId,
    pub(crate) slot: EndSlot,
}

impl<'a> AssociationSetEnd<'a> {
    fn node(&self) -> &'a AssociationSetNode {
        &self.model.association_sets[self.set.index()]
    }

    fn decl(&self) -> &'a AssociationSetEndDecl {
        match self.slot {
            EndSlot::First => &self.node().decl.end1,
            EndSlot::Second => &self.node().decl.end2,
        }
    }

    pub fn role(&self) -> &'a str {
        &self.decl().role
    }

    pub fn association_set(&self) -> AssociationSet<'a> {
        self.model.association_set(self.set)
    }

    /// The association end this set end instantiates, matched by role.
    pub fn association_end(&self) -> Option<AssociationEnd<'a>> {
        let association = self.association_set().association().element()?;
        self.model.association(association).end_with_role(self.role())
    }

    /// The entity set bound at this end, looked up by simple name in the
    /// owning container.
    pub fn entity_set(&self) -> EntitySetRef {
        let node = self.node();
        let cell = match self.slot {
            EndSlot::First => &node.end1_entity_set,
            EndSlot::Second => &node.end2_entity_set,
        };
        let decl = self.decl();
        cell.get_or_compute(|| {
            let container = self.association_set().container();
            match container.find_entity_set(&decl.entity_set) {
                Some(set) => set,
                None => ElementRef::Bad(Arc::new(BadElement::unresolved(
                    ElementKind::EntitySet,
                    &decl.entity_set,
                    decl.location,
                ))),
            }
        })
    }

    /// Own diagnostics: an unresolved or ambiguous entity set binding, plus
    /// a role the resolved association does not declare.
    pub fn errors(&self) -> Arc<[Diagnostic]> {
        let mut errors: Vec<Diagnostic> = Vec::new();
        errors.extend_from_slice(self.entity_set().errors());
        let set = self.association_set();
        if let ElementRef::Element(association) = set.association() {
            if self.association_end().is_none() {
                errors.push(Diagnostic::new(
                    self.decl().location,
                    DiagnosticCode::StructuralError,
                    format!(
                        "association '{}' has no end with role '{}'",
                        self.model.association(association).qualified_name(),
                        self.role()
                    ),
                ));
            }
        }
        errors.into()
    }
}
