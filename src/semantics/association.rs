//! Association semantics: a named, two-ended relationship whose ends bind
//! entity types by qualified name.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{QualifiedName, SourceLocation};
use crate::cache::CacheCell;
use crate::decl::{AssociationDecl, AssociationEndDecl, Multiplicity};
use crate::diagnostics::Diagnostic;
use crate::semantics::model::SemanticModel;
use crate::semantics::{AssociationId, ElementKind, EndSlot, EntityTypeRef};

pub(crate) struct AssociationNode {
    pub(crate) namespace: SmolStr,
    pub(crate) decl: Arc<AssociationDecl>,
    pub(crate) end1_type: CacheCell<EntityTypeRef>,
    pub(crate) end2_type: CacheCell<EntityTypeRef>,
    pub(crate) errors: CacheCell<Arc<[Diagnostic]>>,
}

/// Semantic view of one association.
#[derive(Clone, Copy)]
pub struct Association<'a> {
    pub(crate) model: &'a SemanticModel,
    pub(crate) id: AssociationId,
}

impl<'a> Association<'a> {
    fn node(&self) -> &'a AssociationNode {
        &self.model.associations[self.id.index()]
    }

    pub fn id(&self) -> AssociationId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.node().decl.name
    }

    pub fn namespace(&self) -> &'a str {
        &self.node().namespace
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(self.namespace(), self.name())
    }

    pub fn kind(&self) -> ElementKind {
        ElementKind::Association
    }

    pub fn location(&self) -> SourceLocation {
        self.node().decl.location
    }

    pub fn end1(&self) -> AssociationEnd<'a> {
        AssociationEnd {
            model: self.model,
            association: self.id,
            slot: EndSlot::First,
        }
    }

    pub fn end2(&self) -> AssociationEnd<'a> {
        AssociationEnd {
            model: self.model,
            association: self.id,
            slot: EndSlot::Second,
        }
    }

    pub fn end_with_role(&self, role: &str) -> Option<AssociationEnd<'a>> {
        if self.node().decl.end1.role == role {
            Some(self.end1())
        } else if self.node().decl.end2.role == role {
            Some(self.end2())
        } else {
            None
        }
    }

    /// Aggregated diagnostics: each end's unresolved-type problems, in end
    /// order.
    pub fn errors(&self) -> Arc<[Diagnostic]> {
        self.node().errors.get_or_compute(|| {
            let mut errors: Vec<Diagnostic> = Vec::new();
            errors.extend_from_slice(&self.end1().errors());
            errors.extend_from_slice(&self.end2().errors());
            errors.into()
        })
    }
}

/// Semantic view of one association end.
#[derive(Clone, Copy)]
pub struct AssociationEnd<'a> {
    pub(crate) model: &'a SemanticModel,
    pub(crate) association: AssociationId,
    pub(crate) slot: EndSlot,
}

impl<'a> AssociationEnd<'a> {
    fn node(&self) -> &'a AssociationNode {
        &self.model.associations[self.association.index()]
    }

    fn decl(&self) -> &'a AssociationEndDecl {
        match self.slot {
            EndSlot::First => &self.node().decl.end1,
            EndSlot::Second => &self.node().decl.end2,
        }
    }

    pub fn role(&self) -> &'a str {
        &self.decl().role
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.decl().multiplicity
    }

    pub fn association(&self) -> Association<'a> {
        self.model.association(self.association)
    }

    /// The entity type at this end.
    pub fn entity_type(&self) -> EntityTypeRef {
        let node = self.node();
        let cell = match self.slot {
            EndSlot::First => &node.end1_type,
            EndSlot::Second => &node.end2_type,
        };
        let decl = self.decl();
        cell.get_or_compute(|| {
            self.model
                .resolve_entity_type(&decl.entity_type, decl.location)
        })
    }

    /// Own diagnostics: an unresolved entity type.
    pub fn errors(&self) -> Arc<[Diagnostic]> {
        self.entity_type().errors().to_vec().into()
    }
}
