//! Entity set semantics: element-type resolution and navigation targets.

use std::sync::Arc;

use crate::base::{QualifiedName, SourceLocation};
use crate::cache::CacheCell;
use crate::decl::EntitySetDecl;
use crate::diagnostics::Diagnostic;
use crate::semantics::model::SemanticModel;
use crate::semantics::{
    ContainerId, ElementKind, EntityContainer, EntitySetId, EntitySetRef, EntityTypeRef,
    NavigationProperty,
};

pub(crate) struct EntitySetNode {
    pub(crate) container: ContainerId,
    pub(crate) decl: EntitySetDecl,
    pub(crate) element_type: CacheCell<EntityTypeRef>,
    pub(crate) errors: CacheCell<Arc<[Diagnostic]>>,
}

/// Semantic view of one entity set.
#[derive(Clone, Copy)]
pub struct EntitySet<'a> {
    pub(crate) model: &'a SemanticModel,
    pub(crate) id: EntitySetId,
}

impl<'a> EntitySet<'a> {
    fn node(&self) -> &'a EntitySetNode {
        &self.model.entity_sets[self.id.index()]
    }

    pub fn id(&self) -> EntitySetId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.node().decl.name
    }

    pub fn kind(&self) -> ElementKind {
        ElementKind::EntitySet
    }

    pub fn location(&self) -> SourceLocation {
        self.node().decl.location
    }

    /// The container that declared this set.
    pub fn container(&self) -> EntityContainer<'a> {
        self.model.container(self.node().container)
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(self.container().namespace(), self.name())
    }

    /// The entity type of this set's members.
    pub fn element_type(&self) -> EntityTypeRef {
        let node = self.node();
        node.element_type.get_or_compute(|| {
            self.model
                .resolve_entity_type(&node.decl.entity_type, node.decl.location)
        })
    }

    /// Own diagnostics: an unresolved element type.
    pub fn errors(&self) -> Arc<[Diagnostic]> {
        self.node()
            .errors
            .get_or_compute(|| self.element_type().errors().to_vec().into())
    }

    /// Resolves the entity set a navigation property leads to, through the
    /// owning container's association sets: the set whose end at the
    /// navigation's source role binds this entity set supplies the target
    /// role's binding.
    pub fn find_navigation_target(
        &self,
        navigation: NavigationProperty<'a>,
    ) -> Option<EntitySetRef> {
        let association = navigation.association().element()?;
        let container = self.container();
        for set in container.find_association_sets(association) {
            let Some(from_end) = set.end_with_role(navigation.from_role()) else {
                continue;
            };
            if from_end.entity_set().element() != Some(self.id) {
                continue;
            }
            if let Some(to_end) = set.end_with_role(navigation.to_role()) {
                return Some(to_end.entity_set());
            }
        }
        None
    }
}
