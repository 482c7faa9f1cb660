//! Entity container semantics: `extends` resolution, element flattening,
//! and the per-container lookup dictionaries.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::trace;

use crate::base::{QualifiedName, SourceLocation};
use crate::cache::CacheCell;
use crate::decl::EntityContainerDecl;
use crate::diagnostics::Diagnostic;
use crate::registry::Registered;
use crate::semantics::bad::{BadElement, ElementRef};
use crate::semantics::model::SemanticModel;
use crate::semantics::{
    AssociationId, AssociationSet, AssociationSetId, ContainerId, ContainerRef, ElementId,
    ElementKind, EntitySet, EntitySetRef, FunctionImport, FunctionImportId, registration,
};

pub(crate) struct ContainerNode {
    pub(crate) namespace: SmolStr,
    pub(crate) decl: Arc<EntityContainerDecl>,
    /// Directly declared members, in declared order.
    pub(crate) own_elements: Vec<ElementId>,
    pub(crate) extends: CacheCell<ContainerRef>,
    pub(crate) elements: CacheCell<Arc<[ElementId]>>,
    pub(crate) entity_sets_by_name: CacheCell<Arc<IndexMap<SmolStr, EntitySetRef>>>,
    pub(crate) function_imports_by_name: CacheCell<Arc<IndexMap<SmolStr, Vec<FunctionImportId>>>>,
    pub(crate) association_set_mappings: CacheCell<Arc<FxHashMap<AssociationId, Vec<AssociationSetId>>>>,
    pub(crate) errors: CacheCell<Arc<[Diagnostic]>>,
}

/// Semantic view of one entity container.
#[derive(Clone, Copy)]
pub struct EntityContainer<'a> {
    pub(crate) model: &'a SemanticModel,
    pub(crate) id: ContainerId,
}

impl<'a> EntityContainer<'a> {
    fn node(&self) -> &'a ContainerNode {
        &self.model.containers[self.id.index()]
    }

    pub fn id(&self) -> ContainerId {
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
        ElementKind::EntityContainer
    }

    pub fn location(&self) -> SourceLocation {
        self.node().decl.location
    }

    /// The container this one extends, if declared.
    ///
    /// An undeclared target yields an Unresolved sentinel; a cyclic
    /// `extends` chain seals this slot with a Cyclic sentinel at the node
    /// where the cycle re-entered, which is what keeps every derived
    /// property of the chain finite.
    pub fn extends(&self) -> Option<ContainerRef> {
        let node = self.node();
        let target = node.decl.extends.as_ref()?;
        Some(node.extends.get_or_compute_cyclic(
            || self.compute_extends(target),
            || {
                let qualified_name = self.qualified_name();
                trace!("[EXTENDS] cycle re-entered entity container '{qualified_name}'");
                ElementRef::Bad(Arc::new(BadElement::cyclic(
                    ElementKind::EntityContainer,
                    &qualified_name.to_string(),
                    node.decl.location,
                )))
            },
        ))
    }

    fn compute_extends(&self, target: &str) -> ContainerRef {
        trace!(
            "[EXTENDS] resolving '{}' for entity container '{}'",
            target,
            self.name()
        );
        let unresolved = || {
            ElementRef::Bad(Arc::new(BadElement::unresolved(
                ElementKind::EntityContainer,
                target,
                self.location(),
            )))
        };
        let Ok(qualified_name) = target.parse::<QualifiedName>() else {
            return unresolved();
        };
        match self.model.registry().find_declared(&qualified_name) {
            Some(Registered::EntityContainer(base)) => {
                let base = self.model.container(*base);
                // Evaluate the inductive step so a cycle of any length
                // surfaces as reentry into the entry node's own cell.
                let _ = base.extends();
                ElementRef::Element(base.id())
            }
            Some(Registered::Ambiguous(bad)) => ElementRef::Bad(bad.clone()),
            _ => unresolved(),
        }
    }

    pub(crate) fn element_ids(&self) -> Arc<[ElementId]> {
        self.node()
            .elements
            .get_or_compute(|| self.compute_element_ids())
    }

    fn compute_element_ids(&self) -> Arc<[ElementId]> {
        let node = self.node();
        let mut elements = Vec::new();
        // A bad base (unresolved, cyclic, ambiguous) contributes no members.
        if let Some(ElementRef::Element(base)) = self.extends() {
            elements.extend_from_slice(&self.model.container(base).element_ids());
        }
        elements.extend_from_slice(&node.own_elements);
        elements.into()
    }

    /// The flattened member sequence: the base container's elements (already
    /// flattened, in declared order) followed by the directly declared ones.
    /// Same-name collisions survive here; the lookup dictionaries fold them.
    pub fn elements(&self) -> Vec<ContainerElement<'a>> {
        let ids = self.element_ids();
        ids.iter().map(|id| self.model.container_element(*id)).collect()
    }

    fn entity_set_dictionary(&self) -> Arc<IndexMap<SmolStr, EntitySetRef>> {
        self.node()
            .entity_sets_by_name
            .get_or_compute(|| self.compute_entity_set_dictionary())
    }

    fn compute_entity_set_dictionary(&self) -> Arc<IndexMap<SmolStr, EntitySetRef>> {
        let mut sets: IndexMap<SmolStr, EntitySetRef> = IndexMap::new();
        let ids = self.element_ids();
        for id in ids.iter() {
            let ElementId::EntitySet(set_id) = id else {
                continue;
            };
            let set = self.model.entity_set(*set_id);
            registration::add_element(
                &mut sets,
                set.name(),
                ElementRef::Element(*set_id),
                |existing, incoming| {
                    registration::ambiguate(
                        ElementKind::EntitySet,
                        set.name(),
                        set.location(),
                        existing,
                        incoming,
                        |id| self.model.entity_set(id).errors().to_vec(),
                    )
                },
            );
        }
        Arc::new(sets)
    }

    /// Looks up an entity set by simple name. A duplicated name yields the
    /// single Ambiguous sentinel it collapsed into.
    pub fn find_entity_set(&self, name: &str) -> Option<EntitySetRef> {
        self.entity_set_dictionary().get(name).cloned()
    }

    fn function_import_dictionary(&self) -> Arc<IndexMap<SmolStr, Vec<FunctionImportId>>> {
        self.node()
            .function_imports_by_name
            .get_or_compute(|| self.compute_function_import_dictionary())
    }

    fn compute_function_import_dictionary(&self) -> Arc<IndexMap<SmolStr, Vec<FunctionImportId>>> {
        let mut imports: IndexMap<SmolStr, Vec<FunctionImportId>> = IndexMap::new();
        let ids = self.element_ids();
        for id in ids.iter() {
            let ElementId::FunctionImport(import_id) = id else {
                continue;
            };
            let import = self.model.function_import(*import_id);
            registration::add_function_import(&mut imports, import.name(), *import_id);
        }
        Arc::new(imports)
    }

    /// Function imports sharing `name`, in declaration order. Several
    /// imports with one name are a valid overload set.
    pub fn find_function_imports(&self, name: &str) -> Vec<FunctionImport<'a>> {
        self.function_import_dictionary()
            .get(name)
            .map(|ids| ids.iter().map(|id| self.model.function_import(*id)).collect())
            .unwrap_or_default()
    }

    fn association_set_mappings(&self) -> Arc<FxHashMap<AssociationId, Vec<AssociationSetId>>> {
        self.node()
            .association_set_mappings
            .get_or_compute(|| self.compute_association_set_mappings())
    }

    fn compute_association_set_mappings(
        &self,
    ) -> Arc<FxHashMap<AssociationId, Vec<AssociationSetId>>> {
        let mut mappings: FxHashMap<AssociationId, Vec<AssociationSetId>> = FxHashMap::default();
        let ids = self.element_ids();
        for id in ids.iter() {
            let ElementId::AssociationSet(set_id) = id else {
                continue;
            };
            // Sets with a bad association are reachable by name only.
            if let ElementRef::Element(association) =
                self.model.association_set(*set_id).association()
            {
                mappings.entry(association).or_default().push(*set_id);
            }
        }
        Arc::new(mappings)
    }

    /// The association sets of this container instantiating `association`.
    pub fn find_association_sets(&self, association: AssociationId) -> Vec<AssociationSet<'a>> {
        self.association_set_mappings()
            .get(&association)
            .map(|ids| ids.iter().map(|id| self.model.association_set(*id)).collect())
            .unwrap_or_default()
    }

    /// Aggregated diagnostics: a bad base reference first, then each member
    /// in flattened order. A member that reports no diagnostics of its own
    /// is additionally checked for diagnostics on its referenced ends.
    pub fn errors(&self) -> Arc<[Diagnostic]> {
        self.node().errors.get_or_compute(|| self.compute_errors())
    }

    fn compute_errors(&self) -> Arc<[Diagnostic]> {
        let mut errors: Vec<Diagnostic> = Vec::new();
        if let Some(extends) = self.extends() {
            errors.extend_from_slice(extends.errors());
        }
        for element in self.elements() {
            let own = element.errors();
            errors.extend(own.iter().cloned());
            if own.is_empty() {
                if let ContainerElement::AssociationSet(set) = element {
                    errors.extend_from_slice(&set.end1().errors());
                    errors.extend_from_slice(&set.end2().errors());
                }
            }
        }
        errors.into()
    }
}

// ============================================================================
// CONTAINER ELEMENTS
// ============================================================================

/// One member of a container's flattened element sequence.
#[derive(Clone, Copy)]
pub enum ContainerElement<'a> {
    EntitySet(EntitySet<'a>),
    AssociationSet(AssociationSet<'a>),
    FunctionImport(FunctionImport<'a>),
}

impl<'a> ContainerElement<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            ContainerElement::EntitySet(set) => set.name(),
            ContainerElement::AssociationSet(set) => set.name(),
            ContainerElement::FunctionImport(import) => import.name(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ContainerElement::EntitySet(_) => ElementKind::EntitySet,
            ContainerElement::AssociationSet(_) => ElementKind::AssociationSet,
            ContainerElement::FunctionImport(_) => ElementKind::FunctionImport,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            ContainerElement::EntitySet(set) => set.location(),
            ContainerElement::AssociationSet(set) => set.location(),
            ContainerElement::FunctionImport(import) => import.location(),
        }
    }

    pub fn errors(&self) -> Arc<[Diagnostic]> {
        match self {
            ContainerElement::EntitySet(set) => set.errors(),
            ContainerElement::AssociationSet(set) => set.errors(),
            ContainerElement::FunctionImport(import) => import.errors(),
        }
    }
}
