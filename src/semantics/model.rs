//! The semantic model: arena storage for every wrapper node, the build pass
//! that indexes the declaration trees, and the model-wide validation walk.
//!
//! The model is write-once, read-many: after [`SemanticModel::new`] returns,
//! the registry and declaration trees are immutable and the only mutable
//! state is the cache cells, each written at most once. Multiple threads may
//! read one model concurrently.

use std::sync::Arc;

use rayon::prelude::*;
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::base::{QualifiedName, SourceLocation};
use crate::cache::CacheCell;
use crate::decl::{ContainerElementDecl, Schema, SchemaDeclaration};
use crate::decl::{AssociationDecl, EntityContainerDecl, EntityTypeDecl, ExpressionDecl};
use crate::diagnostics::Diagnostic;
use crate::registry::{Registered, SchemaRegistry};
use crate::semantics::association::AssociationNode;
use crate::semantics::association_set::AssociationSetNode;
use crate::semantics::bad::{BadElement, ElementRef};
use crate::semantics::container::ContainerNode;
use crate::semantics::entity_set::EntitySetNode;
use crate::semantics::entity_type::{EntityTypeNode, NavigationPropertyNode, PropertyNode};
use crate::semantics::expression::ExpressionNode;
use crate::semantics::function_import::FunctionImportNode;
use crate::semantics::{
    Association, AssociationId, AssociationRef, AssociationSet, AssociationSetId, ContainerElement,
    ContainerId, ElementId, ElementKind, EntityContainer, EntitySet, EntitySetId, EntityType,
    EntityTypeId, EntityTypeRef, ExpressionId, FunctionImport, FunctionImportId,
    NavigationProperty, NavigationPropertyId, Property, PropertyId, SemanticExpression,
};

/// A schema-level declaration, in declaration order across all schemas.
enum SchemaMember {
    EntityType(EntityTypeId),
    Association(AssociationId),
    EntityContainer(ContainerId),
}

/// A fully indexed, lazily resolving semantic model.
pub struct SemanticModel {
    registry: SchemaRegistry,
    declaration_order: Vec<SchemaMember>,
    pub(crate) entity_types: Vec<EntityTypeNode>,
    pub(crate) associations: Vec<AssociationNode>,
    pub(crate) containers: Vec<ContainerNode>,
    pub(crate) entity_sets: Vec<EntitySetNode>,
    pub(crate) association_sets: Vec<AssociationSetNode>,
    pub(crate) function_imports: Vec<FunctionImportNode>,
    pub(crate) properties: Vec<PropertyNode>,
    pub(crate) navigation_properties: Vec<NavigationPropertyNode>,
    pub(crate) expressions: Vec<ExpressionNode>,
}

impl SemanticModel {
    /// Builds the model from the parsing collaborator's declaration trees.
    ///
    /// The build only allocates wrapper nodes and the registry; every
    /// resolved property stays unevaluated until first access.
    pub fn new(schemas: Vec<Schema>) -> Self {
        let mut model = Self {
            registry: SchemaRegistry::default(),
            declaration_order: Vec::new(),
            entity_types: Vec::new(),
            associations: Vec::new(),
            containers: Vec::new(),
            entity_sets: Vec::new(),
            association_sets: Vec::new(),
            function_imports: Vec::new(),
            properties: Vec::new(),
            navigation_properties: Vec::new(),
            expressions: Vec::new(),
        };

        for schema in schemas {
            let namespace = schema.namespace.clone();
            for declaration in schema.declarations {
                match declaration {
                    SchemaDeclaration::EntityType(decl) => {
                        model.add_entity_type(&namespace, decl);
                    }
                    SchemaDeclaration::Association(decl) => {
                        model.add_association(&namespace, decl);
                    }
                    SchemaDeclaration::EntityContainer(decl) => {
                        model.add_container(&namespace, decl);
                    }
                }
            }
        }

        debug!(
            "[MODEL] loaded {} entity types, {} associations, {} containers",
            model.entity_types.len(),
            model.associations.len(),
            model.containers.len()
        );
        model
    }

    fn add_entity_type(&mut self, namespace: &SmolStr, decl: EntityTypeDecl) {
        let id = EntityTypeId::new(self.entity_types.len());
        let location = decl.location;
        let name = decl.name.clone();

        let mut own_properties = Vec::new();
        for property in &decl.properties {
            let property_id = PropertyId::new(self.properties.len());
            let default_value = property
                .default_value
                .clone()
                .map(|expression| self.add_expression(expression));
            self.properties.push(PropertyNode {
                owner: id,
                decl: property.clone(),
                default_value,
                resolved_type: CacheCell::new(),
            });
            own_properties.push(property_id);
        }

        let mut own_navigation_properties = Vec::new();
        for navigation in &decl.navigation_properties {
            let navigation_id = NavigationPropertyId::new(self.navigation_properties.len());
            self.navigation_properties.push(NavigationPropertyNode {
                owner: id,
                decl: navigation.clone(),
                association: CacheCell::new(),
            });
            own_navigation_properties.push(navigation_id);
        }

        self.entity_types.push(EntityTypeNode {
            namespace: namespace.clone(),
            decl: Arc::new(decl),
            own_properties,
            own_navigation_properties,
            base_type: CacheCell::new(),
            properties: CacheCell::new(),
            navigation_properties: CacheCell::new(),
            errors: CacheCell::new(),
        });
        self.declaration_order.push(SchemaMember::EntityType(id));
        self.registry.register(
            QualifiedName::new(namespace.clone(), name),
            Registered::EntityType(id),
            location,
        );
    }

    fn add_association(&mut self, namespace: &SmolStr, decl: AssociationDecl) {
        let id = AssociationId::new(self.associations.len());
        let location = decl.location;
        let name = decl.name.clone();

        self.associations.push(AssociationNode {
            namespace: namespace.clone(),
            decl: Arc::new(decl),
            end1_type: CacheCell::new(),
            end2_type: CacheCell::new(),
            errors: CacheCell::new(),
        });
        self.declaration_order.push(SchemaMember::Association(id));
        self.registry.register(
            QualifiedName::new(namespace.clone(), name),
            Registered::Association(id),
            location,
        );
    }

    fn add_container(&mut self, namespace: &SmolStr, decl: EntityContainerDecl) {
        let id = ContainerId::new(self.containers.len());
        let location = decl.location;
        let name = decl.name.clone();

        let mut own_elements = Vec::new();
        for element in &decl.elements {
            match element {
                ContainerElementDecl::EntitySet(set) => {
                    let set_id = EntitySetId::new(self.entity_sets.len());
                    self.entity_sets.push(EntitySetNode {
                        container: id,
                        decl: set.clone(),
                        element_type: CacheCell::new(),
                        errors: CacheCell::new(),
                    });
                    own_elements.push(ElementId::EntitySet(set_id));
                }
                ContainerElementDecl::AssociationSet(set) => {
                    let set_id = AssociationSetId::new(self.association_sets.len());
                    self.association_sets.push(AssociationSetNode {
                        container: id,
                        decl: set.clone(),
                        association: CacheCell::new(),
                        end1_entity_set: CacheCell::new(),
                        end2_entity_set: CacheCell::new(),
                        errors: CacheCell::new(),
                    });
                    own_elements.push(ElementId::AssociationSet(set_id));
                }
                ContainerElementDecl::FunctionImport(import) => {
                    let import_id = FunctionImportId::new(self.function_imports.len());
                    self.function_imports.push(FunctionImportNode {
                        container: id,
                        decl: import.clone(),
                        entity_set: CacheCell::new(),
                        errors: CacheCell::new(),
                    });
                    own_elements.push(ElementId::FunctionImport(import_id));
                }
            }
        }

        self.containers.push(ContainerNode {
            namespace: namespace.clone(),
            decl: Arc::new(decl),
            own_elements,
            extends: CacheCell::new(),
            elements: CacheCell::new(),
            entity_sets_by_name: CacheCell::new(),
            function_imports_by_name: CacheCell::new(),
            association_set_mappings: CacheCell::new(),
            errors: CacheCell::new(),
        });
        self.declaration_order
            .push(SchemaMember::EntityContainer(id));
        self.registry.register(
            QualifiedName::new(namespace.clone(), name),
            Registered::EntityContainer(id),
            location,
        );
    }

    fn add_expression(&mut self, decl: ExpressionDecl) -> ExpressionId {
        let id = ExpressionId::new(self.expressions.len());
        self.expressions.push(ExpressionNode {
            decl,
            value: CacheCell::new(),
            errors: CacheCell::new(),
        });
        id
    }

    // ============================================================
    // Registry access and qualified-name lookups
    // ============================================================

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// The declared entity container with this qualified name, if the name
    /// is bound to exactly one.
    pub fn find_container(&self, name: &QualifiedName) -> Option<EntityContainer<'_>> {
        match self.registry.find_declared(name)? {
            Registered::EntityContainer(id) => Some(self.container(*id)),
            _ => None,
        }
    }

    /// The declared entity type with this qualified name, if the name is
    /// bound to exactly one.
    pub fn find_entity_type(&self, name: &QualifiedName) -> Option<EntityType<'_>> {
        match self.registry.find_declared(name)? {
            Registered::EntityType(id) => Some(self.entity_type(*id)),
            _ => None,
        }
    }

    /// The declared association with this qualified name, if the name is
    /// bound to exactly one.
    pub fn find_association(&self, name: &QualifiedName) -> Option<Association<'_>> {
        match self.registry.find_declared(name)? {
            Registered::Association(id) => Some(self.association(*id)),
            _ => None,
        }
    }

    // ============================================================
    // Arena views
    // ============================================================

    pub fn entity_type(&self, id: EntityTypeId) -> EntityType<'_> {
        EntityType { model: self, id }
    }

    pub fn association(&self, id: AssociationId) -> Association<'_> {
        Association { model: self, id }
    }

    pub fn container(&self, id: ContainerId) -> EntityContainer<'_> {
        EntityContainer { model: self, id }
    }

    pub fn entity_set(&self, id: EntitySetId) -> EntitySet<'_> {
        EntitySet { model: self, id }
    }

    pub fn association_set(&self, id: AssociationSetId) -> AssociationSet<'_> {
        AssociationSet { model: self, id }
    }

    pub fn function_import(&self, id: FunctionImportId) -> FunctionImport<'_> {
        FunctionImport { model: self, id }
    }

    pub fn property(&self, id: PropertyId) -> Property<'_> {
        Property { model: self, id }
    }

    pub fn navigation_property(&self, id: NavigationPropertyId) -> NavigationProperty<'_> {
        NavigationProperty { model: self, id }
    }

    pub fn expression(&self, id: ExpressionId) -> SemanticExpression<'_> {
        SemanticExpression { model: self, id }
    }

    pub(crate) fn container_element(&self, id: ElementId) -> ContainerElement<'_> {
        match id {
            ElementId::EntitySet(id) => ContainerElement::EntitySet(self.entity_set(id)),
            ElementId::AssociationSet(id) => {
                ContainerElement::AssociationSet(self.association_set(id))
            }
            ElementId::FunctionImport(id) => {
                ContainerElement::FunctionImport(self.function_import(id))
            }
        }
    }

    /// All declared entity containers, in declaration order.
    pub fn containers(&self) -> impl Iterator<Item = EntityContainer<'_>> {
        (0..self.containers.len()).map(|index| self.container(ContainerId::new(index)))
    }

    /// All declared entity types, in declaration order.
    pub fn entity_types(&self) -> impl Iterator<Item = EntityType<'_>> {
        (0..self.entity_types.len()).map(|index| self.entity_type(EntityTypeId::new(index)))
    }

    /// All declared associations, in declaration order.
    pub fn associations(&self) -> impl Iterator<Item = Association<'_>> {
        (0..self.associations.len()).map(|index| self.association(AssociationId::new(index)))
    }

    // ============================================================
    // Shared reference resolution
    // ============================================================

    pub(crate) fn resolve_entity_type(
        &self,
        target: &str,
        location: SourceLocation,
    ) -> EntityTypeRef {
        trace!("[RESOLVE] entity type '{}'", target);
        let unresolved = || {
            ElementRef::Bad(Arc::new(BadElement::unresolved(
                ElementKind::EntityType,
                target,
                location,
            )))
        };
        let Ok(qualified_name) = target.parse::<QualifiedName>() else {
            return unresolved();
        };
        match self.registry.find_declared(&qualified_name) {
            Some(Registered::EntityType(id)) => ElementRef::Element(*id),
            Some(Registered::Ambiguous(bad)) => ElementRef::Bad(bad.clone()),
            _ => unresolved(),
        }
    }

    pub(crate) fn resolve_association(
        &self,
        target: &str,
        location: SourceLocation,
    ) -> AssociationRef {
        trace!("[RESOLVE] association '{}'", target);
        let unresolved = || {
            ElementRef::Bad(Arc::new(BadElement::unresolved(
                ElementKind::Association,
                target,
                location,
            )))
        };
        let Ok(qualified_name) = target.parse::<QualifiedName>() else {
            return unresolved();
        };
        match self.registry.find_declared(&qualified_name) {
            Some(Registered::Association(id)) => ElementRef::Element(*id),
            Some(Registered::Ambiguous(bad)) => ElementRef::Bad(bad.clone()),
            _ => unresolved(),
        }
    }

    // ============================================================
    // Validation
    // ============================================================

    /// Walks every schema-level declaration in declaration order and
    /// concatenates its diagnostics.
    ///
    /// An empty result means the model is structurally valid. A non-empty
    /// result flags which parts are untrustworthy; it never prevents further
    /// use of the model.
    pub fn validate(&self) -> Vec<Diagnostic> {
        // Resolve every inheritance chain first, on this thread. Cycles are
        // sealed at their entry nodes here, so the parallel walk below only
        // ever waits on acyclic work.
        for member in &self.declaration_order {
            match member {
                SchemaMember::EntityType(id) => {
                    let _ = self.entity_type(*id).base_type();
                }
                SchemaMember::EntityContainer(id) => {
                    let _ = self.container(*id).extends();
                }
                SchemaMember::Association(_) => {}
            }
        }

        let per_member: Vec<Vec<Diagnostic>> = self
            .declaration_order
            .par_iter()
            .map(|member| match member {
                SchemaMember::EntityType(id) => self.entity_type(*id).errors().to_vec(),
                SchemaMember::Association(id) => self.association(*id).errors().to_vec(),
                SchemaMember::EntityContainer(id) => self.container(*id).errors().to_vec(),
            })
            .collect();
        per_member.into_iter().flatten().collect()
    }
}
