//! Entity type semantics: base-type resolution, property flattening, and
//! property/navigation reference resolution.

use std::sync::Arc;

use smol_str::SmolStr;
use tracing::trace;

use crate::base::{QualifiedName, SourceLocation};
use crate::cache::CacheCell;
use crate::decl::{EntityTypeDecl, NavigationPropertyDecl, PropertyDecl};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::registry::Registered;
use crate::semantics::bad::{BadElement, ElementRef};
use crate::semantics::model::SemanticModel;
use crate::semantics::{
    AssociationEnd, AssociationRef, ElementKind, EntityTypeId, EntityTypeRef, ExpressionId,
    NavigationPropertyId, PropertyId, SemanticExpression,
};

pub(crate) struct EntityTypeNode {
    pub(crate) namespace: SmolStr,
    pub(crate) decl: Arc<EntityTypeDecl>,
    pub(crate) own_properties: Vec<PropertyId>,
    pub(crate) own_navigation_properties: Vec<NavigationPropertyId>,
    pub(crate) base_type: CacheCell<EntityTypeRef>,
    pub(crate) properties: CacheCell<Arc<[PropertyId]>>,
    pub(crate) navigation_properties: CacheCell<Arc<[NavigationPropertyId]>>,
    pub(crate) errors: CacheCell<Arc<[Diagnostic]>>,
}

/// Semantic view of one entity type.
#[derive(Clone, Copy)]
pub struct EntityType<'a> {
    pub(crate) model: &'a SemanticModel,
    pub(crate) id: EntityTypeId,
}

impl<'a> EntityType<'a> {
    fn node(&self) -> &'a EntityTypeNode {
        &self.model.entity_types[self.id.index()]
    }

    pub fn id(&self) -> EntityTypeId {
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
        ElementKind::EntityType
    }

    pub fn location(&self) -> SourceLocation {
        self.node().decl.location
    }

    /// The base type, if the declaration extends one. Cycles seal the slot
    /// of the node where the chain re-entered with a Cyclic sentinel.
    pub fn base_type(&self) -> Option<EntityTypeRef> {
        let node = self.node();
        let target = node.decl.base_type.as_ref()?;
        Some(node.base_type.get_or_compute_cyclic(
            || self.compute_base_type(target),
            || {
                let qualified_name = self.qualified_name();
                trace!("[BASE_TYPE] cycle re-entered entity type '{qualified_name}'");
                ElementRef::Bad(Arc::new(BadElement::cyclic(
                    ElementKind::EntityType,
                    &qualified_name.to_string(),
                    node.decl.location,
                )))
            },
        ))
    }

    fn compute_base_type(&self, target: &str) -> EntityTypeRef {
        trace!(
            "[BASE_TYPE] resolving '{}' for entity type '{}'",
            target,
            self.name()
        );
        let unresolved = || {
            ElementRef::Bad(Arc::new(BadElement::unresolved(
                ElementKind::EntityType,
                target,
                self.location(),
            )))
        };
        let Ok(qualified_name) = target.parse::<QualifiedName>() else {
            return unresolved();
        };
        match self.model.registry().find_declared(&qualified_name) {
            Some(Registered::EntityType(base)) => {
                let base = self.model.entity_type(*base);
                // Evaluate the inductive step to surface cycles as reentry.
                let _ = base.base_type();
                ElementRef::Element(base.id())
            }
            Some(Registered::Ambiguous(bad)) => ElementRef::Bad(bad.clone()),
            _ => unresolved(),
        }
    }

    pub(crate) fn property_ids(&self) -> Arc<[PropertyId]> {
        self.node()
            .properties
            .get_or_compute(|| self.compute_property_ids())
    }

    fn compute_property_ids(&self) -> Arc<[PropertyId]> {
        let node = self.node();
        let mut properties = Vec::new();
        if let Some(ElementRef::Element(base)) = self.base_type() {
            properties.extend_from_slice(&self.model.entity_type(base).property_ids());
        }
        properties.extend_from_slice(&node.own_properties);
        properties.into()
    }

    /// Flattened structural properties: the base type's (already flattened)
    /// followed by the directly declared ones, in declared order.
    pub fn properties(&self) -> Vec<Property<'a>> {
        let ids = self.property_ids();
        ids.iter().map(|id| self.model.property(*id)).collect()
    }

    /// Finds a flattened property by name; a redeclared name finds the
    /// derived type's occurrence (last declared wins).
    pub fn find_property(&self, name: &str) -> Option<Property<'a>> {
        self.properties()
            .into_iter()
            .rev()
            .find(|property| property.name() == name)
    }

    pub(crate) fn navigation_property_ids(&self) -> Arc<[NavigationPropertyId]> {
        self.node()
            .navigation_properties
            .get_or_compute(|| self.compute_navigation_property_ids())
    }

    fn compute_navigation_property_ids(&self) -> Arc<[NavigationPropertyId]> {
        let node = self.node();
        let mut navigations = Vec::new();
        if let Some(ElementRef::Element(base)) = self.base_type() {
            navigations.extend_from_slice(&self.model.entity_type(base).navigation_property_ids());
        }
        navigations.extend_from_slice(&node.own_navigation_properties);
        navigations.into()
    }

    pub fn navigation_properties(&self) -> Vec<NavigationProperty<'a>> {
        let ids = self.navigation_property_ids();
        ids.iter()
            .map(|id| self.model.navigation_property(*id))
            .collect()
    }

    /// Aggregated diagnostics: a bad base reference first, then each
    /// flattened property and navigation property in declared order.
    pub fn errors(&self) -> Arc<[Diagnostic]> {
        self.node().errors.get_or_compute(|| self.compute_errors())
    }

    fn compute_errors(&self) -> Arc<[Diagnostic]> {
        let mut errors: Vec<Diagnostic> = Vec::new();
        if let Some(base) = self.base_type() {
            errors.extend_from_slice(base.errors());
        }
        for property in self.properties() {
            errors.extend_from_slice(&property.errors());
        }
        for navigation in self.navigation_properties() {
            errors.extend_from_slice(&navigation.errors());
        }
        errors.into()
    }
}

// ============================================================================
// PROPERTY TYPES
// ============================================================================

/// The EDM primitive types a structural property may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveKind {
    Binary,
    Boolean,
    Byte,
    DateTime,
    DateTimeOffset,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    String,
    Time,
}

impl PrimitiveKind {
    /// Parses a full `Edm.*` type name.
    pub fn parse(type_name: &str) -> Option<Self> {
        let name = type_name.strip_prefix("Edm.")?;
        Some(match name {
            "Binary" => PrimitiveKind::Binary,
            "Boolean" => PrimitiveKind::Boolean,
            "Byte" => PrimitiveKind::Byte,
            "DateTime" => PrimitiveKind::DateTime,
            "DateTimeOffset" => PrimitiveKind::DateTimeOffset,
            "Decimal" => PrimitiveKind::Decimal,
            "Double" => PrimitiveKind::Double,
            "Guid" => PrimitiveKind::Guid,
            "Int16" => PrimitiveKind::Int16,
            "Int32" => PrimitiveKind::Int32,
            "Int64" => PrimitiveKind::Int64,
            "SByte" => PrimitiveKind::SByte,
            "Single" => PrimitiveKind::Single,
            "String" => PrimitiveKind::String,
            "Time" => PrimitiveKind::Time,
            _ => return None,
        })
    }
}

/// A resolved property type: a primitive, a declared entity type, or a
/// sentinel for an unknown type name.
#[derive(Clone, Debug)]
pub enum PropertyTypeRef {
    Primitive(PrimitiveKind),
    Entity(EntityTypeId),
    Bad(Arc<BadElement>),
}

impl PropertyTypeRef {
    pub fn is_bad(&self) -> bool {
        matches!(self, PropertyTypeRef::Bad(_))
    }

    pub fn errors(&self) -> &[Diagnostic] {
        match self {
            PropertyTypeRef::Bad(bad) => bad.errors(),
            _ => &[],
        }
    }
}

// ============================================================================
// STRUCTURAL PROPERTIES
// ============================================================================

pub(crate) struct PropertyNode {
    pub(crate) owner: EntityTypeId,
    pub(crate) decl: PropertyDecl,
    pub(crate) default_value: Option<ExpressionId>,
    pub(crate) resolved_type: CacheCell<PropertyTypeRef>,
}

/// Semantic view of one structural property.
#[derive(Clone, Copy)]
pub struct Property<'a> {
    pub(crate) model: &'a SemanticModel,
    pub(crate) id: PropertyId,
}

impl<'a> Property<'a> {
    fn node(&self) -> &'a PropertyNode {
        &self.model.properties[self.id.index()]
    }

    pub fn name(&self) -> &'a str {
        &self.node().decl.name
    }

    pub fn kind(&self) -> ElementKind {
        ElementKind::Property
    }

    pub fn location(&self) -> SourceLocation {
        self.node().decl.location
    }

    pub fn nullable(&self) -> bool {
        self.node().decl.nullable
    }

    pub fn declaring_type(&self) -> EntityType<'a> {
        self.model.entity_type(self.node().owner)
    }

    /// The resolved type: an `Edm.*` primitive or a declared entity type.
    pub fn property_type(&self) -> PropertyTypeRef {
        let node = self.node();
        node.resolved_type
            .get_or_compute(|| self.compute_property_type())
    }

    fn compute_property_type(&self) -> PropertyTypeRef {
        let decl = &self.node().decl;
        if let Some(primitive) = PrimitiveKind::parse(&decl.type_name) {
            return PropertyTypeRef::Primitive(primitive);
        }
        if decl.type_name.starts_with("Edm.") {
            // Unknown primitive name; there is nothing to look up.
            return PropertyTypeRef::Bad(Arc::new(BadElement::unresolved(
                ElementKind::EntityType,
                &decl.type_name,
                decl.location,
            )));
        }
        match self.model.resolve_entity_type(&decl.type_name, decl.location) {
            ElementRef::Element(id) => PropertyTypeRef::Entity(id),
            ElementRef::Bad(bad) => PropertyTypeRef::Bad(bad),
        }
    }

    pub fn default_value(&self) -> Option<SemanticExpression<'a>> {
        let id = self.node().default_value?;
        Some(self.model.expression(id))
    }

    /// Own diagnostics: an unknown type name, plus an unparsable default.
    pub fn errors(&self) -> Arc<[Diagnostic]> {
        let mut errors: Vec<Diagnostic> = Vec::new();
        errors.extend_from_slice(self.property_type().errors());
        if let Some(default) = self.default_value() {
            errors.extend_from_slice(&default.errors());
        }
        errors.into()
    }
}

// ============================================================================
// NAVIGATION PROPERTIES
// ============================================================================

pub(crate) struct NavigationPropertyNode {
    pub(crate) owner: EntityTypeId,
    pub(crate) decl: NavigationPropertyDecl,
    pub(crate) association: CacheCell<AssociationRef>,
}

/// Semantic view of one navigation property: a traversal from the declaring
/// type across an association to the `to_role` end.
#[derive(Clone, Copy)]
pub struct NavigationProperty<'a> {
    pub(crate) model: &'a SemanticModel,
    pub(crate) id: NavigationPropertyId,
}

impl<'a> NavigationProperty<'a> {
    fn node(&self) -> &'a NavigationPropertyNode {
        &self.model.navigation_properties[self.id.index()]
    }

    pub fn name(&self) -> &'a str {
        &self.node().decl.name
    }

    pub fn kind(&self) -> ElementKind {
        ElementKind::NavigationProperty
    }

    pub fn location(&self) -> SourceLocation {
        self.node().decl.location
    }

    pub fn from_role(&self) -> &'a str {
        &self.node().decl.from_role
    }

    pub fn to_role(&self) -> &'a str {
        &self.node().decl.to_role
    }

    pub fn declaring_type(&self) -> EntityType<'a> {
        self.model.entity_type(self.node().owner)
    }

    /// The association being traversed.
    pub fn association(&self) -> AssociationRef {
        let node = self.node();
        node.association.get_or_compute(|| {
            self.model
                .resolve_association(&node.decl.relationship, node.decl.location)
        })
    }

    /// The association end being navigated to.
    pub fn target_end(&self) -> Option<AssociationEnd<'a>> {
        let association = self.association().element()?;
        self.model.association(association).end_with_role(self.to_role())
    }

    /// The entity type this navigation leads to.
    pub fn target_entity_type(&self) -> Option<EntityTypeRef> {
        Some(self.target_end()?.entity_type())
    }

    /// Own diagnostics: an unresolved association, or a `to_role` the
    /// resolved association does not declare.
    pub fn errors(&self) -> Arc<[Diagnostic]> {
        let node = self.node();
        let mut errors: Vec<Diagnostic> = Vec::new();
        let association = self.association();
        errors.extend_from_slice(association.errors());
        if let ElementRef::Element(id) = association {
            if self.model.association(id).end_with_role(self.to_role()).is_none() {
                errors.push(Diagnostic::new(
                    node.decl.location,
                    DiagnosticCode::StructuralError,
                    format!(
                        "association '{}' has no end with role '{}'",
                        node.decl.relationship, node.decl.to_role
                    ),
                ));
            }
        }
        errors.into()
    }
}
