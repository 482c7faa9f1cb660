//! Semantic wrapper graph.
//!
//! One wrapper per declaration node, each lazily computing its resolved,
//! validated properties through [`crate::cache::CacheCell`]s. Wrappers are
//! arena-allocated inside [`SemanticModel`] and handed out as cheap `Copy`
//! views borrowing the model; identity is the arena id, stable for the
//! model's lifetime.
//!
//! Resolution never aborts on malformed data: every reference slot is an
//! [`ElementRef`] that either names a real element or carries a
//! [`bad::BadElement`] sentinel with the diagnosis.

pub mod association;
pub mod association_set;
pub mod bad;
pub mod container;
pub mod entity_set;
pub mod entity_type;
pub mod expression;
pub mod function_import;
pub mod model;
pub(crate) mod registration;

pub use association::{Association, AssociationEnd};
pub use association_set::{AssociationSet, AssociationSetEnd};
pub use bad::{BadElement, BadElementFlavor, ElementRef};
pub use container::{ContainerElement, EntityContainer};
pub use entity_set::EntitySet;
pub use entity_type::{EntityType, NavigationProperty, PrimitiveKind, Property, PropertyTypeRef};
pub use expression::{ConstantValue, SemanticExpression};
pub use function_import::FunctionImport;
pub use model::SemanticModel;

use std::fmt;

// ============================================================================
// ARENA IDS
// ============================================================================

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn new(index: usize) -> Self {
                Self(index as u32)
            }

            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// Identifies one entity type in the model arena.
    EntityTypeId
);
define_id!(
    /// Identifies one association in the model arena.
    AssociationId
);
define_id!(
    /// Identifies one entity container in the model arena.
    ContainerId
);
define_id!(
    /// Identifies one entity set in the model arena.
    EntitySetId
);
define_id!(
    /// Identifies one association set in the model arena.
    AssociationSetId
);
define_id!(
    /// Identifies one function import in the model arena.
    FunctionImportId
);
define_id!(
    /// Identifies one structural property in the model arena.
    PropertyId
);
define_id!(
    /// Identifies one navigation property in the model arena.
    NavigationPropertyId
);
define_id!(
    /// Identifies one constant expression in the model arena.
    ExpressionId
);

/// A reference slot resolving to an entity type.
pub type EntityTypeRef = ElementRef<EntityTypeId>;
/// A reference slot resolving to an association.
pub type AssociationRef = ElementRef<AssociationId>;
/// A reference slot resolving to an entity container.
pub type ContainerRef = ElementRef<ContainerId>;
/// A reference slot resolving to an entity set.
pub type EntitySetRef = ElementRef<EntitySetId>;

// ============================================================================
// ELEMENT KINDS
// ============================================================================

/// Discriminates every externally visible element kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    EntityType,
    Association,
    EntityContainer,
    EntitySet,
    AssociationSet,
    FunctionImport,
    Property,
    NavigationProperty,
    Expression,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::EntityType => "entity type",
            ElementKind::Association => "association",
            ElementKind::EntityContainer => "entity container",
            ElementKind::EntitySet => "entity set",
            ElementKind::AssociationSet => "association set",
            ElementKind::FunctionImport => "function import",
            ElementKind::Property => "property",
            ElementKind::NavigationProperty => "navigation property",
            ElementKind::Expression => "expression",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one member of a container's flattened element sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementId {
    EntitySet(EntitySetId),
    AssociationSet(AssociationSetId),
    FunctionImport(FunctionImportId),
}

/// Selects one of the two ends of an association or association set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum EndSlot {
    First,
    Second,
}
