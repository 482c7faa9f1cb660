use smol_str::SmolStr;

use crate::base::SourceLocation;

/// A declared association: a named, two-ended relationship between entity
/// types.
#[derive(Clone, Debug)]
pub struct AssociationDecl {
    pub name: SmolStr,
    pub end1: AssociationEndDecl,
    pub end2: AssociationEndDecl,
    pub location: SourceLocation,
}

impl AssociationDecl {
    pub fn new(
        name: impl Into<SmolStr>,
        end1: AssociationEndDecl,
        end2: AssociationEndDecl,
    ) -> Self {
        Self {
            name: name.into(),
            end1,
            end2,
            location: SourceLocation::unknown(),
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

/// One end of an association: a role name bound to an entity type.
#[derive(Clone, Debug)]
pub struct AssociationEndDecl {
    pub role: SmolStr,
    /// Qualified name of the entity type at this end.
    pub entity_type: SmolStr,
    pub multiplicity: Multiplicity,
    pub location: SourceLocation,
}

impl AssociationEndDecl {
    pub fn new(role: impl Into<SmolStr>, entity_type: impl Into<SmolStr>) -> Self {
        Self {
            role: role.into(),
            entity_type: entity_type.into(),
            multiplicity: Multiplicity::One,
            location: SourceLocation::unknown(),
        }
    }

    pub fn many(mut self) -> Self {
        self.multiplicity = Multiplicity::Many;
        self
    }

    pub fn optional(mut self) -> Self {
        self.multiplicity = Multiplicity::ZeroOrOne;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Multiplicity {
    One,
    ZeroOrOne,
    Many,
}
