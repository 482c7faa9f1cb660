use smol_str::SmolStr;

use crate::base::SourceLocation;

/// A declared entity container: the named scope holding entity sets,
/// association sets and function imports.
#[derive(Clone, Debug)]
pub struct EntityContainerDecl {
    pub name: SmolStr,
    /// Qualified name of the container this one extends, if any.
    pub extends: Option<SmolStr>,
    pub elements: Vec<ContainerElementDecl>,
    pub location: SourceLocation,
}

impl EntityContainerDecl {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            elements: Vec::new(),
            location: SourceLocation::unknown(),
        }
    }

    pub fn extending(mut self, extends: impl Into<SmolStr>) -> Self {
        self.extends = Some(extends.into());
        self
    }

    pub fn with(mut self, element: impl Into<ContainerElementDecl>) -> Self {
        self.elements.push(element.into());
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

/// A directly declared member of an entity container.
#[derive(Clone, Debug)]
pub enum ContainerElementDecl {
    EntitySet(EntitySetDecl),
    AssociationSet(AssociationSetDecl),
    FunctionImport(FunctionImportDecl),
}

impl ContainerElementDecl {
    pub fn name(&self) -> &str {
        match self {
            ContainerElementDecl::EntitySet(decl) => &decl.name,
            ContainerElementDecl::AssociationSet(decl) => &decl.name,
            ContainerElementDecl::FunctionImport(decl) => &decl.name,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            ContainerElementDecl::EntitySet(decl) => decl.location,
            ContainerElementDecl::AssociationSet(decl) => decl.location,
            ContainerElementDecl::FunctionImport(decl) => decl.location,
        }
    }
}

impl From<EntitySetDecl> for ContainerElementDecl {
    fn from(decl: EntitySetDecl) -> Self {
        ContainerElementDecl::EntitySet(decl)
    }
}

impl From<AssociationSetDecl> for ContainerElementDecl {
    fn from(decl: AssociationSetDecl) -> Self {
        ContainerElementDecl::AssociationSet(decl)
    }
}

impl From<FunctionImportDecl> for ContainerElementDecl {
    fn from(decl: FunctionImportDecl) -> Self {
        ContainerElementDecl::FunctionImport(decl)
    }
}

/// A declared entity set: a named collection of one entity type.
#[derive(Clone, Debug)]
pub struct EntitySetDecl {
    pub name: SmolStr,
    /// Qualified name of the element entity type.
    pub entity_type: SmolStr,
    pub location: SourceLocation,
}

impl EntitySetDecl {
    pub fn new(name: impl Into<SmolStr>, entity_type: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            location: SourceLocation::unknown(),
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

/// A declared association set: an association bound to entity sets of the
/// owning container, one per end role.
#[derive(Clone, Debug)]
pub struct AssociationSetDecl {
    pub name: SmolStr,
    /// Qualified name of the association being instantiated.
    pub association: SmolStr,
    pub end1: AssociationSetEndDecl,
    pub end2: AssociationSetEndDecl,
    pub location: SourceLocation,
}

impl AssociationSetDecl {
    pub fn new(
        name: impl Into<SmolStr>,
        association: impl Into<SmolStr>,
        end1: AssociationSetEndDecl,
        end2: AssociationSetEndDecl,
    ) -> Self {
        Self {
            name: name.into(),
            association: association.into(),
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

/// One end of an association set: an association role bound to an entity set
/// of the owning container, by simple name.
#[derive(Clone, Debug)]
pub struct AssociationSetEndDecl {
    pub role: SmolStr,
    pub entity_set: SmolStr,
    pub location: SourceLocation,
}

impl AssociationSetEndDecl {
    pub fn new(role: impl Into<SmolStr>, entity_set: impl Into<SmolStr>) -> Self {
        Self {
            role: role.into(),
            entity_set: entity_set.into(),
            location: SourceLocation::unknown(),
        }
    }
}

/// A declared function import. Several imports may share a name; they form
/// an overload set.
#[derive(Clone, Debug)]
pub struct FunctionImportDecl {
    pub name: SmolStr,
    pub return_type: Option<SmolStr>,
    /// Simple name of the entity set the results belong to, if any.
    pub entity_set: Option<SmolStr>,
    pub parameters: Vec<FunctionParameterDecl>,
    pub location: SourceLocation,
}

impl FunctionImportDecl {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            return_type: None,
            entity_set: None,
            parameters: Vec::new(),
            location: SourceLocation::unknown(),
        }
    }

    pub fn returning(mut self, return_type: impl Into<SmolStr>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn bound_to(mut self, entity_set: impl Into<SmolStr>) -> Self {
        self.entity_set = Some(entity_set.into());
        self
    }

    pub fn with_parameter(mut self, parameter: FunctionParameterDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

#[derive(Clone, Debug)]
pub struct FunctionParameterDecl {
    pub name: SmolStr,
    pub type_name: SmolStr,
}

impl FunctionParameterDecl {
    pub fn new(name: impl Into<SmolStr>, type_name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}
