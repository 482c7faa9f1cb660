use smol_str::SmolStr;

use crate::base::SourceLocation;
use crate::decl::ExpressionDecl;

/// A declared entity type: named structure with optional inheritance.
#[derive(Clone, Debug)]
pub struct EntityTypeDecl {
    pub name: SmolStr,
    /// Qualified name of the base type, when the type extends another.
    pub base_type: Option<SmolStr>,
    pub properties: Vec<PropertyDecl>,
    pub navigation_properties: Vec<NavigationPropertyDecl>,
    pub location: SourceLocation,
}

impl EntityTypeDecl {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            base_type: None,
            properties: Vec::new(),
            navigation_properties: Vec::new(),
            location: SourceLocation::unknown(),
        }
    }

    pub fn extending(mut self, base_type: impl Into<SmolStr>) -> Self {
        self.base_type = Some(base_type.into());
        self
    }

    pub fn with_property(mut self, property: PropertyDecl) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_navigation(mut self, navigation: NavigationPropertyDecl) -> Self {
        self.navigation_properties.push(navigation);
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

/// A structural property. The type name is either an `Edm.*` primitive or
/// the qualified name of a declared entity type.
#[derive(Clone, Debug)]
pub struct PropertyDecl {
    pub name: SmolStr,
    pub type_name: SmolStr,
    pub nullable: bool,
    pub default_value: Option<ExpressionDecl>,
    pub location: SourceLocation,
}

impl PropertyDecl {
    pub fn new(name: impl Into<SmolStr>, type_name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            nullable: true,
            default_value: None,
            location: SourceLocation::unknown(),
        }
    }

    pub fn with_default(mut self, default_value: ExpressionDecl) -> Self {
        self.default_value = Some(default_value);
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

/// A navigation property: a traversal from this type across an association.
///
/// `relationship` is the association's qualified name; `from_role` names this
/// type's end and `to_role` the end being navigated to.
#[derive(Clone, Debug)]
pub struct NavigationPropertyDecl {
    pub name: SmolStr,
    pub relationship: SmolStr,
    pub from_role: SmolStr,
    pub to_role: SmolStr,
    pub location: SourceLocation,
}

impl NavigationPropertyDecl {
    pub fn new(
        name: impl Into<SmolStr>,
        relationship: impl Into<SmolStr>,
        from_role: impl Into<SmolStr>,
        to_role: impl Into<SmolStr>,
    ) -> Self {
        Self {
            name: name.into(),
            relationship: relationship.into(),
            from_role: from_role.into(),
            to_role: to_role.into(),
            location: SourceLocation::unknown(),
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}
