use std::fmt;

use smol_str::SmolStr;

use crate::base::SourceLocation;

/// A declared constant expression, e.g. a property default value.
///
/// The text is kept verbatim as written in the schema source; whether it
/// actually parses as the declared kind is a semantic question answered by
/// the expression wrapper.
#[derive(Clone, Debug)]
pub struct ExpressionDecl {
    pub kind: ConstantKind,
    pub text: SmolStr,
    pub location: SourceLocation,
}

impl ExpressionDecl {
    pub fn new(kind: ConstantKind, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            text: text.into(),
            location: SourceLocation::unknown(),
        }
    }

    pub fn integer(text: impl Into<SmolStr>) -> Self {
        Self::new(ConstantKind::Integer, text)
    }

    pub fn decimal(text: impl Into<SmolStr>) -> Self {
        Self::new(ConstantKind::Decimal, text)
    }

    pub fn boolean(text: impl Into<SmolStr>) -> Self {
        Self::new(ConstantKind::Boolean, text)
    }

    pub fn string(text: impl Into<SmolStr>) -> Self {
        Self::new(ConstantKind::String, text)
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }
}

/// The declared kind of a constant expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConstantKind {
    Integer,
    Decimal,
    Boolean,
    String,
}

impl fmt::Display for ConstantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstantKind::Integer => "integer",
            ConstantKind::Decimal => "decimal",
            ConstantKind::Boolean => "boolean",
            ConstantKind::String => "string",
        })
    }
}
