use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;
use thiserror::Error;

/// A namespace-qualified element name, the only reference currency between
/// declarations.
///
/// Displayed as `namespace.name`. The namespace itself may contain dots
/// (`My.Org.Model`), so parsing splits at the *last* separator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    namespace: SmolStr,
    name: SmolStr,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// The namespace portion (everything before the last `.`).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The simple (unqualified) name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Error produced when qualified-name text is malformed.
///
/// Malformed name *text* at the API boundary is a caller bug, unlike schema
/// data problems, which are reported as diagnostics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("qualified name is empty")]
    Empty,
    #[error("'{0}' is not namespace-qualified")]
    MissingNamespace(String),
    #[error("'{0}' has an empty name segment")]
    EmptySegment(String),
}

impl FromStr for QualifiedName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(NameError::Empty);
        }
        let (namespace, name) = s
            .rsplit_once('.')
            .ok_or_else(|| NameError::MissingNamespace(s.to_string()))?;
        if namespace.is_empty() || name.is_empty() {
            return Err(NameError::EmptySegment(s.to_string()));
        }
        Ok(Self::new(namespace, name))
    }
}
