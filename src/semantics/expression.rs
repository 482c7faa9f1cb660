//! Constant-expression semantics: parse the declared text as the declared
//! kind, falling back to a benign default and an `InvalidLiteral` diagnostic
//! when the text does not parse.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::SourceLocation;
use crate::cache::CacheCell;
use crate::decl::{ConstantKind, ExpressionDecl};
use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::semantics::model::SemanticModel;
use crate::semantics::{ElementKind, ExpressionId};

pub(crate) struct ExpressionNode {
    pub(crate) decl: ExpressionDecl,
    pub(crate) value: CacheCell<ConstantValue>,
    pub(crate) errors: CacheCell<Arc<[Diagnostic]>>,
}

/// A parsed constant value.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    String(SmolStr),
}

/// Semantic view of one constant expression.
#[derive(Clone, Copy)]
pub struct SemanticExpression<'a> {
    pub(crate) model: &'a SemanticModel,
    pub(crate) id: ExpressionId,
}

impl<'a> SemanticExpression<'a> {
    fn node(&self) -> &'a ExpressionNode {
        &self.model.expressions[self.id.index()]
    }

    pub fn kind(&self) -> ElementKind {
        ElementKind::Expression
    }

    pub fn constant_kind(&self) -> ConstantKind {
        self.node().decl.kind
    }

    pub fn location(&self) -> SourceLocation {
        self.node().decl.location
    }

    pub fn text(&self) -> &'a str {
        &self.node().decl.text
    }

    /// The parsed value. Text that fails to parse yields the kind's benign
    /// default; the failure itself is reported through `errors`.
    pub fn value(&self) -> ConstantValue {
        let node = self.node();
        node.value.get_or_compute(|| match parse(&node.decl) {
            Some(value) => value,
            None => default_value(node.decl.kind),
        })
    }

    pub fn errors(&self) -> Arc<[Diagnostic]> {
        let node = self.node();
        node.errors.get_or_compute(|| {
            if parse(&node.decl).is_some() {
                return Vec::new().into();
            }
            vec![Diagnostic::new(
                node.decl.location,
                DiagnosticCode::InvalidLiteral,
                format!(
                    "'{}' is not a valid {} literal",
                    node.decl.text, node.decl.kind
                ),
            )]
            .into()
        })
    }
}

fn parse(decl: &ExpressionDecl) -> Option<ConstantValue> {
    match decl.kind {
        ConstantKind::Integer => decl.text.parse::<i64>().ok().map(ConstantValue::Integer),
        ConstantKind::Decimal => decl.text.parse::<f64>().ok().map(ConstantValue::Decimal),
        ConstantKind::Boolean => parse_boolean(&decl.text).map(ConstantValue::Boolean),
        ConstantKind::String => Some(ConstantValue::String(decl.text.clone())),
    }
}

fn parse_boolean(text: &str) -> Option<bool> {
    match text {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn default_value(kind: ConstantKind) -> ConstantValue {
    match kind {
        ConstantKind::Integer => ConstantValue::Integer(0),
        ConstantKind::Decimal => ConstantValue::Decimal(0.0),
        ConstantKind::Boolean => ConstantValue::Boolean(false),
        ConstantKind::String => ConstantValue::String(SmolStr::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_kind() {
        assert_eq!(
            parse(&ExpressionDecl::integer("42")),
            Some(ConstantValue::Integer(42))
        );
        assert_eq!(
            parse(&ExpressionDecl::decimal("3.25")),
            Some(ConstantValue::Decimal(3.25))
        );
        assert_eq!(
            parse(&ExpressionDecl::boolean("0")),
            Some(ConstantValue::Boolean(false))
        );
        // String text always parses, verbatim.
        assert_eq!(
            parse(&ExpressionDecl::string("twelve")),
            Some(ConstantValue::String(SmolStr::new("twelve")))
        );
    }

    #[test]
    fn test_unparsable_text_is_rejected() {
        assert_eq!(parse(&ExpressionDecl::integer("twelve")), None);
        assert_eq!(parse(&ExpressionDecl::boolean("yes")), None);
        assert_eq!(parse(&ExpressionDecl::decimal("1,5")), None);
    }

    #[test]
    fn test_benign_defaults() {
        assert_eq!(
            default_value(ConstantKind::Integer),
            ConstantValue::Integer(0)
        );
        assert_eq!(
            default_value(ConstantKind::Boolean),
            ConstantValue::Boolean(false)
        );
        assert_eq!(
            default_value(ConstantKind::String),
            ConstantValue::String(SmolStr::default())
        );
    }
}
