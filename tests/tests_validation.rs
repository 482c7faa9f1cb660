//! Tests for error aggregation: the asymmetric end fallthrough, invalid
//! constant literals, and the model-wide validation walk.

use std::thread;

use edm::decl::{
    AssociationDecl, AssociationEndDecl, AssociationSetDecl, AssociationSetEndDecl,
    EntityContainerDecl, EntitySetDecl, EntityTypeDecl, ExpressionDecl, PropertyDecl, Schema,
};
use edm::semantics::ConstantValue;
use edm::{DiagnosticCode, QualifiedName, SemanticModel};

fn qname(text: &str) -> QualifiedName {
    text.parse().expect("well-formed qualified name")
}

fn order_customer_association() -> AssociationDecl {
    AssociationDecl::new(
        "OrderCustomer",
        AssociationEndDecl::new("Order", "NS.Order").many(),
        AssociationEndDecl::new("Customer", "NS.Customer"),
    )
}

#[test]
fn test_clean_association_set_surfaces_end_errors_through_container() {
    // The association itself resolves, so the set has no diagnostics of its
    // own; its Customer end binds an entity set the container never declares.
    let schema = Schema::new("NS")
        .with(EntityTypeDecl::new("Order"))
        .with(EntityTypeDecl::new("Customer"))
        .with(order_customer_association())
        .with(
            EntityContainerDecl::new("Shop")
                .with(EntitySetDecl::new("Orders", "NS.Order"))
                .with(AssociationSetDecl::new(
                    "OrderCustomerSet",
                    "NS.OrderCustomer",
                    AssociationSetEndDecl::new("Order", "Orders"),
                    AssociationSetEndDecl::new("Customer", "Customers"),
                )),
        );
    let model = SemanticModel::new(vec![schema]);

    let shop = model.find_container(&qname("NS.Shop")).unwrap();
    let errors = shop.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, DiagnosticCode::UnresolvedReference);
    assert!(errors[0].message.contains("Customers"));
}

#[test]
fn test_association_set_with_own_errors_masks_its_ends() {
    // The set's association is unresolved, so it reports a diagnostic of its
    // own; the aggregation must not additionally surface the ends' problems,
    // even though both ends also fail to bind.
    let schema = Schema::new("NS")
        .with(EntityTypeDecl::new("Order"))
        .with(
            EntityContainerDecl::new("Shop").with(AssociationSetDecl::new(
                "BrokenSet",
                "NS.Missing",
                AssociationSetEndDecl::new("Order", "NoSuchSet"),
                AssociationSetEndDecl::new("Customer", "AlsoMissing"),
            )),
        );
    let model = SemanticModel::new(vec![schema]);

    let shop = model.find_container(&qname("NS.Shop")).unwrap();
    let errors = shop.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, DiagnosticCode::UnresolvedReference);
    assert!(errors[0].message.contains("NS.Missing"));
    assert!(!errors.iter().any(|diag| diag.message.contains("NoSuchSet")));

    // The end problems still exist when asked directly; the aggregation
    // just never reaches them once the set reports for itself.
    let sets = shop.elements();
    let edm::semantics::ContainerElement::AssociationSet(set) = sets[0] else {
        panic!("expected an association set");
    };
    assert!(!set.end1().errors().is_empty());
}

#[test]
fn test_invalid_default_literal_is_reported_not_fatal() {
    let schema = Schema::new("NS").with(
        EntityTypeDecl::new("Order").with_property(
            PropertyDecl::new("Quantity", "Edm.Int32")
                .with_default(ExpressionDecl::integer("twelve")),
        ),
    );
    let model = SemanticModel::new(vec![schema]);

    let order = model.find_entity_type(&qname("NS.Order")).unwrap();
    let quantity = order.find_property("Quantity").unwrap();

    let errors = quantity.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, DiagnosticCode::InvalidLiteral);
    assert!(errors[0].message.contains("twelve"));

    // The value stays usable: the kind's benign default.
    let default = quantity.default_value().unwrap();
    assert_eq!(default.value(), ConstantValue::Integer(0));

    // The same diagnostic reaches the type and the model walk.
    assert_eq!(order.errors().len(), 1);
    assert_eq!(model.validate().len(), 1);
}

#[test]
fn test_valid_default_literals_carry_no_errors() {
    let schema = Schema::new("NS").with(
        EntityTypeDecl::new("Order")
            .with_property(
                PropertyDecl::new("Quantity", "Edm.Int32")
                    .with_default(ExpressionDecl::integer("12")),
            )
            .with_property(
                PropertyDecl::new("Open", "Edm.Boolean")
                    .with_default(ExpressionDecl::boolean("true")),
            ),
    );
    let model = SemanticModel::new(vec![schema]);

    let order = model.find_entity_type(&qname("NS.Order")).unwrap();
    assert!(order.errors().is_empty());

    let quantity = order.find_property("Quantity").unwrap();
    assert_eq!(
        quantity.default_value().unwrap().value(),
        ConstantValue::Integer(12)
    );
    let open = order.find_property("Open").unwrap();
    assert_eq!(
        open.default_value().unwrap().value(),
        ConstantValue::Boolean(true)
    );
}

#[test]
fn test_validate_concatenates_in_declaration_order() {
    let schema = Schema::new("NS")
        .with(EntityTypeDecl::new("Orphan").extending("NS.NoBase"))
        .with(EntityContainerDecl::new("Shop").extending("NS.NoParent"));
    let model = SemanticModel::new(vec![schema]);

    let diagnostics = model.validate();
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics[0].message.contains("NS.NoBase"));
    assert!(diagnostics[1].message.contains("NS.NoParent"));
    assert!(
        diagnostics
            .iter()
            .all(|diag| diag.code == DiagnosticCode::UnresolvedReference)
    );
}

#[test]
fn test_validation_does_not_prevent_further_use() {
    let schema = Schema::new("NS")
        .with(EntityTypeDecl::new("Order"))
        .with(
            EntityContainerDecl::new("Shop")
                .extending("NS.NoParent")
                .with(EntitySetDecl::new("Orders", "NS.Order")),
        );
    let model = SemanticModel::new(vec![schema]);

    assert!(!model.validate().is_empty());

    // The valid parts keep working.
    let shop = model.find_container(&qname("NS.Shop")).unwrap();
    let binding = shop.find_entity_set("Orders").unwrap();
    assert!(binding.element().is_some());
}

#[test]
fn test_concurrent_readers_observe_one_resolution() {
    let schema = Schema::new("NS")
        .with(EntityTypeDecl::new("Item"))
        .with(EntityContainerDecl::new("Base").with(EntitySetDecl::new("X", "NS.Item")))
        .with(
            EntityContainerDecl::new("Derived")
                .extending("NS.Base")
                .with(EntitySetDecl::new("Y", "NS.Item")),
        );
    let model = SemanticModel::new(vec![schema]);

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                let derived = model.find_container(&qname("NS.Derived")).unwrap();
                let names: Vec<&str> = derived.elements().iter().map(|e| e.name()).collect();
                assert_eq!(names, ["X", "Y"]);
                assert!(derived.errors().is_empty());
                assert!(model.validate().is_empty());
            });
        }
    });
}
