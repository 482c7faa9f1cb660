//! Tests for the per-container dictionaries: ambiguous bindings, function
//! import overloads, association-set mappings, and navigation targets.

use edm::decl::{
    AssociationDecl, AssociationEndDecl, AssociationSetDecl, AssociationSetEndDecl,
    EntityContainerDecl, EntitySetDecl, EntityTypeDecl, FunctionImportDecl,
    NavigationPropertyDecl, PropertyDecl, Schema,
};
use edm::{DiagnosticCode, ElementRef, QualifiedName, SemanticModel};

fn qname(text: &str) -> QualifiedName {
    text.parse().expect("well-formed qualified name")
}

/// A small, fully valid commerce schema shared by several tests.
fn commerce_schema() -> Schema {
    Schema::new("NS")
        .with(EntityTypeDecl::new("Order").with_property(PropertyDecl::new("Id", "Edm.Int32")))
        .with(
            EntityTypeDecl::new("Customer")
                .with_property(PropertyDecl::new("Id", "Edm.Int32"))
                .with_navigation(NavigationPropertyDecl::new(
                    "Orders",
                    "NS.OrderCustomer",
                    "Customer",
                    "Order",
                )),
        )
        .with(AssociationDecl::new(
            "OrderCustomer",
            AssociationEndDecl::new("Order", "NS.Order").many(),
            AssociationEndDecl::new("Customer", "NS.Customer"),
        ))
        .with(
            EntityContainerDecl::new("Shop")
                .with(EntitySetDecl::new("Orders", "NS.Order"))
                .with(EntitySetDecl::new("Customers", "NS.Customer"))
                .with(AssociationSetDecl::new(
                    "OrderCustomerSet",
                    "NS.OrderCustomer",
                    AssociationSetEndDecl::new("Order", "Orders"),
                    AssociationSetEndDecl::new("Customer", "Customers"),
                )),
        )
}

#[test]
fn test_find_entity_set_resolves_members() {
    let model = SemanticModel::new(vec![commerce_schema()]);
    let shop = model.find_container(&qname("NS.Shop")).unwrap();

    let orders = shop.find_entity_set("Orders").unwrap();
    let id = orders.element().expect("unique name resolves directly");
    let orders = model.entity_set(id);
    assert_eq!(orders.name(), "Orders");
    assert_eq!(orders.qualified_name().to_string(), "NS.Orders");

    let element_type = orders.element_type();
    assert_eq!(element_type.element(), model.find_entity_type(&qname("NS.Order")).map(|t| t.id()));

    assert!(shop.find_entity_set("Nope").is_none());
}

#[test]
fn test_duplicate_entity_sets_collapse_into_one_ambiguous_sentinel() {
    let container = EntityContainerDecl::new("Shop")
        .with(EntitySetDecl::new("Orders", "NS.Order"))
        .with(EntitySetDecl::new("Orders", "NS.Order"));
    let schema = Schema::new("NS")
        .with(EntityTypeDecl::new("Order"))
        .with(container);
    let model = SemanticModel::new(vec![schema]);

    let shop = model.find_container(&qname("NS.Shop")).unwrap();
    let binding = shop.find_entity_set("Orders").unwrap();
    let bad = binding.bad().expect("duplicate name must be ambiguous");
    assert!(bad.is_ambiguous());
    assert!(
        bad.errors()
            .iter()
            .any(|diag| diag.code == DiagnosticCode::AmbiguousBinding)
    );
}

#[test]
fn test_third_duplicate_folds_into_the_same_sentinel() {
    let container = EntityContainerDecl::new("Shop")
        .with(EntitySetDecl::new("Orders", "NS.Order"))
        .with(EntitySetDecl::new("Orders", "NS.Order"))
        .with(EntitySetDecl::new("Orders", "NS.Order"));
    let schema = Schema::new("NS")
        .with(EntityTypeDecl::new("Order"))
        .with(container);
    let model = SemanticModel::new(vec![schema]);

    let shop = model.find_container(&qname("NS.Shop")).unwrap();
    let binding = shop.find_entity_set("Orders").unwrap();
    let bad = binding.bad().expect("duplicate name must be ambiguous");
    assert!(bad.is_ambiguous());

    // Still exactly one sentinel with one duplicate-name diagnostic.
    let duplicates = bad
        .errors()
        .iter()
        .filter(|diag| diag.code == DiagnosticCode::AmbiguousBinding)
        .count();
    assert_eq!(duplicates, 1);
}

#[test]
fn test_inherited_and_own_sets_collide_in_the_dictionary() {
    let schema = Schema::new("NS")
        .with(EntityTypeDecl::new("Order"))
        .with(EntityContainerDecl::new("Base").with(EntitySetDecl::new("Orders", "NS.Order")))
        .with(
            EntityContainerDecl::new("Derived")
                .extending("NS.Base")
                .with(EntitySetDecl::new("Orders", "NS.Order")),
        );
    let model = SemanticModel::new(vec![schema]);

    // Flattening preserves both; the dictionary folds them.
    let derived = model.find_container(&qname("NS.Derived")).unwrap();
    assert_eq!(derived.elements().len(), 2);
    let binding = derived.find_entity_set("Orders").unwrap();
    assert!(binding.bad().is_some_and(|bad| bad.is_ambiguous()));

    // The base container alone is unaffected.
    let base = model.find_container(&qname("NS.Base")).unwrap();
    assert!(base.find_entity_set("Orders").unwrap().element().is_some());
}

#[test]
fn test_function_imports_overload_by_name() {
    let container = EntityContainerDecl::new("Shop")
        .with(EntitySetDecl::new("Orders", "NS.Order"))
        .with(
            FunctionImportDecl::new("GetOrders")
                .returning("Collection(NS.Order)")
                .bound_to("Orders"),
        )
        .with(FunctionImportDecl::new("GetOrders").returning("NS.Order"))
        .with(FunctionImportDecl::new("Ping"));
    let schema = Schema::new("NS")
        .with(EntityTypeDecl::new("Order"))
        .with(container);
    let model = SemanticModel::new(vec![schema]);

    let shop = model.find_container(&qname("NS.Shop")).unwrap();
    let overloads = shop.find_function_imports("GetOrders");
    assert_eq!(overloads.len(), 2);
    assert_eq!(overloads[0].return_type(), Some("Collection(NS.Order)"));
    assert_eq!(overloads[1].return_type(), Some("NS.Order"));
    assert_eq!(shop.find_function_imports("Ping").len(), 1);
    assert!(shop.find_function_imports("Absent").is_empty());

    // The bound overload resolves its entity set.
    let binding = overloads[0].entity_set().unwrap();
    assert!(binding.element().is_some());
    assert!(overloads[1].entity_set().is_none());
}

#[test]
fn test_association_set_mappings() {
    let model = SemanticModel::new(vec![commerce_schema()]);
    let shop = model.find_container(&qname("NS.Shop")).unwrap();
    let association = model.find_association(&qname("NS.OrderCustomer")).unwrap();

    let sets = shop.find_association_sets(association.id());
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].name(), "OrderCustomerSet");

    // Each end resolves both its association role and its entity set.
    let end = sets[0].end_with_role("Customer").unwrap();
    assert_eq!(end.association_end().unwrap().role(), "Customer");
    assert!(end.entity_set().element().is_some());
    assert!(end.errors().is_empty());
}

#[test]
fn test_navigation_target_resolution() {
    let model = SemanticModel::new(vec![commerce_schema()]);
    let customer = model.find_entity_type(&qname("NS.Customer")).unwrap();
    let navigation = customer
        .navigation_properties()
        .into_iter()
        .find(|nav| nav.name() == "Orders")
        .unwrap();

    // The navigation's association and target end resolve.
    assert!(!navigation.association().is_bad());
    let target_type = navigation.target_entity_type().unwrap();
    assert_eq!(
        target_type.element(),
        model.find_entity_type(&qname("NS.Order")).map(|t| t.id())
    );

    // Navigating from the Customers set lands on the Orders set.
    let shop = model.find_container(&qname("NS.Shop")).unwrap();
    let ElementRef::Element(customers) = shop.find_entity_set("Customers").unwrap() else {
        panic!("Customers must resolve");
    };
    let target = model
        .entity_set(customers)
        .find_navigation_target(navigation)
        .expect("navigation target must exist");
    let ElementRef::Element(orders) = target else {
        panic!("target must resolve");
    };
    assert_eq!(model.entity_set(orders).name(), "Orders");
}

#[test]
fn test_commerce_schema_is_valid() {
    let model = SemanticModel::new(vec![commerce_schema()]);
    assert!(model.validate().is_empty());
}
