//! Tests for reference resolution: `extends` chains, cycle termination, and
//! member flattening across inheritance.

use edm::decl::{
    EntityContainerDecl, EntitySetDecl, EntityTypeDecl, PropertyDecl, Schema,
};
use edm::{DiagnosticCode, QualifiedName, SemanticModel};
use rstest::rstest;

fn qname(text: &str) -> QualifiedName {
    text.parse().expect("well-formed qualified name")
}

#[test]
fn test_unresolved_extends_yields_unresolved_sentinel() {
    let schema = Schema::new("NS")
        .with(EntityContainerDecl::new("Orders").extending("NS.Missing"));
    let model = SemanticModel::new(vec![schema]);

    let container = model.find_container(&qname("NS.Orders")).unwrap();
    let extends = container.extends().unwrap();
    let bad = extends.bad().expect("extends must resolve to a sentinel");

    assert!(bad.is_unresolved());
    assert_eq!(bad.errors().len(), 1);
    assert_eq!(bad.errors()[0].code, DiagnosticCode::UnresolvedReference);
    assert!(bad.errors()[0].message.contains("NS.Missing"));

    // The aggregated container errors surface the same diagnostic.
    let errors = container.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, DiagnosticCode::UnresolvedReference);
}

#[rstest]
#[case(2)]
#[case(5)]
fn test_extends_cycle_terminates_and_seals_entry_node(#[case] length: usize) {
    let names: Vec<String> = (0..length).map(|i| format!("C{i}")).collect();
    let mut schema = Schema::new("NS");
    for i in 0..length {
        let next = &names[(i + 1) % length];
        schema = schema.with(
            EntityContainerDecl::new(names[i].as_str()).extending(format!("NS.{next}")),
        );
    }
    let model = SemanticModel::new(vec![schema]);

    let entry = model.find_container(&qname("NS.C0")).unwrap();

    // Resolving the flattened element list terminates.
    assert!(entry.elements().is_empty());

    // The cycle sealed the re-entered node's slot with a Cyclic sentinel.
    let extends = entry.extends().unwrap();
    let bad = extends.bad().expect("cycle must yield a sentinel");
    assert!(bad.is_cyclic());
    assert_eq!(bad.errors()[0].code, DiagnosticCode::CyclicReference);
    assert!(bad.errors()[0].message.contains("NS.C0"));

    // Exactly one container in the cycle reports it; the chain is broken
    // there, so every other member resolved its base normally.
    let cyclic = names
        .iter()
        .filter(|name| {
            let container = model.find_container(&qname(&format!("NS.{name}"))).unwrap();
            container.extends().unwrap().is_bad()
        })
        .count();
    assert_eq!(cyclic, 1);
}

#[test]
fn test_container_elements_flatten_base_first() {
    let schema = Schema::new("NS")
        .with(EntityTypeDecl::new("Item"))
        .with(EntityContainerDecl::new("Base").with(EntitySetDecl::new("X", "NS.Item")))
        .with(
            EntityContainerDecl::new("Derived")
                .extending("NS.Base")
                .with(EntitySetDecl::new("Y", "NS.Item")),
        );
    let model = SemanticModel::new(vec![schema]);

    let derived = model.find_container(&qname("NS.Derived")).unwrap();
    let names: Vec<&str> = derived.elements().iter().map(|e| e.name()).collect();
    assert_eq!(names, ["X", "Y"]);
}

#[test]
fn test_flattening_recurses_through_the_whole_chain() {
    let schema = Schema::new("NS")
        .with(EntityTypeDecl::new("Item"))
        .with(EntityContainerDecl::new("Grand").with(EntitySetDecl::new("W", "NS.Item")))
        .with(
            EntityContainerDecl::new("Base")
                .extending("NS.Grand")
                .with(EntitySetDecl::new("X", "NS.Item")),
        )
        .with(
            EntityContainerDecl::new("Derived")
                .extending("NS.Base")
                .with(EntitySetDecl::new("Y", "NS.Item")),
        );
    let model = SemanticModel::new(vec![schema]);

    let derived = model.find_container(&qname("NS.Derived")).unwrap();
    let names: Vec<&str> = derived.elements().iter().map(|e| e.name()).collect();
    assert_eq!(names, ["W", "X", "Y"]);

    // Inherited members are the base's own semantic nodes, not copies.
    let base = model.find_container(&qname("NS.Base")).unwrap();
    let base_names: Vec<&str> = base.elements().iter().map(|e| e.name()).collect();
    assert_eq!(base_names, ["W", "X"]);
}

#[test]
fn test_entity_type_base_resolution_and_property_flattening() {
    let schema = Schema::new("NS")
        .with(EntityTypeDecl::new("Base").with_property(PropertyDecl::new("Id", "Edm.Int32")))
        .with(
            EntityTypeDecl::new("Derived")
                .extending("NS.Base")
                .with_property(PropertyDecl::new("Name", "Edm.String")),
        );
    let model = SemanticModel::new(vec![schema]);

    let derived = model.find_entity_type(&qname("NS.Derived")).unwrap();
    assert!(!derived.base_type().unwrap().is_bad());

    let names: Vec<&str> = derived.properties().iter().map(|p| p.name()).collect();
    assert_eq!(names, ["Id", "Name"]);
    assert!(derived.errors().is_empty());
}

#[rstest]
#[case(2)]
#[case(5)]
fn test_entity_type_base_cycle_terminates(#[case] length: usize) {
    let names: Vec<String> = (0..length).map(|i| format!("T{i}")).collect();
    let mut schema = Schema::new("NS");
    for i in 0..length {
        let next = &names[(i + 1) % length];
        schema = schema.with(
            EntityTypeDecl::new(names[i].as_str())
                .extending(format!("NS.{next}"))
                .with_property(PropertyDecl::new("Id", "Edm.Int32")),
        );
    }
    let model = SemanticModel::new(vec![schema]);

    let entry = model.find_entity_type(&qname("NS.T0")).unwrap();

    // Flattened properties terminate: only the entry type's own survive.
    assert_eq!(entry.properties().len(), 1);

    let bad = entry.base_type().unwrap();
    let bad = bad.bad().expect("cycle must yield a sentinel");
    assert!(bad.is_cyclic());
    assert_eq!(bad.errors()[0].code, DiagnosticCode::CyclicReference);
    assert!(bad.errors()[0].message.contains("NS.T0"));
}

#[test]
fn test_unresolved_base_type_is_reported_once_per_traversal() {
    let schema = Schema::new("NS").with(
        EntityTypeDecl::new("Orphan")
            .extending("NS.Nowhere")
            .with_property(PropertyDecl::new("Id", "Edm.Int32")),
    );
    let model = SemanticModel::new(vec![schema]);

    let orphan = model.find_entity_type(&qname("NS.Orphan")).unwrap();
    let errors = orphan.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, DiagnosticCode::UnresolvedReference);
    assert!(errors[0].message.contains("NS.Nowhere"));

    // A bad base contributes no inherited members.
    assert_eq!(orphan.properties().len(), 1);
}
