//! Scope computation: owned, inherited and redefined members, visibility,
//! short names and aliases.

use rstest::rstest;
use syster::hir::{Origin, VisibilityContext};

use crate::helpers::model_helpers::{kerml_host, lookup, own_scope, sorted_names, sysml_host};
use crate::helpers::source_fixtures::{MUTUAL_SPECIALIZATION, REDEFINITION_CHAIN, VEHICLE};

#[test]
fn test_owned_members_in_declaration_order() {
    let host = sysml_host("package P { part def C; part def A; part def B; }");
    let scope = own_scope(&host, "P");
    assert_eq!(scope.names().collect::<Vec<_>>(), vec!["C", "A", "B"]);
    assert!(scope.iter().all(|(_, e)| e.origin == Origin::Owned));
}

#[test]
fn test_inherited_members_follow_owned_ones() {
    let host = sysml_host(VEHICLE);
    let scope = own_scope(&host, "Vehicles::Car");
    assert_eq!(
        scope.names().collect::<Vec<_>>(),
        vec!["wheels", "mass", "engine"]
    );
    assert_eq!(scope.entry("mass").unwrap().origin, Origin::Inherited);
    assert_eq!(scope.get("engine"), Some(lookup(&host, "Vehicles::Vehicle::engine")));
}

#[test]
fn test_mutual_specialization_scopes() {
    let host = sysml_host(MUTUAL_SPECIALIZATION);
    let a = own_scope(&host, "Cycle::A");
    let b = own_scope(&host, "Cycle::B");
    assert_eq!(a.names().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(b.names().collect::<Vec<_>>(), vec!["b", "a"]);
    assert_eq!(a.elements().len(), 2);
    assert_eq!(a.get("b"), b.get("b"));
}

#[test]
fn test_redefinition_hides_redefined_feature() {
    let host = sysml_host(REDEFINITION_CHAIN);

    let middle = own_scope(&host, "Chain::Middle");
    assert!(middle.contains("y"));
    assert!(!middle.contains("x"));
    assert!(middle.contains("w"));

    let leaf = own_scope(&host, "Chain::Leaf");
    assert_eq!(sorted_names(&leaf), vec!["w", "z"]);
    assert_eq!(leaf.get("z"), Some(lookup(&host, "Chain::Leaf::z")));
}

#[test]
fn test_unnamed_redefinition_takes_redefined_name() {
    let host = sysml_host(
        "package P { part def A { attribute mass; } part def B :> A { :>> mass = 10; } }",
    );
    let model = host.analysis().model();
    let scope = own_scope(&host, "P::B");
    let mass = scope.get("mass").unwrap();
    assert_ne!(mass, lookup(&host, "P::A::mass"));
    assert_eq!(model.effective_name(mass).as_deref(), Some("mass"));
    assert_eq!(model.element(mass).unwrap().owner(), Some(lookup(&host, "P::B")));
    assert_eq!(model.qualified_name(mass).as_deref(), Some("P::B::mass"));
}

#[rstest]
#[case(VisibilityContext::Own, &["hidden", "inner", "open"])]
#[case(VisibilityContext::Inherited, &["inner", "open"])]
#[case(VisibilityContext::External, &["open"])]
fn test_visibility_contexts(#[case] ctx: VisibilityContext, #[case] expected: &[&str]) {
    let host = kerml_host(
        "package P { classifier C { private feature hidden; protected feature inner; feature open; } }",
    );
    let scope = host.analysis().scope(lookup(&host, "P::C"), ctx);
    let mut names: Vec<&str> = scope.names().collect();
    names.sort();
    assert_eq!(names, expected);
}

#[test]
fn test_protected_members_are_inherited_but_private_are_not() {
    let host = kerml_host(
        "package P { classifier A { private feature secret; protected feature shared; } classifier B :> A; }",
    );
    let scope = own_scope(&host, "P::B");
    assert!(scope.contains("shared"));
    assert!(!scope.contains("secret"));
}

#[test]
fn test_short_names_are_visible() {
    let host = sysml_host("package P { part def <V> Vehicle; }");
    let scope = own_scope(&host, "P");
    assert_eq!(scope.get("V"), scope.get("Vehicle"));
    assert_eq!(
        host.analysis().lookup("P::V"),
        Some(lookup(&host, "P::Vehicle"))
    );
}

#[test]
fn test_alias_names_its_target() {
    let host = sysml_host(
        "package P { package Inner { part def Vehicle; } alias Car for Inner::Vehicle; }",
    );
    let scope = own_scope(&host, "P");
    assert_eq!(scope.get("Car"), Some(lookup(&host, "P::Inner::Vehicle")));
    assert_eq!(scope.entry("Car").unwrap().origin, Origin::Aliased);
}

#[test]
fn test_first_declaration_of_a_name_wins() {
    let host = sysml_host("package P { part def A; part def A; }");
    let scope = own_scope(&host, "P");
    assert_eq!(scope.len(), 1);
    let first = scope.get("A").unwrap();
    let model = host.analysis().model();
    let second = model
        .element(lookup(&host, "P"))
        .unwrap()
        .members()
        .iter()
        .copied()
        .filter(|&m| model.element(m).unwrap().name() == Some("A"))
        .nth(1)
        .unwrap();
    assert_ne!(first, second);
}

#[test]
fn test_feature_scope_includes_type_members() {
    let host = sysml_host(VEHICLE);
    let model = host.analysis().model();
    let engine = lookup(&host, "Vehicles::Vehicle::engine");
    assert_eq!(
        model.resolve_name("engine::cylinders", lookup(&host, "Vehicles::Vehicle")),
        Some(lookup(&host, "Vehicles::Engine::cylinders"))
    );
    assert!(host.analysis().scope(engine, VisibilityContext::Own).contains("cylinders"));
}
