//! Reference linking: typings, redefinitions, chains, stand-alone
//! relationships and name lookup from arbitrary elements.

use rstest::rstest;
use syster::hir::RelationshipKind;

use crate::helpers::model_helpers::{host_with, host_with_stdlib, lookup, sysml_host};
use crate::helpers::source_fixtures::VEHICLE;

#[rstest]
#[case("Vehicles::Vehicle::mass", "Vehicles::Mass")]
#[case("Vehicles::Vehicle::engine", "Vehicles::Engine")]
fn test_typing_targets(#[case] feature: &str, #[case] ty: &str) {
    let host = sysml_host(VEHICLE);
    assert_eq!(
        host.analysis().model().types_of(lookup(&host, feature)),
        vec![lookup(&host, ty)]
    );
}

#[test]
fn test_relationship_elements_carry_their_ends() {
    let host = sysml_host(VEHICLE);
    let model = host.analysis().model();
    let car = lookup(&host, "Vehicles::Car");
    let specialization = model
        .element(car)
        .unwrap()
        .members()
        .iter()
        .copied()
        .find(|&m| model.element(m).unwrap().relationship_kind() == Some(RelationshipKind::Specialization))
        .unwrap();
    assert_eq!(model.relationship_source(specialization), Some(car));
    assert_eq!(
        model.relationship_target(specialization),
        Some(lookup(&host, "Vehicles::Vehicle"))
    );
}

#[test]
fn test_redefinition_looks_in_generals_not_own_scope() {
    let host = sysml_host(
        r#"
package P {
    part def A { attribute speed; }
    part def B :> A { attribute speed :>> speed; }
}
"#,
    );
    let model = host.analysis().model();
    let redefining = lookup(&host, "P::B::speed");
    let redefined = lookup(&host, "P::A::speed");
    assert_ne!(redefining, redefined);
    assert!(model.conforms(redefining, redefined));
}

#[test]
fn test_feature_chain_reference() {
    let host = sysml_host(
        r#"
package P {
    part def Engine { attribute power; }
    part def Car { part engine : Engine; }
    part car : Car {
        attribute p :> engine.power;
    }
}
"#,
    );
    let model = host.analysis().model();
    let p = lookup(&host, "P::car::p");
    let power = lookup(&host, "P::Engine::power");
    assert_eq!(&*model.direct_generals(p), &[power]);
}

#[test]
fn test_standalone_relationship_resolves_both_ends() {
    let host = sysml_host(
        "package P { part def A; part def B; specialization S subtype B specializes A; }",
    );
    let model = host.analysis().model();
    let s = lookup(&host, "P::S");
    assert_eq!(model.relationship_source(s), Some(lookup(&host, "P::B")));
    assert_eq!(model.relationship_target(s), Some(lookup(&host, "P::A")));
}

#[test]
fn test_resolve_name_walks_outward() {
    let host = sysml_host(
        "package Outer { part def Shared; package Inner { part def Local; part def User; } }",
    );
    let model = host.analysis().model();
    let user = lookup(&host, "Outer::Inner::User");
    assert_eq!(model.resolve_name("Local", user), Some(lookup(&host, "Outer::Inner::Local")));
    assert_eq!(model.resolve_name("Shared", user), Some(lookup(&host, "Outer::Shared")));
    assert_eq!(model.resolve_name("Outer::Inner::Local", user), model.resolve_name("Local", user));
    assert_eq!(model.resolve_name("Missing", user), None);
}

#[test]
fn test_inner_declaration_shadows_outer() {
    let host = sysml_host(
        "package Outer { part def T; package Inner { part def T; part x : T; } }",
    );
    let model = host.analysis().model();
    let x = lookup(&host, "Outer::Inner::x");
    assert_eq!(model.types_of(x), vec![lookup(&host, "Outer::Inner::T")]);
}

#[test]
fn test_private_members_invisible_from_outside() {
    let host = sysml_host("package P { private part def Secret; part def Open; }");
    let analysis = host.analysis();
    assert!(analysis.lookup("P::Secret").is_none());
    assert!(analysis.lookup("P::Open").is_some());
    let open = lookup(&host, "P::Open");
    assert!(analysis.model().resolve_name("Secret", open).is_some());
}

#[test]
fn test_qualified_names() {
    let host = sysml_host(VEHICLE);
    let model = host.analysis().model();
    assert_eq!(
        model.qualified_name(lookup(&host, "Vehicles::Car::wheels")).as_deref(),
        Some("Vehicles::Car::wheels")
    );
}

#[test]
fn test_user_documents_shadow_library_names() {
    let host = host_with_stdlib(&[("parts.sysml", "package Parts { part def Custom; }")]);
    let analysis = host.analysis();
    assert!(analysis.lookup("Parts::Custom").is_some());
    assert!(analysis.lookup("Parts::Part").is_none());
}

#[test]
fn test_first_document_wins_for_duplicate_top_level_names() {
    let host = host_with(&[
        ("a.sysml", "package Shared { part def FromA; }"),
        ("b.sysml", "package Shared { part def FromB; }"),
    ]);
    let analysis = host.analysis();
    assert!(analysis.lookup("Shared::FromA").is_some());
    assert!(analysis.lookup("Shared::FromB").is_none());
}
