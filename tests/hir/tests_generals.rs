//! General types, conformance and the implicit library generals.

use rstest::rstest;

use crate::helpers::model_helpers::{host_with_stdlib, kerml_host, lookup, qualified_names, sysml_host};
use crate::helpers::source_fixtures::MUTUAL_SPECIALIZATION;

#[test]
fn test_specialization_chain_all_generals() {
    let host = sysml_host(
        "package P { part def Thing; part def Vehicle :> Thing; part def Car :> Vehicle; part def Sports :> Car; }",
    );
    let model = host.analysis().model();
    let sports = lookup(&host, "P::Sports");
    assert_eq!(
        qualified_names(&host, &model.direct_generals(sports)),
        vec!["P::Car"]
    );
    assert_eq!(
        qualified_names(&host, &model.all_generals(sports)),
        vec!["P::Car", "P::Vehicle", "P::Thing"]
    );
    assert!(model.conforms(sports, lookup(&host, "P::Thing")));
    assert!(!model.conforms(lookup(&host, "P::Thing"), sports));
}

#[test]
fn test_multiple_generals_keep_declaration_order() {
    let host = sysml_host(
        "package P { part def Driveable; part def Flyable; part def FlyingCar :> Driveable, Flyable; }",
    );
    let model = host.analysis().model();
    let car = lookup(&host, "P::FlyingCar");
    assert_eq!(
        qualified_names(&host, &model.direct_generals(car)),
        vec!["P::Driveable", "P::Flyable"]
    );
}

#[test]
fn test_diamond_lists_shared_general_once() {
    let host = kerml_host(
        "package P { classifier Top; classifier L :> Top; classifier R :> Top; classifier Bottom :> L, R; }",
    );
    let model = host.analysis().model();
    let all = model.all_generals(lookup(&host, "P::Bottom"));
    assert_eq!(qualified_names(&host, &all), vec!["P::L", "P::R", "P::Top"]);
}

#[test]
fn test_mutual_specialization_terminates() {
    let host = sysml_host(MUTUAL_SPECIALIZATION);
    let model = host.analysis().model();
    let a = lookup(&host, "Cycle::A");
    let b = lookup(&host, "Cycle::B");
    assert_eq!(&*model.all_generals(a), &[b]);
    assert_eq!(&*model.all_generals(b), &[a]);
    assert!(model.conforms(a, b) && model.conforms(b, a));
}

#[test]
fn test_self_specialization_is_not_a_general() {
    let host = kerml_host("package P { classifier Loop :> Loop; }");
    let model = host.analysis().model();
    assert!(model.all_generals(lookup(&host, "P::Loop")).is_empty());
}

#[test]
fn test_standalone_specialization_adds_general() {
    let host = kerml_host(
        "package P { classifier A; classifier B; specialization S subtype B specializes A; }",
    );
    let model = host.analysis().model();
    let b = lookup(&host, "P::B");
    assert_eq!(&*model.direct_generals(b), &[lookup(&host, "P::A")]);
}

#[rstest]
#[case("part def Car;", "test::Car", "Parts::Part")]
#[case("attribute def Speed;", "test::Speed", "Base::DataValue")]
#[case("item def Cargo;", "test::Cargo", "Items::Item")]
#[case("port def Socket;", "test::Socket", "Ports::Port")]
#[case("action def Drive;", "test::Drive", "Actions::Action")]
fn test_implicit_library_general(#[case] decl: &str, #[case] name: &str, #[case] general: &str) {
    let source = format!("package test {{ {decl} }}");
    let host = host_with_stdlib(&[("test.sysml", &source)]);
    let model = host.analysis().model();
    let element = lookup(&host, name);
    let expected = lookup(&host, general);
    assert!(
        model.conforms(element, expected),
        "{name} should conform to {general}, generals: {:?}",
        qualified_names(&host, &model.all_generals(element))
    );
    assert!(model.conforms(element, lookup(&host, "Base::Anything")));
}

#[test]
fn test_explicit_general_replaces_implicit_one() {
    let host = host_with_stdlib(&[(
        "test.sysml",
        "package test { part def Vehicle; part def Car :> Vehicle; }",
    )]);
    let model = host.analysis().model();
    let car = lookup(&host, "test::Car");
    assert_eq!(&*model.direct_generals(car), &[lookup(&host, "test::Vehicle")]);
    assert!(model.conforms(car, lookup(&host, "Parts::Part")));
}

#[test]
fn test_typed_usage_keeps_its_default_subsetting() {
    let host = host_with_stdlib(&[(
        "test.sysml",
        "package test { part def Car; part car : Car; part spare :> car; }",
    )]);
    let model = host.analysis().model();
    let car = lookup(&host, "test::car");
    assert_eq!(
        qualified_names(&host, &model.direct_generals(car)),
        vec!["test::Car", "Parts::parts"]
    );
    let spare = lookup(&host, "test::spare");
    assert_eq!(&*model.direct_generals(spare), &[car]);
    assert!(model.conforms(spare, lookup(&host, "Parts::parts")));
}

#[test]
fn test_no_implicit_generals_without_library() {
    let host = sysml_host("package P { part def Car; }");
    assert!(host.analysis().model().all_generals(lookup(&host, "P::Car")).is_empty());
}

#[test]
fn test_types_of_follow_subsetting_and_redefinition() {
    let host = sysml_host(
        r#"
package P {
    part def Engine;
    part def Vehicle { part engine : Engine; }
    part def Car :> Vehicle { part v8 :>> engine; }
}
"#,
    );
    let model = host.analysis().model();
    let v8 = lookup(&host, "P::Car::v8");
    assert_eq!(model.types_of(v8), vec![lookup(&host, "P::Engine")]);
}

#[test]
fn test_conjugated_port_flips_directions() {
    let host = sysml_host(
        r#"
package P {
    port def FuelPort { in item fuel; out attribute pressure; }
    port def FuelOutPort ~ FuelPort;
}
"#,
    );
    let model = host.analysis().model();
    let port = lookup(&host, "P::FuelPort");
    let conjugate = lookup(&host, "P::FuelOutPort");
    let fuel = lookup(&host, "P::FuelPort::fuel");
    assert_eq!(model.conjugated_type(conjugate), Some(port));
    assert_eq!(
        model.effective_direction(port, fuel),
        Some(syster::syntax::Direction::In)
    );
    assert_eq!(
        model.effective_direction(conjugate, fuel),
        Some(syster::syntax::Direction::Out)
    );
}
