//! Expressions whose names resolve through the model.

use rstest::rstest;
use syster::eval::{EvalError, Value};

use crate::helpers::model_helpers::{
    evaluate_in, host_with, host_with_stdlib, kerml_host, lookup, sysml_host,
};
use crate::helpers::source_fixtures::VEHICLE;

const GEOMETRY: &str = r#"
package Geometry {
    attribute width = 3;
    attribute height = width * 2;
    attribute area = width * height;
    attribute label = "w" + "h";
    attribute sizes = (width, height, 10);
    attribute nothing = null;

    attribute a = b + 1;
    attribute b = a + 1;

    attribute broken = 1 / 0;
    attribute dependent = broken + 1;
}
"#;

#[rstest]
#[case("width", 3)]
#[case("height", 6)]
#[case("area", 18)]
#[case("Geometry::area + 1", 19)]
#[case("sizes->size()", 3)]
#[case("sizes[2]", 6)]
fn test_feature_values(#[case] source: &str, #[case] expected: i64) {
    let host = sysml_host(GEOMETRY);
    let evaluation = evaluate_in(&host, "Geometry", source);
    assert!(evaluation.is_ok(), "{source}: {:?}", evaluation.errors);
    assert_eq!(evaluation.values.single_value(), Some(Value::Int(expected)), "{source}");
}

#[test]
fn test_evaluate_value_of_a_feature() {
    let host = sysml_host(GEOMETRY);
    let label = lookup(&host, "Geometry::label");
    let evaluation = host.analysis().model().evaluate_value(label).unwrap();
    assert_eq!(evaluation.values.single_value(), Some(Value::from("wh")));

    let package = lookup(&host, "Geometry");
    assert!(host.analysis().model().evaluate_value(package).is_none());
}

#[test]
fn test_null_feature_value_propagates() {
    let host = sysml_host(GEOMETRY);
    let evaluation = evaluate_in(&host, "Geometry", "nothing + 1");
    assert!(evaluation.is_ok());
    assert!(evaluation.values.is_empty());
}

#[test]
fn test_cyclic_values_evaluate_to_null() {
    let host = sysml_host(GEOMETRY);
    let evaluation = evaluate_in(&host, "Geometry", "a");
    assert!(evaluation.is_ok(), "{:?}", evaluation.errors);
    assert!(evaluation.values.is_empty());
}

#[test]
fn test_failure_inside_a_referenced_value_stays_with_that_feature() {
    let host = sysml_host(GEOMETRY);
    let model = host.analysis().model();

    let broken = model.evaluate_value(lookup(&host, "Geometry::broken")).unwrap();
    assert!(matches!(broken.into_result(), Err(EvalError::DivisionByZero(_))));

    let dependent = model.evaluate_value(lookup(&host, "Geometry::dependent")).unwrap();
    assert!(dependent.is_ok());
    assert!(dependent.values.is_empty());
}

#[test]
fn test_element_without_value_is_a_reference() {
    let host = sysml_host(VEHICLE);
    let evaluation = evaluate_in(&host, "Vehicles", "Car");
    assert_eq!(
        evaluation.values.single_value(),
        Some(Value::Ref(lookup(&host, "Vehicles::Car")))
    );
}

#[rstest]
#[case("Vehicles::Vehicle", "engine.cylinders", 4)]
#[case("Vehicles::Car", "wheels * 2", 8)]
#[case("Vehicles::Car", "engine.cylinders + wheels", 8)]
#[case("Vehicles", "Engine::cylinders", 4)]
fn test_member_access_follows_types(
    #[case] context: &str,
    #[case] source: &str,
    #[case] expected: i64,
) {
    let host = sysml_host(VEHICLE);
    let evaluation = evaluate_in(&host, context, source);
    assert!(evaluation.is_ok(), "{source}: {:?}", evaluation.errors);
    assert_eq!(evaluation.values.single_value(), Some(Value::Int(expected)), "{source}");
}

#[test]
fn test_missing_member_is_reported() {
    let host = sysml_host(VEHICLE);
    let evaluation = evaluate_in(&host, "Vehicles::Vehicle", "engine.pistons");
    assert!(matches!(
        evaluation.into_result(),
        Err(EvalError::UnresolvedName(name)) if name == "pistons"
    ));
}

#[test]
fn test_member_of_a_scalar_is_a_type_mismatch() {
    let host = sysml_host(GEOMETRY);
    let evaluation = evaluate_in(&host, "Geometry", "width.foo");
    assert!(matches!(
        evaluation.into_result(),
        Err(EvalError::TypeMismatch { .. })
    ));
}

#[test]
fn test_reference_operands_are_not_evaluable() {
    let host = sysml_host(VEHICLE);
    let evaluation = evaluate_in(&host, "Vehicles", "Car + 1");
    assert!(matches!(
        evaluation.into_result(),
        Err(EvalError::NotEvaluable(_))
    ));
}

const FUNCTIONS: &str = r#"
package Math {
    function Double { in x; x * 2 }
    function Add { in x; in y; x + y }
    function Square { in x; Double(x) * x / 2 }
    function Factorial { in n; if n <= 1 ? 1 else n * Factorial(n - 1) }
    function Forever { in n; Forever(n) }
    function Offset { in x; x + base }
    feature base = 100;
}
"#;

#[rstest]
#[case("Double(21)", 42)]
#[case("Add(2, 3)", 5)]
#[case("Square(4)", 16)]
#[case("Factorial(5)", 120)]
#[case("Double(Add(1, 2))", 6)]
#[case("4->Double()", 8)]
#[case("Offset(1)", 101)]
#[case("Math::Double(5)", 10)]
fn test_user_functions(#[case] source: &str, #[case] expected: i64) {
    let host = kerml_host(FUNCTIONS);
    let evaluation = evaluate_in(&host, "Math", source);
    assert!(evaluation.is_ok(), "{source}: {:?}", evaluation.errors);
    assert_eq!(evaluation.values.single_value(), Some(Value::Int(expected)), "{source}");
}

#[test]
fn test_parameters_do_not_leak_out_of_calls() {
    let host = kerml_host(FUNCTIONS);
    let evaluation = evaluate_in(&host, "Math", "(Double(1), Double::x)");
    assert!(evaluation.is_ok(), "{:?}", evaluation.errors);
    assert_eq!(
        evaluation.values.to_vec(),
        vec![Value::Int(2), Value::Ref(lookup(&host, "Math::Double::x"))]
    );
}

#[test]
fn test_argument_count_must_match_parameters() {
    let host = kerml_host(FUNCTIONS);
    let evaluation = evaluate_in(&host, "Math", "Add(1)");
    assert!(matches!(
        evaluation.into_result(),
        Err(EvalError::ArgumentCount { found: 1, .. })
    ));
}

#[test]
fn test_unbounded_recursion_is_cut() {
    let host = kerml_host(FUNCTIONS);
    let evaluation = evaluate_in(&host, "Math", "Forever(1)");
    assert!(matches!(
        evaluation.into_result(),
        Err(EvalError::RecursionLimit(name)) if name == "Forever"
    ));
}

#[test]
fn test_calculation_definition_is_callable() {
    let host = sysml_host(
        r#"
package Calcs {
    calc def Triple { in x; 3 * x }
    attribute nine = Triple(3);
}
"#,
    );
    let evaluation = evaluate_in(&host, "Calcs", "nine");
    assert_eq!(evaluation.values.single_value(), Some(Value::Int(9)));
}

#[test]
fn test_user_function_shadows_builtin_name() {
    let host = kerml_host("package P { function size { in s; 99 } }");
    let evaluation = evaluate_in(&host, "P", "(1, 2)->size()");
    assert_eq!(evaluation.values.single_value(), Some(Value::Int(99)));
}

#[rstest]
#[case("car istype Vehicle", true)]
#[case("car istype Car", true)]
#[case("car hastype Vehicle", false)]
#[case("car hastype Car", true)]
#[case("engine istype Vehicle", false)]
#[case("(car, engine) istype Vehicle", false)]
#[case("car @ Vehicle", true)]
fn test_feature_classification(#[case] source: &str, #[case] expected: bool) {
    let host = sysml_host(
        r#"
package Fleet {
    part def Vehicle;
    part def Car :> Vehicle;
    part def Engine;
    part car : Car;
    part engine : Engine;
}
"#,
    );
    let evaluation = evaluate_in(&host, "Fleet", source);
    assert!(evaluation.is_ok(), "{source}: {:?}", evaluation.errors);
    assert_eq!(evaluation.values.as_bool(), Some(expected), "{source}");
}

#[test]
fn test_classification_of_null_is_null() {
    let host = sysml_host("package Fleet { part def Vehicle; }");
    let evaluation = evaluate_in(&host, "Fleet", "null istype Vehicle");
    assert!(evaluation.is_ok());
    assert!(evaluation.values.is_empty());
}

#[test]
fn test_classification_against_unknown_type_fails() {
    let host = sysml_host("package Fleet { part def Vehicle; }");
    let evaluation = evaluate_in(&host, "Fleet", "Vehicle istype Truck");
    assert!(matches!(
        evaluation.into_result(),
        Err(EvalError::UnresolvedName(name)) if name == "Truck"
    ));
}

#[rstest]
#[case("Car @@ KerML::Classifier", true)]
#[case("Car @@ SysML::PartDefinition", true)]
#[case("Car @@ SysML::ItemDefinition", true)]
#[case("Car @@ KerML::Feature", false)]
#[case("car @@ KerML::Feature", true)]
#[case("car @@ SysML::PartUsage", true)]
fn test_metaclassification(#[case] source: &str, #[case] expected: bool) {
    let host = host_with_stdlib(&[(
        "test.sysml",
        "package Fleet { part def Car; part car : Car; }",
    )]);
    let evaluation = evaluate_in(&host, "Fleet", source);
    assert!(evaluation.is_ok(), "{source}: {:?}", evaluation.errors);
    assert_eq!(evaluation.values.as_bool(), Some(expected), "{source}");
}

#[test]
fn test_metadata_classification() {
    let host = sysml_host(
        r#"
package Tags {
    metadata def Safety { attribute level = 0; }
    metadata def Cost;
    part brakes { @Safety { :>> level = 3; } }
    part radio;
}
"#,
    );
    let check = |source: &str| {
        let evaluation = evaluate_in(&host, "Tags", source);
        assert!(evaluation.is_ok(), "{source}: {:?}", evaluation.errors);
        evaluation.values
    };
    assert_eq!(check("brakes @@ Safety").as_bool(), Some(true));
    assert_eq!(check("brakes @@ Cost").as_bool(), Some(false));
    assert_eq!(check("radio @@ Safety").as_bool(), Some(false));

    let applied = check("brakes meta Safety");
    assert_eq!(applied.len(), 1);
    let metadata = applied.first().and_then(|v| v.as_element()).unwrap();
    let level = host.analysis().evaluate_text("level", metadata).unwrap();
    assert_eq!(level.values.single_value(), Some(Value::Int(3)));
}

#[test]
fn test_evaluation_sees_library_through_imports() {
    let host = host_with(&[
        ("lib.kerml", "package Lib { function Twice { in x; x + x } }"),
        ("use.kerml", "package Use { import Lib::*; feature v = Twice(4); }"),
    ]);
    let evaluation = evaluate_in(&host, "Use", "v");
    assert_eq!(evaluation.values.single_value(), Some(Value::Int(8)));
}
