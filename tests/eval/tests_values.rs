//! Expressions over literal values, evaluated at a document root.

use rstest::rstest;
use syster::eval::{EvalError, Value};

use crate::helpers::model_helpers::{evaluate_at_root, host_with_stdlib, sysml_host};

fn eval_plain(source: &str) -> syster::eval::Evaluation {
    let host = sysml_host("package Empty;");
    evaluate_at_root(&host, "test.sysml", source)
}

fn ints(values: Vec<Value>) -> Vec<i64> {
    values.iter().filter_map(Value::as_int).collect()
}

#[rstest]
#[case("1 + 2 * 3", Value::Int(7))]
#[case("(1 + 2) * 3", Value::Int(9))]
#[case("2 ^ 10", Value::Int(1024))]
#[case("1 ^ 5000000000", Value::Int(1))]
#[case("2 ** 3 ** 2", Value::Int(512))]
#[case("7 / 2", Value::Real(3.5))]
#[case("6 / 3", Value::Int(2))]
#[case("7 % 4", Value::Int(3))]
#[case("-3 + 1", Value::Int(-2))]
#[case("1.5 + 1", Value::Real(2.5))]
#[case("\"a\" + \"b\"", Value::String("ab".into()))]
#[case("3 > 2 and 2 > 1", Value::Bool(true))]
#[case("not true or false", Value::Bool(false))]
#[case("true xor true", Value::Bool(false))]
#[case("1 == 1.0", Value::Bool(true))]
#[case("1 === 1.0", Value::Bool(false))]
#[case("\"x\" != \"y\"", Value::Bool(true))]
#[case("if 1 < 2 ? \"yes\" else \"no\"", Value::String("yes".into()))]
#[case("null ?? 5", Value::Int(5))]
#[case("4 ?? 5", Value::Int(4))]
fn test_scalar_expressions(#[case] source: &str, #[case] expected: Value) {
    let evaluation = eval_plain(source);
    assert!(evaluation.is_ok(), "{source}: {:?}", evaluation.errors);
    assert_eq!(evaluation.values.single_value(), Some(expected), "{source}");
}

#[rstest]
#[case("1 / 0")]
#[case("5 % 0")]
fn test_division_by_zero_is_reported(#[case] source: &str) {
    let evaluation = eval_plain(source);
    assert!(evaluation.values.is_empty());
    assert!(matches!(
        evaluation.into_result(),
        Err(EvalError::DivisionByZero(_))
    ));
}

#[test]
fn test_failure_carries_the_subexpression_range() {
    let source = "1 + 2 / 0";
    let evaluation = eval_plain(source);
    let failure = &evaluation.errors[0];
    let start: usize = failure.range.start().into();
    let end: usize = failure.range.end().into();
    assert_eq!(&source[start..end], "2 / 0");
}

#[test]
fn test_independent_failures_are_all_reported() {
    let evaluation = eval_plain("(1 / 0, \"a\" * 2)");
    assert_eq!(evaluation.errors.len(), 2);
}

#[rstest]
#[case("null + 1")]
#[case("() * 2")]
#[case("-null")]
#[case("not ()")]
#[case("null < 3")]
fn test_null_propagates_without_error(#[case] source: &str) {
    let evaluation = eval_plain(source);
    assert!(evaluation.is_ok(), "{source}: {:?}", evaluation.errors);
    assert!(evaluation.values.is_empty(), "{source}");
}

#[test]
fn test_parenthesized_list_is_a_sequence() {
    let evaluation = eval_plain("(1, (2, 3), null, 4)");
    assert_eq!(ints(evaluation.values.to_vec()), vec![1, 2, 3, 4]);
}

#[rstest]
#[case("0..5", vec![0, 1, 2, 3, 4, 5])]
#[case("5..0", vec![])]
#[case("Range(0, 5, 2)", vec![0, 2, 4])]
#[case("Range(2, 2)", vec![2])]
fn test_ranges(#[case] source: &str, #[case] expected: Vec<i64>) {
    let evaluation = eval_plain(source);
    assert!(evaluation.is_ok(), "{source}: {:?}", evaluation.errors);
    assert_eq!(ints(evaluation.values.to_vec()), expected);
}

#[test]
fn test_range_stays_lazy() {
    let evaluation = eval_plain("1..1000000000");
    let range = evaluation.values.as_range().expect("a range value");
    assert_eq!(range.len(), 1_000_000_000);
    assert_eq!(range.at(-1), Some(1_000_000_000));
}

#[test]
fn test_concatenated_range_stays_lazy() {
    let evaluation = eval_plain("(1..1000000000, 0)");
    assert!(evaluation.is_ok(), "{:?}", evaluation.errors);
    assert_eq!(evaluation.values.len(), 1_000_000_001);
    assert_eq!(evaluation.values.at(5), Some(Value::Int(5)));
    assert_eq!(evaluation.values.at(1_000_000_001), Some(Value::Int(0)));
}

#[test]
fn test_tail_of_range_stays_lazy() {
    let evaluation = eval_plain("(1..1000000000)->tail()");
    assert!(evaluation.is_ok(), "{:?}", evaluation.errors);
    assert_eq!(evaluation.values.len(), 999_999_999);
    assert_eq!(evaluation.values.first(), Some(Value::Int(2)));
}

#[test]
fn test_range_over_all_integers_is_rejected() {
    let evaluation = eval_plain("Range(-9223372036854775807 - 1, 9223372036854775807)");
    assert_eq!(
        evaluation.into_result(),
        Err(EvalError::RangeTooLarge {
            start: i64::MIN,
            stop: i64::MAX,
            step: 1
        })
    );
}

#[test]
fn test_range_with_non_positive_step_fails() {
    let evaluation = eval_plain("Range(0, 5, 0)");
    assert_eq!(evaluation.into_result(), Err(EvalError::InvalidStep(0)));
}

#[rstest]
#[case("(3, 1, 2)->size()", Value::Int(3))]
#[case("(0..9)->size()", Value::Int(10))]
#[case("(1..1000000000, 0)->size()", Value::Int(1_000_000_001))]
#[case("(1..1000000000)->tail()->size()", Value::Int(999_999_999))]
#[case("(1..3, 4) === (1, 2, 3, 4)", Value::Bool(true))]
#[case("max(1..1000000)", Value::Int(1_000_000))]
#[case("()->isEmpty()", Value::Bool(true))]
#[case("(1, 2)->notEmpty()", Value::Bool(true))]
#[case("(1, 2, 3)->includes(2)", Value::Bool(true))]
#[case("(0..10)->includes(11)", Value::Bool(false))]
#[case("(1, 2, 3)->excludes(4)", Value::Bool(true))]
#[case("(7, 8, 9)->head()", Value::Int(7))]
#[case("(7, 8, 9)->last()", Value::Int(9))]
#[case("(7, 8, 9)[2]", Value::Int(8))]
#[case("(7, 8, 9)#(1)", Value::Int(7))]
#[case("(1, 2, 3)->sum()", Value::Int(6))]
#[case("abs(-4)", Value::Int(4))]
fn test_sequence_functions(#[case] source: &str, #[case] expected: Value) {
    let evaluation = eval_plain(source);
    assert!(evaluation.is_ok(), "{source}: {:?}", evaluation.errors);
    assert_eq!(evaluation.values.single_value(), Some(expected), "{source}");
}

#[test]
fn test_index_out_of_bounds_is_null() {
    let evaluation = eval_plain("(7, 8, 9)[4]");
    assert!(evaluation.is_ok());
    assert!(evaluation.values.is_empty());
}

#[rstest]
#[case(1, 4, "stri")]
#[case(3, 4, "ri")]
#[case(1, 6, "string")]
#[case(4, 3, "")]
fn test_substring(#[case] lo: i64, #[case] hi: i64, #[case] expected: &str) {
    let evaluation = eval_plain(&format!("Substring(\"string\", {lo}, {hi})"));
    assert!(evaluation.is_ok(), "{:?}", evaluation.errors);
    assert_eq!(evaluation.values.single_value(), Some(Value::from(expected)));
}

#[rstest]
#[case(0, 4)]
#[case(2, 7)]
#[case(5, 2)]
fn test_substring_out_of_bounds(#[case] lo: i64, #[case] hi: i64) {
    let evaluation = eval_plain(&format!("Substring(\"string\", {lo}, {hi})"));
    assert_eq!(
        evaluation.into_result(),
        Err(EvalError::SubstringBounds { lo, hi, len: 6 })
    );
}

#[test]
fn test_string_length() {
    let evaluation = eval_plain("Length(\"héllo\")");
    assert_eq!(evaluation.values.single_value(), Some(Value::Int(5)));
}

#[test]
fn test_unknown_function() {
    let evaluation = eval_plain("Frobnicate(1)");
    assert!(matches!(
        evaluation.into_result(),
        Err(EvalError::UnknownFunction(name)) if name == "Frobnicate"
    ));
}

#[test]
fn test_unresolved_name() {
    let evaluation = eval_plain("missing + 1");
    assert!(matches!(
        evaluation.into_result(),
        Err(EvalError::UnresolvedName(name)) if name == "missing"
    ));
}

#[rstest]
#[case("IntegerFunctions::Range(0, 5, 2)", vec![0, 2, 4])]
#[case("SequenceFunctions::size((1, 2))", vec![2])]
#[case("DataFunctions::max(3, 9)", vec![9])]
#[case("NumericalFunctions::max((3, 9, 4))", vec![9])]
fn test_library_functions_dispatch_to_builtins(#[case] source: &str, #[case] expected: Vec<i64>) {
    let host = host_with_stdlib(&[("test.sysml", "package Empty;")]);
    let evaluation = evaluate_at_root(&host, "test.sysml", source);
    assert!(evaluation.is_ok(), "{source}: {:?}", evaluation.errors);
    assert_eq!(ints(evaluation.values.to_vec()), expected);
}

#[rstest]
#[case("3 istype ScalarValues::Integer", true)]
#[case("3 istype ScalarValues::Real", true)]
#[case("3 hastype ScalarValues::Real", false)]
#[case("3.5 hastype ScalarValues::Real", true)]
#[case("\"x\" istype ScalarValues::Integer", false)]
#[case("true istype ScalarValues::Boolean", true)]
fn test_scalar_classification(#[case] source: &str, #[case] expected: bool) {
    let host = host_with_stdlib(&[("test.sysml", "package Empty;")]);
    let evaluation = evaluate_at_root(&host, "test.sysml", source);
    assert!(evaluation.is_ok(), "{source}: {:?}", evaluation.errors);
    assert_eq!(evaluation.values.as_bool(), Some(expected), "{source}");
}

#[test]
fn test_as_filters_values() {
    let host = host_with_stdlib(&[("test.sysml", "package Empty;")]);
    let evaluation = evaluate_at_root(&host, "test.sysml", "(1, \"a\", 2.5, 3) as ScalarValues::Integer");
    assert_eq!(ints(evaluation.values.to_vec()), vec![1, 3]);
}
