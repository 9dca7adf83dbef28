use charly::{ErrorKind, Interpreter};

fn run_err(source: &str) -> charly::RuntimeError {
    Interpreter::without_prelude()
        .run(source)
        .expect_err("program should fail")
}

#[test]
fn parse_errors_are_classified_as_parse() {
    let err = run_err("let = 5");
    assert!(err.kind.is_some_and(|k| k.is_parse()));

    let err = run_err("func f( {");
    assert!(err.kind.is_some_and(|k| k.is_parse()));

    let err = run_err("\"unterminated");
    assert!(err.kind.is_some_and(|k| k.is_parse()));
}

#[test]
fn runtime_errors_are_not_parse_errors() {
    let err = run_err("missing");
    assert!(!err.kind.is_some_and(|k| k.is_parse()));
}

#[test]
fn unclosed_block_reports_expected_brace() {
    let err = run_err("if true { 1");
    assert_eq!(err.kind, Some(ErrorKind::ParseExpected));
}

#[test]
fn property_outside_a_class_is_unexpected() {
    let err = run_err("property x");
    assert_eq!(err.kind, Some(ErrorKind::UnexpectedNode));
}

#[test]
fn error_display_includes_kind_message_and_location() {
    let err = run_err("let a = 1\nlet a = 2");
    let rendered = err.to_string();
    assert!(rendered.contains("ALREADY_DEFINED"));
    assert!(rendered.contains("already defined"));
    assert!(rendered.contains("line 2"));
}

#[test]
fn constant_assignment_points_at_the_target() {
    let err = run_err("const c = 1\nc = 2");
    assert_eq!(err.kind, Some(ErrorKind::ConstantAssignment));
    assert_eq!(err.location.map(|l| l.line), Some(2));
}

#[test]
fn errors_in_methods_name_the_method_frame() {
    let err = run_err("class A {
  func explode() { missing }
}
A().explode()");
    assert_eq!(err.kind, Some(ErrorKind::NotDefined));
    assert_eq!(err.trace.len(), 1);
    assert_eq!(err.trace[0].name, "explode");
}

#[test]
fn constructor_errors_unwind_out_of_construction() {
    let err = run_err("class A {
  func constructor() { missing }
}
A()");
    assert_eq!(err.kind, Some(ErrorKind::NotDefined));
    assert_eq!(err.trace.len(), 1);
    assert_eq!(err.trace[0].name, "constructor");
}
