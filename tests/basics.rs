use charly::{ErrorKind, Interpreter, Value, ValueKind};

fn run(source: &str) -> Value {
    Interpreter::without_prelude()
        .run(source)
        .expect("program should run")
}

fn run_err(source: &str) -> charly::RuntimeError {
    Interpreter::without_prelude()
        .run(source)
        .expect_err("program should fail")
}

fn as_numeric(value: &Value) -> f64 {
    match value.kind {
        ValueKind::Numeric(n) => n,
        _ => panic!("expected a numeric, got {:?}", value),
    }
}

#[test]
fn literals_evaluate_to_their_values() {
    assert_eq!(as_numeric(&run("25")), 25.0);
    assert!(matches!(run("\"hi\"").kind, ValueKind::String(ref s) if s == "hi"));
    assert!(matches!(run("true").kind, ValueKind::Boolean(true)));
    assert!(matches!(run("null").kind, ValueKind::Null));
    assert!(matches!(run("NAN").kind, ValueKind::Numeric(n) if n.is_nan()));
}

#[test]
fn empty_program_yields_null() {
    assert!(matches!(run("").kind, ValueKind::Null));
}

#[test]
fn program_result_is_the_last_statement() {
    assert_eq!(as_numeric(&run("1; 2; 3")), 3.0);
}

#[test]
fn array_literals_evaluate_left_to_right() {
    let value = run("let log = [];
array_push(log, 1)
let a = [array_push(log, 2), array_push(log, 3)]
length(log)");
    assert_eq!(as_numeric(&value), 3.0);
}

#[test]
fn let_initialises_and_returns_the_value() {
    assert_eq!(as_numeric(&run("let a = 5")), 5.0);
    assert_eq!(as_numeric(&run("let a = 5; a")), 5.0);
}

#[test]
fn let_without_initialiser_is_null() {
    assert!(matches!(run("let a; a").kind, ValueKind::Null));
}

#[test]
fn redeclaration_in_the_same_scope_fails() {
    let err = run_err("let a = 1; let a = 2");
    assert_eq!(err.kind, Some(ErrorKind::AlreadyDefined));
}

#[test]
fn shadowing_in_a_child_scope_is_allowed() {
    let value = run("let a = 1
if true {
  let a = 2
}
a");
    assert_eq!(as_numeric(&value), 1.0);
}

#[test]
fn constants_cannot_be_reassigned() {
    let err = run_err("const c = 1; c = 2");
    assert_eq!(err.kind, Some(ErrorKind::ConstantAssignment));
}

#[test]
fn assignment_to_undefined_names_fails() {
    let err = run_err("missing = 1");
    assert_eq!(err.kind, Some(ErrorKind::NotDefined));
}

#[test]
fn undefined_identifier_reports_its_location() {
    let err = run_err("let a = 1\nmissing");
    assert_eq!(err.kind, Some(ErrorKind::NotDefined));
    assert_eq!(err.location.map(|l| l.line), Some(2));
}

#[test]
fn self_is_a_reserved_name() {
    assert_eq!(run_err("let self = 1").kind, Some(ErrorKind::ReservedName));
    assert_eq!(run_err("self = 1").kind, Some(ErrorKind::ReservedName));
}

#[test]
fn assignment_walks_to_the_defining_scope() {
    let value = run("let a = 1
if true {
  a = 2
}
a");
    assert_eq!(as_numeric(&value), 2.0);
}

#[test]
fn member_assignment_attaches_to_any_value() {
    let value = run("let n = 5
n.tag = 7
n.tag");
    assert_eq!(as_numeric(&value), 7.0);
}

#[test]
fn members_do_not_leak_between_values() {
    // A fresh numeric has a fresh data scope.
    let value = run("let a = 5
a.tag = 7
let b = 5
b.tag");
    assert!(matches!(value.kind, ValueKind::Null));
}

#[test]
fn index_reads_are_unsupported() {
    let err = run_err("let a = [1, 2]; a[0]");
    assert_eq!(err.kind, Some(ErrorKind::UnexpectedNode));
}

#[test]
fn index_assignment_is_not_implemented() {
    let err = run_err("let a = [1, 2]; a[0] = 5");
    assert_eq!(err.kind, Some(ErrorKind::NotImplemented));
}
