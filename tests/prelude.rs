use std::path::Path;

use charly::{ErrorKind, Interpreter, Value, ValueKind};

fn prelude_interpreter() -> Interpreter {
    let mut interpreter = Interpreter::without_prelude();
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("std")
        .join("prelude.charly");
    interpreter
        .load_prelude_from(&path)
        .expect("prelude should load");
    interpreter
}

fn run(source: &str) -> Value {
    prelude_interpreter()
        .run(source)
        .expect("program should run")
}

fn as_numeric(value: &Value) -> f64 {
    match value.kind {
        ValueKind::Numeric(n) => n,
        _ => panic!("expected a numeric, got {:?}", value),
    }
}

fn as_string(value: &Value) -> String {
    match &value.kind {
        ValueKind::String(s) => s.clone(),
        _ => panic!("expected a string, got {:?}", value),
    }
}

#[test]
fn array_length_comes_from_the_prelude() {
    let value = run("let a = [1, 2, 3]; a.length()");
    assert_eq!(as_numeric(&value), 3.0);
}

#[test]
fn without_the_prelude_length_is_null() {
    let value = Interpreter::without_prelude()
        .run("let a = [1, 2, 3]; a.length")
        .expect("program should run");
    assert!(matches!(value.kind, ValueKind::Null));
}

#[test]
fn string_length_counts_characters() {
    assert_eq!(as_numeric(&run("\"ab\".length()")), 2.0);
    assert_eq!(as_numeric(&run("\"\".length()")), 0.0);
}

#[test]
fn array_push_appends_in_place() {
    let value = run("let a = [1]
a.push(2)
a.push(3)
a.length()");
    assert_eq!(as_numeric(&value), 3.0);
}

#[test]
fn object_methods_reach_every_primitive_kind() {
    assert_eq!(as_string(&run("5.to_string()")), "5");
    assert_eq!(as_string(&run("true.to_string()")), "true");
    assert_eq!(as_string(&run("[1, 2].to_string()")), "[1, 2]");
    assert_eq!(as_string(&run("5.type()")), "Numeric");
    assert_eq!(as_string(&run("\"x\".type()")), "String");
}

#[test]
fn prelude_classes_are_visible_to_user_code() {
    let value = run("typeof(Numeric)");
    assert_eq!(as_string(&value), "PrimitiveClass");
}

#[test]
fn missing_prelude_file_aborts_loading() {
    let mut interpreter = Interpreter::without_prelude();
    let err = interpreter
        .load_prelude_from(Path::new("/nonexistent/prelude.charly"))
        .expect_err("loading should fail");
    assert_eq!(err.kind, Some(ErrorKind::PreludeMissing));
}

#[test]
fn natives_are_callable_directly() {
    assert_eq!(as_string(&run("typeof(1)")), "Numeric");
    assert_eq!(as_string(&run("typeof(typeof)")), "Function");
    assert_eq!(as_string(&run("stringify(5)")), "5");
    assert_eq!(as_numeric(&run("length(\"abc\")")), 3.0);
}

#[test]
fn print_appends_to_the_output_buffer() {
    let mut interpreter = prelude_interpreter();
    interpreter
        .run("print(\"hello\", 42)\nwrite(\"a\")\nwrite(\"b\")")
        .expect("program should run");
    assert_eq!(interpreter.output(), "hello 42\nab");
}

#[test]
fn native_arity_is_checked() {
    let err = prelude_interpreter()
        .run("length()")
        .expect_err("length needs an argument");
    assert_eq!(err.kind, Some(ErrorKind::ArityMismatch));
}
