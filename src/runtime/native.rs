use super::*;
use crate::runtime::scope::Flags;
use crate::value::{NativeFn, ValueKind};

/// Functions available in every top scope before the prelude runs. The
/// prelude wraps these into primitive-class methods; user code may call
/// them directly as well.
pub(super) fn register_native_functions(scope: &ScopeRef) {
    let natives: &[(&'static str, usize, NativeFn)] = &[
        ("write", 1, native_write),
        ("print", 1, native_print),
        ("length", 1, native_length),
        ("typeof", 1, native_typeof),
        ("stringify", 1, native_stringify),
        ("array_push", 2, native_array_push),
    ];
    for (name, arity, func) in natives {
        // Registration happens once against a fresh root scope.
        let _ = scope.borrow_mut().write(
            name,
            Value::native_function(name, *arity, *func),
            Flags::INIT | Flags::CONSTANT,
        );
    }
}

fn argument(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_else(Value::null)
}

fn native_write(interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    for arg in &args {
        interpreter.output.push_str(&arg.to_string_value());
    }
    Ok(Value::null())
}

fn native_print(interpreter: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let rendered: Vec<String> = args.iter().map(|arg| arg.to_string_value()).collect();
    interpreter.output.push_str(&rendered.join(" "));
    interpreter.output.push('\n');
    Ok(Value::null())
}

fn native_length(_: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let value = argument(&args, 0);
    Ok(match &value.kind {
        ValueKind::String(s) => Value::numeric(ops::string_length(s) as f64),
        ValueKind::Array(items) => Value::numeric(items.borrow().len() as f64),
        _ => Value::null(),
    })
}

fn native_typeof(_: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    Ok(Value::string(argument(&args, 0).kind_name()))
}

fn native_stringify(_: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    Ok(Value::string(argument(&args, 0).to_string_value()))
}

fn native_array_push(_: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
    let target = argument(&args, 0);
    let ValueKind::Array(items) = &target.kind else {
        return Err(RuntimeError::new("array_push expects an Array"));
    };
    items.borrow_mut().push(argument(&args, 1));
    Ok(target.clone())
}
