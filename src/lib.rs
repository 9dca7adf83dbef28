#![allow(clippy::result_large_err)]

mod ast;
mod lexer;
mod parser;
pub mod repl;
mod runtime;
mod trace;
mod value;

pub use ast::{Location, Node, NodeKind, Operator, Program};
pub use runtime::scope::{Flags, Scope, ScopeRef, Slot};
pub use runtime::{Context, Interpreter, TraceEntry};
pub use value::{ErrorKind, RuntimeError, TraceFrame, Value, ValueKind};
