use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{Location, Program};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::trace::trace_stage;
use crate::value::{RuntimeError, Value};

mod calls;
mod class;
mod native;
mod ops;
mod prelude;
mod resolution;
mod run;
pub(crate) mod scope;

use scope::{Scope, ScopeRef};

/// Per-program execution context threaded through evaluation for
/// diagnostics: the source path and the shared call stack.
#[derive(Clone)]
pub struct Context {
    pub path: String,
    pub trace: Rc<RefCell<Vec<TraceEntry>>>,
}

/// One live call-stack frame. Pushed on call entry, popped on every exit
/// path of the frame.
pub struct TraceEntry {
    pub name: String,
    pub location: Location,
    pub scope: ScopeRef,
    pub path: String,
}

pub struct Interpreter {
    top: ScopeRef,
    trace: Rc<RefCell<Vec<TraceEntry>>>,
    program_path: String,
    output: String,
}

impl Interpreter {
    /// Top scope with the native functions registered and the prelude
    /// executed from `$CHARLYDIR/src/std/prelude.charly`. Any prelude
    /// failure aborts construction.
    pub fn new() -> Result<Self, RuntimeError> {
        let mut interpreter = Self::without_prelude();
        interpreter.load_prelude()?;
        Ok(interpreter)
    }

    /// Bare top scope with only the native functions. The prelude can be
    /// attached later with `load_prelude` or `load_prelude_from`.
    pub fn without_prelude() -> Self {
        let top = Scope::root();
        native::register_native_functions(&top);
        Self {
            top,
            trace: Rc::new(RefCell::new(Vec::new())),
            program_path: "<main>".to_string(),
            output: String::new(),
        }
    }

    pub fn set_program_path(&mut self, path: &str) {
        self.program_path = path.to_string();
    }

    pub fn top_scope(&self) -> ScopeRef {
        self.top.clone()
    }

    /// Text produced by `print`/`write` since the last `take_output`.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Lex, parse and execute a source string against the top scope.
    pub fn run(&mut self, source: &str) -> Result<Value, RuntimeError> {
        let program = self.parse(&self.program_path.clone(), source)?;
        let top = self.top.clone();
        self.exec_program(&program, &top)
    }

    pub(crate) fn parse(&self, path: &str, source: &str) -> Result<Program, RuntimeError> {
        let tokens = Lexer::new(source).tokenize()?;
        let tree = Parser::new(tokens).parse_program()?;
        Ok(Program {
            path: path.to_string(),
            tree,
        })
    }

    pub fn exec_program(
        &mut self,
        program: &Program,
        scope: &ScopeRef,
    ) -> Result<Value, RuntimeError> {
        trace_stage!(Exec, "executing {}", program.path);
        let context = Context {
            path: program.path.clone(),
            trace: self.trace.clone(),
        };
        self.eval(&program.tree, scope, &context)
    }
}
