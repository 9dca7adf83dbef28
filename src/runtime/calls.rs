use super::*;
use crate::ast::{Node, NodeKind};
use crate::runtime::scope::Flags;
use crate::value::{ErrorKind, FunctionData, NativeFunctionData, TraceFrame, ValueKind};

impl Interpreter {
    pub(super) fn exec_call_expression(
        &mut self,
        node: &Node,
        scope: &ScopeRef,
        context: &Context,
    ) -> Result<Value, RuntimeError> {
        let NodeKind::CallExpression { callee, arguments } = &node.kind else {
            return Err(RuntimeError::with_kind(
                ErrorKind::UnexpectedNode,
                "Expected a call expression",
            )
            .at(node.location));
        };
        let (base, callee_value) = match &callee.kind {
            NodeKind::MemberExpression { .. } => {
                let (base, value) = self.exec_get_member_expression_pairs(callee, scope, context)?;
                (Some(base), value)
            }
            _ => (None, self.eval(callee, scope, context)?),
        };
        self.exec_callable(callee_value, base, arguments, scope, context, node.location)
    }

    /// Callee-kind dispatch shared by call expressions, operator overrides
    /// and constructor invocation.
    pub(super) fn exec_callable(
        &mut self,
        callee: Value,
        base: Option<Value>,
        arguments: &[Node],
        scope: &ScopeRef,
        context: &Context,
        location: crate::ast::Location,
    ) -> Result<Value, RuntimeError> {
        match &callee.kind {
            ValueKind::Function(func) => {
                let func = func.clone();
                self.exec_function_call(&func, base, arguments, scope, context, location)
            }
            ValueKind::NativeFunction(native) => {
                let native = native.clone();
                self.exec_native_call(&native, arguments, scope, context, location)
            }
            ValueKind::Class(class) => {
                let class = class.clone();
                self.exec_object_construction(&class, arguments, scope, context, location)
            }
            ValueKind::PrimitiveClass(data) => Err(RuntimeError::with_kind(
                ErrorKind::NotInstantiable,
                format!("{} is a primitive class and cannot be instantiated", data.name),
            )
            .at(location)),
            _ => Err(RuntimeError::with_kind(
                ErrorKind::NotCallable,
                format!("Cannot call a {}", callee.kind_name()),
            )
            .at(location)),
        }
    }

    pub(crate) fn exec_function_call(
        &mut self,
        func: &Rc<FunctionData>,
        base: Option<Value>,
        arguments: &[Node],
        scope: &ScopeRef,
        context: &Context,
        location: crate::ast::Location,
    ) -> Result<Value, RuntimeError> {
        // Missing arguments are an error; extra ones are dropped.
        if arguments.len() < func.parameters.len() {
            return Err(RuntimeError::with_kind(
                ErrorKind::ArityMismatch,
                format!(
                    "Expected {} arguments, got {}",
                    func.parameters.len(),
                    arguments.len()
                ),
            )
            .at(location));
        }
        let mut argument_values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            argument_values.push(self.eval(argument, scope, context)?);
        }

        let call_scope = Scope::child_of(&func.scope);
        for (index, parameter) in func.parameters.iter().enumerate() {
            let NodeKind::IdentifierLiteral(name) = &parameter.kind else {
                return Err(RuntimeError::with_kind(
                    ErrorKind::NotAnIdentifier,
                    "Function parameters must be identifiers",
                )
                .at(parameter.location));
            };
            call_scope
                .borrow_mut()
                .write(name, argument_values[index].clone(), Flags::INIT)
                .map_err(|err| err.at(parameter.location))?;
        }
        if let Some(base) = &base {
            call_scope
                .borrow_mut()
                .write("self", base.clone(), Flags::INIT | Flags::CONSTANT)
                .map_err(|err| err.at(location))?;
        }

        let name = func
            .name
            .clone()
            .unwrap_or_else(|| "anonymous".to_string());
        crate::trace::trace_stage!(Call, "{} at {}:{}", name, context.path, location);
        context.trace.borrow_mut().push(TraceEntry {
            name,
            location,
            scope: call_scope.clone(),
            path: context.path.clone(),
        });

        let result = match self.exec_block(&func.body, &call_scope, context) {
            Ok(value) => Ok(value),
            Err(err) if err.return_value.is_some() => Ok(err.return_value.unwrap_or_else(Value::null)),
            Err(mut err) => {
                // Snapshot the still-live stack into the error before this
                // frame pops; break signals keep climbing untouched.
                if !err.is_signal() && err.trace.is_empty() {
                    err.trace = snapshot_trace(context);
                }
                Err(err)
            }
        };
        context.trace.borrow_mut().pop();
        result
    }

    fn exec_native_call(
        &mut self,
        native: &Rc<NativeFunctionData>,
        arguments: &[Node],
        scope: &ScopeRef,
        context: &Context,
        location: crate::ast::Location,
    ) -> Result<Value, RuntimeError> {
        if arguments.len() < native.arity {
            return Err(RuntimeError::with_kind(
                ErrorKind::ArityMismatch,
                format!(
                    "Expected {} arguments, got {}",
                    native.arity,
                    arguments.len()
                ),
            )
            .at(location));
        }
        let mut argument_values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            argument_values.push(self.eval(argument, scope, context)?);
        }
        (native.func)(self, argument_values).map_err(|err| err.at(location))
    }
}

fn snapshot_trace(context: &Context) -> Vec<TraceFrame> {
    context
        .trace
        .borrow()
        .iter()
        .map(|entry| TraceFrame {
            name: entry.name.clone(),
            path: entry.path.clone(),
            location: entry.location,
        })
        .collect()
}
