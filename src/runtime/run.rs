use super::*;
use crate::ast::{Node, NodeKind};
use crate::runtime::scope::Flags;
use crate::value::{ErrorKind, FunctionData};

/// Names user code may neither declare nor assign. `self` is bound by the
/// call protocol when a method is invoked through member access.
pub(crate) const RESERVED_NAMES: &[&str] = &["self"];

pub(crate) fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

impl Interpreter {
    /// The recursive expression dispatcher. Already-computed values pass
    /// through unchanged.
    pub(crate) fn eval(
        &mut self,
        node: &Node,
        scope: &ScopeRef,
        context: &Context,
    ) -> Result<Value, RuntimeError> {
        match &node.kind {
            NodeKind::Value(value) => Ok(value.clone()),
            NodeKind::Block(statements) => self.exec_block(statements, scope, context),

            NodeKind::VariableInitialisation { name, expression } => {
                self.exec_initialisation(name, expression, Flags::INIT, node, scope, context)
            }
            NodeKind::ConstantInitialisation { name, expression } => self.exec_initialisation(
                name,
                expression,
                Flags::INIT | Flags::CONSTANT,
                node,
                scope,
                context,
            ),
            NodeKind::VariableAssignment { target, expression } => {
                self.exec_assignment(target, expression, scope, context)
            }

            NodeKind::IdentifierLiteral(name) => scope
                .borrow()
                .get(name, Flags::NONE)
                .map_err(|err| err.at(node.location)),
            NodeKind::NumericLiteral(value) => Ok(Value::numeric(*value)),
            NodeKind::StringLiteral(value) => Ok(Value::string(value.clone())),
            NodeKind::BooleanLiteral(value) => Ok(Value::boolean(*value)),
            NodeKind::NullLiteral => Ok(Value::null()),
            NodeKind::NANLiteral => Ok(Value::numeric(f64::NAN)),
            NodeKind::ArrayLiteral(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item, scope, context)?);
                }
                Ok(Value::array(values))
            }
            NodeKind::FunctionLiteral {
                name,
                parameters,
                block,
            } => Ok(Value::function(FunctionData {
                name: name.clone(),
                parameters: parameters.clone(),
                body: block.clone(),
                scope: scope.clone(),
            })),
            NodeKind::ClassLiteral { .. } => self.exec_class_literal(node, scope, context),
            NodeKind::PrimitiveClassLiteral { .. } => {
                self.exec_primitive_class_literal(node, scope)
            }

            NodeKind::CallExpression { .. } => self.exec_call_expression(node, scope, context),
            NodeKind::MemberExpression { .. } => {
                let (_, value) = self.exec_get_member_expression_pairs(node, scope, context)?;
                Ok(value)
            }

            NodeKind::UnaryExpression { operator, right } => {
                self.exec_unary_expression(*operator, right, node, scope, context)
            }
            NodeKind::BinaryExpression {
                operator,
                left,
                right,
            }
            | NodeKind::ComparisonExpression {
                operator,
                left,
                right,
            } => self.exec_binary_expression(*operator, left, right, node, scope, context),

            NodeKind::And { left, right } => {
                if !self.eval(left, scope, context)?.truthy() {
                    return Ok(Value::boolean(false));
                }
                let right = self.eval(right, scope, context)?;
                Ok(Value::boolean(right.truthy()))
            }
            NodeKind::Or { left, right } => {
                if self.eval(left, scope, context)?.truthy() {
                    return Ok(Value::boolean(true));
                }
                let right = self.eval(right, scope, context)?;
                Ok(Value::boolean(right.truthy()))
            }

            NodeKind::ReturnStatement(expression) => {
                let value = match expression {
                    Some(expression) => self.eval(expression, scope, context)?,
                    None => Value::null(),
                };
                Err(RuntimeError::return_signal(value))
            }
            NodeKind::BreakStatement => Err(RuntimeError::break_signal()),

            NodeKind::IfStatement {
                test,
                consequent,
                alternate,
            } => {
                let test = self.eval(test, scope, context)?;
                let branch_scope = Scope::child_of(scope);
                if test.truthy() {
                    self.exec_block(consequent, &branch_scope, context)
                } else {
                    match alternate {
                        Some(alternate) => self.eval(alternate, &branch_scope, context),
                        None => Ok(Value::null()),
                    }
                }
            }
            NodeKind::WhileStatement { test, consequent } => {
                // One child scope for the whole loop, not one per iteration.
                let loop_scope = Scope::child_of(scope);
                let mut result = Value::null();
                loop {
                    if !self.eval(test, &loop_scope, context)?.truthy() {
                        break;
                    }
                    match self.exec_block(consequent, &loop_scope, context) {
                        Ok(value) => result = value,
                        Err(err) if err.is_break => break,
                        Err(err) => return Err(err),
                    }
                }
                Ok(result)
            }

            other => Err(RuntimeError::with_kind(
                ErrorKind::UnexpectedNode,
                format!("Cannot evaluate a {} here", other.name()),
            )
            .at(node.location)),
        }
    }

    /// Statements run in order; the block's value is the last statement's.
    pub(crate) fn exec_block(
        &mut self,
        statements: &[Node],
        scope: &ScopeRef,
        context: &Context,
    ) -> Result<Value, RuntimeError> {
        let mut result = Value::null();
        for statement in statements {
            result = self.eval(statement, scope, context)?;
        }
        Ok(result)
    }

    fn exec_initialisation(
        &mut self,
        name: &str,
        expression: &Node,
        flags: Flags,
        node: &Node,
        scope: &ScopeRef,
        context: &Context,
    ) -> Result<Value, RuntimeError> {
        if is_reserved(name) {
            return Err(RuntimeError::with_kind(
                ErrorKind::ReservedName,
                format!("{} is a reserved name", name),
            )
            .at(node.location));
        }
        if scope.borrow().contains(name, Flags::IGNORE_PARENT) {
            return Err(RuntimeError::with_kind(
                ErrorKind::AlreadyDefined,
                format!("{} is already defined in this scope", name),
            )
            .at(node.location));
        }
        let value = self.eval(expression, scope, context)?;
        scope
            .borrow_mut()
            .write(name, value.clone(), flags)
            .map_err(|err| err.at(node.location))?;
        Ok(value)
    }

    fn exec_assignment(
        &mut self,
        target: &Node,
        expression: &Node,
        scope: &ScopeRef,
        context: &Context,
    ) -> Result<Value, RuntimeError> {
        match &target.kind {
            NodeKind::IdentifierLiteral(name) => {
                if is_reserved(name) {
                    return Err(RuntimeError::with_kind(
                        ErrorKind::ReservedName,
                        format!("{} is a reserved name", name),
                    )
                    .at(target.location));
                }
                if !scope.borrow().defined(name) {
                    return Err(RuntimeError::with_kind(
                        ErrorKind::NotDefined,
                        format!("{} is not defined", name),
                    )
                    .at(target.location));
                }
                if scope
                    .borrow()
                    .reference(name)
                    .is_some_and(|slot| slot.flags.contains(Flags::CONSTANT))
                {
                    return Err(RuntimeError::with_kind(
                        ErrorKind::ConstantAssignment,
                        format!("{} is a constant", name),
                    )
                    .at(target.location));
                }
                let value = self.eval(expression, scope, context)?;
                scope
                    .borrow_mut()
                    .write(name, value.clone(), Flags::NONE)
                    .map_err(|err| err.at(target.location))?;
                Ok(value)
            }
            NodeKind::MemberExpression {
                target: base_node,
                member,
            } => {
                let base = self.eval(base_node, scope, context)?;
                let value = self.eval(expression, scope, context)?;
                let exists = base.data.borrow().contains(member, Flags::IGNORE_PARENT);
                let flags = if exists { Flags::NONE } else { Flags::INIT };
                base.data
                    .borrow_mut()
                    .write(member, value.clone(), flags)
                    .map_err(|err| err.at(target.location))?;
                Ok(value)
            }
            NodeKind::IndexExpression { .. } => Err(RuntimeError::with_kind(
                ErrorKind::NotImplemented,
                "Index assignment is not implemented",
            )
            .at(target.location)),
            other => Err(RuntimeError::with_kind(
                ErrorKind::UnexpectedNode,
                format!("Cannot assign to a {}", other.name()),
            )
            .at(target.location)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Location;

    #[test]
    fn values_pass_through_eval_unchanged() {
        let mut interpreter = Interpreter::without_prelude();
        let scope = interpreter.top_scope();
        let context = Context {
            path: "<test>".to_string(),
            trace: Rc::new(RefCell::new(Vec::new())),
        };
        let original = Value::numeric(42.0);
        let node = Node::new(NodeKind::Value(original.clone()), Location::new(1, 1));
        let result = interpreter.eval(&node, &scope, &context).unwrap();
        assert!(result.same_data(&original));
    }
}
