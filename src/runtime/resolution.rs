use super::*;
use crate::ast::{Node, NodeKind};
use crate::runtime::scope::Flags;
use crate::value::{ErrorKind, ValueKind};

impl Interpreter {
    /// Evaluate a member expression to its `(base, value)` pair. The pair
    /// form is what call expressions need so the callee remembers its
    /// receiver; rvalue positions keep only the value.
    pub(crate) fn exec_get_member_expression_pairs(
        &mut self,
        node: &Node,
        scope: &ScopeRef,
        context: &Context,
    ) -> Result<(Value, Value), RuntimeError> {
        let NodeKind::MemberExpression { target, member } = &node.kind else {
            return Err(RuntimeError::with_kind(
                ErrorKind::UnexpectedNode,
                "Expected a member expression",
            )
            .at(node.location));
        };
        let base = self.eval(target, scope, context)?;

        let exists = base.data.borrow().contains(member, Flags::IGNORE_PARENT);
        if exists {
            let value = base
                .data
                .borrow()
                .get(member, Flags::IGNORE_PARENT)
                .map_err(|err| err.at(node.location))?;
            return Ok((base, value));
        }

        // Objects resolve members on themselves only; every other kind
        // falls back to its primitive class method table.
        if !matches!(base.kind, ValueKind::Object(_)) {
            if let Some(method) = self.lookup_primitive_method(scope, &base, member) {
                return Ok((base, method));
            }
        }

        Ok((base, Value::null()))
    }

    /// Find the named primitive class in the active scope and look the
    /// method up in its data, local slots only. Absent methods are simply
    /// absent, never an error.
    pub(super) fn lookup_primitive_method(
        &self,
        scope: &ScopeRef,
        value: &Value,
        name: &str,
    ) -> Option<Value> {
        let class_name = value.primitive_class_name()?;
        let class_value = scope.borrow().get(class_name, Flags::NONE).ok()?;
        if !matches!(class_value.kind, ValueKind::PrimitiveClass(_)) {
            return None;
        }
        let result = class_value
            .data
            .borrow()
            .get(name, Flags::IGNORE_PARENT)
            .ok();
        result
    }
}
