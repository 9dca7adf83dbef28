use super::*;
use crate::ast::{Node, Operator};
use crate::runtime::scope::Flags;
use crate::value::ValueKind;
use num_traits::ToPrimitive;
use unicode_segmentation::UnicodeSegmentation;

/// User-visible string length: grapheme clusters, not bytes.
pub(crate) fn string_length(s: &str) -> usize {
    s.graphemes(true).count()
}

impl Interpreter {
    pub(super) fn exec_unary_expression(
        &mut self,
        operator: Operator,
        right: &Node,
        node: &Node,
        scope: &ScopeRef,
        context: &Context,
    ) -> Result<Value, RuntimeError> {
        let operand = self.eval(right, scope, context)?;
        if let Some(method) = self.find_operator_override(&operand, operator, scope) {
            return self.exec_callable(method, Some(operand), &[], scope, context, node.location);
        }
        Ok(match operator {
            Operator::Not => Value::boolean(!operand.truthy()),
            Operator::Minus => match operand.kind {
                ValueKind::Numeric(n) => Value::numeric(-n),
                _ => Value::numeric(f64::NAN),
            },
            _ => Value::numeric(f64::NAN),
        })
    }

    pub(super) fn exec_binary_expression(
        &mut self,
        operator: Operator,
        left: &Node,
        right: &Node,
        node: &Node,
        scope: &ScopeRef,
        context: &Context,
    ) -> Result<Value, RuntimeError> {
        let left = self.eval(left, scope, context)?;
        if let Some(method) = self.find_operator_override(&left, operator, scope) {
            // The override call evaluates the right operand itself, through
            // the normal argument path.
            return self.exec_callable(
                method,
                Some(left),
                std::slice::from_ref(right),
                scope,
                context,
                node.location,
            );
        }
        let right = self.eval(right, scope, context)?;
        Ok(match operator {
            Operator::Plus
            | Operator::Minus
            | Operator::Mult
            | Operator::Divd
            | Operator::Mod
            | Operator::Pow => builtin_arithmetic(operator, &left, &right),
            Operator::Less
            | Operator::Greater
            | Operator::LessEqual
            | Operator::GreaterEqual
            | Operator::Equal => builtin_comparison(operator, &left, &right),
            Operator::Not => Value::boolean(!right.truthy()),
        })
    }

    /// Operator dispatch, left-operand-driven: first the operand's own data
    /// scope, then the primitive class table for the operand's kind. Only a
    /// callable slot intercepts the operator.
    fn find_operator_override(
        &self,
        operand: &Value,
        operator: Operator,
        scope: &ScopeRef,
    ) -> Option<Value> {
        let name = operator.method_name();
        if operand.data.borrow().contains(name, Flags::IGNORE_PARENT) {
            let method = operand.data.borrow().get(name, Flags::IGNORE_PARENT).ok()?;
            return method.is_callable().then_some(method);
        }
        let method = self.lookup_primitive_method(scope, operand, name)?;
        method.is_callable().then_some(method)
    }
}

fn builtin_arithmetic(operator: Operator, left: &Value, right: &Value) -> Value {
    match (operator, &left.kind, &right.kind) {
        (Operator::Plus, ValueKind::Numeric(l), ValueKind::Numeric(r)) => Value::numeric(l + r),
        (Operator::Minus, ValueKind::Numeric(l), ValueKind::Numeric(r)) => Value::numeric(l - r),
        (Operator::Mult, ValueKind::Numeric(l), ValueKind::Numeric(r)) => {
            if *l == 0.0 || *r == 0.0 {
                Value::numeric(0.0)
            } else {
                Value::numeric(l * r)
            }
        }
        (Operator::Divd, ValueKind::Numeric(l), ValueKind::Numeric(r)) => {
            if *l == 0.0 || *r == 0.0 {
                Value::null()
            } else {
                Value::numeric(l / r)
            }
        }
        (Operator::Mod, ValueKind::Numeric(l), ValueKind::Numeric(r)) => {
            let l = l.trunc().to_i64().unwrap_or(0);
            let r = r.trunc().to_i64().unwrap_or(0);
            if r == 0 {
                Value::null()
            } else {
                Value::numeric((l % r) as f64)
            }
        }
        (Operator::Pow, ValueKind::Numeric(l), ValueKind::Numeric(r)) => Value::numeric(l.powf(*r)),

        (Operator::Plus, ValueKind::String(l), ValueKind::String(r)) => {
            Value::string(format!("{}{}", l, r))
        }
        (Operator::Plus, ValueKind::String(l), _) => {
            Value::string(format!("{}{}", l, right.to_string_value()))
        }
        (Operator::Plus, _, ValueKind::String(r)) => {
            Value::string(format!("{}{}", left.to_string_value(), r))
        }
        (Operator::Mult, ValueKind::String(s), ValueKind::Numeric(n))
        | (Operator::Mult, ValueKind::Numeric(n), ValueKind::String(s)) => {
            let count = n.trunc().to_i64().unwrap_or(0).max(0) as usize;
            Value::string(s.repeat(count))
        }

        _ => Value::numeric(f64::NAN),
    }
}

fn builtin_comparison(operator: Operator, left: &Value, right: &Value) -> Value {
    if operator == Operator::Equal {
        return Value::boolean(builtin_equals(left, right));
    }
    let result = match (&left.kind, &right.kind) {
        (ValueKind::Numeric(l), ValueKind::Numeric(r)) => match operator {
            Operator::Less => l < r,
            Operator::Greater => l > r,
            Operator::LessEqual => l <= r,
            Operator::GreaterEqual => l >= r,
            _ => false,
        },
        // Ordered string comparison goes by length, not content.
        (ValueKind::String(l), ValueKind::String(r)) => {
            let l = string_length(l);
            let r = string_length(r);
            match operator {
                Operator::Less => l < r,
                Operator::Greater => l > r,
                Operator::LessEqual => l <= r,
                Operator::GreaterEqual => l >= r,
                _ => false,
            }
        }
        _ => false,
    };
    Value::boolean(result)
}

fn builtin_equals(left: &Value, right: &Value) -> bool {
    match (&left.kind, &right.kind) {
        (ValueKind::Numeric(l), ValueKind::Numeric(r)) => l == r,
        (ValueKind::Boolean(l), ValueKind::Boolean(r)) => l == r,
        (ValueKind::String(l), ValueKind::String(r)) => l == r,
        (ValueKind::Null, ValueKind::Null) => true,
        // The null comparison is asymmetric: null on the left matches a
        // false boolean, null on the right matches a true one.
        (ValueKind::Null, ValueKind::Boolean(r)) => !r,
        (ValueKind::Boolean(l), ValueKind::Null) => *l,
        (ValueKind::Null, _) | (_, ValueKind::Null) => false,
        (ValueKind::Boolean(l), _) => *l == right.truthy(),
        (_, ValueKind::Boolean(r)) => left.truthy() == *r,
        _ => left.same_identity(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_boolean_equality_is_asymmetric() {
        assert!(builtin_equals(&Value::null(), &Value::boolean(false)));
        assert!(!builtin_equals(&Value::null(), &Value::boolean(true)));
        assert!(builtin_equals(&Value::boolean(true), &Value::null()));
        assert!(!builtin_equals(&Value::boolean(false), &Value::null()));
    }

    #[test]
    fn booleans_coerce_other_kinds_to_truthiness() {
        assert!(builtin_equals(&Value::boolean(true), &Value::numeric(5.0)));
        assert!(builtin_equals(&Value::numeric(5.0), &Value::boolean(true)));
        assert!(!builtin_equals(&Value::boolean(false), &Value::numeric(0.0)));
    }

    #[test]
    fn zero_short_circuits_multiplication_and_division() {
        let zero = Value::numeric(0.0);
        let nan = Value::numeric(f64::NAN);
        assert!(matches!(
            builtin_arithmetic(Operator::Mult, &zero, &nan).kind,
            ValueKind::Numeric(n) if n == 0.0
        ));
        assert!(matches!(
            builtin_arithmetic(Operator::Divd, &Value::numeric(1.0), &zero).kind,
            ValueKind::Null
        ));
    }

    #[test]
    fn modulo_truncates_to_integers() {
        let result = builtin_arithmetic(
            Operator::Mod,
            &Value::numeric(7.9),
            &Value::numeric(3.2),
        );
        assert!(matches!(result.kind, ValueKind::Numeric(n) if n == 1.0));
        assert!(matches!(
            builtin_arithmetic(Operator::Mod, &Value::numeric(1.0), &Value::numeric(0.0)).kind,
            ValueKind::Null
        ));
    }

    #[test]
    fn string_ordering_compares_lengths() {
        let ab = Value::string("ab");
        let xyz = Value::string("xyz");
        assert!(matches!(
            builtin_comparison(Operator::Less, &ab, &xyz).kind,
            ValueKind::Boolean(true)
        ));
        assert!(matches!(
            builtin_comparison(Operator::GreaterEqual, &xyz, &ab).kind,
            ValueKind::Boolean(true)
        ));
    }

    #[test]
    fn mismatched_arithmetic_yields_nan() {
        let result = builtin_arithmetic(Operator::Minus, &Value::string("a"), &Value::numeric(1.0));
        assert!(matches!(result.kind, ValueKind::Numeric(n) if n.is_nan()));
    }
}
