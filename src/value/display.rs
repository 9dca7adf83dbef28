use super::{Value, ValueKind};

/// Render a numeric the way scripts expect to read it: whole values print
/// without a fractional part, NAN prints as the literal.
pub(crate) fn format_numeric(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_finite() && value == value.trunc() && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    format!("{}", value)
}

impl Value {
    /// User-facing stringification, used by `+` concatenation, the
    /// `stringify`/`print` natives and the REPL echo.
    pub fn to_string_value(&self) -> String {
        match &self.kind {
            ValueKind::Null => "null".to_string(),
            ValueKind::Boolean(true) => "true".to_string(),
            ValueKind::Boolean(false) => "false".to_string(),
            ValueKind::Numeric(n) => format_numeric(*n),
            ValueKind::String(s) => s.clone(),
            ValueKind::Array(items) => {
                let rendered: Vec<String> = items
                    .borrow()
                    .iter()
                    .map(|item| item.to_string_value())
                    .collect();
                format!("[{}]", rendered.join(", "))
            }
            ValueKind::Function(data) => match &data.name {
                Some(name) => format!("func {}", name),
                None => "func".to_string(),
            },
            ValueKind::NativeFunction(data) => format!("func {}", data.name),
            ValueKind::Class(data) => format!("class {}", data.name),
            ValueKind::PrimitiveClass(data) => format!("primitive class {}", data.name),
            ValueKind::Object(data) => format!("instance of {}", data.class.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numerics_render_without_fraction() {
        assert_eq!(Value::numeric(25.0).to_string_value(), "25");
        assert_eq!(Value::numeric(-3.0).to_string_value(), "-3");
        assert_eq!(Value::numeric(2.5).to_string_value(), "2.5");
        assert_eq!(Value::numeric(f64::NAN).to_string_value(), "NAN");
    }

    #[test]
    fn arrays_render_recursively() {
        let nested = Value::array(vec![
            Value::numeric(1.0),
            Value::array(vec![Value::string("a"), Value::null()]),
        ]);
        assert_eq!(nested.to_string_value(), "[1, [a, null]]");
    }

    #[test]
    fn booleans_and_null_render_as_literals() {
        assert_eq!(Value::boolean(true).to_string_value(), "true");
        assert_eq!(Value::boolean(false).to_string_value(), "false");
        assert_eq!(Value::null().to_string_value(), "null");
    }
}
