use super::Value;
use crate::ast::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotDefined,
    AlreadyDefined,
    ReservedName,
    ConstantAssignment,
    NotCallable,
    NotInstantiable,
    ArityMismatch,
    NotAnIdentifier,
    NotAClass,
    IllegalClassBody,
    NotImplemented,
    UnexpectedNode,
    PreludeMissing,
    ParseExpected,
    ParseGeneric,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::NotDefined => "NOT_DEFINED",
            ErrorKind::AlreadyDefined => "ALREADY_DEFINED",
            ErrorKind::ReservedName => "RESERVED_NAME",
            ErrorKind::ConstantAssignment => "CONSTANT_ASSIGNMENT",
            ErrorKind::NotCallable => "NOT_CALLABLE",
            ErrorKind::NotInstantiable => "NOT_INSTANTIABLE",
            ErrorKind::ArityMismatch => "ARITY_MISMATCH",
            ErrorKind::NotAnIdentifier => "NOT_AN_IDENTIFIER",
            ErrorKind::NotAClass => "NOT_A_CLASS",
            ErrorKind::IllegalClassBody => "ILLEGAL_CLASS_BODY",
            ErrorKind::NotImplemented => "NOT_IMPLEMENTED",
            ErrorKind::UnexpectedNode => "UNEXPECTED_NODE",
            ErrorKind::PreludeMissing => "PRELUDE_MISSING",
            ErrorKind::ParseExpected => "PARSE_EXPECTED",
            ErrorKind::ParseGeneric => "PARSE_GENERIC",
        };
        write!(f, "{}", name)
    }
}

impl ErrorKind {
    pub fn is_parse(self) -> bool {
        matches!(self, ErrorKind::ParseExpected | ErrorKind::ParseGeneric)
    }
}

/// One rendered call-stack frame, snapshotted into an error while the
/// frames were still live.
#[derive(Debug, Clone)]
pub struct TraceFrame {
    pub name: String,
    pub path: String,
    pub location: Location,
}

/// Runtime error, doubling as the carrier for the non-local exits: a
/// `return` travels as `return_value`, a `break` as `is_break`. Call
/// frames and loops intercept those; everything else unwinds to the top.
#[derive(Debug)]
pub struct RuntimeError {
    pub message: String,
    pub kind: Option<ErrorKind>,
    pub location: Option<Location>,
    /// Call stack at raise time, oldest frame first.
    pub trace: Vec<TraceFrame>,
    pub return_value: Option<Value>,
    pub is_break: bool,
}

impl RuntimeError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
            location: None,
            trace: Vec::new(),
            return_value: None,
            is_break: false,
        }
    }

    pub(crate) fn with_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            ..Self::new(message)
        }
    }

    /// Attach a source location unless one is already set.
    pub(crate) fn at(mut self, location: Location) -> Self {
        self.location.get_or_insert(location);
        self
    }

    pub(crate) fn return_signal(value: Value) -> Self {
        Self {
            return_value: Some(value),
            ..Self::new("")
        }
    }

    pub(crate) fn break_signal() -> Self {
        Self {
            is_break: true,
            ..Self::new("")
        }
    }

    /// Control signals are not diagnostics; they are consumed by call
    /// frames and loops.
    pub(crate) fn is_signal(&self) -> bool {
        self.return_value.is_some() || self.is_break
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "{}: {}", kind, self.message)?,
            None => write!(f, "{}", self.message)?,
        }
        if let Some(location) = self.location {
            write!(f, " (line {}, col {})", location.line, location.column)?;
        }
        for frame in self.trace.iter().rev() {
            write!(
                f,
                "\n  at {} ({}:{})",
                frame.name, frame.path, frame.location
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display_names_are_stable() {
        assert_eq!(ErrorKind::NotDefined.to_string(), "NOT_DEFINED");
        assert_eq!(
            ErrorKind::ConstantAssignment.to_string(),
            "CONSTANT_ASSIGNMENT"
        );
        assert_eq!(ErrorKind::PreludeMissing.to_string(), "PRELUDE_MISSING");
    }

    #[test]
    fn error_kind_parse_classification() {
        assert!(ErrorKind::ParseExpected.is_parse());
        assert!(ErrorKind::ParseGeneric.is_parse());
        assert!(!ErrorKind::NotDefined.is_parse());
    }

    #[test]
    fn display_renders_trace_most_recent_first() {
        let mut err = RuntimeError::with_kind(ErrorKind::NotDefined, "x is not defined")
            .at(Location::new(3, 1));
        err.trace = vec![
            TraceFrame {
                name: "outer".to_string(),
                path: "main.charly".to_string(),
                location: Location::new(10, 1),
            },
            TraceFrame {
                name: "inner".to_string(),
                path: "main.charly".to_string(),
                location: Location::new(11, 5),
            },
        ];
        let rendered = err.to_string();
        let inner = rendered.find("at inner").unwrap();
        let outer = rendered.find("at outer").unwrap();
        assert!(inner < outer);
    }

    #[test]
    fn signals_are_not_diagnostics() {
        assert!(RuntimeError::return_signal(Value::null()).is_signal());
        assert!(RuntimeError::break_signal().is_signal());
        assert!(!RuntimeError::new("boom").is_signal());
    }
}
