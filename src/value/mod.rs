use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::Node;
use crate::runtime::scope::{Scope, ScopeRef};
use crate::runtime::Interpreter;

mod display;
mod error;

pub use error::{ErrorKind, RuntimeError, TraceFrame};

pub(crate) type NativeFn = fn(&mut Interpreter, Vec<Value>) -> Result<Value, RuntimeError>;

/// A runtime value. Every value carries a data scope holding its
/// dynamically attached members; clones share both the payload and the
/// data scope.
#[derive(Clone)]
pub struct Value {
    pub kind: ValueKind,
    pub data: ScopeRef,
}

#[derive(Clone)]
pub enum ValueKind {
    Null,
    Boolean(bool),
    Numeric(f64),
    String(String),
    Array(Rc<RefCell<Vec<Value>>>),
    Function(Rc<FunctionData>),
    NativeFunction(Rc<NativeFunctionData>),
    Class(Rc<ClassData>),
    PrimitiveClass(Rc<PrimitiveClassData>),
    Object(Rc<ObjectData>),
}

/// A closure: body plus the scope that was active at definition time.
/// The captured scope is shared; each call gets a fresh child of it.
pub struct FunctionData {
    pub name: Option<String>,
    /// IdentifierLiteral nodes, validated when the function is called.
    pub parameters: Vec<Node>,
    pub body: Vec<Node>,
    pub scope: ScopeRef,
}

pub struct NativeFunctionData {
    pub name: &'static str,
    pub arity: usize,
    pub(crate) func: NativeFn,
}

pub struct ClassData {
    pub name: String,
    /// Declared property names, in declaration order.
    pub properties: Vec<String>,
    /// Unevaluated FunctionLiteral nodes, in declaration order.
    pub methods: Vec<Node>,
    /// Parent classes in declaration order; later parents take method
    /// precedence over earlier ones.
    pub parents: Vec<Rc<ClassData>>,
    pub scope: ScopeRef,
}

pub struct PrimitiveClassData {
    pub name: String,
    pub scope: ScopeRef,
}

pub struct ObjectData {
    pub class: Rc<ClassData>,
}

impl Value {
    pub fn null() -> Self {
        Self::with_fresh_data(ValueKind::Null)
    }

    pub fn boolean(value: bool) -> Self {
        Self::with_fresh_data(ValueKind::Boolean(value))
    }

    pub fn numeric(value: f64) -> Self {
        Self::with_fresh_data(ValueKind::Numeric(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::with_fresh_data(ValueKind::String(value.into()))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Self::with_fresh_data(ValueKind::Array(Rc::new(RefCell::new(items))))
    }

    pub fn function(data: FunctionData) -> Self {
        Self::with_fresh_data(ValueKind::Function(Rc::new(data)))
    }

    pub(crate) fn native_function(name: &'static str, arity: usize, func: NativeFn) -> Self {
        Self::with_fresh_data(ValueKind::NativeFunction(Rc::new(NativeFunctionData {
            name,
            arity,
            func,
        })))
    }

    /// The class value's data scope is a fresh child of its captured scope.
    pub fn class(data: ClassData) -> Self {
        let scope = Scope::child_of(&data.scope);
        Self {
            kind: ValueKind::Class(Rc::new(data)),
            data: scope,
        }
    }

    pub fn primitive_class(data: PrimitiveClassData) -> Self {
        let scope = Scope::child_of(&data.scope);
        Self {
            kind: ValueKind::PrimitiveClass(Rc::new(data)),
            data: scope,
        }
    }

    /// An instance whose data scope chains to the class's captured scope.
    pub fn object(class: Rc<ClassData>) -> Self {
        let scope = Scope::child_of(&class.scope);
        Self {
            kind: ValueKind::Object(Rc::new(ObjectData { class })),
            data: scope,
        }
    }

    fn with_fresh_data(kind: ValueKind) -> Self {
        Self {
            kind,
            data: Scope::root(),
        }
    }

    /// Null and false are falsy; everything else is truthy.
    pub fn truthy(&self) -> bool {
        !matches!(self.kind, ValueKind::Null | ValueKind::Boolean(false))
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ValueKind::Null => "Null",
            ValueKind::Boolean(_) => "Boolean",
            ValueKind::Numeric(_) => "Numeric",
            ValueKind::String(_) => "String",
            ValueKind::Array(_) => "Array",
            ValueKind::Function(_) | ValueKind::NativeFunction(_) => "Function",
            ValueKind::Class(_) => "Class",
            ValueKind::PrimitiveClass(_) => "PrimitiveClass",
            ValueKind::Object(_) => "Object",
        }
    }

    /// Scope-visible primitive class name for this value's kind, if the
    /// kind has one. Objects and primitive classes themselves do not fall
    /// back to a primitive method table.
    pub fn primitive_class_name(&self) -> Option<&'static str> {
        match &self.kind {
            ValueKind::Null => Some("Null"),
            ValueKind::Boolean(_) => Some("Boolean"),
            ValueKind::Numeric(_) => Some("Numeric"),
            ValueKind::String(_) => Some("String"),
            ValueKind::Array(_) => Some("Array"),
            ValueKind::Function(_) | ValueKind::NativeFunction(_) => Some("Function"),
            ValueKind::Class(_) => Some("Class"),
            ValueKind::PrimitiveClass(_) | ValueKind::Object(_) => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self.kind,
            ValueKind::Function(_) | ValueKind::NativeFunction(_)
        )
    }

    /// Two values sharing one data scope are the same runtime datum.
    pub(crate) fn same_data(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }

    /// Reference identity for the kinds compared by identity (`==` on
    /// functions, classes and objects).
    pub(crate) fn same_identity(&self, other: &Value) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Function(a), ValueKind::Function(b)) => Rc::ptr_eq(a, b),
            (ValueKind::NativeFunction(a), ValueKind::NativeFunction(b)) => Rc::ptr_eq(a, b),
            (ValueKind::Class(a), ValueKind::Class(b)) => Rc::ptr_eq(a, b),
            (ValueKind::Object(a), ValueKind::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl PartialEq for Value {
    /// Structural equality for primitives, identity for everything that
    /// closes over a scope. The language-level `==` operator has its own
    /// rules and does not go through this.
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (ValueKind::Null, ValueKind::Null) => true,
            (ValueKind::Boolean(a), ValueKind::Boolean(b)) => a == b,
            (ValueKind::Numeric(a), ValueKind::Numeric(b)) => a == b,
            (ValueKind::String(a), ValueKind::String(b)) => a == b,
            (ValueKind::Array(a), ValueKind::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (ValueKind::PrimitiveClass(a), ValueKind::PrimitiveClass(b)) => Rc::ptr_eq(a, b),
            _ => self.same_identity(other),
        }
    }
}

impl std::fmt::Debug for Value {
    /// Shallow by intent: data scopes routinely contain closures over the
    /// scope being printed.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ValueKind::Null => write!(f, "Null"),
            ValueKind::Boolean(b) => write!(f, "Boolean({})", b),
            ValueKind::Numeric(n) => write!(f, "Numeric({})", n),
            ValueKind::String(s) => write!(f, "String({:?})", s),
            ValueKind::Array(items) => write!(f, "Array(len={})", items.borrow().len()),
            ValueKind::Function(data) => {
                write!(f, "Function({})", data.name.as_deref().unwrap_or("anonymous"))
            }
            ValueKind::NativeFunction(data) => write!(f, "NativeFunction({})", data.name),
            ValueKind::Class(data) => write!(f, "Class({})", data.name),
            ValueKind::PrimitiveClass(data) => write!(f, "PrimitiveClass({})", data.name),
            ValueKind::Object(data) => write!(f, "Object({})", data.class.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_is_false_only_for_null_and_false() {
        assert!(!Value::null().truthy());
        assert!(!Value::boolean(false).truthy());
        assert!(Value::boolean(true).truthy());
        assert!(Value::numeric(0.0).truthy());
        assert!(Value::string("").truthy());
        assert!(Value::array(vec![]).truthy());
    }

    #[test]
    fn primitive_class_names_match_the_kind_map() {
        assert_eq!(Value::null().primitive_class_name(), Some("Null"));
        assert_eq!(Value::numeric(1.0).primitive_class_name(), Some("Numeric"));
        assert_eq!(Value::string("x").primitive_class_name(), Some("String"));
        assert_eq!(Value::boolean(true).primitive_class_name(), Some("Boolean"));
        assert_eq!(Value::array(vec![]).primitive_class_name(), Some("Array"));
    }

    #[test]
    fn clones_share_the_data_scope() {
        use crate::runtime::scope::Flags;
        let value = Value::numeric(1.0);
        let clone = value.clone();
        clone
            .data
            .borrow_mut()
            .write("tag", Value::string("x"), Flags::INIT)
            .unwrap();
        assert!(value.data.borrow().contains("tag", Flags::IGNORE_PARENT));
    }
}
