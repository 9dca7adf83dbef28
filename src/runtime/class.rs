use super::*;
use crate::ast::{Node, NodeKind};
use crate::runtime::scope::Flags;
use crate::value::{ClassData, ErrorKind, FunctionData, PrimitiveClassData, ValueKind};

impl Interpreter {
    pub(super) fn exec_class_literal(
        &mut self,
        node: &Node,
        scope: &ScopeRef,
        _context: &Context,
    ) -> Result<Value, RuntimeError> {
        let NodeKind::ClassLiteral {
            name,
            parents,
            block,
        } = &node.kind
        else {
            return Err(RuntimeError::with_kind(
                ErrorKind::UnexpectedNode,
                "Expected a class literal",
            )
            .at(node.location));
        };

        let mut parent_classes = Vec::with_capacity(parents.len());
        for parent in parents {
            let NodeKind::IdentifierLiteral(parent_name) = &parent.kind else {
                return Err(RuntimeError::with_kind(
                    ErrorKind::NotAnIdentifier,
                    "Parent classes must be named by identifiers",
                )
                .at(parent.location));
            };
            let value = scope
                .borrow()
                .get(parent_name, Flags::NONE)
                .map_err(|err| err.at(parent.location))?;
            let ValueKind::Class(class) = &value.kind else {
                return Err(RuntimeError::with_kind(
                    ErrorKind::NotAClass,
                    format!("{} is not a class", parent_name),
                )
                .at(parent.location));
            };
            parent_classes.push(class.clone());
        }

        let mut properties = Vec::new();
        let mut methods = Vec::new();
        for statement in block {
            match &statement.kind {
                NodeKind::PropertyDeclaration(property) => properties.push(property.clone()),
                NodeKind::FunctionLiteral { name: Some(_), .. } => methods.push(statement.clone()),
                other => {
                    return Err(RuntimeError::with_kind(
                        ErrorKind::IllegalClassBody,
                        format!("A class body cannot contain a {}", other.name()),
                    )
                    .at(statement.location));
                }
            }
        }

        Ok(Value::class(ClassData {
            name: name.clone(),
            properties,
            methods,
            parents: parent_classes,
            scope: scope.clone(),
        }))
    }

    /// Calling a class builds an instance: inherited properties are
    /// initialised to null, methods are installed self-first so that the
    /// class's own definitions override its parents' (and later parents
    /// override earlier ones), and a constructor, if any, runs once and is
    /// stripped from the instance.
    pub(super) fn exec_object_construction(
        &mut self,
        class: &Rc<ClassData>,
        arguments: &[Node],
        scope: &ScopeRef,
        context: &Context,
        location: crate::ast::Location,
    ) -> Result<Value, RuntimeError> {
        let object = Value::object(class.clone());

        let mut properties = Vec::new();
        collect_properties(class, &mut properties);
        for property in &properties {
            object
                .data
                .borrow_mut()
                .write(property, Value::null(), Flags::INIT)
                .map_err(|err| err.at(location))?;
        }

        let mut methods = Vec::new();
        collect_methods(class, &mut methods);
        for (literal, owner_scope) in methods.iter().rev() {
            install_method(&object.data, literal, owner_scope).map_err(|err| err.at(location))?;
        }

        let constructor = {
            let data = object.data.borrow();
            if data.contains("constructor", Flags::IGNORE_PARENT) {
                Some(data.get("constructor", Flags::IGNORE_PARENT)?)
            } else {
                None
            }
        };
        if let Some(constructor) = constructor {
            object.data.borrow_mut().delete("constructor");
            if let ValueKind::Function(func) = &constructor.kind {
                let func = func.clone();
                self.exec_function_call(
                    &func,
                    Some(object.clone()),
                    arguments,
                    scope,
                    context,
                    location,
                )?;
            }
        }

        Ok(object)
    }

    /// A primitive class literal's methods land in the value's data scope.
    /// Methods of a user class named `Object`, when one is in scope, fill
    /// in names the primitive class does not define itself.
    pub(super) fn exec_primitive_class_literal(
        &mut self,
        node: &Node,
        scope: &ScopeRef,
    ) -> Result<Value, RuntimeError> {
        let NodeKind::PrimitiveClassLiteral { name, block } = &node.kind else {
            return Err(RuntimeError::with_kind(
                ErrorKind::UnexpectedNode,
                "Expected a primitive class literal",
            )
            .at(node.location));
        };

        let mut methods: Vec<(Node, ScopeRef)> = Vec::new();
        if scope.borrow().defined("Object") {
            let object_class = scope
                .borrow()
                .get("Object", Flags::NONE)
                .map_err(|err| err.at(node.location))?;
            if let ValueKind::Class(class) = &object_class.kind {
                collect_methods(class, &mut methods);
            }
        }
        for statement in block {
            match &statement.kind {
                NodeKind::FunctionLiteral { name: Some(_), .. } => {
                    methods.push((statement.clone(), scope.clone()));
                }
                other => {
                    return Err(RuntimeError::with_kind(
                        ErrorKind::IllegalClassBody,
                        format!("A primitive class body cannot contain a {}", other.name()),
                    )
                    .at(statement.location));
                }
            }
        }

        let value = Value::primitive_class(PrimitiveClassData {
            name: name.clone(),
            scope: scope.clone(),
        });
        for (literal, owner_scope) in methods.iter().rev() {
            install_method(&value.data, literal, owner_scope)
                .map_err(|err| err.at(node.location))?;
        }
        Ok(value)
    }
}

/// Depth-first over parents in declaration order, then the class itself.
fn collect_properties(class: &Rc<ClassData>, into: &mut Vec<String>) {
    for parent in &class.parents {
        collect_properties(parent, into);
    }
    into.extend(class.properties.iter().cloned());
}

/// Same traversal as properties; each method literal is paired with its
/// owning class's captured scope, which the instantiated closure captures.
fn collect_methods(class: &Rc<ClassData>, into: &mut Vec<(Node, ScopeRef)>) {
    for parent in &class.parents {
        collect_methods(parent, into);
    }
    for method in &class.methods {
        into.push((method.clone(), class.scope.clone()));
    }
}

/// First install wins; the caller iterates the flattened method list in
/// reverse so that self precedes parents.
fn install_method(
    data: &ScopeRef,
    literal: &Node,
    owner_scope: &ScopeRef,
) -> Result<(), RuntimeError> {
    let NodeKind::FunctionLiteral {
        name: Some(name),
        parameters,
        block,
    } = &literal.kind
    else {
        return Err(RuntimeError::with_kind(
            ErrorKind::UnexpectedNode,
            "Methods must be named function literals",
        )
        .at(literal.location));
    };
    if data.borrow().contains(name, Flags::IGNORE_PARENT) {
        return Ok(());
    }
    let function = Value::function(FunctionData {
        name: Some(name.clone()),
        parameters: parameters.clone(),
        body: block.clone(),
        scope: owner_scope.clone(),
    });
    data.borrow_mut()
        .write(name, function, Flags::INIT | Flags::CONSTANT)
}
