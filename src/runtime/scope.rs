use std::cell::RefCell;
use std::collections::HashMap;
use std::ops::BitOr;
use std::rc::Rc;

use crate::value::{ErrorKind, RuntimeError, Value};

pub type ScopeRef = Rc<RefCell<Scope>>;

/// Slot behavior flags.
///
/// `INIT` creates the slot in the written scope instead of resolving an
/// existing one; `CONSTANT` freezes the slot after initialisation;
/// `IGNORE_PARENT` restricts reads and containment checks to the scope
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u8);

impl Flags {
    pub const NONE: Flags = Flags(0);
    pub const INIT: Flags = Flags(1);
    pub const CONSTANT: Flags = Flags(1 << 1);
    pub const IGNORE_PARENT: Flags = Flags(1 << 2);

    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone)]
pub struct Slot {
    pub value: Value,
    pub flags: Flags,
}

/// Named-slot container forming the lexical chain. Also serves as the data
/// scope attached to every value.
#[derive(Default)]
pub struct Scope {
    entries: HashMap<String, Slot>,
    parent: Option<ScopeRef>,
}

impl Scope {
    pub fn root() -> ScopeRef {
        Rc::new(RefCell::new(Scope::default()))
    }

    pub fn child_of(parent: &ScopeRef) -> ScopeRef {
        Rc::new(RefCell::new(Scope {
            entries: HashMap::new(),
            parent: Some(parent.clone()),
        }))
    }

    pub fn parent(&self) -> Option<&ScopeRef> {
        self.parent.as_ref()
    }

    /// Does the name resolve in this scope or any ancestor.
    pub fn defined(&self, name: &str) -> bool {
        if self.entries.contains_key(name) {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.borrow().defined(name),
            None => false,
        }
    }

    pub fn contains(&self, name: &str, flags: Flags) -> bool {
        if self.entries.contains_key(name) {
            return true;
        }
        if flags.contains(Flags::IGNORE_PARENT) {
            return false;
        }
        match &self.parent {
            Some(parent) => parent.borrow().contains(name, flags),
            None => false,
        }
    }

    pub fn get(&self, name: &str, flags: Flags) -> Result<Value, RuntimeError> {
        if let Some(slot) = self.entries.get(name) {
            return Ok(slot.value.clone());
        }
        if !flags.contains(Flags::IGNORE_PARENT) {
            if let Some(parent) = &self.parent {
                return parent.borrow().get(name, flags);
            }
        }
        Err(RuntimeError::with_kind(
            ErrorKind::NotDefined,
            format!("{} is not defined", name),
        ))
    }

    /// The nearest slot with that name, walking the parent chain. Exposes
    /// slot metadata, e.g. the constant flag.
    pub fn reference(&self, name: &str) -> Option<Slot> {
        if let Some(slot) = self.entries.get(name) {
            return Some(slot.clone());
        }
        self.parent
            .as_ref()
            .and_then(|parent| parent.borrow().reference(name))
    }

    /// Write a value. With `INIT` the slot is created (or overwritten) in
    /// this scope; without it the nearest existing slot is mutated, failing
    /// with `NotDefined` when no scope in the chain has one. Constant slots
    /// reject both forms once initialised.
    pub fn write(&mut self, name: &str, value: Value, flags: Flags) -> Result<(), RuntimeError> {
        if flags.contains(Flags::INIT) {
            if let Some(slot) = self.entries.get(name) {
                if slot.flags.contains(Flags::CONSTANT) {
                    return Err(RuntimeError::with_kind(
                        ErrorKind::ConstantAssignment,
                        format!("{} is a constant", name),
                    ));
                }
            }
            self.entries.insert(name.to_string(), Slot { value, flags });
            return Ok(());
        }
        if let Some(slot) = self.entries.get_mut(name) {
            if slot.flags.contains(Flags::CONSTANT) {
                return Err(RuntimeError::with_kind(
                    ErrorKind::ConstantAssignment,
                    format!("{} is a constant", name),
                ));
            }
            slot.value = value;
            return Ok(());
        }
        if !flags.contains(Flags::IGNORE_PARENT) {
            if let Some(parent) = &self.parent {
                return parent.borrow_mut().write(name, value, flags);
            }
        }
        Err(RuntimeError::with_kind(
            ErrorKind::NotDefined,
            format!("{} is not defined", name),
        ))
    }

    /// Remove a slot from this scope. Constant slots are removable; the
    /// object constructor is stripped this way after instantiation.
    pub fn delete(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
