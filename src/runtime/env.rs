use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::interpreter::RuntimeError;
use super::value::Value;

/// One scope in the chain. Lookups walk outward toward the root; writes
/// always land in this scope, so an inner assignment shadows an outer
/// binding rather than mutating it.
pub struct Environment {
    parent: Option<Rc<Environment>>,
    bindings: RefCell<HashMap<String, Value>>,
}

impl Environment {
    pub fn global() -> Rc<Environment> {
        Rc::new(Environment {
            parent: None,
            bindings: RefCell::new(HashMap::new()),
        })
    }

    /// Opens a child scope. The parent stays alive for as long as any child
    /// or closure still references it.
    pub fn open_scope(self: &Rc<Self>) -> Rc<Environment> {
        Rc::new(Environment {
            parent: Some(self.clone()),
            bindings: RefCell::new(HashMap::new()),
        })
    }

    pub fn get(&self, name: &str) -> Result<Value, RuntimeError> {
        self.try_get(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))
    }

    pub fn try_get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref()?.try_get(name)
    }

    pub fn set(&self, name: &str, value: Value) {
        self.bindings.borrow_mut().insert(name.to_string(), value);
    }
}
