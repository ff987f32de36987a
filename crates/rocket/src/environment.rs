use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

#[derive(Debug, Default)]
struct Frame {
    vars: HashMap<Rc<str>, Value>,
    parent: Option<Environment>,
}

/// A lexical scope frame, shared by reference so closures can capture it.
///
/// "Popping" a scope has no explicit call: a child `Environment` is simply
/// dropped when its owner goes out of scope, and the `Rc` count does the
/// rest.
#[derive(Debug, Clone)]
pub struct Environment(Rc<RefCell<Frame>>);

impl Environment {
    pub fn new_global() -> Self {
        Self(Rc::new(RefCell::new(Frame::default())))
    }

    /// Creates a fresh child frame of `self`.
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Frame { vars: HashMap::new(), parent: Some(self.clone()) })))
    }

    /// Binds `name` in the current frame unconditionally, shadowing any
    /// binding of the same name in an enclosing frame.
    pub fn define(&self, name: Rc<str>, value: Value) {
        self.0.borrow_mut().vars.insert(name, value);
    }

    /// Searches the current frame, then each enclosing frame in order.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let frame = self.0.borrow();
        if let Some(v) = frame.vars.get(name) {
            return Some(v.clone());
        }
        frame.parent.as_ref().and_then(|p| p.lookup(name))
    }

    /// Rebinds `name` in the nearest frame (current or enclosing) that
    /// already defines it. Returns `false` if `name` is unbound anywhere.
    pub fn assign_existing(&self, name: &str, value: Value) -> bool {
        let mut frame = self.0.borrow_mut();
        if frame.vars.contains_key(name) {
            frame.vars.insert(Rc::from(name), value);
            return true;
        }
        match &frame.parent {
            Some(parent) => {
                let parent = parent.clone();
                drop(frame);
                parent.assign_existing(name, value)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_up_the_chain() {
        let global = Environment::new_global();
        global.define(Rc::from("x"), Value::Int(1));
        let child = global.child();
        assert_eq!(child.lookup("x").map(|v| v.eq_value(&Value::Int(1))), Some(true));
    }

    #[test]
    fn define_in_child_does_not_leak_to_parent() {
        let global = Environment::new_global();
        let child = global.child();
        child.define(Rc::from("y"), Value::Int(2));
        assert!(global.lookup("y").is_none());
    }

    #[test]
    fn child_shadows_parent_binding() {
        let global = Environment::new_global();
        global.define(Rc::from("x"), Value::Int(1));
        let child = global.child();
        child.define(Rc::from("x"), Value::Int(2));
        assert_eq!(child.lookup("x").unwrap().eq_value(&Value::Int(2)), true);
        assert_eq!(global.lookup("x").unwrap().eq_value(&Value::Int(1)), true);
    }

    #[test]
    fn undefined_lookup_is_none() {
        let global = Environment::new_global();
        assert!(global.lookup("missing").is_none());
    }
}
