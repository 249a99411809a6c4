// ABOUTME: Lexical environment frames chained to a terminal host namespace

use crate::error::EvalError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// The process-wide mutable scope every environment chain bottoms out at.
/// Distinct from `Environment` so assignment can tell "ran off the end of
/// the lexical chain" apart from "another ordinary frame" — a top-level
/// `setq` of an unbound name lands here, not in the innermost frame.
#[derive(Debug)]
pub struct HostNamespace {
    bindings: RefCell<HashMap<String, Value>>,
}

impl HostNamespace {
    pub fn new() -> Rc<Self> {
        Rc::new(HostNamespace {
            bindings: RefCell::new(HashMap::new()),
        })
    }

    pub fn bind(&self, name: String, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.borrow().get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }
}

#[derive(Debug)]
enum Parent {
    Frame(Rc<Environment>),
    Host(Rc<HostNamespace>),
}

#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Parent,
}

impl Environment {
    /// The outermost lexical frame, whose parent is the host namespace.
    pub fn root(host: Rc<HostNamespace>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Parent::Host(host),
        })
    }

    /// A child frame nested under `parent` (another lexical frame).
    pub fn child(parent: &Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Parent::Frame(Rc::clone(parent)),
        })
    }

    /// Raw insertion into this frame only. Used by `let` bindings and by
    /// lambda/defun parameter binding.
    pub fn bind(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// `setq` semantics: rewrite the nearest existing binding (walking out
    /// to the host namespace); if none exists anywhere, create it at the
    /// host namespace. Dotted names resolve a property path instead.
    pub fn assign(&self, name: &str, value: Value) -> Result<Value, EvalError> {
        if let Some((head, rest)) = name.split_once('.') {
            let target = self.lookup(head)?;
            assign_property_path(&target, rest, value.clone())?;
            return Ok(value);
        }

        if self.try_assign_existing(name, value.clone()) {
            return Ok(value);
        }
        log::debug!("setq '{name}' found no existing binding, creating at host namespace");
        self.host_namespace().bind(name.to_string(), value.clone());
        Ok(value)
    }

    /// Walks outward looking for an existing binding of `name` to overwrite
    /// in place; returns whether it found and rewrote one.
    fn try_assign_existing(&self, name: &str, value: Value) -> bool {
        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.to_string(), value);
            return true;
        }
        match &self.parent {
            Parent::Frame(p) => p.try_assign_existing(name, value),
            Parent::Host(h) => {
                if h.has(name) {
                    h.bind(name.to_string(), value);
                    true
                } else {
                    false
                }
            }
        }
    }

    fn host_namespace(&self) -> Rc<HostNamespace> {
        match &self.parent {
            Parent::Frame(p) => p.host_namespace(),
            Parent::Host(h) => Rc::clone(h),
        }
    }

    /// Resolves `name`, walking outward through frames to the host namespace.
    /// Absent bindings yield `Value::Undefined` rather than erroring, except
    /// when resolving the head of a dotted path, which must exist.
    pub fn lookup(&self, name: &str) -> Result<Value, EvalError> {
        if let Some((head, rest)) = name.split_once('.') {
            let head_val = self
                .lookup_plain(head)
                .ok_or_else(|| EvalError::UndefinedSymbol(head.to_string()))?;
            return lookup_property_path(&head_val, rest);
        }
        Ok(self.lookup_plain(name).unwrap_or(Value::Undefined))
    }

    fn lookup_plain(&self, name: &str) -> Option<Value> {
        if let Some(v) = self.bindings.borrow().get(name) {
            return Some(v.clone());
        }
        match &self.parent {
            Parent::Frame(p) => p.lookup_plain(name),
            Parent::Host(h) => {
                log::trace!("lookup '{name}' fell through to host namespace");
                h.get(name)
            }
        }
    }

    pub fn has(&self, name: &str) -> bool {
        if let Some((head, _)) = name.split_once('.') {
            return self.lookup_plain(head).is_some();
        }
        self.lookup_plain(name).is_some()
    }
}

/// Walks `a.b.c`-style remaining segments as property accesses on `obj`.
fn lookup_property_path(obj: &Value, path: &str) -> Result<Value, EvalError> {
    let mut current = obj.clone();
    for segment in path.split('.') {
        current = get_property(&current, segment)?;
    }
    Ok(current)
}

/// Walks all but the last segment of `path` as property accesses, then sets
/// the final segment on whatever object that chain lands on.
fn assign_property_path(obj: &Value, path: &str, value: Value) -> Result<(), EvalError> {
    let mut segments: Vec<&str> = path.split('.').collect();
    let last = segments
        .pop()
        .expect("split('.') always yields at least one segment");
    let mut current = obj.clone();
    for segment in segments {
        current = get_property(&current, segment)?;
    }
    set_property(&current, last, value)
}

pub fn get_property(obj: &Value, name: &str) -> Result<Value, EvalError> {
    match obj {
        Value::Object(data) => Ok(data
            .borrow()
            .iter()
            .find(|(k, _)| k.matches_name(name))
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Undefined)),
        _ => Err(EvalError::type_error("<property access>", "object", obj, 1)),
    }
}

pub fn set_property(obj: &Value, name: &str, value: Value) -> Result<(), EvalError> {
    match obj {
        Value::Object(data) => {
            let mut data = data.borrow_mut();
            if let Some(entry) = data.iter_mut().find(|(k, _)| k.matches_name(name)) {
                entry.1 = value;
            } else {
                data.push((Value::Keyword(name.to_string()), value));
            }
            Ok(())
        }
        _ => Err(EvalError::type_error("<property assignment>", "object", obj, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_let_shadowing_is_invisible_after_exit() {
        let host = HostNamespace::new();
        let root = Environment::root(host);
        root.bind("x", Value::Number(1.0));

        let inner = Environment::child(&root);
        inner.bind("x", Value::Number(2.0));
        assert_eq!(inner.lookup("x").unwrap().to_number_coerced(), 2.0);
        assert_eq!(root.lookup("x").unwrap().to_number_coerced(), 1.0);
    }

    #[test]
    fn test_assign_rewrites_nearest_existing_binding() {
        let host = HostNamespace::new();
        let root = Environment::root(host);
        root.bind("x", Value::Number(1.0));

        let inner = Environment::child(&root);
        inner.assign("x", Value::Number(9.0)).unwrap();

        assert_eq!(root.lookup("x").unwrap().to_number_coerced(), 9.0);
        assert!(inner.bindings.borrow().get("x").is_none());
    }

    #[test]
    fn test_assign_with_no_existing_binding_creates_at_host() {
        let host = HostNamespace::new();
        let root = Environment::root(Rc::clone(&host));
        let inner = Environment::child(&root);

        inner.assign("new_name", Value::Number(42.0)).unwrap();

        assert!(host.has("new_name"));
        assert!(!root.bindings.borrow().contains_key("new_name"));
    }

    #[test]
    fn test_lookup_missing_returns_undefined_not_error() {
        let host = HostNamespace::new();
        let root = Environment::root(host);
        assert!(matches!(root.lookup("nope").unwrap(), Value::Undefined));
    }

    #[test]
    fn test_dotted_path_lookup_and_assign() {
        let host = HostNamespace::new();
        let root = Environment::root(host);
        let obj = Value::new_object();
        set_property(&obj, "name", Value::String("bob".to_string())).unwrap();
        root.bind("person", obj);

        assert_eq!(root.lookup("person.name").unwrap().to_string(), "bob".to_string());

        root.assign("person.name", Value::String("alice".to_string())).unwrap();
        assert_eq!(root.lookup("person.name").unwrap().to_string(), "alice".to_string());
    }
}
