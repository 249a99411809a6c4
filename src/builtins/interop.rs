//! Host interop: new, funcall, getfunc, object, getkey, setkey

use crate::env::{get_property, set_property, Environment};
use crate::error::EvalError;
use crate::eval::{apply, apply_with_receiver, resolve};
use crate::value::{Callable, Value};
use std::rc::Rc;

fn new_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("new", "at least 1", 0));
    }
    apply(&args[0], &args[1..])
}

/// Resolves its single form and, if that names a Macro, wraps it as a
/// Function bound to the environment it was found in. A Function passes
/// through unchanged. Needs to run as a Macro purely to capture that
/// environment for the wrapper — its argument is still fully resolved.
fn getfunc_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if tail.len() != 1 {
        return Err(EvalError::arity_error("getfunc", "1", tail.len()));
    }
    match resolve(&tail[0], env)? {
        v @ Value::Function(_) => Ok(v),
        Value::Macro(m) => Ok(Value::Function(Rc::new(Callable::MacroAsFunction {
            inner: m,
            env: Rc::clone(env),
        }))),
        other => Err(EvalError::resolution_error("getfunc", &format!("{}", other))),
    }
}

fn name_of(v: &Value) -> Result<String, EvalError> {
    match v {
        Value::String(s) => Ok(s.clone()),
        Value::Symbol(s) | Value::Keyword(s) => Ok(s.clone()),
        other => Err(EvalError::type_error("funcall", "string path", other, 2)),
    }
}

fn funcall_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("funcall", "at least 2", args.len()));
    }
    let path = name_of(&args[1])?;
    let mut segments: Vec<&str> = path.split('.').collect();
    let last = segments.pop().expect("split always yields one segment");

    let mut target = args[0].clone();
    for segment in segments {
        target = get_property(&target, segment)?;
    }
    let callee = get_property(&target, last)?;
    apply_with_receiver(&callee, &args[2..], Some(target))
}

fn object_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() % 2 != 0 {
        return Err(EvalError::arity_error("object", "an even number", args.len()));
    }
    let obj = Value::new_object();
    for pair in args.chunks(2) {
        set_by_key(&obj, pair[0].clone(), pair[1].clone());
    }
    Ok(obj)
}

/// `getkey`/`setkey` use `Value::key_eq` rather than `matches_name` so that
/// non-textual keys (numbers, booleans, functions, nested objects) compare
/// the way the full key-equality model in value.rs requires.
fn set_by_key(obj: &Value, key: Value, value: Value) {
    let Value::Object(data) = obj else { return };
    let mut data = data.borrow_mut();
    if let Some(entry) = data.iter_mut().find(|(k, _)| k.key_eq(&key)) {
        entry.1 = value;
    } else {
        data.push((key, value));
    }
}

fn getkey_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("getkey", "2", args.len()));
    }
    let Value::Object(data) = &args[1] else {
        return Err(EvalError::type_error("getkey", "object", &args[1], 2));
    };
    Ok(data
        .borrow()
        .iter()
        .find(|(k, _)| k.key_eq(&args[0]))
        .map(|(_, v)| v.clone())
        .unwrap_or(Value::Undefined))
}

fn setkey_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 3 {
        return Err(EvalError::arity_error("setkey", "3", args.len()));
    }
    if !matches!(&args[1], Value::Object(_)) {
        return Err(EvalError::type_error("setkey", "object", &args[1], 2));
    }
    set_by_key(&args[1], args[0].clone(), args[2].clone());
    Ok(args[2].clone())
}

pub fn register(env: &Rc<Environment>) {
    env.bind("new", Value::native("new", new_fn));
    env.bind("getfunc", Value::native_macro("getfunc", getfunc_macro));
    env.bind("funcall", Value::native("funcall", funcall_fn));
    env.bind("object", Value::native("object", object_fn));
    env.bind("getkey", Value::native("getkey", getkey_fn));
    env.bind("setkey", Value::native("setkey", setkey_fn));
}
