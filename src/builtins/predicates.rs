//! Type predicates: is-true, is-false, is-null, is-undefined, is-string,
//! is-number, is-boolean, is-function, is-object
//!
//! Each accepts any number of forms and checks them all against the same
//! kind test, short-circuiting at the first that doesn't match.

use crate::env::Environment;
use crate::error::{EvalError, ARITY_AT_LEAST_ONE};
use crate::eval::short_circuit_all;
use crate::value::Value;
use std::rc::Rc;

fn predicate(name: &'static str, tail: &[Value], env: &Rc<Environment>, matches: fn(&Value) -> bool) -> Result<Value, EvalError> {
    if tail.is_empty() {
        return Err(EvalError::arity_error(name, ARITY_AT_LEAST_ONE, 0));
    }
    let ok = short_circuit_all(tail, env, |current, _prev| Ok(matches(current)))?;
    Ok(Value::Boolean(ok))
}

fn is_true_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("is-true", tail, env, |v| matches!(v, Value::Boolean(true)))
}
fn is_false_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("is-false", tail, env, |v| matches!(v, Value::Boolean(false)))
}
fn is_null_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("is-null", tail, env, |v| matches!(v, Value::Null))
}
fn is_undefined_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("is-undefined", tail, env, |v| matches!(v, Value::Undefined))
}
fn is_string_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("is-string", tail, env, |v| matches!(v, Value::String(_)))
}
fn is_number_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("is-number", tail, env, |v| matches!(v, Value::Number(_)))
}
fn is_boolean_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("is-boolean", tail, env, |v| matches!(v, Value::Boolean(_)))
}
fn is_function_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("is-function", tail, env, Value::is_callable)
}
fn is_object_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    predicate("is-object", tail, env, |v| matches!(v, Value::Object(_) | Value::Null))
}

pub fn register(env: &Rc<Environment>) {
    env.bind("is-true", Value::native_macro("is-true", is_true_macro));
    env.bind("is-false", Value::native_macro("is-false", is_false_macro));
    env.bind("is-null", Value::native_macro("is-null", is_null_macro));
    env.bind("is-undefined", Value::native_macro("is-undefined", is_undefined_macro));
    env.bind("is-string", Value::native_macro("is-string", is_string_macro));
    env.bind("is-number", Value::native_macro("is-number", is_number_macro));
    env.bind("is-boolean", Value::native_macro("is-boolean", is_boolean_macro));
    env.bind("is-function", Value::native_macro("is-function", is_function_macro));
    env.bind("is-object", Value::native_macro("is-object", is_object_macro));
}
