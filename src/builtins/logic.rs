//! Logical composition: and, or, not
//!
//! All three return a strict boolean (not the last value, unlike many Lisps'
//! `and`/`or`) and all three short-circuit, routed through the same
//! resolve-lazily-until-decided helper the comparison and `is-*` macros use.

use crate::env::Environment;
use crate::error::{EvalError, ARITY_AT_LEAST_ONE};
use crate::eval::short_circuit_all;
use crate::value::Value;
use std::rc::Rc;

/// True iff every argument is truthy; stops at the first falsy one. Empty
/// tail is vacuously true.
fn and_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    let ok = short_circuit_all(tail, env, |current, _prev| Ok(current.is_truthy()))?;
    Ok(Value::Boolean(ok))
}

/// True iff any argument is truthy; stops at the first truthy one. Empty
/// tail is vacuously false.
fn or_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    // short_circuit_all stops on the first `false`, so ask it to stop the
    // moment a truthy value turns up; getting that far means `or` is true.
    let exhausted = short_circuit_all(tail, env, |current, _prev| Ok(!current.is_truthy()))?;
    Ok(Value::Boolean(!exhausted))
}

/// True iff every argument is falsy; stops at the first truthy one.
fn not_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if tail.is_empty() {
        return Err(EvalError::arity_error("not", ARITY_AT_LEAST_ONE, 0));
    }
    let ok = short_circuit_all(tail, env, |current, _prev| Ok(!current.is_truthy()))?;
    Ok(Value::Boolean(ok))
}

pub fn register(env: &Rc<Environment>) {
    env.bind("and", Value::native_macro("and", and_macro));
    env.bind("or", Value::native_macro("or", or_macro));
    env.bind("not", Value::native_macro("not", not_macro));
}
