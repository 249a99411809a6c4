//! Arithmetic operations: +, -, *, /, %, 1+
//!
//! Division on integers yields floating-point, matching host numeric
//! semantics rather than truncating.

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

fn as_number(function: &str, v: &Value, position: usize) -> Result<f64, EvalError> {
    match v {
        Value::Number(n) => Ok(*n),
        other => Err(EvalError::type_error(function, "number", other, position)),
    }
}

fn add_fn(args: &[Value]) -> Result<Value, EvalError> {
    let mut sum = 0.0;
    for (i, arg) in args.iter().enumerate() {
        sum += as_number("+", arg, i + 1)?;
    }
    Ok(Value::Number(sum))
}

fn sub_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("-", "at least 1", 0));
    }
    let first = as_number("-", &args[0], 1)?;
    if args.len() == 1 {
        return Ok(Value::Number(-first));
    }
    let mut result = first;
    for (i, arg) in args[1..].iter().enumerate() {
        result -= as_number("-", arg, i + 2)?;
    }
    Ok(Value::Number(result))
}

fn mul_fn(args: &[Value]) -> Result<Value, EvalError> {
    let mut product = 1.0;
    for (i, arg) in args.iter().enumerate() {
        product *= as_number("*", arg, i + 1)?;
    }
    Ok(Value::Number(product))
}

fn div_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("/", "at least 1", 0));
    }
    let first = as_number("/", &args[0], 1)?;
    if args.len() == 1 {
        return Ok(Value::Number(1.0 / first));
    }
    let mut result = first;
    for (i, arg) in args[1..].iter().enumerate() {
        result /= as_number("/", arg, i + 2)?;
    }
    Ok(Value::Number(result))
}

fn mod_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("%", "2", args.len()));
    }
    let a = as_number("%", &args[0], 1)?;
    let b = as_number("%", &args[1], 2)?;
    Ok(Value::Number(a % b))
}

fn increment_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("1+", "1", args.len()));
    }
    Ok(Value::Number(as_number("1+", &args[0], 1)? + 1.0))
}

pub fn register(env: &Rc<Environment>) {
    env.bind("+", Value::native("+", add_fn));
    env.bind("-", Value::native("-", sub_fn));
    env.bind("*", Value::native("*", mul_fn));
    env.bind("/", Value::native("/", div_fn));
    env.bind("%", Value::native("%", mod_fn));
    env.bind("1+", Value::native("1+", increment_fn));
}
