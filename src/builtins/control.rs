//! Binding and control-flow macros: let, setq, lambda, defun, progn, if, when, try
//!
//! These run as Macros, not Functions — each decides for itself which of its
//! tail forms to resolve and in what order, rather than the evaluator
//! evaluating everything up front.

use crate::env::Environment;
use crate::error::{EvalError, ARITY_AT_LEAST_ONE};
use crate::eval::{apply, resolve};
use crate::value::Value;
use std::rc::Rc;

fn let_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    let bindings = match tail.first() {
        Some(Value::List(items)) => items,
        _ => return Err(EvalError::arity_error("let", ARITY_AT_LEAST_ONE, tail.len())),
    };

    let frame = Environment::child(env);
    for binding in bindings {
        let Value::List(pair) = binding else {
            return Err(EvalError::type_error("let", "(name value) pair", binding, 1));
        };
        if pair.len() != 2 {
            return Err(EvalError::type_error("let", "(name value) pair", binding, 1));
        }
        let Value::Symbol(name) = &pair[0] else {
            return Err(EvalError::type_error("let", "symbol", &pair[0], 1));
        };
        // Binding expressions resolve against the new frame, so a lambda
        // bound here closes over its sibling bindings (and can mutate them
        // via setq), matching every other binding already placed in frame.
        let value = resolve(&pair[1], &frame)?;
        frame.bind(name.clone(), value);
    }

    let mut result = Value::Null;
    for expr in &tail[1..] {
        result = resolve(expr, &frame)?;
    }
    Ok(result)
}

fn setq_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if tail.len() != 2 {
        return Err(EvalError::arity_error("setq", "2", tail.len()));
    }
    let Value::Symbol(name) = &tail[0] else {
        return Err(EvalError::type_error("setq", "symbol", &tail[0], 1));
    };
    let value = resolve(&tail[1], env)?;
    env.assign(name, value)
}

fn parse_params(form: &Value, function: &str) -> Result<Vec<String>, EvalError> {
    let Value::List(items) = form else {
        return Err(EvalError::type_error(function, "parameter list", form, 1));
    };
    items
        .iter()
        .map(|p| match p {
            Value::Symbol(s) => Ok(s.clone()),
            _ => Err(EvalError::type_error(function, "symbol parameter", p, 1)),
        })
        .collect()
}

fn lambda_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if tail.is_empty() {
        return Err(EvalError::arity_error("lambda", ARITY_AT_LEAST_ONE, 0));
    }
    let params = parse_params(&tail[0], "lambda")?;
    let body = tail[1..].to_vec();
    Ok(Value::lambda(params, body, Rc::clone(env)))
}

fn defun_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if tail.len() < 2 {
        return Err(EvalError::arity_error("defun", "at least 2", tail.len()));
    }
    let Value::Symbol(name) = &tail[0] else {
        return Err(EvalError::type_error("defun", "symbol", &tail[0], 1));
    };
    let params = parse_params(&tail[1], "defun")?;
    let body = tail[2..].to_vec();
    let lambda = Value::lambda(params, body, Rc::clone(env));
    env.assign(name, lambda.clone())?;
    Ok(lambda)
}

fn progn_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    let mut result = Value::Null;
    for expr in tail {
        result = resolve(expr, env)?;
    }
    Ok(result)
}

fn if_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if tail.len() < 2 {
        return Err(EvalError::arity_error("if", "at least 2", tail.len()));
    }
    let test = resolve(&tail[0], env)?;
    if test.is_truthy() {
        resolve(&tail[1], env)
    } else if tail.len() > 2 {
        let mut result = Value::Null;
        for expr in &tail[2..] {
            result = resolve(expr, env)?;
        }
        Ok(result)
    } else {
        Ok(Value::Null)
    }
}

fn when_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if tail.is_empty() {
        return Err(EvalError::arity_error("when", ARITY_AT_LEAST_ONE, 0));
    }
    let test = resolve(&tail[0], env)?;
    if !test.is_truthy() {
        return Ok(Value::Null);
    }
    let mut result = Value::Null;
    for expr in &tail[1..] {
        result = resolve(expr, env)?;
    }
    Ok(result)
}

/// Splits a trailing `(catch (e) handler…)` form off the end of `tail`, if
/// present. The catch clause's parameter list may be omitted, in which case
/// an empty one is assumed.
fn split_catch(tail: &[Value]) -> (&[Value], Option<(Vec<String>, Vec<Value>)>) {
    if let Some(Value::List(items)) = tail.last() {
        if let Some(Value::Symbol(s)) = items.first() {
            if s == "catch" {
                let (params, body_start) = match items.get(1) {
                    Some(Value::List(p)) => {
                        let params = p
                            .iter()
                            .filter_map(|v| match v {
                                Value::Symbol(s) => Some(s.clone()),
                                _ => None,
                            })
                            .collect();
                        (params, 2)
                    }
                    _ => (Vec::new(), 1),
                };
                let body = items[body_start..].to_vec();
                return (&tail[..tail.len() - 1], Some((params, body)));
            }
        }
    }
    (tail, None)
}

fn try_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    let (exprs, catch_clause) = split_catch(tail);

    let mut outcome = Ok(Value::Null);
    for expr in exprs {
        outcome = resolve(expr, env);
        if outcome.is_err() {
            break;
        }
    }

    match outcome {
        Ok(v) => Ok(v),
        Err(err) => match catch_clause {
            None => Err(err),
            Some((params, body)) => {
                let caught = match err {
                    EvalError::Thrown(v) => v,
                    other => Value::String(other.to_string()),
                };
                let handler = Value::lambda(params, body, Rc::clone(env));
                apply(&handler, &[caught])
            }
        },
    }
}

pub fn register(env: &Rc<Environment>) {
    env.bind("let", Value::native_macro("let", let_macro));
    env.bind("setq", Value::native_macro("setq", setq_macro));
    env.bind("lambda", Value::native_macro("lambda", lambda_macro));
    env.bind("defun", Value::native_macro("defun", defun_macro));
    env.bind("progn", Value::native_macro("progn", progn_macro));
    env.bind("if", Value::native_macro("if", if_macro));
    env.bind("when", Value::native_macro("when", when_macro));
    env.bind("try", Value::native_macro("try", try_macro));
}
