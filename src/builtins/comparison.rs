//! Chained comparisons: ==, ===, !=, !==, <, >, <=, >=
//!
//! Each takes at least two forms and checks the chain pairwise
//! left-to-right, short-circuiting on the first falsifying pair — a
//! trailing form is never resolved once the chain has already failed.

use crate::env::Environment;
use crate::error::{EvalError, ARITY_AT_LEAST_TWO};
use crate::eval::short_circuit_all;
use crate::value::Value;
use std::rc::Rc;

fn chain(name: &'static str, tail: &[Value], env: &Rc<Environment>, pair_holds: fn(&Value, &Value) -> bool) -> Result<Value, EvalError> {
    if tail.len() < 2 {
        return Err(EvalError::arity_error(name, ARITY_AT_LEAST_TWO, tail.len()));
    }
    let ok = short_circuit_all(tail, env, |current, prev| {
        Ok(match prev {
            None => true,
            Some(p) => pair_holds(p, current),
        })
    })?;
    Ok(Value::Boolean(ok))
}

fn loose_eq_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    chain("==", tail, env, Value::loose_eq)
}
fn loose_ne_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    chain("!=", tail, env, |a, b| !a.loose_eq(b))
}
fn strict_eq_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    chain("===", tail, env, Value::strict_eq)
}
fn strict_ne_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    chain("!==", tail, env, |a, b| !a.strict_eq(b))
}

/// Numeric if both sides are numbers, otherwise lexicographic on each side's
/// string form — lets `(< "a" "b")` and `(< 1 2)` both work the way a host
/// comparison operator would.
fn ordering(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => a.to_number_coerced().partial_cmp(&b.to_number_coerced()).unwrap_or(std::cmp::Ordering::Equal),
    }
}

fn lt_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    chain("<", tail, env, |a, b| ordering(a, b) == std::cmp::Ordering::Less)
}
fn gt_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    chain(">", tail, env, |a, b| ordering(a, b) == std::cmp::Ordering::Greater)
}
fn le_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    chain("<=", tail, env, |a, b| ordering(a, b) != std::cmp::Ordering::Greater)
}
fn ge_macro(tail: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    chain(">=", tail, env, |a, b| ordering(a, b) != std::cmp::Ordering::Less)
}

pub fn register(env: &Rc<Environment>) {
    env.bind("==", Value::native_macro("==", loose_eq_macro));
    env.bind("!=", Value::native_macro("!=", loose_ne_macro));
    env.bind("===", Value::native_macro("===", strict_eq_macro));
    env.bind("!==", Value::native_macro("!==", strict_ne_macro));
    env.bind("<", Value::native_macro("<", lt_macro));
    env.bind(">", Value::native_macro(">", gt_macro));
    env.bind("<=", Value::native_macro("<=", le_macro));
    env.bind(">=", Value::native_macro(">=", ge_macro));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::HostNamespace;
    use crate::eval::resolve;

    fn root() -> Rc<Environment> {
        let env = Environment::root(HostNamespace::new());
        register(&env);
        env
    }
    fn list(items: Vec<Value>) -> Value {
        Value::List(items)
    }
    fn sym(s: &str) -> Value {
        Value::Symbol(s.to_string())
    }

    #[test]
    fn test_loose_vs_strict_equality_chain() {
        let env = root();
        let loose = list(vec![sym("=="), Value::Number(2.0), Value::String("2".into())]);
        assert!(matches!(resolve(&loose, &env).unwrap(), Value::Boolean(true)));

        let strict = list(vec![sym("==="), Value::Number(2.0), Value::String("2".into())]);
        assert!(matches!(resolve(&strict, &env).unwrap(), Value::Boolean(false)));
    }

    #[test]
    fn test_chained_less_than() {
        let env = root();
        let form = list(vec![sym("<"), Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]);
        assert!(matches!(resolve(&form, &env).unwrap(), Value::Boolean(true)));

        let form = list(vec![sym("<"), Value::Number(1.0), Value::Number(1.0)]);
        assert!(matches!(resolve(&form, &env).unwrap(), Value::Boolean(false)));
    }

    #[test]
    fn test_short_circuit_skips_resolving_later_forms() {
        let env = root();
        env.bind("fired", Value::Boolean(false));
        env.bind(
            "mark",
            Value::native_macro("mark", |_tail, env| env.assign("fired", Value::Boolean(true))),
        );
        let form = list(vec![
            sym("<"),
            Value::Number(5.0),
            Value::Number(1.0),
            list(vec![sym("mark")]),
        ]);
        let result = resolve(&form, &env).unwrap();
        assert!(matches!(result, Value::Boolean(false)));
        assert!(matches!(env.lookup("fired").unwrap(), Value::Boolean(false)));
    }

    #[test]
    fn test_arity_error_below_two() {
        let env = root();
        let form = list(vec![sym("<"), Value::Number(1.0)]);
        assert!(resolve(&form, &env).is_err());
    }

    #[test]
    fn test_string_ordering() {
        let env = root();
        let form = list(vec![sym("<"), Value::String("a".into()), Value::String("b".into())]);
        assert!(matches!(resolve(&form, &env).unwrap(), Value::Boolean(true)));
    }
}
