// ABOUTME: Evaluator: resolves a form against an environment

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{Callable, Value};
use std::rc::Rc;

/// Resolves `form` against `env`.
///
/// 1. Anything that isn't a list or a symbol is self-evaluating.
/// 2. A symbol looks itself up (dotted paths included).
/// 3. A list is a combination: its head names a combiner (or is itself a
///    form that must resolve to one). A Macro combiner receives its tail
///    forms unevaluated; a Function combiner gets each tail form resolved
///    left-to-right first.
///
/// This function has no built-in knowledge of `if`, `let`, `and`, or any
/// other named form — those are all ordinary Macro/Function bindings found
/// through the same lookup path as user code. See `builtins/` for where
/// they're registered.
pub fn resolve(form: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match form {
        Value::Symbol(name) => env.lookup(name),
        Value::List(items) => {
            if items.is_empty() {
                return Ok(Value::Null);
            }
            let combiner = resolve_combiner(&items[0], env)?;
            let tail = &items[1..];
            match &combiner {
                Value::Macro(m) => {
                    log::trace!("combiner dispatch: {} as macro, {} tail form(s)", items[0], tail.len());
                    (m.func)(tail, env)
                }
                Value::Function(_) => {
                    log::trace!("combiner dispatch: {} as function, {} arg(s)", items[0], tail.len());
                    let mut args = Vec::with_capacity(tail.len());
                    for form in tail {
                        args.push(resolve(form, env)?);
                    }
                    apply(&combiner, &args)
                }
                _ => Err(EvalError::resolution_error(
                    "combination",
                    &format!("{}", items[0]),
                )),
            }
        }
        _ => Ok(form.clone()),
    }
}

/// Resolves the head of a combination. A bare symbol (including a dotted
/// path) is looked up directly; anything else must itself resolve to a
/// callable (e.g. `((getfunc "f")) 1 2)`).
fn resolve_combiner(head: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match head {
        Value::Symbol(name) => env.lookup(name),
        other => resolve(other, env),
    }
}

/// Applies an already-resolved callable to already-resolved arguments, with
/// no receiver bound. Equivalent to `apply_with_receiver(callable, args, None)`.
pub fn apply(callable: &Value, args: &[Value]) -> Result<Value, EvalError> {
    apply_with_receiver(callable, args, None)
}

/// Applies an already-resolved callable to already-resolved arguments.
/// Native functions just run; lambdas get a fresh child frame over their
/// captured environment, with positional binding — unfilled parameters
/// become `undefined`, surplus arguments are dropped. When `receiver` is
/// given (only `funcall` supplies one), it is bound as `this` in that frame.
pub fn apply_with_receiver(callable: &Value, args: &[Value], receiver: Option<Value>) -> Result<Value, EvalError> {
    let Value::Function(c) = callable else {
        return Err(EvalError::resolution_error("apply", &format!("{}", callable)));
    };
    match c.as_ref() {
        Callable::Native { func, .. } => func(args),
        Callable::Lambda { params, body, env } => {
            let frame = Environment::child(env);
            if let Some(this) = receiver {
                frame.bind("this", this);
            }
            for (i, param) in params.iter().enumerate() {
                frame.bind(param.clone(), args.get(i).cloned().unwrap_or(Value::Undefined));
            }
            let mut result = Value::Null;
            for expr in body {
                result = resolve(expr, &frame)?;
            }
            Ok(result)
        }
        Callable::MacroAsFunction { inner, env } => (inner.func)(args, env),
    }
}

/// Resolves `tail` forms one at a time against `env`, calling `test` on each
/// newly-resolved value (and the previously resolved one, if any). Stops and
/// returns `false` as soon as `test` does, without resolving what remains —
/// the shared short-circuit contract behind `and`/`or`, every comparison
/// macro, and every `is-*` predicate.
pub fn short_circuit_all(
    tail: &[Value],
    env: &Rc<Environment>,
    mut test: impl FnMut(&Value, Option<&Value>) -> Result<bool, EvalError>,
) -> Result<bool, EvalError> {
    let mut prev: Option<Value> = None;
    for form in tail {
        let current = resolve(form, env)?;
        if !test(&current, prev.as_ref())? {
            return Ok(false);
        }
        prev = Some(current);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::HostNamespace;

    fn root() -> Rc<Environment> {
        Environment::root(HostNamespace::new())
    }

    #[test]
    fn test_self_evaluating_values_pass_through() {
        let env = root();
        assert!(matches!(resolve(&Value::Number(1.0), &env), Ok(Value::Number(n)) if n == 1.0));
        assert!(matches!(resolve(&Value::Boolean(true), &env), Ok(Value::Boolean(true))));
        assert!(matches!(resolve(&Value::Null, &env), Ok(Value::Null)));
    }

    #[test]
    fn test_symbol_lookup() {
        let env = root();
        env.bind("x", Value::Number(5.0));
        assert!(matches!(resolve(&Value::Symbol("x".into()), &env), Ok(Value::Number(n)) if n == 5.0));
    }

    #[test]
    fn test_empty_list_is_null() {
        let env = root();
        assert!(matches!(resolve(&Value::List(vec![]), &env), Ok(Value::Null)));
    }

    #[test]
    fn test_function_combiner_evaluates_args_left_to_right() {
        let env = root();
        env.bind(
            "add",
            Value::native("add", |args| {
                Ok(Value::Number(args.iter().map(|v| v.to_number_coerced()).sum()))
            }),
        );
        let form = Value::List(vec![
            Value::Symbol("add".into()),
            Value::Number(1.0),
            Value::Number(2.0),
        ]);
        assert!(matches!(resolve(&form, &env), Ok(Value::Number(n)) if n == 3.0));
    }

    #[test]
    fn test_macro_combiner_receives_unevaluated_tail() {
        let env = root();
        // A macro that just counts its (unevaluated) tail forms, proving it
        // never touched `env` to resolve them.
        env.bind(
            "count-forms",
            Value::native_macro("count-forms", |tail, _env| Ok(Value::Number(tail.len() as f64))),
        );
        let form = Value::List(vec![
            Value::Symbol("count-forms".into()),
            Value::Symbol("undefined-name".into()),
            Value::Symbol("also-undefined".into()),
        ]);
        // If these were evaluated as Functions, the undefined symbols would
        // resolve to Value::Undefined rather than erroring (lookup never
        // errors), so this alone doesn't prove laziness — the point is that
        // no error occurs and the count is exactly the tail length.
        assert!(matches!(resolve(&form, &env), Ok(Value::Number(n)) if n == 2.0));
    }

    #[test]
    fn test_lambda_apply_binds_params_over_captured_env() {
        let env = root();
        env.bind("n", Value::Number(10.0));
        let lambda = Value::lambda(
            vec!["x".to_string()],
            vec![Value::List(vec![
                Value::Symbol("add".into()),
                Value::Symbol("x".into()),
                Value::Symbol("n".into()),
            ])],
            Rc::clone(&env),
        );
        env.bind(
            "add",
            Value::native("add", |args| {
                Ok(Value::Number(args.iter().map(|v| v.to_number_coerced()).sum()))
            }),
        );
        let result = apply(&lambda, &[Value::Number(5.0)]).unwrap();
        assert!(matches!(result, Value::Number(n) if n == 15.0));
    }

    #[test]
    fn test_lambda_missing_args_become_undefined() {
        let lambda = Value::lambda(vec!["a".to_string(), "b".to_string()], vec![Value::Symbol("b".into())], root());
        let result = apply(&lambda, &[Value::Number(1.0)]).unwrap();
        assert!(matches!(result, Value::Undefined));
    }

    #[test]
    fn test_short_circuit_all_stops_resolving_after_failure() {
        let env = root();
        env.bind("fired", Value::Boolean(false));
        env.bind(
            "mark",
            Value::native_macro("mark", |_tail, env| env.assign("fired", Value::Boolean(true))),
        );
        // 2 < 1 fails immediately, so the trailing "mark" form must never resolve.
        let tail = vec![Value::Number(2.0), Value::Number(1.0), Value::List(vec![Value::Symbol("mark".into())])];
        let ok = short_circuit_all(&tail, &env, |current, prev| {
            Ok(match prev {
                None => true,
                Some(p) => p.to_number_coerced() < current.to_number_coerced(),
            })
        })
        .unwrap();
        assert!(!ok);
        assert!(matches!(env.lookup("fired").unwrap(), Value::Boolean(false)));
    }
}
