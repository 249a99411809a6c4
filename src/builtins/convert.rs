//! Value conversions: to-string, to-number, to-boolean, to-upper, to-lower

use crate::env::Environment;
use crate::error::{EvalError, ARITY_ONE};
use crate::value::Value;
use std::rc::Rc;

fn to_string_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("to-string", ARITY_ONE, args.len()));
    }
    Ok(Value::String(args[0].to_string()))
}

fn to_number_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("to-number", ARITY_ONE, args.len()));
    }
    Ok(Value::Number(args[0].to_number_coerced()))
}

fn to_boolean_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("to-boolean", ARITY_ONE, args.len()));
    }
    Ok(Value::Boolean(args[0].is_truthy()))
}

fn as_str<'a>(function: &str, v: &'a Value) -> Result<&'a str, EvalError> {
    match v {
        Value::String(s) => Ok(s.as_str()),
        other => Err(EvalError::type_error(function, "string", other, 1)),
    }
}

fn to_upper_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("to-upper", ARITY_ONE, args.len()));
    }
    Ok(Value::String(as_str("to-upper", &args[0])?.to_uppercase()))
}

fn to_lower_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("to-lower", ARITY_ONE, args.len()));
    }
    Ok(Value::String(as_str("to-lower", &args[0])?.to_lowercase()))
}

pub fn register(env: &Rc<Environment>) {
    env.bind("to-string", Value::native("to-string", to_string_fn));
    env.bind("to-number", Value::native("to-number", to_number_fn));
    env.bind("to-boolean", Value::native("to-boolean", to_boolean_fn));
    env.bind("to-upper", Value::native("to-upper", to_upper_fn));
    env.bind("to-lower", Value::native("to-lower", to_lower_fn));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_string_uses_display() {
        assert!(matches!(to_string_fn(&[Value::Number(42.0)]).unwrap(), Value::String(s) if s == "42"));
        assert!(matches!(to_string_fn(&[Value::Null]).unwrap(), Value::String(s) if s == "null"));
    }

    #[test]
    fn test_to_number_coerces_string_and_boolean() {
        assert!(matches!(to_number_fn(&[Value::String(" 3.5 ".into())]).unwrap(), Value::Number(n) if n == 3.5));
        assert!(matches!(to_number_fn(&[Value::Boolean(true)]).unwrap(), Value::Number(n) if n == 1.0));
    }

    #[test]
    fn test_to_boolean_mirrors_truthiness() {
        assert!(matches!(to_boolean_fn(&[Value::Number(0.0)]).unwrap(), Value::Boolean(true)));
        assert!(matches!(to_boolean_fn(&[Value::Null]).unwrap(), Value::Boolean(false)));
    }

    #[test]
    fn test_to_upper_and_lower_require_strings() {
        assert!(matches!(to_upper_fn(&[Value::String("aB".into())]).unwrap(), Value::String(s) if s == "AB"));
        assert!(matches!(to_lower_fn(&[Value::String("aB".into())]).unwrap(), Value::String(s) if s == "ab"));
        assert!(to_upper_fn(&[Value::Number(1.0)]).is_err());
    }
}
