// ABOUTME: Error types for read, resolution, arity, type, and thrown-value failures

use crate::value::Value;
use thiserror::Error;

// Arity constant strings, to avoid allocating a fresh String at every call site.
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";
pub const ARITY_AT_LEAST_TWO: &str = "at least 2";

#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// The reader could not make sense of the input: unterminated string or
    /// list, or a malformed token. `position` is a byte offset into the source.
    #[error("read error at position {position}: {message}")]
    ReadError { position: usize, message: String },

    /// A symbol used as a combiner's head did not resolve to anything callable,
    /// or `getfunc` was asked for a binding that isn't one.
    #[error("{context}: '{symbol}' is not callable")]
    ResolutionError { symbol: String, context: String },

    /// A symbol had no binding anywhere in the environment chain or host
    /// namespace (used by lookups that must fail loudly, e.g. dotted-path
    /// prefixes).
    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),

    /// A built-in received fewer arguments than its required minimum.
    #[error("{function}: expected {expected} argument{}, got {actual}", if expected == "1" { "" } else { "s" })]
    ArityError {
        function: String,
        expected: String,
        actual: usize,
    },

    /// A built-in received a value of the wrong kind.
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeError {
        function: String,
        expected: String,
        actual: String,
        position: usize,
    },

    /// A value raised with `throw`, unwinding until a `try`/`catch` captures it.
    #[error("uncaught throw: {0}")]
    Thrown(Value),
}

impl EvalError {
    pub fn read_error(position: usize, message: impl Into<String>) -> Self {
        EvalError::ReadError {
            position,
            message: message.into(),
        }
    }

    pub fn resolution_error(context: &str, symbol: &str) -> Self {
        EvalError::ResolutionError {
            symbol: symbol.to_string(),
            context: context.to_string(),
        }
    }

    pub fn type_error(function: &str, expected: &str, actual: &Value, position: usize) -> Self {
        EvalError::TypeError {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
            position,
        }
    }

    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::ArityError {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }
}
