//! Built-in macro and function catalog, organized by concern.
//!
//! - **[control]**: let, setq, lambda, defun, progn, if, when, try
//! - **[logic]**: and, or, not
//! - **[comparison]**: ==, !=, ===, !==, <, >, <=, >=
//! - **[predicates]**: is-true, is-false, is-null, is-undefined, is-string,
//!   is-number, is-boolean, is-function, is-object
//! - **[interop]**: new, getfunc, funcall, object, getkey, setkey
//! - **[convert]**: to-string, to-number, to-boolean, to-upper, to-lower
//! - **[format]**: format, join, concat, print, typeof, list, throw
//! - **[arithmetic]**: +, -, *, /, %, 1+

use crate::env::Environment;
use std::rc::Rc;

pub mod arithmetic;
pub mod comparison;
pub mod control;
pub mod convert;
pub mod format;
pub mod interop;
pub mod logic;
pub mod predicates;

/// Binds every built-in macro and function into `env`.
pub fn register_builtins(env: &Rc<Environment>) {
    control::register(env);
    logic::register(env);
    comparison::register(env);
    predicates::register(env);
    interop::register(env);
    convert::register(env);
    format::register(env);
    arithmetic::register(env);
}
