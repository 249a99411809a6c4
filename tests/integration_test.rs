// ABOUTME: End-to-end tests running source text through the reader and evaluator together

use lispkit::builtins::register_builtins;
use lispkit::env::{Environment, HostNamespace};
use lispkit::eval::resolve;
use lispkit::reader::read;
use lispkit::value::Value;
use std::rc::Rc;

fn setup() -> Rc<Environment> {
    let env = Environment::root(HostNamespace::new());
    register_builtins(&env);
    env
}

/// Evaluates every top-level form in `src` in order, returning the last result.
fn run(env: &Rc<Environment>, src: &str) -> Value {
    let forms = read(src).unwrap_or_else(|e| panic!("read error in {src:?}: {e}"));
    let mut result = Value::Null;
    for form in &forms {
        result = resolve(form, env).unwrap_or_else(|e| panic!("eval error in {src:?}: {e}"));
    }
    result
}

fn num(v: &Value) -> f64 {
    match v {
        Value::Number(n) => *n,
        other => panic!("expected number, got {other:?}"),
    }
}

#[test]
fn scenario_1_closure_shares_outer_binding_via_increment() {
    let env = setup();
    let result = run(&env, "(let ((x 3) (f (lambda () (setq x (1+ x))))) (f) (f) x)");
    assert_eq!(num(&result), 5.0);
}

#[test]
fn scenario_2_lambda_parameter_shadows_outer_binding() {
    let env = setup();
    let result = run(&env, "(let ((x 3) (f (lambda (x) (setq x (1+ x))))) (f x) (f x) x)");
    assert_eq!(num(&result), 3.0);
}

#[test]
fn scenario_3_or_short_circuits_before_the_setq_fires() {
    let env = setup();
    let result = run(&env, "(let ((x 5)) (or nil false t (setq x 10)) x)");
    assert_eq!(num(&result), 5.0);
}

#[test]
fn scenario_4_when_runs_its_body_in_order_and_setq_reaches_the_host_namespace() {
    let env = setup();
    let result = run(&env, "(when t (setq a 10) (setq a 20))");
    assert_eq!(num(&result), 20.0);
    assert_eq!(num(&env.lookup("a").unwrap()), 20.0);
}

#[test]
fn scenario_5_format_positional_references() {
    let env = setup();
    let result = run(&env, r#"(format nil "The %2$s contains %1$d monkeys" 5 "tree")"#);
    assert!(matches!(result, Value::String(s) if s == "The tree contains 5 monkeys"));
}

#[test]
fn scenario_6_loose_vs_strict_equality() {
    let env = setup();
    assert!(matches!(run(&env, r#"(== 2 "2")"#), Value::Boolean(true)));
    assert!(matches!(run(&env, r#"(=== 2 "2")"#), Value::Boolean(false)));
    assert!(matches!(run(&env, r#"(!= 2 "2")"#), Value::Boolean(false)));
    assert!(matches!(run(&env, r#"(!== 2 "2")"#), Value::Boolean(true)));
}

#[test]
fn scenario_7_typeof_reports_nil_undefined_and_function() {
    let env = setup();
    assert!(matches!(run(&env, "(typeof nil)"), Value::String(s) if s == "object"));
    assert!(matches!(run(&env, "(typeof undefined)"), Value::String(s) if s == "undefined"));
    assert!(matches!(run(&env, "(typeof (lambda ()))"), Value::String(s) if s == "function"));
}

#[test]
fn scenario_8_join_requires_lists_and_errors_on_a_bare_string() {
    let env = setup();
    let result = run(&env, r#"(join ", " (list 1) (list 2))"#);
    assert!(matches!(result, Value::String(s) if s == "1, 2"));

    let forms = read(r#"(join "," "x")"#).unwrap();
    assert!(resolve(&forms[0], &env).is_err());
}

#[test]
fn scenario_9_legacy_octal_and_hex_number_literals() {
    let env = setup();
    assert_eq!(num(&run(&env, "0100")), 64.0);
    assert_eq!(num(&run(&env, "0x40")), 64.0);
}

#[test]
fn invariant_let_block_restores_outer_bindings_unless_reassigned_with_setq() {
    let env = setup();
    env.bind("x", Value::Number(1.0));
    run(&env, "(let ((x 2)) x)");
    assert_eq!(num(&env.lookup("x").unwrap()), 1.0);

    run(&env, "(let ((y 9)) (setq x 99))");
    assert_eq!(num(&env.lookup("x").unwrap()), 99.0);
}

#[test]
fn invariant_closure_sharing_vs_shadowing() {
    let env = setup();
    let result = run(
        &env,
        "(let ((x 1) (bump (lambda () (setq x (1+ x)))) (shadow (lambda (x) (setq x 100))))
           (bump) (bump) (shadow 0) x)",
    );
    assert_eq!(num(&result), 3.0);
}

#[test]
fn invariant_dotted_path_reaches_a_nested_object_method() {
    let env = setup();
    let result = run(
        &env,
        r#"(let ((p (object)))
             (setkey "greet" p (lambda (who) (format nil "hi %s" who)))
             (funcall p "greet" "bob"))"#,
    );
    assert!(matches!(result, Value::String(s) if s == "hi bob"));
}

#[test]
fn invariant_try_catch_captures_a_thrown_object_unchanged() {
    let env = setup();
    let result = run(
        &env,
        r#"(try (throw (object "code" 42)) (catch (e) (getkey "code" e)))"#,
    );
    assert_eq!(num(&result), 42.0);
}

#[test]
fn invariant_reader_preserves_escaped_whitespace() {
    let env = setup();
    let result = run(&env, r#"(== "a\nstring" "a
string")"#);
    assert!(matches!(result, Value::Boolean(true)));
}
