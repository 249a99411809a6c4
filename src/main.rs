// ABOUTME: CLI entry point: runs a script file or drops into an interactive REPL

mod builtins;
mod config;
mod env;
mod error;
mod eval;
mod logging;
mod reader;
mod value;

use builtins::register_builtins;
use clap::Parser;
use config::{VERSION, WELCOME_FOOTER, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use env::{Environment, HostNamespace};
use error::EvalError;
use eval::resolve;
use reader::read;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use std::path::PathBuf;
use std::rc::Rc;
use value::Value;

/// A small embedded Lisp for scripting a host runtime.
#[derive(Parser, Debug)]
#[command(name = "lispkit")]
#[command(version = VERSION)]
#[command(about = "An embedded Lisp interpreter")]
struct CliArgs {
    /// Script file to execute. Without one, starts the REPL.
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

/// Populates the host namespace with a small demo surface (a `Math` object),
/// standing in for whatever a real embedding would expose.
fn install_demo_host(host: &Rc<HostNamespace>) -> Result<(), EvalError> {
    let math = Value::new_object();
    env::set_property(&math, "pi", Value::Number(std::f64::consts::PI))?;
    env::set_property(&math, "e", Value::Number(std::f64::consts::E))?;
    env::set_property(
        &math,
        "floor",
        Value::native("Math.floor", |args| {
            args.first()
                .map(|v| Value::Number(v.to_number_coerced().floor()))
                .ok_or_else(|| EvalError::arity_error("Math.floor", "1", 0))
        }),
    )?;
    env::set_property(
        &math,
        "abs",
        Value::native("Math.abs", |args| {
            args.first()
                .map(|v| Value::Number(v.to_number_coerced().abs()))
                .ok_or_else(|| EvalError::arity_error("Math.abs", "1", 0))
        }),
    )?;
    host.bind("Math".to_string(), math);
    Ok(())
}

fn build_root_env() -> Result<Rc<Environment>, EvalError> {
    let host = HostNamespace::new();
    install_demo_host(&host)?;
    let env = Environment::root(host);
    register_builtins(&env);
    Ok(env)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let args = CliArgs::parse();
    let env = build_root_env()?;

    if let Some(script_path) = args.script {
        run_script(&script_path, &env)?;
        return Ok(());
    }

    run_repl(&env)
}

fn run_script(path: &PathBuf, env: &Rc<Environment>) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read script file {}: {}", path.display(), e))?;
    let forms = read(&contents)?;
    for form in &forms {
        if let Err(e) = resolve(form, env) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn run_repl(env: &Rc<Environment>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl = DefaultEditor::with_config(config)?;

    let history_file = ".lisp_history";
    let _ = rl.load_history(history_file);

    println!("{WELCOME_MESSAGE}");
    println!("{WELCOME_SUBTITLE}");
    println!("{WELCOME_FOOTER}");

    loop {
        match rl.readline("lisp> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match trimmed {
                    "(quit)" | "(exit)" => {
                        println!("Goodbye!");
                        break;
                    }
                    "(clear)" => {
                        print!("\x1B[2J\x1B[H");
                        continue;
                    }
                    _ => {}
                }

                match read(&line) {
                    Ok(forms) => {
                        let mut result = Value::Null;
                        let mut had_error = false;
                        for form in &forms {
                            match resolve(form, env) {
                                Ok(v) => result = v,
                                Err(e) => {
                                    eprintln!("Error: {e}");
                                    had_error = true;
                                    break;
                                }
                            }
                        }
                        if !had_error {
                            println!("=> {result}");
                        }
                    }
                    Err(e) => eprintln!("Read error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
    Ok(())
}
