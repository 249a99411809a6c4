// ABOUTME: Version info and REPL banner text

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WELCOME_MESSAGE: &str = "Lisp Interpreter";
pub const WELCOME_SUBTITLE: &str = "A small embedded Lisp for scripting a host runtime";
pub const WELCOME_FOOTER: &str = "Type (quit) or Ctrl-D to exit.";

#[allow(dead_code)]
pub const HELP_TEXT: &str = r#"
Available commands:
  (quit) or (exit)     - Exit the REPL
  (clear)              - Clear the screen

Type any Lisp expression to evaluate it. Use Ctrl-D or (quit) to exit.
"#;
