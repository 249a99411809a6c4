//! Formatting and sequence assembly: format, join, concat, print, typeof,
//! list, throw
//!
//! `format`'s directive grammar (`%N$`, flags, width, precision, and the
//! `dsfxb` conversions) is hand-rolled rather than pulled in from a crate,
//! since it only needs to cover the fixed directive set named in the
//! built-in catalog, not general `printf` compatibility.

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

fn as_str<'a>(function: &str, v: &'a Value, position: usize) -> Result<&'a str, EvalError> {
    match v {
        Value::String(s) => Ok(s.as_str()),
        other => Err(EvalError::type_error(function, "string", other, position)),
    }
}

struct Directive {
    explicit_index: Option<usize>,
    zero_pad: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conv: char,
}

fn parse_directive(chars: &[char], start: usize) -> (Directive, usize) {
    let mut i = start;

    let digit_run_end = {
        let mut j = i;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
        }
        j
    };
    let mut explicit_index = None;
    if digit_run_end > i && digit_run_end < chars.len() && chars[digit_run_end] == '$' {
        let n: usize = chars[i..digit_run_end].iter().collect::<String>().parse().unwrap_or(1);
        explicit_index = Some(n.saturating_sub(1));
        i = digit_run_end + 1;
    }

    let zero_pad = if i < chars.len() && chars[i] == '0' {
        i += 1;
        true
    } else {
        false
    };

    let wstart = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    let width = if i > wstart {
        chars[wstart..i].iter().collect::<String>().parse().ok()
    } else {
        None
    };

    let mut precision = None;
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        let pstart = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        precision = chars[pstart..i].iter().collect::<String>().parse().ok();
    }

    let conv = chars.get(i).copied().unwrap_or('s');
    i += 1;

    (
        Directive {
            explicit_index,
            zero_pad,
            width,
            precision,
            conv,
        },
        i,
    )
}

fn pad(mut piece: String, directive: &Directive) -> String {
    let Some(w) = directive.width else { return piece };
    if piece.len() >= w {
        return piece;
    }
    let fill = if directive.zero_pad { '0' } else { ' ' };
    let gap = w - piece.len();
    if directive.zero_pad && piece.starts_with('-') {
        let rest = piece.split_off(1);
        format!("-{}{}", fill.to_string().repeat(gap), rest)
    } else {
        format!("{}{}", fill.to_string().repeat(gap), piece)
    }
}

fn render(directive: &Directive, arg: &Value) -> Result<String, EvalError> {
    let rendered = match directive.conv {
        'd' => format!("{}", arg.to_number_coerced() as i64),
        's' => arg.to_string(),
        'f' => {
            let n = arg.to_number_coerced();
            match directive.precision {
                Some(p) => format!("{:.*}", p, n),
                None => format!("{}", n),
            }
        }
        'x' => format!("{:x}", arg.to_number_coerced() as i64),
        'b' => format!("{:b}", arg.to_number_coerced() as i64),
        '%' => return Ok("%".to_string()),
        other => {
            return Err(EvalError::type_error(
                "format",
                "one of d/s/f/x/b/%",
                &Value::String(other.to_string()),
                2,
            ))
        }
    };
    Ok(pad(rendered, directive))
}

fn format_string(fmt: &str, args: &[Value]) -> Result<String, EvalError> {
    let chars: Vec<char> = fmt.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    let mut auto_index = 0usize;

    while i < chars.len() {
        if chars[i] != '%' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        i += 1;
        if i < chars.len() && chars[i] == '%' {
            out.push('%');
            i += 1;
            continue;
        }
        let (directive, next) = parse_directive(&chars, i);
        i = next;
        let index = directive.explicit_index.unwrap_or_else(|| {
            let idx = auto_index;
            auto_index += 1;
            idx
        });
        let arg = args
            .get(index)
            .ok_or_else(|| EvalError::arity_error("format", "enough arguments for its directives", args.len()))?;
        out.push_str(&render(&directive, arg)?);
    }

    Ok(out)
}

fn format_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("format", "at least 2", args.len()));
    }
    let fmt = as_str("format", &args[1], 2)?;
    let rendered = format_string(fmt, &args[2..])?;
    match &args[0] {
        Value::Null => Ok(Value::String(rendered)),
        _ => {
            print!("{}", rendered);
            Ok(Value::Null)
        }
    }
}

fn join_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("join", "at least 2", args.len()));
    }
    let sep = as_str("join", &args[0], 1)?;
    let mut parts = Vec::new();
    for (i, arg) in args[1..].iter().enumerate() {
        match arg {
            Value::List(items) => parts.extend(items.iter().map(|v| v.to_string())),
            other => return Err(EvalError::type_error("join", "list", other, i + 2)),
        }
    }
    Ok(Value::String(parts.join(sep)))
}

fn concat_fn(args: &[Value]) -> Result<Value, EvalError> {
    match args.first() {
        None => Ok(Value::List(vec![])),
        Some(Value::List(_)) => {
            let mut out = Vec::new();
            for (i, arg) in args.iter().enumerate() {
                match arg {
                    Value::List(items) => out.extend(items.iter().cloned()),
                    other => return Err(EvalError::type_error("concat", "list", other, i + 1)),
                }
            }
            Ok(Value::List(out))
        }
        Some(Value::String(_)) => {
            let mut out = String::new();
            for (i, arg) in args.iter().enumerate() {
                match arg {
                    Value::String(s) => out.push_str(s),
                    other => return Err(EvalError::type_error("concat", "string", other, i + 1)),
                }
            }
            Ok(Value::String(out))
        }
        Some(other) => Err(EvalError::type_error("concat", "list or string", other, 1)),
    }
}

fn print_fn(args: &[Value]) -> Result<Value, EvalError> {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            print!(" ");
        }
        print!("{}", arg);
    }
    Ok(Value::Null)
}

fn typeof_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("typeof", "1", args.len()));
    }
    Ok(Value::String(args[0].type_name().to_string()))
}

fn list_fn(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::List(args.to_vec()))
}

fn throw_fn(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("throw", "1", args.len()));
    }
    Err(EvalError::Thrown(args[0].clone()))
}

pub fn register(env: &Rc<Environment>) {
    env.bind("format", Value::native("format", format_fn));
    env.bind("join", Value::native("join", join_fn));
    env.bind("concat", Value::native("concat", concat_fn));
    env.bind("print", Value::native("print", print_fn));
    env.bind("typeof", Value::native("typeof", typeof_fn));
    env.bind("list", Value::native("list", list_fn));
    env.bind("throw", Value::native("throw", throw_fn));
}
