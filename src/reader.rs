// ABOUTME: Reader turning source text into a sequence of top-level forms

use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while, take_while1},
    character::complete::{char, digit0, digit1, hex_digit1, multispace1, one_of},
    combinator::{opt, recognize, value},
    multi::many0,
    IResult, Parser,
};

use crate::error::EvalError;
use crate::value::Value;

fn ws_and_comments(input: &str) -> IResult<&str, ()> {
    many0(alt((
        value((), multispace1),
        value((), (char(';'), take_while(|c: char| c != '\n'))),
    )))
    .map(|_| ())
    .parse(input)
}

fn is_symbol_char(c: char) -> bool {
    c.is_alphanumeric() || "+-*/%!=<>?._".contains(c)
}

/// Recognizes the maximal numeric token: decimal (with optional fraction and
/// exponent), hex (`0x…`), or a leading-zero run that may turn out to be
/// legacy octal or may fall back to decimal.
fn number_token(input: &str) -> IResult<&str, &str> {
    recognize((
        opt(one_of("+-")),
        alt((
            recognize((tag_no_case("0x"), hex_digit1)),
            recognize((
                digit1,
                opt((char('.'), digit0)),
                opt((one_of("eE"), opt(one_of("+-")), digit1)),
            )),
            recognize((char('.'), digit1)),
        )),
    ))
    .parse(input)
}

fn parse_number(input: &str) -> IResult<&str, Value> {
    let (rest, text) = number_token(input)?;
    if let Some(c) = rest.chars().next() {
        if is_symbol_char(c) {
            // "3x" or "1+" is a symbol, not a number followed by garbage —
            // defer the whole run to the symbol parser.
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Digit,
            )));
        }
    }
    Ok((rest, Value::Number(number_text_to_f64(text))))
}

fn number_text_to_f64(text: &str) -> f64 {
    let (sign, body) = match text.as_bytes().first() {
        Some(b'-') => (-1.0, &text[1..]),
        Some(b'+') => (1.0, &text[1..]),
        _ => (1.0, text),
    };

    if body.len() > 2 && (body.starts_with("0x") || body.starts_with("0X")) {
        let n = i64::from_str_radix(&body[2..], 16).unwrap_or(0);
        return sign * n as f64;
    }

    let looks_octal = body.len() > 1
        && body.as_bytes()[0] == b'0'
        && !body.contains('.')
        && !body.contains(['e', 'E'])
        && body[1..].bytes().all(|b| b.is_ascii_digit());

    if looks_octal && body[1..].bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        let n = i64::from_str_radix(body, 8).unwrap_or(0);
        return sign * n as f64;
    }

    sign * body.parse::<f64>().unwrap_or(f64::NAN)
}

fn symbol_or_literal(text: &str) -> Value {
    match text {
        "t" | "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        "nil" | "null" => Value::Null,
        "undefined" => Value::Undefined,
        _ => Value::Symbol(text.to_string()),
    }
}

fn parse_symbol(input: &str) -> IResult<&str, Value> {
    let (rest, text) = take_while1(is_symbol_char)(input)?;
    Ok((rest, symbol_or_literal(text)))
}

fn parse_keyword(input: &str) -> IResult<&str, Value> {
    let (rest, _) = char(':')(input)?;
    let (rest, text) = take_while1(is_symbol_char)(rest)?;
    Ok((rest, Value::Keyword(text.to_string())))
}

/// Strings are scanned by hand rather than via `nom::escaped` so that
/// literal newlines/tabs inside the quotes are preserved verbatim and the
/// full escape set (`\n \t \r \\ \" \0`) is honored.
fn parse_string(input: &str) -> IResult<&str, Value> {
    let (mut rest, _) = char('"')(input)?;
    let mut out = String::new();
    loop {
        match rest.chars().next() {
            None => {
                return Err(nom::Err::Failure(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Eof,
                )))
            }
            Some('"') => {
                rest = &rest[1..];
                break;
            }
            Some('\\') => {
                let after = &rest[1..];
                let Some(escaped) = after.chars().next() else {
                    return Err(nom::Err::Failure(nom::error::Error::new(
                        input,
                        nom::error::ErrorKind::Eof,
                    )));
                };
                let mapped = match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    '\\' => '\\',
                    '"' => '"',
                    other => other,
                };
                out.push(mapped);
                rest = &after[escaped.len_utf8()..];
            }
            Some(c) => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    Ok((rest, Value::String(out)))
}

fn parse_list(input: &str) -> IResult<&str, Value> {
    let (input, _) = char('(')(input)?;
    let (mut remaining, _) = ws_and_comments(input)?;
    let mut items = Vec::new();
    loop {
        if remaining.is_empty() {
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Eof,
            )));
        }
        if let Ok((rest, _)) = char::<_, nom::error::Error<&str>>(')').parse(remaining) {
            return Ok((rest, Value::List(items)));
        }
        let (rest, expr) = parse_expr(remaining)?;
        items.push(expr);
        let (rest, _) = ws_and_comments(rest)?;
        remaining = rest;
    }
}

fn parse_expr(input: &str) -> IResult<&str, Value> {
    let (input, _) = ws_and_comments(input)?;
    alt((parse_list, parse_number, parse_string, parse_keyword, parse_symbol)).parse(input)
}

/// Reads every top-level form out of `input`. Empty or comment-only input
/// yields an empty sequence.
pub fn read(input: &str) -> Result<Vec<Value>, EvalError> {
    log::trace!("reader entry: {} byte(s) of source", input.len());
    let mut forms = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) = ws_and_comments(remaining).unwrap_or((remaining, ()));
        remaining = rest;
        if remaining.is_empty() {
            break;
        }
        match parse_expr(remaining) {
            Ok((rest, value)) => {
                forms.push(value);
                remaining = rest;
            }
            Err(_) => {
                let position = input.len() - remaining.len();
                let snippet: String = remaining.chars().take(24).collect();
                log::debug!("read error at byte {position}");
                return Err(EvalError::read_error(
                    position,
                    format!("unexpected input near '{snippet}'"),
                ));
            }
        }
    }

    log::trace!("reader produced {} top-level form(s)", forms.len());
    Ok(forms)
}

/// Reads exactly one form, erroring if there is more than one or none.
pub fn read_one(input: &str) -> Result<Value, EvalError> {
    let mut forms = read(input)?;
    match forms.len() {
        1 => Ok(forms.remove(0)),
        0 => Err(EvalError::read_error(0, "no expression found")),
        n => Err(EvalError::read_error(
            input.len(),
            format!("expected a single expression, found {n}"),
        )),
    }
}
