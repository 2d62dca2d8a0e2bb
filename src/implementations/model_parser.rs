//! Reader for solver responses.
//!
//! z3 answers `(check-sat)` with a bare `sat`, `unsat` or `unknown` line and
//! `(get-value ...)` with a list of `(name value)` pairs where real values look
//! like `0.0`, `(/ 1023.0 1024.0)`, `(- (/ 1.0 2.0))` or, for irrational
//! algebraic numbers, `(root-obj (+ (^ x 2) (- 2)) 1)`.

use std::collections::BTreeMap;
use std::fmt;

use num_traits::Zero;

use crate::errors::{ VerifloatError, VerifloatResult };
use crate::models::common::parse_rational;
use crate::models::outcome::WitnessValue;

/// One parsed S-expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SExpr {
    Atom(String),
    Str(String),
    List(Vec<SExpr>),
}

impl SExpr {
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            SExpr::Atom(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SExpr::Atom(text) => write!(f, "{}", text),
            SExpr::Str(text) => write!(f, "\"{}\"", text.replace('"', "\"\"")),
            SExpr::List(items) => {
                let rendered: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "({})", rendered.join(" "))
            }
        }
    }
}

/// Verdict printed in response to `(check-sat)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Sat,
    Unsat,
    Unknown,
}

pub fn parse_verdict(line: &str) -> Option<Verdict> {
    match line.trim() {
        "sat" => Some(Verdict::Sat),
        "unsat" => Some(Verdict::Unsat),
        "unknown" => Some(Verdict::Unknown),
        _ => None,
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Atom(String),
    Str(String),
}

fn tokenize(text: &str) -> VerifloatResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '(' => tokens.push(Token::Open),
            ')' => tokens.push(Token::Close),
            ';' => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '"' => {
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        Some('"') if chars.peek() == Some(&'"') => {
                            chars.next();
                            literal.push('"');
                        }
                        Some('"') => {
                            break;
                        }
                        Some(other) => literal.push(other),
                        None => {
                            return Err(
                                VerifloatError::ModelParseError(
                                    "unterminated string literal".to_string()
                                )
                            );
                        }
                    }
                }
                tokens.push(Token::Str(literal));
            }
            '|' => {
                let mut quoted = String::new();
                loop {
                    match chars.next() {
                        Some('|') => {
                            break;
                        }
                        Some(other) => quoted.push(other),
                        None => {
                            return Err(
                                VerifloatError::ModelParseError("unterminated quoted symbol".to_string())
                            );
                        }
                    }
                }
                tokens.push(Token::Atom(quoted));
            }
            c if c.is_whitespace() => {}
            c => {
                let mut atom = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || next == '(' || next == ')' || next == ';' {
                        break;
                    }
                    atom.push(next);
                    chars.next();
                }
                tokens.push(Token::Atom(atom));
            }
        }
    }

    Ok(tokens)
}

/// Parse every top-level S-expression in `text`
pub fn parse_sexprs(text: &str) -> VerifloatResult<Vec<SExpr>> {
    let mut stack: Vec<Vec<SExpr>> = vec![Vec::new()];

    for token in tokenize(text)? {
        match token {
            Token::Open => stack.push(Vec::new()),
            Token::Close => {
                if stack.len() < 2 {
                    return Err(VerifloatError::ModelParseError("unbalanced ')'".to_string()));
                }
                let finished = stack.pop().unwrap_or_default();
                if let Some(parent) = stack.last_mut() {
                    parent.push(SExpr::List(finished));
                }
            }
            Token::Atom(text) => {
                if let Some(current) = stack.last_mut() {
                    current.push(SExpr::Atom(text));
                }
            }
            Token::Str(text) => {
                if let Some(current) = stack.last_mut() {
                    current.push(SExpr::Str(text));
                }
            }
        }
    }

    if stack.len() != 1 {
        return Err(VerifloatError::ModelParseError("unbalanced '('".to_string()));
    }
    Ok(stack.pop().unwrap_or_default())
}

/// Whether `text` holds at least one complete top-level S-expression.
///
/// Used to decide when a multi-line response has been fully read.
pub fn is_complete(text: &str) -> bool {
    let mut depth: i64 = 0;
    let mut seen_open = false;
    let mut in_string = false;
    let mut in_quote = false;

    for c in text.chars() {
        match c {
            '"' if !in_quote => {
                in_string = !in_string;
            }
            '|' if !in_string => {
                in_quote = !in_quote;
            }
            '(' if !in_string && !in_quote => {
                depth += 1;
                seen_open = true;
            }
            ')' if !in_string && !in_quote => {
                depth -= 1;
            }
            _ => {}
        }
    }

    seen_open && depth <= 0 && !in_string && !in_quote
}

/// `(error "...")` message, if the response is one
pub fn solver_error(exprs: &[SExpr]) -> Option<String> {
    exprs.iter().find_map(|expr| {
        match expr {
            SExpr::List(items) if items.first().and_then(SExpr::as_atom) == Some("error") => {
                let message = items
                    .iter()
                    .skip(1)
                    .map(|item| {
                        match item {
                            SExpr::Str(text) => text.clone(),
                            other => other.to_string(),
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                Some(message)
            }
            _ => None,
        }
    })
}

/// Convert one real-valued solver term into a witness value
pub fn parse_value(expr: &SExpr) -> VerifloatResult<WitnessValue> {
    match expr {
        SExpr::Atom(text) => parse_rational(text).map(WitnessValue::Exact),
        SExpr::List(items) => {
            match items.as_slice() {
                [SExpr::Atom(op), inner] if op == "-" => {
                    match parse_value(inner)? {
                        WitnessValue::Exact(value) => Ok(WitnessValue::Exact(-value)),
                        WitnessValue::Algebraic(_) => Ok(WitnessValue::Algebraic(expr.to_string())),
                    }
                }
                [SExpr::Atom(op), numerator, denominator] if op == "/" => {
                    match (parse_value(numerator)?, parse_value(denominator)?) {
                        (WitnessValue::Exact(n), WitnessValue::Exact(d)) => {
                            if d.is_zero() {
                                return Err(
                                    VerifloatError::ModelParseError(
                                        format!("division by zero in {}", expr)
                                    )
                                );
                            }
                            Ok(WitnessValue::Exact(n / d))
                        }
                        _ => Ok(WitnessValue::Algebraic(expr.to_string())),
                    }
                }
                [SExpr::Atom(op), ..] if op == "root-obj" => {
                    Ok(WitnessValue::Algebraic(expr.to_string()))
                }
                _ => Err(VerifloatError::ModelParseError(format!("unsupported value {}", expr))),
            }
        }
        SExpr::Str(text) => {
            Err(VerifloatError::ModelParseError(format!("string where a real was expected: {}", text)))
        }
    }
}

/// Parse a `(get-value ...)` response into a name to value map
pub fn parse_get_value(text: &str) -> VerifloatResult<BTreeMap<String, WitnessValue>> {
    let exprs = parse_sexprs(text)?;
    if let Some(message) = solver_error(&exprs) {
        return Err(VerifloatError::ExternalToolError { tool: "z3".to_string(), message });
    }

    let pairs = match exprs.as_slice() {
        [SExpr::List(pairs)] => pairs,
        _ => {
            return Err(
                VerifloatError::ModelParseError(format!("expected one list of pairs, got: {}", text.trim()))
            );
        }
    };

    let mut values = BTreeMap::new();
    for pair in pairs {
        match pair {
            SExpr::List(items) if items.len() == 2 => {
                let name = items[0]
                    .as_atom()
                    .ok_or_else(|| {
                        VerifloatError::ModelParseError(format!("non-symbol name in {}", pair))
                    })?;
                values.insert(name.to_string(), parse_value(&items[1])?);
            }
            other => {
                return Err(VerifloatError::ModelParseError(format!("malformed pair {}", other)));
            }
        }
    }

    Ok(values)
}

/// Extract the reason from a `(get-info :reason-unknown)` response
pub fn parse_reason_unknown(text: &str) -> String {
    let fallback = || text.trim().to_string();
    match parse_sexprs(text) {
        Ok(exprs) => {
            match exprs.as_slice() {
                [SExpr::List(items)] if items.len() == 2 => {
                    match &items[1] {
                        SExpr::Str(reason) => reason.clone(),
                        other => other.to_string(),
                    }
                }
                _ => fallback(),
            }
        }
        Err(_) => fallback(),
    }
}
