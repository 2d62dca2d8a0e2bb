//! SMT-LIB2 rendering of scenarios.
//!
//! Every variable is a `Real` constant; literals are written as exact
//! fractions so nothing passes through floating point on the way to the
//! solver.

use num_rational::BigRational;
use num_traits::Signed;

use crate::models::expr::{ Constraint, Expr };
use crate::models::scenario::Scenario;

/// Options that shape the emitted script
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    pub logic: String,
    pub produce_models: bool,
    pub random_seed: Option<u32>,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            logic: "QF_NRA".to_string(),
            produce_models: true,
            random_seed: None,
        }
    }
}

/// Render a symbol, quoting it with `|...|` unless it is a simple symbol
pub fn symbol(name: &str) -> String {
    const EXTRA: &str = "~!@$%^&*_-+=<>.?/";
    let simple = !name.is_empty() &&
        !name.starts_with(|c: char| c.is_ascii_digit()) &&
        name.chars().all(|c| c.is_ascii_alphanumeric() || EXTRA.contains(c));
    if simple {
        name.to_string()
    } else {
        format!("|{}|", name)
    }
}

pub fn render_rational(value: &BigRational) -> String {
    let magnitude = value.abs();
    let body = if magnitude.is_integer() {
        format!("{}.0", magnitude.numer())
    } else {
        format!("(/ {}.0 {}.0)", magnitude.numer(), magnitude.denom())
    };
    if value.is_negative() {
        format!("(- {})", body)
    } else {
        body
    }
}

pub fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Var(name) => symbol(name),
        Expr::Const(value) => render_rational(value),
        Expr::Add(terms) => render_nary("+", terms, "0.0"),
        Expr::Mul(factors) => render_nary("*", factors, "1.0"),
        Expr::Neg(inner) => format!("(- {})", render_expr(inner)),
    }
}

fn render_nary(op: &str, operands: &[Expr], identity: &str) -> String {
    match operands {
        [] => identity.to_string(),
        [single] => render_expr(single),
        _ => {
            let rendered: Vec<String> = operands.iter().map(render_expr).collect();
            format!("({} {})", op, rendered.join(" "))
        }
    }
}

pub fn render_constraint(constraint: &Constraint) -> String {
    let binary = |op: &str, lhs: &Expr, rhs: &Expr| {
        format!("({} {} {})", op, render_expr(lhs), render_expr(rhs))
    };
    match constraint {
        Constraint::Le(lhs, rhs) => binary("<=", lhs, rhs),
        Constraint::Lt(lhs, rhs) => binary("<", lhs, rhs),
        Constraint::Ge(lhs, rhs) => binary(">=", lhs, rhs),
        Constraint::Gt(lhs, rhs) => binary(">", lhs, rhs),
        Constraint::Eq(lhs, rhs) => binary("=", lhs, rhs),
        Constraint::And(parts) if parts.is_empty() => "true".to_string(),
        Constraint::Or(parts) if parts.is_empty() => "false".to_string(),
        Constraint::And(parts) => {
            let rendered: Vec<String> = parts.iter().map(render_constraint).collect();
            format!("(and {})", rendered.join(" "))
        }
        Constraint::Or(parts) => {
            let rendered: Vec<String> = parts.iter().map(render_constraint).collect();
            format!("(or {})", rendered.join(" "))
        }
        Constraint::Not(inner) => format!("(not {})", render_constraint(inner)),
    }
}

/// Script up to and including `(check-sat)`
pub fn render_script(scenario: &Scenario, options: &ScriptOptions) -> String {
    let mut script = String::new();

    if options.produce_models {
        script.push_str("(set-option :produce-models true)\n");
    }
    if let Some(seed) = options.random_seed {
        script.push_str(&format!("(set-option :random-seed {})\n", seed));
    }
    script.push_str(&format!("(set-logic {})\n", options.logic));
    script.push_str(&format!("; scenario: {}\n", scenario.name()));

    for name in scenario.variables() {
        script.push_str(&format!("(declare-const {} Real)\n", symbol(name)));
    }
    for constraint in scenario.domain() {
        script.push_str(&format!("(assert {})\n", render_constraint(constraint)));
    }
    script.push_str("; negated property\n");
    script.push_str(&format!("(assert {})\n", render_constraint(&scenario.negated_property())));
    script.push_str("(check-sat)\n");

    script
}

/// `(get-value (...))` over every declared variable
pub fn get_value_command(scenario: &Scenario) -> String {
    let symbols: Vec<String> = scenario
        .variables()
        .iter()
        .map(|name| symbol(name))
        .collect();
    format!("(get-value ({}))\n", symbols.join(" "))
}

/// Complete script as a standalone `.smt2` file would contain it
pub fn render_standalone(scenario: &Scenario, options: &ScriptOptions) -> String {
    let mut script = render_script(scenario, options);
    if options.produce_models {
        script.push_str(&get_value_command(scenario));
    }
    script.push_str("(exit)\n");
    script
}
