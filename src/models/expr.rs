use std::collections::{ BTreeMap, BTreeSet };
use std::fmt;
use std::ops;

use num_rational::BigRational;
use num_traits::{ One, Zero };

use crate::models::common::format_rational;

/// Exact variable assignment used when evaluating expressions
pub type Assignment = BTreeMap<String, BigRational>;

/// Real-valued arithmetic expression over named symbolic variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(String),
    Const(BigRational),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Neg(Box<Expr>),
}

/// Boolean relation over expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Le(Expr, Expr),
    Lt(Expr, Expr),
    Ge(Expr, Expr),
    Gt(Expr, Expr),
    Eq(Expr, Expr),
    And(Vec<Constraint>),
    Or(Vec<Constraint>),
    Not(Box<Constraint>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn constant(value: BigRational) -> Self {
        Expr::Const(value)
    }

    /// Sum of the given terms; the empty sum is `0`
    pub fn sum<I: IntoIterator<Item = Expr>>(terms: I) -> Self {
        let mut terms: Vec<Expr> = terms.into_iter().collect();
        match terms.len() {
            0 => Expr::Const(BigRational::zero()),
            1 => terms.remove(0),
            _ => Expr::Add(terms),
        }
    }

    pub fn le(&self, rhs: impl Into<Expr>) -> Constraint {
        Constraint::Le(self.clone(), rhs.into())
    }

    pub fn lt(&self, rhs: impl Into<Expr>) -> Constraint {
        Constraint::Lt(self.clone(), rhs.into())
    }

    pub fn ge(&self, rhs: impl Into<Expr>) -> Constraint {
        Constraint::Ge(self.clone(), rhs.into())
    }

    pub fn gt(&self, rhs: impl Into<Expr>) -> Constraint {
        Constraint::Gt(self.clone(), rhs.into())
    }

    pub fn equals(&self, rhs: impl Into<Expr>) -> Constraint {
        Constraint::Eq(self.clone(), rhs.into())
    }

    /// Collect every variable name referenced by this expression
    pub fn collect_vars(&self, into: &mut BTreeSet<String>) {
        match self {
            Expr::Var(name) => {
                into.insert(name.clone());
            }
            Expr::Const(_) => {}
            Expr::Add(terms) | Expr::Mul(terms) => {
                for term in terms {
                    term.collect_vars(into);
                }
            }
            Expr::Neg(inner) => inner.collect_vars(into),
        }
    }

    /// Evaluate exactly; `None` if a variable is missing from the assignment
    pub fn eval(&self, assignment: &Assignment) -> Option<BigRational> {
        match self {
            Expr::Var(name) => assignment.get(name).cloned(),
            Expr::Const(value) => Some(value.clone()),
            Expr::Add(terms) => {
                let mut total = BigRational::zero();
                for term in terms {
                    total += term.eval(assignment)?;
                }
                Some(total)
            }
            Expr::Mul(factors) => {
                let mut product = BigRational::one();
                for factor in factors {
                    product *= factor.eval(assignment)?;
                }
                Some(product)
            }
            Expr::Neg(inner) => inner.eval(assignment).map(|v| -v),
        }
    }
}

impl Constraint {
    pub fn and(parts: Vec<Constraint>) -> Self {
        Constraint::And(parts)
    }

    pub fn or(parts: Vec<Constraint>) -> Self {
        Constraint::Or(parts)
    }

    pub fn negate(self) -> Self {
        Constraint::Not(Box::new(self))
    }

    pub fn collect_vars(&self, into: &mut BTreeSet<String>) {
        match self {
            | Constraint::Le(lhs, rhs)
            | Constraint::Lt(lhs, rhs)
            | Constraint::Ge(lhs, rhs)
            | Constraint::Gt(lhs, rhs)
            | Constraint::Eq(lhs, rhs) => {
                lhs.collect_vars(into);
                rhs.collect_vars(into);
            }
            Constraint::And(parts) | Constraint::Or(parts) => {
                for part in parts {
                    part.collect_vars(into);
                }
            }
            Constraint::Not(inner) => inner.collect_vars(into),
        }
    }

    pub fn free_vars(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        self.collect_vars(&mut vars);
        vars
    }

    /// Decide the constraint under an exact assignment
    pub fn holds(&self, assignment: &Assignment) -> Option<bool> {
        let compare = |lhs: &Expr, rhs: &Expr| -> Option<(BigRational, BigRational)> {
            Some((lhs.eval(assignment)?, rhs.eval(assignment)?))
        };

        match self {
            Constraint::Le(lhs, rhs) => compare(lhs, rhs).map(|(l, r)| l <= r),
            Constraint::Lt(lhs, rhs) => compare(lhs, rhs).map(|(l, r)| l < r),
            Constraint::Ge(lhs, rhs) => compare(lhs, rhs).map(|(l, r)| l >= r),
            Constraint::Gt(lhs, rhs) => compare(lhs, rhs).map(|(l, r)| l > r),
            Constraint::Eq(lhs, rhs) => compare(lhs, rhs).map(|(l, r)| l == r),
            Constraint::And(parts) => {
                let mut all = true;
                for part in parts {
                    all &= part.holds(assignment)?;
                }
                Some(all)
            }
            Constraint::Or(parts) => {
                let mut any = false;
                for part in parts {
                    any |= part.holds(assignment)?;
                }
                Some(any)
            }
            Constraint::Not(inner) => inner.holds(assignment).map(|v| !v),
        }
    }
}

impl From<BigRational> for Expr {
    fn from(value: BigRational) -> Self {
        Expr::Const(value)
    }
}

impl From<&BigRational> for Expr {
    fn from(value: &BigRational) -> Self {
        Expr::Const(value.clone())
    }
}

impl From<&Expr> for Expr {
    fn from(value: &Expr) -> Self {
        value.clone()
    }
}

impl ops::Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        match self {
            Expr::Add(mut terms) => {
                terms.push(rhs);
                Expr::Add(terms)
            }
            lhs => Expr::Add(vec![lhs, rhs]),
        }
    }
}

impl ops::Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        self + Expr::Neg(Box::new(rhs))
    }
}

impl ops::Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        match self {
            Expr::Mul(mut factors) => {
                factors.push(rhs);
                Expr::Mul(factors)
            }
            lhs => Expr::Mul(vec![lhs, rhs]),
        }
    }
}

impl ops::Mul<&Expr> for &Expr {
    type Output = Expr;

    fn mul(self, rhs: &Expr) -> Expr {
        self.clone() * rhs.clone()
    }
}

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(value) => write!(f, "{}", format_rational(value)),
            Expr::Add(terms) => {
                let rendered: Vec<String> = terms.iter().map(|t| t.to_string()).collect();
                write!(f, "({})", rendered.join(" + "))
            }
            Expr::Mul(factors) => {
                let rendered: Vec<String> = factors.iter().map(|t| t.to_string()).collect();
                write!(f, "{}", rendered.join("*"))
            }
            Expr::Neg(inner) => write!(f, "-{}", inner),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Le(lhs, rhs) => write!(f, "{} <= {}", lhs, rhs),
            Constraint::Lt(lhs, rhs) => write!(f, "{} < {}", lhs, rhs),
            Constraint::Ge(lhs, rhs) => write!(f, "{} >= {}", lhs, rhs),
            Constraint::Gt(lhs, rhs) => write!(f, "{} > {}", lhs, rhs),
            Constraint::Eq(lhs, rhs) => write!(f, "{} = {}", lhs, rhs),
            Constraint::And(parts) => {
                let rendered: Vec<String> = parts.iter().map(|p| format!("({})", p)).collect();
                write!(f, "{}", rendered.join(" and "))
            }
            Constraint::Or(parts) => {
                let rendered: Vec<String> = parts.iter().map(|p| format!("({})", p)).collect();
                write!(f, "{}", rendered.join(" or "))
            }
            Constraint::Not(inner) => write!(f, "not ({})", inner),
        }
    }
}
