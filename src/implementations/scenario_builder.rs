use std::collections::BTreeSet;

use log::debug;
use num_rational::BigRational;

use crate::errors::{ VerifloatError, VerifloatResult };
use crate::models::expr::{ Constraint, Expr };
use crate::models::scenario::{ Bounds, Scenario };

/// Incrementally assembles a [`Scenario`].
///
/// Construction mistakes (duplicate or undeclared variables, missing target,
/// inverted bounds) surface as errors from `declare_real` or `build`, before
/// any solver is involved.
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    name: String,
    description: String,
    variables: Vec<String>,
    declared: BTreeSet<String>,
    domain: Vec<Constraint>,
    target: Option<Expr>,
    bounds: Option<Bounds>,
}

impl ScenarioBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            variables: Vec::new(),
            declared: BTreeSet::new(),
            domain: Vec::new(),
            target: None,
            bounds: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare a real-valued symbolic variable and return it as an expression
    pub fn declare_real(&mut self, name: &str) -> VerifloatResult<Expr> {
        if name.trim().is_empty() {
            return Err(
                VerifloatError::ScenarioError(
                    format!("Empty variable name in scenario {}", self.name)
                )
            );
        }
        // '|' and '\' cannot appear inside a quoted SMT-LIB symbol
        if name.contains(['|', '\\']) {
            return Err(
                VerifloatError::ScenarioError(
                    format!("Variable name {:?} in scenario {} cannot be quoted", name, self.name)
                )
            );
        }
        if !self.declared.insert(name.to_string()) {
            return Err(VerifloatError::DuplicateVariable {
                scenario: self.name.clone(),
                name: name.to_string(),
            });
        }
        self.variables.push(name.to_string());
        Ok(Expr::var(name))
    }

    pub fn assume(&mut self, constraint: Constraint) -> &mut Self {
        self.domain.push(constraint);
        self
    }

    /// `lo <= var <= hi`, as two separate assertions
    pub fn assume_range(&mut self, var: &Expr, lo: &BigRational, hi: &BigRational) -> &mut Self {
        self.domain.push(var.ge(lo));
        self.domain.push(var.le(hi));
        self
    }

    pub fn target(&mut self, expr: Expr) -> &mut Self {
        self.target = Some(expr);
        self
    }

    pub fn bounds(&mut self, bounds: Bounds) -> &mut Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn build(self) -> VerifloatResult<Scenario> {
        let target = self.target.ok_or_else(|| {
            VerifloatError::ScenarioError(format!("Scenario {} has no target expression", self.name))
        })?;
        let bounds = self.bounds.ok_or_else(|| {
            VerifloatError::ScenarioError(format!("Scenario {} has no bounds", self.name))
        })?;
        if !bounds.is_well_formed() {
            return Err(
                VerifloatError::ScenarioError(
                    format!("Scenario {} has inverted bounds {}", self.name, bounds)
                )
            );
        }

        let mut referenced = BTreeSet::new();
        target.collect_vars(&mut referenced);
        for constraint in &self.domain {
            constraint.collect_vars(&mut referenced);
        }
        if let Some(name) = referenced.difference(&self.declared).next() {
            return Err(VerifloatError::UndeclaredVariable {
                scenario: self.name,
                name: name.clone(),
            });
        }

        debug!(
            "Built scenario {} with {} variables and {} domain constraints",
            self.name,
            self.variables.len(),
            self.domain.len()
        );

        Ok(Scenario {
            name: self.name,
            description: self.description,
            variables: self.variables,
            domain: self.domain,
            target,
            bounds,
        })
    }
}
