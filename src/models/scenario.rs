use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use serde::Serialize;

use crate::models::common::{ format_rational, RationalLiteral };
use crate::models::expr::{ Assignment, Constraint, Expr };

/// Closed interval `[lo, hi]` the target expression must stay within
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds {
    pub lo: BigRational,
    pub hi: BigRational,
}

impl Bounds {
    pub fn new(lo: BigRational, hi: BigRational) -> Self {
        Self { lo, hi }
    }

    /// `[-magnitude, magnitude]`
    pub fn symmetric(magnitude: BigRational) -> Self {
        Self { lo: -magnitude.clone(), hi: magnitude }
    }

    /// Both ends multiplied by `factor`
    pub fn scaled(&self, factor: usize) -> Self {
        let factor = BigRational::from_integer(BigInt::from(factor));
        Self { lo: &self.lo * &factor, hi: &self.hi * &factor }
    }

    pub fn is_well_formed(&self) -> bool {
        self.lo <= self.hi
    }

    pub fn contains(&self, value: &BigRational) -> bool {
        &self.lo <= value && value <= &self.hi
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", format_rational(&self.lo), format_rational(&self.hi))
    }
}

impl Serialize for Bounds {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("Bounds", 2)?;
        state.serialize_field("lo", &RationalLiteral(self.lo.clone()))?;
        state.serialize_field("hi", &RationalLiteral(self.hi.clone()))?;
        state.end()
    }
}

/// A fully assembled verification scenario.
///
/// Only [`crate::implementations::scenario_builder::ScenarioBuilder`] creates
/// these, so every variable referenced by the domain or the target is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) variables: Vec<String>,
    pub(crate) domain: Vec<Constraint>,
    pub(crate) target: Expr,
    pub(crate) bounds: Bounds,
}

impl Scenario {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared variables in declaration order
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn domain(&self) -> &[Constraint] {
        &self.domain
    }

    pub fn target(&self) -> &Expr {
        &self.target
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// The safety property: `lo <= target <= hi`
    pub fn property(&self) -> Constraint {
        Constraint::and(vec![self.target.ge(&self.bounds.lo), self.target.le(&self.bounds.hi)])
    }

    /// Exact negation of [`Scenario::property`]: `target < lo or target > hi`
    pub fn negated_property(&self) -> Constraint {
        Constraint::or(vec![self.target.lt(&self.bounds.lo), self.target.gt(&self.bounds.hi)])
    }

    /// Everything handed to the solver, in assertion order
    pub fn assertions(&self) -> Vec<Constraint> {
        let mut all = self.domain.clone();
        all.push(self.negated_property());
        all
    }

    /// Check an exact assignment against every assertion
    pub fn check_assignment(&self, assignment: &Assignment) -> AssignmentCheck {
        for assertion in self.assertions() {
            match assertion.holds(assignment) {
                Some(true) => {}
                Some(false) => {
                    return AssignmentCheck::Fails(assertion);
                }
                None => {
                    return AssignmentCheck::Incomplete;
                }
            }
        }
        AssignmentCheck::Counterexample
    }
}

/// Result of checking an assignment against a scenario's assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentCheck {
    /// Satisfies the domain and the negated property
    Counterexample,
    /// The first assertion that does not hold
    Fails(Constraint),
    /// Some referenced variable has no value
    Incomplete,
}
