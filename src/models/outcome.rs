use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{ DateTime, Utc };
use num_rational::BigRational;
use serde::{ Serialize, Serializer };

use crate::models::common::{ approximate, format_rational };
use crate::models::expr::Assignment;
use crate::models::scenario::Bounds;

/// Value the solver assigned to one variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WitnessValue {
    Exact(BigRational),
    /// Irrational algebraic number, kept in the solver's own notation
    Algebraic(String),
}

impl fmt::Display for WitnessValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WitnessValue::Exact(value) if value.is_integer() => write!(f, "{}", format_rational(value)),
            WitnessValue::Exact(value) => {
                write!(f, "{} (~{})", format_rational(value), approximate(value))
            }
            WitnessValue::Algebraic(text) => write!(f, "{}", text),
        }
    }
}

impl Serialize for WitnessValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WitnessValue::Exact(value) => serializer.serialize_str(&format_rational(value)),
            WitnessValue::Algebraic(text) => serializer.serialize_str(text),
        }
    }
}

/// A concrete assignment satisfying the domain and the negated property
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Witness {
    pub values: BTreeMap<String, WitnessValue>,
    /// Target expression evaluated under `values`, when every value is exact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<WitnessValue>,
}

impl Witness {
    pub fn new(values: BTreeMap<String, WitnessValue>) -> Self {
        Self { values, target_value: None }
    }

    pub fn get(&self, name: &str) -> Option<&WitnessValue> {
        self.values.get(name)
    }

    /// Exact assignment, or `None` if any value is algebraic
    pub fn exact_assignment(&self) -> Option<Assignment> {
        self.values
            .iter()
            .map(|(name, value)| {
                match value {
                    WitnessValue::Exact(v) => Some((name.clone(), v.clone())),
                    WitnessValue::Algebraic(_) => None,
                }
            })
            .collect()
    }
}

impl fmt::Display for Witness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.values
            .iter()
            .map(|(name, value)| format!("{} = {}", name, value))
            .collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}

/// What the solver established about a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The negated property is unsatisfiable, so the property holds for every
    /// real assignment allowed by the domain
    PropertyHolds,
    ViolationFound {
        witness: Witness,
    },
    /// The solver could not decide (timeout, incompleteness)
    Unknown {
        reason: String,
    },
}

impl Outcome {
    pub fn is_holds(&self) -> bool {
        matches!(self, Outcome::PropertyHolds)
    }

    pub fn is_violation(&self) -> bool {
        matches!(self, Outcome::ViolationFound { .. })
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Outcome::Unknown { .. })
    }

    pub fn witness(&self) -> Option<&Witness> {
        match self {
            Outcome::ViolationFound { witness } => Some(witness),
            _ => None,
        }
    }

    /// Classification without the witness payload
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::PropertyHolds => "property holds",
            Outcome::ViolationFound { .. } => "violation found",
            Outcome::Unknown { .. } => "unknown",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::PropertyHolds => write!(f, "Property holds"),
            Outcome::ViolationFound { witness } => write!(f, "Violation found: {}", witness),
            Outcome::Unknown { reason } => write!(f, "Unknown: {}", reason),
        }
    }
}

/// Outcome of one scenario run, ready for display or JSON export
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub description: String,
    pub bounds: Bounds,
    pub outcome: Outcome,
    #[serde(serialize_with = "serialize_millis")]
    pub solve_time: Duration,
    pub checked_at: DateTime<Utc>,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}
