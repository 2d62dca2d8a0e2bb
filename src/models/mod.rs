pub mod common;
pub mod expr;
pub mod scenario;
pub mod outcome;

// Re-export common model types
pub use common::{ OutputFormat, RationalLiteral };
pub use expr::{ Assignment, Constraint, Expr };
pub use scenario::{ AssignmentCheck, Bounds, Scenario };
pub use outcome::{ Outcome, ScenarioReport, Witness, WitnessValue };
