pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod implementations;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::{ RunOverrides, VerifloatOptions };
pub use errors::{ VerifloatError, VerifloatResult };
pub use implementations::config::{ ConfigError, SolverConfig, VerifloatConfig };
pub use implementations::portfolio::{ PortfolioModel, ScenarioKind, ScenarioRequest };
pub use implementations::scenario_builder::ScenarioBuilder;
pub use implementations::verifier::ScenarioVerifier;
pub use implementations::z3_backend::Z3Backend;
pub use models::{
    common::{ OutputFormat, RationalLiteral },
    expr::{ Constraint, Expr },
    outcome::{ Outcome, ScenarioReport, Witness, WitnessValue },
    scenario::{ Bounds, Scenario },
};
pub use traits::{ SolverBackend, SolverResponse };
