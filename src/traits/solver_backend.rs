use async_trait::async_trait;

use crate::errors::VerifloatResult;
use crate::models::outcome::Witness;
use crate::models::scenario::Scenario;

/// Raw answer of one solve call on a scenario's assertions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverResponse {
    /// A satisfying assignment of the domain and the negated property
    Sat(Witness),
    Unsat,
    /// Undecided; carries the solver's reason (e.g. `timeout`, `incomplete`)
    Unknown(String),
}

/// The solver boundary.
///
/// Implementations must give every `solve` call its own constraint store, so
/// no state leaks between scenarios.
#[async_trait]
pub trait SolverBackend: Send + Sync {
    /// Short identifier used in logs and reports
    fn name(&self) -> &str;

    /// Check whether the backend can be used at all
    async fn is_available(&self) -> bool;

    /// Version string reported by the backend
    async fn version(&self) -> VerifloatResult<String>;

    /// Assert the scenario's domain and negated property, then check satisfiability once
    async fn solve(&self, scenario: &Scenario) -> VerifloatResult<SolverResponse>;
}
