use std::time::Instant;

use chrono::Utc;
use log::{ info, warn };

use crate::errors::{ VerifloatError, VerifloatResult };
use crate::models::outcome::{ Outcome, ScenarioReport, Witness, WitnessValue };
use crate::models::scenario::{ AssignmentCheck, Scenario };
use crate::traits::solver_backend::{ SolverBackend, SolverResponse };

/// Runs scenarios against a solver backend and classifies the answers
pub struct ScenarioVerifier<B: SolverBackend> {
    backend: B,
}

impl<B: SolverBackend> ScenarioVerifier<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Solve one scenario exactly once and report the outcome
    pub async fn verify(&self, scenario: &Scenario) -> VerifloatResult<ScenarioReport> {
        info!("Checking scenario {}: {}", scenario.name(), scenario.description());

        let started = Instant::now();
        let response = self.backend.solve(scenario).await?;
        let solve_time = started.elapsed();

        let outcome = interpret(scenario, response)?;
        match &outcome {
            Outcome::Unknown { reason } => {
                warn!("Scenario {} is undecided: {}", scenario.name(), reason);
            }
            other => {
                info!(
                    "Scenario {}: {} ({} ms)",
                    scenario.name(),
                    other.label(),
                    solve_time.as_millis()
                );
            }
        }

        Ok(ScenarioReport {
            scenario: scenario.name().to_string(),
            description: scenario.description().to_string(),
            bounds: scenario.bounds().clone(),
            outcome,
            solve_time,
            checked_at: Utc::now(),
        })
    }

    /// Solve scenarios strictly one after another.
    ///
    /// Stops at the first error: an unavailable solver fails the whole run.
    pub async fn verify_all(&self, scenarios: &[Scenario]) -> VerifloatResult<Vec<ScenarioReport>> {
        let mut reports = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            reports.push(self.verify(scenario).await?);
        }
        Ok(reports)
    }
}

/// Map a raw solver answer to an [`Outcome`].
///
/// `Unsat` is a proof because the solver was asked the exact negation of the
/// property. `Unknown` stays unknown.
pub fn interpret(scenario: &Scenario, response: SolverResponse) -> VerifloatResult<Outcome> {
    match response {
        SolverResponse::Unsat => Ok(Outcome::PropertyHolds),
        SolverResponse::Unknown(reason) => Ok(Outcome::Unknown { reason }),
        SolverResponse::Sat(mut witness) => {
            validate_witness(scenario, &mut witness)?;
            Ok(Outcome::ViolationFound { witness })
        }
    }
}

/// Re-check a solver witness with exact arithmetic and record the target value.
///
/// Witnesses with algebraic (irrational) values cannot be checked exactly and
/// are accepted as reported.
pub fn validate_witness(scenario: &Scenario, witness: &mut Witness) -> VerifloatResult<()> {
    if let Some(missing) = scenario
        .variables()
        .iter()
        .find(|name| witness.get(name).is_none())
    {
        return Err(VerifloatError::InvalidWitness {
            scenario: scenario.name().to_string(),
            violated: format!("no value for {}", missing),
        });
    }

    let Some(assignment) = witness.exact_assignment() else {
        warn!(
            "Witness for {} has algebraic values; accepting it without exact re-check",
            scenario.name()
        );
        return Ok(());
    };

    match scenario.check_assignment(&assignment) {
        AssignmentCheck::Counterexample => {
            witness.target_value = scenario.target().eval(&assignment).map(WitnessValue::Exact);
            Ok(())
        }
        AssignmentCheck::Fails(constraint) =>
            Err(VerifloatError::InvalidWitness {
                scenario: scenario.name().to_string(),
                violated: constraint.to_string(),
            }),
        AssignmentCheck::Incomplete =>
            Err(VerifloatError::InvalidWitness {
                scenario: scenario.name().to_string(),
                violated: "assertion references a variable without a value".to_string(),
            }),
    }
}
