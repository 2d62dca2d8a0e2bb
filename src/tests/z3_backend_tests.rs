#[cfg(test)]
mod tests {
    use tokio::test;

    use crate::errors::{ VerifloatError, VerifloatResult };
    use crate::implementations::config::SolverConfig;
    use crate::implementations::portfolio::{ PortfolioModel, ScenarioKind, ScenarioRequest };
    use crate::implementations::verifier::ScenarioVerifier;
    use crate::implementations::z3_backend::Z3Backend;
    use crate::models::common::{ integer, rational };
    use crate::models::outcome::{ Outcome, WitnessValue };
    use crate::models::scenario::Bounds;
    use crate::tests::support::{ setup, z3_or_skip };
    #[cfg(unix)]
    use crate::tests::support::fake_solver;
    use crate::traits::solver_backend::SolverBackend;

    async fn outcome_of(backend: Z3Backend, request: ScenarioRequest) -> VerifloatResult<Outcome> {
        let scenario = PortfolioModel::default().scenario(&request)?;
        let report = ScenarioVerifier::new(backend).verify(&scenario).await?;
        Ok(report.outcome)
    }

    #[test]
    async fn single_period_holds() -> VerifloatResult<()> {
        let Some(z3) = z3_or_skip("single_period_holds").await else {
            return Ok(());
        };
        let outcome = outcome_of(z3, ScenarioRequest::new(ScenarioKind::SinglePeriod)).await?;
        assert_eq!(outcome, Outcome::PropertyHolds);
        Ok(())
    }

    #[test]
    async fn small_drift_breaks_unit_bounds() -> VerifloatResult<()> {
        let Some(z3) = z3_or_skip("small_drift_breaks_unit_bounds").await else {
            return Ok(());
        };
        let outcome = outcome_of(z3, ScenarioRequest::new(ScenarioKind::Drift)).await?;

        let witness = outcome.witness().expect("drift scenario has a counterexample");
        match &witness.target_value {
            Some(WitnessValue::Exact(target)) => {
                assert!(*target > integer(1) || *target < integer(-1), "target {}", target);
            }
            other => panic!("expected an exact target value, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    async fn wide_drift_breaks_unit_bounds() -> VerifloatResult<()> {
        let Some(z3) = z3_or_skip("wide_drift_breaks_unit_bounds").await else {
            return Ok(());
        };
        let model = PortfolioModel {
            drift_min: integer(-1).into(),
            drift_max: integer(1).into(),
            ..PortfolioModel::default()
        };
        let scenario = model.scenario(&ScenarioRequest::new(ScenarioKind::Drift))?;
        let report = ScenarioVerifier::new(z3).verify(&scenario).await?;
        assert!(report.outcome.is_violation());
        Ok(())
    }

    #[test]
    async fn two_periods_hold_within_doubled_bounds() -> VerifloatResult<()> {
        let Some(z3) = z3_or_skip("two_periods_hold_within_doubled_bounds").await else {
            return Ok(());
        };
        let outcome = outcome_of(z3, ScenarioRequest::new(ScenarioKind::MultiPeriod(2))).await?;
        assert_eq!(outcome, Outcome::PropertyHolds);
        Ok(())
    }

    #[test]
    async fn two_periods_break_tightened_bounds() -> VerifloatResult<()> {
        let Some(z3) = z3_or_skip("two_periods_break_tightened_bounds").await else {
            return Ok(());
        };
        let request = ScenarioRequest::new(ScenarioKind::MultiPeriod(2)).with_bounds(
            Bounds::symmetric(rational(19, 10))
        );
        let outcome = outcome_of(z3, request).await?;
        assert!(outcome.is_violation());
        Ok(())
    }

    #[test]
    async fn three_periods_hold_within_tripled_bounds() -> VerifloatResult<()> {
        let Some(z3) = z3_or_skip("three_periods_hold_within_tripled_bounds").await else {
            return Ok(());
        };
        let outcome = outcome_of(z3, ScenarioRequest::new(ScenarioKind::MultiPeriod(3))).await?;
        assert_eq!(outcome, Outcome::PropertyHolds);
        Ok(())
    }

    #[test]
    async fn zero_weights_pin_the_return_to_zero() -> VerifloatResult<()> {
        let Some(z3) = z3_or_skip("zero_weights_pin_the_return_to_zero").await else {
            return Ok(());
        };
        let request = ScenarioRequest::new(ScenarioKind::SinglePeriod)
            .with_zero_weights()
            .with_bounds(Bounds::new(integer(0), integer(0)));
        let outcome = outcome_of(z3.clone(), request).await?;
        assert_eq!(outcome, Outcome::PropertyHolds);

        let drift = ScenarioRequest::new(ScenarioKind::Drift).with_zero_weights();
        assert_eq!(outcome_of(z3, drift).await?, Outcome::PropertyHolds);
        Ok(())
    }

    #[test]
    async fn repeated_solves_agree() -> VerifloatResult<()> {
        let Some(z3) = z3_or_skip("repeated_solves_agree").await else {
            return Ok(());
        };
        let scenario = PortfolioModel::default().scenario(
            &ScenarioRequest::new(ScenarioKind::Drift)
        )?;
        let verifier = ScenarioVerifier::new(z3);
        let first = verifier.verify(&scenario).await?;
        let second = verifier.verify(&scenario).await?;
        assert_eq!(first.outcome.label(), second.outcome.label());
        Ok(())
    }

    #[test]
    async fn missing_executable_is_unavailable() {
        setup();
        let backend = Z3Backend::new(SolverConfig {
            path: "/nonexistent/verifloat/z3".to_string(),
            ..SolverConfig::default()
        });
        assert!(!backend.is_available().await);

        let scenario = PortfolioModel::default()
            .scenario(&ScenarioRequest::new(ScenarioKind::SinglePeriod))
            .expect("scenario builds");
        match backend.solve(&scenario).await {
            Err(VerifloatError::SolverUnavailable { tool, .. }) => assert_eq!(tool, "z3"),
            other => panic!("expected SolverUnavailable, got {:?}", other),
        }
    }

    #[test]
    async fn huge_timeout_does_not_overflow_the_hard_limit() {
        setup();
        let backend = Z3Backend::new(SolverConfig {
            path: "/nonexistent/verifloat/z3".to_string(),
            timeout_ms: u64::MAX,
            grace_ms: 100,
            ..SolverConfig::default()
        });
        assert_eq!(backend.hard_limit(), Some(std::time::Duration::from_millis(u64::MAX)));

        let scenario = PortfolioModel::default()
            .scenario(&ScenarioRequest::new(ScenarioKind::SinglePeriod))
            .expect("scenario builds");
        let result = ScenarioVerifier::new(backend).verify(&scenario).await;
        assert!(matches!(result, Err(VerifloatError::SolverUnavailable { .. })));
    }

    #[test]
    async fn zero_timeout_disables_the_hard_limit() {
        let backend = Z3Backend::new(SolverConfig { timeout_ms: 0, ..SolverConfig::default() });
        assert_eq!(backend.hard_limit(), None);
    }

    #[cfg(unix)]
    fn backend_for(path: std::path::PathBuf, timeout_ms: u64, grace_ms: u64) -> Z3Backend {
        Z3Backend::new(SolverConfig {
            path: path.to_string_lossy().into_owned(),
            timeout_ms,
            grace_ms,
            ..SolverConfig::default()
        })
    }

    #[cfg(unix)]
    #[test]
    async fn silent_solver_times_out_as_unknown() -> VerifloatResult<()> {
        setup();
        let path = fake_solver("silent", r#"case "$line" in "(check-sat)") exec sleep 10 ;; esac"#);
        let backend = backend_for(path.clone(), 100, 100);

        let started = std::time::Instant::now();
        let outcome = outcome_of(backend, ScenarioRequest::new(ScenarioKind::SinglePeriod)).await;
        let _ = std::fs::remove_file(&path);

        match outcome? {
            Outcome::Unknown { reason } => assert!(reason.contains("no answer within 200 ms"), "{}", reason),
            other => panic!("expected Unknown, got {:?}", other),
        }
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    async fn unknown_verdict_carries_the_solver_reason() -> VerifloatResult<()> {
        setup();
        let path = fake_solver(
            "unknown",
            r#"case "$line" in
  "(check-sat)") echo unknown ;;
  "(get-info :reason-unknown)") echo '(:reason-unknown "canceled")' ;;
  "(exit)") exit 0 ;;
esac"#
        );
        let outcome = outcome_of(
            backend_for(path.clone(), 5_000, 1_000),
            ScenarioRequest::new(ScenarioKind::MultiPeriod(2))
        ).await;
        let _ = std::fs::remove_file(&path);

        assert_eq!(outcome?, Outcome::Unknown { reason: "canceled".to_string() });
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    async fn multi_line_model_becomes_validated_witness() -> VerifloatResult<()> {
        setup();
        let path = fake_solver(
            "sat",
            r#"case "$line" in
  "(check-sat)") echo sat ;;
  "(get-value"*) printf '((w1 0.0)\n (w2 (/ 1023.0 1024.0))\n (w3 0.0)\n (r1 0.0)\n (r2 (/ 65535.0 65536.0))\n (r3 0.0)\n (epsilon (/ 65.0 65536.0)))\n' ;;
  "(exit)") exit 0 ;;
esac"#
        );
        let outcome = outcome_of(
            backend_for(path.clone(), 5_000, 1_000),
            ScenarioRequest::new(ScenarioKind::Drift)
        ).await;
        let _ = std::fs::remove_file(&path);

        let outcome = outcome?;
        let witness = outcome.witness().expect("sat answer carries a witness");
        assert_eq!(witness.get("w2"), Some(&WitnessValue::Exact(rational(1023, 1024))));
        assert_eq!(witness.get("epsilon"), Some(&WitnessValue::Exact(rational(65, 65536))));
        assert_eq!(
            witness.target_value,
            Some(WitnessValue::Exact(rational(67108865, 67108864)))
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    async fn solver_error_line_is_a_tool_error() {
        setup();
        let path = fake_solver(
            "error",
            r#"case "$line" in "(check-sat)") echo '(error "line 4 column 1: logic does not support nonlinear arithmetic")' ;; esac"#
        );
        let outcome = outcome_of(
            backend_for(path.clone(), 5_000, 1_000),
            ScenarioRequest::new(ScenarioKind::SinglePeriod)
        ).await;
        let _ = std::fs::remove_file(&path);

        match outcome {
            Err(VerifloatError::ExternalToolError { tool, message }) => {
                assert_eq!(tool, "z3");
                assert!(message.contains("nonlinear"), "{}", message);
            }
            other => panic!("expected ExternalToolError, got {:?}", other),
        }
    }
}
