#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use crate::config::{ parse_bounds, RunOverrides, VerifloatOptions };
    use crate::errors::{ VerifloatError, VerifloatResult };
    use crate::implementations::config::{ ConfigError, VerifloatConfig, ENV_TIMEOUT_MS };
    use crate::implementations::portfolio::ScenarioKind;
    use crate::models::common::{ integer, rational, OutputFormat };
    use crate::models::scenario::Bounds;
    use crate::tests::support::setup;

    fn write_temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("verifloat-{}-{}.yaml", name, std::process::id()));
        fs::write(&path, contents).expect("write temp config");
        path
    }

    #[test]
    fn yaml_accepts_string_and_number_rationals() -> VerifloatResult<()> {
        setup();
        let yaml = r#"
solver:
  path: /opt/z3/bin/z3
  timeout_ms: 5000
  random_seed: 3
portfolio:
  assets: 4
  drift_min: "-1/100"
  drift_max: 0.01
  period_hi: 2
output_format: json
"#;
        let path = write_temp_config("rationals", yaml);
        let config = VerifloatConfig::from_file(&path);
        let _ = fs::remove_file(&path);
        let config = config?;

        assert_eq!(config.solver.path, "/opt/z3/bin/z3");
        assert_eq!(config.solver.timeout_ms, 5000);
        assert_eq!(config.solver.grace_ms, 2000);
        assert_eq!(config.solver.random_seed, Some(3));
        assert_eq!(config.portfolio.assets, 4);
        assert_eq!(config.portfolio.drift_min.value(), &rational(-1, 100));
        assert_eq!(config.portfolio.drift_max.value(), &rational(1, 100));
        assert_eq!(config.portfolio.period_hi.value(), &integer(2));
        assert_eq!(config.portfolio.period_lo.value(), &integer(-1));
        assert_eq!(config.output_format, OutputFormat::Json);
        Ok(())
    }

    #[test]
    fn inverted_ranges_fail_validation() {
        let yaml = "portfolio:\n  return_min: 1\n  return_max: -1\n";
        let path = write_temp_config("inverted", yaml);
        let result = VerifloatConfig::from_file(&path);
        let _ = fs::remove_file(&path);

        match result {
            Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "portfolio.return"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn malformed_literal_is_a_parse_error() {
        let yaml = "portfolio:\n  drift_max: \"one thousandth\"\n";
        let path = write_temp_config("malformed", yaml);
        let result = VerifloatConfig::from_file(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = std::env::temp_dir().join("verifloat-does-not-exist.yaml");
        let result = VerifloatConfig::from_file(&path);
        assert!(matches!(result, Err(ConfigError::FileReadError(_))));

        let converted: VerifloatError = result.expect_err("missing file").into();
        assert!(matches!(converted, VerifloatError::ConfigError(_)));
    }

    #[test]
    fn timeout_override_from_environment() {
        setup();
        let mut config = VerifloatConfig::default();

        std::env::set_var(ENV_TIMEOUT_MS, "250");
        let applied = config.apply_env_overrides();
        std::env::set_var(ENV_TIMEOUT_MS, "soon");
        let mut rejected = VerifloatConfig::default();
        let invalid = rejected.apply_env_overrides();
        std::env::remove_var(ENV_TIMEOUT_MS);

        assert!(applied.is_ok());
        assert_eq!(config.solver.timeout_ms, 250);
        assert!(matches!(invalid, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn bounds_parse_from_pairs() -> VerifloatResult<()> {
        assert_eq!(parse_bounds("-1.9,1.9")?, Bounds::symmetric(rational(19, 10)));
        assert_eq!(parse_bounds(" -2 , 2 ")?, Bounds::symmetric(integer(2)));
        assert_eq!(parse_bounds("0,0")?, Bounds::new(integer(0), integer(0)));
        assert!(matches!(parse_bounds("1,-1"), Err(VerifloatError::InvalidInput(_))));
        assert!(matches!(parse_bounds("1"), Err(VerifloatError::InvalidInput(_))));
        assert!(matches!(parse_bounds("a,b"), Err(VerifloatError::InvalidLiteral(_))));
        Ok(())
    }

    #[test]
    fn default_run_covers_standard_scenarios() -> VerifloatResult<()> {
        let options = VerifloatOptions::resolve(
            VerifloatConfig::default(),
            &RunOverrides::default(),
            None
        )?;
        let kinds: Vec<ScenarioKind> = options.requests
            .iter()
            .map(|r| r.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![ScenarioKind::SinglePeriod, ScenarioKind::Drift, ScenarioKind::MultiPeriod(2)]
        );
        assert_eq!(options.output_format, OutputFormat::Text);
        assert_eq!(options.scenarios()?.len(), 3);
        Ok(())
    }

    #[test]
    fn overrides_select_and_reshape_scenarios() -> VerifloatResult<()> {
        let overrides = RunOverrides {
            scenario: Some("multi".to_string()),
            periods: Some(3),
            bounds: Some("-3,3".to_string()),
            zero_weights: true,
            ..RunOverrides::default()
        };
        let options = VerifloatOptions::resolve(
            VerifloatConfig::default(),
            &overrides,
            Some(OutputFormat::Json)
        )?;

        assert_eq!(options.requests.len(), 1);
        let request = &options.requests[0];
        assert_eq!(request.kind, ScenarioKind::MultiPeriod(3));
        assert_eq!(request.bounds, Some(Bounds::symmetric(integer(3))));
        assert!(request.zero_weights);
        assert_eq!(options.output_format, OutputFormat::Json);

        let scenarios = options.scenarios()?;
        assert_eq!(scenarios[0].name(), "3-period");
        Ok(())
    }

    #[test]
    fn drift_bound_override_widens_epsilon() -> VerifloatResult<()> {
        let overrides = RunOverrides {
            scenario: Some("drift".to_string()),
            drift_bound: Some("0.5".to_string()),
            ..RunOverrides::default()
        };
        let options = VerifloatOptions::resolve(VerifloatConfig::default(), &overrides, None)?;
        assert_eq!(options.config.portfolio.drift_min.value(), &rational(-1, 2));
        assert_eq!(options.config.portfolio.drift_max.value(), &rational(1, 2));
        Ok(())
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let zero_periods = RunOverrides { periods: Some(0), ..RunOverrides::default() };
        assert!(
            matches!(
                VerifloatOptions::resolve(VerifloatConfig::default(), &zero_periods, None),
                Err(VerifloatError::InvalidInput(_))
            )
        );

        let unknown = RunOverrides {
            scenario: Some("quarterly".to_string()),
            ..RunOverrides::default()
        };
        assert!(VerifloatOptions::resolve(VerifloatConfig::default(), &unknown, None).is_err());

        // A negative magnitude inverts the drift range
        let negative_drift = RunOverrides {
            drift_bound: Some("-0.1".to_string()),
            ..RunOverrides::default()
        };
        assert!(
            matches!(
                VerifloatOptions::resolve(VerifloatConfig::default(), &negative_drift, None),
                Err(VerifloatError::ConfigError(_))
            )
        );
    }
}
