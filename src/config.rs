use crate::errors::{ VerifloatError, VerifloatResult };
use crate::implementations::config::VerifloatConfig;
use crate::implementations::portfolio::{ ScenarioKind, ScenarioRequest };
use crate::models::common::{ parse_rational, OutputFormat, RationalLiteral };
use crate::models::scenario::{ Bounds, Scenario };

/// Overrides collected from the command line for a `run`
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    /// Scenario name; all standard scenarios when `None`
    pub scenario: Option<String>,
    /// Drift bound magnitude, giving `[-d, d]`
    pub drift_bound: Option<String>,
    /// Period count for the multi-period scenario
    pub periods: Option<usize>,
    /// Explicit `lo,hi` bounds for the checked scenario
    pub bounds: Option<String>,
    pub zero_weights: bool,
}

/// Fully resolved options for one invocation
#[derive(Debug, Clone)]
pub struct VerifloatOptions {
    pub config: VerifloatConfig,
    pub requests: Vec<ScenarioRequest>,
    pub output_format: OutputFormat,
}

impl VerifloatOptions {
    /// Merge configuration with command-line overrides
    pub fn resolve(
        mut config: VerifloatConfig,
        overrides: &RunOverrides,
        output_format: Option<OutputFormat>
    ) -> VerifloatResult<Self> {
        if let Some(text) = &overrides.drift_bound {
            let magnitude = parse_rational(text)?;
            config.portfolio.drift_min = RationalLiteral(-magnitude.clone());
            config.portfolio.drift_max = RationalLiteral(magnitude);
        }
        if let Some(periods) = overrides.periods {
            if periods == 0 {
                return Err(VerifloatError::InvalidInput("--periods must be at least 1".to_string()));
            }
            config.portfolio.periods = periods;
        }
        config.validate()?;

        let bounds = overrides.bounds.as_deref().map(parse_bounds).transpose()?;

        let kinds = match &overrides.scenario {
            Some(name) => {
                let kind = match ScenarioKind::parse(name)? {
                    ScenarioKind::MultiPeriod(_) if overrides.periods.is_some() => {
                        ScenarioKind::MultiPeriod(config.portfolio.periods)
                    }
                    kind => kind,
                };
                vec![kind]
            }
            None => config.portfolio.standard_kinds(),
        };

        let requests = kinds
            .into_iter()
            .map(|kind| {
                let mut request = ScenarioRequest::new(kind);
                request.bounds = bounds.clone();
                request.zero_weights = overrides.zero_weights;
                request
            })
            .collect();

        let output_format = output_format.unwrap_or(config.output_format);
        Ok(Self { config, requests, output_format })
    }

    pub fn scenarios(&self) -> VerifloatResult<Vec<Scenario>> {
        self.requests
            .iter()
            .map(|request| self.config.portfolio.scenario(request))
            .collect()
    }
}

/// Parse `lo,hi` (e.g. `-1.9,1.9` or `-2,2`)
pub fn parse_bounds(text: &str) -> VerifloatResult<Bounds> {
    let (lo, hi) = text
        .split_once(',')
        .ok_or_else(|| VerifloatError::InvalidInput(format!("Expected bounds as lo,hi: {}", text)))?;
    let bounds = Bounds::new(parse_rational(lo)?, parse_rational(hi)?);
    if !bounds.is_well_formed() {
        return Err(VerifloatError::InvalidInput(format!("Lower bound exceeds upper bound: {}", text)));
    }
    Ok(bounds)
}
