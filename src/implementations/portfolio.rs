use std::fmt;

use serde::{ Deserialize, Serialize };

use crate::errors::{ VerifloatError, VerifloatResult };
use crate::implementations::scenario_builder::ScenarioBuilder;
use crate::models::common::{ integer, rational, RationalLiteral };
use crate::models::expr::Expr;
use crate::models::scenario::{ Bounds, Scenario };

/// Which portfolio-return formula a scenario checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    /// `w1*r1 + w2*r2 + w3*r3`
    SinglePeriod,
    /// Single period plus a bounded drift term `epsilon`
    Drift,
    /// Sum of per-period weighted returns with shared weights
    MultiPeriod(usize),
}

impl ScenarioKind {
    pub fn name(&self) -> String {
        match self {
            ScenarioKind::SinglePeriod => "single-period".to_string(),
            ScenarioKind::Drift => "drift".to_string(),
            ScenarioKind::MultiPeriod(2) => "two-period".to_string(),
            ScenarioKind::MultiPeriod(n) => format!("{}-period", n),
        }
    }

    pub fn parse(text: &str) -> VerifloatResult<Self> {
        match text.to_lowercase().as_str() {
            "single-period" | "single" | "basic" => Ok(ScenarioKind::SinglePeriod),
            "drift" | "fp" | "floating-point" => Ok(ScenarioKind::Drift),
            "two-period" | "multi-period" | "multi" => Ok(ScenarioKind::MultiPeriod(2)),
            other => {
                other
                    .strip_suffix("-period")
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|n| *n > 0)
                    .map(ScenarioKind::MultiPeriod)
                    .ok_or_else(|| VerifloatError::InvalidInput(format!("Unknown scenario: {}", text)))
            }
        }
    }

    pub fn periods(&self) -> usize {
        match self {
            ScenarioKind::SinglePeriod | ScenarioKind::Drift => 1,
            ScenarioKind::MultiPeriod(n) => *n,
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Parameters that vary between runs of one scenario kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRequest {
    pub kind: ScenarioKind,
    /// Replaces the per-period bounds scaled by the period count
    pub bounds: Option<Bounds>,
    /// Pin every weight to exactly zero
    pub zero_weights: bool,
}

impl ScenarioRequest {
    pub fn new(kind: ScenarioKind) -> Self {
        Self { kind, bounds: None, zero_weights: false }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_zero_weights(mut self) -> Self {
        self.zero_weights = true;
        self
    }
}

/// Domain parameters shared by every portfolio scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioModel {
    /// Number of assets (and therefore weights)
    pub assets: usize,
    pub weight_min: RationalLiteral,
    pub weight_max: RationalLiteral,
    /// Upper bound on the sum of all weights
    pub weight_budget: RationalLiteral,
    pub return_min: RationalLiteral,
    pub return_max: RationalLiteral,
    pub drift_min: RationalLiteral,
    pub drift_max: RationalLiteral,
    /// Bounds for one period; N periods are checked against N times these
    pub period_lo: RationalLiteral,
    pub period_hi: RationalLiteral,
    /// Period count used by the multi-period standard scenario
    pub periods: usize,
}

impl Default for PortfolioModel {
    fn default() -> Self {
        Self {
            assets: 3,
            weight_min: integer(0).into(),
            weight_max: integer(1).into(),
            weight_budget: integer(1).into(),
            return_min: integer(-1).into(),
            return_max: integer(1).into(),
            drift_min: rational(-1, 1000).into(),
            drift_max: rational(1, 1000).into(),
            period_lo: integer(-1).into(),
            period_hi: integer(1).into(),
            periods: 2,
        }
    }
}

impl PortfolioModel {
    pub fn period_bounds(&self) -> Bounds {
        Bounds::new(self.period_lo.value().clone(), self.period_hi.value().clone())
    }

    /// The three published scenarios, in the order they are reported
    pub fn standard_kinds(&self) -> Vec<ScenarioKind> {
        vec![ScenarioKind::SinglePeriod, ScenarioKind::Drift, ScenarioKind::MultiPeriod(self.periods)]
    }

    pub fn standard_scenarios(&self) -> VerifloatResult<Vec<Scenario>> {
        self.standard_kinds()
            .into_iter()
            .map(|kind| self.scenario(&ScenarioRequest::new(kind)))
            .collect()
    }

    pub fn scenario(&self, request: &ScenarioRequest) -> VerifloatResult<Scenario> {
        let periods = request.kind.periods();
        if self.assets == 0 || periods == 0 {
            return Err(
                VerifloatError::ScenarioError(
                    "Portfolio scenarios need at least one asset and one period".to_string()
                )
            );
        }

        let bounds = request.bounds.clone().unwrap_or_else(|| self.period_bounds().scaled(periods));
        let mut builder = ScenarioBuilder::new(request.kind.name()).describe(
            self.describe(request, &bounds)
        );

        let weights = (1..=self.assets)
            .map(|i| builder.declare_real(&format!("w{}", i)))
            .collect::<VerifloatResult<Vec<Expr>>>()?;

        let multi_period = matches!(request.kind, ScenarioKind::MultiPeriod(_));
        let mut returns = Vec::with_capacity(periods);
        for period in 1..=periods {
            let period_returns = (1..=self.assets)
                .map(|i| {
                    let name = if multi_period {
                        format!("r{}_{}", i, period)
                    } else {
                        format!("r{}", i)
                    };
                    builder.declare_real(&name)
                })
                .collect::<VerifloatResult<Vec<Expr>>>()?;
            returns.push(period_returns);
        }

        let epsilon = match request.kind {
            ScenarioKind::Drift => Some(builder.declare_real("epsilon")?),
            _ => None,
        };

        for weight in &weights {
            builder.assume_range(weight, self.weight_min.value(), self.weight_max.value());
        }
        builder.assume(Expr::sum(weights.iter().cloned()).le(self.weight_budget.value()));
        for period_returns in &returns {
            for r in period_returns {
                builder.assume_range(r, self.return_min.value(), self.return_max.value());
            }
        }
        if let Some(epsilon) = &epsilon {
            builder.assume_range(epsilon, self.drift_min.value(), self.drift_max.value());
        }
        if request.zero_weights {
            for weight in &weights {
                builder.assume(weight.equals(integer(0)));
            }
        }

        let period_sums = returns.iter().map(|period_returns| {
            Expr::sum(
                weights
                    .iter()
                    .zip(period_returns)
                    .map(|(w, r)| w * r)
            )
        });
        let mut target = Expr::sum(period_sums);
        if let Some(epsilon) = epsilon {
            target = target + epsilon;
        }

        builder.target(target).bounds(bounds);
        builder.build()
    }

    fn describe(&self, request: &ScenarioRequest, bounds: &Bounds) -> String {
        let mut text = match request.kind {
            ScenarioKind::SinglePeriod => {
                format!("Weighted return of {} assets stays within {}", self.assets, bounds)
            }
            ScenarioKind::Drift => {
                format!(
                    "Weighted return of {} assets plus drift in [{}, {}] stays within {}",
                    self.assets,
                    self.drift_min,
                    self.drift_max,
                    bounds
                )
            }
            ScenarioKind::MultiPeriod(n) => {
                format!(
                    "Summed return over {} periods of {} assets stays within {}",
                    n,
                    self.assets,
                    bounds
                )
            }
        };
        if request.zero_weights {
            text.push_str(" (all weights pinned to 0)");
        }
        text
    }
}
