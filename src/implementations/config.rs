use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::errors::VerifloatError;
use crate::implementations::portfolio::PortfolioModel;
use crate::implementations::smtlib::ScriptOptions;
use crate::models::common::OutputFormat;

/// Environment variable overriding the solver executable
pub const ENV_SOLVER_PATH: &str = "VERIFLOAT_Z3_PATH";
/// Environment variable overriding the solve timeout in milliseconds
pub const ENV_TIMEOUT_MS: &str = "VERIFLOAT_TIMEOUT_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl From<ConfigError> for VerifloatError {
    fn from(err: ConfigError) -> Self {
        VerifloatError::ConfigError(err.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SolverConfig {
    /// Path or name of the z3 executable
    pub path: String,

    /// Per-solve timeout in milliseconds; 0 disables it
    pub timeout_ms: u64,

    /// Extra wall-clock allowance on top of `timeout_ms` before the process is killed
    pub grace_ms: u64,

    /// SMT-LIB2 logic passed to `set-logic`
    pub logic: String,

    /// Fixed random seed for reproducible witnesses
    pub random_seed: Option<u32>,

    /// Additional command-line arguments for the solver
    pub extra_args: Vec<String>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            path: "z3".to_string(),
            timeout_ms: 30_000,
            grace_ms: 2_000,
            logic: "QF_NRA".to_string(),
            random_seed: None,
            extra_args: Vec::new(),
        }
    }
}

impl SolverConfig {
    pub fn script_options(&self) -> ScriptOptions {
        ScriptOptions {
            logic: self.logic.clone(),
            produce_models: true,
            random_seed: self.random_seed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct VerifloatConfig {
    /// External solver settings
    pub solver: SolverConfig,

    /// Domain parameters of the portfolio scenarios
    pub portfolio: PortfolioModel,

    /// Default report format
    pub output_format: OutputFormat,
}

impl Default for VerifloatConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            portfolio: PortfolioModel::default(),
            output_format: OutputFormat::Text,
        }
    }
}

impl VerifloatConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: VerifloatConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// File configuration (or defaults) with environment overrides applied
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        use log::debug;

        let mut config = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `VERIFLOAT_Z3_PATH` and `VERIFLOAT_TIMEOUT_MS` if set
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        use log::debug;

        if let Ok(path) = std::env::var(ENV_SOLVER_PATH) {
            debug!("Solver path overridden by {}", ENV_SOLVER_PATH);
            self.solver.path = path;
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_MS) {
            self.solver.timeout_ms = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_MS.to_string(),
                    message: format!("expected milliseconds, got {:?}", raw),
                })?;
            debug!("Solver timeout overridden by {}", ENV_TIMEOUT_MS);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };
        let portfolio = &self.portfolio;

        if self.solver.path.trim().is_empty() {
            return Err(invalid("solver.path", "must not be empty"));
        }
        if portfolio.assets == 0 {
            return Err(invalid("portfolio.assets", "must be at least 1"));
        }
        if portfolio.periods == 0 {
            return Err(invalid("portfolio.periods", "must be at least 1"));
        }
        for (key, lo, hi) in [
            ("portfolio.weight", &portfolio.weight_min, &portfolio.weight_max),
            ("portfolio.return", &portfolio.return_min, &portfolio.return_max),
            ("portfolio.drift", &portfolio.drift_min, &portfolio.drift_max),
            ("portfolio.period", &portfolio.period_lo, &portfolio.period_hi),
        ] {
            if lo.value() > hi.value() {
                return Err(invalid(key, &format!("lower bound {} exceeds upper bound {}", lo, hi)));
            }
        }
        Ok(())
    }
}
