use thiserror::Error;

/// Custom error types for the Verifloat system
#[derive(Debug, Error)]
pub enum VerifloatError {
    #[error("Scenario error: {0}")]
    ScenarioError(String),

    #[error("Variable {name} declared twice in scenario {scenario}")]
    DuplicateVariable { scenario: String, name: String },

    #[error("Scenario {scenario} references undeclared variable {name}")]
    UndeclaredVariable { scenario: String, name: String },

    #[error("Invalid rational literal: {0}")]
    InvalidLiteral(String),

    #[error("Solver {tool} is not available: {message}")]
    SolverUnavailable { tool: String, message: String },

    #[error("Error in external tool {tool}: {message}")]
    ExternalToolError { tool: String, message: String },

    #[error("Failed to parse solver model: {0}")]
    ModelParseError(String),

    #[error("Solver witness for scenario {scenario} does not satisfy: {violated}")]
    InvalidWitness { scenario: String, violated: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("System error: {0}")]
    SystemError(String),
}

/// Result type specific to Verifloat operations
pub type VerifloatResult<T> = Result<T, VerifloatError>;

impl VerifloatError {
    /// Programmer errors raised while a scenario is being assembled
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            VerifloatError::ScenarioError(_) |
                VerifloatError::DuplicateVariable { .. } |
                VerifloatError::UndeclaredVariable { .. } |
                VerifloatError::InvalidLiteral(_)
        )
    }
}
