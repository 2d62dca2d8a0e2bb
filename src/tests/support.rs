use std::collections::{ BTreeMap, VecDeque };
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::Mutex;

use async_trait::async_trait;
use log::{ debug, info, warn };
use num_rational::BigRational;

use crate::errors::{ VerifloatError, VerifloatResult };
use crate::implementations::config::{ SolverConfig, ENV_SOLVER_PATH };
use crate::implementations::z3_backend::Z3Backend;
use crate::models::outcome::{ Witness, WitnessValue };
use crate::models::scenario::Scenario;
use crate::traits::solver_backend::{ SolverBackend, SolverResponse };

// Setup function to initialize logging
pub fn setup() {
    // Logger may already be initialized by another test, which is fine
    if env_logger::builder().is_test(true).try_init().is_ok() {
        debug!("Logger initialized");
    }
}

/// Backend that replays canned responses in order
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<SolverResponse>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(responses: Vec<SolverResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SolverBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn version(&self) -> VerifloatResult<String> {
        Ok("scripted 1.0".to_string())
    }

    async fn solve(&self, scenario: &Scenario) -> VerifloatResult<SolverResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!("Scripted solve for {}", scenario.name());
        let mut responses = self.responses
            .lock()
            .map_err(|_| VerifloatError::SystemError("poisoned lock".to_string()))?;
        responses.pop_front().ok_or_else(|| VerifloatError::SolverUnavailable {
            tool: "scripted".to_string(),
            message: "no responses left".to_string(),
        })
    }
}

/// Witness from `(name, value)` pairs
pub fn witness(values: &[(&str, BigRational)]) -> Witness {
    let values: BTreeMap<String, WitnessValue> = values
        .iter()
        .map(|(name, value)| (name.to_string(), WitnessValue::Exact(value.clone())))
        .collect();
    Witness::new(values)
}

/// z3 backend for solver-backed tests, or `None` (with a warning) if z3 is missing
pub async fn z3_or_skip(test_name: &str) -> Option<Z3Backend> {
    setup();

    let mut config = SolverConfig::default();
    if let Ok(path) = std::env::var(ENV_SOLVER_PATH) {
        config.path = path;
    }
    config.random_seed = Some(0);

    let backend = Z3Backend::new(config);
    if backend.is_available().await {
        info!("Running {} against z3", test_name);
        Some(backend)
    } else {
        warn!("z3 not found. Skipping {} which requires a solver.", test_name);
        None
    }
}

/// Write an executable `sh` script standing in for z3 and return its path.
///
/// `body` runs once per line the backend sends, with the line in `$line`.
#[cfg(unix)]
pub fn fake_solver(name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = std::env::temp_dir().join(
        format!("verifloat-fake-z3-{}-{}.sh", name, std::process::id())
    );
    let script = format!(
        "#!/bin/sh\nwhile IFS= read -r line; do\n{}\ndone\n",
        body
    );
    fs::write(&path, script).expect("write fake solver");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("make fake solver executable");
    path
}
