use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{ debug, info, warn };
use thiserror::Error;
use tokio::io::{ AsyncBufReadExt, AsyncWriteExt, BufReader, Lines };
use tokio::process::{ ChildStdout, Command };

use crate::errors::{ VerifloatError, VerifloatResult };
use crate::implementations::config::SolverConfig;
use crate::implementations::model_parser::{ self, Verdict };
use crate::implementations::smtlib;
use crate::models::outcome::Witness;
use crate::models::scenario::Scenario;
use crate::traits::solver_backend::{ SolverBackend, SolverResponse };

#[derive(Debug, Error)]
pub enum Z3Error {
    #[error("z3 executable {0} not found")]
    NotFound(String),

    #[error("Failed to start z3: {0}")]
    Spawn(std::io::Error),

    #[error("I/O error talking to z3: {0}")]
    Io(#[from] std::io::Error),

    #[error("z3 reported an error: {0}")]
    Solver(String),

    #[error("Unexpected z3 response: {0}")]
    UnexpectedResponse(String),

    #[error("z3 exited before answering")]
    ClosedEarly,
}

impl From<Z3Error> for VerifloatError {
    fn from(err: Z3Error) -> Self {
        match err {
            Z3Error::NotFound(path) =>
                VerifloatError::SolverUnavailable {
                    tool: "z3".to_string(),
                    message: format!("executable {} not found", path),
                },
            Z3Error::Spawn(e) =>
                VerifloatError::SolverUnavailable {
                    tool: "z3".to_string(),
                    message: e.to_string(),
                },
            other =>
                VerifloatError::ExternalToolError {
                    tool: "z3".to_string(),
                    message: other.to_string(),
                },
        }
    }
}

/// Drives a `z3` executable over SMT-LIB2 on stdin/stdout.
///
/// Every call to `solve` starts its own process, which is killed if the call
/// is dropped or overruns its wall-clock limit.
#[derive(Debug, Clone)]
pub struct Z3Backend {
    config: SolverConfig,
}

impl Default for Z3Backend {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl Z3Backend {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Wall-clock limit for a whole session, `None` when timeouts are disabled
    pub(crate) fn hard_limit(&self) -> Option<Duration> {
        match self.config.timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms.saturating_add(self.config.grace_ms))),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.config.path);
        cmd.arg("-in").arg("-smt2");
        if self.config.timeout_ms > 0 {
            cmd.arg(format!("-t:{}", self.config.timeout_ms));
        }
        cmd.args(&self.config.extra_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, err: std::io::Error) -> Z3Error {
        if err.kind() == std::io::ErrorKind::NotFound {
            Z3Error::NotFound(self.config.path.clone())
        } else {
            Z3Error::Spawn(err)
        }
    }

    async fn run_session(&self, scenario: &Scenario) -> VerifloatResult<SolverResponse> {
        let mut child = self.command().spawn().map_err(|e| self.spawn_error(e))?;
        let mut stdin = child.stdin.take().ok_or(Z3Error::ClosedEarly)?;
        let stdout = child.stdout.take().ok_or(Z3Error::ClosedEarly)?;
        let mut lines = BufReader::new(stdout).lines();

        let script = smtlib::render_script(scenario, &self.config.script_options());
        debug!("SMT-LIB2 script for {}:\n{}", scenario.name(), script);
        send(&mut stdin, &script).await?;

        let verdict = read_verdict(&mut lines).await?;
        debug!("z3 verdict for {}: {:?}", scenario.name(), verdict);

        let response = match verdict {
            Verdict::Unsat => SolverResponse::Unsat,
            Verdict::Sat => {
                send(&mut stdin, &smtlib::get_value_command(scenario)).await?;
                let raw = read_response(&mut lines).await?;
                debug!("z3 model for {}: {}", scenario.name(), raw.trim());
                SolverResponse::Sat(Witness::new(model_parser::parse_get_value(&raw)?))
            }
            Verdict::Unknown => {
                send(&mut stdin, "(get-info :reason-unknown)\n").await?;
                let raw = read_response(&mut lines).await?;
                SolverResponse::Unknown(model_parser::parse_reason_unknown(&raw))
            }
        };

        // Best effort; the process is killed on drop regardless.
        let _ = send(&mut stdin, "(exit)\n").await;
        drop(stdin);
        let _ = child.wait().await;

        Ok(response)
    }
}

async fn send(stdin: &mut tokio::process::ChildStdin, text: &str) -> Result<(), Z3Error> {
    stdin.write_all(text.as_bytes()).await?;
    stdin.flush().await?;
    Ok(())
}

async fn read_verdict(lines: &mut Lines<BufReader<ChildStdout>>) -> Result<Verdict, Z3Error> {
    loop {
        let line = lines.next_line().await?.ok_or(Z3Error::ClosedEarly)?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(verdict) = model_parser::parse_verdict(trimmed) {
            return Ok(verdict);
        }
        if trimmed.starts_with("(error") {
            let mut response = line.clone();
            while !model_parser::is_complete(&response) {
                let next = lines.next_line().await?.ok_or(Z3Error::ClosedEarly)?;
                response.push('\n');
                response.push_str(&next);
            }
            let message = model_parser::parse_sexprs(&response)
                .ok()
                .and_then(|exprs| model_parser::solver_error(&exprs))
                .unwrap_or(response);
            return Err(Z3Error::Solver(message));
        }
        return Err(Z3Error::UnexpectedResponse(line));
    }
}

/// Read lines until they form one complete S-expression
async fn read_response(lines: &mut Lines<BufReader<ChildStdout>>) -> Result<String, Z3Error> {
    let mut response = String::new();
    loop {
        let line = lines.next_line().await?.ok_or(Z3Error::ClosedEarly)?;
        if response.is_empty() && line.trim().is_empty() {
            continue;
        }
        response.push_str(&line);
        response.push('\n');
        if model_parser::is_complete(&response) {
            return Ok(response);
        }
    }
}

#[async_trait]
impl SolverBackend for Z3Backend {
    fn name(&self) -> &str {
        "z3"
    }

    async fn is_available(&self) -> bool {
        match self.version().await {
            Ok(version) => {
                debug!("Detected {}", version);
                true
            }
            Err(e) => {
                debug!("z3 unavailable: {}", e);
                false
            }
        }
    }

    async fn version(&self) -> VerifloatResult<String> {
        let output = Command::new(&self.config.path)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output().await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(
                Z3Error::UnexpectedResponse(
                    String::from_utf8_lossy(&output.stderr).trim().to_string()
                ).into()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn solve(&self, scenario: &Scenario) -> VerifloatResult<SolverResponse> {
        info!("Solving scenario {} with {}", scenario.name(), self.config.path);

        let Some(limit) = self.hard_limit() else {
            return self.run_session(scenario).await;
        };

        match tokio::time::timeout(limit, self.run_session(scenario)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "z3 did not answer scenario {} within {} ms; reporting unknown",
                    scenario.name(),
                    limit.as_millis()
                );
                Ok(SolverResponse::Unknown(format!("no answer within {} ms", limit.as_millis())))
            }
        }
    }
}
