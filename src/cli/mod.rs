use clap::{ Args, Parser, Subcommand };
use std::path::PathBuf;

use verifloat::RunOverrides;

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "verifloat",
    about = "Checks portfolio-return bounds with an SMT solver",
    version,
    author,
    long_about = None
)]
pub struct VerifloatCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, global = true)]
    pub output_format: Option<String>,

    /// Solver executable (defaults to z3 on PATH)
    #[arg(long, global = true)]
    pub solver_path: Option<String>,

    /// Per-scenario solver timeout in milliseconds (0 disables it)
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Runs all standard scenarios when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run scenarios and print one outcome per scenario
    Run(ScenarioArgs),

    /// List the available scenarios and their parameters
    List,

    /// Print the SMT-LIB2 script for a scenario
    Show(ScenarioArgs),

    /// Check that the solver is installed and report its version
    Check,
}

#[derive(Args, Default, Clone)]
pub struct ScenarioArgs {
    /// Scenario name (single-period, drift, two-period, <n>-period)
    #[arg(short, long)]
    pub scenario: Option<String>,

    /// Magnitude d of the drift interval [-d, d]
    #[arg(long)]
    pub drift_bound: Option<String>,

    /// Number of periods for the multi-period scenario
    #[arg(long)]
    pub periods: Option<usize>,

    /// Bounds to check, as lo,hi (e.g. -1.9,1.9)
    #[arg(long, allow_hyphen_values = true)]
    pub bounds: Option<String>,

    /// Pin every weight to zero
    #[arg(long, default_value = "false")]
    pub zero_weights: bool,
}

impl From<ScenarioArgs> for RunOverrides {
    fn from(args: ScenarioArgs) -> Self {
        RunOverrides {
            scenario: args.scenario,
            drift_bound: args.drift_bound,
            periods: args.periods,
            bounds: args.bounds,
            zero_weights: args.zero_weights,
        }
    }
}
