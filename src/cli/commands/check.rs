use anyhow::{ anyhow, Result };

use crate::cli::ui;
use verifloat::{ SolverBackend, VerifloatConfig, Z3Backend };

/// Check solver availability
pub async fn execute(config: &VerifloatConfig) -> Result<()> {
    ui::print_header("Solver Check");
    let backend = Z3Backend::new(config.solver.clone());

    ui::print_result("Solver", &config.solver.path);
    ui::print_result("Logic", &config.solver.logic);
    ui::print_result(
        "Timeout",
        &(match config.solver.timeout_ms {
            0 => "disabled".to_string(),
            ms => format!("{} ms", ms),
        })
    );

    match backend.version().await {
        Ok(version) => {
            ui::print_success(&format!("{} is available ({})", backend.name(), version));
            Ok(())
        }
        Err(e) => {
            ui::print_error(&e.to_string());
            Err(anyhow!("Solver {} is not usable", config.solver.path))
        }
    }
}
