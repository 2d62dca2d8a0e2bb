use anyhow::Result;

use crate::cli::ui;
use verifloat::{
    OutputFormat,
    RunOverrides,
    ScenarioVerifier,
    VerifloatConfig,
    VerifloatOptions,
    Z3Backend,
};

/// Run scenarios in sequence and print one outcome per scenario
pub async fn execute(
    config: VerifloatConfig,
    overrides: &RunOverrides,
    output_format: Option<OutputFormat>
) -> Result<()> {
    let options = VerifloatOptions::resolve(config, overrides, output_format)?;
    let scenarios = options.scenarios()?;
    let verifier = ScenarioVerifier::new(Z3Backend::new(options.config.solver.clone()));

    match options.output_format {
        OutputFormat::Json => {
            let reports = verifier.verify_all(&scenarios).await?;
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Text => {
            ui::print_header("Portfolio Return Verification");

            let mut counts = (0usize, 0usize, 0usize);
            for scenario in &scenarios {
                ui::print_text(scenario.description());
                let spinner = ui::spinner_with_message(&format!("Solving {}...", scenario.name()));
                let report = verifier.verify(scenario).await;
                spinner.finish_and_clear();
                let report = report?;

                if report.outcome.is_holds() {
                    counts.0 += 1;
                } else if report.outcome.is_violation() {
                    counts.1 += 1;
                } else {
                    counts.2 += 1;
                }
                ui::print_report(&report);
                println!();
            }

            ui::print_result(
                "Summary",
                &format!("{} hold, {} violated, {} unknown", counts.0, counts.1, counts.2)
            );
            if counts.2 > 0 {
                ui::print_warning("Unknown outcomes are not proofs; raise --timeout-ms and retry.");
            }
        }
    }

    Ok(())
}
