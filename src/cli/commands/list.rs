use anyhow::Result;
use serde::Serialize;

use crate::cli::ui;
use verifloat::{ Bounds, OutputFormat, ScenarioRequest, VerifloatConfig };

#[derive(Serialize)]
struct ScenarioSummary {
    name: String,
    description: String,
    variables: Vec<String>,
    domain_constraints: usize,
    bounds: Bounds,
}

/// List the standard scenarios under the current configuration
pub fn execute(config: &VerifloatConfig, output_format: OutputFormat) -> Result<()> {
    let portfolio = &config.portfolio;
    let summaries = portfolio
        .standard_kinds()
        .into_iter()
        .map(|kind| {
            let scenario = portfolio.scenario(&ScenarioRequest::new(kind))?;
            Ok(ScenarioSummary {
                name: scenario.name().to_string(),
                description: scenario.description().to_string(),
                variables: scenario.variables().to_vec(),
                domain_constraints: scenario.domain().len(),
                bounds: scenario.bounds().clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Text => {
            ui::print_header("Scenarios");
            for summary in &summaries {
                ui::print_result(&summary.name, &summary.description);
                println!("    variables: {}", summary.variables.join(", "));
                println!("    domain constraints: {}", summary.domain_constraints);
                println!("    bounds: {}", summary.bounds);
            }
            ui::print_info("Any <n>-period scenario can also be run, e.g. --scenario 3-period");
        }
    }

    Ok(())
}
