use anyhow::{ anyhow, Result };

use verifloat::implementations::smtlib;
use verifloat::{ RunOverrides, VerifloatConfig, VerifloatOptions };

/// Print the standalone SMT-LIB2 script of one scenario
pub fn execute(config: VerifloatConfig, overrides: &RunOverrides) -> Result<()> {
    let mut overrides = overrides.clone();
    if overrides.scenario.is_none() {
        overrides.scenario = Some("single-period".to_string());
    }

    let options = VerifloatOptions::resolve(config, &overrides, None)?;
    let scenario = options
        .scenarios()?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No scenario selected"))?;

    print!("{}", smtlib::render_standalone(&scenario, &options.config.solver.script_options()));
    Ok(())
}
