use anyhow::Result;
use clap::Parser;
use log::{ debug, info };

use verifloat::{ OutputFormat, VerifloatConfig };

mod cli;
use cli::{ Commands, ScenarioArgs, VerifloatCli };

#[tokio::main]
async fn main() -> Result<()> {
    // Parse the command line arguments
    let cli = VerifloatCli::parse();

    // Setup logging
    setup_logging(&cli.log_level);

    // A missing .env file is normal
    if let Err(e) = dotenv::dotenv() {
        debug!("No .env file loaded: {}", e);
    }

    let mut config = VerifloatConfig::load(cli.config.as_deref())?;
    if let Some(path) = &cli.solver_path {
        config.solver.path = path.clone();
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.solver.timeout_ms = timeout_ms;
    }
    let output_format = cli.output_format.as_deref().map(OutputFormat::parse).transpose()?;

    // Handle commands; a bare invocation runs every standard scenario
    match cli.command.unwrap_or(Commands::Run(ScenarioArgs::default())) {
        Commands::Run(args) => {
            cli::commands::run::execute(config, &args.into(), output_format).await?;
        }
        Commands::List => {
            let format = output_format.unwrap_or(config.output_format);
            cli::commands::list::execute(&config, format)?;
        }
        Commands::Show(args) => {
            cli::commands::show::execute(config, &args.into())?;
        }
        Commands::Check => {
            cli::commands::check::execute(&config).await?;
        }
    }

    Ok(())
}

fn setup_logging(log_level: &str) {
    // Set up the logger based on the log level
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Warn,
    };

    env_logger::Builder::new().filter_level(level).init();

    info!("Logger initialized with level: {}", log_level);
}
