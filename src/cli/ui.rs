use colored::*;
use console::Term;
use indicatif::{ ProgressBar, ProgressStyle };
use std::time::Duration;
use textwrap::wrap;

use verifloat::{ Outcome, ScenarioReport, Witness };

/// Print a section header
pub fn print_header(title: &str) {
    let title = format!(" {} ", title);
    println!("\n{}\n", title.bold().white().on_blue());
}

/// Print text wrapped to the terminal width
pub fn print_text(text: &str) {
    let width = (Term::stdout().size().1 as usize).max(40);
    for line in text.lines() {
        for wrapped_line in wrap(line, width.saturating_sub(4)) {
            println!("{}", wrapped_line);
        }
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "WARNING:".yellow().bold(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "SUCCESS:".green().bold(), message);
}

/// Print information
pub fn print_info(message: &str) {
    println!("{} {}", "INFO:".blue().bold(), message);
}

/// Print a formatted result
pub fn print_result(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

/// Print the single outcome line for a scenario, plus its witness if any
pub fn print_report(report: &ScenarioReport) {
    let line = match &report.outcome {
        Outcome::PropertyHolds => {
            format!("✓ {}: property holds, return within {}", report.scenario, report.bounds)
                .green()
                .bold()
        }
        Outcome::ViolationFound { .. } => {
            format!("✗ {}: violation found, return can leave {}", report.scenario, report.bounds)
                .red()
                .bold()
        }
        Outcome::Unknown { reason } => {
            format!("? {}: unknown ({})", report.scenario, reason).yellow().bold()
        }
    };
    println!("{}", line);

    if let Some(witness) = report.outcome.witness() {
        print_witness(witness);
    }
}

/// Print a witness, one variable per line
pub fn print_witness(witness: &Witness) {
    for (name, value) in &witness.values {
        println!("    {} = {}", name.cyan(), value);
    }
    if let Some(target) = &witness.target_value {
        println!("    {} = {}", "return".cyan().bold(), target);
    }
}

/// Display a spinner while waiting for an operation to complete
pub fn spinner_with_message(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
