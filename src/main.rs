//! `maestro`: replay trigger scripts against an installation supervisor.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use maestro::config::{ConfigError, InstallationConfig};
use maestro::core::State;
use maestro::installation::{supervisor_from_config, supervisor_rules, InstallationError, Lifecycle};
use maestro::logging::init_logging;
use maestro::script::{self, ReplayError};
use maestro::BuildError;

/// Supervisory lifecycle control for kinetic installations.
#[derive(Parser, Debug)]
#[command(name = "maestro", author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trigger script and print the supervisor state after each line.
    Run(RunArgs),

    /// Print the supervisor alphabet and transition table.
    States,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Path to a JSON installation config.
    #[arg(short, long, env = "MAESTRO_CONFIG")]
    config: Option<PathBuf>,

    /// Stop at the first failing line.
    #[arg(long)]
    strict: bool,

    /// Script to replay. Reads stdin when omitted.
    script: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Installation(#[from] InstallationError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Failed to open script: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Replay(#[from] ReplayError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => run(&args),
        Commands::States => states(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &RunArgs) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => InstallationConfig::from_path(path)?,
        None => InstallationConfig::default(),
    };
    init_logging(&config.logging);

    let mut machine = supervisor_from_config(&config)?;
    let reader: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };
    let report = script::replay(&mut machine, reader, &mut io::stdout().lock(), args.strict)?;

    let model = machine.model();
    let locked: Vec<_> = model.boxes().locks().locked_ids().collect();
    println!(
        "final: {} (applied: {}, failed: {}, interactions: {}, locked: {:?})",
        machine.current_state(),
        report.applied,
        report.failed.len(),
        model.interactions(),
        locked
    );
    Ok(())
}

fn states() -> Result<(), CliError> {
    println!("States:");
    for state in Lifecycle::all() {
        let marker = if state.is_holding() { " (holding)" } else { "" };
        println!("  {state}{marker}");
    }

    println!("\nTransitions:");
    for rule in supervisor_rules()? {
        let mut guards: Vec<String> = rule.conditions.clone();
        guards.extend(rule.unless.iter().map(|g| format!("!{g}")));
        let mut line = format!(
            "  {:<28} {:<20} -> {:<20}",
            rule.trigger,
            rule.source.to_string(),
            rule.dest.name()
        );
        if !guards.is_empty() {
            line.push_str(&format!(" [{}]", guards.join(", ")));
        }
        if !rule.before.is_empty() {
            line.push_str(&format!(" before: {}", rule.before.join(", ")));
        }
        if !rule.after.is_empty() {
            line.push_str(&format!(" after: {}", rule.after.join(", ")));
        }
        println!("{line}");
    }
    Ok(())
}
