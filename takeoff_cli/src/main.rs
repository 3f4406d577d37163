//! # Takeoff CLI
//!
//! Command-line front end for the beam quantity takeoff engine.
//!
//! ```text
//! takeoff run                          # legacy file names in the working directory
//! takeoff run -c job.toml -o out.json  # config file, JSON report
//! takeoff check --project job.tko.json
//! takeoff bundle -o job.tko.json --job-id 25-042
//! ```

mod cli;
mod config;
mod error;
mod logging;

use clap::Parser;
use std::process::ExitCode;
use takeoff_core::file_io;
use takeoff_core::{calculate, ResultTable, TakeoffReport};
use tracing::{debug, error, info};

use cli::{BundleArgs, Cli, Commands, InputArgs, OutputFormat, RunArgs};
use config::{ResolvedInputs, RunConfig};
use error::{CliError, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Commands::Run(args) => run(args),
        Commands::Check(args) => check(args),
        Commands::Bundle(args) => bundle(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{}", e.summary());
            if let CliError::Takeoff(inner) = &e {
                if let Ok(json) = serde_json::to_string(inner) {
                    eprintln!("{json}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &RunArgs) -> Result<()> {
    let config = RunConfig::from_args(args)?;
    debug!(?config, "Resolved run configuration");

    let project = config.load_project()?;
    let totals = calculate(&project)?;

    let table = match config.format {
        OutputFormat::Csv => {
            let table = ResultTable::from_totals(&totals, &project.settings);
            file_io::save_table_csv(&table, &config.output)?;
            table
        }
        OutputFormat::Json => {
            let report = TakeoffReport::new(&project, totals);
            file_io::save_report_json(&report, &config.output)?;
            report.table
        }
    };

    info!("Wrote {} rows to {}", table.len(), config.output.display());
    print!("{table}");
    Ok(())
}

fn check(args: &InputArgs) -> Result<()> {
    let inputs = ResolvedInputs::from_args(args)?;
    let project = inputs.load_project()?;
    project.validate()?;

    println!(
        "OK: {} bar sizes, {} beam types, {} groups, {} beam instances",
        project.steel.len(),
        project.beams.len(),
        project.counts.group_count(),
        project.counts.instance_count()
    );
    Ok(())
}

fn bundle(args: &BundleArgs) -> Result<()> {
    let inputs = ResolvedInputs::from_args(&args.inputs)?;
    let mut project = inputs.load_project()?;
    project.validate()?;

    project.meta.job_id = args.job_id.clone();
    project.meta.estimator = args.estimator.clone();
    project.meta.client = args.client.clone();
    project.touch();

    file_io::save_project(&project, &args.output)?;
    info!("Saved project bundle to {}", args.output.display());
    println!("Wrote {}", args.output.display());
    Ok(())
}
