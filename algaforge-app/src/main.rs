use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use crate::request::InputSource;
use crate::workflow::RunOutputs;

mod config;
mod plotting;
mod request;
mod workflow;

/// Daily process metrics for microalgae exosome production with wastewater treatment
/// and CO2 capture.
#[derive(Debug, Parser)]
#[command(name = "algaforge", version, about)]
struct Cli {
    /// Path to an `algaforge.yaml` configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the species coefficient table.
    Species,
    /// Run one calculation and print the report.
    Simulate(SimulateArgs),
    /// Print the rows of an exported result file.
    Report {
        /// CSV file written by `simulate --export`.
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
struct SimulateArgs {
    /// YAML request file.
    #[arg(long, conflicts_with = "fields", required_unless_present = "fields")]
    request: Option<PathBuf>,

    /// Input field as key=value (volume, yield_rate, purify, lyo, species, in_n, in_p,
    /// co2_conc, co2_flow or co2_flow_m3). Repeat for each field.
    #[arg(short = 'f', long = "field", value_parser = request::parse_key_val)]
    fields: Vec<(String, String)>,

    /// Write the result as a spreadsheet row.
    #[arg(long)]
    export: bool,

    /// Write chart data and bar chart images.
    #[arg(long)]
    chart: bool,

    /// Override the configured output directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    println!("--- AlgaForge ---");
    let mut config = config::AppConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    let table = config.species_table()?;

    match cli.command {
        Command::Species => workflow::print_species_table(&table),
        Command::Simulate(args) => {
            if let Some(dir) = args.output_dir {
                config.output_dir = dir;
            }
            let source = match args.request {
                Some(path) => InputSource::File(path),
                None => InputSource::Fields(args.fields),
            };
            let outputs = RunOutputs {
                export: args.export,
                chart: args.chart,
            };
            workflow::run_simulation(&source, &config, &table, outputs)?;
        }
        Command::Report { path } => {
            workflow::report_export(&path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn simulate_collects_repeated_fields() {
        let cli = Cli::try_parse_from([
            "algaforge", "simulate", "-f", "volume=1000", "--field", "species=Chlorella", "--export",
        ])
        .unwrap();
        match cli.command {
            Command::Simulate(args) => {
                assert_eq!(args.fields.len(), 2);
                assert_eq!(args.fields[1], ("species".to_string(), "Chlorella".to_string()));
                assert!(args.export);
                assert!(!args.chart);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn simulate_requires_some_input() {
        assert!(Cli::try_parse_from(["algaforge", "simulate"]).is_err());
        assert!(Cli::try_parse_from([
            "algaforge", "simulate", "--request", "r.yaml", "-f", "volume=1"
        ])
        .is_err());
    }
}
