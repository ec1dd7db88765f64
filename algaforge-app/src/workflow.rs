use crate::config::AppConfig;
use crate::plotting;
use crate::request::{self, InputSource};
use algaforge_core::{
    analysis::{co2_vented_g, ChartData},
    export::{self, ExportRow, ResultExporter, EXPORT_FILE_NAME},
    simulation::{
        engine::MetricsCalculator,
        result::{Metric, MetricKind, SimulationResult},
    },
    species_table::SpeciesTable,
};
use algaforge_schemas::simulation::SimulationInput;
use anyhow::{Context, Result};
use log::info;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Which artifacts a run writes besides the printed report.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOutputs {
    pub export: bool,
    pub chart: bool,
}

impl RunOutputs {
    pub fn any(&self) -> bool {
        self.export || self.chart
    }
}

/// Resolves the input, runs the calculator, prints the report and writes the requested artifacts.
pub fn run_simulation(
    source: &InputSource,
    config: &AppConfig,
    table: &SpeciesTable,
    outputs: RunOutputs,
) -> Result<SimulationResult> {
    println!("\n--- [Workflow] Running Metrics Calculation ---");
    let input = request::resolve_input(source, config.default_co2_flow_l_per_day)?;
    let result = MetricsCalculator::new(table)
        .compute(&input)
        .context("Calculation rejected")?;

    print_summary_report(&input, &result, table);

    if outputs.any() {
        let run_dir = create_run_dir(&config.output_dir, result.species())?;
        write_run_outputs(&run_dir, &result, outputs)?;
        println!("\nRun artifacts written to {:?}", run_dir);
    }

    Ok(result)
}

fn create_run_dir(output_dir: &Path, species: &str) -> Result<PathBuf> {
    let run_dir = output_dir.join(format!(
        "{}_{}",
        species,
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    ));
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", run_dir))?;
    Ok(run_dir)
}

/// Writes the export row, chart data and chart images into `run_dir`.
pub fn write_run_outputs(run_dir: &Path, result: &SimulationResult, outputs: RunOutputs) -> Result<()> {
    if outputs.export {
        let path = run_dir.join(EXPORT_FILE_NAME);
        let mut exporter = ResultExporter::create(&path)?;
        exporter.write_result(result)?;
        info!("Exported result to {:?}", path);
    }

    if outputs.chart {
        let chart = ChartData::from_result(result);
        let path = run_dir.join("chart.json");
        fs::write(&path, chart.to_json()?)
            .with_context(|| format!("Failed to write {:?}", path))?;
        plotting::generate_result_plots(run_dir, result)?;
    }

    Ok(())
}

/// Prints the rows of a previously exported file.
pub fn report_export(path: &Path) -> Result<Vec<ExportRow>> {
    let rows = export::read_results(path)
        .with_context(|| format!("Failed to read exported results from {:?}", path))?;
    println!("\n--- [Export Report] {:?} ---", path);
    for (i, row) in rows.iter().enumerate() {
        println!("Row {}: {}", i + 1, row.species);
        for (metric, value) in &row.metrics {
            println!("  - {:<45} {:>12}", metric.label(), format_value(*metric, *value));
        }
    }
    Ok(rows)
}

pub fn print_species_table(table: &SpeciesTable) {
    println!("\n--- [Species Table] ---");
    println!(
        "{:<12} {:<24} {:>12} {:>10} {:>10} {:>10}",
        "Id", "Name", "g/L/day", "gCO2/g", "gN/g", "gP/g"
    );
    for species in table.iter() {
        println!(
            "{:<12} {:<24} {:>12.2} {:>10.2} {:>10.2} {:>10.2}",
            species.species_id,
            species.display_name(),
            species.growth_rate,
            species.co2_fix,
            species.n_removal,
            species.p_removal
        );
        if !species.aliases.is_empty() {
            println!("{:<12} aliases: {}", "", species.aliases.join(", "));
        }
    }
}

fn format_value(metric: Metric, value: f64) -> String {
    let places = metric.kind().decimal_places() as usize;
    format!("{:.*}", places, value)
}

fn print_summary_report(input: &SimulationInput, result: &SimulationResult, table: &SpeciesTable) {
    let species_name = table
        .get(result.species())
        .map_or(result.species(), |s| s.display_name());

    println!("\n\n--- [Summary Report] ---");
    println!("========================================");
    println!("Species: {} ({})", result.species(), species_name);
    println!(
        "Culture: {:.1} L/day | Feed gas: {:.1} L/day at {:.1}% CO2",
        input.volume, input.co2_flow, input.co2_conc
    );
    println!(
        "Influent: N {:.2} ppm | P {:.2} ppm",
        input.in_n, input.in_p
    );
    println!("----------------------------------------");

    let sections: [(&str, &[MetricKind]); 2] = [
        ("Production", &[MetricKind::Mass, MetricKind::Volume]),
        ("Removal", &[MetricKind::Concentration, MetricKind::Percentage]),
    ];
    for (title, kinds) in sections {
        println!("\n{}:", title);
        for (metric, value) in result.metrics().filter(|(m, _)| kinds.contains(&m.kind())) {
            println!("  - {:<45} {:>12}", metric.label(), format_value(metric, value));
        }
    }

    let balance = result.co2_balance();
    println!("\nCO2 Mass Balance:");
    println!("  - Supplied:  {:.2} g/day ({:.3} mol/day)", balance.co2_input_g, balance.co2_mol_per_day);
    println!("  - Fixed:     {:.2} g/day", balance.co2_fixed_g);
    println!("  - Vented:    {:.2} g/day", co2_vented_g(result));
    println!("========================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use algaforge_core::simulation::engine::compute;
    use tempfile::TempDir;

    fn result() -> SimulationResult {
        let input = SimulationInput {
            volume: 1000.0,
            yield_rate: 10.0,
            purify: 0.8,
            lyo_rate: 2.0,
            species: "Chlorella".to_string(),
            in_n: 20.0,
            in_p: 5.0,
            co2_conc: 5.0,
            co2_flow: 1500.0,
        };
        compute(&input, &SpeciesTable::builtin()).unwrap()
    }

    #[test]
    fn formats_values_with_metric_precision() {
        assert_eq!(format_value(Metric::ConcentratedVolumeMl, 100_000.0), "100000.0");
        assert_eq!(format_value(Metric::NPpm, 0.11), "0.11");
    }

    #[test]
    fn export_only_run_writes_csv() {
        let dir = TempDir::new().unwrap();
        write_run_outputs(dir.path(), &result(), RunOutputs { export: true, chart: false }).unwrap();

        assert!(dir.path().join(EXPORT_FILE_NAME).exists());
        assert!(!dir.path().join("chart.json").exists());

        let rows = report_export(&dir.path().join(EXPORT_FILE_NAME)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(Metric::Co2FixedG), Some(457.5));
    }

    #[test]
    fn run_without_outputs_creates_no_directory() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            output_dir: dir.path().join("runs"),
            ..AppConfig::default()
        };
        let source = InputSource::Fields(
            [
                ("volume", "1000"),
                ("yield_rate", "10"),
                ("purify", "0.8"),
                ("lyo", "2"),
                ("species", "Chlorella"),
                ("in_n", "20"),
                ("in_p", "5"),
                ("co2_conc", "5"),
            ]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        );

        let result = run_simulation(&source, &config, &SpeciesTable::builtin(), RunOutputs::default()).unwrap();
        assert_eq!(result.get(Metric::TrehaloseG), 855.75);
        assert!(!config.output_dir.exists());
    }
}
