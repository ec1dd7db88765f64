use algaforge_core::{species_table::SpeciesTable, units::DEFAULT_CO2_FLOW_L_PER_DAY};
use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Application settings, read from `algaforge.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory of species YAML files. The built-in table is used when unset.
    pub species_dir: Option<PathBuf>,
    /// Parent directory for timestamped run folders.
    pub output_dir: PathBuf,
    /// Feed gas flow assumed when a request does not give one (L/day).
    pub default_co2_flow_l_per_day: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            species_dir: None,
            output_dir: PathBuf::from("./data/runs"),
            default_co2_flow_l_per_day: DEFAULT_CO2_FLOW_L_PER_DAY,
        }
    }
}

impl AppConfig {
    /// Loads the configuration file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML from {:?}", path))?;

        if !config.default_co2_flow_l_per_day.is_finite() || config.default_co2_flow_l_per_day < 0.0 {
            anyhow::bail!(
                "default_co2_flow_l_per_day must be a non-negative number, got {}",
                config.default_co2_flow_l_per_day
            );
        }
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// The coefficient table every calculation of this run is checked against.
    pub fn species_table(&self) -> Result<SpeciesTable> {
        match &self.species_dir {
            Some(dir) => SpeciesTable::load(dir)
                .with_context(|| format!("Failed to load species table from {:?}", dir)),
            None => Ok(SpeciesTable::builtin()),
        }
    }
}
