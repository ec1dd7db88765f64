use algaforge_core::simulation::builder::InputBuilder;
use algaforge_schemas::{file_formats::RequestFile, simulation::SimulationInput};
use anyhow::{Context, Result};
use std::{collections::HashMap, fs, path::Path};

/// Where the values of one calculation come from.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// A YAML request file.
    File(std::path::PathBuf),
    /// `key=value` pairs, named like the fields of the original entry form.
    Fields(Vec<(String, String)>),
}

/// Parses a `key=value` command-line argument.
pub fn parse_key_val(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", arg))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{}'", arg));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn load_request_file(path: &Path) -> Result<InputBuilder> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read request file {:?}", path))?;
    let file: RequestFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML from {:?}", path))?;
    Ok(InputBuilder::from_request(&file.request))
}

/// Turns an input source into a canonical `SimulationInput`.
///
/// `default_co2_flow` (L/day) applies when the source gives no gas flow.
pub fn resolve_input(source: &InputSource, default_co2_flow: f64) -> Result<SimulationInput> {
    let builder = match source {
        InputSource::File(path) => load_request_file(path)?,
        InputSource::Fields(pairs) => {
            let fields: HashMap<String, String> = pairs.iter().cloned().collect();
            InputBuilder::from_fields(&fields)?
        }
    };
    Ok(builder.with_default_co2_flow(default_co2_flow).build()?)
}
