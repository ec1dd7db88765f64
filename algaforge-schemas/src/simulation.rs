use crate::environment::{Aeration, InfluentNutrients};
use serde::{Deserialize, Serialize};

/// The validated, canonical input to one metrics calculation.
///
/// Every flow is in litres per day; callers convert other units before building this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Culture volume processed per day (L/day).
    pub volume: f64,
    /// Raw exosome yield (µg per litre of culture).
    pub yield_rate: f64,
    /// Fraction of raw exosomes retained after purification (0-1).
    pub purify: f64,
    /// Lyophilization loading (mg/mL). Zero disables lyophilized volume sizing.
    pub lyo_rate: f64,
    pub species: String,
    /// Incoming nitrogen (ppm).
    pub in_n: f64,
    /// Incoming phosphorus (ppm).
    pub in_p: f64,
    /// CO2 content of the feed gas (%).
    pub co2_conc: f64,
    /// Feed gas flow (L/day).
    pub co2_flow: f64,
}

/// Exosome harvest settings of a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExosomeSettings {
    pub yield_rate: f64,
    pub purify: f64,
    #[serde(default)]
    pub lyo_rate: f64,
}

/// A calculation request as written in a YAML request file.
///
/// Unlike `SimulationInput`, the gas flow keeps its declared unit and may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub species: String,
    /// Culture volume processed per day (L/day).
    pub volume: f64,
    pub exosome: ExosomeSettings,
    pub influent: InfluentNutrients,
    pub aeration: Aeration,
}
