use serde::{Deserialize, Serialize};

/// A value tagged with the unit it was recorded in (e.g. `{ value: 1.5, unit: "m3/day" }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement<T> {
    pub value: T,
    pub unit: String,
}

/// Gas fed to the culture. The flow keeps the unit it was supplied in; conversion to
/// litres per day happens when the request is turned into a `SimulationInput`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aeration {
    /// Feed gas flow. When omitted the configured default flow applies.
    #[serde(default)]
    pub flow_rate: Option<Measurement<f64>>,
    /// CO2 content of the feed gas, in volume percent.
    pub co2_percent: f64,
}

/// Nutrient load of the incoming wastewater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluentNutrients {
    pub nitrogen_ppm: f64,
    pub phosphorus_ppm: f64,
}
