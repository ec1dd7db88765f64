use crate::{
    error::AlgaforgeError,
    simulation::{
        engine::co2_efficiency,
        result::{Metric, ResultValue, SimulationResult},
    },
};
use serde::{Deserialize, Serialize};

/// Parallel label/value arrays consumed by chart renderers.
///
/// The species entry is dropped since it has no numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartData {
    pub fn from_result(result: &SimulationResult) -> Self {
        let (labels, values) = result
            .labeled_entries()
            .into_iter()
            .filter_map(|(label, value)| match value {
                ResultValue::Number(v) => Some((label.to_string(), v)),
                ResultValue::Text(_) => None,
            })
            .unzip();
        Self { labels, values }
    }

    /// Only the metrics selected by `keep`, in display order.
    pub fn filtered(result: &SimulationResult, keep: impl Fn(Metric) -> bool) -> Self {
        let (labels, values) = result
            .metrics()
            .filter(|(metric, _)| keep(*metric))
            .map(|(metric, value)| (metric.label().to_string(), value))
            .unzip();
        Self { labels, values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// `{"labels": [...], "values": [...]}` as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, AlgaforgeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Recomputes the capped CO2 efficiency from the mass balance stored in `result`.
pub fn recompute_co2_efficiency(result: &SimulationResult) -> f64 {
    let balance = result.co2_balance();
    co2_efficiency(balance.co2_fixed_g, balance.co2_input_g)
}

/// Daily CO2 that leaves the culture unabsorbed (g/day), never negative.
pub fn co2_vented_g(result: &SimulationResult) -> f64 {
    let balance = result.co2_balance();
    (balance.co2_input_g - balance.co2_fixed_g).max(0.0)
}
