//! Physical constants and unit handling for the calculator.

use crate::error::AlgaforgeError;
use algaforge_schemas::environment::Measurement;

/// Ideal-gas molar volume at STP (L/mol).
pub const STP_MOLAR_VOLUME_L: f64 = 22.4;
/// Molar mass of CO2 (g/mol).
pub const CO2_MOLAR_MASS_G: f64 = 44.01;
/// Molar mass of trehalose (g/mol).
pub const TREHALOSE_MOLAR_MASS_G: f64 = 342.3;
/// Trehalose dosing of the preservation buffer (mmol/L of concentrate).
pub const TREHALOSE_DOSE_MMOL_PER_L: f64 = 25.0;
/// Volume reduction achieved by tangential-flow concentration.
pub const CONCENTRATION_FACTOR: f64 = 10.0;
/// Feed gas flow assumed when a request does not state one (L/day).
pub const DEFAULT_CO2_FLOW_L_PER_DAY: f64 = 1500.0;

/// Units accepted for a daily gas flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowUnit {
    LitresPerDay,
    MillilitresPerDay,
    CubicMetresPerDay,
}

impl FlowUnit {
    pub fn parse(unit: &str) -> Result<Self, AlgaforgeError> {
        match unit.trim().to_ascii_lowercase().as_str() {
            "l/day" | "l/d" | "l" => Ok(Self::LitresPerDay),
            "ml/day" | "ml/d" | "ml" => Ok(Self::MillilitresPerDay),
            "m3/day" | "m3/d" | "m3" | "m³/day" => Ok(Self::CubicMetresPerDay),
            other => Err(AlgaforgeError::validation(
                "co2_flow",
                format!("unsupported flow unit '{}'", other),
            )),
        }
    }

    fn litres_factor(self) -> f64 {
        match self {
            Self::LitresPerDay => 1.0,
            Self::MillilitresPerDay => 1.0e-3,
            Self::CubicMetresPerDay => 1.0e3,
        }
    }

    pub fn to_litres_per_day(self, value: f64) -> f64 {
        value * self.litres_factor()
    }
}

/// Converts a flow measurement in any supported unit to L/day.
pub fn flow_to_litres_per_day(flow: &Measurement<f64>) -> Result<f64, AlgaforgeError> {
    Ok(FlowUnit::parse(&flow.unit)?.to_litres_per_day(flow.value))
}

/// Rounds the exact binary value of `value` to `places` decimal places, ties to even.
///
/// Goes through decimal formatting, so large finite values never overflow.
pub fn round_to(value: f64, places: u32) -> f64 {
    format!("{:.*}", places as usize, value)
        .parse()
        .unwrap_or(value)
}
