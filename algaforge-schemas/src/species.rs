//! Defines the fixed per-species coefficients used by the metrics calculator.

use serde::{Deserialize, Serialize};

/// Growth and uptake coefficients for one microalgae species.
///
/// All removal coefficients are expressed per gram of biomass produced, so every
/// derived quantity scales linearly with the daily biomass yield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesCoefficients {
    /// Lookup key for the species (e.g. "Chlorella").
    pub species_id: String,
    /// A human-readable name for reports, falling back to `species_id`.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Alternative names that resolve to this record (e.g. the native "小球藻").
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Biomass productivity in g / L / day.
    pub growth_rate: f64,
    /// g CO2 fixed per g biomass.
    pub co2_fix: f64,
    /// g N assimilated per g biomass.
    pub n_removal: f64,
    /// g P assimilated per g biomass.
    pub p_removal: f64,
}

impl SpeciesCoefficients {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.species_id)
    }

    /// True when `name` is the species id or one of its aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.species_id == name || self.aliases.iter().any(|a| a == name)
    }
}
