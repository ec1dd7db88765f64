use super::result::{Co2Balance, Metric, SimulationResult};
use crate::{
    error::AlgaforgeError,
    species_table::SpeciesTable,
    units::{
        round_to, CO2_MOLAR_MASS_G, CONCENTRATION_FACTOR, STP_MOLAR_VOLUME_L,
        TREHALOSE_DOSE_MMOL_PER_L, TREHALOSE_MOLAR_MASS_G,
    },
};
use algaforge_schemas::{simulation::SimulationInput, species::SpeciesCoefficients};
use log::{debug, warn};

/// Maps a `SimulationInput` and the coefficients of its species to the daily
/// process metrics.
///
/// The calculator holds no state besides a borrowed coefficient table, so one
/// instance can serve any number of independent calculations.
#[derive(Debug, Clone, Copy)]
pub struct MetricsCalculator<'a> {
    table: &'a SpeciesTable,
}

impl<'a> MetricsCalculator<'a> {
    pub fn new(table: &'a SpeciesTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a SpeciesTable {
        self.table
    }

    /// Checks every input constraint and resolves the species.
    ///
    /// # Errors
    ///
    /// Returns `AlgaforgeError::Validation` for a non-finite, negative or out-of-range
    /// field and `AlgaforgeError::UnknownSpecies` when the species is not in the table.
    pub fn validate(&self, input: &SimulationInput) -> Result<&'a SpeciesCoefficients, AlgaforgeError> {
        let fields = [
            ("volume", input.volume),
            ("yield_rate", input.yield_rate),
            ("purify", input.purify),
            ("lyo_rate", input.lyo_rate),
            ("in_n", input.in_n),
            ("in_p", input.in_p),
            ("co2_conc", input.co2_conc),
            ("co2_flow", input.co2_flow),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(AlgaforgeError::validation(field, "must be a finite number"));
            }
            if value < 0.0 {
                return Err(AlgaforgeError::validation(
                    field,
                    format!("must not be negative (got {})", value),
                ));
            }
        }

        if input.purify > 1.0 {
            return Err(AlgaforgeError::validation(
                "purify",
                format!("is a fraction and must be at most 1 (got {})", input.purify),
            ));
        }
        if input.co2_conc > 100.0 {
            return Err(AlgaforgeError::validation(
                "co2_conc",
                format!("is a percentage and must be at most 100 (got {})", input.co2_conc),
            ));
        }

        self.table
            .get(&input.species)
            .ok_or_else(|| AlgaforgeError::UnknownSpecies(input.species.clone()))
    }

    /// Validates `input` and derives every metric.
    ///
    /// # Errors
    ///
    /// Fails on invalid input (see [`MetricsCalculator::validate`]) before any metric is
    /// derived, and with `AlgaforgeError::Computation` if a derived value is not finite.
    pub fn compute(&self, input: &SimulationInput) -> Result<SimulationResult, AlgaforgeError> {
        let species = self.validate(input)?;
        let derived = derive(input, species);
        debug!("Derived quantities for '{}': {:?}", species.species_id, derived);

        if input.volume == 0.0 {
            warn!("Culture volume is zero; nutrient removal is reported as 0 ppm");
        }
        if derived.co2_efficiency_raw > 100.0 {
            warn!(
                "CO2 fixation ({:.2} g/day) exceeds CO2 supplied ({:.2} g/day); efficiency capped at 100%",
                derived.co2_fixed_g, derived.co2_input_g
            );
        }

        derived.into_result(&species.species_id)
    }
}

/// Validates `input` against `table` and derives every metric.
pub fn compute(input: &SimulationInput, table: &SpeciesTable) -> Result<SimulationResult, AlgaforgeError> {
    MetricsCalculator::new(table).compute(input)
}

/// CO2 removal efficiency in percent, capped at 100. Zero when no CO2 is supplied.
pub fn co2_efficiency(co2_fixed_g: f64, co2_input_g: f64) -> f64 {
    if co2_input_g > 0.0 {
        (co2_fixed_g / co2_input_g * 100.0).min(100.0)
    } else {
        0.0
    }
}

/// Daily CO2 supplied by the feed gas as (mol/day, g/day).
pub fn co2_supply(co2_flow_l_per_day: f64, co2_conc_pct: f64) -> (f64, f64) {
    let co2_mol_per_day = co2_flow_l_per_day * co2_conc_pct / 100.0 / STP_MOLAR_VOLUME_L;
    (co2_mol_per_day, co2_mol_per_day * CO2_MOLAR_MASS_G)
}

/// Unrounded pipeline values.
#[derive(Debug, Clone, PartialEq)]
struct Derived {
    algae_kg: f64,
    exosome_raw_mg: f64,
    exosome_pure_mg: f64,
    concentrated_volume_ml: f64,
    trehalose_g: f64,
    lyophilized_volume_ml: f64,
    co2_fixed_g: f64,
    n_removed_g: f64,
    p_removed_g: f64,
    n_ppm: f64,
    p_ppm: f64,
    n_efficiency_pct: f64,
    p_efficiency_pct: f64,
    co2_mol_per_day: f64,
    co2_input_g: f64,
    co2_efficiency_raw: f64,
    co2_efficiency_pct: f64,
}

fn derive(input: &SimulationInput, species: &SpeciesCoefficients) -> Derived {
    let volume = input.volume;

    let algae_kg = volume * species.growth_rate / 1000.0;
    let exosome_raw_mg = volume * input.yield_rate / 1000.0;
    let exosome_pure_mg = exosome_raw_mg * input.purify;
    let concentrated_volume_ml = volume * 1000.0 / CONCENTRATION_FACTOR;
    let trehalose_g =
        TREHALOSE_DOSE_MMOL_PER_L * TREHALOSE_MOLAR_MASS_G / 1000.0 * (concentrated_volume_ml / 1000.0);
    let lyophilized_volume_ml = if input.lyo_rate > 0.0 {
        exosome_pure_mg / input.lyo_rate
    } else {
        0.0
    };

    let biomass_g = algae_kg * 1000.0;
    let co2_fixed_g = biomass_g * species.co2_fix;
    let n_removed_g = biomass_g * species.n_removal;
    let p_removed_g = biomass_g * species.p_removal;

    let (n_ppm, p_ppm) = if volume > 0.0 {
        (n_removed_g / volume, p_removed_g / volume)
    } else {
        (0.0, 0.0)
    };
    let n_efficiency_pct = removal_efficiency(n_ppm, input.in_n);
    let p_efficiency_pct = removal_efficiency(p_ppm, input.in_p);

    let (co2_mol_per_day, co2_input_g) = co2_supply(input.co2_flow, input.co2_conc);
    let co2_efficiency_raw = if co2_input_g > 0.0 {
        co2_fixed_g / co2_input_g * 100.0
    } else {
        0.0
    };

    Derived {
        algae_kg,
        exosome_raw_mg,
        exosome_pure_mg,
        concentrated_volume_ml,
        trehalose_g,
        lyophilized_volume_ml,
        co2_fixed_g,
        n_removed_g,
        p_removed_g,
        n_ppm,
        p_ppm,
        n_efficiency_pct,
        p_efficiency_pct,
        co2_mol_per_day,
        co2_input_g,
        co2_efficiency_raw,
        co2_efficiency_pct: co2_efficiency(co2_fixed_g, co2_input_g),
    }
}

fn removal_efficiency(removed_ppm: f64, incoming_ppm: f64) -> f64 {
    if incoming_ppm > 0.0 {
        removed_ppm / incoming_ppm * 100.0
    } else {
        0.0
    }
}

impl Derived {
    fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::AlgaeKg => self.algae_kg,
            Metric::ExosomeRawMg => self.exosome_raw_mg,
            Metric::ExosomePureMg => self.exosome_pure_mg,
            Metric::ConcentratedVolumeMl => self.concentrated_volume_ml,
            Metric::TrehaloseG => self.trehalose_g,
            Metric::LyophilizedVolumeMl => self.lyophilized_volume_ml,
            Metric::Co2FixedG => self.co2_fixed_g,
            Metric::Co2EfficiencyPct => self.co2_efficiency_pct,
            Metric::NPpm => self.n_ppm,
            Metric::PPpm => self.p_ppm,
            Metric::NEfficiencyPct => self.n_efficiency_pct,
            Metric::PEfficiencyPct => self.p_efficiency_pct,
        }
    }

    fn into_result(self, species: &str) -> Result<SimulationResult, AlgaforgeError> {
        let mut values = [0.0; Metric::COUNT];
        for metric in Metric::ALL {
            let value = round_to(self.value(metric), metric.kind().decimal_places());
            if !value.is_finite() {
                return Err(AlgaforgeError::Computation {
                    message: format!("{} evaluated to {}", metric.key(), value),
                });
            }
            values[metric.index()] = value;
        }

        Ok(SimulationResult {
            species: species.to_string(),
            values,
            co2_balance: Co2Balance {
                co2_mol_per_day: self.co2_mol_per_day,
                co2_input_g: self.co2_input_g,
                co2_fixed_g: self.co2_fixed_g,
            },
        })
    }
}
