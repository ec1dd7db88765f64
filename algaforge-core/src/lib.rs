//! Process metrics for microalgae exosome production coupled with wastewater
//! treatment and CO2 capture.
//!
//! The heart of the crate is [`simulation::engine::MetricsCalculator`], a pure function of a
//! [`algaforge_schemas::simulation::SimulationInput`] and a [`species_table::SpeciesTable`].

pub mod analysis;
pub mod error;
pub mod export;
pub mod simulation;
pub mod species_table;
pub mod units;
