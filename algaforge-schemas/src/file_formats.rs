use crate::{simulation::SimulationRequest, species::SpeciesCoefficients};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SpeciesFile {
    pub schema_version: String,
    pub species: Vec<SpeciesCoefficients>,
}

#[derive(Debug, Deserialize)]
pub struct RequestFile {
    pub schema_version: String,
    pub request: SimulationRequest,
}
