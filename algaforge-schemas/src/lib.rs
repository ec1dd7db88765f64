//! Serde data model shared by the AlgaForge crates: species coefficient records,
//! simulation inputs, and the YAML file wrappers they are loaded from.

pub mod environment;
pub mod file_formats;
pub mod simulation;
pub mod species;
