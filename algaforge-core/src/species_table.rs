use crate::error::AlgaforgeError;
use algaforge_schemas::{file_formats::SpeciesFile, species::SpeciesCoefficients};
use log::info;
use std::{fs, path::Path};

/// The immutable coefficient table a calculation is run against.
///
/// Species keep their declaration order so listings and reports are stable.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesTable {
    species: Vec<SpeciesCoefficients>,
}

impl SpeciesTable {
    /// The two species known to the calculator out of the box.
    pub fn builtin() -> Self {
        Self {
            species: vec![
                SpeciesCoefficients {
                    species_id: "Chlorella".to_string(),
                    display_name: Some("Chlorella vulgaris".to_string()),
                    aliases: vec!["小球藻".to_string()],
                    growth_rate: 0.25,
                    co2_fix: 1.83,
                    n_removal: 0.45,
                    p_removal: 0.08,
                },
                SpeciesCoefficients {
                    species_id: "Spirulina".to_string(),
                    display_name: Some("Arthrospira platensis".to_string()),
                    aliases: vec!["螺旋藻".to_string()],
                    growth_rate: 0.35,
                    co2_fix: 1.65,
                    n_removal: 0.38,
                    p_removal: 0.05,
                },
            ],
        }
    }

    /// Builds a table, rejecting duplicate names and out-of-range coefficients.
    pub fn from_species(species: Vec<SpeciesCoefficients>) -> Result<Self, AlgaforgeError> {
        if species.is_empty() {
            return Err(AlgaforgeError::ConfigError(
                "species table must contain at least one species".to_string(),
            ));
        }

        let mut seen: Vec<&str> = Vec::new();
        for record in &species {
            for name in std::iter::once(&record.species_id).chain(record.aliases.iter()) {
                if seen.contains(&name.as_str()) {
                    return Err(AlgaforgeError::ConfigError(format!(
                        "species name '{}' is declared more than once",
                        name
                    )));
                }
                seen.push(name.as_str());
            }

            let coefficients = [
                ("growth_rate", record.growth_rate),
                ("co2_fix", record.co2_fix),
                ("n_removal", record.n_removal),
                ("p_removal", record.p_removal),
            ];
            for (name, value) in coefficients {
                if !value.is_finite() || value < 0.0 {
                    return Err(AlgaforgeError::ConfigError(format!(
                        "species '{}' has invalid {} ({})",
                        record.species_id, name, value
                    )));
                }
            }
        }

        Ok(Self { species })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, AlgaforgeError> {
        let file: SpeciesFile = serde_yaml::from_str(yaml)
            .map_err(|e| AlgaforgeError::YamlParsing("<inline>".to_string(), e))?;
        Self::from_species(file.species)
    }

    /// Loads every `*.yaml` / `*.yml` species file in `dir`, in file name order.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, AlgaforgeError> {
        let dir = dir.as_ref();
        let dir_name = dir.display().to_string();
        info!("Loading species table from '{}'", dir_name);

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| AlgaforgeError::FileIO(dir_name.clone(), e))? {
            let path = entry
                .map_err(|e| AlgaforgeError::FileIO(dir_name.clone(), e))?
                .path();
            if path.is_file() && path.extension().map_or(false, |s| s == "yaml" || s == "yml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut species = Vec::new();
        for path in paths {
            let path_name = path.display().to_string();
            let content =
                fs::read_to_string(&path).map_err(|e| AlgaforgeError::FileIO(path_name.clone(), e))?;
            let file: SpeciesFile = serde_yaml::from_str(&content)
                .map_err(|e| AlgaforgeError::YamlParsing(path_name, e))?;
            species.extend(file.species);
        }

        let table = Self::from_species(species)?;
        info!("Species table loaded with {} species", table.len());
        Ok(table)
    }

    /// Resolves a species by id or alias.
    pub fn get(&self, name: &str) -> Option<&SpeciesCoefficients> {
        let name = name.trim();
        self.species.iter().find(|s| s.answers_to(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.species.iter().map(|s| s.species_id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesCoefficients> {
        self.species.iter()
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

impl Default for SpeciesTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const NANNO_YAML: &str = r#"
schema_version: "1.0"
species:
  - species_id: Nannochloropsis
    aliases: [nanno]
    growth_rate: 0.2
    co2_fix: 1.9
    n_removal: 0.5
    p_removal: 0.06
"#;

    #[test]
    fn builtin_table_has_two_species_in_order() {
        let table = SpeciesTable::builtin();
        assert_eq!(table.names(), vec!["Chlorella", "Spirulina"]);
        assert_eq!(table.get("Spirulina").unwrap().growth_rate, 0.35);
    }

    #[test]
    fn resolves_aliases_and_trims_names() {
        let table = SpeciesTable::builtin();
        assert_eq!(table.get("小球藻").unwrap().species_id, "Chlorella");
        assert_eq!(table.get(" 螺旋藻 ").unwrap().species_id, "Spirulina");
        assert!(!table.contains("Nannochloropsis"));
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut species: Vec<_> = SpeciesTable::builtin().iter().cloned().collect();
        let mut dup = species[0].clone();
        dup.species_id = "Chlorella-2".to_string();
        species.push(dup);
        let err = SpeciesTable::from_species(species).unwrap_err();
        assert!(err.to_string().contains("小球藻"));
    }

    #[test]
    fn rejects_negative_coefficients() {
        let mut species: Vec<_> = SpeciesTable::builtin().iter().cloned().collect();
        species[1].n_removal = -0.1;
        let err = SpeciesTable::from_species(species).unwrap_err();
        assert!(matches!(err, AlgaforgeError::ConfigError(_)));
        assert!(err.to_string().contains("n_removal"));
    }

    #[test]
    fn rejects_empty_table() {
        assert!(SpeciesTable::from_species(Vec::new()).is_err());
    }

    #[test]
    fn parses_inline_yaml() {
        let table = SpeciesTable::from_yaml_str(NANNO_YAML).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("nanno").unwrap().co2_fix, 1.9);
        assert_eq!(table.get("nanno").unwrap().display_name(), "Nannochloropsis");
    }

    #[test]
    fn loads_yaml_files_from_directory() {
        let dir = TempDir::new().unwrap();
        let mut file = fs::File::create(dir.path().join("nanno.yaml")).unwrap();
        file.write_all(NANNO_YAML.as_bytes()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let table = SpeciesTable::load(dir.path()).unwrap();
        assert_eq!(table.names(), vec!["Nannochloropsis"]);
    }

    #[test]
    fn reports_yaml_errors_with_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.yml"), "species: [not, a, record").unwrap();
        let err = SpeciesTable::load(dir.path()).unwrap_err();
        match err {
            AlgaforgeError::YamlParsing(path, _) => assert!(path.ends_with("broken.yml")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
