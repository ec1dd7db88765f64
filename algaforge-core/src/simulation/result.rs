use serde::{Serialize, Serializer};

/// Column label of the species entry that leads every result.
pub const SPECIES_LABEL: &str = "Species";

/// Physical kind of a metric, which fixes its display precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Mass,
    Concentration,
    Volume,
    Percentage,
}

impl MetricKind {
    pub fn decimal_places(self) -> u32 {
        match self {
            Self::Mass | Self::Concentration => 2,
            Self::Volume | Self::Percentage => 1,
        }
    }
}

/// The derived metrics of one calculation, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    AlgaeKg,
    ExosomeRawMg,
    ExosomePureMg,
    ConcentratedVolumeMl,
    TrehaloseG,
    LyophilizedVolumeMl,
    Co2FixedG,
    Co2EfficiencyPct,
    NPpm,
    PPpm,
    NEfficiencyPct,
    PEfficiencyPct,
}

impl Metric {
    pub const COUNT: usize = 12;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::AlgaeKg,
        Metric::ExosomeRawMg,
        Metric::ExosomePureMg,
        Metric::ConcentratedVolumeMl,
        Metric::TrehaloseG,
        Metric::LyophilizedVolumeMl,
        Metric::Co2FixedG,
        Metric::Co2EfficiencyPct,
        Metric::NPpm,
        Metric::PPpm,
        Metric::NEfficiencyPct,
        Metric::PEfficiencyPct,
    ];

    /// Position in display order; matches the declaration order of `ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Machine-readable key, e.g. `co2_fixed_g`.
    pub fn key(self) -> &'static str {
        match self {
            Metric::AlgaeKg => "algae_kg",
            Metric::ExosomeRawMg => "exosome_raw_mg",
            Metric::ExosomePureMg => "exosome_pure_mg",
            Metric::ConcentratedVolumeMl => "concentrated_volume_ml",
            Metric::TrehaloseG => "trehalose_g",
            Metric::LyophilizedVolumeMl => "lyophilized_volume_ml",
            Metric::Co2FixedG => "co2_fixed_g",
            Metric::Co2EfficiencyPct => "co2_efficiency_pct",
            Metric::NPpm => "n_ppm",
            Metric::PPpm => "p_ppm",
            Metric::NEfficiencyPct => "n_efficiency_pct",
            Metric::PEfficiencyPct => "p_efficiency_pct",
        }
    }

    /// Display label, also used as the export column header.
    pub fn label(self) -> &'static str {
        match self {
            Metric::AlgaeKg => "Algae biomass (kg/day)",
            Metric::ExosomeRawMg => "Raw exosome yield (mg/day)",
            Metric::ExosomePureMg => "Purified exosomes (mg/day)",
            Metric::ConcentratedVolumeMl => "Concentrated volume (mL/day)",
            Metric::TrehaloseG => "Trehalose for preservation buffer (g/day)",
            Metric::LyophilizedVolumeMl => "Lyophilized fill volume (mL/day)",
            Metric::Co2FixedG => "CO2 captured (g/day)",
            Metric::Co2EfficiencyPct => "CO2 removal efficiency (%)",
            Metric::NPpm => "Nitrogen removed (ppm/day)",
            Metric::PPpm => "Phosphorus removed (ppm/day)",
            Metric::NEfficiencyPct => "Nitrogen removal efficiency (%)",
            Metric::PEfficiencyPct => "Phosphorus removal efficiency (%)",
        }
    }

    pub fn kind(self) -> MetricKind {
        match self {
            Metric::AlgaeKg
            | Metric::ExosomeRawMg
            | Metric::ExosomePureMg
            | Metric::TrehaloseG
            | Metric::Co2FixedG => MetricKind::Mass,
            Metric::NPpm | Metric::PPpm => MetricKind::Concentration,
            Metric::ConcentratedVolumeMl | Metric::LyophilizedVolumeMl => MetricKind::Volume,
            Metric::Co2EfficiencyPct | Metric::NEfficiencyPct | Metric::PEfficiencyPct => {
                MetricKind::Percentage
            }
        }
    }

    pub fn from_label(label: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.label() == label)
    }
}

/// Unrounded CO2 mass balance behind the efficiency metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Co2Balance {
    pub co2_mol_per_day: f64,
    pub co2_input_g: f64,
    pub co2_fixed_g: f64,
}

/// One entry of a result as shown to the user: the species name or a metric value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultValue {
    Text(String),
    Number(f64),
}

/// The outcome of one calculation. Owned by the caller; nothing retains it.
///
/// Holds a value for every `Metric`, indexed by `Metric::index`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub(crate) species: String,
    pub(crate) values: [f64; Metric::COUNT],
    pub(crate) co2_balance: Co2Balance,
}

impl SimulationResult {
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Rounded value of `metric`.
    pub fn get(&self, metric: Metric) -> f64 {
        self.values[metric.index()]
    }

    /// Rounded metric values in display order.
    pub fn metrics(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(move |metric| (metric, self.get(metric)))
    }

    pub fn co2_balance(&self) -> &Co2Balance {
        &self.co2_balance
    }

    /// Species entry followed by every metric, keyed by display label.
    pub fn labeled_entries(&self) -> Vec<(&'static str, ResultValue)> {
        std::iter::once((SPECIES_LABEL, ResultValue::Text(self.species.clone())))
            .chain(self.metrics().map(|(m, v)| (m.label(), ResultValue::Number(v))))
            .collect()
    }
}

impl Serialize for SimulationResult {
    /// Serializes as an ordered map `{ "Species": ..., "<label>": value, ... }`.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let entries = self.labeled_entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (label, value) in &entries {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volumes_and_percentages_use_one_decimal() {
        for metric in Metric::ALL {
            let expected = match metric {
                Metric::ConcentratedVolumeMl
                | Metric::LyophilizedVolumeMl
                | Metric::Co2EfficiencyPct
                | Metric::NEfficiencyPct
                | Metric::PEfficiencyPct => 1,
                _ => 2,
            };
            assert_eq!(metric.kind().decimal_places(), expected, "{}", metric.key());
        }
    }

    #[test]
    fn labels_are_unique_and_resolvable() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_label(metric.label()), Some(metric));
        }
        assert_eq!(Metric::from_label(SPECIES_LABEL), None);
    }

    #[test]
    fn index_follows_display_order() {
        for (position, metric) in Metric::ALL.into_iter().enumerate() {
            assert_eq!(metric.index(), position, "{}", metric.key());
        }
    }

    #[test]
    fn every_metric_is_retrievable() {
        let mut values = [0.0; Metric::COUNT];
        for metric in Metric::ALL {
            values[metric.index()] = metric.index() as f64 + 0.5;
        }
        let result = SimulationResult {
            species: "Chlorella".to_string(),
            values,
            co2_balance: Co2Balance {
                co2_mol_per_day: 0.0,
                co2_input_g: 0.0,
                co2_fixed_g: 0.0,
            },
        };
        assert_eq!(result.get(Metric::AlgaeKg), 0.5);
        assert_eq!(result.get(Metric::PEfficiencyPct), 11.5);
        assert_eq!(result.metrics().count(), Metric::COUNT);
    }

    #[test]
    fn serializes_species_first_in_display_order() {
        let mut values = [0.0; Metric::COUNT];
        values[Metric::AlgaeKg.index()] = 0.25;
        values[Metric::ExosomeRawMg.index()] = 10.0;
        let result = SimulationResult {
            species: "Chlorella".to_string(),
            values,
            co2_balance: Co2Balance {
                co2_mol_per_day: 0.0,
                co2_input_g: 0.0,
                co2_fixed_g: 0.0,
            },
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.starts_with(
            r#"{"Species":"Chlorella","Algae biomass (kg/day)":0.25,"Raw exosome yield (mg/day)":10.0,"#
        ));
        assert!(json.ends_with(r#""Phosphorus removal efficiency (%)":0.0}"#));
    }
}
