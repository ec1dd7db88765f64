use crate::{
    error::AlgaforgeError,
    units::{flow_to_litres_per_day, FlowUnit, DEFAULT_CO2_FLOW_L_PER_DAY},
};
use algaforge_schemas::{
    environment::Measurement,
    simulation::{SimulationInput, SimulationRequest},
};
use std::collections::HashMap;

/// A fluent builder for assembling a `SimulationInput` at the edge of the system.
///
/// The builder only checks that every required value is present and converts the
/// gas flow to litres per day. Range checks are left to the calculator so there is
/// exactly one place where input constraints are enforced.
#[derive(Debug, Default)]
pub struct InputBuilder {
    species: Option<String>,
    volume: Option<f64>,
    yield_rate: Option<f64>,
    purify: Option<f64>,
    lyo_rate: Option<f64>,
    in_n: Option<f64>,
    in_p: Option<f64>,
    co2_conc: Option<f64>,
    co2_flow: Option<Measurement<f64>>,
    default_co2_flow: Option<f64>,
}

impl InputBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    /// Culture volume in L/day.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Raw exosome yield in µg/L.
    pub fn with_yield_rate(mut self, yield_rate: f64) -> Self {
        self.yield_rate = Some(yield_rate);
        self
    }

    pub fn with_purify(mut self, purify: f64) -> Self {
        self.purify = Some(purify);
        self
    }

    /// Lyophilization loading in mg/mL. Defaults to 0 (no lyophilized volume sizing).
    pub fn with_lyo_rate(mut self, lyo_rate: f64) -> Self {
        self.lyo_rate = Some(lyo_rate);
        self
    }

    pub fn with_influent(mut self, in_n: f64, in_p: f64) -> Self {
        self.in_n = Some(in_n);
        self.in_p = Some(in_p);
        self
    }

    pub fn with_co2_conc(mut self, co2_conc: f64) -> Self {
        self.co2_conc = Some(co2_conc);
        self
    }

    /// Feed gas flow in any unit understood by `FlowUnit`.
    pub fn with_co2_flow(mut self, flow: Measurement<f64>) -> Self {
        self.co2_flow = Some(flow);
        self
    }

    pub fn with_co2_flow_litres(self, litres_per_day: f64) -> Self {
        self.with_co2_flow(Measurement {
            value: litres_per_day,
            unit: "L/day".to_string(),
        })
    }

    /// Flow used when none is set. Defaults to `DEFAULT_CO2_FLOW_L_PER_DAY`.
    pub fn with_default_co2_flow(mut self, litres_per_day: f64) -> Self {
        self.default_co2_flow = Some(litres_per_day);
        self
    }

    /// Seeds the builder from a request file entry.
    pub fn from_request(request: &SimulationRequest) -> Self {
        let mut builder = Self::new()
            .with_species(request.species.clone())
            .with_volume(request.volume)
            .with_yield_rate(request.exosome.yield_rate)
            .with_purify(request.exosome.purify)
            .with_lyo_rate(request.exosome.lyo_rate)
            .with_influent(request.influent.nitrogen_ppm, request.influent.phosphorus_ppm)
            .with_co2_conc(request.aeration.co2_percent);
        if let Some(flow) = &request.aeration.flow_rate {
            builder = builder.with_co2_flow(flow.clone());
        }
        builder
    }

    /// Seeds the builder from a flat mapping of string form fields.
    ///
    /// Recognized keys: `volume`, `yield_rate`, `purify`, `lyo` or `lyo_rate`, `species`,
    /// `in_n`, `in_p`, `co2_conc`, and optionally `co2_flow` (L/day) or `co2_flow_m3`
    /// (m3/day).
    ///
    /// # Errors
    ///
    /// Returns `AlgaforgeError::Validation` naming the field when a value is missing,
    /// is not a number, or when both flow keys are given.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, AlgaforgeError> {
        let lyo_key = if fields.contains_key("lyo_rate") { "lyo_rate" } else { "lyo" };

        let mut builder = Self::new()
            .with_species(required(fields, "species")?.trim())
            .with_volume(number(fields, "volume")?)
            .with_yield_rate(number(fields, "yield_rate")?)
            .with_purify(number(fields, "purify")?)
            .with_lyo_rate(number(fields, lyo_key)?)
            .with_influent(number(fields, "in_n")?, number(fields, "in_p")?)
            .with_co2_conc(number(fields, "co2_conc")?);

        match (fields.get("co2_flow"), fields.get("co2_flow_m3")) {
            (Some(_), Some(_)) => {
                return Err(AlgaforgeError::validation(
                    "co2_flow",
                    "give either co2_flow (L/day) or co2_flow_m3 (m3/day), not both",
                ))
            }
            (Some(_), None) => {
                builder = builder.with_co2_flow_litres(number(fields, "co2_flow")?);
            }
            (None, Some(_)) => {
                builder = builder.with_co2_flow(Measurement {
                    value: number(fields, "co2_flow_m3")?,
                    unit: "m3/day".to_string(),
                });
            }
            (None, None) => {}
        }

        Ok(builder)
    }

    /// Consumes the builder and returns the canonical input.
    ///
    /// # Errors
    ///
    /// Returns `AlgaforgeError::Validation` if a required value was never set or the
    /// flow unit is not supported.
    pub fn build(self) -> Result<SimulationInput, AlgaforgeError> {
        let co2_flow = match &self.co2_flow {
            Some(flow) => flow_to_litres_per_day(flow)?,
            None => FlowUnit::LitresPerDay
                .to_litres_per_day(self.default_co2_flow.unwrap_or(DEFAULT_CO2_FLOW_L_PER_DAY)),
        };

        Ok(SimulationInput {
            species: self.species.ok_or_else(|| missing("species"))?,
            volume: self.volume.ok_or_else(|| missing("volume"))?,
            yield_rate: self.yield_rate.ok_or_else(|| missing("yield_rate"))?,
            purify: self.purify.ok_or_else(|| missing("purify"))?,
            lyo_rate: self.lyo_rate.unwrap_or(0.0),
            in_n: self.in_n.ok_or_else(|| missing("in_n"))?,
            in_p: self.in_p.ok_or_else(|| missing("in_p"))?,
            co2_conc: self.co2_conc.ok_or_else(|| missing("co2_conc"))?,
            co2_flow,
        })
    }
}

fn missing(field: &str) -> AlgaforgeError {
    AlgaforgeError::validation(field, "is required")
}

fn required<'a>(fields: &'a HashMap<String, String>, key: &str) -> Result<&'a str, AlgaforgeError> {
    fields
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| missing(key))
}

fn number(fields: &HashMap<String, String>, key: &str) -> Result<f64, AlgaforgeError> {
    let raw = required(fields, key)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| AlgaforgeError::validation(key, format!("'{}' is not a number", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn form() -> HashMap<String, String> {
        [
            ("volume", "1000"),
            ("yield_rate", "10"),
            ("purify", "0.8"),
            ("lyo", "2"),
            ("species", "Chlorella"),
            ("in_n", "20"),
            ("in_p", "5"),
            ("co2_conc", "5"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn parses_form_with_default_flow() {
        let input = InputBuilder::from_fields(&form()).unwrap().build().unwrap();
        assert_eq!(input.species, "Chlorella");
        assert_eq!(input.lyo_rate, 2.0);
        assert_eq!(input.co2_flow, DEFAULT_CO2_FLOW_L_PER_DAY);
    }

    #[test]
    fn lyo_rate_key_takes_precedence() {
        let mut fields = form();
        fields.insert("lyo_rate".to_string(), "4".to_string());
        let input = InputBuilder::from_fields(&fields).unwrap().build().unwrap();
        assert_eq!(input.lyo_rate, 4.0);
    }

    #[test]
    fn converts_cubic_metre_flow() {
        let mut fields = form();
        fields.insert("co2_flow_m3".to_string(), "2.5".to_string());
        let input = InputBuilder::from_fields(&fields).unwrap().build().unwrap();
        assert_relative_eq!(input.co2_flow, 2500.0);
    }

    #[test]
    fn rejects_both_flow_keys() {
        let mut fields = form();
        fields.insert("co2_flow".to_string(), "1500".to_string());
        fields.insert("co2_flow_m3".to_string(), "1.5".to_string());
        let err = InputBuilder::from_fields(&fields).unwrap_err();
        assert_eq!(err.field(), Some("co2_flow"));
    }

    #[test]
    fn reports_unparseable_and_missing_fields() {
        let mut fields = form();
        fields.insert("purify".to_string(), "eighty".to_string());
        let err = InputBuilder::from_fields(&fields).unwrap_err();
        assert_eq!(err.field(), Some("purify"));
        assert!(err.to_string().contains("'eighty' is not a number"));

        let mut fields = form();
        fields.remove("in_p");
        let err = InputBuilder::from_fields(&fields).unwrap_err();
        assert_eq!(err.field(), Some("in_p"));
    }

    #[test]
    fn configured_default_flow_applies_when_unset() {
        let input = InputBuilder::from_fields(&form())
            .unwrap()
            .with_default_co2_flow(800.0)
            .build()
            .unwrap();
        assert_eq!(input.co2_flow, 800.0);
    }

    #[test]
    fn with_setters_assemble_full_input() {
        let input = InputBuilder::new()
            .with_species("Spirulina")
            .with_volume(250.0)
            .with_yield_rate(12.0)
            .with_purify(0.9)
            .with_lyo_rate(3.0)
            .with_influent(30.0, 4.0)
            .with_co2_conc(10.0)
            .with_co2_flow(Measurement {
                value: 1.5,
                unit: "m3/day".to_string(),
            })
            .build()
            .unwrap();
        assert_eq!(input.species, "Spirulina");
        assert_eq!(input.volume, 250.0);
        assert_eq!(input.lyo_rate, 3.0);
        assert_eq!((input.in_n, input.in_p), (30.0, 4.0));
        assert_relative_eq!(input.co2_flow, 1500.0);
    }

    #[test]
    fn build_requires_species() {
        let err = InputBuilder::new()
            .with_volume(1.0)
            .with_yield_rate(1.0)
            .with_purify(1.0)
            .with_influent(0.0, 0.0)
            .with_co2_conc(0.0)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("species"));
    }
}
