use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlgaforgeError {
    #[error("Invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Species '{0}' not found in the coefficient table")]
    UnknownSpecies(String),

    #[error("Computation failed: {message}")]
    Computation { message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error for file '{0}': {1}")]
    FileIO(String, #[source] std::io::Error),

    #[error("Failed to parse YAML from '{0}': {1}")]
    YamlParsing(String, #[source] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Failed to process CSV file '{0}': {1}")]
    CsvError(String, #[source] csv::Error),
}

impl AlgaforgeError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's input rather than by the calculator
    /// or its environment.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::UnknownSpecies(_))
    }

    /// The offending input field, for input errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            Self::UnknownSpecies(_) => Some("species"),
            _ => None,
        }
    }
}
