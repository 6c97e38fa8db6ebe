use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Rejected startup configuration.
///
/// Checked once when a [`Localizer`](crate::localizer::Localizer) is built,
/// never per frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("expected {name} to be finite and non-negative but got: {value}")]
    NegativeOrNonFinite { name: &'static str, value: f64 },
    #[error("expected {name} to be finite but got: {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("expected max_correspondence_radius greater than zero but got: {value}")]
    EmptyGate { value: f64 },
}
