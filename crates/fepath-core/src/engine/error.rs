use thiserror::Error;

use super::config::ConfigError;
use crate::core::numeric::NumericError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Not enough data for integration: found {found} point(s), at least {required} required")]
    InsufficientData { found: usize, required: usize },

    #[error("Numerical routine failed: {source}")]
    Numeric {
        #[from]
        source: NumericError,
    },

    #[error("Atom '{label}' not found in the initial structure")]
    AtomNotFound { label: String },

    #[error("Initial and final structures do not match: {0}")]
    StructureMismatch(String),

    #[error(
        "The {which} structure uses Cartesian coordinates; only Direct (fractional) coordinates can be interpolated"
    )]
    UnsupportedCoordinates { which: &'static str },

    #[error("Failed to write image {index:02}: {source}")]
    ImageOutput {
        index: usize,
        #[source]
        source: std::io::Error,
    },
}
