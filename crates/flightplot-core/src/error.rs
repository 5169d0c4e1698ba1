//! Error type shared by the flightplot crates.

use thiserror::Error;

/// Failures surfaced while reading sequences, templates or style files.
#[derive(Debug, Error)]
pub enum FlightPlotError {
    /// A named channel or label column was requested but is not present.
    #[error("column '{0}' is not present in the flight sequence")]
    MissingColumn(String),

    /// An input array does not line up with the sequence it belongs to.
    #[error("{what}: expected {expected} values, found {found}")]
    LengthMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    /// A Wavefront OBJ template could not be parsed.
    #[error("OBJ line {line}: {message}")]
    Obj { line: usize, message: String },

    /// A style configuration could not be parsed.
    #[error("invalid style configuration: {0}")]
    InvalidStyle(String),

    /// A named section matches no row of its label column.
    #[error("no rows labelled '{name}' in column '{label}'")]
    UnknownSection { label: String, name: String },

    #[error("invalid flight plan: {0}")]
    InvalidPlan(String),
}

pub type Result<T> = std::result::Result<T, FlightPlotError>;
