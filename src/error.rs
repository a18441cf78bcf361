//! Error types for gauge configuration and rendering

use thiserror::Error;

/// Errors that can occur while laying out or driving a gauge
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaugeError {
    #[error("Config error: need at least 2 ranges, got {0}")]
    TooFewRanges(usize),

    #[error("Config error: expected {expected} colors for {ranges} ranges, got {actual}")]
    ColorCountMismatch {
        ranges: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Config error: degenerate range (min == max == {0})")]
    DegenerateRange(f64),

    #[error("Config error: '{0}' is not a finite number")]
    NonFinite(&'static str),

    #[error("Config error: marker unit '{0}' must be a finite non-zero number")]
    InvalidMarkerUnit(&'static str),

    #[error("Needle value {0} is not a finite number")]
    NonFiniteValue(f64),
}

impl GaugeError {
    /// Whether this error comes from the configuration (as opposed to a rejected value)
    pub fn is_config_error(&self) -> bool {
        !matches!(self, GaugeError::NonFiniteValue(_))
    }
}

/// Errors raised by the window host and rasterizer
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Font error: {0}")]
    Font(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
