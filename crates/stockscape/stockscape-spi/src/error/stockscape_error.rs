//! Stockscape error types

use crate::model::Month;
use thiserror::Error;

/// Errors raised while building or querying stockscape tables.
///
/// Numeric edge cases (warm-up rows, forward rows past the end of the data,
/// division by zero) are never reported here; they surface as `NaN` values.
#[derive(Error, Debug)]
pub enum StockscapeError {
    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Two series that must share an index do not
    #[error("Index mismatch: {0}")]
    IndexMismatch(String),

    /// A dated sequence skips a month or goes backwards
    #[error("Non-contiguous index: expected {expected}, got {actual}")]
    NonContiguousIndex { expected: Month, actual: Month },

    /// Summary statistic name other than mean or median
    #[error("Unsupported summary statistic: {0}")]
    UnsupportedSummary(String),

    /// Insufficient data points for the operation
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// Input table could not be read
    #[error("Read error: {0}")]
    ReadError(String),

    /// Export snapshot could not be written
    #[error("Export error: {0}")]
    ExportError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StockscapeError {
    /// Shorthand for [`StockscapeError::InvalidParameter`].
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error comes from mismatched shapes or bad parameter values.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. }
                | Self::IndexMismatch(_)
                | Self::NonContiguousIndex { .. }
                | Self::UnsupportedSummary(_)
        )
    }
}
