//! Error module containing error types and result aliases

mod stockscape_error;

pub use stockscape_error::StockscapeError;

/// Result type for stockscape operations
pub type Result<T> = std::result::Result<T, StockscapeError>;
