//! Stockscape Service Provider Interface
//!
//! Defines the error taxonomy, the month-indexed data model and the trait
//! contracts shared by every stage of the CAPE analysis.

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::*;
pub use error::{Result, StockscapeError};
pub use model::*;
