//! Trait contracts for the CAPE analysis.

mod forward_returns;
mod table_reader;

pub use forward_returns::*;
pub use table_reader::*;
