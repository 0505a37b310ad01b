//! Stockscape Facade
//!
//! Unified re-exports for the CAPE analysis stack:
//! - `stockscape_spi` - errors, months and series, prediction results, contracts
//! - `stockscape_api` - serde configuration with defaults
//! - `stockscape_core` - engines, CSV reader, UI export, reporting helpers

// Re-export everything from SPI (traits, errors, types)
pub use stockscape_spi::*;

// Re-export everything from API (configs)
pub use stockscape_api::*;

// Re-export everything from Core (implementations)
pub use stockscape_core::*;

/// Prelude for the common analysis workflow.
pub mod prelude {
    pub use stockscape_api::{AnalysisConfig, ExportConfig, NeighborsConfig};
    pub use stockscape_core::{
        load_dataset, load_dataset_from, Analysis, CapeNeighborsEstimator, CapeTable,
        ShillerCsvReader, StockReturnsTable, StockscapeDataset, UiData, WarrantedReturnsTable,
    };
    pub use stockscape_spi::{ForwardReturns, Month, Result, StockscapeError, TableReader};
}
