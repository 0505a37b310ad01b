//! Stockscape Core
//!
//! Engines for CAPE analysis of long-run US stock market data: real-value
//! conversion, CAPE, forward returns, warranted returns, the CAPE-neighbors
//! predictor, the cost of waiting, plus the CSV reader, the UI export and
//! reporting helpers.

pub mod analysis;
pub mod cape;
pub mod export;
pub mod neighbors;
pub mod period;
pub mod real;
pub mod reader;
pub mod report;
pub mod returns;
pub mod waiting;
pub mod warranted;

pub use analysis::*;
pub use cape::*;
pub use export::*;
pub use neighbors::*;
pub use period::*;
pub use real::*;
pub use reader::*;
pub use report::*;
pub use returns::*;
pub use waiting::*;
pub use warranted::*;

// Re-export SPI and API types for convenience
pub use stockscape_api::{
    AnalysisConfig, CapeConfig, ExportConfig, NeighborsConfig, ReaderConfig, WaitingConfig,
};
pub use stockscape_spi::{
    EstimateTransform, ForwardReturns, IeTable, Month, MonthlySeries, NeighborEstimate,
    NominalSeries, PredictionGroup, PredictionTable, Result, StockscapeError, Summary,
    TableReader,
};
