//! Data models for the CAPE analysis.

mod month;
mod nominal;
mod prediction;
mod series;
mod summary;

pub use month::Month;
pub use nominal::{IeTable, NominalSeries};
pub use prediction::{EstimateTransform, NeighborEstimate, PredictionGroup, PredictionTable};
pub use series::MonthlySeries;
pub use summary::Summary;
