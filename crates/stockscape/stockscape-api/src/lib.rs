//! Stockscape Consumer API
//!
//! Configuration types for the CAPE analysis stages. Every config derives
//! serde traits and has defaults matching the conventional Shiller setup, so
//! an [`AnalysisConfig`] can be loaded from a partial JSON document.

use serde::{Deserialize, Serialize};
use stockscape_spi::{Result, StockscapeError, Summary};

// ============================================================================
// CAPE Configuration
// ============================================================================

/// CAPE calculation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapeConfig {
    /// Length of the trailing earnings window in years.
    pub years: u32,
    /// Summary statistic over the window.
    pub summary: Summary,
}

impl CapeConfig {
    /// Mean earnings over `years` years.
    pub fn new(years: u32) -> Self {
        Self {
            years,
            summary: Summary::Mean,
        }
    }

    /// Earnings summarized by `summary` over `years` years.
    pub fn with_summary(years: u32, summary: Summary) -> Self {
        Self { years, summary }
    }

    /// Window length in months.
    pub fn window_months(&self) -> usize {
        self.years as usize * 12
    }
}

impl Default for CapeConfig {
    fn default() -> Self {
        Self::new(10)
    }
}

// ============================================================================
// Neighbors Configuration
// ============================================================================

/// CAPE-neighbors prediction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborsConfig {
    /// Largest number of neighbors kept per target month.
    pub max_neighbors: usize,
    /// Neighbor counts to report; empty means just `max_neighbors`.
    pub neighbor_counts: Vec<usize>,
    /// Confidence level of the interval around the mean.
    pub confidence_level: f64,
}

impl NeighborsConfig {
    /// Report only `max_neighbors` at the default confidence level.
    pub fn new(max_neighbors: usize) -> Self {
        Self {
            max_neighbors,
            neighbor_counts: Vec::new(),
            confidence_level: 0.95,
        }
    }

    /// Keep `max_neighbors` and report each of `neighbor_counts`.
    pub fn with_counts(max_neighbors: usize, neighbor_counts: Vec<usize>) -> Self {
        Self {
            max_neighbors,
            neighbor_counts,
            confidence_level: 0.95,
        }
    }

    /// Reject a zero maximum and counts or confidence levels out of range.
    pub fn validate(&self) -> Result<()> {
        if self.max_neighbors == 0 {
            return Err(StockscapeError::invalid_parameter(
                "max_neighbors",
                "must be positive",
            ));
        }
        if let Some(&k) = self
            .neighbor_counts
            .iter()
            .find(|&&k| k == 0 || k > self.max_neighbors)
        {
            return Err(StockscapeError::invalid_parameter(
                "neighbor_counts",
                format!("{} is outside 1..={}", k, self.max_neighbors),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(StockscapeError::invalid_parameter(
                "confidence_level",
                "must be strictly between 0 and 1",
            ));
        }
        Ok(())
    }
}

impl Default for NeighborsConfig {
    fn default() -> Self {
        Self::with_counts(20, vec![5, 20])
    }
}

// ============================================================================
// Export Configuration
// ============================================================================

/// Configuration of the UI export snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub cape: CapeConfig,
    /// First horizon (years) exported per record.
    pub min_horizon: u32,
    /// Last horizon (years) exported per record, inclusive.
    pub max_horizon: u32,
    /// Horizon of the warranted-returns curve.
    pub warranted_years: u32,
}

impl ExportConfig {
    /// Default export with horizons `min_horizon..=max_horizon`.
    pub fn with_horizons(min_horizon: u32, max_horizon: u32) -> Self {
        Self {
            min_horizon,
            max_horizon,
            ..Self::default()
        }
    }

    /// Exported horizons in years.
    pub fn horizons(&self) -> std::ops::RangeInclusive<u32> {
        self.min_horizon..=self.max_horizon
    }

    /// Reject a zero or descending horizon range.
    pub fn validate(&self) -> Result<()> {
        if self.min_horizon == 0 || self.min_horizon > self.max_horizon {
            return Err(StockscapeError::invalid_parameter(
                "min_horizon",
                format!(
                    "horizons {}..={} must be positive and ascending",
                    self.min_horizon, self.max_horizon
                ),
            ));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            cape: CapeConfig::default(),
            min_horizon: 10,
            max_horizon: 20,
            warranted_years: 10,
        }
    }
}

// ============================================================================
// Waiting Returns Configuration
// ============================================================================

/// Horizons and wait periods for the cost-of-waiting analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitingConfig {
    pub horizons: Vec<u32>,
    pub waits: Vec<u32>,
}

impl WaitingConfig {
    /// Compare every wait against every horizon.
    pub fn new(horizons: Vec<u32>, waits: Vec<u32>) -> Self {
        Self { horizons, waits }
    }

    /// Every wait must leave at least one year of investment within every horizon.
    pub fn validate(&self) -> Result<()> {
        let (Some(&min_horizon), Some(&max_wait)) =
            (self.horizons.iter().min(), self.waits.iter().max())
        else {
            return Err(StockscapeError::invalid_parameter(
                "waiting",
                "horizons and waits must not be empty",
            ));
        };
        if self.horizons.contains(&0) || self.waits.contains(&0) {
            return Err(StockscapeError::invalid_parameter(
                "waiting",
                "horizons and waits must be at least one year",
            ));
        }
        if min_horizon <= max_wait {
            return Err(StockscapeError::invalid_parameter(
                "waiting.waits",
                format!(
                    "longest wait {} leaves no investment within the shortest horizon {}",
                    max_wait, min_horizon
                ),
            ));
        }
        Ok(())
    }
}

impl Default for WaitingConfig {
    fn default() -> Self {
        Self::new(vec![10, 15, 20], vec![1, 2, 3])
    }
}

// ============================================================================
// Reader Configuration
// ============================================================================

/// Options for the CSV table reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Bond yields in the file are percentages and get divided by 100.
    pub bond_yield_in_percent: bool,
    /// Explicit base price level; the latest CPI value when absent.
    pub base_price_level: Option<f64>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            bond_yield_in_percent: true,
            base_price_level: None,
        }
    }
}

// ============================================================================
// Analysis Configuration
// ============================================================================

/// Aggregate configuration for a full analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub cape: CapeConfig,
    /// Horizon in years of the returns fed to the warranted and neighbors stages.
    pub horizon_years: u32,
    pub neighbors: NeighborsConfig,
    pub export: ExportConfig,
    pub waiting: WaitingConfig,
    pub reader: ReaderConfig,
}

impl AnalysisConfig {
    /// Parse from JSON; absent fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| StockscapeError::invalid_parameter("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every stage's configuration.
    pub fn validate(&self) -> Result<()> {
        if self.cape.years == 0 {
            return Err(StockscapeError::invalid_parameter(
                "cape.years",
                "must be positive",
            ));
        }
        if self.horizon_years == 0 {
            return Err(StockscapeError::invalid_parameter(
                "horizon_years",
                "must be positive",
            ));
        }
        self.neighbors.validate()?;
        self.export.validate()?;
        self.waiting.validate()
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cape: CapeConfig::default(),
            horizon_years: 10,
            neighbors: NeighborsConfig::default(),
            export: ExportConfig::default(),
            waiting: WaitingConfig::default(),
            reader: ReaderConfig::default(),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AnalysisConfig, CapeConfig, ExportConfig, NeighborsConfig, ReaderConfig, WaitingConfig,
    };
    pub use stockscape_spi::{Result, StockscapeError, Summary};
}
