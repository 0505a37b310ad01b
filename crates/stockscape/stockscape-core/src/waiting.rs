//! Cost of waiting before investing.
//!
//! For a horizon `h` and a wait `w`, compares investing now for `h` years
//! with holding cash for `w` years (losing inflation) and then investing for
//! the remaining `h - w` years.

use std::collections::BTreeMap;

use stockscape_api::WaitingConfig;
use stockscape_spi::{ForwardReturns, MonthlySeries, Result, StockscapeError};
use tracing::debug;

use crate::real::StockscapeDataset;
use crate::returns::{InflationTable, StockReturnsTable};

/// Waiting returns for one horizon, keyed by wait in years.
#[derive(Debug, Clone)]
pub struct WaitTable {
    pub horizon: u32,
    pub by_wait: BTreeMap<u32, MonthlySeries>,
}

impl WaitTable {
    /// Waiting returns for a wait of `wait` years.
    pub fn get(&self, wait: u32) -> Option<&MonthlySeries> {
        self.by_wait.get(&wait)
    }
}

#[derive(Debug, Clone)]
pub struct WaitingReturns {
    horizons: Vec<u32>,
    waits: Vec<u32>,
    gross: BTreeMap<u32, MonthlySeries>,
    inflation: BTreeMap<u32, MonthlySeries>,
    tables: Vec<WaitTable>,
}

impl WaitingReturns {
    /// Waiting returns for every pair of horizon and wait.
    pub fn compute(dataset: &StockscapeDataset, horizons: &[u32], waits: &[u32]) -> Result<Self> {
        let (Some(&min_horizon), Some(&max_horizon)) = (horizons.iter().min(), horizons.iter().max())
        else {
            return Err(StockscapeError::invalid_parameter("horizons", "must not be empty"));
        };
        let (Some(&min_wait), Some(&max_wait)) = (waits.iter().min(), waits.iter().max()) else {
            return Err(StockscapeError::invalid_parameter("waits", "must not be empty"));
        };
        if min_horizon == 0 || min_wait == 0 {
            return Err(StockscapeError::invalid_parameter(
                "horizons",
                "horizons and waits must be at least one year",
            ));
        }
        if min_horizon <= max_wait {
            return Err(StockscapeError::invalid_parameter(
                "waits",
                format!(
                    "longest wait {} leaves no investment within the shortest horizon {}",
                    max_wait, min_horizon
                ),
            ));
        }

        let mut gross = BTreeMap::new();
        for h in (min_horizon - max_wait)..=max_horizon {
            gross.insert(h, StockReturnsTable::compute(dataset, h)?.gross().clone());
        }
        let mut inflation = BTreeMap::new();
        for &w in waits {
            inflation.insert(w, InflationTable::compute(dataset, w)?.forward_inflation().clone());
        }

        let mut waiting = Self {
            horizons: horizons.to_vec(),
            waits: waits.to_vec(),
            gross,
            inflation,
            tables: Vec::new(),
        };
        waiting.tables = horizons
            .iter()
            .map(|&h| WaitTable {
                horizon: h,
                by_wait: waits
                    .iter()
                    .filter_map(|&w| waiting.horizon_wait_returns(h, w).map(|s| (w, s)))
                    .collect(),
            })
            .collect();

        debug!(
            horizons = ?waiting.horizons,
            waits = ?waiting.waits,
            "computed waiting returns"
        );
        Ok(waiting)
    }

    /// [`WaitingReturns::compute`] with configured horizons and waits.
    pub fn from_config(dataset: &StockscapeDataset, config: &WaitingConfig) -> Result<Self> {
        Self::compute(dataset, &config.horizons, &config.waits)
    }

    /// `(1 - inflation_w) * gross_{h-w}` starting `w` years later, minus
    /// `gross_h` starting now. `None` when `(h, w)` is outside the computed range.
    pub fn horizon_wait_returns(&self, horizon: u32, wait: u32) -> Option<MonthlySeries> {
        let inflation = self.inflation.get(&wait)?;
        let later = self.gross.get(&horizon.checked_sub(wait)?)?;
        let now = self.gross.get(&horizon)?;

        let deferred = later.shift(-12 * wait as i64);
        Some(
            inflation
                .zip_with(&deferred, |i, g| (1.0 - i) * g)
                .zip_with(now, |waited, invested| waited - invested),
        )
    }

    /// Horizons in the order given.
    pub fn horizons(&self) -> &[u32] {
        &self.horizons
    }

    /// Waits in the order given.
    pub fn waits(&self) -> &[u32] {
        &self.waits
    }

    /// One table per horizon, in the order the horizons were given.
    pub fn tables(&self) -> &[WaitTable] {
        &self.tables
    }

    /// Table for `horizon`.
    pub fn table(&self, horizon: u32) -> Option<&WaitTable> {
        self.tables.iter().find(|t| t.horizon == horizon)
    }

    /// Smallest and largest waiting return over every table.
    pub fn diff_limits(&self) -> (f64, f64) {
        self.tables
            .iter()
            .flat_map(|t| t.by_wait.values())
            .fold((f64::NAN, f64::NAN), |(lo, hi), series| {
                (nan_min(lo, series.min()), nan_max(hi, series.max()))
            })
    }
}

fn nan_min(a: f64, b: f64) -> f64 {
    if a.is_nan() {
        b
    } else if b.is_nan() {
        a
    } else {
        a.min(b)
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() {
        b
    } else if b.is_nan() {
        a
    } else {
        a.max(b)
    }
}
