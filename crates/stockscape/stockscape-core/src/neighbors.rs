//! CAPE-neighbors empirical predictor.
//!
//! For a month whose forward return is still unknown, find the historical
//! months with the most similar CAPE whose return is known, and summarize
//! those returns. The month-by-month CAPE difference matrix is built once per
//! [`CapeNeighborsEstimator`] and shared by every predictor fitted from it.
//!
//! # Example
//!
//! ```rust,ignore
//! let estimator = CapeNeighborsEstimator::new(&cape);
//! let predictor = estimator.fit(stock.gross(), "stock_10y", 20)?;
//! let period = stock.period();
//! let annualize = |stats: [f64; 5]| period.annualize_estimate(stats);
//! let transform: EstimateTransform = &annualize;
//! let table = predictor.predict(&[5, 20], Some(transform), None)?;
//! ```

use statrs::distribution::{ContinuousCDF, StudentsT};
use stockscape_spi::{
    EstimateTransform, Month, MonthlySeries, NeighborEstimate, PredictionGroup, PredictionTable,
    Result, StockscapeError,
};
use tracing::{debug, warn};

use crate::cape::CapeTable;

/// Confidence level used unless a predictor is given another one.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

// ============================================================================
// Estimator
// ============================================================================

/// Pairwise CAPE differences over every month with a defined CAPE.
#[derive(Debug, Clone)]
pub struct CapeNeighborsEstimator {
    months: Vec<Month>,
    capes: Vec<f64>,
    /// Row-major `n * n`; entry `(r, c)` is `cape[r] - cape[c]`.
    diff: Vec<f64>,
}

impl CapeNeighborsEstimator {
    /// Build the difference matrix over the months whose CAPE is finite.
    pub fn new(cape: &CapeTable) -> Self {
        let (months, capes): (Vec<Month>, Vec<f64>) = cape
            .series()
            .defined()
            .filter(|(_, c)| c.is_finite())
            .unzip();

        let n = capes.len();
        let mut diff = Vec::with_capacity(n * n);
        for &row in &capes {
            diff.extend(capes.iter().map(|&col| row - col));
        }

        debug!(months = n, "built CAPE difference matrix");
        Self {
            months,
            capes,
            diff,
        }
    }

    /// Months with a defined CAPE, ascending.
    pub fn months(&self) -> &[Month] {
        &self.months
    }

    /// Number of months in the matrix.
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Whether no month has a CAPE.
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    fn row(&self, month: Month) -> Option<usize> {
        self.months.binary_search(&month).ok()
    }

    /// CAPE at `month`, if it is part of the matrix.
    pub fn cape(&self, month: Month) -> Option<f64> {
        self.row(month).map(|r| self.capes[r])
    }

    /// `cape(a) - cape(b)`, when both months have a CAPE.
    pub fn difference(&self, a: Month, b: Month) -> Option<f64> {
        let (r, c) = (self.row(a)?, self.row(b)?);
        Some(self.diff[r * self.months.len() + c])
    }

    /// Select up to `max_neighbors` neighbors for every month where `source`
    /// is undefined.
    ///
    /// Candidates are the months whose `source` value is known, so a month
    /// that needs a prediction never serves as a neighbor. Candidates are
    /// ranked by absolute CAPE difference; ties keep chronological order.
    pub fn fit(
        &self,
        source: &MonthlySeries,
        label: impl Into<String>,
        max_neighbors: usize,
    ) -> Result<CapeNeighborsPredictor> {
        if max_neighbors == 0 {
            return Err(StockscapeError::invalid_parameter(
                "max_neighbors",
                "must be positive",
            ));
        }
        let label = label.into();
        let n = self.months.len();

        let candidates: Vec<(usize, f64)> = self
            .months
            .iter()
            .enumerate()
            .map(|(r, &month)| (r, source.get(month)))
            .filter(|(_, value)| !value.is_nan())
            .collect();

        let mut missing_cape = 0usize;
        let neighbor_sets: Vec<NeighborSet> = source
            .iter()
            .filter(|(_, value)| value.is_nan())
            .map(|(target, _)| {
                let Some(row) = self.row(target) else {
                    missing_cape += 1;
                    return NeighborSet {
                        target,
                        neighbors: Vec::new(),
                    };
                };

                let mut ranked: Vec<Neighbor> = candidates
                    .iter()
                    .map(|&(c, value)| Neighbor {
                        month: self.months[c],
                        distance: self.diff[row * n + c].abs(),
                        value,
                    })
                    .collect();
                ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
                ranked.truncate(max_neighbors);

                NeighborSet {
                    target,
                    neighbors: ranked,
                }
            })
            .collect();

        if missing_cape > 0 {
            warn!(
                label = %label,
                targets = missing_cape,
                "prediction targets without a CAPE have no neighbors"
            );
        }
        debug!(
            label = %label,
            targets = neighbor_sets.len(),
            candidates = candidates.len(),
            max_neighbors,
            "fitted CAPE neighbors predictor"
        );

        Ok(CapeNeighborsPredictor {
            label,
            max_neighbors,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            neighbor_sets,
        })
    }
}

// ============================================================================
// Neighbor sets
// ============================================================================

/// A historical month chosen as a neighbor of a target month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub month: Month,
    /// Absolute CAPE difference to the target.
    pub distance: f64,
    /// Source value observed at the neighbor.
    pub value: f64,
}

/// Neighbors of one target month, nearest first.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborSet {
    pub target: Month,
    pub neighbors: Vec<Neighbor>,
}

// ============================================================================
// Predictor
// ============================================================================

/// Neighbor sets for every target month of one source series.
#[derive(Debug, Clone)]
pub struct CapeNeighborsPredictor {
    label: String,
    max_neighbors: usize,
    confidence_level: f64,
    neighbor_sets: Vec<NeighborSet>,
}

impl CapeNeighborsPredictor {
    /// Use `level` for the confidence interval, strictly between 0 and 1.
    pub fn with_confidence_level(mut self, level: f64) -> Result<Self> {
        if !(level > 0.0 && level < 1.0) {
            return Err(StockscapeError::invalid_parameter(
                "confidence_level",
                "must be strictly between 0 and 1",
            ));
        }
        self.confidence_level = level;
        Ok(self)
    }

    /// Name of the source series.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Neighbors kept per target.
    pub fn max_neighbors(&self) -> usize {
        self.max_neighbors
    }

    /// Confidence level of the interval.
    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    /// Months whose source value is unknown, ascending.
    pub fn targets(&self) -> Vec<Month> {
        self.neighbor_sets.iter().map(|set| set.target).collect()
    }

    /// Neighbor set of every target, ascending by target.
    pub fn neighbor_sets(&self) -> &[NeighborSet] {
        &self.neighbor_sets
    }

    /// Neighbor set of `target`.
    pub fn neighbors_of(&self, target: Month) -> Option<&NeighborSet> {
        self.neighbor_sets
            .binary_search_by(|set| set.target.cmp(&target))
            .ok()
            .map(|i| &self.neighbor_sets[i])
    }

    /// Summarize the nearest neighbors' values for every target.
    ///
    /// One group is produced per distinct count in `neighbor_counts`
    /// (`max_neighbors` when empty), ordered by count. `transform` maps the
    /// ordered statistics `[min, ci_low, estimate, ci_high, max]` of each
    /// estimate; `label` overrides the predictor's label.
    pub fn predict(
        &self,
        neighbor_counts: &[usize],
        transform: Option<EstimateTransform<'_>>,
        label: Option<&str>,
    ) -> Result<PredictionTable> {
        let mut counts = if neighbor_counts.is_empty() {
            vec![self.max_neighbors]
        } else {
            neighbor_counts.to_vec()
        };
        if let Some(&k) = counts.iter().find(|&&k| k == 0 || k > self.max_neighbors) {
            return Err(StockscapeError::invalid_parameter(
                "neighbor_counts",
                format!("{} is outside 1..={}", k, self.max_neighbors),
            ));
        }
        counts.sort_unstable();
        counts.dedup();

        let t_level = (1.0 + self.confidence_level) / 2.0;
        let groups = counts
            .iter()
            .map(|&k| {
                let estimates = self
                    .neighbor_sets
                    .iter()
                    .map(|set| {
                        let values: Vec<f64> =
                            set.neighbors.iter().take(k).map(|nb| nb.value).collect();
                        let estimate = summarize(&values, t_level);
                        match transform {
                            Some(f) => NeighborEstimate::from_array(f(estimate.to_array())),
                            None => estimate,
                        }
                    })
                    .collect();
                PredictionGroup {
                    neighbors: k,
                    estimates,
                }
            })
            .collect();

        let label = label.unwrap_or(&self.label);
        debug!(label, counts = ?counts, targets = self.neighbor_sets.len(), "predicted from CAPE neighbors");
        PredictionTable::new(label, self.targets(), groups)
    }
}

/// Mean, extremes and a Student's t interval around the mean.
fn summarize(values: &[f64], t_level: f64) -> NeighborEstimate {
    let n = values.len();
    if n == 0 {
        return NeighborEstimate::undefined();
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (ci_low, ci_high) = if n >= 2 {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let sem = variance.sqrt() / (n as f64).sqrt();
        match t_quantile(t_level, (n - 1) as f64) {
            Some(t) if sem > 0.0 && sem.is_finite() => (mean - t * sem, mean + t * sem),
            _ => (f64::NAN, f64::NAN),
        }
    } else {
        (f64::NAN, f64::NAN)
    };

    NeighborEstimate {
        min,
        ci_low,
        estimate: mean,
        ci_high,
        max,
    }
}

fn t_quantile(p: f64, freedom: f64) -> Option<f64> {
    StudentsT::new(0.0, 1.0, freedom)
        .ok()
        .map(|dist| dist.inverse_cdf(p))
}
