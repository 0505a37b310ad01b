//! CAPE-neighbors prediction results.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StockscapeError};
use crate::model::Month;

/// Mapping applied to the ordered statistics `[min, ci_low, estimate,
/// ci_high, max]` before they are stored. The output keeps the same order.
pub type EstimateTransform<'a> = &'a dyn Fn([f64; 5]) -> [f64; 5];

/// Summary of the target values found at a month's nearest CAPE neighbors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NeighborEstimate {
    pub min: f64,
    /// Lower bound of the confidence interval around the mean
    pub ci_low: f64,
    /// Mean of the neighbor values
    pub estimate: f64,
    /// Upper bound of the confidence interval around the mean
    pub ci_high: f64,
    pub max: f64,
}

impl NeighborEstimate {
    /// All statistics undefined.
    pub fn undefined() -> Self {
        Self::from_array([f64::NAN; 5])
    }

    /// From ordered statistics `[min, ci_low, estimate, ci_high, max]`.
    pub fn from_array(stats: [f64; 5]) -> Self {
        let [min, ci_low, estimate, ci_high, max] = stats;
        Self {
            min,
            ci_low,
            estimate,
            ci_high,
            max,
        }
    }

    /// Ordered statistics `[min, ci_low, estimate, ci_high, max]`.
    pub fn to_array(&self) -> [f64; 5] {
        [self.min, self.ci_low, self.estimate, self.ci_high, self.max]
    }

    /// Whether both confidence bounds are defined.
    pub fn has_interval(&self) -> bool {
        !self.ci_low.is_nan() && !self.ci_high.is_nan()
    }
}

/// Estimates for every target month at one neighbor count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionGroup {
    pub neighbors: usize,
    pub estimates: Vec<NeighborEstimate>,
}

/// Predictions for the months whose target value is unknown.
///
/// Holds one [`PredictionGroup`] per requested neighbor count, ordered by
/// count. With a single count the table is flat; with several it is grouped
/// by count first and statistic second.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionTable {
    label: String,
    months: Vec<Month>,
    groups: Vec<PredictionGroup>,
}

impl PredictionTable {
    /// `months` must be strictly ascending and every group must hold one
    /// estimate per month.
    pub fn new(
        label: impl Into<String>,
        months: Vec<Month>,
        groups: Vec<PredictionGroup>,
    ) -> Result<Self> {
        if let Some(pair) = months.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(StockscapeError::invalid_parameter(
                "months",
                format!("{} does not follow {}", pair[1], pair[0]),
            ));
        }
        if let Some(group) = groups.iter().find(|g| g.estimates.len() != months.len()) {
            return Err(StockscapeError::IndexMismatch(format!(
                "group of {} neighbors holds {} estimates for {} months",
                group.neighbors,
                group.estimates.len(),
                months.len()
            )));
        }
        Ok(Self {
            label: label.into(),
            months,
            groups,
        })
    }

    /// Name of the predicted quantity.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Target months, ascending.
    pub fn months(&self) -> &[Month] {
        &self.months
    }

    /// One group per neighbor count, ordered by count.
    pub fn groups(&self) -> &[PredictionGroup] {
        &self.groups
    }

    /// Whether the table holds more than one neighbor count.
    pub fn is_grouped(&self) -> bool {
        self.groups.len() > 1
    }

    /// Neighbor counts, ascending.
    pub fn neighbor_counts(&self) -> Vec<usize> {
        self.groups.iter().map(|g| g.neighbors).collect()
    }

    /// Group for `neighbors` neighbors.
    pub fn group(&self, neighbors: usize) -> Option<&PredictionGroup> {
        self.groups.iter().find(|g| g.neighbors == neighbors)
    }

    /// Estimate at `month` from the first (or only) group.
    pub fn get(&self, month: Month) -> Option<&NeighborEstimate> {
        let index = self.months.binary_search(&month).ok()?;
        self.groups.first().and_then(|g| g.estimates.get(index))
    }

    /// Estimate at `month` using `neighbors` neighbors.
    pub fn get_for(&self, neighbors: usize, month: Month) -> Option<&NeighborEstimate> {
        let index = self.months.binary_search(&month).ok()?;
        self.group(neighbors).and_then(|g| g.estimates.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(year: i32, month: u32) -> Month {
        Month::new(year, month).unwrap()
    }

    fn estimate(center: f64) -> NeighborEstimate {
        NeighborEstimate::from_array([center - 2.0, center - 1.0, center, center + 1.0, center + 2.0])
    }

    #[test]
    fn test_array_round_trip_keeps_order() {
        let e = estimate(10.0);
        assert_eq!(e.to_array(), [8.0, 9.0, 10.0, 11.0, 12.0]);
        assert!(e.has_interval());
        assert!(!NeighborEstimate::undefined().has_interval());
    }

    #[test]
    fn test_single_group_lookup() {
        let table = PredictionTable::new(
            "returns",
            vec![m(2017, 4), m(2017, 5)],
            vec![PredictionGroup {
                neighbors: 5,
                estimates: vec![estimate(1.0), estimate(2.0)],
            }],
        )
        .unwrap();
        assert!(!table.is_grouped());
        assert_eq!(table.label(), "returns");
        assert_eq!(table.get(m(2017, 5)).unwrap().estimate, 2.0);
        assert!(table.get(m(2017, 6)).is_none());
    }

    #[test]
    fn test_months_must_ascend() {
        let group = || PredictionGroup {
            neighbors: 5,
            estimates: vec![estimate(1.0), estimate(2.0)],
        };
        let err = PredictionTable::new("r", vec![m(2017, 5), m(2017, 4)], vec![group()]).unwrap_err();
        assert!(err.to_string().contains("2017-04 does not follow 2017-05"));
        assert!(PredictionTable::new("r", vec![m(2017, 5), m(2017, 5)], vec![group()]).is_err());
    }

    #[test]
    fn test_group_length_must_match_months() {
        let err = PredictionTable::new(
            "r",
            vec![m(2017, 4), m(2017, 5)],
            vec![PredictionGroup {
                neighbors: 5,
                estimates: vec![estimate(1.0)],
            }],
        )
        .unwrap_err();
        assert!(matches!(err, StockscapeError::IndexMismatch(_)));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_grouped_lookup() {
        let table = PredictionTable::new(
            "returns",
            vec![m(2017, 5)],
            vec![
                PredictionGroup {
                    neighbors: 5,
                    estimates: vec![estimate(1.0)],
                },
                PredictionGroup {
                    neighbors: 20,
                    estimates: vec![estimate(3.0)],
                },
            ],
        )
        .unwrap();
        assert!(table.is_grouped());
        assert_eq!(table.neighbor_counts(), vec![5, 20]);
        assert_eq!(table.get_for(20, m(2017, 5)).unwrap().estimate, 3.0);
        assert!(table.get_for(10, m(2017, 5)).is_none());
    }
}
