//! Central-tendency statistic for the trailing earnings window.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StockscapeError;

/// How trailing earnings are summarized when computing CAPE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Summary {
    #[default]
    Mean,
    Median,
}

impl Summary {
    /// Summarize the defined values of `window`; `NaN` when there are none.
    pub fn apply(&self, window: &[f64]) -> f64 {
        let mut defined: Vec<f64> = window.iter().copied().filter(|v| !v.is_nan()).collect();
        if defined.is_empty() {
            return f64::NAN;
        }
        match self {
            Summary::Mean => defined.iter().sum::<f64>() / defined.len() as f64,
            Summary::Median => {
                defined.sort_by(|a, b| a.total_cmp(b));
                let mid = defined.len() / 2;
                if defined.len() % 2 == 0 {
                    (defined[mid - 1] + defined[mid]) / 2.0
                } else {
                    defined[mid]
                }
            }
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::Mean => write!(f, "mean"),
            Summary::Median => write!(f, "median"),
        }
    }
}

impl FromStr for Summary {
    type Err = StockscapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(Summary::Mean),
            "median" => Ok(Summary::Median),
            other => Err(StockscapeError::UnsupportedSummary(other.to_string())),
        }
    }
}
