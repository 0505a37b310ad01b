//! Reporting helpers for the DeLong-Shiller redux.
//!
//! A least-squares model of returns against CAPE, grouping of high-CAPE years
//! into periods, and month selections used when annotating charts.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use stockscape_spi::{Month, MonthlySeries, Result, StockscapeError};

/// CAPE level separating "high" from ordinary valuations.
pub const DEFAULT_CAPE_THRESHOLD: f64 = 25.0;

/// Relative spread of the regressor below which the fit is treated as singular.
const SINGULAR_TOLERANCE: f64 = 1e-12;

// ============================================================================
// Linear Model
// ============================================================================

/// Ordinary least squares fit of `dep = intercept + slope * ind`.
///
/// Only months where both series are defined enter the fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    intercept: f64,
    slope: f64,
    n_observations: usize,
    r_squared: f64,
    r_squared_computed: f64,
    predictions: Vec<f64>,
}

impl LinearModel {
    /// Fit and evaluate the model at every point of `pred_range`.
    pub fn fit(ind: &MonthlySeries, dep: &MonthlySeries, pred_range: &[f64]) -> Result<Self> {
        let pairs: Vec<(f64, f64)> = dep
            .defined()
            .map(|(month, y)| (ind.get(month), y))
            .filter(|(x, _)| !x.is_nan())
            .collect();

        if pairs.len() < 2 {
            return Err(StockscapeError::InsufficientData {
                required: 2,
                actual: pairs.len(),
            });
        }

        let n = pairs.len() as f64;
        let sum_x: f64 = pairs.iter().map(|(x, _)| x).sum();
        let sum_y: f64 = pairs.iter().map(|(_, y)| y).sum();
        let sum_xx: f64 = pairs.iter().map(|(x, _)| x * x).sum();
        let sum_xy: f64 = pairs.iter().map(|(x, y)| x * y).sum();

        // n * sum((x - mean)^2), compared against the scale of n * sum(x^2)
        let denominator = n * sum_xx - sum_x * sum_x;
        if denominator <= SINGULAR_TOLERANCE * n * sum_xx {
            return Err(StockscapeError::invalid_parameter(
                "ind",
                "independent variable is constant over the fitted months",
            ));
        }

        let slope = (n * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / n;

        let mean_y = sum_y / n;
        let ss_tot: f64 = pairs.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();
        let ss_res: f64 = pairs
            .iter()
            .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
            .sum();
        let r_squared = if ss_tot > 1e-10 {
            1.0 - ss_res / ss_tot
        } else {
            1.0
        };

        let mut model = Self {
            intercept,
            slope,
            n_observations: pairs.len(),
            r_squared,
            r_squared_computed: f64::NAN,
            predictions: Vec::new(),
        };
        model.predictions = pred_range.iter().map(|&x| model.predict_at(x)).collect();
        model.r_squared_computed = model.recompute_r_squared(ind, dep);
        Ok(model)
    }

    /// R² over every month of `dep`, skipping months without a residual.
    fn recompute_r_squared(&self, ind: &MonthlySeries, dep: &MonthlySeries) -> f64 {
        let dep_values: Vec<f64> = dep.defined().map(|(_, y)| y).collect();
        let dep_mean = dep_values.iter().sum::<f64>() / dep_values.len() as f64;

        let ss_res: f64 = dep
            .defined()
            .map(|(month, y)| y - self.predict_at(ind.get(month)))
            .filter(|r| !r.is_nan())
            .map(|r| r * r)
            .sum();
        let ss_tot: f64 = dep_values.iter().map(|y| (y - dep_mean).powi(2)).sum();
        1.0 - ss_res / ss_tot
    }

    /// Fitted value at `x`.
    pub fn predict_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    /// `[intercept, slope]`
    pub fn params(&self) -> [f64; 2] {
        [self.intercept, self.slope]
    }

    /// Fitted intercept.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Fitted slope.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Months entering the fit.
    pub fn n_observations(&self) -> usize {
        self.n_observations
    }

    /// Predictions over the range given to [`LinearModel::fit`].
    pub fn predictions(&self) -> &[f64] {
        &self.predictions
    }

    /// Value of `ind` where the fitted line crosses zero.
    pub fn x_intercept(&self) -> f64 {
        -self.intercept / self.slope
    }

    /// R² over the fitted months.
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// R² over every defined month of the dependent series.
    pub fn r_squared_computed(&self) -> f64 {
        self.r_squared_computed
    }
}

// ============================================================================
// Periods
// ============================================================================

/// A run of consecutive years, labelled `"first-last"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearPeriod {
    pub years: Vec<i32>,
    pub label: String,
}

impl YearPeriod {
    /// Whether `year` is in the period.
    pub fn contains(&self, year: i32) -> bool {
        self.years.contains(&year)
    }
}

/// Group ascending years into runs of consecutive years.
pub fn periods_from_years(years: &[i32]) -> Vec<YearPeriod> {
    let mut runs: Vec<Vec<i32>> = Vec::new();
    for &year in years {
        match runs.last_mut() {
            Some(run) if run.last().map(|&last| last + 1) == Some(year) => run.push(year),
            _ => runs.push(vec![year]),
        }
    }
    runs.into_iter()
        .map(|years| {
            let label = format!("{}-{}", years[0], years[years.len() - 1]);
            YearPeriod { years, label }
        })
        .collect()
}

/// A month whose CAPE is at or above the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighCapeMonth {
    pub month: Month,
    pub cape: f64,
    /// Label of the high-CAPE period containing the month's year, if any.
    pub period: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSplit {
    pub above: Vec<HighCapeMonth>,
    /// Months whose year belongs to no high-CAPE period.
    pub below: Vec<Month>,
    pub periods: Vec<YearPeriod>,
}

/// Split months into those at or above a CAPE threshold and those below.
///
/// Years with more than one month at or above the threshold are grouped into
/// periods of consecutive years. A month is "below" when its year is in no
/// such period, whatever its own CAPE.
pub fn split_cape_threshold_years(cape: &MonthlySeries, threshold: f64) -> ThresholdSplit {
    let high: Vec<(Month, f64)> = cape.defined().filter(|&(_, c)| c >= threshold).collect();

    let mut per_year: BTreeMap<i32, usize> = BTreeMap::new();
    for (month, _) in &high {
        *per_year.entry(month.year()).or_default() += 1;
    }
    let years: Vec<i32> = per_year
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(year, _)| year)
        .collect();
    let periods = periods_from_years(&years);

    let period_of = |year: i32| periods.iter().find(|p| p.contains(year));
    let above = high
        .iter()
        .map(|&(month, cape)| HighCapeMonth {
            month,
            cape,
            period: period_of(month.year()).map(|p| p.label.clone()),
        })
        .collect();
    let below = cape
        .months()
        .filter(|month| period_of(month.year()).is_none())
        .collect();

    ThresholdSplit {
        above,
        below,
        periods,
    }
}

/// Split months into those DeLong analyzed (before June 2004) and those since.
pub fn split_to_and_since_delong<I>(months: I) -> (Vec<Month>, Vec<Month>)
where
    I: IntoIterator<Item = Month>,
{
    months
        .into_iter()
        .partition(|month| (month.year(), month.month()) < (2004, 6))
}

// ============================================================================
// Month selections
// ============================================================================

/// Months in which any of `series` is negative, ascending and unique.
pub fn loss_months(series: &[&MonthlySeries]) -> Vec<Month> {
    series
        .iter()
        .flat_map(|s| s.defined().filter(|&(_, v)| v < 0.0).map(|(month, _)| month))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Months where `a` exceeds `b`.
pub fn inversion_months(a: &MonthlySeries, b: &MonthlySeries) -> Vec<Month> {
    a.zip_with(b, |x, y| if x > y { 1.0 } else { 0.0 })
        .iter()
        .filter(|&(_, flag)| flag > 0.0)
        .map(|(month, _)| month)
        .collect()
}

/// Last month with a value, formatted like `"may '17"`.
pub fn latest_label(series: &MonthlySeries) -> Option<String> {
    let (month, _) = series.last_defined()?;
    let day = month.first_day()?;
    Some(day.format("%b '%y").to_string().to_lowercase())
}
