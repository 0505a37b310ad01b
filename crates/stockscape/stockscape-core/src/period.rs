//! Per-period return conversions for a fixed horizon.
//!
//! None of these conversions fail: non-finite input (and a non-positive CAPE
//! for [`PeriodUtils::warranted`]) yields `NaN`.

use stockscape_spi::{MonthlySeries, Result, StockscapeError};

/// Conversions between annual rates and cumulative returns over `years`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodUtils {
    years: u32,
}

impl PeriodUtils {
    /// Conversions over `years` years; zero years is rejected.
    pub fn new(years: u32) -> Result<Self> {
        if years == 0 {
            return Err(StockscapeError::invalid_parameter(
                "years",
                "horizon must be at least one year",
            ));
        }
        Ok(Self { years })
    }

    /// Horizon in years.
    pub fn years(&self) -> u32 {
        self.years
    }

    /// Horizon in months.
    pub fn months(&self) -> usize {
        self.years as usize * 12
    }

    /// Annual rate equivalent to a cumulative return: `(1 + gross)^(1/years) - 1`.
    pub fn annualized(&self, gross: f64) -> f64 {
        if !gross.is_finite() {
            return f64::NAN;
        }
        (1.0 + gross).powf(1.0 / self.years as f64) - 1.0
    }

    /// Cumulative return of an annual rate: `(1 + rate)^years - 1`.
    pub fn gross(&self, rate: f64) -> f64 {
        if !rate.is_finite() {
            return f64::NAN;
        }
        (1.0 + rate).powi(self.years as i32) - 1.0
    }

    /// Cumulative return implied by earning yield `1 / cape` every year.
    pub fn warranted(&self, cape: f64) -> f64 {
        if !cape.is_finite() || cape <= 0.0 {
            return f64::NAN;
        }
        (1.0 + 1.0 / cape).powi(self.years as i32) - 1.0
    }

    /// [`PeriodUtils::annualized`] for every month.
    pub fn annualized_series(&self, gross: &MonthlySeries) -> MonthlySeries {
        gross.map(|g| self.annualized(g))
    }

    /// [`PeriodUtils::gross`] for every month.
    pub fn gross_series(&self, rate: &MonthlySeries) -> MonthlySeries {
        rate.map(|r| self.gross(r))
    }

    /// [`PeriodUtils::warranted`] for every month.
    pub fn warranted_series(&self, cape: &MonthlySeries) -> MonthlySeries {
        cape.map(|c| self.warranted(c))
    }

    /// [`PeriodUtils::annualized`] for every element.
    pub fn annualized_slice(&self, gross: &[f64]) -> Vec<f64> {
        gross.iter().map(|&g| self.annualized(g)).collect()
    }

    /// [`PeriodUtils::gross`] for every element.
    pub fn gross_slice(&self, rate: &[f64]) -> Vec<f64> {
        rate.iter().map(|&r| self.gross(r)).collect()
    }

    /// [`PeriodUtils::warranted`] for every element.
    pub fn warranted_slice(&self, cape: &[f64]) -> Vec<f64> {
        cape.iter().map(|&c| self.warranted(c)).collect()
    }

    /// The annualization as a transform over ordered prediction statistics.
    pub fn annualize_estimate(&self, stats: [f64; 5]) -> [f64; 5] {
        stats.map(|g| self.annualized(g))
    }
}
