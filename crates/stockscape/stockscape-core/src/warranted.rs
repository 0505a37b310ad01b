//! Returns warranted by CAPE under an efficient-market reading, and their
//! errors against realized returns.

use stockscape_spi::{ForwardReturns, MonthlySeries, Result};
use tracing::debug;

use crate::cape::CapeTable;
use crate::period::PeriodUtils;

/// Number of points on a warranted-returns curve.
pub const CURVE_POINTS: usize = 50;

/// Warranted returns and their errors, indexed over the union of the CAPE and
/// realized-returns ranges.
#[derive(Debug, Clone)]
pub struct WarrantedReturnsTable {
    period: PeriodUtils,
    cape: MonthlySeries,
    gross_warranted_return: MonthlySeries,
    warranted_return: MonthlySeries,
    gross_error: MonthlySeries,
    annualized_error: MonthlySeries,
}

impl WarrantedReturnsTable {
    /// The horizon is taken from `returns`, so warranted and realized
    /// returns are annualized over the same period.
    pub fn compute<R>(cape: &CapeTable, returns: &R) -> Result<Self>
    where
        R: ForwardReturns + ?Sized,
    {
        let period = PeriodUtils::new(returns.horizon_years())?;

        let cape = cape.series().zip_with(returns.gross(), |c, _| c);
        let gross_warranted_return = period.warranted_series(&cape);
        let warranted_return = period.annualized_series(&gross_warranted_return);
        let gross_error = returns
            .gross()
            .zip_with(&gross_warranted_return, |realized, warranted| realized - warranted);
        let annualized_error = returns
            .annualized()
            .zip_with(&warranted_return, |realized, warranted| realized - warranted);

        debug!(
            rows = cape.len(),
            years = period.years(),
            "computed warranted returns table"
        );

        Ok(Self {
            period,
            cape,
            gross_warranted_return,
            warranted_return,
            gross_error,
            annualized_error,
        })
    }

    /// Conversions over the returns' horizon.
    pub fn period(&self) -> PeriodUtils {
        self.period
    }

    /// Cumulative warranted return over the horizon.
    pub fn gross_warranted_return(&self) -> &MonthlySeries {
        &self.gross_warranted_return
    }

    /// Annualized warranted return.
    pub fn warranted_return(&self) -> &MonthlySeries {
        &self.warranted_return
    }

    /// Realized minus warranted cumulative return.
    pub fn gross_error(&self) -> &MonthlySeries {
        &self.gross_error
    }

    /// Realized minus warranted annualized return.
    pub fn annualized_error(&self) -> &MonthlySeries {
        &self.annualized_error
    }

    /// Gross warranted return over an even CAPE grid spanning the observed range.
    pub fn gross_warranted_curve(&self) -> (Vec<f64>, Vec<f64>) {
        let capes = self.cape_grid();
        let values = self.period.warranted_slice(&capes);
        (capes, values)
    }

    /// Annualized warranted return over an even CAPE grid spanning the observed range.
    pub fn warranted_curve(&self) -> (Vec<f64>, Vec<f64>) {
        let (capes, gross) = self.gross_warranted_curve();
        let values = self.period.annualized_slice(&gross);
        (capes, values)
    }

    /// Even grid over the finite CAPE values; empty when there are none.
    fn cape_grid(&self) -> Vec<f64> {
        let (lo, hi) = self
            .cape
            .values()
            .iter()
            .filter(|c| c.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| {
                (lo.min(c), hi.max(c))
            });
        if lo > hi {
            return Vec::new();
        }
        let step = (hi - lo) / (CURVE_POINTS - 1) as f64;
        let mut grid: Vec<f64> = (0..CURVE_POINTS).map(|i| lo + step * i as f64).collect();
        grid[CURVE_POINTS - 1] = hi;
        grid
    }
}
