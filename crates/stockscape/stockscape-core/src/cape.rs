//! Cyclically-adjusted price/earnings ratio.

use stockscape_api::CapeConfig;
use stockscape_spi::{Month, MonthlySeries, Result, StockscapeError, Summary};
use tracing::debug;

use crate::real::RealSeriesTable;

/// CAPE per month, starting `window_months` after the real table.
///
/// The earnings summary at month M covers the window ending at M-1, so a
/// month's CAPE never uses that month's own earnings.
#[derive(Debug, Clone)]
pub struct CapeTable {
    cape: MonthlySeries,
    window_months: usize,
    summary: Summary,
}

impl CapeTable {
    /// CAPE with earnings summarized over `window_months` months.
    pub fn compute(real: &RealSeriesTable, window_months: usize, summary: Summary) -> Result<Self> {
        if window_months == 0 {
            return Err(StockscapeError::invalid_parameter(
                "window_months",
                "must be positive",
            ));
        }

        let trailing = real
            .earnings()
            .rolling(window_months, 1, |window| summary.apply(window));
        let lagged = trailing.shift(1).drop_leading(window_months);
        let price = real.price().drop_leading(window_months);
        let cape = price.zip_with(&lagged, price_earnings_ratio);

        debug!(
            rows = cape.len(),
            window_months,
            summary = %summary,
            "computed CAPE table"
        );

        Ok(Self {
            cape,
            window_months,
            summary,
        })
    }

    /// [`CapeTable::compute`] with the configured window and summary.
    pub fn from_config(real: &RealSeriesTable, config: &CapeConfig) -> Result<Self> {
        Self::compute(real, config.window_months(), config.summary)
    }

    /// CAPE per month; `NaN` where undefined.
    pub fn series(&self) -> &MonthlySeries {
        &self.cape
    }

    /// CAPE at `month`; `NaN` outside the table.
    pub fn get(&self, month: Month) -> f64 {
        self.cape.get(month)
    }

    /// Earnings window in months.
    pub fn window_months(&self) -> usize {
        self.window_months
    }

    /// Earnings summary statistic.
    pub fn summary(&self) -> Summary {
        self.summary
    }
}

/// `price / earnings`, undefined for zero earnings and any non-finite quotient.
fn price_earnings_ratio(price: f64, earnings: f64) -> f64 {
    if earnings == 0.0 {
        return f64::NAN;
    }
    let ratio = price / earnings;
    if ratio.is_finite() {
        ratio
    } else {
        f64::NAN
    }
}
