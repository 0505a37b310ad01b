//! Real-value conversion and the shared dataset bundle.

use stockscape_spi::{IeTable, MonthlySeries, NominalSeries, Result, StockscapeError};
use tracing::debug;

/// Stock data in real units (today's dollars when the base price level is
/// the latest CPI), with the real monthly total return.
#[derive(Debug, Clone)]
pub struct RealSeriesTable {
    price: MonthlySeries,
    dividend: MonthlySeries,
    earnings: MonthlySeries,
    monthly_return: MonthlySeries,
}

impl RealSeriesTable {
    /// Deflate nominal series by `base_price_level / cpi`.
    ///
    /// The monthly return at M is
    /// `(price(M) - price(M-1) + dividend(M) / 12) / price(M-1)`; the first
    /// month has no predecessor and is `NaN`.
    pub fn compute(
        nominal: &NominalSeries,
        cpi: &MonthlySeries,
        base_price_level: f64,
    ) -> Result<Self> {
        if !nominal.price().same_index(cpi) {
            return Err(StockscapeError::IndexMismatch(
                "CPI does not share the nominal index".to_string(),
            ));
        }

        let scale = cpi.map(|c| base_price_level / c);
        let price = nominal.price().zip_with(&scale, |v, s| v * s);
        let dividend = nominal.dividend().zip_with(&scale, |v, s| v * s);
        let earnings = nominal.earnings().zip_with(&scale, |v, s| v * s);

        let previous = price.shift(1);
        let change = price.zip_with(&previous, |p, prev| p - prev);
        let monthly_return = change
            .zip_with(&dividend, |c, d| c + d / 12.0)
            .zip_with(&previous, |numerator, prev| numerator / prev);

        debug!(
            months = price.len(),
            start = %price.start(),
            base_price_level,
            "computed real series table"
        );

        Ok(Self {
            price,
            dividend,
            earnings,
            monthly_return,
        })
    }

    /// Real stock price.
    pub fn price(&self) -> &MonthlySeries {
        &self.price
    }

    /// Real annualized dividend.
    pub fn dividend(&self) -> &MonthlySeries {
        &self.dividend
    }

    /// Real annualized earnings.
    pub fn earnings(&self) -> &MonthlySeries {
        &self.earnings
    }

    /// Real monthly total return, dividends included.
    pub fn monthly_return(&self) -> &MonthlySeries {
        &self.monthly_return
    }
}

/// The single immutable input shared by every downstream computation.
#[derive(Debug, Clone)]
pub struct StockscapeDataset {
    real: RealSeriesTable,
    nominal: NominalSeries,
    cpi: MonthlySeries,
    base_price_level: f64,
}

impl StockscapeDataset {
    /// Convert to real values at `base_price_level`.
    pub fn build(nominal: NominalSeries, cpi: MonthlySeries, base_price_level: f64) -> Result<Self> {
        let real = RealSeriesTable::compute(&nominal, &cpi, base_price_level)?;
        Ok(Self {
            real,
            nominal,
            cpi,
            base_price_level,
        })
    }

    /// Build from a reader table. Without an explicit base price level the
    /// most recent CPI value is used, so real values are in today's dollars.
    pub fn from_table(table: IeTable, base_price_level: Option<f64>) -> Result<Self> {
        let base = match base_price_level {
            Some(level) => level,
            None => {
                table
                    .cpi
                    .last_defined()
                    .ok_or(StockscapeError::InsufficientData {
                        required: 1,
                        actual: 0,
                    })?
                    .1
            }
        };
        Self::build(table.nominal, table.cpi, base)
    }

    /// Real price, dividend, earnings and monthly return.
    pub fn real(&self) -> &RealSeriesTable {
        &self.real
    }

    /// Nominal input series.
    pub fn nominal(&self) -> &NominalSeries {
        &self.nominal
    }

    /// Consumer price index on the dataset index.
    pub fn cpi(&self) -> &MonthlySeries {
        &self.cpi
    }

    /// Price level real values are expressed in.
    pub fn base_price_level(&self) -> f64 {
        self.base_price_level
    }
}
