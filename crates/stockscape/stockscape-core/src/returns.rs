//! Forward-looking returns over a horizon: stocks, bonds held to maturity,
//! and inflation.
//!
//! Every table is indexed like the dataset. The value at month M is realized
//! over the `years * 12` months that follow M, so the last `years * 12`
//! rows are `NaN`.

use stockscape_spi::{ForwardReturns, MonthlySeries, Result};
use tracing::debug;

use crate::period::PeriodUtils;
use crate::real::StockscapeDataset;

/// Real stock total returns, dividends reinvested monthly.
#[derive(Debug, Clone)]
pub struct StockReturnsTable {
    period: PeriodUtils,
    gross: MonthlySeries,
    annualized: MonthlySeries,
}

impl StockReturnsTable {
    /// Stock returns over `years` years.
    pub fn compute(dataset: &StockscapeDataset, years: u32) -> Result<Self> {
        let period = PeriodUtils::new(years)?;
        let months = period.months();

        let growth = dataset.real().monthly_return().map(|r| 1.0 + r);
        let gross = growth
            .rolling(months, 1, |window| window.iter().product())
            .map(|g| g - 1.0)
            .shift(-(months as i64));
        let annualized = period.annualized_series(&gross);

        debug!(rows = gross.len(), years, "computed stock returns table");
        Ok(Self {
            period,
            gross,
            annualized,
        })
    }

    /// Conversions over this table's horizon.
    pub fn period(&self) -> PeriodUtils {
        self.period
    }
}

impl ForwardReturns for StockReturnsTable {
    fn horizon_years(&self) -> u32 {
        self.period.years()
    }

    fn gross(&self) -> &MonthlySeries {
        &self.gross
    }

    fn annualized(&self) -> &MonthlySeries {
        &self.annualized
    }
}

/// Real return of buying the 10-year bond at month M and holding it for the
/// horizon, with the nominal yield compounded annually.
#[derive(Debug, Clone)]
pub struct BondReturnsTable {
    period: PeriodUtils,
    gross: MonthlySeries,
    annualized: MonthlySeries,
}

impl BondReturnsTable {
    /// Bond returns over `years` years.
    pub fn compute(dataset: &StockscapeDataset, years: u32) -> Result<Self> {
        let period = PeriodUtils::new(years)?;
        let months = period.months() as i64;

        let gross_nominal = period.gross_series(dataset.nominal().bond_yield());
        let cpi = dataset.cpi();
        let price_correction = cpi.shift(-months).zip_with(cpi, |later, now| later / now);
        let gross = gross_nominal.zip_with(&price_correction, |g, fpc| (g + 1.0) / fpc - 1.0);
        let annualized = period.annualized_series(&gross);

        debug!(rows = gross.len(), years, "computed bond returns table");
        Ok(Self {
            period,
            gross,
            annualized,
        })
    }

    /// Conversions over this table's horizon.
    pub fn period(&self) -> PeriodUtils {
        self.period
    }
}

impl ForwardReturns for BondReturnsTable {
    fn horizon_years(&self) -> u32 {
        self.period.years()
    }

    fn gross(&self) -> &MonthlySeries {
        &self.gross
    }

    fn annualized(&self) -> &MonthlySeries {
        &self.annualized
    }
}

/// CPI inflation over the horizon.
#[derive(Debug, Clone)]
pub struct InflationTable {
    period: PeriodUtils,
    gross: MonthlySeries,
    forward_inflation: MonthlySeries,
}

impl InflationTable {
    /// Inflation over `years` years.
    pub fn compute(dataset: &StockscapeDataset, years: u32) -> Result<Self> {
        let period = PeriodUtils::new(years)?;
        let months = period.months() as i64;

        let cpi = dataset.cpi();
        let gross = cpi
            .zip_with(&cpi.shift(-months), |now, later| now - later)
            .zip_with(cpi, |delta, now| -delta / now);
        let forward_inflation = period.annualized_series(&gross);

        debug!(rows = gross.len(), years, "computed inflation table");
        Ok(Self {
            period,
            gross,
            forward_inflation,
        })
    }

    /// Conversions over this table's horizon.
    pub fn period(&self) -> PeriodUtils {
        self.period
    }

    /// Annualized inflation over the horizon.
    pub fn forward_inflation(&self) -> &MonthlySeries {
        &self.forward_inflation
    }
}

impl ForwardReturns for InflationTable {
    fn horizon_years(&self) -> u32 {
        self.period.years()
    }

    fn gross(&self) -> &MonthlySeries {
        &self.gross
    }

    fn annualized(&self) -> &MonthlySeries {
        &self.forward_inflation
    }
}
