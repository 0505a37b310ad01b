//! Nominal input data.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StockscapeError};
use crate::model::MonthlySeries;

/// Nominal stock price, dividend and earnings, plus the 10-year treasury
/// yield as a fraction (0.05 for 5%).
///
/// All four series share one index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominalSeries {
    price: MonthlySeries,
    dividend: MonthlySeries,
    earnings: MonthlySeries,
    bond_yield: MonthlySeries,
}

impl NominalSeries {
    /// Fails with `IndexMismatch` unless all four series share one index.
    pub fn new(
        price: MonthlySeries,
        dividend: MonthlySeries,
        earnings: MonthlySeries,
        bond_yield: MonthlySeries,
    ) -> Result<Self> {
        for (name, series) in [
            ("dividend", &dividend),
            ("earnings", &earnings),
            ("bond_yield", &bond_yield),
        ] {
            if !price.same_index(series) {
                return Err(StockscapeError::IndexMismatch(format!(
                    "{} does not share the price index",
                    name
                )));
            }
        }

        Ok(Self {
            price,
            dividend,
            earnings,
            bond_yield,
        })
    }

    /// Nominal stock price.
    pub fn price(&self) -> &MonthlySeries {
        &self.price
    }

    /// Nominal annualized dividend.
    pub fn dividend(&self) -> &MonthlySeries {
        &self.dividend
    }

    /// Nominal annualized earnings.
    pub fn earnings(&self) -> &MonthlySeries {
        &self.earnings
    }

    /// 10-year bond yield as a fraction.
    pub fn bond_yield(&self) -> &MonthlySeries {
        &self.bond_yield
    }
}

/// Everything the table reader hands over: nominal series and CPI on one index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IeTable {
    pub nominal: NominalSeries,
    pub cpi: MonthlySeries,
}

impl IeTable {
    /// Fails with `IndexMismatch` unless CPI shares the nominal index.
    pub fn new(nominal: NominalSeries, cpi: MonthlySeries) -> Result<Self> {
        if !nominal.price().same_index(&cpi) {
            return Err(StockscapeError::IndexMismatch(
                "CPI does not share the nominal index".to_string(),
            ));
        }
        Ok(Self { nominal, cpi })
    }
}
