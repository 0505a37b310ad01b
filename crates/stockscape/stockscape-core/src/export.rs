//! JSON snapshot for the interactive front end.
//!
//! The field names written here are read by the front end and must not change:
//! `{"data_table": [{"cape", "stock_{h}y", "stockgross_{h}y", "bond_{h}y",
//! "bondgross_{h}y", "inflation_{h}y", "date"}, ...], "wr_curve": [{"cape", "wr"}, ...]}`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use stockscape_api::ExportConfig;
use stockscape_spi::{ForwardReturns, MonthlySeries, Result, StockscapeError};
use tracing::{debug, info};

use crate::cape::CapeTable;
use crate::real::StockscapeDataset;
use crate::returns::{BondReturnsTable, InflationTable, StockReturnsTable};
use crate::warranted::WarrantedReturnsTable;

/// One month of the data table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiRecord {
    pub cape: Option<f64>,
    /// Per-horizon returns keyed by their export name.
    #[serde(flatten)]
    pub returns: BTreeMap<String, Option<f64>>,
    /// `YYYY-MM`
    pub date: String,
}

/// A point on the warranted-returns curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WrPoint {
    pub cape: f64,
    pub wr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiData {
    pub data_table: Vec<UiRecord>,
    pub wr_curve: Vec<WrPoint>,
}

impl UiData {
    /// Build the records and the warranted-returns curve.
    pub fn compute(dataset: &StockscapeDataset, config: &ExportConfig) -> Result<Self> {
        config.validate()?;
        let cape = CapeTable::from_config(dataset.real(), &config.cape)?;

        let mut columns: Vec<(String, MonthlySeries)> = Vec::new();
        for h in config.horizons() {
            let stock = StockReturnsTable::compute(dataset, h)?;
            let bond = BondReturnsTable::compute(dataset, h)?;
            let inflation = InflationTable::compute(dataset, h)?;
            columns.push((format!("stock_{}y", h), stock.annualized().clone()));
            columns.push((format!("stockgross_{}y", h), stock.gross().clone()));
            columns.push((format!("bond_{}y", h), bond.annualized().clone()));
            columns.push((format!("bondgross_{}y", h), bond.gross().clone()));
            columns.push((format!("inflation_{}y", h), inflation.forward_inflation().clone()));
        }

        let data_table = dataset
            .cpi()
            .months()
            .map(|month| UiRecord {
                cape: finite(cape.get(month)),
                returns: columns
                    .iter()
                    .map(|(name, series)| (name.clone(), finite(series.get(month))))
                    .collect(),
                date: month.label(),
            })
            .collect::<Vec<_>>();

        let stock = StockReturnsTable::compute(dataset, config.warranted_years)?;
        let (capes, wrs) = WarrantedReturnsTable::compute(&cape, &stock)?.warranted_curve();
        let wr_curve = capes
            .into_iter()
            .zip(wrs)
            .map(|(cape, wr)| WrPoint { cape, wr })
            .collect();

        debug!(
            records = data_table.len(),
            horizons = ?config.horizons(),
            "computed UI data"
        );
        Ok(Self {
            data_table,
            wr_curve,
        })
    }

    /// Serialize as JSON into `writer`.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self).map_err(|e| StockscapeError::ExportError(e.to_string()))
    }

    /// Serialize as a JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| StockscapeError::ExportError(e.to_string()))
    }

    /// Write the JSON snapshot to `path`.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        info!(
            path = %path.display(),
            records = self.data_table.len(),
            curve_points = self.wr_curve.len(),
            "wrote UI data"
        );
        Ok(())
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
