//! CSV reader for Shiller's `ie_data` table.
//!
//! Expects a header row naming the columns `Date`, `P`, `D`, `E`, `CPI` and
//! `Rate GS10` (or `GS10`). Other columns are ignored. Empty or non-numeric
//! cells become `NaN`; rows must cover consecutive months.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use stockscape_api::ReaderConfig;
use stockscape_spi::{
    IeTable, Month, MonthlySeries, NominalSeries, Result, StockscapeError, TableReader,
};
use tracing::debug;

const DATE: &str = "Date";
const PRICE: &str = "P";
const DIVIDEND: &str = "D";
const EARNINGS: &str = "E";
const CPI: &str = "CPI";
const BOND_YIELD: [&str; 2] = ["Rate GS10", "GS10"];

#[derive(Debug, Clone)]
enum Source {
    Path(PathBuf),
    Text(String),
}

/// [`TableReader`] over a CSV export of the Irrational Exuberance workbook.
#[derive(Debug, Clone)]
pub struct ShillerCsvReader {
    source: Source,
    config: ReaderConfig,
}

impl ShillerCsvReader {
    /// Read from a CSV file.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Path(path.into()),
            config: ReaderConfig::default(),
        }
    }

    /// Read from CSV text already in memory.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            source: Source::Text(text.into()),
            config: ReaderConfig::default(),
        }
    }

    /// Replace the reader options.
    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Options used by [`TableReader::read`].
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Parse a table from any reader.
    pub fn parse<R: Read>(input: R, config: &ReaderConfig) -> Result<IeTable> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| StockscapeError::ReadError(e.to_string()))?
            .clone();
        let date_col = find_column(&headers, &[DATE])?;
        let value_cols = [
            find_column(&headers, &[PRICE])?,
            find_column(&headers, &[DIVIDEND])?,
            find_column(&headers, &[EARNINGS])?,
            find_column(&headers, &[CPI])?,
            find_column(&headers, &BOND_YIELD)?,
        ];

        let mut months = Vec::new();
        let mut columns: [Vec<f64>; 5] = Default::default();
        for (line, result) in reader.records().enumerate() {
            let record = result.map_err(|e| StockscapeError::ReadError(e.to_string()))?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let date = record.get(date_col).unwrap_or("");
            let month: Month = date.parse().map_err(|_| {
                StockscapeError::ReadError(format!("row {}: cannot decode date '{}'", line + 2, date))
            })?;
            months.push(month);
            for (values, &col) in columns.iter_mut().zip(value_cols.iter()) {
                values.push(parse_number(record.get(col).unwrap_or("")));
            }
        }

        let [price, dividend, earnings, cpi, mut bond_yield] = columns;
        if config.bond_yield_in_percent {
            bond_yield.iter_mut().for_each(|y| *y /= 100.0);
        }

        let price = MonthlySeries::from_pairs(months.iter().copied().zip(price))?;
        let start = price.start();
        let nominal = NominalSeries::new(
            price,
            MonthlySeries::new(start, dividend),
            MonthlySeries::new(start, earnings),
            MonthlySeries::new(start, bond_yield),
        )?;
        let table = IeTable::new(nominal, MonthlySeries::new(start, cpi))?;

        debug!(
            rows = months.len(),
            start = %start,
            "read Shiller table"
        );
        Ok(table)
    }

    /// Read the source with `config` in place of the reader's own options.
    pub fn read_with(&self, config: &ReaderConfig) -> Result<IeTable> {
        match &self.source {
            Source::Path(path) => Self::read_path(path, config),
            Source::Text(text) => Self::parse(text.as_bytes(), config),
        }
    }

    fn read_path(path: &Path, config: &ReaderConfig) -> Result<IeTable> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file), config)
    }
}

impl TableReader for ShillerCsvReader {
    fn read(&self) -> Result<IeTable> {
        self.read_with(&self.config)
    }
}

/// Position of the first of `names` present in the header row.
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Result<usize> {
    names
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
        .ok_or_else(|| {
            StockscapeError::ReadError(format!("missing column '{}'", names.join("' or '")))
        })
}

/// Number in a cell, tolerating thousands separators; `NaN` otherwise.
fn parse_number(cell: &str) -> f64 {
    let cleaned = cell.replace(',', "");
    cleaned.trim().parse::<f64>().unwrap_or(f64::NAN)
}
