//! End-to-end CAPE analysis for one configuration.

use stockscape_api::AnalysisConfig;
use stockscape_spi::{EstimateTransform, ForwardReturns, PredictionTable, Result, TableReader};
use tracing::info;

use crate::cape::CapeTable;
use crate::neighbors::{CapeNeighborsEstimator, CapeNeighborsPredictor};
use crate::reader::ShillerCsvReader;
use crate::real::StockscapeDataset;
use crate::returns::{BondReturnsTable, InflationTable, StockReturnsTable};
use crate::warranted::WarrantedReturnsTable;

/// Read a Shiller CSV with the reader options of `config` and convert it to
/// real values.
pub fn load_dataset(
    reader: &ShillerCsvReader,
    config: &AnalysisConfig,
) -> Result<StockscapeDataset> {
    let table = reader.read_with(&config.reader)?;
    StockscapeDataset::from_table(table, config.reader.base_price_level)
}

/// Read from any [`TableReader`] and convert to real values.
///
/// The source decides its own units, so only the base price level of the
/// reader options applies.
pub fn load_dataset_from<R>(reader: &R, config: &AnalysisConfig) -> Result<StockscapeDataset>
where
    R: TableReader + ?Sized,
{
    let table = reader.read()?;
    StockscapeDataset::from_table(table, config.reader.base_price_level)
}

/// Every table derived from a dataset, plus the annualized CAPE-neighbors
/// prediction of stock returns for the months whose returns are not yet known.
#[derive(Debug, Clone)]
pub struct Analysis {
    cape: CapeTable,
    stock: StockReturnsTable,
    bond: BondReturnsTable,
    inflation: InflationTable,
    warranted: WarrantedReturnsTable,
    estimator: CapeNeighborsEstimator,
    predictor: CapeNeighborsPredictor,
    prediction: PredictionTable,
}

impl Analysis {
    /// Build every table for `dataset`, validating `config` first.
    pub fn run(dataset: &StockscapeDataset, config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let years = config.horizon_years;

        let cape = CapeTable::from_config(dataset.real(), &config.cape)?;
        let stock = StockReturnsTable::compute(dataset, years)?;
        let bond = BondReturnsTable::compute(dataset, years)?;
        let inflation = InflationTable::compute(dataset, years)?;
        let warranted = WarrantedReturnsTable::compute(&cape, &stock)?;

        let estimator = CapeNeighborsEstimator::new(&cape);
        let predictor = estimator
            .fit(
                stock.gross(),
                format!("stockgross_{}y", years),
                config.neighbors.max_neighbors,
            )?
            .with_confidence_level(config.neighbors.confidence_level)?;

        let period = stock.period();
        let annualize = move |stats: [f64; 5]| period.annualize_estimate(stats);
        let transform: EstimateTransform<'_> = &annualize;
        let label = format!("stock_{}y", years);
        let prediction = predictor.predict(
            &config.neighbors.neighbor_counts,
            Some(transform),
            Some(label.as_str()),
        )?;

        info!(
            months = dataset.cpi().len(),
            cape_months = estimator.len(),
            predicted = prediction.months().len(),
            horizon_years = years,
            "analysis complete"
        );

        Ok(Self {
            cape,
            stock,
            bond,
            inflation,
            warranted,
            estimator,
            predictor,
            prediction,
        })
    }

    /// CAPE over the configured window.
    pub fn cape(&self) -> &CapeTable {
        &self.cape
    }

    /// Stock returns over the configured horizon.
    pub fn stock_returns(&self) -> &StockReturnsTable {
        &self.stock
    }

    /// Bond returns over the configured horizon.
    pub fn bond_returns(&self) -> &BondReturnsTable {
        &self.bond
    }

    /// Inflation over the configured horizon.
    pub fn inflation(&self) -> &InflationTable {
        &self.inflation
    }

    /// Warranted returns against realized stock returns.
    pub fn warranted(&self) -> &WarrantedReturnsTable {
        &self.warranted
    }

    /// CAPE difference matrix.
    pub fn estimator(&self) -> &CapeNeighborsEstimator {
        &self.estimator
    }

    /// Neighbor sets for gross stock returns.
    pub fn predictor(&self) -> &CapeNeighborsPredictor {
        &self.predictor
    }

    /// Annualized stock-return prediction, one group per configured neighbor count.
    pub fn prediction(&self) -> &PredictionTable {
        &self.prediction
    }
}
