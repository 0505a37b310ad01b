//! Integration tests for the Stockscape stack on synthetic market history.

use stockscape_facade::{
    split_cape_threshold_years, Analysis, AnalysisConfig, CapeNeighborsEstimator, CapeTable,
    ForwardReturns, IeTable, LinearModel, Month, MonthlySeries, NeighborsConfig, NominalSeries,
    PeriodUtils, ShillerCsvReader, StockReturnsTable, StockscapeDataset, Summary, TableReader,
    WaitingReturns, WarrantedReturnsTable,
};

const MONTHS: usize = 600;

fn start() -> Month {
    Month::new(1950, 1).unwrap()
}

/// Fifty years of prices cycling around a rising trend, with smoother earnings.
fn sample_table() -> IeTable {
    let s = |v: Vec<f64>| MonthlySeries::new(start(), v);
    let t = |i: usize| i as f64;
    let price: Vec<f64> = (0..MONTHS)
        .map(|i| 20.0 * 1.005f64.powf(t(i)) * (1.0 + 0.35 * (t(i) / 61.0).sin()))
        .collect();
    let dividend: Vec<f64> = (0..MONTHS).map(|i| 0.8 * 1.004f64.powf(t(i))).collect();
    let earnings: Vec<f64> = (0..MONTHS)
        .map(|i| 1.5 * 1.004f64.powf(t(i)) * (1.0 + 0.1 * (t(i) / 23.0).cos()))
        .collect();
    let bond_yield: Vec<f64> = (0..MONTHS)
        .map(|i| 0.04 + 0.02 * (t(i) / 97.0).sin())
        .collect();
    let cpi: Vec<f64> = (0..MONTHS).map(|i| 25.0 * 1.003f64.powf(t(i))).collect();

    let nominal = NominalSeries::new(s(price), s(dividend), s(earnings), s(bond_yield)).unwrap();
    IeTable::new(nominal, s(cpi)).unwrap()
}

fn sample_dataset() -> StockscapeDataset {
    StockscapeDataset::from_table(sample_table(), None).unwrap()
}

#[test]
fn test_real_price_matches_deflated_nominal() {
    let table = sample_table();
    let base = table.cpi.last_defined().unwrap().1;
    let dataset = StockscapeDataset::from_table(table.clone(), None).unwrap();

    for (i, real) in dataset.real().price().values().iter().enumerate() {
        let expected = table.nominal.price().values()[i] * base / table.cpi.values()[i];
        assert!((real - expected).abs() < 1e-5);
    }
}

#[test]
fn test_cape_table_starts_after_window() {
    let dataset = sample_dataset();
    let cape = CapeTable::compute(dataset.real(), 120, Summary::Mean).unwrap();
    assert_eq!(
        dataset.real().price().start().months_until(cape.series().start()),
        120
    );
    assert_eq!(cape.series().len(), MONTHS - 120);
    assert!(cape.series().values().iter().all(|c| c.is_finite() && *c > 0.0));
}

#[test]
fn test_period_conversions_invert() {
    let period = PeriodUtils::new(10).unwrap();
    for &x in &[-0.9, -0.2, 0.0, 0.07, 1.5, 10.0] {
        assert!((period.annualized(period.gross(x)) - x).abs() < 1e-9);
        assert!((period.gross(period.annualized(x)) - x).abs() < 1e-9);
    }
}

#[test]
fn test_prediction_bounds_and_exclusion() {
    let dataset = sample_dataset();
    let analysis = Analysis::run(&dataset, &AnalysisConfig::default()).unwrap();
    let gross = analysis.stock_returns().gross();

    for set in analysis.predictor().neighbor_sets() {
        assert!(gross.get(set.target).is_nan());
        assert!(set.neighbors.len() <= 20);
        for nb in &set.neighbors {
            assert!(!gross.get(nb.month).is_nan());
        }
        assert!(set
            .neighbors
            .windows(2)
            .all(|w| w[0].distance <= w[1].distance));
    }

    for group in analysis.prediction().groups() {
        for e in &group.estimates {
            assert!(!e.estimate.is_nan());
            assert!(e.min <= e.estimate && e.estimate <= e.max);
            if e.has_interval() {
                assert!(e.ci_low <= e.estimate && e.estimate <= e.ci_high);
            }
        }
    }
}

#[test]
fn test_multi_count_groups_are_independent() {
    let dataset = sample_dataset();
    let cape = CapeTable::from_config(dataset.real(), &Default::default()).unwrap();
    let stock = StockReturnsTable::compute(&dataset, 10).unwrap();
    let estimator = CapeNeighborsEstimator::new(&cape);
    let predictor = estimator.fit(stock.gross(), "stockgross_10y", 20).unwrap();

    let both = predictor.predict(&[20, 5], None, None).unwrap();
    let five = predictor.predict(&[5], None, None).unwrap();
    let twenty = predictor.predict(&[], None, None).unwrap();

    assert!(both.is_grouped());
    assert!(!five.is_grouped());
    assert_eq!(both.neighbor_counts(), vec![5, 20]);
    assert_eq!(twenty.neighbor_counts(), vec![20]);

    for &month in both.months() {
        let a = both.get_for(5, month).unwrap().to_array();
        let b = five.get(month).unwrap().to_array();
        let c = both.get_for(20, month).unwrap().to_array();
        let d = twenty.get(month).unwrap().to_array();
        for i in 0..5 {
            assert!(a[i] == b[i] || (a[i].is_nan() && b[i].is_nan()));
            assert!(c[i] == d[i] || (c[i].is_nan() && d[i].is_nan()));
        }
    }
}

#[test]
fn test_estimator_reused_across_sources() {
    let dataset = sample_dataset();
    let cape = CapeTable::from_config(dataset.real(), &Default::default()).unwrap();
    let estimator = CapeNeighborsEstimator::new(&cape);

    let stock = StockReturnsTable::compute(&dataset, 10).unwrap();
    let short = StockReturnsTable::compute(&dataset, 5).unwrap();
    let ten = estimator.fit(stock.gross(), "10y", 20).unwrap();
    let five = estimator.fit(short.gross(), "5y", 20).unwrap();

    assert_eq!(ten.targets().len(), 120);
    assert_eq!(five.targets().len(), 60);
}

#[test]
fn test_identical_inputs_give_identical_tables() {
    let first = Analysis::run(&sample_dataset(), &AnalysisConfig::default()).unwrap();
    let second = Analysis::run(&sample_dataset(), &AnalysisConfig::default()).unwrap();

    let same = |a: &MonthlySeries, b: &MonthlySeries| {
        a.same_index(b)
            && a
                .values()
                .iter()
                .zip(b.values())
                .all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
    };
    assert!(same(first.cape().series(), second.cape().series()));
    assert!(same(first.stock_returns().gross(), second.stock_returns().gross()));
    assert!(same(first.warranted().gross_error(), second.warranted().gross_error()));
    assert_eq!(
        first.predictor().neighbor_sets(),
        second.predictor().neighbor_sets()
    );
}

#[test]
fn test_warranted_errors_and_linear_model() {
    let dataset = sample_dataset();
    let cape = CapeTable::from_config(dataset.real(), &Default::default()).unwrap();
    let stock = StockReturnsTable::compute(&dataset, 10).unwrap();
    let warranted = WarrantedReturnsTable::compute(&cape, &stock).unwrap();

    let month = start().offset(200);
    let realized = stock.annualized().get(month);
    let expected = realized - warranted.warranted_return().get(month);
    assert!((warranted.annualized_error().get(month) - expected).abs() < 1e-12);

    let model = LinearModel::fit(cape.series(), stock.annualized(), &[10.0, 20.0]).unwrap();
    assert_eq!(model.predictions().len(), 2);
    assert!(model.r_squared() <= 1.0);
    assert!((model.predictions()[0] - model.predict_at(10.0)).abs() < 1e-12);
}

#[test]
fn test_waiting_returns_default_config() {
    let dataset = sample_dataset();
    let waiting =
        WaitingReturns::from_config(&dataset, &AnalysisConfig::default().waiting).unwrap();
    assert_eq!(waiting.tables().len(), 3);
    let (lo, hi) = waiting.diff_limits();
    assert!(lo.is_finite() && hi.is_finite());
    assert!(lo <= hi);
}

#[test]
fn test_threshold_split_covers_all_months() {
    let dataset = sample_dataset();
    let cape = CapeTable::from_config(dataset.real(), &Default::default()).unwrap();
    let split = split_cape_threshold_years(cape.series(), cape.series().max() * 0.9);

    let in_period: usize = split.above.iter().filter(|a| a.period.is_some()).count();
    assert!(in_period > 0);
    for month in &split.below {
        assert!(split.periods.iter().all(|p| !p.contains(month.year())));
    }
}

#[test]
fn test_csv_reader_feeds_pipeline() {
    let mut csv = String::from("Date,P,D,E,CPI,Rate GS10\n");
    let table = sample_table();
    for (i, month) in table.cpi.months().enumerate() {
        csv.push_str(&format!(
            "{}.{:02},{},{},{},{},{}\n",
            month.year(),
            month.month(),
            table.nominal.price().values()[i],
            table.nominal.dividend().values()[i],
            table.nominal.earnings().values()[i],
            table.cpi.values()[i],
            table.nominal.bond_yield().values()[i] * 100.0,
        ));
    }

    let read = ShillerCsvReader::from_text(csv).read().unwrap();
    assert_eq!(read.cpi.len(), MONTHS);
    assert!(
        (read.nominal.bond_yield().values()[10] - table.nominal.bond_yield().values()[10]).abs()
            < 1e-12
    );

    let dataset = StockscapeDataset::from_table(read, None).unwrap();
    let config = AnalysisConfig {
        neighbors: NeighborsConfig::with_counts(20, vec![5]),
        ..AnalysisConfig::default()
    };
    let analysis = Analysis::run(&dataset, &config).unwrap();
    assert_eq!(analysis.prediction().months().len(), 120);
    assert_eq!(analysis.stock_returns().horizon_years(), 10);
}
