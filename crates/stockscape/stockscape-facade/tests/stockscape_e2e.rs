//! End-to-end tests: CSV in, analysis and UI export out.
//!
//! The historical scenario needs a CSV export of Shiller's `ie_data`
//! workbook. Point `STOCKSCAPE_IE_DATA` at it and run with `--ignored`.

use std::io::Write;
use std::path::PathBuf;

use stockscape_facade::{
    load_dataset, Analysis, AnalysisConfig, BondReturnsTable, CapeTable, ExportConfig,
    ForwardReturns, InflationTable, Month, ShillerCsvReader, StockReturnsTable, StockscapeDataset,
    TableReader, UiData, WarrantedReturnsTable,
};

fn m(year: i32, month: u32) -> Month {
    Month::new(year, month).unwrap()
}

/// Twelve years of monthly rows in Shiller's layout.
fn synthetic_csv() -> String {
    let mut csv = String::from("Date,P,D,E,CPI,Rate GS10,Price,CAPE\n");
    for i in 0..144 {
        let year = 2000 + i / 12;
        let month = i % 12 + 1;
        let t = i as f64;
        csv.push_str(&format!(
            "{}.{:02},{:.2},{:.3},{:.3},{:.3},{:.2},,\n",
            year,
            month,
            1400.0 + t * 3.0 + (t / 9.0).sin() * 80.0,
            16.0 + t * 0.02,
            50.0 + t * 0.1 + (t / 5.0).cos() * 4.0,
            170.0 + t * 0.4,
            4.0 + (t / 30.0).sin(),
        ));
    }
    csv
}

/// Three years of rows in Shiller's layout: prices and payouts move with a
/// CPI that rises 10% a year, dividends yield 1% a month in real terms and
/// CAPE sits at 20.
fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/ie_data_slice.csv")
}

fn one_year_config() -> AnalysisConfig {
    AnalysisConfig::from_json_str(
        r#"{
            "cape": { "years": 1 },
            "horizon_years": 1,
            "neighbors": { "max_neighbors": 12, "neighbor_counts": [12] }
        }"#,
    )
    .unwrap()
}

fn small_export() -> ExportConfig {
    ExportConfig {
        cape: stockscape_facade::CapeConfig::new(2),
        min_horizon: 1,
        max_horizon: 3,
        warranted_years: 2,
    }
}

#[test]
fn e2e_csv_file_to_json_export() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("ie_data.csv");
    std::fs::File::create(&csv_path)
        .unwrap()
        .write_all(synthetic_csv().as_bytes())
        .unwrap();

    let reader = ShillerCsvReader::from_path(&csv_path);
    let dataset = load_dataset(&reader, &AnalysisConfig::default()).unwrap();
    let ui = UiData::compute(&dataset, &small_export()).unwrap();

    let out = dir.path().join("ui.json");
    ui.write(&out).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let records = value["data_table"].as_array().unwrap();
    assert_eq!(records.len(), 144);
    assert_eq!(records[0]["date"], "2000-01");
    assert_eq!(records[143]["date"], "2011-12");
    assert!(records[0]["cape"].is_null());
    assert!(records[24]["cape"].is_number());
    for key in ["stock_3y", "stockgross_3y", "bond_3y", "bondgross_3y", "inflation_3y"] {
        assert!(records[0][key].is_number(), "missing {}", key);
        assert!(records[143][key].is_null(), "{} should run out", key);
    }
    assert_eq!(value["wr_curve"].as_array().unwrap().len(), 50);
}

#[test]
fn e2e_full_analysis_from_csv_text() {
    let reader = ShillerCsvReader::from_text(synthetic_csv());
    let config = AnalysisConfig::from_json_str(
        r#"{
            "cape": { "years": 2 },
            "horizon_years": 2,
            "neighbors": { "max_neighbors": 8, "neighbor_counts": [3, 8] }
        }"#,
    )
    .unwrap();
    let dataset = load_dataset(&reader, &config).unwrap();
    let analysis = Analysis::run(&dataset, &config).unwrap();

    let prediction = analysis.prediction();
    assert_eq!(prediction.label(), "stock_2y");
    assert_eq!(prediction.months().len(), 24);
    assert_eq!(prediction.months()[0], m(2010, 1));
    for &month in prediction.months() {
        let e = prediction.get_for(8, month).unwrap();
        assert!(e.has_interval());
        assert!(e.ci_low <= e.estimate && e.estimate <= e.ci_high);
    }
}

#[test]
fn e2e_explicit_base_price_level() {
    let reader = ShillerCsvReader::from_text(synthetic_csv());
    let table = reader.read().unwrap();
    let nominal_first = table.nominal.price().values()[0];
    let cpi_first = table.cpi.values()[0];

    let dataset = StockscapeDataset::from_table(table, Some(100.0)).unwrap();
    let expected = nominal_first * 100.0 / cpi_first;
    assert!((dataset.real().price().values()[0] - expected).abs() < 1e-9);
}

#[test]
fn e2e_fixture_slice_reference_values() {
    let config = one_year_config();
    let dataset = load_dataset(&ShillerCsvReader::from_path(fixture_path()), &config).unwrap();
    assert_eq!(dataset.cpi().len(), 36);
    assert_eq!(dataset.base_price_level(), 121.0);

    let cape = CapeTable::from_config(dataset.real(), &config.cape).unwrap();
    let stock = StockReturnsTable::compute(&dataset, 1).unwrap();
    let bond = BondReturnsTable::compute(&dataset, 1).unwrap();
    let inflation = InflationTable::compute(&dataset, 1).unwrap();
    let warranted = WarrantedReturnsTable::compute(&cape, &stock).unwrap();

    let realized = 1.01f64.powi(12) - 1.0;
    let may_2001 = m(2001, 5);
    assert_eq!(cape.series().start(), m(2001, 1));
    assert!((cape.get(may_2001) - 20.0).abs() < 1e-9);
    assert!((stock.annualized().get(may_2001) - realized).abs() < 1e-9);
    assert!((warranted.warranted_return().get(may_2001) - 0.05).abs() < 1e-9);
    assert!((warranted.annualized_error().get(may_2001) - (realized - 0.05)).abs() < 1e-9);
    assert!((bond.annualized().get(may_2001) - (1.05 / 1.1 - 1.0)).abs() < 1e-9);
    assert!((inflation.forward_inflation().get(may_2001) - 0.1).abs() < 1e-9);
    assert!(stock.annualized().get(m(2002, 1)).is_nan());

    // the last year has no realized return, so every earlier year is a neighbor
    let analysis = Analysis::run(&dataset, &config).unwrap();
    let prediction = analysis.prediction();
    assert_eq!(prediction.months().len(), 12);
    let estimate = prediction.get_for(12, m(2002, 5)).unwrap();
    assert!((estimate.estimate - realized).abs() < 1e-9);
    assert!((estimate.min - realized).abs() < 1e-9);
    assert!((estimate.max - realized).abs() < 1e-9);
}

#[test]
fn e2e_reader_options_come_from_analysis_config() {
    let reader = ShillerCsvReader::from_path(fixture_path());

    let percent = load_dataset(&reader, &one_year_config()).unwrap();
    assert!((percent.nominal().bond_yield().values()[0] - 0.05).abs() < 1e-12);

    let mut config = AnalysisConfig::from_json_str(
        r#"{ "reader": { "bond_yield_in_percent": false, "base_price_level": 100.0 } }"#,
    )
    .unwrap();
    let fraction = load_dataset(&reader, &config).unwrap();
    assert_eq!(fraction.nominal().bond_yield().values()[0], 5.0);
    assert_eq!(fraction.base_price_level(), 100.0);
    assert!((fraction.real().price().values()[35] - 100.0).abs() < 1e-9);

    config.reader.bond_yield_in_percent = true;
    let again = load_dataset(&reader, &config).unwrap();
    assert!((again.nominal().bond_yield().values()[35] - 0.05).abs() < 1e-12);
}

#[test]
fn e2e_zero_earnings_keep_export_curve() {
    let csv: String = synthetic_csv()
        .lines()
        .enumerate()
        .map(|(i, line)| {
            // zero out earnings for rows 40..60 (line 0 is the header)
            if (41..61).contains(&i) {
                let mut fields: Vec<&str> = line.split(',').collect();
                fields[3] = "0";
                fields.join(",") + "\n"
            } else {
                format!("{}\n", line)
            }
        })
        .collect();
    let dataset =
        load_dataset(&ShillerCsvReader::from_text(csv), &AnalysisConfig::default()).unwrap();
    let export = ExportConfig {
        cape: stockscape_facade::CapeConfig::new(1),
        ..small_export()
    };
    let ui = UiData::compute(&dataset, &export).unwrap();

    // the window ending in row 59 holds only zero earnings
    assert!(ui.data_table[60].cape.is_none());
    assert!(ui.data_table[100].cape.is_some());
    assert_eq!(ui.wr_curve.len(), 50);
    assert!(ui
        .wr_curve
        .iter()
        .all(|p| p.cape.is_finite() && p.wr.is_finite()));
}

/// Values published for the historical data set.
#[test]
#[ignore] // Requires STOCKSCAPE_IE_DATA pointing at a CSV export of ie_data
fn e2e_historical_fixture() {
    let path = std::env::var("STOCKSCAPE_IE_DATA").expect("STOCKSCAPE_IE_DATA is not set");
    let dataset = load_dataset(&ShillerCsvReader::from_path(path), &AnalysisConfig::default())
        .expect("fixture should load");

    let cape = CapeTable::from_config(dataset.real(), &Default::default()).unwrap();
    assert_eq!(cape.series().start(), m(1881, 1));

    let stock = StockReturnsTable::compute(&dataset, 10).unwrap();
    let bond = BondReturnsTable::compute(&dataset, 10).unwrap();
    let inflation = InflationTable::compute(&dataset, 10).unwrap();
    let warranted = WarrantedReturnsTable::compute(&cape, &stock).unwrap();

    let may_2005 = m(2005, 5);
    assert!((stock.annualized().get(may_2005) - 0.060458).abs() < 1e-5);
    assert!((warranted.warranted_return().get(may_2005) - 0.038986).abs() < 1e-5);
    assert!((bond.annualized().get(may_2005) - 0.020622).abs() < 1e-5);
    assert!((inflation.forward_inflation().get(may_2005) - 0.020358).abs() < 1e-5);

    let analysis = Analysis::run(&dataset, &AnalysisConfig::default()).unwrap();
    let may_2017 = m(2017, 5);
    let five = analysis.prediction().get_for(5, may_2017).unwrap();
    assert!((five.min - -0.001264).abs() < 1e-5);
    assert!((five.ci_low - -0.004987).abs() < 1e-5);
    assert!((five.estimate - 0.028511).abs() < 1e-5);
    assert!((five.ci_high - 0.054371).abs() < 1e-5);
    assert!((five.max - 0.051764).abs() < 1e-5);

    let twenty = analysis.prediction().get_for(20, may_2017).unwrap();
    assert!((twenty.min - -0.011518).abs() < 1e-5);
}
