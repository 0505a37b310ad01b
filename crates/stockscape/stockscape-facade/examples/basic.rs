//! Basic example: CAPE analysis of a Shiller `ie_data` CSV export
//!
//! Run with: cargo run --example basic -p stockscape-facade -- ie_data.csv [ui_data.json]
//!
//! Set `RUST_LOG=stockscape_core=debug` to see every table as it is built.

use stockscape_facade::prelude::*;
use stockscape_facade::latest_label;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockscape_core=info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("usage: basic <ie_data.csv> [ui_data.json]");
        return Ok(());
    };
    let output = args.next().unwrap_or_else(|| "ui_data.json".to_string());

    println!("=== Stockscape CAPE Analysis ===\n");

    let config = AnalysisConfig::default();
    let dataset = load_dataset(&ShillerCsvReader::from_path(&input), &config)?;
    let analysis = Analysis::run(&dataset, &config)?;

    let cape = analysis.cape().series();
    if let Some((month, value)) = cape.last_defined() {
        println!("1. CAPE in {}: {:.2}", month, value);
    }
    println!(
        "   CAPE range: {:.2} .. {:.2}",
        cape.min(),
        cape.max()
    );

    let stock = analysis.stock_returns().annualized();
    if let Some(label) = latest_label(stock) {
        println!("2. Latest realized {}-year return starts {}", config.horizon_years, label);
    }

    let prediction = analysis.prediction();
    if let Some(&month) = prediction.months().last() {
        println!("3. Predicted {} for {}:", prediction.label(), month);
        for group in prediction.groups() {
            if let Some(e) = prediction.get_for(group.neighbors, month) {
                println!(
                    "   {:>2} neighbors: {:.4} [{:.4}, {:.4}] (min {:.4}, max {:.4})",
                    group.neighbors, e.estimate, e.ci_low, e.ci_high, e.min, e.max
                );
            }
        }
    }

    let ui = UiData::compute(&dataset, &ExportConfig::default())?;
    ui.write(&output)?;
    println!("\n4. Wrote {} records to {}", ui.data_table.len(), output);

    println!("\n=== Analysis Complete ===");
    Ok(())
}
