use std::{env, error::Error, path::PathBuf};

use agro_metrics::infra::FileQuoteProvider;
use agro_metrics::util::persistence::{
    default_snapshot_path, load_price_snapshot_if_present, save_price_snapshot,
};
use agro_metrics::util::version::{current_version, version_label, APP_NAME};
use agro_metrics::{logging, AgriMetrics, MetricsError, ReferenceTables, Unit};
use tracing::info;

const TABLES_ENV: &str = "AGRO_METRICS_TABLES";
const QUOTE_ENV: &str = "AGRO_METRICS_QUOTE";
const SNAPSHOT_ENV: &str = "AGRO_METRICS_SNAPSHOT";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();
    let version = current_version()?;
    info!(label = %version_label(), %version, "{APP_NAME} starting");

    let tables = match env::var_os(TABLES_ENV) {
        Some(path) => ReferenceTables::from_path(path)?,
        None => ReferenceTables::builtin()?,
    };
    let engine = AgriMetrics::new(tables)?;

    let snapshot_path = env::var_os(SNAPSHOT_ENV)
        .map(PathBuf::from)
        .or_else(default_snapshot_path);
    if let Some(snapshot) = snapshot_path
        .as_deref()
        .and_then(load_price_snapshot_if_present)
    {
        engine.restore_prices(&snapshot);
    }

    if let Some(quote_path) = env::var_os(QUOTE_ENV) {
        let provider = FileQuoteProvider::new(quote_path);
        let updated = engine.refresh_from(&provider).await?;
        if updated > 0 {
            if let Some(path) = snapshot_path.as_deref() {
                save_price_snapshot(path, &engine.price_snapshot())?;
            }
        }
    }

    print_board(&engine)?;
    Ok(())
}

fn print_board(engine: &AgriMetrics) -> Result<(), MetricsError> {
    println!(
        "{:<10} {:>12} {:>14} {:>18}",
        "commodity", "BRL/sack", "BRL/tonne", "benchmark sc/ha"
    );
    for commodity in engine.available_commodities() {
        let per_tonne = engine.calculate_value(1.0, Unit::Tonne, commodity)?;
        let benchmark = engine
            .benchmark(commodity)
            .map(|b| format!("{}/{}/{}", b.min, b.avg, b.max))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<10} {:>12.2} {:>14.2} {:>18}",
            commodity, per_tonne.price_per_sack, per_tonne.total_value, benchmark
        );
    }
    Ok(())
}
