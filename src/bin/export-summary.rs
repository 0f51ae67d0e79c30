use anyhow::Context;
use chrono::Local;
use horoscope::config::StoreConfig;
use horoscope::domain::summary::build_summary;
use horoscope::report::{build_workbook, export_file_name};
use horoscope::state::open_store;
use std::path::PathBuf;

/// Writes the summary workbook for the configured log into the given
/// directory (default: current directory).
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let conf = StoreConfig::from_env()?;
    let out_dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let store = open_store(&conf).await?;
    let records = store.load_all().await?;

    let summary = build_summary(&records);
    for (label, value) in summary.rows() {
        println!("{label}: {value}");
    }

    let bytes = build_workbook(&records)?;
    let out_path = out_dir.join(export_file_name(&Local::now().naive_local()));
    std::fs::write(&out_path, bytes).with_context(|| format!("writing {}", out_path.display()))?;

    println!("Workbook written to {}", out_path.display());
    Ok(())
}
