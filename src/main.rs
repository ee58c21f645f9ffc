//! Hotel records API server.
//!
//! Serves the record API over HTTP, persisting to one JSON document file.

use std::sync::Arc;

use hotel_records::config::{Config, USAGE};
use hotel_records::{records, FileStore, RecordService};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };

    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    info!(
        addr = %config.addr(),
        db = %config.db_path.display(),
        save_retries = config.save_retries,
        "starting"
    );

    let service = RecordService::new(FileStore::new(&config.db_path))
        .with_save_retries(config.save_retries);
    records::serve(Arc::new(service), &config.addr()).await?;

    Ok(())
}
