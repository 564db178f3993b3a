use anyhow::{Context, Result};
use tracing::{error, info, warn};

use config::PipelineConfig;
use fetcher::{ListingFetcher, SearchFetcher};
use models::{PageCapture, RawListing};
use processor::{DatasetBuilder, ListingExtractor};
use storage::{DatasetWriter, SnapshotStore};

mod config;
mod fetcher;
mod models;
mod processor;
mod storage;

const DEFAULT_CONFIG_PATH: &str = "configs/pipeline.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Rebuild from the latest snapshot instead of fetching anything
    let from_snapshots = std::env::args().any(|arg| arg == "--from-snapshots" || arg == "-s");

    let config_path =
        std::env::var("PIPELINE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = PipelineConfig::from_file(&config_path)
        .with_context(|| format!("Failed to load pipeline configuration from {}", config_path))?;

    if from_snapshots {
        info!("🚀 Starting listing pipeline (rebuilding from latest snapshot)");
    } else {
        info!("🚀 Starting listing pipeline (fetching from {})", config.site.name);
    }

    let store = SnapshotStore::new(&config.storage.snapshot_dir);

    let captures = if from_snapshots {
        store
            .load_latest()
            .context("No usable snapshot to rebuild from")?
    } else {
        fetch_and_snapshot(&config, &store).await?
    };

    info!("Processing {} captured pages", captures.len());

    let extractor = ListingExtractor::new();
    let records: Vec<RawListing> = captures
        .iter()
        .map(|capture| extractor.extract(&capture.content, &capture.url))
        .collect();

    let builder = DatasetBuilder::new();
    let mut df = builder.build(&records)?;

    if df.height() == 0 {
        warn!("⚠️ No rows in the final dataset; nothing to write");
        return Ok(());
    }

    let writer = DatasetWriter::new(&config.storage.output_dir);
    let csv_path = writer.write_csv(&mut df)?;
    let parquet_path = writer.write_parquet(&mut df)?;

    info!("\n=== Pipeline Summary ===");
    info!("📊 {} listings in the final dataset", df.height());
    info!("✅ CSV written to {}", csv_path.display());
    info!("✅ Parquet written to {}", parquet_path.display());

    Ok(())
}

/// Discover listing links, then fetch pages in snapshot-sized batches so a
/// crashed or interrupted run can resume from the last snapshot.
async fn fetch_and_snapshot(
    config: &PipelineConfig,
    store: &SnapshotStore,
) -> Result<Vec<PageCapture>> {
    let search = SearchFetcher::new(config.clone())?;
    let discovery = search.discover().await?;

    if !discovery.pages_missed.is_empty() {
        warn!(
            "{} search pages could not be fetched",
            discovery.pages_missed.len()
        );
    }
    if discovery.listing_links.is_empty() {
        warn!("No listing links discovered");
        return Ok(Vec::new());
    }

    let fetcher = ListingFetcher::new(config.clone())?;
    let mut captures: Vec<PageCapture> = Vec::new();
    let chunk_size = config.storage.snapshot_every.max(1);

    for chunk in discovery.listing_links.chunks(chunk_size) {
        match fetcher.fetch_batch(chunk).await {
            Ok(batch) => {
                captures.extend(batch);
                if let Err(e) = store.store(&captures) {
                    error!("Failed to snapshot captures: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to fetch a batch of {} listings: {}", chunk.len(), e);
            }
        }
    }

    Ok(captures)
}
