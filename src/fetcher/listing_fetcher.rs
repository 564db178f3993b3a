use std::time::Duration;

use anyhow::{Result, anyhow};
use tokio::time::sleep;
use tracing::{info, warn};
use wreq::Client;
use wreq_util::Emulation;

use crate::config::PipelineConfig;
use crate::models::PageCapture;

/// Fetches individual listing pages into `PageCapture`s.
pub struct ListingFetcher {
    client: Client,
    config: PipelineConfig,
}

impl ListingFetcher {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let client = Client::builder()
            .emulation(Emulation::Firefox136)
            .build()?;

        Ok(ListingFetcher { client, config })
    }

    /// Fetch one batch of listing pages. Links are relative; the configured
    /// base URL is prepended. A page that exhausts its retries is logged and
    /// skipped, so the batch always completes. The caller controls batch
    /// size, which is what sets the snapshot cadence.
    pub async fn fetch_batch(&self, links: &[String]) -> Result<Vec<PageCapture>> {
        let mut captures = Vec::with_capacity(links.len());

        for link in links {
            let url = format!("{}{}", self.config.site.base_url, link);
            match self
                .fetch_with_retry(&url, self.config.scraping.max_retries)
                .await
            {
                Ok(content) => captures.push(PageCapture { url, content }),
                Err(e) => warn!("Giving up on listing page {}: {}", url, e),
            }

            let delay = Duration::from_millis(
                self.config.scraping.delay_between_requests_ms
                    + (rand::random::<u64>() % 2000),
            );
            sleep(delay).await;
        }

        info!(
            "Captured {} of {} listing pages in batch",
            captures.len(),
            links.len()
        );
        Ok(captures)
    }

    async fn fetch_with_retry(&self, url: &str, max_retries: usize) -> Result<String> {
        let mut attempts = 0;

        while attempts < max_retries {
            match self.fetch_page(url).await {
                Ok(content) => return Ok(content),
                Err(e) => {
                    attempts += 1;
                    if attempts < max_retries {
                        // Exponential backoff with jitter
                        let delay = Duration::from_millis(
                            1000 * (2_u64.pow(attempts as u32)) + (rand::random::<u64>() % 1000),
                        );
                        warn!(
                            "Attempt {} failed for {}, retrying in {:?}: {}",
                            attempts, url, delay, e
                        );
                        sleep(delay).await;
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(anyhow!("Failed to fetch {} after {} attempts", url, max_retries))
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let request = self.client.get(url).send();
        let response = tokio::time::timeout(
            Duration::from_secs(self.config.scraping.timeout_seconds),
            request,
        )
        .await
        .map_err(|_| anyhow!("Request timed out"))?
        .map_err(|e| anyhow!("Network error: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {}", response.status()));
        }

        let content = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response text: {}", e))?;

        if content.is_empty() {
            return Err(anyhow!("Empty HTML response"));
        }

        if !content.contains("<html") && !content.contains("<div") && !content.contains("<body") {
            return Err(anyhow!("Invalid HTML content"));
        }

        Ok(content)
    }
}
