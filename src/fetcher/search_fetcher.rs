use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Result, anyhow};
use scraper::{Html, Selector};
use tokio::time::sleep;
use tracing::{info, warn};
use wreq::Client;
use wreq_util::Emulation;

use crate::config::PipelineConfig;

/// Listing links discovered across all configured area pages, plus the
/// search pages that could not be fetched.
#[derive(Debug)]
pub struct DiscoveryResult {
    pub listing_links: Vec<String>,
    pub pages_missed: Vec<String>,
}

/// Walks area search pages and collects relative listing links.
pub struct SearchFetcher {
    client: Client,
    config: PipelineConfig,
}

impl SearchFetcher {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let client = Client::builder()
            .emulation(Emulation::Firefox136)
            .build()?;

        Ok(SearchFetcher { client, config })
    }

    /// Sweep every configured area page through its numbered result pages.
    ///
    /// Overlapping areas surface the same listing more than once, so links
    /// are deduplicated while preserving first-seen order. A search page
    /// that fails to fetch is recorded and skipped; the sweep never aborts.
    pub async fn discover(&self) -> Result<DiscoveryResult> {
        let mut seen = HashSet::new();
        let mut listing_links = Vec::new();
        let mut pages_missed = Vec::new();

        for area_page in &self.config.search.area_pages {
            for page in 1..=self.config.scraping.max_pages_per_area {
                let target_url = if page > 1 {
                    format!("{}/page-{}", area_page, page)
                } else {
                    area_page.clone()
                };

                match self.fetch_page(&target_url).await {
                    Ok(html) => {
                        let links = parse_listing_links(&html);
                        info!("Found {} listing links on {}", links.len(), target_url);
                        for link in links {
                            if seen.insert(link.clone()) {
                                listing_links.push(link);
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Failed to fetch search page {}: {}", target_url, e);
                        pages_missed.push(target_url);
                    }
                }

                let delay = Duration::from_millis(
                    self.config.scraping.delay_between_requests_ms
                        + (rand::random::<u64>() % 1000),
                );
                sleep(delay).await;
            }
        }

        info!(
            "Discovered {} unique listing links ({} search pages missed)",
            listing_links.len(),
            pages_missed.len()
        );

        Ok(DiscoveryResult {
            listing_links,
            pages_missed,
        })
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

        let html = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response text: {}", e))?;

        if html.is_empty() {
            return Err(anyhow!("Empty HTML response"));
        }

        Ok(html)
    }
}

/// Relative listing links on one search results page.
pub fn parse_listing_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a.slider-item.hidden") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_listing_links() {
        let html = r#"<html><body>
            <a class="slider-item hidden" href="/WA/Seattle/1-First-Ave/home/1"></a>
            <a class="slider-item hidden" href="/WA/Seattle/2-Second-Ave/home/2"></a>
            <a class="other" href="/not-a-listing"></a>
        </body></html>"#;

        let links = parse_listing_links(html);
        assert_eq!(
            links,
            vec![
                "/WA/Seattle/1-First-Ave/home/1".to_string(),
                "/WA/Seattle/2-Second-Ave/home/2".to_string(),
            ]
        );
    }

    #[test]
    fn test_pages_without_listings_yield_nothing() {
        assert!(parse_listing_links("<html><body></body></html>").is_empty());
        assert!(parse_listing_links("").is_empty());
    }
}
