use serde::{Deserialize, Serialize};

/// Run configuration for the listing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub site: SiteConfig,
    pub search: SearchConfig,
    #[serde(default)]
    pub scraping: ScrapingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Basic site information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub base_url: String,
}

/// Area search pages to sweep for listing links. Granularity below a city
/// makes areas overlap, which is what produces duplicate listings downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub area_pages: Vec<String>,
}

/// Fetching behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapingConfig {
    pub delay_between_requests_ms: u64,
    pub max_pages_per_area: usize,
    pub max_retries: usize,
    pub timeout_seconds: u64,
}

/// Snapshot and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub snapshot_dir: String,
    pub snapshot_every: usize,
    pub output_dir: String,
}

impl PipelineConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            delay_between_requests_ms: 2000,
            // the source stops serving results past page 17 of an area
            max_pages_per_area: 17,
            max_retries: 3,
            timeout_seconds: 30,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: "data/snapshots".to_string(),
            snapshot_every: 100,
            output_dir: "data/clean".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let scraping = ScrapingConfig::default();
        assert_eq!(scraping.delay_between_requests_ms, 2000);
        assert_eq!(scraping.max_pages_per_area, 17);

        let storage = StorageConfig::default();
        assert_eq!(storage.snapshot_every, 100);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
            [site]
            name = "Example Listings"
            base_url = "https://listings.example.com"

            [search]
            area_pages = [
                "https://listings.example.com/city/filter/include=sold-5yr,viewport=47.74:47.69:-122.30:-122.40",
            ]
        "#;

        let config: PipelineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.site.name, "Example Listings");
        assert_eq!(config.search.area_pages.len(), 1);
        // omitted sections fall back to defaults
        assert_eq!(config.scraping.max_retries, 3);
        assert_eq!(config.storage.output_dir, "data/clean");
    }

    #[test]
    fn test_parse_full_toml_overrides() {
        let toml_str = r#"
            [site]
            name = "Example Listings"
            base_url = "https://listings.example.com"

            [search]
            area_pages = []

            [scraping]
            delay_between_requests_ms = 500
            max_pages_per_area = 3
            max_retries = 1
            timeout_seconds = 10

            [storage]
            snapshot_dir = "/tmp/snapshots"
            snapshot_every = 25
            output_dir = "/tmp/clean"
        "#;

        let config: PipelineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.scraping.max_pages_per_area, 3);
        assert_eq!(config.storage.snapshot_every, 25);
        assert_eq!(config.storage.snapshot_dir, "/tmp/snapshots");
    }
}
