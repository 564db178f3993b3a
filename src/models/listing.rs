use serde::{Deserialize, Serialize};

/// One fetched listing page: the rendered content plus the URL it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageCapture {
    pub url: String,
    pub content: String,
}

/// Raw string fields extracted from a single listing page.
///
/// Every field degrades independently: an extraction miss leaves the empty
/// string rather than failing the record. Full-record equality (including
/// `url`) is the deduplication key used by the dataset builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawListing {
    pub address: String,
    pub zip: String,
    pub community: String,
    pub price: String,
    pub beds: String,
    pub baths: String,
    pub size: String,
    pub style: String,
    pub lot: String,
    pub year_built: String,
    pub status: String,
    pub sold_date: String,
    pub parking: String,
    pub broker_comp: String,
    pub url: String,
}
