pub mod dataset_builder;
pub mod listing_extractor;
pub mod style_lookup;

pub use dataset_builder::DatasetBuilder;
pub use listing_extractor::ListingExtractor;
pub use style_lookup::PropertyType;
