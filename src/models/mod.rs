pub mod listing;

pub use listing::{PageCapture, RawListing};
