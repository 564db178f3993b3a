pub mod dataset_writer;
pub mod snapshot_store;

pub use dataset_writer::DatasetWriter;
pub use snapshot_store::SnapshotStore;
