pub mod ingest;
pub mod runner;
pub mod stats;

pub use ingest::IngestJob;
pub use runner::{JobHandles, JobRunner};
pub use stats::StatsJob;
