mod classifier;
mod domain_cache;

pub use classifier::{ClassifierGateway, DomainReport, StatEntry, StatsReport, VerdictResponse};
pub use domain_cache::DomainCacheStore;
