use async_trait::async_trait;
use dns_sentry_domain::DomainError;
use serde::{Deserialize, Serialize};

/// Batch of domains submitted for classification.
#[derive(Debug, Clone, Serialize)]
pub struct DomainReport {
    pub domains: Vec<String>,
    pub timestamp: i64,
}

/// Per-domain query counters flushed on the stats interval.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub stats: Vec<StatEntry>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatEntry {
    pub domain: String,
    pub action: String,
    pub queries: u32,
}

/// Verdicts carried by a classification response. Either array may be
/// absent and unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerdictResponse {
    #[serde(default)]
    pub permitted: Vec<String>,
    #[serde(default)]
    pub dropped: Vec<String>,
}

/// JSON-over-HTTP transport to the upstream classifier.
///
/// Implementations only speak the wire protocol; state transitions
/// driven by a response belong to the reporting use cases.
#[async_trait]
pub trait ClassifierGateway: Send + Sync {
    /// POSTs a domain batch. Returns the raw response body on a 2xx
    /// status; any other status or a transport failure is an error.
    async fn submit_domains(&self, report: &DomainReport) -> Result<String, DomainError>;

    /// POSTs a stats payload. Only the 2xx status matters; the response
    /// body is discarded.
    async fn submit_stats(&self, report: &StatsReport) -> Result<(), DomainError>;
}
