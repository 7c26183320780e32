use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReporterConfig {
    /// Classifier endpoint receiving both domain batches and stats.
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum redirects followed per request.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Pending-set size that triggers a submission batch.
    #[serde(default = "default_report_threshold")]
    pub report_threshold: u64,

    /// Submission attempts per batch before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between submission attempts, in seconds.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            report_threshold: default_report_threshold(),
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:8080/hello".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    3
}

fn default_report_threshold() -> u64 {
    5
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    5
}
