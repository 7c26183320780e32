use async_trait::async_trait;
use dns_sentry_application::ports::{ClassifierGateway, DomainReport, StatsReport};
use dns_sentry_domain::{DomainError, ReporterConfig};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// JSON-over-HTTP transport to the classifier endpoint.
///
/// The client is built once; the endpoint URL sits behind a lock so it
/// can be swapped at runtime without rebuilding the client.
pub struct HttpClassifierGateway {
    client: reqwest::Client,
    url: RwLock<String>,
}

impl HttpClassifierGateway {
    pub fn new(config: &ReporterConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dns-sentry/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| DomainError::ClassifierTransport(e.to_string()))?;

        Ok(Self {
            client,
            url: RwLock::new(config.url.clone()),
        })
    }

    pub async fn set_url(&self, url: impl Into<String>) {
        *self.url.write().await = url.into();
    }

    async fn endpoint(&self) -> String {
        self.url.read().await.clone()
    }
}

#[async_trait]
impl ClassifierGateway for HttpClassifierGateway {
    async fn submit_domains(&self, report: &DomainReport) -> Result<String, DomainError> {
        let url = self.endpoint().await;
        let response = self
            .client
            .post(&url)
            .json(report)
            .send()
            .await
            .map_err(|e| DomainError::ClassifierTransport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::ClassifierStatus(status.as_u16()));
        }
        debug!(count = report.domains.len(), status = status.as_u16(), "Domain batch accepted");

        response
            .text()
            .await
            .map_err(|e| DomainError::ClassifierTransport(e.to_string()))
    }

    async fn submit_stats(&self, report: &StatsReport) -> Result<(), DomainError> {
        let url = self.endpoint().await;
        let response = self
            .client
            .post(&url)
            .json(report)
            .send()
            .await
            .map_err(|e| DomainError::ClassifierTransport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::ClassifierStatus(status.as_u16()));
        }
        Ok(())
    }
}
