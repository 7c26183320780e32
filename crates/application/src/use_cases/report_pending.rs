use crate::ports::{ClassifierGateway, DomainCacheStore, DomainReport, VerdictResponse};
use dns_sentry_domain::{unix_now, DomainAction, DomainStatus};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Submits batches of unclassified domains upstream and applies the
/// returned verdicts to the cache.
pub struct ReportPendingUseCase {
    cache: Arc<dyn DomainCacheStore>,
    gateway: Arc<dyn ClassifierGateway>,
}

impl ReportPendingUseCase {
    pub fn new(cache: Arc<dyn DomainCacheStore>, gateway: Arc<dyn ClassifierGateway>) -> Self {
        Self { cache, gateway }
    }

    /// Drains the pending-report set: snapshots it, drops domains that
    /// have already expired out of the store, and submits the rest with
    /// up to `max_retries` attempts spaced by `retry_delay`. The set is
    /// cleared on the first successful submission (or immediately when
    /// nothing valid is left) and kept intact when every attempt fails,
    /// so the next threshold trigger retries the same batch.
    pub async fn execute(&self, max_retries: u32, retry_delay: Duration) {
        let pending = match self.cache.pending_domains().await {
            Ok(pending) => pending,
            Err(e) => {
                warn!(error = %e, "Could not snapshot pending-report set");
                return;
            }
        };

        let mut batch = Vec::with_capacity(pending.len());
        for domain in pending {
            match self.cache.find(&domain).await {
                Ok(Some(_)) => batch.push(domain),
                Ok(None) => debug!(domain = %domain, "Dropping expired domain from batch"),
                Err(e) => {
                    warn!(error = %e, domain = %domain, "Lookup failed while filtering batch")
                }
            }
        }

        if batch.is_empty() {
            debug!("No valid domains to report");
            if let Err(e) = self.cache.clear_pending().await {
                warn!(error = %e, "Failed to clear pending-report set");
            }
            return;
        }

        let mut attempt = 0;
        let mut success = false;
        while attempt < max_retries && !success {
            success = self.report_once(&batch).await;
            if !success {
                attempt += 1;
                if attempt < max_retries {
                    tokio::time::sleep(retry_delay).await;
                }
            }
        }

        if success {
            if let Err(e) = self.cache.clear_pending().await {
                warn!(error = %e, "Failed to clear pending-report set after submission");
            }
        } else {
            warn!(
                attempts = max_retries,
                count = batch.len(),
                "Domain submission failed after all retries"
            );
        }
    }

    /// One submission attempt. A 2xx response is a success: every
    /// reported domain still cached as FAKE moves to PEND, and any
    /// verdicts in the body are applied on top. The PEND bump happens
    /// before the body is parsed, so entries touched by an unparseable
    /// response stay PEND until the TTL sweep retires them or a later
    /// reply reclassifies them.
    pub async fn report_once(&self, domains: &[String]) -> bool {
        if domains.is_empty() {
            return true;
        }

        let report = DomainReport {
            domains: domains.to_vec(),
            timestamp: unix_now(),
        };

        let body = match self.gateway.submit_domains(&report).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, count = domains.len(), "Domain submission failed");
                return false;
            }
        };

        for domain in domains {
            match self.cache.find(domain).await {
                Ok(Some(entry)) if entry.status == DomainStatus::Fake => {
                    if let Err(e) = self
                        .cache
                        .insert_or_update(domain, DomainStatus::Pend, entry.action)
                        .await
                    {
                        warn!(error = %e, domain = %domain, "Failed to mark domain as submitted");
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, domain = %domain, "Lookup failed after submission")
                }
            }
        }

        match serde_json::from_str::<VerdictResponse>(&body) {
            Ok(verdicts) => self.apply_verdicts(&verdicts).await,
            Err(e) => debug!(error = %e, "Submission response carried no verdict body"),
        }

        true
    }

    async fn apply_verdicts(&self, verdicts: &VerdictResponse) {
        for domain in &verdicts.permitted {
            debug!(domain = %domain, "Classifier verdict: permit");
            if let Err(e) = self
                .cache
                .insert_or_update(domain, DomainStatus::Full, DomainAction::Permit)
                .await
            {
                warn!(error = %e, domain = %domain, "Failed to apply permit verdict");
            }
        }
        for domain in &verdicts.dropped {
            debug!(domain = %domain, "Classifier verdict: drop");
            if let Err(e) = self
                .cache
                .insert_or_update(domain, DomainStatus::Full, DomainAction::Drop)
                .await
            {
                warn!(error = %e, domain = %domain, "Failed to apply drop verdict");
            }
        }
    }
}
