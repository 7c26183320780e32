use crate::ports::{ClassifierGateway, DomainCacheStore, StatEntry, StatsReport};
use dns_sentry_domain::unix_now;
use std::sync::Arc;
use tracing::{debug, warn};

/// Flushes per-domain query counters to the classifier.
///
/// Counters are reset only for the domains acknowledged by a 2xx
/// response; a failed flush leaves them accumulating for the next
/// interval. No retries.
pub struct ReportStatsUseCase {
    cache: Arc<dyn DomainCacheStore>,
    gateway: Arc<dyn ClassifierGateway>,
}

impl ReportStatsUseCase {
    pub fn new(cache: Arc<dyn DomainCacheStore>, gateway: Arc<dyn ClassifierGateway>) -> Self {
        Self { cache, gateway }
    }

    pub async fn execute(&self) {
        let all = match self.cache.all_domain_meta().await {
            Ok(all) => all,
            Err(e) => {
                warn!(error = %e, "Could not project cache for stats");
                return;
            }
        };

        let stats: Vec<StatEntry> = all
            .into_iter()
            .filter(|(_, meta)| meta.query_count > 0)
            .map(|(domain, meta)| StatEntry {
                domain,
                action: meta.action.to_string(),
                queries: meta.query_count,
            })
            .collect();

        let report = StatsReport {
            stats,
            timestamp: unix_now(),
        };

        match self.gateway.submit_stats(&report).await {
            Ok(()) => {
                debug!(count = report.stats.len(), "Stats reported");
                for entry in &report.stats {
                    if let Err(e) = self.cache.reset_query_count(&entry.domain).await {
                        warn!(error = %e, domain = %entry.domain, "Failed to reset query count");
                    }
                }
            }
            Err(e) => warn!(error = %e, "Stats report failed"),
        }
    }
}
