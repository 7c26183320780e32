use dns_sentry_application::ports::DomainCacheStore;
use dns_sentry_application::use_cases::ReportStatsUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Interval-driven query-counter flush.
///
/// Sleeps up to the configured interval per cycle and returns early on
/// the cancellation token, so shutdown never waits a full interval.
pub struct StatsJob {
    cache: Arc<dyn DomainCacheStore>,
    report_stats: Arc<ReportStatsUseCase>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl StatsJob {
    pub fn new(cache: Arc<dyn DomainCacheStore>, report_stats: Arc<ReportStatsUseCase>) -> Self {
        Self {
            cache,
            report_stats,
            interval_secs: 60,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        info!(interval_secs = self.interval_secs, "Stats loop started");

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(Duration::from_secs(self.interval_secs)) => {
                    self.report_stats.execute().await;
                    self.snapshot().await;
                }
            }
        }

        info!("Stats loop stopped");
    }

    async fn snapshot(&self) {
        if let (Ok(entries), Ok(pending)) =
            (self.cache.size().await, self.cache.pending_count().await)
        {
            debug!(entries, pending, "Cache snapshot");
        }
    }
}
