use dns_sentry_application::ports::DomainCacheStore;
use dns_sentry_application::use_cases::{ObserveDomainUseCase, ReportPendingUseCase};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::{Mutex, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const DRAIN_GRACE: Duration = Duration::from_millis(300);

/// Consumes observed domains from the ingress channel, records each one
/// through a bounded worker pool, and fires the reporter whenever the
/// pending-report set reaches the configured threshold.
///
/// Every cache composite (lookup-then-upsert in the workers, the
/// threshold-triggered report, the shutdown flush) runs under one
/// job-level mutex, so per-domain state transitions are linearizable.
/// Ordering across domains is not guaranteed.
pub struct IngestJob {
    cache: Arc<dyn DomainCacheStore>,
    observe: Arc<ObserveDomainUseCase>,
    report: Arc<ReportPendingUseCase>,
    ingress: UnboundedReceiver<String>,
    workers: usize,
    report_threshold: u64,
    max_retries: u32,
    retry_delay: Duration,
    shutdown: CancellationToken,
}

impl IngestJob {
    pub fn new(
        cache: Arc<dyn DomainCacheStore>,
        observe: Arc<ObserveDomainUseCase>,
        report: Arc<ReportPendingUseCase>,
        ingress: UnboundedReceiver<String>,
    ) -> Self {
        Self {
            cache,
            observe,
            report,
            ingress,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            report_threshold: 5,
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_report_policy(
        mut self,
        threshold: u64,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Self {
        self.report_threshold = threshold;
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        let pool = Arc::new(Semaphore::new(self.workers));
        let composite_lock = Arc::new(Mutex::new(()));

        info!(
            workers = self.workers,
            threshold = self.report_threshold,
            "Ingest loop started"
        );

        loop {
            let domain = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                received = self.ingress.recv() => match received {
                    Some(domain) => domain,
                    None => break,
                },
            };

            // Empty string is the shutdown wake token.
            if domain.is_empty() {
                continue;
            }

            let permit = match Arc::clone(&pool).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let observe = Arc::clone(&self.observe);
            let lock = Arc::clone(&composite_lock);
            tokio::spawn(async move {
                let _permit = permit;
                let _guard = lock.lock().await;
                if let Err(e) = observe.execute(&domain).await {
                    warn!(error = %e, domain = %domain, "Domain ingest failed");
                }
            });

            match self.cache.pending_count().await {
                Ok(count) if count >= self.report_threshold => {
                    let _guard = composite_lock.lock().await;
                    self.report.execute(self.max_retries, self.retry_delay).await;
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Could not read pending count"),
            }
        }

        // Let in-flight workers land before the final flush.
        tokio::time::sleep(DRAIN_GRACE).await;
        {
            let _guard = composite_lock.lock().await;
            self.report.execute(self.max_retries, self.retry_delay).await;
        }

        info!("Ingest loop stopped");
    }
}
