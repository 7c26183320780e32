use dns_sentry_application::ports::{ClassifierGateway, DomainCacheStore};
use dns_sentry_application::use_cases::{
    ObserveDomainUseCase, ReportPendingUseCase, ReportStatsUseCase,
};
use dns_sentry_domain::{Config, DomainError};
use dns_sentry_infrastructure::{HttpClassifierGateway, RedisDomainCache};
use dns_sentry_jobs::{IngestJob, JobHandles, JobRunner, StatsJob};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

/// Adapters and use cases wired against the configuration.
pub struct Services {
    pub cache: Arc<dyn DomainCacheStore>,
    pub observe: Arc<ObserveDomainUseCase>,
    pub report_pending: Arc<ReportPendingUseCase>,
    pub report_stats: Arc<ReportStatsUseCase>,
}

impl Services {
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        let cache: Arc<dyn DomainCacheStore> = Arc::new(RedisDomainCache::new(
            config.cache.redis_url.clone(),
            config.cache.max_size,
            config.cache.ttl,
        ));
        let gateway: Arc<dyn ClassifierGateway> =
            Arc::new(HttpClassifierGateway::new(&config.reporter)?);

        let observe = Arc::new(ObserveDomainUseCase::new(cache.clone()));
        let report_pending = Arc::new(ReportPendingUseCase::new(cache.clone(), gateway.clone()));
        let report_stats = Arc::new(ReportStatsUseCase::new(cache.clone(), gateway.clone()));

        Ok(Self {
            cache,
            observe,
            report_pending,
            report_stats,
        })
    }
}

pub fn start_jobs(
    config: &Config,
    services: &Services,
    ingress: UnboundedReceiver<String>,
    shutdown: CancellationToken,
) -> JobHandles {
    let ingest = IngestJob::new(
        services.cache.clone(),
        services.observe.clone(),
        services.report_pending.clone(),
        ingress,
    )
    .with_report_policy(
        config.reporter.report_threshold,
        config.reporter.max_retries,
        Duration::from_secs(config.reporter.retry_delay_secs),
    );

    let stats = StatsJob::new(services.cache.clone(), services.report_stats.clone())
        .with_interval(config.stats.interval_secs);

    JobRunner::new()
        .with_ingest(ingest)
        .with_stats(stats)
        .with_shutdown_token(shutdown)
        .start()
}
