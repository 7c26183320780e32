use crate::{IngestJob, StatsJob};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Join handles for the spawned jobs. The ingest handle completes only
/// after the shutdown flush has run.
pub struct JobHandles {
    pub ingest: Option<JoinHandle<()>>,
    pub stats: Option<JoinHandle<()>>,
}

pub struct JobRunner {
    ingest: Option<IngestJob>,
    stats: Option<StatsJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            ingest: None,
            stats: None,
            shutdown: None,
        }
    }

    pub fn with_ingest(mut self, job: IngestJob) -> Self {
        self.ingest = Some(job);
        self
    }

    pub fn with_stats(mut self, job: StatsJob) -> Self {
        self.stats = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub fn start(self) -> JobHandles {
        info!("Starting background jobs");

        let ingest = self.ingest.map(|job| {
            let job = match &self.shutdown {
                Some(token) => job.with_cancellation(token.clone()),
                None => job,
            };
            job.spawn()
        });

        let stats = self.stats.map(|job| {
            let job = match &self.shutdown {
                Some(token) => job.with_cancellation(token.clone()),
                None => job,
            };
            job.spawn()
        });

        JobHandles { ingest, stats }
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
