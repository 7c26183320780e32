use crate::ports::DomainCacheStore;
use dns_sentry_domain::{DomainAction, DomainError, DomainStatus};
use std::sync::Arc;
use tracing::debug;

/// Records one observation of a domain on the wire.
///
/// A first sighting enters the cache fail-closed as `(FAKE, DROP)` and
/// joins the pending-report set; a repeat sighting rewrites the entry
/// with its current state, which refreshes the timestamps and bumps the
/// query counter.
pub struct ObserveDomainUseCase {
    cache: Arc<dyn DomainCacheStore>,
}

impl ObserveDomainUseCase {
    pub fn new(cache: Arc<dyn DomainCacheStore>) -> Self {
        Self { cache }
    }

    pub async fn execute(&self, domain: &str) -> Result<(), DomainError> {
        debug!(domain = %domain, "Observed DNS query");

        match self.cache.find(domain).await? {
            None => {
                self.cache
                    .insert_or_update(domain, DomainStatus::Fake, DomainAction::Drop)
                    .await
            }
            Some(entry) => {
                self.cache
                    .insert_or_update(domain, entry.status, entry.action)
                    .await
            }
        }
    }
}
