use async_trait::async_trait;
use dns_sentry_domain::{DomainAction, DomainEntry, DomainError, DomainMeta, DomainStatus};
use std::collections::HashMap;

/// Persistent classification cache for observed domains.
///
/// Implementations keep one record per domain plus two auxiliary
/// structures: an LRU index ordered by `last_accessed` that bounds the
/// cache to its configured capacity, and the pending-report set of
/// domains awaiting a successful upstream submission.
#[async_trait]
pub trait DomainCacheStore: Send + Sync {
    /// Creates a new entry with `query_count = 1` and adds the domain to
    /// the pending-report set. Runs eviction first when the store is at
    /// capacity. Fails if the entry already exists.
    async fn insert(
        &self,
        domain: &str,
        status: DomainStatus,
        action: DomainAction,
    ) -> Result<(), DomainError>;

    /// Overwrites status and action, refreshes both timestamps and the
    /// ttl, and increments `query_count` only when the status is
    /// unchanged between `existing` and this write. Does not touch the
    /// pending-report set.
    async fn update(
        &self,
        existing: &DomainEntry,
        domain: &str,
        status: DomainStatus,
        action: DomainAction,
    ) -> Result<(), DomainError>;

    /// Sweeps expired entries, then inserts or updates `domain`.
    async fn insert_or_update(
        &self,
        domain: &str,
        status: DomainStatus,
        action: DomainAction,
    ) -> Result<(), DomainError>;

    async fn find(&self, domain: &str) -> Result<Option<DomainEntry>, DomainError>;

    /// Removes the entry and its LRU index member. Idempotent.
    async fn remove(&self, domain: &str) -> Result<(), DomainError>;

    /// Number of entries in the LRU index.
    async fn size(&self) -> Result<u64, DomainError>;

    async fn add_to_pending(&self, domain: &str) -> Result<(), DomainError>;

    async fn pending_domains(&self) -> Result<Vec<String>, DomainError>;

    async fn pending_count(&self) -> Result<u64, DomainError>;

    async fn clear_pending(&self) -> Result<(), DomainError>;

    /// Status, action and query count for every cached domain.
    async fn all_domain_meta(&self) -> Result<HashMap<String, DomainMeta>, DomainError>;

    /// Zeroes the query counter, touching no other field.
    async fn reset_query_count(&self, domain: &str) -> Result<(), DomainError>;
}
