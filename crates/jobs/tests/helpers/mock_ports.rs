#![allow(dead_code)]

use async_trait::async_trait;
use dns_sentry_application::ports::{
    ClassifierGateway, DomainCacheStore, DomainReport, StatsReport,
};
use dns_sentry_domain::{
    unix_now, DomainAction, DomainEntry, DomainError, DomainMeta, DomainStatus, TtlConfig,
};
use std::collections::{BTreeSet, HashMap, VecDeque};
use tokio::sync::RwLock;

// ============================================================================
// Mock DomainCacheStore
// ============================================================================

/// In-memory stand-in for the backend store, mirroring its write
/// semantics (counter bump on unchanged status, ttl from the table,
/// pending-set membership added on insert only).
pub struct MockDomainCacheStore {
    entries: RwLock<HashMap<String, DomainEntry>>,
    pending: RwLock<BTreeSet<String>>,
    ttl: TtlConfig,
    should_fail: RwLock<bool>,
}

impl MockDomainCacheStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            pending: RwLock::new(BTreeSet::new()),
            ttl: TtlConfig::default(),
            should_fail: RwLock::new(false),
        }
    }

    pub async fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.write().await = should_fail;
    }

    /// Seeds an entry directly, bypassing insert semantics (no
    /// pending-set membership).
    pub async fn seed(
        &self,
        domain: &str,
        status: DomainStatus,
        action: DomainAction,
        query_count: u32,
    ) {
        let now = unix_now();
        self.entries.write().await.insert(
            domain.to_string(),
            DomainEntry {
                domain: domain.to_string(),
                status,
                action,
                query_count,
                last_updated: now,
                last_accessed: now,
                ttl: self.ttl.ttl_for(status, action),
            },
        );
    }

    pub async fn seed_pending(&self, domain: &str) {
        self.pending.write().await.insert(domain.to_string());
    }

    pub async fn entry(&self, domain: &str) -> Option<DomainEntry> {
        self.entries.read().await.get(domain).cloned()
    }

    pub async fn pending_snapshot(&self) -> Vec<String> {
        self.pending.read().await.iter().cloned().collect()
    }

    async fn check_backend(&self) -> Result<(), DomainError> {
        if *self.should_fail.read().await {
            return Err(DomainError::CacheBackend("mock backend down".to_string()));
        }
        Ok(())
    }

    async fn write_entry(
        &self,
        domain: &str,
        status: DomainStatus,
        action: DomainAction,
        query_count: u32,
    ) {
        let now = unix_now();
        self.entries.write().await.insert(
            domain.to_string(),
            DomainEntry {
                domain: domain.to_string(),
                status,
                action,
                query_count,
                last_updated: now,
                last_accessed: now,
                ttl: self.ttl.ttl_for(status, action),
            },
        );
    }
}

#[async_trait]
impl DomainCacheStore for MockDomainCacheStore {
    async fn insert(
        &self,
        domain: &str,
        status: DomainStatus,
        action: DomainAction,
    ) -> Result<(), DomainError> {
        self.check_backend().await?;
        if self.entries.read().await.contains_key(domain) {
            return Err(DomainError::CacheBackend(format!(
                "entry already exists for {domain}"
            )));
        }
        self.write_entry(domain, status, action, 1).await;
        self.pending.write().await.insert(domain.to_string());
        Ok(())
    }

    async fn update(
        &self,
        existing: &DomainEntry,
        domain: &str,
        status: DomainStatus,
        action: DomainAction,
    ) -> Result<(), DomainError> {
        self.check_backend().await?;
        let query_count = if existing.status == status {
            existing.query_count + 1
        } else {
            existing.query_count
        };
        self.write_entry(domain, status, action, query_count).await;
        Ok(())
    }

    async fn insert_or_update(
        &self,
        domain: &str,
        status: DomainStatus,
        action: DomainAction,
    ) -> Result<(), DomainError> {
        self.check_backend().await?;
        match self.find(domain).await? {
            Some(existing) => self.update(&existing, domain, status, action).await,
            None => self.insert(domain, status, action).await,
        }
    }

    async fn find(&self, domain: &str) -> Result<Option<DomainEntry>, DomainError> {
        self.check_backend().await?;
        Ok(self.entries.read().await.get(domain).cloned())
    }

    async fn remove(&self, domain: &str) -> Result<(), DomainError> {
        self.check_backend().await?;
        self.entries.write().await.remove(domain);
        Ok(())
    }

    async fn size(&self) -> Result<u64, DomainError> {
        self.check_backend().await?;
        Ok(self.entries.read().await.len() as u64)
    }

    async fn add_to_pending(&self, domain: &str) -> Result<(), DomainError> {
        self.check_backend().await?;
        self.pending.write().await.insert(domain.to_string());
        Ok(())
    }

    async fn pending_domains(&self) -> Result<Vec<String>, DomainError> {
        self.check_backend().await?;
        Ok(self.pending.read().await.iter().cloned().collect())
    }

    async fn pending_count(&self) -> Result<u64, DomainError> {
        self.check_backend().await?;
        Ok(self.pending.read().await.len() as u64)
    }

    async fn clear_pending(&self) -> Result<(), DomainError> {
        self.check_backend().await?;
        self.pending.write().await.clear();
        Ok(())
    }

    async fn all_domain_meta(&self) -> Result<HashMap<String, DomainMeta>, DomainError> {
        self.check_backend().await?;
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .map(|(domain, entry)| {
                (
                    domain.clone(),
                    DomainMeta {
                        status: entry.status,
                        action: entry.action,
                        query_count: entry.query_count,
                    },
                )
            })
            .collect())
    }

    async fn reset_query_count(&self, domain: &str) -> Result<(), DomainError> {
        self.check_backend().await?;
        if let Some(entry) = self.entries.write().await.get_mut(domain) {
            entry.query_count = 0;
        }
        Ok(())
    }
}

// ============================================================================
// Mock ClassifierGateway
// ============================================================================

/// Scripted classifier: submissions pop queued responses (falling back
/// to a 2xx empty body) and every payload is recorded for assertions.
pub struct MockClassifierGateway {
    domain_responses: RwLock<VecDeque<Result<String, DomainError>>>,
    domain_reports: RwLock<Vec<DomainReport>>,
    stats_reports: RwLock<Vec<StatsReport>>,
    fail_stats: RwLock<bool>,
}

impl MockClassifierGateway {
    pub fn new() -> Self {
        Self {
            domain_responses: RwLock::new(VecDeque::new()),
            domain_reports: RwLock::new(Vec::new()),
            stats_reports: RwLock::new(Vec::new()),
            fail_stats: RwLock::new(false),
        }
    }

    pub async fn push_domain_response(&self, response: Result<String, DomainError>) {
        self.domain_responses.write().await.push_back(response);
    }

    pub async fn set_fail_stats(&self, fail: bool) {
        *self.fail_stats.write().await = fail;
    }

    pub async fn domain_report_count(&self) -> usize {
        self.domain_reports.read().await.len()
    }

    pub async fn domain_reports(&self) -> Vec<DomainReport> {
        self.domain_reports.read().await.clone()
    }

    pub async fn stats_reports(&self) -> Vec<StatsReport> {
        self.stats_reports.read().await.clone()
    }
}

#[async_trait]
impl ClassifierGateway for MockClassifierGateway {
    async fn submit_domains(&self, report: &DomainReport) -> Result<String, DomainError> {
        self.domain_reports.write().await.push(report.clone());
        self.domain_responses
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }

    async fn submit_stats(&self, report: &StatsReport) -> Result<(), DomainError> {
        self.stats_reports.write().await.push(report.clone());
        if *self.fail_stats.read().await {
            return Err(DomainError::ClassifierStatus(500));
        }
        Ok(())
    }
}
