use super::scripts;
use async_trait::async_trait;
use dns_sentry_application::ports::DomainCacheStore;
use dns_sentry_domain::{
    unix_now, DomainAction, DomainEntry, DomainError, DomainMeta, DomainStatus, TtlConfig,
};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

const LRU_KEY: &str = "lru";
const PENDING_KEY: &str = "pending_report_domains";

fn entry_key(domain: &str) -> String {
    format!("entries:{domain}")
}

fn backend_err(e: redis::RedisError) -> DomainError {
    DomainError::CacheBackend(e.to_string())
}

fn get_i64(
    domain: &str,
    fields: &HashMap<String, String>,
    name: &str,
) -> Result<i64, DomainError> {
    fields
        .get(name)
        .ok_or_else(|| DomainError::InvalidEntry(domain.to_string(), format!("missing '{name}'")))?
        .parse::<i64>()
        .map_err(|_| DomainError::InvalidEntry(domain.to_string(), format!("non-numeric '{name}'")))
}

fn parse_entry(domain: &str, fields: &HashMap<String, String>) -> Result<DomainEntry, DomainError> {
    let status = DomainStatus::from_code(get_i64(domain, fields, "status")?).ok_or_else(|| {
        DomainError::InvalidEntry(domain.to_string(), "unknown status code".to_string())
    })?;
    let action = DomainAction::from_code(get_i64(domain, fields, "action")?).ok_or_else(|| {
        DomainError::InvalidEntry(domain.to_string(), "unknown action code".to_string())
    })?;

    Ok(DomainEntry {
        domain: fields
            .get("domain")
            .cloned()
            .unwrap_or_else(|| domain.to_string()),
        status,
        action,
        query_count: get_i64(domain, fields, "query_count")? as u32,
        last_updated: get_i64(domain, fields, "last_updated")?,
        last_accessed: get_i64(domain, fields, "last_accessed")?,
        ttl: get_i64(domain, fields, "ttl")?,
    })
}

/// `DomainCacheStore` over a Redis-compatible backend.
///
/// One hash per domain under `entries:<domain>`, an `lru` sorted set
/// scored by `last_accessed`, and the `pending_report_domains` set.
/// Eviction and TTL sweeps run as server-side scripts so their
/// read-then-delete steps cannot race other clients.
pub struct RedisDomainCache {
    url: String,
    max_size: u64,
    ttl: TtlConfig,
    conn: Mutex<Option<ConnectionManager>>,
    evict_script: Script,
    sweep_script: Script,
}

impl RedisDomainCache {
    pub fn new(url: impl Into<String>, max_size: u64, ttl: TtlConfig) -> Self {
        Self {
            url: url.into(),
            max_size,
            ttl,
            conn: Mutex::new(None),
            evict_script: Script::new(scripts::EVICT_LRU),
            sweep_script: Script::new(scripts::SWEEP_EXPIRED),
        }
    }

    /// Shared connection manager, dialed on first use. AUTH happens at
    /// construction through the URL; the manager replaces broken
    /// connections internally, so callers never see a stale handle.
    async fn connection(&self) -> Result<ConnectionManager, DomainError> {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }
        let client = redis::Client::open(self.url.as_str()).map_err(backend_err)?;
        let manager = ConnectionManager::new(client).await.map_err(backend_err)?;
        info!("Connected to cache backend");
        *guard = Some(manager.clone());
        Ok(manager)
    }

    fn eviction_batch(max_size: u64) -> i64 {
        std::cmp::max(2, (max_size / 10) as i64)
    }

    /// Runs before every insert: at capacity, drop the coldest tenth of
    /// the cache (at least two entries) in one atomic script.
    async fn make_room(&self, conn: &mut ConnectionManager) -> Result<(), DomainError> {
        let current: u64 = conn.zcard(LRU_KEY).await.map_err(backend_err)?;
        if current < self.max_size {
            return Ok(());
        }
        let batch = Self::eviction_batch(self.max_size);
        let evicted: i64 = self
            .evict_script
            .arg(batch - 1)
            .invoke_async(conn)
            .await
            .map_err(backend_err)?;
        debug!(evicted, "Evicted least-recently-used entries");
        Ok(())
    }

    async fn cleanup_expired(&self, conn: &mut ConnectionManager) -> Result<(), DomainError> {
        let _walked: i64 = self
            .sweep_script
            .arg(unix_now())
            .invoke_async(conn)
            .await
            .map_err(backend_err)?;
        Ok(())
    }

    async fn write_entry(
        &self,
        conn: &mut ConnectionManager,
        domain: &str,
        status: DomainStatus,
        action: DomainAction,
        query_count: u32,
    ) -> Result<(), DomainError> {
        let now = unix_now();
        let ttl = self.ttl.ttl_for(status, action);
        let fields = [
            ("domain", domain.to_string()),
            ("status", status.code().to_string()),
            ("action", action.code().to_string()),
            ("last_updated", now.to_string()),
            ("last_accessed", now.to_string()),
            ("query_count", query_count.to_string()),
            ("ttl", ttl.to_string()),
        ];
        let _: () = conn
            .hset_multiple(entry_key(domain), &fields)
            .await
            .map_err(backend_err)?;
        let _: () = conn.zadd(LRU_KEY, domain, now).await.map_err(backend_err)?;
        Ok(())
    }
}

#[async_trait]
impl DomainCacheStore for RedisDomainCache {
    async fn insert(
        &self,
        domain: &str,
        status: DomainStatus,
        action: DomainAction,
    ) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;
        self.make_room(&mut conn).await?;
        self.write_entry(&mut conn, domain, status, action, 1).await?;
        self.add_to_pending(domain).await?;
        debug!(domain = %domain, status = %status, action = %action, "Cached new domain");
        Ok(())
    }

    async fn update(
        &self,
        existing: &DomainEntry,
        domain: &str,
        status: DomainStatus,
        action: DomainAction,
    ) -> Result<(), DomainError> {
        // A status transition is not a user query; the counter only
        // moves when the status is rewritten in place.
        let query_count = if existing.status == status {
            existing.query_count + 1
        } else {
            existing.query_count
        };
        let mut conn = self.connection().await?;
        self.write_entry(&mut conn, domain, status, action, query_count)
            .await?;
        debug!(domain = %domain, status = %status, action = %action, "Updated domain");
        Ok(())
    }

    async fn insert_or_update(
        &self,
        domain: &str,
        status: DomainStatus,
        action: DomainAction,
    ) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;
        self.cleanup_expired(&mut conn).await?;
        match self.find(domain).await? {
            Some(existing) => self.update(&existing, domain, status, action).await,
            None => self.insert(domain, status, action).await,
        }
    }

    async fn find(&self, domain: &str) -> Result<Option<DomainEntry>, DomainError> {
        let mut conn = self.connection().await?;
        let fields: HashMap<String, String> = conn
            .hgetall(entry_key(domain))
            .await
            .map_err(backend_err)?;
        if fields.is_empty() {
            return Ok(None);
        }
        parse_entry(domain, &fields).map(Some)
    }

    async fn remove(&self, domain: &str) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(entry_key(domain)).await.map_err(backend_err)?;
        let _: () = conn.zrem(LRU_KEY, domain).await.map_err(backend_err)?;
        debug!(domain = %domain, "Removed domain");
        Ok(())
    }

    async fn size(&self) -> Result<u64, DomainError> {
        let mut conn = self.connection().await?;
        conn.zcard(LRU_KEY).await.map_err(backend_err)
    }

    async fn add_to_pending(&self, domain: &str) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;
        let _: () = conn.sadd(PENDING_KEY, domain).await.map_err(backend_err)?;
        Ok(())
    }

    async fn pending_domains(&self) -> Result<Vec<String>, DomainError> {
        let mut conn = self.connection().await?;
        conn.smembers(PENDING_KEY).await.map_err(backend_err)
    }

    async fn pending_count(&self) -> Result<u64, DomainError> {
        let mut conn = self.connection().await?;
        conn.scard(PENDING_KEY).await.map_err(backend_err)
    }

    async fn clear_pending(&self) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(PENDING_KEY).await.map_err(backend_err)?;
        Ok(())
    }

    async fn all_domain_meta(&self) -> Result<HashMap<String, DomainMeta>, DomainError> {
        let mut conn = self.connection().await?;
        let domains: Vec<String> = conn
            .zrange(LRU_KEY, 0, -1)
            .await
            .map_err(backend_err)?;

        let meta_fields: &[&str] = &["status", "action", "query_count"];
        let mut result = HashMap::with_capacity(domains.len());
        for domain in domains {
            let values: Vec<Option<String>> = conn
                .hget(entry_key(&domain), meta_fields)
                .await
                .map_err(backend_err)?;
            let (Some(status), Some(action), query_count) = (
                values.first().cloned().flatten(),
                values.get(1).cloned().flatten(),
                values.get(2).cloned().flatten(),
            ) else {
                continue;
            };
            let (Some(status), Some(action)) = (
                status.parse::<i64>().ok().and_then(DomainStatus::from_code),
                action.parse::<i64>().ok().and_then(DomainAction::from_code),
            ) else {
                continue;
            };
            let query_count = query_count
                .and_then(|count| count.parse::<u32>().ok())
                .unwrap_or(0);
            result.insert(
                domain,
                DomainMeta {
                    status,
                    action,
                    query_count,
                },
            );
        }
        Ok(result)
    }

    async fn reset_query_count(&self, domain: &str) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .hset(entry_key(domain), "query_count", 0)
            .await
            .map_err(backend_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eviction_batch_is_a_tenth_with_floor_of_two() {
        assert_eq!(RedisDomainCache::eviction_batch(10), 2);
        assert_eq!(RedisDomainCache::eviction_batch(19), 2);
        assert_eq!(RedisDomainCache::eviction_batch(20), 2);
        assert_eq!(RedisDomainCache::eviction_batch(100), 10);
        assert_eq!(RedisDomainCache::eviction_batch(10_000), 1_000);
    }

    #[test]
    fn parse_entry_reads_all_fields() {
        let fields: HashMap<String, String> = [
            ("domain", "a.example"),
            ("status", "1"),
            ("action", "0"),
            ("query_count", "4"),
            ("last_updated", "1700000000"),
            ("last_accessed", "1700000000"),
            ("ttl", "600"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let entry = parse_entry("a.example", &fields).unwrap();
        assert_eq!(entry.domain, "a.example");
        assert_eq!(entry.status, DomainStatus::Pend);
        assert_eq!(entry.action, DomainAction::Drop);
        assert_eq!(entry.query_count, 4);
        assert_eq!(entry.ttl, 600);
    }

    #[test]
    fn parse_entry_rejects_missing_or_garbled_fields() {
        let mut fields: HashMap<String, String> = [
            ("status", "2"),
            ("action", "1"),
            ("query_count", "1"),
            ("last_updated", "1700000000"),
            ("last_accessed", "1700000000"),
            ("ttl", "86400"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert!(parse_entry("a.example", &fields).is_ok());

        fields.insert("status".to_string(), "9".to_string());
        assert!(parse_entry("a.example", &fields).is_err());

        fields.remove("status");
        assert!(parse_entry("a.example", &fields).is_err());
    }
}
