use serde::{Deserialize, Serialize};

use crate::domain_entry::{DomainAction, DomainStatus};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Connection URL for the Redis-compatible backend; credentials go
    /// in the URL (`redis://:password@host:port`).
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Entry count at which LRU eviction kicks in.
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Per-state entry lifetimes.
    #[serde(default)]
    pub ttl: TtlConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            max_size: default_max_size(),
            ttl: TtlConfig::default(),
        }
    }
}

/// Entry lifetimes in seconds, keyed by classification state.
///
/// The table is a pure function of `(status, action)`; it is consulted
/// on every write so that a status transition always restarts the
/// expiry window.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct TtlConfig {
    #[serde(default = "default_fake_ttl")]
    pub fake: i64,

    #[serde(default = "default_pend_ttl")]
    pub pend: i64,

    #[serde(default = "default_full_permit_ttl")]
    pub full_permit: i64,

    #[serde(default = "default_full_drop_ttl")]
    pub full_drop: i64,
}

impl TtlConfig {
    pub fn ttl_for(&self, status: DomainStatus, action: DomainAction) -> i64 {
        match status {
            DomainStatus::Fake => self.fake,
            DomainStatus::Pend => self.pend,
            DomainStatus::Full => match action {
                DomainAction::Permit => self.full_permit,
                DomainAction::Drop => self.full_drop,
            },
        }
    }
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            fake: default_fake_ttl(),
            pend: default_pend_ttl(),
            full_permit: default_full_permit_ttl(),
            full_drop: default_full_drop_ttl(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_max_size() -> u64 {
    10_000
}

fn default_fake_ttl() -> i64 {
    300
}

fn default_pend_ttl() -> i64 {
    600
}

fn default_full_permit_ttl() -> i64 {
    86_400
}

fn default_full_drop_ttl() -> i64 {
    3_600
}
