use std::fmt;

/// Classification stage of an observed domain.
///
/// A domain starts as `Fake` (seen on the wire, not yet submitted
/// upstream), moves to `Pend` once a submission batch containing it has
/// been accepted, and settles at `Full` when the classifier has returned
/// a verdict for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainStatus {
    Fake,
    Pend,
    Full,
}

impl DomainStatus {
    /// Integer code used by the backend hash encoding.
    pub fn code(self) -> i64 {
        match self {
            DomainStatus::Fake => 0,
            DomainStatus::Pend => 1,
            DomainStatus::Full => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(DomainStatus::Fake),
            1 => Some(DomainStatus::Pend),
            2 => Some(DomainStatus::Full),
            _ => None,
        }
    }
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainStatus::Fake => write!(f, "FAKE"),
            DomainStatus::Pend => write!(f, "PEND"),
            DomainStatus::Full => write!(f, "FULL"),
        }
    }
}

/// Policy attached to a domain. `Drop` is the fail-closed default for
/// anything not yet classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainAction {
    Drop,
    Permit,
}

impl DomainAction {
    pub fn code(self) -> i64 {
        match self {
            DomainAction::Drop => 0,
            DomainAction::Permit => 1,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(DomainAction::Drop),
            1 => Some(DomainAction::Permit),
            _ => None,
        }
    }
}

impl fmt::Display for DomainAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainAction::Drop => write!(f, "DROP"),
            DomainAction::Permit => write!(f, "PERMIT"),
        }
    }
}

/// Canonical cache record for one domain.
///
/// `last_updated` and `last_accessed` are written together on every
/// insert or refresh; `ttl` is always recomputed from `(status, action)`
/// at write time so a status transition restarts the expiry window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub domain: String,
    pub status: DomainStatus,
    pub action: DomainAction,
    pub query_count: u32,
    pub last_updated: i64,
    pub last_accessed: i64,
    pub ttl: i64,
}

/// Projection of a cache record used for stats reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainMeta {
    pub status: DomainStatus,
    pub action: DomainAction,
    pub query_count: u32,
}
