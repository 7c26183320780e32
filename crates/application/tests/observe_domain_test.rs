use dns_sentry_application::use_cases::ObserveDomainUseCase;
use dns_sentry_domain::{DomainAction, DomainStatus};
use std::sync::Arc;

mod helpers;
use helpers::MockDomainCacheStore;

#[tokio::test]
async fn test_first_observation_enters_fail_closed() {
    let cache = Arc::new(MockDomainCacheStore::new());
    let observe = ObserveDomainUseCase::new(cache.clone());

    observe.execute("a.example").await.unwrap();

    let entry = cache.entry("a.example").await.expect("entry cached");
    assert_eq!(entry.status, DomainStatus::Fake);
    assert_eq!(entry.action, DomainAction::Drop);
    assert_eq!(entry.query_count, 1);
    assert_eq!(entry.ttl, 300);
    assert_eq!(cache.pending_snapshot().await, vec!["a.example".to_string()]);
}

#[tokio::test]
async fn test_repeat_observation_bumps_counter() {
    let cache = Arc::new(MockDomainCacheStore::new());
    let observe = ObserveDomainUseCase::new(cache.clone());

    observe.execute("a.example").await.unwrap();
    observe.execute("a.example").await.unwrap();
    observe.execute("a.example").await.unwrap();

    let entry = cache.entry("a.example").await.unwrap();
    assert_eq!(entry.status, DomainStatus::Fake);
    assert_eq!(entry.query_count, 3);
    assert_eq!(cache.pending_snapshot().await.len(), 1);
}

#[tokio::test]
async fn test_observation_preserves_existing_verdict() {
    let cache = Arc::new(MockDomainCacheStore::new());
    cache
        .seed("cdn.example", DomainStatus::Full, DomainAction::Permit, 3)
        .await;
    let observe = ObserveDomainUseCase::new(cache.clone());

    observe.execute("cdn.example").await.unwrap();

    let entry = cache.entry("cdn.example").await.unwrap();
    assert_eq!(entry.status, DomainStatus::Full);
    assert_eq!(entry.action, DomainAction::Permit);
    assert_eq!(entry.query_count, 4);
    assert_eq!(entry.ttl, 86_400);
    // Refreshing an existing entry does not re-enter the pending set.
    assert!(cache.pending_snapshot().await.is_empty());
}

#[tokio::test]
async fn test_backend_error_propagates() {
    let cache = Arc::new(MockDomainCacheStore::new());
    cache.set_should_fail(true).await;
    let observe = ObserveDomainUseCase::new(cache.clone());

    assert!(observe.execute("a.example").await.is_err());
}
