use sqlx::PgPool;
use std::sync::Arc;
use urlgate::domain::entities::{NewRecord, PlanTier};
use urlgate::domain::repositories::{OwnerRepository, RecordStore};
use urlgate::error::AppError;
use urlgate::infrastructure::persistence::{PgOwnerRepository, PgRecordStore};

async fn create_owner(pool: &PgPool, name: &str) -> i64 {
    PgOwnerRepository::new(Arc::new(pool.clone()))
        .create(name, &format!("hash-{}", name), PlanTier::Free)
        .await
        .unwrap()
        .id
}

fn new_record(code: &str, url: &str, owner_id: i64) -> NewRecord {
    NewRecord {
        short_code: code.to_string(),
        original_url: url.to_string(),
        owner_id,
        expiry_date: None,
        password_hash: None,
    }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_and_find_record(pool: PgPool) {
    let owner_id = create_owner(&pool, "alice").await;
    let store = PgRecordStore::new(Arc::new(pool));

    let created = store
        .create(new_record("abc123", "https://example.com", owner_id))
        .await
        .unwrap();
    assert_eq!(created.short_code, "abc123");
    assert_eq!(created.click_count, 0);
    assert!(!created.is_deleted);

    let found = store.find_active_by_code("abc123").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.owner_id, owner_id);

    let by_url = store
        .find_by_original_url("https://example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_url.id, created.id);

    assert!(store.find_active_by_code("missing").await.unwrap().is_none());
    assert!(store.ping().await);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_live_code_is_unique(pool: PgPool) {
    let owner_id = create_owner(&pool, "bob").await;
    let store = PgRecordStore::new(Arc::new(pool));

    store
        .create(new_record("dup", "https://a.com", owner_id))
        .await
        .unwrap();
    let err = store
        .create(new_record("dup", "https://b.com", owner_id))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::CodeTaken { .. }));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_soft_deleted_code_is_reusable(pool: PgPool) {
    let owner_id = create_owner(&pool, "carol").await;
    let store = PgRecordStore::new(Arc::new(pool.clone()));

    let first = store
        .create(new_record("again", "https://a.com", owner_id))
        .await
        .unwrap();
    assert!(store.soft_delete(first.id).await.unwrap());
    assert!(!store.soft_delete(first.id).await.unwrap());
    assert!(store.find_active_by_code("again").await.unwrap().is_none());

    let second = store
        .create(new_record("again", "https://b.com", owner_id))
        .await
        .unwrap();
    assert_ne!(first.id, second.id);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_codes WHERE short_code = $1")
        .bind("again")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 2);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_increment_click_and_update_expiry(pool: PgPool) {
    let owner_id = create_owner(&pool, "dave").await;
    let store = PgRecordStore::new(Arc::new(pool));

    let record = store
        .create(new_record("clicky", "https://a.com", owner_id))
        .await
        .unwrap();

    assert!(store.increment_click(record.id).await.unwrap());
    assert!(store.increment_click(record.id).await.unwrap());
    assert!(!store.increment_click(record.id + 1000).await.unwrap());

    let expiry = chrono::Utc::now() + chrono::Duration::days(1);
    assert!(store.update_expiry(record.id, Some(expiry)).await.unwrap());

    let found = store.find_active_by_code("clicky").await.unwrap().unwrap();
    assert_eq!(found.click_count, 2);
    assert!(found.last_accessed_at.is_some());
    assert!(found.expiry_date.is_some());

    assert!(store.update_expiry(record.id, None).await.unwrap());
    let cleared = store.find_active_by_code("clicky").await.unwrap().unwrap();
    assert!(cleared.expiry_date.is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_rankings_skip_deleted_records(pool: PgPool) {
    let owner_id = create_owner(&pool, "erin").await;
    let store = PgRecordStore::new(Arc::new(pool));

    store
        .create(new_record("a1", "https://a.com", owner_id))
        .await
        .unwrap();
    let clicked_once = store
        .create(new_record("a2", "https://a.com", owner_id))
        .await
        .unwrap();
    let gone = store
        .create(new_record("b1", "https://b.com", owner_id))
        .await
        .unwrap();

    for _ in 0..3 {
        store.increment_click(gone.id).await.unwrap();
    }
    store.increment_click(clicked_once.id).await.unwrap();
    store.soft_delete(gone.id).await.unwrap();

    let clicked = store.top_by_clicks(10).await.unwrap();
    assert_eq!(clicked.len(), 2);
    assert_eq!(clicked[0].short_code, "a2");
    assert_eq!(clicked[0].click_count, 1);

    let shortened = store.top_by_shorten_count(1).await.unwrap();
    assert_eq!(shortened.len(), 1);
    assert_eq!(shortened[0].original_url, "https://a.com");
    assert_eq!(shortened[0].shorten_count, 2);

    assert_eq!(store.list_by_owner(owner_id).await.unwrap().len(), 2);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_owner_registration_and_lookup(pool: PgPool) {
    let repo = PgOwnerRepository::new(Arc::new(pool));

    let owner = repo
        .create("Acme", "digest-1", PlanTier::Hobby)
        .await
        .unwrap();
    assert_eq!(owner.tier, PlanTier::Hobby);

    let found = repo.find_by_key_hash("digest-1").await.unwrap().unwrap();
    assert_eq!(found.id, owner.id);
    assert!(repo.find_by_key_hash("digest-2").await.unwrap().is_none());

    let err = repo
        .create("Copycat", "digest-1", PlanTier::Free)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CodeTaken { .. }));

    assert!(repo.set_tier(owner.id, PlanTier::Enterprise).await.unwrap());
    assert!(!repo.set_tier(owner.id + 100, PlanTier::Free).await.unwrap());

    let owners = repo.list().await.unwrap();
    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0].name, "Acme");
    assert_eq!(owners[0].tier, PlanTier::Enterprise);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_increment_click_skips_deleted_record_after_code_reuse(pool: PgPool) {
    let owner_id = create_owner(&pool, "frank").await;
    let store = PgRecordStore::new(Arc::new(pool));

    let old = store
        .create(new_record("reuse", "https://old.com", owner_id))
        .await
        .unwrap();
    assert!(store.soft_delete(old.id).await.unwrap());
    let reused = store
        .create(new_record("reuse", "https://new.com", owner_id))
        .await
        .unwrap();

    assert!(!store.increment_click(old.id).await.unwrap());

    let live = store.find_active_by_code("reuse").await.unwrap().unwrap();
    assert_eq!(live.id, reused.id);
    assert_eq!(live.click_count, 0);
}
