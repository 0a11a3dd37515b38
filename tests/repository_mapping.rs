use snipurl::domain::entities::NewMapping;
use snipurl::domain::errors::StoreError;
use snipurl::domain::repositories::MappingRepository;
use snipurl::infrastructure::persistence::PgMappingRepository;
use sqlx::PgPool;
use std::sync::Arc;

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_insert_mapping(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    let result = repo
        .insert(NewMapping::new("test12", "https://example.com"))
        .await;

    assert!(result.is_ok());
    let mapping = result.unwrap();
    assert_eq!(mapping.code, "test12");
    assert_eq!(mapping.original_url, "https://example.com");
    assert!(mapping.id > 0);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_insert_duplicate_code_conflicts(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    repo.insert(NewMapping::new("dup123", "https://one.example"))
        .await
        .unwrap();

    let result = repo
        .insert(NewMapping::new("dup123", "https://two.example"))
        .await;

    assert_eq!(result.unwrap_err(), StoreError::Conflict("dup123".to_string()));
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_same_url_under_two_codes(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    repo.insert(NewMapping::new("aaaaaa", "https://example.com"))
        .await
        .unwrap();
    repo.insert(NewMapping::new("bbbbbb", "https://example.com"))
        .await
        .unwrap();

    assert_eq!(repo.count().await.unwrap(), 2);
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_exists(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    assert!(!repo.exists("abc123").await.unwrap());

    repo.insert(NewMapping::new("abc123", "https://example.com"))
        .await
        .unwrap();

    assert!(repo.exists("abc123").await.unwrap());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_find_by_code(pool: PgPool) {
    sqlx::query("INSERT INTO mappings (code, original_url) VALUES ($1, $2)")
        .bind("xyz789")
        .bind("https://example.com/found")
        .execute(&pool)
        .await
        .unwrap();

    let repo = PgMappingRepository::new(Arc::new(pool));
    let mapping = repo.find_by_code("xyz789").await.unwrap();

    assert_eq!(mapping.unwrap().original_url, "https://example.com/found");
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_find_by_code_not_found(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    let result = repo.find_by_code("notfound").await;

    assert!(result.is_ok());
    assert!(result.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_delete_by_code(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    repo.insert(NewMapping::new("gone01", "https://example.com"))
        .await
        .unwrap();

    assert!(repo.delete_by_code("gone01").await.unwrap());
    assert!(!repo.delete_by_code("gone01").await.unwrap());
    assert!(repo.find_by_code("gone01").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
async fn test_ping(pool: PgPool) {
    let repo = PgMappingRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
