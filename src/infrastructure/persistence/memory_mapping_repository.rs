//! In-process implementation of the mapping repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::errors::StoreError;
use crate::domain::repositories::MappingRepository;

/// Mapping store backed by a sharded concurrent map.
///
/// Inserts go through the entry API, which holds the shard lock between the
/// occupancy check and the write, so concurrent inserts of one code yield
/// exactly one success.
#[derive(Debug, Default)]
pub struct InMemoryMappingRepository {
    storage: DashMap<String, Mapping>,
    next_id: AtomicI64,
}

impl InMemoryMappingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.storage.contains_key(code))
    }

    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, StoreError> {
        match self.storage.entry(new_mapping.code) {
            Entry::Occupied(entry) => Err(StoreError::Conflict(entry.key().clone())),
            Entry::Vacant(entry) => {
                let mapping = Mapping::new(
                    self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
                    entry.key().clone(),
                    new_mapping.original_url,
                    Utc::now(),
                );
                entry.insert(mapping.clone());
                Ok(mapping)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, StoreError> {
        Ok(self.storage.get(code).map(|entry| entry.value().clone()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryMappingRepository::new();

        let created = repo
            .insert(NewMapping::new("abc123", "https://example.com"))
            .await
            .unwrap();

        let found = repo.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_find_nonexistent() {
        let repo = InMemoryMappingRepository::new();
        assert!(repo.find_by_code("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_conflict() {
        let repo = InMemoryMappingRepository::new();

        repo.insert(NewMapping::new("abc123", "https://one.example"))
            .await
            .unwrap();

        let err = repo
            .insert(NewMapping::new("abc123", "https://two.example"))
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::Conflict("abc123".to_string()));
        let kept = repo.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(kept.original_url, "https://one.example");
    }

    #[tokio::test]
    async fn test_exists() {
        let repo = InMemoryMappingRepository::new();
        assert!(!repo.exists("abc123").await.unwrap());

        repo.insert(NewMapping::new("abc123", "https://example.com"))
            .await
            .unwrap();

        assert!(repo.exists("abc123").await.unwrap());
    }

    #[tokio::test]
    async fn test_ids_are_distinct() {
        let repo = InMemoryMappingRepository::new();

        let a = repo.insert(NewMapping::new("a", "https://a.com")).await.unwrap();
        let b = repo.insert(NewMapping::new("b", "https://a.com")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_of_same_code_have_one_winner() {
        let repo = Arc::new(InMemoryMappingRepository::new());
        let mut handles = Vec::new();

        for i in 0..64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert(NewMapping::new("same", format!("https://example{i}.com")))
                    .await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(StoreError::Conflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 63);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_of_distinct_codes() {
        let repo = Arc::new(InMemoryMappingRepository::new());
        let mut handles = Vec::new();

        for i in 0..100 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert(NewMapping::new(format!("code-{i:03}"), "https://example.com"))
                    .await
                    .unwrap()
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().id);
        }

        assert_eq!(ids.len(), 100);
        assert_eq!(repo.len(), 100);
    }
}
