#![allow(dead_code)]

use async_trait::async_trait;
use snipurl::application::RetryPolicy;
use snipurl::application::services::MappingService;
use snipurl::domain::entities::{Mapping, NewMapping};
use snipurl::domain::errors::StoreError;
use snipurl::domain::repositories::MappingRepository;
use snipurl::infrastructure::cache::NullCache;
use snipurl::infrastructure::persistence::InMemoryMappingRepository;
use snipurl::state::AppState;
use snipurl::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE_URL: &str = "http://sho.rt";

/// A store that is never reachable.
pub struct UnreachableRepository;

#[async_trait]
impl MappingRepository for UnreachableRepository {
    async fn exists(&self, _code: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn insert(&self, _new_mapping: NewMapping) -> Result<Mapping, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn find_by_code(&self, _code: &str) -> Result<Option<Mapping>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

/// Hands out a fixed list of codes in order, then repeats the last one.
pub struct FixedCodeGenerator {
    codes: Mutex<Vec<&'static str>>,
}

impl FixedCodeGenerator {
    pub fn new(codes: &[&'static str]) -> Self {
        let mut codes = codes.to_vec();
        codes.reverse();
        Self {
            codes: Mutex::new(codes),
        }
    }
}

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        let mut codes = self.codes.lock().unwrap();
        let code = if codes.len() > 1 {
            codes.pop().unwrap()
        } else {
            codes[0]
        };
        code.to_string()
    }

    fn code_length(&self) -> usize {
        6
    }
}

pub fn state_with(
    repository: Arc<dyn MappingRepository>,
    generator: Arc<dyn CodeGenerator>,
    policy: RetryPolicy,
) -> AppState {
    let service = MappingService::new(repository, generator, Arc::new(NullCache::new()), policy);

    AppState::new(Arc::new(service), BASE_URL, Duration::from_secs(5))
}

/// State backed by a fresh in-memory store. Returns the store for inspection.
pub fn create_test_state() -> (AppState, Arc<InMemoryMappingRepository>) {
    let repository = Arc::new(InMemoryMappingRepository::new());
    let state = state_with(
        repository.clone(),
        Arc::new(RandomCodeGenerator::default()),
        RetryPolicy::default(),
    );

    (state, repository)
}

pub fn create_unreachable_state() -> AppState {
    state_with(
        Arc::new(UnreachableRepository),
        Arc::new(RandomCodeGenerator::default()),
        RetryPolicy::default(),
    )
}

pub async fn create_test_mapping(repository: &InMemoryMappingRepository, code: &str, url: &str) {
    repository
        .insert(NewMapping::new(code, url))
        .await
        .unwrap();
}
