//! Mapping creation and resolution.

use std::sync::Arc;

use tokio::time::Instant;
use tokio_retry::RetryIf;
use tracing::{debug, info, warn};

use crate::application::retry::RetryPolicy;
use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::errors::{CoreError, StoreError};
use crate::domain::repositories::MappingRepository;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{CodeGenerator, is_reserved_code};

/// Outcome of a single allocation attempt.
#[derive(Debug)]
enum AttemptError {
    /// The candidate code is taken. Retryable.
    Collision(String),
    Fatal(CoreError),
}

impl From<StoreError> for AttemptError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(code) => Self::Collision(code),
            other => Self::Fatal(other.into()),
        }
    }
}

/// Store and cache status reported by [`MappingService::health`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub store_ok: bool,
    pub cache_ok: bool,
    pub cache_backend: &'static str,
}

impl HealthReport {
    /// The service can accept traffic as long as the store answers.
    /// A broken cache only slows resolves down.
    pub fn is_healthy(&self) -> bool {
        self.store_ok
    }
}

/// Coordinates the code generator, the mapping store and the resolve cache.
///
/// # Allocation
///
/// [`shorten`](Self::shorten) draws a candidate from the generator, skips it
/// if it is a reserved route name or [`MappingRepository::exists`] reports it
/// taken, and otherwise inserts.
/// A [`StoreError::Conflict`] from the insert is treated exactly like a
/// taken candidate, because another writer may claim the code between the
/// check and the insert. Collisions are retried under the [`RetryPolicy`];
/// every other store error aborts immediately.
///
/// # Resolution
///
/// [`resolve`](Self::resolve) consults the cache first and writes store hits
/// back. Cache errors are logged and otherwise ignored.
pub struct MappingService<R: ?Sized, G: ?Sized> {
    repository: Arc<R>,
    generator: Arc<G>,
    cache: Arc<dyn CacheService>,
    retry_policy: RetryPolicy,
    cache_ttl_seconds: Option<u64>,
}

impl<R, G> MappingService<R, G>
where
    R: MappingRepository + ?Sized,
    G: CodeGenerator + ?Sized,
{
    /// Creates a new mapping service.
    pub fn new(
        repository: Arc<R>,
        generator: Arc<G>,
        cache: Arc<dyn CacheService>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            repository,
            generator,
            cache,
            retry_policy,
            cache_ttl_seconds: None,
        }
    }

    /// Overrides the TTL used when writing resolved mappings to the cache.
    /// Without it the cache backend's default applies.
    pub fn with_cache_ttl(mut self, ttl_seconds: u64) -> Self {
        self.cache_ttl_seconds = Some(ttl_seconds);
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Creates a mapping for `original_url` under a freshly allocated code.
    ///
    /// The URL is stored as given. Shortening the same URL twice yields two
    /// distinct mappings.
    ///
    /// # Errors
    ///
    /// - [`CoreError::ExhaustedRetries`] if every attempt collided
    /// - [`CoreError::Store`] on any non-collision store failure
    pub async fn shorten(&self, original_url: &str) -> Result<Mapping, CoreError> {
        self.shorten_with_deadline(original_url, None).await
    }

    /// Same as [`shorten`](Self::shorten), but gives up once `deadline` has
    /// passed. The deadline is checked before each attempt, so an attempt
    /// already talking to the store is allowed to finish.
    ///
    /// # Errors
    ///
    /// Additionally returns [`CoreError::DeadlineExceeded`].
    pub async fn shorten_with_deadline(
        &self,
        original_url: &str,
        deadline: Option<Instant>,
    ) -> Result<Mapping, CoreError> {
        let mut attempts: u32 = 0;

        let result = RetryIf::start(
            self.retry_policy.delays(),
            || {
                attempts += 1;
                let attempt = attempts;
                async move {
                    if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                        return Err(AttemptError::Fatal(CoreError::DeadlineExceeded {
                            attempts: attempt - 1,
                        }));
                    }
                    self.try_allocate(original_url, attempt).await
                }
            },
            |err: &AttemptError| matches!(err, AttemptError::Collision(_)),
        )
        .await;

        match result {
            Ok(mapping) => {
                info!(
                    code = %mapping.code,
                    attempts,
                    "Created mapping"
                );
                Ok(mapping)
            }
            Err(AttemptError::Collision(code)) => {
                metrics::counter!("snipurl_shorten_exhausted_total").increment(1);
                warn!(
                    attempts,
                    last_code = %code,
                    code_length = self.generator.code_length(),
                    "Could not allocate a unique code"
                );
                Err(CoreError::ExhaustedRetries { attempts })
            }
            Err(AttemptError::Fatal(err)) => {
                if let CoreError::DeadlineExceeded { attempts } = &err {
                    warn!(attempts, "Shorten deadline exceeded");
                }
                Err(err)
            }
        }
    }

    async fn try_allocate(
        &self,
        original_url: &str,
        attempt: u32,
    ) -> Result<Mapping, AttemptError> {
        let code = self.generator.generate();

        if is_reserved_code(&code) {
            return Err(self.collision(code, attempt, "reserved"));
        }

        if self.repository.exists(&code).await? {
            return Err(self.collision(code, attempt, "exists"));
        }

        match self
            .repository
            .insert(NewMapping::new(code, original_url))
            .await
        {
            Ok(mapping) => Ok(mapping),
            Err(StoreError::Conflict(code)) => Err(self.collision(code, attempt, "insert")),
            Err(err) => Err(err.into()),
        }
    }

    fn collision(&self, code: String, attempt: u32, detected_by: &'static str) -> AttemptError {
        metrics::counter!("snipurl_code_collisions_total", "detected_by" => detected_by)
            .increment(1);
        debug!(code = %code, attempt, detected_by, "Code collision");
        AttemptError::Collision(code)
    }

    /// Returns the original URL stored under `code`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if no mapping exists
    /// - [`CoreError::Store`] if the store could not answer
    pub async fn resolve(&self, code: &str) -> Result<String, CoreError> {
        match self.cache.get_original_url(code).await {
            Ok(Some(original_url)) => {
                debug!(code, "Cache hit");
                return Ok(original_url);
            }
            Ok(None) => debug!(code, "Cache miss"),
            Err(e) => warn!(code, error = %e, "Cache lookup failed, falling back to store"),
        }

        let mapping = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                code: code.to_string(),
            })?;

        if let Err(e) = self
            .cache
            .set_original_url(code, &mapping.original_url, self.cache_ttl_seconds)
            .await
        {
            warn!(code, error = %e, "Failed to cache resolved mapping");
        }

        Ok(mapping.original_url)
    }

    /// Like [`resolve`](Self::resolve) but skips the cache and returns the
    /// whole record.
    pub async fn find(&self, code: &str) -> Result<Mapping, CoreError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                code: code.to_string(),
            })
    }

    /// Probes the store and the cache.
    pub async fn health(&self) -> HealthReport {
        let store_ok = match self.repository.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Store health check failed");
                false
            }
        };

        HealthReport {
            store_ok,
            cache_ok: self.cache.health_check().await,
            cache_backend: self.cache.backend(),
        }
    }
}
