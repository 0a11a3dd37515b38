//! Shared state injected into HTTP handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::MappingService;
use crate::domain::repositories::MappingRepository;
use crate::utils::code_generator::CodeGenerator;

/// Mapping service with the store and generator chosen at startup.
pub type DynMappingService = MappingService<dyn MappingRepository, dyn CodeGenerator>;

#[derive(Clone)]
pub struct AppState {
    pub mapping_service: Arc<DynMappingService>,
    /// Public prefix for short URLs, without a trailing slash.
    pub base_url: Arc<str>,
    /// Allocation deadline applied to each shorten request.
    pub shorten_timeout: Duration,
}

impl AppState {
    pub fn new(
        mapping_service: Arc<DynMappingService>,
        base_url: &str,
        shorten_timeout: Duration,
    ) -> Self {
        Self {
            mapping_service,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            shorten_timeout,
        }
    }
}
