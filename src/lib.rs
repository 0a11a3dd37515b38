//! # snipurl
//!
//! Maps long URLs to short random codes and resolves them back.
//!
//! Layers:
//!
//! - [`domain`]: the [`Mapping`](domain::entities::Mapping) record, the store
//!   contract and the error split between store failures and core outcomes
//! - [`application`]: code allocation with bounded retries, and resolution
//! - [`infrastructure`]: PostgreSQL, in-memory and Redis adapters
//! - [`api`]: HTTP handlers, DTOs and request tracing
//!
//! Uniqueness of codes rests on the store: PostgreSQL's `mappings_code_key`
//! constraint, or the per-key entry lock of the in-memory store. The
//! existence check before each insert only saves a wasted write.
//!
//! Settings come from the environment, see [`config`]. Migrations in
//! `migrations/` run at startup.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Types most callers and the integration tests need.
pub mod prelude {
    pub use crate::application::RetryPolicy;
    pub use crate::application::services::MappingService;
    pub use crate::domain::entities::{Mapping, NewMapping};
    pub use crate::domain::errors::{CoreError, StoreError};
    pub use crate::domain::repositories::MappingRepository;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
    pub use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
}
