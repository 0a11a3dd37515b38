//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! code generation and caching. Services consume repository traits and provide
//! a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::mapping_service::MappingService`] - Code allocation and resolution
//! - [`retry::RetryPolicy`] - Bounded collision retries with backoff

pub mod retry;
pub mod services;

pub use retry::RetryPolicy;
