//! Domain layer containing business entities and the store contract.
//!
//! - [`entities`] - Core data structures
//! - [`repositories`] - Data access trait definitions
//! - [`errors`] - Store and coordinator error types
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Business logic lives in [`crate::application::services`].

pub mod entities;
pub mod errors;
pub mod repositories;

pub use errors::{CoreError, StoreError};
