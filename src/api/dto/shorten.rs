//! DTOs for the shortening endpoint.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

use crate::domain::entities::Mapping;

/// Accepted URL shape: an http(s) scheme followed by a dotted host.
static URL_FORMAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)[a-zA-Z0-9-]+\.[a-zA-Z]{2,}.*$").expect("static regex is valid")
});

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten. Stored verbatim, no normalization.
    #[serde(alias = "originalUrl")]
    #[validate(custom(function = "validate_not_blank"))]
    #[validate(length(max = 2048, message = "URL length must not exceed 2048 characters"))]
    #[validate(regex(path = "*URL_FORMAT_REGEX", message = "Invalid URL format"))]
    pub original_url: String,
}

impl ShortenRequest {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
        }
    }

    /// Human-readable validation failures, empty when the request is valid.
    pub fn validation_messages(&self) -> Vec<String> {
        let Err(errors) = self.validate() else {
            return Vec::new();
        };

        errors
            .field_errors()
            .into_values()
            .flatten()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect()
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(
            ValidationError::new("blank").with_message(Cow::Borrowed("URL cannot be blank"))
        );
    }
    Ok(())
}

/// The created mapping together with its public short URL.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub id: i64,
    pub code: String,
    pub original_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShortenResponse {
    pub fn from_mapping(mapping: Mapping, base_url: &str) -> Self {
        let short_url = mapping.short_url(base_url);

        Self {
            id: mapping.id,
            code: mapping.code,
            original_url: mapping.original_url,
            short_url,
            created_at: mapping.created_at,
        }
    }
}
