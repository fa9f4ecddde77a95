//! Error types for Dependency-Track API operations.

use thiserror::Error;

/// Errors that can occur during Dependency-Track API operations.
#[derive(Debug, Error)]
pub enum DtrackError {
    /// Configuration is missing or incomplete.
    #[error("Dependency-Track configuration required: {0}")]
    ConfigMissing(String),

    /// A project or token identifier is not a valid UUID.
    #[error("Invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    /// The server (or caller) supplied a version that is not valid semver.
    #[error("Invalid server version: {0}")]
    InvalidVersion(#[from] semver::Error),

    /// Entity not found.
    #[error("{entity_type} '{id}' not found")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// API request failed.
    #[error("Dependency-Track API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },
}

impl DtrackError {
    /// HTTP status code carried by an API error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status_code, .. } => *status_code,
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true for [`DtrackError::NotFound`] and raw 404 API errors.
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Turn a 404 API error into [`DtrackError::NotFound`] for the given entity.
    ///
    /// Any other error is returned unchanged.
    pub(crate) fn not_found_as(self, entity_type: &'static str, id: impl ToString) -> Self {
        match self {
            Self::ApiError {
                status_code: Some(404),
                ..
            } => Self::NotFound {
                entity_type,
                id: id.to_string(),
            },
            other => other,
        }
    }
}

/// Result type alias for Dependency-Track operations.
pub type Result<T> = core::result::Result<T, DtrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_as_converts_404() {
        let err = DtrackError::ApiError {
            message: "The project could not be found.".to_string(),
            status_code: Some(404),
        }
        .not_found_as("project", "abc");

        assert!(matches!(
            err,
            DtrackError::NotFound {
                entity_type: "project",
                ref id
            } if id == "abc"
        ));
        assert_eq!(err.to_string(), "project 'abc' not found");
    }

    #[test]
    fn test_not_found_as_keeps_other_errors() {
        let err = DtrackError::ApiError {
            message: "forbidden".to_string(),
            status_code: Some(403),
        }
        .not_found_as("project", "abc");

        assert_eq!(err.status_code(), Some(403));
        assert!(!err.is_not_found());
    }
}
