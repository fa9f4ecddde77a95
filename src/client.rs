//! Dependency-Track API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Higher-level operations are implemented via traits on entity types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use semver::Version;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{DtrackError, Result};
use crate::models::About;

const DEFAULT_API_URL: &str = "http://localhost:8081";
const USER_AGENT: &str = concat!("dtrackapi/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "X-Api-Key";

/// Response header carrying the total number of items of a paginated listing.
pub const TOTAL_COUNT_HEADER: &str = "X-Total-Count";

#[derive(Clone)]
enum Credentials {
    ApiKey(String),
    Bearer(String),
}

/// Low-level Dependency-Track API client.
///
/// Handles authentication and HTTP requests. Entity-specific operations
/// are implemented via the `Get`, `List`, `Create`, `Update`, `Patch` and
/// `Delete` traits on model types.
///
/// The client optionally carries the version of the server it talks to.
/// Operations whose wire format changed between server releases consult
/// it; see [`DtrackClient::detect_server_version`].
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use dtrackapi::DtrackClient;
///
/// # async fn example() -> dtrackapi::Result<()> {
/// // Create from environment variables
/// let mut client = DtrackClient::from_env()?;
/// client.detect_server_version().await?;
///
/// // Or configure manually
/// let client = DtrackClient::new("your-api-key", "https://dtrack.example.com")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DtrackClient {
    http: Client,
    base_url: Arc<Url>,
    credentials: Credentials,
    server_version: Option<Version>,
}

impl std::fmt::Debug for DtrackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DtrackClient")
            .field("base_url", &self.base_url.as_str())
            .field(
                "server_version",
                &self.server_version.as_ref().map(ToString::to_string),
            )
            .finish_non_exhaustive()
    }
}

impl DtrackClient {
    /// Create a client from environment variables.
    ///
    /// Uses `DTRACK_API_KEY` for authentication (or `DTRACK_BEARER_TOKEN`
    /// when set) and optionally `DTRACK_API_URL` for the base URL
    /// (defaults to `http://localhost:8081`).
    ///
    /// # Errors
    ///
    /// Returns an error if neither credential variable is set.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("DTRACK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        if let Ok(token) = env::var("DTRACK_BEARER_TOKEN") {
            return Self::with_bearer_token(&token, &base_url);
        }

        let api_key = env::var("DTRACK_API_KEY").map_err(|_| {
            DtrackError::ConfigMissing("DTRACK_API_KEY environment variable not set".to_string())
        })?;

        Self::new(&api_key, &base_url)
    }

    /// Create a new client authenticating with an API key.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Dependency-Track API key, sent as `X-Api-Key`
    /// * `base_url` - Base URL of the server (e.g., `https://dtrack.example.com`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        Self::build(Credentials::ApiKey(api_key.to_string()), base_url)
    }

    /// Create a new client authenticating with a bearer token (e.g. an OIDC
    /// or session JWT) instead of an API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_bearer_token(token: &str, base_url: &str) -> Result<Self> {
        Self::build(Credentials::Bearer(token.to_string()), base_url)
    }

    fn build(credentials: Credentials, base_url: &str) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(DtrackError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            credentials,
            server_version: None,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Use a known server version instead of detecting it.
    #[must_use]
    pub fn with_server_version(mut self, version: Version) -> Self {
        self.server_version = Some(version);
        self
    }

    /// The server version, if it was detected or supplied.
    pub fn server_version(&self) -> Option<&Version> {
        self.server_version.as_ref()
    }

    /// Fetch the server's version from `/api/version` and remember it.
    ///
    /// Call this once before sharing the client; version-gated operations
    /// treat a client without a known version as talking to an old server.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the advertised version is
    /// not valid semver.
    pub async fn detect_server_version(&mut self) -> Result<&Version> {
        let about = About::get(self).await?;
        let version = Version::parse(about.version.trim())?;
        tracing::debug!(%version, "detected Dependency-Track server version");
        Ok(self.server_version.insert(version))
    }

    /// Whether the server version is known and at least `minimum`.
    ///
    /// Comparison uses semantic-version ordering, so `4.9.0 < 4.11.0` and a
    /// pre-release such as `4.11.0-SNAPSHOT` sorts before `4.11.0`.
    pub fn is_server_version_at_least(&self, minimum: &str) -> bool {
        let Some(current) = &self.server_version else {
            return false;
        };
        match Version::parse(minimum) {
            Ok(minimum) => *current >= minimum,
            Err(e) => {
                tracing::warn!(minimum, error = %e, "ignoring unparsable version threshold");
                false
            }
        }
    }

    /// Read the total item count of a paginated response.
    ///
    /// A missing or malformed header yields 0.
    pub fn total_count(response: &Response) -> u64 {
        response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Decode a JSON response body.
    ///
    /// Transport failures while reading the body surface as
    /// [`DtrackError::HttpError`], malformed JSON as [`DtrackError::ParseError`].
    pub async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.bytes().await.map_err(DtrackError::HttpError)?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Make a GET request.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str) -> Result<Response> {
        let request = self.request(Method::GET, path)?;
        Self::execute(request).await
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let request = self.request(Method::GET, path)?.query(query);
        Self::execute(request).await
    }

    /// Make a PUT request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let request = self.request(Method::PUT, path)?.json(body);
        Self::execute(request).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let request = self.request(Method::POST, path)?.json(body);
        Self::execute(request).await
    }

    /// Make a PATCH request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        let request = self.request(Method::PATCH, path)?.json(body);
        Self::execute(request).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let request = self.request(Method::DELETE, path)?;
        Self::execute(request).await
    }

    /// Build an authenticated request for a path relative to the base URL.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        let builder = self.http.request(method, url);

        Ok(match &self.credentials {
            Credentials::ApiKey(key) => builder.header(API_KEY_HEADER, key),
            Credentials::Bearer(token) => builder.bearer_auth(token),
        })
    }

    async fn execute(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(DtrackError::HttpError)?;
        Self::check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(DtrackError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(DtrackError::ApiError {
            message: error_message(&body, status),
            status_code: Some(status.as_u16()),
        })
    }
}

/// Extract a human-readable message from a failed response body.
///
/// Dependency-Track answers with plain text for most errors and with a JSON
/// array of constraint violations when request validation fails.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {status}");
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(json)) => {
            for key in ["message", "error", "detail"] {
                if let Some(msg) = json.get(key).and_then(|m| m.as_str()) {
                    return msg.to_string();
                }
            }
        }
        Ok(serde_json::Value::Array(violations)) => {
            let messages: Vec<String> = violations
                .iter()
                .filter_map(|v| {
                    let msg = v.get("message")?.as_str()?;
                    Some(match v.get("path").and_then(|p| p.as_str()) {
                        Some(path) => format!("{path}: {msg}"),
                        None => msg.to_string(),
                    })
                })
                .collect();
            if !messages.is_empty() {
                return messages.join("; ");
            }
        }
        _ => {}
    }

    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_client_debug() {
        let client = DtrackClient::new("test-key", "https://dtrack.example.com").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("DtrackClient"));
        assert!(debug.contains("base_url"));
        // Credentials should not be in debug output
        assert!(!debug.contains("test-key"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = DtrackClient::new("key", "https://dtrack.example.com/dtrack").unwrap();
        let client2 = DtrackClient::new("key", "https://dtrack.example.com/dtrack/").unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_version_gate_without_known_version() {
        let client = DtrackClient::new("key", "https://dtrack.example.com").unwrap();
        assert!(client.server_version().is_none());
        assert!(!client.is_server_version_at_least("4.11.0"));
    }

    #[test]
    fn test_version_gate_uses_semver_ordering() {
        let client = DtrackClient::new("key", "https://dtrack.example.com").unwrap();

        // "4.9.3" sorts after "4.11.0" as a string
        let old = client.clone().with_server_version(Version::new(4, 9, 3));
        assert!(!old.is_server_version_at_least("4.11.0"));

        let newer = client.clone().with_server_version(Version::new(4, 12, 0));
        assert!(newer.is_server_version_at_least("4.11.0"));

        let exact = client.clone().with_server_version(Version::new(4, 11, 0));
        assert!(exact.is_server_version_at_least("4.11.0"));

        let snapshot = client.with_server_version(Version::parse("4.11.0-SNAPSHOT").unwrap());
        assert!(!snapshot.is_server_version_at_least("4.11.0"));
    }

    #[test]
    fn test_error_message_plain_text() {
        let msg = error_message("The project could not be found.", StatusCode::NOT_FOUND);
        assert_eq!(msg, "The project could not be found.");
    }

    #[test]
    fn test_error_message_empty_body() {
        let msg = error_message("  ", StatusCode::UNAUTHORIZED);
        assert_eq!(msg, "HTTP 401 Unauthorized");
    }

    #[test]
    fn test_error_message_validation_errors() {
        let body = r#"[
            {"message": "must not be blank", "path": "name", "invalidValue": ""},
            {"message": "size must be between 0 and 255", "path": "version"}
        ]"#;
        let msg = error_message(body, StatusCode::BAD_REQUEST);
        assert_eq!(
            msg,
            "name: must not be blank; version: size must be between 0 and 255"
        );
    }

    #[test]
    fn test_error_message_json_object() {
        let msg = error_message(r#"{"message": "boom"}"#, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "boom");
    }
}
