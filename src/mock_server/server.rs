//! Mock Dependency-Track API server.
//!
//! Provides an axum-based HTTP server that simulates the Dependency-Track API.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

const API_KEY_HEADER: &str = "X-Api-Key";

/// A mock Dependency-Track API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `DtrackClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    pub fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        scenario
            .projects
            .into_iter()
            .fold(MockState::new(), MockState::with_project)
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        let api = Router::new()
            // Project routes
            .route(
                "/api/v1/project",
                get(handlers::list_projects)
                    .put(handlers::create_project)
                    .post(handlers::update_project),
            )
            .route("/api/v1/project/lookup", get(handlers::lookup_project))
            .route("/api/v1/project/clone", put(handlers::clone_project))
            .route("/api/v1/project/tag/:tag", get(handlers::list_projects_by_tag))
            .route(
                "/api/v1/project/:uuid",
                get(handlers::get_project)
                    .patch(handlers::patch_project)
                    .delete(handlers::delete_project),
            )
            .route("/api/v1/project/:uuid/children", get(handlers::list_children))
            // Event routes
            .route("/api/v1/event/token/:token", get(handlers::get_event_status))
            .route_layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn_with_state(state.clone(), require_api_key)),
            );

        Router::new()
            .merge(api)
            .route("/api/version", get(handlers::get_version))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Reject `/api/v1` requests that do not carry the configured API key.
///
/// A bearer token equal to the key is accepted as well. Without a configured
/// key every request passes.
async fn require_api_key(
    State(state): State<Arc<RwLock<MockState>>>,
    request: Request,
    next: Next,
) -> Response {
    let required = state.read().await.required_api_key.clone();
    let Some(required) = required else {
        return next.run(request).await;
    };

    let headers = request.headers();
    let api_key = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok());
    let bearer = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if api_key == Some(required.as_str()) || bearer == Some(required.as_str()) {
        next.run(request).await
    } else {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
