//! Mock Dependency-Track API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the
//! Dependency-Track API for integration and end-to-end testing. Unlike
//! wiremock which mocks at the HTTP level per-test, this server maintains
//! state across requests, enabling realistic workflow testing.
//!
//! # Example
//!
//! ```ignore
//! use dtrackapi::mock_server::{Fixtures, MockServer};
//! use dtrackapi::{DtrackClient, Get, Project};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = DtrackClient::new("test-key", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let project = Project::get(&client, Fixtures::PAYMENTS_UUID).await.unwrap();
//!     assert_eq!(project.name.as_deref(), Some("payments"));
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{MockRejection, MockState, ProjectFilter, DEFAULT_SERVER_VERSION};
