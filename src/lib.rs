//! Dependency-Track API client library.
//!
//! A Rust library for interacting with the Dependency-Track REST API using a
//! trait-based architecture where each operation (Get, List, Create, Update,
//! Patch, Delete) is defined as a trait that entity types implement.
//!
//! # Quick Start
//!
//! ```no_run
//! use dtrackapi::{DtrackClient, Get, List, PageOptions, Project, ProjectCloneRequest};
//!
//! #[tokio::main]
//! async fn main() -> dtrackapi::Result<()> {
//!     // Create client from environment variables
//!     let mut client = DtrackClient::from_env()?;
//!     client.detect_server_version().await?;
//!
//!     // Look a project up by name and version
//!     let project = Project::lookup(&client, "payments", "2.1.0").await?;
//!     println!("Project: {}", project.display_name());
//!
//!     // List the first page of projects
//!     let page = Project::list_page(&client, &Default::default(), &PageOptions::for_page(1, 50)).await?;
//!     println!("Showing {} of {} projects", page.len(), page.total_count);
//!
//!     // Clone it; newer servers hand back a token to poll
//!     let request = ProjectCloneRequest::new(project.uuid, "2.2.0").including_everything();
//!     if let Some(token) = Project::clone_project(&client, &request).await? {
//!         println!("Clone running: {}", token.is_being_processed(&client).await?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The library is organized around a handful of operation traits:
//!
//! - [`Get`] - Fetch a single entity by ID
//! - [`List`] - Fetch paginated collections of entities
//! - [`Create`], [`Update`], [`Patch`], [`Delete`] - Modify entities
//!
//! Each entity type (like [`Project`]) implements the traits that are
//! supported by its API endpoints. Operations without a generic shape
//! (lookup, tag listing, cloning) are inherent methods.
//!
//! # Server versions
//!
//! Some endpoints changed between Dependency-Track releases. The client
//! carries the server version ([`DtrackClient::detect_server_version`] or
//! [`DtrackClient::with_server_version`]) and version-gated operations
//! consult it. A client that never learned the version is treated as talking
//! to an old server.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `DTRACK_API_KEY` (required unless `DTRACK_BEARER_TOKEN` is set) - API key
//! - `DTRACK_BEARER_TOKEN` (optional) - Bearer token used instead of the API key
//! - `DTRACK_API_URL` (optional) - Base URL (defaults to `http://localhost:8081`)

pub mod cli;
mod client;
mod error;
pub mod mcp;
#[cfg(feature = "test-server")]
pub mod mock_server;
mod models;
mod output;
mod pagination;
mod traits;

// Re-export core types
pub use client::{DtrackClient, TOTAL_COUNT_HEADER};
pub use error::{DtrackError, Result};
pub use output::PrettyPrint;
pub use pagination::{Page, PageOptions};

// Re-export traits
pub use traits::{Create, Delete, Get, List, Patch, Update, DEFAULT_PAGE_SIZE};

// Re-export models
pub use models::{
    // Server information
    About,
    Framework,
    // Event types
    EventStatus,
    EventToken,
    EventTokenResponse,
    // Project types
    ExternalReference,
    ParentRef,
    Project,
    ProjectCloneRequest,
    ProjectListQuery,
    ProjectMetrics,
    ProjectPatch,
    ProjectProperty,
    Tag,
    CLONE_TOKEN_MIN_VERSION,
};

// Identifier and version types used throughout the public API
pub use semver::Version;
pub use uuid::Uuid;
