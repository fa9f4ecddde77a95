//! Patch trait for partially modifying entities.

use async_trait::async_trait;

use crate::client::DtrackClient;
use crate::error::Result;

/// Partially update an existing entity.
///
/// Only the fields populated in the parameters are sent; the server keeps
/// the current value of everything else.
///
/// # Example
///
/// ```ignore
/// use dtrackapi::{DtrackClient, Patch, Project, ProjectPatch};
///
/// let client = DtrackClient::from_env()?;
/// let updated = Project::patch(
///     &client,
///     uuid,
///     ProjectPatch {
///         active: Some(false),
///         ..Default::default()
///     },
/// ).await?;
/// ```
#[async_trait]
pub trait Patch: Sized {
    /// The ID type for this entity.
    type Id;

    /// The partial representation sent to the server.
    type Params;

    /// Apply the partial update and return the updated entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn patch(client: &DtrackClient, id: Self::Id, params: Self::Params) -> Result<Self>;
}
