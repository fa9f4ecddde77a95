//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::DtrackClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// Implement this trait for entity types that can be fetched individually
/// by a unique identifier (typically a UUID).
///
/// # Example
///
/// ```ignore
/// use dtrackapi::{DtrackClient, Project, Get};
///
/// let client = DtrackClient::from_env()?;
/// let project = Project::get(&client, uuid).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id;

    /// Fetch the entity by ID.
    ///
    /// # Arguments
    ///
    /// * `client` - The Dependency-Track API client
    /// * `id` - The entity identifier
    ///
    /// # Errors
    ///
    /// Returns [`DtrackError::NotFound`](crate::DtrackError::NotFound) if the
    /// server does not know the entity, or another error if the request fails.
    async fn get(client: &DtrackClient, id: Self::Id) -> Result<Self>;
}
