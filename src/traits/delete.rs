//! Delete trait for removing entities.

use async_trait::async_trait;

use crate::client::DtrackClient;
use crate::error::Result;

/// Delete an entity by ID.
#[async_trait]
pub trait Delete {
    /// The ID type for this entity.
    type Id;

    /// Delete the entity.
    ///
    /// # Errors
    ///
    /// Returns [`DtrackError::NotFound`](crate::DtrackError::NotFound) if the
    /// entity is already gone, or another error if the request fails.
    async fn delete(client: &DtrackClient, id: Self::Id) -> Result<()>;
}
