//! Update trait for replacing entities.

use async_trait::async_trait;

use crate::client::DtrackClient;
use crate::error::Result;

/// Replace an existing entity.
///
/// The entity carries its own identifier, and every field of it is sent;
/// fields left at their defaults overwrite what the server has.
///
/// # Example
///
/// ```ignore
/// use dtrackapi::{DtrackClient, Get, Project, Update};
///
/// let client = DtrackClient::from_env()?;
/// let mut project = Project::get(&client, uuid).await?;
/// project.description = Some("Payments backend".to_string());
/// let updated = Project::update(&client, project).await?;
/// ```
#[async_trait]
pub trait Update: Sized {
    /// Replace the stored entity with `entity` and return the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity does not exist or the request fails.
    async fn update(client: &DtrackClient, entity: Self) -> Result<Self>;
}
