//! Create trait for adding new entities.

use async_trait::async_trait;

use crate::client::DtrackClient;
use crate::error::Result;

/// Create a new entity on the server.
///
/// The server assigns identifiers; the returned value is the entity as
/// stored, including its UUID.
#[async_trait]
pub trait Create: Sized {
    /// What the caller supplies to create the entity.
    type Params: Send;

    /// Create the entity and return the stored version.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the entity (e.g. a conflict
    /// with an existing one) or the request fails.
    async fn create(client: &DtrackClient, params: Self::Params) -> Result<Self>;
}
