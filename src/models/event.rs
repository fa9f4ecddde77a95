//! Event tokens for asynchronous server-side work.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::client::DtrackClient;
use crate::error::Result;

/// Opaque handle of an asynchronous server-side operation, such as a project
/// clone on servers 4.11.0 and later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventToken(String);

/// Body of responses that start asynchronous work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTokenResponse {
    pub token: EventToken,
}

/// Processing state of an event, as reported by `/api/v1/event/token/{token}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStatus {
    pub processing: bool,
}

impl EventToken {
    /// Wrap a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token as sent by the server.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty token.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ask the server whether the operation behind this token is still
    /// running.
    #[tracing::instrument(skip(client))]
    pub async fn is_being_processed(&self, client: &DtrackClient) -> Result<bool> {
        let path = format!("api/v1/event/token/{}", urlencoding::encode(&self.0));

        let response = client.get(&path).await?;
        let status: EventStatus = DtrackClient::decode(response).await?;
        Ok(status.processing)
    }
}

impl fmt::Display for EventToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EventToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<uuid::Uuid> for EventToken {
    fn from(token: uuid::Uuid) -> Self {
        Self(token.to_string())
    }
}
