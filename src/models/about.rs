//! Server version information.

use serde::{Deserialize, Serialize};

use crate::client::DtrackClient;
use crate::error::Result;

const VERSION_PATH: &str = "api/version";

/// Application information from `/api/version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    /// Server version, e.g. `4.11.3`.
    pub version: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub system_uuid: Option<String>,
    /// Application name, normally `Dependency-Track`.
    #[serde(default)]
    pub application: Option<String>,
    #[serde(default)]
    pub framework: Option<Framework>,
}

/// The framework the server is built on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Framework {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
}

impl About {
    /// Fetch the server's application information.
    #[tracing::instrument(skip(client))]
    pub async fn get(client: &DtrackClient) -> Result<Self> {
        let response = client.get(VERSION_PATH).await?;
        DtrackClient::decode(response).await
    }
}
