//! MCP tool parameter types with JSON Schema support.

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for the `get` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetParams {
    /// The project UUID.
    pub uuid: String,
}

/// Parameters for the `list` MCP tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListParams {
    /// Only projects carrying this tag.
    #[serde(default)]
    pub tag: Option<String>,
    /// Only projects with exactly this name (all versions, not paginated).
    #[serde(default)]
    pub name: Option<String>,
    /// Leave out inactive projects.
    #[serde(default)]
    pub exclude_inactive: Option<bool>,
    /// Leave out child projects.
    #[serde(default)]
    pub only_root: Option<bool>,
    /// Page number (1-indexed).
    #[serde(default)]
    pub page: Option<u32>,
    /// Number of items per page (max 100).
    #[serde(default)]
    pub page_size: Option<u32>,
}

/// Parameters for the `lookup` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LookupParams {
    /// Exact project name.
    pub name: String,
    /// Exact project version.
    pub version: String,
}

/// Parameters for the `patch` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PatchParams {
    /// The project UUID.
    pub uuid: String,
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New version.
    #[serde(default)]
    pub version: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the project is active.
    #[serde(default)]
    pub active: Option<bool>,
    /// Replace the project's tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Parameters for the `clone` MCP tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CloneParams {
    /// UUID of the project to clone.
    pub uuid: String,
    /// Version of the clone.
    pub version: String,
    /// Copy ACL, audit history, components, properties, services and tags.
    /// Individual flags below are ignored when this is set.
    #[serde(default)]
    pub include_all: bool,
    #[serde(default)]
    pub include_components: bool,
    #[serde(default)]
    pub include_tags: bool,
    #[serde(default)]
    pub include_properties: bool,
    /// Copy policy violations (server 4.11.0+).
    #[serde(default)]
    pub include_policy_violations: Option<bool>,
    /// Mark the clone as the latest version (server 4.12.0+).
    #[serde(default)]
    pub make_clone_latest: Option<bool>,
}
