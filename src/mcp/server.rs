//! MCP Server handler for the Dependency-Track API.

use rmcp::{
    handler::server::ServerHandler,
    model::{
        CallToolRequestParam, CallToolResult, Content, ErrorData as McpError, Implementation,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
        ToolsCapability,
    },
    service::RequestContext,
    RoleServer,
};
use schemars::JsonSchema;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    mcp::{CloneParams, GetParams, ListParams, LookupParams, PatchParams},
    DtrackClient, DtrackError, Get, List, PageOptions, Patch, Project, ProjectCloneRequest,
    ProjectListQuery, ProjectPatch, Tag,
};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// Dependency-Track MCP Server.
///
/// Implements the MCP ServerHandler trait, providing tools to interact
/// with the Dependency-Track API through the Model Context Protocol.
///
/// # Tools
///
/// - `get` - Fetch a project by UUID
/// - `list` - List projects, optionally by tag or name
/// - `lookup` - Find a project by name and version
/// - `patch` - Change selected project fields
/// - `clone` - Clone a project as a new version
///
/// # Example
///
/// ```no_run
/// use dtrackapi::mcp::DtrackServer;
///
/// # fn main() -> dtrackapi::Result<()> {
/// let server = DtrackServer::from_env()?;
/// // Server can now be used with rmcp transport
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DtrackServer {
    client: Arc<DtrackClient>,
    /// Copy of `client` carrying the detected server version.
    versioned: Arc<OnceCell<DtrackClient>>,
}

impl DtrackServer {
    /// Create a new DtrackServer from environment variables.
    ///
    /// Uses `DTRACK_API_KEY` (or `DTRACK_BEARER_TOKEN`) for authentication
    /// and optionally `DTRACK_API_URL` for the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if no credentials are set.
    pub fn from_env() -> crate::Result<Self> {
        let client = DtrackClient::from_env()?;
        Ok(Self::new(client))
    }

    /// Create a new DtrackServer with an existing client.
    pub fn new(client: DtrackClient) -> Self {
        Self {
            client: Arc::new(client),
            versioned: Arc::new(OnceCell::new()),
        }
    }

    /// The client to use for version-gated calls.
    ///
    /// The server version is detected on first use and kept for later calls.
    /// A failed detection is not cached, so the next call tries again.
    async fn versioned_client(&self) -> &DtrackClient {
        if self.client.server_version().is_some() {
            return &self.client;
        }

        let base: &DtrackClient = &self.client;
        let detected = self
            .versioned
            .get_or_try_init(move || async move {
                let mut client = base.clone();
                client.detect_server_version().await?;
                Ok::<_, DtrackError>(client)
            })
            .await;

        match detected {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(error = %e, "could not detect server version");
                &self.client
            }
        }
    }

    /// Generate JSON Schema for a type.
    fn schema<T: JsonSchema>() -> Arc<serde_json::Map<String, serde_json::Value>> {
        let schema = schemars::schema_for!(T);
        let value = serde_json::to_value(&schema).unwrap_or(serde_json::json!({}));
        match value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        }
    }

    /// Convert DtrackError to McpError.
    fn to_mcp_error(err: DtrackError) -> McpError {
        match &err {
            DtrackError::NotFound { entity_type, id } => {
                McpError::resource_not_found(format!("{entity_type} '{id}' not found"), None)
            }
            DtrackError::ConfigMissing(msg) => McpError::invalid_params(msg.clone(), None),
            DtrackError::InvalidUuid(e) => {
                McpError::invalid_params(format!("Invalid UUID: {e}"), None)
            }
            _ => McpError::internal_error(err.to_string(), None),
        }
    }

    fn parse_uuid(raw: &str) -> Result<Uuid, McpError> {
        Uuid::parse_str(raw.trim()).map_err(|e| Self::to_mcp_error(e.into()))
    }

    fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Handle the `get` tool.
    ///
    /// Returns the project as pretty-printed JSON in a `CallToolResult`.
    ///
    /// # Errors
    ///
    /// Returns an MCP error if the UUID is malformed or the API call fails.
    pub async fn handle_get(&self, params: GetParams) -> Result<CallToolResult, McpError> {
        let uuid = Self::parse_uuid(&params.uuid)?;
        let project = Project::get(&self.client, uuid)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::json_result(&project)
    }

    /// Handle the `list` tool.
    ///
    /// A `name` returns every version of that project in one array. A `tag`
    /// or no filter returns one page (default page 1, 20 items, at most 100).
    pub async fn handle_list(&self, params: ListParams) -> Result<CallToolResult, McpError> {
        let exclude_inactive = params.exclude_inactive.unwrap_or(false);
        let only_root = params.only_root.unwrap_or(false);

        if let Some(name) = params.name.as_deref() {
            let projects = Project::for_name(&self.client, name, exclude_inactive, only_root)
                .await
                .map_err(Self::to_mcp_error)?;
            return Self::json_result(&projects);
        }

        let options = PageOptions::for_page(
            params.page.unwrap_or(1).max(1),
            params
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        );

        let page = match params.tag.as_deref() {
            Some(tag) => {
                Project::list_by_tag(&self.client, tag, exclude_inactive, only_root, &options)
                    .await
            }
            None => {
                let query = ProjectListQuery {
                    name: None,
                    exclude_inactive: params.exclude_inactive,
                    only_root: params.only_root,
                };
                Project::list_page(&self.client, &query, &options).await
            }
        }
        .map_err(Self::to_mcp_error)?;

        Self::json_result(&page)
    }

    /// Handle the `lookup` tool.
    pub async fn handle_lookup(&self, params: LookupParams) -> Result<CallToolResult, McpError> {
        let project = Project::lookup(&self.client, &params.name, &params.version)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::json_result(&project)
    }

    /// Handle the `patch` tool.
    pub async fn handle_patch(&self, params: PatchParams) -> Result<CallToolResult, McpError> {
        let uuid = Self::parse_uuid(&params.uuid)?;
        let patch = ProjectPatch {
            name: params.name,
            version: params.version,
            description: params.description,
            active: params.active,
            tags: params
                .tags
                .map(|tags| tags.iter().map(|t| Tag::from(t.as_str())).collect()),
            ..Default::default()
        };
        if patch.is_empty() {
            return Err(McpError::invalid_params(
                "patch needs at least one field to change",
                None,
            ));
        }

        let project = Project::patch(&self.client, uuid, patch)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::json_result(&project)
    }

    /// Handle the `clone` tool.
    ///
    /// Detects the server version once when the client does not know it,
    /// so newer servers report an event token.
    pub async fn handle_clone(&self, params: CloneParams) -> Result<CallToolResult, McpError> {
        let uuid = Self::parse_uuid(&params.uuid)?;

        let mut request = ProjectCloneRequest::new(uuid, params.version);
        if params.include_all {
            request = request.including_everything();
        } else {
            request.include_components = params.include_components;
            request.include_tags = params.include_tags;
            request.include_properties = params.include_properties;
        }
        request.include_policy_violations = params.include_policy_violations;
        request.make_clone_latest = params.make_clone_latest;

        let client = self.versioned_client().await;
        let token = Project::clone_project(client, &request)
            .await
            .map_err(Self::to_mcp_error)?;
        Self::json_result(&serde_json::json!({ "token": token }))
    }
}

impl ServerHandler for DtrackServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "dtrackapi".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "Dependency-Track API MCP Server - Find, inspect, change and clone projects."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: PaginatedRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        let tools = vec![
            Tool::new(
                "get",
                "Fetch a Dependency-Track project by UUID, including its tags and metrics.",
                Self::schema::<GetParams>(),
            ),
            Tool::new(
                "list",
                "List Dependency-Track projects. \
                 tag: projects carrying a tag (paginated). \
                 name: every version of one project (not paginated). \
                 Otherwise all projects, paginated.",
                Self::schema::<ListParams>(),
            ),
            Tool::new(
                "lookup",
                "Find a Dependency-Track project by exact name and version.",
                Self::schema::<LookupParams>(),
            ),
            Tool::new(
                "patch",
                "Change selected fields of a project: name, version, description, active, tags. \
                 Fields left out are not touched.",
                Self::schema::<PatchParams>(),
            ),
            Tool::new(
                "clone",
                "Clone a project as a new version. Servers 4.11.0 and later return an event \
                 token; older servers return null.",
                Self::schema::<CloneParams>(),
            ),
        ];

        Ok(ListToolsResult {
            tools,
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request
            .arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::json!({}));

        fn parse<T: serde::de::DeserializeOwned>(args: serde_json::Value) -> Result<T, McpError> {
            serde_json::from_value(args).map_err(|e| McpError::invalid_params(e.to_string(), None))
        }

        match request.name.as_ref() {
            "get" => self.handle_get(parse(args)?).await,
            "list" => self.handle_list(parse(args)?).await,
            "lookup" => self.handle_lookup(parse(args)?).await,
            "patch" => self.handle_patch(parse(args)?).await,
            "clone" => self.handle_clone(parse(args)?).await,
            other => Err(McpError::invalid_params(
                format!("Unknown tool: {other}"),
                None,
            )),
        }
    }
}
