//! Project model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use uuid::Uuid;

use crate::client::DtrackClient;
use crate::error::Result;
use crate::models::event::{EventToken, EventTokenResponse};
use crate::models::metrics::ProjectMetrics;
use crate::pagination::{Page, PageOptions};
use crate::traits::{Create, Delete, Get, List, Patch, Update};

const PROJECT_PATH: &str = "api/v1/project";
const LOOKUP_PATH: &str = "api/v1/project/lookup";
const CLONE_PATH: &str = "api/v1/project/clone";

/// First server release that answers a clone request with an event token.
pub const CLONE_TOKEN_MIN_VERSION: &str = "4.11.0";

/// A Dependency-Track project.
///
/// Projects are the unit BOMs are uploaded to. A project is identified by
/// its UUID; `name` and `version` together are unique per server. Projects
/// can be nested under a parent project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Server-assigned identifier. The nil UUID means "not created yet" and
    /// is left out of request bodies.
    #[serde(default, skip_serializing_if = "Uuid::is_nil")]
    pub uuid: Uuid,

    /// Project author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Project publisher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// Namespace, e.g. a Maven group or an organisation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Project name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Project version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Classifier such as `APPLICATION`, `LIBRARY` or `CONTAINER`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,

    /// CPE 2.2 or 2.3 identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpe: Option<String>,

    /// Package URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,

    /// SWID tag identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swid_tag_id: Option<String>,

    /// JSON-encoded list of direct dependencies, maintained by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_dependencies: Option<String>,

    /// Key/value properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ProjectProperty>,

    /// Tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    /// Whether the project is active. Always sent.
    #[serde(default)]
    pub active: bool,

    /// Whether this is the latest version of the project. Only servers from
    /// 4.12.0 onward know this flag; `None` leaves it out of requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_latest: Option<bool>,

    /// Metrics snapshot, filled in by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ProjectMetrics>,

    /// Parent project.
    #[serde(rename = "parent", default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentRef>,

    /// Time of the last BOM import in epoch milliseconds, 0 if none.
    #[serde(
        default,
        with = "last_bom_import",
        skip_serializing_if = "last_bom_import::is_unset"
    )]
    pub last_bom_import: i64,

    /// External references (VCS, website, issue tracker, ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_references: Vec<ExternalReference>,
}

/// Wire encoding of `lastBomImport`.
///
/// The server reads a numeric 0 as 1970-01-01 rather than "never", so the
/// value is carried as an optional on the wire: populated when non-zero and
/// left out entirely otherwise. `null` and a missing field decode to 0.
mod last_bom_import {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn is_unset(millis: &i64) -> bool {
        *millis == 0
    }

    pub fn serialize<S: Serializer>(millis: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        let wire: Option<i64> = (*millis != 0).then_some(*millis);
        wire.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(0))
    }
}

/// Reference to a parent project. The server resolves it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentRef {
    /// UUID of the parent project.
    pub uuid: Uuid,
}

impl From<Uuid> for ParentRef {
    fn from(uuid: Uuid) -> Self {
        Self { uuid }
    }
}

/// A project tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name.
    pub name: String,
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// A key/value property attached to a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectProperty {
    #[serde(rename = "groupName", default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(rename = "propertyName", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "propertyValue", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Value type such as `STRING`, `INTEGER` or `BOOLEAN`.
    #[serde(rename = "propertyType", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A link from a project to an external resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    /// Reference type, e.g. `vcs` or `website`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Project {
    /// A new, active project with the given name, ready to be passed to
    /// [`Create::create`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            active: true,
            ..Default::default()
        }
    }

    /// Set the version (builder style).
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Time of the last BOM import, if any.
    pub fn last_bom_import_at(&self) -> Option<DateTime<Utc>> {
        if self.last_bom_import == 0 {
            return None;
        }
        DateTime::from_timestamp_millis(self.last_bom_import)
    }

    /// Whether the project has the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.name.eq_ignore_ascii_case(tag))
    }

    /// `name@version`, or just the name for unversioned projects.
    pub fn display_name(&self) -> String {
        let name = self.name.as_deref().unwrap_or("<unnamed>");
        match self.version.as_deref() {
            Some(version) if !version.is_empty() => format!("{name}@{version}"),
            _ => name.to_string(),
        }
    }

    /// Fetch the parent project, if this project has one.
    pub async fn parent(&self, client: &DtrackClient) -> Result<Option<Project>> {
        match &self.parent {
            Some(parent) => Ok(Some(Project::get(client, parent.uuid).await?)),
            None => Ok(None),
        }
    }

    /// List the direct children of this project.
    #[tracing::instrument(skip(self, client), fields(project = %self.uuid))]
    pub async fn children(
        &self,
        client: &DtrackClient,
        options: &PageOptions,
    ) -> Result<Page<Project>> {
        let path = format!("{PROJECT_PATH}/{}/children", self.uuid);

        let response = client
            .get_with_query(&path, options)
            .await
            .map_err(|e| e.not_found_as("project", self.uuid))?;
        let total_count = DtrackClient::total_count(&response);
        let items: Vec<Project> = DtrackClient::decode(response).await?;

        Ok(Page::new(items, total_count))
    }

    /// All projects with the given name, one per version.
    ///
    /// An empty list is a normal result.
    #[tracing::instrument(skip(client))]
    pub async fn for_name(
        client: &DtrackClient,
        name: &str,
        exclude_inactive: bool,
        only_root: bool,
    ) -> Result<Vec<Project>> {
        let query = ProjectListQuery {
            name: Some(name.to_string()),
            exclude_inactive: Some(exclude_inactive),
            only_root: Some(only_root),
        };

        let response = client.get_with_query(PROJECT_PATH, &query).await?;
        DtrackClient::decode(response).await
    }

    /// Find the project with exactly this name and version.
    ///
    /// # Errors
    ///
    /// Returns [`DtrackError::NotFound`](crate::DtrackError::NotFound) if no
    /// project matches.
    #[tracing::instrument(skip(client))]
    pub async fn lookup(client: &DtrackClient, name: &str, version: &str) -> Result<Project> {
        let query = [("name", name), ("version", version)];

        let response = client
            .get_with_query(LOOKUP_PATH, &query)
            .await
            .map_err(|e| e.not_found_as("project", format!("{name}@{version}")))?;
        DtrackClient::decode(response).await
    }

    /// List projects carrying a tag.
    ///
    /// The tag is part of the path (`/api/v1/project/tag/{tag}`) and is
    /// percent-encoded there.
    #[tracing::instrument(skip(client))]
    pub async fn list_by_tag(
        client: &DtrackClient,
        tag: &str,
        exclude_inactive: bool,
        only_root: bool,
        options: &PageOptions,
    ) -> Result<Page<Project>> {
        let path = format!("{PROJECT_PATH}/tag/{}", urlencoding::encode(tag));
        let query = ProjectListQuery {
            name: None,
            exclude_inactive: Some(exclude_inactive),
            only_root: Some(only_root),
        };

        Self::fetch_page(client, &path, &query, options).await
    }

    /// Clone a project.
    ///
    /// Servers from 4.11.0 onward process clones asynchronously and answer
    /// with an [`EventToken`] that can be polled with
    /// [`EventToken::is_being_processed`]. Older servers send nothing
    /// usable; for them, and for clients that do not know the server version,
    /// the body is not read and `None` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`DtrackError::NotFound`](crate::DtrackError::NotFound) if the
    /// source project does not exist.
    #[tracing::instrument(skip(client, request), fields(project = %request.project_uuid))]
    pub async fn clone_project(
        client: &DtrackClient,
        request: &ProjectCloneRequest,
    ) -> Result<Option<EventToken>> {
        let response = client
            .put(CLONE_PATH, request)
            .await
            .map_err(|e| e.not_found_as("project", request.project_uuid))?;

        if !client.is_server_version_at_least(CLONE_TOKEN_MIN_VERSION) {
            tracing::debug!(
                server_version = ?client.server_version().map(ToString::to_string),
                "server predates clone event tokens, not reading response body"
            );
            return Ok(None);
        }

        let body: EventTokenResponse = DtrackClient::decode(response).await?;
        Ok(Some(body.token))
    }

    async fn fetch_page(
        client: &DtrackClient,
        path: &str,
        query: &ProjectListQuery,
        options: &PageOptions,
    ) -> Result<Page<Project>> {
        #[derive(Serialize)]
        struct RequestParams<'a> {
            #[serde(flatten)]
            query: &'a ProjectListQuery,
            #[serde(flatten)]
            options: &'a PageOptions,
        }

        let params = RequestParams { query, options };

        let response = client.get_with_query(path, &params).await?;
        let total_count = DtrackClient::total_count(&response);
        let items: Vec<Project> = DtrackClient::decode(response).await?;

        Ok(Page::new(items, total_count))
    }
}

/// Query parameters for listing projects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListQuery {
    /// Only projects with exactly this name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Leave out inactive projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_inactive: Option<bool>,

    /// Leave out projects that have a parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_root: Option<bool>,
}

/// Partial project update.
///
/// Only populated fields are serialized, so the server changes exactly
/// those and keeps everything else.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub group: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub classifier: Option<String>,
    pub cpe: Option<String>,
    pub purl: Option<String>,
    pub swid_tag_id: Option<String>,
    pub properties: Option<Vec<ProjectProperty>>,
    pub tags: Option<Vec<Tag>>,
    pub active: Option<bool>,
    /// Server 4.12.0 and later.
    pub is_latest: Option<bool>,
    pub parent: Option<ParentRef>,
    pub external_references: Option<Vec<ExternalReference>>,
}

impl ProjectPatch {
    /// Whether the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the populated fields to a local copy of a project, the way the
    /// server does.
    pub fn apply_to(&self, project: &mut Project) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        fn set_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                target.clone_from(value);
            }
        }

        set_opt(&mut project.author, &self.author);
        set_opt(&mut project.publisher, &self.publisher);
        set_opt(&mut project.group, &self.group);
        set_opt(&mut project.name, &self.name);
        set_opt(&mut project.description, &self.description);
        set_opt(&mut project.version, &self.version);
        set_opt(&mut project.classifier, &self.classifier);
        set_opt(&mut project.cpe, &self.cpe);
        set_opt(&mut project.purl, &self.purl);
        set_opt(&mut project.swid_tag_id, &self.swid_tag_id);
        set(&mut project.properties, &self.properties);
        set(&mut project.tags, &self.tags);
        set(&mut project.active, &self.active);
        set_opt(&mut project.is_latest, &self.is_latest);
        set_opt(&mut project.parent, &self.parent);
        set(&mut project.external_references, &self.external_references);
    }
}

/// What to copy when cloning a project.
///
/// The plain flags are always sent. The optional ones are only understood by
/// newer servers; `None` leaves them out so the server default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectCloneRequest {
    /// UUID of the project to clone.
    #[serde(rename = "project")]
    pub project_uuid: Uuid,

    /// Version of the new project.
    pub version: String,

    #[serde(rename = "includeACL")]
    pub include_acl: bool,
    pub include_audit_history: bool,
    pub include_components: bool,

    /// Server 4.11.0 and later.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_policy_violations: Option<bool>,

    pub include_properties: bool,
    pub include_services: bool,
    pub include_tags: bool,

    /// Server 4.12.0 and later.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make_clone_latest: Option<bool>,
}

impl ProjectCloneRequest {
    /// Clone `project_uuid` as `version`, copying nothing but the project
    /// itself.
    pub fn new(project_uuid: Uuid, version: impl Into<String>) -> Self {
        Self {
            project_uuid,
            version: version.into(),
            ..Default::default()
        }
    }

    /// Copy everything the server knows how to copy, without touching the
    /// optional flags.
    #[must_use]
    pub fn including_everything(mut self) -> Self {
        self.include_acl = true;
        self.include_audit_history = true;
        self.include_components = true;
        self.include_properties = true;
        self.include_services = true;
        self.include_tags = true;
        self
    }
}

#[async_trait]
impl Get for Project {
    type Id = Uuid;

    #[tracing::instrument(skip(client))]
    async fn get(client: &DtrackClient, uuid: Uuid) -> Result<Self> {
        let path = format!("{PROJECT_PATH}/{uuid}");

        let response = client
            .get(&path)
            .await
            .map_err(|e| e.not_found_as("project", uuid))?;
        DtrackClient::decode(response).await
    }
}

#[async_trait]
impl List for Project {
    type Query = ProjectListQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &DtrackClient,
        query: &Self::Query,
        options: &PageOptions,
    ) -> Result<Page<Self>> {
        Self::fetch_page(client, PROJECT_PATH, query, options).await
    }
}

#[async_trait]
impl Create for Project {
    type Params = Project;

    /// Create a project with `PUT /api/v1/project`.
    #[tracing::instrument(skip(client, project), fields(project = %project.display_name()))]
    async fn create(client: &DtrackClient, project: Project) -> Result<Self> {
        let response = client.put(PROJECT_PATH, &project).await?;
        DtrackClient::decode(response).await
    }
}

#[async_trait]
impl Update for Project {
    /// Replace a project with `POST /api/v1/project`.
    #[tracing::instrument(skip(client, project), fields(project = %project.uuid))]
    async fn update(client: &DtrackClient, project: Project) -> Result<Self> {
        let uuid = project.uuid;

        let response = client
            .post(PROJECT_PATH, &project)
            .await
            .map_err(|e| e.not_found_as("project", uuid))?;
        DtrackClient::decode(response).await
    }
}

#[async_trait]
impl Patch for Project {
    type Id = Uuid;
    type Params = ProjectPatch;

    #[tracing::instrument(skip(client))]
    async fn patch(client: &DtrackClient, uuid: Uuid, params: ProjectPatch) -> Result<Self> {
        let path = format!("{PROJECT_PATH}/{uuid}");

        let response = client
            .patch(&path, &params)
            .await
            .map_err(|e| e.not_found_as("project", uuid))?;
        DtrackClient::decode(response).await
    }
}

#[async_trait]
impl Delete for Project {
    type Id = Uuid;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &DtrackClient, uuid: Uuid) -> Result<()> {
        let path = format!("{PROJECT_PATH}/{uuid}");

        client
            .delete(&path)
            .await
            .map_err(|e| e.not_found_as("project", uuid))?;
        Ok(())
    }
}
