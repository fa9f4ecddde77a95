//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Dependency-Track server.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{EventToken, Project, ProjectCloneRequest, ProjectPatch};

/// Version advertised by a mock server unless configured otherwise.
pub const DEFAULT_SERVER_VERSION: &str = "4.12.0";

/// Filters applied when listing projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub name: Option<String>,
    pub tag: Option<String>,
    pub exclude_inactive: bool,
    pub only_root: bool,
    pub parent: Option<Uuid>,
}

/// Why a write was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockRejection {
    NotFound,
    Conflict,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug)]
pub struct MockState {
    /// Projects indexed by UUID.
    pub projects: HashMap<Uuid, Project>,

    /// Version reported by `/api/version`.
    pub version: String,

    /// Event tokens handed out so far, with their processing flag.
    pub events: HashMap<EventToken, bool>,

    /// Optional API key. If set, `/api/v1` requests must send it as `X-Api-Key`.
    pub required_api_key: Option<String>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            projects: HashMap::new(),
            version: DEFAULT_SERVER_VERSION.to_string(),
            events: HashMap::new(),
            required_api_key: None,
        }
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a project to the state. A nil UUID is replaced by a fresh one.
    pub fn with_project(mut self, mut project: Project) -> Self {
        if project.uuid.is_nil() {
            project.uuid = Uuid::new_v4();
        }
        self.projects.insert(project.uuid, project);
        self
    }

    /// Set the advertised server version.
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Set the required API key.
    pub fn with_required_api_key(mut self, key: &str) -> Self {
        self.required_api_key = Some(key.to_string());
        self
    }

    /// Get a project by UUID.
    pub fn get_project(&self, uuid: &Uuid) -> Option<&Project> {
        self.projects.get(uuid)
    }

    /// Find the project with exactly this name and version.
    pub fn lookup(&self, name: &str, version: Option<&str>) -> Option<&Project> {
        let version = version.unwrap_or("");
        self.projects.values().find(|p| {
            p.name.as_deref() == Some(name) && p.version.as_deref().unwrap_or("") == version
        })
    }

    /// List projects matching a filter, ordered by name then version.
    pub fn list_projects(&self, filter: &ProjectFilter) -> Vec<&Project> {
        let mut projects: Vec<&Project> = self
            .projects
            .values()
            .filter(|p| {
                filter
                    .name
                    .as_deref()
                    .map(|n| p.name.as_deref() == Some(n))
                    .unwrap_or(true)
            })
            .filter(|p| filter.tag.as_deref().map(|t| p.has_tag(t)).unwrap_or(true))
            .filter(|p| !filter.exclude_inactive || p.active)
            .filter(|p| !filter.only_root || p.parent.is_none())
            .filter(|p| {
                filter
                    .parent
                    .map(|parent| p.parent.map(|r| r.uuid) == Some(parent))
                    .unwrap_or(true)
            })
            .collect();

        projects.sort_by(|a, b| (&a.name, &a.version).cmp(&(&b.name, &b.version)));
        projects
    }

    /// Store a new project and return it with its assigned UUID.
    pub fn create_project(&mut self, mut project: Project) -> Result<&Project, MockRejection> {
        let name = project.name.clone().unwrap_or_default();
        if self.lookup(&name, project.version.as_deref()).is_some() {
            return Err(MockRejection::Conflict);
        }

        if project.uuid.is_nil() || self.projects.contains_key(&project.uuid) {
            project.uuid = Uuid::new_v4();
        }
        let uuid = project.uuid;
        self.projects.insert(uuid, project);
        Ok(&self.projects[&uuid])
    }

    /// Replace a stored project and return the stored version.
    pub fn update_project(&mut self, project: Project) -> Option<&Project> {
        let stored = self.projects.get_mut(&project.uuid)?;
        let metrics = stored.metrics.take();
        *stored = Project {
            // Metrics are computed by the server, never taken from requests.
            metrics,
            ..project
        };
        Some(&*stored)
    }

    /// Apply a partial update and return the updated project.
    pub fn patch_project(&mut self, uuid: &Uuid, patch: &ProjectPatch) -> Option<&Project> {
        let stored = self.projects.get_mut(uuid)?;
        patch.apply_to(stored);
        Some(&*stored)
    }

    /// Delete a project. Returns false if it did not exist.
    pub fn delete_project(&mut self, uuid: &Uuid) -> bool {
        self.projects.remove(uuid).is_some()
    }

    /// Clone a project, returning the clone's UUID and an event token.
    ///
    /// The mock finishes the work immediately, so the token is never
    /// reported as processing.
    pub fn clone_project(
        &mut self,
        request: &ProjectCloneRequest,
    ) -> Result<(Uuid, EventToken), MockRejection> {
        let source = self
            .projects
            .get(&request.project_uuid)
            .ok_or(MockRejection::NotFound)?;
        let name = source.name.clone().unwrap_or_default();
        if self.lookup(&name, Some(&request.version)).is_some() {
            return Err(MockRejection::Conflict);
        }

        let mut clone = Project {
            uuid: Uuid::new_v4(),
            version: Some(request.version.clone()),
            metrics: None,
            last_bom_import: 0,
            is_latest: request.make_clone_latest,
            ..source.clone()
        };
        if !request.include_tags {
            clone.tags.clear();
        }
        if !request.include_properties {
            clone.properties.clear();
        }

        if request.make_clone_latest == Some(true) {
            for project in self.projects.values_mut() {
                if project.name.as_deref() == Some(name.as_str()) {
                    project.is_latest = Some(false);
                }
            }
        }

        let uuid = clone.uuid;
        self.projects.insert(uuid, clone);

        let token = EventToken::from(Uuid::new_v4());
        self.events.insert(token.clone(), false);
        Ok((uuid, token))
    }

    /// Whether the event behind a token is still being processed.
    /// Unknown tokens are reported as not processing.
    pub fn is_processing(&self, token: &EventToken) -> bool {
        self.events.get(token).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParentRef, Tag};

    fn sample_project(name: &str, version: &str) -> Project {
        Project::new(name).with_version(version)
    }

    #[test]
    fn test_state_add_and_get_project() {
        let state = MockState::new().with_project(sample_project("payments", "1.0"));

        let project = state.lookup("payments", Some("1.0")).unwrap();
        assert!(!project.uuid.is_nil());
        assert_eq!(state.get_project(&project.uuid), Some(project));
    }

    #[test]
    fn test_state_list_projects_with_filter() {
        let mut tagged = sample_project("alpha", "1");
        tagged.tags.push(Tag::from("critical"));
        let mut inactive = sample_project("beta", "1");
        inactive.active = false;
        let root = sample_project("gamma", "1");
        let root_uuid = Uuid::new_v4();
        let mut child = sample_project("gamma-child", "1");
        child.parent = Some(ParentRef::from(root_uuid));

        let state = MockState::new()
            .with_project(tagged)
            .with_project(inactive)
            .with_project(Project { uuid: root_uuid, ..root })
            .with_project(child);

        assert_eq!(state.list_projects(&ProjectFilter::default()).len(), 4);

        let by_tag = state.list_projects(&ProjectFilter {
            tag: Some("critical".to_string()),
            ..Default::default()
        });
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].name.as_deref(), Some("alpha"));

        let active = state.list_projects(&ProjectFilter {
            exclude_inactive: true,
            ..Default::default()
        });
        assert_eq!(active.len(), 3);

        let roots = state.list_projects(&ProjectFilter {
            only_root: true,
            ..Default::default()
        });
        assert_eq!(roots.len(), 3);

        let children = state.list_projects(&ProjectFilter {
            parent: Some(root_uuid),
            ..Default::default()
        });
        assert_eq!(children.len(), 1);
    }

    #[test]
    fn test_state_create_rejects_duplicates() {
        let mut state = MockState::new();

        let created = state
            .create_project(sample_project("payments", "1.0"))
            .unwrap()
            .clone();
        assert!(!created.uuid.is_nil());

        let duplicate = state.create_project(sample_project("payments", "1.0"));
        assert_eq!(duplicate.unwrap_err(), MockRejection::Conflict);
    }

    #[test]
    fn test_state_clone_project() {
        let mut source = sample_project("payments", "1.0");
        source.tags.push(Tag::from("pci"));
        let mut state = MockState::new().with_project(source);
        let source_uuid = state.lookup("payments", Some("1.0")).unwrap().uuid;

        let request = ProjectCloneRequest {
            make_clone_latest: Some(true),
            ..ProjectCloneRequest::new(source_uuid, "2.0")
        };
        let (clone_uuid, token) = state.clone_project(&request).unwrap();

        let clone = state.get_project(&clone_uuid).unwrap();
        assert_eq!(clone.version.as_deref(), Some("2.0"));
        assert!(clone.tags.is_empty());
        assert_eq!(clone.is_latest, Some(true));
        assert_eq!(state.get_project(&source_uuid).unwrap().is_latest, Some(false));
        assert!(!state.is_processing(&token));

        let again = state.clone_project(&request);
        assert_eq!(again.unwrap_err(), MockRejection::Conflict);
    }
}
