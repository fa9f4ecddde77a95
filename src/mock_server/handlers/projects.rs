//! Project endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::mock_server::state::{MockRejection, MockState, ProjectFilter};
use crate::{EventTokenResponse, Project, ProjectCloneRequest, ProjectPatch, TOTAL_COUNT_HEADER};

const NOT_FOUND_MESSAGE: &str = "The project could not be found.";
const CONFLICT_MESSAGE: &str = "A project with the specified name and version already exists.";

/// Query parameters accepted by the project listing endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsQuery {
    pub name: Option<String>,
    pub exclude_inactive: Option<bool>,
    pub only_root: Option<bool>,
    pub offset: Option<u32>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListProjectsQuery {
    fn filter(&self) -> ProjectFilter {
        ProjectFilter {
            name: self.name.clone(),
            exclude_inactive: self.exclude_inactive.unwrap_or(false),
            only_root: self.only_root.unwrap_or(false),
            ..Default::default()
        }
    }

    /// Slice one page out of the full result. Without a page size
    /// everything is returned. An explicit offset wins over a page number.
    fn paginate(&self, projects: Vec<&Project>) -> Vec<Project> {
        let Some(size) = self.page_size.filter(|s| *s > 0) else {
            return projects.into_iter().cloned().collect();
        };
        let start = match self.offset {
            Some(offset) => offset as usize,
            None => (self.page_number.unwrap_or(1).max(1) as usize - 1) * size as usize,
        };

        projects
            .into_iter()
            .skip(start)
            .take(size as usize)
            .cloned()
            .collect()
    }
}

/// Query parameters for the lookup endpoint.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub name: String,
    pub version: Option<String>,
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response()
}

fn rejection(rejection: MockRejection) -> Response {
    match rejection {
        MockRejection::NotFound => not_found(),
        MockRejection::Conflict => (StatusCode::CONFLICT, CONFLICT_MESSAGE).into_response(),
    }
}

fn page_response(state: &MockState, filter: ProjectFilter, query: &ListProjectsQuery) -> Response {
    let all_projects = state.list_projects(&filter);
    let total = all_projects.len();
    let projects = query.paginate(all_projects);

    (
        StatusCode::OK,
        [(TOTAL_COUNT_HEADER, total.to_string())],
        Json(projects),
    )
        .into_response()
}

/// GET /api/v1/project
pub async fn list_projects(
    State(state): State<Arc<RwLock<MockState>>>,
    Query(query): Query<ListProjectsQuery>,
) -> Response {
    let state = state.read().await;
    page_response(&state, query.filter(), &query)
}

/// GET /api/v1/project/tag/{tag}
pub async fn list_projects_by_tag(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(tag): Path<String>,
    Query(query): Query<ListProjectsQuery>,
) -> Response {
    let state = state.read().await;
    let filter = ProjectFilter {
        tag: Some(tag),
        ..query.filter()
    };
    page_response(&state, filter, &query)
}

/// GET /api/v1/project/{uuid}/children
pub async fn list_children(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(uuid): Path<Uuid>,
    Query(query): Query<ListProjectsQuery>,
) -> Response {
    let state = state.read().await;
    if state.get_project(&uuid).is_none() {
        return not_found();
    }

    let filter = ProjectFilter {
        parent: Some(uuid),
        ..query.filter()
    };
    page_response(&state, filter, &query)
}

/// GET /api/v1/project/lookup
pub async fn lookup_project(
    State(state): State<Arc<RwLock<MockState>>>,
    Query(query): Query<LookupQuery>,
) -> Response {
    let state = state.read().await;

    match state.lookup(&query.name, query.version.as_deref()) {
        Some(project) => Json(project.clone()).into_response(),
        None => not_found(),
    }
}

/// GET /api/v1/project/{uuid}
pub async fn get_project(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(uuid): Path<Uuid>,
) -> Response {
    let state = state.read().await;

    match state.get_project(&uuid) {
        Some(project) => Json(project.clone()).into_response(),
        None => not_found(),
    }
}

/// PUT /api/v1/project
pub async fn create_project(
    State(state): State<Arc<RwLock<MockState>>>,
    Json(project): Json<Project>,
) -> Response {
    let mut state = state.write().await;

    match state.create_project(project) {
        Ok(project) => (StatusCode::CREATED, Json(project.clone())).into_response(),
        Err(err) => rejection(err),
    }
}

/// POST /api/v1/project
pub async fn update_project(
    State(state): State<Arc<RwLock<MockState>>>,
    Json(project): Json<Project>,
) -> Response {
    let mut state = state.write().await;

    match state.update_project(project) {
        Some(project) => Json(project.clone()).into_response(),
        None => not_found(),
    }
}

/// PATCH /api/v1/project/{uuid}
pub async fn patch_project(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(uuid): Path<Uuid>,
    Json(patch): Json<ProjectPatch>,
) -> Response {
    let mut state = state.write().await;

    match state.patch_project(&uuid, &patch) {
        Some(project) => Json(project.clone()).into_response(),
        None => not_found(),
    }
}

/// DELETE /api/v1/project/{uuid}
pub async fn delete_project(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(uuid): Path<Uuid>,
) -> Response {
    let mut state = state.write().await;

    if state.delete_project(&uuid) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    }
}

/// PUT /api/v1/project/clone
///
/// Always answers with an event token, whatever version the mock reports.
/// Clients talking to a pre-4.11 server are expected to ignore it.
pub async fn clone_project(
    State(state): State<Arc<RwLock<MockState>>>,
    Json(request): Json<ProjectCloneRequest>,
) -> Response {
    let mut state = state.write().await;

    match state.clone_project(&request) {
        Ok((uuid, token)) => {
            tracing::debug!(%uuid, %token, "mock cloned project");
            Json(EventTokenResponse { token }).into_response()
        }
        Err(err) => rejection(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projects(count: usize) -> Vec<Project> {
        (0..count)
            .map(|i| Project::new(format!("p{i}")).with_version("1"))
            .collect()
    }

    #[test]
    fn test_paginate_without_page_size_returns_everything() {
        let all = projects(5);
        let query = ListProjectsQuery::default();
        assert_eq!(query.paginate(all.iter().collect()).len(), 5);
    }

    #[test]
    fn test_paginate_by_page_number() {
        let all = projects(5);
        let query = ListProjectsQuery {
            page_number: Some(2),
            page_size: Some(2),
            ..Default::default()
        };
        let page = query.paginate(all.iter().collect());
        let names: Vec<_> = page.iter().filter_map(|p| p.name.as_deref()).collect();
        assert_eq!(names, vec!["p2", "p3"]);
    }

    #[test]
    fn test_paginate_offset_wins() {
        let all = projects(5);
        let query = ListProjectsQuery {
            offset: Some(4),
            page_number: Some(1),
            page_size: Some(2),
            ..Default::default()
        };
        let page = query.paginate(all.iter().collect());
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name.as_deref(), Some("p4"));
    }
}
